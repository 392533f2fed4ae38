// 📊 Aggregation Engine - event rankings and career stats
//
// Read-only over a Dataset. Nothing here mutates stored order: rankings are
// views holding references into the event.

use crate::entities::{Athlete, Event, Performance};
use crate::error::{StatsError, StatsResult};
use crate::rules::Sport;
use crate::snapshot::Dataset;
use chrono::NaiveDate;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;

// ============================================================================
// EVENT STATS
// ============================================================================

/// Performances of one event ranked by distance (descending, stable)
pub struct EventStats<'a> {
    event: &'a Event,
    sorted: Vec<&'a Performance>,
}

impl<'a> EventStats<'a> {
    pub fn new(event: &'a Event) -> Self {
        let mut sorted: Vec<&Performance> = event.performances().iter().collect();
        sorted.sort_by(|a, b| b.total_miles().total_cmp(&a.total_miles()));
        EventStats { event, sorted }
    }

    pub fn event(&self) -> &'a Event {
        self.event
    }

    pub fn all(&self) -> &[&'a Performance] {
        &self.sorted
    }

    /// Case-insensitive substring match on the sport name
    pub fn by_sport(&self, sport: &str) -> Vec<&'a Performance> {
        let needle = sport.to_lowercase();
        self.sorted
            .iter()
            .copied()
            .filter(|perf| perf.sport.as_str().to_lowercase().contains(&needle))
            .collect()
    }

    /// First `n` of the ranking; `n` past the end is clamped
    pub fn top(&self, n: usize) -> &[&'a Performance] {
        &self.sorted[..n.min(self.sorted.len())]
    }

    /// First `n` of an already-ranked subset (e.g. from [`EventStats::by_sport`])
    pub fn top_of(n: usize, ranked: &[&'a Performance]) -> Vec<&'a Performance> {
        ranked.iter().take(n).copied().collect()
    }

    pub fn leader(&self) -> Option<&'a Performance> {
        self.sorted.first().copied()
    }

    /// 1-based overall position of a performance of this event
    pub fn position_of(&self, performance: &Performance) -> Option<usize> {
        self.sorted
            .iter()
            .position(|p| std::ptr::eq(*p, performance))
            .map(|i| i + 1)
    }

    pub fn len(&self) -> usize {
        self.sorted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sorted.is_empty()
    }
}

// ============================================================================
// CAREER STATS
// ============================================================================

#[derive(Debug, Clone)]
pub struct CareerStats {
    pub athlete: Arc<Athlete>,
    pub team: bool,

    /// Distinct (event name, year) pairs
    pub event_count: usize,
    pub total_miles: f64,
    pub best_event_miles: f64,

    /// Distinct, sorted by name
    pub sports: Vec<Sport>,
}

#[derive(Default)]
struct CareerAccumulator {
    total_miles: f64,
    best_event_miles: f64,
    sports: BTreeSet<Sport>,
    events: HashSet<(String, i32)>,
}

fn accumulate(dataset: &Dataset) -> HashMap<String, CareerAccumulator> {
    let mut stats: HashMap<String, CareerAccumulator> = HashMap::new();

    for event in &dataset.events {
        for perf in event.performances() {
            let entry = stats.entry(perf.athlete.canonical_name.clone()).or_default();
            let miles = perf.total_miles();
            entry.total_miles += miles;
            if miles > entry.best_event_miles {
                entry.best_event_miles = miles;
            }
            entry.sports.insert(perf.sport);
            entry.events.insert((event.name.clone(), event.year()));
        }
    }

    stats
}

fn career_from(
    athlete: &Arc<Athlete>,
    dataset: &Dataset,
    entry: Option<&CareerAccumulator>,
) -> CareerStats {
    let mut sports: Vec<Sport> = entry
        .map(|e| e.sports.iter().copied().collect())
        .unwrap_or_default();
    sports.sort_by_key(|s| s.as_str());

    CareerStats {
        athlete: Arc::clone(athlete),
        team: dataset.athletes.is_team(athlete),
        event_count: entry.map_or(0, |e| e.events.len()),
        total_miles: entry.map_or(0.0, |e| e.total_miles),
        best_event_miles: entry.map_or(0.0, |e| e.best_event_miles),
        sports,
    }
}

/// Career stats for the whole roster, most miles first.
///
/// Athletes without performances are included with zero totals.
pub fn career_aggregate(dataset: &Dataset) -> Vec<CareerStats> {
    let stats = accumulate(dataset);

    let mut roster: Vec<CareerStats> = dataset
        .athletes
        .athletes()
        .iter()
        .map(|athlete| career_from(athlete, dataset, stats.get(&athlete.canonical_name)))
        .collect();

    roster.sort_by(|a, b| b.total_miles.total_cmp(&a.total_miles));
    roster
}

pub fn career_for(dataset: &Dataset, name: &str) -> StatsResult<CareerStats> {
    let athlete = dataset
        .athletes
        .lookup_by_name(name)
        .ok_or_else(|| StatsError::NotFound(format!("Athlete not found: '{}'", name)))?;

    let stats = accumulate(dataset);
    Ok(career_from(&athlete, dataset, stats.get(&athlete.canonical_name)))
}

// ============================================================================
// ATHLETE BREAKDOWN
// ============================================================================

/// One athlete's result in one event
#[derive(Debug, Clone)]
pub struct EventResult {
    pub event_name: String,
    pub date: NaiveDate,
    pub track_name: String,
    pub category: String,
    pub age_group: String,
    pub sport: Sport,
    pub total_laps: u32,
    pub total_miles: f64,
    pub total_km: f64,
    pub total_time_seconds: u64,
    pub average_speed_mph: f64,
    pub average_speed_kph: f64,

    /// Overall position in the event (1-based)
    pub position: usize,
    pub field_size: usize,
}

#[derive(Debug, Clone)]
pub struct AthleteBreakdown {
    pub career: CareerStats,

    /// Ascending by event date
    pub results: Vec<EventResult>,
}

pub fn athlete_breakdown(dataset: &Dataset, name: &str) -> StatsResult<AthleteBreakdown> {
    let career = career_for(dataset, name)?;
    let key = &career.athlete.canonical_name;

    let mut results = Vec::new();
    for event in &dataset.events {
        let ranking = EventStats::new(event);
        for perf in event.performances() {
            if &perf.athlete.canonical_name != key {
                continue;
            }
            results.push(EventResult {
                event_name: event.name.clone(),
                date: event.date,
                track_name: event.track.name.clone(),
                category: perf.category.clone(),
                age_group: perf.age_group.clone(),
                sport: perf.sport,
                total_laps: perf.total_laps(),
                total_miles: perf.total_miles(),
                total_km: perf.total_km(),
                total_time_seconds: perf.total_time_seconds,
                average_speed_mph: perf.average_speed_mph(),
                average_speed_kph: perf.average_speed_kph(),
                position: ranking.position_of(perf).unwrap_or(0),
                field_size: ranking.len(),
            });
        }
    }
    results.sort_by_key(|r| r.date);

    Ok(AthleteBreakdown { career, results })
}

// ============================================================================
// CHART SERIES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesPoint {
    pub elapsed_seconds: u64,
    pub miles: f64,
}

#[derive(Debug, Clone)]
pub struct PerformanceSeries {
    pub athlete: Arc<Athlete>,
    pub sport: Sport,
    pub category: String,

    /// One point per lap: (cumulative time, cumulative distance)
    pub points: Vec<SeriesPoint>,
}

/// Cumulative distance over time for every performance, in stored order
pub fn event_series(event: &Event) -> Vec<PerformanceSeries> {
    event
        .performances()
        .iter()
        .map(|perf| {
            let mut elapsed = 0u64;
            let points = perf
                .laps
                .iter()
                .enumerate()
                .map(|(i, lap)| {
                    elapsed += lap.lap_time_seconds as u64;
                    SeriesPoint {
                        elapsed_seconds: elapsed,
                        miles: perf.total_miles_at_lap(i as u32 + 1),
                    }
                })
                .collect();

            PerformanceSeries {
                athlete: Arc::clone(&perf.athlete),
                sport: perf.sport,
                category: perf.category.clone(),
                points,
            }
        })
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================
