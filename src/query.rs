// 🔎 Query Surface - serializable views handed to the serving layer
//
// Floats are rounded to 2 decimals here and only here.

use crate::entities::{Athlete, Event, Performance, Track};
use crate::error::{StatsError, StatsResult};
use crate::rules::Sport;
use crate::snapshot::{Dataset, SkippedFile};
use crate::stats::{
    athlete_breakdown, career_aggregate, event_series, CareerStats, EventResult, EventStats,
    PerformanceSeries,
};
use crate::time::{round2, seconds_to_hhmmss};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use std::path::PathBuf;

// ============================================================================
// RESPONSE TYPES
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct TrackView {
    pub name: String,
    pub city: String,
    pub country: String,
    pub length_miles: f64,
}

impl From<&Track> for TrackView {
    fn from(track: &Track) -> Self {
        TrackView {
            name: track.name.clone(),
            city: track.city.clone(),
            country: track.country.clone(),
            length_miles: round2(track.length_miles),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AthleteView {
    pub name: String,
    pub gender: String,
    pub city: String,
    pub state: String,
    pub country: String,
}

impl From<&Athlete> for AthleteView {
    fn from(athlete: &Athlete) -> Self {
        AthleteView {
            name: athlete.name.clone(),
            gender: athlete.gender.clone(),
            city: athlete.city.clone(),
            state: athlete.state.clone(),
            country: athlete.country.clone(),
        }
    }
}

/// Event metadata, no performances
#[derive(Debug, Clone, Serialize)]
pub struct EventSummary {
    pub name: String,
    pub date: NaiveDate,
    pub year: i32,
    pub track: TrackView,
    pub performance_count: usize,
}

impl From<&Event> for EventSummary {
    fn from(event: &Event) -> Self {
        EventSummary {
            name: event.name.clone(),
            date: event.date,
            year: event.year(),
            track: TrackView::from(event.track.as_ref()),
            performance_count: event.performances().len(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PerformanceRow {
    pub position: usize,
    pub athlete: AthleteView,
    pub category: String,
    pub age_group: String,
    pub sport: Sport,
    pub total_miles: f64,
    pub total_km: f64,
    pub total_laps: u32,
    pub total_time: String,
    pub average_speed_mph: f64,
    pub average_speed_kph: f64,
}

impl PerformanceRow {
    fn new(position: usize, perf: &Performance) -> Self {
        PerformanceRow {
            position,
            athlete: AthleteView::from(perf.athlete.as_ref()),
            category: perf.category.clone(),
            age_group: perf.age_group.clone(),
            sport: perf.sport,
            total_miles: round2(perf.total_miles()),
            total_km: round2(perf.total_km()),
            total_laps: perf.total_laps(),
            total_time: perf.total_time_hhmmss(),
            average_speed_mph: round2(perf.average_speed_mph()),
            average_speed_kph: round2(perf.average_speed_kph()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EventDetail {
    #[serde(flatten)]
    pub summary: EventSummary,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sport: Option<String>,

    /// Ranked by distance
    pub performances: Vec<PerformanceRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GraphPoint {
    pub elapsed_seconds: u64,
    pub elapsed: String,
    pub miles: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct GraphSeries {
    pub athlete: String,
    pub sport: Sport,
    pub category: String,
    pub points: Vec<GraphPoint>,
}

impl From<PerformanceSeries> for GraphSeries {
    fn from(series: PerformanceSeries) -> Self {
        GraphSeries {
            athlete: series.athlete.name.clone(),
            sport: series.sport,
            category: series.category,
            points: series
                .points
                .into_iter()
                .map(|p| GraphPoint {
                    elapsed_seconds: p.elapsed_seconds,
                    elapsed: seconds_to_hhmmss(p.elapsed_seconds),
                    miles: round2(p.miles),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EventGraph {
    pub name: String,
    pub year: i32,
    pub performances: Vec<GraphSeries>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AthleteCareer {
    #[serde(flatten)]
    pub athlete: AthleteView,
    pub team: bool,
    pub event_count: usize,
    pub total_miles: f64,
    pub best_event_miles: f64,
    pub sports: Vec<Sport>,
}

impl From<CareerStats> for AthleteCareer {
    fn from(stats: CareerStats) -> Self {
        AthleteCareer {
            athlete: AthleteView::from(stats.athlete.as_ref()),
            team: stats.team,
            event_count: stats.event_count,
            total_miles: round2(stats.total_miles),
            best_event_miles: round2(stats.best_event_miles),
            sports: stats.sports,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AthleteEventRow {
    pub event: String,
    pub date: NaiveDate,
    pub year: i32,
    pub track: String,
    pub category: String,
    pub age_group: String,
    pub sport: Sport,
    pub total_laps: u32,
    pub total_miles: f64,
    pub total_km: f64,
    pub total_time: String,
    pub average_speed_mph: f64,
    pub average_speed_kph: f64,
    pub position: usize,
    pub field_size: usize,
}

impl From<EventResult> for AthleteEventRow {
    fn from(result: EventResult) -> Self {
        use chrono::Datelike;
        AthleteEventRow {
            year: result.date.year(),
            event: result.event_name,
            date: result.date,
            track: result.track_name,
            category: result.category,
            age_group: result.age_group,
            sport: result.sport,
            total_laps: result.total_laps,
            total_miles: round2(result.total_miles),
            total_km: round2(result.total_km),
            total_time: seconds_to_hhmmss(result.total_time_seconds),
            average_speed_mph: round2(result.average_speed_mph),
            average_speed_kph: round2(result.average_speed_kph),
            position: result.position,
            field_size: result.field_size,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AthleteDetail {
    #[serde(flatten)]
    pub career: AthleteCareer,
    pub events: Vec<AthleteEventRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DatasetInfo {
    pub snapshot_id: String,
    pub loaded_at: DateTime<Utc>,
    pub source_dir: Option<PathBuf>,
    pub event_count: usize,
    pub athlete_count: usize,
    pub skipped: Vec<SkippedFile>,
}

// ============================================================================
// QUERIES
// ============================================================================

fn event_not_found(name: &str, year: i32) -> StatsError {
    StatsError::NotFound(format!("Event not found for '{}', year {}", name, year))
}

fn find_event<'a>(dataset: &'a Dataset, name: &str, year: i32) -> StatsResult<&'a Event> {
    dataset
        .events
        .get_by_name_year(name, year)
        .ok_or_else(|| event_not_found(name, year))
}

fn ranked_rows(performances: &[&Performance]) -> Vec<PerformanceRow> {
    performances
        .iter()
        .enumerate()
        .map(|(i, perf)| PerformanceRow::new(i + 1, perf))
        .collect()
}

fn detail(event: &Event, sport: Option<&str>, top: Option<usize>) -> EventDetail {
    let stats = EventStats::new(event);
    let mut selected = match sport {
        Some(sport) => stats.by_sport(sport),
        None => stats.all().to_vec(),
    };
    if let Some(n) = top {
        selected = EventStats::top_of(n, &selected);
    }

    EventDetail {
        summary: EventSummary::from(event),
        sport: sport.map(str::to_string),
        performances: ranked_rows(&selected),
    }
}

pub fn list_events(dataset: &Dataset) -> Vec<EventSummary> {
    dataset.events.iter().map(EventSummary::from).collect()
}

pub fn event_detail(dataset: &Dataset, name: &str, year: i32) -> StatsResult<EventDetail> {
    find_event(dataset, name, year).map(|event| detail(event, None, None))
}

pub fn events_by_name(dataset: &Dataset, name: &str) -> StatsResult<Vec<EventSummary>> {
    let events = dataset.events.get_by_name(name);
    if events.is_empty() {
        return Err(StatsError::NotFound(format!("No events found for '{}'", name)));
    }
    Ok(events.into_iter().map(EventSummary::from).collect())
}

pub fn event_by_year(dataset: &Dataset, year: i32) -> StatsResult<EventDetail> {
    dataset
        .events
        .get_by_year(year)
        .map(|event| detail(event, None, None))
        .ok_or_else(|| StatsError::NotFound(format!("Event for year {} not found", year)))
}

/// Ranked rows with an optional sport filter, then an optional top-n cut
pub fn event_performances(
    dataset: &Dataset,
    name: &str,
    year: i32,
    sport: Option<&str>,
    top: Option<usize>,
) -> StatsResult<EventDetail> {
    find_event(dataset, name, year).map(|event| detail(event, sport, top))
}

pub fn event_graph(dataset: &Dataset, name: &str, year: i32) -> StatsResult<EventGraph> {
    let event = find_event(dataset, name, year)?;
    Ok(EventGraph {
        name: event.name.clone(),
        year: event.year(),
        performances: event_series(event).into_iter().map(GraphSeries::from).collect(),
    })
}

pub fn athlete_roster(dataset: &Dataset) -> Vec<AthleteCareer> {
    career_aggregate(dataset)
        .into_iter()
        .map(AthleteCareer::from)
        .collect()
}

pub fn athlete_detail(dataset: &Dataset, name: &str) -> StatsResult<AthleteDetail> {
    let breakdown = athlete_breakdown(dataset, name)?;
    Ok(AthleteDetail {
        career: AthleteCareer::from(breakdown.career),
        events: breakdown
            .results
            .into_iter()
            .map(AthleteEventRow::from)
            .collect(),
    })
}

pub fn dataset_info(dataset: &Dataset) -> DatasetInfo {
    DatasetInfo {
        snapshot_id: dataset.snapshot_id.clone(),
        loaded_at: dataset.loaded_at,
        source_dir: dataset.source_dir.clone(),
        event_count: dataset.events.len(),
        athlete_count: dataset.athletes.len(),
        skipped: dataset.skipped.clone(),
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::LapRecord;
    use crate::snapshot::DatasetBuilder;
    use std::sync::Arc;

    fn dataset() -> Dataset {
        let mut builder = DatasetBuilder::new();
        let track = Arc::new(Track::new("Homestead", "Miami", "USA", 1.46));
        let mut event = Event::new("Miami", NaiveDate::from_ymd_opt(2024, 2, 16).unwrap(), track);

        for (name, category, laps) in [("Jane", "Skateboard", 3u32), ("Bob", "Paddle", 7), ("Ann", "Quad", 5)] {
            let athlete = builder.resolve_athlete(Athlete::named(name).unwrap());
            let laps = (1..=laps).map(|n| LapRecord::new(n, 333)).collect();
            event.record_performance(athlete, laps, category, "Open");
        }
        builder.add_event(event);
        builder.finish(None)
    }

    #[test]
    fn test_list_events_metadata() {
        let events = list_events(&dataset());
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].year, 2024);
        assert_eq!(events[0].performance_count, 3);
    }

    #[test]
    fn test_event_detail_ranked_and_rounded() {
        let detail = event_detail(&dataset(), "MIAMI", 2024).unwrap();
        let first = &detail.performances[0];
        assert_eq!(first.position, 1);
        assert_eq!(first.athlete.name, "Bob");
        assert_eq!(first.total_miles, 10.22);
        assert_eq!(first.total_time, "00:38:51");
        // 10.22 mi in 2331 s = 15.7838... mph
        assert_eq!(first.average_speed_mph, 15.78);
    }

    #[test]
    fn test_event_performances_filter_and_top() {
        let data = dataset();
        let filtered = event_performances(&data, "miami", 2024, Some("quad"), None).unwrap();
        assert_eq!(filtered.performances.len(), 1);
        assert_eq!(filtered.performances[0].athlete.name, "Ann");

        let top = event_performances(&data, "miami", 2024, None, Some(2)).unwrap();
        let names: Vec<&str> = top.performances.iter().map(|r| r.athlete.name.as_str()).collect();
        assert_eq!(names, vec!["Bob", "Ann"]);
    }

    #[test]
    fn test_unknown_event_is_not_found() {
        let data = dataset();
        assert!(event_detail(&data, "Dutch", 2024).unwrap_err().is_not_found());
        assert!(event_graph(&data, "Miami", 1999).unwrap_err().is_not_found());
        assert!(events_by_name(&data, "Dutch").unwrap_err().is_not_found());
        assert!(event_by_year(&data, 2001).unwrap_err().is_not_found());
        assert!(athlete_detail(&data, "Nobody").unwrap_err().is_not_found());
    }

    #[test]
    fn test_event_graph() {
        let graph = event_graph(&dataset(), "miami", 2024).unwrap();
        assert_eq!(graph.performances.len(), 3);
        let jane = &graph.performances[0];
        assert_eq!(jane.athlete, "Jane");
        assert_eq!(jane.points.len(), 3);
        assert_eq!(jane.points[2].miles, 4.38);
        assert_eq!(jane.points[2].elapsed, "00:16:39");
    }

    #[test]
    fn test_roster_and_detail() {
        let data = dataset();
        let roster = athlete_roster(&data);
        assert_eq!(roster[0].athlete.name, "Bob");
        assert_eq!(roster[0].event_count, 1);

        let detail = athlete_detail(&data, "ann").unwrap();
        assert_eq!(detail.events.len(), 1);
        assert_eq!(detail.events[0].position, 2);
        assert_eq!(detail.events[0].sport, Sport::QuadSkating);
    }

    #[test]
    fn test_serialized_shape() {
        let value = serde_json::to_value(athlete_roster(&dataset())).unwrap();
        let first = &value[0];
        assert_eq!(first["name"], "Bob");
        assert_eq!(first["sports"][0], "Paddle");
        assert_eq!(first["team"], false);
    }

    #[test]
    fn test_dataset_info() {
        let info = dataset_info(&dataset());
        assert_eq!(info.event_count, 1);
        assert_eq!(info.athlete_count, 3);
        assert!(info.skipped.is_empty());
    }
}
