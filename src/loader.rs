// 📂 Snapshot Loader - event JSON files → Dataset
//
// One file per event, processed one at a time. Bad laps are dropped, bad
// performances are skipped, bad files are skipped and recorded; loading
// always finishes with whatever could be read.

use crate::entities::{Athlete, Event, LapRecord, Track};
use crate::error::{StatsError, StatsResult};
use crate::snapshot::{Dataset, DatasetBuilder};
use crate::time::{parse_hhmmss, seconds_to_hhmmss};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

// ============================================================================
// SNAPSHOT FILE SHAPE
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventSnapshot {
    /// Older snapshots have no name; the track city is used instead
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// "YYYY-MM-DD" or a full ISO datetime
    pub date: String,

    pub track: TrackSnapshot,

    #[serde(default)]
    pub performances: Vec<PerformanceSnapshot>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackSnapshot {
    pub name: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub country: String,
    pub length_miles: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceSnapshot {
    pub athlete: AthleteSnapshot,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub age_group: String,
    #[serde(default)]
    pub laps: Vec<LapSnapshot>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AthleteSnapshot {
    pub name: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub country: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LapSnapshot {
    pub number: u32,
    pub time: String,
}

impl EventSnapshot {
    /// Serialize a loaded event back into the snapshot shape
    pub fn from_event(event: &Event) -> Self {
        EventSnapshot {
            name: Some(event.name.clone()),
            date: event.date.format("%Y-%m-%d").to_string(),
            track: TrackSnapshot {
                name: event.track.name.clone(),
                city: event.track.city.clone(),
                country: event.track.country.clone(),
                length_miles: event.track.length_miles,
            },
            performances: event
                .performances()
                .iter()
                .map(|perf| PerformanceSnapshot {
                    athlete: AthleteSnapshot {
                        name: perf.athlete.name.clone(),
                        gender: perf.athlete.gender.clone(),
                        city: perf.athlete.city.clone(),
                        state: perf.athlete.state.clone(),
                        country: perf.athlete.country.clone(),
                    },
                    category: perf.category.clone(),
                    age_group: perf.age_group.clone(),
                    laps: perf
                        .laps
                        .iter()
                        .map(|lap| LapSnapshot {
                            number: lap.lap_number,
                            time: seconds_to_hhmmss(lap.lap_time_seconds as u64),
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}

// ============================================================================
// PARSING
// ============================================================================

fn load_failure(path: &Path, reason: impl Into<String>) -> StatsError {
    StatsError::LoadFailure {
        path: path.to_path_buf(),
        reason: reason.into(),
    }
}

/// Date part of "YYYY-MM-DD[THH:MM:SS...]"
pub fn parse_event_date(text: &str) -> Option<NaiveDate> {
    let date_part = text.get(..10).unwrap_or(text);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

/// Convert lap entries, dropping the ones whose time does not parse
pub fn parse_laps(laps: &[LapSnapshot]) -> Vec<LapRecord> {
    laps.iter()
        .filter_map(|lap| match parse_hhmmss(&lap.time) {
            Ok(seconds) => Some(LapRecord::new(lap.number, seconds)),
            Err(e) => {
                debug!("Dropping lap {}: {}", lap.number, e);
                None
            }
        })
        .collect()
}

/// Build an Event from a parsed snapshot, resolving athletes into `builder`
pub fn build_event(
    snapshot: EventSnapshot,
    builder: &mut DatasetBuilder,
    origin: &Path,
) -> StatsResult<Event> {
    // Validate everything file-level before touching the athlete roster
    let date = parse_event_date(&snapshot.date)
        .ok_or_else(|| load_failure(origin, format!("invalid date '{}'", snapshot.date)))?;

    let length_miles = snapshot.track.length_miles;
    if !(length_miles.is_finite() && length_miles > 0.0) {
        return Err(load_failure(
            origin,
            format!("track length must be > 0, got {}", length_miles),
        ));
    }

    let track = builder.intern_track(Track::new(
        &snapshot.track.name,
        &snapshot.track.city,
        &snapshot.track.country,
        length_miles,
    ));

    let name = snapshot
        .name
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| track.city.clone());

    let mut event = Event::new(&name, date, track);
    let mut seen_in_event: HashSet<String> = HashSet::new();

    for perf in snapshot.performances {
        let athlete = match resolve_performer(&perf, &mut seen_in_event, builder) {
            Ok(athlete) => athlete,
            Err(e) => {
                warn!("Skipping performance in {:?}: {}", origin, e);
                continue;
            }
        };

        let laps = parse_laps(&perf.laps);
        event.record_performance(athlete, laps, &perf.category, &perf.age_group);
    }

    Ok(event)
}

/// Resolve the athlete of one performance.
///
/// Two different people with the same name in the same event would collapse
/// into one identity; the second one gets the category appended to the name.
fn resolve_performer(
    perf: &PerformanceSnapshot,
    seen_in_event: &mut HashSet<String>,
    builder: &mut DatasetBuilder,
) -> StatsResult<Arc<Athlete>> {
    let raw = &perf.athlete;
    let mut athlete = Athlete::new(&raw.name, &raw.gender, &raw.city, &raw.state, &raw.country)?;

    if seen_in_event.contains(&athlete.canonical_name) && !perf.category.trim().is_empty() {
        let mangled = format!("{} ({})", raw.name.trim(), perf.category.trim());
        debug!("Same name twice in one event, registering '{}'", mangled);
        athlete = Athlete::new(&mangled, &raw.gender, &raw.city, &raw.state, &raw.country)?;
    }

    seen_in_event.insert(athlete.canonical_name.clone());
    Ok(builder.resolve_athlete(athlete))
}

/// Parse one snapshot document and register its event
pub fn load_snapshot_str(builder: &mut DatasetBuilder, json: &str, origin: &Path) -> StatsResult<()> {
    let snapshot: EventSnapshot =
        serde_json::from_str(json).map_err(|e| load_failure(origin, e.to_string()))?;

    let event = build_event(snapshot, builder, origin)?;
    info!(
        "✓ Loaded: {} {} ({} performances)",
        event.name,
        event.year(),
        event.performances().len()
    );
    builder.add_event(event);
    Ok(())
}

pub fn load_file(builder: &mut DatasetBuilder, path: &Path) -> StatsResult<()> {
    let content = fs::read_to_string(path).map_err(|e| load_failure(path, e.to_string()))?;
    load_snapshot_str(builder, &content, path)
}

// ============================================================================
// DIRECTORY LOADING
// ============================================================================

/// All `.json` files in `dir`, sorted by path. Missing directory → empty.
pub fn json_files_in(dir: &Path) -> Vec<PathBuf> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Cannot read snapshot directory {:?}: {}", dir, e);
            return Vec::new();
        }
    };

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && path.extension().map_or(false, |ext| ext == "json"))
        .collect();
    files.sort();
    files
}

/// Load every snapshot in `dir`. Never fails; skipped files are recorded.
pub fn load_dir(dir: &Path) -> Dataset {
    let files = json_files_in(dir);
    if files.is_empty() {
        warn!("⚠️  No event files found in {:?}", dir);
    }

    let mut builder = DatasetBuilder::new();
    for file in &files {
        if let Err(e) = load_file(&mut builder, file) {
            warn!("✗ {}", e);
            builder.skip(file, e.to_string());
        }
    }

    let dataset = builder.finish(Some(dir.to_path_buf()));
    if dataset.is_loaded() {
        info!(
            "{} event(s), {} athlete(s) loaded from {:?}",
            dataset.events.len(),
            dataset.athletes.len(),
            dir
        );
    } else {
        warn!("No events loaded - serving empty data");
    }
    dataset
}

/// Write an event back out in snapshot form
pub fn write_snapshot(event: &Event, path: &Path) -> Result<()> {
    let snapshot = EventSnapshot::from_event(event);
    let json = serde_json::to_string_pretty(&snapshot).context("Failed to serialize event")?;
    fs::write(path, json).with_context(|| format!("Failed to write snapshot: {:?}", path))?;
    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::Sport;
    use serde_json::json;

    fn origin() -> PathBuf {
        PathBuf::from("test.json")
    }

    fn load(value: serde_json::Value) -> (DatasetBuilder, StatsResult<()>) {
        let mut builder = DatasetBuilder::new();
        let result = load_snapshot_str(&mut builder, &value.to_string(), &origin());
        (builder, result)
    }

    fn miami() -> serde_json::Value {
        json!({
            "name": "Miami",
            "date": "2024-02-16",
            "track": { "name": "Homestead", "city": "Miami", "country": "USA", "length_miles": 1.46 },
            "performances": [
                {
                    "athlete": { "name": "Joe Mazzone", "gender": "M", "city": "Miami", "state": "FL", "country": "USA" },
                    "category": "24 Hour",
                    "age_group": "40-49",
                    "laps": [
                        { "number": 1, "time": "00:05:00" },
                        { "number": 2, "time": "DNF" },
                        { "number": 3, "time": "00:05:30" }
                    ]
                }
            ]
        })
    }

    #[test]
    fn test_load_snapshot() {
        let (builder, result) = load(miami());
        result.unwrap();
        let dataset = builder.finish(None);

        let event = dataset.events.get_by_name_year("miami", 2024).unwrap();
        let perf = &event.performances()[0];
        assert_eq!(perf.total_laps(), 2);
        assert_eq!(perf.total_time_seconds, 630);
        assert_eq!(perf.category, "Skateboard");
        assert_eq!(perf.sport, Sport::Skateboard);
        assert_eq!(perf.athlete.canonical_name, "joseph mazzone");
    }

    #[test]
    fn test_missing_name_falls_back_to_city() {
        let mut value = miami();
        value.as_object_mut().unwrap().remove("name");
        let (builder, result) = load(value);
        result.unwrap();
        assert_eq!(builder.finish(None).events.events()[0].name, "Miami");
    }

    #[test]
    fn test_events_on_same_track_share_it() {
        let mut builder = DatasetBuilder::new();
        let mut next_year = miami();
        next_year["date"] = json!("2025-02-14");
        load_snapshot_str(&mut builder, &miami().to_string(), &origin()).unwrap();
        load_snapshot_str(&mut builder, &next_year.to_string(), &origin()).unwrap();

        let dataset = builder.finish(None);
        let events = dataset.events.events();
        assert_eq!(events.len(), 2);
        assert!(Arc::ptr_eq(&events[0].track, &events[1].track));
    }

    #[test]
    fn test_iso_datetime_accepted() {
        assert_eq!(
            parse_event_date("2016-02-12T00:00:00"),
            NaiveDate::from_ymd_opt(2016, 2, 12)
        );
        assert!(parse_event_date("12/02/2016").is_none());
    }

    #[test]
    fn test_malformed_json_is_load_failure() {
        let mut builder = DatasetBuilder::new();
        let result = load_snapshot_str(&mut builder, "{ not json", &origin());
        assert!(matches!(result, Err(StatsError::LoadFailure { .. })));
    }

    #[test]
    fn test_bad_track_length_is_load_failure() {
        let mut value = miami();
        value["track"]["length_miles"] = json!(0.0);
        let (builder, result) = load(value);
        assert!(matches!(result, Err(StatsError::LoadFailure { .. })));
        // nothing registered
        assert!(builder.athletes().is_empty());
    }

    #[test]
    fn test_empty_athlete_name_skips_only_that_performance() {
        let mut value = miami();
        value["performances"]
            .as_array_mut()
            .unwrap()
            .push(json!({ "athlete": { "name": "  " }, "category": "Skateboard", "laps": [] }));
        let (builder, result) = load(value);
        result.unwrap();
        let dataset = builder.finish(None);
        assert_eq!(dataset.events.events()[0].performances().len(), 1);
    }

    #[test]
    fn test_same_name_same_event_is_disambiguated() {
        let mut value = miami();
        value["performances"].as_array_mut().unwrap().push(json!({
            "athlete": { "name": "Joseph Mazzone" },
            "category": "Inline",
            "laps": [{ "number": 1, "time": "00:04:00" }]
        }));
        let (builder, result) = load(value);
        result.unwrap();
        let dataset = builder.finish(None);

        let perfs = dataset.events.events()[0].performances();
        assert_eq!(perfs.len(), 2);
        assert!(!Arc::ptr_eq(&perfs[0].athlete, &perfs[1].athlete));
        assert_eq!(perfs[1].athlete.name, "Joseph Mazzone (Inline)");
        assert_eq!(dataset.athletes.len(), 2);
    }

    #[test]
    fn test_snapshot_round_trip_through_loader() {
        let (builder, result) = load(miami());
        result.unwrap();
        let dataset = builder.finish(None);
        let event = &dataset.events.events()[0];

        let written = serde_json::to_string(&EventSnapshot::from_event(event)).unwrap();
        let mut again = DatasetBuilder::new();
        load_snapshot_str(&mut again, &written, &origin()).unwrap();
        let reloaded = again.finish(None);
        let perf = &reloaded.events.events()[0].performances()[0];
        assert_eq!(perf.total_time_seconds, 630);
        assert_eq!(perf.athlete.name, "Joe Mazzone");
    }
}
