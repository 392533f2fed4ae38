// End-to-end: snapshot files on disk → loader → dataset → queries

use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use ultraskate_stats::query;
use ultraskate_stats::{career_aggregate, load_dir, write_snapshot, DatasetHandle, Sport};

fn laps(count: usize, time: &str) -> Vec<Value> {
    (1..=count)
        .map(|n| json!({ "number": n, "time": time }))
        .collect()
}

fn event_json(name: &str, date: &str, athlete: &str, lap_count: usize, category: &str) -> Value {
    json!({
        "name": name,
        "date": date,
        "track": { "name": "Test Oval", "city": name, "country": "USA", "length_miles": 1.0 },
        "performances": [
            {
                "athlete": { "name": athlete, "gender": "M", "city": "Miami", "state": "FL", "country": "USA" },
                "category": category,
                "age_group": "Open",
                "laps": laps(lap_count, "00:06:00")
            }
        ]
    })
}

fn write(dir: &Path, file: &str, value: &Value) {
    fs::write(dir.join(file), serde_json::to_string_pretty(value).unwrap()).unwrap();
}

#[test]
fn test_career_joins_alias_spellings_across_events() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "miami_2023.json", &event_json("Miami", "2023-02-17", "Joe Mazzone", 10, "24 Hour"));
    write(dir.path(), "miami_2024.json", &event_json("Miami", "2024-02-16", "Joseph Mazzone", 15, "24 Hour"));

    let dataset = load_dir(dir.path());
    assert!(dataset.is_loaded());
    assert_eq!(dataset.athletes.len(), 1);

    let roster = career_aggregate(&dataset);
    let career = &roster[0];
    assert_eq!(career.athlete.canonical_name, "joseph mazzone");
    assert_eq!(career.event_count, 2);
    assert_eq!(career.total_miles, 25.0);
    assert_eq!(career.best_event_miles, 15.0);
    assert_eq!(career.sports, vec![Sport::Skateboard]);

    // Both events point at the very same athlete instance
    let events = dataset.events.events();
    assert!(Arc::ptr_eq(
        &events[0].performances()[0].athlete,
        &events[1].performances()[0].athlete
    ));
}

#[test]
fn test_bad_files_are_skipped_not_fatal() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "good.json", &event_json("Dutch", "2024-05-09", "Jane Doe", 3, "Inline"));
    fs::write(dir.path().join("broken.json"), "{ \"name\": ").unwrap();
    fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

    let dataset = load_dir(dir.path());
    assert_eq!(dataset.events.len(), 1);
    assert_eq!(dataset.skipped.len(), 1);
    assert!(dataset.skipped[0].path.ends_with("broken.json"));
}

#[test]
fn test_missing_directory_gives_empty_dataset() {
    let dir = TempDir::new().unwrap();
    let dataset = load_dir(&dir.path().join("does-not-exist"));
    assert!(!dataset.is_loaded());
    assert!(query::list_events(&dataset).is_empty());
    assert!(query::athlete_roster(&dataset).is_empty());
}

#[test]
fn test_events_iterate_in_date_order() {
    let dir = TempDir::new().unwrap();
    // File names sort opposite to dates
    write(dir.path(), "a.json", &event_json("Late", "2024-01-01", "A", 1, ""));
    write(dir.path(), "b.json", &event_json("Early", "2016-01-01", "B", 1, ""));
    write(dir.path(), "c.json", &event_json("Middle", "2020-01-01", "C", 1, ""));

    let dataset = load_dir(dir.path());
    let names: Vec<&str> = dataset.events.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["Early", "Middle", "Late"]);
}

#[test]
fn test_reload_swaps_whole_dataset() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "one.json", &event_json("Miami", "2024-02-16", "Jane Doe", 5, ""));

    let handle = DatasetHandle::empty();
    let first = handle.reload_from(dir.path());
    assert_eq!(first.events.len(), 1);

    write(dir.path(), "two.json", &event_json("Dutch", "2024-05-09", "Jane Doe", 7, ""));
    let held = handle.current();
    let second = handle.reload_from(dir.path());

    // An earlier reader keeps its complete, unchanged view
    assert_eq!(held.events.len(), 1);
    assert_eq!(second.events.len(), 2);
    assert_eq!(handle.current().snapshot_id, second.snapshot_id);

    let detail = query::athlete_detail(&handle.current(), "jane doe").unwrap();
    assert_eq!(detail.career.event_count, 2);
    assert_eq!(detail.events[0].event, "Miami");
    assert_eq!(detail.events[1].event, "Dutch");
}

#[test]
fn test_written_snapshot_loads_back() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "miami.json", &event_json("Miami", "2024-02-16", "Tori Kennedy", 4, "Paddle Push Relay"));
    let dataset = load_dir(dir.path());

    let out = TempDir::new().unwrap();
    write_snapshot(&dataset.events.events()[0], &out.path().join("miami.json")).unwrap();
    let reloaded = load_dir(out.path());

    let perf = &reloaded.events.events()[0].performances()[0];
    assert_eq!(perf.sport, Sport::PaddlePush);
    assert_eq!(perf.total_time_seconds, 4 * 360);
    assert!(reloaded.athletes.lookup_by_name("Victoria Kennedy").is_some());
}

#[test]
fn test_event_queries_through_public_api() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "miami.json", &event_json("Miami", "2024-02-16", "Jane Doe", 6, "Quad"));
    let dataset = load_dir(dir.path());

    let detail = query::event_detail(&dataset, "miami", 2024).unwrap();
    assert_eq!(detail.performances[0].total_miles, 6.0);
    assert_eq!(detail.performances[0].average_speed_mph, 10.0);
    assert_eq!(detail.performances[0].total_time, "00:36:00");

    let graph = query::event_graph(&dataset, "Miami", 2024).unwrap();
    assert_eq!(graph.performances[0].points.len(), 6);

    assert!(query::event_detail(&dataset, "miami", 2023).unwrap_err().is_not_found());
}
