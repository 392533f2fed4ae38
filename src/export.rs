// 📤 CSV Export - one ranked row per performance

use crate::entities::Event;
use crate::registry::AthleteRegistry;
use crate::stats::EventStats;
use crate::time::round2;
use anyhow::{Context, Result};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::warn;

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    #[serde(rename = "Position")]
    position: usize,
    #[serde(rename = "Name")]
    name: &'a str,
    #[serde(rename = "Sport")]
    sport: &'static str,
    #[serde(rename = "Discipline")]
    discipline: &'a str,
    #[serde(rename = "Age Category")]
    age_group: &'a str,
    #[serde(rename = "Team")]
    team: bool,
    #[serde(rename = "Total Miles")]
    total_miles: f64,
    #[serde(rename = "Total Laps")]
    total_laps: u32,
    #[serde(rename = "Average Speed (kph)")]
    average_speed_kph: f64,
    #[serde(rename = "Total Time (HH:MM:SS)")]
    total_time: String,
}

/// Write an event's ranking as CSV to any writer
pub fn write_event_csv<W: Write>(event: &Event, athletes: &AthleteRegistry, writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    for (i, perf) in EventStats::new(event).all().iter().enumerate() {
        csv_writer
            .serialize(CsvRow {
                position: i + 1,
                name: &perf.athlete.name,
                sport: perf.sport.as_str(),
                discipline: &perf.category,
                age_group: &perf.age_group,
                team: athletes.is_team(&perf.athlete),
                total_miles: round2(perf.total_miles()),
                total_laps: perf.total_laps(),
                average_speed_kph: round2(perf.average_speed_kph()),
                total_time: perf.total_time_hhmmss(),
            })
            .context("Failed to write CSV row")?;
    }

    csv_writer.flush().context("Failed to flush CSV")?;
    Ok(())
}

/// Lowercase `[a-z0-9-]` slug; every other run of characters becomes one `-`
fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.to_lowercase().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            slug.push(c);
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug = slug.trim_end_matches('-');
    if slug.is_empty() {
        "event".to_string()
    } else {
        slug.to_string()
    }
}

/// File name used for an event's export, e.g. `event_stats_miami_2024.csv`
pub fn export_file_name(event: &Event) -> String {
    format!("event_stats_{}_{}.csv", slugify(&event.name), event.year())
}

fn export_event(event: &Event, athletes: &AthleteRegistry, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path).with_context(|| format!("Failed to create {:?}", path))?;
    write_event_csv(event, athletes, file)
}

/// Export one CSV per event into `dir`; returns the written paths.
///
/// An event that fails to write is logged and skipped.
pub fn export_all<'a, I>(events: I, athletes: &AthleteRegistry, dir: &Path) -> Result<Vec<PathBuf>>
where
    I: IntoIterator<Item = &'a Event>,
{
    std::fs::create_dir_all(dir).with_context(|| format!("Failed to create {:?}", dir))?;

    let mut written = Vec::new();
    for event in events {
        let path = dir.join(export_file_name(event));
        match export_event(event, athletes, &path) {
            Ok(()) => written.push(path),
            Err(e) => warn!("Skipping export of {} {}: {:#}", event.name, event.year(), e),
        }
    }
    Ok(written)
}
