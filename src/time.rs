// ⏱️ Time & Unit Utilities
// HH:MM:SS parsing/formatting and miles ↔ km conversion

use crate::error::{StatsError, StatsResult};
use regex::Regex;
use std::sync::OnceLock;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Kilometres in one mile
pub const KM_PER_MILE: f64 = 1.60934;

/// Seconds in one hour
pub const SECONDS_PER_HOUR: f64 = 3600.0;

fn hhmmss_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{2}:\d{2}:\d{2}$").expect("static regex"))
}

fn embedded_time_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d{2}:\d{2}:\d{2})").expect("static regex"))
}

// ============================================================================
// DURATIONS
// ============================================================================

/// Check whether a string is exactly `HH:MM:SS` (two digits each, no range check)
pub fn is_hhmmss_format(text: &str) -> bool {
    hhmmss_regex().is_match(text)
}

/// Parse `HH:MM:SS` into seconds
///
/// Width is enforced, ranges are not: "99:59:59" and "00:75:00" both parse.
pub fn parse_hhmmss(text: &str) -> StatsResult<u32> {
    if !is_hhmmss_format(text) {
        return Err(StatsError::ParseFailure(text.to_string()));
    }

    let mut parts = text.split(':').map(|p| p.parse::<u32>());
    match (parts.next(), parts.next(), parts.next()) {
        (Some(Ok(h)), Some(Ok(m)), Some(Ok(s))) => Ok(h * 3600 + m * 60 + s),
        _ => Err(StatsError::ParseFailure(text.to_string())),
    }
}

/// Format seconds as `HH:MM:SS` (hours are not wrapped at 24)
pub fn seconds_to_hhmmss(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

/// Pull the first `HH:MM:SS` out of a noisy cell
///
/// Example: "00:08:26 (00:08:26)" → "00:08:26"
pub fn extract_time(text: &str) -> Option<&str> {
    embedded_time_regex()
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

// ============================================================================
// UNITS
// ============================================================================

pub fn miles_to_km(miles: f64) -> f64 {
    miles * KM_PER_MILE
}

/// Round to 2 decimals. Only used at the query boundary.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// ============================================================================
// TESTS
// ============================================================================
