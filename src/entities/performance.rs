// 🏃 Performance - one athlete's laps in one event
//
// Built once: total time, team signal and sport are fixed at construction.
// Distance and speed are pure functions of laps + track and are recomputed
// on demand.

use crate::entities::{Athlete, Track};
use crate::rules::{standard_classifier, Sport};
use crate::time::{seconds_to_hhmmss, KM_PER_MILE, SECONDS_PER_HOUR};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

// ============================================================================
// LAP RECORD
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LapRecord {
    /// 1-indexed
    pub lap_number: u32,
    pub lap_time_seconds: u32,
}

impl LapRecord {
    pub fn new(lap_number: u32, lap_time_seconds: u32) -> Self {
        LapRecord {
            lap_number,
            lap_time_seconds,
        }
    }

    pub fn lap_time_hhmmss(&self) -> String {
        seconds_to_hhmmss(self.lap_time_seconds as u64)
    }
}

impl fmt::Display for LapRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Lap {} -> {}", self.lap_number, self.lap_time_hhmmss())
    }
}

// ============================================================================
// SPEED UNIT
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeedUnit {
    Mph,
    Kph,
}

impl SpeedUnit {
    fn convert_mph(&self, mph: f64) -> f64 {
        match self {
            SpeedUnit::Mph => mph,
            SpeedUnit::Kph => mph * KM_PER_MILE,
        }
    }
}

/// Average speed over a distance; 0.0 when no time elapsed
fn average_speed(miles: f64, seconds: u64, unit: SpeedUnit) -> f64 {
    if seconds == 0 {
        return 0.0;
    }
    let hours = seconds as f64 / SECONDS_PER_HOUR;
    unit.convert_mph(miles / hours)
}

// ============================================================================
// PERFORMANCE
// ============================================================================

#[derive(Debug, Clone)]
pub struct Performance {
    pub athlete: Arc<Athlete>,
    pub laps: Vec<LapRecord>,
    pub category: String,
    pub age_group: String,
    pub sport: Sport,
    pub total_time_seconds: u64,

    /// "team" seen in category or athlete name
    pub team_signal: bool,

    track: Arc<Track>,
}

impl Performance {
    /// Only [`crate::entities::Event::record_performance`] builds these, so the
    /// track always belongs to the owning event.
    pub(crate) fn new(
        athlete: Arc<Athlete>,
        laps: Vec<LapRecord>,
        track: Arc<Track>,
        category: &str,
        age_group: &str,
    ) -> Self {
        // 1. Total time
        let total_time_seconds: u64 = laps.iter().map(|lap| lap.lap_time_seconds as u64).sum();

        // 2. Team signal (raw category, before any rewrite)
        let team_signal =
            category.to_lowercase().contains("team") || athlete.name_signals_team();

        // 3. Sport classification
        let classified = standard_classifier().classify(category, age_group);

        Performance {
            athlete,
            laps,
            category: classified.category,
            age_group: classified.age_group,
            sport: classified.sport,
            total_time_seconds,
            team_signal,
            track,
        }
    }

    pub fn track(&self) -> &Track {
        &self.track
    }

    pub fn total_laps(&self) -> u32 {
        self.laps.len() as u32
    }

    pub fn total_time_hhmmss(&self) -> String {
        seconds_to_hhmmss(self.total_time_seconds)
    }

    pub fn total_miles(&self) -> f64 {
        self.track.length_miles * self.total_laps() as f64
    }

    pub fn total_km(&self) -> f64 {
        self.total_miles() * KM_PER_MILE
    }

    fn in_bounds(&self, lap_number: u32) -> bool {
        lap_number >= 1 && lap_number <= self.total_laps()
    }

    /// Distance through `lap_number` (1-indexed); 0.0 outside [1, total_laps]
    pub fn total_miles_at_lap(&self, lap_number: u32) -> f64 {
        if !self.in_bounds(lap_number) {
            return 0.0;
        }
        self.track.length_miles * lap_number as f64
    }

    pub fn total_km_at_lap(&self, lap_number: u32) -> f64 {
        self.total_miles_at_lap(lap_number) * KM_PER_MILE
    }

    /// Cumulative time through `lap_number`; 0 outside [1, total_laps]
    pub fn elapsed_seconds_at_lap(&self, lap_number: u32) -> u64 {
        if !self.in_bounds(lap_number) {
            return 0;
        }
        self.laps[..lap_number as usize]
            .iter()
            .map(|lap| lap.lap_time_seconds as u64)
            .sum()
    }

    pub fn average_lap_time_seconds(&self) -> f64 {
        if self.laps.is_empty() {
            return 0.0;
        }
        self.total_time_seconds as f64 / self.laps.len() as f64
    }

    pub fn average_speed(&self, unit: SpeedUnit) -> f64 {
        average_speed(self.total_miles(), self.total_time_seconds, unit)
    }

    pub fn average_speed_mph(&self) -> f64 {
        self.average_speed(SpeedUnit::Mph)
    }

    pub fn average_speed_kph(&self) -> f64 {
        self.average_speed(SpeedUnit::Kph)
    }

    /// Cumulative average speed through `lap_number`
    pub fn average_speed_at_lap(&self, lap_number: u32, unit: SpeedUnit) -> f64 {
        if !self.in_bounds(lap_number) {
            return 0.0;
        }
        average_speed(
            self.total_miles_at_lap(lap_number),
            self.elapsed_seconds_at_lap(lap_number),
            unit,
        )
    }

    /// Speed over lap `lap_number` alone
    pub fn average_speed_for_lap(&self, lap_number: u32, unit: SpeedUnit) -> f64 {
        if !self.in_bounds(lap_number) {
            return 0.0;
        }
        let lap = &self.laps[lap_number as usize - 1];
        average_speed(self.track.length_miles, lap.lap_time_seconds as u64, unit)
    }
}

impl fmt::Display for Performance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {:.2} miles - {} laps - {:.2} kph - {} - {} - {}",
            self.athlete.name,
            self.total_miles(),
            self.total_laps(),
            self.average_speed_kph(),
            self.sport,
            self.category,
            self.age_group
        )
    }
}

// ============================================================================
// TESTS
// ============================================================================
