// 📅 Event - one race on one date at one track

use crate::entities::{Athlete, LapRecord, Performance, Track};
use chrono::{Datelike, NaiveDate};
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct Event {
    pub name: String,
    pub date: NaiveDate,
    pub track: Arc<Track>,

    /// Insertion order
    performances: Vec<Performance>,
}

impl Event {
    pub fn new(name: &str, date: NaiveDate, track: Arc<Track>) -> Self {
        Event {
            name: name.to_string(),
            date,
            track,
            performances: Vec::new(),
        }
    }

    /// Build a performance on this event's track and append it
    pub fn record_performance(
        &mut self,
        athlete: Arc<Athlete>,
        laps: Vec<LapRecord>,
        category: &str,
        age_group: &str,
    ) -> &Performance {
        let performance = Performance::new(athlete, laps, Arc::clone(&self.track), category, age_group);
        self.performances.push(performance);
        &self.performances[self.performances.len() - 1]
    }

    pub fn performances(&self) -> &[Performance] {
        &self.performances
    }

    pub fn year(&self) -> i32 {
        self.date.year()
    }

    /// Case-insensitive name + exact year
    pub fn matches(&self, name: &str, year: i32) -> bool {
        self.year() == year && self.name.to_lowercase() == name.to_lowercase()
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "-----")?;
        writeln!(
            f,
            "{} on {} at {}, {}, {}",
            self.name, self.date, self.track.name, self.track.city, self.track.country
        )?;

        if self.performances.is_empty() {
            writeln!(f, "No performances recorded for this event.")?;
        }
        for (medal, performance) in ["🥇", "🥈", "🥉"].iter().zip(&self.performances) {
            writeln!(f, "{} {}", medal, performance)?;
        }
        write!(f, "-----")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event() -> Event {
        let track = Arc::new(Track::new("Homestead", "Miami", "USA", 1.46));
        Event::new("Miami", NaiveDate::from_ymd_opt(2024, 2, 16).unwrap(), track)
    }

    #[test]
    fn test_record_performance_uses_event_track() {
        let mut event = event();
        let athlete = Arc::new(Athlete::named("Jane Doe").unwrap());
        event.record_performance(athlete, vec![LapRecord::new(1, 600)], "Skateboard", "");
        assert!(std::ptr::eq(event.performances()[0].track(), event.track.as_ref()));
        assert_eq!(event.performances().len(), 1);
    }

    #[test]
    fn test_matches_is_case_insensitive() {
        let event = event();
        assert_eq!(event.year(), 2024);
        assert!(event.matches("miami", 2024));
        assert!(event.matches("MIAMI", 2024));
        assert!(!event.matches("miami", 2023));
        assert!(!event.matches("dutch", 2024));
    }

    #[test]
    fn test_display_empty_event() {
        let text = event().to_string();
        assert!(text.contains("No performances recorded"));
    }
}
