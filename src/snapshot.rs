// 📸 Dataset Snapshot - immutable loaded state + atomic swap handle
//
// "Snapshot = consistent view at point in time"
//
// A Dataset is built once by the loader and never mutated afterwards. Readers
// grab an Arc<Dataset> from the handle and keep using it for the whole
// request; a reload builds a fresh Dataset and swaps the pointer in one store.

use crate::entities::{Athlete, Event, Track};
use crate::registry::{AthleteRegistry, EventRegistry};
use arc_swap::ArcSwap;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

// ============================================================================
// DATASET
// ============================================================================

/// A snapshot file that could not be loaded
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

#[derive(Debug)]
pub struct Dataset {
    /// Unique snapshot ID
    pub snapshot_id: String,
    pub loaded_at: DateTime<Utc>,
    pub source_dir: Option<PathBuf>,
    pub events: EventRegistry,
    pub athletes: AthleteRegistry,
    pub skipped: Vec<SkippedFile>,
}

impl Dataset {
    pub fn empty() -> Self {
        DatasetBuilder::new().finish(None)
    }

    /// At least one event made it in
    pub fn is_loaded(&self) -> bool {
        !self.events.is_empty()
    }
}

// ============================================================================
// BUILDER (single writer, load time only)
// ============================================================================

#[derive(Debug, Default)]
pub struct DatasetBuilder {
    events: EventRegistry,
    athletes: AthleteRegistry,
    skipped: Vec<SkippedFile>,

    /// (name, city, country, length bits) -> shared track
    tracks: HashMap<(String, String, String, u64), Arc<Track>>,
}

impl DatasetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resolve_athlete(&mut self, candidate: Athlete) -> Arc<Athlete> {
        self.athletes.register_or_get(candidate)
    }

    /// Events held on the same track share one `Arc<Track>`
    pub fn intern_track(&mut self, track: Track) -> Arc<Track> {
        let key = (
            track.name.clone(),
            track.city.clone(),
            track.country.clone(),
            track.length_miles.to_bits(),
        );
        Arc::clone(self.tracks.entry(key).or_insert_with(|| Arc::new(track)))
    }

    /// Register the event and fold its performances' team signals into the roster
    pub fn add_event(&mut self, event: Event) {
        for performance in event.performances() {
            self.athletes
                .observe_team_signal(&performance.athlete, performance.team_signal);
        }
        self.events.add(event);
    }

    pub fn skip(&mut self, path: &Path, reason: String) {
        self.skipped.push(SkippedFile {
            path: path.to_path_buf(),
            reason,
        });
    }

    pub fn athletes(&self) -> &AthleteRegistry {
        &self.athletes
    }

    pub fn finish(self, source_dir: Option<PathBuf>) -> Dataset {
        Dataset {
            snapshot_id: uuid::Uuid::new_v4().to_string(),
            loaded_at: Utc::now(),
            source_dir,
            events: self.events,
            athletes: self.athletes,
            skipped: self.skipped,
        }
    }
}

// ============================================================================
// HANDLE
// ============================================================================

/// Shared, swappable pointer to the current Dataset
#[derive(Clone)]
pub struct DatasetHandle {
    current: Arc<ArcSwap<Dataset>>,
}

impl DatasetHandle {
    pub fn new(dataset: Dataset) -> Self {
        DatasetHandle {
            current: Arc::new(ArcSwap::from_pointee(dataset)),
        }
    }

    pub fn empty() -> Self {
        Self::new(Dataset::empty())
    }

    /// Consistent view; stays valid even if a reload happens meanwhile
    pub fn current(&self) -> Arc<Dataset> {
        self.current.load_full()
    }

    /// Publish a new dataset, returning the previous one
    pub fn replace(&self, dataset: Dataset) -> Arc<Dataset> {
        self.publish(Arc::new(dataset))
    }

    fn publish(&self, dataset: Arc<Dataset>) -> Arc<Dataset> {
        let previous = self.current.swap(Arc::clone(&dataset));
        info!(
            "Dataset swapped: {} -> {}",
            previous.snapshot_id, dataset.snapshot_id
        );
        previous
    }

    /// Rebuild from a snapshot directory and publish the result.
    ///
    /// Returns the dataset this call built, even if another reload has
    /// already replaced it.
    pub fn reload_from(&self, dir: &Path) -> Arc<Dataset> {
        let dataset = Arc::new(crate::loader::load_dir(dir));
        self.publish(Arc::clone(&dataset));
        dataset
    }
}

impl Default for DatasetHandle {
    fn default() -> Self {
        Self::empty()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{LapRecord, Track};
    use chrono::NaiveDate;

    fn dataset_with_event(name: &str) -> Dataset {
        let mut builder = DatasetBuilder::new();
        let track = Arc::new(Track::new("Track", "City", "USA", 1.0));
        let mut event = Event::new(name, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), track);
        let athlete = builder.resolve_athlete(Athlete::named("Jane Doe").unwrap());
        event.record_performance(athlete, vec![LapRecord::new(1, 60)], "Team Relay", "");
        builder.add_event(event);
        builder.finish(None)
    }

    #[test]
    fn test_empty_dataset() {
        let dataset = Dataset::empty();
        assert!(!dataset.is_loaded());
        assert!(dataset.athletes.is_empty());
        assert!(!dataset.snapshot_id.is_empty());
    }

    #[test]
    fn test_builder_folds_team_signal() {
        let dataset = dataset_with_event("Miami");
        let athlete = dataset.athletes.lookup_by_name("jane doe").unwrap();
        assert!(dataset.athletes.is_team(&athlete));
        assert!(dataset.is_loaded());
    }

    #[test]
    fn test_same_track_is_shared() {
        let mut builder = DatasetBuilder::new();
        let first = builder.intern_track(Track::new("Homestead", "Miami", "USA", 1.46));
        let again = builder.intern_track(Track::new("Homestead", "Miami", "USA", 1.46));
        let other = builder.intern_track(Track::new("Velodrome", "Miami", "USA", 0.25));

        assert!(Arc::ptr_eq(&first, &again));
        assert!(!Arc::ptr_eq(&first, &other));
    }

    #[test]
    fn test_swap_keeps_old_readers_consistent() {
        let handle = DatasetHandle::new(dataset_with_event("Miami"));
        let before = handle.current();

        let previous = handle.replace(dataset_with_event("Dutch"));
        let after = handle.current();

        assert!(Arc::ptr_eq(&before, &previous));
        assert_eq!(before.events.events()[0].name, "Miami");
        assert_eq!(after.events.events()[0].name, "Dutch");
        assert_ne!(before.snapshot_id, after.snapshot_id);
    }

    #[test]
    fn test_reload_returns_its_own_dataset() {
        let dir = tempfile::TempDir::new().unwrap();
        let handle = DatasetHandle::empty();

        let reloaded = handle.reload_from(dir.path());
        assert!(Arc::ptr_eq(&reloaded, &handle.current()));

        // A later publish does not change what the earlier reload handed out
        handle.replace(dataset_with_event("Dutch"));
        assert!(!reloaded.is_loaded());
        assert_eq!(reloaded.source_dir.as_deref(), Some(dir.path()));
        assert_ne!(reloaded.snapshot_id, handle.current().snapshot_id);
    }

    #[test]
    fn test_handle_clones_share_state() {
        let handle = DatasetHandle::empty();
        let clone = handle.clone();
        handle.replace(dataset_with_event("Miami"));
        assert!(clone.current().is_loaded());
    }
}
