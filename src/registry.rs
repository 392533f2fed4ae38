// 📚 Registries - events by date, athletes by canonical identity
//
// Both are filled once during load and only read afterwards, so every insert
// re-sorts the whole collection.

use crate::entities::{Athlete, Event};
use crate::identity::canonicalize;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::debug;

// ============================================================================
// EVENT REGISTRY
// ============================================================================

#[derive(Debug, Default)]
pub struct EventRegistry {
    /// Ascending by date; same-date events keep insertion order
    events: Vec<Event>,
}

impl EventRegistry {
    pub fn new() -> Self {
        EventRegistry { events: Vec::new() }
    }

    pub fn add(&mut self, event: Event) {
        self.events.push(event);
        self.events.sort_by_key(|e| e.date);
    }

    /// First event (in date order) with this name and year
    pub fn get_by_name_year(&self, name: &str, year: i32) -> Option<&Event> {
        self.events.iter().find(|e| e.matches(name, year))
    }

    pub fn get_by_name(&self, name: &str) -> Vec<&Event> {
        let name = name.to_lowercase();
        self.events
            .iter()
            .filter(|e| e.name.to_lowercase() == name)
            .collect()
    }

    /// First event held in `year`
    pub fn get_by_year(&self, year: i32) -> Option<&Event> {
        self.events.iter().find(|e| e.year() == year)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Event> {
        self.events.iter()
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl<'a> IntoIterator for &'a EventRegistry {
    type Item = &'a Event;
    type IntoIter = std::slice::Iter<'a, Event>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}

// ============================================================================
// ATHLETE REGISTRY
// ============================================================================

/// One shared `Arc<Athlete>` per canonical name
#[derive(Debug, Default)]
pub struct AthleteRegistry {
    /// Sorted by lowercased display name
    athletes: Vec<Arc<Athlete>>,
    by_canonical: HashMap<String, Arc<Athlete>>,

    /// Canonical names with at least one team signal
    team: HashSet<String>,

    total_lookups: usize,
}

impl AthleteRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the registered instance for this person, registering the
    /// candidate if nobody with the same canonical name exists yet.
    ///
    /// First-seen wins: a later candidate's attributes are discarded.
    pub fn register_or_get(&mut self, candidate: Athlete) -> Arc<Athlete> {
        self.total_lookups += 1;

        if let Some(existing) = self.by_canonical.get(&candidate.canonical_name) {
            debug!(
                "Duplicate athlete name detected: '{}' (canonical: '{}')",
                candidate.name, candidate.canonical_name
            );
            return Arc::clone(existing);
        }

        let athlete = Arc::new(candidate);
        self.add(Arc::clone(&athlete));
        athlete
    }

    fn add(&mut self, athlete: Arc<Athlete>) {
        self.by_canonical
            .insert(athlete.canonical_name.clone(), Arc::clone(&athlete));
        self.athletes.push(athlete);
        self.athletes.sort_by_key(|a| a.name.to_lowercase());
    }

    /// Look up by any known spelling
    pub fn lookup_by_name(&self, name: &str) -> Option<Arc<Athlete>> {
        let key = canonicalize(name).ok()?;
        self.by_canonical.get(&key).cloned()
    }

    pub fn get_by_name(&self, name: &str) -> Option<Arc<Athlete>> {
        self.lookup_by_name(name)
    }

    /// OR a team signal into the athlete's team fact. Never resets.
    pub fn observe_team_signal(&mut self, athlete: &Athlete, signal: bool) {
        if signal {
            self.team.insert(athlete.canonical_name.clone());
        }
    }

    pub fn is_team(&self, athlete: &Athlete) -> bool {
        self.team.contains(&athlete.canonical_name)
    }

    pub fn athletes(&self) -> &[Arc<Athlete>] {
        &self.athletes
    }

    pub fn len(&self) -> usize {
        self.athletes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.athletes.is_empty()
    }

    /// Number of register_or_get calls, duplicates included
    pub fn total_lookups(&self) -> usize {
        self.total_lookups
    }
}

// ============================================================================
// TESTS
// ============================================================================
