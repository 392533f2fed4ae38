// 🛹 Athlete Entity - identity by canonical name
//
// "Display name is a VALUE (spelling varies), canonical name is IDENTITY"
//
// Problem solved:
// - "Joe Mazzone", "Joseph Mazzone", " joseph mazzone " → one athlete
// - Equality and hashing ignore display spelling

use crate::error::StatsResult;
use crate::identity::canonicalize;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Athlete {
    // ========================================================================
    // IDENTITY
    // ========================================================================
    /// Alias-resolved lowercase key
    pub canonical_name: String,

    // ========================================================================
    // VALUES (first-seen spelling wins once registered)
    // ========================================================================
    pub name: String,
    pub gender: String,
    pub city: String,
    pub state: String,
    pub country: String,
}

impl Athlete {
    /// Create an athlete; fails on an empty name
    pub fn new(name: &str, gender: &str, city: &str, state: &str, country: &str) -> StatsResult<Self> {
        let canonical_name = canonicalize(name)?;

        Ok(Athlete {
            canonical_name,
            name: name.to_string(),
            gender: gender.to_string(),
            city: city.to_string(),
            state: state.to_string(),
            country: country.to_string(),
        })
    }

    /// Create an athlete with only a name (lookups, tests)
    pub fn named(name: &str) -> StatsResult<Self> {
        Athlete::new(name, "", "", "", "")
    }

    /// Does the display name carry a team marker?
    pub fn name_signals_team(&self) -> bool {
        self.name.to_lowercase().contains("team")
    }
}

impl PartialEq for Athlete {
    fn eq(&self, other: &Self) -> bool {
        self.canonical_name == other.canonical_name
    }
}

impl Eq for Athlete {}

impl Hash for Athlete {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical_name.hash(state);
    }
}

impl fmt::Display for Athlete {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Athlete(name={}, gender={}, city={}, state={}, country={})",
            self.name, self.gender, self.city, self.state, self.country
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_athlete_creation() {
        let athlete = Athlete::new("Joe Mazzone", "M", "Miami", "FL", "USA").unwrap();
        assert_eq!(athlete.name, "Joe Mazzone");
        assert_eq!(athlete.canonical_name, "joseph mazzone");
        assert_eq!(athlete.state, "FL");
    }

    #[test]
    fn test_empty_name_rejected() {
        assert!(Athlete::named("").is_err());
        assert!(Athlete::named("  ").is_err());
    }

    #[test]
    fn test_equality_uses_canonical_name() {
        let a = Athlete::new("Joe Mazzone", "M", "", "", "").unwrap();
        let b = Athlete::new("Joseph Mazzone", "", "Tampa", "", "").unwrap();
        let c = Athlete::named("Joe Burnham").unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);

        let set: HashSet<Athlete> = [a, b, c].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_team_marker_in_name() {
        assert!(Athlete::named("Team Pavedwave").unwrap().name_signals_team());
        assert!(!Athlete::named("Jane Doe").unwrap().name_signals_team());
    }
}
