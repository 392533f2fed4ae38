// 🏁 Track - venue a race is held on

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub name: String,
    pub city: String,
    pub country: String,

    /// Length of one lap in miles (> 0)
    pub length_miles: f64,
}

impl Track {
    pub fn new(name: &str, city: &str, country: &str, length_miles: f64) -> Self {
        Track {
            name: name.to_string(),
            city: city.to_string(),
            country: country.to_string(),
            length_miles,
        }
    }

    pub fn length_km(&self) -> f64 {
        crate::time::miles_to_km(self.length_miles)
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Track {} ({}, {})", self.name, self.city, self.country)
    }
}
