// Entity Models
//
// Track, Athlete, LapRecord, Performance, Event.
// Athletes are shared (Arc) across every performance of the same person;
// tracks are shared across every event held on them.

pub mod athlete;
pub mod event;
pub mod performance;
pub mod track;

pub use athlete::Athlete;
pub use event::Event;
pub use performance::{LapRecord, Performance, SpeedUnit};
pub use track::Track;
