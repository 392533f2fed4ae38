// Ultraskate Stats - Core Library
// Exposes all modules for use in CLI, API server, and tests

pub mod config;
pub mod entities;
pub mod error;
pub mod export;
pub mod identity;
pub mod loader;
pub mod query;
pub mod registry;
pub mod rules;
pub mod snapshot;
pub mod stats;
pub mod time;

// Re-export commonly used types
pub use config::Config;
pub use entities::{Athlete, Event, LapRecord, Performance, SpeedUnit, Track};
pub use error::{StatsError, StatsResult};
pub use identity::{canonical_display_name, canonicalize, ATHLETE_ALIASES};
pub use loader::{load_dir, load_file, write_snapshot, EventSnapshot};
pub use registry::{AthleteRegistry, EventRegistry};
pub use rules::{ClassificationResult, Sport, SportClassifier, SportRule};
pub use snapshot::{Dataset, DatasetBuilder, DatasetHandle, SkippedFile};
pub use stats::{
    athlete_breakdown, career_aggregate, career_for, event_series, AthleteBreakdown, CareerStats,
    EventStats,
};
pub use time::{parse_hhmmss, seconds_to_hhmmss};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Install the fmt subscriber used by the binaries (`RUST_LOG`, default `info`)
pub fn init_tracing() {
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}
