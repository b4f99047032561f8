//! Fitness Progress Shared Library
//!
//! Pure progress computations (streaks, workout stats, schedule inference,
//! chart projections) and the types shared by the backend and WASM crates.
//! Nothing in this crate performs I/O or reads the clock.

pub mod calendar;
pub mod charts;
pub mod errors;
pub mod health_metrics;
pub mod models;
pub mod schedule;
pub mod stats;
pub mod streak;
pub mod types;
pub mod validation;

// Re-export commonly used items
pub use errors::*;
pub use models::*;
pub use types::*;

pub use charts::{metric_series, workout_frequency, ChartPoint, DailyActivity, MetricField};
pub use schedule::{is_training_day, week_schedule, ScheduledDay};
pub use stats::compute_stats;
pub use streak::compute_streak;
