//! Business logic services
//!
//! Services encapsulate business logic and coordinate between
//! the progress and profile stores.

pub mod progress;

pub use progress::ProgressService;
