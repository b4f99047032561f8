//! Storage repositories
//!
//! Each store is a trait with a PostgreSQL implementation and an
//! in-memory implementation sharing the same contract.

pub mod profile;
pub mod progress;

pub use profile::{MemoryProfileStore, PgProfileStore, ProfileStore};
pub use progress::{MemoryProgressStore, PgProgressStore, ProgressStore};
