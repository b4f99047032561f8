//! Application state management
//!
//! Shared state passed to every handler via Axum's state extraction.
//! Everything inside is behind an `Arc`, so cloning per request is cheap.

use crate::auth::UserDirectory;
use crate::config::AppConfig;
use crate::repositories::{ProfileStore, ProgressStore};
use crate::services::ProgressService;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Progress facade over the configured stores
    pub progress: ProgressService,
    /// Session verification with pre-computed keys
    pub users: UserDirectory,
    /// Application configuration
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Create a new application state
    ///
    /// Session keys are derived here, once, from the configured secret.
    pub fn new(
        progress_store: Arc<dyn ProgressStore>,
        profile_store: Arc<dyn ProfileStore>,
        config: AppConfig,
    ) -> Self {
        let progress = ProgressService::new(progress_store, profile_store, config.progress.clone());
        let users = UserDirectory::new(&config.jwt.secret, config.jwt.access_token_expiry_secs);

        Self {
            progress,
            users,
            config: Arc::new(config),
        }
    }

    /// Replace the progress service, e.g. to pin its clock
    pub fn with_progress(mut self, progress: ProgressService) -> Self {
        self.progress = progress;
        self
    }

    #[inline]
    pub fn progress(&self) -> &ProgressService {
        &self.progress
    }

    #[inline]
    pub fn users(&self) -> &UserDirectory {
        &self.users
    }

    #[inline]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}
