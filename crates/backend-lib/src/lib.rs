// ============================
// backend-lib/src/lib.rs
// ============================
//! Core backend-lib functionality for the Mergington activities service.

pub mod config;
pub mod directory;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod router;
pub mod seed;
pub mod validation;

use std::sync::Arc;

use crate::config::Settings;
use crate::directory::Directory;
use crate::error::AppError;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Activity directory
    pub directory: Arc<Directory>,
    /// Settings the process was started with
    pub settings: Arc<Settings>,
}

impl AppState {
    /// Create a new application state around an existing directory
    pub fn new(directory: Directory, settings: Settings) -> Self {
        Self {
            directory: Arc::new(directory),
            settings: Arc::new(settings),
        }
    }

    /// Seed a directory as the settings describe and wrap it
    pub fn from_settings(settings: Settings) -> Result<Self, AppError> {
        let seed = match &settings.seed_file {
            Some(path) => seed::load_activities(path)?,
            None => seed::default_activities(),
        };
        let directory = Directory::new(seed, settings.enforce_capacity)?;

        Ok(Self::new(directory, settings))
    }
}
