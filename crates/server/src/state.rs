//! Application state shared across handlers.

use shutter_core::config::AppConfig;
use shutter_metadata::JsonStore;
use shutter_storage::FileStore;
use std::sync::Arc;

/// Shared application state.
///
/// Constructed once in `main` and cloned into handlers; there is no other
/// process-wide state.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// File store over the two image directories.
    pub files: Arc<FileStore>,
    /// Metadata store.
    pub index: Arc<JsonStore>,
}

impl AppState {
    /// Create a new application state.
    pub fn new(config: AppConfig, files: Arc<FileStore>, index: Arc<JsonStore>) -> Self {
        Self {
            config: Arc::new(config),
            files,
            index,
        }
    }
}
