//! Server test utilities.

use shutter_core::config::AppConfig;
use shutter_metadata::JsonStore;
use shutter_server::bootstrap::seed_project_images;
use shutter_server::{AppState, create_router};
use shutter_storage::FileStore;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

/// A test server wrapper with all dependencies.
/// Note: #[allow(dead_code)] because each test file compiles common/ separately.
#[allow(dead_code)]
pub struct TestServer {
    pub router: axum::Router,
    pub state: AppState,
    _temp_dir: TempDir,
}

#[allow(dead_code)]
impl TestServer {
    /// Create a test server over temporary directories, no project images.
    pub async fn new() -> Self {
        Self::with_project_files(&[]).await
    }

    /// Create a test server whose project directory holds the given
    /// `(filename, bytes)` pairs before the bootstrap scan runs.
    pub async fn with_project_files(files: &[(&str, Vec<u8>)]) -> Self {
        let temp_dir = tempfile::tempdir().expect("failed to create temp directory");

        let mut config = AppConfig::for_testing();
        config.storage.project_dir = temp_dir.path().join("images");
        config.storage.upload_dir = temp_dir.path().join("uploaded_images");
        config.metadata.path = temp_dir.path().join("images_metadata.json");

        std::fs::create_dir_all(&config.storage.project_dir)
            .expect("failed to create project directory");
        for (name, bytes) in files {
            std::fs::write(config.storage.project_dir.join(name), bytes)
                .expect("failed to write project file");
        }

        let file_store = Arc::new(
            FileStore::new(&config.storage.project_dir, &config.storage.upload_dir)
                .await
                .expect("failed to create file store"),
        );
        let index = Arc::new(
            JsonStore::open(&config.metadata.path)
                .await
                .expect("failed to open metadata store"),
        );

        seed_project_images(&file_store, &index)
            .await
            .expect("failed to seed project images");

        let state = AppState::new(config, file_store, index);
        let router = create_router(state.clone());

        Self {
            router,
            state,
            _temp_dir: temp_dir,
        }
    }

    /// The API key accepted by this server's mutating routes.
    pub fn api_key(&self) -> &str {
        self.state
            .config
            .auth
            .api_key
            .as_deref()
            .expect("test config always has a key")
    }

    /// On-disk path of an uploaded file.
    pub fn uploaded_path(&self, filename: &str) -> PathBuf {
        self.state.files.upload_dir().join(filename)
    }

    /// On-disk path of a project file.
    pub fn project_path(&self, filename: &str) -> PathBuf {
        self.state.files.project_dir().join(filename)
    }

    /// Parse the metadata document currently on disk.
    pub fn metadata_document(&self) -> serde_json::Value {
        let bytes = std::fs::read(&self.state.config.metadata.path)
            .expect("metadata document should exist");
        serde_json::from_slice(&bytes).expect("metadata document should be valid JSON")
    }
}
