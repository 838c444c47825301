//! Configuration types shared across crates.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Server configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    #[serde(default = "default_bind")]
    pub bind: String,
}

fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

/// File store configuration: the two directories holding image bytes.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory of pre-seeded project images, served under `/images`.
    #[serde(default = "default_project_dir")]
    pub project_dir: PathBuf,
    /// Directory of uploaded images, served under `/uploaded`.
    #[serde(default = "default_upload_dir")]
    pub upload_dir: PathBuf,
}

fn default_project_dir() -> PathBuf {
    PathBuf::from("images")
}

fn default_upload_dir() -> PathBuf {
    PathBuf::from("uploaded_images")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            project_dir: default_project_dir(),
            upload_dir: default_upload_dir(),
        }
    }
}

/// Metadata store configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MetadataConfig {
    /// Path of the JSON metadata document.
    #[serde(default = "default_metadata_path")]
    pub path: PathBuf,
}

fn default_metadata_path() -> PathBuf {
    PathBuf::from("images_metadata.json")
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            path: default_metadata_path(),
        }
    }
}

/// API key configuration.
///
/// Mutating endpoints compare the `X-API-Key` header against this secret.
/// In debug builds a well-known development key is filled in when none is
/// configured; release builds carry no default and refuse to start without
/// an explicit key.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AuthConfig {
    /// The shared API key secret. Environment-sourced in deployments
    /// (`SHUTTER_AUTH__API_KEY`).
    #[serde(default = "default_api_key")]
    pub api_key: Option<String>,
}

/// Development-only API key default. Compiled out of release builds.
#[cfg(debug_assertions)]
pub const DEV_API_KEY: &str = "thisisapikey";

#[cfg(debug_assertions)]
fn default_api_key() -> Option<String> {
    Some(DEV_API_KEY.to_string())
}

#[cfg(not(debug_assertions))]
fn default_api_key() -> Option<String> {
    None
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            api_key: default_api_key(),
        }
    }
}

impl AuthConfig {
    /// Whether the configured key is the built-in development default.
    pub fn is_dev_default(&self) -> bool {
        #[cfg(debug_assertions)]
        {
            self.api_key.as_deref() == Some(DEV_API_KEY)
        }
        #[cfg(not(debug_assertions))]
        {
            false
        }
    }
}

/// Complete application configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// File store configuration.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Metadata store configuration.
    #[serde(default)]
    pub metadata: MetadataConfig,
    /// API key configuration.
    #[serde(default)]
    pub auth: AuthConfig,
}

impl AppConfig {
    /// Create a test configuration with a fixed API key.
    ///
    /// **For testing only.** Callers are expected to point the storage and
    /// metadata paths at a temporary directory.
    pub fn for_testing() -> Self {
        Self {
            auth: AuthConfig {
                api_key: Some("test-api-key".to_string()),
            },
            ..Default::default()
        }
    }
}
