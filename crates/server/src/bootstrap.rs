//! Project image registration at startup.

use anyhow::Result;
use shutter_core::{ImageRecord, ImageSource, inspect};
use shutter_metadata::JsonStore;
use shutter_storage::FileStore;
use uuid::Uuid;

/// Register project-directory images in the metadata store.
///
/// Runs only when the metadata document is absent or empty; a populated
/// document from a previous run suppresses the scan entirely, so project
/// images keep their ids across restarts.
pub async fn seed_project_images(files: &FileStore, index: &JsonStore) -> Result<()> {
    if !index.is_empty().await {
        tracing::debug!("metadata document already populated, skipping project image scan");
        return Ok(());
    }

    tracing::info!("initializing metadata for project images");
    let mut records = Vec::new();
    for (filename, path) in files.scan_project().await? {
        let Some(info) = inspect(&path) else {
            tracing::warn!(file = %path.display(), "skipping project file that does not decode as an image");
            continue;
        };
        records.push(ImageRecord {
            id: Uuid::new_v4().to_string(),
            url: format!("/images/{filename}"),
            filename,
            source: ImageSource::Project,
            dimensions: info.dimensions,
            format: info.format,
            mode: info.mode,
            size_bytes: info.size_bytes,
            size_kb: info.size_kb,
            original_dimensions: None,
        });
    }

    let count = records.len();
    index.replace_all(records).await?;
    tracing::info!(count, "project images registered");
    Ok(())
}
