//! The file store over the two image directories.

use crate::error::{StorageError, StorageResult};
use bytes::Bytes;
use shutter_core::{ImageSource, has_accepted_extension};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::instrument;
use uuid::Uuid;

/// Flat-file store holding project images and uploads in two directories.
pub struct FileStore {
    project_dir: PathBuf,
    upload_dir: PathBuf,
}

impl FileStore {
    /// Create a new file store, creating both directories if missing.
    pub async fn new(
        project_dir: impl AsRef<Path>,
        upload_dir: impl AsRef<Path>,
    ) -> StorageResult<Self> {
        let project_dir = project_dir.as_ref().to_path_buf();
        let upload_dir = upload_dir.as_ref().to_path_buf();
        fs::create_dir_all(&project_dir).await?;
        fs::create_dir_all(&upload_dir).await?;
        Ok(Self {
            project_dir,
            upload_dir,
        })
    }

    /// Directory of pre-seeded project images.
    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    /// Directory of uploaded images.
    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    /// Validate a filename before joining it into a store directory.
    ///
    /// Rejects empty names, path separators, and traversal components, so a
    /// caller-supplied filename can never address anything outside the two
    /// store directories.
    pub fn validate_filename(name: &str) -> StorageResult<()> {
        if name.is_empty() {
            return Err(StorageError::InvalidName("empty filename".to_string()));
        }
        if name.contains("..") || name.contains('/') || name.contains('\\') {
            return Err(StorageError::InvalidName(format!(
                "path traversal not allowed: {name}"
            )));
        }
        let mut components = Path::new(name).components();
        match (components.next(), components.next()) {
            (Some(std::path::Component::Normal(_)), None) => Ok(()),
            _ => Err(StorageError::InvalidName(format!(
                "contains unsafe path component: {name}"
            ))),
        }
    }

    /// Resolve the on-disk path for a record's file.
    pub fn path_for(&self, source: ImageSource, filename: &str) -> StorageResult<PathBuf> {
        Self::validate_filename(filename)?;
        let dir = match source {
            ImageSource::Project => &self.project_dir,
            ImageSource::Uploaded => &self.upload_dir,
        };
        Ok(dir.join(filename))
    }

    /// Check whether a record's file exists on disk.
    #[instrument(skip(self))]
    pub async fn exists(&self, source: ImageSource, filename: &str) -> StorageResult<bool> {
        let path = self.path_for(source, filename)?;
        fs::try_exists(&path).await.map_err(StorageError::Io)
    }

    /// Read a record's file in full.
    #[instrument(skip(self))]
    pub async fn read(&self, source: ImageSource, filename: &str) -> StorageResult<Bytes> {
        let path = self.path_for(source, filename)?;
        let data = fs::read(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StorageError::NotFound(filename.to_string())
            } else {
                StorageError::Io(e)
            }
        })?;
        Ok(Bytes::from(data))
    }

    /// Write an uploaded file atomically and return its final path.
    ///
    /// Writes to a uniquely named temp file, fsyncs, then renames, so a
    /// crash mid-write never leaves a half-written file under the final
    /// name.
    #[instrument(skip(self, data), fields(size = data.len()))]
    pub async fn write_uploaded(&self, filename: &str, data: Bytes) -> StorageResult<PathBuf> {
        let path = self.path_for(ImageSource::Uploaded, filename)?;
        let temp_path = path.with_file_name(format!("{filename}.tmp.{}", Uuid::new_v4()));
        {
            let mut file = fs::File::create(&temp_path).await?;
            file.write_all(&data).await?;
            file.sync_all().await?;
        }
        fs::rename(&temp_path, &path).await?;
        Ok(path)
    }

    /// Remove an uploaded file, tolerating its absence.
    #[instrument(skip(self))]
    pub async fn remove_uploaded(&self, filename: &str) -> StorageResult<()> {
        let path = self.path_for(ImageSource::Uploaded, filename)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Io(e)),
        }
    }

    /// List project-directory files carrying an accepted image extension.
    ///
    /// Returns `(filename, path)` pairs. Subdirectories and symlinks are
    /// ignored; the project directory is flat by convention.
    #[instrument(skip(self))]
    pub async fn scan_project(&self) -> StorageResult<Vec<(String, PathBuf)>> {
        let mut results = Vec::new();
        let mut entries = fs::read_dir(&self.project_dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let file_type = entry.file_type().await?;
            if !file_type.is_file() {
                continue;
            }
            let filename = entry.file_name().to_string_lossy().to_string();
            if has_accepted_extension(&filename) {
                results.push((filename, entry.path()));
            }
        }
        Ok(results)
    }
}
