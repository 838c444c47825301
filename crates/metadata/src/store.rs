//! The JSON-document metadata store.

use crate::error::MetadataResult;
use shutter_core::ImageRecord;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Metadata store backed by a single JSON document on disk.
///
/// Owns the in-memory id -> record map. Constructed once at process start
/// and shared across handlers behind an `Arc`; the lock serializes map
/// access, but check-then-act races across separate operations (two uploads
/// both passing a duplicate-filename check) remain an accepted limitation.
pub struct JsonStore {
    path: PathBuf,
    records: RwLock<HashMap<String, ImageRecord>>,
}

impl JsonStore {
    /// Open the store, reading the document at `path` if present.
    ///
    /// A missing document yields an empty map; nothing is written until the
    /// first mutation.
    pub async fn open(path: impl AsRef<Path>) -> MetadataResult<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).await?;
        }

        let records = match fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            path,
            records: RwLock::new(records),
        })
    }

    /// Path of the JSON document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the store holds no records.
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    /// Number of records.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Look up a record by id.
    pub async fn get(&self, id: &str) -> Option<ImageRecord> {
        self.records.read().await.get(id).cloned()
    }

    /// All records, in map order (unordered).
    pub async fn list(&self) -> Vec<ImageRecord> {
        self.records.read().await.values().cloned().collect()
    }

    /// Whether any record already uses `filename`.
    pub async fn filename_taken(&self, filename: &str) -> bool {
        self.records
            .read()
            .await
            .values()
            .any(|record| record.filename == filename)
    }

    /// Insert a record and persist the document.
    pub async fn insert(&self, record: ImageRecord) -> MetadataResult<()> {
        let mut records = self.records.write().await;
        records.insert(record.id.clone(), record);
        self.persist(&records).await
    }

    /// Remove a record by id and persist the document.
    ///
    /// Returns the removed record, or `None` (without touching the
    /// document) when the id is unknown.
    pub async fn remove(&self, id: &str) -> MetadataResult<Option<ImageRecord>> {
        let mut records = self.records.write().await;
        let removed = records.remove(id);
        if removed.is_some() {
            self.persist(&records).await?;
        }
        Ok(removed)
    }

    /// Replace the whole map and persist the document once.
    ///
    /// Used by the startup bootstrap to register project images in a single
    /// write.
    pub async fn replace_all(&self, new_records: Vec<ImageRecord>) -> MetadataResult<()> {
        let mut records = self.records.write().await;
        *records = new_records
            .into_iter()
            .map(|record| (record.id.clone(), record))
            .collect();
        self.persist(&records).await
    }

    /// Rewrite the document from the full map, pretty-printed.
    ///
    /// Writes to a uniquely named temp file, fsyncs, then renames, so a
    /// crash mid-write never clobbers the previous document. If the write
    /// itself fails, memory and disk may diverge until the next successful
    /// mutation; no stronger guarantee is made.
    async fn persist(&self, records: &HashMap<String, ImageRecord>) -> MetadataResult<()> {
        let json = serde_json::to_vec_pretty(records)?;
        let temp_path = self
            .path
            .with_file_name(format!("{}.tmp.{}", file_name_of(&self.path), Uuid::new_v4()));
        {
            let mut file = fs::File::create(&temp_path).await?;
            file.write_all(&json).await?;
            file.sync_all().await?;
        }
        fs::rename(&temp_path, &self.path).await?;
        Ok(())
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "metadata".to_string())
}
