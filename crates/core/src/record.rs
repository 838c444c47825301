//! The image record data model.
//!
//! One record describes one image file on disk. Records are immutable once
//! created; the metadata document maps `id -> ImageRecord`.

use serde::{Deserialize, Serialize};

/// Width/height pair in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Origin tag distinguishing pre-seeded project images from user uploads.
///
/// Controls delete eligibility: project images are non-deletable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageSource {
    Project,
    Uploaded,
}

impl ImageSource {
    /// URL prefix the record's file is served under.
    pub fn url_prefix(self) -> &'static str {
        match self {
            Self::Project => "/images",
            Self::Uploaded => "/uploaded",
        }
    }
}

impl std::fmt::Display for ImageSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Project => write!(f, "project"),
            Self::Uploaded => write!(f, "uploaded"),
        }
    }
}

/// One entry in the metadata document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ImageRecord {
    /// Opaque unique identifier, generated once at creation.
    pub id: String,
    /// Filename on disk, unique across all records.
    pub filename: String,
    /// URL path the file is served under (`/images/...` or `/uploaded/...`).
    pub url: String,
    /// Origin of the file; determines which directory holds it.
    pub source: ImageSource,
    /// Dimensions of the stored file.
    pub dimensions: Dimensions,
    /// Decoder format name, uppercased ("PNG", "JPEG", ...).
    pub format: String,
    /// Color mode name ("RGB", "RGBA", "L", ...).
    pub mode: String,
    /// Stored file size in bytes.
    pub size_bytes: u64,
    /// `size_bytes / 1024`, rounded to two decimals.
    pub size_kb: f64,
    /// Dimensions of the upload before the fixed resize. Uploaded records
    /// only; absent from project records and omitted from their JSON.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_dimensions: Option<Dimensions>,
}
