//! Flat-file image storage for the shutter image-hosting API.
//!
//! Two plain directories hold image bytes: one for pre-seeded project
//! images, one for uploads. This crate owns filename validation, atomic
//! writes, tolerant removal, and the project-directory scan used at
//! startup.

pub mod error;
pub mod store;

pub use error::{StorageError, StorageResult};
pub use store::FileStore;
