//! HTTP API server for the shutter image host.
//!
//! This crate provides the HTTP control plane:
//! - Image listing and retrieval
//! - Multipart upload with a fixed-size resize
//! - Deletion of uploaded images
//! - Static serving of both image directories
//! - Project image registration at startup

pub mod auth;
pub mod bootstrap;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
