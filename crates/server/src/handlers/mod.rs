//! HTTP request handlers.

mod images;

pub use images::{DeleteResponse, delete_image, get_image, list_images, upload_image};
