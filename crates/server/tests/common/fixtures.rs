//! Test fixtures for generating image data and multipart requests.

use axum::body::Body;
use axum::http::Request;
use image::{ImageFormat, RgbImage};
use std::io::Cursor;

/// Encode a small patterned PNG of the given dimensions.
/// Note: #[allow(dead_code)] because each test file compiles common/ separately.
#[allow(dead_code)]
pub fn test_png(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png)
        .expect("failed to encode test png");
    buf.into_inner()
}

/// Multipart boundary used by the test requests.
#[allow(dead_code)]
pub const BOUNDARY: &str = "shutter-test-boundary";

/// Content-Type header value for the test multipart bodies.
#[allow(dead_code)]
pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={BOUNDARY}")
}

/// Build a multipart body with a `file` part and an optional `filename`
/// text part.
#[allow(dead_code)]
pub fn multipart_body(
    file_bytes: &[u8],
    client_filename: &str,
    filename_field: Option<&str>,
) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"{client_filename}\"\r\n\
             Content-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(file_bytes);
    body.extend_from_slice(b"\r\n");
    if let Some(name) = filename_field {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\n\
                 Content-Disposition: form-data; name=\"filename\"\r\n\r\n\
                 {name}\r\n"
            )
            .as_bytes(),
        );
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

/// Build a multipart body that carries only the `filename` text part.
#[allow(dead_code)]
pub fn multipart_body_without_file(filename_field: &str) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"filename\"\r\n\r\n\
             {filename_field}\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

/// Build an upload request, optionally authenticated.
#[allow(dead_code)]
pub fn upload_request(
    api_key: Option<&str>,
    file_bytes: &[u8],
    client_filename: &str,
    filename_field: Option<&str>,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/api/images")
        .header("Content-Type", multipart_content_type());
    if let Some(key) = api_key {
        builder = builder.header("X-API-Key", key);
    }
    builder
        .body(Body::from(multipart_body(
            file_bytes,
            client_filename,
            filename_field,
        )))
        .unwrap()
}
