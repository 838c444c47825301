//! Image CRUD handlers.

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::Json;
use axum::extract::{Multipart, Path, State};
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};
use serde::Serialize;
use shutter_core::{
    Dimensions, ImageRecord, ImageSource, THUMBNAIL_SIZE, extension_of, has_accepted_extension,
    inspect,
};
use shutter_storage::{FileStore, StorageError};
use std::io::Cursor;
use uuid::Uuid;

/// Confirmation payload returned by delete.
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub message: String,
    pub id: String,
    pub filename: String,
}

/// `GET /api/images` — all records, unordered.
pub async fn list_images(State(state): State<AppState>) -> ApiResult<Json<Vec<ImageRecord>>> {
    Ok(Json(state.index.list().await))
}

/// `GET /api/images/{image_id}` — raw file bytes for a record.
///
/// A record whose file has gone missing from disk is reported as 404, the
/// same as an unknown id.
pub async fn get_image(
    State(state): State<AppState>,
    Path(image_id): Path<String>,
) -> ApiResult<Response> {
    let record = state
        .index
        .get(&image_id)
        .await
        .ok_or_else(|| ApiError::NotFound("image not found".to_string()))?;

    let data = state
        .files
        .read(record.source, &record.filename)
        .await
        .map_err(|e| match e {
            StorageError::NotFound(_) => ApiError::NotFound("image file not found".to_string()),
            other => ApiError::Storage(other),
        })?;

    let content_type = format!("image/{}", record.format.to_lowercase());
    Ok(([(CONTENT_TYPE, content_type)], data).into_response())
}

/// Fields read from the upload multipart form.
struct UploadForm {
    /// Raw bytes of the `file` part.
    data: Bytes,
    /// Client-reported filename of the `file` part, if any.
    client_filename: Option<String>,
    /// Value of the optional `filename` text part.
    requested_filename: Option<String>,
}

async fn read_upload_form(mut multipart: Multipart) -> ApiResult<UploadForm> {
    let mut data = None;
    let mut client_filename = None;
    let mut requested_filename = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("invalid multipart body: {e}")))?
    {
        match field.name() {
            Some("file") => {
                client_filename = field.file_name().map(str::to_string);
                data = Some(
                    field
                        .bytes()
                        .await
                        .map_err(|e| ApiError::BadRequest(format!("failed to read file field: {e}")))?,
                );
            }
            Some("filename") => {
                let value = field.text().await.map_err(|e| {
                    ApiError::BadRequest(format!("failed to read filename field: {e}"))
                })?;
                if !value.is_empty() {
                    requested_filename = Some(value);
                }
            }
            _ => {}
        }
    }

    let data = data.ok_or_else(|| ApiError::BadRequest("missing file field".to_string()))?;
    Ok(UploadForm {
        data,
        client_filename,
        requested_filename,
    })
}

/// Resolve the destination filename for an upload.
///
/// A caller-supplied name must carry an accepted extension, must be a plain
/// filename (no path components), and must not collide with any existing
/// record. Without one, the name is synthesized from the fresh id and the
/// client filename's extension, falling back to the detected source format
/// when the client name has none.
async fn resolve_filename(state: &AppState, form: &UploadForm, image_id: &str) -> ApiResult<String> {
    if let Some(name) = &form.requested_filename {
        if !has_accepted_extension(name) {
            return Err(ApiError::BadRequest(
                "filename must have a valid image extension (.png, .jpg, .jpeg, .gif, .bmp)"
                    .to_string(),
            ));
        }
        FileStore::validate_filename(name).map_err(|e| ApiError::BadRequest(e.to_string()))?;
        if state.index.filename_taken(name).await {
            return Err(ApiError::BadRequest(format!(
                "an image with filename '{name}' already exists"
            )));
        }
        return Ok(name.clone());
    }

    let ext = form
        .client_filename
        .as_deref()
        .and_then(extension_of)
        .or_else(|| {
            image::guess_format(&form.data)
                .ok()
                .and_then(|f| f.extensions_str().first().map(|s| s.to_string()))
        })
        .unwrap_or_else(|| "png".to_string());
    Ok(format!("{image_id}.{ext}"))
}

/// Encode `img` in the format implied by `filename`'s extension.
fn encode_for_extension(img: &DynamicImage, filename: &str) -> ApiResult<Bytes> {
    let ext = extension_of(filename).ok_or_else(|| {
        ApiError::Internal(format!("destination filename has no extension: {filename}"))
    })?;
    let format = ImageFormat::from_extension(&ext)
        .ok_or_else(|| ApiError::Internal(format!("unsupported target format: .{ext}")))?;

    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, format)
        .map_err(|e| ApiError::Internal(format!("failed to encode resized image: {e}")))?;
    Ok(Bytes::from(buf.into_inner()))
}

/// `POST /api/images` — decode, resize to the fixed thumbnail canvas, store.
///
/// Any failure after the file has been written removes the file again
/// (best-effort) before the error propagates; no orphan is left behind.
pub async fn upload_image(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResult<Json<ImageRecord>> {
    let form = read_upload_form(multipart).await?;

    let original = image::load_from_memory(&form.data)
        .map_err(|e| ApiError::Internal(format!("failed to decode uploaded image: {e}")))?;
    let original_dimensions = Dimensions {
        width: original.width(),
        height: original.height(),
    };

    let (width, height) = THUMBNAIL_SIZE;
    let resized = original.resize_exact(width, height, FilterType::CatmullRom);

    let image_id = Uuid::new_v4().to_string();
    let filename = resolve_filename(&state, &form, &image_id).await?;

    let encoded = encode_for_extension(&resized, &filename)?;
    let written_path = state.files.write_uploaded(&filename, encoded).await?;

    let Some(info) = inspect(&written_path) else {
        if let Err(err) = state.files.remove_uploaded(&filename).await {
            tracing::warn!(filename = %filename, error = %err, "failed to clean up uninspectable upload");
        }
        return Err(ApiError::Internal(
            "failed to process uploaded image".to_string(),
        ));
    };

    let record = ImageRecord {
        id: image_id,
        url: format!("/uploaded/{filename}"),
        filename,
        source: ImageSource::Uploaded,
        dimensions: info.dimensions,
        format: info.format,
        mode: info.mode,
        size_bytes: info.size_bytes,
        size_kb: info.size_kb,
        original_dimensions: Some(original_dimensions),
    };

    if let Err(err) = state.index.insert(record.clone()).await {
        if let Err(cleanup_err) = state.files.remove_uploaded(&record.filename).await {
            tracing::warn!(
                filename = %record.filename,
                error = %cleanup_err,
                "failed to clean up upload after metadata write failure"
            );
        }
        return Err(err.into());
    }

    tracing::info!(id = %record.id, filename = %record.filename, "image uploaded");
    Ok(Json(record))
}

/// `DELETE /api/images/{image_id}` — remove an uploaded image.
pub async fn delete_image(
    State(state): State<AppState>,
    Path(image_id): Path<String>,
) -> ApiResult<Json<DeleteResponse>> {
    let record = state
        .index
        .get(&image_id)
        .await
        .ok_or_else(|| ApiError::NotFound("image not found".to_string()))?;

    // Project images are immutable and non-deletable.
    if record.source == ImageSource::Project {
        return Err(ApiError::Forbidden(
            "cannot delete project images".to_string(),
        ));
    }

    // Tolerates a file already missing from disk.
    state.files.remove_uploaded(&record.filename).await?;
    state.index.remove(&image_id).await?;

    tracing::info!(id = %image_id, filename = %record.filename, "image deleted");
    Ok(Json(DeleteResponse {
        message: "Image deleted successfully".to_string(),
        id: image_id,
        filename: record.filename,
    }))
}
