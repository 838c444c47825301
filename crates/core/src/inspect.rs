//! Image inspection: derive structural metadata from a file on disk.

use crate::record::Dimensions;
use image::{ColorType, ImageFormat, ImageReader};
use std::path::Path;

/// Structural metadata derived from an image file.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageInfo {
    pub dimensions: Dimensions,
    /// Decoder format name, uppercased ("PNG", "JPEG", ...).
    pub format: String,
    /// Color mode name ("RGB", "RGBA", "L", ...).
    pub mode: String,
    pub size_bytes: u64,
    /// `size_bytes / 1024`, rounded to two decimals.
    pub size_kb: f64,
}

/// Open the file at `path` and derive its image metadata.
///
/// Returns `None` when the file is missing or its bytes do not decode as an
/// image. Callers must treat `None` as a failed operation and clean up any
/// partially written file themselves.
pub fn inspect(path: &Path) -> Option<ImageInfo> {
    let size_bytes = match std::fs::metadata(path) {
        Ok(meta) => meta.len(),
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "failed to stat image file");
            return None;
        }
    };

    let reader = match ImageReader::open(path).and_then(|r| r.with_guessed_format()) {
        Ok(reader) => reader,
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "failed to open image file");
            return None;
        }
    };

    let Some(format) = reader.format() else {
        tracing::warn!(path = %path.display(), "unrecognized image format");
        return None;
    };

    let decoded = match reader.decode() {
        Ok(img) => img,
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "failed to decode image file");
            return None;
        }
    };

    Some(ImageInfo {
        dimensions: Dimensions {
            width: decoded.width(),
            height: decoded.height(),
        },
        format: format_name(format),
        mode: mode_name(decoded.color()).to_string(),
        size_bytes,
        size_kb: round_kb(size_bytes),
    })
}

/// `bytes / 1024` rounded to two decimals.
pub fn round_kb(size_bytes: u64) -> f64 {
    (size_bytes as f64 / 1024.0 * 100.0).round() / 100.0
}

/// Uppercased format name for a decoded image ("PNG", "JPEG", ...).
fn format_name(format: ImageFormat) -> String {
    match format {
        ImageFormat::Png => "PNG".to_string(),
        ImageFormat::Jpeg => "JPEG".to_string(),
        ImageFormat::Gif => "GIF".to_string(),
        ImageFormat::Bmp => "BMP".to_string(),
        ImageFormat::WebP => "WEBP".to_string(),
        ImageFormat::Tiff => "TIFF".to_string(),
        other => other
            .extensions_str()
            .first()
            .map(|ext| ext.to_ascii_uppercase())
            .unwrap_or_else(|| "UNKNOWN".to_string()),
    }
}

/// Short color mode name for a decoded color type, as exposed in records.
fn mode_name(color: ColorType) -> &'static str {
    match color {
        ColorType::L8 | ColorType::L16 => "L",
        ColorType::La8 | ColorType::La16 => "LA",
        ColorType::Rgb8 | ColorType::Rgb16 | ColorType::Rgb32F => "RGB",
        ColorType::Rgba8 | ColorType::Rgba16 | ColorType::Rgba32F => "RGBA",
        _ => "RGB",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    fn write_png(dir: &Path, name: &str, width: u32, height: u32) -> std::path::PathBuf {
        let path = dir.join(name);
        let img = RgbImage::from_fn(width, height, |x, y| {
            image::Rgb([(x % 256) as u8, (y % 256) as u8, 0])
        });
        img.save_with_format(&path, ImageFormat::Png).unwrap();
        path
    }

    #[test]
    fn inspect_reports_dimensions_format_and_mode() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), "sample.png", 64, 48);

        let info = inspect(&path).expect("png should inspect");
        assert_eq!(info.dimensions.width, 64);
        assert_eq!(info.dimensions.height, 48);
        assert_eq!(info.format, "PNG");
        assert_eq!(info.mode, "RGB");
        assert_eq!(info.size_bytes, std::fs::metadata(&path).unwrap().len());
        assert_eq!(info.size_kb, round_kb(info.size_bytes));
    }

    #[test]
    fn inspect_returns_none_for_non_image_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("not-an-image.png");
        std::fs::write(&path, b"definitely not pixels").unwrap();

        assert!(inspect(&path).is_none());
    }

    #[test]
    fn inspect_returns_none_for_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(inspect(&dir.path().join("absent.png")).is_none());
    }

    #[test]
    fn size_kb_rounds_to_two_decimals() {
        assert_eq!(round_kb(1024), 1.0);
        assert_eq!(round_kb(1536), 1.5);
        assert_eq!(round_kb(1000), 0.98);
        assert_eq!(round_kb(0), 0.0);
    }
}
