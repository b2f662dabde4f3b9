use super::detection::{detect_image_mime, mime_from_extension};
use crate::config::UploadConfig;
use crate::error::RoastError;
use image::{ImageFormat, ImageReader};
use image::imageops::FilterType;
use std::io::Cursor;

/// Upload ready for storage and analysis.
#[derive(Debug, Clone)]
pub struct PreparedImage {
    pub bytes: Vec<u8>,
    pub mime: String,
    pub width: u32,
    pub height: u32,
    pub resized: bool,
}

/// Metadata the client sent alongside the upload bytes.
#[derive(Debug, Clone, Default)]
pub struct UploadMeta<'a> {
    pub content_type: Option<&'a str>,
    pub filename: Option<&'a str>,
}

/// Validate an uploaded image and downscale it to `max_width` when wider.
///
/// Images at or under the width limit keep their original bytes and are
/// never fully decoded. The decode and resize run on the blocking pool.
pub async fn prepare_upload(
    data: Vec<u8>,
    meta: &UploadMeta<'_>,
    config: &UploadConfig,
) -> Result<PreparedImage, RoastError> {
    let header = inspect_upload(&data, meta, config)?;
    if header.width <= config.max_width {
        return Ok(header.keep(data));
    }

    let max_width = config.max_width;
    tokio::task::spawn_blocking(move || downscale(&data, &header, max_width))
        .await
        .map_err(|error| anyhow::anyhow!("image resize task failed: {error}"))?
}

/// Format and dimensions read from the image header alone.
#[derive(Debug, Clone)]
struct UploadHeader {
    mime: &'static str,
    width: u32,
    height: u32,
}

impl UploadHeader {
    fn keep(self, data: Vec<u8>) -> PreparedImage {
        PreparedImage {
            bytes: data,
            mime: self.mime.to_string(),
            width: self.width,
            height: self.height,
            resized: false,
        }
    }
}

fn inspect_upload(
    data: &[u8],
    meta: &UploadMeta<'_>,
    config: &UploadConfig,
) -> Result<UploadHeader, RoastError> {
    if data.is_empty() {
        return Err(RoastError::validation("No screenshot file provided"));
    }
    if data.len() > config.max_bytes {
        return Err(RoastError::validation(format!(
            "File too large: {} bytes (max {} bytes)",
            data.len(),
            config.max_bytes
        )));
    }

    let declared = meta
        .content_type
        .map(str::trim)
        .filter(|mime| !mime.is_empty() && *mime != "application/octet-stream");
    if declared.is_some_and(|mime| !mime.starts_with("image/")) {
        return Err(RoastError::validation("Only image files are allowed"));
    }

    let mime = detect_image_mime(data)
        .or_else(|| meta.filename.and_then(mime_from_extension))
        .ok_or_else(|| RoastError::validation("Only image files are allowed"))?;

    let (width, height) = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|error| RoastError::validation(format!("Could not read image: {error}")))?
        .into_dimensions()
        .map_err(|error| RoastError::validation(format!("Could not decode image: {error}")))?;

    Ok(UploadHeader {
        mime,
        width,
        height,
    })
}

fn downscale(
    data: &[u8],
    header: &UploadHeader,
    max_width: u32,
) -> Result<PreparedImage, RoastError> {
    let decoded = image::load_from_memory(data)
        .map_err(|error| RoastError::validation(format!("Could not decode image: {error}")))?;

    let target_height = scaled_height(header.width, header.height, max_width);
    let resized = decoded.resize_exact(max_width, target_height, FilterType::Lanczos3);
    let mut out = Cursor::new(Vec::new());
    resized
        .write_to(&mut out, ImageFormat::Png)
        .map_err(|error| anyhow::anyhow!("failed to encode resized image: {error}"))?;

    tracing::debug!(
        from_width = header.width,
        to_width = max_width,
        to_height = target_height,
        "downscaled upload"
    );

    Ok(PreparedImage {
        bytes: out.into_inner(),
        mime: "image/png".to_string(),
        width: max_width,
        height: target_height,
        resized: true,
    })
}

fn scaled_height(width: u32, height: u32, target_width: u32) -> u32 {
    let scaled = (f64::from(height) * f64::from(target_width) / f64::from(width)).round();
    // Clamped to u32 range before the cast.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let scaled = scaled.clamp(1.0, f64::from(u32::MAX)) as u32;
    scaled
}
