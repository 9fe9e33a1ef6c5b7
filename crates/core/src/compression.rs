//! Upload normalization: re-encode a source image as a bounded JPEG.
//!
//! [`compress`] never fails outright. When re-encoding is impossible it
//! hands back the untouched source wrapped in
//! [`CompressionOutcome::FallbackUnmodified`] so the caller can decide
//! whether to warn about the upload size.

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};

use crate::intake::SourceImage;
use crate::types::{MEDIA_TYPE_JPEG, MIB};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum compressed upload size (5 MiB).
pub const DEFAULT_MAX_BYTES: u64 = 5 * MIB;

/// Maximum pixel length of the longer edge after compression.
pub const DEFAULT_MAX_LONG_EDGE: u32 = 2048;

/// JPEG quality on the encoder's 1-100 scale (0.8).
pub const DEFAULT_QUALITY: u8 = 80;

/// Factor applied to the long edge on each shrink step when the encoded
/// output is still over the byte ceiling.
const SHRINK_FACTOR: f64 = 0.75;

/// Smallest long edge the shrink loop will try before giving up.
pub const MIN_LONG_EDGE: u32 = 256;

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Ceilings and codec parameters for [`compress`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressionSettings {
    pub max_bytes: u64,
    pub max_long_edge: u32,
    pub quality: u8,
}

impl Default for CompressionSettings {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_BYTES,
            max_long_edge: DEFAULT_MAX_LONG_EDGE,
            quality: DEFAULT_QUALITY,
        }
    }
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// An upload-ready image derived from a [`SourceImage`].
///
/// Owned by the single request it was produced for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressedImage {
    bytes: Vec<u8>,
    media_type: String,
    file_name: String,
    dimensions: Option<(u32, u32)>,
}

impl CompressedImage {
    /// An already-encoded upload whose dimensions are unknown.
    pub fn new(bytes: Vec<u8>, media_type: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            bytes,
            media_type: media_type.into(),
            file_name: file_name.into(),
            dimensions: None,
        }
    }

    /// Wrap the source bytes unchanged (used when re-encoding fails).
    fn passthrough(source: &SourceImage) -> Self {
        let file_name = source
            .file_name()
            .map(str::to_string)
            .unwrap_or_else(|| format!("image.{}", extension_for(source.media_type())));
        Self {
            bytes: source.bytes().to_vec(),
            media_type: source.media_type().to_string(),
            file_name,
            dimensions: None,
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    /// File name used for the multipart upload part.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Pixel dimensions, known only when the image was re-encoded.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.dimensions
    }

    pub fn byte_len(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Why re-encoding could not produce an image within the ceilings.
#[derive(Debug, thiserror::Error)]
pub enum CompressionError {
    #[error("Image codec error: {0}")]
    Codec(#[from] image::ImageError),

    #[error("Encoded image is {bytes} bytes at {long_edge}px, still above the {max_bytes} byte limit")]
    CannotFit {
        bytes: u64,
        long_edge: u32,
        max_bytes: u64,
    },
}

/// Result of [`compress`]: either a re-encoded image or the untouched
/// source together with the reason compression was skipped.
#[derive(Debug)]
pub enum CompressionOutcome {
    Compressed(CompressedImage),
    FallbackUnmodified {
        image: CompressedImage,
        reason: CompressionError,
    },
}

impl CompressionOutcome {
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::FallbackUnmodified { .. })
    }

    pub fn image(&self) -> &CompressedImage {
        match self {
            Self::Compressed(image) | Self::FallbackUnmodified { image, .. } => image,
        }
    }

    /// The uploadable artifact, whichever branch produced it.
    pub fn into_image(self) -> CompressedImage {
        match self {
            Self::Compressed(image) | Self::FallbackUnmodified { image, .. } => image,
        }
    }
}

// ---------------------------------------------------------------------------
// Compression
// ---------------------------------------------------------------------------

/// Re-encode `source` as JPEG within the size and dimension ceilings.
///
/// The long edge is first capped at `max_long_edge`. If the encoded
/// output still exceeds `max_bytes`, the long edge keeps shrinking at
/// the configured quality until it fits or reaches [`MIN_LONG_EDGE`].
pub fn compress(source: &SourceImage, settings: &CompressionSettings) -> CompressionOutcome {
    match try_compress(source, settings) {
        Ok(image) => {
            tracing::debug!(
                original_bytes = source.byte_len(),
                compressed_bytes = image.byte_len(),
                dimensions = ?image.dimensions(),
                "Image compressed",
            );
            CompressionOutcome::Compressed(image)
        }
        Err(reason) => {
            tracing::warn!(
                original_bytes = source.byte_len(),
                error = %reason,
                "Compression failed, uploading original image",
            );
            CompressionOutcome::FallbackUnmodified {
                image: CompressedImage::passthrough(source),
                reason,
            }
        }
    }
}

fn try_compress(
    source: &SourceImage,
    settings: &CompressionSettings,
) -> Result<CompressedImage, CompressionError> {
    let decoded = image::load_from_memory(source.bytes())?;
    let (width, height) = decoded.dimensions();
    let mut long_edge = width.max(height).min(settings.max_long_edge).max(1);

    loop {
        let resized = fit_long_edge(&decoded, long_edge);
        let bytes = encode_jpeg(&resized, settings.quality)?;
        let size = bytes.len() as u64;

        if size <= settings.max_bytes {
            return Ok(CompressedImage {
                bytes,
                media_type: MEDIA_TYPE_JPEG.to_string(),
                file_name: jpeg_file_name(source.file_name()),
                dimensions: Some(resized.dimensions()),
            });
        }

        if long_edge <= MIN_LONG_EDGE {
            return Err(CompressionError::CannotFit {
                bytes: size,
                long_edge,
                max_bytes: settings.max_bytes,
            });
        }

        long_edge = ((long_edge as f64 * SHRINK_FACTOR) as u32).max(MIN_LONG_EDGE);
        tracing::debug!(bytes = size, next_long_edge = long_edge, "Output over size limit, shrinking");
    }
}

/// Downscale so the longer edge is at most `long_edge`, keeping the
/// aspect ratio. Images already within bounds are returned as-is.
fn fit_long_edge(image: &DynamicImage, long_edge: u32) -> DynamicImage {
    let (width, height) = image.dimensions();
    if width.max(height) <= long_edge {
        return image.clone();
    }
    image.resize(long_edge, long_edge, FilterType::Lanczos3)
}

fn encode_jpeg(image: &DynamicImage, quality: u8) -> Result<Vec<u8>, image::ImageError> {
    // JPEG has no alpha channel.
    let rgb = image.to_rgb8();
    let mut buf = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut buf, quality);
    encoder.encode_image(&rgb)?;
    Ok(buf)
}

fn jpeg_file_name(original: Option<&str>) -> String {
    let stem = original
        .and_then(|name| name.rsplit_once('.').map(|(stem, _)| stem).or(Some(name)))
        .filter(|stem| !stem.is_empty())
        .unwrap_or("image");
    format!("{stem}.jpg")
}

fn extension_for(media_type: &str) -> &'static str {
    match media_type {
        "image/png" => "png",
        "image/webp" => "webp",
        _ => "jpg",
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
