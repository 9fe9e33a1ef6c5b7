//! Source image intake and validation.
//!
//! Every way of supplying an image (file path, drag-and-drop payload,
//! camera capture) normalizes to a [`SourceImage`] before it reaches
//! [`validate`]. Validation is a pure predicate over the image metadata;
//! the pixel data is not decoded here.

use std::path::Path;

use crate::types::{MEDIA_TYPE_JPEG, MEDIA_TYPE_PNG, MIB};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum accepted upload size in megabytes.
pub const MAX_SOURCE_SIZE_MB: u64 = 10;

/// Maximum accepted upload size in bytes (10 MiB).
pub const MAX_SOURCE_BYTES: u64 = MAX_SOURCE_SIZE_MB * MIB;

/// Non-standard JPEG alias some capture sources declare.
pub const MEDIA_TYPE_JPG_ALIAS: &str = "image/jpg";

/// Media types accepted by the furniture workflow.
pub const FURNITURE_MEDIA_TYPES: &[&str] = &[MEDIA_TYPE_JPEG, MEDIA_TYPE_PNG];

/// Media types accepted by the motif workflow.
pub const MOTIF_MEDIA_TYPES: &[&str] = &[MEDIA_TYPE_JPEG, MEDIA_TYPE_JPG_ALIAS, MEDIA_TYPE_PNG];

/// File extensions recognized as supported images.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

// ---------------------------------------------------------------------------
// Source image
// ---------------------------------------------------------------------------

/// A user-supplied image exactly as received: raw bytes plus the media
/// type the intake source declared.
///
/// Immutable once accepted. Compression always starts from this value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceImage {
    bytes: Vec<u8>,
    media_type: String,
    file_name: Option<String>,
}

impl SourceImage {
    pub fn new(bytes: Vec<u8>, media_type: impl Into<String>) -> Self {
        Self {
            bytes,
            media_type: media_type.into(),
            file_name: None,
        }
    }

    /// Attach the original file name (used for the upload part name).
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    pub fn byte_len(&self) -> u64 {
        self.bytes.len() as u64
    }
}

// ---------------------------------------------------------------------------
// Policy
// ---------------------------------------------------------------------------

/// Size and type constraints applied by [`validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntakePolicy {
    pub max_bytes: u64,
    pub allowed_media_types: &'static [&'static str],
}

impl IntakePolicy {
    /// JPEG and PNG, up to 10 MiB.
    pub fn furniture() -> Self {
        Self {
            max_bytes: MAX_SOURCE_BYTES,
            allowed_media_types: FURNITURE_MEDIA_TYPES,
        }
    }

    /// Same as [`furniture`](Self::furniture) but also accepts the
    /// `image/jpg` alias.
    pub fn motif() -> Self {
        Self {
            max_bytes: MAX_SOURCE_BYTES,
            allowed_media_types: MOTIF_MEDIA_TYPES,
        }
    }

    pub fn allows(&self, media_type: &str) -> bool {
        self.allowed_media_types.contains(&media_type)
    }
}

impl Default for IntakePolicy {
    fn default() -> Self {
        Self::furniture()
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Why a candidate file was rejected. The `Display` output is meant to
/// be shown to the user as-is.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RejectionReason {
    #[error("No file selected")]
    Missing,

    #[error("File is too large ({}). Choose a file of {} or less.", display_size(.size_bytes), display_size(.max_bytes))]
    Oversize { size_bytes: u64, max_bytes: u64 },

    #[error("Unsupported file type (got {}). Choose a JPG or PNG image.", display_media_type(.declared))]
    UnsupportedType { declared: String },

    #[error("File is empty. Choose a valid image file.")]
    Empty,
}

fn display_size(bytes: &u64) -> String {
    format_file_size(*bytes)
}

fn display_media_type(declared: &str) -> &str {
    if declared.trim().is_empty() {
        "unknown"
    } else {
        declared
    }
}

/// Check a candidate file against `policy`.
///
/// Checks run in a fixed order and stop at the first failure:
/// presence, size ceiling, media type, non-empty.
pub fn validate(file: Option<&SourceImage>, policy: &IntakePolicy) -> Result<(), RejectionReason> {
    let file = file.ok_or(RejectionReason::Missing)?;

    let size = file.byte_len();
    if size > policy.max_bytes {
        return Err(RejectionReason::Oversize {
            size_bytes: size,
            max_bytes: policy.max_bytes,
        });
    }

    if !policy.allows(file.media_type()) {
        return Err(RejectionReason::UnsupportedType {
            declared: file.media_type().to_string(),
        });
    }

    if size == 0 {
        return Err(RejectionReason::Empty);
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Whether `file_name` ends in one of [`SUPPORTED_EXTENSIONS`]
/// (case-insensitive).
pub fn has_valid_extension(file_name: &str) -> bool {
    extension_of(file_name)
        .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

/// Declared media type for a file on disk, derived from its extension.
///
/// Returns an empty string for unknown extensions so that validation
/// reports the file as an unsupported type.
pub fn media_type_for_path(path: &Path) -> &'static str {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    match extension_of(name).as_deref() {
        Some("jpg") | Some("jpeg") => MEDIA_TYPE_JPEG,
        Some("png") => MEDIA_TYPE_PNG,
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        _ => "",
    }
}

fn extension_of(file_name: &str) -> Option<String> {
    let (_, ext) = file_name.rsplit_once('.')?;
    Some(ext.to_ascii_lowercase())
}

/// Human-readable byte size, e.g. `"0 B"`, `"512.00 B"`, `"2.50 MB"`.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }

    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.2} {}", UNITS[unit])
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
