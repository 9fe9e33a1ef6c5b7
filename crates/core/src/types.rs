/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Media type attached to every image returned by the generation endpoint.
pub const MEDIA_TYPE_PNG: &str = "image/png";

/// Media type produced by the compressor.
pub const MEDIA_TYPE_JPEG: &str = "image/jpeg";

/// Number of bytes in one mebibyte.
pub const MIB: u64 = 1024 * 1024;
