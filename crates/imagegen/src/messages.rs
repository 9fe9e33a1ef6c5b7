//! JSON bodies exchanged with the image-edit endpoint.
//!
//! Success: `{ "data": [ { "b64_json": "..." } ] }`.
//! Failure: `{ "message": "..." }`, best effort; any other body falls
//! back to a generic status message.

use serde::Deserialize;

/// Multipart field names and fixed values of an edit request.
pub const FIELD_IMAGE: &str = "image";
pub const FIELD_PROMPT: &str = "prompt";
pub const FIELD_MODEL: &str = "model";
pub const FIELD_COUNT: &str = "n";
pub const FIELD_RESPONSE_FORMAT: &str = "response_format";

/// Number of images requested per call.
pub const IMAGE_COUNT: &str = "1";

/// Ask for the image inline as base64 rather than as a URL.
pub const RESPONSE_FORMAT_B64: &str = "b64_json";

/// Message used when a success response carries no image.
pub const NO_IMAGE_DATA: &str = "no image data found";

/// Body of a successful edit response.
#[derive(Debug, Deserialize)]
pub struct EditResponse {
    #[serde(default)]
    pub data: Vec<EditImageData>,
}

/// One generated image in an [`EditResponse`].
#[derive(Debug, Deserialize)]
pub struct EditImageData {
    pub b64_json: Option<String>,
}

/// Body of an error response.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub message: Option<String>,
}

/// Human-readable message for a non-success response.
///
/// Uses the body's `message` field when the body is JSON and has one,
/// otherwise `API Error: <status>`.
pub fn error_message(status: u16, body: &[u8]) -> String {
    serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| format!("API Error: {status}"))
}

/// Pull `data[0].b64_json` out of a success body.
///
/// Returns `None` when the body is not JSON or the field is absent or
/// empty.
pub fn first_image_b64(body: &[u8]) -> Option<String> {
    let parsed: EditResponse = serde_json::from_slice(body).ok()?;
    parsed
        .data
        .into_iter()
        .next()
        .and_then(|d| d.b64_json)
        .filter(|b64| !b64.is_empty())
}
