//! HTTP client for the image-edit endpoint.
//!
//! Wraps a single `POST` carrying the compressed image and the prompt
//! using [`reqwest`]. One attempt per call: no retry, no timeout beyond
//! the client default, no cancellation.

use async_trait::async_trait;
use base64::engine::general_purpose;
use base64::Engine as _;
use reqwest::multipart::{Form, Part};
use stager_core::compression::CompressedImage;
use stager_core::prompt::Prompt;
use stager_core::types::MEDIA_TYPE_PNG;

use crate::config::GenerationConfig;
use crate::messages::{
    self, FIELD_COUNT, FIELD_IMAGE, FIELD_MODEL, FIELD_PROMPT, FIELD_RESPONSE_FORMAT, IMAGE_COUNT,
    NO_IMAGE_DATA, RESPONSE_FORMAT_B64,
};

/// Decoded image returned by the endpoint. The endpoint always answers
/// with PNG regardless of the uploaded codec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    bytes: Vec<u8>,
}

impl GeneratedImage {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn media_type(&self) -> &'static str {
        MEDIA_TYPE_PNG
    }

    /// `data:image/png;base64,...` form of the image.
    pub fn data_uri(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.media_type(),
            general_purpose::STANDARD.encode(&self.bytes)
        )
    }
}

/// Errors from a single generation call.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The endpoint returned a non-2xx status code.
    #[error("{message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Message from the error body, or `API Error: <status>`.
        message: String,
    },

    /// 2xx response without a usable image payload.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// The prompt was empty; nothing was sent.
    #[error("Prompt is empty; refusing to call the generator")]
    EmptyPrompt,
}

impl GenerationError {
    /// Whether the failure happened on the wire or at the HTTP layer, as
    /// opposed to a response that arrived but was unusable.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Request(_) | Self::Api { .. })
    }
}

/// Anything that can turn a compressed image plus prompt into a
/// generated image.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate(
        &self,
        image: &CompressedImage,
        prompt: &Prompt,
    ) -> Result<GeneratedImage, GenerationError>;
}

/// HTTP client for one image-edit endpoint.
pub struct ImageEditApi {
    client: reqwest::Client,
    config: GenerationConfig,
}

impl ImageEditApi {
    pub fn new(config: GenerationConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Create an API client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, config: GenerationConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Send one edit request and decode the returned image.
    pub async fn edit_image(
        &self,
        image: &CompressedImage,
        prompt: &Prompt,
    ) -> Result<GeneratedImage, GenerationError> {
        if prompt.is_empty() {
            return Err(GenerationError::EmptyPrompt);
        }

        let form = self.build_form(image, prompt)?;

        tracing::info!(
            model = %self.config.model,
            upload_bytes = image.byte_len(),
            prompt_chars = prompt.len(),
            "Sending image edit request",
        );

        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_key)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;
        tracing::debug!(status = status.as_u16(), body_bytes = body.len(), "Image edit response");

        if !status.is_success() {
            return Err(GenerationError::Api {
                status: status.as_u16(),
                message: messages::error_message(status.as_u16(), &body),
            });
        }

        let b64 = messages::first_image_b64(&body)
            .ok_or_else(|| GenerationError::MalformedResponse(NO_IMAGE_DATA.to_string()))?;

        let bytes = general_purpose::STANDARD
            .decode(b64.trim())
            .map_err(|e| GenerationError::MalformedResponse(format!("invalid base64 image: {e}")))?;

        Ok(GeneratedImage::new(bytes))
    }

    // ---- private helpers ----

    fn build_form(&self, image: &CompressedImage, prompt: &Prompt) -> Result<Form, GenerationError> {
        let part = Part::bytes(image.bytes().to_vec())
            .file_name(image.file_name().to_string())
            .mime_str(image.media_type())?;

        Ok(Form::new()
            .part(FIELD_IMAGE, part)
            .text(FIELD_PROMPT, prompt.as_str().to_string())
            .text(FIELD_MODEL, self.config.model.clone())
            .text(FIELD_COUNT, IMAGE_COUNT)
            .text(FIELD_RESPONSE_FORMAT, RESPONSE_FORMAT_B64))
    }
}

#[async_trait]
impl ImageGenerator for ImageEditApi {
    async fn generate(
        &self,
        image: &CompressedImage,
        prompt: &Prompt,
    ) -> Result<GeneratedImage, GenerationError> {
        self.edit_image(image, prompt).await
    }
}
