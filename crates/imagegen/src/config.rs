use stager_core::error::CoreError;

/// Default image-edit endpoint.
pub const DEFAULT_API_URL: &str = "https://api.youware.com/public/v1/ai/images/edits";

/// Default model identifier sent with every request.
pub const DEFAULT_MODEL: &str = "nano-banana";

/// Connection settings for the image-edit endpoint.
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    /// Full URL of the edit endpoint.
    pub api_url: String,
    /// Bearer token sent in the `Authorization` header.
    pub api_key: String,
    /// Value of the `model` form field.
    pub model: String,
}

impl GenerationConfig {
    pub fn new(api_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var          | Default                                               |
    /// |------------------|-------------------------------------------------------|
    /// | `STAGER_API_URL` | `https://api.youware.com/public/v1/ai/images/edits`   |
    /// | `STAGER_API_KEY` | *(required)*                                          |
    /// | `STAGER_MODEL`   | `nano-banana`                                         |
    pub fn from_env() -> Result<Self, CoreError> {
        let api_url = std::env::var("STAGER_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.into());

        let api_key = std::env::var("STAGER_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| CoreError::Config("STAGER_API_KEY must be set".to_string()))?;

        let model = std::env::var("STAGER_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.into());

        Ok(Self {
            api_url,
            api_key,
            model,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_uses_default_model() {
        let config = GenerationConfig::new("http://localhost/edits", "key");
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.api_url, "http://localhost/edits");
    }

    #[test]
    fn with_model_overrides_default() {
        let config = GenerationConfig::new(DEFAULT_API_URL, "key").with_model("other-model");
        assert_eq!(config.model, "other-model");
    }
}
