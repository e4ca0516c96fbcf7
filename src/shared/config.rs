//! Application configuration. API credentials, models, paths.

use serde::Deserialize;
use tracing::warn;

/// Default root of the Generative Language REST API.
pub const DEFAULT_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default model for posts, refinement and ideas.
pub const DEFAULT_TEXT_MODEL: &str = "gemini-2.5-flash";

#[derive(Debug, Deserialize, Default)]
pub struct AppConfig {
    /// Gemini API key. Read from POSTX_API_KEY, falling back to GEMINI_API_KEY.
    #[serde(default)]
    pub api_key: Option<String>,

    /// API root. Read from POSTX_API_BASE_URL.
    #[serde(default)]
    pub api_base_url: Option<String>,

    /// Text model name. Read from POSTX_TEXT_MODEL.
    #[serde(default)]
    pub text_model: Option<String>,

    /// Directory holding the history store. Read from POSTX_DATA_DIR.
    #[serde(default)]
    pub data_dir: Option<String>,

    /// Per-request timeout in seconds (image calls can be slow). Read from POSTX_REQUEST_TIMEOUT_SECS.
    /// Kept as text; a malformed value falls back to the default instead of failing the whole config.
    #[serde(default)]
    pub request_timeout_secs: Option<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenv::dotenv().ok();
        let mut c = config::Config::builder();
        c = c.add_source(config::Environment::with_prefix("POSTX"));
        if let Ok(path) = std::env::var("POSTX_CONFIG") {
            c = c.add_source(config::File::with_name(&path));
        }
        c.build()?.try_deserialize()
    }

    /// Returns the API key from config, POSTX_API_KEY or GEMINI_API_KEY. Blank keys count as unset.
    pub fn api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| {
                std::env::var("GEMINI_API_KEY")
                    .ok()
                    .filter(|k| !k.trim().is_empty())
            })
    }

    pub fn api_base_url_or_default(&self) -> String {
        self.api_base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string())
    }

    pub fn text_model_or_default(&self) -> String {
        self.text_model
            .clone()
            .unwrap_or_else(|| DEFAULT_TEXT_MODEL.to_string())
    }

    /// Defaults to ./data.
    pub fn data_dir_or_default(&self) -> String {
        self.data_dir.clone().unwrap_or_else(|| "./data".to_string())
    }

    /// Defaults to 90 seconds, also when the configured value is not a positive integer.
    pub fn request_timeout_secs_or_default(&self) -> u64 {
        match self.request_timeout_secs.as_deref().map(str::trim) {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    warn!(value = raw, "invalid request timeout, using 90s");
                    90
                }
            },
            None => 90,
        }
    }
}
