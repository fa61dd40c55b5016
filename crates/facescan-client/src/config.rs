//! Client configuration, loaded from environment variables.

/// Default backend address; the inference backend serves on port 8000.
const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the inference backend, without a trailing slash.
    pub base_url: String,
}

impl Config {
    /// Load configuration from `FACESCAN_*` environment variables with
    /// defaults.
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("FACESCAN_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_owned());
        Self::with_base_url(base_url)
    }

    /// Build a config for an explicit backend address.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { base_url }
    }
}
