//! Client configuration.

/// Environment variable consulted by `ClientConfig::from_env`.
pub const BASE_URL_ENV: &str = "SALON_API_URL";

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Settings injected into `ApiClient` at construction time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend root, e.g. `http://localhost:3000`. A trailing `/` is ignored.
    pub base_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Read `SALON_API_URL`, falling back to the default when unset or blank.
    pub fn from_env() -> Self {
        Self::from_value(std::env::var(BASE_URL_ENV).ok().as_deref())
    }

    fn from_value(url: Option<&str>) -> Self {
        match url.map(str::trim) {
            Some(url) if !url.is_empty() => Self::new(url),
            _ => Self::default(),
        }
    }
}
