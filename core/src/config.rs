//! Client configuration.
//!
//! The application id/secret pair is set once when the `Config` is built and
//! is only read afterwards. Missing values are not rejected here: each
//! application-credentialed call checks them and fails with
//! `ApiError::Configuration`, so a client used only with bearer tokens can
//! still be constructed without them.

use std::env;

pub const DEFAULT_BASE_URL: &str = "https://app.rallio.com/api/internal";

pub const BASE_URL_VAR: &str = "RALLIO_BASE_URL";
pub const APPLICATION_ID_VAR: &str = "RALLIO_APPLICATION_ID";
pub const APPLICATION_SECRET_VAR: &str = "RALLIO_APPLICATION_SECRET";

#[derive(Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub base_url: String,
    pub application_id: Option<String>,
    pub application_secret: Option<String>,
}

impl Config {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            application_id: None,
            application_secret: None,
        }
    }

    pub fn with_application(mut self, id: &str, secret: &str) -> Self {
        self.application_id = Some(id.to_string());
        self.application_secret = Some(secret.to_string());
        self
    }

    /// Build a config from `RALLIO_BASE_URL`, `RALLIO_APPLICATION_ID` and
    /// `RALLIO_APPLICATION_SECRET`. The base URL falls back to the public API.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let base_url = lookup(BASE_URL_VAR).unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Self {
            application_id: lookup(APPLICATION_ID_VAR),
            application_secret: lookup(APPLICATION_SECRET_VAR),
            ..Self::new(&base_url)
        }
    }
}

// Hand-written so the secret never ends up in logs.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("base_url", &self.base_url)
            .field("application_id", &self.application_id)
            .field(
                "application_secret",
                &self.application_secret.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}
