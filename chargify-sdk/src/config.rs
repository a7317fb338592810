//! Configuration for the v2 API client.
//!
//! These types are designed to be deserialized from TOML/YAML/JSON files or
//! built from environment variables.

use std::env;
use std::fmt;
use std::time::Duration;

use ::config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::direct::DirectSigner;
use crate::error::{ChargifyError, ChargifyResult};

/// Production base URL of the v2 API.
pub const DEFAULT_BASE_URL: &str = "https://api.chargify.com/api/v2/";

/// Credentials and transport settings for [`crate::ChargifyV2`].
///
/// `api_id` is safe to expose publicly (it is rendered into Direct forms);
/// `api_password` and `api_secret` must stay server-side and are redacted
/// from `Debug` output.
#[derive(Clone, Serialize, Deserialize)]
pub struct V2Config {
    /// Public API id
    pub api_id: String,
    /// API password used for basic authentication
    pub api_password: String,
    /// Shared secret used for Direct signatures
    pub api_secret: String,
    /// Base URL for all requests
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// `User-Agent` header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_user_agent() -> String {
    format!(
        "chargify-sdk-rs/{} (https://github.com/chargely/chargify-sdk-rs)",
        env!("CARGO_PKG_VERSION")
    )
}

impl fmt::Debug for V2Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("V2Config")
            .field("api_id", &self.api_id)
            .field("api_password", &"<redacted>")
            .field("api_secret", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout_ms", &self.timeout_ms)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl V2Config {
    /// Create a configuration with default base URL, timeout and user agent.
    pub fn new(
        api_id: impl Into<String>,
        api_password: impl Into<String>,
        api_secret: impl Into<String>,
    ) -> Self {
        Self {
            api_id: api_id.into(),
            api_password: api_password.into(),
            api_secret: api_secret.into(),
            base_url: default_base_url(),
            timeout_ms: default_timeout_ms(),
            user_agent: default_user_agent(),
        }
    }

    /// Override the base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the request timeout.
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Returns the request timeout as a Duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Create a configuration from environment variables.
    ///
    /// Reads `CHARGIFY_API_ID`, `CHARGIFY_API_PASSWORD`, `CHARGIFY_API_SECRET`
    /// and, optionally, `CHARGIFY_BASE_URL`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if a required variable is not set.
    pub fn from_env() -> ChargifyResult<Self> {
        let var = |name: &str| {
            env::var(name).map_err(|_| ChargifyError::Configuration(format!("{} is not set", name)))
        };

        let mut config = Self::new(
            var("CHARGIFY_API_ID")?,
            var("CHARGIFY_API_PASSWORD")?,
            var("CHARGIFY_API_SECRET")?,
        );
        if let Ok(base_url) = env::var("CHARGIFY_BASE_URL") {
            config.base_url = base_url;
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from an optional file plus environment overrides.
    ///
    /// Sources, later ones winning:
    /// 1. `path` (any format supported by the `config` crate), if it exists
    /// 2. Environment variables prefixed `CHARGIFY__` (e.g. `CHARGIFY__API_SECRET`)
    pub fn load(path: &str) -> ChargifyResult<Self> {
        let settings = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(Environment::with_prefix("CHARGIFY").separator("__"))
            .build()
            .map_err(|e| ChargifyError::Configuration(e.to_string()))?;

        let config: Self = settings
            .try_deserialize()
            .map_err(|e| ChargifyError::Configuration(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Check that credentials are present and the base URL is usable.
    pub fn validate(&self) -> ChargifyResult<()> {
        for (field, value) in [
            ("api_id", &self.api_id),
            ("api_password", &self.api_password),
            ("api_secret", &self.api_secret),
        ] {
            if value.trim().is_empty() {
                return Err(ChargifyError::Configuration(format!(
                    "{} cannot be empty",
                    field
                )));
            }
        }

        if !(self.base_url.starts_with("https://") || self.base_url.starts_with("http://")) {
            return Err(ChargifyError::Configuration(format!(
                "base_url must be an http(s) URL, got `{}`",
                self.base_url
            )));
        }

        if self.timeout_ms == 0 {
            return Err(ChargifyError::Configuration(
                "timeout_ms must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }

    /// Signer for Direct requests made with these credentials.
    pub fn signer(&self) -> DirectSigner {
        DirectSigner::new(&self.api_id, &self.api_secret)
    }
}
