//! Runtime configuration for the sheetrest service.
//!
//! The configuration is assembled once at startup (environment, then CLI
//! overrides) and passed down by reference; nothing reads configuration from
//! globals afterwards.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SheetRestError};

/// Top-level service configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SheetRestConfig {
    /// HTTP server configuration.
    pub server: ServerConfig,

    /// Google Sheets backend configuration.
    pub google: GoogleConfig,

    /// Cross-origin request configuration.
    pub cors: CorsConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Address to bind (e.g. "0.0.0.0").
    pub host: String,

    /// Port to listen on.
    pub port: u16,
}

/// Google Sheets backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GoogleConfig {
    /// API key used as the read-only fallback credential when a request
    /// carries no access token.
    pub api_key: Option<String>,

    /// Base URL of the Sheets API.
    pub base_url: String,

    /// Per-request timeout in milliseconds.
    pub request_timeout_ms: u64,
}

/// Cross-origin request configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CorsConfig {
    /// Allowed origins; `"*"` permits any origin.
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: String::from("0.0.0.0"),
            port: 8000,
        }
    }
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: String::from("https://sheets.googleapis.com/v4/spreadsheets"),
            request_timeout_ms: 30_000,
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![String::from("*")],
        }
    }
}

impl SheetRestConfig {
    /// Builds a configuration from the process environment.
    ///
    /// # Errors
    /// Returns a configuration error when a numeric variable fails to parse.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(std::env::vars())
    }

    /// Builds a configuration from environment-style name/value pairs.
    ///
    /// Recognized names: `HOST`, `PORT`, `GOOGLE_API_KEY`,
    /// `REQUEST_TIMEOUT_MS`, `ALLOWED_ORIGINS` (comma separated). Other
    /// names are ignored and blank values keep their defaults.
    ///
    /// # Errors
    /// Returns a configuration error when a numeric value fails to parse.
    pub fn from_vars(vars: impl IntoIterator<Item = (String, String)>) -> Result<Self> {
        let mut config = Self::default();

        for (name, value) in vars {
            match name.as_str() {
                "HOST" => {
                    if !value.trim().is_empty() {
                        config.server.host = value;
                    }
                }
                "PORT" => {
                    config.server.port = value.parse().map_err(|_| {
                        SheetRestError::config(format!("PORT must be an integer, got {value:?}"))
                    })?;
                }
                "GOOGLE_API_KEY" => {
                    if !value.trim().is_empty() {
                        config.google.api_key = Some(value);
                    }
                }
                "REQUEST_TIMEOUT_MS" => {
                    config.google.request_timeout_ms = value.parse().map_err(|_| {
                        SheetRestError::config(format!(
                            "REQUEST_TIMEOUT_MS must be an integer, got {value:?}"
                        ))
                    })?;
                }
                "ALLOWED_ORIGINS" => {
                    let origins: Vec<String> = value
                        .split(',')
                        .map(|origin| origin.trim().to_string())
                        .filter(|origin| !origin.is_empty())
                        .collect();
                    if !origins.is_empty() {
                        config.cors.allowed_origins = origins;
                    }
                }
                _ => {}
            }
        }

        Ok(config)
    }

    /// Checks the configuration for values the service cannot run with.
    ///
    /// # Errors
    /// Returns a configuration error describing the first invalid value.
    pub fn validate(&self) -> Result<()> {
        if self.server.host.trim().is_empty() {
            return Err(SheetRestError::config("server host cannot be empty"));
        }
        if !self.google.base_url.starts_with("http://") && !self.google.base_url.starts_with("https://")
        {
            return Err(SheetRestError::config(format!(
                "Google API base URL must be an http(s) URL, got {:?}",
                self.google.base_url
            )));
        }
        if self.google.request_timeout_ms == 0 {
            return Err(SheetRestError::config(
                "request timeout must be greater than 0",
            ));
        }
        if self.cors.allowed_origins.is_empty() {
            return Err(SheetRestError::config(
                "allowed origins cannot be empty; use \"*\" to permit any origin",
            ));
        }
        Ok(())
    }
}
