//! Service configuration
//!
//! Defaults can be overridden with `INVENTORY_*` environment variables,
//! e.g. `INVENTORY_BIND_ADDRESS=127.0.0.1:8080`.

use anyhow::{Result, ensure};
use ::config::{Config, Environment};
use serde::Deserialize;

/// HTTP and session settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Address the HTTP server listens on
    pub bind_address: String,
    /// Name of the cookie carrying the session identifier
    pub session_cookie: String,
    /// Session lifetime in seconds
    pub session_ttl_seconds: u64,
    /// Mark the session cookie `Secure`
    pub secure_cookies: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
            session_cookie: "inventory_sid".to_string(),
            session_ttl_seconds: 86_400,
            secure_cookies: false,
        }
    }
}

impl AppConfig {
    /// Load the configuration from defaults and the environment
    pub fn load() -> Result<Self> {
        let defaults = Self::default();

        let config: Self = Config::builder()
            .set_default("bind_address", defaults.bind_address)?
            .set_default("session_cookie", defaults.session_cookie)?
            .set_default("session_ttl_seconds", defaults.session_ttl_seconds as i64)?
            .set_default("secure_cookies", defaults.secure_cookies)?
            .add_source(Environment::with_prefix("INVENTORY").try_parsing(true))
            .build()?
            .try_deserialize()?;

        ensure!(
            config.session_ttl_seconds > 0,
            "INVENTORY_SESSION_TTL_SECONDS must be greater than zero"
        );
        ensure!(
            !config.session_cookie.is_empty(),
            "INVENTORY_SESSION_COOKIE must not be empty"
        );

        Ok(config)
    }
}
