//! Typed configuration, layered defaults → file → environment.
//!
//! A `drivemate.toml` next to the working directory overrides the built-in
//! defaults; `DRIVEMATE_*` environment variables override both (nested keys
//! with `__`, e.g. `DRIVEMATE_BACKEND__ANON_KEY`).

use std::path::Path;

use anyhow::Context;
use config::{Config, Environment, File};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the hosted backend.
    pub url: String,
    /// Publishable API key sent with every request.
    pub anon_key: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeocoderConfig {
    pub base_url: String,
    /// Identifying user agent, required by the tile provider's usage policy.
    pub user_agent: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BookingConfig {
    /// Business number receiving the booking handoff messages.
    pub whatsapp_number: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub backend: BackendConfig,
    pub geocoder: GeocoderConfig,
    pub booking: BookingConfig,
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        Self::builder()
            .add_source(File::with_name("drivemate").required(false))
            .add_source(Environment::with_prefix("DRIVEMATE").separator("__"))
            .build()
            .context("load configuration")?
            .try_deserialize()
            .context("parse configuration")
    }

    /// Load from an explicit file, for tests and packaged deployments.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        Self::builder()
            .add_source(File::from(path).required(true))
            .build()
            .with_context(|| format!("load configuration from {}", path.display()))?
            .try_deserialize()
            .context("parse configuration")
    }

    fn builder() -> config::builder::ConfigBuilder<config::builder::DefaultState> {
        Config::builder()
            .set_default("backend.url", "http://localhost:54321")
            .expect("valid default")
            .set_default("backend.anon_key", "")
            .expect("valid default")
            .set_default("backend.timeout_secs", 30)
            .expect("valid default")
            .set_default("geocoder.base_url", "https://nominatim.openstreetmap.org")
            .expect("valid default")
            .set_default("geocoder.user_agent", "drivemate/0.1")
            .expect("valid default")
            .set_default("booking.whatsapp_number", "919876543210")
            .expect("valid default")
    }
}
