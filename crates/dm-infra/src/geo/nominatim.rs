use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use dm_core::errors::GatewayError;
use dm_core::geo::{GeoMatch, GeoPoint};
use dm_core::ports::GeocoderPort;

use crate::config::GeocoderConfig;

const REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Deserialize)]
struct ReverseResponse {
    display_name: Option<String>,
}

/// Search hits carry coordinates as strings.
#[derive(Debug, Deserialize)]
struct SearchHit {
    display_name: String,
    lat: String,
    lon: String,
}

/// Nominatim client. Lookups are best-effort: an unparsable or empty
/// answer is `Ok(None)` so callers can silently leave their display
/// unchanged; only transport failures surface as errors.
pub struct NominatimClient {
    http: reqwest::Client,
    base_url: String,
}

impl NominatimClient {
    pub fn new(config: &GeocoderConfig) -> anyhow::Result<Self> {
        // The provider's usage policy requires an identifying user agent.
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }
}

fn transport(err: reqwest::Error) -> GatewayError {
    GatewayError::Transport(err.to_string())
}

#[async_trait]
impl GeocoderPort for NominatimClient {
    async fn reverse(&self, point: GeoPoint) -> Result<Option<String>, GatewayError> {
        let response = self
            .http
            .get(format!("{}/reverse", self.base_url))
            .query(&[
                ("format", "json".to_string()),
                ("lat", point.lat.to_string()),
                ("lon", point.lng.to_string()),
                ("addressdetails", "1".to_string()),
            ])
            .send()
            .await
            .map_err(transport)?;
        if !response.status().is_success() {
            return Ok(None);
        }

        let parsed: Result<ReverseResponse, _> = response.json().await;
        Ok(parsed.ok().and_then(|r| r.display_name))
    }

    async fn search(&self, query: &str) -> Result<Option<GeoMatch>, GatewayError> {
        let response = self
            .http
            .get(format!("{}/search", self.base_url))
            .query(&[("format", "json"), ("q", query), ("limit", "1")])
            .send()
            .await
            .map_err(transport)?;
        if !response.status().is_success() {
            return Ok(None);
        }

        let hits: Vec<SearchHit> = match response.json().await {
            Ok(hits) => hits,
            Err(_) => return Ok(None),
        };
        let Some(hit) = hits.into_iter().next() else {
            return Ok(None);
        };
        let (Ok(lat), Ok(lng)) = (hit.lat.parse::<f64>(), hit.lon.parse::<f64>()) else {
            return Ok(None);
        };
        debug!(address = %hit.display_name, "geocode hit");
        Ok(Some(GeoMatch {
            address: hit.display_name,
            point: GeoPoint { lat, lng },
        }))
    }
}
