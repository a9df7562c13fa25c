use async_trait::async_trait;

use crate::errors::GatewayError;
use crate::geo::{GeoMatch, GeoPoint};

/// Best-effort geocoding lookups. A missing match is `Ok(None)`, not an
/// error; callers are free to ignore failures entirely.
#[async_trait]
pub trait GeocoderPort: Send + Sync {
    /// Coordinates to a free-text address.
    async fn reverse(&self, point: GeoPoint) -> Result<Option<String>, GatewayError>;

    /// Free-text query to the best matching location.
    async fn search(&self, query: &str) -> Result<Option<GeoMatch>, GatewayError>;
}
