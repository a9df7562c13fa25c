//! Coordinates and geocoding results.

use serde::{Deserialize, Serialize};

/// Fallback map center when no device position is available.
pub const DEFAULT_CENTER: GeoPoint = GeoPoint {
    lat: 13.0827,
    lng: 80.2707,
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

/// Best-match result of a forward geocoding lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoMatch {
    pub address: String,
    pub point: GeoPoint,
}
