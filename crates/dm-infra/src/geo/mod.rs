//! Geocoding over the OpenStreetMap Nominatim HTTP API.

mod nominatim;

pub use nominatim::NominatimClient;
