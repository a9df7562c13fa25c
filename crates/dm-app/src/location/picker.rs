use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::debug;

use dm_core::errors::SessionError;
use dm_core::geo::{GeoPoint, DEFAULT_CENTER};
use dm_core::ports::GeocoderPort;

/// A confirmed pick: free-text address plus coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationSelection {
    pub address: String,
    pub point: GeoPoint,
}

#[derive(Debug, Clone)]
struct PickerState {
    address: String,
    point: GeoPoint,
    busy: bool,
}

/// State behind the map/location dialog.
///
/// Geocoding is best-effort: a failed or empty lookup leaves the current
/// address untouched instead of surfacing an error. The busy flag rejects
/// overlapping searches while one is in flight and is cleared on every
/// path.
pub struct LocationPicker {
    geocoder: Arc<dyn GeocoderPort>,
    state: Mutex<PickerState>,
}

impl LocationPicker {
    pub fn new(geocoder: Arc<dyn GeocoderPort>) -> Self {
        Self {
            geocoder,
            state: Mutex::new(PickerState {
                address: String::new(),
                point: DEFAULT_CENTER,
                busy: false,
            }),
        }
    }

    pub async fn address(&self) -> String {
        self.state.lock().await.address.clone()
    }

    pub async fn point(&self) -> GeoPoint {
        self.state.lock().await.point
    }

    /// Forward-geocode a search query and move the selection to the best
    /// match. Returns whether the selection moved.
    pub async fn search(&self, query: &str) -> Result<bool, SessionError> {
        if query.is_empty() {
            return Ok(false);
        }
        {
            let mut state = self.state.lock().await;
            if state.busy {
                return Ok(false);
            }
            state.busy = true;
        }

        let result = self.geocoder.search(query).await;

        let mut state = self.state.lock().await;
        state.busy = false;
        match result {
            Ok(Some(found)) => {
                debug!(address = %found.address, "search hit");
                state.address = found.address;
                state.point = found.point;
                Ok(true)
            }
            // Best-effort: no hit and lookup failure read the same.
            Ok(None) | Err(_) => Ok(false),
        }
    }

    /// Move the marker (map click, drag, or device position) and fill the
    /// address from a reverse lookup when one is available.
    pub async fn place_marker(&self, point: GeoPoint) {
        {
            let mut state = self.state.lock().await;
            state.point = point;
        }

        if let Ok(Some(address)) = self.geocoder.reverse(point).await {
            let mut state = self.state.lock().await;
            state.address = address;
        }
    }

    /// The selection, only once an address is present.
    pub async fn confirm(&self) -> Option<LocationSelection> {
        let state = self.state.lock().await;
        if state.address.is_empty() {
            return None;
        }
        Some(LocationSelection {
            address: state.address.clone(),
            point: state.point,
        })
    }
}
