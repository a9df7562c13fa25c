//! Booking records as stored in the hosted `bookings` table.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{BookingId, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Assigned,
    InProgress,
    Confirmed,
    Completed,
    Cancelled,
}

impl BookingStatus {
    pub const ALL: [BookingStatus; 6] = [
        Self::Pending,
        Self::Assigned,
        Self::InProgress,
        Self::Confirmed,
        Self::Completed,
        Self::Cancelled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Assigned => "assigned",
            Self::InProgress => "in_progress",
            Self::Confirmed => "confirmed",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A row of the remote `bookings` table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookingRecord {
    pub id: BookingId,
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub customer_phone: String,
    pub driver_id: Option<UserId>,
    pub driver_name: Option<String>,
    #[serde(default)]
    pub service_type: String,
    pub trip_type: Option<String>,
    #[serde(default)]
    pub pickup_location: String,
    pub destination: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub vehicle_type: Option<String>,
    pub status: BookingStatus,
    pub amount: Option<i64>,
    pub created_at: Option<DateTime<Utc>>,
}

impl Default for BookingStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl BookingRecord {
    /// Case-insensitive match over customer name, booking id and phone.
    /// An empty query matches everything.
    pub fn matches_search(&self, query: &str) -> bool {
        if query.is_empty() {
            return true;
        }
        let query = query.to_lowercase();
        self.customer_name.to_lowercase().contains(&query)
            || self.id.as_str().to_lowercase().contains(&query)
            || self.customer_phone.contains(&query)
    }
}
