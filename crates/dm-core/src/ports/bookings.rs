use async_trait::async_trait;

use crate::booking::{BookingRecord, BookingStatus};
use crate::errors::GatewayError;
use crate::ids::BookingId;

/// Read/update access to the hosted `bookings` table.
#[async_trait]
pub trait BookingRepositoryPort: Send + Sync {
    /// All booking rows, newest first.
    async fn list(&self) -> Result<Vec<BookingRecord>, GatewayError>;

    async fn update_status(
        &self,
        id: &BookingId,
        status: BookingStatus,
    ) -> Result<(), GatewayError>;
}
