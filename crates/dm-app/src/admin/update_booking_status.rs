use std::sync::Arc;

use tracing::info;

use dm_core::booking::BookingStatus;
use dm_core::errors::SessionError;
use dm_core::ids::BookingId;
use dm_core::ports::BookingRepositoryPort;

/// Move a booking through its status enumeration.
pub struct UpdateBookingStatus {
    bookings: Arc<dyn BookingRepositoryPort>,
}

impl UpdateBookingStatus {
    pub fn new(bookings: Arc<dyn BookingRepositoryPort>) -> Self {
        Self { bookings }
    }

    pub async fn execute(
        &self,
        id: &BookingId,
        status: BookingStatus,
    ) -> Result<(), SessionError> {
        self.bookings.update_status(id, status).await?;
        info!(booking = %id, status = %status, "booking status updated");
        Ok(())
    }
}
