//! Admin dashboard use cases: document review, booking management and the
//! overview aggregates.

mod dashboard;
mod set_driver_online;
mod update_booking_status;
mod verify_document;

pub use dashboard::{filter_bookings, DashboardSnapshot, DashboardStats, LoadDashboard, StatusFilter};
pub use set_driver_online::SetDriverOnline;
pub use update_booking_status::UpdateBookingStatus;
pub use verify_document::VerifyDocument;
