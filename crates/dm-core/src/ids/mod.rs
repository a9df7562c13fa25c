mod booking_id;
mod id_macro;
mod user_id;

pub use booking_id::BookingId;
pub use user_id::UserId;
