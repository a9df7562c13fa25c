//! Ports to external collaborators.
//!
//! One async trait per collaborator; implementations live in the
//! infrastructure layer. Use cases depend only on these traits.

mod auth_gateway;
mod bookings;
mod clock;
mod geocoder;
mod launcher;
mod profiles;

pub use auth_gateway::{AuthGatewayPort, SignUpRequest};
pub use bookings::BookingRepositoryPort;
pub use clock::ClockPort;
pub use geocoder::GeocoderPort;
pub use launcher::MessageLauncherPort;
pub use profiles::ProfileRepositoryPort;
