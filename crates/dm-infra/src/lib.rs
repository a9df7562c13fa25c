pub mod config;
pub mod gateway;
pub mod geo;
pub mod launcher;
pub mod time;

pub use config::AppConfig;
pub use gateway::HostedBackendClient;
pub use geo::NominatimClient;
pub use launcher::SystemMessageLauncher;
pub use time::SystemClock;
