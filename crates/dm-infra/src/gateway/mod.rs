//! REST client for the hosted backend (auth + record storage).

mod http;

pub use http::HostedBackendClient;
