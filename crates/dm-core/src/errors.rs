use thiserror::Error;

/// Failure surfaced by a remote gateway call.
///
/// The hosted backend is consumed over HTTP; every call either fails to
/// complete (`Transport`) or completes and is refused (`Rejected`, e.g.
/// invalid credentials or a duplicate account).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// The remote understood the request and refused it.
    #[error("{0}")]
    Rejected(String),

    /// The request could not complete (connect failure, timeout, 5xx).
    #[error("transport error: {0}")]
    Transport(String),
}

/// Session-level error taxonomy.
///
/// `Validation` failures are fully local and never reach the network.
/// `Auth` and `Transport` propagate up from gateway calls; the initiating
/// handler presents them and restores its control to an interactive state.
/// No variant is fatal and no automatic retry is performed anywhere.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("network error: {0}")]
    Transport(String),

    /// An operation required an active identity that is absent.
    #[error("no active session")]
    NoActiveSession,
}

impl From<GatewayError> for SessionError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::Rejected(msg) => Self::Auth(msg),
            GatewayError::Transport(msg) => Self::Transport(msg),
        }
    }
}
