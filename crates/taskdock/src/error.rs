use thiserror::Error;

/// Failures crossing the backend boundary.
///
/// The gateway neither retries nor suppresses; callers decide whether a
/// failure is alert-worthy (login, create) or a silently skipped poll tick.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Network-level failure, a non-2xx status, or a body that was not JSON.
    #[error("backend request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// A 2xx body that did not match the expected shape.
    #[error("malformed backend reply: {0}")]
    Decode(#[from] serde_json::Error),

    /// The backend answered with an error body instead of a result.
    #[error("backend rejected request: {0}")]
    Rejected(String),
}
