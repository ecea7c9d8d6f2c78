use std::time::Duration;

use thiserror::Error;

/// Why one acquisition attempt failed. The controller collapses every
/// variant into a single user-facing banner; the concrete cause is logged.
#[derive(Debug, Error)]
pub enum AcquireError {
    #[error("metadata service returned no payload")]
    NoPayload,
    #[error("metadata payload did not match the expected schema: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("metadata request timed out after {0:?}")]
    TimedOut(Duration),
    #[error("metadata service returned HTTP {0}")]
    Status(reqwest::StatusCode),
    #[error("metadata request failed: {0}")]
    Http(reqwest::Error),
}
