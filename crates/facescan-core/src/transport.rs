//! Transport failure triage.
//!
//! The backend has no structured transport-error protocol, so raised errors
//! are triaged by known substrings from the underlying network stack. This
//! is a best-effort heuristic, not an exhaustive taxonomy: first match wins,
//! and anything unmatched stays `Unknown` rather than guessing a finer
//! category.

use thiserror::Error;

/// Category of a failure occurring before or during the network exchange,
/// independent of backend semantics.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportFailure {
    /// The backend took too long to answer.
    #[error("backend timed out; retry once it is less busy")]
    Timeout,
    /// The backend could not be reached at all.
    #[error("cannot reach the backend; check that it is running and on the same network")]
    Unreachable,
    /// The connection dropped mid-exchange.
    #[error("connection lost mid-transfer; retry, or restart the backend")]
    ConnectionLost,
    /// Anything the known substrings do not cover.
    #[error("{raw}")]
    Unknown { raw: String },
}

/// Classify a raised transport error by its message text. First match wins.
pub fn classify(message: &str) -> TransportFailure {
    if message.contains("timeout") {
        TransportFailure::Timeout
    } else if message.contains("Network request failed") {
        TransportFailure::Unreachable
    } else if message.contains("connection was lost") {
        TransportFailure::ConnectionLost
    } else {
        TransportFailure::Unknown {
            raw: message.to_owned(),
        }
    }
}
