//! The capture session state machine.
//!
//! Single authority over the captured image: at most one image, at most one
//! operation in flight, and the most recent semantic outcome. All mutation
//! goes through the transitions below; nothing else may touch the state.

use thiserror::Error;

use crate::outcome::Outcome;
use crate::types::{CapturedImage, Operation};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// An operation is in flight; capture and retake must not interrupt it.
    #[error("an operation is in flight; wait for it to finish")]
    Busy,
    /// The transition needs a different phase than the session is in.
    #[error("operation not valid in the current session phase")]
    InvalidState,
}

/// Observable phase of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No image held.
    Empty,
    /// Image held, nothing in flight.
    Ready,
    /// Image held and one operation in flight.
    Busy,
}

/// State for one capture-to-outcome workflow.
///
/// Invariant: `in_flight` is true only while an image is held, and
/// `last_outcome` never survives an image change.
#[derive(Debug, Default)]
pub struct CaptureSession {
    image: Option<CapturedImage>,
    in_flight: bool,
    last_outcome: Option<Outcome>,
}

impl CaptureSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        match (&self.image, self.in_flight) {
            (None, _) => Phase::Empty,
            (Some(_), false) => Phase::Ready,
            (Some(_), true) => Phase::Busy,
        }
    }

    pub fn image(&self) -> Option<&CapturedImage> {
        self.image.as_ref()
    }

    pub fn last_outcome(&self) -> Option<&Outcome> {
        self.last_outcome.as_ref()
    }

    /// Hold a new image, replacing any prior one and clearing the recorded
    /// outcome. Rejected while an operation is in flight.
    pub fn capture(&mut self, image: CapturedImage) -> Result<(), SessionError> {
        if self.in_flight {
            return Err(SessionError::Busy);
        }
        tracing::debug!(file = %image.file_name(), "image captured");
        self.image = Some(image);
        self.last_outcome = None;
        Ok(())
    }

    /// Discard the held image and outcome. Rejected while an operation is in
    /// flight; accepted as a no-op when there is nothing to discard.
    pub fn retake(&mut self) -> Result<(), SessionError> {
        if self.in_flight {
            return Err(SessionError::Busy);
        }
        self.image = None;
        self.last_outcome = None;
        Ok(())
    }

    /// Accept one operation for dispatch. Valid only from `Ready`. Hands the
    /// caller its own handle to the image; the session keeps ownership.
    pub fn begin_operation(&mut self, op: &Operation) -> Result<CapturedImage, SessionError> {
        if self.in_flight {
            return Err(SessionError::InvalidState);
        }
        let Some(image) = self.image.clone() else {
            return Err(SessionError::InvalidState);
        };
        tracing::debug!(op = op.name(), "operation accepted");
        self.in_flight = true;
        Ok(image)
    }

    /// Resolve the in-flight operation and return to `Ready`. `Some` records
    /// a semantic outcome; `None` (transport failure, health check) leaves
    /// `last_outcome` as it was. Valid only from `Busy`.
    pub fn complete_operation(&mut self, outcome: Option<Outcome>) -> Result<(), SessionError> {
        if !self.in_flight {
            return Err(SessionError::InvalidState);
        }
        self.in_flight = false;
        if let Some(outcome) = outcome {
            self.last_outcome = Some(outcome);
        }
        Ok(())
    }
}
