//! facescan-core: capture session state machine and response classification.
//!
//! Pure domain logic for the capture-to-outcome workflow. No I/O lives here;
//! the HTTP gateway and the workflow engine are in `facescan-client`.

pub mod classify;
pub mod outcome;
pub mod session;
pub mod transport;
pub mod types;

pub use outcome::{
    DatabaseSummary, EmotionOutcome, EnrollOutcome, HealthReport, Outcome, RecognitionOutcome,
};
pub use session::{CaptureSession, Phase, SessionError};
pub use transport::TransportFailure;
pub use types::{CapturedImage, EnrollName, InvalidName, Operation};
