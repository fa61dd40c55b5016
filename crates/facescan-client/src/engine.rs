//! The capture-to-outcome workflow engine.
//!
//! Composes the capture session, the endpoint gateway, and both classifiers
//! into the four user-facing operations. Exactly one operation runs at a
//! time; the session's `Busy` phase is the guard. A successful match also
//! fires the scan log as a detached task whose failure is swallowed.

use std::sync::Arc;

use thiserror::Error;

use facescan_core::{
    classify, transport, CaptureSession, CapturedImage, EmotionOutcome, EnrollName, EnrollOutcome,
    HealthReport, InvalidName, Operation, Outcome, Phase, RecognitionOutcome, SessionError,
    TransportFailure,
};

use crate::gateway::{Backend, GatewayError, ScanRecord};

/// Why a workflow operation did not produce a semantic outcome.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Rejected before dispatch: blank enroll name.
    #[error(transparent)]
    InvalidName(#[from] InvalidName),
    /// Rejected before dispatch: wrong session phase.
    #[error(transparent)]
    Session(#[from] SessionError),
    /// The network exchange failed; the recorded outcome is untouched.
    #[error(transparent)]
    Transport(TransportFailure),
}

/// One capture session wired to a backend.
pub struct WorkflowEngine<B> {
    session: CaptureSession,
    backend: Arc<B>,
}

impl<B: Backend + 'static> WorkflowEngine<B> {
    pub fn new(backend: B) -> Self {
        Self::shared(Arc::new(backend))
    }

    /// Build around a backend the caller keeps a handle to.
    pub fn shared(backend: Arc<B>) -> Self {
        Self {
            session: CaptureSession::new(),
            backend,
        }
    }

    pub fn phase(&self) -> Phase {
        self.session.phase()
    }

    pub fn image(&self) -> Option<&CapturedImage> {
        self.session.image()
    }

    pub fn last_outcome(&self) -> Option<&Outcome> {
        self.session.last_outcome()
    }

    /// Hold a newly captured or picked image, clearing the prior outcome.
    pub fn capture(&mut self, image: CapturedImage) -> Result<(), SessionError> {
        self.session.capture(image)
    }

    /// Discard the held image and outcome.
    pub fn retake(&mut self) -> Result<(), SessionError> {
        self.session.retake()
    }

    /// Recognize the held image. A `MatchFound` outcome also fires the scan
    /// log, best-effort.
    pub async fn recognize(&mut self) -> Result<RecognitionOutcome, EngineError> {
        let image = self.session.begin_operation(&Operation::Recognize)?;
        match self.backend.recognize(&image).await {
            Ok(payload) => {
                let outcome = classify::recognition(&payload);
                if let RecognitionOutcome::MatchFound {
                    name,
                    confidence,
                    detector_used,
                } = &outcome
                {
                    tracing::info!(name = %name, confidence, "match found");
                    self.spawn_scan_log(name, *confidence, detector_used);
                }
                self.session
                    .complete_operation(Some(Outcome::Recognition(outcome.clone())))?;
                Ok(outcome)
            }
            Err(err) => Err(self.resolve_failure(err)?),
        }
    }

    /// Enroll the held image under `raw_name`. The name is trimmed and
    /// validated before the session enters `Busy`.
    pub async fn enroll(&mut self, raw_name: &str) -> Result<EnrollOutcome, EngineError> {
        let name = EnrollName::new(raw_name)?;
        let image = self
            .session
            .begin_operation(&Operation::Enroll(name.clone()))?;
        match self.backend.add_face(&image, &name).await {
            Ok(payload) => {
                let outcome = classify::enroll(&payload, &name);
                self.session
                    .complete_operation(Some(Outcome::Enroll(outcome.clone())))?;
                Ok(outcome)
            }
            Err(err) => Err(self.resolve_failure(err)?),
        }
    }

    /// Report emotion and attributes for the held image.
    pub async fn analyze_emotion(&mut self) -> Result<EmotionOutcome, EngineError> {
        let image = self.session.begin_operation(&Operation::AnalyzeEmotion)?;
        match self.backend.analyze_emotion(&image).await {
            Ok(payload) => {
                let outcome = classify::emotion(&payload);
                self.session
                    .complete_operation(Some(Outcome::Emotion(outcome.clone())))?;
                Ok(outcome)
            }
            Err(err) => Err(self.resolve_failure(err)?),
        }
    }

    /// Check backend liveness. Runs through the same single-in-flight cycle
    /// as the image operations; no outcome is recorded.
    pub async fn health_check(&mut self) -> Result<HealthReport, EngineError> {
        self.session.begin_operation(&Operation::HealthCheck)?;
        match self.backend.health().await {
            Ok(payload) => {
                let report = classify::health(&payload);
                self.session.complete_operation(None)?;
                Ok(report)
            }
            Err(err) => Err(self.resolve_failure(err)?),
        }
    }

    /// Classify a transport-level failure and return the session to `Ready`
    /// without touching the recorded outcome.
    fn resolve_failure(&mut self, err: GatewayError) -> Result<EngineError, SessionError> {
        let failure = transport::classify(&err.to_string());
        tracing::warn!(error = %err, category = ?failure, "transport failure");
        self.session.complete_operation(None)?;
        Ok(EngineError::Transport(failure))
    }

    /// Fire the scan log without blocking the caller or surfacing failure.
    fn spawn_scan_log(&self, name: &str, confidence: f64, detector: &str) {
        let backend = Arc::clone(&self.backend);
        let record = ScanRecord {
            name: name.to_owned(),
            confidence,
            detector: detector.to_owned(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        };
        tokio::spawn(async move {
            if let Err(err) = backend.log_scan(&record).await {
                tracing::debug!(error = %err, "scan log dropped");
            }
        });
    }
}
