//! Closed outcome vocabularies, one per backend operation.
//!
//! Each variant carries its user-facing message via `Display`; how the
//! message is presented is the rendering layer's business.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// Result of interpreting a recognize response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum RecognitionOutcome {
    MatchFound {
        name: String,
        /// Match confidence in [0, 1].
        confidence: f64,
        detector_used: String,
    },
    NoMatchFound,
    NoFaceDetected,
    EmptyDatabase,
    BackendError { message: String },
}

impl fmt::Display for RecognitionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecognitionOutcome::MatchFound {
                name, confidence, ..
            } => write!(f, "recognized {name} ({:.0}% confidence)", confidence * 100.0),
            RecognitionOutcome::NoMatchFound => {
                write!(f, "face detected but not in the database")
            }
            RecognitionOutcome::NoFaceDetected => {
                write!(f, "no face detected; try better lighting")
            }
            RecognitionOutcome::EmptyDatabase => {
                write!(f, "no faces in the database yet; enroll one first")
            }
            RecognitionOutcome::BackendError { message } => write!(f, "backend error: {message}"),
        }
    }
}

/// Result of interpreting an add-face response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum EnrollOutcome {
    Enrolled { name: String },
    NoFaceDetected,
    BackendError { message: String },
}

impl fmt::Display for EnrollOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnrollOutcome::Enrolled { name } => write!(f, "enrolled {name}"),
            EnrollOutcome::NoFaceDetected => {
                write!(f, "no face detected; use a photo with a clearly visible face")
            }
            EnrollOutcome::BackendError { message } => write!(f, "backend error: {message}"),
        }
    }
}

/// Result of interpreting an analyze-emotion response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum EmotionOutcome {
    Success {
        dominant_emotion: String,
        age: f64,
        gender: String,
        race: String,
        /// Per-emotion percentages as reported by the backend.
        emotion_scores: BTreeMap<String, f64>,
        detector_used: String,
    },
    NoFaceDetected,
    BackendError { message: String },
}

impl fmt::Display for EmotionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmotionOutcome::Success {
                dominant_emotion,
                age,
                gender,
                race,
                ..
            } => write!(
                f,
                "dominant emotion {dominant_emotion} (age {age:.0}, {gender}, {race})"
            ),
            EmotionOutcome::NoFaceDetected => {
                write!(f, "no face detected in the image")
            }
            EmotionOutcome::BackendError { message } => write!(f, "backend error: {message}"),
        }
    }
}

/// Any semantic outcome a completed operation records on the session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Outcome {
    Recognition(RecognitionOutcome),
    Enroll(EnrollOutcome),
    Emotion(EmotionOutcome),
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Recognition(outcome) => outcome.fmt(f),
            Outcome::Enroll(outcome) => outcome.fmt(f),
            Outcome::Emotion(outcome) => outcome.fmt(f),
        }
    }
}

impl From<RecognitionOutcome> for Outcome {
    fn from(outcome: RecognitionOutcome) -> Self {
        Outcome::Recognition(outcome)
    }
}

impl From<EnrollOutcome> for Outcome {
    fn from(outcome: EnrollOutcome) -> Self {
        Outcome::Enroll(outcome)
    }
}

impl From<EmotionOutcome> for Outcome {
    fn from(outcome: EmotionOutcome) -> Self {
        Outcome::Emotion(outcome)
    }
}

/// Liveness report from the health endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthReport {
    pub status: String,
}

/// Known-face roster reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatabaseSummary {
    pub total: u64,
    pub names: Vec<String>,
}
