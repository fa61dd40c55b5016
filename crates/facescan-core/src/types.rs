use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Upload filename when the handle's path has no usable final segment.
const DEFAULT_FILE_NAME: &str = "photo.jpg";

/// Opaque handle to the one pending captured image on local storage.
///
/// Exists from capture/pick until retake or replacement. The capture session
/// owns it; the gateway only borrows it for the duration of an upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedImage {
    path: PathBuf,
}

impl CapturedImage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Filename used for the multipart upload: the trailing path segment,
    /// or `photo.jpg` when the path ends without one.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .and_then(|name| name.to_str())
            .map(str::to_owned)
            .unwrap_or_else(|| DEFAULT_FILE_NAME.to_owned())
    }
}

/// Rejection for a blank enroll name, raised before anything is dispatched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("enroll name must not be empty or whitespace")]
pub struct InvalidName;

/// Trimmed, non-blank display name for an enroll operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrollName(String);

impl EnrollName {
    /// Trim the raw input and reject it when nothing remains.
    pub fn new(raw: &str) -> Result<Self, InvalidName> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(InvalidName);
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EnrollName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One dispatchable backend operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Recognize,
    Enroll(EnrollName),
    AnalyzeEmotion,
    HealthCheck,
}

impl Operation {
    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Recognize => "recognize",
            Operation::Enroll(_) => "enroll",
            Operation::AnalyzeEmotion => "analyze-emotion",
            Operation::HealthCheck => "health-check",
        }
    }
}
