//! Outcome classification for decoded backend payloads.
//!
//! Each function is total: a malformed-but-decodable payload falls through
//! to `BackendError`, never a panic. Unknown fields are ignored. The backend
//! discriminates on a `status` string and the rules here mirror it exactly.

use serde_json::Value;

use crate::outcome::{
    DatabaseSummary, EmotionOutcome, EnrollOutcome, HealthReport, RecognitionOutcome,
};
use crate::types::EnrollName;

/// Fallback when the backend reports failure without a usable message.
const GENERIC_ERROR: &str = "backend returned an unrecognized response";

fn text(payload: &Value, key: &str) -> Option<String> {
    payload.get(key).and_then(Value::as_str).map(str::to_owned)
}

fn number(payload: &Value, key: &str) -> Option<f64> {
    payload.get(key).and_then(Value::as_f64)
}

fn error_message(payload: &Value) -> String {
    text(payload, "message").unwrap_or_else(|| GENERIC_ERROR.to_owned())
}

/// Map a recognize payload onto its outcome by the `status` discriminator.
pub fn recognition(payload: &Value) -> RecognitionOutcome {
    match payload.get("status").and_then(Value::as_str) {
        Some("match_found") => RecognitionOutcome::MatchFound {
            name: text(payload, "name").unwrap_or_else(|| "unknown".to_owned()),
            confidence: number(payload, "confidence").unwrap_or(0.0).clamp(0.0, 1.0),
            detector_used: text(payload, "detector_used").unwrap_or_default(),
        },
        Some("no_match_found") => RecognitionOutcome::NoMatchFound,
        Some("no_face_detected") => RecognitionOutcome::NoFaceDetected,
        Some("empty_database") => RecognitionOutcome::EmptyDatabase,
        _ => RecognitionOutcome::BackendError {
            message: error_message(payload),
        },
    }
}

/// Map an add-face payload onto its outcome. `Enrolled` carries the name the
/// caller sent; the backend echo is not trusted for it.
pub fn enroll(payload: &Value, name: &EnrollName) -> EnrollOutcome {
    match payload.get("status").and_then(Value::as_str) {
        Some("success") => EnrollOutcome::Enrolled {
            name: name.as_str().to_owned(),
        },
        Some("no_face") => EnrollOutcome::NoFaceDetected,
        _ => EnrollOutcome::BackendError {
            message: error_message(payload),
        },
    }
}

/// Map an analyze-emotion payload onto its outcome. Attribute fields are
/// copied verbatim; non-numeric score entries are dropped.
pub fn emotion(payload: &Value) -> EmotionOutcome {
    match payload.get("status").and_then(Value::as_str) {
        Some("success") => {
            let emotion_scores = payload
                .get("emotion_scores")
                .and_then(Value::as_object)
                .map(|scores| {
                    scores
                        .iter()
                        .filter_map(|(emotion, score)| {
                            score.as_f64().map(|value| (emotion.clone(), value))
                        })
                        .collect()
                })
                .unwrap_or_default();
            EmotionOutcome::Success {
                dominant_emotion: text(payload, "dominant_emotion")
                    .unwrap_or_else(|| "unknown".to_owned()),
                age: number(payload, "age").unwrap_or(0.0),
                gender: text(payload, "gender").unwrap_or_default(),
                race: text(payload, "race").unwrap_or_default(),
                emotion_scores,
                detector_used: text(payload, "detector_used").unwrap_or_default(),
            }
        }
        Some("no_face_detected") => EmotionOutcome::NoFaceDetected,
        _ => EmotionOutcome::BackendError {
            message: error_message(payload),
        },
    }
}

/// Map a health payload; an absent `status` reads as `"unknown"`.
pub fn health(payload: &Value) -> HealthReport {
    HealthReport {
        status: text(payload, "status").unwrap_or_else(|| "unknown".to_owned()),
    }
}

/// Map a database roster payload.
pub fn database(payload: &Value) -> DatabaseSummary {
    DatabaseSummary {
        total: payload.get("total").and_then(Value::as_u64).unwrap_or(0),
        names: payload
            .get("names")
            .and_then(Value::as_array)
            .map(|names| {
                names
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_owned)
                    .collect()
            })
            .unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn recognition_match_found() {
        let payload = json!({
            "status": "match_found",
            "name": "Ada",
            "confidence": 0.87,
            "distance": 0.26,
            "detector_used": "retinaface",
            "message": "Recognized as Ada"
        });
        assert_eq!(
            recognition(&payload),
            RecognitionOutcome::MatchFound {
                name: "Ada".to_owned(),
                confidence: 0.87,
                detector_used: "retinaface".to_owned(),
            }
        );
    }

    #[test]
    fn recognition_empty_database() {
        let payload = json!({"status": "empty_database"});
        assert_eq!(recognition(&payload), RecognitionOutcome::EmptyDatabase);
    }

    #[test]
    fn recognition_clamps_out_of_range_confidence() {
        let payload = json!({"status": "match_found", "name": "Ada", "confidence": 1.7});
        let RecognitionOutcome::MatchFound { confidence, .. } = recognition(&payload) else {
            panic!("expected a match");
        };
        assert_eq!(confidence, 1.0);
    }

    #[test]
    fn recognition_unknown_status_uses_backend_message() {
        let payload = json!({"status": "on_fire", "message": "detector crashed"});
        assert_eq!(
            recognition(&payload),
            RecognitionOutcome::BackendError {
                message: "detector crashed".to_owned(),
            }
        );
    }

    #[test]
    fn recognition_missing_status_gets_generic_message() {
        let payload = json!({"name": "Ada"});
        assert_eq!(
            recognition(&payload),
            RecognitionOutcome::BackendError {
                message: GENERIC_ERROR.to_owned(),
            }
        );
    }

    #[test]
    fn recognition_non_string_status_is_backend_error() {
        let payload = json!({"status": 42});
        assert!(matches!(
            recognition(&payload),
            RecognitionOutcome::BackendError { .. }
        ));
    }

    #[test]
    fn enroll_success_carries_request_name() {
        let name = EnrollName::new("Ben").unwrap();
        let payload = json!({"status": "success", "name": "someone_else"});
        assert_eq!(
            enroll(&payload, &name),
            EnrollOutcome::Enrolled {
                name: "Ben".to_owned(),
            }
        );
    }

    #[test]
    fn enroll_no_face() {
        let name = EnrollName::new("Ben").unwrap();
        let payload = json!({"status": "no_face", "message": "Please upload a clear face."});
        assert_eq!(enroll(&payload, &name), EnrollOutcome::NoFaceDetected);
    }

    #[test]
    fn emotion_success_copies_fields_and_scores() {
        let payload = json!({
            "status": "success",
            "dominant_emotion": "happy",
            "age": 31,
            "gender": "Woman",
            "race": "latino hispanic",
            "emotion_scores": {"happy": 93.2, "neutral": 4.1, "sad": "n/a"},
            "detector_used": "mtcnn"
        });
        let EmotionOutcome::Success {
            dominant_emotion,
            age,
            emotion_scores,
            detector_used,
            ..
        } = emotion(&payload)
        else {
            panic!("expected success");
        };
        assert_eq!(dominant_emotion, "happy");
        assert_eq!(age, 31.0);
        assert_eq!(detector_used, "mtcnn");
        assert_eq!(emotion_scores.get("happy"), Some(&93.2));
        // non-numeric entry dropped
        assert!(!emotion_scores.contains_key("sad"));
    }

    #[test]
    fn emotion_unknown_status_is_backend_error() {
        let payload = json!({"status": "partial", "message": "model still loading"});
        assert_eq!(
            emotion(&payload),
            EmotionOutcome::BackendError {
                message: "model still loading".to_owned(),
            }
        );
    }

    #[test]
    fn health_defaults_to_unknown() {
        assert_eq!(health(&json!({})).status, "unknown");
        assert_eq!(health(&json!({"status": "healthy"})).status, "healthy");
    }

    #[test]
    fn database_roster_parses_names() {
        let payload = json!({"total": 2, "names": ["Ada", "Ben"]});
        let summary = database(&payload);
        assert_eq!(summary.total, 2);
        assert_eq!(summary.names, vec!["Ada".to_owned(), "Ben".to_owned()]);
    }
}
