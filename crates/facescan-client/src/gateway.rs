//! HTTP endpoint gateway for the inference backend.
//!
//! One method per backend operation. Each image upload is a single-part
//! multipart request (field `file`, MIME `image/jpeg`, filename from the
//! image handle); every request sends `Accept: application/json`. The
//! gateway owns no state beyond the reqwest client and never retries: a
//! failed call is reported once, and re-invoking is the caller's decision.

use async_trait::async_trait;
use reqwest::header;
use reqwest::multipart::{Form, Part};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use facescan_core::{CapturedImage, EnrollName};

use crate::config::Config;

/// Transport-level failure raised by the gateway.
///
/// Display text carries the vocabulary the transport classifier matches on
/// ("timeout", "Network request failed", "connection was lost"); see
/// `facescan_core::transport`.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("request timeout: {0}")]
    Timeout(#[source] reqwest::Error),
    #[error("Network request failed: {0}")]
    Unreachable(#[source] reqwest::Error),
    #[error("connection was lost: {0}")]
    ConnectionLost(#[source] reqwest::Error),
    /// The response body was not decodable JSON.
    #[error("undecodable response body (status {status}): {detail}")]
    Decode { status: u16, detail: String },
    #[error("failed to read captured image: {0}")]
    Image(#[from] std::io::Error),
    #[error("{0}")]
    Other(#[source] reqwest::Error),
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            GatewayError::Timeout(err)
        } else if err.is_connect() {
            GatewayError::Unreachable(err)
        } else if err.is_body() {
            GatewayError::ConnectionLost(err)
        } else {
            GatewayError::Other(err)
        }
    }
}

/// Telemetry body posted after a successful match.
#[derive(Debug, Clone, Serialize)]
pub struct ScanRecord {
    pub name: String,
    pub confidence: f64,
    pub detector: String,
    /// ISO-8601 creation time.
    pub timestamp: String,
}

/// The remote operations the workflow engine dispatches.
///
/// `HttpGateway` is the production implementation; engine tests drive a
/// stub instead of a live server.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn recognize(&self, image: &CapturedImage) -> Result<Value, GatewayError>;
    async fn add_face(
        &self,
        image: &CapturedImage,
        name: &EnrollName,
    ) -> Result<Value, GatewayError>;
    async fn analyze_emotion(&self, image: &CapturedImage) -> Result<Value, GatewayError>;
    async fn health(&self) -> Result<Value, GatewayError>;
    async fn log_scan(&self, record: &ScanRecord) -> Result<(), GatewayError>;
}

/// Stateless HTTP gateway to the inference backend.
pub struct HttpGateway {
    client: reqwest::Client,
    base_url: String,
}

impl HttpGateway {
    pub fn new(config: &Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.base_url.clone(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// POST one image as a single-part multipart upload.
    async fn upload(
        &self,
        path: &str,
        query: &[(&str, &str)],
        image: &CapturedImage,
    ) -> Result<Value, GatewayError> {
        let bytes = tokio::fs::read(image.path()).await?;
        let part = Part::bytes(bytes)
            .file_name(image.file_name())
            .mime_str("image/jpeg")
            .map_err(GatewayError::Other)?;
        let form = Form::new().part("file", part);

        let response = self
            .client
            .post(self.url(path))
            .query(query)
            .header(header::ACCEPT, "application/json")
            .multipart(form)
            .send()
            .await?;
        decode(response).await
    }

    async fn get_json(&self, path: &str) -> Result<Value, GatewayError> {
        let response = self
            .client
            .get(self.url(path))
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;
        decode(response).await
    }

    /// Known-face roster held by the backend. Diagnostic query, outside the
    /// capture workflow.
    pub async fn database(&self) -> Result<Value, GatewayError> {
        self.get_json("/database").await
    }
}

/// Decode any JSON body, 2xx or not: a non-2xx response with a decodable
/// body is the outcome classifier's business, not a transport failure. A
/// body that is not JSON is.
async fn decode(response: reqwest::Response) -> Result<Value, GatewayError> {
    let status = response.status();
    let body = response.text().await?;
    match serde_json::from_str(&body) {
        Ok(payload) => {
            if !status.is_success() {
                tracing::debug!(status = status.as_u16(), "non-2xx response with JSON body");
            }
            Ok(payload)
        }
        Err(err) => Err(GatewayError::Decode {
            status: status.as_u16(),
            detail: err.to_string(),
        }),
    }
}

#[async_trait]
impl Backend for HttpGateway {
    async fn recognize(&self, image: &CapturedImage) -> Result<Value, GatewayError> {
        tracing::debug!(file = %image.file_name(), "uploading for recognition");
        self.upload("/recognize", &[], image).await
    }

    async fn add_face(
        &self,
        image: &CapturedImage,
        name: &EnrollName,
    ) -> Result<Value, GatewayError> {
        tracing::debug!(file = %image.file_name(), name = %name, "uploading for enrollment");
        self.upload("/add-face", &[("name", name.as_str())], image)
            .await
    }

    async fn analyze_emotion(&self, image: &CapturedImage) -> Result<Value, GatewayError> {
        tracing::debug!(file = %image.file_name(), "uploading for emotion analysis");
        self.upload("/analyze-emotion", &[], image).await
    }

    async fn health(&self) -> Result<Value, GatewayError> {
        self.get_json("/health").await
    }

    async fn log_scan(&self, record: &ScanRecord) -> Result<(), GatewayError> {
        self.client
            .post(self.url("/log-scan"))
            .header(header::ACCEPT, "application/json")
            .json(record)
            .send()
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn temp_image() -> (tempfile::TempDir, CapturedImage) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("probe.jpg");
        std::fs::write(&path, b"\xff\xd8\xff\xe0 fake jpeg").unwrap();
        (dir, CapturedImage::new(path))
    }

    fn gateway_for(server: &MockServer) -> HttpGateway {
        HttpGateway::new(&Config::with_base_url(server.uri()))
    }

    #[tokio::test]
    async fn recognize_posts_upload_and_returns_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/recognize"))
            .and(header("accept", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "match_found", "name": "Ada", "confidence": 0.87
            })))
            .expect(1)
            .mount(&server)
            .await;

        let (_dir, image) = temp_image();
        let payload = gateway_for(&server).recognize(&image).await.unwrap();
        assert_eq!(payload["status"], "match_found");
        assert_eq!(payload["name"], "Ada");
    }

    #[tokio::test]
    async fn add_face_sends_name_as_query_param() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/add-face"))
            .and(query_param("name", "Ada Lovelace"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "success"})))
            .expect(1)
            .mount(&server)
            .await;

        let (_dir, image) = temp_image();
        let name = EnrollName::new("Ada Lovelace").unwrap();
        let payload = gateway_for(&server).add_face(&image, &name).await.unwrap();
        assert_eq!(payload["status"], "success");
    }

    #[tokio::test]
    async fn non_2xx_with_json_body_still_returns_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/recognize"))
            .respond_with(
                ResponseTemplate::new(500)
                    .set_body_json(json!({"status": "error", "message": "detector crashed"})),
            )
            .mount(&server)
            .await;

        let (_dir, image) = temp_image();
        let payload = gateway_for(&server).recognize(&image).await.unwrap();
        assert_eq!(payload["message"], "detector crashed");
    }

    #[tokio::test]
    async fn non_json_body_is_a_decode_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/recognize"))
            .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
            .mount(&server)
            .await;

        let (_dir, image) = temp_image();
        let err = gateway_for(&server).recognize(&image).await.unwrap_err();
        assert!(matches!(err, GatewayError::Decode { status: 502, .. }));
    }

    #[tokio::test]
    async fn connection_refused_is_unreachable() {
        // nothing listens on port 1
        let gateway = HttpGateway::new(&Config::with_base_url("http://127.0.0.1:1"));
        let (_dir, image) = temp_image();
        let err = gateway.recognize(&image).await.unwrap_err();
        assert!(matches!(err, GatewayError::Unreachable(_)));
    }

    #[tokio::test]
    async fn missing_image_file_is_an_image_error() {
        let server = MockServer::start().await;
        let gateway = gateway_for(&server);
        let image = CapturedImage::new("/nonexistent/probe.jpg");
        let err = gateway.recognize(&image).await.unwrap_err();
        assert!(matches!(err, GatewayError::Image(_)));
    }

    #[tokio::test]
    async fn health_is_a_parameterless_get() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "healthy"})))
            .expect(1)
            .mount(&server)
            .await;

        let payload = gateway_for(&server).health().await.unwrap();
        assert_eq!(payload["status"], "healthy");
    }

    #[tokio::test]
    async fn log_scan_posts_json_record() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/log-scan"))
            .and(wiremock::matchers::body_partial_json(json!({
                "name": "Ada", "confidence": 0.87, "detector": "retinaface"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "success"})))
            .expect(1)
            .mount(&server)
            .await;

        let record = ScanRecord {
            name: "Ada".to_owned(),
            confidence: 0.87,
            detector: "retinaface".to_owned(),
            timestamp: "2024-05-01T12:00:00Z".to_owned(),
        };
        gateway_for(&server).log_scan(&record).await.unwrap();
    }
}
