//! Payloads for the Replicate predictions API.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct PredictionInput {
    pub prompt: String,
    pub temperature: f64,
    pub top_p: f64,
    pub max_length: u32,
    pub repetition_penalty: f64,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct PredictionRequest {
    pub version: String,
    pub input: PredictionInput,
    pub stream: bool,
}

#[derive(Deserialize, Debug)]
pub struct PredictionUrls {
    pub stream: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct PredictionResponse {
    pub id: String,
    pub status: Option<String>,
    pub urls: Option<PredictionUrls>,
    #[serde(default)]
    pub error: Option<Value>,
}

impl PredictionResponse {
    pub fn stream_url(&self) -> Option<&str> {
        self.urls.as_ref()?.stream.as_deref()
    }

    /// Status and error text reported by a prediction that cannot be streamed.
    pub fn failure_detail(&self) -> Option<String> {
        let error = match &self.error {
            Some(Value::String(text)) => Some(text.clone()),
            Some(Value::Null) | None => None,
            Some(other) => Some(other.to_string()),
        };
        match (self.status.as_deref(), error) {
            (Some(status), Some(error)) => Some(format!("{status}: {error}")),
            (Some(status), None) => Some(status.to_string()),
            (None, Some(error)) => Some(error),
            (None, None) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_in_wire_shape() {
        let request = PredictionRequest {
            version: "abc".into(),
            input: PredictionInput {
                prompt: "hi".into(),
                temperature: 0.01,
                top_p: 0.01,
                max_length: 1024,
                repetition_penalty: 1.0,
            },
            stream: true,
        };
        let value = serde_json::to_value(&request).expect("serialize");
        assert_eq!(
            value,
            serde_json::json!({
                "version": "abc",
                "input": {
                    "prompt": "hi",
                    "temperature": 0.01,
                    "top_p": 0.01,
                    "max_length": 1024,
                    "repetition_penalty": 1.0
                },
                "stream": true
            })
        );
    }

    #[test]
    fn response_exposes_stream_url() {
        let body = r#"{
            "id": "p1",
            "status": "starting",
            "urls": {
                "get": "https://api.replicate.com/v1/predictions/p1",
                "cancel": "https://api.replicate.com/v1/predictions/p1/cancel",
                "stream": "https://streaming.example/v1/streams/p1"
            }
        }"#;
        let response: PredictionResponse = serde_json::from_str(body).expect("parse");
        assert_eq!(
            response.stream_url(),
            Some("https://streaming.example/v1/streams/p1")
        );
    }

    #[test]
    fn response_without_urls_has_no_stream() {
        let response: PredictionResponse =
            serde_json::from_str(r#"{"id":"p2","status":"failed","error":"boom"}"#)
                .expect("parse");
        assert!(response.stream_url().is_none());
        assert_eq!(response.failure_detail().as_deref(), Some("failed: boom"));
    }

    #[test]
    fn failure_detail_skips_null_errors() {
        let response: PredictionResponse =
            serde_json::from_str(r#"{"id":"p3","status":"starting","error":null}"#)
                .expect("parse");
        assert_eq!(response.failure_detail().as_deref(), Some("starting"));

        let response: PredictionResponse =
            serde_json::from_str(r#"{"id":"p4","error":{"code":"E001"}}"#).expect("parse");
        assert_eq!(
            response.failure_detail().as_deref(),
            Some(r#"{"code":"E001"}"#)
        );
    }
}
