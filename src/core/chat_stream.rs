use std::error::Error;
use std::fmt;

use futures_util::{Stream, StreamExt};
use memchr::memchr;
use reqwest::header::{ACCEPT, CACHE_CONTROL};
use reqwest::StatusCode;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::api::{PredictionRequest, PredictionResponse};
use crate::utils::url::construct_api_url;

#[derive(Clone, Debug)]
pub enum StreamMessage {
    Chunk(String),
    Error(StreamError),
    End,
}

/// Why a remote call did not produce a complete response.
#[derive(Clone, Debug, PartialEq)]
pub enum StreamError {
    /// The request could not be sent or the connection dropped.
    Network(String),
    /// The service rejected the token (HTTP 401/403).
    Authentication(String),
    /// The service answered with an error status or an `error` event.
    Api {
        status: Option<u16>,
        message: String,
    },
    /// The service answered with something that could not be understood.
    Malformed(String),
}

impl fmt::Display for StreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamError::Network(message) => write!(
                f,
                "Network error: {message}. Check your connection and try again."
            ),
            StreamError::Authentication(message) => write!(
                f,
                "Authentication failed: {message}. Check your Replicate API token."
            ),
            StreamError::Api {
                status: Some(status),
                message,
            } => write!(f, "API error (HTTP {status}): {message}"),
            StreamError::Api {
                status: None,
                message,
            } => write!(f, "API error: {message}"),
            StreamError::Malformed(message) => {
                write!(f, "Unexpected response from the API: {message}")
            }
        }
    }
}

impl Error for StreamError {}

fn extract_error_summary(value: &serde_json::Value) -> Option<String> {
    let summary = value
        .get("detail")
        .and_then(|v| v.as_str())
        .map(str::to_owned)
        .or_else(|| {
            value
                .pointer("/error/message")
                .and_then(|v| v.as_str())
                .map(str::to_owned)
        })
        .or_else(|| value.get("error").and_then(|v| v.as_str()).map(str::to_owned))
        .or_else(|| value.get("message").and_then(|v| v.as_str()).map(str::to_owned))
        .or_else(|| value.get("title").and_then(|v| v.as_str()).map(str::to_owned));

    summary.map(|text| text.split_whitespace().collect::<Vec<_>>().join(" "))
}

/// Reduce an error body to a single readable line.
fn format_api_error(error_text: &str) -> String {
    let trimmed = error_text.trim();

    if trimmed.is_empty() {
        return "<empty response>".to_string();
    }

    if let Ok(json_value) = serde_json::from_str::<serde_json::Value>(trimmed) {
        if let Some(summary) = extract_error_summary(&json_value) {
            if !summary.is_empty() {
                return summary;
            }
        }
    }

    trimmed.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn classify_status(status: StatusCode, body: &str) -> StreamError {
    let message = format_api_error(body);
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => StreamError::Authentication(message),
        _ => StreamError::Api {
            status: Some(status.as_u16()),
            message,
        },
    }
}

async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, StreamError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "<no body>".to_string());
    Err(classify_status(status, &body))
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct SseEvent {
    event: String,
    data: String,
}

/// Line-oriented decoder for `text/event-stream` bodies.
#[derive(Default)]
struct SseDecoder {
    event: Option<String>,
    data: Vec<String>,
}

impl SseDecoder {
    fn push_line(&mut self, line: &str) -> Option<SseEvent> {
        let line = line.strip_suffix('\r').unwrap_or(line);

        if line.is_empty() {
            return self.dispatch();
        }
        if line.starts_with(':') {
            return None;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };

        match field {
            "event" => self.event = Some(value.to_string()),
            "data" => self.data.push(value.to_string()),
            _ => {}
        }
        None
    }

    /// Flush an event left open when the connection closed.
    fn finish(&mut self) -> Option<SseEvent> {
        self.dispatch()
    }

    fn dispatch(&mut self) -> Option<SseEvent> {
        if self.event.is_none() && self.data.is_empty() {
            return None;
        }
        let event = self.event.take().unwrap_or_else(|| "message".to_string());
        let data = std::mem::take(&mut self.data).join("\n");
        Some(SseEvent { event, data })
    }
}

/// Returns `Ok(true)` once the stream reports completion.
fn handle_event(
    event: SseEvent,
    tx: &mpsc::UnboundedSender<(StreamMessage, u64)>,
    stream_id: u64,
) -> Result<bool, StreamError> {
    match event.event.as_str() {
        "output" => {
            if !event.data.is_empty() {
                let _ = tx.send((StreamMessage::Chunk(event.data), stream_id));
            }
            Ok(false)
        }
        "error" => Err(StreamError::Api {
            status: None,
            message: format_api_error(&event.data),
        }),
        "done" => Ok(true),
        other => {
            debug!(stream_id, event = other, "ignoring stream event");
            Ok(false)
        }
    }
}

async fn consume_event_stream<S, B, E>(
    stream: S,
    tx: &mpsc::UnboundedSender<(StreamMessage, u64)>,
    stream_id: u64,
) -> Result<(), StreamError>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    E: fmt::Display,
{
    let mut stream = std::pin::pin!(stream);
    let mut buffer: Vec<u8> = Vec::new();
    let mut decoder = SseDecoder::default();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| StreamError::Network(e.to_string()))?;
        buffer.extend_from_slice(chunk.as_ref());

        while let Some(newline_pos) = memchr(b'\n', &buffer) {
            let line_bytes: Vec<u8> = buffer.drain(..=newline_pos).collect();
            let line = std::str::from_utf8(&line_bytes[..newline_pos])
                .map_err(|e| StreamError::Malformed(format!("invalid UTF-8 in stream: {e}")))?;
            if let Some(event) = decoder.push_line(line) {
                if handle_event(event, tx, stream_id)? {
                    return Ok(());
                }
            }
        }
    }

    if !buffer.is_empty() {
        let line = std::str::from_utf8(&buffer)
            .map_err(|e| StreamError::Malformed(format!("invalid UTF-8 in stream: {e}")))?;
        if let Some(event) = decoder.push_line(line) {
            if handle_event(event, tx, stream_id)? {
                return Ok(());
            }
        }
    }

    if let Some(event) = decoder.finish() {
        handle_event(event, tx, stream_id)?;
    }

    Ok(())
}

async fn run_prediction(
    params: StreamParams,
    tx: &mpsc::UnboundedSender<(StreamMessage, u64)>,
) -> Result<(), StreamError> {
    let StreamParams {
        client,
        base_url,
        api_token,
        request,
        stream_id,
    } = params;

    let predictions_url = construct_api_url(&base_url, "predictions");
    debug!(stream_id, version = %request.version, "creating prediction");

    let response = client
        .post(predictions_url)
        .bearer_auth(&api_token)
        .json(&request)
        .send()
        .await
        .map_err(|e| StreamError::Network(e.to_string()))?;
    let response = ensure_success(response).await?;

    let body = response
        .text()
        .await
        .map_err(|e| StreamError::Network(e.to_string()))?;
    let prediction: PredictionResponse = serde_json::from_str(&body)
        .map_err(|e| StreamError::Malformed(format!("invalid prediction response: {e}")))?;
    let stream_url = match prediction.stream_url() {
        Some(url) => url.to_string(),
        None => {
            let message = match prediction.failure_detail() {
                Some(detail) => format!("prediction has no stream URL ({detail})"),
                None => "prediction has no stream URL".to_string(),
            };
            return Err(StreamError::Malformed(message));
        }
    };
    debug!(stream_id, prediction_id = %prediction.id, "prediction created");

    let response = client
        .get(stream_url)
        .bearer_auth(&api_token)
        .header(ACCEPT, "text/event-stream")
        .header(CACHE_CONTROL, "no-store")
        .send()
        .await
        .map_err(|e| StreamError::Network(e.to_string()))?;
    let response = ensure_success(response).await?;

    consume_event_stream(response.bytes_stream(), tx, stream_id).await
}

pub struct StreamParams {
    pub client: reqwest::Client,
    pub base_url: String,
    pub api_token: String,
    pub request: PredictionRequest,
    pub stream_id: u64,
}

#[derive(Clone)]
pub struct ChatStreamService {
    tx: mpsc::UnboundedSender<(StreamMessage, u64)>,
}

impl ChatStreamService {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<(StreamMessage, u64)>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn spawn_stream(&self, params: StreamParams) {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let stream_id = params.stream_id;
            match run_prediction(params, &tx).await {
                Ok(()) => {
                    debug!(stream_id, "stream finished");
                }
                Err(err) => {
                    warn!(stream_id, error = %err, "stream failed");
                    let _ = tx.send((StreamMessage::Error(err), stream_id));
                }
            }
            let _ = tx.send((StreamMessage::End, stream_id));
        });
    }

    #[cfg(test)]
    pub fn send_for_test(&self, message: StreamMessage, stream_id: u64) {
        let _ = self.tx.send((message, stream_id));
    }
}
