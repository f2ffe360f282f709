//! Application state and the handlers that mutate it.
//!
//! [`App`] is the session context handed to every handler in
//! [`actions`]. Handlers never touch the terminal or the network directly:
//! they update the context and return an [`actions::AppCommand`] when a
//! side effect has to be started by the event loop.

pub mod actions;

#[cfg(test)]
mod tests;

use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::api::{PredictionInput, PredictionRequest};
use crate::auth::Credential;
use crate::core::chat_stream::StreamParams;
use crate::core::feedback::FeedbackLogger;
use crate::core::session::Session;
use crate::core::settings::{Settings, MAX_LENGTH, REPETITION_PENALTY, TOP_P};

pub use actions::{apply_action, apply_actions, AppAction, AppCommand};

pub const PAYMENT_URL: &str = "https://payge.io/bill/clogff7gx003708l3bmhnm6ld";

/// How long a transient notice stays on screen.
pub const NOTICE_TTL: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamPhase {
    Idle,
    AwaitingFirstChunk,
    Streaming,
    Done,
    Failed(String),
}

#[derive(Debug)]
pub struct StreamState {
    pub phase: StreamPhase,
    /// Text received so far for the stream in flight.
    pub pending: String,
    pub current_stream_id: u64,
    pub started_at: Option<Instant>,
}

impl StreamState {
    fn new() -> Self {
        Self {
            phase: StreamPhase::Idle,
            pending: String::new(),
            current_stream_id: 0,
            started_at: None,
        }
    }

    pub fn is_busy(&self) -> bool {
        matches!(
            self.phase,
            StreamPhase::AwaitingFirstChunk | StreamPhase::Streaming
        )
    }

    pub fn is_current(&self, stream_id: u64) -> bool {
        self.is_busy() && stream_id == self.current_stream_id
    }

    fn begin(&mut self) -> u64 {
        self.current_stream_id += 1;
        self.pending.clear();
        self.phase = StreamPhase::AwaitingFirstChunk;
        self.started_at = Some(Instant::now());
        self.current_stream_id
    }

    fn settle(&mut self, phase: StreamPhase) -> String {
        self.phase = phase;
        self.started_at = None;
        std::mem::take(&mut self.pending)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
    pub created_at: Instant,
}

impl Notice {
    pub fn is_expired(&self, now: Instant) -> bool {
        now.duration_since(self.created_at) >= NOTICE_TTL
    }
}

pub struct AppInitConfig {
    pub settings: Settings,
    pub credential: Option<Credential>,
    pub feedback_path: PathBuf,
    pub base_url: String,
}

pub struct App {
    pub session: Session,
    pub settings: Settings,
    pub credential: Option<Credential>,
    pub stream: StreamState,
    pub feedback: FeedbackLogger,
    pub client: reqwest::Client,
    pub base_url: String,
    pub notice: Option<Notice>,
    restored_input: Option<String>,
}

impl App {
    pub fn new(config: AppInitConfig) -> Self {
        let AppInitConfig {
            settings,
            credential,
            feedback_path,
            base_url,
        } = config;

        let mut session = Session::new();
        session.observe_selection(&settings.tone, settings.slogan_count);

        Self {
            session,
            settings,
            credential,
            stream: StreamState::new(),
            feedback: FeedbackLogger::new(feedback_path),
            client: reqwest::Client::new(),
            base_url,
            notice: None,
            restored_input: None,
        }
    }

    pub fn has_credential(&self) -> bool {
        self.credential.is_some()
    }

    pub fn is_busy(&self) -> bool {
        self.stream.is_busy()
    }

    /// Prompt input is accepted only with a credential and no stream in flight.
    pub fn can_submit(&self) -> bool {
        self.has_credential() && !self.is_busy()
    }

    /// The partially streamed assistant reply, while one is in flight.
    pub fn in_flight_response(&self) -> Option<&str> {
        self.is_busy().then_some(self.stream.pending.as_str())
    }

    pub fn set_notice(&mut self, kind: NoticeKind, text: impl Into<String>) {
        self.notice = Some(Notice {
            kind,
            text: text.into(),
            created_at: Instant::now(),
        });
    }

    /// Drop the notice once it has been on screen long enough.
    pub fn expire_notice(&mut self, now: Instant) -> bool {
        if self.notice.as_ref().is_some_and(|notice| notice.is_expired(now)) {
            self.notice = None;
            true
        } else {
            false
        }
    }

    /// Prompt text handed back to the input box after a failed request.
    pub fn take_restored_input(&mut self) -> Option<String> {
        self.restored_input.take()
    }

    pub(crate) fn build_stream_params(
        &self,
        api_token: &str,
        prompt: String,
        stream_id: u64,
    ) -> StreamParams {
        let request = PredictionRequest {
            version: self.settings.model.version_id().to_string(),
            input: PredictionInput {
                prompt,
                temperature: self.settings.creativity.temperature(),
                top_p: TOP_P,
                max_length: MAX_LENGTH,
                repetition_penalty: REPETITION_PENALTY,
            },
            stream: true,
        };

        StreamParams {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            api_token: api_token.to_string(),
            request,
            stream_id,
        }
    }
}
