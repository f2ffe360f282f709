//! Per-run conversation state.
//!
//! A [`Session`] is the explicit context object that every UI handler
//! receives. It is created once when the UI starts, reset whenever the
//! transcript must go back to the greeting, and dropped with the process.

use std::fmt;

use tracing::debug;
use uuid::Uuid;

use crate::core::message::Message;
use crate::core::settings::{SloganCount, Tone};

pub const GREETING: &str = "Hello! To get started, tell me what you need a slogan for.";

/// Opaque token grouping a transcript and the feedback rows written for it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConversationId(String);

impl ConversationId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    messages: Vec<Message>,
    conversation_id: ConversationId,
    recorded_tone: Option<Tone>,
    recorded_slogan_count: Option<SloganCount>,
}

impl Session {
    pub fn new() -> Self {
        let session = Self {
            messages: vec![Message::assistant(GREETING)],
            conversation_id: ConversationId::generate(),
            recorded_tone: None,
            recorded_slogan_count: None,
        };
        debug!(conversation_id = %session.conversation_id, "session created");
        session
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn conversation_id(&self) -> &ConversationId {
        &self.conversation_id
    }

    /// Replace the transcript with the greeting and issue a new conversation id.
    pub fn reset(&mut self) {
        self.messages.clear();
        self.messages.push(Message::assistant(GREETING));
        self.rotate_conversation_id();
    }

    pub fn rotate_conversation_id(&mut self) {
        let previous = std::mem::replace(&mut self.conversation_id, ConversationId::generate());
        debug!(
            previous = %previous,
            current = %self.conversation_id,
            "conversation id rotated"
        );
    }

    /// Record the current tone and slogan count, resetting the session when
    /// either differs from the previously recorded value.
    ///
    /// Returns `true` when the transcript was cleared.
    pub fn observe_selection(&mut self, tone: &Tone, slogan_count: SloganCount) -> bool {
        let tone_changed = self
            .recorded_tone
            .as_ref()
            .is_some_and(|previous| previous != tone);
        let count_changed = self
            .recorded_slogan_count
            .is_some_and(|previous| previous != slogan_count);

        self.recorded_tone = Some(tone.clone());
        self.recorded_slogan_count = Some(slogan_count);

        if tone_changed || count_changed {
            self.reset();
            true
        } else {
            false
        }
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.messages.push(Message::user(content));
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.messages.push(Message::assistant(content));
    }

    /// Remove the last message if it was written by the user.
    pub fn pop_trailing_user(&mut self) -> Option<Message> {
        if self.messages.last().is_some_and(Message::is_user) {
            self.messages.pop()
        } else {
            None
        }
    }

    /// All message contents in order, joined by newlines.
    pub fn transcript_text(&self) -> String {
        self.messages
            .iter()
            .map(|message| message.content.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
