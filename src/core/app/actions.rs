use tracing::{debug, info, warn};

use super::{App, NoticeKind, StreamPhase, PAYMENT_URL};
use crate::auth::Credential;
use crate::core::chat_stream::{StreamError, StreamMessage, StreamParams};
use crate::core::feedback::Sentiment;
use crate::core::prompt::compose_prompt;
use crate::core::settings::{Creativity, ModelChoice, SloganCount, Tone};

const BUSY_NOTICE: &str = "Please wait for the current response to finish.";
const MISSING_CREDENTIAL_NOTICE: &str = "Please enter your credentials!";

#[derive(Debug)]
pub enum AppAction {
    SubmitPrompt { prompt: String },
    SubmitCredential { token: String },
    SelectTone { tone: Tone },
    SetSloganCount { count: SloganCount },
    SelectModel { model: ModelChoice },
    SelectCreativity { level: Creativity },
    ClearHistory,
    SubmitFeedback { sentiment: Sentiment },
    ShowPaymentLink,
    StreamChunk { content: String, stream_id: u64 },
    StreamFailed { error: StreamError, stream_id: u64 },
    StreamCompleted { stream_id: u64 },
}

impl From<(StreamMessage, u64)> for AppAction {
    fn from((message, stream_id): (StreamMessage, u64)) -> Self {
        match message {
            StreamMessage::Chunk(content) => AppAction::StreamChunk { content, stream_id },
            StreamMessage::Error(error) => AppAction::StreamFailed { error, stream_id },
            StreamMessage::End => AppAction::StreamCompleted { stream_id },
        }
    }
}

pub enum AppCommand {
    SpawnStream(StreamParams),
}

pub fn apply_actions(
    app: &mut App,
    actions: impl IntoIterator<Item = AppAction>,
) -> Vec<AppCommand> {
    actions
        .into_iter()
        .filter_map(|action| apply_action(app, action))
        .collect()
}

pub fn apply_action(app: &mut App, action: AppAction) -> Option<AppCommand> {
    match action {
        AppAction::StreamChunk { content, stream_id } => {
            append_chunk(app, &content, stream_id);
            None
        }
        AppAction::StreamFailed { error, stream_id } => {
            fail_stream(app, error, stream_id);
            None
        }
        AppAction::StreamCompleted { stream_id } => {
            finalize_stream(app, stream_id);
            None
        }
        AppAction::SubmitCredential { token } => {
            submit_credential(app, &token);
            None
        }
        AppAction::ShowPaymentLink => {
            app.set_notice(
                NoticeKind::Info,
                format!("Add credits to your account: {PAYMENT_URL}"),
            );
            None
        }
        _ if app.is_busy() => {
            app.set_notice(NoticeKind::Info, BUSY_NOTICE);
            None
        }
        AppAction::SubmitPrompt { prompt } => submit_prompt(app, prompt),
        AppAction::SelectTone { tone } => {
            app.settings.tone = tone;
            observe_selection(app);
            None
        }
        AppAction::SetSloganCount { count } => {
            app.settings.slogan_count = count;
            observe_selection(app);
            None
        }
        AppAction::SelectModel { model } => {
            app.settings.model = model;
            None
        }
        AppAction::SelectCreativity { level } => {
            app.settings.creativity = level;
            None
        }
        AppAction::ClearHistory => {
            app.session.reset();
            app.stream.phase = StreamPhase::Idle;
            app.set_notice(NoticeKind::Info, "Chat history cleared.");
            None
        }
        AppAction::SubmitFeedback { sentiment } => {
            submit_feedback(app, sentiment);
            None
        }
    }
}

fn observe_selection(app: &mut App) {
    let cleared = app
        .session
        .observe_selection(&app.settings.tone, app.settings.slogan_count);
    if cleared {
        debug!(
            tone = %app.settings.tone,
            slogans = app.settings.slogan_count.get(),
            "selection changed, session reset"
        );
        app.stream.phase = StreamPhase::Idle;
        app.set_notice(
            NoticeKind::Info,
            "Response settings changed; chat history cleared.",
        );
    }
}

fn submit_credential(app: &mut App, token: &str) {
    if app.has_credential() {
        return;
    }
    match Credential::from_interactive(token) {
        Some(credential) => {
            info!(source = credential.source().describe(), "credential accepted");
            app.credential = Some(credential);
            app.set_notice(
                NoticeKind::Success,
                "Proceed to entering your prompt message!",
            );
        }
        None => {
            app.set_notice(NoticeKind::Warning, MISSING_CREDENTIAL_NOTICE);
        }
    }
}

fn submit_prompt(app: &mut App, prompt: String) -> Option<AppCommand> {
    let prompt = prompt.trim().to_string();
    if prompt.is_empty() {
        return None;
    }

    let token = match &app.credential {
        Some(credential) => credential.token().to_string(),
        None => {
            app.set_notice(NoticeKind::Warning, MISSING_CREDENTIAL_NOTICE);
            return None;
        }
    };

    app.session.push_user(prompt.clone());
    let payload = compose_prompt(
        &app.settings.tone,
        app.settings.slogan_count,
        app.session.messages(),
        &prompt,
    );
    let stream_id = app.stream.begin();
    info!(
        stream_id,
        model = app.settings.model.label(),
        temperature = app.settings.creativity.temperature(),
        prompt_bytes = payload.len(),
        "submitting prompt"
    );

    Some(AppCommand::SpawnStream(app.build_stream_params(
        &token, payload, stream_id,
    )))
}

fn append_chunk(app: &mut App, chunk: &str, stream_id: u64) {
    if !app.stream.is_current(stream_id) {
        debug!(stream_id, "dropping chunk from stale stream");
        return;
    }
    app.stream.pending.push_str(chunk);
    app.stream.phase = StreamPhase::Streaming;
}

fn finalize_stream(app: &mut App, stream_id: u64) {
    if !app.stream.is_current(stream_id) {
        return;
    }
    let response = app.stream.settle(StreamPhase::Done);
    debug!(stream_id, chars = response.chars().count(), "stream committed");
    app.session.push_assistant(response);
}

fn fail_stream(app: &mut App, error: StreamError, stream_id: u64) {
    if !app.stream.is_current(stream_id) {
        return;
    }
    let message = error.to_string();
    warn!(stream_id, error = %message, "response failed");
    app.stream.settle(StreamPhase::Failed(message.clone()));
    if let Some(unanswered) = app.session.pop_trailing_user() {
        app.restored_input = Some(unanswered.content);
    }
    app.set_notice(NoticeKind::Error, message);
}

fn submit_feedback(app: &mut App, sentiment: Sentiment) {
    let transcript = app.session.transcript_text();
    match app
        .feedback
        .record(app.session.conversation_id(), &transcript, sentiment)
    {
        Ok(()) => {
            app.session.rotate_conversation_id();
            app.set_notice(NoticeKind::Success, "Feedback recorded!");
        }
        Err(err) => {
            warn!(error = %err, "feedback not recorded");
            app.set_notice(NoticeKind::Error, format!("Feedback not recorded: {err}"));
        }
    }
}
