//! Builds the instruction-augmented text payload sent to the model.

use crate::core::message::Message;
use crate::core::settings::{SloganCount, Tone};

const PREAMBLE: &str = "You are an AI assistant designed to create slogans.";

/// Compose the prompt for one request.
///
/// `messages` is the transcript as it stands when the request is issued,
/// which already includes the user's newest message; `prompt` is appended
/// once more at the very end.
pub fn compose_prompt(
    tone: &Tone,
    slogan_count: SloganCount,
    messages: &[Message],
    prompt: &str,
) -> String {
    let mut dialogue = format!(
        "{PREAMBLE}\n\n Generate exactly {} slogans.\n\n",
        slogan_count.get()
    );

    if let Some(directive) = tone.directive() {
        dialogue.push_str(directive);
        dialogue.push_str("\n\n");
    }

    for message in messages {
        dialogue.push_str(message.role.transcript_label());
        dialogue.push_str(": ");
        dialogue.push_str(&message.content);
        dialogue.push_str("\n\n");
    }

    format!("{dialogue} {prompt}")
}
