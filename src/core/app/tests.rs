use super::*;
use crate::core::chat_stream::{StreamError, StreamMessage};
use crate::core::feedback::Sentiment;
use crate::core::message::{Message, Role};
use crate::core::session::GREETING;
use crate::core::settings::{Creativity, ModelChoice, SloganCount, Tone};
use crate::utils::test_utils::{
    create_app_without_credential, create_test_app, create_test_app_with_feedback, TEST_TOKEN,
};
use tempfile::TempDir;

fn submit(app: &mut App, prompt: &str) -> StreamParams {
    match apply_action(
        app,
        AppAction::SubmitPrompt {
            prompt: prompt.to_string(),
        },
    ) {
        Some(AppCommand::SpawnStream(params)) => params,
        None => panic!("expected a stream to be spawned"),
    }
}

fn assistant_count(app: &App) -> usize {
    app.session
        .messages()
        .iter()
        .filter(|m| m.is_assistant())
        .count()
}

#[test]
fn scripted_fragments_are_committed_once() {
    let mut app = create_test_app();
    let params = submit(&mut app, "a sunscreen brand");
    let id = params.stream_id;
    assert_eq!(app.stream.phase, StreamPhase::AwaitingFirstChunk);
    assert_eq!(app.in_flight_response(), Some(""));

    apply_action(&mut app, (StreamMessage::Chunk("Shine ".into()), id).into());
    assert_eq!(app.stream.phase, StreamPhase::Streaming);
    assert_eq!(app.in_flight_response(), Some("Shine "));

    apply_action(&mut app, (StreamMessage::Chunk("bright.".into()), id).into());
    assert_eq!(app.in_flight_response(), Some("Shine bright."));

    apply_action(&mut app, (StreamMessage::End, id).into());
    apply_action(&mut app, (StreamMessage::End, id).into());

    assert_eq!(app.stream.phase, StreamPhase::Done);
    assert_eq!(app.in_flight_response(), None);
    let messages = app.session.messages();
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[2], Message::assistant("Shine bright."));
    assert_eq!(
        messages
            .iter()
            .filter(|m| m.content == "Shine bright.")
            .count(),
        1
    );
}

#[test]
fn request_carries_settings_and_composed_prompt() {
    let mut app = create_test_app();
    apply_action(
        &mut app,
        AppAction::SelectModel {
            model: ModelChoice::Llama2_13B,
        },
    );
    apply_action(
        &mut app,
        AppAction::SelectCreativity {
            level: Creativity::Balanced,
        },
    );

    let params = submit(&mut app, "  a bike shop \n");
    assert_eq!(params.api_token, TEST_TOKEN);
    assert_eq!(params.base_url, "https://api.test.com/v1");
    assert_eq!(params.request.version, ModelChoice::Llama2_13B.version_id());
    assert!(params.request.stream);
    let input = &params.request.input;
    assert_eq!(input.temperature, 2.5);
    assert_eq!(input.top_p, 0.01);
    assert_eq!(input.max_length, 1024);
    assert_eq!(input.repetition_penalty, 1.0);
    assert!(input.prompt.contains("Generate exactly 1 slogans"));
    assert!(input.prompt.contains("User: a bike shop\n\n"));
    assert!(input.prompt.ends_with(" a bike shop"));
    assert_eq!(
        app.session.messages().last(),
        Some(&Message::user("a bike shop"))
    );
}

#[test]
fn creativity_selection_is_last_choice_wins() {
    let mut app = create_test_app();
    for level in [Creativity::Creative, Creativity::Precise, Creativity::Balanced] {
        apply_action(&mut app, AppAction::SelectCreativity { level });
    }
    assert_eq!(app.settings.creativity, Creativity::Balanced);
    assert_eq!(app.session.messages().len(), 1);
}

#[test]
fn blank_prompts_are_ignored() {
    let mut app = create_test_app();
    let command = apply_action(
        &mut app,
        AppAction::SubmitPrompt {
            prompt: "   \n".into(),
        },
    );
    assert!(command.is_none());
    assert_eq!(app.stream.phase, StreamPhase::Idle);
    assert_eq!(app.session.messages().len(), 1);
}

#[test]
fn prompts_are_rejected_without_credential() {
    let mut app = create_app_without_credential();
    assert!(!app.can_submit());

    let command = apply_action(
        &mut app,
        AppAction::SubmitPrompt {
            prompt: "a bakery".into(),
        },
    );

    assert!(command.is_none());
    assert_eq!(app.session.messages().len(), 1);
    let notice = app.notice.as_ref().expect("warning shown");
    assert_eq!(notice.kind, NoticeKind::Warning);
}

#[test]
fn only_plausible_tokens_enable_submission() {
    let mut app = create_app_without_credential();

    for bad in ["", "r8_short", "sk-0123456789abcdefghijklmnopqrstuvwxyzAB"] {
        apply_action(&mut app, AppAction::SubmitCredential { token: bad.into() });
        assert!(!app.can_submit(), "accepted {bad:?}");
    }

    apply_action(
        &mut app,
        AppAction::SubmitCredential {
            token: TEST_TOKEN.into(),
        },
    );
    assert!(app.can_submit());
    assert_eq!(
        app.notice.as_ref().map(|n| n.kind),
        Some(NoticeKind::Success)
    );
}

#[test]
fn changing_tone_or_count_resets_but_reselecting_does_not() {
    let mut app = create_test_app();
    let params = submit(&mut app, "a bakery");
    apply_action(
        &mut app,
        AppAction::StreamChunk {
            content: "Rise.".into(),
            stream_id: params.stream_id,
        },
    );
    apply_action(
        &mut app,
        AppAction::StreamCompleted {
            stream_id: params.stream_id,
        },
    );
    assert_eq!(app.session.messages().len(), 3);
    let id = app.session.conversation_id().clone();

    apply_action(&mut app, AppAction::SelectTone { tone: Tone::Friendly });
    apply_action(
        &mut app,
        AppAction::SetSloganCount {
            count: SloganCount::default(),
        },
    );
    assert_eq!(app.session.messages().len(), 3);
    assert_eq!(app.session.conversation_id(), &id);

    apply_action(&mut app, AppAction::SelectTone { tone: Tone::Sarcastic });
    assert_eq!(app.session.messages(), &[Message::assistant(GREETING)]);
    assert_ne!(app.session.conversation_id(), &id);

    app.session.push_user("again");
    apply_action(
        &mut app,
        AppAction::SetSloganCount {
            count: SloganCount::new(3).expect("valid"),
        },
    );
    assert_eq!(app.session.messages().len(), 1);
}

#[test]
fn clear_history_resets_transcript_and_id() {
    let mut app = create_test_app();
    app.session.push_user("tea");
    app.session.push_assistant("Steep happens.");
    let id = app.session.conversation_id().clone();

    apply_action(&mut app, AppAction::ClearHistory);

    assert_eq!(app.session.messages().len(), 1);
    assert_eq!(app.session.messages()[0].role, Role::Assistant);
    assert_eq!(app.session.messages()[0].content, GREETING);
    assert_ne!(app.session.conversation_id(), &id);
}

#[test]
fn failures_leave_transcript_as_before_submission() {
    let mut app = create_test_app();
    let before = app.session.messages().to_vec();

    let params = submit(&mut app, "a gym");
    apply_action(
        &mut app,
        AppAction::StreamChunk {
            content: "Lift".into(),
            stream_id: params.stream_id,
        },
    );
    apply_action(
        &mut app,
        (
            StreamMessage::Error(StreamError::Authentication("invalid token".into())),
            params.stream_id,
        )
            .into(),
    );
    apply_action(&mut app, (StreamMessage::End, params.stream_id).into());

    assert_eq!(app.session.messages(), before.as_slice());
    assert!(matches!(
        app.stream.phase,
        StreamPhase::Failed(ref msg) if msg.contains("invalid token")
    ));
    assert!(!app.is_busy());
    assert_eq!(app.take_restored_input().as_deref(), Some("a gym"));
    assert_eq!(app.notice.as_ref().map(|n| n.kind), Some(NoticeKind::Error));
    assert_eq!(assistant_count(&app), 1);
}

#[test]
fn stale_stream_events_are_ignored() {
    let mut app = create_test_app();
    let first = submit(&mut app, "one");
    apply_action(&mut app, AppAction::StreamCompleted { stream_id: first.stream_id });

    let second = submit(&mut app, "two");
    apply_action(
        &mut app,
        AppAction::StreamChunk {
            content: "late".into(),
            stream_id: first.stream_id,
        },
    );
    apply_action(&mut app, AppAction::StreamCompleted { stream_id: first.stream_id });

    assert!(app.is_busy());
    assert_eq!(app.in_flight_response(), Some(""));
    assert_ne!(first.stream_id, second.stream_id);
}

#[test]
fn settings_and_feedback_wait_while_streaming() {
    let temp_dir = TempDir::new().expect("temp dir");
    let path = temp_dir.path().join("feedback.csv");
    let mut app = create_test_app_with_feedback(&path);
    let params = submit(&mut app, "a library");

    let commands = apply_actions(
        &mut app,
        [
            AppAction::SelectTone { tone: Tone::Formal },
            AppAction::ClearHistory,
            AppAction::SubmitFeedback {
                sentiment: Sentiment::Positive,
            },
            AppAction::SubmitPrompt {
                prompt: "another".into(),
            },
        ],
    );

    assert!(commands.is_empty());
    assert_eq!(app.settings.tone, Tone::Friendly);
    assert_eq!(app.session.messages().len(), 2);
    assert!(!path.exists());
    assert_eq!(app.stream.current_stream_id, params.stream_id);
}

#[test]
fn feedback_appends_row_and_rotates_id() {
    let temp_dir = TempDir::new().expect("temp dir");
    let path = temp_dir.path().join("feedback.csv");
    let mut app = create_test_app_with_feedback(&path);
    app.session.push_user("a bakery");
    let id = app.session.conversation_id().clone();

    apply_action(
        &mut app,
        AppAction::SubmitFeedback {
            sentiment: Sentiment::Negative,
        },
    );

    let mut reader = csv::Reader::from_path(&path).expect("csv");
    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.expect("row")).collect();
    assert_eq!(rows.len(), 1);
    assert_eq!(&rows[0][0], id.as_str());
    assert_eq!(&rows[0][1], format!("{GREETING}\na bakery").as_str());
    assert_eq!(&rows[0][2], "Negative");
    assert_ne!(app.session.conversation_id(), &id);
    assert_eq!(app.session.messages().len(), 2);
    assert_eq!(app.notice.as_ref().map(|n| n.kind), Some(NoticeKind::Success));
}

#[test]
fn feedback_write_failure_is_visible_and_keeps_id() {
    let temp_dir = TempDir::new().expect("temp dir");
    let path = temp_dir.path().join("no-such-dir").join("feedback.csv");
    let mut app = create_test_app_with_feedback(&path);
    let id = app.session.conversation_id().clone();

    apply_action(
        &mut app,
        AppAction::SubmitFeedback {
            sentiment: Sentiment::Positive,
        },
    );

    let notice = app.notice.as_ref().expect("notice");
    assert_eq!(notice.kind, NoticeKind::Error);
    assert!(notice.text.starts_with("Feedback not recorded"));
    assert_eq!(app.session.conversation_id(), &id);
}

#[test]
fn payment_link_is_shown_as_notice() {
    let mut app = create_test_app();
    apply_action(&mut app, AppAction::ShowPaymentLink);
    let notice = app.notice.as_ref().expect("notice");
    assert!(notice.text.contains(PAYMENT_URL));
}

#[test]
fn notices_expire_after_ttl() {
    let mut app = create_test_app();
    app.set_notice(NoticeKind::Info, "hello");
    let created = app.notice.as_ref().expect("notice").created_at;
    assert!(!app.expire_notice(created));
    assert!(app.expire_notice(created + NOTICE_TTL));
    assert!(app.notice.is_none());
}
