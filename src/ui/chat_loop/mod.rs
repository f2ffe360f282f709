//! Main chat event loop.
//!
//! The loop owns the [`App`] and the [`ViewState`]. Terminal input arrives
//! from a reader task, stream events from [`ChatStreamService`]; both are
//! turned into [`AppAction`]s and applied in order each tick, and any
//! resulting [`AppCommand`]s are started before the next frame is drawn.

mod keybindings;
mod lifecycle;

use std::{
    error::Error,
    time::{Duration, Instant},
};

use ratatui::crossterm::event::{self, Event, KeyEventKind};
use tokio::sync::mpsc;
use tracing::{info, warn};

use self::keybindings::{handle_key, KeyResult};
use self::lifecycle::{restore_terminal, setup_terminal, ChatTerminal};
use crate::core::app::{apply_actions, App, AppAction, AppCommand, AppInitConfig, NoticeKind};
use crate::core::chat_stream::{ChatStreamService, StreamMessage};
use crate::ui::renderer::ui;
use crate::ui::view::ViewState;

const MAX_FPS: u64 = 30;

#[derive(Debug)]
pub enum UiEvent {
    Crossterm(Event),
}

fn spawn_event_reader(event_tx: mpsc::UnboundedSender<UiEvent>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            if let Ok(true) = event::poll(Duration::from_millis(50)) {
                match event::read() {
                    Ok(ev) => {
                        if event_tx.send(UiEvent::Crossterm(ev)).is_err() {
                            break;
                        }
                    }
                    Err(_) => {
                        continue;
                    }
                }
            } else {
                tokio::task::yield_now().await;
            }
        }
    })
}

struct EventProcessingOutcome {
    actions: Vec<AppAction>,
    events_processed: bool,
    exit_requested: bool,
}

fn process_ui_events(
    app: &App,
    view: &mut ViewState,
    event_rx: &mut mpsc::UnboundedReceiver<UiEvent>,
) -> EventProcessingOutcome {
    let mut outcome = EventProcessingOutcome {
        actions: Vec::new(),
        events_processed: false,
        exit_requested: false,
    };

    while let Ok(ev) = event_rx.try_recv() {
        outcome.events_processed = true;
        match ev {
            UiEvent::Crossterm(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                match handle_key(view, app, key) {
                    KeyResult::Exit => {
                        outcome.exit_requested = true;
                        break;
                    }
                    KeyResult::Dispatch(action) => outcome.actions.push(action),
                    KeyResult::Handled | KeyResult::Ignored => {}
                }
            }
            UiEvent::Crossterm(Event::Paste(text)) => {
                let text = if view.is_masked() {
                    text.trim().to_string()
                } else {
                    text
                };
                view.textarea.insert_str(text);
            }
            UiEvent::Crossterm(_) => {}
        }
    }

    outcome
}

fn drain_stream_updates(
    rx: &mut mpsc::UnboundedReceiver<(StreamMessage, u64)>,
    actions: &mut Vec<AppAction>,
) -> bool {
    let mut received_any = false;
    while let Ok(update) = rx.try_recv() {
        actions.push(update.into());
        received_any = true;
    }
    received_any
}

fn execute_commands(stream_service: &ChatStreamService, commands: Vec<AppCommand>) {
    for cmd in commands {
        match cmd {
            AppCommand::SpawnStream(params) => stream_service.spawn_stream(params),
        }
    }
}

async fn event_loop(
    app: &mut App,
    view: &mut ViewState,
    terminal: &mut ChatTerminal,
    event_rx: &mut mpsc::UnboundedReceiver<UiEvent>,
) -> Result<(), Box<dyn Error>> {
    let (stream_service, mut stream_rx) = ChatStreamService::new();
    let frame_duration = Duration::from_millis(1000 / MAX_FPS);

    loop {
        terminal.draw(|f| ui(f, app, view))?;

        let mut outcome = process_ui_events(app, view, event_rx);
        if outcome.exit_requested {
            return Ok(());
        }

        let received_any = drain_stream_updates(&mut stream_rx, &mut outcome.actions);

        let commands = apply_actions(app, outcome.actions);
        execute_commands(&stream_service, commands);

        view.sync_mask(app.has_credential());
        if let Some(prompt) = app.take_restored_input() {
            view.set_input(&prompt);
        }
        app.expire_notice(Instant::now());

        if !outcome.events_processed && !received_any {
            tokio::time::sleep(frame_duration).await;
        }
    }
}

pub async fn run_chat(config: AppInitConfig) -> Result<(), Box<dyn Error>> {
    let mut app = App::new(config);

    if let Err(err) = app.feedback.ensure_file() {
        warn!(error = %err, "feedback file unavailable");
        app.set_notice(NoticeKind::Error, err.to_string());
    }

    info!(
        conversation_id = %app.session.conversation_id(),
        credential = app.has_credential(),
        "starting chat session"
    );

    let mut view = ViewState::new(!app.has_credential());
    let mut terminal = setup_terminal()?;

    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<UiEvent>();
    let event_reader_handle = spawn_event_reader(event_tx);

    let result = event_loop(&mut app, &mut view, &mut terminal, &mut event_rx).await;

    event_reader_handle.abort();
    restore_terminal(&mut terminal)?;

    result
}
