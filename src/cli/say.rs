//! TUI-less "say" command

use std::error::Error;
use std::io::{self, Write};

use tracing::info;

use crate::core::app::{apply_action, App, AppAction, AppCommand, AppInitConfig, StreamPhase};
use crate::core::chat_stream::ChatStreamService;

/// Stream one response to stdout using the same composition and request path as the UI.
pub async fn run_say(prompt: String, config: AppInitConfig) -> Result<(), Box<dyn Error>> {
    if prompt.trim().is_empty() {
        eprintln!("Usage: gencontenthub say <prompt>");
        std::process::exit(1);
    }

    let mut app = App::new(config);
    if !app.has_credential() {
        eprintln!("❌ No Replicate API token found.");
        eprintln!();
        eprintln!("💡 Quick fixes:");
        eprintln!("  • export REPLICATE_API_TOKEN=r8_...");
        eprintln!("  • gencontenthub auth");
        std::process::exit(1);
    }

    let params = match apply_action(&mut app, AppAction::SubmitPrompt { prompt }) {
        Some(AppCommand::SpawnStream(params)) => params,
        None => return Ok(()),
    };
    info!(model = app.settings.model.label(), "sending one-shot prompt");

    let (stream_service, mut rx) = ChatStreamService::new();
    stream_service.spawn_stream(params);

    let mut stdout = io::stdout();
    while let Some((message, stream_id)) = rx.recv().await {
        let action = AppAction::from((message, stream_id));
        if let AppAction::StreamChunk { content, .. } = &action {
            if app.stream.is_current(stream_id) {
                write!(stdout, "{content}")?;
                stdout.flush()?;
            }
        }
        apply_action(&mut app, action);
        if !app.is_busy() {
            break;
        }
    }

    match &app.stream.phase {
        StreamPhase::Failed(message) => {
            eprintln!("\n\n❌ Error: {message}");
            std::process::exit(1);
        }
        _ => {
            writeln!(stdout)?;
            Ok(())
        }
    }
}
