//! Diagnostic logging setup.
//!
//! The full-screen UI owns the terminal, so diagnostics there only go to a
//! file named on the command line. One-shot commands may log to stderr.

use std::error::Error;
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget<'a> {
    File(&'a Path),
    Stderr,
    Disabled,
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

pub fn init_tracing(target: LogTarget<'_>) -> Result<(), Box<dyn Error>> {
    match target {
        LogTarget::File(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
                .map_err(|e| -> Box<dyn Error> { e })?;
        }
        LogTarget::Stderr => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .with_writer(std::io::stderr)
                .try_init()
                .map_err(|e| -> Box<dyn Error> { e })?;
        }
        LogTarget::Disabled => {}
    }
    Ok(())
}
