//! Append-only CSV log of user feedback.
//!
//! Each row records which conversation the feedback refers to, the whole
//! transcript at the time it was given, and whether it was positive or
//! negative. Rows are never updated or deleted, and the same conversation
//! id may appear more than once.
//!
//! Rows end in `\r\n`. They are encoded in memory and appended with a
//! single `write_all` on a handle opened in append mode. Writers in other
//! processes are not coordinated with; whether their rows can interleave
//! depends on the platform's append atomicity for the row size.

use std::error::Error as StdError;
use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::core::config::data::path_display;
use crate::core::session::ConversationId;

pub const DEFAULT_FEEDBACK_FILE: &str = "feedback.csv";
pub const HEADER: [&str; 3] = ["Conversation Unique ID", "Entire Conversation", "Feedback"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sentiment {
    Positive,
    Negative,
}

impl Sentiment {
    pub fn as_str(self) -> &'static str {
        match self {
            Sentiment::Positive => "Positive",
            Sentiment::Negative => "Negative",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised while appending to the feedback file.
#[derive(Debug)]
pub enum FeedbackError {
    /// The file could not be created or opened for appending.
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The row was encoded but could not be written out.
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The row could not be encoded as CSV.
    Encode(csv::Error),
}

impl fmt::Display for FeedbackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedbackError::Open { path, source } => write!(
                f,
                "Failed to open feedback file {}: {}",
                path_display(path),
                source
            ),
            FeedbackError::Write { path, source } => write!(
                f,
                "Failed to write feedback file {}: {}",
                path_display(path),
                source
            ),
            FeedbackError::Encode(source) => write!(f, "Failed to encode feedback row: {source}"),
        }
    }
}

impl StdError for FeedbackError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            FeedbackError::Open { source, .. } | FeedbackError::Write { source, .. } => {
                Some(source)
            }
            FeedbackError::Encode(source) => Some(source),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FeedbackLogger {
    path: PathBuf,
}

impl FeedbackLogger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the file with its header row if it does not exist yet.
    pub fn ensure_file(&self) -> Result<(), FeedbackError> {
        let mut file = self.open_for_append()?;
        self.write_header_if_empty(&mut file)
    }

    /// Append one feedback row.
    pub fn record(
        &self,
        conversation_id: &ConversationId,
        transcript: &str,
        sentiment: Sentiment,
    ) -> Result<(), FeedbackError> {
        let row = encode_row([conversation_id.as_str(), transcript, sentiment.as_str()])?;

        let mut file = self.open_for_append()?;
        self.write_header_if_empty(&mut file)?;
        file.write_all(&row)
            .and_then(|()| file.flush())
            .map_err(|source| self.write_error(source))?;

        info!(
            conversation_id = %conversation_id,
            sentiment = sentiment.as_str(),
            path = %self.path.display(),
            "feedback recorded"
        );
        Ok(())
    }

    fn open_for_append(&self) -> Result<fs::File, FeedbackError> {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|source| FeedbackError::Open {
                path: self.path.clone(),
                source,
            })
    }

    fn write_header_if_empty(&self, file: &mut fs::File) -> Result<(), FeedbackError> {
        let len = file
            .metadata()
            .map_err(|source| self.write_error(source))?
            .len();
        if len > 0 {
            return Ok(());
        }

        debug!(path = %self.path.display(), "writing feedback header");
        let header = encode_row(HEADER)?;
        file.write_all(&header)
            .map_err(|source| self.write_error(source))
    }

    fn write_error(&self, source: std::io::Error) -> FeedbackError {
        FeedbackError::Write {
            path: self.path.clone(),
            source,
        }
    }
}

fn encode_row<'a>(fields: impl IntoIterator<Item = &'a str>) -> Result<Vec<u8>, FeedbackError> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::CRLF)
        .from_writer(Vec::new());
    writer.write_record(fields).map_err(FeedbackError::Encode)?;
    writer
        .into_inner()
        .map_err(|err| FeedbackError::Encode(csv::Error::from(err.into_error())))
}
