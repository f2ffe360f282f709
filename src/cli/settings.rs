//! `set` / `unset` handling for the configuration file.

use std::error::Error;
use std::fmt;
use std::path::PathBuf;

use crate::core::config::Config;
use crate::core::settings::{Creativity, ModelChoice, SettingsError, SloganCount, Tone};

/// Keys accepted by `gencontenthub set` and `gencontenthub unset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKey {
    Tone,
    Slogans,
    Model,
    Creativity,
    FeedbackFile,
    BaseUrl,
}

impl SettingKey {
    pub const ALL: [SettingKey; 6] = [
        SettingKey::Tone,
        SettingKey::Slogans,
        SettingKey::Model,
        SettingKey::Creativity,
        SettingKey::FeedbackFile,
        SettingKey::BaseUrl,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SettingKey::Tone => "tone",
            SettingKey::Slogans => "slogans",
            SettingKey::Model => "model",
            SettingKey::Creativity => "creativity",
            SettingKey::FeedbackFile => "feedback-file",
            SettingKey::BaseUrl => "base-url",
        }
    }

    pub fn parse(key: &str) -> Result<Self, SettingError> {
        SettingKey::ALL
            .into_iter()
            .find(|candidate| candidate.name() == key)
            .ok_or_else(|| SettingError::UnknownKey(key.to_string()))
    }
}

/// Errors that can occur when modifying configuration settings.
#[derive(Debug)]
pub enum SettingError {
    /// The provided setting key is not recognized.
    UnknownKey(String),
    /// The tone is not one of the sidebar's tones.
    UnknownTone(String),
    /// The value was rejected by the settings model.
    InvalidValue(SettingsError),
    /// The slogan count is not a number.
    NotANumber(String),
}

impl fmt::Display for SettingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingError::UnknownKey(key) => {
                let known: Vec<&str> = SettingKey::ALL.iter().map(|k| k.name()).collect();
                write!(
                    f,
                    "Unknown config key: {key} (expected one of: {})",
                    known.join(", ")
                )
            }
            SettingError::UnknownTone(tone) => {
                let known: Vec<String> = Tone::RECOGNIZED
                    .iter()
                    .map(|tone| tone.label().to_string())
                    .collect();
                write!(f, "Unknown tone: {tone} (expected one of: {})", known.join(", "))
            }
            SettingError::InvalidValue(err) => write!(f, "{err}"),
            SettingError::NotANumber(value) => write!(f, "Not a number: {value}"),
        }
    }
}

impl Error for SettingError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            SettingError::InvalidValue(err) => Some(err),
            _ => None,
        }
    }
}

impl From<SettingsError> for SettingError {
    fn from(err: SettingsError) -> Self {
        SettingError::InvalidValue(err)
    }
}

/// Validate `value` and store it under `key`. Returns the stored form.
pub fn set_value(
    config: &mut Config,
    key: SettingKey,
    value: &str,
) -> Result<String, SettingError> {
    let value = value.trim();
    let stored = match key {
        SettingKey::Tone => {
            let tone = Tone::from_label(value);
            if tone.directive().is_none() {
                return Err(SettingError::UnknownTone(value.to_string()));
            }
            config.tone = Some(tone.label().to_string());
            tone.label().to_string()
        }
        SettingKey::Slogans => {
            let parsed: i64 = value
                .parse()
                .map_err(|_| SettingError::NotANumber(value.to_string()))?;
            let count = SloganCount::new(parsed)?;
            config.slogan_count = Some(i64::from(count.get()));
            count.to_string()
        }
        SettingKey::Model => {
            let model: ModelChoice = value.parse()?;
            config.model = Some(model.label().to_string());
            model.label().to_string()
        }
        SettingKey::Creativity => {
            let level: Creativity = value.parse()?;
            config.creativity = Some(level.label().to_string());
            level.label().to_string()
        }
        SettingKey::FeedbackFile => {
            config.feedback_file = Some(PathBuf::from(value));
            value.to_string()
        }
        SettingKey::BaseUrl => {
            config.api_base_url = Some(value.to_string());
            value.to_string()
        }
    };
    Ok(stored)
}

pub fn unset_value(config: &mut Config, key: SettingKey) {
    match key {
        SettingKey::Tone => config.tone = None,
        SettingKey::Slogans => config.slogan_count = None,
        SettingKey::Model => config.model = None,
        SettingKey::Creativity => config.creativity = None,
        SettingKey::FeedbackFile => config.feedback_file = None,
        SettingKey::BaseUrl => config.api_base_url = None,
    }
}
