use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::core::feedback::DEFAULT_FEEDBACK_FILE;
use crate::core::settings::{Creativity, ModelChoice, Settings, SettingsError, SloganCount, Tone};

pub const DEFAULT_API_BASE_URL: &str = "https://api.replicate.com/v1";

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct Config {
    /// Initial tone label (e.g., "Friendly", "Sarcastic")
    pub tone: Option<String>,
    /// Initial number of slogans per response, 1 through 5
    pub slogan_count: Option<i64>,
    /// Initial model label ("Llama2-7B" or "Llama2-13B")
    pub model: Option<String>,
    /// Initial creativity level ("Precise", "Balanced" or "Creative")
    pub creativity: Option<String>,
    /// Where feedback rows are appended
    pub feedback_file: Option<PathBuf>,
    /// Base URL of the predictions API
    pub api_base_url: Option<String>,
}

/// Values passed on the command line, which take precedence over the file.
#[derive(Debug, Default, Clone)]
pub struct SettingsOverrides {
    pub tone: Option<String>,
    pub slogan_count: Option<i64>,
    pub model: Option<String>,
    pub creativity: Option<String>,
}

impl Config {
    /// Resolve the sidebar's initial state from overrides, then the file, then defaults.
    pub fn initial_settings(
        &self,
        overrides: &SettingsOverrides,
    ) -> Result<Settings, SettingsError> {
        let tone = overrides
            .tone
            .as_deref()
            .or(self.tone.as_deref())
            .map(Tone::from_label)
            .unwrap_or_default();

        let slogan_count = match overrides.slogan_count.or(self.slogan_count) {
            Some(value) => SloganCount::new(value)?,
            None => SloganCount::default(),
        };

        let model = match overrides.model.as_deref().or(self.model.as_deref()) {
            Some(label) => label.parse::<ModelChoice>()?,
            None => ModelChoice::default(),
        };

        let creativity = match overrides
            .creativity
            .as_deref()
            .or(self.creativity.as_deref())
        {
            Some(label) => label.parse::<Creativity>()?,
            None => Creativity::default(),
        };

        Ok(Settings {
            tone,
            slogan_count,
            model,
            creativity,
        })
    }

    pub fn feedback_path(&self, override_path: Option<&Path>) -> PathBuf {
        override_path
            .map(Path::to_path_buf)
            .or_else(|| self.feedback_file.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_FEEDBACK_FILE))
    }

    pub fn api_base_url(&self) -> &str {
        self.api_base_url
            .as_deref()
            .unwrap_or(DEFAULT_API_BASE_URL)
    }
}

/// Get a user-friendly display string for a path
/// Converts absolute paths to use ~ notation on Unix-like systems when possible
pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let home_path = PathBuf::from(home);
            if let Ok(relative) = path.strip_prefix(&home_path) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}
