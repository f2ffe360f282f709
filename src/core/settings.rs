//! Response settings exposed in the sidebar.
//!
//! Every setting is a closed enumeration or a bounded integer so that the
//! sidebar can only ever hold one coherent value per control. Tone is the
//! exception: labels coming from configuration files are kept verbatim even
//! when they do not name a known tone, and such tones simply contribute no
//! directive to the prompt.

use std::error::Error;
use std::fmt;
use std::str::FromStr;

#[derive(Debug)]
pub enum SettingsError {
    SloganCountOutOfRange(i64),
    UnknownModel(String),
    UnknownCreativity(String),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::SloganCountOutOfRange(value) => write!(
                f,
                "Slogan count must be between {} and {} (got {value})",
                SloganCount::MIN,
                SloganCount::MAX
            ),
            SettingsError::UnknownModel(value) => write!(
                f,
                "Unknown model '{value}'. Expected one of: {}",
                ModelChoice::ALL
                    .iter()
                    .map(|m| m.label())
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            SettingsError::UnknownCreativity(value) => write!(
                f,
                "Unknown creativity level '{value}'. Expected one of: {}",
                Creativity::ALL
                    .iter()
                    .map(|c| c.label())
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        }
    }
}

impl Error for SettingsError {}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Tone {
    #[default]
    Friendly,
    Formal,
    Casual,
    Assertive,
    Sarcastic,
    /// A tone label that matched none of the known tones.
    Unrecognized(String),
}

impl Tone {
    pub const RECOGNIZED: [Tone; 5] = [
        Tone::Friendly,
        Tone::Formal,
        Tone::Casual,
        Tone::Assertive,
        Tone::Sarcastic,
    ];

    /// Exact, case-sensitive match. Never fails.
    pub fn from_label(label: &str) -> Self {
        match label {
            "Friendly" => Tone::Friendly,
            "Formal" => Tone::Formal,
            "Casual" => Tone::Casual,
            "Assertive" => Tone::Assertive,
            "Sarcastic" => Tone::Sarcastic,
            other => Tone::Unrecognized(other.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Tone::Friendly => "Friendly",
            Tone::Formal => "Formal",
            Tone::Casual => "Casual",
            Tone::Assertive => "Assertive",
            Tone::Sarcastic => "Sarcastic",
            Tone::Unrecognized(label) => label,
        }
    }

    pub fn directive(&self) -> Option<&'static str> {
        match self {
            Tone::Friendly => Some(
                "Generate Friendly Slogans, Embrace warmth and approachability in your slogans.",
            ),
            Tone::Formal => Some(
                "Generate Formal Slogans, Ensure your slogans are straightforward, avoiding slang and casual phrases.",
            ),
            Tone::Casual => Some(
                "Generate Casual Slogans, Approach as if speaking to a friend and use colloquial language if appropriate.",
            ),
            Tone::Assertive => Some(
                "Generate Assertive Slogans, Be direct and confident, ensuring clarity without coming off as aggressive.",
            ),
            Tone::Sarcastic => Some(
                "Generate Sarcastic Slogans, Use irony and perhaps say one thing but imply another. Emojis can help set the tone! 😒",
            ),
            Tone::Unrecognized(_) => None,
        }
    }

    fn position(&self) -> Option<usize> {
        Self::RECOGNIZED.iter().position(|tone| tone == self)
    }

    /// Next recognized tone, wrapping around. Unrecognized tones step to the first one.
    pub fn next(&self) -> Tone {
        match self.position() {
            Some(index) => Self::RECOGNIZED[(index + 1) % Self::RECOGNIZED.len()].clone(),
            None => Self::RECOGNIZED[0].clone(),
        }
    }

    pub fn previous(&self) -> Tone {
        let len = Self::RECOGNIZED.len();
        match self.position() {
            Some(index) => Self::RECOGNIZED[(index + len - 1) % len].clone(),
            None => Self::RECOGNIZED[0].clone(),
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SloganCount(u8);

impl SloganCount {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(value: i64) -> Result<Self, SettingsError> {
        if (i64::from(Self::MIN)..=i64::from(Self::MAX)).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(SettingsError::SloganCountOutOfRange(value))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn increment(self) -> Self {
        Self((self.0 + 1).min(Self::MAX))
    }

    pub fn decrement(self) -> Self {
        Self(self.0.saturating_sub(1).max(Self::MIN))
    }
}

impl Default for SloganCount {
    fn default() -> Self {
        Self(Self::MIN)
    }
}

impl fmt::Display for SloganCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModelChoice {
    #[default]
    Llama2_7B,
    Llama2_13B,
}

impl ModelChoice {
    pub const ALL: [ModelChoice; 2] = [ModelChoice::Llama2_7B, ModelChoice::Llama2_13B];

    pub fn label(self) -> &'static str {
        match self {
            ModelChoice::Llama2_7B => "Llama2-7B",
            ModelChoice::Llama2_13B => "Llama2-13B",
        }
    }

    /// Fully qualified `owner/name:version` reference on Replicate.
    pub fn model_ref(self) -> &'static str {
        match self {
            ModelChoice::Llama2_7B => {
                "a16z-infra/llama7b-v2-chat:4f0a4744c7295c024a1de15e1a63c880d3da035fa1f49bfd344fe076074c8eea"
            }
            ModelChoice::Llama2_13B => {
                "a16z-infra/llama13b-v2-chat:df7690f1994d94e96ad9d568eac121aecf50684a0b0963b25a41cc40061269e5"
            }
        }
    }

    /// The version hash sent in the prediction request.
    pub fn version_id(self) -> &'static str {
        let model_ref = self.model_ref();
        model_ref
            .split_once(':')
            .map(|(_, version)| version)
            .unwrap_or(model_ref)
    }

    pub fn next(self) -> Self {
        match self {
            ModelChoice::Llama2_7B => ModelChoice::Llama2_13B,
            ModelChoice::Llama2_13B => ModelChoice::Llama2_7B,
        }
    }
}

impl FromStr for ModelChoice {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModelChoice::ALL
            .into_iter()
            .find(|model| model.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| SettingsError::UnknownModel(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Creativity {
    #[default]
    Precise,
    Balanced,
    Creative,
}

impl Creativity {
    pub const ALL: [Creativity; 3] = [
        Creativity::Precise,
        Creativity::Balanced,
        Creativity::Creative,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Creativity::Precise => "Precise",
            Creativity::Balanced => "Balanced",
            Creativity::Creative => "Creative",
        }
    }

    /// Sampling temperature sent to the model.
    pub fn temperature(self) -> f64 {
        match self {
            Creativity::Precise => 0.01,
            Creativity::Balanced => 2.5,
            Creativity::Creative => 5.0,
        }
    }

    pub fn next(self) -> Self {
        match self {
            Creativity::Precise => Creativity::Balanced,
            Creativity::Balanced => Creativity::Creative,
            Creativity::Creative => Creativity::Precise,
        }
    }

    pub fn previous(self) -> Self {
        match self {
            Creativity::Precise => Creativity::Creative,
            Creativity::Balanced => Creativity::Precise,
            Creativity::Creative => Creativity::Balanced,
        }
    }
}

impl FromStr for Creativity {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Creativity::ALL
            .into_iter()
            .find(|level| level.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| SettingsError::UnknownCreativity(s.to_string()))
    }
}

/// Fixed sampling parameters that accompany every request.
pub const TOP_P: f64 = 0.01;
pub const MAX_LENGTH: u32 = 1024;
pub const REPETITION_PENALTY: f64 = 1.0;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Settings {
    pub tone: Tone,
    pub slogan_count: SloganCount,
    pub model: ModelChoice,
    pub creativity: Creativity,
}
