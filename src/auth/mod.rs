//! Replicate API credentials.
//!
//! A token can come from three places, tried in order: the
//! `REPLICATE_API_TOKEN` environment variable, the system keyring, and
//! finally the masked input box of the chat UI. Tokens from the first two
//! are trusted as-is. Tokens typed by the user must look like a Replicate
//! token before generation is enabled; this is a format check only, the
//! service itself is not contacted.

use crate::core::keyring::KeyringAccessError;
use keyring::Entry;
use std::fmt;
use tracing::{debug, warn};

mod ui;

pub use self::ui::prompt_token;

pub const TOKEN_ENV_VAR: &str = "REPLICATE_API_TOKEN";
pub const TOKEN_PREFIX: &str = "r8_";
pub const TOKEN_LENGTH: usize = 40;

const KEYRING_SERVICE: &str = "gencontenthub";
const KEYRING_ACCOUNT: &str = "replicate";

/// Whether `token` has the shape of a Replicate API token.
pub fn is_plausible_token(token: &str) -> bool {
    token.starts_with(TOKEN_PREFIX) && token.chars().count() == TOKEN_LENGTH
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    Environment,
    Keyring,
    Interactive,
}

impl CredentialSource {
    pub fn describe(self) -> &'static str {
        match self {
            CredentialSource::Environment => "environment",
            CredentialSource::Keyring => "keyring",
            CredentialSource::Interactive => "entered",
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    token: String,
    source: CredentialSource,
}

impl Credential {
    pub fn new(token: impl Into<String>, source: CredentialSource) -> Self {
        Self {
            token: token.into(),
            source,
        }
    }

    /// Accept a token typed by the user, enforcing the format check.
    pub fn from_interactive(token: &str) -> Option<Self> {
        let token = token.trim();
        is_plausible_token(token).then(|| Self::new(token, CredentialSource::Interactive))
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn source(&self) -> CredentialSource {
        self.source
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("token", &"<redacted>")
            .field("source", &self.source)
            .finish()
    }
}

pub struct AuthManager {
    use_keyring: bool,
}

impl AuthManager {
    pub fn new() -> Self {
        Self::new_with_keyring(true)
    }

    /// Construct an AuthManager, optionally disabling keyring access (useful for tests)
    pub fn new_with_keyring(use_keyring: bool) -> Self {
        Self { use_keyring }
    }

    /// Look for a token in the environment, then in the keyring.
    ///
    /// Keyring failures are logged and treated as "no token" so the UI can
    /// still ask the user for one.
    pub fn resolve_credential(&self) -> Option<Credential> {
        self.resolve_with_env(std::env::var(TOKEN_ENV_VAR).ok())
    }

    fn resolve_with_env(&self, env_token: Option<String>) -> Option<Credential> {
        if let Some(token) = env_token.filter(|token| !token.trim().is_empty()) {
            debug!(source = "environment", "credential resolved");
            return Some(Credential::new(token.trim(), CredentialSource::Environment));
        }

        match self.get_token() {
            Ok(Some(token)) => {
                debug!(source = "keyring", "credential resolved");
                Some(Credential::new(token, CredentialSource::Keyring))
            }
            Ok(None) => None,
            Err(err) => {
                warn!(recoverable = err.is_recoverable(), "{err}");
                None
            }
        }
    }

    pub fn get_token(&self) -> Result<Option<String>, KeyringAccessError> {
        if !self.use_keyring {
            return Ok(None);
        }
        let entry = Entry::new(KEYRING_SERVICE, KEYRING_ACCOUNT)?;
        match entry.get_password() {
            Ok(token) => Ok(Some(token)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    pub fn store_token(&self, token: &str) -> Result<(), KeyringAccessError> {
        if !self.use_keyring {
            return Ok(());
        }
        let entry = Entry::new(KEYRING_SERVICE, KEYRING_ACCOUNT)?;
        entry.set_password(token)?;
        Ok(())
    }

    /// Remove the stored token. Returns `false` when nothing was stored.
    pub fn remove_token(&self) -> Result<bool, KeyringAccessError> {
        if !self.use_keyring {
            return Ok(false);
        }
        let entry = Entry::new(KEYRING_SERVICE, KEYRING_ACCOUNT)?;
        match entry.delete_credential() {
            Ok(()) => Ok(true),
            Err(keyring::Error::NoEntry) => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    pub fn interactive_auth(&self) -> Result<(), Box<dyn std::error::Error>> {
        let token = prompt_token()?;
        let credential = Credential::from_interactive(&token).ok_or_else(|| {
            format!(
                "That does not look like a Replicate token (expected {TOKEN_LENGTH} characters starting with {TOKEN_PREFIX})"
            )
        })?;
        self.store_token(credential.token())?;
        println!("✓ Token stored securely in the system keyring");
        Ok(())
    }

    pub fn interactive_deauth(&self) -> Result<(), Box<dyn std::error::Error>> {
        if self.remove_token()? {
            println!("✓ Removed the stored Replicate token");
        } else {
            println!("No stored Replicate token found.");
        }
        Ok(())
    }
}

impl Default for AuthManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = "r8_0123456789abcdefghijklmnopqrstuvwxyzA";

    #[test]
    fn format_check_requires_prefix_and_length() {
        assert_eq!(VALID.len(), TOKEN_LENGTH);
        assert!(is_plausible_token(VALID));
        assert!(!is_plausible_token(""));
        assert!(!is_plausible_token(&VALID[..39]));
        assert!(!is_plausible_token(&format!("{VALID}x")));
        assert!(!is_plausible_token(&VALID.replacen("r8_", "r9_", 1)));
    }

    #[test]
    fn interactive_tokens_are_trimmed_and_checked() {
        let credential = Credential::from_interactive(&format!("  {VALID}\n")).expect("valid");
        assert_eq!(credential.token(), VALID);
        assert_eq!(credential.source(), CredentialSource::Interactive);
        assert!(Credential::from_interactive("sk-not-replicate").is_none());
    }

    #[test]
    fn environment_token_is_trusted_without_format_check() {
        let manager = AuthManager::new_with_keyring(false);
        let credential = manager
            .resolve_with_env(Some("custom-token".to_string()))
            .expect("env token");
        assert_eq!(credential.source(), CredentialSource::Environment);
        assert_eq!(credential.token(), "custom-token");
    }

    #[test]
    fn missing_sources_resolve_to_none() {
        let manager = AuthManager::new_with_keyring(false);
        assert!(manager.resolve_with_env(None).is_none());
        assert!(manager.resolve_with_env(Some("   ".to_string())).is_none());
    }

    #[test]
    fn debug_output_redacts_token() {
        let credential = Credential::new(VALID, CredentialSource::Keyring);
        assert!(!format!("{credential:?}").contains(VALID));
    }
}
