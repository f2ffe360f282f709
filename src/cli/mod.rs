//! Command-line interface parsing and handling
//!
//! This module handles parsing command-line arguments and executing the appropriate commands.

pub mod say;
pub mod settings;


use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::debug;

use crate::auth::AuthManager;
use crate::cli::say::run_say;
use crate::cli::settings::{set_value, unset_value, SettingKey};
use crate::core::app::AppInitConfig;
use crate::core::config::data::SettingsOverrides;
use crate::core::config::Config;
use crate::ui::chat_loop::run_chat;
use crate::utils::logging::{init_tracing, LogTarget};
use crate::utils::url::normalize_base_url;

#[derive(Parser)]
#[command(name = "gencontenthub")]
#[command(about = "A terminal slogan generator powered by Llama 2 chat models")]
#[command(
    long_about = "GenContentHub is a full-screen terminal slogan generator. Describe what you \
need a slogan for and the selected Llama 2 model streams back suggestions in the tone, \
quantity and creativity picked in the sidebar.\n\n\
Authentication:\n\
  Set REPLICATE_API_TOKEN, run 'gencontenthub auth' to store a token in the system\n\
  keyring, or paste a token into the input box when the UI asks for one.\n\n\
Controls:\n\
  Enter             Send the message (or save the token)\n\
  Tab               Switch between the input box and the settings sidebar\n\
  Up/Down           Select a sidebar row (sidebar) or scroll (input)\n\
  Left/Right        Change the selected setting\n\
  Ctrl+L            Clear chat history\n\
  F2 / F3           Rate the conversation 👍 / 👎\n\
  Ctrl+C            Quit the application"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Initial tone (Friendly, Formal, Casual, Assertive, Sarcastic)
    #[arg(short = 't', long, global = true)]
    pub tone: Option<String>,

    /// Initial number of slogans per response (1-5)
    #[arg(short = 'n', long, global = true, value_name = "COUNT")]
    pub slogans: Option<i64>,

    /// Model to use (Llama2-7B or Llama2-13B)
    #[arg(short = 'm', long, global = true)]
    pub model: Option<String>,

    /// Creativity level (Precise, Balanced, Creative)
    #[arg(short = 'c', long, global = true)]
    pub creativity: Option<String>,

    /// CSV file that feedback rows are appended to
    #[arg(long, global = true, value_name = "PATH")]
    pub feedback_file: Option<PathBuf>,

    /// Write diagnostic logs to the given file
    #[arg(long, global = true, value_name = "PATH")]
    pub debug_log: Option<PathBuf>,

    /// Only read the API token from the environment, never the keyring
    #[arg(long, global = true)]
    pub env_only: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the chat interface (default)
    Chat,
    /// Generate slogans for a single prompt and print them
    Say {
        /// Prompt text
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        prompt: Vec<String>,
    },
    /// Store a Replicate API token in the system keyring
    Auth,
    /// Remove the stored Replicate API token
    Deauth,
    /// Set configuration values, or print them when no value is given
    Set {
        /// Configuration key to set
        key: Option<String>,
        /// Value to set for the key
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        value: Option<Vec<String>>,
    },
    /// Unset configuration values
    Unset {
        /// Configuration key to unset
        key: String,
    },
}

impl Args {
    pub fn overrides(&self) -> SettingsOverrides {
        SettingsOverrides {
            tone: self.tone.clone(),
            slogan_count: self.slogans,
            model: self.model.clone(),
            creativity: self.creativity.clone(),
        }
    }
}

/// Combine configuration, flags and stored credentials into the app's start-up state.
pub fn resolve_app_config(args: &Args, config: &Config) -> Result<AppInitConfig, Box<dyn Error>> {
    let settings = config.initial_settings(&args.overrides())?;
    let credential = AuthManager::new_with_keyring(!args.env_only).resolve_credential();
    let feedback_path = config.feedback_path(args.feedback_file.as_deref());
    let base_url = normalize_base_url(config.api_base_url());

    debug!(
        tone = %settings.tone,
        slogans = settings.slogan_count.get(),
        model = settings.model.label(),
        creativity = settings.creativity.label(),
        feedback = %feedback_path.display(),
        "resolved start-up settings"
    );

    Ok(AppInitConfig {
        settings,
        credential,
        feedback_path,
        base_url,
    })
}

pub fn main() -> Result<(), Box<dyn Error>> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async_main())
}

async fn async_main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let log_target = match (&args.command, args.debug_log.as_deref()) {
        (_, Some(path)) => LogTarget::File(path),
        (Some(Commands::Say { .. }), None) => LogTarget::Stderr,
        _ => LogTarget::Disabled,
    };
    init_tracing(log_target)?;

    match args.command {
        None | Some(Commands::Chat) => {
            let config = Config::load()?;
            let app_config = resolve_app_config(&args, &config)?;
            run_chat(app_config).await
        }
        Some(Commands::Say { ref prompt }) => {
            let config = Config::load()?;
            let app_config = resolve_app_config(&args, &config)?;
            run_say(prompt.join(" "), app_config).await
        }
        Some(Commands::Auth) => {
            let auth_manager = AuthManager::new();
            if let Err(e) = auth_manager.interactive_auth() {
                eprintln!("❌ Authentication failed: {e}");
                std::process::exit(1);
            }
            Ok(())
        }
        Some(Commands::Deauth) => {
            let auth_manager = AuthManager::new();
            if let Err(e) = auth_manager.interactive_deauth() {
                eprintln!("❌ Deauthentication failed: {e}");
                std::process::exit(1);
            }
            Ok(())
        }
        Some(Commands::Set { ref key, ref value }) => {
            let mut config = Config::load()?;
            let value = value.as_ref().map(|parts| parts.join(" "));
            match (key, value.filter(|v| !v.trim().is_empty())) {
                (Some(key), Some(value)) => {
                    let key = SettingKey::parse(key)?;
                    let stored = set_value(&mut config, key, &value)?;
                    config.save()?;
                    println!("✅ Set {} to: {stored}", key.name());
                }
                _ => config.print_all(),
            }
            Ok(())
        }
        Some(Commands::Unset { ref key }) => {
            let mut config = Config::load()?;
            let key = SettingKey::parse(key)?;
            unset_value(&mut config, key);
            config.save()?;
            println!("✅ Unset {}", key.name());
            Ok(())
        }
    }
}
