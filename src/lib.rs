//! GenContentHub is a full-screen terminal slogan generator backed by hosted
//! Llama 2 chat models.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns the session transcript, sidebar settings, prompt
//!   composition, feedback logging, and streaming orchestration.
//! - [`ui`] renders the terminal interface and runs the interactive event loop
//!   that turns key presses into [`core::app::AppAction`]s.
//! - [`auth`] resolves the API token from the environment, the system
//!   keyring, or the user.
//! - [`api`] defines the prediction payloads exchanged with the inference
//!   service.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`], which initializes logging and configuration
//! and dispatches into [`ui::chat_loop`] for interactive sessions.

pub mod api;
pub mod auth;
pub mod cli;
pub mod core;
pub mod ui;
pub mod utils;
