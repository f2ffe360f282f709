pub mod app;
pub mod chat_stream;
pub mod config;
pub mod feedback;
pub mod keyring;
pub mod message;
pub mod prompt;
pub mod session;
pub mod settings;
