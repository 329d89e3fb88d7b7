// Dialogue session library
// Tick-driven conversations between the player and scripted actors

pub mod cli;
pub mod config;
pub mod dialog;
pub mod logging;
pub mod resource;
pub mod runner;
pub mod script;

pub use cli::Cli;
pub use config::Options;
pub use dialog::{DialogError, DialogResult, DialogSession};
pub use logging::LogLevel;
pub use runner::{Conversation, Transcript, TranscriptEvent};
