//! Core types for the dialogue session

use thiserror::Error;

use crate::resource::propfile::PropertyError;

/// Error type for the fallible edges of the dialogue system
///
/// The session itself never fails: rejected operations are reported as
/// `false`. These errors come from loading catalogs, script books and from
/// driving a whole conversation.
#[derive(Debug, Error)]
pub enum DialogError {
    /// A property file could not be read
    #[error("property file error: {0}")]
    Property(#[from] PropertyError),
    /// A script book entry is malformed
    #[error("invalid script entry `{key}`: {reason}")]
    InvalidScript { key: String, reason: String },
    /// A conversation was still running after the tick limit
    #[error("conversation did not finish within {0} ticks")]
    TickLimit(u64),
    /// The conversation was asked to use an actor nobody registered
    #[error("unknown actor: {0}")]
    UnknownActor(String),
}

/// Result type for dialogue operations
pub type DialogResult<T> = Result<T, DialogError>;

/// Session lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// No session
    #[default]
    Idle,
    /// Opened, choices are fetched on the next tick
    PreStart,
    /// Choices offered or speech in progress
    Active,
}

/// Duration of the open/close animation of dialogue boxes, in milliseconds
pub const ANIM_TIME: u64 = 400;

/// Capacity of the transient print ring
pub const MAX_PRINT: usize = 5;

/// Shared countdown of the print ring, in milliseconds
pub const PRINT_TIME: u64 = 1500;

/// Extra time added to every print-screen overlay, in milliseconds
pub const PRINT_SCREEN_GRACE: u64 = 1000;

/// Font used for lines pushed with `print`
pub const DEFAULT_PRINT_FONT: &str = "FONT_OLD_10_WHITE";
