//! Dialogue Session
//!
//! This module runs a conversation between the player and one other actor:
//! choice menus, spoken lines, transient prints and the handoff to trading.
//!
//! # Architecture
//!
//! The session consists of:
//! - The session state machine driven by ticks and player input
//! - The single speech slot with its display countdown
//! - The choice list with cursor and menu animation
//! - The transient print ring and positioned print-screen queue
//! - The output pipe through which actor AI talks to the session
//!
//! # Thread Safety
//!
//! Everything runs on the game thread. Actors are held as `Weak` references
//! and use interior mutability, so the session never owns or outlives them.

pub mod actor;
pub mod choice;
pub mod collab;
pub mod pipe;
pub mod print_ring;
pub mod print_screen;
pub mod session;
pub mod speech;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use actor::{Actor, ActorRef, WeakActor};
pub use choice::{Choice, ChoiceList};
pub use collab::{DialogScript, InventoryTrade, NullVoice, TradeWindow, VoiceOutput};
pub use pipe::{OutputPipe, SessionPipe};
pub use print_ring::{PrintLine, PrintRing};
pub use print_screen::{OverlayPos, PrintOverlay, PrintScreenQueue, PrintScreenRequest};
pub use session::{CameraFraming, DialogInput, DialogSession, SpeechFrame};
pub use speech::{Speech, SpeechView};
pub use types::{
    DialogError, DialogResult, SessionState, ANIM_TIME, DEFAULT_PRINT_FONT, MAX_PRINT,
    PRINT_SCREEN_GRACE, PRINT_TIME,
};
