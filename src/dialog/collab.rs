//! Collaborators injected into the session
//!
//! The script engine, the trade window and voice playback live outside the
//! dialogue core. The session talks to them through these traits only.

use parking_lot::Mutex;

use super::actor::ActorRef;
use super::choice::Choice;
use super::pipe::OutputPipe;

/// Script engine running dialogue choices
pub trait DialogScript: Send + Sync {
    /// Run the effects of `choice`
    ///
    /// May push speech, prints or a close request through `pipe` before
    /// returning.
    fn execute_choice(
        &self,
        choice: &Choice,
        player: &ActorRef,
        other: &ActorRef,
        pipe: &mut dyn OutputPipe,
    );

    /// Follow-up choices after `selected` has run
    fn next_choices(&self, selected: &Choice, player: &ActorRef, other: &ActorRef) -> Vec<Choice>;
}

/// Trading window
pub trait TradeWindow: Send + Sync {
    fn is_open(&self) -> bool;
    fn open(&self, player: &ActorRef, other: &ActorRef);
    fn close(&self);
}

/// Voice playback for spoken lines
pub trait VoiceOutput: Send + Sync {
    /// Start the voice sample of message `msg_id`
    fn play(&self, msg_id: &str);
    /// Stop whatever is playing
    fn stop(&self);
}

/// Voice output that plays nothing
#[derive(Debug, Default)]
pub struct NullVoice;

impl VoiceOutput for NullVoice {
    fn play(&self, _msg_id: &str) {}
    fn stop(&self) {}
}

/// Trade window that only records who traded
#[derive(Debug, Default)]
pub struct InventoryTrade {
    state: Mutex<TradeState>,
}

#[derive(Debug, Default)]
struct TradeState {
    open: bool,
    partners: Vec<(String, String)>,
}

impl InventoryTrade {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of times the window was opened
    pub fn open_count(&self) -> usize {
        self.state.lock().partners.len()
    }

    /// Names of the traders of each opening, in order
    pub fn partners(&self) -> Vec<(String, String)> {
        self.state.lock().partners.clone()
    }
}

impl TradeWindow for InventoryTrade {
    fn is_open(&self) -> bool {
        self.state.lock().open
    }

    fn open(&self, player: &ActorRef, other: &ActorRef) {
        let mut state = self.state.lock();
        state.open = true;
        state.partners.push((player.name(), other.name()));
    }

    fn close(&self) {
        self.state.lock().open = false;
    }
}
