//! Output pipe used by actor AI routines
//!
//! The pipe forwards every call straight to the session and reports whether
//! it was accepted. It never buffers: a rejected caller retries on a later
//! tick.

use super::actor::ActorRef;
use super::print_screen::PrintScreenRequest;
use super::session::DialogSession;

/// What an actor's AI can do to the running dialogue
pub trait OutputPipe {
    /// Speak a scripted line
    fn output(&mut self, actor: &ActorRef, msg: &str) -> bool;

    /// Speak a stock voice line
    fn output_svm(&mut self, actor: &ActorRef, msg: &str) -> bool {
        self.output(actor, msg)
    }

    /// Speak a line with overlay animation
    fn output_ov(&mut self, actor: &ActorRef, msg: &str) -> bool {
        self.output(actor, msg)
    }

    /// Show a positioned, timed overlay
    fn print_screen(&mut self, actor: &ActorRef, request: &PrintScreenRequest) -> bool;

    /// End the dialogue
    fn close(&mut self) -> bool;

    /// Whether the dialogue is over
    fn is_finished(&self) -> bool;
}

/// Pipe bound to a session
pub struct SessionPipe<'a> {
    session: &'a mut DialogSession,
}

impl<'a> SessionPipe<'a> {
    pub fn new(session: &'a mut DialogSession) -> Self {
        Self { session }
    }
}

impl OutputPipe for SessionPipe<'_> {
    fn output(&mut self, actor: &ActorRef, msg: &str) -> bool {
        self.session.request_speech(actor, msg)
    }

    fn print_screen(&mut self, actor: &ActorRef, request: &PrintScreenRequest) -> bool {
        self.session.request_print_screen(actor, request)
    }

    fn close(&mut self) -> bool {
        self.session.request_close()
    }

    fn is_finished(&self) -> bool {
        !self.session.is_actor_in_dialog(None)
    }
}
