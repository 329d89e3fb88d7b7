//! Actor driven by a queue of AI commands
//!
//! Script functions never talk to the session directly. They queue commands
//! on the actor, and the actor feeds them through the output pipe one per
//! tick. A command that the session rejects stays at the front and is tried
//! again on the next tick.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;

use super::book::ScriptBook;
use crate::dialog::actor::{Actor, ActorRef};
use crate::dialog::choice::Choice;
use crate::dialog::pipe::OutputPipe;
use crate::dialog::print_screen::PrintScreenRequest;

/// One queued AI action
#[derive(Clone)]
pub enum AiCommand {
    /// Speak a scripted line
    Output { speaker: ActorRef, msg: String },
    /// Show a positioned overlay
    PrintScreen(PrintScreenRequest),
    /// End the dialogue
    StopProcessInfos,
}

impl std::fmt::Debug for AiCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AiCommand::Output { speaker, msg } => {
                write!(f, "Output({}, {})", speaker.name(), msg)
            }
            AiCommand::PrintScreen(req) => write!(f, "PrintScreen({:?})", req.text),
            AiCommand::StopProcessInfos => write!(f, "StopProcessInfos"),
        }
    }
}

#[derive(Debug, Default)]
struct AiState {
    queue: VecDeque<AiCommand>,
    barrier: u64,
    talking: bool,
    interaction: bool,
}

/// Scripted non-player or player character
pub struct ScriptedActor {
    name: String,
    rotation: f32,
    bone: [f32; 3],
    book: Option<Arc<ScriptBook>>,
    state: Mutex<AiState>,
}

impl std::fmt::Debug for ScriptedActor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptedActor")
            .field("name", &self.name)
            .field("state", &*self.state.lock())
            .finish_non_exhaustive()
    }
}

impl ScriptedActor {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            rotation: 0.0,
            bone: [0.0; 3],
            book: None,
            state: Mutex::new(AiState::default()),
        }
    }

    /// Take top-level choices from `book`
    pub fn with_book(mut self, book: Arc<ScriptBook>) -> Self {
        self.book = Some(book);
        self
    }

    /// Place the actor for camera framing
    pub fn with_pose(mut self, rotation: f32, bone: [f32; 3]) -> Self {
        self.rotation = rotation;
        self.bone = bone;
        self
    }

    /// Append a command to the AI queue
    pub fn enqueue(&self, command: AiCommand) {
        self.state.lock().queue.push_back(command);
    }

    pub fn queue_len(&self) -> usize {
        self.state.lock().queue.len()
    }

    /// Remaining output barrier in ms
    pub fn barrier(&self) -> u64 {
        self.state.lock().barrier
    }

    /// Whether the talk animation is playing
    pub fn is_talking(&self) -> bool {
        self.state.lock().talking
    }

    /// Bind or release an interactive object
    pub fn set_interaction(&self, interaction: bool) {
        self.state.lock().interaction = interaction;
    }

    /// Run the AI for `dt` milliseconds
    ///
    /// At most one command is delivered per call. Returns true when a
    /// command was accepted.
    pub fn process_ai(this: &Arc<Self>, dt: u64, pipe: &mut dyn OutputPipe) -> bool {
        let command = {
            let mut state = this.state.lock();
            state.barrier = state.barrier.saturating_sub(dt);
            if state.barrier > 0 {
                return false;
            }
            match state.queue.front() {
                Some(command) => command.clone(),
                None => return false,
            }
        };

        // The pipe calls back into this actor; the lock must be released here
        let accepted = match &command {
            AiCommand::Output { speaker, msg } => pipe.output(speaker, msg),
            AiCommand::PrintScreen(request) => {
                let me: ActorRef = this.clone();
                pipe.print_screen(&me, request)
            }
            AiCommand::StopProcessInfos => pipe.close(),
        };

        if accepted {
            this.state.lock().queue.pop_front();
            tracing::trace!(actor = %this.name, ?command, "ai command done");
        }
        accepted
    }
}

impl Actor for ScriptedActor {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn stop_dialog_animation(&self) {
        self.state.lock().talking = false;
    }

    fn has_unresolved_output(&self) -> bool {
        let state = self.state.lock();
        !state.queue.is_empty() || state.barrier > 0
    }

    fn set_output_barrier(&self, duration: u64, _force: bool) {
        let mut state = self.state.lock();
        state.barrier = duration;
        state.talking = duration > 0;
    }

    fn dialog_choices(&self, _player: &dyn Actor, except: &[String], first_entry: bool) -> Vec<Choice> {
        match &self.book {
            Some(book) => book.choices_for(&self.name, except, first_entry),
            None => Vec::new(),
        }
    }

    fn rotation(&self) -> f32 {
        self.rotation
    }

    fn camera_bone(&self) -> [f32; 3] {
        self.bone
    }

    fn has_interaction(&self) -> bool {
        self.state.lock().interaction
    }

    fn clear_interaction(&self) {
        self.state.lock().interaction = false;
    }
}
