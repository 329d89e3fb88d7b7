//! Dialogue session state machine
//!
//! One session runs at a time. It is driven by `tick` once per frame and by
//! the player's selections; actors feed it through the output pipe. Waiting
//! is never blocking: every wait is a predicate re-checked on the next tick.
//!
//! # Mutual exclusion
//!
//! At most one line is spoken at a time. A speech request is rejected while
//! the speech slot is busy, and the speaking actor gets an output barrier so
//! its AI does not try again before the line is over. Choice selection is
//! blocked by the same condition plus any unresolved actor output
//! (see [`DialogSession::output_pending`]).

use std::sync::{Arc, Weak};

use tracing::{debug, warn};

use super::actor::{is_same, ptr_eq, ActorRef, WeakActor};
use super::choice::{Choice, ChoiceList};
use super::collab::{DialogScript, NullVoice, TradeWindow, VoiceOutput};
use super::pipe::SessionPipe;
use super::print_ring::PrintRing;
use super::print_screen::{PrintScreenQueue, PrintScreenRequest};
use super::speech::{Speech, SpeechView};
use super::types::{SessionState, ANIM_TIME, DEFAULT_PRINT_FONT};
use crate::resource::catalog::MessageCatalog;

/// Logical input understood by the dialogue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogInput {
    /// Take the option under the cursor
    Select,
    /// Cut the current line short
    Skip,
    /// Cursor down
    Next,
    /// Cursor up
    Prev,
    /// Mouse wheel; positive moves up
    Wheel(i32),
}

/// Camera placement for the two participants
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraFraming {
    /// Look-at point between the actors
    pub position: [f32; 3],
    /// Yaw in degrees; `None` in monologue mode
    pub spin: Option<f32>,
    /// Distance between the actors; `None` in monologue mode
    pub distance: Option<f32>,
}

/// What the presentation layer draws for the current line
#[derive(Debug, Clone, PartialEq)]
pub struct SpeechFrame {
    pub text: String,
    pub is_player: bool,
    /// Name printed above non-player lines
    pub speaker: Option<String>,
    pub view: SpeechView,
}

/// The dialogue session
pub struct DialogSession {
    state: SessionState,
    player: Option<WeakActor>,
    other: Option<WeakActor>,
    depth: u32,
    except: Vec<String>,
    trade_pending: bool,
    current_is_player: bool,
    selected: Option<Choice>,
    speech: Speech,
    choices: ChoiceList,
    prints: PrintRing,
    screens: PrintScreenQueue,
    animated: bool,
    catalog: Arc<dyn MessageCatalog>,
    script: Arc<dyn DialogScript>,
    trade: Arc<dyn TradeWindow>,
    voice: Arc<dyn VoiceOutput>,
}

impl std::fmt::Debug for DialogSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DialogSession")
            .field("state", &self.state)
            .field("depth", &self.depth)
            .field("except", &self.except)
            .field("trade_pending", &self.trade_pending)
            .field("speech", &self.speech)
            .field("choices", &self.choices)
            .field("animated", &self.animated)
            .finish_non_exhaustive()
    }
}

impl DialogSession {
    /// Create an idle session
    pub fn new(
        catalog: Arc<dyn MessageCatalog>,
        script: Arc<dyn DialogScript>,
        trade: Arc<dyn TradeWindow>,
    ) -> Self {
        Self {
            state: SessionState::Idle,
            player: None,
            other: None,
            depth: 0,
            except: Vec::new(),
            trade_pending: false,
            current_is_player: false,
            selected: None,
            speech: Speech::new(),
            choices: ChoiceList::new(),
            prints: PrintRing::new(),
            screens: PrintScreenQueue::new(),
            animated: true,
            catalog,
            script,
            trade,
            voice: Arc::new(NullVoice),
        }
    }

    /// Use `voice` for spoken lines
    pub fn with_voice(mut self, voice: Arc<dyn VoiceOutput>) -> Self {
        self.voice = voice;
        self
    }

    /// Enable or disable box animations
    pub fn with_animation(mut self, animated: bool) -> Self {
        self.animated = animated;
        self
    }

    /// Apply the "animated windows" setting
    pub fn set_animated(&mut self, animated: bool) {
        self.animated = animated;
    }

    fn anim(&self) -> u64 {
        if self.animated {
            ANIM_TIME
        } else {
            0
        }
    }

    fn player(&self) -> Option<ActorRef> {
        self.player.as_ref().and_then(Weak::upgrade)
    }

    fn other(&self) -> Option<ActorRef> {
        self.other.as_ref().and_then(Weak::upgrade)
    }

    fn participants(&self) -> Option<(ActorRef, ActorRef)> {
        Some((self.player()?, self.other()?))
    }

    /// Get a pipe bound to this session
    pub fn pipe(&mut self) -> SessionPipe<'_> {
        SessionPipe::new(self)
    }

    /// Open a session between `player` and `other`
    ///
    /// Choices are fetched on the next tick. Ignored while a session with
    /// different actors is running.
    pub fn open(&mut self, player: &ActorRef, other: &ActorRef) -> bool {
        if self.state != SessionState::Idle
            && !(is_same(self.player.as_ref(), player) && is_same(self.other.as_ref(), other))
        {
            debug!(
                player = %player.name(),
                other = %other.name(),
                "dialogue already running with other actors"
            );
            return false;
        }

        self.except.clear();
        self.trade_pending = false;
        self.state = SessionState::PreStart;
        self.player = Some(Arc::downgrade(player));
        self.other = Some(Arc::downgrade(other));
        debug!(player = %player.name(), other = %other.name(), "dialogue opened");
        true
    }

    /// Advance the session by `dt` milliseconds
    pub fn tick(&mut self, dt: u64) {
        if self.state == SessionState::PreStart {
            self.except.clear();
            self.trade_pending = false;
            self.trade.close();
            self.start_choices();
            return;
        }

        self.prints.tick(dt);
        self.screens.tick(dt);

        let opening = self.is_choice_menu_visible();
        self.choices.advance_anim(dt, opening, ANIM_TIME);

        if self.speech.advance(dt) {
            if self.trade_pending && !self.actors_have_output() {
                self.start_trade();
            } else if self.choices.is_empty()
                && self.state != SessionState::Idle
                && !self.actors_have_output()
            {
                self.close();
            }
        }
    }

    /// Fetch the top-level choices and auto-run an important first entry
    fn start_choices(&mut self) {
        let Some((player, other)) = self.participants() else {
            self.close();
            return;
        };

        let first_entry = self.state == SessionState::PreStart;
        let list = other.dialog_choices(player.as_ref(), &self.except, first_entry);

        self.state = SessionState::Active;
        self.depth = 0;
        self.current_is_player = true;
        self.choices.set(list);
        self.choices.set_anim(0);
        debug!(count = self.choices.len(), first_entry, "choices fetched");

        if let Some(important) = self.choices.important_entry().cloned() {
            debug!(script_fn = %important.script_fn, "running important choice");
            self.enter(important);
        }
    }

    /// Run a choice and fetch what follows it
    fn enter(&mut self, choice: Choice) {
        let Some((player, other)) = self.participants() else {
            return;
        };

        self.depth = self.depth.saturating_add(1);
        self.trade_pending = choice.is_trade;
        self.except.push(choice.script_fn.clone());
        self.selected = Some(choice.clone());

        let script = Arc::clone(&self.script);
        script.execute_choice(&choice, &player, &other, &mut SessionPipe::new(self));

        if self.state == SessionState::Idle {
            // The script closed the dialogue itself
            return;
        }

        let next = script.next_choices(&choice, &player, &other);
        self.choices.set(next);
        if self.choices.is_empty() {
            if self.depth > 0 {
                self.start_choices();
            } else {
                self.close();
            }
        }
    }

    /// Take option `index` of the current list
    ///
    /// Ignored while a line is spoken, an actor still has output pending, or
    /// the index is out of range.
    pub fn select_choice(&mut self, index: usize) -> bool {
        if self.output_pending() {
            return false;
        }
        let Some(choice) = self.choices.get(index).cloned() else {
            return false;
        };

        debug!(index, script_fn = %choice.script_fn, "choice selected");
        self.enter(choice);
        let anim = self.anim();
        self.choices.set_anim(anim);
        true
    }

    /// Take the option under the cursor
    pub fn select_current(&mut self) -> bool {
        let cursor = self.choices.cursor();
        self.select_choice(cursor)
    }

    pub fn next_choice(&mut self) {
        self.choices.next();
    }

    pub fn prev_choice(&mut self) {
        self.choices.prev();
    }

    /// Speak `msg_id` on behalf of `speaker`
    ///
    /// Returns false while another line is active. A speaker outside the
    /// session is logged and reported as success without any effect.
    pub fn request_speech(&mut self, speaker: &ActorRef, msg_id: &str) -> bool {
        let is_player = is_same(self.player.as_ref(), speaker);
        let is_other = is_same(self.other.as_ref(), speaker);
        if !is_player && !is_other {
            warn!(actor = %speaker.name(), msg = msg_id, "unexpected speech request");
            return true;
        }

        if self.speech.is_active() {
            return false;
        }

        let listener = if is_player { self.other() } else { self.player() };
        if let Some(listener) = listener {
            listener.stop_dialog_animation();
        }

        let text = self.catalog.text_for(msg_id);
        let msg_time = self.catalog.duration_for(msg_id);
        self.speech.start(text, msg_time, self.anim() * 2, is_player);
        self.current_is_player = is_player;

        self.voice.play(msg_id);
        speaker.set_output_barrier(msg_time, false);
        debug!(actor = %speaker.name(), msg = msg_id, msg_time, "speech started");
        true
    }

    /// Queue a positioned overlay; rejected while a line is spoken
    pub fn request_print_screen(&mut self, _actor: &ActorRef, request: &PrintScreenRequest) -> bool {
        if self.speech.is_active() {
            return false;
        }
        self.print_screen(request);
        true
    }

    /// Queue a positioned overlay unconditionally
    pub fn print_screen(&mut self, request: &PrintScreenRequest) {
        self.screens.push(request);
    }

    /// Push a transient status line
    pub fn print(&mut self, text: &str) -> bool {
        self.prints.push(text, DEFAULT_PRINT_FONT)
    }

    /// End the dialogue; rejected while a line is spoken
    pub fn request_close(&mut self) -> bool {
        if self.speech.is_active() {
            return false;
        }
        self.choices.clear();
        self.close();
        true
    }

    /// Tear the session down
    ///
    /// Safe to call at any time and any number of times.
    pub fn close(&mut self) {
        let prev_player = self.player.take().and_then(|w| w.upgrade());
        let prev_other = self.other.take().and_then(|w| w.upgrade());

        let was_open = self.state != SessionState::Idle;
        self.depth = 0;
        self.trade_pending = false;
        self.selected = None;
        self.speech.clear();
        self.choices.clear();
        self.state = SessionState::Idle;
        self.voice.stop();

        let monologue = match (&prev_player, &prev_other) {
            (Some(p), Some(o)) => ptr_eq(p, o),
            _ => false,
        };
        if monologue {
            if let Some(actor) = &prev_player {
                if actor.has_interaction() {
                    actor.clear_interaction();
                }
            }
        }
        if let Some(actor) = &prev_player {
            actor.stop_dialog_animation();
        }
        if let Some(actor) = &prev_other {
            if !monologue {
                actor.stop_dialog_animation();
            }
        }

        if was_open {
            debug!("dialogue closed");
        }
    }

    /// Cut the current line short
    ///
    /// The line ends on the next tick rather than immediately.
    pub fn skip(&mut self) -> bool {
        if !self.speech.is_active() {
            return false;
        }
        for actor in [self.player(), self.other()].into_iter().flatten() {
            actor.set_output_barrier(0, false);
            actor.stop_dialog_animation();
        }
        self.voice.stop();
        self.speech.skip();
        true
    }

    /// Route a logical input; false when the dialogue does not take it
    pub fn handle_input(&mut self, input: DialogInput) -> bool {
        if self.state == SessionState::Idle || self.trade.is_open() {
            return false;
        }
        match input {
            DialogInput::Select => {
                self.select_current();
            }
            DialogInput::Skip => {
                self.skip();
            }
            DialogInput::Next => self.choices.next(),
            DialogInput::Prev => self.choices.prev(),
            DialogInput::Wheel(delta) => {
                if delta > 0 {
                    self.choices.prev();
                } else if delta < 0 {
                    self.choices.next();
                }
            }
        }
        true
    }

    fn start_trade(&mut self) {
        if let Some((player, other)) = self.participants() {
            debug!(player = %player.name(), other = %other.name(), "starting trade");
            self.trade.open(&player, &other);
        }
        self.trade_pending = false;
    }

    /// Clear both print queues
    pub fn clear_prints(&mut self) {
        self.prints.clear();
        self.screens.clear();
    }

    /// The world was replaced; drop everything
    pub fn on_world_changed(&mut self) {
        self.close();
        self.clear_prints();
    }

    // Guards

    fn actors_have_output(&self) -> bool {
        self.player().is_some_and(|a| a.has_unresolved_output())
            || self.other().is_some_and(|a| a.has_unresolved_output())
    }

    /// A line is on screen or an actor still has output to deliver
    pub fn output_pending(&self) -> bool {
        self.speech.is_active() || self.actors_have_output()
    }

    /// Whether the choice menu is shown and accepts input
    pub fn is_choice_menu_visible(&self) -> bool {
        !self.choices.is_empty() && !self.output_pending() && !self.trade.is_open()
    }

    // Queries

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Script functions already taken in this session
    pub fn except(&self) -> &[String] {
        &self.except
    }

    pub fn trade_pending(&self) -> bool {
        self.trade_pending
    }

    pub fn current_is_player(&self) -> bool {
        self.current_is_player
    }

    /// The last choice taken
    pub fn selected(&self) -> Option<&Choice> {
        self.selected.as_ref()
    }

    pub fn speech(&self) -> &Speech {
        &self.speech
    }

    pub fn choices(&self) -> &ChoiceList {
        &self.choices
    }

    pub fn print_ring(&self) -> &PrintRing {
        &self.prints
    }

    pub fn print_screens(&self) -> &PrintScreenQueue {
        &self.screens
    }

    pub fn is_animated(&self) -> bool {
        self.animated
    }

    /// Open or closing, or still showing a line
    pub fn is_active(&self) -> bool {
        self.state != SessionState::Idle || self.speech.is_active()
    }

    /// A line or choices are on screen
    pub fn has_content(&self) -> bool {
        self.speech.is_active() || !self.choices.is_empty()
    }

    /// Whether `actor` takes part in the running session
    ///
    /// `None` asks whether any session runs at all.
    pub fn is_actor_in_dialog(&self, actor: Option<&ActorRef>) -> bool {
        if self.state == SessionState::Idle {
            return false;
        }
        match actor {
            None => true,
            Some(actor) => {
                is_same(self.player.as_ref(), actor) || is_same(self.other.as_ref(), actor)
            }
        }
    }

    /// The player talks to itself while using an interactive object
    pub fn is_monologue(&self) -> bool {
        match self.participants() {
            Some((player, other)) => ptr_eq(&player, &other) && player.has_interaction(),
            None => false,
        }
    }

    /// Current line as the presentation layer should draw it
    pub fn speech_frame(&self) -> Option<SpeechFrame> {
        if !self.speech.is_active() || self.trade.is_open() {
            return None;
        }
        let is_player = self.speech.is_player();
        let speaker = if is_player {
            None
        } else {
            self.other().map(|o| o.name())
        };
        Some(SpeechFrame {
            text: self.speech.text().to_string(),
            is_player,
            speaker,
            view: self.speech.view(self.anim()),
        })
    }

    /// Size of the choice menu relative to its full size
    pub fn choice_menu_scale(&self) -> f32 {
        if !self.animated {
            return if self.is_choice_menu_visible() { 1.0 } else { 0.0 };
        }
        self.choices.anim_progress(ANIM_TIME)
    }

    /// Camera placement looking at both participants
    pub fn camera_framing(&self) -> Option<CameraFraming> {
        let (player, other) = self.participants()?;
        let p0 = player.camera_bone();
        let p1 = other.camera_bone();
        let position = [
            (p0[0] + p1[0]) * 0.5,
            (p0[1] + p1[1]) * 0.5 + 50.0,
            (p0[2] + p1[2]) * 0.5,
        ];

        if ptr_eq(&player, &other) {
            return Some(CameraFraming {
                position,
                spin: None,
                distance: None,
            });
        }

        let d = [p0[0] - p1[0], p0[1] - p1[1], p0[2] - p1[2]];
        let distance = (d[0] * d[0] + d[1] * d[1] + d[2] * d[2]).sqrt();
        let spin = if self.current_is_player {
            other.rotation() - 45.0
        } else {
            player.rotation() + 45.0
        };
        Some(CameraFraming {
            position,
            spin: Some(spin),
            distance: Some(distance),
        })
    }
}
