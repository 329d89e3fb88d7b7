//! Test doubles for the dialogue collaborators

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use super::actor::{Actor, ActorRef};
use super::choice::Choice;
use super::collab::{DialogScript, InventoryTrade, VoiceOutput};
use super::pipe::OutputPipe;
use super::print_screen::PrintScreenRequest;
use super::session::DialogSession;
use crate::resource::catalog::PropCatalog;

#[derive(Debug, Default)]
pub struct MockActorState {
    pub unresolved: bool,
    pub barriers: Vec<u64>,
    pub anim_stops: usize,
    pub interaction: bool,
    pub choices: Vec<Choice>,
    pub choice_calls: Vec<(Vec<String>, bool)>,
    pub rotation: f32,
    pub bone: [f32; 3],
}

pub struct MockActor {
    pub name: String,
    pub state: Mutex<MockActorState>,
}

impl MockActor {
    pub fn new(name: &str) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            state: Mutex::new(MockActorState::default()),
        })
    }

    pub fn with_choices(name: &str, choices: Vec<Choice>) -> Arc<Self> {
        let actor = Self::new(name);
        actor.state.lock().choices = choices;
        actor
    }

    pub fn set_unresolved(&self, unresolved: bool) {
        self.state.lock().unresolved = unresolved;
    }

    pub fn set_choices(&self, choices: Vec<Choice>) {
        self.state.lock().choices = choices;
    }

    pub fn barriers(&self) -> Vec<u64> {
        self.state.lock().barriers.clone()
    }

    pub fn anim_stops(&self) -> usize {
        self.state.lock().anim_stops
    }
}

impl Actor for MockActor {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn stop_dialog_animation(&self) {
        self.state.lock().anim_stops += 1;
    }

    fn has_unresolved_output(&self) -> bool {
        self.state.lock().unresolved
    }

    fn set_output_barrier(&self, duration: u64, _force: bool) {
        self.state.lock().barriers.push(duration);
    }

    fn dialog_choices(&self, _player: &dyn Actor, except: &[String], first_entry: bool) -> Vec<Choice> {
        let mut state = self.state.lock();
        state.choice_calls.push((except.to_vec(), first_entry));
        state
            .choices
            .iter()
            .filter(|c| !except.contains(&c.script_fn))
            .cloned()
            .collect()
    }

    fn rotation(&self) -> f32 {
        self.state.lock().rotation
    }

    fn camera_bone(&self) -> [f32; 3] {
        self.state.lock().bone
    }

    fn has_interaction(&self) -> bool {
        self.state.lock().interaction
    }

    fn clear_interaction(&self) {
        self.state.lock().interaction = false;
    }
}

/// Effect of a mock script function
#[derive(Debug, Clone)]
pub enum ScriptAction {
    PlayerSays(&'static str),
    OtherSays(&'static str),
    Print(&'static str),
    Close,
}

#[derive(Default)]
pub struct MockScript {
    pub actions: Mutex<HashMap<String, Vec<ScriptAction>>>,
    pub next: Mutex<HashMap<String, Vec<Choice>>>,
    pub executed: Mutex<Vec<String>>,
    pub results: Mutex<Vec<bool>>,
}

impl MockScript {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn on(&self, script_fn: &str, actions: Vec<ScriptAction>) {
        self.actions.lock().insert(script_fn.to_string(), actions);
    }

    pub fn then(&self, script_fn: &str, next: Vec<Choice>) {
        self.next.lock().insert(script_fn.to_string(), next);
    }

    pub fn executed(&self) -> Vec<String> {
        self.executed.lock().clone()
    }

    /// Pipe results of every action run so far
    pub fn results(&self) -> Vec<bool> {
        self.results.lock().clone()
    }
}

impl DialogScript for MockScript {
    fn execute_choice(
        &self,
        choice: &Choice,
        player: &ActorRef,
        other: &ActorRef,
        pipe: &mut dyn OutputPipe,
    ) {
        self.executed.lock().push(choice.script_fn.clone());
        let actions = self
            .actions
            .lock()
            .get(&choice.script_fn)
            .cloned()
            .unwrap_or_default();
        for action in actions {
            let ok = match action {
                ScriptAction::PlayerSays(msg) => pipe.output(player, msg),
                ScriptAction::OtherSays(msg) => pipe.output(other, msg),
                ScriptAction::Print(text) => {
                    pipe.print_screen(other, &PrintScreenRequest::centered(text, "FONT", 2))
                }
                ScriptAction::Close => pipe.close(),
            };
            self.results.lock().push(ok);
        }
    }

    fn next_choices(&self, selected: &Choice, _player: &ActorRef, _other: &ActorRef) -> Vec<Choice> {
        self.next
            .lock()
            .get(&selected.script_fn)
            .cloned()
            .unwrap_or_default()
    }
}

#[derive(Debug, Default)]
pub struct RecordingVoice {
    pub played: Mutex<Vec<String>>,
    pub stops: Mutex<usize>,
}

impl VoiceOutput for RecordingVoice {
    fn play(&self, msg_id: &str) {
        self.played.lock().push(msg_id.to_string());
    }

    fn stop(&self) {
        *self.stops.lock() += 1;
    }
}

pub fn catalog() -> Arc<PropCatalog> {
    let mut catalog = PropCatalog::new();
    catalog.insert("HELLO", "Hello there.", Some(2000));
    catalog.insert("HI", "Hi.", Some(1000));
    catalog.insert("BYE", "Farewell.", Some(1500));
    catalog.insert("ENDLESS", "...", Some(u64::MAX));
    Arc::new(catalog)
}

/// Everything a session test needs
pub struct Fixture {
    pub session: DialogSession,
    pub player: Arc<MockActor>,
    pub other: Arc<MockActor>,
    pub script: Arc<MockScript>,
    pub trade: Arc<InventoryTrade>,
    pub voice: Arc<RecordingVoice>,
}

impl Fixture {
    pub fn new(choices: Vec<Choice>) -> Self {
        let script = MockScript::new();
        let trade = Arc::new(InventoryTrade::new());
        let voice = Arc::new(RecordingVoice::default());
        let session = DialogSession::new(catalog(), script.clone(), trade.clone())
            .with_voice(voice.clone());
        Self {
            session,
            player: MockActor::new("Hero"),
            other: MockActor::with_choices("Smith", choices),
            script,
            trade,
            voice,
        }
    }

    pub fn player_ref(&self) -> ActorRef {
        self.player.clone()
    }

    pub fn other_ref(&self) -> ActorRef {
        self.other.clone()
    }

    /// Open and run the deferred start
    pub fn start(&mut self) {
        let (p, o) = (self.player_ref(), self.other_ref());
        assert!(self.session.open(&p, &o));
        self.session.tick(16);
    }
}
