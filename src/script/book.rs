//! Dialogue info table
//!
//! A script book lists the infos (dialogue options) of every actor:
//!
//! ```text
//! info.Smith_Hello.npc   = Smith
//! info.Smith_Hello.title =
//! info.Smith_Hello.lines = npc:DIA_Smith_Hello_11_00, pc:DIA_Smith_Hello_15_01
//! info.Smith_Trade.npc   = Smith
//! info.Smith_Trade.title = Show me your wares.
//! info.Smith_Trade.nr    = 2
//! info.Smith_Trade.trade = 1
//! info.Smith_Trade.permanent = 1
//! ```
//!
//! Fields: `npc` (owner), `title` (empty means important), `nr` (sort key),
//! `permanent`, `trade`, `lines`, `print`, `end` (close the dialogue after
//! the lines), `next` (sub-choices). An info named in another info's `next`
//! is only offered as a sub-choice.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tracing::{debug, warn};

use super::actor::{AiCommand, ScriptedActor};
use crate::dialog::actor::{Actor, ActorRef};
use crate::dialog::choice::Choice;
use crate::dialog::collab::DialogScript;
use crate::dialog::pipe::OutputPipe;
use crate::dialog::print_screen::PrintScreenRequest;
use crate::dialog::types::{DialogError, DialogResult, DEFAULT_PRINT_FONT};
use crate::resource::propfile::{entries, read_propfile};

const INFO_PREFIX: &str = "info.";

/// Display time of `print` overlays, in seconds
pub const INFO_PRINT_SECONDS: i32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    /// The player character
    Player,
    /// The actor owning the info
    Npc,
}

/// One spoken line of an info
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoLine {
    pub speaker: Speaker,
    pub msg: String,
}

/// A dialogue option and its effects
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Info {
    pub id: String,
    pub npc: String,
    pub title: String,
    pub nr: i32,
    pub permanent: bool,
    pub trade: bool,
    pub lines: Vec<InfoLine>,
    pub print: Option<String>,
    pub end: bool,
    pub next: Vec<String>,
}

impl Info {
    pub fn is_important(&self) -> bool {
        self.title.is_empty()
    }

    fn choice(&self) -> Choice {
        Choice::new(&self.title, &self.id)
            .with_trade(self.trade)
            .with_sort(self.nr)
    }
}

/// Loaded info table
#[derive(Debug, Default)]
pub struct ScriptBook {
    infos: BTreeMap<String, Info>,
    sub_choices: HashSet<String>,
    told: Mutex<HashSet<String>>,
    actors: Mutex<HashMap<String, Weak<ScriptedActor>>>,
}

fn parse_flag(key: &str, value: &str) -> DialogResult<bool> {
    match value.to_lowercase().as_str() {
        "1" | "true" => Ok(true),
        "0" | "false" | "" => Ok(false),
        _ => Err(DialogError::InvalidScript {
            key: key.to_string(),
            reason: format!("expected a flag, got `{}`", value),
        }),
    }
}

fn parse_lines(key: &str, value: &str) -> DialogResult<Vec<InfoLine>> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|entry| {
            let (who, msg) = entry.split_once(':').ok_or_else(|| DialogError::InvalidScript {
                key: key.to_string(),
                reason: format!("line `{}` has no speaker", entry),
            })?;
            let speaker = match who.trim() {
                "pc" => Speaker::Player,
                "npc" => Speaker::Npc,
                other => {
                    return Err(DialogError::InvalidScript {
                        key: key.to_string(),
                        reason: format!("unknown speaker `{}`", other),
                    })
                }
            };
            Ok(InfoLine {
                speaker,
                msg: msg.trim().to_string(),
            })
        })
        .collect()
}

fn set_field(info: &mut Info, key: &str, field: &str, value: &str) -> DialogResult<()> {
    match field {
        "npc" => info.npc = value.to_string(),
        "title" => info.title = value.to_string(),
        "nr" => {
            info.nr = value.parse().map_err(|_| DialogError::InvalidScript {
                key: key.to_string(),
                reason: format!("expected a number, got `{}`", value),
            })?
        }
        "permanent" => info.permanent = parse_flag(key, value)?,
        "trade" => info.trade = parse_flag(key, value)?,
        "end" => info.end = parse_flag(key, value)?,
        "lines" => info.lines = parse_lines(key, value)?,
        "print" => info.print = Some(value.to_string()).filter(|s| !s.is_empty()),
        "next" => {
            info.next = value
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        }
        _ => {
            return Err(DialogError::InvalidScript {
                key: key.to_string(),
                reason: format!("unknown field `{}`", field),
            })
        }
    }
    Ok(())
}

impl ScriptBook {
    /// Load a script book from disk
    pub fn load<P: AsRef<Path>>(path: P) -> DialogResult<Self> {
        let content = read_propfile(path)?;
        Self::parse(&content)
    }

    /// Parse script book content
    pub fn parse(content: &str) -> DialogResult<Self> {
        let mut infos: BTreeMap<String, Info> = BTreeMap::new();

        for (key, value) in entries(content) {
            let Some((id, field)) = key
                .strip_prefix(INFO_PREFIX)
                .and_then(|rest| rest.rsplit_once('.'))
            else {
                return Err(DialogError::InvalidScript {
                    key: key.to_string(),
                    reason: "expected info.<id>.<field>".to_string(),
                });
            };
            let info = infos.entry(id.to_string()).or_insert_with(|| Info {
                id: id.to_string(),
                ..Default::default()
            });
            set_field(info, key, field, value)?;
        }

        let mut sub_choices = HashSet::new();
        for info in infos.values() {
            if info.npc.is_empty() {
                return Err(DialogError::InvalidScript {
                    key: format!("{}{}.npc", INFO_PREFIX, info.id),
                    reason: "missing owner".to_string(),
                });
            }
            for next in &info.next {
                if !infos.contains_key(next) {
                    return Err(DialogError::InvalidScript {
                        key: format!("{}{}.next", INFO_PREFIX, info.id),
                        reason: format!("unknown info `{}`", next),
                    });
                }
                sub_choices.insert(next.clone());
            }
        }

        debug!(infos = infos.len(), "script book loaded");
        Ok(Self {
            infos,
            sub_choices,
            ..Default::default()
        })
    }

    pub fn info(&self, id: &str) -> Option<&Info> {
        self.infos.get(id)
    }

    pub fn len(&self) -> usize {
        self.infos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.infos.is_empty()
    }

    /// Whether any info belongs to `npc`
    pub fn has_infos_for(&self, npc: &str) -> bool {
        self.infos.values().any(|info| info.npc.eq_ignore_ascii_case(npc))
    }

    /// Whether info `id` was told at least once
    pub fn knows_info(&self, id: &str) -> bool {
        self.told.lock().contains(id)
    }

    /// Register an actor so its infos can queue lines on it
    pub fn register(&self, actor: &Arc<ScriptedActor>) {
        self.actors
            .lock()
            .insert(actor.name(), Arc::downgrade(actor));
    }

    /// Create an actor that takes its choices from this book
    pub fn spawn(self: &Arc<Self>, name: &str) -> Arc<ScriptedActor> {
        let actor = Arc::new(ScriptedActor::new(name).with_book(Arc::clone(self)));
        self.register(&actor);
        actor
    }

    fn queue_of(&self, name: &str) -> Option<Arc<ScriptedActor>> {
        self.actors.lock().get(name).and_then(Weak::upgrade)
    }

    /// Top-level choices offered by `npc`
    ///
    /// Important infos are only offered when the dialogue has just been
    /// opened and sort in front of the others. Told infos are offered again
    /// only when permanent.
    pub fn choices_for(&self, npc: &str, except: &[String], first_entry: bool) -> Vec<Choice> {
        let told = self.told.lock();
        let mut offered: Vec<&Info> = self
            .infos
            .values()
            .filter(|info| info.npc.eq_ignore_ascii_case(npc))
            .filter(|info| !self.sub_choices.contains(&info.id))
            .filter(|info| first_entry || !info.is_important())
            .filter(|info| info.permanent || (!except.contains(&info.id) && !told.contains(&info.id)))
            .collect();
        offered.sort_by_key(|info| (!info.is_important(), info.nr));
        offered.into_iter().map(Info::choice).collect()
    }
}

impl DialogScript for ScriptBook {
    fn execute_choice(
        &self,
        choice: &Choice,
        player: &ActorRef,
        other: &ActorRef,
        _pipe: &mut dyn OutputPipe,
    ) {
        let Some(info) = self.infos.get(&choice.script_fn) else {
            warn!(script_fn = %choice.script_fn, "no such info");
            return;
        };
        self.told.lock().insert(info.id.clone());

        let Some(queue) = self.queue_of(&other.name()) else {
            warn!(actor = %other.name(), info = %info.id, "actor has no AI queue, lines dropped");
            return;
        };

        for line in &info.lines {
            let speaker = match line.speaker {
                Speaker::Player => Arc::clone(player),
                Speaker::Npc => Arc::clone(other),
            };
            queue.enqueue(AiCommand::Output {
                speaker,
                msg: line.msg.clone(),
            });
        }
        if let Some(text) = &info.print {
            queue.enqueue(AiCommand::PrintScreen(PrintScreenRequest::centered(
                text,
                DEFAULT_PRINT_FONT,
                INFO_PRINT_SECONDS,
            )));
        }
        if info.end {
            queue.enqueue(AiCommand::StopProcessInfos);
        }
        debug!(info = %info.id, lines = info.lines.len(), "info queued");
    }

    fn next_choices(&self, selected: &Choice, _player: &ActorRef, _other: &ActorRef) -> Vec<Choice> {
        let Some(info) = self.infos.get(&selected.script_fn) else {
            return Vec::new();
        };
        info.next
            .iter()
            .filter_map(|id| self.infos.get(id))
            .map(Info::choice)
            .collect()
    }
}
