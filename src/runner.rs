//! Headless conversation driver
//!
//! Plays the role of the game loop: ticks the session, runs both actors' AI,
//! closes the trade window as soon as it opens and picks choices from a
//! predetermined list. Everything visible is recorded in a [`Transcript`].

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::Options;
use crate::dialog::actor::{Actor, ActorRef};
use crate::dialog::collab::{InventoryTrade, TradeWindow};
use crate::dialog::session::{DialogInput, DialogSession};
use crate::dialog::types::{DialogError, DialogResult, SessionState};
use crate::resource::catalog::MessageCatalog;
use crate::script::{ScriptBook, ScriptedActor};

/// Something the player saw or did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptEvent {
    Speech { speaker: String, text: String },
    PrintScreen(String),
    Choices(Vec<String>),
    Selected { index: usize, title: String },
    TradeOpened { player: String, npc: String },
    Closed,
}

impl fmt::Display for TranscriptEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TranscriptEvent::Speech { speaker, text } => write!(f, "{}: {}", speaker, text),
            TranscriptEvent::PrintScreen(text) => write!(f, "* {}", text),
            TranscriptEvent::Choices(titles) => {
                for (i, title) in titles.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "  [{}] {}", i, title)?;
                }
                Ok(())
            }
            TranscriptEvent::Selected { title, .. } => write!(f, "> {}", title),
            TranscriptEvent::TradeOpened { player, npc } => {
                write!(f, "~ {} trades with {}", player, npc)
            }
            TranscriptEvent::Closed => write!(f, "-- end of dialogue"),
        }
    }
}

/// Record of a finished conversation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    pub events: Vec<TranscriptEvent>,
    /// Ticks until the dialogue closed
    pub ticks: u64,
}

impl Transcript {
    /// Spoken lines as `(speaker, text)`
    pub fn lines(&self) -> Vec<(&str, &str)> {
        self.events
            .iter()
            .filter_map(|e| match e {
                TranscriptEvent::Speech { speaker, text } => Some((speaker.as_str(), text.as_str())),
                _ => None,
            })
            .collect()
    }

    /// Titles of the options taken, in order
    pub fn selections(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                TranscriptEvent::Selected { title, .. } => Some(title.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl fmt::Display for Transcript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for event in &self.events {
            writeln!(f, "{}", event)?;
        }
        Ok(())
    }
}

/// A conversation ready to run
pub struct Conversation {
    session: DialogSession,
    trade: Arc<InventoryTrade>,
    player: Arc<ScriptedActor>,
    npc: Arc<ScriptedActor>,
    picks: VecDeque<usize>,
    tick_ms: u64,
    max_ticks: u64,
}

impl Conversation {
    /// Set up the actors named in `opts`
    ///
    /// In monologue mode the player talks to itself and the book must hold
    /// infos owned by the player.
    pub fn new(
        catalog: Arc<dyn MessageCatalog>,
        book: Arc<ScriptBook>,
        opts: &Options,
    ) -> DialogResult<Self> {
        let npc_name = if opts.monologue { &opts.player } else { &opts.npc };
        if !book.has_infos_for(npc_name) {
            return Err(DialogError::UnknownActor(npc_name.clone()));
        }

        let player = book.spawn(&opts.player);
        let npc = if opts.monologue {
            player.set_interaction(true);
            Arc::clone(&player)
        } else {
            book.spawn(&opts.npc)
        };

        let trade = Arc::new(InventoryTrade::new());
        let session = DialogSession::new(catalog, book, trade.clone())
            .with_animation(opts.animated_windows);

        Ok(Self {
            session,
            trade,
            player,
            npc,
            picks: opts.choices.iter().copied().collect(),
            tick_ms: opts.tick_ms.max(1),
            max_ticks: opts.max_ticks,
        })
    }

    pub fn session(&self) -> &DialogSession {
        &self.session
    }

    /// Run until the dialogue closes
    pub fn run(mut self) -> DialogResult<Transcript> {
        let player: ActorRef = self.player.clone();
        let npc: ActorRef = self.npc.clone();
        self.session.open(&player, &npc);

        let monologue = Arc::ptr_eq(&self.player, &self.npc);
        let mut transcript = Transcript::default();
        let mut last_serial = self.session.speech().serial();
        let mut trades = 0;

        for tick in 1..=self.max_ticks {
            self.session.tick(self.tick_ms);

            if self.trade.open_count() > trades {
                trades = self.trade.open_count();
                if let Some((player, npc)) = self.trade.partners().pop() {
                    transcript.events.push(TranscriptEvent::TradeOpened { player, npc });
                }
                self.trade.close();
            }

            let screens_before = self.session.print_screens().len();
            ScriptedActor::process_ai(&self.player, self.tick_ms, &mut self.session.pipe());
            if !monologue {
                ScriptedActor::process_ai(&self.npc, self.tick_ms, &mut self.session.pipe());
            }
            if self.session.print_screens().len() > screens_before {
                if let Some(overlay) = self.session.print_screens().items().first() {
                    transcript
                        .events
                        .push(TranscriptEvent::PrintScreen(overlay.text.clone()));
                }
            }

            let speech = self.session.speech();
            if speech.serial() != last_serial {
                last_serial = speech.serial();
                let speaker = if speech.is_player() {
                    self.player.name()
                } else {
                    self.npc.name()
                };
                transcript.events.push(TranscriptEvent::Speech {
                    speaker,
                    text: speech.text().to_string(),
                });
            }

            if self.session.state() == SessionState::Idle {
                transcript.events.push(TranscriptEvent::Closed);
                transcript.ticks = tick;
                debug!(ticks = tick, "conversation finished");
                return Ok(transcript);
            }

            if self.session.is_choice_menu_visible() {
                self.pick(&mut transcript);
            }
        }

        Err(DialogError::TickLimit(self.max_ticks))
    }

    /// Take the next planned option, or the last one once the plan is used up
    fn pick(&mut self, transcript: &mut Transcript) {
        let titles: Vec<String> = self
            .session
            .choices()
            .entries()
            .iter()
            .map(|c| c.title.clone())
            .collect();
        let last = titles.len().saturating_sub(1);
        let index = match self.picks.pop_front() {
            Some(i) if i <= last => i,
            Some(i) => {
                warn!(index = i, count = titles.len(), "choice out of range, taking the last one");
                last
            }
            None => last,
        };

        for _ in 0..titles.len() {
            if self.session.choices().cursor() == index {
                break;
            }
            self.session.handle_input(DialogInput::Next);
        }

        let title = titles.get(index).cloned().unwrap_or_default();
        transcript.events.push(TranscriptEvent::Choices(titles));
        transcript
            .events
            .push(TranscriptEvent::Selected { index, title });
        self.session.handle_input(DialogInput::Select);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::catalog::PropCatalog;

    const CATALOG: &str = "\
HELLO = What do you want?
HELLO.time = 500
HI = Just looking around.
HI.time = 500
JOB_Q = Any work for me?
JOB_Q.time = 500
JOB_A = Bring me iron ore.
JOB_A.time = 500
YES = Consider it done.
YES.time = 500
TRADE = Let's trade.
TRADE.time = 500
BYE = See you.
BYE.time = 500
BYE2 = Take care.
BYE2.time = 500
";

    const BOOK: &str = "\
info.Smith_Hello.npc = Smith
info.Smith_Hello.title =
info.Smith_Hello.lines = npc:HELLO, pc:HI

info.Smith_Job.npc = Smith
info.Smith_Job.title = Any work?
info.Smith_Job.nr = 1
info.Smith_Job.lines = pc:JOB_Q, npc:JOB_A
info.Smith_Job.next = Smith_Job_Yes, Smith_Job_No

info.Smith_Job_Yes.npc = Smith
info.Smith_Job_Yes.title = I'll do it.
info.Smith_Job_Yes.lines = pc:YES
info.Smith_Job_Yes.print = New quest

info.Smith_Job_No.npc = Smith
info.Smith_Job_No.title = Not now.

info.Smith_Trade.npc = Smith
info.Smith_Trade.title = Show me your wares.
info.Smith_Trade.nr = 5
info.Smith_Trade.trade = 1
info.Smith_Trade.permanent = 1
info.Smith_Trade.lines = pc:TRADE

info.Smith_End.npc = Smith
info.Smith_End.title = Goodbye.
info.Smith_End.nr = 99
info.Smith_End.permanent = 1
info.Smith_End.end = 1
info.Smith_End.lines = pc:BYE, npc:BYE2

info.Hero_Bed.npc = Hero
info.Hero_Bed.title =
info.Hero_Bed.lines = pc:HI
info.Hero_Bed.end = 1
";

    fn conversation(opts: &Options) -> DialogResult<Conversation> {
        let catalog = Arc::new(PropCatalog::parse(CATALOG));
        let book = Arc::new(ScriptBook::parse(BOOK).unwrap());
        Conversation::new(catalog, book, opts)
    }

    #[test]
    fn test_full_conversation() {
        let opts = Options {
            choices: vec![0, 0, 0],
            ..Default::default()
        };
        let transcript = conversation(&opts).unwrap().run().unwrap();

        assert_eq!(
            transcript.lines(),
            vec![
                ("Smith", "What do you want?"),
                ("Hero", "Just looking around."),
                ("Hero", "Any work for me?"),
                ("Smith", "Bring me iron ore."),
                ("Hero", "Consider it done."),
                ("Hero", "Let's trade."),
                ("Hero", "See you."),
                ("Smith", "Take care."),
            ]
        );
        assert_eq!(
            transcript.selections(),
            vec!["Any work?", "I'll do it.", "Show me your wares.", "Goodbye."]
        );
        assert!(transcript
            .events
            .contains(&TranscriptEvent::PrintScreen("New quest".to_string())));
        assert!(transcript.events.contains(&TranscriptEvent::TradeOpened {
            player: "Hero".to_string(),
            npc: "Smith".to_string()
        }));
        assert_eq!(transcript.events.last(), Some(&TranscriptEvent::Closed));
    }

    #[test]
    fn test_first_menu_hides_told_important_info() {
        let opts = Options::default();
        let transcript = conversation(&opts).unwrap().run().unwrap();
        assert_eq!(
            transcript.events.iter().find(|e| matches!(e, TranscriptEvent::Choices(_))),
            Some(&TranscriptEvent::Choices(vec![
                "Any work?".to_string(),
                "Show me your wares.".to_string(),
                "Goodbye.".to_string(),
            ]))
        );
        assert_eq!(transcript.selections(), vec!["Goodbye."]);
    }

    #[test]
    fn test_without_animation_is_faster() {
        let animated = conversation(&Options::default()).unwrap().run().unwrap();
        let opts = Options {
            animated_windows: false,
            ..Default::default()
        };
        let plain = conversation(&opts).unwrap().run().unwrap();
        assert_eq!(plain.lines(), animated.lines());
        assert!(plain.ticks < animated.ticks);
    }

    #[test]
    fn test_out_of_range_pick_takes_last() {
        let opts = Options {
            choices: vec![7],
            ..Default::default()
        };
        let transcript = conversation(&opts).unwrap().run().unwrap();
        assert_eq!(transcript.selections(), vec!["Goodbye."]);
    }

    #[test]
    fn test_monologue() {
        let opts = Options {
            monologue: true,
            ..Default::default()
        };
        let transcript = conversation(&opts).unwrap().run().unwrap();
        assert_eq!(transcript.lines(), vec![("Hero", "Just looking around.")]);
        assert!(transcript.selections().is_empty());
    }

    #[test]
    fn test_unknown_npc() {
        let opts = Options {
            npc: "Nobody".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            conversation(&opts),
            Err(DialogError::UnknownActor(name)) if name == "Nobody"
        ));
    }

    #[test]
    fn test_tick_limit() {
        let opts = Options {
            max_ticks: 3,
            ..Default::default()
        };
        assert!(matches!(
            conversation(&opts).unwrap().run(),
            Err(DialogError::TickLimit(3))
        ));
    }

    #[test]
    fn test_transcript_display() {
        let transcript = Transcript {
            events: vec![
                TranscriptEvent::Speech {
                    speaker: "Smith".to_string(),
                    text: "Hello.".to_string(),
                },
                TranscriptEvent::Choices(vec!["Yes".to_string(), "No".to_string()]),
                TranscriptEvent::Selected {
                    index: 0,
                    title: "Yes".to_string(),
                },
                TranscriptEvent::Closed,
            ],
            ticks: 10,
        };
        assert_eq!(
            transcript.to_string(),
            "Smith: Hello.\n  [0] Yes\n  [1] No\n> Yes\n-- end of dialogue\n"
        );
    }
}
