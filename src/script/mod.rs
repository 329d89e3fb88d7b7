//! Scripted actors and the info table that drives them
//!
//! Script functions queue AI commands on the actor that owns the info. The
//! commands reach the dialogue session through the output pipe, one per
//! tick, and are retried while the session is busy.

pub mod actor;
pub mod book;

pub use actor::{AiCommand, ScriptedActor};
pub use book::{Info, InfoLine, ScriptBook, Speaker};
