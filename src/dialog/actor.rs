//! Actor capability consumed by the session
//!
//! The session never owns actors. It keeps `Weak` references for identity
//! and dispatch, so dropping an actor elsewhere simply makes it vanish from
//! the session.

use std::sync::{Arc, Weak};

use super::choice::Choice;

/// A participant in a dialogue
///
/// Methods take `&self`; implementations use interior mutability.
pub trait Actor: Send + Sync {
    /// Name shown above the actor's lines
    fn name(&self) -> String;

    /// Stop the idle/talk animation played during dialogue
    fn stop_dialog_animation(&self);

    /// Whether the actor still has speech or animation work pending
    fn has_unresolved_output(&self) -> bool;

    /// Prevent the actor's AI from speaking again for `duration` ms
    fn set_output_barrier(&self, duration: u64, force: bool);

    /// Choices this actor offers to `player` at the top level
    fn dialog_choices(&self, player: &dyn Actor, except: &[String], first_entry: bool)
        -> Vec<Choice>;

    /// Facing angle in degrees
    fn rotation(&self) -> f32 {
        0.0
    }

    /// Head position used for camera framing
    fn camera_bone(&self) -> [f32; 3] {
        [0.0; 3]
    }

    /// Whether the actor is bound to an interactive object
    fn has_interaction(&self) -> bool {
        false
    }

    /// Release the interactive object
    fn clear_interaction(&self) {}
}

/// Shared handle to an actor
pub type ActorRef = Arc<dyn Actor>;

/// Non-owning handle kept by the session
pub type WeakActor = Weak<dyn Actor>;

/// Whether a weak handle points at `actor`
pub fn is_same(weak: Option<&WeakActor>, actor: &ActorRef) -> bool {
    weak.is_some_and(|w| std::ptr::addr_eq(w.as_ptr(), Arc::as_ptr(actor)))
}

/// Whether two strong handles point at the same actor
pub fn ptr_eq(a: &ActorRef, b: &ActorRef) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}
