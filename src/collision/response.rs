//! Collision response policy
//!
//! Detection is generic; response is game-specific. Instead of per-type
//! virtual overrides, every (mover kind, collidee kind) pair maps to an
//! explicit [`Response`] in a policy table, which makes the full response
//! matrix enumerable and testable. A pair with no entry means "no special
//! interaction": nothing fires and the mover's motion proceeds.

use rustc_hash::FxHashMap;

use crate::render::{Color, colors};
use crate::scene::ActorKind;

/// What happens to the collidee (and to queued events) on contact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResponseAction {
    /// Fire the collidee's contact effects; the collidee itself is untouched.
    /// Used for trigger zones.
    Trigger,
    /// Fire contact effects and the pickup payload, then request removal of
    /// the collidee.
    Collect,
    /// Recolor the collidee's material.
    Tint(Color),
}

/// Outcome of a (mover, collidee) contact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Response {
    /// Side effect to apply, if any
    pub action: Option<ResponseAction>,
    /// Whether the collidee is solid: a blocking response suppresses the
    /// mover's pending motion for the frame
    pub blocks: bool,
}

impl Response {
    /// No interaction: motion proceeds, nothing fires.
    pub const IGNORE: Response = Response {
        action: None,
        blocks: false,
    };

    /// Solid obstacle with no side effect.
    pub const BLOCK: Response = Response {
        action: None,
        blocks: true,
    };

    /// Pass-through trigger volume.
    pub const TRIGGER: Response = Response {
        action: Some(ResponseAction::Trigger),
        blocks: false,
    };

    /// Pass-through pickup collection.
    pub const COLLECT: Response = Response {
        action: Some(ResponseAction::Collect),
        blocks: false,
    };
}

/// Table of contact responses keyed by (mover kind, collidee kind).
#[derive(Debug, Default)]
pub struct ResponsePolicy {
    rules: FxHashMap<(ActorKind, ActorKind), Response>,
}

impl ResponsePolicy {
    /// An empty policy: every contact is [`Response::IGNORE`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The stock corridor-game policy: the player collects pickups, passes
    /// through zones, and is blocked (with a tint) by solid decorators;
    /// enemies trigger zones they cross.
    #[must_use]
    pub fn corridor_defaults() -> Self {
        let mut policy = Self::new();
        policy.set(
            ActorKind::CollidablePlayer,
            ActorKind::CollidableZone,
            Response::TRIGGER,
        );
        policy.set(
            ActorKind::CollidablePlayer,
            ActorKind::CollidablePickup,
            Response::COLLECT,
        );
        policy.set(
            ActorKind::CollidablePlayer,
            ActorKind::CollidableDecorator,
            Response {
                action: Some(ResponseAction::Tint(colors::BLUE)),
                blocks: true,
            },
        );
        policy.set(
            ActorKind::CollidablePlayer,
            ActorKind::CollidableGround,
            Response::BLOCK,
        );
        policy.set(ActorKind::Npc, ActorKind::CollidableZone, Response::TRIGGER);
        policy
    }

    /// Set the response for a (mover, collidee) kind pair.
    pub fn set(&mut self, mover: ActorKind, collidee: ActorKind, response: Response) {
        self.rules.insert((mover, collidee), response);
    }

    /// Look up the response for a contact; missing entries are IGNORE.
    #[must_use]
    pub fn lookup(&self, mover: ActorKind, collidee: ActorKind) -> Response {
        self.rules
            .get(&(mover, collidee))
            .copied()
            .unwrap_or(Response::IGNORE)
    }
}
