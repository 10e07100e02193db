//! Actor classification and status flags

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use serde::{Deserialize, Serialize};

/// Closed set of actor kinds within the game (both drawn and undrawn).
///
/// The kind is a capability tag: collision response and manager routing
/// dispatch on it, never on a type hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActorKind {
    Sky,
    Ground,
    /// Enemy
    Npc,
    /// Hero
    Pc,
    /// Architecture, obstacle
    Decorator,
    Camera3D,
    Helper,
    CollidableGround,
    CollidablePickup,
    CollidableDecorator,
    CollidableZone,
    CollidablePlayer,
    UiTexture,
    UiText,
    UiButton,
    UiMouse,
}

impl ActorKind {
    /// Kinds that participate in collision queries.
    #[must_use]
    pub const fn is_collidable(self) -> bool {
        matches!(
            self,
            Self::CollidableGround
                | Self::CollidablePickup
                | Self::CollidableDecorator
                | Self::CollidableZone
                | Self::CollidablePlayer
                | Self::Npc
        )
    }

    /// Kinds that run the per-frame detect/respond/move pass.
    #[must_use]
    pub const fn is_mover(self) -> bool {
        matches!(self, Self::CollidablePlayer | Self::Npc)
    }
}

impl fmt::Display for ActorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Per-actor status bitset controlling participation in the frame passes.
///
/// `OFF` (the empty set) excludes the actor from both passes; `DRAWN` and
/// `UPDATE` are combinable with `|`.
#[derive(Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Status(u8);

impl Status {
    /// Neither drawn nor updated.
    pub const OFF: Status = Status(0);
    /// Included in the draw pass.
    pub const DRAWN: Status = Status(1);
    /// Included in the update pass.
    pub const UPDATE: Status = Status(2);
    /// Both drawn and updated.
    pub const ACTIVE: Status = Status(1 | 2);

    #[must_use]
    #[inline]
    pub const fn is_off(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    #[inline]
    pub const fn is_drawn(self) -> bool {
        self.0 & Self::DRAWN.0 != 0
    }

    #[must_use]
    #[inline]
    pub const fn is_updated(self) -> bool {
        self.0 & Self::UPDATE.0 != 0
    }
}

impl BitOr for Status {
    type Output = Status;

    fn bitor(self, rhs: Status) -> Status {
        Status(self.0 | rhs.0)
    }
}

impl BitOrAssign for Status {
    fn bitor_assign(&mut self, rhs: Status) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.is_drawn(), self.is_updated()) {
            (false, false) => write!(f, "Status(Off)"),
            (true, false) => write!(f, "Status(Drawn)"),
            (false, true) => write!(f, "Status(Update)"),
            (true, true) => write!(f, "Status(Drawn | Update)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_combination() {
        let status = Status::DRAWN | Status::UPDATE;
        assert!(status.is_drawn());
        assert!(status.is_updated());
        assert!(!status.is_off());
        assert_eq!(status, Status::ACTIVE);
    }

    #[test]
    fn test_status_off_excludes_both_passes() {
        let status = Status::OFF;
        assert!(status.is_off());
        assert!(!status.is_drawn());
        assert!(!status.is_updated());
    }

    #[test]
    fn test_collidable_kinds() {
        assert!(ActorKind::CollidablePickup.is_collidable());
        assert!(ActorKind::CollidableZone.is_collidable());
        assert!(!ActorKind::Sky.is_collidable());
        assert!(!ActorKind::Camera3D.is_collidable());
    }

    #[test]
    fn test_mover_kinds() {
        assert!(ActorKind::CollidablePlayer.is_mover());
        assert!(ActorKind::Npc.is_mover());
        assert!(!ActorKind::CollidableDecorator.is_mover());
    }
}
