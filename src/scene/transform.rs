//! 3D transform with accumulate-then-commit movement increments
//!
//! Controllers and input handling queue translation/rotation deltas during
//! a frame; the owning manager applies them with a single `commit` (or
//! discards them with `clear_increments` when motion is blocked). This lets
//! several controllers contribute movement before anything mutates the
//! committed state.

use glam::{Mat4, Quat, Vec3, Vec4};
use serde::{Deserialize, Serialize};

/// Position, orientation (look/up direction pair) and scale of an actor.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Transform3D {
    /// Position in world space
    pub position: Vec3,
    /// Normalized look direction
    pub look: Vec3,
    /// Normalized up direction
    pub up: Vec3,
    /// Scale factor
    pub scale: Vec3,
    /// Pending translation, applied on `commit`
    #[serde(skip)]
    translate_increment: Vec3,
    /// Pending rotation in degrees (XYZ euler), applied on `commit`
    #[serde(skip)]
    rotate_increment: Vec3,
}

impl Transform3D {
    /// Create a transform at the origin facing -Z.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transform with just a position.
    #[must_use]
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create a transform with full orientation.
    #[must_use]
    pub fn new_full(position: Vec3, look: Vec3, up: Vec3, scale: Vec3) -> Self {
        Self {
            position,
            look: look.normalize_or(Vec3::NEG_Z),
            up: up.normalize_or(Vec3::Y),
            scale,
            translate_increment: Vec3::ZERO,
            rotate_increment: Vec3::ZERO,
        }
    }

    /// Get the right direction.
    #[must_use]
    pub fn right(&self) -> Vec3 {
        self.look.cross(self.up).normalize_or(Vec3::X)
    }

    /// Queue a translation delta for the next `commit`.
    pub fn translate_by(&mut self, delta: Vec3) {
        self.translate_increment += delta;
    }

    /// Queue a rotation delta (degrees, XYZ euler) for the next `commit`.
    pub fn rotate_by(&mut self, degrees: Vec3) {
        self.rotate_increment += degrees;
    }

    /// The translation currently pending.
    #[must_use]
    pub fn pending_translation(&self) -> Vec3 {
        self.translate_increment
    }

    /// Whether any movement delta is queued.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.translate_increment != Vec3::ZERO || self.rotate_increment != Vec3::ZERO
    }

    /// Apply all pending increments and reset them.
    pub fn commit(&mut self) {
        if self.translate_increment != Vec3::ZERO {
            self.position += self.translate_increment;
        }
        if self.rotate_increment != Vec3::ZERO {
            let rotation = Quat::from_euler(
                glam::EulerRot::XYZ,
                self.rotate_increment.x.to_radians(),
                self.rotate_increment.y.to_radians(),
                self.rotate_increment.z.to_radians(),
            );
            self.look = (rotation * self.look).normalize_or(Vec3::NEG_Z);
            self.up = (rotation * self.up).normalize_or(Vec3::Y);
        }
        self.translate_increment = Vec3::ZERO;
        self.rotate_increment = Vec3::ZERO;
    }

    /// Discard pending increments without applying them (blocked motion).
    pub fn clear_increments(&mut self) {
        self.translate_increment = Vec3::ZERO;
        self.rotate_increment = Vec3::ZERO;
    }

    /// World matrix for rendering (translation * orientation * scale).
    #[must_use]
    pub fn world_matrix(&self) -> Mat4 {
        let right = self.right();
        let rotation = Mat4::from_cols(
            right.extend(0.0),
            self.up.extend(0.0),
            (-self.look).extend(0.0),
            Vec4::W,
        );
        Mat4::from_translation(self.position) * rotation * Mat4::from_scale(self.scale)
    }
}

impl Default for Transform3D {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            look: Vec3::NEG_Z,
            up: Vec3::Y,
            scale: Vec3::ONE,
            translate_increment: Vec3::ZERO,
            rotate_increment: Vec3::ZERO,
        }
    }
}
