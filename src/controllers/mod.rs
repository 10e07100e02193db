//! Per-frame behavior controllers
//!
//! A controller mutates its owning actor's transform or material every
//! frame. The set is a closed tagged enum dispatched by match: per-actor
//! composability without an open-ended virtual hierarchy. Controllers on an
//! actor run in list order, so later controllers observe the mutations of
//! earlier ones within the same frame.
//!
//! Movement-style controllers queue increments on the transform rather than
//! mutating position directly; the owning manager commits (or, for blocked
//! movers, discards) the accumulated deltas once per frame.

mod curve;

pub use curve::{CurveError, CurveKey, CurveLoop, CurveSample, TransformCurve};

use std::f32::consts::TAU;
use std::sync::Arc;

use glam::{Quat, Vec3};
use winit::keyboard::KeyCode;

use crate::events::EventQueue;
use crate::input::{Input, MoveBindings};
use crate::render::{Color, Material, lerp_color};
use crate::scene::Transform3D;

// ============================================================================
// Frame clock
// ============================================================================

/// Elapsed-time view handed to every update.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TimeStep {
    /// Milliseconds since the previous frame
    pub delta_ms: f32,
    /// Milliseconds since startup
    pub elapsed_ms: f32,
}

impl TimeStep {
    #[must_use]
    pub fn new(delta_ms: f32, elapsed_ms: f32) -> Self {
        Self {
            delta_ms,
            elapsed_ms,
        }
    }

    #[must_use]
    pub fn delta_secs(self) -> f32 {
        self.delta_ms / 1000.0
    }
}

// ============================================================================
// Controller environment
// ============================================================================

/// Everything a controller may read or emit during one update.
pub struct ControllerEnv<'a> {
    pub step: TimeStep,
    pub input: &'a Input,
    /// Outbox for events produced mid-traversal
    pub events: &'a mut EventQueue,
    /// Follow-target transform, resolved by the camera manager for
    /// third-person controllers; `None` everywhere else
    pub follow_target: Option<Transform3D>,
}

// ============================================================================
// Controllers
// ============================================================================

/// Fieldless tag for filtering and lookup (never for dispatch).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControllerKind {
    RotationOverTime,
    CurveFollow,
    Pan,
    PlayerMove,
    FirstPersonCamera,
    FlightCamera,
    Rail,
    ThirdPersonCamera,
    ColorLerpOverTime,
}

/// A per-frame behavior attached to an actor or camera.
#[derive(Debug, Clone)]
pub enum Controller {
    /// Continuous rotation at a fixed rate (degrees per second, XYZ euler).
    RotationOverTime { degrees_per_second: Vec3 },

    /// Follow a keyframed transform curve on a private clock.
    ///
    /// Curves are shared between followers; each follower tracks its own
    /// elapsed time.
    CurveFollow {
        curve: Arc<TransformCurve>,
        elapsed_ms: f32,
    },

    /// Periodic oscillation along an axis around the position the actor
    /// had when the controller first ran.
    Pan {
        axis: Vec3,
        amplitude: f32,
        period_ms: f32,
        elapsed_ms: f32,
        origin: Option<Vec3>,
    },

    /// Keyboard-driven movement for the collidable player: queues
    /// translation increments which survive only if collision response
    /// lets the motion through.
    PlayerMove {
        bindings: MoveBindings,
        /// World units per millisecond of held key
        speed: f32,
    },

    /// Mouse-look plus planar movement for a first-person camera.
    FirstPersonCamera {
        bindings: MoveBindings,
        move_speed: f32,
        sensitivity: f32,
        /// (yaw, pitch) radians, captured from the transform on first run
        orientation: Option<(f32, f32)>,
    },

    /// Mouse-look with free movement including vertical, for a fly-through
    /// camera.
    FlightCamera {
        bindings: MoveBindings,
        rise: KeyCode,
        fall: KeyCode,
        move_speed: f32,
        sensitivity: f32,
        orientation: Option<(f32, f32)>,
    },

    /// Slide along a fixed rail segment, tracking a followed actor: the
    /// position is the point on the rail closest to the target, the look
    /// stays on the target.
    Rail {
        start: Vec3,
        end: Vec3,
        target_id: String,
    },

    /// Keep a fixed offset behind a followed actor, looking at it.
    ThirdPersonCamera {
        target_id: String,
        distance: f32,
        elevation_degrees: f32,
    },

    /// Ping-pong the material diffuse between two colors.
    ColorLerpOverTime {
        start: Color,
        end: Color,
        period_ms: f32,
        elapsed_ms: f32,
    },
}

impl Controller {
    /// Convenience constructor for a shared-curve follower.
    #[must_use]
    pub fn curve_follow(curve: Arc<TransformCurve>) -> Self {
        Self::CurveFollow {
            curve,
            elapsed_ms: 0.0,
        }
    }

    #[must_use]
    pub fn kind(&self) -> ControllerKind {
        match self {
            Self::RotationOverTime { .. } => ControllerKind::RotationOverTime,
            Self::CurveFollow { .. } => ControllerKind::CurveFollow,
            Self::Pan { .. } => ControllerKind::Pan,
            Self::PlayerMove { .. } => ControllerKind::PlayerMove,
            Self::FirstPersonCamera { .. } => ControllerKind::FirstPersonCamera,
            Self::FlightCamera { .. } => ControllerKind::FlightCamera,
            Self::Rail { .. } => ControllerKind::Rail,
            Self::ThirdPersonCamera { .. } => ControllerKind::ThirdPersonCamera,
            Self::ColorLerpOverTime { .. } => ControllerKind::ColorLerpOverTime,
        }
    }

    /// Run the controller for one frame against its owning actor's parts.
    pub fn update(
        &mut self,
        env: &mut ControllerEnv<'_>,
        transform: &mut Transform3D,
        material: Option<&mut Material>,
    ) {
        match self {
            Self::RotationOverTime { degrees_per_second } => {
                transform.rotate_by(*degrees_per_second * env.step.delta_secs());
            }

            Self::CurveFollow { curve, elapsed_ms } => {
                *elapsed_ms += env.step.delta_ms;
                let sample = curve.evaluate(*elapsed_ms);
                transform.position = sample.position;
                transform.look = sample.look;
                transform.up = sample.up;
            }

            Self::Pan {
                axis,
                amplitude,
                period_ms,
                elapsed_ms,
                origin,
            } => {
                let base = *origin.get_or_insert(transform.position);
                *elapsed_ms += env.step.delta_ms;
                if *period_ms > 0.0 {
                    let phase = TAU * *elapsed_ms / *period_ms;
                    transform.position = base + *axis * (*amplitude * phase.sin());
                }
            }

            Self::PlayerMove { bindings, speed } => {
                let stride = env.step.delta_ms * *speed;
                if env.input.is_key_down(bindings.strafe_left) {
                    transform.translate_by(-transform.right() * stride);
                } else if env.input.is_key_down(bindings.strafe_right) {
                    transform.translate_by(transform.right() * stride);
                }
                if env.input.is_key_down(bindings.forward) {
                    transform.translate_by(transform.look * stride);
                } else if env.input.is_key_down(bindings.backward) {
                    transform.translate_by(-transform.look * stride);
                }
            }

            Self::FirstPersonCamera {
                bindings,
                move_speed,
                sensitivity,
                orientation,
            } => {
                mouse_look(env, transform, *sensitivity, orientation);
                let stride = env.step.delta_ms * *move_speed;
                // Planar: forward motion ignores pitch
                let flat = Vec3::new(transform.look.x, 0.0, transform.look.z)
                    .normalize_or(Vec3::NEG_Z);
                if env.input.is_key_down(bindings.forward) {
                    transform.translate_by(flat * stride);
                } else if env.input.is_key_down(bindings.backward) {
                    transform.translate_by(-flat * stride);
                }
                if env.input.is_key_down(bindings.strafe_left) {
                    transform.translate_by(-transform.right() * stride);
                } else if env.input.is_key_down(bindings.strafe_right) {
                    transform.translate_by(transform.right() * stride);
                }
            }

            Self::FlightCamera {
                bindings,
                rise,
                fall,
                move_speed,
                sensitivity,
                orientation,
            } => {
                mouse_look(env, transform, *sensitivity, orientation);
                let stride = env.step.delta_ms * *move_speed;
                if env.input.is_key_down(bindings.forward) {
                    transform.translate_by(transform.look * stride);
                } else if env.input.is_key_down(bindings.backward) {
                    transform.translate_by(-transform.look * stride);
                }
                if env.input.is_key_down(bindings.strafe_left) {
                    transform.translate_by(-transform.right() * stride);
                } else if env.input.is_key_down(bindings.strafe_right) {
                    transform.translate_by(transform.right() * stride);
                }
                if env.input.is_key_down(*rise) {
                    transform.translate_by(Vec3::Y * stride);
                } else if env.input.is_key_down(*fall) {
                    transform.translate_by(-Vec3::Y * stride);
                }
            }

            Self::Rail { start, end, .. } => {
                if let Some(target) = env.follow_target {
                    let rail = *end - *start;
                    let length_squared = rail.length_squared();
                    let t = if length_squared > 0.0 {
                        (target.position - *start).dot(rail) / length_squared
                    } else {
                        0.0
                    };
                    transform.position = *start + rail * t.clamp(0.0, 1.0);
                    transform.look =
                        (target.position - transform.position).normalize_or(Vec3::NEG_Z);
                    transform.up = Vec3::Y;
                }
            }

            Self::ThirdPersonCamera {
                distance,
                elevation_degrees,
                ..
            } => {
                if let Some(target) = env.follow_target {
                    let back = -target.look;
                    let right = target.right();
                    let lifted =
                        Quat::from_axis_angle(right, elevation_degrees.to_radians()) * back;
                    transform.position = target.position + lifted * *distance;
                    transform.look =
                        (target.position - transform.position).normalize_or(Vec3::NEG_Z);
                    transform.up = Vec3::Y;
                }
            }

            Self::ColorLerpOverTime {
                start,
                end,
                period_ms,
                elapsed_ms,
            } => {
                *elapsed_ms += env.step.delta_ms;
                if let Some(material) = material
                    && *period_ms > 0.0
                {
                    // 0 -> 1 -> 0 over one period
                    let t = 0.5 * (1.0 - (TAU * *elapsed_ms / *period_ms).cos());
                    material.diffuse = lerp_color(*start, *end, t);
                }
            }
        }
    }
}

/// Shared yaw/pitch mouse-look for the first-person style cameras.
fn mouse_look(
    env: &ControllerEnv<'_>,
    transform: &mut Transform3D,
    sensitivity: f32,
    orientation: &mut Option<(f32, f32)>,
) {
    let (mut yaw, mut pitch) = *orientation.get_or_insert_with(|| {
        let look = transform.look;
        (look.z.atan2(look.x), look.y.asin())
    });

    let delta = env.input.pointer_delta();
    yaw += delta.x * sensitivity;
    pitch -= delta.y * sensitivity;

    // Clamp pitch to avoid gimbal lock
    let max_pitch = 89.0_f32.to_radians();
    pitch = pitch.clamp(-max_pitch, max_pitch);

    transform.look = Vec3::new(
        yaw.cos() * pitch.cos(),
        pitch.sin(),
        yaw.sin() * pitch.cos(),
    )
    .normalize_or(Vec3::NEG_Z);
    transform.up = Vec3::Y;
    *orientation = Some((yaw, pitch));
}

// ============================================================================
// Tests
// ============================================================================
