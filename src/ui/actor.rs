//! 2D UI actors and their controllers
//!
//! HUD and menu elements (text, sprites, buttons) are lightweight 2D
//! actors with their own transform and controller set. The health and
//! score controllers are where event-driven gameplay state meets the
//! screen: deltas arrive as events through the owning manager, and the
//! per-frame update renders the value into the actor's text.

use glam::Vec2;
use smallvec::SmallVec;

use crate::controllers::TimeStep;
use crate::events::{Event, EventQueue};
use crate::render::{Color, UiDrawCommand, colors, lerp_color};
use crate::scene::{ActorKind, Status};
use crate::ui::Rect;

/// Screen-space transform for UI actors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform2D {
    /// Anchor position on screen
    pub position: Vec2,
    pub rotation_degrees: f32,
    pub scale: Vec2,
    /// Normalized origin within the element (0,0 = top-left, 0.5,0.5 = center)
    pub origin: Vec2,
    /// Unscaled element size in pixels
    pub base_size: Vec2,
}

impl Transform2D {
    #[must_use]
    pub fn new(position: Vec2, base_size: Vec2) -> Self {
        Self {
            position,
            rotation_degrees: 0.0,
            scale: Vec2::ONE,
            origin: Vec2::splat(0.5),
            base_size,
        }
    }

    /// Screen-space bounds after scaling, for hit tests.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        let size = self.base_size * self.scale;
        Rect::new(self.position - self.origin * size, size)
    }
}

impl Default for Transform2D {
    fn default() -> Self {
        Self::new(Vec2::ZERO, Vec2::ONE)
    }
}

/// Per-frame behavior attached to a UI actor.
#[derive(Debug, Clone)]
pub enum UiController {
    /// Tracks player health, renders it as text, and fires `Lose`/`Pause`
    /// exactly once on the frame the value crosses zero.
    Health {
        current: i32,
        max: i32,
        start: i32,
        /// Edge guard: set once the zero-crossing events fire, re-armed if
        /// health climbs back above zero
        lose_fired: bool,
    },

    /// Tracks the score and renders it as text.
    Score { value: i32 },

    /// Lerp color and scale toward a hover target while the pointer is
    /// over the actor's bounds.
    MouseOver {
        rest_color: Color,
        hover_color: Color,
        hover_scale: f32,
        /// Lerp rate per second
        rate: f32,
    },
}

impl UiController {
    /// Health controller starting (and capped) at the given values.
    #[must_use]
    pub fn health(start: i32, max: i32) -> Self {
        Self::Health {
            current: start.clamp(0, max),
            max,
            start,
            lose_fired: false,
        }
    }

    #[must_use]
    pub fn score() -> Self {
        Self::Score { value: 0 }
    }

    #[must_use]
    pub fn mouse_over(rest_color: Color, hover_color: Color) -> Self {
        Self::MouseOver {
            rest_color,
            hover_color,
            hover_scale: 1.1,
            rate: 10.0,
        }
    }

    /// Apply a health delta, clamped to `[0, max]`. No-op on other variants.
    pub fn apply_health_delta(&mut self, delta: i32) {
        if let Self::Health { current, max, .. } = self {
            *current = (*current + delta).clamp(0, *max);
        }
    }

    /// Apply a score delta. No-op on other variants.
    pub fn apply_score_delta(&mut self, delta: i32) {
        if let Self::Score { value } = self {
            *value += delta;
        }
    }

    /// Run the controller for one frame against its owning actor's parts.
    pub fn update(
        &mut self,
        step: TimeStep,
        pointer: Vec2,
        events: &mut EventQueue,
        transform: &mut Transform2D,
        text: &mut Option<String>,
        color: &mut Color,
    ) {
        match self {
            Self::Health {
                current,
                max,
                lose_fired,
                ..
            } => {
                *text = Some(format!("Health [{current}/{max}]"));
                if *current <= 0 {
                    if !*lose_fired {
                        // Edge-triggered: fire once at the crossing frame,
                        // not on every frame health stays at zero
                        events.push(Event::Lose);
                        events.push(Event::Pause);
                        *lose_fired = true;
                    }
                } else {
                    *lose_fired = false;
                }
            }

            Self::Score { value } => {
                *text = Some(format!("Score [{value}]"));
            }

            Self::MouseOver {
                rest_color,
                hover_color,
                hover_scale,
                rate,
            } => {
                let hovered = transform.bounds().contains(pointer);
                let (target_color, target_scale) = if hovered {
                    (*hover_color, Vec2::splat(*hover_scale))
                } else {
                    (*rest_color, Vec2::ONE)
                };
                let t = (*rate * step.delta_secs()).clamp(0.0, 1.0);
                *color = lerp_color(*color, target_color, t);
                transform.scale = transform.scale.lerp(target_scale, t);
            }
        }
    }
}

/// A HUD or menu element.
#[derive(Debug, Clone)]
pub struct UiActor {
    pub id: String,
    pub kind: ActorKind,
    pub status: Status,
    pub transform: Transform2D,
    /// Opaque texture key resolved by the host's asset store
    pub texture: Option<String>,
    pub text: Option<String>,
    pub color: Color,
    pub controllers: SmallVec<[UiController; 1]>,
}

impl UiActor {
    #[must_use]
    pub fn new(id: impl Into<String>, kind: ActorKind, transform: Transform2D) -> Self {
        Self {
            id: id.into(),
            kind,
            status: Status::ACTIVE,
            transform,
            texture: None,
            text: None,
            color: colors::WHITE,
            controllers: SmallVec::new(),
        }
    }

    /// A clickable button backed by a texture.
    #[must_use]
    pub fn button(id: impl Into<String>, transform: Transform2D, texture: impl Into<String>) -> Self {
        let mut actor = Self::new(id, ActorKind::UiButton, transform);
        actor.texture = Some(texture.into());
        actor
    }

    /// A text label.
    #[must_use]
    pub fn label(id: impl Into<String>, transform: Transform2D, text: impl Into<String>) -> Self {
        let mut actor = Self::new(id, ActorKind::UiText, transform);
        actor.text = Some(text.into());
        actor
    }

    #[must_use]
    pub fn with_texture(mut self, texture: impl Into<String>) -> Self {
        self.texture = Some(texture.into());
        self
    }

    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    #[must_use]
    pub fn with_controller(mut self, controller: UiController) -> Self {
        self.controllers.push(controller);
        self
    }

    /// The draw submission for this actor.
    #[must_use]
    pub fn draw_command(&self) -> UiDrawCommand {
        UiDrawCommand {
            texture: self.texture.clone(),
            text: self.text.clone(),
            position: self.transform.position,
            scale: self.transform.scale,
            rotation_degrees: self.transform.rotation_degrees,
            color: self.color,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(controller: &mut UiController, pointer: Vec2, events: &mut EventQueue) -> UiActor {
        let mut actor = UiActor::new(
            "probe",
            ActorKind::UiText,
            Transform2D::new(Vec2::new(100.0, 100.0), Vec2::new(80.0, 20.0)),
        );
        controller.update(
            TimeStep::new(16.0, 16.0),
            pointer,
            events,
            &mut actor.transform,
            &mut actor.text,
            &mut actor.color,
        );
        actor
    }

    #[test]
    fn test_bounds_center_origin() {
        let transform = Transform2D::new(Vec2::new(100.0, 50.0), Vec2::new(40.0, 20.0));
        let bounds = transform.bounds();
        assert_eq!(bounds.position, Vec2::new(80.0, 40.0));
        assert_eq!(bounds.size, Vec2::new(40.0, 20.0));
    }

    #[test]
    fn test_health_renders_text_and_clamps() {
        let mut controller = UiController::health(5, 10);
        controller.apply_health_delta(100);
        let mut events = EventQueue::new();
        let actor = run(&mut controller, Vec2::ZERO, &mut events);
        assert_eq!(actor.text.as_deref(), Some("Health [10/10]"));

        controller.apply_health_delta(-999);
        if let UiController::Health { current, .. } = controller {
            assert_eq!(current, 0);
        } else {
            unreachable!()
        }
    }

    #[test]
    fn test_health_zero_crossing_fires_exactly_once() {
        let mut controller = UiController::health(1, 10);
        controller.apply_health_delta(-1);

        let mut events = EventQueue::new();
        run(&mut controller, Vec2::ZERO, &mut events);

        let fired: Vec<Event> = std::iter::from_fn(|| events.pop()).collect();
        assert_eq!(fired, vec![Event::Lose, Event::Pause]);

        // Health stays at zero: no duplicate flood on later frames
        let mut events = EventQueue::new();
        for _ in 0..5 {
            run(&mut controller, Vec2::ZERO, &mut events);
        }
        assert!(events.is_empty());
    }

    #[test]
    fn test_health_edge_rearms_after_recovery() {
        let mut controller = UiController::health(1, 10);
        let mut events = EventQueue::new();

        controller.apply_health_delta(-1);
        run(&mut controller, Vec2::ZERO, &mut events);
        assert_eq!(events.len(), 2);

        controller.apply_health_delta(5);
        run(&mut controller, Vec2::ZERO, &mut events);

        controller.apply_health_delta(-5);
        run(&mut controller, Vec2::ZERO, &mut events);
        assert_eq!(events.len(), 4);
    }

    #[test]
    fn test_score_accumulates() {
        let mut controller = UiController::score();
        controller.apply_score_delta(10);
        controller.apply_score_delta(25);

        let mut events = EventQueue::new();
        let actor = run(&mut controller, Vec2::ZERO, &mut events);
        assert_eq!(actor.text.as_deref(), Some("Score [35]"));
        assert!(events.is_empty());
    }

    #[test]
    fn test_mouse_over_lerps_toward_hover_state() {
        let mut controller = UiController::mouse_over(colors::WHITE, colors::YELLOW);

        // Pointer on the element: color drifts toward hover, scale grows
        let mut events = EventQueue::new();
        let actor = run(&mut controller, Vec2::new(100.0, 100.0), &mut events);
        assert!(actor.color[2] < 1.0);
        assert!(actor.transform.scale.x > 1.0);
    }
}
