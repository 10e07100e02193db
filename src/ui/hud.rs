//! In-game HUD manager
//!
//! Owns the 2D overlay shown during gameplay (health and score readouts).
//! Deltas arrive as Ui-category events; the per-frame update lets each
//! actor's controllers render current values into text.

use glam::Vec2;

use crate::controllers::TimeStep;
use crate::events::{Event, EventQueue};
use crate::input::Input;
use crate::render::DrawQueue;
use crate::scene::Status;
use crate::ui::{UiActor, UiController};

#[derive(Debug)]
pub struct UiManager {
    actors: Vec<UiActor>,
    status: Status,
}

impl Default for UiManager {
    fn default() -> Self {
        Self::new()
    }
}

impl UiManager {
    #[must_use]
    pub fn new() -> Self {
        Self {
            actors: Vec::new(),
            status: Status::ACTIVE,
        }
    }

    #[must_use]
    pub fn status(&self) -> Status {
        self.status
    }

    pub fn set_status(&mut self, status: Status) {
        self.status = status;
    }

    pub fn add(&mut self, actor: UiActor) {
        self.actors.push(actor);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.actors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }

    /// First actor with a matching id.
    #[must_use]
    pub fn find_by_id(&self, id: &str) -> Option<&UiActor> {
        self.actors.iter().find(|actor| actor.id == id)
    }

    /// Current health, if a health controller exists anywhere on the HUD.
    #[must_use]
    pub fn current_health(&self) -> Option<i32> {
        self.actors
            .iter()
            .flat_map(|actor| actor.controllers.iter())
            .find_map(|controller| match controller {
                UiController::Health { current, .. } => Some(*current),
                _ => None,
            })
    }

    /// Current score, if a score controller exists anywhere on the HUD.
    #[must_use]
    pub fn current_score(&self) -> Option<i32> {
        self.actors
            .iter()
            .flat_map(|actor| actor.controllers.iter())
            .find_map(|controller| match controller {
                UiController::Score { value } => Some(*value),
                _ => None,
            })
    }

    /// React to Ui-category events by routing deltas into the controllers.
    pub fn handle_event(&mut self, event: &Event) {
        match event {
            Event::HealthDelta { delta } => {
                for actor in &mut self.actors {
                    for controller in actor.controllers.iter_mut() {
                        controller.apply_health_delta(*delta);
                    }
                }
            }
            Event::ScoreDelta { delta } => {
                for actor in &mut self.actors {
                    for controller in actor.controllers.iter_mut() {
                        controller.apply_score_delta(*delta);
                    }
                }
            }
            _ => {}
        }
    }

    /// Run UI controllers for the frame.
    pub fn update(&mut self, step: TimeStep, input: &Input, events: &mut EventQueue) {
        if !self.status.is_updated() {
            return;
        }
        let pointer = input.pointer_position();
        for actor in &mut self.actors {
            if !actor.status.is_updated() {
                continue;
            }
            update_actor_controllers(actor, step, pointer, events);
        }
    }

    /// Emit overlay draw commands.
    pub fn draw(&self, queue: &mut DrawQueue) {
        if !self.status.is_drawn() {
            return;
        }
        for actor in &self.actors {
            if actor.status.is_drawn() {
                queue.ui.push(actor.draw_command());
            }
        }
    }
}

/// Run an actor's controller list in order against its own parts.
pub(crate) fn update_actor_controllers(
    actor: &mut UiActor,
    step: TimeStep,
    pointer: Vec2,
    events: &mut EventQueue,
) {
    let mut controllers = std::mem::take(&mut actor.controllers);
    for controller in controllers.iter_mut() {
        controller.update(
            step,
            pointer,
            events,
            &mut actor.transform,
            &mut actor.text,
            &mut actor.color,
        );
    }
    actor.controllers = controllers;
}
