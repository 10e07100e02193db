//! Menu manager: named UI scenes driven by Menu-category events
//!
//! The menu is a small state machine. States are named scenes ("main",
//! "audio", "controls", "exit"), each owning its own actor list; exactly
//! one scene is current and only its actors update and draw. Transitions
//! come from Menu events (pause/play/lose) and from button clicks, which
//! dispatch on the button's string id.

use rustc_hash::FxHashMap;
use winit::event::MouseButton;
use winit::keyboard::KeyCode;

use crate::controllers::TimeStep;
use crate::events::{Event, EventQueue};
use crate::input::Input;
use crate::render::DrawQueue;
use crate::scene::{ActorKind, Status};
use crate::ui::hud::update_actor_controllers;
use crate::ui::UiActor;

/// Scene names the stock game wires up.
pub const SCENE_MAIN: &str = "main";
pub const SCENE_AUDIO: &str = "audio";
pub const SCENE_CONTROLS: &str = "controls";
pub const SCENE_EXIT: &str = "exit";

#[derive(Debug)]
pub struct MenuManager {
    scenes: FxHashMap<String, Vec<UiActor>>,
    current: String,
    status: Status,
    /// Key that toggles the menu during gameplay
    toggle_key: KeyCode,
    /// Sound cue fired when the game is lost
    lose_cue: String,
}

impl MenuManager {
    /// Create a menu showing the main scene. The menu starts visible: the
    /// game opens paused on the main screen.
    #[must_use]
    pub fn new() -> Self {
        let mut scenes = FxHashMap::default();
        scenes.insert(SCENE_MAIN.to_string(), Vec::new());
        Self {
            scenes,
            current: SCENE_MAIN.to_string(),
            status: Status::ACTIVE,
            toggle_key: KeyCode::KeyM,
            lose_cue: "end".to_string(),
        }
    }

    #[must_use]
    pub fn status(&self) -> Status {
        self.status
    }

    #[must_use]
    pub fn current_scene(&self) -> &str {
        &self.current
    }

    pub fn set_toggle_key(&mut self, key: KeyCode) {
        self.toggle_key = key;
    }

    /// Register a scene (idempotent).
    pub fn add_scene(&mut self, name: impl Into<String>) {
        self.scenes.entry(name.into()).or_default();
    }

    /// Add an actor to a scene, creating the scene if needed.
    pub fn add_actor(&mut self, scene: impl Into<String>, actor: UiActor) {
        self.scenes.entry(scene.into()).or_default().push(actor);
    }

    /// Actors of the current scene.
    #[must_use]
    pub fn active_actors(&self) -> &[UiActor] {
        self.scenes.get(&self.current).map_or(&[], Vec::as_slice)
    }

    /// Switch the current scene. Unknown names are rejected with a warning
    /// and leave the state unchanged.
    pub fn set_scene(&mut self, name: &str) -> bool {
        if self.scenes.contains_key(name) {
            self.current = name.to_string();
            log::debug!("menu scene -> '{name}'");
            true
        } else {
            log::warn!("unknown menu scene '{name}'");
            false
        }
    }

    /// React to Menu-category events.
    pub fn handle_event(&mut self, event: &Event, events: &mut EventQueue) {
        match event {
            Event::Pause => self.status = Status::ACTIVE,
            Event::Play => self.status = Status::OFF,
            Event::Lose => {
                self.set_scene(SCENE_EXIT);
                self.status = Status::ACTIVE;
                events.push(Event::PlaySound {
                    name: self.lose_cue.clone(),
                });
            }
            _ => {}
        }
    }

    /// Per-frame input handling: menu toggle key, hover controllers, and
    /// button click dispatch.
    pub fn update(&mut self, step: TimeStep, input: &Input, events: &mut EventQueue) {
        // The toggle key listens even while the menu is hidden
        if input.is_key_just_pressed(self.toggle_key) {
            if self.status.is_off() {
                events.push(Event::Pause);
            } else {
                events.push(Event::Play);
            }
        }

        if !self.status.is_updated() {
            return;
        }

        let pointer = input.pointer_position();
        let clicked = input.is_clicked_once(MouseButton::Left);
        let mut clicked_button: Option<String> = None;

        if let Some(actors) = self.scenes.get_mut(&self.current) {
            for actor in actors.iter_mut() {
                if !actor.status.is_updated() {
                    continue;
                }
                update_actor_controllers(actor, step, pointer, events);

                if clicked
                    && clicked_button.is_none()
                    && actor.kind == ActorKind::UiButton
                    && actor.transform.bounds().contains(pointer)
                {
                    clicked_button = Some(actor.id.clone());
                }
            }
        }

        // Dispatch after the traversal: a scene switch must not mutate the
        // list being iterated
        if let Some(id) = clicked_button {
            self.dispatch_button(&id, events);
        }
    }

    /// String-keyed button dispatch. Unrecognized ids are ignored with a
    /// warning.
    fn dispatch_button(&mut self, id: &str, events: &mut EventQueue) {
        match id {
            "play" => {
                events.push(Event::PlaySound {
                    name: "background".to_string(),
                });
                events.push(Event::Play);
            }
            "audio" => {
                self.set_scene(SCENE_AUDIO);
            }
            "controls" => {
                self.set_scene(SCENE_CONTROLS);
            }
            "back" => {
                self.set_scene(SCENE_MAIN);
            }
            "exit" => {
                events.push(Event::Exit);
            }
            other => {
                log::warn!("unrecognized menu button id '{other}'");
            }
        }
    }

    /// Emit overlay draw commands for the current scene.
    pub fn draw(&self, queue: &mut DrawQueue) {
        if !self.status.is_drawn() {
            return;
        }
        for actor in self.active_actors() {
            if actor.status.is_drawn() {
                queue.ui.push(actor.draw_command());
            }
        }
    }
}

impl Default for MenuManager {
    fn default() -> Self {
        Self::new()
    }
}
