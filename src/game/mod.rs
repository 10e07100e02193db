//! Top-level game state and frame loop
//!
//! [`Game`] owns the managers, the event bus and the frame clock, and
//! exposes the per-frame API the host drives: feed the input snapshot,
//! call [`Game::update`], then collect a [`DrawQueue`]. Startup wiring
//! (scene geometry, curve keyframes, asset paths) belongs to the host; the
//! stock event subscriptions connecting collisions, HUD, menu, cameras and
//! audio are wired here.
//!
//! Frame order: object update → cameras → HUD → menu → event dispatch →
//! deferred add/remove drain. Everything that runs inside a manager
//! traversal publishes through the frame's event queue; the queue is
//! drained through the dispatcher at the fixed point after all updates.

use crate::audio::SoundManager;
use crate::camera::CameraManager;
use crate::collision::ResponsePolicy;
use crate::controllers::{ControllerEnv, TimeStep};
use crate::events::{Event, EventCategory, EventDispatcher, EventQueue};
use crate::input::Input;
use crate::render::DrawQueue;
use crate::scene::{ObjectManager, Status};
use crate::ui::{MenuManager, UiManager};

/// Host-facing configuration
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Window title
    pub title: String,
    /// Initial window width
    pub width: u32,
    /// Initial window height
    pub height: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            title: String::from("Corridor"),
            width: 1280,
            height: 720,
        }
    }
}

impl GameConfig {
    /// Create a new config with a title
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set window dimensions
    #[must_use]
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }
}

/// Everything the event handlers can reach: the managers plus the
/// host-visible flags. This is the dispatcher's context type.
pub struct World {
    pub objects: ObjectManager,
    pub cameras: CameraManager,
    pub hud: UiManager,
    pub menu: MenuManager,
    /// Absent on headless hosts
    pub audio: Option<SoundManager>,
    /// Set by the Exit event; the host polls it
    pub exit_requested: bool,
}

/// The assembled game.
pub struct Game {
    config: GameConfig,
    input: Input,
    world: World,
    dispatcher: EventDispatcher<World>,
    /// Frame outbox, drained through the dispatcher each update
    events: EventQueue,
    elapsed_ms: f32,
}

impl Game {
    /// Build a game with the stock managers, response policy and event
    /// subscriptions. Gameplay starts suspended behind the menu.
    #[must_use]
    pub fn new(config: GameConfig) -> Self {
        log::info!("initializing game '{}'", config.title);

        let mut objects = ObjectManager::new(ResponsePolicy::corridor_defaults());
        objects.set_status(Status::OFF);
        let mut hud = UiManager::new();
        hud.set_status(Status::OFF);

        let world = World {
            objects,
            cameras: CameraManager::new(),
            hud,
            menu: MenuManager::new(),
            audio: None,
            exit_requested: false,
        };

        let mut dispatcher = EventDispatcher::new();
        Self::wire(&mut dispatcher);

        Self {
            config,
            input: Input::new(),
            world,
            dispatcher,
            events: EventQueue::new(),
            elapsed_ms: 0.0,
        }
    }

    /// Stock subscriptions. Order matters within a category: the menu sees
    /// Menu events before the gameplay suspend/resume handler.
    fn wire(dispatcher: &mut EventDispatcher<World>) {
        dispatcher.subscribe(EventCategory::Menu, |world: &mut World, event, queue| {
            world.menu.handle_event(event, queue);
        });
        dispatcher.subscribe(EventCategory::Menu, |world: &mut World, event, _| {
            match event {
                // Freeze the world but keep drawing it behind the overlay
                Event::Pause | Event::Lose => {
                    world.objects.set_status(Status::DRAWN);
                    world.hud.set_status(Status::DRAWN);
                }
                Event::Play => {
                    world.objects.set_status(Status::ACTIVE);
                    world.hud.set_status(Status::ACTIVE);
                }
                _ => {}
            }
        });
        dispatcher.subscribe(EventCategory::Ui, |world: &mut World, event, _| {
            world.hud.handle_event(event);
        });
        dispatcher.subscribe(EventCategory::Object, |world: &mut World, event, _| {
            if let Event::RemoveActor { id } = event {
                world.objects.remove(*id);
            }
        });
        dispatcher.subscribe(EventCategory::Camera, |world: &mut World, event, _| {
            world.cameras.handle_event(event);
        });
        dispatcher.subscribe(EventCategory::Sound, |world: &mut World, event, _| {
            if let Some(audio) = world.audio.as_mut() {
                audio.handle_event(event);
            }
        });
        dispatcher.subscribe(EventCategory::Game, |world: &mut World, event, _| {
            if *event == Event::Exit {
                world.exit_requested = true;
            }
        });
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// The input snapshot the host feeds between frames.
    pub fn input_mut(&mut self) -> &mut Input {
        &mut self.input
    }

    #[must_use]
    pub fn exit_requested(&self) -> bool {
        self.world.exit_requested
    }

    /// Attach an audio backend (skipped on headless hosts).
    pub fn attach_audio(&mut self, audio: SoundManager) {
        self.world.audio = Some(audio);
    }

    /// Register an extra handler on the bus, alongside the stock ones.
    pub fn subscribe<F>(&mut self, category: EventCategory, handler: F)
    where
        F: FnMut(&mut World, &Event, &mut EventQueue) + 'static,
    {
        self.dispatcher.subscribe(category, handler);
    }

    /// Publish an event synchronously, outside the frame's update passes.
    pub fn publish(&mut self, event: Event) {
        self.dispatcher.publish(&mut self.world, event);
    }

    /// Advance the game by one frame.
    pub fn update(&mut self, delta_ms: f32) {
        self.elapsed_ms += delta_ms;
        let step = TimeStep::new(delta_ms, self.elapsed_ms);

        {
            let mut env = ControllerEnv {
                step,
                input: &self.input,
                events: &mut self.events,
                follow_target: None,
            };
            self.world.objects.update(&mut env);
        }
        self.world
            .cameras
            .update(step, &self.input, &mut self.events, &self.world.objects);
        self.world.hud.update(step, &self.input, &mut self.events);
        self.world.menu.update(step, &self.input, &mut self.events);

        // Fixed point: deliver everything the frame produced, then apply
        // deferred structural changes
        self.dispatcher
            .dispatch_queue(&mut self.world, &mut self.events);
        self.world.objects.end_frame();
        self.input.end_frame();
    }

    /// Collect the frame's draw output: active-camera matrices, 3D scene
    /// commands (opaque then transparent), HUD and menu overlays on top.
    pub fn draw(&self, queue: &mut DrawQueue) {
        queue.clear();
        if let Some(camera) = self.world.cameras.active() {
            queue.view = camera.view_matrix();
            queue.projection = camera.projection_matrix();
        }
        self.world.objects.draw(queue);
        self.world.hud.draw(queue);
        self.world.menu.draw(queue);
    }
}

impl std::fmt::Debug for Game {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Game")
            .field("title", &self.config.title)
            .field("actors", &self.world.objects.len())
            .field("elapsed_ms", &self.elapsed_ms)
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use glam::{Vec2, Vec3};
    use winit::event::ElementState;
    use winit::keyboard::KeyCode;

    use super::*;
    use crate::camera::Camera3D;
    use crate::collision::ColliderShape;
    use crate::controllers::Controller;
    use crate::input::MoveBindings;
    use crate::render::{Geometry, Material};
    use crate::scene::{
        Actor, ActorKind, ContactEffect, PickupKind, PickupParameters, Transform3D,
    };
    use crate::ui::{Transform2D, UiActor, UiController};

    fn init_test_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn collidable(id: &str, kind: ActorKind, position: Vec3) -> Actor {
        Actor::new(id, kind, Status::ACTIVE)
            .with_transform(Transform3D::from_position(position))
            .with_surface(Geometry::cube(), Material::unlit())
            .with_collider(ColliderShape::Box {
                half_extents: Vec3::splat(0.5),
            })
    }

    fn health_hud(game: &mut Game, start: i32) {
        game.world_mut().hud.add(
            UiActor::label(
                "health-text",
                Transform2D::new(Vec2::new(60.0, 20.0), Vec2::new(120.0, 20.0)),
                "",
            )
            .with_controller(UiController::health(start, 100)),
        );
    }

    fn start_playing(game: &mut Game) {
        game.publish(Event::Play);
    }

    #[test]
    fn test_pickup_scenario_health_and_removal() {
        init_test_logging();
        let mut game = Game::new(GameConfig::default());
        health_hud(&mut game, 50);
        game.world_mut().objects.add(
            collidable("medkit", ActorKind::CollidablePickup, Vec3::new(0.5, 0.0, 0.0))
                .with_pickup(PickupParameters::new(PickupKind::Health, 10)),
        );
        game.world_mut()
            .objects
            .add(collidable("player", ActorKind::CollidablePlayer, Vec3::ZERO));
        start_playing(&mut game);

        game.update(16.0);

        // The overlap granted +10 health and the deferred removal pass ran
        assert_eq!(game.world().hud.current_health(), Some(60));
        assert!(game.world().objects.find_by_id("medkit").is_none());
        assert!(game.world().objects.find_by_id("player").is_some());
    }

    #[test]
    fn test_kill_zone_scenario_passes_motion_through() {
        let mut game = Game::new(GameConfig::default());
        health_hud(&mut game, 50);
        game.world_mut().objects.add(
            Actor::new("kill", ActorKind::CollidableZone, Status::UPDATE)
                .with_transform(Transform3D::from_position(Vec3::new(0.0, 0.0, -0.5)))
                .with_collider(ColliderShape::Box {
                    half_extents: Vec3::splat(0.5),
                })
                .with_contact_effect(ContactEffect::HealthDelta(-15)),
        );
        game.world_mut().objects.add(
            collidable("player", ActorKind::CollidablePlayer, Vec3::ZERO).with_controller(
                Controller::PlayerMove {
                    bindings: MoveBindings::wasd(),
                    speed: 0.01,
                },
            ),
        );
        start_playing(&mut game);

        // Hold forward; the zone overlaps but must not block
        game.input_mut().key_event(KeyCode::KeyW, ElementState::Pressed);
        game.update(100.0);

        let player = game.world().objects.find_by_id("player").unwrap().1;
        assert!((player.transform.position - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-4);
        assert_eq!(game.world().hud.current_health(), Some(35));
        // The zone itself stays in the scene
        assert!(game.world().objects.find_by_id("kill").is_some());
    }

    #[test]
    fn test_lose_fires_exactly_once_and_opens_exit_scene() {
        init_test_logging();
        let mut game = Game::new(GameConfig::default());
        health_hud(&mut game, 10);
        game.world_mut().menu.add_scene(crate::ui::SCENE_EXIT);
        game.world_mut().objects.add(
            Actor::new("kill", ActorKind::CollidableZone, Status::UPDATE)
                .with_transform(Transform3D::default())
                .with_collider(ColliderShape::Box {
                    half_extents: Vec3::splat(2.0),
                })
                .with_contact_effect(ContactEffect::HealthDelta(-15)),
        );
        game.world_mut()
            .objects
            .add(collidable("player", ActorKind::CollidablePlayer, Vec3::ZERO));

        let lose_count = Rc::new(Cell::new(0u32));
        let counter = Rc::clone(&lose_count);
        game.subscribe(EventCategory::Menu, move |_, event, _| {
            if *event == Event::Lose {
                counter.set(counter.get() + 1);
            }
        });
        start_playing(&mut game);

        // Frame 1 applies the damage; frame 2 crosses zero and fires Lose;
        // later frames with health still at zero must stay silent
        for _ in 0..6 {
            game.update(16.0);
        }

        assert_eq!(game.world().hud.current_health(), Some(0));
        assert_eq!(lose_count.get(), 1);
        assert_eq!(game.world().menu.current_scene(), crate::ui::SCENE_EXIT);
        // Gameplay froze with the lose
        assert!(!game.world().objects.status().is_updated());
    }

    #[test]
    fn test_pause_suspends_and_play_resumes_gameplay() {
        let mut game = Game::new(GameConfig::default());
        assert!(!game.world().objects.status().is_updated());

        game.publish(Event::Play);
        assert_eq!(game.world().objects.status(), Status::ACTIVE);
        assert!(game.world().menu.status().is_off());

        game.publish(Event::Pause);
        assert_eq!(game.world().objects.status(), Status::DRAWN);
        assert!(game.world().menu.status().is_drawn());
    }

    #[test]
    fn test_camera_cycle_events_wrap_around() {
        let mut game = Game::new(GameConfig::default());
        for index in 0..3 {
            game.world_mut().cameras.add(Camera3D::new(
                format!("cam{index}"),
                Transform3D::default(),
            ));
        }

        for _ in 0..4 {
            game.publish(Event::CameraCycle);
        }
        assert_eq!(game.world().cameras.active().unwrap().id, "cam1");
    }

    #[test]
    fn test_exit_event_raises_host_flag() {
        let mut game = Game::new(GameConfig::default());
        assert!(!game.exit_requested());
        game.publish(Event::Exit);
        assert!(game.exit_requested());
    }

    #[test]
    fn test_draw_queue_layers_scene_then_overlays() {
        let mut game = Game::new(GameConfig::default());
        game.world_mut().cameras.add(Camera3D::new(
            "main",
            Transform3D::from_position(Vec3::new(0.0, 2.0, 10.0)),
        ));
        game.world_mut()
            .objects
            .add(collidable("crate", ActorKind::Decorator, Vec3::ZERO));
        game.world_mut().menu.add_actor(
            crate::ui::SCENE_MAIN,
            UiActor::button(
                "play",
                Transform2D::new(Vec2::new(100.0, 100.0), Vec2::new(80.0, 30.0)),
                "button-play",
            ),
        );
        start_playing(&mut game);
        // Re-open the menu so both the scene and the overlay draw
        game.publish(Event::Pause);

        let mut queue = DrawQueue::new();
        game.draw(&mut queue);

        assert_eq!(queue.scene.len(), 1);
        assert_eq!(queue.ui.len(), 1);
        assert_ne!(queue.view, glam::Mat4::IDENTITY);
    }

    #[test]
    fn test_config_builder() {
        let config = GameConfig::default()
            .with_title("Corridor Test")
            .with_size(640, 360);
        let game = Game::new(config);
        assert_eq!(game.config().title, "Corridor Test");
        assert_eq!(game.config().width, 640);
    }
}
