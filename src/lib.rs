//! A 3D arcade corridor game core
//!
//! This crate provides:
//! - A typed actor/scene-graph pipeline with per-frame update and draw passes
//! - Analytic collision detection and policy-driven response (CDCR)
//! - A strongly-typed event bus decoupling gameplay triggers from effects
//! - Composable transform controllers (curves, cameras, oscillators)
//! - An event-driven HUD and menu scene system
//!
//! The host application owns the window, the GPU device and asset decoding;
//! it feeds an input snapshot each frame, calls [`game::Game::update`], and
//! renders the resulting [`render::DrawQueue`].

pub mod audio;
pub mod camera;
pub mod collision;
pub mod controllers;
pub mod events;
pub mod game;
pub mod input;
pub mod level;
pub mod render;
pub mod scene;
pub mod ui;

// Re-exports for convenience
pub use glam;
pub use winit;

/// Prelude module for common imports
pub mod prelude {
    pub use crate::audio::SoundManager;
    pub use crate::camera::{Camera3D, CameraManager};
    pub use crate::collision::{ColliderShape, Response, ResponseAction, ResponsePolicy};
    pub use crate::controllers::{Controller, CurveLoop, TimeStep, TransformCurve};
    pub use crate::events::{Event, EventCategory, EventDispatcher, EventQueue};
    pub use crate::game::{Game, GameConfig, World};
    pub use crate::input::{Input, MoveBindings};
    pub use crate::level::{ActorTemplate, LevelDescriptor, LevelLoader, LevelParams};
    pub use crate::render::{DrawQueue, Geometry, Material, Topology, Vertex, colors};
    pub use crate::scene::{
        Actor, ActorId, ActorKind, ContactEffect, ObjectManager, PickupKind, PickupParameters,
        Status, Transform3D,
    };
    pub use crate::ui::{MenuManager, Transform2D, UiActor, UiController, UiManager};
    pub use glam::{Mat4, Quat, Vec2, Vec3, Vec4};
    pub use winit::keyboard::KeyCode;
}
