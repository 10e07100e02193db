//! Actor model and scene graph
//!
//! Actors are flat composition structs owned by the [`ObjectManager`],
//! which partitions them for the per-frame update and draw passes and runs
//! collision detection/response for the movers.

mod actor;
mod arena;
mod manager;
mod transform;
mod types;

pub use actor::{
    Actor, ContactEffect, ContactEffects, ControllerList, PickupKind, PickupParameters,
};
pub use arena::{ActorArena, ActorId};
pub use manager::ObjectManager;
pub use transform::Transform3D;
pub use types::{ActorKind, Status};
