//! Collision detection and response (CDCR)
//!
//! Detection operates on analytic volumes (spheres, axis-aligned boxes)
//! realized from actor transforms at query time; response is driven by a
//! policy table keyed on actor kinds. The broad phase is a deliberate
//! linear scan in insertion order; actor counts are small and a spatial
//! index is a non-goal.

mod response;
mod volume;

pub use response::{Response, ResponseAction, ResponsePolicy};
pub use volume::{Aabb, BoundingSphere, ColliderShape, Volume};
