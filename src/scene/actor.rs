//! Actors: the entities of the scene graph
//!
//! An actor is a flat composition of capabilities rather than a class
//! hierarchy: every actor has an id, a kind tag, status flags and a
//! transform; drawability, collision, pickup payloads and behavior are all
//! optional attachments. Managers dispatch on the kind tag.

use smallvec::SmallVec;

use serde::{Deserialize, Serialize};

use crate::collision::ColliderShape;
use crate::controllers::Controller;
use crate::render::{Geometry, Material};
use crate::scene::{ActorKind, Status, Transform3D};

/// What a pickup grants when collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PickupKind {
    Health,
    Score,
}

/// Payload carried by a collectable actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickupParameters {
    pub kind: PickupKind,
    pub value: i32,
}

impl PickupParameters {
    #[must_use]
    pub fn new(kind: PickupKind, value: i32) -> Self {
        Self { kind, value }
    }
}

/// Side effect a zone or pickup fires when a mover contacts it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactEffect {
    /// Play a named sound cue
    Sound(String),
    /// Adjust player health
    HealthDelta(i32),
    /// Adjust the score
    ScoreDelta(i32),
}

/// List of contact effects, inline for the common one-or-two case.
pub type ContactEffects = SmallVec<[ContactEffect; 2]>;

/// List of per-frame behavior controllers, executed in order.
pub type ControllerList = SmallVec<[Controller; 2]>;

/// A scene entity.
#[derive(Debug)]
pub struct Actor {
    /// Lookup key; unique within the collections that care
    pub id: String,
    pub kind: ActorKind,
    pub status: Status,
    pub transform: Transform3D,
    /// Render material, present on drawable actors
    pub material: Option<Material>,
    /// Shared-read-only geometry, present on drawable actors
    pub geometry: Option<Geometry>,
    /// Local collision shape, realized from the transform per query
    pub collider: Option<ColliderShape>,
    /// Payload granted when this actor is collected
    pub pickup: Option<PickupParameters>,
    /// Effects fired when a mover contacts this actor (zones, pickups)
    pub contact_effects: ContactEffects,
    /// Behaviors run each frame, in list order
    pub controllers: ControllerList,
}

impl Actor {
    /// Create a bare actor with no capabilities attached.
    #[must_use]
    pub fn new(id: impl Into<String>, kind: ActorKind, status: Status) -> Self {
        Self {
            id: id.into(),
            kind,
            status,
            transform: Transform3D::default(),
            material: None,
            geometry: None,
            collider: None,
            pickup: None,
            contact_effects: SmallVec::new(),
            controllers: SmallVec::new(),
        }
    }

    #[must_use]
    pub fn with_transform(mut self, transform: Transform3D) -> Self {
        self.transform = transform;
        self
    }

    /// Attach a drawable surface.
    #[must_use]
    pub fn with_surface(mut self, geometry: Geometry, material: Material) -> Self {
        self.geometry = Some(geometry);
        self.material = Some(material);
        self
    }

    #[must_use]
    pub fn with_collider(mut self, collider: ColliderShape) -> Self {
        self.collider = Some(collider);
        self
    }

    #[must_use]
    pub fn with_pickup(mut self, pickup: PickupParameters) -> Self {
        self.pickup = Some(pickup);
        self
    }

    #[must_use]
    pub fn with_contact_effect(mut self, effect: ContactEffect) -> Self {
        self.contact_effects.push(effect);
        self
    }

    #[must_use]
    pub fn with_controller(mut self, controller: Controller) -> Self {
        self.controllers.push(controller);
        self
    }

    /// Drawable actors carry both geometry and a material.
    #[must_use]
    pub fn is_drawable(&self) -> bool {
        self.geometry.is_some() && self.material.is_some()
    }

    /// Whether this actor belongs in the transparent draw partition.
    #[must_use]
    pub fn is_transparent(&self) -> bool {
        self.material.as_ref().is_some_and(Material::is_transparent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::colors;

    #[test]
    fn test_bare_actor_has_no_capabilities() {
        let actor = Actor::new("helper", ActorKind::Helper, Status::UPDATE);
        assert!(!actor.is_drawable());
        assert!(!actor.is_transparent());
        assert!(actor.collider.is_none());
        assert!(actor.controllers.is_empty());
    }

    #[test]
    fn test_transparency_follows_material_alpha() {
        let actor = Actor::new("pane", ActorKind::Decorator, Status::ACTIVE).with_surface(
            Geometry::quad(),
            Material::unlit().with_diffuse(colors::GREEN).with_alpha(0.25),
        );
        assert!(actor.is_drawable());
        assert!(actor.is_transparent());
    }

    #[test]
    fn test_builder_attaches_capabilities() {
        let actor = Actor::new("pickup", ActorKind::CollidablePickup, Status::ACTIVE)
            .with_collider(ColliderShape::Sphere { radius: 1.0 })
            .with_pickup(PickupParameters::new(PickupKind::Health, 10))
            .with_contact_effect(ContactEffect::Sound("chime".into()));

        assert!(actor.collider.is_some());
        assert_eq!(
            actor.pickup,
            Some(PickupParameters {
                kind: PickupKind::Health,
                value: 10
            })
        );
        assert_eq!(actor.contact_effects.len(), 1);
    }
}
