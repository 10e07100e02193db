//! Object manager: owner of all gameplay actors
//!
//! Holds actors in a stable arena and keeps insertion-ordered partitions
//! for the frame passes: one update list, two draw lists (opaque before
//! transparent) and one collidable list for collision scans.
//!
//! Structural changes are never applied while a partition is being
//! traversed: adds and removals requested mid-frame are queued and drained
//! by [`ObjectManager::end_frame`], which also re-seats actors whose alpha
//! crossed the transparency threshold.

use crate::collision::{ResponseAction, ResponsePolicy};
use crate::controllers::ControllerEnv;
use crate::events::Event;
use crate::render::{DrawCommand, DrawQueue};
use crate::scene::{Actor, ActorArena, ActorId, ContactEffect, PickupKind, Status};

pub struct ObjectManager {
    arena: ActorArena,
    /// Manager-level status: menus suspend gameplay by clearing UPDATE
    status: Status,
    /// All actors, in insertion order
    update_list: Vec<ActorId>,
    opaque_list: Vec<ActorId>,
    transparent_list: Vec<ActorId>,
    /// Collision scan candidates, in insertion order
    collidable_list: Vec<ActorId>,
    pending_add: Vec<Actor>,
    pending_removal: Vec<ActorId>,
    policy: ResponsePolicy,
}

impl ObjectManager {
    #[must_use]
    pub fn new(policy: ResponsePolicy) -> Self {
        Self {
            arena: ActorArena::new(),
            status: Status::ACTIVE,
            update_list: Vec::new(),
            opaque_list: Vec::new(),
            transparent_list: Vec::new(),
            collidable_list: Vec::new(),
            pending_add: Vec::new(),
            pending_removal: Vec::new(),
            policy,
        }
    }

    #[must_use]
    pub fn status(&self) -> Status {
        self.status
    }

    pub fn set_status(&mut self, status: Status) {
        self.status = status;
    }

    pub fn policy_mut(&mut self) -> &mut ResponsePolicy {
        &mut self.policy
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Add an actor immediately and route it into the partitions.
    ///
    /// Only legal outside the update pass; gameplay code running inside a
    /// traversal uses [`ObjectManager::add_deferred`].
    pub fn add(&mut self, actor: Actor) -> ActorId {
        let drawable = actor.is_drawable();
        let transparent = actor.is_transparent();
        let collidable = actor.kind.is_collidable() && actor.collider.is_some();

        let id = self.arena.insert(actor);
        self.update_list.push(id);
        if drawable {
            if transparent {
                self.transparent_list.push(id);
            } else {
                self.opaque_list.push(id);
            }
        }
        if collidable {
            self.collidable_list.push(id);
        }
        id
    }

    /// Queue an actor for insertion at the next `end_frame`.
    pub fn add_deferred(&mut self, actor: Actor) {
        self.pending_add.push(actor);
    }

    /// Add a batch of actors (level-loader output), preserving order.
    pub fn add_batch(&mut self, actors: impl IntoIterator<Item = Actor>) -> Vec<ActorId> {
        actors.into_iter().map(|actor| self.add(actor)).collect()
    }

    /// Queue an actor for removal at the next `end_frame`.
    pub fn remove(&mut self, id: ActorId) {
        self.pending_removal.push(id);
    }

    /// Queue every matching actor for removal at the next `end_frame`.
    pub fn remove_where(&mut self, predicate: impl Fn(&Actor) -> bool) {
        let matches = self
            .arena
            .iter()
            .filter(|(_, actor)| predicate(actor))
            .map(|(id, _)| id);
        self.pending_removal.extend(matches);
    }

    /// Drop every actor immediately. Only legal outside the update pass.
    pub fn clear(&mut self) {
        log::debug!("clearing object manager ({} actors)", self.arena.len());
        self.arena.clear();
        self.update_list.clear();
        self.opaque_list.clear();
        self.transparent_list.clear();
        self.collidable_list.clear();
        self.pending_add.clear();
        self.pending_removal.clear();
    }

    #[must_use]
    pub fn get(&self, id: ActorId) -> Option<&Actor> {
        self.arena.get(id)
    }

    #[must_use]
    pub fn get_mut(&mut self, id: ActorId) -> Option<&mut Actor> {
        self.arena.get_mut(id)
    }

    /// First actor whose string id matches, in insertion order.
    #[must_use]
    pub fn find_by_id(&self, id: &str) -> Option<(ActorId, &Actor)> {
        self.update_list
            .iter()
            .filter_map(|&slot| self.arena.get(slot).map(|actor| (slot, actor)))
            .find(|(_, actor)| actor.id == id)
    }

    /// Iterate live actors in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (ActorId, &Actor)> {
        self.update_list
            .iter()
            .filter_map(|&id| self.arena.get(id).map(|actor| (id, actor)))
    }

    // ------------------------------------------------------------------------
    // Update pass
    // ------------------------------------------------------------------------

    /// Run one update pass: controllers in list order, then per-kind motion
    /// resolution, in actor insertion order.
    ///
    /// Does not drain deferred adds/removals; the game loop calls
    /// [`ObjectManager::end_frame`] after event dispatch.
    pub fn update(&mut self, env: &mut ControllerEnv<'_>) {
        if !self.status.is_updated() {
            return;
        }

        for index in 0..self.update_list.len() {
            let id = self.update_list[index];
            let Some(mut actor) = self.arena.take(id) else {
                continue;
            };
            if !actor.status.is_updated() {
                self.arena.put_back(id, actor);
                continue;
            }

            // Controllers run in list order; later ones see earlier mutations
            let mut controllers = std::mem::take(&mut actor.controllers);
            for controller in controllers.iter_mut() {
                controller.update(env, &mut actor.transform, actor.material.as_mut());
            }
            actor.controllers = controllers;

            if actor.kind.is_mover() && actor.collider.is_some() {
                self.resolve_mover(&mut actor, env);
            } else {
                actor.transform.commit();
            }

            self.arena.put_back(id, actor);
        }
    }

    /// Detect → respond → move for one collidable mover.
    ///
    /// A non-blocking response clears the collidee so the queued movement
    /// still applies (pass-through); a blocking one suppresses the frame's
    /// motion entirely.
    fn resolve_mover(&mut self, actor: &mut Actor, env: &mut ControllerEnv<'_>) {
        let mut collidee = self.first_collision(actor);

        if let Some(collidee_id) = collidee
            && let Some(other_kind) = self.arena.get(collidee_id).map(|other| other.kind)
        {
            let response = self.policy.lookup(actor.kind, other_kind);
            if let Some(action) = response.action {
                self.apply_action(action, collidee_id, env);
            }
            if !response.blocks {
                collidee = None;
            }
        }

        if collidee.is_none() {
            actor.transform.commit();
        } else {
            actor.transform.clear_increments();
        }
    }

    fn apply_action(
        &mut self,
        action: ResponseAction,
        collidee_id: ActorId,
        env: &mut ControllerEnv<'_>,
    ) {
        match action {
            ResponseAction::Trigger => self.fire_contact_effects(collidee_id, env),
            ResponseAction::Collect => {
                self.fire_contact_effects(collidee_id, env);
                if let Some(pickup) = self.arena.get(collidee_id).and_then(|actor| actor.pickup) {
                    env.events.push(match pickup.kind {
                        PickupKind::Health => Event::HealthDelta {
                            delta: pickup.value,
                        },
                        PickupKind::Score => Event::ScoreDelta {
                            delta: pickup.value,
                        },
                    });
                }
                env.events.push(Event::RemoveActor { id: collidee_id });
            }
            ResponseAction::Tint(color) => {
                if let Some(material) = self
                    .arena
                    .get_mut(collidee_id)
                    .and_then(|actor| actor.material.as_mut())
                {
                    material.diffuse = color;
                }
            }
        }
    }

    fn fire_contact_effects(&self, collidee_id: ActorId, env: &mut ControllerEnv<'_>) {
        let Some(collidee) = self.arena.get(collidee_id) else {
            return;
        };
        for effect in &collidee.contact_effects {
            env.events.push(match effect {
                ContactEffect::Sound(name) => Event::PlaySound { name: name.clone() },
                ContactEffect::HealthDelta(delta) => Event::HealthDelta { delta: *delta },
                ContactEffect::ScoreDelta(delta) => Event::ScoreDelta { delta: *delta },
            });
        }
    }

    /// Broad phase: linear scan over collidable actors in insertion order,
    /// reporting the first intersecting one. O(n) by design; actor counts
    /// are small and a spatial index is a non-goal.
    #[must_use]
    pub fn first_collision(&self, mover: &Actor) -> Option<ActorId> {
        let shape = mover.collider?;
        let volume = shape.world_volume(&mover.transform);

        for &candidate_id in &self.collidable_list {
            // The mover itself is taken out of its slot during update, so
            // this also skips self-collision
            let Some(other) = self.arena.get(candidate_id) else {
                continue;
            };
            let Some(other_shape) = other.collider else {
                continue;
            };
            if volume.intersects(&other_shape.world_volume(&other.transform)) {
                return Some(candidate_id);
            }
        }
        None
    }

    // ------------------------------------------------------------------------
    // Frame boundary
    // ------------------------------------------------------------------------

    /// Drain deferred adds and removals and re-seat actors whose alpha
    /// crossed the transparency threshold. Call once per frame, after event
    /// dispatch.
    pub fn end_frame(&mut self) {
        for actor in std::mem::take(&mut self.pending_add) {
            self.add(actor);
        }

        if !self.pending_removal.is_empty() {
            let removals = std::mem::take(&mut self.pending_removal);
            let mut removed = 0usize;
            for id in removals {
                if let Some(actor) = self.arena.remove(id) {
                    log::debug!("removed actor '{}'", actor.id);
                    removed += 1;
                }
            }
            if removed > 0 {
                let arena = &self.arena;
                self.update_list.retain(|&id| arena.get(id).is_some());
                self.opaque_list.retain(|&id| arena.get(id).is_some());
                self.transparent_list.retain(|&id| arena.get(id).is_some());
                self.collidable_list.retain(|&id| arena.get(id).is_some());
            }
        }

        self.rebalance_draw_partitions();
    }

    /// Opacity can change at runtime (fades); draw partition membership
    /// follows it at the frame boundary, never mid-traversal.
    fn rebalance_draw_partitions(&mut self) {
        let arena = &self.arena;
        let mut to_transparent = Vec::new();
        let mut to_opaque = Vec::new();

        self.opaque_list.retain(|&id| {
            let transparent = arena.get(id).is_some_and(Actor::is_transparent);
            if transparent {
                to_transparent.push(id);
            }
            !transparent
        });
        self.transparent_list.retain(|&id| {
            let opaque = arena.get(id).is_some_and(|actor| !actor.is_transparent());
            if opaque {
                to_opaque.push(id);
            }
            !opaque
        });

        self.opaque_list.extend(to_opaque);
        self.transparent_list.extend(to_transparent);
    }

    // ------------------------------------------------------------------------
    // Draw pass
    // ------------------------------------------------------------------------

    /// Emit draw commands, opaque partition first, then transparent.
    pub fn draw(&self, queue: &mut DrawQueue) {
        if !self.status.is_drawn() {
            return;
        }
        for &id in self.opaque_list.iter().chain(self.transparent_list.iter()) {
            let Some(actor) = self.arena.get(id) else {
                continue;
            };
            if !actor.status.is_drawn() {
                continue;
            }
            if let (Some(geometry), Some(material)) = (&actor.geometry, &actor.material) {
                queue.scene.push(DrawCommand {
                    geometry: geometry.clone(),
                    material: material.clone(),
                    world: actor.transform.world_matrix(),
                });
            }
        }
    }
}

impl std::fmt::Debug for ObjectManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectManager")
            .field("actors", &self.arena.len())
            .field("status", &self.status)
            .field("pending_removal", &self.pending_removal.len())
            .finish()
    }
}
