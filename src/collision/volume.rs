//! Analytic collision volumes
//!
//! Colliders are specified in local space (a radius or half-extents) and
//! realized as world-space volumes from the owning transform at query time;
//! nothing is cached, so a volume can never go stale against its actor.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::scene::Transform3D;

/// Local-space collider attached to an actor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ColliderShape {
    /// Sphere of the given radius, centered on the actor
    Sphere { radius: f32 },
    /// Axis-aligned box with the given half-extents, centered on the actor
    Box { half_extents: Vec3 },
}

impl ColliderShape {
    /// Realize this shape as a world-space volume from the owning transform.
    ///
    /// Scale is folded in: a sphere takes the largest scale axis, a box
    /// scales per axis.
    #[must_use]
    pub fn world_volume(&self, transform: &Transform3D) -> Volume {
        match *self {
            Self::Sphere { radius } => Volume::Sphere(BoundingSphere {
                center: transform.position,
                radius: radius * transform.scale.max_element(),
            }),
            Self::Box { half_extents } => Volume::Box(Aabb::from_center_half_extents(
                transform.position,
                half_extents * transform.scale,
            )),
        }
    }
}

/// World-space bounding sphere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingSphere {
    pub center: Vec3,
    pub radius: f32,
}

impl BoundingSphere {
    #[must_use]
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Spheres intersect when center distance is within the radius sum.
    #[must_use]
    pub fn intersects_sphere(&self, other: &BoundingSphere) -> bool {
        self.center.distance_squared(other.center)
            <= (self.radius + other.radius) * (self.radius + other.radius)
    }

    /// Sphere/box test via the clamped closest point on the box.
    #[must_use]
    pub fn intersects_aabb(&self, aabb: &Aabb) -> bool {
        let closest = self.center.clamp(aabb.min, aabb.max);
        self.center.distance_squared(closest) <= self.radius * self.radius
    }
}

/// World-space axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    #[must_use]
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    #[must_use]
    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// Boxes intersect iff their intervals overlap on all three world axes.
    #[must_use]
    pub fn intersects_aabb(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }
}

/// A realized world-space volume, ready for pairwise tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Volume {
    Sphere(BoundingSphere),
    Box(Aabb),
}

impl Volume {
    /// Symmetric intersection predicate over the concrete pair.
    #[must_use]
    pub fn intersects(&self, other: &Volume) -> bool {
        match (self, other) {
            (Volume::Sphere(a), Volume::Sphere(b)) => a.intersects_sphere(b),
            (Volume::Box(a), Volume::Box(b)) => a.intersects_aabb(b),
            (Volume::Sphere(s), Volume::Box(b)) | (Volume::Box(b), Volume::Sphere(s)) => {
                s.intersects_aabb(b)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sphere_sphere_radius_sum() {
        let a = BoundingSphere::new(Vec3::ZERO, 1.0);
        let b = BoundingSphere::new(Vec3::new(2.0, 0.0, 0.0), 1.0);
        let c = BoundingSphere::new(Vec3::new(2.01, 0.0, 0.0), 1.0);

        // Touching at exactly the radius sum counts as intersecting
        assert!(a.intersects_sphere(&b));
        assert!(!a.intersects_sphere(&c));
    }

    #[test]
    fn test_sphere_sphere_symmetric() {
        let a = Volume::Sphere(BoundingSphere::new(Vec3::ZERO, 2.0));
        let b = Volume::Sphere(BoundingSphere::new(Vec3::new(1.0, 1.0, 1.0), 0.5));
        assert_eq!(a.intersects(&b), b.intersects(&a));

        let far = Volume::Sphere(BoundingSphere::new(Vec3::splat(100.0), 0.5));
        assert_eq!(a.intersects(&far), far.intersects(&a));
    }

    #[test]
    fn test_box_box_requires_overlap_on_all_axes() {
        let a = Aabb::from_center_half_extents(Vec3::ZERO, Vec3::ONE);
        let b = Aabb::from_center_half_extents(Vec3::new(1.5, 0.0, 0.0), Vec3::ONE);
        assert!(a.intersects_aabb(&b));

        // Shrinking the second box along x until the intervals separate
        // flips the result
        let shrunk = Aabb::from_center_half_extents(Vec3::new(1.5, 0.0, 0.0), Vec3::new(0.4, 1.0, 1.0));
        assert!(!a.intersects_aabb(&shrunk));

        // Separation on any single axis is enough to miss
        let above = Aabb::from_center_half_extents(Vec3::new(0.0, 3.0, 0.0), Vec3::ONE);
        assert!(!a.intersects_aabb(&above));
    }

    #[test]
    fn test_sphere_box_clamped_closest_point() {
        let aabb = Aabb::from_center_half_extents(Vec3::ZERO, Vec3::ONE);

        // Sphere just off the +X face
        let near = BoundingSphere::new(Vec3::new(1.5, 0.0, 0.0), 0.6);
        assert!(near.intersects_aabb(&aabb));

        let far = BoundingSphere::new(Vec3::new(1.5, 0.0, 0.0), 0.4);
        assert!(!far.intersects_aabb(&aabb));

        // Corner case: distance to the corner, not a face
        let corner = BoundingSphere::new(Vec3::new(2.0, 2.0, 2.0), 1.0);
        assert!(!corner.intersects_aabb(&aabb));
    }

    #[test]
    fn test_mixed_pair_symmetric() {
        let sphere = Volume::Sphere(BoundingSphere::new(Vec3::new(1.2, 0.0, 0.0), 0.5));
        let aabb = Volume::Box(Aabb::from_center_half_extents(Vec3::ZERO, Vec3::ONE));
        assert_eq!(sphere.intersects(&aabb), aabb.intersects(&sphere));
        assert!(sphere.intersects(&aabb));
    }

    #[test]
    fn test_degenerate_zero_radius_is_well_defined() {
        let point = BoundingSphere::new(Vec3::ZERO, 0.0);
        let other = BoundingSphere::new(Vec3::ZERO, 0.0);
        // Coincident zero-radius spheres still report intersection
        assert!(point.intersects_sphere(&other));
    }

    #[test]
    fn test_world_volume_applies_transform_scale() {
        let shape = ColliderShape::Box {
            half_extents: Vec3::ONE,
        };
        let mut transform = Transform3D::from_position(Vec3::new(5.0, 0.0, 0.0));
        transform.scale = Vec3::splat(2.0);

        match shape.world_volume(&transform) {
            Volume::Box(aabb) => {
                assert_eq!(aabb.min, Vec3::new(3.0, -2.0, -2.0));
                assert_eq!(aabb.max, Vec3::new(7.0, 2.0, 2.0));
            }
            Volume::Sphere(_) => panic!("expected a box volume"),
        }
    }
}
