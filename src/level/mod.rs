//! Image-driven level loading
//!
//! A level is painted as a small bitmap: each pixel color is a key into a
//! palette of actor templates, and each matching pixel spawns one actor at
//! the scaled (x, z) grid position. Unmatched colors are skipped, so the
//! background can stay unmapped. Templates replace archetype cloning: a
//! template describes geometry, material, collider and payload once, and
//! `spawn` builds fresh actors from it (geometry stays shared read-only).

use std::fs;
use std::path::Path;

use glam::Vec3;
use image::RgbaImage;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::collision::ColliderShape;
use crate::render::{Color, Geometry, Material, colors};
use crate::scene::{Actor, ActorKind, ContactEffect, PickupParameters, Status, Transform3D};

/// Placement parameters for rasterizing a level image into world space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelParams {
    /// World units per pixel along x
    pub x_scale: f32,
    /// World units per pixel along z
    pub z_scale: f32,
    /// Height at which spawned actors sit
    pub y_offset: f32,
    /// World-space offset added to every spawn position
    pub offset: Vec3,
}

impl Default for LevelParams {
    fn default() -> Self {
        Self {
            x_scale: 1.0,
            z_scale: 1.0,
            y_offset: 0.0,
            offset: Vec3::ZERO,
        }
    }
}

/// Reusable actor recipe: everything but id and position.
#[derive(Debug, Clone)]
pub struct ActorTemplate {
    /// Prefix for spawned actor ids
    pub name: String,
    pub kind: ActorKind,
    pub status: Status,
    pub geometry: Geometry,
    pub material: Material,
    pub scale: Vec3,
    pub collider: Option<ColliderShape>,
    pub pickup: Option<PickupParameters>,
    pub contact_effects: Vec<ContactEffect>,
}

impl ActorTemplate {
    /// Build a fresh actor at a position. Geometry is shared with every
    /// other instance of the template; everything else is per-actor.
    #[must_use]
    pub fn spawn(&self, id: impl Into<String>, position: Vec3) -> Actor {
        let mut transform = Transform3D::from_position(position);
        transform.scale = self.scale;

        let mut actor = Actor::new(id, self.kind, self.status)
            .with_transform(transform)
            .with_surface(self.geometry.clone(), self.material.clone());
        if let Some(collider) = self.collider {
            actor = actor.with_collider(collider);
        }
        if let Some(pickup) = self.pickup {
            actor = actor.with_pickup(pickup);
        }
        for effect in &self.contact_effects {
            actor = actor.with_contact_effect(effect.clone());
        }
        actor
    }
}

/// Rasterizes level images into actor batches via a color palette.
#[derive(Debug, Default)]
pub struct LevelLoader {
    palette: FxHashMap<[u8; 3], ActorTemplate>,
}

impl LevelLoader {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Map a pixel color to a template.
    pub fn map(&mut self, color: [u8; 3], template: ActorTemplate) {
        self.palette.insert(color, template);
    }

    #[must_use]
    pub fn palette_len(&self) -> usize {
        self.palette.len()
    }

    /// Spawn one actor per mapped pixel. Pixel (x, y) lands at world
    /// `(x * x_scale, y_offset, y * z_scale) + offset`; ids encode the
    /// template name and grid cell.
    #[must_use]
    pub fn load(&self, image: &RgbaImage, params: LevelParams) -> Vec<Actor> {
        let mut actors = Vec::new();
        for (x, z, pixel) in image.enumerate_pixels() {
            let key = [pixel[0], pixel[1], pixel[2]];
            let Some(template) = self.palette.get(&key) else {
                continue;
            };
            let position = params.offset
                + Vec3::new(
                    x as f32 * params.x_scale,
                    params.y_offset,
                    z as f32 * params.z_scale,
                );
            actors.push(template.spawn(format!("{}-{x}-{z}", template.name), position));
        }
        log::info!(
            "level loader spawned {} actors from a {}x{} image",
            actors.len(),
            image.width(),
            image.height()
        );
        actors
    }
}

// ============================================================================
// Serde descriptors
// ============================================================================

/// Geometry selection for data-driven templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeometryShape {
    Quad,
    Cube,
}

impl GeometryShape {
    #[must_use]
    pub fn build(self) -> Geometry {
        match self {
            Self::Quad => Geometry::quad(),
            Self::Cube => Geometry::cube(),
        }
    }
}

fn default_diffuse() -> Color {
    colors::WHITE
}

fn default_alpha() -> f32 {
    1.0
}

fn default_scale() -> Vec3 {
    Vec3::ONE
}

fn default_status() -> Status {
    Status::ACTIVE
}

/// Serializable form of [`ActorTemplate`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateDescriptor {
    pub name: String,
    pub kind: ActorKind,
    pub shape: GeometryShape,
    #[serde(default)]
    pub texture: Option<String>,
    #[serde(default = "default_diffuse")]
    pub diffuse: Color,
    #[serde(default = "default_alpha")]
    pub alpha: f32,
    #[serde(default = "default_scale")]
    pub scale: Vec3,
    #[serde(default = "default_status")]
    pub status: Status,
    #[serde(default)]
    pub collider: Option<ColliderShape>,
    #[serde(default)]
    pub pickup: Option<PickupParameters>,
    #[serde(default)]
    pub contact_effects: Vec<ContactEffect>,
}

impl TemplateDescriptor {
    #[must_use]
    pub fn build(&self) -> ActorTemplate {
        let mut material = Material::unlit()
            .with_diffuse(self.diffuse)
            .with_alpha(self.alpha);
        material.texture = self.texture.clone();

        ActorTemplate {
            name: self.name.clone(),
            kind: self.kind,
            status: self.status,
            geometry: self.shape.build(),
            material,
            scale: self.scale,
            collider: self.collider,
            pickup: self.pickup,
            contact_effects: self.contact_effects.clone(),
        }
    }
}

/// Serializable palette: color keys plus their templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelDescriptor {
    pub palette: Vec<([u8; 3], TemplateDescriptor)>,
}

impl LevelDescriptor {
    /// Load a palette descriptor from a RON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or deserialization fails
    pub fn load_ron(path: impl AsRef<Path>) -> Result<Self, LevelError> {
        let content = fs::read_to_string(path).map_err(|e| LevelError::Io(e.to_string()))?;
        let descriptor: LevelDescriptor =
            ron::from_str(&content).map_err(|e| LevelError::Deserialize(e.to_string()))?;
        Ok(descriptor)
    }

    /// Build the runtime loader.
    #[must_use]
    pub fn into_loader(self) -> LevelLoader {
        let mut loader = LevelLoader::new();
        for (color, descriptor) in &self.palette {
            loader.map(*color, descriptor.build());
        }
        loader
    }
}

/// Errors that can occur loading level descriptors
#[derive(Debug, Clone)]
pub enum LevelError {
    Io(String),
    Deserialize(String),
}

impl std::fmt::Display for LevelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "IO error: {e}"),
            Self::Deserialize(e) => write!(f, "Deserialization error: {e}"),
        }
    }
}

impl std::error::Error for LevelError {}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::PickupKind;

    const RED: [u8; 3] = [255, 0, 0];

    fn pickup_template() -> ActorTemplate {
        ActorTemplate {
            name: "medkit".to_string(),
            kind: ActorKind::CollidablePickup,
            status: Status::ACTIVE,
            geometry: Geometry::cube(),
            material: Material::unlit(),
            scale: Vec3::ONE,
            collider: Some(ColliderShape::Sphere { radius: 0.5 }),
            pickup: Some(PickupParameters::new(PickupKind::Health, 10)),
            contact_effects: vec![ContactEffect::Sound("chime".to_string())],
        }
    }

    #[test]
    fn test_mapped_pixels_spawn_scaled_actors() {
        let mut image = RgbaImage::new(2, 2);
        image.put_pixel(0, 0, image::Rgba([255, 0, 0, 255]));
        image.put_pixel(1, 1, image::Rgba([255, 0, 0, 255]));
        // (1, 0) and (0, 1) stay unmapped

        let mut loader = LevelLoader::new();
        loader.map(RED, pickup_template());

        let actors = loader.load(
            &image,
            LevelParams {
                x_scale: 2.0,
                z_scale: 4.0,
                y_offset: 1.0,
                offset: Vec3::new(10.0, 0.0, 0.0),
            },
        );

        assert_eq!(actors.len(), 2);
        assert_eq!(actors[0].transform.position, Vec3::new(10.0, 1.0, 0.0));
        assert_eq!(actors[1].transform.position, Vec3::new(12.0, 1.0, 4.0));
        assert_eq!(actors[0].id, "medkit-0-0");
        assert_eq!(actors[1].id, "medkit-1-1");
    }

    #[test]
    fn test_unmapped_image_spawns_nothing() {
        let image = RgbaImage::new(4, 4);
        let mut loader = LevelLoader::new();
        loader.map(RED, pickup_template());
        assert!(loader.load(&image, LevelParams::default()).is_empty());
    }

    #[test]
    fn test_spawned_instances_share_geometry() {
        let template = pickup_template();
        let a = template.spawn("a", Vec3::ZERO);
        let b = template.spawn("b", Vec3::X);
        assert!(std::ptr::eq(
            a.geometry.as_ref().unwrap().vertices(),
            b.geometry.as_ref().unwrap().vertices()
        ));
    }

    #[test]
    fn test_spawn_carries_payload_and_effects() {
        let actor = pickup_template().spawn("medkit-test", Vec3::ZERO);
        assert_eq!(actor.kind, ActorKind::CollidablePickup);
        assert_eq!(
            actor.pickup,
            Some(PickupParameters::new(PickupKind::Health, 10))
        );
        assert_eq!(actor.contact_effects.len(), 1);
    }

    #[test]
    fn test_descriptor_ron_round_trip() {
        let descriptor = LevelDescriptor {
            palette: vec![(
                RED,
                TemplateDescriptor {
                    name: "crate".to_string(),
                    kind: ActorKind::CollidableDecorator,
                    shape: GeometryShape::Cube,
                    texture: Some("crate1".to_string()),
                    diffuse: colors::WHITE,
                    alpha: 1.0,
                    scale: Vec3::splat(2.0),
                    status: Status::ACTIVE,
                    collider: Some(ColliderShape::Box {
                        half_extents: Vec3::splat(0.5),
                    }),
                    pickup: None,
                    contact_effects: Vec::new(),
                },
            )],
        };

        let ron_str =
            ron::ser::to_string_pretty(&descriptor, ron::ser::PrettyConfig::default()).unwrap();
        let loaded: LevelDescriptor = ron::from_str(&ron_str).unwrap();
        let loader = loaded.into_loader();
        assert_eq!(loader.palette_len(), 1);

        let mut image = RgbaImage::new(1, 1);
        image.put_pixel(0, 0, image::Rgba([255, 0, 0, 255]));
        let actors = loader.load(&image, LevelParams::default());
        assert_eq!(actors.len(), 1);
        assert_eq!(actors[0].transform.scale, Vec3::splat(2.0));
        assert!(actors[0].collider.is_some());
    }

    #[test]
    fn test_descriptor_defaults_fill_optional_fields() {
        let ron_str = r#"(
            palette: [
                ((0, 255, 0), (
                    name: "tree",
                    kind: Decorator,
                    shape: quad,
                )),
            ],
        )"#;
        let descriptor: LevelDescriptor = ron::from_str(ron_str).unwrap();
        let template = descriptor.palette[0].1.build();
        assert_eq!(template.scale, Vec3::ONE);
        assert!((template.material.alpha - 1.0).abs() < f32::EPSILON);
        assert!(template.collider.is_none());
    }
}
