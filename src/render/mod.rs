//! Render boundary types
//!
//! The core never touches a graphics device. Each frame it produces a
//! [`DrawQueue`] of camera matrices plus an ordered list of draw commands
//! (geometry, material, world matrix), which the host renderer consumes.
//! Vertex data is `bytemuck`-plain so the host can upload slices directly.

use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec2};
use serde::{Deserialize, Serialize};

/// RGBA color in linear space.
pub type Color = [f32; 4];

/// A handful of stock colors.
pub mod colors {
    use super::Color;

    pub const WHITE: Color = [1.0, 1.0, 1.0, 1.0];
    pub const BLACK: Color = [0.0, 0.0, 0.0, 1.0];
    pub const RED: Color = [1.0, 0.0, 0.0, 1.0];
    pub const GREEN: Color = [0.0, 1.0, 0.0, 1.0];
    pub const BLUE: Color = [0.0, 0.0, 1.0, 1.0];
    pub const YELLOW: Color = [1.0, 1.0, 0.0, 1.0];
}

/// Linear interpolation between two colors.
#[must_use]
pub fn lerp_color(a: Color, b: Color, t: f32) -> Color {
    let t = t.clamp(0.0, 1.0);
    [
        a[0] + (b[0] - a[0]) * t,
        a[1] + (b[1] - a[1]) * t,
        a[2] + (b[2] - a[2]) * t,
        a[3] + (b[3] - a[3]) * t,
    ]
}

/// Vertex with position, normal, and UV coordinates
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex {
    /// Create a new vertex
    #[must_use]
    pub const fn new(position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            uv,
        }
    }
}

/// Primitive topology of a vertex list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Topology {
    #[default]
    TriangleList,
    TriangleStrip,
    LineList,
}

/// Immutable geometry shared between actors.
///
/// The vertex list is behind an `Arc`: instances spawned from the same
/// template share vertices by design, and the shared data is read-only.
#[derive(Debug, Clone)]
pub struct Geometry {
    vertices: Arc<[Vertex]>,
    topology: Topology,
    primitive_count: u32,
}

impl Geometry {
    /// Wrap a raw vertex list.
    #[must_use]
    pub fn new(vertices: Vec<Vertex>, topology: Topology, primitive_count: u32) -> Self {
        Self {
            vertices: vertices.into(),
            topology,
            primitive_count,
        }
    }

    #[must_use]
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    #[must_use]
    pub fn topology(&self) -> Topology {
        self.topology
    }

    #[must_use]
    pub fn primitive_count(&self) -> u32 {
        self.primitive_count
    }

    /// Unit quad in the XY plane, centered at the origin, facing +Z.
    #[must_use]
    pub fn quad() -> Self {
        let n = [0.0, 0.0, 1.0];
        let vertices = vec![
            Vertex::new([-0.5, -0.5, 0.0], n, [0.0, 1.0]),
            Vertex::new([0.5, -0.5, 0.0], n, [1.0, 1.0]),
            Vertex::new([0.5, 0.5, 0.0], n, [1.0, 0.0]),
            Vertex::new([-0.5, -0.5, 0.0], n, [0.0, 1.0]),
            Vertex::new([0.5, 0.5, 0.0], n, [1.0, 0.0]),
            Vertex::new([-0.5, 0.5, 0.0], n, [0.0, 0.0]),
        ];
        Self::new(vertices, Topology::TriangleList, 2)
    }

    /// Unit cube centered at the origin, one quad per face.
    #[must_use]
    pub fn cube() -> Self {
        const FACES: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
            // (normal, tangent u, tangent v) per face
            ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
            ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
            ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
            ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
            ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
            ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
        ];

        let mut vertices = Vec::with_capacity(36);
        for (normal, u, v) in FACES {
            let corner = |su: f32, sv: f32| {
                [
                    0.5 * (normal[0] + su * u[0] + sv * v[0]),
                    0.5 * (normal[1] + su * u[1] + sv * v[1]),
                    0.5 * (normal[2] + su * u[2] + sv * v[2]),
                ]
            };
            let quad = [
                (corner(-1.0, -1.0), [0.0, 1.0]),
                (corner(1.0, -1.0), [1.0, 1.0]),
                (corner(1.0, 1.0), [1.0, 0.0]),
                (corner(-1.0, -1.0), [0.0, 1.0]),
                (corner(1.0, 1.0), [1.0, 0.0]),
                (corner(-1.0, 1.0), [0.0, 0.0]),
            ];
            for (position, uv) in quad {
                vertices.push(Vertex::new(position, normal, uv));
            }
        }
        Self::new(vertices, Topology::TriangleList, 12)
    }
}

/// Material parameters for a drawable actor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Opaque texture key resolved by the host's asset store
    pub texture: Option<String>,
    /// Diffuse tint
    pub diffuse: Color,
    /// Opacity; below 1.0 the actor draws in the transparent pass
    pub alpha: f32,
    /// Whether the lit shader variant is selected
    pub lit: bool,
}

impl Material {
    /// Untextured, opaque, unlit white.
    #[must_use]
    pub fn unlit() -> Self {
        Self::default()
    }

    /// Textured material with the default tint.
    #[must_use]
    pub fn textured(texture: impl Into<String>) -> Self {
        Self {
            texture: Some(texture.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_diffuse(mut self, diffuse: Color) -> Self {
        self.diffuse = diffuse;
        self
    }

    #[must_use]
    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha;
        self
    }

    /// Transparent materials are drawn after all opaque ones.
    #[must_use]
    pub fn is_transparent(&self) -> bool {
        self.alpha < 1.0
    }
}

impl Default for Material {
    fn default() -> Self {
        Self {
            texture: None,
            diffuse: colors::WHITE,
            alpha: 1.0,
            lit: false,
        }
    }
}

/// One 3D draw submission.
#[derive(Debug, Clone)]
pub struct DrawCommand {
    pub geometry: Geometry,
    pub material: Material,
    pub world: Mat4,
}

/// One 2D overlay submission (HUD text, menu sprites).
#[derive(Debug, Clone)]
pub struct UiDrawCommand {
    pub texture: Option<String>,
    pub text: Option<String>,
    pub position: Vec2,
    pub scale: Vec2,
    pub rotation_degrees: f32,
    pub color: Color,
}

/// Per-frame output handed to the host renderer.
///
/// Scene commands are ordered opaque-first; UI commands draw on top in
/// list order.
#[derive(Debug, Default)]
pub struct DrawQueue {
    pub view: Mat4,
    pub projection: Mat4,
    pub scene: Vec<DrawCommand>,
    pub ui: Vec<UiDrawCommand>,
}

impl DrawQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset for a new frame, keeping allocations.
    pub fn clear(&mut self) {
        self.scene.clear();
        self.ui.clear();
    }
}
