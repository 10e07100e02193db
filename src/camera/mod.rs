//! Cameras and the camera manager
//!
//! Cameras live outside the object manager: the [`CameraManager`] owns an
//! ordered list and the index of the single active camera. All cameras
//! with update status run their controllers each frame; only the active
//! one supplies view/projection matrices to the draw queue.

use glam::Mat4;
use smallvec::SmallVec;

use crate::controllers::{Controller, ControllerEnv, TimeStep};
use crate::events::{Event, EventQueue};
use crate::input::Input;
use crate::scene::{ObjectManager, Status, Transform3D};

/// A perspective camera with its own controller list.
#[derive(Debug, Clone)]
pub struct Camera3D {
    pub id: String,
    pub status: Status,
    pub transform: Transform3D,
    /// Field of view in radians
    pub fov: f32,
    /// Aspect ratio (width / height)
    pub aspect: f32,
    /// Near clipping plane
    pub near: f32,
    /// Far clipping plane
    pub far: f32,
    pub controllers: SmallVec<[Controller; 2]>,
}

impl Camera3D {
    /// Create a camera with default projection parameters.
    #[must_use]
    pub fn new(id: impl Into<String>, transform: Transform3D) -> Self {
        Self {
            id: id.into(),
            status: Status::UPDATE,
            transform,
            fov: std::f32::consts::FRAC_PI_4, // 45 degrees
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 1000.0,
            controllers: SmallVec::new(),
        }
    }

    #[must_use]
    pub fn with_controller(mut self, controller: Controller) -> Self {
        self.controllers.push(controller);
        self
    }

    /// Get the view matrix
    #[must_use]
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(
            self.transform.position,
            self.transform.position + self.transform.look,
            self.transform.up,
        )
    }

    /// Get the projection matrix
    #[must_use]
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
    }

    /// Get combined view-projection matrix
    #[must_use]
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Update aspect ratio on window resize
    pub fn set_aspect(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height.max(1) as f32;
    }
}

/// Ordered camera list with a single active index.
#[derive(Debug, Default)]
pub struct CameraManager {
    cameras: Vec<Camera3D>,
    active: usize,
}

impl CameraManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a camera; the first one added becomes active.
    pub fn add(&mut self, camera: Camera3D) -> usize {
        self.cameras.push(camera);
        self.cameras.len() - 1
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cameras.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cameras.is_empty()
    }

    #[must_use]
    pub fn active_index(&self) -> usize {
        self.active
    }

    /// The single active camera, if any exist.
    #[must_use]
    pub fn active(&self) -> Option<&Camera3D> {
        self.cameras.get(self.active)
    }

    #[must_use]
    pub fn active_mut(&mut self) -> Option<&mut Camera3D> {
        self.cameras.get_mut(self.active)
    }

    /// Advance the active index cyclically.
    pub fn cycle_active(&mut self) {
        if !self.cameras.is_empty() {
            self.active = (self.active + 1) % self.cameras.len();
            log::debug!("active camera -> '{}'", self.cameras[self.active].id);
        }
    }

    /// Activate the camera with the given id. Unknown ids leave the active
    /// camera unchanged.
    pub fn set_active_by_id(&mut self, id: &str) -> bool {
        match self.cameras.iter().position(|camera| camera.id == id) {
            Some(index) => {
                self.active = index;
                true
            }
            None => {
                log::warn!("unknown camera id '{id}'");
                false
            }
        }
    }

    /// React to Camera-category events.
    pub fn handle_event(&mut self, event: &Event) {
        match event {
            Event::CameraCycle => self.cycle_active(),
            Event::CameraSetActive { id } => {
                self.set_active_by_id(id);
            }
            _ => {}
        }
    }

    /// Run controllers on every camera with update status.
    ///
    /// Third-person controllers get their follow target resolved from the
    /// scene before running.
    pub fn update(
        &mut self,
        step: TimeStep,
        input: &Input,
        events: &mut EventQueue,
        scene: &ObjectManager,
    ) {
        for camera in &mut self.cameras {
            if !camera.status.is_updated() {
                continue;
            }
            for controller in camera.controllers.iter_mut() {
                let follow_target = match controller {
                    Controller::ThirdPersonCamera { target_id, .. }
                    | Controller::Rail { target_id, .. } => scene
                        .find_by_id(target_id)
                        .map(|(_, actor)| actor.transform),
                    _ => None,
                };
                let mut env = ControllerEnv {
                    step,
                    input,
                    events: &mut *events,
                    follow_target,
                };
                controller.update(&mut env, &mut camera.transform, None);
            }
            camera.transform.commit();
        }
    }
}
