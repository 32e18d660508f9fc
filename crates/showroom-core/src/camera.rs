//! Camera description shared with the web frontend.

use glam::{Mat4, Vec3};

use crate::constants::{
    CAMERA_DISTANCE_FACTOR, CAMERA_FOVY_RADIANS, CAMERA_HEIGHT, CAMERA_ZFAR, CAMERA_ZNEAR,
};

/// Simple right-handed camera with perspective projection.
#[derive(Clone, Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    pub fn new(aspect: f32) -> Self {
        Self {
            eye: Vec3::new(0.0, CAMERA_HEIGHT, 5.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            aspect,
            fovy_radians: CAMERA_FOVY_RADIANS,
            znear: CAMERA_ZNEAR,
            zfar: CAMERA_ZFAR,
        }
    }

    /// Place the eye to frame an object whose largest extent is `max_dim`:
    /// along +Z at a distance proportional to the extent, slightly above the
    /// origin, looking at the origin.
    pub fn frame_object(&mut self, max_dim: f32) {
        self.eye = Vec3::new(0.0, CAMERA_HEIGHT, max_dim * CAMERA_DISTANCE_FACTOR);
        self.target = Vec3::ZERO;
    }

    pub fn set_aspect(&mut self, width: f32, height: f32) {
        self.aspect = width / height.max(1.0);
    }

    /// Compute the clip-space projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }

    /// Compute the view matrix that transforms world to view space.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}
