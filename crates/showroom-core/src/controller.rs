//! The presentation controller: single owner of the displayed object's
//! transform and of AR placement decisions.
//!
//! Three input sources (autorotation, the scroll position and pointer
//! dragging) compete for the rotation, and [`PresentationController::tick`]
//! arbitrates them into one authoritative transform per frame. Dragging wins
//! outright for the frames it is active; otherwise scroll drives the pitch
//! and autorotation (when not suppressed by recent scrolling) accumulates
//! yaw. The vertical float is a pure function of time and applies always.

use glam::{Mat4, Quat, Vec2, Vec3};

use crate::camera::Camera;
use crate::constants::*;
use crate::model::ObjectModel;
use crate::reticle::Reticle;
use crate::theme::Rgb;

/// Position, Euler rotation (radians) and scale of the displayed object.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_translation(self.position)
            * Mat4::from_euler(
                glam::EulerRot::XYZ,
                self.rotation.x,
                self.rotation.y,
                self.rotation.z,
            )
            * Mat4::from_scale(self.scale)
    }
}

/// Pointer drag state. `anchor` is only meaningful while `dragging`.
#[derive(Clone, Copy, Debug, Default)]
struct InputState {
    dragging: bool,
    anchor: Vec2,
    /// Accumulated drag rotation: x = pitch, y = yaw.
    spin: Vec2,
}

/// Scroll tracking. `total` is the page's scrollable height, measured once
/// at startup.
#[derive(Clone, Copy, Debug, Default)]
struct ScrollState {
    current: f32,
    last: f32,
    total: f32,
}

/// Startup lifecycle: the controller is inert until a model binds, and the
/// transition is one-way.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Preloading,
    Ready,
}

/// A frozen copy of the displayed object anchored into the AR scene. Never
/// mutated again by the controller.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacedInstance {
    pub position: Vec3,
    pub orientation: Quat,
    pub scale: Vec3,
}

pub struct PresentationController {
    phase: Phase,
    model: Option<ObjectModel>,
    /// Translation that moves the model's bounding-box center to the origin,
    /// baked into the model matrix below the animated transform.
    recenter: Vec3,
    transform: Transform,
    input: InputState,
    scroll: ScrollState,
    autorotate: bool,
    /// Single resettable deadline for resuming autorotation after scrolling.
    resume_at: Option<f64>,
    entrance_started_at: Option<f64>,
    pub camera: Camera,
}

impl PresentationController {
    pub fn new(total_scroll_height: f32, aspect: f32) -> Self {
        Self {
            phase: Phase::Preloading,
            model: None,
            recenter: Vec3::ZERO,
            transform: Transform::default(),
            input: InputState::default(),
            scroll: ScrollState {
                total: total_scroll_height,
                ..ScrollState::default()
            },
            autorotate: true,
            resume_at: None,
            entrance_started_at: None,
            camera: Camera::new(aspect),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_dragging(&self) -> bool {
        self.input.dragging
    }

    pub fn autorotate(&self) -> bool {
        self.autorotate
    }

    pub fn model(&self) -> Option<&ObjectModel> {
        self.model.as_ref()
    }

    pub fn recenter_offset(&self) -> Vec3 {
        self.recenter
    }

    /// Bind the freshly loaded model: recenter it, apply the showroom
    /// material to every mesh sub-part, frame the camera and start the
    /// entrance tween. One-way `Preloading -> Ready` transition; a second
    /// bind is rejected.
    pub fn bind_model(&mut self, mut model: ObjectModel, now_ms: f64) {
        if self.phase == Phase::Ready {
            log::warn!("bind_model called twice; ignoring");
            return;
        }
        model.for_each_mesh_mut(|mesh| {
            mesh.material.color = DEFAULT_MESH_COLOR;
            mesh.material.metalness = DEFAULT_METALNESS;
            mesh.material.roughness = DEFAULT_ROUGHNESS;
        });
        self.recenter = -model.aabb.center();
        self.camera.frame_object(model.aabb.max_dim());
        self.transform.rotation = Vec3::new(0.0, INITIAL_YAW, 0.0);
        self.transform.scale = Vec3::ZERO;
        self.entrance_started_at = Some(now_ms);
        self.model = Some(model);
        self.phase = Phase::Ready;
        log::info!("model bound; camera at {:?}", self.camera.eye);
    }

    /// Scroll callback. A delta strictly greater than the threshold pauses
    /// autorotation and (re)arms the resume deadline; smaller movements
    /// leave it untouched. The last offset updates unconditionally.
    pub fn on_scroll(&mut self, offset: f32, now_ms: f64) {
        self.scroll.current = offset;
        if (offset - self.scroll.last).abs() > SCROLL_SUPPRESS_THRESHOLD {
            self.autorotate = false;
            self.resume_at = Some(now_ms + AUTOROTATE_RESUME_DELAY_MS);
        }
        self.scroll.last = offset;
    }

    pub fn on_pointer_down(&mut self, x: f32, y: f32) {
        if self.phase != Phase::Ready {
            return;
        }
        self.input.dragging = true;
        self.input.anchor = Vec2::new(x, y);
    }

    /// Incremental drag: each move rotates by the delta from the previous
    /// anchor, so coalesced events accumulate the same net rotation as a
    /// fine-grained stream.
    pub fn on_pointer_move(&mut self, x: f32, y: f32) {
        if !self.input.dragging || self.phase != Phase::Ready {
            return;
        }
        let delta = (Vec2::new(x, y) - self.input.anchor) * DRAG_ROTATE_SENSITIVITY;
        self.input.spin.y += delta.x;
        self.input.spin.x += delta.y;
        self.input.anchor = Vec2::new(x, y);
    }

    pub fn on_pointer_up(&mut self) {
        self.input.dragging = false;
    }

    /// Produce the authoritative transform for this frame. `None` while the
    /// model is still preloading.
    pub fn tick(&mut self, now_ms: f64) -> Option<Transform> {
        if self.phase != Phase::Ready {
            return None;
        }

        // Vertical float is independent of every other input.
        self.transform.position.y =
            ((now_ms * 0.001 * FLOAT_SPEED as f64).sin() * FLOAT_AMPLITUDE as f64) as f32;

        if let Some(deadline) = self.resume_at {
            if now_ms >= deadline {
                self.autorotate = true;
                self.resume_at = None;
            }
        }

        if self.input.dragging {
            // Drag is authoritative for the frame.
            self.transform.rotation.x = self.input.spin.x;
            self.transform.rotation.y = self.input.spin.y;
        } else {
            self.transform.rotation.x =
                self.scroll_progress() * SCROLL_ROTATION_RANGE + SCROLL_PITCH_OFFSET;
            if self.autorotate {
                self.transform.rotation.y += AUTOROTATE_STEP;
            }
        }

        self.transform.scale = Vec3::splat(self.entrance_scale(now_ms));
        Some(self.transform)
    }

    /// Normalized scroll progress in [0, 1]. A degenerate scroll range
    /// (single-screen page) counts as no progress rather than dividing by
    /// zero.
    fn scroll_progress(&self) -> f32 {
        if self.scroll.total <= 0.0 {
            return 0.0;
        }
        (self.scroll.current / self.scroll.total).min(1.0)
    }

    /// Eased zero-to-unit scale over the first second after binding.
    fn entrance_scale(&mut self, now_ms: f64) -> f32 {
        match self.entrance_started_at {
            Some(t0) => {
                let p = ((now_ms - t0) / ENTRANCE_DURATION_MS).clamp(0.0, 1.0) as f32;
                if p >= 1.0 {
                    self.entrance_started_at = None;
                    return 1.0;
                }
                // ease-out cubic
                1.0 - (1.0 - p).powi(3)
            }
            None => 1.0,
        }
    }

    /// Forward a theme color to every mesh sub-part. Non-mesh nodes are
    /// untouched; no-op while preloading.
    pub fn set_mesh_color(&mut self, color: Rgb) {
        if self.phase != Phase::Ready {
            return;
        }
        if let Some(model) = self.model.as_mut() {
            model.for_each_mesh_mut(|mesh| mesh.material.color = color.to_array());
        }
    }

    /// Decide an AR placement for the current reticle pose. Only succeeds
    /// while a model is bound and the reticle is visible; the returned
    /// instance is owned by the scene from here on.
    pub fn place_at(&self, reticle: &Reticle) -> Option<PlacedInstance> {
        if self.phase != Phase::Ready || !reticle.visible {
            return None;
        }
        let (_, orientation, position) = reticle.pose.to_scale_rotation_translation();
        Some(PlacedInstance {
            position,
            orientation,
            scale: Vec3::ONE,
        })
    }

    /// Full model matrix for rendering: animated transform above the
    /// recentering translation.
    pub fn model_matrix(&self) -> Mat4 {
        self.transform.matrix() * Mat4::from_translation(self.recenter)
    }
}
