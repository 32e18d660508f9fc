//! Per-frame composition: tick the controller, gather draw items for the
//! model, AR-placed copies and the reticle, then render.

use glam::Mat4;
use showroom_core::{HitTestBridge, PlacedInstance, PresentationController};
use std::cell::RefCell;
use std::rc::Rc;
use web_sys as web;

use crate::render::{DrawItem, GpuState, MeshRef};

pub struct FrameContext {
    pub controller: Rc<RefCell<PresentationController>>,
    pub bridge: Rc<RefCell<HitTestBridge>>,
    pub placed: Rc<RefCell<Vec<PlacedInstance>>>,
    pub canvas: web::HtmlCanvasElement,
    pub gpu: GpuState<'static>,
}

impl FrameContext {
    pub fn frame(&mut self, now_ms: f64) {
        // keep the surface sized to the canvas backing store
        self.gpu
            .resize_if_needed(self.canvas.width(), self.canvas.height());

        let mut items: Vec<DrawItem> = Vec::new();
        let mut ctrl = self.controller.borrow_mut();

        // None while the model is still preloading: the loop renders the
        // empty scene until the load resolves.
        if ctrl.tick(now_ms).is_some() {
            let model_matrix = ctrl.model_matrix();
            let recenter = Mat4::from_translation(ctrl.recenter_offset());
            if let Some(model) = ctrl.model() {
                for mesh in model.meshes() {
                    items.push(DrawItem {
                        mesh: MeshRef::Model(mesh.gpu_index),
                        matrix: model_matrix,
                        color: mesh.material.color,
                        metalness: mesh.material.metalness,
                        roughness: mesh.material.roughness,
                        unlit: false,
                    });
                }
                // frozen copies keep the material they were placed with
                for instance in self.placed.borrow().iter() {
                    let matrix = Mat4::from_scale_rotation_translation(
                        instance.scale,
                        instance.orientation,
                        instance.position,
                    ) * recenter;
                    for mesh in model.meshes() {
                        items.push(DrawItem {
                            mesh: MeshRef::Model(mesh.gpu_index),
                            matrix,
                            color: mesh.material.color,
                            metalness: mesh.material.metalness,
                            roughness: mesh.material.roughness,
                            unlit: false,
                        });
                    }
                }
            }
        }

        {
            let bridge = self.bridge.borrow();
            if bridge.reticle.visible {
                items.push(DrawItem {
                    mesh: MeshRef::Reticle,
                    matrix: bridge.reticle.pose,
                    color: [1.0, 1.0, 1.0],
                    metalness: 0.0,
                    roughness: 1.0,
                    unlit: true,
                });
            }
        }

        let view_proj = ctrl.camera.view_proj();
        drop(ctrl);

        if let Err(e) = self.gpu.render(view_proj, &items) {
            log::error!("render error: {:?}", e);
        }
    }
}
