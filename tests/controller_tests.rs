// Host-side tests for the presentation controller. The front-end crate is
// wasm-only; the pure logic lives in showroom-core and runs anywhere.

use glam::{Mat4, Vec3};
use showroom_core::{
    Aabb, HitTestBridge, Material, MeshInfo, Node, ObjectModel, Phase, PresentationController,
    Reticle, Rgb, AUTOROTATE_RESUME_DELAY_MS, AUTOROTATE_STEP, INITIAL_YAW,
    SCROLL_PITCH_OFFSET, SCROLL_ROTATION_RANGE,
};

const EPS: f32 = 1e-5;

fn chair_model() -> ObjectModel {
    // Bounding box of size (2, 4, 6) centered away from the origin.
    let aabb = Aabb::new(Vec3::new(1.0, 2.0, 3.0), Vec3::new(3.0, 6.0, 9.0));
    let nodes = vec![
        Node {
            name: "root-group".into(),
            mesh: None,
        },
        Node {
            name: "seat".into(),
            mesh: Some(MeshInfo {
                gpu_index: 0,
                material: Material::default(),
            }),
        },
        Node {
            name: "legs".into(),
            mesh: Some(MeshInfo {
                gpu_index: 1,
                material: Material::default(),
            }),
        },
    ];
    ObjectModel::new(nodes, aabb)
}

fn ready_controller(total_scroll: f32) -> PresentationController {
    let mut c = PresentationController::new(total_scroll, 16.0 / 9.0);
    c.bind_model(chair_model(), 0.0);
    c
}

#[test]
fn controller_is_inert_until_model_binds() {
    let mut c = PresentationController::new(1000.0, 1.0);
    assert_eq!(c.phase(), Phase::Preloading);
    assert!(c.tick(16.0).is_none());

    // pointer input before the bind is ignored
    c.on_pointer_down(10.0, 10.0);
    assert!(!c.is_dragging());

    c.bind_model(chair_model(), 0.0);
    assert_eq!(c.phase(), Phase::Ready);
    assert!(c.tick(16.0).is_some());
}

#[test]
fn bind_recenters_and_frames_camera() {
    let c = ready_controller(1000.0);
    // box center (2, 4, 6) moves to the origin
    assert!((c.recenter_offset() - Vec3::new(-2.0, -4.0, -6.0)).length() < EPS);
    // largest extent 6 -> camera at (0, 1, 6 * 1.75)
    assert!((c.camera.eye - Vec3::new(0.0, 1.0, 10.5)).length() < EPS);
}

#[test]
fn bind_applies_showroom_material_to_meshes_only() {
    let c = ready_controller(1000.0);
    let model = c.model().unwrap();
    for mesh in model.meshes() {
        assert!((mesh.material.color[2] - 240.0 / 255.0).abs() < EPS);
        assert!((mesh.material.metalness - 0.4).abs() < EPS);
        assert!((mesh.material.roughness - 1.0).abs() < EPS);
    }
    assert_eq!(model.mesh_count(), 2);
    assert!(model.nodes[0].mesh.is_none());
}

#[test]
fn second_bind_is_rejected() {
    let mut c = ready_controller(1000.0);
    let mut other = chair_model();
    other.aabb = Aabb::new(Vec3::ZERO, Vec3::ONE);
    c.bind_model(other, 5000.0);
    // camera still framed for the first model
    assert!((c.camera.eye.z - 10.5).abs() < EPS);
}

#[test]
fn vertical_float_is_a_pure_function_of_time() {
    let mut c = ready_controller(1000.0);
    let t = 5000.0_f64;
    let expected = (0.0015 * t).sin() as f32 * 0.2;

    let tr = c.tick(t).unwrap();
    assert!((tr.position.y - expected).abs() < EPS);

    // unaffected by drag state and scroll state
    c.on_scroll(400.0, t);
    c.on_pointer_down(0.0, 0.0);
    c.on_pointer_move(50.0, 30.0);
    let tr = c.tick(t).unwrap();
    assert!((tr.position.y - expected).abs() < EPS);
}

#[test]
fn drag_accumulation_is_granularity_independent() {
    let mut coarse = ready_controller(1000.0);
    coarse.on_pointer_down(100.0, 100.0);
    coarse.on_pointer_move(180.0, 40.0);
    let coarse_tr = coarse.tick(2000.0).unwrap();

    let mut fine = ready_controller(1000.0);
    fine.on_pointer_down(100.0, 100.0);
    // eight small moves covering the same net screen delta
    for i in 1..=8 {
        fine.on_pointer_move(100.0 + 10.0 * i as f32, 100.0 - 7.5 * i as f32);
    }
    let fine_tr = fine.tick(2000.0).unwrap();

    assert!((coarse_tr.rotation.x - fine_tr.rotation.x).abs() < EPS);
    assert!((coarse_tr.rotation.y - fine_tr.rotation.y).abs() < EPS);

    // net delta (80, -60) px at 0.005 rad/px
    assert!((coarse_tr.rotation.y - 80.0 * 0.005).abs() < EPS);
    assert!((coarse_tr.rotation.x - (-60.0 * 0.005)).abs() < EPS);
}

#[test]
fn drag_overrides_scroll_rotation_for_the_frame() {
    let mut c = ready_controller(1000.0);
    c.on_scroll(500.0, 0.0);

    c.on_pointer_down(0.0, 0.0);
    c.on_pointer_move(10.0, 20.0);
    let dragged = c.tick(100.0).unwrap();
    assert!((dragged.rotation.x - 20.0 * 0.005).abs() < EPS);
    assert!((dragged.rotation.y - 10.0 * 0.005).abs() < EPS);

    // release: scroll-driven pitch takes over again
    c.on_pointer_up();
    let released = c.tick(116.0).unwrap();
    let expected_pitch = 0.5 * SCROLL_ROTATION_RANGE + SCROLL_PITCH_OFFSET;
    assert!((released.rotation.x - expected_pitch).abs() < EPS);
}

#[test]
fn scroll_delta_threshold_is_strict() {
    let mut c = ready_controller(1000.0);
    assert!(c.autorotate());

    // exactly the threshold: no suppression
    c.on_scroll(5.0, 0.0);
    assert!(c.autorotate());

    // a hair over (from last = 5.0): suppressed
    c.on_scroll(10.0001, 0.0);
    assert!(!c.autorotate());
}

#[test]
fn autorotate_resumes_after_quiet_period() {
    let mut c = ready_controller(1000.0);
    c.on_scroll(100.0, 1000.0);
    assert!(!c.autorotate());

    c.tick(1000.0 + AUTOROTATE_RESUME_DELAY_MS - 1.0);
    assert!(!c.autorotate());

    c.tick(1000.0 + AUTOROTATE_RESUME_DELAY_MS);
    assert!(c.autorotate());
}

#[test]
fn qualifying_scroll_rearms_the_resume_deadline() {
    let mut c = ready_controller(1000.0);
    c.on_scroll(100.0, 0.0);
    // second qualifying event late in the window pushes the deadline out
    c.on_scroll(200.0, 1500.0);

    c.tick(2500.0);
    assert!(!c.autorotate());
    c.tick(3500.0);
    assert!(c.autorotate());
}

#[test]
fn autorotate_yaw_accumulates_monotonically() {
    let mut c = ready_controller(1000.0);
    let mut last_yaw = INITIAL_YAW;
    for i in 1..=5 {
        let tr = c.tick(2000.0 + 16.0 * i as f64).unwrap();
        assert!((tr.rotation.y - (last_yaw + AUTOROTATE_STEP)).abs() < EPS);
        last_yaw = tr.rotation.y;
    }
}

#[test]
fn scroll_progress_clamps_at_one() {
    let mut c = ready_controller(1000.0);
    c.on_scroll(2500.0, 0.0);
    let tr = c.tick(3000.0).unwrap();
    let expected = SCROLL_ROTATION_RANGE + SCROLL_PITCH_OFFSET;
    assert!((tr.rotation.x - expected).abs() < 1e-4);
}

#[test]
fn degenerate_scroll_range_yields_no_progress() {
    // single-screen page: no scrollable height
    let mut c = ready_controller(0.0);
    c.on_scroll(300.0, 0.0);
    let tr = c.tick(3000.0).unwrap();
    assert!(tr.rotation.x.is_finite());
    assert!((tr.rotation.x - SCROLL_PITCH_OFFSET).abs() < EPS);
}

#[test]
fn entrance_scale_tweens_from_zero_to_unit() {
    let mut c = PresentationController::new(1000.0, 1.0);
    c.bind_model(chair_model(), 1000.0);

    let tr = c.tick(1000.0).unwrap();
    assert!(tr.scale.x.abs() < EPS);

    let tr = c.tick(1500.0).unwrap();
    assert!(tr.scale.x > 0.0 && tr.scale.x < 1.0);

    let tr = c.tick(2000.0).unwrap();
    assert!((tr.scale.x - 1.0).abs() < EPS);

    // stays at unit afterwards
    let tr = c.tick(60_000.0).unwrap();
    assert!((tr.scale.x - 1.0).abs() < EPS);
}

#[test]
fn theme_change_recolors_every_mesh_subpart() {
    let mut c = ready_controller(1000.0);
    let color = Rgb::from_hex("#1a2b3c").unwrap();
    c.set_mesh_color(color);

    let model = c.model().unwrap();
    for mesh in model.meshes() {
        assert_eq!(mesh.material.color, color.to_array());
        // other material params untouched
        assert!((mesh.material.metalness - 0.4).abs() < EPS);
    }
}

#[test]
fn placement_requires_visible_reticle_and_bound_model() {
    let pose = Mat4::from_translation(Vec3::new(1.0, 0.0, -2.0));

    let preloading = PresentationController::new(1000.0, 1.0);
    let visible = Reticle {
        visible: true,
        pose,
    };
    assert!(preloading.place_at(&visible).is_none());

    let ready = ready_controller(1000.0);
    let hidden = Reticle {
        visible: false,
        pose,
    };
    assert!(ready.place_at(&hidden).is_none());

    let placed = ready.place_at(&visible).expect("visible reticle places");
    assert!((placed.position - Vec3::new(1.0, 0.0, -2.0)).length() < EPS);
    assert!((placed.scale - Vec3::ONE).length() < EPS);
}

#[test]
fn placed_instance_carries_reticle_orientation() {
    let ready = ready_controller(1000.0);
    let rotation = glam::Quat::from_rotation_y(std::f32::consts::FRAC_PI_3);
    let pose = Mat4::from_rotation_translation(rotation, Vec3::new(0.5, 0.0, -1.0));
    let reticle = Reticle {
        visible: true,
        pose,
    };
    let placed = ready.place_at(&reticle).unwrap();
    assert!(placed.orientation.dot(rotation).abs() > 1.0 - 1e-4);
}

#[test]
fn placement_decision_does_not_consume_the_reticle() {
    // two selects while the reticle stays visible produce two instances
    let ready = ready_controller(1000.0);
    let reticle = Reticle {
        visible: true,
        pose: Mat4::from_translation(Vec3::new(0.0, 0.0, -1.0)),
    };
    let a = ready.place_at(&reticle);
    let b = ready.place_at(&reticle);
    assert!(a.is_some() && b.is_some());
    assert_eq!(a, b);
}

#[test]
fn placement_via_bridge_reticle() {
    let ready = ready_controller(1000.0);
    let mut bridge = HitTestBridge::new();
    assert!(bridge.begin_request());
    bridge.source_acquired();

    // no hit result yet: no placement
    bridge.on_frame(None);
    assert!(ready.place_at(&bridge.reticle).is_none());

    bridge.on_frame(Some(Mat4::from_translation(Vec3::new(0.0, 0.0, -3.0))));
    assert!(ready.place_at(&bridge.reticle).is_some());
}
