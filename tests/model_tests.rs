// Shared value types: bounds, materials, theme colors, camera framing.

use glam::Vec3;
use showroom_core::{Aabb, Camera, Rgb, CAMERA_DISTANCE_FACTOR};

const EPS: f32 = 1e-5;

#[test]
fn aabb_from_points_covers_all_points() {
    let points = [
        Vec3::new(1.0, -2.0, 0.5),
        Vec3::new(-3.0, 4.0, 2.0),
        Vec3::new(0.0, 0.0, -1.0),
    ];
    let aabb = Aabb::from_points(points).unwrap();
    assert_eq!(aabb.min, Vec3::new(-3.0, -2.0, -1.0));
    assert_eq!(aabb.max, Vec3::new(1.0, 4.0, 2.0));
    assert!((aabb.max_dim() - 6.0).abs() < EPS);
}

#[test]
fn aabb_from_no_points_is_none() {
    assert!(Aabb::from_points(std::iter::empty()).is_none());
}

#[test]
fn aabb_union_and_center() {
    let a = Aabb::new(Vec3::ZERO, Vec3::ONE);
    let b = Aabb::new(Vec3::new(-1.0, 0.0, 0.0), Vec3::new(0.0, 3.0, 1.0));
    let u = a.union(&b);
    assert_eq!(u.min, Vec3::new(-1.0, 0.0, 0.0));
    assert_eq!(u.max, Vec3::new(1.0, 3.0, 1.0));
    assert_eq!(u.center(), Vec3::new(0.0, 1.5, 0.5));
}

#[test]
fn rgb_parses_six_digit_hex() {
    let c = Rgb::from_hex("#FFFFF0").unwrap();
    assert!((c.r - 1.0).abs() < EPS);
    assert!((c.g - 1.0).abs() < EPS);
    assert!((c.b - 240.0 / 255.0).abs() < EPS);

    // leading '#' is optional
    assert_eq!(Rgb::from_hex("000000").unwrap(), Rgb::new(0.0, 0.0, 0.0));
}

#[test]
fn rgb_parses_three_digit_hex() {
    // #abc expands to #aabbcc
    assert_eq!(Rgb::from_hex("#fff").unwrap(), Rgb::new(1.0, 1.0, 1.0));
    let c = Rgb::from_hex("#a0c").unwrap();
    assert!((c.r - 170.0 / 255.0).abs() < EPS);
    assert!((c.g - 0.0).abs() < EPS);
    assert!((c.b - 204.0 / 255.0).abs() < EPS);
}

#[test]
fn rgb_rejects_malformed_input() {
    assert!(Rgb::from_hex("").is_none());
    assert!(Rgb::from_hex("#12345").is_none());
    assert!(Rgb::from_hex("#gggggg").is_none());
    assert!(Rgb::from_hex("not-a-color").is_none());
    // non-ASCII input whose byte length looks valid must not panic
    assert!(Rgb::from_hex("日").is_none());
    assert!(Rgb::from_hex("#日彩").is_none());
}

#[test]
fn camera_frames_object_by_largest_extent() {
    let mut cam = Camera::new(1.5);
    cam.frame_object(6.0);
    assert!((cam.eye.z - 6.0 * CAMERA_DISTANCE_FACTOR).abs() < EPS);
    assert!((cam.eye.y - 1.0).abs() < EPS);
    assert_eq!(cam.target, Vec3::ZERO);
}

#[test]
fn camera_aspect_guards_zero_height() {
    let mut cam = Camera::new(1.0);
    cam.set_aspect(800.0, 0.0);
    assert!(cam.aspect.is_finite());
}

#[test]
fn camera_matrices_are_consistent() {
    let mut cam = Camera::new(16.0 / 9.0);
    cam.frame_object(2.0);
    let vp = cam.view_proj();
    // the look-at target projects to the center of the view
    let clip = vp * cam.target.extend(1.0);
    let ndc = clip.truncate() / clip.w;
    assert!(ndc.x.abs() < 1e-4);
    assert!(ndc.y.abs() < 1e-4);
}
