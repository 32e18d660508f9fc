// Hit-test bridge state machine: one source request per session, first
// result wins, failure is terminal for the session.

use glam::{Mat4, Vec3};
use showroom_core::{HitTestBridge, HitTestPhase};

#[test]
fn source_request_is_issued_at_most_once() {
    let mut bridge = HitTestBridge::new();
    assert!(bridge.begin_request());
    assert!(!bridge.begin_request());
    assert_eq!(bridge.phase(), HitTestPhase::Requested);

    bridge.source_acquired();
    assert_eq!(bridge.phase(), HitTestPhase::Ready);
    assert!(!bridge.begin_request());
}

#[test]
fn results_are_ignored_until_the_source_is_ready() {
    let mut bridge = HitTestBridge::new();
    bridge.on_frame(Some(Mat4::IDENTITY));
    assert!(!bridge.reticle.visible);

    assert!(bridge.begin_request());
    bridge.on_frame(Some(Mat4::IDENTITY));
    assert!(!bridge.reticle.visible);
}

#[test]
fn first_result_shows_the_reticle_and_no_result_hides_it() {
    let mut bridge = HitTestBridge::new();
    bridge.begin_request();
    bridge.source_acquired();

    let pose = Mat4::from_translation(Vec3::new(0.2, 0.0, -1.5));
    bridge.on_frame(Some(pose));
    assert!(bridge.reticle.visible);
    assert_eq!(bridge.reticle.pose, pose);

    bridge.on_frame(None);
    assert!(!bridge.reticle.visible);
    // pose is stale but harmless while hidden
    assert_eq!(bridge.reticle.pose, pose);
}

#[test]
fn failed_negotiation_is_terminal_for_the_session() {
    let mut bridge = HitTestBridge::new();
    bridge.begin_request();
    bridge.request_failed();
    assert_eq!(bridge.phase(), HitTestPhase::Failed);

    bridge.on_frame(Some(Mat4::IDENTITY));
    assert!(!bridge.reticle.visible);
    assert!(!bridge.begin_request());
}

#[test]
fn ending_the_session_allows_renegotiation() {
    let mut bridge = HitTestBridge::new();
    bridge.begin_request();
    bridge.source_acquired();
    bridge.on_frame(Some(Mat4::IDENTITY));
    assert!(bridge.reticle.visible);

    bridge.end_session();
    assert!(!bridge.reticle.visible);
    assert_eq!(bridge.phase(), HitTestPhase::Idle);
    assert!(bridge.begin_request());
}
