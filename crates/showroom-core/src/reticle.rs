//! AR placement reticle and the hit-test bridge.
//!
//! The bridge translates asynchronous hit-test results into the reticle's
//! visibility and pose, once per frame while an AR session is presenting.
//! The request for a hit-test source is issued at most once per session;
//! [`HitTestBridge::begin_request`] is the guard.

use glam::Mat4;

/// Visual marker for a candidate real-world placement point. The pose is
/// only meaningful while `visible` is true.
#[derive(Clone, Copy, Debug)]
pub struct Reticle {
    pub visible: bool,
    pub pose: Mat4,
}

impl Default for Reticle {
    fn default() -> Self {
        Self {
            visible: false,
            pose: Mat4::IDENTITY,
        }
    }
}

/// Hit-test source negotiation state for one AR session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HitTestPhase {
    /// No request issued yet.
    Idle,
    /// Asynchronous source request in flight.
    Requested,
    /// Source available; per-frame results drive the reticle.
    Ready,
    /// Negotiation failed; the reticle never appears this session.
    Failed,
}

#[derive(Debug)]
pub struct HitTestBridge {
    phase: HitTestPhase,
    pub reticle: Reticle,
}

impl Default for HitTestBridge {
    fn default() -> Self {
        Self::new()
    }
}

impl HitTestBridge {
    pub fn new() -> Self {
        Self {
            phase: HitTestPhase::Idle,
            reticle: Reticle::default(),
        }
    }

    pub fn phase(&self) -> HitTestPhase {
        self.phase
    }

    /// Returns true exactly once per session: the caller should issue the
    /// asynchronous hit-test source request when it does.
    pub fn begin_request(&mut self) -> bool {
        if self.phase == HitTestPhase::Idle {
            self.phase = HitTestPhase::Requested;
            true
        } else {
            false
        }
    }

    pub fn source_acquired(&mut self) {
        if self.phase == HitTestPhase::Requested {
            self.phase = HitTestPhase::Ready;
        }
    }

    pub fn request_failed(&mut self) {
        self.phase = HitTestPhase::Failed;
        self.reticle.visible = false;
    }

    /// Per-frame update: first hit-test result wins; no result hides the
    /// reticle. Ignored until the source is ready.
    pub fn on_frame(&mut self, pose: Option<Mat4>) {
        if self.phase != HitTestPhase::Ready {
            self.reticle.visible = false;
            return;
        }
        match pose {
            Some(m) => {
                self.reticle.visible = true;
                self.reticle.pose = m;
            }
            None => self.reticle.visible = false,
        }
    }

    /// Session ended: a new session renegotiates from scratch.
    pub fn end_session(&mut self) {
        self.phase = HitTestPhase::Idle;
        self.reticle.visible = false;
    }
}
