//! WebXR placement: `immersive-ar` session negotiation with the hit-test
//! capability, per-frame hit-test results feeding the reticle bridge, and
//! the `select` action that freezes a placed copy of the model.
//!
//! Requires building with `--cfg=web_sys_unstable_apis` (the WebXR bindings
//! in web-sys are unstable-gated).

use showroom_core::{HitTestBridge, Phase, PlacedInstance, PresentationController, ViewerError};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys as web;

#[derive(Clone)]
pub struct ArShared {
    pub controller: Rc<RefCell<PresentationController>>,
    pub bridge: Rc<RefCell<HitTestBridge>>,
    pub placed: Rc<RefCell<Vec<PlacedInstance>>>,
}

/// Wire the AR entry button. Hidden when the platform has no XR system or
/// no `immersive-ar` support.
pub fn wire_ar_button(document: &web::Document, shared: ArShared) {
    let Some(button) = document.get_element_by_id("ar-button") else {
        log::warn!("no #ar-button element; AR entry disabled");
        return;
    };

    let navigator = match web::window() {
        Some(w) => w.navigator(),
        None => return,
    };
    if !js_sys::Reflect::has(&navigator, &JsValue::from_str("xr")).unwrap_or(false) {
        let _ = button.set_attribute("style", "display:none");
        log::info!("WebXR not available; hiding AR button");
        return;
    }

    // Probe immersive-ar support and hide the button when absent.
    {
        let button = button.clone();
        let xr = navigator.xr();
        spawn_local(async move {
            let supported = JsFuture::from(
                xr.is_session_supported(web::XrSessionMode::ImmersiveAr),
            )
            .await
            .ok()
            .and_then(|v| v.as_bool())
            .unwrap_or(false);
            if !supported {
                let _ = button.set_attribute("style", "display:none");
                log::info!("immersive-ar not supported; hiding AR button");
            }
        });
    }

    let closure = Closure::wrap(Box::new(move || {
        let shared = shared.clone();
        spawn_local(async move {
            if let Err(e) = start_session(shared).await {
                log::error!("{e}");
            }
        });
    }) as Box<dyn FnMut()>);
    let _ = button.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
    closure.forget();
}

async fn start_session(shared: ArShared) -> Result<(), ViewerError> {
    let window = web::window().ok_or_else(|| ViewerError::SessionNegotiation("no window".into()))?;
    let xr = window.navigator().xr();

    let init = web::XrSessionInit::new();
    let features = js_sys::Array::of1(&JsValue::from_str("hit-test"));
    init.set_required_features(&features);

    let session: web::XrSession = JsFuture::from(
        xr.request_session_with_options(web::XrSessionMode::ImmersiveAr, &init),
    )
    .await
    .map_err(|e| ViewerError::SessionNegotiation(format!("request_session: {e:?}")))?
    .dyn_into()
    .map_err(|_| ViewerError::SessionNegotiation("request_session returned a non-session".into()))?;

    let viewer_space: web::XrReferenceSpace = JsFuture::from(
        session.request_reference_space(web::XrReferenceSpaceType::Viewer),
    )
    .await
    .map_err(|e| ViewerError::SessionNegotiation(format!("viewer space: {e:?}")))?
    .dyn_into()
    .map_err(|_| ViewerError::SessionNegotiation("invalid viewer reference space".into()))?;

    let local_space: web::XrReferenceSpace = JsFuture::from(
        session.request_reference_space(web::XrReferenceSpaceType::Local),
    )
    .await
    .map_err(|e| ViewerError::SessionNegotiation(format!("local space: {e:?}")))?
    .dyn_into()
    .map_err(|_| ViewerError::SessionNegotiation("invalid local reference space".into()))?;

    log::info!("immersive-ar session started");
    shared.bridge.borrow_mut().end_session(); // fresh negotiation state

    wire_select(&session, &shared);
    wire_end(&session, &shared);
    run_frame_loop(session, viewer_space, local_space, shared);
    Ok(())
}

/// `select` places a frozen copy of the model at the current reticle pose.
/// Placement only succeeds while the reticle is visible.
fn wire_select(session: &web::XrSession, shared: &ArShared) {
    let controller = shared.controller.clone();
    let bridge = shared.bridge.clone();
    let placed = shared.placed.clone();
    let closure = Closure::wrap(Box::new(move |_ev: web::XrInputSourceEvent| {
        let instance = controller.borrow().place_at(&bridge.borrow().reticle);
        if let Some(instance) = instance {
            log::info!("placed instance at {:?}", instance.position);
            placed.borrow_mut().push(instance);
        }
    }) as Box<dyn FnMut(_)>);
    let _ = session.add_event_listener_with_callback("select", closure.as_ref().unchecked_ref());
    closure.forget();
}

fn wire_end(session: &web::XrSession, shared: &ArShared) {
    let bridge = shared.bridge.clone();
    let closure = Closure::wrap(Box::new(move || {
        bridge.borrow_mut().end_session();
        log::info!("immersive-ar session ended");
    }) as Box<dyn FnMut()>);
    let _ = session.add_event_listener_with_callback("end", closure.as_ref().unchecked_ref());
    closure.forget();
}

/// Per-frame XR work: issue the hit-test source request exactly once (the
/// bridge guards it), then forward the first hit-test pose of each frame.
fn run_frame_loop(
    session: web::XrSession,
    viewer_space: web::XrReferenceSpace,
    local_space: web::XrReferenceSpace,
    shared: ArShared,
) {
    let hit_source: Rc<RefCell<Option<web::XrHitTestSource>>> = Rc::new(RefCell::new(None));

    let tick: Rc<RefCell<Option<Closure<dyn FnMut(f64, web::XrFrame)>>>> =
        Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    let session_for_tick = session.clone();

    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move |_time: f64, frame: web::XrFrame| {
        let model_ready = shared.controller.borrow().phase() == Phase::Ready;
        if model_ready {
            if shared.bridge.borrow_mut().begin_request() {
                request_hit_test_source(
                    &session_for_tick,
                    &viewer_space,
                    shared.bridge.clone(),
                    hit_source.clone(),
                );
            }
            if let Some(source) = hit_source.borrow().as_ref() {
                let results = frame.get_hit_test_results(source);
                let pose = results
                    .get(0)
                    .dyn_into::<web::XrHitTestResult>()
                    .ok()
                    .and_then(|hit| hit.get_pose(&local_space))
                    .and_then(|pose| {
                        let m = pose.transform().matrix();
                        (m.len() == 16).then(|| glam::Mat4::from_cols_slice(&m))
                    });
                shared.bridge.borrow_mut().on_frame(pose);
            }
        }

        if let Some(cb) = tick_clone.borrow().as_ref() {
            let _ = session_for_tick.request_animation_frame(cb.as_ref().unchecked_ref());
        }
    }) as Box<dyn FnMut(f64, web::XrFrame)>));

    if let Some(cb) = tick.borrow().as_ref() {
        let _ = session.request_animation_frame(cb.as_ref().unchecked_ref());
    }
    // The closure keeps itself alive through tick_clone for the session's
    // lifetime.
    std::mem::forget(tick);
}

fn request_hit_test_source(
    session: &web::XrSession,
    viewer_space: &web::XrReferenceSpace,
    bridge: Rc<RefCell<HitTestBridge>>,
    hit_source: Rc<RefCell<Option<web::XrHitTestSource>>>,
) {
    let options = web::XrHitTestOptionsInit::new(viewer_space);
    let promise = session.request_hit_test_source(&options);
    spawn_local(async move {
        match JsFuture::from(promise).await {
            Ok(source) => match source.dyn_into::<web::XrHitTestSource>() {
                Ok(source) => {
                    *hit_source.borrow_mut() = Some(source);
                    bridge.borrow_mut().source_acquired();
                    log::info!("hit-test source acquired");
                }
                Err(_) => {
                    bridge.borrow_mut().request_failed();
                    log::error!(
                        "{}",
                        ViewerError::SessionNegotiation("invalid hit-test source".into())
                    );
                }
            },
            Err(e) => {
                bridge.borrow_mut().request_failed();
                log::error!(
                    "{}",
                    ViewerError::SessionNegotiation(format!("hit-test source: {e:?}"))
                );
            }
        }
    });
}
