#![cfg(target_arch = "wasm32")]
//! showroom web front-end: binds the presentation controller to the DOM,
//! loads the product model, and drives the frame loop.

mod assets;
mod dom;
mod events;
mod frame;
mod render;
mod xr;

use showroom_core::{HitTestBridge, PresentationController};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

const MODEL_URL: &str = "/assets/black_chair.glb";

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("showroom-web starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

async fn init() -> anyhow::Result<()> {
    let document = dom::window_document().ok_or_else(|| anyhow::anyhow!("no document"))?;

    let canvas: web::HtmlCanvasElement = document
        .get_element_by_id("showroom-canvas")
        .ok_or_else(|| anyhow::anyhow!("missing #showroom-canvas"))?
        .dyn_into()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;
    dom::sync_canvas_backing_size(&canvas);

    // Measured once; the controller treats a single-screen page as no
    // scroll progress.
    let total_scroll_height = dom::measure_scrollable_height(&document);
    let aspect = canvas.width() as f32 / canvas.height().max(1) as f32;

    let controller = Rc::new(RefCell::new(PresentationController::new(
        total_scroll_height,
        aspect,
    )));
    let bridge = Rc::new(RefCell::new(HitTestBridge::new()));
    let placed = Rc::new(RefCell::new(Vec::new()));

    // Leak a canvas clone to satisfy the 'static surface lifetime.
    let leaked_canvas = Box::leak(Box::new(canvas.clone()));
    let gpu = render::GpuState::new(leaked_canvas).await?;

    events::wire_pointer_handlers(&controller);
    events::wire_scroll_handler(&controller);
    events::wire_resize_handler(&controller, &canvas);
    events::wire_theme_buttons(&controller, &document);
    dom::wire_outro_reveal(&document);
    xr::wire_ar_button(
        &document,
        xr::ArShared {
            controller: controller.clone(),
            bridge: bridge.clone(),
            placed: placed.clone(),
        },
    );

    let ctx = Rc::new(RefCell::new(frame::FrameContext {
        controller: controller.clone(),
        bridge,
        placed,
        canvas,
        gpu,
    }));

    // Model load resolves once; until then the frame loop below renders the
    // empty scene (the controller stays in its preloading phase).
    {
        let controller = controller.clone();
        let ctx = ctx.clone();
        spawn_local(async move {
            let loaded = match assets::fetch_bytes(MODEL_URL).await {
                Ok(bytes) => assets::decode_glb(&bytes),
                Err(e) => Err(e),
            };
            match loaded {
                Ok(loaded) => {
                    ctx.borrow_mut().gpu.upload_model(&loaded.meshes);
                    controller.borrow_mut().bind_model(loaded.object, dom::now_ms());
                }
                Err(e) => log::error!("{e}"),
            }
        });
    }

    // rAF loop driven by the browser timestamp (same clock as the event
    // handlers' now_ms()).
    let tick: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    let ctx_tick = ctx.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move |timestamp: f64| {
        ctx_tick.borrow_mut().frame(timestamp);
        if let Some(w) = web::window() {
            if let Some(cb) = tick_clone.borrow().as_ref() {
                let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
            }
        }
    }) as Box<dyn FnMut(f64)>));
    if let Some(w) = web::window() {
        if let Some(cb) = tick.borrow().as_ref() {
            let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
        }
    }
    std::mem::forget(tick);

    Ok(())
}
