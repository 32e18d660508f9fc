use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

/// Milliseconds on the same clock as `requestAnimationFrame` timestamps.
#[inline]
pub fn now_ms() -> f64 {
    web::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

pub fn sync_canvas_backing_size(canvas: &web::HtmlCanvasElement) {
    if let Some(w) = web::window() {
        let dpr = w.device_pixel_ratio();
        let rect = canvas.get_bounding_client_rect();
        let w_px = (rect.width() * dpr) as u32;
        let h_px = (rect.height() * dpr) as u32;
        canvas.set_width(w_px.max(1));
        canvas.set_height(h_px.max(1));
    }
}

/// Total scrollable height of the page, measured once at startup.
pub fn measure_scrollable_height(document: &web::Document) -> f32 {
    let doc_height = document
        .document_element()
        .map(|el| el.scroll_height() as f64)
        .unwrap_or(0.0);
    let viewport = web::window()
        .and_then(|w| w.inner_height().ok())
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0);
    (doc_height - viewport).max(0.0) as f32
}

pub fn current_scroll_offset() -> f32 {
    web::window()
        .and_then(|w| w.scroll_y().ok())
        .unwrap_or(0.0) as f32
}

/// Apply a theme to the page chrome: body background plus copy text color.
pub fn set_page_colors(document: &web::Document, background: &str, foreground: &str) {
    if let Some(body) = document.body() {
        let style = body.style();
        let _ = style.set_property("background-color", background);
        let _ = style.set_property("color", foreground);
    }
    if let Ok(copy) = document.query_selector_all("h1, h2, p, a") {
        for i in 0..copy.length() {
            if let Some(el) = copy.get(i).and_then(|n| n.dyn_into::<web::HtmlElement>().ok()) {
                let _ = el.style().set_property("color", foreground);
            }
        }
    }
}

/// Reveal the outro copy once the outro section scrolls past the viewport
/// midline, and hide it again when scrolling back up. The slide-in itself is
/// CSS transitioning on the `revealed` class.
pub fn wire_outro_reveal(document: &web::Document) {
    let Ok(Some(outro)) = document.query_selector(".outro") else {
        return;
    };
    let doc = document.clone();
    let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move || {
        let rect = outro.get_bounding_client_rect();
        let midline = web::window()
            .and_then(|w| w.inner_height().ok())
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0)
            * 0.5;
        if let Ok(Some(copy)) = doc.query_selector(".outro-copy") {
            if rect.top() < midline {
                let _ = copy.class_list().add_1("revealed");
            } else {
                let _ = copy.class_list().remove_1("revealed");
            }
        }
    }) as Box<dyn FnMut()>);
    if let Some(w) = web::window() {
        let _ = w.add_event_listener_with_callback("scroll", closure.as_ref().unchecked_ref());
    }
    closure.forget();
}
