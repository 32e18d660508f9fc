//! DOM event wiring: pointer drag, scroll tracking, resize and the theme
//! switcher. Every handler borrows the shared controller through an
//! `Rc<RefCell<..>>` clone.

use showroom_core::{PresentationController, Rgb};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

use crate::dom;

type SharedController = Rc<RefCell<PresentationController>>;

pub fn wire_pointer_handlers(controller: &SharedController) {
    let Some(window) = web::window() else {
        return;
    };

    // pointerdown: primary button starts a drag anywhere on the page
    {
        let ctrl = controller.clone();
        let closure = Closure::wrap(Box::new(move |ev: web::PointerEvent| {
            if ev.button() != 0 {
                return;
            }
            ctrl.borrow_mut()
                .on_pointer_down(ev.client_x() as f32, ev.client_y() as f32);
        }) as Box<dyn FnMut(_)>);
        let _ =
            window.add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    // pointermove
    {
        let ctrl = controller.clone();
        let closure = Closure::wrap(Box::new(move |ev: web::PointerEvent| {
            ctrl.borrow_mut()
                .on_pointer_move(ev.client_x() as f32, ev.client_y() as f32);
        }) as Box<dyn FnMut(_)>);
        let _ =
            window.add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    // pointerup
    {
        let ctrl = controller.clone();
        let closure = Closure::wrap(Box::new(move |_ev: web::PointerEvent| {
            ctrl.borrow_mut().on_pointer_up();
        }) as Box<dyn FnMut(_)>);
        let _ =
            window.add_event_listener_with_callback("pointerup", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

pub fn wire_scroll_handler(controller: &SharedController) {
    let Some(window) = web::window() else {
        return;
    };
    let ctrl = controller.clone();
    let closure = Closure::wrap(Box::new(move || {
        let offset = dom::current_scroll_offset();
        ctrl.borrow_mut().on_scroll(offset, dom::now_ms());
    }) as Box<dyn FnMut()>);
    let _ = window.add_event_listener_with_callback("scroll", closure.as_ref().unchecked_ref());
    closure.forget();
}

/// Resize updates the canvas backing store and the camera aspect; the
/// surface itself follows via `resize_if_needed` on the next frame.
pub fn wire_resize_handler(controller: &SharedController, canvas: &web::HtmlCanvasElement) {
    let Some(window) = web::window() else {
        return;
    };
    let ctrl = controller.clone();
    let canvas = canvas.clone();
    let closure = Closure::wrap(Box::new(move || {
        dom::sync_canvas_backing_size(&canvas);
        ctrl.borrow_mut()
            .camera
            .set_aspect(canvas.width() as f32, canvas.height() as f32);
    }) as Box<dyn FnMut()>);
    let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
    closure.forget();
}

/// Theme buttons carry `data-bg` / `data-color` hex attributes. A click
/// applies them to the page and forwards the foreground to the model
/// material.
pub fn wire_theme_buttons(controller: &SharedController, document: &web::Document) {
    let Ok(buttons) = document.query_selector_all(".color-btn") else {
        return;
    };
    for i in 0..buttons.length() {
        let Some(btn) = buttons
            .get(i)
            .and_then(|n| n.dyn_into::<web::HtmlElement>().ok())
        else {
            continue;
        };
        // show each swatch in its own background color
        if let Some(bg) = btn.get_attribute("data-bg") {
            let _ = btn.style().set_property("background-color", &bg);
        }

        let ctrl = controller.clone();
        let doc = document.clone();
        let btn_for_click = btn.clone();
        let closure = Closure::wrap(Box::new(move || {
            if let Ok(all) = doc.query_selector_all(".color-btn") {
                for j in 0..all.length() {
                    if let Some(other) = all.get(j).and_then(|n| n.dyn_into::<web::Element>().ok())
                    {
                        let _ = other.class_list().remove_1("active");
                    }
                }
            }
            let _ = btn_for_click.class_list().add_1("active");

            let bg = btn_for_click.get_attribute("data-bg").unwrap_or_default();
            let fg = btn_for_click.get_attribute("data-color").unwrap_or_default();
            dom::set_page_colors(&doc, &bg, &fg);
            match Rgb::from_hex(&fg) {
                Some(color) => ctrl.borrow_mut().set_mesh_color(color),
                None => log::warn!("theme button has unparsable data-color {fg:?}"),
            }
        }) as Box<dyn FnMut()>);
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}
