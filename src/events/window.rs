use super::EventWiring;
use crate::dom;
use galaxy_core::WindowMetrics;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub fn wire_window_handlers(w: &EventWiring) {
    wire_scroll(w);
    wire_resize(w);
}

fn wire_scroll(w: &EventWiring) {
    let w = w.clone();
    let closure = Closure::wrap(Box::new(move || {
        w.driver.borrow_mut().on_scroll(dom::scroll_y());
    }) as Box<dyn FnMut()>);
    if let Some(wnd) = web::window() {
        _ = wnd.add_event_listener_with_callback("scroll", closure.as_ref().unchecked_ref());
    }
    closure.forget();
}

/// Push current window metrics through the driver into the renderer.
pub fn apply_resize(w: &EventWiring) {
    let metrics = WindowMetrics {
        viewport: dom::viewport(),
        background_viewport: dom::viewport_without_scrollbar(),
        backing_size: dom::sync_canvas_backing_size(&w.canvas),
        page_scroll_limit: dom::page_scroll_limit(),
    };
    let mut gpu = w.gpu.borrow_mut();
    w.driver.borrow_mut().on_resize(&metrics, &mut *gpu);
}

fn wire_resize(w: &EventWiring) {
    apply_resize(w);
    let w = w.clone();
    let closure = Closure::wrap(Box::new(move || apply_resize(&w)) as Box<dyn FnMut()>);
    if let Some(wnd) = web::window() {
        _ = wnd.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
    }
    closure.forget();
}
