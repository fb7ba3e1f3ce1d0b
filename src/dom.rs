use galaxy_core::Viewport;
use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

/// Window inner size in CSS pixels.
pub fn viewport() -> Viewport {
    let Some(w) = web::window() else {
        return Viewport::default();
    };
    let width = w.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(1.0);
    let height = w.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(1.0);
    Viewport::new(width as f32, height as f32)
}

/// Viewport minus the vertical scrollbar, used for the background fit.
pub fn viewport_without_scrollbar() -> Viewport {
    let full = viewport();
    let body_width = window_document()
        .and_then(|d| d.body())
        .map(|b| b.offset_width() as f32)
        .filter(|w| *w > 0.0);
    match body_width {
        // inner width minus (inner width - body width + 1)
        Some(bw) => Viewport::new((bw - 1.0).max(1.0), full.height),
        None => full,
    }
}

/// `scrollHeight - innerHeight` of the document; 0 when it cannot scroll.
pub fn page_scroll_limit() -> Option<f32> {
    let root = window_document()?.document_element()?;
    let limit = root.scroll_height() as f32 - viewport().height;
    Some(limit.max(0.0))
}

pub fn scroll_y() -> f32 {
    web::window()
        .and_then(|w| w.scroll_y().ok())
        .unwrap_or(0.0) as f32
}

/// Match the canvas backing store to its CSS size times devicePixelRatio.
/// Returns the new backing size.
pub fn sync_canvas_backing_size(canvas: &web::HtmlCanvasElement) -> (u32, u32) {
    if let Some(w) = web::window() {
        let dpr = w.device_pixel_ratio();
        let rect = canvas.get_bounding_client_rect();
        let w_px = (rect.width() * dpr) as u32;
        let h_px = (rect.height() * dpr) as u32;
        canvas.set_width(w_px.max(1));
        canvas.set_height(h_px.max(1));
    }
    (canvas.width(), canvas.height())
}

pub fn set_cursor(canvas: &web::HtmlCanvasElement, pointer: bool) {
    let cursor = if pointer { "pointer" } else { "default" };
    if let Some(el) = canvas.dyn_ref::<web::HtmlElement>() {
        _ = el.style().set_property("cursor", cursor);
    }
}

pub fn open_in_new_tab(url: &str) {
    if let Some(w) = web::window() {
        if let Err(e) = w.open_with_url_and_target(url, "_blank") {
            log::error!("[click] window.open failed: {:?}", e);
        }
    }
}
