use crate::dom;
use crate::render::GpuState;
use galaxy_core::FrameDriver;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub struct FrameContext<'a> {
    pub driver: Rc<RefCell<FrameDriver>>,
    pub gpu: Rc<RefCell<GpuState<'a>>>,
    pub canvas: web::HtmlCanvasElement,
}

impl<'a> FrameContext<'a> {
    /// One animation frame. Returns false once the driver has stopped.
    pub fn frame(&mut self) -> bool {
        let mut driver = self.driver.borrow_mut();
        let mut gpu = self.gpu.borrow_mut();
        match driver.tick(&mut *gpu) {
            Some(report) => {
                if report.hover_changed {
                    dom::set_cursor(&self.canvas, report.hovered.is_some());
                }
                true
            }
            None => false,
        }
    }
}

pub async fn init_gpu(
    canvas: &web::HtmlCanvasElement,
    lighting: &galaxy_core::manifest::LightingConfig,
) -> Option<GpuState<'static>> {
    // leak a canvas clone to satisfy 'static lifetime for surface
    let leaked_canvas = Box::leak(Box::new(canvas.clone()));
    match GpuState::new(leaked_canvas, lighting).await {
        Ok(g) => Some(g),
        Err(e) => {
            log::error!("WebGPU init error: {:?}", e);
            None
        }
    }
}

type TickSlot = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

fn request_frame(slot: &TickSlot) {
    if let (Some(w), Some(cb)) = (web::window(), slot.borrow().as_ref()) {
        _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}

/// Drive `frame_ctx` from requestAnimationFrame until the driver stops.
pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext<'static>>>) {
    frame_ctx.borrow().driver.borrow_mut().start();

    let tick: TickSlot = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        if frame_ctx.borrow_mut().frame() {
            request_frame(&tick_clone);
        } else {
            log::info!("[frame] run loop ended");
        }
    }) as Box<dyn FnMut()>));
    request_frame(&tick);
}
