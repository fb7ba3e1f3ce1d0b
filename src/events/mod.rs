mod pointer;
mod window;

pub use pointer::wire_pointer_handlers;
pub use window::wire_window_handlers;

use crate::render::GpuState;
use galaxy_core::FrameDriver;
use std::cell::RefCell;
use std::rc::Rc;
use web_sys as web;

/// Shared handles every DOM listener needs.
#[derive(Clone)]
pub struct EventWiring {
    pub canvas: web::HtmlCanvasElement,
    pub driver: Rc<RefCell<FrameDriver>>,
    pub gpu: Rc<RefCell<GpuState<'static>>>,
}
