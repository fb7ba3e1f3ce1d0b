#![cfg(target_arch = "wasm32")]
use galaxy_core::{FrameDriver, SceneManifest};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod constants;
mod dom;
mod events;
mod fetch;
mod frame;
mod render;

use render::GpuState;

thread_local! {
    static ACTIVE_DRIVER: RefCell<Option<Rc<RefCell<FrameDriver>>>> = const { RefCell::new(None) };
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("galaxy-web starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

/// Stop the animation loop. The page keeps its last frame.
#[wasm_bindgen]
pub fn stop() {
    ACTIVE_DRIVER.with(|slot| {
        if let Some(driver) = slot.borrow().as_ref() {
            driver.borrow_mut().stop();
        }
    });
}

async fn init() -> anyhow::Result<()> {
    static STARTED: AtomicBool = AtomicBool::new(false);
    if STARTED.swap(true, Ordering::SeqCst) {
        return Ok(());
    }

    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;
    let canvas: web::HtmlCanvasElement = document
        .get_element_by_id(constants::CANVAS_ID)
        .ok_or_else(|| anyhow::anyhow!("missing #{}", constants::CANVAS_ID))?
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;
    dom::sync_canvas_backing_size(&canvas);

    let manifest = fetch::load_manifest(constants::MANIFEST_PATH).await;
    let gpu = frame::init_gpu(&canvas, &manifest.lighting)
        .await
        .ok_or_else(|| anyhow::anyhow!("renderer unavailable"))?;
    let gpu = Rc::new(RefCell::new(gpu));
    let driver = Rc::new(RefCell::new(FrameDriver::new(&manifest, dom::viewport())));
    ACTIVE_DRIVER.with(|slot| *slot.borrow_mut() = Some(driver.clone()));

    let wiring = events::EventWiring {
        canvas: canvas.clone(),
        driver: driver.clone(),
        gpu: gpu.clone(),
    };
    events::wire_window_handlers(&wiring);
    events::wire_pointer_handlers(&wiring);

    spawn_asset_loads(&driver);
    spawn_background_load(&manifest, &driver, &gpu);

    let frame_ctx = Rc::new(RefCell::new(frame::FrameContext {
        driver,
        gpu,
        canvas,
    }));
    frame::start_loop(frame_ctx);
    Ok(())
}

/// Each mesh resolves independently; the frame loop never waits on them.
fn spawn_asset_loads(driver: &Rc<RefCell<FrameDriver>>) {
    let requests = driver.borrow_mut().take_load_requests();
    log::info!("[assets] requesting {} meshes", requests.len());
    for req in requests {
        let driver = driver.clone();
        spawn_local(async move {
            let result = fetch::load_mesh(&req.path).await;
            driver.borrow_mut().on_asset_loaded(req.id, result);
        });
    }
}

fn spawn_background_load(
    manifest: &SceneManifest,
    driver: &Rc<RefCell<FrameDriver>>,
    gpu: &Rc<RefCell<GpuState<'static>>>,
) {
    let Some(bg) = manifest.background.clone() else {
        return;
    };
    let driver = driver.clone();
    let gpu = gpu.clone();
    spawn_local(async move {
        match fetch::load_image(&bg.path).await {
            Ok(img) => {
                log::info!("[background] {} ({}x{})", bg.path, img.width, img.height);
                let mut gpu = gpu.borrow_mut();
                gpu.set_background_image(img.width, img.height, &img.rgba);
                driver
                    .borrow_mut()
                    .on_background_loaded(img.width, img.height, &mut *gpu);
            }
            Err(e) => log::error!("[background] {}: {}", bg.path, e),
        }
    });
}
