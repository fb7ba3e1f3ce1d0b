//! Per-frame driver owning every piece of interactive state.

use crate::background::{BackgroundFit, BackgroundFitter};
use crate::camera::{Camera, CameraRig};
use crate::composer::{LoadOutcome, LoadRequest, SceneComposer};
use crate::error::LoadError;
use crate::manifest::SceneManifest;
use crate::picking::HitTester;
use crate::pointer::PointerTracker;
use crate::scene::{MeshData, ObjectId, Scene, SceneNode, Transform};
use crate::starfield;
use crate::viewport::Viewport;
use glam::Vec3;
use std::rc::Rc;

/// Everything a renderer needs to draw one frame.
pub struct FrameView<'a> {
    pub scene: &'a Scene,
    pub camera: &'a Camera,
    pub hovered: Option<ObjectId>,
}

/// Drawing backend. Errors are reported per frame and never stop the loop.
pub trait Renderer {
    type Error: std::fmt::Display;

    fn set_viewport_size(&mut self, width: u32, height: u32);
    fn set_background_fit(&mut self, fit: BackgroundFit);
    fn render(&mut self, view: &FrameView<'_>) -> Result<(), Self::Error>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    Running,
    Stopped,
}

/// Window measurements taken by the host on startup and every resize.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WindowMetrics {
    /// Full window, used for pointer mapping and camera aspect.
    pub viewport: Viewport,
    /// Window minus the vertical scrollbar, used for the background fit.
    pub background_viewport: Viewport,
    /// Canvas backing store in device pixels.
    pub backing_size: (u32, u32),
    /// Furthest the document can scroll; `None` when unknown.
    pub page_scroll_limit: Option<f32>,
}

impl WindowMetrics {
    /// Metrics with no scrollbar and the backing store at CSS size.
    pub fn from_viewport(viewport: Viewport) -> Self {
        Self {
            viewport,
            background_viewport: viewport,
            backing_size: (viewport.width as u32, viewport.height as u32),
            page_scroll_limit: None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameReport {
    pub frame: u64,
    pub hovered: Option<ObjectId>,
    pub hover_changed: bool,
}

pub struct FrameDriver {
    pointer: PointerTracker,
    rig: CameraRig,
    hit_tester: HitTester,
    scene: Scene,
    composer: SceneComposer,
    background: BackgroundFitter,
    hovered: Option<ObjectId>,
    state: LoopState,
    frame: u64,
}

impl FrameDriver {
    pub fn new(manifest: &SceneManifest, viewport: Viewport) -> Self {
        let cam_cfg = &manifest.camera;
        let mut camera = Camera {
            position: Vec3::from_array(cam_cfg.position),
            fovy_radians: cam_cfg.fovy.to_radians(),
            znear: cam_cfg.znear,
            zfar: cam_cfg.zfar,
            ..Camera::default()
        };
        camera.set_aspect(viewport.aspect());

        let composer = SceneComposer::new(&manifest.assets);
        let mut scene = Scene::new();
        if let Some(stars) = starfield::build(&manifest.stars) {
            scene.insert(SceneNode {
                id: composer.next_free_id(),
                name: "stars".to_string(),
                mesh: Rc::new(stars),
                transform: Transform::default(),
                spin: 0.0,
            });
        }

        let mut background = BackgroundFitter::new();
        background.set_viewport(viewport.width, viewport.height);

        Self {
            pointer: PointerTracker::new(
                viewport,
                manifest.pointer.target_scale,
                manifest.pointer.scroll_max,
            ),
            rig: CameraRig::new(camera, cam_cfg.smoothing, cam_cfg.height_per_viewport),
            hit_tester: HitTester::new(),
            scene,
            composer,
            background,
            hovered: None,
            state: LoopState::Idle,
            frame: 0,
        }
    }

    // ---------------- lifecycle ----------------

    pub fn start(&mut self) {
        if self.state != LoopState::Running {
            log::info!("[frame] loop started");
            self.state = LoopState::Running;
        }
    }

    pub fn stop(&mut self) {
        if self.state == LoopState::Running {
            log::info!("[frame] loop stopped after {} frames", self.frame);
        }
        self.state = LoopState::Stopped;
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    /// One frame: hover pick, spins, camera, render. Does nothing unless
    /// running.
    pub fn tick<R: Renderer>(&mut self, renderer: &mut R) -> Option<FrameReport> {
        if !self.is_running() {
            return None;
        }

        let hovered = self.pointer.ndc().and_then(|ndc| {
            self.hit_tester
                .pick(ndc, self.rig.camera(), &self.scene)
                .map(|h| h.object)
        });
        let hover_changed = hovered != self.hovered;
        self.hovered = hovered;

        self.scene.advance_spins();

        let viewport_height = self.pointer.viewport().height;
        self.rig
            .update(self.pointer.target(), self.pointer.scroll_y(), viewport_height);

        let view = FrameView {
            scene: &self.scene,
            camera: self.rig.camera(),
            hovered: self.hovered,
        };
        if let Err(e) = renderer.render(&view) {
            log::error!("render error: {}", e);
        }

        self.frame += 1;
        Some(FrameReport {
            frame: self.frame,
            hovered,
            hover_changed,
        })
    }

    // ---------------- host events ----------------

    pub fn on_pointer_move(&mut self, client_x: f32, client_y: f32) {
        self.pointer.on_pointer_move(client_x, client_y);
    }

    pub fn on_wheel(&mut self, delta_y: f32) {
        self.pointer.on_wheel(delta_y);
    }

    pub fn on_scroll(&mut self, scroll_y: f32) {
        self.pointer.on_scroll(scroll_y);
    }

    /// Link of the nearest clickable object under the click, if any. Called
    /// once per click event, so at most one URL is produced per click.
    pub fn on_click(&self, client_x: f32, client_y: f32) -> Option<String> {
        let ndc = self.pointer.ndc_at(client_x, client_y);
        let hit = self.hit_tester.pick(ndc, self.rig.camera(), &self.scene)?;
        let target = self.hit_tester.link(hit.object)?;
        log::info!("[click] {:?} -> {}", hit.object, target.url);
        Some(target.url.clone())
    }

    /// Applies new window metrics: pointer viewport, camera aspect, page
    /// scroll limit, renderer size and one background refit.
    pub fn on_resize<R: Renderer>(&mut self, metrics: &WindowMetrics, renderer: &mut R) {
        let viewport = metrics.viewport;
        if viewport.is_empty() {
            return;
        }
        self.pointer.set_viewport(viewport);
        self.pointer.set_page_scroll_limit(metrics.page_scroll_limit);
        self.rig.camera_mut().set_aspect(viewport.aspect());
        let (w, h) = metrics.backing_size;
        renderer.set_viewport_size(w, h);
        let bg = if metrics.background_viewport.is_empty() {
            viewport
        } else {
            metrics.background_viewport
        };
        if let Some(fit) = self.background.set_viewport(bg.width, bg.height) {
            renderer.set_background_fit(fit);
        }
    }

    pub fn on_background_loaded<R: Renderer>(&mut self, width: u32, height: u32, renderer: &mut R) {
        if let Some(fit) = self.background.set_image(width, height) {
            renderer.set_background_fit(fit);
        }
    }

    // ---------------- asset loading ----------------

    pub fn take_load_requests(&mut self) -> Vec<LoadRequest> {
        self.composer.take_requests()
    }

    pub fn on_asset_loaded(&mut self, id: ObjectId, result: Result<MeshData, LoadError>) -> LoadOutcome {
        self.composer
            .complete(id, result, &mut self.scene, &mut self.hit_tester)
    }

    // ---------------- accessors ----------------

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn camera(&self) -> &Camera {
        self.rig.camera()
    }

    pub fn hit_tester(&self) -> &HitTester {
        &self.hit_tester
    }

    pub fn composer(&self) -> &SceneComposer {
        &self.composer
    }

    pub fn scroll_y(&self) -> f32 {
        self.pointer.scroll_y()
    }

    pub fn hovered(&self) -> Option<ObjectId> {
        self.hovered
    }

    pub fn background_fit(&self) -> Option<BackgroundFit> {
        self.background.current()
    }

    pub fn frame_count(&self) -> u64 {
        self.frame
    }
}
