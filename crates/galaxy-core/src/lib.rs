pub mod assets;
pub mod background;
pub mod camera;
pub mod composer;
pub mod constants;
pub mod error;
pub mod frame;
pub mod manifest;
pub mod picking;
pub mod pointer;
pub mod scene;
pub mod starfield;
pub mod viewport;

pub use assets::{DecodedImage, GltfAsset};
pub use background::{fit, BackgroundFit, BackgroundFitter};
pub use camera::{Camera, CameraRig};
pub use composer::{LoadOutcome, LoadRequest, LoadStatus, SceneComposer};
pub use error::{LoadError, ManifestError};
pub use frame::{FrameDriver, FrameReport, FrameView, LoopState, Renderer, WindowMetrics};
pub use manifest::{AssetSpec, SceneManifest};
pub use picking::{Hit, HitTester, NavTarget, Ray};
pub use pointer::{PointerTracker, ScrollState};
pub use scene::{Aabb, MeshData, ObjectId, Scene, SceneNode, Transform};
pub use viewport::Viewport;

// Shaders bundled as string constants
pub static BACKGROUND_WGSL: &str = include_str!("../../../shaders/background.wgsl");
pub static SCENE_WGSL: &str = include_str!("../../../shaders/scene.wgsl");
