// Host-page wiring for the web front-end.

/// Canvas the scene renders into.
pub const CANVAS_ID: &str = "bg";

/// Scene manifest fetched at startup. Falls back to the built-in default.
pub const MANIFEST_PATH: &str = "./assets/scene.json";

pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth24Plus;
