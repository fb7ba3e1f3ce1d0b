// Shared interaction and layout tuning constants.
//
// The manifest can override most of these; the values here are the defaults
// it falls back to.

// Pointer
pub const POINTER_TARGET_SCALE: f32 = 0.0002; // k in target = (1 - raw) * k

// Camera
pub const CAMERA_SMOOTHING: f32 = 0.05; // fraction of the remaining gap closed per frame
pub const CAMERA_FOVY_DEGREES: f32 = 75.0;
pub const CAMERA_ZNEAR: f32 = 0.1;
pub const CAMERA_ZFAR: f32 = 1000.0;
pub const CAMERA_BASE_POSITION: [f32; 3] = [-0.8, 0.0, 4.8];
pub const CAMERA_HEIGHT_PER_VIEWPORT: f32 = 2.0; // world units travelled per viewport of scroll

// Picking
pub const RAY_EPSILON: f32 = 1e-6;
pub const MAX_LINKED_ASSETS: usize = 4;

// Stars
pub const STAR_COUNT: usize = 500;
pub const STAR_SPREAD: f32 = 100.0; // edge length of the cube stars are scattered in
pub const STAR_RADIUS: f32 = 0.05;
pub const STAR_SEED: u64 = 42;
pub const MAX_STAR_COUNT: usize = 20_000;

// Lighting
pub const POINT_LIGHT_POSITION: [f32; 3] = [10.0, 15.0, 5.0];
pub const POINT_LIGHT_INTENSITY: f32 = 1.0;
pub const AMBIENT_INTENSITY: f32 = 1.0;

// Color adjustments
pub const HOVER_BRIGHTEN: f32 = 1.4;
