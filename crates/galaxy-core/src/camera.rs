//! Perspective camera and the pointer/scroll driven rig that moves it.

use crate::constants::{
    CAMERA_BASE_POSITION, CAMERA_FOVY_DEGREES, CAMERA_HEIGHT_PER_VIEWPORT, CAMERA_SMOOTHING,
    CAMERA_ZFAR, CAMERA_ZNEAR,
};
use glam::{EulerRot, Mat4, Quat, Vec2, Vec3};

/// Right-handed perspective camera oriented by pitch (about X) then yaw
/// (about Y), applied in XYZ order.
#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub pitch: f32,
    pub yaw: f32,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    pub fn rotation(&self) -> Quat {
        Quat::from_euler(EulerRot::XYZ, self.pitch, self.yaw, 0.0)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }

    /// World-to-view transform: the inverse of the camera's world placement.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation(), self.position).inverse()
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        if aspect.is_finite() && aspect > 0.0 {
            self.aspect = aspect;
        }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::from_array(CAMERA_BASE_POSITION),
            pitch: 0.0,
            yaw: 0.0,
            aspect: 1.0,
            fovy_radians: CAMERA_FOVY_DEGREES.to_radians(),
            znear: CAMERA_ZNEAR,
            zfar: CAMERA_ZFAR,
        }
    }
}

/// Owns the camera and eases its orientation toward the pointer target.
#[derive(Clone, Debug)]
pub struct CameraRig {
    camera: Camera,
    alpha: f32,
    base_y: f32,
    height_per_viewport: f32,
}

impl CameraRig {
    pub fn new(camera: Camera, alpha: f32, height_per_viewport: f32) -> Self {
        let base_y = camera.position.y;
        Self {
            camera,
            alpha,
            base_y,
            height_per_viewport,
        }
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    /// One smoothing step. Pitch and yaw each close `alpha` of their gap to
    /// the target; height is set directly from scroll progress.
    pub fn update(&mut self, target: Vec2, scroll_y: f32, viewport_height: f32) {
        self.camera.yaw += self.alpha * (target.x - self.camera.yaw);
        self.camera.pitch += self.alpha * (target.y - self.camera.pitch);
        self.camera.position.y = self.height_for_scroll(scroll_y, viewport_height);
    }

    /// Camera height for a scroll position. Affine in scroll progress
    /// (`scroll_y / viewport_height`), not clamped.
    pub fn height_for_scroll(&self, scroll_y: f32, viewport_height: f32) -> f32 {
        let progress = scroll_y / viewport_height.max(1.0);
        self.base_y - progress * self.height_per_viewport
    }
}

impl Default for CameraRig {
    fn default() -> Self {
        Self::new(
            Camera::default(),
            CAMERA_SMOOTHING,
            CAMERA_HEIGHT_PER_VIEWPORT,
        )
    }
}
