//! "Cover" fitting of the background texture to the viewport.

use glam::Vec2;

/// Texture-space offset/repeat pair for the background sampler.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BackgroundFit {
    pub offset: Vec2,
    pub repeat: Vec2,
}

impl BackgroundFit {
    pub const IDENTITY: Self = Self {
        offset: Vec2::ZERO,
        repeat: Vec2::ONE,
    };
}

impl Default for BackgroundFit {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Crop the image symmetrically on whichever axis has excess so that it
/// fills the viewport without distortion.
///
/// `factor = (image_w / image_h) / (viewport_w / viewport_h)`. Degenerate
/// sizes fall back to the identity mapping.
pub fn fit(image_w: f32, image_h: f32, viewport_w: f32, viewport_h: f32) -> BackgroundFit {
    let dims = [image_w, image_h, viewport_w, viewport_h];
    if dims.iter().any(|d| !d.is_finite() || *d <= 0.0) {
        return BackgroundFit::IDENTITY;
    }
    let factor = (image_w / image_h) / (viewport_w / viewport_h);
    if factor > 1.0 {
        let repeat_x = 1.0 / factor;
        BackgroundFit {
            offset: Vec2::new((1.0 - repeat_x) / 2.0, 0.0),
            repeat: Vec2::new(repeat_x, 1.0),
        }
    } else {
        BackgroundFit {
            offset: Vec2::new(0.0, (1.0 - factor) / 2.0),
            repeat: Vec2::new(1.0, factor),
        }
    }
}

/// Remembers the last image and viewport sizes and refits when either
/// changes. Yields nothing until both are known.
#[derive(Clone, Debug, Default)]
pub struct BackgroundFitter {
    image: Option<Vec2>,
    viewport: Option<Vec2>,
    current: Option<BackgroundFit>,
}

impl BackgroundFitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_image(&mut self, width: u32, height: u32) -> Option<BackgroundFit> {
        self.image = Some(Vec2::new(width as f32, height as f32));
        self.refit()
    }

    pub fn set_viewport(&mut self, width: f32, height: f32) -> Option<BackgroundFit> {
        self.viewport = Some(Vec2::new(width, height));
        self.refit()
    }

    pub fn current(&self) -> Option<BackgroundFit> {
        self.current
    }

    fn refit(&mut self) -> Option<BackgroundFit> {
        let (img, vp) = (self.image?, self.viewport?);
        let f = fit(img.x, img.y, vp.x, vp.y);
        self.current = Some(f);
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wide_image_crops_horizontally() {
        // 2:1 image on a 1:1 viewport
        let f = fit(2000.0, 1000.0, 500.0, 500.0);
        assert_eq!(f.repeat, Vec2::new(0.5, 1.0));
        assert_eq!(f.offset, Vec2::new(0.25, 0.0));
    }

    #[test]
    fn tall_image_crops_vertically() {
        let f = fit(1000.0, 2000.0, 500.0, 500.0);
        assert_eq!(f.repeat, Vec2::new(1.0, 0.5));
        assert_eq!(f.offset, Vec2::new(0.0, 0.25));
    }

    #[test]
    fn matching_aspect_is_identity() {
        assert_eq!(fit(1920.0, 1080.0, 960.0, 540.0), BackgroundFit::IDENTITY);
    }

    #[test]
    fn zero_sizes_fall_back_to_identity() {
        assert_eq!(fit(0.0, 1080.0, 960.0, 540.0), BackgroundFit::IDENTITY);
        assert_eq!(fit(1920.0, 1080.0, 960.0, 0.0), BackgroundFit::IDENTITY);
    }

    #[test]
    fn fitter_waits_for_both_sizes() {
        let mut fitter = BackgroundFitter::new();
        assert!(fitter.set_viewport(800.0, 600.0).is_none());
        let first = fitter.set_image(1920, 1080);
        assert!(first.is_some());
        let resized = fitter.set_viewport(600.0, 800.0);
        assert_ne!(first, resized);
        assert_eq!(fitter.current(), resized);
    }
}
