use crate::constants::POINTER_TARGET_SCALE;
use crate::viewport::Viewport;
use glam::Vec2;

/// Vertical page scroll, never above the top of the page.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScrollState {
    pub y: f32,
    /// Optional lower edge of the page; `None` leaves scrolling unbounded.
    pub max: Option<f32>,
}

impl ScrollState {
    fn clamp(&self, y: f32) -> f32 {
        let y = y.max(0.0);
        match self.max {
            Some(max) => y.min(max.max(0.0)),
            None => y,
        }
    }

    pub fn scroll_by(&mut self, delta_y: f32) {
        if delta_y.is_finite() {
            self.y = self.clamp(self.y + delta_y);
        }
    }

    pub fn scroll_to(&mut self, y: f32) {
        if y.is_finite() {
            self.y = self.clamp(y);
        }
    }

    /// Replaces the lower edge and pulls `y` back inside it.
    pub fn set_max(&mut self, max: Option<f32>) {
        self.max = max.filter(|m| m.is_finite());
        self.y = self.clamp(self.y);
    }
}

/// Latest pointer and scroll observations, turned into a damping target for
/// the camera rig.
#[derive(Clone, Debug)]
pub struct PointerTracker {
    viewport: Viewport,
    client: Option<Vec2>,
    raw: Vec2,
    scroll: ScrollState,
    // manifest cap, combined with the page limit
    configured_max: Option<f32>,
    target_scale: f32,
}

impl PointerTracker {
    pub fn new(viewport: Viewport, target_scale: f32, scroll_max: Option<f32>) -> Self {
        Self {
            viewport,
            client: None,
            raw: Vec2::ZERO,
            scroll: ScrollState {
                y: 0.0,
                max: scroll_max,
            },
            configured_max: scroll_max,
            target_scale,
        }
    }

    pub fn on_pointer_move(&mut self, client_x: f32, client_y: f32) {
        if !(client_x.is_finite() && client_y.is_finite()) {
            return;
        }
        let client = Vec2::new(client_x, client_y);
        self.client = Some(client);
        self.raw = client - self.viewport.center();
    }

    pub fn on_wheel(&mut self, delta_y: f32) {
        self.scroll.scroll_by(delta_y);
    }

    pub fn on_scroll(&mut self, scroll_y: f32) {
        self.scroll.scroll_to(scroll_y);
    }

    /// Keeps `raw` relative to the new center; the last client position is
    /// re-applied so a resize without pointer motion does not jump the target.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        if let Some(c) = self.client {
            self.raw = c - viewport.center();
        }
    }

    /// Furthest the page itself can scroll (`scrollHeight - innerHeight`).
    /// Wheel input never carries the scroll position past it, so wheel and
    /// scroll events agree at the page bottom.
    pub fn set_page_scroll_limit(&mut self, limit: Option<f32>) {
        let page = limit.map(|l| l.max(0.0));
        let max = match (self.configured_max, page) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        self.scroll.set_max(max);
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Raw pointer offset from the viewport center, in pixels.
    pub fn raw(&self) -> Vec2 {
        self.raw
    }

    pub fn scroll_y(&self) -> f32 {
        self.scroll.y
    }

    /// Small inverted offset the camera eases toward; not an angle.
    pub fn target(&self) -> Vec2 {
        (Vec2::ONE - self.raw) * self.target_scale
    }

    /// Pointer position in NDC, `None` until the first pointer event.
    pub fn ndc(&self) -> Option<Vec2> {
        self.client.map(|c| self.viewport.to_ndc(c))
    }

    pub fn ndc_at(&self, client_x: f32, client_y: f32) -> Vec2 {
        self.viewport.to_ndc(Vec2::new(client_x, client_y))
    }
}

impl Default for PointerTracker {
    fn default() -> Self {
        Self::new(Viewport::default(), POINTER_TARGET_SCALE, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker() -> PointerTracker {
        PointerTracker::new(Viewport::new(1000.0, 800.0), 0.0002, None)
    }

    #[test]
    fn raw_is_relative_to_center() {
        let mut p = tracker();
        p.on_pointer_move(600.0, 300.0);
        assert_eq!(p.raw(), Vec2::new(100.0, -100.0));
    }

    #[test]
    fn target_is_small_and_inverted() {
        let mut p = tracker();
        p.on_pointer_move(501.0, 401.0);
        assert_eq!(p.target(), Vec2::ZERO);

        p.on_pointer_move(1000.0, 400.0);
        let t = p.target();
        assert!((t.x - (1.0 - 500.0) * 0.0002).abs() < 1e-7);
        assert!(t.x < 0.0);
        assert!((t.y - 0.0002).abs() < 1e-9);
    }

    #[test]
    fn wheel_never_scrolls_above_top() {
        let mut p = tracker();
        p.on_wheel(-120.0);
        assert_eq!(p.scroll_y(), 0.0);
        p.on_wheel(240.0);
        p.on_wheel(-100.0);
        assert_eq!(p.scroll_y(), 140.0);
    }

    #[test]
    fn wheel_respects_optional_max() {
        let mut p = PointerTracker::new(Viewport::new(100.0, 100.0), 0.0002, Some(300.0));
        p.on_wheel(1000.0);
        assert_eq!(p.scroll_y(), 300.0);
        p.on_scroll(50.0);
        assert_eq!(p.scroll_y(), 50.0);
    }

    #[test]
    fn page_limit_stops_wheel_at_the_bottom() {
        let mut p = tracker();
        p.set_page_scroll_limit(Some(500.0));
        p.on_scroll(500.0);
        for _ in 0..5 {
            p.on_wheel(100.0);
        }
        assert_eq!(p.scroll_y(), 500.0);
        p.set_page_scroll_limit(Some(200.0));
        assert_eq!(p.scroll_y(), 200.0);
    }

    #[test]
    fn page_limit_never_loosens_the_configured_cap() {
        let mut p = PointerTracker::new(Viewport::new(100.0, 100.0), 0.0002, Some(300.0));
        p.set_page_scroll_limit(Some(1000.0));
        p.on_wheel(800.0);
        assert_eq!(p.scroll_y(), 300.0);
    }

    #[test]
    fn unscrollable_page_ignores_wheel() {
        let mut p = tracker();
        p.set_page_scroll_limit(Some(0.0));
        p.on_wheel(120.0);
        assert_eq!(p.scroll_y(), 0.0);
    }

    #[test]
    fn ndc_absent_until_first_move() {
        let mut p = tracker();
        assert!(p.ndc().is_none());
        p.on_pointer_move(500.0, 400.0);
        assert_eq!(p.ndc(), Some(Vec2::ZERO));
    }

    #[test]
    fn resize_recenters_last_position() {
        let mut p = tracker();
        p.on_pointer_move(500.0, 400.0);
        p.set_viewport(Viewport::new(2000.0, 800.0));
        assert_eq!(p.raw(), Vec2::new(-500.0, 0.0));
    }
}
