use log::debug;

use crate::axis::{AxisTransform, Distribution, FrequencyRange};

pub const MIN_ZOOM: f64 = 0.25;
pub const MAX_ZOOM: f64 = 4.0;
pub const ZOOM_RATE: f64 = 0.01;
pub const SCROLL_RATE: f64 = 0.5;

/// Distribution, zoom and scroll of the frequency axis.
///
/// Zoom stays in `[MIN_ZOOM, MAX_ZOOM]` and scroll in `±width / (2 * zoom)`
/// after every mutation. Any change that moves the axis raises a redraw
/// request, consumed by `take_redraw`.
#[derive(Clone, Debug)]
pub struct ViewState {
    distribution: Distribution,
    zoom: f64,
    scroll: f64,
    width: f64,
    redraw: bool,
}

impl ViewState {
    pub fn new(width: f64) -> Self {
        Self {
            distribution: Distribution::Linear,
            zoom: 1.0,
            scroll: 0.0,
            width: width.max(1.0),
            redraw: true,
        }
    }

    pub fn distribution(&self) -> Distribution {
        self.distribution
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn scroll(&self) -> f64 {
        self.scroll
    }

    pub fn viewport_width(&self) -> f64 {
        self.width
    }

    pub fn scroll_bound(&self) -> f64 {
        self.width / (2.0 * self.zoom)
    }

    pub fn transform(&self, range: FrequencyRange) -> AxisTransform {
        AxisTransform::from_view(self, range)
    }

    pub fn apply_wheel(&mut self, delta_x: f64, delta_y: f64, ctrl_held: bool) {
        if ctrl_held {
            self.apply_zoom_delta(delta_y, true);
        } else {
            self.apply_scroll_delta(delta_x);
        }
    }

    pub fn apply_zoom_delta(&mut self, delta_y: f64, ctrl_held: bool) {
        if !ctrl_held || !delta_y.is_finite() {
            return;
        }
        self.set_zoom(self.zoom * (1.0 - ZOOM_RATE * delta_y));
    }

    pub fn apply_pinch(&mut self, scale: f64) {
        if !scale.is_finite() || scale <= 0.0 {
            debug!("ignoring pinch scale {scale}");
            return;
        }
        self.set_zoom(self.zoom * scale);
    }

    pub fn apply_scroll_delta(&mut self, delta_x: f64) {
        if !delta_x.is_finite() {
            return;
        }
        self.set_scroll(self.scroll - SCROLL_RATE * delta_x);
    }

    pub fn set_distribution(&mut self, distribution: Distribution) {
        self.distribution = distribution;
        self.redraw = true;
    }

    pub fn set_viewport_width(&mut self, width: f64) {
        if !width.is_finite() || width < 1.0 || width == self.width {
            return;
        }
        self.width = width;
        self.redraw = true;
        self.set_scroll(self.scroll);
    }

    pub fn request_redraw(&mut self) {
        self.redraw = true;
    }

    pub fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.redraw)
    }

    fn set_zoom(&mut self, zoom: f64) {
        let clamped = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        if clamped != self.zoom {
            self.zoom = clamped;
            self.redraw = true;
        }
        // A larger zoom narrows the scroll window.
        self.set_scroll(self.scroll);
    }

    fn set_scroll(&mut self, scroll: f64) {
        let bound = self.scroll_bound();
        let clamped = scroll.clamp(-bound, bound);
        if clamped != self.scroll {
            self.scroll = clamped;
            self.redraw = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let view = ViewState::new(1200.0);
        assert_eq!(view.distribution(), Distribution::Linear);
        assert_eq!(view.zoom(), 1.0);
        assert_eq!(view.scroll(), 0.0);
    }

    #[test]
    fn zoom_requires_ctrl() {
        let mut view = ViewState::new(1200.0);
        view.apply_zoom_delta(-50.0, false);
        assert_eq!(view.zoom(), 1.0);
        view.apply_zoom_delta(-50.0, true);
        assert!((view.zoom() - 1.5).abs() < 1e-12);
    }

    #[test]
    fn zoom_ceiling_is_sticky() {
        let mut view = ViewState::new(1200.0);
        for _ in 0..200 {
            view.apply_zoom_delta(-30.0, true);
        }
        assert_eq!(view.zoom(), MAX_ZOOM);
        view.take_redraw();
        view.apply_zoom_delta(-30.0, true);
        assert_eq!(view.zoom(), MAX_ZOOM);
        assert!(!view.take_redraw());
    }

    #[test]
    fn zoom_floor_is_sticky() {
        let mut view = ViewState::new(1200.0);
        for _ in 0..200 {
            view.apply_zoom_delta(40.0, true);
        }
        assert_eq!(view.zoom(), MIN_ZOOM);
        view.apply_pinch(0.5);
        assert_eq!(view.zoom(), MIN_ZOOM);
    }

    #[test]
    fn large_wheel_delta_clamps_to_floor() {
        let mut view = ViewState::new(1200.0);
        view.apply_zoom_delta(250.0, true);
        assert_eq!(view.zoom(), MIN_ZOOM);
    }

    #[test]
    fn scroll_clamps_to_zoom_dependent_bound() {
        let mut view = ViewState::new(1200.0);
        for _ in 0..100 {
            view.apply_scroll_delta(-100.0);
        }
        assert_eq!(view.scroll(), 600.0);
        for _ in 0..100 {
            view.apply_scroll_delta(100.0);
        }
        assert_eq!(view.scroll(), -600.0);
        view.apply_scroll_delta(100.0);
        assert_eq!(view.scroll(), -600.0);
    }

    #[test]
    fn scroll_moves_opposite_to_delta() {
        let mut view = ViewState::new(1200.0);
        view.apply_scroll_delta(20.0);
        assert_eq!(view.scroll(), -10.0);
    }

    #[test]
    fn zoom_in_reclamps_scroll() {
        let mut view = ViewState::new(1200.0);
        view.apply_scroll_delta(-1200.0);
        assert_eq!(view.scroll(), 600.0);
        view.apply_pinch(4.0);
        assert_eq!(view.zoom(), 4.0);
        assert_eq!(view.scroll(), 150.0);
    }

    #[test]
    fn wheel_routes_zoom_or_scroll() {
        let mut view = ViewState::new(1200.0);
        view.apply_wheel(40.0, -10.0, true);
        assert_eq!(view.scroll(), 0.0);
        assert!((view.zoom() - 1.1).abs() < 1e-12);
        view.apply_wheel(40.0, -10.0, false);
        assert_eq!(view.scroll(), -20.0);
        assert!((view.zoom() - 1.1).abs() < 1e-12);
    }

    #[test]
    fn pinch_ignores_invalid_scale() {
        let mut view = ViewState::new(1200.0);
        view.apply_pinch(f64::NAN);
        view.apply_pinch(0.0);
        view.apply_pinch(-2.0);
        assert_eq!(view.zoom(), 1.0);
    }

    #[test]
    fn distribution_keeps_zoom_and_scroll() {
        let mut view = ViewState::new(1200.0);
        view.apply_pinch(2.0);
        view.apply_scroll_delta(-100.0);
        view.take_redraw();
        view.set_distribution(Distribution::Logarithmic);
        assert!(view.take_redraw());
        assert_eq!(view.distribution(), Distribution::Logarithmic);
        assert_eq!(view.zoom(), 2.0);
        assert_eq!(view.scroll(), 50.0);
    }

    #[test]
    fn resize_reclamps_scroll() {
        let mut view = ViewState::new(1200.0);
        view.apply_scroll_delta(-1200.0);
        view.set_viewport_width(800.0);
        assert_eq!(view.scroll(), 400.0);
    }
}
