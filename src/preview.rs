use std::f64::consts::{PI, TAU};

use crate::surface::{DrawSurface, Region, Stroke};

/// Seconds of signal shown across the preview width.
const WINDOW_SECONDS: f64 = PI / 1000.0;
/// The drawn wave drifts this much slower than real time.
const DRIFT_SCALE: f64 = 1.0 / 400.0;

/// Small animated sine of the sounding frequency.
#[derive(Clone, Debug, Default)]
pub struct WavePreview {
    phase: f64,
    frequency: Option<f64>,
}

impl WavePreview {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> f64 {
        self.phase
    }

    pub fn advance(&mut self, frequency: Option<f64>, dt: f64) {
        self.frequency = frequency;
        if let Some(hz) = frequency {
            self.phase = (self.phase + TAU * hz * dt * DRIFT_SCALE).rem_euclid(TAU);
        }
    }

    pub fn points(&self, width: usize, height: f64) -> Vec<(f64, f64)> {
        let Some(hz) = self.frequency else {
            return Vec::new();
        };
        let center = height / 2.0;
        let amplitude = height / 4.0;
        let angular = TAU * hz;
        (0..width)
            .map(|x| {
                let t = x as f64 / width as f64 * WINDOW_SECONDS;
                (x as f64, center + amplitude * (self.phase + angular * t).sin())
            })
            .collect()
    }

    pub fn draw<S: DrawSurface + ?Sized>(&self, surface: &mut S, region: Region) {
        surface.clear(region);
        let points = self.points(region.w.max(0.0) as usize, region.h as f64);
        for pair in points.windows(2) {
            let (x0, y0) = pair[0];
            let (x1, y1) = pair[1];
            surface.stroke_line(
                region.x + x0 as f32,
                region.y + y0 as f32,
                region.x + x1 as f32,
                region.y + y1 as f32,
                Stroke::Wave,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::CommandList;

    #[test]
    fn silent_preview_is_empty() {
        let mut preview = WavePreview::new();
        preview.advance(None, 1.0 / 60.0);
        assert!(preview.points(150, 90.0).is_empty());
        assert_eq!(preview.phase(), 0.0);
    }

    #[test]
    fn wave_stays_inside_half_height() {
        let mut preview = WavePreview::new();
        preview.advance(Some(810.0), 1.0 / 60.0);
        let points = preview.points(150, 90.0);
        assert_eq!(points.len(), 150);
        assert!(points.iter().all(|(_, y)| *y >= 22.5 - 1e-9 && *y <= 67.5 + 1e-9));
    }

    #[test]
    fn phase_wraps() {
        let mut preview = WavePreview::new();
        for _ in 0..10_000 {
            preview.advance(Some(1600.0), 1.0 / 60.0);
        }
        assert!(preview.phase() >= 0.0 && preview.phase() < TAU);
    }

    #[test]
    fn draw_clears_then_strokes() {
        let mut preview = WavePreview::new();
        preview.advance(Some(440.0), 0.0);
        let mut frame = CommandList::new();
        preview.draw(&mut frame, Region::new(1050.0, 0.0, 150.0, 90.0));
        assert_eq!(frame.lines(Stroke::Wave).count(), 149);
        assert!(frame.lines(Stroke::Wave).all(|(x0, ..)| x0 >= 1050.0));
    }
}
