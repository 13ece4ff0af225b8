use macroquad::prelude::*;

use scalemaker::surface::{DrawSurface, Region, Stroke};

const BACKGROUND: Color = Color {
    r: 0.98,
    g: 0.98,
    b: 0.96,
    a: 1.0,
};
const INK: Color = Color {
    r: 0.1,
    g: 0.1,
    b: 0.1,
    a: 1.0,
};
const GRID: Color = Color {
    r: 0.35,
    g: 0.35,
    b: 0.35,
    a: 1.0,
};
const SKETCH: Color = Color {
    r: 0.85,
    g: 0.1,
    b: 0.1,
    a: 1.0,
};
const PREVIEW: Color = Color {
    r: 0.85,
    g: 0.1,
    b: 0.1,
    a: 0.5,
};
const MARKER: Color = Color {
    r: 0.1,
    g: 0.45,
    b: 0.85,
    a: 1.0,
};
const LABEL_FONT_SIZE: f32 = 16.0;

/// Immediate-mode surface drawing straight into the macroquad frame.
pub struct MacroquadSurface;

impl DrawSurface for MacroquadSurface {
    fn clear(&mut self, region: Region) {
        draw_rectangle(region.x, region.y, region.w, region.h, BACKGROUND);
    }

    fn stroke_line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, stroke: Stroke) {
        let (thickness, color) = match stroke {
            Stroke::Grid => (1.0, GRID),
            Stroke::Sketch => (2.0, SKETCH),
            Stroke::Preview => (2.0, PREVIEW),
            Stroke::Wave => (1.0, INK),
            Stroke::Marker => (1.5, MARKER),
        };
        draw_line(x0, y0, x1, y1, thickness, color);
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32) {
        // Text is anchored on its vertical middle.
        let dims = measure_text(text, None, LABEL_FONT_SIZE as u16, 1.0);
        draw_text(text, x, y + dims.offset_y / 2.0, LABEL_FONT_SIZE, INK);
    }
}
