use crate::{
    axis::AxisTransform,
    geometry::{LineSegment, Point},
    surface::{DrawSurface, Region, Stroke},
};

pub const BAR_COUNT: usize = 12;
pub const LABEL_FREQUENCIES: [f64; 3] = [220.0, 440.0, 880.0];
const LABEL_RAISE: f64 = 5.0;
const MARKER_SIZE: f32 = 4.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BarLayout {
    pub width: f64,
    pub height: f64,
    pub count: usize,
}

impl BarLayout {
    pub fn new(width: f64, height: f64, count: usize) -> Self {
        Self {
            width,
            height,
            count: count.max(1),
        }
    }

    pub fn bar_height(&self) -> f64 {
        self.height / self.count as f64
    }

    pub fn row_ys(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.count).map(|i| i as f64 * self.bar_height())
    }

    pub fn label_row_y(&self) -> f64 {
        (self.count / 2) as f64 * self.bar_height()
    }

    /// Where the frequency labels sit on the middle bar.
    pub fn label_anchors(&self, axis: &AxisTransform) -> Vec<Point> {
        let y = self.label_row_y();
        LABEL_FREQUENCIES
            .iter()
            .map(|hz| Point::new(axis.to_pixel(*hz), y))
            .collect()
    }

    pub fn draw<S: DrawSurface + ?Sized>(&self, surface: &mut S, axis: &AxisTransform) {
        let width = self.width as f32;
        surface.clear(Region::new(0.0, 0.0, width, self.height as f32));
        for y in self.row_ys() {
            surface.stroke_line(0.0, y as f32, width, y as f32, Stroke::Grid);
        }
        for (hz, anchor) in LABEL_FREQUENCIES.iter().zip(self.label_anchors(axis)) {
            surface.fill_text(
                &format!("{hz} Hz"),
                anchor.x as f32,
                (anchor.y - LABEL_RAISE) as f32,
            );
        }
    }
}

pub fn draw_segments<'a, S, I>(surface: &mut S, segments: I, stroke: Stroke)
where
    S: DrawSurface + ?Sized,
    I: IntoIterator<Item = &'a LineSegment>,
{
    for segment in segments {
        surface.stroke_line(
            segment.start_x as f32,
            segment.start_y as f32,
            segment.end_x as f32,
            segment.end_y as f32,
            stroke,
        );
    }
}

pub fn draw_markers<S: DrawSurface + ?Sized>(surface: &mut S, points: &[Point]) {
    for point in points {
        let (x, y) = (point.x as f32, point.y as f32);
        surface.stroke_line(x - MARKER_SIZE, y, x + MARKER_SIZE, y, Stroke::Marker);
        surface.stroke_line(x, y - MARKER_SIZE, x, y + MARKER_SIZE, Stroke::Marker);
    }
}
