pub const INTERSECTION_EPS: f64 = 1e-3;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_squared(&self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineSegment {
    pub start_x: f64,
    pub start_y: f64,
    pub end_x: f64,
    pub end_y: f64,
}

impl LineSegment {
    pub fn new(start_x: f64, start_y: f64, end_x: f64, end_y: f64) -> Self {
        Self {
            start_x,
            start_y,
            end_x,
            end_y,
        }
    }

    pub fn between(start: Point, end: Point) -> Self {
        Self::new(start.x, start.y, end.x, end.y)
    }

    pub fn start(&self) -> Point {
        Point::new(self.start_x, self.start_y)
    }

    pub fn end(&self) -> Point {
        Point::new(self.end_x, self.end_y)
    }

    /// Crossing point of two segments, `None` when they are (nearly)
    /// parallel or the crossing lies outside either segment.
    pub fn intersection(&self, other: &LineSegment) -> Option<Point> {
        let (x1, y1, x2, y2) = (self.start_x, self.start_y, self.end_x, self.end_y);
        let (x3, y3, x4, y4) = (other.start_x, other.start_y, other.end_x, other.end_y);

        let det = (x1 - x2) * (y3 - y4) - (y1 - y2) * (x3 - x4);
        if det.abs() < INTERSECTION_EPS {
            return None;
        }
        let a = x1 * y2 - y1 * x2;
        let b = x3 * y4 - y3 * x4;
        let px = (a * (x3 - x4) - (x1 - x2) * b) / det;
        let py = (a * (y3 - y4) - (y1 - y2) * b) / det;

        let within = |lo: f64, hi: f64, v: f64| {
            v >= lo.min(hi) - INTERSECTION_EPS && v <= lo.max(hi) + INTERSECTION_EPS
        };
        if within(x1, x2, px) && within(y1, y2, py) && within(x3, x4, px) && within(y3, y4, py) {
            Some(Point::new(px, py))
        } else {
            None
        }
    }
}
