use crate::geometry::{LineSegment, Point};

pub const SNAP_RADIUS: f64 = 20.0;

/// Points that line endpoints are pulled onto while sketching.
///
/// Intersections are collected as lines are committed; the label anchors
/// move with zoom and scroll so callers pass them per query.
#[derive(Clone, Debug, Default)]
pub struct SnapPoints {
    intersections: Vec<Point>,
    radius: f64,
}

impl SnapPoints {
    pub fn new(radius: f64) -> Self {
        Self {
            intersections: Vec::new(),
            radius,
        }
    }

    pub fn intersections(&self) -> &[Point] {
        &self.intersections
    }

    pub fn add_line(&mut self, line: &LineSegment, existing: &[LineSegment]) -> usize {
        let before = self.intersections.len();
        self.intersections
            .extend(existing.iter().filter_map(|other| line.intersection(other)));
        self.intersections.len() - before
    }

    pub fn clear(&mut self) {
        self.intersections.clear();
    }

    pub fn snap(&self, point: Point, anchors: &[Point]) -> Point {
        let limit = self.radius * self.radius;
        anchors
            .iter()
            .chain(self.intersections.iter())
            .map(|candidate| (candidate.distance_squared(point), *candidate))
            .filter(|(distance, _)| *distance <= limit)
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, candidate)| candidate)
            .unwrap_or(point)
    }
}
