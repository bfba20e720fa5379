//! Freehand brush stroke payload.

use kurbo::{BezPath, Point, Rect, Size};
use serde::{Deserialize, Serialize};

/// A freehand stroke. Points are stored relative to the object's top-left corner.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Freehand {
    pub points: Vec<Point>,
}

impl Freehand {
    /// Build a stroke from scene-space points.
    /// Returns the stroke in local coordinates and the scene position of its origin.
    pub fn from_scene_points(points: &[Point]) -> (Self, Point) {
        let bounds = bounding_rect(points);
        let origin = Point::new(bounds.x0, bounds.y0);
        let local = points.iter().map(|p| *p - origin.to_vec2()).collect();
        (Self { points: local }, origin)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Local extent of the stroke.
    pub fn size(&self) -> Size {
        let bounds = bounding_rect(&self.points);
        Size::new(bounds.x1.max(0.0), bounds.y1.max(0.0))
    }

    /// Simplify the path by removing redundant points.
    pub fn simplify(&mut self, tolerance: f64) {
        if self.points.len() < 3 {
            return;
        }
        // Ramer-Douglas-Peucker algorithm
        self.points = rdp_simplify(&self.points, tolerance);
    }

    pub fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        let Some(first) = self.points.first() else {
            return path;
        };
        path.move_to(*first);
        for point in self.points.iter().skip(1) {
            path.line_to(*point);
        }
        path
    }
}

fn bounding_rect(points: &[Point]) -> Rect {
    let Some(first) = points.first() else {
        return Rect::ZERO;
    };
    points
        .iter()
        .skip(1)
        .fold(Rect::from_points(*first, *first), |rect, p| rect.union_pt(*p))
}

/// Ramer-Douglas-Peucker line simplification.
fn rdp_simplify(points: &[Point], tolerance: f64) -> Vec<Point> {
    if points.len() < 3 {
        return points.to_vec();
    }

    let first = points[0];
    let last = points[points.len() - 1];

    let mut max_dist = 0.0;
    let mut max_index = 0;
    for (i, point) in points.iter().enumerate().skip(1).take(points.len() - 2) {
        let dist = perpendicular_distance(*point, first, last);
        if dist > max_dist {
            max_dist = dist;
            max_index = i;
        }
    }

    if max_dist > tolerance {
        let mut left = rdp_simplify(&points[..=max_index], tolerance);
        let right = rdp_simplify(&points[max_index..], tolerance);
        // Junction point appears in both halves
        left.pop();
        left.extend(right);
        left
    } else {
        vec![first, last]
    }
}

fn perpendicular_distance(point: Point, line_start: Point, line_end: Point) -> f64 {
    let dx = line_end.x - line_start.x;
    let dy = line_end.y - line_start.y;
    let line_len_sq = dx * dx + dy * dy;
    if line_len_sq < f64::EPSILON {
        return point.distance(line_start);
    }
    let area2 = ((point.x - line_start.x) * dy - (point.y - line_start.y) * dx).abs();
    area2 / line_len_sq.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_scene_points() {
        let (stroke, origin) = Freehand::from_scene_points(&[
            Point::new(10.0, 20.0),
            Point::new(30.0, 25.0),
            Point::new(15.0, 60.0),
        ]);
        assert_eq!(origin, Point::new(10.0, 20.0));
        assert_eq!(stroke.points[0], Point::ZERO);
        assert_eq!(stroke.size(), Size::new(20.0, 40.0));
    }

    #[test]
    fn test_simplify() {
        let mut stroke = Freehand {
            points: vec![
                Point::new(0.0, 0.0),
                Point::new(1.0, 0.01),
                Point::new(2.0, 0.0),
                Point::new(3.0, 0.02),
                Point::new(4.0, 0.0),
            ],
        };
        stroke.simplify(0.1);
        assert_eq!(stroke.points, vec![Point::new(0.0, 0.0), Point::new(4.0, 0.0)]);
    }

    #[test]
    fn test_empty_stroke() {
        let stroke = Freehand::default();
        assert!(stroke.is_empty());
        assert_eq!(stroke.size(), Size::ZERO);
        assert!(stroke.to_path().elements().is_empty());
    }
}
