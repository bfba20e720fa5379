//! Object placement: position, intrinsic size, scale factors and rotation.

use crate::error::{SceneError, SceneResult};
use kurbo::{Affine, Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Geometry of a scene object.
///
/// `width` and `height` are the intrinsic (unscaled) size. The rendered size
/// is `width * scale_x` by `height * scale_y`, and `angle` rotates the scaled
/// box around its center. Stroke widths are applied after the transform, so
/// resizing through scale factors never thickens outlines.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    /// Top-left corner of the unrotated, scaled box.
    pub position: Point,
    /// Intrinsic width.
    pub width: f64,
    /// Intrinsic height.
    pub height: f64,
    /// Horizontal scale factor.
    pub scale_x: f64,
    /// Vertical scale factor.
    pub scale_y: f64,
    /// Rotation in degrees, clockwise, around the center.
    pub angle: f64,
}

impl Default for Geometry {
    fn default() -> Self {
        Self::new(Point::ZERO, 0.0, 0.0)
    }
}

impl Geometry {
    pub fn new(position: Point, width: f64, height: f64) -> Self {
        Self {
            position,
            width,
            height,
            scale_x: 1.0,
            scale_y: 1.0,
            angle: 0.0,
        }
    }

    pub fn scaled_width(&self) -> f64 {
        self.width * self.scale_x
    }

    pub fn scaled_height(&self) -> f64 {
        self.height * self.scale_y
    }

    pub fn scaled_size(&self) -> Size {
        Size::new(self.scaled_width(), self.scaled_height())
    }

    /// Center of the object in scene coordinates.
    pub fn center(&self) -> Point {
        self.position + Vec2::new(self.scaled_width() / 2.0, self.scaled_height() / 2.0)
    }

    /// Local-to-scene transform: scale, then rotate around the scaled center,
    /// then translate to `position`.
    pub fn transform(&self) -> Affine {
        let half = Point::new(self.scaled_width() / 2.0, self.scaled_height() / 2.0);
        Affine::translate(self.position.to_vec2())
            * Affine::rotate_about(self.angle.to_radians(), half)
            * Affine::scale_non_uniform(self.scale_x, self.scale_y)
    }

    /// Rotation-only part of the transform, applied to scaled coordinates.
    /// Used for drawing strokes at constant width.
    pub fn placement(&self) -> Affine {
        let half = Point::new(self.scaled_width() / 2.0, self.scaled_height() / 2.0);
        Affine::translate(self.position.to_vec2()) * Affine::rotate_about(self.angle.to_radians(), half)
    }

    /// Axis-aligned bounding box in scene coordinates.
    pub fn bounds(&self) -> Rect {
        self.transform()
            .transform_rect_bbox(Rect::new(0.0, 0.0, self.width, self.height))
    }

    /// Map a scene point into the unrotated, scaled frame of this object.
    pub fn to_local(&self, point: Point) -> Point {
        self.placement().inverse() * point
    }

    /// Check if a scene point lies inside the rotated box, within `tolerance`.
    pub fn contains(&self, point: Point, tolerance: f64) -> bool {
        let local = self.to_local(point);
        Rect::new(0.0, 0.0, self.scaled_width(), self.scaled_height())
            .inflate(tolerance, tolerance)
            .contains(local)
    }

    /// Scale factor that makes the rendered width equal `desired`.
    pub fn scale_for_width(&self, desired: f64) -> SceneResult<f64> {
        scale_for(desired, self.width, "width")
    }

    /// Scale factor that makes the rendered height equal `desired`.
    pub fn scale_for_height(&self, desired: f64) -> SceneResult<f64> {
        scale_for(desired, self.height, "height")
    }

    /// Check the size and scale invariants.
    pub fn validate(&self) -> SceneResult<()> {
        let finite = [
            self.position.x,
            self.position.y,
            self.width,
            self.height,
            self.scale_x,
            self.scale_y,
            self.angle,
        ]
        .iter()
        .all(|v| v.is_finite());
        if !finite {
            return Err(SceneError::InvalidGeometry("non-finite value".into()));
        }
        if self.width < 0.0 || self.height < 0.0 {
            return Err(SceneError::InvalidGeometry(format!(
                "negative size {}x{}",
                self.width, self.height
            )));
        }
        if self.scale_x <= 0.0 || self.scale_y <= 0.0 {
            return Err(SceneError::InvalidGeometry(format!(
                "non-positive scale {}x{}",
                self.scale_x, self.scale_y
            )));
        }
        Ok(())
    }
}

fn scale_for(desired: f64, intrinsic: f64, axis: &str) -> SceneResult<f64> {
    if !desired.is_finite() || desired <= 0.0 {
        return Err(SceneError::InvalidGeometry(format!(
            "{axis} must be positive, got {desired}"
        )));
    }
    if intrinsic <= f64::EPSILON {
        return Err(SceneError::InvalidGeometry(format!(
            "object has no intrinsic {axis}"
        )));
    }
    Ok(desired / intrinsic)
}
