//! Scene objects and the attribute sets used to create and update them.

use crate::error::{SceneError, SceneResult};
use crate::filters::ImageFilter;
use crate::shapes::{
    FontStyle, FontWeight, Geometry, ObjectId, ObjectKind, ObjectStyle, SerializableColor, Shadow,
    Shape,
};
use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};

/// One drawable entity in the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    pub(crate) id: ObjectId,
    /// Paint order rank. Unique within a scene, not necessarily contiguous.
    pub(crate) z_index: i64,
    pub geometry: Geometry,
    pub style: ObjectStyle,
    /// Drop shadow. Kept when disabled so its settings survive toggling.
    #[serde(default)]
    pub shadow: Option<Shadow>,
    pub shape: Shape,
}

impl SceneObject {
    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn z_index(&self) -> i64 {
        self.z_index
    }

    pub fn kind(&self) -> ObjectKind {
        self.shape.kind()
    }

    /// Rendered (scaled) size.
    pub fn size(&self) -> Size {
        self.geometry.scaled_size()
    }

    /// Axis-aligned bounds in scene coordinates.
    pub fn bounds(&self) -> Rect {
        self.geometry.bounds()
    }

    /// Check if a scene point hits this object.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        self.geometry.contains(point, tolerance + self.style.stroke_width / 2.0)
    }

    /// Check every attribute invariant.
    pub fn validate(&self) -> SceneResult<()> {
        self.geometry.validate()?;
        let stroke_width = self.style.stroke_width;
        if !stroke_width.is_finite() || stroke_width < 0.0 {
            return Err(SceneError::InvalidGeometry(format!(
                "stroke width must be non-negative, got {stroke_width}"
            )));
        }
        if let Some(shadow) = &self.shadow {
            let finite = shadow.blur.is_finite() && shadow.offset_x.is_finite() && shadow.offset_y.is_finite();
            if !finite || shadow.blur < 0.0 {
                return Err(SceneError::InvalidGeometry(format!(
                    "invalid shadow blur {} offset ({}, {})",
                    shadow.blur, shadow.offset_x, shadow.offset_y
                )));
            }
        }
        match &self.shape {
            Shape::Text(text) if !(text.font_size.is_finite() && text.font_size > 0.0) => Err(
                SceneError::InvalidGeometry(format!("font size must be positive, got {}", text.font_size)),
            ),
            Shape::Image(image) => image.filters.iter().try_for_each(ImageFilter::validate),
            _ => Ok(()),
        }
    }

    /// Recompute the intrinsic size from the payload, for kinds that dictate one.
    pub(crate) fn sync_intrinsic_size(&mut self) {
        if let Some(size) = self.shape.intrinsic_size() {
            self.geometry.width = size.width;
            self.geometry.height = size.height;
        }
    }
}

/// Initial attributes for a new object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectAttrs {
    /// Placement. `width`/`height` are ignored for kinds with an intrinsic size.
    pub geometry: Geometry,
    pub style: ObjectStyle,
    pub shadow: Option<Shadow>,
}

impl ObjectAttrs {
    pub fn at(position: Point, width: f64, height: f64) -> Self {
        Self {
            geometry: Geometry::new(position, width, height),
            ..Default::default()
        }
    }

    pub fn with_style(mut self, style: ObjectStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_shadow(mut self, shadow: Shadow) -> Self {
        self.shadow = Some(shadow);
        self
    }

    pub fn with_scale(mut self, scale_x: f64, scale_y: f64) -> Self {
        self.geometry.scale_x = scale_x;
        self.geometry.scale_y = scale_y;
        self
    }
}

/// Partial update of an object's attributes. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectPatch {
    pub position: Option<Point>,
    pub scale_x: Option<f64>,
    pub scale_y: Option<f64>,
    pub angle: Option<f64>,
    /// `Some(None)` clears the fill.
    pub fill: Option<Option<SerializableColor>>,
    pub stroke: Option<SerializableColor>,
    pub stroke_width: Option<f64>,
    pub opacity: Option<f64>,
    /// `Some(None)` removes the shadow entirely.
    pub shadow: Option<Option<Shadow>>,
    pub content: Option<String>,
    pub font_family: Option<String>,
    pub font_size: Option<f64>,
    pub font_weight: Option<FontWeight>,
    pub font_style: Option<FontStyle>,
    pub underline: Option<bool>,
    /// Replaces the whole filter list of an image.
    pub filters: Option<Vec<ImageFilter>>,
}

impl ObjectPatch {
    /// Patch that restores position, scale and rotation from `geometry`.
    pub fn placement(geometry: &Geometry) -> Self {
        Self {
            position: Some(geometry.position),
            scale_x: Some(geometry.scale_x),
            scale_y: Some(geometry.scale_y),
            angle: Some(geometry.angle),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    fn touches_text(&self) -> bool {
        self.content.is_some()
            || self.font_family.is_some()
            || self.font_size.is_some()
            || self.font_weight.is_some()
            || self.font_style.is_some()
            || self.underline.is_some()
    }

    /// Apply the patch in place. Callers validate afterwards and discard the
    /// object on failure, so a partially applied patch never escapes.
    pub(crate) fn apply_to(&self, object: &mut SceneObject) -> SceneResult<()> {
        let geometry = &mut object.geometry;
        if let Some(position) = self.position {
            geometry.position = position;
        }
        if let Some(scale_x) = self.scale_x {
            geometry.scale_x = scale_x;
        }
        if let Some(scale_y) = self.scale_y {
            geometry.scale_y = scale_y;
        }
        if let Some(angle) = self.angle {
            geometry.angle = angle;
        }

        let style = &mut object.style;
        if let Some(fill) = self.fill {
            style.fill = fill;
        }
        if let Some(stroke) = self.stroke {
            style.stroke = stroke;
        }
        if let Some(stroke_width) = self.stroke_width {
            style.stroke_width = stroke_width;
        }
        if let Some(opacity) = self.opacity {
            style.set_opacity(opacity);
        }
        if let Some(shadow) = self.shadow {
            object.shadow = shadow;
        }

        if self.touches_text() {
            let id = object.id;
            let Shape::Text(text) = &mut object.shape else {
                return Err(SceneError::WrongKind {
                    id,
                    expected: ObjectKind::Text,
                });
            };
            if let Some(content) = &self.content {
                text.content = content.clone();
            }
            if let Some(font_family) = &self.font_family {
                text.font_family = font_family.clone();
            }
            if let Some(font_size) = self.font_size {
                text.font_size = font_size;
            }
            if let Some(font_weight) = self.font_weight {
                text.font_weight = font_weight;
            }
            if let Some(font_style) = self.font_style {
                text.font_style = font_style;
            }
            if let Some(underline) = self.underline {
                text.underline = underline;
            }
            object.sync_intrinsic_size();
        }

        if let Some(filters) = &self.filters {
            let id = object.id;
            let image = object.shape.as_image_mut().ok_or(SceneError::WrongKind {
                id,
                expected: ObjectKind::Image,
            })?;
            image.filters = filters.clone();
        }

        Ok(())
    }
}
