//! Paint style and drop shadow attributes.

use super::SerializableColor;
use peniko::Color;
use serde::{Deserialize, Serialize};

/// Fill, stroke and opacity of an object.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObjectStyle {
    /// Fill color (None = transparent).
    pub fill: Option<SerializableColor>,
    /// Stroke color.
    pub stroke: SerializableColor,
    /// Stroke width in scene units, independent of object scale.
    pub stroke_width: f64,
    /// Overall opacity, always within [0, 1].
    #[serde(default = "default_opacity")]
    opacity: f64,
}

fn default_opacity() -> f64 {
    1.0
}

impl Default for ObjectStyle {
    fn default() -> Self {
        Self {
            fill: None,
            stroke: SerializableColor::black(),
            stroke_width: 1.0,
            opacity: 1.0,
        }
    }
}

impl ObjectStyle {
    pub fn new(fill: Option<SerializableColor>, stroke: SerializableColor, stroke_width: f64) -> Self {
        Self {
            fill,
            stroke,
            stroke_width,
            opacity: 1.0,
        }
    }

    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.set_opacity(opacity);
        self
    }

    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    /// Set the opacity, clamped to [0, 1]. NaN is treated as fully opaque.
    pub fn set_opacity(&mut self, opacity: f64) {
        self.opacity = if opacity.is_nan() { 1.0 } else { opacity.clamp(0.0, 1.0) };
    }

    /// Get the fill color with opacity applied.
    pub fn fill_with_opacity(&self) -> Option<Color> {
        self.fill.map(|c| c.with_opacity(self.opacity).into())
    }

    /// Get the stroke color with opacity applied.
    pub fn stroke_with_opacity(&self) -> Color {
        self.stroke.with_opacity(self.opacity).into()
    }
}

/// Drop shadow attributes.
///
/// Disabling a shadow keeps its color, blur and offsets so that re-enabling
/// restores the previous look.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Shadow {
    pub enabled: bool,
    pub color: SerializableColor,
    /// Blur radius in scene units.
    pub blur: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Default for Shadow {
    fn default() -> Self {
        Self {
            enabled: false,
            color: SerializableColor::black(),
            blur: 10.0,
            offset_x: 5.0,
            offset_y: 5.0,
        }
    }
}

impl Shadow {
    /// The shadow to paint, if any.
    pub fn effective(shadow: Option<&Shadow>) -> Option<&Shadow> {
        shadow.filter(|s| s.enabled)
    }
}
