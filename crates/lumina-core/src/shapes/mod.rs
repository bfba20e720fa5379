//! Object payloads and shared drawing primitives.

mod freehand;
mod geometry;
mod image;
mod style;
mod text;

pub use freehand::Freehand;
pub use geometry::Geometry;
pub use image::{Image, ImageFormat};
pub use style::{ObjectStyle, Shadow};
pub use text::{FontStyle, FontWeight, Text};

use kurbo::{BezPath, Point, Rect, Shape as KurboShape, Size};
use peniko::Color;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for scene objects.
pub type ObjectId = Uuid;

/// Path flattening tolerance for curve conversion.
pub(crate) const PATH_TOLERANCE: f64 = 0.1;

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa`. The leading `#` is optional.
    pub fn from_hex(value: &str) -> Option<Self> {
        let hex = value.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.is_ascii() {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        match hex.len() {
            3 => {
                let r = channel(&hex[0..1])?;
                let g = channel(&hex[1..2])?;
                let b = channel(&hex[2..3])?;
                Some(Self::new(r * 17, g * 17, b * 17, 255))
            }
            6 => Some(Self::new(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
                255,
            )),
            8 => Some(Self::new(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
                channel(&hex[6..8])?,
            )),
            _ => None,
        }
    }

    /// Format as `#rrggbb`, or `#rrggbbaa` when not fully opaque.
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }

    /// Multiply the alpha channel by `opacity` (clamped to [0, 1]).
    pub fn with_opacity(self, opacity: f64) -> Self {
        let alpha = (self.a as f64 * opacity.clamp(0.0, 1.0)).round() as u8;
        Self { a: alpha, ..self }
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Serde adapter storing a color as a hex string.
pub mod hex_color {
    use super::SerializableColor;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(color: &SerializableColor, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&color.to_hex())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<SerializableColor, D::Error> {
        let value = String::deserialize(deserializer)?;
        SerializableColor::from_hex(&value).ok_or_else(|| D::Error::custom(format!("invalid color {value:?}")))
    }
}

/// Serde adapter for an optional color; `null` and `"transparent"` mean none.
pub mod hex_color_opt {
    use super::SerializableColor;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(color: &Option<SerializableColor>, serializer: S) -> Result<S::Ok, S::Error> {
        match color {
            Some(color) => serializer.serialize_str(&color.to_hex()),
            None => serializer.serialize_str("transparent"),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<SerializableColor>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(None),
            Some(value) if value.eq_ignore_ascii_case("transparent") => Ok(None),
            Some(value) => SerializableColor::from_hex(&value)
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("invalid color {value:?}"))),
        }
    }
}

/// Kind of scene object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectKind {
    Rect,
    Ellipse,
    Triangle,
    Text,
    Image,
    Freehand,
}

impl ObjectKind {
    /// Human readable name, used for layer labels.
    pub fn name(self) -> &'static str {
        match self {
            ObjectKind::Rect => "Rectangle",
            ObjectKind::Ellipse => "Ellipse",
            ObjectKind::Triangle => "Triangle",
            ObjectKind::Text => "Text",
            ObjectKind::Image => "Image",
            ObjectKind::Freehand => "Drawing",
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Kind-specific payload of a scene object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Rect,
    Ellipse,
    Triangle,
    Text(Text),
    Image(Image),
    Freehand(Freehand),
}

impl Shape {
    pub fn kind(&self) -> ObjectKind {
        match self {
            Shape::Rect => ObjectKind::Rect,
            Shape::Ellipse => ObjectKind::Ellipse,
            Shape::Triangle => ObjectKind::Triangle,
            Shape::Text(_) => ObjectKind::Text,
            Shape::Image(_) => ObjectKind::Image,
            Shape::Freehand(_) => ObjectKind::Freehand,
        }
    }

    /// Intrinsic size dictated by the payload itself.
    /// Basic shapes return None and take their size from creation attributes.
    pub fn intrinsic_size(&self) -> Option<Size> {
        match self {
            Shape::Rect | Shape::Ellipse | Shape::Triangle => None,
            Shape::Text(text) => Some(text.measure()),
            Shape::Image(image) => Some(image.source_size()),
            Shape::Freehand(freehand) => Some(freehand.size()),
        }
    }

    /// Outline in object-local, unscaled coordinates (origin at top-left).
    pub fn local_path(&self, width: f64, height: f64) -> BezPath {
        let rect = Rect::new(0.0, 0.0, width, height);
        match self {
            Shape::Rect | Shape::Text(_) | Shape::Image(_) => rect.to_path(PATH_TOLERANCE),
            Shape::Ellipse => kurbo::Ellipse::from_rect(rect).to_path(PATH_TOLERANCE),
            Shape::Triangle => {
                let mut path = BezPath::new();
                path.move_to(Point::new(width / 2.0, 0.0));
                path.line_to(Point::new(width, height));
                path.line_to(Point::new(0.0, height));
                path.close_path();
                path
            }
            Shape::Freehand(freehand) => freehand.to_path(),
        }
    }

    /// Whether the outline is closed and can carry a fill.
    pub fn is_closed(&self) -> bool {
        !matches!(self, Shape::Freehand(_))
    }

    pub fn as_text(&self) -> Option<&Text> {
        match self {
            Shape::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_image(&self) -> Option<&Image> {
        match self {
            Shape::Image(image) => Some(image),
            _ => None,
        }
    }

    pub fn as_image_mut(&mut self) -> Option<&mut Image> {
        match self {
            Shape::Image(image) => Some(image),
            _ => None,
        }
    }
}
