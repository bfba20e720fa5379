//! Editor configuration.

use crate::error::ConfigError;
use crate::object::ObjectAttrs;
use crate::scene::Scene;
use crate::shapes::{ObjectStyle, SerializableColor, Text, hex_color, hex_color_opt};
use crate::tools::{BrushSettings, ShapeKind};
use kurbo::{Point, Size};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default placement of a palette shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Placement {
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }
}

/// Defaults for shapes created from the palette or a placement click.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapeDefaults {
    pub rect: Placement,
    pub ellipse: Placement,
    pub triangle: Placement,
    #[serde(with = "hex_color_opt")]
    pub fill: Option<SerializableColor>,
    #[serde(with = "hex_color")]
    pub stroke: SerializableColor,
    pub stroke_width: f64,
}

impl Default for ShapeDefaults {
    fn default() -> Self {
        Self {
            rect: Placement::new(100.0, 100.0, 100.0, 60.0),
            ellipse: Placement::new(150.0, 150.0, 100.0, 100.0),
            triangle: Placement::new(200.0, 200.0, 100.0, 100.0),
            fill: None,
            stroke: SerializableColor::white(),
            stroke_width: 1.0,
        }
    }
}

impl ShapeDefaults {
    pub fn placement(&self, kind: ShapeKind) -> Placement {
        match kind {
            ShapeKind::Rect => self.rect,
            ShapeKind::Ellipse => self.ellipse,
            ShapeKind::Triangle => self.triangle,
        }
    }

    pub fn style(&self) -> ObjectStyle {
        ObjectStyle::new(self.fill, self.stroke, self.stroke_width)
    }
}

/// Defaults for inserted text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextDefaults {
    pub content: String,
    pub left: f64,
    pub top: f64,
    pub font_family: String,
    pub font_size: f64,
    #[serde(with = "hex_color")]
    pub fill: SerializableColor,
}

impl Default for TextDefaults {
    fn default() -> Self {
        Self {
            content: "Text".into(),
            left: 100.0,
            top: 100.0,
            font_family: Text::DEFAULT_FONT_FAMILY.into(),
            font_size: 40.0,
            fill: SerializableColor::black(),
        }
    }
}

impl TextDefaults {
    pub fn payload(&self) -> Text {
        let mut text = Text::new(self.content.clone(), self.font_size);
        text.font_family = self.font_family.clone();
        text
    }

    pub fn attrs_at(&self, position: Point) -> ObjectAttrs {
        ObjectAttrs::at(position, 0.0, 0.0)
            .with_style(ObjectStyle::new(Some(self.fill), self.fill, 0.0))
    }
}

/// Editor configuration, loadable from JSON. Missing fields take defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub canvas_width: f64,
    pub canvas_height: f64,
    #[serde(with = "hex_color")]
    pub background: SerializableColor,
    #[serde(with = "hex_color")]
    pub brush_color: SerializableColor,
    pub brush_width: f64,
    /// Imported images are scaled to this rendered width.
    pub image_max_width: f64,
    /// Maximum number of history entries.
    pub history_limit: usize,
    /// Pointer hit tolerance in scene units.
    pub hit_tolerance: f64,
    /// Placement drags smaller than this are treated as clicks.
    pub min_drag_size: f64,
    /// Snap rotation drags to 15 degree steps.
    pub snap_rotation: bool,
    pub shapes: ShapeDefaults,
    pub text: TextDefaults,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            canvas_width: 800.0,
            canvas_height: 600.0,
            background: SerializableColor::white(),
            brush_color: SerializableColor::black(),
            brush_width: 5.0,
            image_max_width: 300.0,
            history_limit: crate::history::MAX_HISTORY,
            hit_tolerance: 4.0,
            min_drag_size: 5.0,
            snap_rotation: false,
            shapes: ShapeDefaults::default(),
            text: TextDefaults::default(),
        }
    }
}

impl EditorConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {e}", path.display())))?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.canvas_width > 0.0 && self.canvas_height > 0.0) {
            return Err(ConfigError::Parse(format!(
                "canvas size must be positive, got {}x{}",
                self.canvas_width, self.canvas_height
            )));
        }
        if !(self.image_max_width > 0.0) {
            return Err(ConfigError::Parse("image_max_width must be positive".into()));
        }
        if !(self.brush_width >= 0.0) {
            return Err(ConfigError::Parse("brush_width must be non-negative".into()));
        }
        Ok(())
    }

    pub fn canvas_size(&self) -> Size {
        Size::new(self.canvas_width, self.canvas_height)
    }

    pub fn brush(&self) -> BrushSettings {
        BrushSettings {
            color: self.brush_color,
            width: self.brush_width,
        }
    }

    /// An empty scene with the configured canvas.
    pub fn scene(&self) -> Scene {
        Scene::new(self.canvas_size(), self.background)
    }

    /// Default attributes for a palette shape.
    pub fn shape_attrs(&self, kind: ShapeKind) -> ObjectAttrs {
        let placement = self.shapes.placement(kind);
        ObjectAttrs::at(Point::new(placement.left, placement.top), placement.width, placement.height)
            .with_style(self.shapes.style())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = EditorConfig::default();
        assert_eq!(config.canvas_size(), Size::new(800.0, 600.0));
        assert_eq!(config.image_max_width, 300.0);
        assert_eq!(config.brush(), BrushSettings::default());
        let attrs = config.shape_attrs(ShapeKind::Rect);
        assert_eq!(attrs.geometry.position, Point::new(100.0, 100.0));
        assert_eq!((attrs.geometry.width, attrs.geometry.height), (100.0, 60.0));
        assert_eq!(attrs.style.fill, None);
        assert_eq!(attrs.style.stroke, SerializableColor::white());
    }

    #[test]
    fn test_partial_json() {
        let config = EditorConfig::from_json(
            r##"{"background": "#101010", "history_limit": 5, "shapes": {"fill": "#ff0000"}}"##,
        )
        .unwrap();
        assert_eq!(config.background, SerializableColor::new(16, 16, 16, 255));
        assert_eq!(config.history_limit, 5);
        assert_eq!(config.shapes.fill, Some(SerializableColor::new(255, 0, 0, 255)));
        assert_eq!(config.shapes.rect, ShapeDefaults::default().rect);
        assert_eq!(config.text, TextDefaults::default());
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            EditorConfig::from_json(r#"{"background": "nope"}"#),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            EditorConfig::from_json(r#"{"canvas_width": 0}"#),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"image_max_width": 120}}"#).unwrap();
        let config = EditorConfig::load(file.path()).unwrap();
        assert_eq!(config.image_max_width, 120.0);

        let missing = EditorConfig::load(Path::new("/definitely/not/here.json"));
        assert!(matches!(missing, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_config_round_trip_json() {
        let config = EditorConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains(r##""background":"#ffffff""##));
        assert_eq!(EditorConfig::from_json(&json).unwrap(), config);
    }
}
