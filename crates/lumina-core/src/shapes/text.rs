//! Text payload.

use kurbo::Size;
use serde::{Deserialize, Serialize};

/// Line height as a multiple of the font size.
pub const LINE_HEIGHT: f64 = 1.16;

/// Font weight options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

/// Font style options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
}

/// An editable text object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Text {
    /// The text content. Lines are separated by `\n`.
    pub content: String,
    /// Font family name, resolved by the host's glyph renderer.
    pub font_family: String,
    /// Font size in pixels.
    pub font_size: f64,
    #[serde(default)]
    pub font_weight: FontWeight,
    #[serde(default)]
    pub font_style: FontStyle,
    #[serde(default)]
    pub underline: bool,
}

impl Text {
    /// Default font family name.
    pub const DEFAULT_FONT_FAMILY: &'static str = "Times New Roman";

    pub fn new(content: impl Into<String>, font_size: f64) -> Self {
        Self {
            content: content.into(),
            font_family: Self::DEFAULT_FONT_FAMILY.to_string(),
            font_size,
            font_weight: FontWeight::default(),
            font_style: FontStyle::default(),
            underline: false,
        }
    }

    /// Approximate layout size of the content.
    ///
    /// Glyph shaping belongs to the host renderer; the core only needs a stable
    /// intrinsic size for scaling, hit testing and handles.
    pub fn measure(&self) -> Size {
        let widest = self
            .content
            .lines()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0);
        let char_width_factor = match (self.font_weight, self.font_style) {
            (FontWeight::Normal, FontStyle::Normal) => 0.50,
            (FontWeight::Normal, FontStyle::Italic) => 0.48,
            (FontWeight::Bold, FontStyle::Normal) => 0.56,
            (FontWeight::Bold, FontStyle::Italic) => 0.54,
        };
        let mut line_count = self.content.lines().count().max(1);
        if self.content.ends_with('\n') {
            line_count += 1;
        }
        Size::new(
            widest as f64 * self.font_size * char_width_factor,
            line_count as f64 * self.font_size * LINE_HEIGHT,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure_grows_with_content() {
        let short = Text::new("Text", 40.0).measure();
        let long = Text::new("Longer text", 40.0).measure();
        assert!(long.width > short.width);
        assert_eq!(short.height, long.height);
    }

    #[test]
    fn test_measure_multiline() {
        let one = Text::new("a", 10.0).measure();
        let two = Text::new("a\nb", 10.0).measure();
        let trailing = Text::new("a\n", 10.0).measure();
        assert!((two.height - 2.0 * one.height).abs() < 1e-9);
        assert!((trailing.height - two.height).abs() < 1e-9);
    }

    #[test]
    fn test_bold_is_wider() {
        let mut text = Text::new("Hello", 20.0);
        let normal = text.measure().width;
        text.font_weight = FontWeight::Bold;
        assert!(text.measure().width > normal);
    }
}
