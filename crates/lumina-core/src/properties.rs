//! Property panel edits.

use crate::error::{SceneError, SceneResult};
use crate::object::{ObjectPatch, SceneObject};
use crate::shapes::{FontStyle, FontWeight, SerializableColor, hex_color, hex_color_opt};
use crate::tools::BrushSettings;
use serde::{Deserialize, Serialize};

/// A single edit coming from the property panel.
///
/// Serialized as `{"key": "...", "value": ...}`. Colors are hex strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "key", content = "value", rename_all = "snake_case")]
pub enum PropertyEdit {
    Fill(#[serde(with = "hex_color_opt")] Option<SerializableColor>),
    Stroke(#[serde(with = "hex_color")] SerializableColor),
    StrokeWidth(f64),
    Opacity(f64),
    Angle(f64),
    Left(f64),
    Top(f64),
    /// Rendered width; translated into a horizontal scale factor.
    Width(f64),
    /// Rendered height; translated into a vertical scale factor.
    Height(f64),
    ScaleX(f64),
    ScaleY(f64),
    FontFamily(String),
    FontSize(f64),
    FontWeight(FontWeight),
    FontStyle(FontStyle),
    Underline(bool),
    Text(String),
    ShadowEnabled(bool),
    ShadowColor(#[serde(with = "hex_color")] SerializableColor),
    ShadowBlur(f64),
    ShadowOffsetX(f64),
    ShadowOffsetY(f64),
    /// Canvas background; applies regardless of selection.
    Background(#[serde(with = "hex_color")] SerializableColor),
}

impl PropertyEdit {
    /// Apply the edit to the brush.
    /// Returns true if the brush changed; keys the brush does not have are ignored.
    pub fn apply_to_brush(&self, brush: &mut BrushSettings) -> bool {
        match *self {
            PropertyEdit::Stroke(color) if brush.color != color => {
                brush.color = color;
                true
            }
            PropertyEdit::StrokeWidth(width) if width.is_finite() && width >= 0.0 && brush.width != width => {
                brush.width = width;
                true
            }
            _ => false,
        }
    }

    /// Translate the edit into a patch for `object`.
    ///
    /// Width and height become scale factors relative to the intrinsic size;
    /// non-positive targets are rejected. Shadow fields start from the
    /// object's current shadow (or the default one) so disabled settings
    /// are preserved. `Background` has no object patch and yields `None`.
    pub fn to_patch(&self, object: &SceneObject) -> SceneResult<Option<ObjectPatch>> {
        let geometry = &object.geometry;
        let mut patch = ObjectPatch::default();
        let mut shadow = object.shadow.unwrap_or_default();
        match self {
            PropertyEdit::Fill(fill) => patch.fill = Some(*fill),
            PropertyEdit::Stroke(color) => patch.stroke = Some(*color),
            PropertyEdit::StrokeWidth(width) => patch.stroke_width = Some(*width),
            PropertyEdit::Opacity(opacity) => patch.opacity = Some(*opacity),
            PropertyEdit::Angle(angle) => patch.angle = Some(*angle),
            PropertyEdit::Left(left) => {
                patch.position = Some(kurbo::Point::new(*left, geometry.position.y));
            }
            PropertyEdit::Top(top) => {
                patch.position = Some(kurbo::Point::new(geometry.position.x, *top));
            }
            PropertyEdit::Width(width) => patch.scale_x = Some(geometry.scale_for_width(*width)?),
            PropertyEdit::Height(height) => patch.scale_y = Some(geometry.scale_for_height(*height)?),
            PropertyEdit::ScaleX(scale) => patch.scale_x = Some(positive_scale(*scale)?),
            PropertyEdit::ScaleY(scale) => patch.scale_y = Some(positive_scale(*scale)?),
            PropertyEdit::FontFamily(family) => patch.font_family = Some(family.clone()),
            PropertyEdit::FontSize(size) => patch.font_size = Some(*size),
            PropertyEdit::FontWeight(weight) => patch.font_weight = Some(*weight),
            PropertyEdit::FontStyle(style) => patch.font_style = Some(*style),
            PropertyEdit::Underline(underline) => patch.underline = Some(*underline),
            PropertyEdit::Text(content) => patch.content = Some(content.clone()),
            PropertyEdit::ShadowEnabled(enabled) => {
                shadow.enabled = *enabled;
                patch.shadow = Some(Some(shadow));
            }
            PropertyEdit::ShadowColor(color) => {
                shadow.color = *color;
                patch.shadow = Some(Some(shadow));
            }
            PropertyEdit::ShadowBlur(blur) => {
                shadow.blur = *blur;
                patch.shadow = Some(Some(shadow));
            }
            PropertyEdit::ShadowOffsetX(offset) => {
                shadow.offset_x = *offset;
                patch.shadow = Some(Some(shadow));
            }
            PropertyEdit::ShadowOffsetY(offset) => {
                shadow.offset_y = *offset;
                patch.shadow = Some(Some(shadow));
            }
            PropertyEdit::Background(_) => return Ok(None),
        }
        Ok(Some(patch))
    }
}

fn positive_scale(scale: f64) -> SceneResult<f64> {
    if scale.is_finite() && scale > 0.0 {
        Ok(scale)
    } else {
        Err(SceneError::InvalidGeometry(format!("scale must be positive, got {scale}")))
    }
}
