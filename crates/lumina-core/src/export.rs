//! Raster export contract.

use crate::error::ExportError;
use crate::scene::Scene;
use serde::{Deserialize, Serialize};

/// Output encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    #[default]
    Png,
    Jpeg,
}

/// Caller-supplied export settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    pub format: ExportFormat,
    /// Encoder quality in [0, 1]; only used by lossy formats.
    pub quality: f64,
    /// Output pixels per scene unit.
    pub scale: f64,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            format: ExportFormat::Png,
            quality: 0.8,
            scale: 1.0,
        }
    }
}

impl ExportOptions {
    /// Quality mapped to the 1..=100 range used by encoders.
    pub fn encoder_quality(&self) -> u8 {
        (self.quality.clamp(0.0, 1.0) * 100.0).round().max(1.0) as u8
    }

    /// Scale factor to render with; invalid scales fall back to 1.
    pub fn effective_scale(&self) -> f64 {
        if self.scale.is_finite() && self.scale > 0.0 { self.scale } else { 1.0 }
    }

    /// Output pixel size for a scene.
    pub fn pixel_size(&self, scene: &Scene) -> (u32, u32) {
        let scale = self.effective_scale();
        (
            (scene.size.width * scale).round().max(0.0) as u32,
            (scene.size.height * scale).round().max(0.0) as u32,
        )
    }
}

/// Renders a scene to encoded bytes without mutating it.
pub trait SceneExporter {
    fn export(&self, scene: &Scene, options: &ExportOptions) -> Result<Vec<u8>, ExportError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoder_quality() {
        let mut options = ExportOptions::default();
        assert_eq!(options.encoder_quality(), 80);
        options.quality = 0.0;
        assert_eq!(options.encoder_quality(), 1);
        options.quality = 7.0;
        assert_eq!(options.encoder_quality(), 100);
    }

    #[test]
    fn test_pixel_size() {
        let scene = Scene::default();
        let options = ExportOptions {
            scale: 0.5,
            ..Default::default()
        };
        assert_eq!(options.pixel_size(&scene), (400, 300));
        let options = ExportOptions {
            scale: -1.0,
            ..Default::default()
        };
        assert_eq!(options.pixel_size(&scene), (800, 600));
    }
}
