//! Non-destructive image filter descriptors.

use crate::error::{SceneError, SceneResult};
use serde::{Deserialize, Serialize};

/// One entry in an image's filter list.
///
/// Filters are applied to the decoded pixels in list order every time the
/// image is composited; the source data is never modified.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ImageFilter {
    Grayscale,
    Sepia,
    Invert,
    /// Blur strength in [0, 1], relative to the image size.
    Blur { amount: f64 },
    /// Noise amplitude in channel units (0 = none).
    Noise { amount: f64 },
    /// Edge length of the averaged pixel blocks.
    Pixelate { block_size: u32 },
}

impl ImageFilter {
    /// Default blur strength.
    pub const DEFAULT_BLUR: f64 = 0.1;
    /// Default noise amplitude.
    pub const DEFAULT_NOISE: f64 = 100.0;
    /// Default pixelation block size.
    pub const DEFAULT_BLOCK_SIZE: u32 = 4;

    /// Look up a filter by its palette name, with default parameters.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "grayscale" => Some(ImageFilter::Grayscale),
            "sepia" => Some(ImageFilter::Sepia),
            "invert" => Some(ImageFilter::Invert),
            "blur" => Some(ImageFilter::Blur {
                amount: Self::DEFAULT_BLUR,
            }),
            "noise" => Some(ImageFilter::Noise {
                amount: Self::DEFAULT_NOISE,
            }),
            "pixelate" => Some(ImageFilter::Pixelate {
                block_size: Self::DEFAULT_BLOCK_SIZE,
            }),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ImageFilter::Grayscale => "Grayscale",
            ImageFilter::Sepia => "Sepia",
            ImageFilter::Invert => "Invert",
            ImageFilter::Blur { .. } => "Blur",
            ImageFilter::Noise { .. } => "Noise",
            ImageFilter::Pixelate { .. } => "Pixelate",
        }
    }

    /// Check the parameter ranges.
    pub fn validate(&self) -> SceneResult<()> {
        match *self {
            ImageFilter::Blur { amount } if !(0.0..=1.0).contains(&amount) => Err(
                SceneError::InvalidFilter(format!("blur amount {amount} outside [0, 1]")),
            ),
            ImageFilter::Noise { amount } if !amount.is_finite() || amount < 0.0 => Err(
                SceneError::InvalidFilter(format!("noise amount {amount} is negative")),
            ),
            ImageFilter::Pixelate { block_size: 0 } => Err(SceneError::InvalidFilter(
                "pixelate block size must be at least 1".into(),
            )),
            _ => Ok(()),
        }
    }
}
