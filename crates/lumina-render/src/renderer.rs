//! Renderer trait abstraction.

use lumina_core::Scene;
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Invalid target size: {width}x{height}")]
    InvalidSize { width: u32, height: u32 },
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Result of rendering a frame: straight (non-premultiplied) RGBA pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFrame {
    /// RGBA pixel data (4 bytes per pixel).
    pub rgba_data: Vec<u8>,
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
}

impl RenderedFrame {
    /// Pixel at (x, y), or None if out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.rgba_data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }
}

/// Context for a single render.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    /// The scene to render.
    pub scene: &'a Scene,
    /// Output pixels per scene unit.
    pub scale: f64,
}

impl<'a> RenderContext<'a> {
    pub fn new(scene: &'a Scene) -> Self {
        Self { scene, scale: 1.0 }
    }

    /// Set the output scale.
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    /// Output size in whole pixels.
    pub fn pixel_size(&self) -> (u32, u32) {
        let size = self.scene.size;
        (
            (size.width * self.scale).round().max(0.0) as u32,
            (size.height * self.scale).round().max(0.0) as u32,
        )
    }
}

/// Trait for rendering backends.
pub trait Renderer {
    /// Render the scene in paint order. Must not mutate the scene.
    fn render(&mut self, ctx: &RenderContext) -> RenderResult<RenderedFrame>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_lookup() {
        let frame = RenderedFrame {
            rgba_data: (0..16).collect(),
            width: 2,
            height: 2,
        };
        assert_eq!(frame.pixel(1, 1), Some([12, 13, 14, 15]));
        assert_eq!(frame.pixel(2, 0), None);
    }

    #[test]
    fn test_pixel_offset_past_u32_range() {
        // Offset of the last row is far beyond u32::MAX bytes.
        let frame = RenderedFrame {
            rgba_data: Vec::new(),
            width: u32::MAX / 2,
            height: 4,
        };
        assert_eq!(frame.pixel(10, 3), None);
    }
}
