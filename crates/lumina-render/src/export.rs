//! PNG and JPEG export.

use crate::raster::SkiaRenderer;
use crate::renderer::{RenderContext, RenderedFrame, Renderer};
use image::ExtendedColorType;
use image::codecs::jpeg::JpegEncoder;
use lumina_core::{ExportError, ExportFormat, ExportOptions, Scene, SceneExporter};

/// Exporter backed by [`SkiaRenderer`].
#[derive(Debug, Default, Clone, Copy)]
pub struct RasterExporter;

impl RasterExporter {
    pub fn new() -> Self {
        Self
    }
}

impl SceneExporter for RasterExporter {
    fn export(&self, scene: &Scene, options: &ExportOptions) -> Result<Vec<u8>, ExportError> {
        let (width, height) = options.pixel_size(scene);
        if width == 0 || height == 0 {
            return Err(ExportError::EmptyCanvas { width, height });
        }
        let ctx = RenderContext::new(scene).with_scale(options.effective_scale());
        let frame = SkiaRenderer::new()
            .render(&ctx)
            .map_err(|e| ExportError::Render(e.to_string()))?;

        match options.format {
            ExportFormat::Png => encode_png(&frame),
            ExportFormat::Jpeg => encode_jpeg(&frame, options.encoder_quality()),
        }
    }
}

/// Encode RGBA pixel data to PNG bytes.
pub fn encode_png(frame: &RenderedFrame) -> Result<Vec<u8>, ExportError> {
    let mut png_data = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut png_data, frame.width, frame.height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);

        let mut writer = encoder
            .write_header()
            .map_err(|e| ExportError::Encode(format!("PNG header: {e}")))?;
        writer
            .write_image_data(&frame.rgba_data)
            .map_err(|e| ExportError::Encode(format!("PNG data: {e}")))?;
    }
    Ok(png_data)
}

/// Encode to JPEG, compositing any transparency over white.
pub fn encode_jpeg(frame: &RenderedFrame, quality: u8) -> Result<Vec<u8>, ExportError> {
    let rgb: Vec<u8> = frame
        .rgba_data
        .chunks_exact(4)
        .flat_map(|px| {
            let alpha = px[3] as u16;
            let over_white = |c: u8| ((c as u16 * alpha + 255 * (255 - alpha) + 127) / 255) as u8;
            [over_white(px[0]), over_white(px[1]), over_white(px[2])]
        })
        .collect();

    let mut jpeg_data = Vec::new();
    JpegEncoder::new_with_quality(&mut jpeg_data, quality.clamp(1, 100))
        .encode(&rgb, frame.width, frame.height, ExtendedColorType::Rgb8)
        .map_err(|e| ExportError::Encode(format!("JPEG: {e}")))?;
    Ok(jpeg_data)
}
