//! Filesystem image loader.

use lumina_core::import::BoxFuture;
use lumina_core::shapes::{Image, ImageFormat};
use lumina_core::{ImageLoader, ImageResource, ImportError};
use std::path::Path;

/// Reads image files from disk and embeds them as `data:` URIs.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsImageLoader;

impl FsImageLoader {
    pub fn new() -> Self {
        Self
    }

    pub fn load_path(&self, path: &Path) -> Result<ImageResource, ImportError> {
        let bytes = std::fs::read(path).map_err(|e| ImportError::Io(format!("{}: {e}", path.display())))?;
        let extension = path.extension().and_then(|ext| ext.to_str());
        let resource = resource_from_bytes(&bytes, extension)?;
        log::info!(
            "Loaded {} ({}x{}, {} bytes)",
            path.display(),
            resource.width,
            resource.height,
            bytes.len()
        );
        Ok(resource)
    }
}

impl ImageLoader for FsImageLoader {
    fn load<'a>(&'a self, path: &'a Path) -> BoxFuture<'a, Result<ImageResource, ImportError>> {
        Box::pin(async move { self.load_path(path) })
    }
}

/// Build a resource from encoded bytes.
///
/// The format comes from the file signature, falling back to the
/// extension hint. The bytes are decoded once to learn the pixel size.
pub fn resource_from_bytes(bytes: &[u8], extension: Option<&str>) -> Result<ImageResource, ImportError> {
    let format = ImageFormat::from_magic_bytes(bytes)
        .or_else(|| extension.and_then(ImageFormat::from_extension))
        .ok_or_else(|| ImportError::UnsupportedFormat(extension.unwrap_or("unknown").to_string()))?;

    let decoded = image::load_from_memory_with_format(bytes, decoder_format(format))
        .map_err(|e| ImportError::Decode(e.to_string()))?;

    Ok(ImageResource {
        uri: Image::data_uri(format, bytes),
        width: decoded.width(),
        height: decoded.height(),
        format,
    })
}

fn decoder_format(format: ImageFormat) -> image::ImageFormat {
    match format {
        ImageFormat::Png => image::ImageFormat::Png,
        ImageFormat::Jpeg => image::ImageFormat::Jpeg,
        ImageFormat::WebP => image::ImageFormat::WebP,
    }
}
