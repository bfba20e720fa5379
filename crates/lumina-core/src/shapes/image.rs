//! Image payload for embedded raster images.

use crate::filters::ImageFilter;
use base64::{Engine, engine::general_purpose::STANDARD};
use kurbo::Size;
use serde::{Deserialize, Serialize};

/// Image format for stored image data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageFormat {
    Png,
    Jpeg,
    WebP,
}

impl ImageFormat {
    /// Get MIME type for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::WebP => "image/webp",
        }
    }

    /// Detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "png" => Some(ImageFormat::Png),
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            "webp" => Some(ImageFormat::WebP),
            _ => None,
        }
    }

    /// Detect format from a MIME type.
    pub fn from_mime_type(mime: &str) -> Option<Self> {
        match mime {
            "image/png" => Some(ImageFormat::Png),
            "image/jpeg" | "image/jpg" => Some(ImageFormat::Jpeg),
            "image/webp" => Some(ImageFormat::WebP),
            _ => None,
        }
    }

    /// Detect format from magic bytes.
    pub fn from_magic_bytes(data: &[u8]) -> Option<Self> {
        if data.len() < 4 {
            return None;
        }
        // PNG: 89 50 4E 47
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
            return Some(ImageFormat::Png);
        }
        // JPEG: FF D8 FF
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(ImageFormat::Jpeg);
        }
        // WebP: RIFF....WEBP
        if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
            return Some(ImageFormat::WebP);
        }
        None
    }
}

/// A raster image referenced by URI, plus its non-destructive filter list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    /// Source URI. Imported files are stored as `data:` URIs.
    pub source: String,
    /// Original image width in pixels.
    pub source_width: u32,
    /// Original image height in pixels.
    pub source_height: u32,
    pub format: ImageFormat,
    /// Filters applied in order at composite time.
    #[serde(default)]
    pub filters: Vec<ImageFilter>,
}

impl Image {
    pub fn new(source: impl Into<String>, source_width: u32, source_height: u32, format: ImageFormat) -> Self {
        Self {
            source: source.into(),
            source_width,
            source_height,
            format,
            filters: Vec::new(),
        }
    }

    /// Build a `data:` URI for encoded image bytes.
    pub fn data_uri(format: ImageFormat, bytes: &[u8]) -> String {
        format!("data:{};base64,{}", format.mime_type(), STANDARD.encode(bytes))
    }

    pub fn source_size(&self) -> Size {
        Size::new(self.source_width as f64, self.source_height as f64)
    }

    /// Get the encoded bytes when the source is a base64 `data:` URI.
    pub fn data(&self) -> Option<Vec<u8>> {
        let rest = self.source.strip_prefix("data:")?;
        let (_, payload) = rest.split_once(";base64,")?;
        STANDARD.decode(payload).ok()
    }

    /// Uniform scale factor that fits the image to `max_width`, preserving aspect ratio.
    pub fn scale_to_width(&self, max_width: f64) -> f64 {
        if self.source_width == 0 {
            return 1.0;
        }
        max_width / self.source_width as f64
    }
}
