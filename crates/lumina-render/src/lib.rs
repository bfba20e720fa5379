//! Lumina Render Library
//!
//! Software rasterization of a [`lumina_core::Scene`], the pixel side of the
//! image filters, PNG/JPEG export and filesystem image import.

pub mod export;
pub mod filters;
pub mod loader;
mod raster;
mod renderer;

pub use export::{RasterExporter, encode_jpeg, encode_png};
pub use filters::{apply_filter, apply_filters};
pub use loader::{FsImageLoader, resource_from_bytes};
pub use raster::SkiaRenderer;
pub use renderer::{RenderContext, RenderResult, RenderedFrame, Renderer, RendererError};
