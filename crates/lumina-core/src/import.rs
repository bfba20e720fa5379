//! Image import contract.
//!
//! The editor never touches the filesystem. A loader turns a user-chosen
//! path into an [`ImageResource`]; the editor turns that into exactly one
//! image object.

use crate::error::ImportError;
use crate::shapes::ImageFormat;
use std::future::Future;
use std::path::Path;
use std::pin::Pin;

/// Boxed future for async operations (compatible with WASM).
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// A decoded image ready to be placed in the scene.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageResource {
    /// Source URI, usually a base64 `data:` URI.
    pub uri: String,
    pub width: u32,
    pub height: u32,
    pub format: ImageFormat,
}

/// Handle for an outstanding file request.
///
/// Issued when image-insert mode opens the file side channel. A ticket is
/// invalidated when the user switches mode before it resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImportTicket(pub(crate) u64);

impl ImportTicket {
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Loads an image file into a resource.
pub trait ImageLoader {
    fn load<'a>(&'a self, path: &'a Path) -> BoxFuture<'a, Result<ImageResource, ImportError>>;
}
