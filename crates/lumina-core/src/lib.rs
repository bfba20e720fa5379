//! Lumina Core Library
//!
//! Scene model, snapshot history, tool/mode state machine and property sync
//! for the Lumina image editor. Rasterization and file access live in
//! `lumina-render`; this crate only decides what is drawn and when it changes.

pub mod config;
pub mod editor;
pub mod error;
pub mod export;
pub mod filters;
pub mod history;
pub mod import;
pub mod layers;
pub mod object;
pub mod properties;
pub mod scene;
pub mod selection;
pub mod shapes;
pub mod tools;

pub use config::EditorConfig;
pub use editor::{Editor, EditorEvent, Notice};
pub use error::{ConfigError, EditorError, ExportError, HistoryError, ImportError, SceneError};
pub use export::{ExportFormat, ExportOptions, SceneExporter};
pub use filters::ImageFilter;
pub use history::{History, HistoryEntry};
pub use import::{ImageLoader, ImageResource, ImportTicket};
pub use layers::{LayerInfo, list_layers};
pub use object::{ObjectAttrs, ObjectPatch, SceneObject};
pub use properties::PropertyEdit;
pub use scene::Scene;
pub use selection::{ObjectDescriptor, SelectionDescriptor};
pub use shapes::{ObjectId, ObjectKind, SerializableColor, Shape};
pub use tools::{BrushSettings, ShapeKind, ToolMode};
