//! Editing scripts: a JSON list of user actions replayed on an [`Editor`].

use kurbo::{Point, Vec2};
use lumina_core::{
    ConfigError, Editor, EditorConfig, EditorError, EditorEvent, ExportError, ExportFormat, ExportOptions,
    ImageFilter, ObjectId, PropertyEdit, ShapeKind, ToolMode,
};
use lumina_render::{FsImageLoader, RasterExporter};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Script errors.
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Invalid script: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Editor(#[from] EditorError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error("No layer at index {0}")]
    UnknownLayer(usize),
}

/// One step of a script.
///
/// Layers are addressed by their index in the layer list (0 = top), since
/// object ids are only known at run time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    SetMode {
        mode: ToolMode,
    },
    AddShape {
        shape: ShapeKind,
    },
    AddText,
    PointerDown {
        x: f64,
        y: f64,
        #[serde(default)]
        shift: bool,
    },
    PointerMove {
        x: f64,
        y: f64,
    },
    PointerUp {
        x: f64,
        y: f64,
    },
    /// Press, move and release in one step.
    Drag {
        from: Point,
        to: Point,
    },
    Edit {
        edit: PropertyEdit,
    },
    Filter {
        filter: ImageFilter,
    },
    ClearFilters,
    ImportImage {
        path: PathBuf,
    },
    SelectLayer {
        layer: usize,
    },
    BringForward {
        layer: usize,
    },
    SendBackward {
        layer: usize,
    },
    BringToFront {
        layer: usize,
    },
    SendToBack {
        layer: usize,
    },
    RemoveLayer {
        layer: usize,
    },
    Translate {
        dx: f64,
        dy: f64,
    },
    Delete,
    Undo,
    Redo,
    Export {
        path: PathBuf,
        #[serde(default)]
        options: ExportOptions,
    },
}

/// Parse a script from JSON.
pub fn parse_script(json: &str) -> Result<Vec<Action>, ScriptError> {
    Ok(serde_json::from_str(json)?)
}

/// An editor plus the filesystem backends used by scripts.
pub struct Session {
    editor: Editor,
    loader: FsImageLoader,
    exporter: RasterExporter,
    notices: Vec<String>,
}

impl Session {
    pub fn new(config: EditorConfig) -> Result<Self, ScriptError> {
        Ok(Self {
            editor: Editor::new(config)?,
            loader: FsImageLoader::new(),
            exporter: RasterExporter::new(),
            notices: Vec::new(),
        })
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    /// Notices raised so far.
    pub fn notices(&self) -> &[String] {
        &self.notices
    }

    /// Run every action in order, stopping at the first error.
    pub fn run(&mut self, actions: &[Action]) -> Result<(), ScriptError> {
        for (step, action) in actions.iter().enumerate() {
            log::debug!("Step {step}: {action:?}");
            self.apply(action)?;
        }
        Ok(())
    }

    pub fn apply(&mut self, action: &Action) -> Result<(), ScriptError> {
        let editor = &mut self.editor;
        match action {
            Action::SetMode { mode } => editor.set_mode(*mode),
            Action::AddShape { shape } => {
                editor.add_shape(*shape)?;
            }
            Action::AddText => {
                editor.add_text()?;
            }
            Action::PointerDown { x, y, shift } => editor.pointer_down(Point::new(*x, *y), *shift),
            Action::PointerMove { x, y } => editor.pointer_move(Point::new(*x, *y)),
            Action::PointerUp { x, y } => {
                editor.pointer_up(Point::new(*x, *y))?;
            }
            Action::Drag { from, to } => {
                editor.pointer_down(*from, false);
                editor.pointer_move(from.midpoint(*to));
                editor.pointer_up(*to)?;
            }
            Action::Edit { edit } => {
                editor.apply_property_edit(edit)?;
            }
            Action::Filter { filter } => {
                editor.apply_filter(*filter)?;
            }
            Action::ClearFilters => {
                editor.clear_filters()?;
            }
            Action::ImportImage { path } => {
                pollster::block_on(editor.import_image(&self.loader, path))?;
            }
            Action::SelectLayer { layer } => {
                let id = self.layer_id(*layer)?;
                self.editor.select(id);
            }
            Action::BringForward { layer } => {
                let id = self.layer_id(*layer)?;
                self.editor.bring_forward(id)?;
            }
            Action::SendBackward { layer } => {
                let id = self.layer_id(*layer)?;
                self.editor.send_backward(id)?;
            }
            Action::BringToFront { layer } => {
                let id = self.layer_id(*layer)?;
                self.editor.bring_to_front(id)?;
            }
            Action::SendToBack { layer } => {
                let id = self.layer_id(*layer)?;
                self.editor.send_to_back(id)?;
            }
            Action::RemoveLayer { layer } => {
                let id = self.layer_id(*layer)?;
                self.editor.remove_layer(id)?;
            }
            Action::Translate { dx, dy } => {
                editor.translate_selected(Vec2::new(*dx, *dy))?;
            }
            Action::Delete => {
                editor.delete_selected()?;
            }
            Action::Undo => {
                editor.undo()?;
            }
            Action::Redo => {
                editor.redo()?;
            }
            Action::Export { path, options } => self.export_to(path, options)?,
        }
        self.drain_events();
        Ok(())
    }

    /// Export the current scene to `path`.
    pub fn export_to(&mut self, path: &Path, options: &ExportOptions) -> Result<(), ScriptError> {
        let bytes = self.editor.export(&self.exporter, options)?;
        std::fs::write(path, &bytes).map_err(|e| ScriptError::Io(format!("{}: {e}", path.display())))?;
        log::info!("Wrote {} ({} bytes)", path.display(), bytes.len());
        Ok(())
    }

    fn layer_id(&self, layer: usize) -> Result<ObjectId, ScriptError> {
        self.editor
            .layers()
            .get(layer)
            .map(|info| info.id)
            .ok_or(ScriptError::UnknownLayer(layer))
    }

    fn drain_events(&mut self) {
        for event in self.editor.drain_events() {
            match event {
                EditorEvent::Notice(notice) => {
                    log::warn!("{}", notice.message);
                    self.notices.push(notice.message);
                }
                EditorEvent::ModeChanged(mode) => log::debug!("Mode changed to {}", mode.name()),
                EditorEvent::FileRequested(ticket) => log::debug!("File requested ({})", ticket.id()),
                EditorEvent::SceneChanged | EditorEvent::SelectionChanged => {}
            }
        }
    }
}

/// Pick the export format from a file extension; defaults to PNG.
pub fn format_for_path(path: &Path) -> ExportFormat {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("jpg") || ext.eq_ignore_ascii_case("jpeg") => ExportFormat::Jpeg,
        _ => ExportFormat::Png,
    }
}
