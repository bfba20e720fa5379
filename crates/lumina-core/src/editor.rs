//! Editor session: owns the scene, history and tool state, and routes
//! every user gesture through them.

use crate::config::EditorConfig;
use crate::error::{EditorError, EditorResult, ExportError, HistoryError, ImportError, SceneError};
use crate::export::{ExportOptions, SceneExporter};
use crate::filters::ImageFilter;
use crate::history::{History, HistoryEntry};
use crate::import::{ImageLoader, ImageResource, ImportTicket};
use crate::layers::{LayerInfo, list_layers};
use crate::object::{ObjectAttrs, ObjectPatch};
use crate::properties::PropertyEdit;
use crate::scene::Scene;
use crate::selection::{self, HANDLE_HIT_TOLERANCE, ManipulationState, SelectionDescriptor};
use crate::shapes::{Freehand, Image, ObjectId, ObjectStyle, SerializableColor, Shape};
use crate::tools::{BrushSettings, Gesture, ShapeKind, ToolMode, ToolState};
use kurbo::{Point, Vec2};
use std::path::Path;

/// Tolerance used to thin out recorded brush points.
const STROKE_SIMPLIFY_TOLERANCE: f64 = 0.5;

/// A user-visible message, e.g. a failed import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
}

impl Notice {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Signals for the host UI, drained with [`Editor::drain_events`].
#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    /// The scene changed and should be repainted.
    SceneChanged,
    /// The selection descriptor changed; read it with [`Editor::selection`].
    SelectionChanged,
    ModeChanged(ToolMode),
    /// Image-insert mode wants a file; resolve with [`Editor::complete_image_import`].
    FileRequested(ImportTicket),
    Notice(Notice),
}

/// One editing session.
#[derive(Debug)]
pub struct Editor {
    config: EditorConfig,
    scene: Scene,
    history: History,
    tools: ToolState,
    descriptor: SelectionDescriptor,
    events: Vec<EditorEvent>,
    pending_import: Option<ImportTicket>,
    next_ticket: u64,
}

impl Editor {
    /// Create an editor with an empty scene. The empty scene is the first
    /// history entry, so undo can always return to it.
    pub fn new(config: EditorConfig) -> EditorResult<Self> {
        let scene = config.scene();
        let mut history = History::new(config.history_limit);
        history.commit(&scene)?;
        let tools = ToolState::new(config.brush());
        let descriptor = SelectionDescriptor::compute(&scene, tools.mode(), &tools.brush);
        Ok(Self {
            config,
            scene,
            history,
            tools,
            descriptor,
            events: Vec::new(),
            pending_import: None,
            next_ticket: 1,
        })
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn mode(&self) -> ToolMode {
        self.tools.mode()
    }

    pub fn brush(&self) -> &BrushSettings {
        &self.tools.brush
    }

    /// The in-progress gesture.
    pub fn gesture(&self) -> &Gesture {
        self.tools.gesture()
    }

    /// Current selection descriptor for the property panel.
    pub fn selection(&self) -> &SelectionDescriptor {
        &self.descriptor
    }

    /// Layer list, top to bottom.
    pub fn layers(&self) -> Vec<LayerInfo> {
        list_layers(&self.scene)
    }

    pub fn pending_import(&self) -> Option<ImportTicket> {
        self.pending_import
    }

    pub fn drain_events(&mut self) -> Vec<EditorEvent> {
        std::mem::take(&mut self.events)
    }

    /// Returns true if the scene changed since the last call.
    pub fn take_repaint(&mut self) -> bool {
        self.scene.take_dirty()
    }

    // --- Modes ---

    /// Switch tool mode.
    ///
    /// Any in-progress gesture is cancelled without a commit, outstanding
    /// imports are abandoned, and the selection is cleared unless the new
    /// mode is select-compatible.
    pub fn set_mode(&mut self, mode: ToolMode) {
        if mode == self.tools.mode() && mode != ToolMode::ImageInsert {
            return;
        }
        let gesture = self.tools.set_mode(mode);
        self.discard_gesture(gesture);
        if let Some(ticket) = self.pending_import.take() {
            log::debug!("Abandoned import {}", ticket.id());
        }
        if !mode.keeps_selection() {
            self.scene.clear_selection();
        }
        log::debug!("Mode: {}", mode.name());
        self.events.push(EditorEvent::ModeChanged(mode));
        if mode == ToolMode::ImageInsert {
            let ticket = ImportTicket(self.next_ticket);
            self.next_ticket += 1;
            self.pending_import = Some(ticket);
            self.events.push(EditorEvent::FileRequested(ticket));
        }
        self.refresh_selection();
    }

    /// Cancel the in-progress gesture, restoring any live preview.
    pub fn cancel_gesture(&mut self) {
        let gesture = self.tools.take_gesture();
        self.discard_gesture(gesture);
        self.refresh_selection();
    }

    // --- Pointer input ---

    pub fn pointer_down(&mut self, point: Point, shift: bool) {
        let gesture = self.tools.take_gesture();
        self.discard_gesture(gesture);

        match self.tools.mode() {
            ToolMode::Select | ToolMode::Filter => self.press_select(point, shift),
            ToolMode::Draw => self.tools.begin(Gesture::Stroke {
                points: vec![point],
                brush: self.tools.brush,
            }),
            ToolMode::ShapePending(_) | ToolMode::TextInsert => {
                self.tools.begin(Gesture::Placement {
                    start: point,
                    current: point,
                })
            }
            ToolMode::ImageInsert => {}
        }
        self.refresh_selection();
    }

    pub fn pointer_move(&mut self, point: Point) {
        let snap = self.config.snap_rotation;
        let mut live = None;
        match self.tools.gesture_mut() {
            Gesture::Idle => {}
            Gesture::Stroke { points, .. } => {
                if points.last() != Some(&point) {
                    points.push(point);
                }
            }
            Gesture::Placement { current, .. } => *current = point,
            Gesture::Manipulate(state) => {
                state.current_point = point;
                live = Some((state.object_id, state.preview(snap)));
            }
        }

        if let Some((id, geometry)) = live {
            match self.scene.update_object(id, &ObjectPatch::placement(&geometry)) {
                Ok(()) => self.events.push(EditorEvent::SceneChanged),
                Err(err) => {
                    log::warn!("Dropping drag on {id}: {err}");
                    self.tools.take_gesture();
                }
            }
            self.refresh_selection();
        }
    }

    /// Finish the current gesture.
    /// Returns the object that was created or modified, if anything was committed.
    pub fn pointer_up(&mut self, point: Point) -> EditorResult<Option<ObjectId>> {
        self.pointer_move(point);
        let result = match self.tools.take_gesture() {
            Gesture::Idle => Ok(None),
            Gesture::Stroke { points, brush } => self.finish_stroke(&points, brush),
            Gesture::Placement { start, current } => self.finish_placement(start, current),
            Gesture::Manipulate(state) => self.finish_manipulation(&state),
        };
        self.refresh_selection();
        result
    }

    fn press_select(&mut self, point: Point, shift: bool) {
        let handle_hit = self.scene.single_selected().filter(|_| !shift).and_then(|object| {
            selection::hit_test_handles(&object.geometry, point, HANDLE_HIT_TOLERANCE)
                .map(|handle| ManipulationState::new(object.id(), Some(handle), point, object.geometry))
        });
        if let Some(state) = handle_hit {
            self.tools.begin(Gesture::Manipulate(state));
            return;
        }

        let hit = self
            .scene
            .objects_at_point(point, self.config.hit_tolerance)
            .first()
            .copied();
        match hit {
            Some(id) if shift => {
                if self.scene.is_selected(id) {
                    self.scene.deselect(id);
                } else {
                    self.scene.add_to_selection(id);
                }
            }
            Some(id) => {
                self.scene.select(id);
                if let Some(object) = self.scene.get_object(id) {
                    let state = ManipulationState::new(id, None, point, object.geometry);
                    self.tools.begin(Gesture::Manipulate(state));
                }
            }
            None if shift => {}
            None => self.scene.clear_selection(),
        }
    }

    fn finish_stroke(&mut self, points: &[Point], brush: BrushSettings) -> EditorResult<Option<ObjectId>> {
        let distinct = points.windows(2).any(|w| w[0] != w[1]);
        if !distinct {
            log::debug!("Stroke too short, discarded");
            return Ok(None);
        }
        let (mut stroke, origin) = Freehand::from_scene_points(points);
        stroke.simplify(STROKE_SIMPLIFY_TOLERANCE);
        let attrs = ObjectAttrs::at(origin, 0.0, 0.0)
            .with_style(ObjectStyle::new(None, brush.color, brush.width));
        let id = self.create_and_commit(Shape::Freehand(stroke), attrs)?;
        Ok(Some(id))
    }

    fn finish_placement(&mut self, start: Point, current: Point) -> EditorResult<Option<ObjectId>> {
        let id = match self.tools.mode() {
            ToolMode::ShapePending(kind) => {
                let mut attrs = self.config.shape_attrs(kind);
                let dragged = kurbo::Rect::from_points(start, current);
                let min = self.config.min_drag_size;
                if dragged.width() >= min && dragged.height() >= min {
                    attrs.geometry.position = dragged.origin();
                    attrs.geometry.width = dragged.width();
                    attrs.geometry.height = dragged.height();
                } else {
                    attrs.geometry.position = start;
                }
                self.create_and_commit(kind.shape(), attrs)?
            }
            ToolMode::TextInsert => {
                let text = &self.config.text;
                let (payload, attrs) = (text.payload(), text.attrs_at(start));
                self.create_and_commit(Shape::Text(payload), attrs)?
            }
            _ => return Ok(None),
        };
        self.enter_select_with(id);
        Ok(Some(id))
    }

    fn finish_manipulation(&mut self, state: &ManipulationState) -> EditorResult<Option<ObjectId>> {
        let unchanged = self
            .scene
            .get_object(state.object_id)
            .is_none_or(|object| object.geometry == state.original);
        if unchanged {
            return Ok(None);
        }
        self.commit()?;
        Ok(Some(state.object_id))
    }

    // --- Palette actions ---

    /// Add a palette shape at its default geometry and select it.
    pub fn add_shape(&mut self, kind: ShapeKind) -> EditorResult<ObjectId> {
        self.set_mode(ToolMode::Select);
        self.revert_manipulation();
        let attrs = self.config.shape_attrs(kind);
        let id = self.create_and_commit(kind.shape(), attrs)?;
        self.select_only(id);
        Ok(id)
    }

    /// Add the default text object and select it.
    pub fn add_text(&mut self) -> EditorResult<ObjectId> {
        self.set_mode(ToolMode::Select);
        self.revert_manipulation();
        let text = &self.config.text;
        let (payload, attrs) = (text.payload(), text.attrs_at(Point::new(text.left, text.top)));
        let id = self.create_and_commit(Shape::Text(payload), attrs)?;
        self.select_only(id);
        Ok(id)
    }

    // --- Image import ---

    /// Enter image-insert mode and return the ticket for the file request.
    pub fn begin_image_import(&mut self) -> ImportTicket {
        self.set_mode(ToolMode::ImageInsert);
        let ticket = ImportTicket(self.next_ticket - 1);
        debug_assert_eq!(self.pending_import, Some(ticket));
        ticket
    }

    /// Resolve a file request.
    ///
    /// On success exactly one image object is created, scaled to the
    /// configured width, centered and selected. On failure nothing is
    /// created and a notice is raised. Either way the mode returns to
    /// select. Stale tickets are ignored.
    pub fn complete_image_import(
        &mut self,
        ticket: ImportTicket,
        result: Result<ImageResource, ImportError>,
    ) -> EditorResult<Option<ObjectId>> {
        if self.pending_import != Some(ticket) {
            log::debug!("Ignoring stale import {}", ticket.id());
            return Ok(None);
        }
        self.pending_import = None;
        self.revert_manipulation();

        let created = result.and_then(|resource| {
            if resource.width == 0 || resource.height == 0 {
                return Err(ImportError::Decode(format!(
                    "image has no pixels ({}x{})",
                    resource.width, resource.height
                )));
            }
            Ok(resource)
        });
        let resource = match created {
            Ok(resource) => resource,
            Err(err) => {
                self.import_failed(&err);
                return Ok(None);
            }
        };

        let image = Image::new(resource.uri, resource.width, resource.height, resource.format);
        let scale = image.scale_to_width(self.config.image_max_width);
        let size = image.source_size() * scale;
        let canvas = self.scene.size;
        let position = Point::new((canvas.width - size.width) / 2.0, (canvas.height - size.height) / 2.0);
        let attrs = ObjectAttrs::at(position, 0.0, 0.0)
            .with_style(ObjectStyle::new(None, SerializableColor::black(), 0.0))
            .with_scale(scale, scale);

        match self.create_and_commit(Shape::Image(image), attrs) {
            Ok(id) => {
                log::info!("Imported {}x{} image as {id}", resource.width, resource.height);
                self.enter_select_with(id);
                Ok(Some(id))
            }
            Err(EditorError::Scene(err)) => {
                self.import_failed(&ImportError::Decode(err.to_string()));
                Ok(None)
            }
            Err(err) => {
                self.enter_select_with_none();
                Err(err)
            }
        }
    }

    /// Run a whole import gesture with `loader`.
    pub async fn import_image(&mut self, loader: &dyn ImageLoader, path: &Path) -> EditorResult<Option<ObjectId>> {
        let ticket = self.begin_image_import();
        let result = loader.load(path).await;
        self.complete_image_import(ticket, result)
    }

    fn import_failed(&mut self, err: &ImportError) {
        log::warn!("Image import failed: {err}");
        self.events
            .push(EditorEvent::Notice(Notice::new(format!("Could not import image: {err}"))));
        self.enter_select_with_none();
    }

    // --- Property edits ---

    /// Apply a property panel edit.
    ///
    /// In draw mode edits go to the brush. Otherwise exactly one object
    /// must be selected. Returns true if anything changed; rejected
    /// values leave the object untouched and raise a notice.
    pub fn apply_property_edit(&mut self, edit: &PropertyEdit) -> EditorResult<bool> {
        self.revert_manipulation();
        if let PropertyEdit::Background(color) = edit {
            if self.scene.background == *color {
                return Ok(false);
            }
            self.scene.set_background(*color);
            return self.commit();
        }

        if self.tools.mode() == ToolMode::Draw {
            let changed = edit.apply_to_brush(&mut self.tools.brush);
            let current = self.tools.brush;
            if let Gesture::Stroke { brush, .. } = self.tools.gesture_mut() {
                *brush = current;
            }
            self.refresh_selection();
            return Ok(changed);
        }

        let Some(object) = self.scene.single_selected() else {
            log::debug!("Property edit ignored: {} objects selected", self.scene.selected().len());
            return Ok(false);
        };
        let id = object.id();
        let before = object.clone();
        let patch = match edit.to_patch(object) {
            Ok(Some(patch)) => patch,
            Ok(None) => return Ok(false),
            Err(err) => {
                self.reject_edit(&err);
                return Ok(false);
            }
        };
        if let Err(err) = self.scene.update_object(id, &patch) {
            self.reject_edit(&err);
            return Ok(false);
        }
        if self.scene.get_object(id) == Some(&before) {
            return Ok(false);
        }
        self.commit()
    }

    fn reject_edit(&mut self, err: &SceneError) {
        log::warn!("Rejected property edit: {err}");
        self.events.push(EditorEvent::Notice(Notice::new(err.to_string())));
        self.refresh_selection();
    }

    // --- Filters ---

    /// Append a filter to the selected image. Only available in filter mode.
    pub fn apply_filter(&mut self, filter: ImageFilter) -> EditorResult<bool> {
        self.revert_manipulation();
        if self.tools.mode() != ToolMode::Filter {
            log::debug!("Filter ignored outside filter mode");
            return Ok(false);
        }
        if let Err(err) = filter.validate() {
            self.reject_edit(&err);
            return Ok(false);
        }
        let Some((id, mut filters)) = self.selected_image_filters() else {
            return Ok(false);
        };
        filters.push(filter);
        self.set_filters(id, filters)
    }

    /// Remove every filter from the selected image. Only available in filter mode.
    pub fn clear_filters(&mut self) -> EditorResult<bool> {
        self.revert_manipulation();
        if self.tools.mode() != ToolMode::Filter {
            return Ok(false);
        }
        match self.selected_image_filters() {
            Some((id, filters)) if !filters.is_empty() => self.set_filters(id, Vec::new()),
            _ => Ok(false),
        }
    }

    fn selected_image_filters(&self) -> Option<(ObjectId, Vec<ImageFilter>)> {
        let object = self.scene.single_selected()?;
        let image = object.shape.as_image()?;
        Some((object.id(), image.filters.clone()))
    }

    fn set_filters(&mut self, id: ObjectId, filters: Vec<ImageFilter>) -> EditorResult<bool> {
        let patch = ObjectPatch {
            filters: Some(filters),
            ..Default::default()
        };
        if let Err(err) = self.scene.update_object(id, &patch) {
            self.reject_edit(&err);
            return Ok(false);
        }
        self.commit()
    }

    // --- Selection, deletion and layers ---

    /// Select a single object, e.g. from the layer list.
    /// Returns false if the object does not exist.
    pub fn select(&mut self, id: ObjectId) -> bool {
        if !self.scene.contains(id) {
            return false;
        }
        self.revert_manipulation();
        if !self.tools.mode().keeps_selection() {
            self.set_mode(ToolMode::Select);
        }
        self.select_only(id);
        true
    }

    pub fn clear_selection(&mut self) {
        self.revert_manipulation();
        self.scene.clear_selection();
        self.refresh_selection();
    }

    /// Delete every selected object.
    /// Returns the number of objects removed.
    pub fn delete_selected(&mut self) -> EditorResult<usize> {
        self.revert_manipulation();
        let ids = self.scene.selected().to_vec();
        let removed = ids
            .into_iter()
            .filter(|&id| self.scene.remove_object(id).is_ok())
            .count();
        if removed > 0 {
            self.commit()?;
        }
        Ok(removed)
    }

    /// Remove an object by id.
    /// Returns false if it did not exist.
    pub fn remove_layer(&mut self, id: ObjectId) -> EditorResult<bool> {
        self.revert_manipulation();
        match self.scene.remove_object(id) {
            Ok(_) => self.commit().map(|_| true),
            Err(err) => {
                log::debug!("remove_layer: {err}");
                Ok(false)
            }
        }
    }

    pub fn bring_forward(&mut self, id: ObjectId) -> EditorResult<bool> {
        self.reorder(id, Scene::bring_forward)
    }

    pub fn send_backward(&mut self, id: ObjectId) -> EditorResult<bool> {
        self.reorder(id, Scene::send_backward)
    }

    pub fn bring_to_front(&mut self, id: ObjectId) -> EditorResult<bool> {
        self.reorder(id, Scene::bring_to_front)
    }

    pub fn send_to_back(&mut self, id: ObjectId) -> EditorResult<bool> {
        self.reorder(id, Scene::send_to_back)
    }

    fn reorder(
        &mut self,
        id: ObjectId,
        op: fn(&mut Scene, ObjectId) -> Result<bool, SceneError>,
    ) -> EditorResult<bool> {
        self.revert_manipulation();
        match op(&mut self.scene, id) {
            Ok(true) => self.commit().map(|_| true),
            Ok(false) => Ok(false),
            Err(err) => {
                log::debug!("Reorder ignored: {err}");
                Ok(false)
            }
        }
    }

    /// Move every selected object by `delta` as one history step.
    ///
    /// Either every object moves or none does.
    pub fn translate_selected(&mut self, delta: Vec2) -> EditorResult<bool> {
        self.revert_manipulation();
        if delta == Vec2::ZERO || self.scene.selected().is_empty() {
            return Ok(false);
        }
        let mut staged = self.scene.clone();
        let moves: Vec<_> = staged
            .selected()
            .iter()
            .filter_map(|id| staged.get_object(*id))
            .map(|object| (object.id(), object.geometry.position + delta))
            .collect();
        for (id, position) in moves {
            let patch = ObjectPatch {
                position: Some(position),
                ..Default::default()
            };
            if let Err(err) = staged.update_object(id, &patch) {
                log::warn!("Move rejected: {err}");
                return Err(err.into());
            }
        }
        self.scene = staged;
        self.commit()
    }

    // --- History ---

    /// Step back one history entry. Returns false at the start of history.
    pub fn undo(&mut self) -> EditorResult<bool> {
        self.cancel_gesture();
        let Some(entry) = self.history.undo().cloned() else {
            return Ok(false);
        };
        if let Err(err) = self.restore(&entry) {
            self.history.redo();
            return Err(err.into());
        }
        Ok(true)
    }

    /// Step forward one history entry. Returns false at the end of history.
    pub fn redo(&mut self) -> EditorResult<bool> {
        self.cancel_gesture();
        let Some(entry) = self.history.redo().cloned() else {
            return Ok(false);
        };
        if let Err(err) = self.restore(&entry) {
            self.history.undo();
            return Err(err.into());
        }
        Ok(true)
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // --- Export ---

    /// Render the scene to bytes. Never touches scene or history.
    pub fn export(&self, exporter: &dyn SceneExporter, options: &ExportOptions) -> Result<Vec<u8>, ExportError> {
        let bytes = exporter.export(&self.scene, options)?;
        log::info!("Exported {} bytes as {:?}", bytes.len(), options.format);
        Ok(bytes)
    }

    // --- Internals ---

    /// Create an object and commit it, or leave everything as it was.
    fn create_and_commit(&mut self, shape: Shape, attrs: ObjectAttrs) -> EditorResult<ObjectId> {
        let id = self.scene.create_object(shape, attrs)?;
        self.commit()?;
        Ok(id)
    }

    /// Snapshot the current scene into history and notify listeners.
    /// On failure the scene is rolled back to the last committed entry.
    fn commit(&mut self) -> EditorResult<bool> {
        match self.history.commit(&self.scene) {
            Ok(committed) => {
                self.events.push(EditorEvent::SceneChanged);
                self.refresh_selection();
                Ok(committed)
            }
            Err(err) => {
                log::error!("History commit failed: {err}");
                if let Some(entry) = self.history.current().cloned() {
                    if let Err(restore_err) = self.restore(&entry) {
                        log::error!("Rollback failed: {restore_err}");
                    }
                }
                Err(err.into())
            }
        }
    }

    fn restore(&mut self, entry: &HistoryEntry) -> Result<(), HistoryError> {
        let mut restored = entry.restore()?;
        restored.inherit_selection(&self.scene);
        restored.touch();
        self.scene = restored;
        self.events.push(EditorEvent::SceneChanged);
        self.refresh_selection();
        Ok(())
    }

    /// Put a dragged object back before another mutation runs, so the
    /// drag frame never reaches history.
    fn revert_manipulation(&mut self) {
        if matches!(self.tools.gesture(), Gesture::Manipulate(_)) {
            let gesture = self.tools.take_gesture();
            self.discard_gesture(gesture);
            self.refresh_selection();
        }
    }

    fn discard_gesture(&mut self, gesture: Gesture) {
        match gesture {
            Gesture::Idle => {}
            Gesture::Manipulate(state) => {
                let moved = self
                    .scene
                    .get_object(state.object_id)
                    .is_some_and(|object| object.geometry != state.original);
                if moved {
                    let patch = ObjectPatch::placement(&state.original);
                    match self.scene.update_object(state.object_id, &patch) {
                        Ok(()) => self.events.push(EditorEvent::SceneChanged),
                        Err(err) => log::warn!("Could not restore {}: {err}", state.object_id),
                    }
                }
                log::debug!("Cancelled manipulation of {}", state.object_id);
            }
            Gesture::Stroke { .. } | Gesture::Placement { .. } => {
                log::debug!("Cancelled gesture");
            }
        }
    }

    /// Auto-transition back to select mode with `id` selected.
    fn enter_select_with(&mut self, id: ObjectId) {
        self.enter_select_with_none();
        self.select_only(id);
    }

    fn enter_select_with_none(&mut self) {
        if self.tools.mode() != ToolMode::Select {
            self.tools.set_mode(ToolMode::Select);
            self.events.push(EditorEvent::ModeChanged(ToolMode::Select));
        }
        self.refresh_selection();
    }

    fn select_only(&mut self, id: ObjectId) {
        self.scene.select(id);
        self.refresh_selection();
    }

    fn refresh_selection(&mut self) {
        let descriptor = SelectionDescriptor::compute(&self.scene, self.tools.mode(), &self.tools.brush);
        if descriptor != self.descriptor {
            self.descriptor = descriptor;
            self.events.push(EditorEvent::SelectionChanged);
        }
    }
}
