//! The scene: paint-ordered objects, background and selection.

use crate::error::{SceneError, SceneResult};
use crate::object::{ObjectAttrs, ObjectPatch, SceneObject};
use crate::shapes::{ObjectId, SerializableColor, Shape};
use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The single mutable source of truth for what is drawn.
///
/// Objects are kept sorted by ascending z-index, which is paint order.
/// The selection is session state: it is not part of the serialized form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scene {
    /// Canvas size in scene units.
    pub size: Size,
    pub background: SerializableColor,
    objects: Vec<SceneObject>,
    #[serde(skip)]
    selection: Vec<ObjectId>,
    #[serde(skip)]
    dirty: bool,
    #[serde(skip)]
    bounds: Option<Rect>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(Size::new(800.0, 600.0), SerializableColor::white())
    }
}

impl Scene {
    pub fn new(size: Size, background: SerializableColor) -> Self {
        Self {
            size,
            background,
            objects: Vec::new(),
            selection: Vec::new(),
            dirty: false,
            bounds: None,
        }
    }

    /// Add an object on top of the current paint order.
    pub fn create_object(&mut self, shape: Shape, attrs: ObjectAttrs) -> SceneResult<ObjectId> {
        let z_index = self.objects.last().map_or(0, |top| top.z_index + 1);
        let mut object = SceneObject {
            id: Uuid::new_v4(),
            z_index,
            geometry: attrs.geometry,
            style: attrs.style,
            shadow: attrs.shadow,
            shape,
        };
        object.sync_intrinsic_size();
        object.validate()?;

        let id = object.id;
        log::debug!("Created {} {}", object.kind(), id);
        self.objects.push(object);
        self.touch();
        Ok(id)
    }

    /// Apply a partial update. The patch is all-or-nothing: on error the
    /// object keeps its previous attributes.
    pub fn update_object(&mut self, id: ObjectId, patch: &ObjectPatch) -> SceneResult<()> {
        let index = self.index_of(id).ok_or(SceneError::NotFound(id))?;
        let mut updated = self.objects[index].clone();
        patch.apply_to(&mut updated)?;
        updated.validate()?;
        self.objects[index] = updated;
        self.touch();
        Ok(())
    }

    /// Remove an object, dropping it from the selection as well.
    pub fn remove_object(&mut self, id: ObjectId) -> SceneResult<SceneObject> {
        let index = self.index_of(id).ok_or(SceneError::NotFound(id))?;
        let object = self.objects.remove(index);
        self.selection.retain(|&selected| selected != id);
        self.touch();
        Ok(object)
    }

    pub fn get_object(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.iter().find(|object| object.id == id)
    }

    /// Objects in paint order (bottom first).
    pub fn objects_by_paint_order(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.index_of(id).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn set_background(&mut self, color: SerializableColor) {
        self.background = color;
        self.touch();
    }

    /// Find objects at a point, front to back.
    pub fn objects_at_point(&self, point: Point, tolerance: f64) -> Vec<ObjectId> {
        self.objects
            .iter()
            .rev()
            .filter(|object| object.hit_test(point, tolerance))
            .map(|object| object.id)
            .collect()
    }

    /// Union of all object bounds, recomputed after every mutation.
    pub fn bounds(&self) -> Option<Rect> {
        self.bounds
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Return the dirty flag and reset it.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    // --- Selection ---

    /// Replace the selection with a single object.
    /// Returns false if the object does not exist.
    pub fn select(&mut self, id: ObjectId) -> bool {
        if !self.contains(id) {
            return false;
        }
        self.selection.clear();
        self.selection.push(id);
        true
    }

    /// Add an object to the selection.
    /// Returns false if the object does not exist.
    pub fn add_to_selection(&mut self, id: ObjectId) -> bool {
        if !self.contains(id) {
            return false;
        }
        if !self.selection.contains(&id) {
            self.selection.push(id);
        }
        true
    }

    pub fn deselect(&mut self, id: ObjectId) {
        self.selection.retain(|&selected| selected != id);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn selected(&self) -> &[ObjectId] {
        &self.selection
    }

    pub fn is_selected(&self, id: ObjectId) -> bool {
        self.selection.contains(&id)
    }

    /// The selected object when exactly one is selected.
    pub fn single_selected(&self) -> Option<&SceneObject> {
        match self.selection.as_slice() {
            [id] => self.get_object(*id),
            _ => None,
        }
    }

    // --- Snapshots ---

    /// Serialize the scene, excluding session state.
    pub fn to_snapshot(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Restore a scene from a snapshot.
    pub fn from_snapshot(json: &str) -> Result<Self, serde_json::Error> {
        let mut scene: Scene = serde_json::from_str(json)?;
        scene.objects.sort_by_key(|object| object.z_index);
        scene.bounds = scene.compute_bounds();
        Ok(scene)
    }

    /// Keep the selection of `previous` for objects that still exist here.
    pub(crate) fn inherit_selection(&mut self, previous: &Scene) {
        self.selection = previous
            .selection
            .iter()
            .copied()
            .filter(|id| self.contains(*id))
            .collect();
    }

    // --- Internals ---

    pub(crate) fn index_of(&self, id: ObjectId) -> Option<usize> {
        self.objects.iter().position(|object| object.id == id)
    }

    pub(crate) fn objects_mut(&mut self) -> &mut Vec<SceneObject> {
        &mut self.objects
    }

    /// Mark dirty and refresh cached bounds.
    pub(crate) fn touch(&mut self) {
        self.dirty = true;
        self.bounds = self.compute_bounds();
    }

    fn compute_bounds(&self) -> Option<Rect> {
        self.objects
            .iter()
            .map(SceneObject::bounds)
            .reduce(|acc, bounds| acc.union(bounds))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{ObjectStyle, Text};

    fn add_rect(scene: &mut Scene, x: f64, y: f64) -> ObjectId {
        scene
            .create_object(Shape::Rect, ObjectAttrs::at(Point::new(x, y), 100.0, 100.0))
            .unwrap()
    }

    #[test]
    fn test_scene_creation() {
        let scene = Scene::default();
        assert!(scene.is_empty());
        assert_eq!(scene.size, Size::new(800.0, 600.0));
        assert_eq!(scene.bounds(), None);
        assert!(!scene.is_dirty());
    }

    #[test]
    fn test_create_object() {
        let mut scene = Scene::default();
        let id = add_rect(&mut scene, 0.0, 0.0);
        assert_eq!(scene.len(), 1);
        assert!(scene.get_object(id).is_some());
        assert!(scene.take_dirty());
        assert!(!scene.is_dirty());
        assert_eq!(scene.bounds(), Some(Rect::new(0.0, 0.0, 100.0, 100.0)));
    }

    #[test]
    fn test_z_order_is_paint_order() {
        let mut scene = Scene::default();
        let a = add_rect(&mut scene, 0.0, 0.0);
        let b = add_rect(&mut scene, 50.0, 50.0);
        let order: Vec<_> = scene.objects_by_paint_order().iter().map(|o| o.id()).collect();
        assert_eq!(order, vec![a, b]);
        assert!(scene.get_object(a).unwrap().z_index() < scene.get_object(b).unwrap().z_index());
    }

    #[test]
    fn test_text_takes_measured_size() {
        let mut scene = Scene::default();
        let text = Text::new("Text", 40.0);
        let expected = text.measure();
        let id = scene
            .create_object(Shape::Text(text), ObjectAttrs::at(Point::new(100.0, 100.0), 1.0, 1.0))
            .unwrap();
        let object = scene.get_object(id).unwrap();
        assert_eq!(object.geometry.width, expected.width);
        assert_eq!(object.geometry.height, expected.height);
    }

    #[test]
    fn test_create_rejects_negative_size() {
        let mut scene = Scene::default();
        let result = scene.create_object(Shape::Rect, ObjectAttrs::at(Point::ZERO, -1.0, 10.0));
        assert!(matches!(result, Err(SceneError::InvalidGeometry(_))));
        assert!(scene.is_empty());
        assert!(!scene.is_dirty());
    }

    #[test]
    fn test_update_missing_object() {
        let mut scene = Scene::default();
        let missing = Uuid::new_v4();
        assert_eq!(
            scene.update_object(missing, &ObjectPatch::default()),
            Err(SceneError::NotFound(missing))
        );
    }

    #[test]
    fn test_update_is_all_or_nothing() {
        let mut scene = Scene::default();
        let id = add_rect(&mut scene, 0.0, 0.0);
        let before = scene.get_object(id).unwrap().clone();
        let patch = ObjectPatch {
            position: Some(Point::new(40.0, 40.0)),
            scale_x: Some(0.0),
            ..Default::default()
        };
        assert!(scene.update_object(id, &patch).is_err());
        assert_eq!(scene.get_object(id), Some(&before));
    }

    #[test]
    fn test_update_refreshes_bounds() {
        let mut scene = Scene::default();
        let id = add_rect(&mut scene, 0.0, 0.0);
        scene
            .update_object(
                id,
                &ObjectPatch {
                    scale_x: Some(2.0),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(scene.bounds(), Some(Rect::new(0.0, 0.0, 200.0, 100.0)));
    }

    #[test]
    fn test_remove_object_clears_selection() {
        let mut scene = Scene::default();
        let id = add_rect(&mut scene, 0.0, 0.0);
        assert!(scene.select(id));
        let removed = scene.remove_object(id).unwrap();
        assert_eq!(removed.id(), id);
        assert!(scene.selected().is_empty());
        assert!(matches!(scene.remove_object(id), Err(SceneError::NotFound(_))));
    }

    #[test]
    fn test_objects_at_point() {
        let mut scene = Scene::default();
        let a = add_rect(&mut scene, 0.0, 0.0);
        let b = add_rect(&mut scene, 50.0, 50.0);

        let hits = scene.objects_at_point(Point::new(75.0, 75.0), 0.0);
        assert_eq!(hits, vec![b, a]);

        let hits = scene.objects_at_point(Point::new(25.0, 25.0), 0.0);
        assert_eq!(hits, vec![a]);
    }

    #[test]
    fn test_selection() {
        let mut scene = Scene::default();
        let a = add_rect(&mut scene, 0.0, 0.0);
        let b = add_rect(&mut scene, 50.0, 50.0);

        assert!(!scene.select(Uuid::new_v4()));
        assert!(scene.select(a));
        assert_eq!(scene.single_selected().map(|o| o.id()), Some(a));
        assert!(scene.add_to_selection(b));
        assert!(scene.single_selected().is_none());
        assert_eq!(scene.selected(), &[a, b]);
        scene.deselect(a);
        assert_eq!(scene.selected(), &[b]);
        scene.clear_selection();
        assert!(scene.selected().is_empty());
    }

    #[test]
    fn test_snapshot_excludes_selection() {
        let mut scene = Scene::default();
        let id = add_rect(&mut scene, 0.0, 0.0);
        scene.select(id);
        let snapshot = scene.to_snapshot().unwrap();

        let restored = Scene::from_snapshot(&snapshot).unwrap();
        assert!(restored.selected().is_empty());
        assert_eq!(restored.objects_by_paint_order(), scene.objects_by_paint_order());
        assert_eq!(restored.bounds(), scene.bounds());
        assert_eq!(restored.to_snapshot().unwrap(), snapshot);
    }

    #[test]
    fn test_inherit_selection_drops_missing() {
        let mut scene = Scene::default();
        let a = add_rect(&mut scene, 0.0, 0.0);
        let snapshot = scene.to_snapshot().unwrap();
        let b = add_rect(&mut scene, 10.0, 0.0);
        scene.select(a);
        scene.add_to_selection(b);

        let mut restored = Scene::from_snapshot(&snapshot).unwrap();
        restored.inherit_selection(&scene);
        assert_eq!(restored.selected(), &[a]);
    }

    #[test]
    fn test_opacity_clamped_on_create() {
        let mut scene = Scene::default();
        let attrs = ObjectAttrs::at(Point::ZERO, 10.0, 10.0)
            .with_style(ObjectStyle::default().with_opacity(4.0));
        let id = scene.create_object(Shape::Ellipse, attrs).unwrap();
        assert_eq!(scene.get_object(id).unwrap().style.opacity(), 1.0);
    }
}
