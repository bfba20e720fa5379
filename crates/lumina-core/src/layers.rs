//! Layer list view and z-order operations.

use crate::error::{SceneError, SceneResult};
use crate::scene::Scene;
use crate::shapes::{ObjectId, ObjectKind, Shape};
use serde::Serialize;

/// One row of the layer list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerInfo {
    pub id: ObjectId,
    pub kind: ObjectKind,
    pub label: String,
    pub z_index: i64,
    pub selected: bool,
}

/// Layers ordered top to bottom (reverse paint order).
pub fn list_layers(scene: &Scene) -> Vec<LayerInfo> {
    scene
        .objects_by_paint_order()
        .iter()
        .rev()
        .map(|object| {
            let label = match &object.shape {
                Shape::Text(text) => {
                    let first_line = text.content.lines().next().unwrap_or_default();
                    format!("{}: {}", object.kind(), first_line)
                }
                _ => object.kind().to_string(),
            };
            LayerInfo {
                id: object.id(),
                kind: object.kind(),
                label,
                z_index: object.z_index(),
                selected: scene.is_selected(object.id()),
            }
        })
        .collect()
}

impl Scene {
    /// Move an object one layer forward (towards front).
    /// Returns true if the object was moved, false if already at front.
    pub fn bring_forward(&mut self, id: ObjectId) -> SceneResult<bool> {
        let pos = self.index_of(id).ok_or(SceneError::NotFound(id))?;
        if pos + 1 >= self.len() {
            return Ok(false);
        }
        self.swap_ranks(pos, pos + 1);
        Ok(true)
    }

    /// Move an object one layer backward (towards back).
    /// Returns true if the object was moved, false if already at back.
    pub fn send_backward(&mut self, id: ObjectId) -> SceneResult<bool> {
        let pos = self.index_of(id).ok_or(SceneError::NotFound(id))?;
        if pos == 0 {
            return Ok(false);
        }
        self.swap_ranks(pos, pos - 1);
        Ok(true)
    }

    /// Bring an object to the front (topmost).
    /// Returns true if the object was moved.
    pub fn bring_to_front(&mut self, id: ObjectId) -> SceneResult<bool> {
        let pos = self.index_of(id).ok_or(SceneError::NotFound(id))?;
        let last = self.len() - 1;
        if pos == last {
            return Ok(false);
        }
        let top = self.objects_by_paint_order()[last].z_index();
        let objects = self.objects_mut();
        let mut object = objects.remove(pos);
        object.z_index = top + 1;
        objects.push(object);
        self.touch();
        Ok(true)
    }

    /// Send an object to the back (bottommost).
    /// Returns true if the object was moved.
    pub fn send_to_back(&mut self, id: ObjectId) -> SceneResult<bool> {
        let pos = self.index_of(id).ok_or(SceneError::NotFound(id))?;
        if pos == 0 {
            return Ok(false);
        }
        let bottom = self.objects_by_paint_order()[0].z_index();
        let objects = self.objects_mut();
        let mut object = objects.remove(pos);
        object.z_index = bottom - 1;
        objects.insert(0, object);
        self.touch();
        Ok(true)
    }

    /// Exchange z-index ranks of two paint-order neighbours, keeping the list sorted.
    fn swap_ranks(&mut self, a: usize, b: usize) {
        let objects = self.objects_mut();
        let rank_a = objects[a].z_index;
        objects[a].z_index = objects[b].z_index;
        objects[b].z_index = rank_a;
        objects.swap(a, b);
        self.touch();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::ObjectAttrs;
    use crate::shapes::Text;
    use kurbo::Point;

    fn add(scene: &mut Scene, shape: Shape) -> ObjectId {
        scene
            .create_object(shape, ObjectAttrs::at(Point::ZERO, 10.0, 10.0))
            .unwrap()
    }

    fn paint_order(scene: &Scene) -> Vec<ObjectId> {
        scene.objects_by_paint_order().iter().map(|o| o.id()).collect()
    }

    #[test]
    fn test_list_layers_top_to_bottom() {
        let mut scene = Scene::default();
        let a = add(&mut scene, Shape::Rect);
        let b = add(&mut scene, Shape::Text(Text::new("Hello\nworld", 20.0)));
        scene.select(b);

        let layers = list_layers(&scene);
        assert_eq!(layers.iter().map(|l| l.id).collect::<Vec<_>>(), vec![b, a]);
        assert_eq!(layers[0].label, "Text: Hello");
        assert!(layers[0].selected);
        assert_eq!(layers[1].label, "Rectangle");
        assert!(!layers[1].selected);
    }

    #[test]
    fn test_forward_backward() {
        let mut scene = Scene::default();
        let a = add(&mut scene, Shape::Rect);
        let b = add(&mut scene, Shape::Ellipse);
        let c = add(&mut scene, Shape::Triangle);

        assert!(scene.bring_forward(a).unwrap());
        assert_eq!(paint_order(&scene), vec![b, a, c]);
        assert!(scene.send_backward(c).unwrap());
        assert_eq!(paint_order(&scene), vec![b, c, a]);

        let ranks: Vec<_> = scene.objects_by_paint_order().iter().map(|o| o.z_index()).collect();
        assert!(ranks.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_boundaries_are_noops() {
        let mut scene = Scene::default();
        let a = add(&mut scene, Shape::Rect);
        let b = add(&mut scene, Shape::Ellipse);
        scene.take_dirty();

        assert!(!scene.bring_forward(b).unwrap());
        assert!(!scene.send_backward(a).unwrap());
        assert!(!scene.bring_to_front(b).unwrap());
        assert!(!scene.send_to_back(a).unwrap());
        assert_eq!(paint_order(&scene), vec![a, b]);
        assert!(!scene.is_dirty());
    }

    #[test]
    fn test_front_and_back() {
        let mut scene = Scene::default();
        let a = add(&mut scene, Shape::Rect);
        let b = add(&mut scene, Shape::Ellipse);
        let c = add(&mut scene, Shape::Triangle);

        assert!(scene.bring_to_front(a).unwrap());
        assert_eq!(paint_order(&scene), vec![b, c, a]);
        assert!(scene.send_to_back(c).unwrap());
        assert_eq!(paint_order(&scene), vec![c, b, a]);
    }

    #[test]
    fn test_missing_object() {
        let mut scene = Scene::default();
        let missing = uuid::Uuid::new_v4();
        assert_eq!(scene.bring_forward(missing), Err(SceneError::NotFound(missing)));
    }
}
