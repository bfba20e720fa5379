//! Selection descriptors, manipulation handles and transform gestures.

use crate::filters::ImageFilter;
use crate::object::SceneObject;
use crate::scene::Scene;
use crate::shapes::{Geometry, ObjectId, ObjectKind, SerializableColor, Shadow, Text};
use crate::tools::{BrushSettings, ToolMode};
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Handle hit tolerance in scene units.
pub const HANDLE_HIT_TOLERANCE: f64 = 8.0;

/// Distance from the top edge to the rotation handle.
pub const ROTATE_HANDLE_OFFSET: f64 = 25.0;

/// Smallest rendered size a resize drag can produce.
pub const MIN_RESIZE: f64 = 1.0;

/// Read-only view of whatever the property panel should show.
///
/// Always recomputed from the scene after a mutation or selection change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SelectionDescriptor {
    /// Nothing selected: canvas-level properties.
    Canvas { background: SerializableColor },
    /// Draw mode: the brush is what gets edited.
    Brush(BrushSettings),
    /// Exactly one object selected.
    Object(ObjectDescriptor),
    /// Several objects selected. Property edits do not apply.
    Multiple { ids: Vec<ObjectId> },
}

impl SelectionDescriptor {
    pub fn compute(scene: &Scene, mode: ToolMode, brush: &BrushSettings) -> Self {
        if mode == ToolMode::Draw {
            return SelectionDescriptor::Brush(*brush);
        }
        match scene.selected() {
            [] => SelectionDescriptor::Canvas {
                background: scene.background,
            },
            [id] => match scene.get_object(*id) {
                Some(object) => SelectionDescriptor::Object(ObjectDescriptor::from_object(object)),
                None => SelectionDescriptor::Canvas {
                    background: scene.background,
                },
            },
            ids => SelectionDescriptor::Multiple { ids: ids.to_vec() },
        }
    }

    pub fn object(&self) -> Option<&ObjectDescriptor> {
        match self {
            SelectionDescriptor::Object(object) => Some(object),
            _ => None,
        }
    }
}

/// Value snapshot of one object's editable attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectDescriptor {
    pub id: ObjectId,
    pub kind: ObjectKind,
    pub z_index: i64,
    pub left: f64,
    pub top: f64,
    /// Rendered width (intrinsic width times scale).
    pub width: f64,
    /// Rendered height (intrinsic height times scale).
    pub height: f64,
    pub scale_x: f64,
    pub scale_y: f64,
    pub angle: f64,
    pub fill: Option<SerializableColor>,
    pub stroke: SerializableColor,
    pub stroke_width: f64,
    pub opacity: f64,
    /// Shadow settings; a disabled shadow still reports its last values.
    pub shadow: Shadow,
    pub text: Option<Text>,
    pub filters: Vec<ImageFilter>,
}

impl ObjectDescriptor {
    pub fn from_object(object: &SceneObject) -> Self {
        let geometry = &object.geometry;
        Self {
            id: object.id(),
            kind: object.kind(),
            z_index: object.z_index(),
            left: geometry.position.x,
            top: geometry.position.y,
            width: geometry.scaled_width(),
            height: geometry.scaled_height(),
            scale_x: geometry.scale_x,
            scale_y: geometry.scale_y,
            angle: geometry.angle,
            fill: object.style.fill,
            stroke: object.style.stroke,
            stroke_width: object.style.stroke_width,
            opacity: object.style.opacity(),
            shadow: object.shadow.unwrap_or_default(),
            text: object.shape.as_text().cloned(),
            filters: object
                .shape
                .as_image()
                .map(|image| image.filters.clone())
                .unwrap_or_default(),
        }
    }
}

/// Type of manipulation handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandleKind {
    /// Corner handle for scaling.
    Corner(Corner),
    /// Rotation handle (positioned above the object).
    Rotate,
}

/// Corner positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    /// Unit position of the corner within the box.
    fn factors(self) -> (f64, f64) {
        match self {
            Corner::TopLeft => (0.0, 0.0),
            Corner::TopRight => (1.0, 0.0),
            Corner::BottomLeft => (0.0, 1.0),
            Corner::BottomRight => (1.0, 1.0),
        }
    }

    fn opposite(self) -> Self {
        match self {
            Corner::TopLeft => Corner::BottomRight,
            Corner::TopRight => Corner::BottomLeft,
            Corner::BottomLeft => Corner::TopRight,
            Corner::BottomRight => Corner::TopLeft,
        }
    }
}

/// A manipulation handle with its position and type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Handle {
    /// Position in scene coordinates.
    pub position: Point,
    pub kind: HandleKind,
}

impl Handle {
    pub fn new(position: Point, kind: HandleKind) -> Self {
        Self { position, kind }
    }

    /// Check if a scene point hits this handle.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        self.position.distance(point) <= tolerance
    }
}

/// Corner handles plus a rotation handle, following the object's rotation.
pub fn handles_for(geometry: &Geometry) -> Vec<Handle> {
    let placement = geometry.placement();
    let (w, h) = (geometry.scaled_width(), geometry.scaled_height());
    let corner = |c: Corner| {
        let (fx, fy) = c.factors();
        Handle::new(placement * Point::new(fx * w, fy * h), HandleKind::Corner(c))
    };
    vec![
        corner(Corner::TopLeft),
        corner(Corner::TopRight),
        corner(Corner::BottomLeft),
        corner(Corner::BottomRight),
        Handle::new(
            placement * Point::new(w / 2.0, -ROTATE_HANDLE_OFFSET),
            HandleKind::Rotate,
        ),
    ]
}

/// Find which handle (if any) is hit at the given point.
pub fn hit_test_handles(geometry: &Geometry, point: Point, tolerance: f64) -> Option<HandleKind> {
    handles_for(geometry)
        .into_iter()
        .find(|handle| handle.hit_test(point, tolerance))
        .map(|handle| handle.kind)
}

/// State of an active move, resize or rotate drag on one object.
#[derive(Debug, Clone, PartialEq)]
pub struct ManipulationState {
    pub object_id: ObjectId,
    /// The handle being dragged (None = moving the whole object).
    pub handle: Option<HandleKind>,
    pub start_point: Point,
    pub current_point: Point,
    /// Geometry before the drag, restored on cancel.
    pub original: Geometry,
}

impl ManipulationState {
    pub fn new(object_id: ObjectId, handle: Option<HandleKind>, start_point: Point, original: Geometry) -> Self {
        Self {
            object_id,
            handle,
            start_point,
            current_point: start_point,
            original,
        }
    }

    pub fn delta(&self) -> Vec2 {
        self.current_point - self.start_point
    }

    /// Geometry implied by the drag so far.
    pub fn preview(&self, snap_rotation: bool) -> Geometry {
        match self.handle {
            None => {
                let mut geometry = self.original;
                geometry.position += self.delta();
                geometry
            }
            Some(HandleKind::Corner(corner)) => apply_corner_resize(&self.original, corner, self.delta()),
            Some(HandleKind::Rotate) => apply_rotation(&self.original, self.current_point, snap_rotation),
        }
    }
}

/// Resize by dragging `corner`, keeping the opposite corner fixed in scene space.
/// The intrinsic size is untouched; only the scale factors change.
pub fn apply_corner_resize(original: &Geometry, corner: Corner, delta: Vec2) -> Geometry {
    let local_delta = rotate_vec(delta, -original.angle);
    let (fx, fy) = corner.factors();
    // Dragging a left/top corner shrinks the box as the pointer moves right/down.
    let sign_x = if fx > 0.5 { 1.0 } else { -1.0 };
    let sign_y = if fy > 0.5 { 1.0 } else { -1.0 };

    let mut geometry = *original;
    if original.width > f64::EPSILON {
        let width = (original.scaled_width() + sign_x * local_delta.x).max(MIN_RESIZE);
        geometry.scale_x = width / original.width;
    }
    if original.height > f64::EPSILON {
        let height = (original.scaled_height() + sign_y * local_delta.y).max(MIN_RESIZE);
        geometry.scale_y = height / original.height;
    }

    let anchor = corner.opposite();
    let (ax, ay) = anchor.factors();
    let anchor_scene = original.placement()
        * Point::new(ax * original.scaled_width(), ay * original.scaled_height());
    let (w, h) = (geometry.scaled_width(), geometry.scaled_height());
    let to_center = rotate_vec(Vec2::new(w / 2.0 - ax * w, h / 2.0 - ay * h), original.angle);
    let center = anchor_scene + to_center;
    geometry.position = center - Vec2::new(w / 2.0, h / 2.0);
    geometry
}

fn rotate_vec(v: Vec2, degrees: f64) -> Vec2 {
    let (sin, cos) = degrees.to_radians().sin_cos();
    Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

/// Rotate so the rotation handle points at `cursor`.
/// `snap` rounds to 15 degree increments.
pub fn apply_rotation(original: &Geometry, cursor: Point, snap: bool) -> Geometry {
    let center = original.center();
    let offset = cursor - center;
    // Zero degrees points straight up.
    let mut angle = offset.y.atan2(offset.x).to_degrees() + 90.0;
    if snap {
        angle = (angle / 15.0).round() * 15.0;
    }
    let mut geometry = *original;
    geometry.angle = angle.rem_euclid(360.0);
    geometry
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::ObjectAttrs;
    use crate::shapes::Shape;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_handles_unrotated() {
        let geometry = Geometry::new(Point::new(10.0, 10.0), 100.0, 50.0);
        let handles = handles_for(&geometry);
        assert_eq!(handles.len(), 5);
        assert_eq!(handles[0].position, Point::new(10.0, 10.0));
        assert_eq!(handles[3].position, Point::new(110.0, 60.0));
        assert_eq!(handles[4].kind, HandleKind::Rotate);
        assert!(approx(handles[4].position.y, 10.0 - ROTATE_HANDLE_OFFSET));
    }

    #[test]
    fn test_hit_test_handles() {
        let geometry = Geometry::new(Point::ZERO, 100.0, 100.0);
        assert_eq!(
            hit_test_handles(&geometry, Point::new(102.0, 99.0), HANDLE_HIT_TOLERANCE),
            Some(HandleKind::Corner(Corner::BottomRight))
        );
        assert_eq!(hit_test_handles(&geometry, Point::new(50.0, 50.0), HANDLE_HIT_TOLERANCE), None);
    }

    #[test]
    fn test_corner_resize_changes_scale_only() {
        let original = Geometry::new(Point::new(100.0, 100.0), 100.0, 60.0);
        let resized = apply_corner_resize(&original, Corner::BottomRight, Vec2::new(100.0, 60.0));
        assert_eq!(resized.width, 100.0);
        assert_eq!(resized.height, 60.0);
        assert!(approx(resized.scale_x, 2.0));
        assert!(approx(resized.scale_y, 2.0));
        assert!(approx(resized.position.x, 100.0));
        assert!(approx(resized.position.y, 100.0));
    }

    #[test]
    fn test_top_left_resize_keeps_opposite_corner() {
        let original = Geometry::new(Point::new(100.0, 100.0), 100.0, 60.0);
        let resized = apply_corner_resize(&original, Corner::TopLeft, Vec2::new(50.0, 30.0));
        assert!(approx(resized.scaled_width(), 50.0));
        assert!(approx(resized.scaled_height(), 30.0));
        let bounds = resized.bounds();
        assert!(approx(bounds.x1, 200.0));
        assert!(approx(bounds.y1, 160.0));
    }

    #[test]
    fn test_rotated_resize_keeps_anchor() {
        let mut original = Geometry::new(Point::new(0.0, 0.0), 100.0, 100.0);
        original.angle = 30.0;
        let anchor_before = handles_for(&original)[0].position;
        let resized = apply_corner_resize(&original, Corner::BottomRight, Vec2::new(40.0, 10.0));
        let anchor_after = handles_for(&resized)[0].position;
        assert!(approx(anchor_before.x, anchor_after.x));
        assert!(approx(anchor_before.y, anchor_after.y));
    }

    #[test]
    fn test_resize_clamps_to_minimum() {
        let original = Geometry::new(Point::ZERO, 100.0, 100.0);
        let resized = apply_corner_resize(&original, Corner::BottomRight, Vec2::new(-500.0, -500.0));
        assert!(approx(resized.scaled_width(), MIN_RESIZE));
        assert!(resized.validate().is_ok());
    }

    #[test]
    fn test_rotation() {
        let original = Geometry::new(Point::ZERO, 100.0, 100.0);
        let right = apply_rotation(&original, Point::new(200.0, 50.0), false);
        assert!(approx(right.angle, 90.0));
        let snapped = apply_rotation(&original, Point::new(200.0, 40.0), true);
        assert!(approx(snapped.angle, 90.0));
        let up = apply_rotation(&original, Point::new(50.0, -100.0), false);
        assert!(approx(up.angle, 0.0));
    }

    #[test]
    fn test_move_preview() {
        let original = Geometry::new(Point::new(10.0, 10.0), 20.0, 20.0);
        let mut state = ManipulationState::new(uuid::Uuid::new_v4(), None, Point::new(15.0, 15.0), original);
        state.current_point = Point::new(25.0, 35.0);
        assert_eq!(state.preview(false).position, Point::new(20.0, 30.0));
    }

    #[test]
    fn test_descriptor_modes() {
        let mut scene = Scene::default();
        let brush = BrushSettings::default();
        assert_eq!(
            SelectionDescriptor::compute(&scene, ToolMode::Select, &brush),
            SelectionDescriptor::Canvas {
                background: SerializableColor::white()
            }
        );
        assert_eq!(
            SelectionDescriptor::compute(&scene, ToolMode::Draw, &brush),
            SelectionDescriptor::Brush(brush)
        );

        let a = scene
            .create_object(Shape::Rect, ObjectAttrs::at(Point::ZERO, 10.0, 20.0).with_scale(2.0, 1.0))
            .unwrap();
        let b = scene
            .create_object(Shape::Rect, ObjectAttrs::at(Point::ZERO, 10.0, 10.0))
            .unwrap();
        scene.select(a);
        let descriptor = SelectionDescriptor::compute(&scene, ToolMode::Select, &brush);
        let object = descriptor.object().unwrap();
        assert_eq!(object.id, a);
        assert_eq!(object.width, 20.0);
        assert_eq!(object.height, 20.0);
        assert!(!object.shadow.enabled);

        scene.add_to_selection(b);
        assert_eq!(
            SelectionDescriptor::compute(&scene, ToolMode::Filter, &brush),
            SelectionDescriptor::Multiple { ids: vec![a, b] }
        );
    }
}
