//! End-to-end editing scenarios driven through the public editor API.

use kurbo::Point;
use lumina_core::import::BoxFuture;
use lumina_core::shapes::ImageFormat;
use lumina_core::{
    Editor, EditorConfig, EditorEvent, ImageFilter, ImageLoader, ImageResource, ImportError, ObjectKind,
    PropertyEdit, SerializableColor, ShapeKind, ToolMode,
};
use pretty_assertions::assert_eq;
use std::path::Path;

fn editor() -> Editor {
    Editor::new(EditorConfig::default()).unwrap()
}

fn snapshot(editor: &Editor) -> String {
    editor.scene().to_snapshot().unwrap()
}

fn red() -> SerializableColor {
    SerializableColor::from_hex("#ff0000").unwrap()
}

/// Loader that answers from memory.
struct FakeLoader {
    result: Result<ImageResource, ImportError>,
}

impl ImageLoader for FakeLoader {
    fn load<'a>(&'a self, _path: &'a Path) -> BoxFuture<'a, Result<ImageResource, ImportError>> {
        let result = self.result.clone();
        Box::pin(async move { result })
    }
}

#[test]
fn undo_all_returns_to_empty_scene() {
    let mut editor = editor();
    let initial = snapshot(&editor);
    let rect = editor.add_shape(ShapeKind::Rect).unwrap();
    editor.add_shape(ShapeKind::Ellipse).unwrap();
    editor.add_text().unwrap();
    editor.select(rect);
    editor.apply_property_edit(&PropertyEdit::Angle(30.0)).unwrap();
    editor.send_to_back(rect).unwrap();

    let steps = editor.history().len() - 1;
    for _ in 0..steps {
        assert!(editor.undo().unwrap());
    }
    assert_eq!(snapshot(&editor), initial);
    assert!(!editor.undo().unwrap());
}

#[test]
fn undo_then_redo_is_byte_identical() {
    let mut editor = editor();
    editor.add_shape(ShapeKind::Triangle).unwrap();
    editor.apply_property_edit(&PropertyEdit::Fill(Some(red()))).unwrap();
    let after_edit = snapshot(&editor);

    assert!(editor.undo().unwrap());
    assert_ne!(snapshot(&editor), after_edit);
    assert!(editor.redo().unwrap());
    assert_eq!(snapshot(&editor), after_edit);
}

#[test]
fn commit_after_undo_discards_redo() {
    let mut editor = editor();
    editor.add_shape(ShapeKind::Rect).unwrap();
    editor.add_shape(ShapeKind::Ellipse).unwrap();
    assert!(editor.undo().unwrap());
    assert!(editor.can_redo());

    editor.add_shape(ShapeKind::Triangle).unwrap();
    assert!(!editor.can_redo());
    assert!(!editor.redo().unwrap());
    let kinds: Vec<_> = editor
        .scene()
        .objects_by_paint_order()
        .iter()
        .map(|o| o.kind())
        .collect();
    assert_eq!(kinds, vec![ObjectKind::Rect, ObjectKind::Triangle]);
}

#[test]
fn boundary_layer_moves_leave_history_alone() {
    let mut editor = editor();
    let rect = editor.add_shape(ShapeKind::Rect).unwrap();
    let before = snapshot(&editor);
    let len = editor.history().len();

    assert!(!editor.bring_forward(rect).unwrap());
    assert!(!editor.bring_to_front(rect).unwrap());
    assert!(!editor.send_backward(rect).unwrap());
    assert!(!editor.send_to_back(rect).unwrap());
    assert_eq!(editor.history().len(), len);
    assert_eq!(snapshot(&editor), before);
}

#[test]
fn zero_width_is_rejected_without_touching_stroke() {
    let mut editor = editor();
    let id = editor.add_shape(ShapeKind::Rect).unwrap();
    editor.apply_property_edit(&PropertyEdit::StrokeWidth(3.0)).unwrap();
    let len = editor.history().len();

    assert!(!editor.apply_property_edit(&PropertyEdit::Width(0.0)).unwrap());
    let object = editor.scene().get_object(id).unwrap();
    assert_eq!(object.geometry.scale_x, 1.0);
    assert_eq!(object.style.stroke_width, 3.0);
    assert_eq!(editor.history().len(), len);
}

#[test]
fn mode_switch_mid_placement_creates_nothing() {
    let mut editor = editor();
    editor.set_mode(ToolMode::ShapePending(ShapeKind::Rect));
    editor.pointer_down(Point::new(20.0, 20.0), false);
    editor.pointer_move(Point::new(120.0, 90.0));
    editor.set_mode(ToolMode::Draw);
    editor.pointer_up(Point::new(120.0, 90.0)).unwrap();

    assert!(editor.scene().is_empty());
    assert_eq!(editor.history().len(), 1);
}

#[test]
fn move_then_fill_then_double_undo() {
    let mut editor = editor();
    let id = editor.add_shape(ShapeKind::Rect).unwrap();
    let created = snapshot(&editor);

    editor.pointer_down(Point::new(150.0, 130.0), false);
    editor.pointer_move(Point::new(200.0, 180.0));
    assert_eq!(editor.pointer_up(Point::new(250.0, 230.0)).unwrap(), Some(id));
    assert!(editor.apply_property_edit(&PropertyEdit::Fill(Some(red()))).unwrap());

    let object = editor.scene().get_object(id).unwrap();
    assert_eq!(object.geometry.position, Point::new(200.0, 200.0));
    assert_eq!(object.style.fill, Some(red()));

    assert!(editor.undo().unwrap());
    assert!(editor.undo().unwrap());
    assert_eq!(snapshot(&editor), created);
    let object = editor.scene().get_object(id).unwrap();
    assert_eq!(object.geometry.position, Point::new(100.0, 100.0));
    assert_eq!(object.style.fill, None);
}

#[test]
fn stroke_undo_then_undo_again_is_noop() {
    let mut editor = editor();
    editor.set_mode(ToolMode::Draw);
    editor.pointer_down(Point::new(10.0, 10.0), false);
    editor.pointer_move(Point::new(40.0, 30.0));
    editor.pointer_move(Point::new(80.0, 20.0));
    editor.pointer_up(Point::new(120.0, 60.0)).unwrap().unwrap();
    editor.set_mode(ToolMode::Select);

    assert!(editor.undo().unwrap());
    assert!(editor.scene().is_empty());
    assert!(!editor.undo().unwrap());
    assert!(editor.scene().is_empty());
}

#[test]
fn send_backward_swaps_paint_order_and_layer_list() {
    let mut editor = editor();
    let a = editor.add_shape(ShapeKind::Rect).unwrap();
    let b = editor.add_shape(ShapeKind::Ellipse).unwrap();
    assert!(editor.send_backward(b).unwrap());

    let paint: Vec<_> = editor
        .scene()
        .objects_by_paint_order()
        .iter()
        .map(|o| o.id())
        .collect();
    assert_eq!(paint, vec![b, a]);
    let layers: Vec<_> = editor.layers().iter().map(|l| l.id).collect();
    assert_eq!(layers, vec![a, b]);
}

#[test]
fn import_through_loader() {
    let mut editor = editor();
    let loader = FakeLoader {
        result: Ok(ImageResource {
            uri: "data:image/jpeg;base64,".into(),
            width: 1200,
            height: 600,
            format: ImageFormat::Jpeg,
        }),
    };
    let id = pollster::block_on(editor.import_image(&loader, Path::new("photo.jpg")))
        .unwrap()
        .unwrap();

    let descriptor = editor.selection().object().unwrap();
    assert_eq!(descriptor.id, id);
    assert_eq!(descriptor.kind, ObjectKind::Image);
    assert_eq!((descriptor.width, descriptor.height), (300.0, 150.0));
    assert_eq!(editor.mode(), ToolMode::Select);

    editor.set_mode(ToolMode::Filter);
    assert!(editor.apply_filter(ImageFilter::Grayscale).unwrap());
    assert!(editor.apply_filter(ImageFilter::Blur { amount: 0.3 }).unwrap());
    assert_eq!(
        editor.selection().object().unwrap().filters,
        vec![ImageFilter::Grayscale, ImageFilter::Blur { amount: 0.3 }]
    );
}

#[test]
fn failed_import_raises_single_notice() {
    let mut editor = editor();
    let before = snapshot(&editor);
    let loader = FakeLoader {
        result: Err(ImportError::Io("permission denied".into())),
    };
    let created = pollster::block_on(editor.import_image(&loader, Path::new("locked.png"))).unwrap();
    assert_eq!(created, None);
    assert_eq!(snapshot(&editor), before);
    assert_eq!(editor.history().len(), 1);

    let notices: Vec<_> = editor
        .drain_events()
        .into_iter()
        .filter_map(|e| match e {
            EditorEvent::Notice(notice) => Some(notice.message),
            _ => None,
        })
        .collect();
    assert_eq!(notices.len(), 1);
    assert!(notices[0].contains("permission denied"));
}

#[test]
fn shadow_settings_survive_toggle_and_undo() {
    let mut editor = editor();
    editor.add_shape(ShapeKind::Ellipse).unwrap();
    editor.apply_property_edit(&PropertyEdit::ShadowEnabled(true)).unwrap();
    editor.apply_property_edit(&PropertyEdit::ShadowBlur(25.0)).unwrap();
    editor.apply_property_edit(&PropertyEdit::ShadowEnabled(false)).unwrap();

    let shadow = editor.selection().object().unwrap().shadow;
    assert!(!shadow.enabled);
    assert_eq!(shadow.blur, 25.0);

    editor.undo().unwrap();
    let shadow = editor.selection().object().unwrap().shadow;
    assert!(shadow.enabled);
    assert_eq!(shadow.blur, 25.0);
}

#[test]
fn history_limit_drops_oldest_entries() {
    let config = EditorConfig {
        history_limit: 3,
        ..Default::default()
    };
    let mut editor = Editor::new(config).unwrap();
    for _ in 0..5 {
        editor.add_shape(ShapeKind::Rect).unwrap();
    }
    assert_eq!(editor.history().len(), 3);
    assert!(editor.undo().unwrap());
    assert!(editor.undo().unwrap());
    assert!(!editor.undo().unwrap());
    assert_eq!(editor.scene().len(), 3);
}
