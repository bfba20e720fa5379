//! Tool modes and in-progress gesture state.

use crate::selection::ManipulationState;
use crate::shapes::{SerializableColor, Shape};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Shapes available from the shape palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    Rect,
    Ellipse,
    Triangle,
}

impl ShapeKind {
    pub fn shape(self) -> Shape {
        match self {
            ShapeKind::Rect => Shape::Rect,
            ShapeKind::Ellipse => Shape::Ellipse,
            ShapeKind::Triangle => Shape::Triangle,
        }
    }
}

/// The active editing mode. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(tag = "mode", content = "shape", rename_all = "snake_case")]
pub enum ToolMode {
    #[default]
    Select,
    Draw,
    ShapePending(ShapeKind),
    TextInsert,
    ImageInsert,
    Filter,
}

impl ToolMode {
    /// Modes in which the selection survives a mode switch.
    pub fn keeps_selection(self) -> bool {
        matches!(self, ToolMode::Select | ToolMode::Filter)
    }

    pub fn name(self) -> &'static str {
        match self {
            ToolMode::Select => "select",
            ToolMode::Draw => "draw",
            ToolMode::ShapePending(_) => "shape",
            ToolMode::TextInsert => "text",
            ToolMode::ImageInsert => "image",
            ToolMode::Filter => "filter",
        }
    }
}

/// Brush used in draw mode. Persists across draw-mode activations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BrushSettings {
    pub color: SerializableColor,
    pub width: f64,
}

impl Default for BrushSettings {
    fn default() -> Self {
        Self {
            color: SerializableColor::black(),
            width: 5.0,
        }
    }
}

/// An in-progress pointer gesture. Nothing here is committed until release.
#[derive(Debug, Clone, Default)]
pub enum Gesture {
    #[default]
    Idle,
    /// Freehand stroke being recorded, in scene coordinates.
    Stroke {
        points: Vec<Point>,
        brush: BrushSettings,
    },
    /// Placement drag for a pending shape or text insert.
    Placement { start: Point, current: Point },
    /// Move, resize or rotate of an existing object.
    Manipulate(ManipulationState),
}

impl Gesture {
    pub fn is_idle(&self) -> bool {
        matches!(self, Gesture::Idle)
    }
}

/// Current mode, brush and gesture.
#[derive(Debug, Clone, Default)]
pub struct ToolState {
    mode: ToolMode,
    pub brush: BrushSettings,
    gesture: Gesture,
}

impl ToolState {
    pub fn new(brush: BrushSettings) -> Self {
        Self {
            brush,
            ..Default::default()
        }
    }

    pub fn mode(&self) -> ToolMode {
        self.mode
    }

    /// Switch mode, returning the gesture that was in progress (if any).
    pub fn set_mode(&mut self, mode: ToolMode) -> Gesture {
        self.mode = mode;
        self.take_gesture()
    }

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    pub fn gesture_mut(&mut self) -> &mut Gesture {
        &mut self.gesture
    }

    pub fn begin(&mut self, gesture: Gesture) {
        self.gesture = gesture;
    }

    /// End the current gesture and return it.
    pub fn take_gesture(&mut self) -> Gesture {
        std::mem::take(&mut self.gesture)
    }
}
