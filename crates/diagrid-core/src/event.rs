//! Canonical event model delivered to interactions.

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub fn shift() -> Self {
        Self {
            shift: true,
            ..Self::NONE
        }
    }

    pub fn ctrl() -> Self {
        Self {
            ctrl: true,
            ..Self::NONE
        }
    }

    /// Ctrl on most platforms, Cmd on macOS.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// Which device family produced an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventSource {
    Mouse,
    Touch,
    Gesture,
    Key,
    Drag,
}

/// Classified event type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    MouseDown,
    MouseMove,
    MouseUp,
    DoubleClick,
    MouseExit,
    Wheel,
    RightMouseDown,
    RightMouseUp,
    KeyDown,
    KeyUp,
    PanStart,
    Pan,
    PanEnd,
    PinchStart,
    Pinch,
    PinchEnd,
    RotateStart,
    Rotate,
    RotateEnd,
    Hold,
    DragEnter,
    DragOver,
    DragLeave,
    DragExit,
    Drop,
}

impl EventKind {
    /// Whether the event carries a meaningful pointer position.
    pub fn is_pointer(self) -> bool {
        !matches!(self, EventKind::KeyDown | EventKind::KeyUp)
    }

    /// Whether the event ends a left-button drag.
    pub fn ends_drag(self) -> bool {
        matches!(self, EventKind::MouseUp | EventKind::MouseExit)
    }
}

/// Kind-specific payload.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum EventDetail {
    #[default]
    None,
    Wheel {
        delta: Vec2,
    },
    Key {
        key: String,
    },
    Gesture {
        pointers: usize,
        scale: f64,
        rotation: f64,
    },
    Drop {
        data: Option<String>,
    },
}

/// A normalized input event.
///
/// `logical_location` is always computed from `device_location` with the
/// camera in effect when the event was produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub kind: EventKind,
    pub source: EventSource,
    /// Position in device pixels, relative to the canvas.
    pub device_location: Point,
    /// Position in document coordinates.
    pub logical_location: Point,
    pub modifiers: Modifiers,
    /// Set by any upstream component that handled the event.
    pub consumed: bool,
    /// Set by handlers that need the canvas redrawn.
    pub request_repaint: bool,
    /// True while a left-button drag is in progress.
    pub is_dragging: bool,
    /// Set when the platform's default action must be suppressed.
    pub default_prevented: bool,
    /// Monotonic time of the originating platform callback.
    pub timestamp: Duration,
    pub detail: EventDetail,
}

impl Event {
    /// Create an event with no payload and all flags cleared.
    pub fn new(
        kind: EventKind,
        source: EventSource,
        device_location: Point,
        logical_location: Point,
    ) -> Self {
        Self {
            kind,
            source,
            device_location,
            logical_location,
            modifiers: Modifiers::default(),
            consumed: false,
            request_repaint: false,
            is_dragging: false,
            default_prevented: false,
            timestamp: Duration::ZERO,
            detail: EventDetail::None,
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn with_detail(mut self, detail: EventDetail) -> Self {
        self.detail = detail;
        self
    }

    pub fn with_timestamp(mut self, timestamp: Duration) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Mark the event as handled.
    pub fn consume(&mut self) {
        self.consumed = true;
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    /// Key name for keyboard events.
    pub fn key(&self) -> Option<&str> {
        match &self.detail {
            EventDetail::Key { key } => Some(key),
            _ => None,
        }
    }

    /// Scroll delta for wheel events.
    pub fn wheel_delta(&self) -> Option<Vec2> {
        match self.detail {
            EventDetail::Wheel { delta } => Some(delta),
            _ => None,
        }
    }

    /// Scale factor for pinch gestures.
    pub fn gesture_scale(&self) -> Option<f64> {
        match self.detail {
            EventDetail::Gesture { scale, .. } => Some(scale),
            _ => None,
        }
    }

    /// Rotation (radians) for rotate gestures.
    pub fn gesture_rotation(&self) -> Option<f64> {
        match self.detail {
            EventDetail::Gesture { rotation, .. } => Some(rotation),
            _ => None,
        }
    }

    /// Payload carried by a drop.
    pub fn drop_data(&self) -> Option<&str> {
        match &self.detail {
            EventDetail::Drop { data } => data.as_deref(),
            _ => None,
        }
    }
}
