//! Raw platform input and its normalization into [`Event`]s.
//!
//! Platform callbacks deliver mouse, touch gesture, keyboard and drag-and-drop
//! notifications with positions in the parent window's space. The
//! [`EventNormalizer`] turns each of them into zero or more canonical events:
//! it synthesizes double-clicks, remaps touch gestures onto the mouse
//! vocabulary when the active interaction does not want raw gestures, and
//! drops input the editor ignores.

use crate::config::EditorConfig;
use crate::event::{Event, EventDetail, EventKind, EventSource, Modifiers};
use crate::interaction::GestureUse;
use crate::viewer::Viewer;
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// What a mouse notification reports.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MouseAction {
    Down(MouseButton),
    Up(MouseButton),
    Move,
    Exit,
    Wheel { delta: Vec2 },
}

/// A mouse notification.
///
/// `timestamp` must come from a monotonic clock shared by all presses;
/// double-clicks are recognized by comparing it against the previous press.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MouseInput {
    pub action: MouseAction,
    /// Position in the parent window's device pixels.
    pub position: Point,
    pub modifiers: Modifiers,
    pub timestamp: Duration,
}

impl MouseInput {
    pub fn new(action: MouseAction, position: Point, timestamp: Duration) -> Self {
        Self {
            action,
            position,
            modifiers: Modifiers::NONE,
            timestamp,
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

/// Recognized touch gesture phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GestureKind {
    Tap,
    DoubleTap,
    Hold,
    PanStart,
    PanMove,
    PanEnd,
    PinchStart,
    PinchMove,
    PinchEnd,
    RotateStart,
    RotateMove,
    RotateEnd,
    Cancel,
}

/// Device that produced a gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointerType {
    Mouse,
    Touch,
    Pen,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GestureInput {
    pub kind: GestureKind,
    pub position: Point,
    /// Number of pointers in contact.
    pub pointers: usize,
    /// Cumulative pinch scale since the gesture started.
    pub scale: f64,
    /// Cumulative rotation in radians since the gesture started.
    pub rotation: f64,
    pub pointer_type: PointerType,
    pub timestamp: Duration,
}

impl GestureInput {
    /// A single-finger touch gesture.
    pub fn touch(kind: GestureKind, position: Point) -> Self {
        Self {
            kind,
            position,
            pointers: 1,
            scale: 1.0,
            rotation: 0.0,
            pointer_type: PointerType::Touch,
            timestamp: Duration::ZERO,
        }
    }

    pub fn with_pointers(mut self, pointers: usize) -> Self {
        self.pointers = pointers;
        self
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_pointer_type(mut self, pointer_type: PointerType) -> Self {
        self.pointer_type = pointer_type;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyInput {
    pub key: String,
    pub pressed: bool,
    pub modifiers: Modifiers,
    pub timestamp: Duration,
}

impl KeyInput {
    pub fn pressed(key: impl Into<String>, modifiers: Modifiers) -> Self {
        Self {
            key: key.into(),
            pressed: true,
            modifiers,
            timestamp: Duration::ZERO,
        }
    }

    pub fn released(key: impl Into<String>, modifiers: Modifiers) -> Self {
        Self {
            pressed: false,
            ..Self::pressed(key, modifiers)
        }
    }
}

/// Drag-and-drop phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DragKind {
    Enter,
    Over,
    Leave,
    Exit,
    Drop,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DragInput {
    pub kind: DragKind,
    pub position: Point,
    /// Payload carried by the drag, if any.
    pub data: Option<String>,
    pub modifiers: Modifiers,
    pub timestamp: Duration,
}

impl DragInput {
    pub fn new(kind: DragKind, position: Point) -> Self {
        Self {
            kind,
            position,
            data: None,
            modifiers: Modifiers::NONE,
            timestamp: Duration::ZERO,
        }
    }

    pub fn with_data(mut self, data: impl Into<String>) -> Self {
        self.data = Some(data.into());
        self
    }
}

/// Any raw notification from the platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RawInput {
    Mouse(MouseInput),
    Gesture(GestureInput),
    Key(KeyInput),
    Drag(DragInput),
}

impl From<MouseInput> for RawInput {
    fn from(input: MouseInput) -> Self {
        RawInput::Mouse(input)
    }
}

impl From<GestureInput> for RawInput {
    fn from(input: GestureInput) -> Self {
        RawInput::Gesture(input)
    }
}

impl From<KeyInput> for RawInput {
    fn from(input: KeyInput) -> Self {
        RawInput::Key(input)
    }
}

impl From<DragInput> for RawInput {
    fn from(input: DragInput) -> Self {
        RawInput::Drag(input)
    }
}

/// Turns raw platform input into canonical events.
#[derive(Debug, Clone)]
pub struct EventNormalizer {
    /// Time and device position of the last press that can start a double-click.
    last_down: Option<(Duration, Point)>,
    /// A synthesized press from a touch pan is in progress.
    pressed: bool,
    /// Last known pointer position in canvas device pixels.
    pointer: Point,
    double_click_window: Duration,
    double_click_distance: f64,
}

impl Default for EventNormalizer {
    fn default() -> Self {
        Self::new(&EditorConfig::default())
    }
}

impl EventNormalizer {
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            last_down: None,
            pressed: false,
            pointer: Point::ZERO,
            double_click_window: Duration::from_millis(config.double_click_ms),
            double_click_distance: config.double_click_distance,
        }
    }

    /// Whether a gesture-synthesized press is in progress.
    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// Normalize one raw input.
    ///
    /// `uses` describes which gestures the active interaction consumes
    /// directly; the rest are remapped or dropped.
    pub fn normalize(&mut self, input: RawInput, viewer: &dyn Viewer, uses: GestureUse) -> Vec<Event> {
        match input {
            RawInput::Mouse(mouse) => self.normalize_mouse(mouse, viewer),
            RawInput::Gesture(gesture) => self.normalize_gesture(gesture, viewer, uses),
            RawInput::Key(key) => self.normalize_key(key, viewer),
            RawInput::Drag(drag) => self.normalize_drag(drag, viewer),
        }
    }

    fn event(
        &mut self,
        kind: EventKind,
        source: EventSource,
        parent_position: Point,
        viewer: &dyn Viewer,
    ) -> Event {
        let device = viewer.translate_from_parent(parent_position);
        self.pointer = device;
        Event::new(kind, source, device, viewer.camera().to_logical(device))
    }

    fn normalize_mouse(&mut self, input: MouseInput, viewer: &dyn Viewer) -> Vec<Event> {
        let MouseInput {
            action,
            position,
            modifiers,
            timestamp,
        } = input;
        let (kind, detail) = match action {
            MouseAction::Down(MouseButton::Left) => {
                let device = viewer.translate_from_parent(position);
                (self.classify_press(device, timestamp), EventDetail::None)
            }
            MouseAction::Up(MouseButton::Left) => (EventKind::MouseUp, EventDetail::None),
            MouseAction::Down(MouseButton::Right) => (EventKind::RightMouseDown, EventDetail::None),
            MouseAction::Up(MouseButton::Right) => (EventKind::RightMouseUp, EventDetail::None),
            MouseAction::Down(MouseButton::Middle) | MouseAction::Up(MouseButton::Middle) => {
                log::trace!("Ignoring middle button");
                return Vec::new();
            }
            MouseAction::Move => (EventKind::MouseMove, EventDetail::None),
            MouseAction::Exit => (EventKind::MouseExit, EventDetail::None),
            MouseAction::Wheel { delta } => (EventKind::Wheel, EventDetail::Wheel { delta }),
        };
        let event = self
            .event(kind, EventSource::Mouse, position, viewer)
            .with_modifiers(modifiers)
            .with_timestamp(timestamp)
            .with_detail(detail);
        vec![event]
    }

    /// A press either starts a new click or completes a double-click.
    fn classify_press(&mut self, device: Point, timestamp: Duration) -> EventKind {
        if let Some((last_time, last_position)) = self.last_down {
            let elapsed = timestamp.saturating_sub(last_time);
            let distance = (device - last_position).hypot();
            if elapsed <= self.double_click_window && distance <= self.double_click_distance {
                // A third press starts over instead of forming another double-click.
                self.last_down = None;
                return EventKind::DoubleClick;
            }
        }
        self.last_down = Some((timestamp, device));
        EventKind::MouseDown
    }

    fn normalize_gesture(&mut self, input: GestureInput, viewer: &dyn Viewer, uses: GestureUse) -> Vec<Event> {
        if input.pointer_type == PointerType::Mouse {
            // The same contact also arrives as mouse input.
            return Vec::new();
        }
        let detail = EventDetail::Gesture {
            pointers: input.pointers,
            scale: input.scale,
            rotation: input.rotation,
        };
        let mut events = Vec::new();
        let mut push = |this: &mut Self, kind: EventKind, source: EventSource| {
            let event = this
                .event(kind, source, input.position, viewer)
                .with_timestamp(input.timestamp)
                .with_detail(detail.clone());
            events.push(event);
        };

        let forwarded = match input.kind {
            GestureKind::PanStart if uses.pan => Some(EventKind::PanStart),
            GestureKind::PanMove if uses.pan => Some(EventKind::Pan),
            GestureKind::PanEnd if uses.pan => Some(EventKind::PanEnd),
            GestureKind::PinchStart if uses.pinch => Some(EventKind::PinchStart),
            GestureKind::PinchMove if uses.pinch => Some(EventKind::Pinch),
            GestureKind::PinchEnd if uses.pinch => Some(EventKind::PinchEnd),
            GestureKind::RotateStart if uses.rotate => Some(EventKind::RotateStart),
            GestureKind::RotateMove if uses.rotate => Some(EventKind::Rotate),
            GestureKind::RotateEnd if uses.rotate => Some(EventKind::RotateEnd),
            _ => None,
        };
        if let Some(kind) = forwarded {
            push(self, kind, EventSource::Gesture);
            return events;
        }

        // A second pointer aborts the mouse interpretation of the gesture.
        if input.pointers > 1 {
            if self.pressed {
                self.pressed = false;
                push(self, EventKind::MouseUp, EventSource::Touch);
            }
            return events;
        }

        match input.kind {
            GestureKind::Tap => {
                push(self, EventKind::MouseDown, EventSource::Touch);
                push(self, EventKind::MouseUp, EventSource::Touch);
            }
            GestureKind::DoubleTap => push(self, EventKind::DoubleClick, EventSource::Touch),
            GestureKind::Hold => push(self, EventKind::Hold, EventSource::Gesture),
            GestureKind::PanStart => {
                self.pressed = true;
                push(self, EventKind::MouseDown, EventSource::Touch);
            }
            GestureKind::PanMove => {
                if !self.pressed {
                    self.pressed = true;
                    push(self, EventKind::MouseDown, EventSource::Touch);
                }
                push(self, EventKind::MouseMove, EventSource::Touch);
            }
            GestureKind::PanEnd => {
                if self.pressed {
                    self.pressed = false;
                    push(self, EventKind::MouseUp, EventSource::Touch);
                }
            }
            GestureKind::Cancel => {
                if self.pressed {
                    self.pressed = false;
                    push(self, EventKind::MouseExit, EventSource::Touch);
                }
            }
            GestureKind::PinchStart
            | GestureKind::PinchMove
            | GestureKind::PinchEnd
            | GestureKind::RotateStart
            | GestureKind::RotateMove
            | GestureKind::RotateEnd => {
                log::trace!("Dropping {:?}: not used by the active interaction", input.kind);
            }
        }
        events
    }

    fn normalize_key(&mut self, input: KeyInput, viewer: &dyn Viewer) -> Vec<Event> {
        let kind = if input.pressed {
            EventKind::KeyDown
        } else {
            EventKind::KeyUp
        };
        let device = self.pointer;
        let event = Event::new(kind, EventSource::Key, device, viewer.camera().to_logical(device))
            .with_modifiers(input.modifiers)
            .with_timestamp(input.timestamp)
            .with_detail(EventDetail::Key { key: input.key });
        vec![event]
    }

    fn normalize_drag(&mut self, input: DragInput, viewer: &dyn Viewer) -> Vec<Event> {
        let kind = match input.kind {
            DragKind::Enter => EventKind::DragEnter,
            DragKind::Over => EventKind::DragOver,
            DragKind::Leave => EventKind::DragLeave,
            DragKind::Exit => EventKind::DragExit,
            DragKind::Drop => EventKind::Drop,
        };
        let mut event = self
            .event(kind, EventSource::Drag, input.position, viewer)
            .with_modifiers(input.modifiers)
            .with_timestamp(input.timestamp);
        if kind == EventKind::Drop {
            event.detail = EventDetail::Drop { data: input.data };
            event.prevent_default();
            event.request_repaint = true;
        }
        vec![event]
    }
}
