//! Viewer contract consumed by the interaction and command layers.

use crate::camera::Camera;
use crate::document::{Document, ItemId};
use crate::event::Event;
use crate::interaction::Interaction;
use kurbo::{Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};
use std::ops::{Deref, DerefMut};

/// Named configuration that determines the fallback interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ViewMode {
    #[default]
    Edit,
    ReadOnly,
}

/// Pointer cursor requested by the viewer or an interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Cursor {
    #[default]
    Default,
    Pointer,
    Move,
    Crosshair,
    Grab,
    Grabbing,
    ResizeNwse,
    ResizeNesw,
}

/// Transient visual overlay drawn on top of the scene.
#[derive(Debug, Clone, PartialEq)]
pub enum Feedback {
    /// Rubber-band selection rectangle.
    Marquee(Rect),
    /// Selected items being dragged by `offset`.
    MovePreview { items: Vec<ItemId>, offset: Vec2 },
    /// Outline of an item being created.
    CreatePreview(Rect),
    /// Outline of an item being reshaped.
    EditPreview { item: ItemId, bounds: Rect },
}

/// The view hosting a document.
///
/// Every method except the mode, camera, document and selection accessors
/// has a default body, so lightweight viewers only implement what they need.
pub trait Viewer {
    /// Current view mode.
    fn view_mode(&self) -> ViewMode;

    /// Switch the view mode. Read-only viewers may ignore this.
    fn set_view_mode(&mut self, _mode: ViewMode) {}

    /// Create the fallback interaction for the current view mode.
    fn default_interaction(&self) -> Box<dyn Interaction>;

    fn camera(&self) -> &Camera;

    fn camera_mut(&mut self) -> &mut Camera;

    /// The scene model.
    fn document(&self) -> &Document;

    fn document_mut(&mut self) -> &mut Document;

    fn selection(&self) -> &[ItemId];

    /// Replace the selection. Implementations must notify selection observers
    /// even when the new selection equals the old one.
    fn set_selection(&mut self, items: Vec<ItemId>);

    fn clear_selection(&mut self) {
        self.set_selection(Vec::new());
    }

    /// Map a point from the parent (window) space to canvas-local device pixels.
    fn translate_from_parent(&self, point: Point) -> Point {
        point
    }

    fn cursor(&self) -> Cursor {
        Cursor::Default
    }

    fn set_cursor(&mut self, _cursor: Cursor) {}

    /// Viewer-level handling that runs before the active interaction
    /// (scrollbars, embedded widgets). Mark the event consumed to stop it.
    fn intercept(&mut self, _event: &mut Event) {}

    /// Wheel handling for nested scroll containers, offered before
    /// `intercept`.
    fn on_wheel(&mut self, _event: &mut Event) {}

    /// Whether a device point lies on a scrollbar.
    fn hit_scrollbar(&self, _device_point: Point) -> bool {
        false
    }

    /// Increase the drawing suspension depth.
    fn suspend_drawing(&mut self) {}

    /// Decrease the drawing suspension depth.
    fn resume_drawing(&mut self) {}

    fn is_drawing_enabled(&self) -> bool {
        true
    }

    fn request_repaint(&mut self) {}

    /// Keep repainting every frame while a drag is in progress.
    fn set_repaint_on_drag(&mut self) {}

    fn set_feedback(&mut self, _feedback: Option<Feedback>) {}

    fn clear_feedback(&mut self) {
        self.set_feedback(None);
    }

    fn viewport_size(&self) -> Size {
        Size::ZERO
    }

    fn set_viewport_size(&mut self, _size: Size) {}
}

/// Scoped drawing suspension.
///
/// Drawing is suspended on construction (when `active`) and resumed on drop,
/// so every exit path, including `?` propagation, re-enables it.
pub struct SuspendDrawing<'a> {
    viewer: &'a mut dyn Viewer,
    active: bool,
}

impl<'a> SuspendDrawing<'a> {
    pub fn new(viewer: &'a mut dyn Viewer, active: bool) -> Self {
        if active {
            viewer.suspend_drawing();
        }
        Self { viewer, active }
    }
}

impl<'a> Deref for SuspendDrawing<'a> {
    type Target = dyn Viewer + 'a;

    fn deref(&self) -> &Self::Target {
        &*self.viewer
    }
}

impl DerefMut for SuspendDrawing<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.viewer
    }
}

impl Drop for SuspendDrawing<'_> {
    fn drop(&mut self) {
        if self.active {
            self.viewer.resume_drawing();
        }
    }
}
