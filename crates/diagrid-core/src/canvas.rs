//! Reference viewer: an in-memory canvas hosting one document.

use crate::camera::Camera;
use crate::document::{Document, ItemId};
use crate::event::{Event, EventKind};
use crate::interaction::{EditInteraction, Interaction, ReadOnlyInteraction};
use crate::viewer::{Cursor, Feedback, ViewMode, Viewer};
use kurbo::{Point, Rect, Size, Vec2};

/// Runtime canvas state (not persisted).
///
/// Keeps counters for the side effects the editing core triggers (repaints,
/// selection notifications) so that hosts and tests can observe them.
#[derive(Debug, Clone)]
pub struct CanvasViewer {
    document: Document,
    camera: Camera,
    selection: Vec<ItemId>,
    view_mode: ViewMode,
    cursor: Cursor,
    viewport_size: Size,
    /// Canvas position inside its parent window, in device pixels.
    origin: Vec2,
    /// Scrollbar areas in canvas device coordinates.
    scrollbars: Vec<Rect>,
    /// Nested scroll containers that take wheel events before the canvas.
    scroll_regions: Vec<Rect>,
    suspend_depth: usize,
    feedback: Option<Feedback>,
    repaint_requests: usize,
    drag_repaints: usize,
    selection_notifications: usize,
}

impl Default for CanvasViewer {
    fn default() -> Self {
        Self::new()
    }
}

impl CanvasViewer {
    /// Create a new canvas with an empty document.
    pub fn new() -> Self {
        Self::with_document(Document::new())
    }

    /// Create a canvas with an existing document.
    pub fn with_document(document: Document) -> Self {
        Self {
            document,
            camera: Camera::new(),
            selection: Vec::new(),
            view_mode: ViewMode::default(),
            cursor: Cursor::Default,
            viewport_size: Size::new(800.0, 600.0),
            origin: Vec2::ZERO,
            scrollbars: Vec::new(),
            scroll_regions: Vec::new(),
            suspend_depth: 0,
            feedback: None,
            repaint_requests: 0,
            drag_repaints: 0,
            selection_notifications: 0,
        }
    }

    /// Set where the canvas sits inside its parent window.
    pub fn set_origin(&mut self, origin: Vec2) {
        self.origin = origin;
    }

    pub fn add_scrollbar(&mut self, area: Rect) {
        self.scrollbars.push(area);
    }

    pub fn add_scroll_region(&mut self, area: Rect) {
        self.scroll_regions.push(area);
    }

    /// Fit the view to show all items.
    pub fn fit_to_content(&mut self) {
        if let Some(bounds) = self.document.bounds() {
            self.camera.fit_to_bounds(bounds, self.viewport_size, 50.0);
        }
    }

    pub fn is_selected(&self, id: ItemId) -> bool {
        self.selection.contains(&id)
    }

    pub fn feedback(&self) -> Option<&Feedback> {
        self.feedback.as_ref()
    }

    /// Number of repaint requests received so far.
    pub fn repaint_requests(&self) -> usize {
        self.repaint_requests
    }

    /// Number of times repaint-on-drag was requested.
    pub fn drag_repaints(&self) -> usize {
        self.drag_repaints
    }

    /// Number of selection change notifications emitted so far.
    pub fn selection_notifications(&self) -> usize {
        self.selection_notifications
    }
}

impl Viewer for CanvasViewer {
    fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    fn set_view_mode(&mut self, mode: ViewMode) {
        self.view_mode = mode;
    }

    fn default_interaction(&self) -> Box<dyn Interaction> {
        match self.view_mode {
            ViewMode::Edit => Box::new(EditInteraction::new()),
            ViewMode::ReadOnly => Box::new(ReadOnlyInteraction::new()),
        }
    }

    fn camera(&self) -> &Camera {
        &self.camera
    }

    fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    fn document(&self) -> &Document {
        &self.document
    }

    fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    fn selection(&self) -> &[ItemId] {
        &self.selection
    }

    fn set_selection(&mut self, items: Vec<ItemId>) {
        let document = &self.document;
        self.selection = items.into_iter().filter(|id| document.contains(*id)).collect();
        self.selection_notifications += 1;
        log::trace!("Selection changed: {} items", self.selection.len());
    }

    fn translate_from_parent(&self, point: Point) -> Point {
        point - self.origin
    }

    fn cursor(&self) -> Cursor {
        self.cursor
    }

    fn set_cursor(&mut self, cursor: Cursor) {
        self.cursor = cursor;
    }

    fn intercept(&mut self, event: &mut Event) {
        if event.kind.is_pointer() && event.kind != EventKind::Wheel && self.hit_scrollbar(event.device_location) {
            self.cursor = Cursor::Default;
            event.consume();
        }
    }

    fn on_wheel(&mut self, event: &mut Event) {
        if self
            .scroll_regions
            .iter()
            .any(|region| region.contains(event.device_location))
        {
            event.consume();
        }
    }

    fn hit_scrollbar(&self, device_point: Point) -> bool {
        self.scrollbars.iter().any(|bar| bar.contains(device_point))
    }

    fn suspend_drawing(&mut self) {
        self.suspend_depth += 1;
    }

    fn resume_drawing(&mut self) {
        self.suspend_depth = self.suspend_depth.saturating_sub(1);
    }

    fn is_drawing_enabled(&self) -> bool {
        self.suspend_depth == 0
    }

    fn request_repaint(&mut self) {
        self.repaint_requests += 1;
    }

    fn set_repaint_on_drag(&mut self) {
        self.drag_repaints += 1;
    }

    fn set_feedback(&mut self, feedback: Option<Feedback>) {
        self.feedback = feedback;
    }

    fn viewport_size(&self) -> Size {
        self.viewport_size
    }

    fn set_viewport_size(&mut self, size: Size) {
        self.viewport_size = size;
    }
}
