//! Routes normalized events to the active interaction.
//!
//! The [`InteractionHandler`] owns the viewer, the command stack and the
//! interaction slot. Event flow for one raw input:
//!
//! 1. [`EventNormalizer`] turns it into zero or more [`Event`]s.
//! 2. Wheel events go to the viewer's nested scroll containers first.
//! 3. On a press the active interaction may be cancelled in favour of the
//!    default one.
//! 4. The viewer may intercept and consume the event. A consumed event stops
//!    there, except for the release that ends a drag.
//! 5. The event is delivered to the active interaction's hook, and any switch
//!    it requested is applied. A failing hook hands control back to the
//!    default interaction before the error is returned.

use crate::clipboard::Clipboard;
use crate::command::{Command, CommandStack, OnComplete};
use crate::config::EditorConfig;
use crate::document::Attributes;
use crate::error::EditorResult;
use crate::event::{Event, EventKind};
use crate::input::{EventNormalizer, RawInput};
use crate::interaction::{
    GestureUse, Interaction, InteractionChanged, InteractionContext, InteractionSlot, SubscriptionId,
    SwitchRequest,
};
use crate::viewer::{ViewMode, Viewer};
use kurbo::{Point, Size};

/// Pointer locations recorded by the handler, in logical coordinates.
#[derive(Debug, Clone, Copy, Default)]
struct Locations {
    start: Option<Point>,
    last: Option<Point>,
    current: Option<Point>,
}

/// The editing core for one viewer.
pub struct InteractionHandler<V: Viewer> {
    viewer: V,
    slot: InteractionSlot,
    commands: CommandStack,
    normalizer: EventNormalizer,
    pub(crate) clipboard: Clipboard,
    config: EditorConfig,
    locations: Locations,
    is_dragging: bool,
}

impl<V: Viewer> InteractionHandler<V> {
    /// Create a handler with the default configuration.
    pub fn new(viewer: V) -> Self {
        let config = EditorConfig::default();
        Self::build(viewer, config)
    }

    /// Create a handler with a validated configuration.
    pub fn with_config(viewer: V, config: EditorConfig) -> EditorResult<Self> {
        config.validate()?;
        Ok(Self::build(viewer, config))
    }

    fn build(mut viewer: V, config: EditorConfig) -> Self {
        let camera = viewer.camera_mut();
        camera.min_zoom = config.min_zoom;
        camera.max_zoom = config.max_zoom;
        let zoom = camera.zoom;
        camera.set_zoom(zoom);

        Self {
            viewer,
            slot: InteractionSlot::new(),
            commands: CommandStack::with_limit(config.undo_limit),
            normalizer: EventNormalizer::new(&config),
            clipboard: Clipboard::new(),
            config,
            locations: Locations::default(),
            is_dragging: false,
        }
    }

    pub fn viewer(&self) -> &V {
        &self.viewer
    }

    pub fn viewer_mut(&mut self) -> &mut V {
        &mut self.viewer
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn command_stack(&self) -> &CommandStack {
        &self.commands
    }

    /// True between a left press and the release or exit that ends it.
    pub fn is_dragging(&self) -> bool {
        self.is_dragging
    }

    /// The active interaction, installing the default on first use.
    pub fn active_interaction(&mut self) -> &dyn Interaction {
        self.slot.ensure(&mut self.viewer).interaction.as_ref()
    }

    pub fn active_interaction_name(&mut self) -> &'static str {
        self.active_interaction().name()
    }

    /// Whether the active interaction is the view-mode default.
    pub fn is_default_interaction_active(&mut self) -> bool {
        self.slot.ensure(&mut self.viewer).is_default
    }

    /// Make `next` the active interaction.
    pub fn set_active_interaction(&mut self, next: Box<dyn Interaction>) {
        self.slot.set_active(next, &mut self.viewer);
        self.reapply_locations();
    }

    /// Return to the default interaction of the current view mode.
    pub fn activate_default_interaction(&mut self) {
        self.slot.activate_default(&mut self.viewer);
        self.reapply_locations();
    }

    /// Change the view mode and install its default interaction.
    pub fn set_view_mode(&mut self, mode: ViewMode) {
        if self.viewer.view_mode() == mode {
            return;
        }
        log::info!("View mode changed to {:?}", mode);
        self.viewer.set_view_mode(mode);
        self.activate_default_interaction();
    }

    /// Register a callback for active-interaction changes.
    pub fn subscribe(&mut self, observer: impl FnMut(&InteractionChanged) + 'static) -> SubscriptionId {
        self.slot.subscribe(observer)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.slot.unsubscribe(id)
    }

    /// Normalize one raw input and dispatch the resulting events.
    pub fn handle_input(&mut self, input: impl Into<RawInput>) -> EditorResult<()> {
        let uses = GestureUse::of(self.active_interaction());
        let events = self.normalizer.normalize(input.into(), &self.viewer, uses);
        for event in events {
            self.dispatch(event)?;
        }
        Ok(())
    }

    /// Deliver one normalized event.
    pub fn dispatch(&mut self, mut event: Event) -> EditorResult<()> {
        let kind = event.kind;
        let was_dragging = self.is_dragging;
        if kind == EventKind::MouseDown {
            self.is_dragging = true;
        }
        event.is_dragging = self.is_dragging;
        let ends_drag = was_dragging && kind.ends_drag();

        if kind.is_pointer() {
            self.record_location(&event);
        }

        let result = self.route(&mut event, ends_drag);
        if let Err(err) = &result {
            log::warn!("{:?} failed: {}", kind, err);
            self.is_dragging = false;
            if !self.slot.is_default() {
                self.activate_default_interaction();
            }
        }

        if kind.ends_drag() {
            self.is_dragging = false;
        }
        if self.is_dragging || ends_drag {
            self.viewer.set_repaint_on_drag();
        }
        if event.request_repaint {
            self.viewer.request_repaint();
        }
        result
    }

    fn route(&mut self, event: &mut Event, ends_drag: bool) -> EditorResult<()> {
        if event.kind == EventKind::Wheel {
            self.viewer.on_wheel(event);
            if event.consumed {
                return Ok(());
            }
        }

        // Runs before interception so a press on a scrollbar still ends a
        // non-default interaction.
        if event.kind == EventKind::MouseDown {
            self.do_cancel_active_interaction(event)?;
        }

        let cursor = self.viewer.cursor();
        self.viewer.intercept(event);
        if event.consumed {
            self.viewer.set_cursor(cursor);
            if !ends_drag {
                log::trace!("{:?} consumed by viewer", event.kind);
                return Ok(());
            }
        }

        match event.kind {
            EventKind::MouseDown => self.with_active(|i, cx| i.on_mouse_down(event, cx)),
            EventKind::MouseMove => self.with_active(|i, cx| i.on_mouse_move(event, cx)),
            EventKind::MouseUp => self.with_active(|i, cx| i.on_mouse_up(event, cx)),
            EventKind::DoubleClick => self.with_active(|i, cx| i.on_double_click(event, cx)),
            EventKind::MouseExit => self.with_active(|i, cx| i.on_mouse_exit(event, cx)),
            EventKind::Wheel => self.with_active(|i, cx| i.on_mouse_wheel(event, cx)),
            EventKind::RightMouseDown => self.with_active(|i, cx| i.on_right_mouse_down(event, cx)),
            EventKind::RightMouseUp => self.with_active(|i, cx| i.on_right_mouse_up(event, cx)),
            EventKind::KeyDown => {
                self.with_active(|i, cx| i.on_key_down(event, cx))?;
                if !event.consumed && event.key() == Some("Escape") {
                    self.cancel_active_interaction(event)?;
                    event.consume();
                }
                Ok(())
            }
            EventKind::KeyUp => self.with_active(|i, cx| i.on_key_up(event, cx)),
            EventKind::PanStart => self.with_active(|i, cx| i.on_pan_start(event, cx)),
            EventKind::Pan => self.with_active(|i, cx| i.on_pan(event, cx)),
            EventKind::PanEnd => self.with_active(|i, cx| i.on_pan_end(event, cx)),
            EventKind::PinchStart => self.with_active(|i, cx| i.on_pinch_start(event, cx)),
            EventKind::Pinch => self.with_active(|i, cx| i.on_pinch(event, cx)),
            EventKind::PinchEnd => self.with_active(|i, cx| i.on_pinch_end(event, cx)),
            EventKind::RotateStart => self.with_active(|i, cx| i.on_rotate_start(event, cx)),
            EventKind::Rotate => self.with_active(|i, cx| i.on_rotate(event, cx)),
            EventKind::RotateEnd => self.with_active(|i, cx| i.on_rotate_end(event, cx)),
            EventKind::Hold => self.with_active(|i, cx| i.on_hold(event, cx)),
            EventKind::DragEnter => self.with_active(|i, cx| i.on_drag_enter(event, cx)),
            EventKind::DragOver => self.with_active(|i, cx| i.on_drag_over(event, cx)),
            EventKind::DragLeave => self.with_active(|i, cx| i.on_drag_leave(event, cx)),
            EventKind::DragExit => self.with_active(|i, cx| i.on_drag_exit(event, cx)),
            EventKind::Drop => self.with_active(|i, cx| i.on_drop(event, cx)),
        }
    }

    /// On a press, give the active interaction up if it asks to be
    /// cancelled or if a scrollbar was hit outside the default interaction.
    fn do_cancel_active_interaction(&mut self, event: &Event) -> EditorResult<()> {
        let on_scrollbar = self.viewer.hit_scrollbar(event.device_location);
        let entry = self.slot.ensure(&mut self.viewer);
        let cancel = entry.interaction.do_cancel_interaction(event, &self.viewer)
            || (on_scrollbar && !entry.is_default);
        if !cancel {
            return Ok(());
        }
        log::debug!("Cancelling interaction '{}'", entry.interaction.name());
        let result = self.with_active(|i, cx| i.finish_interaction(event, cx));
        self.activate_default_interaction();
        result
    }

    /// Abort the active interaction and fall back to the default.
    pub fn cancel_active_interaction(&mut self, event: &Event) -> EditorResult<()> {
        let result = self.with_active(|i, cx| i.cancel_interaction(event, cx));
        if !self.slot.is_default() {
            self.activate_default_interaction();
        }
        result
    }

    /// Notify the active interaction of a canvas resize. An interaction that
    /// does not accept the new size is replaced by the default one.
    pub fn handle_resize_canvas(&mut self, size: Size) -> EditorResult<()> {
        self.viewer.set_viewport_size(size);
        let mut accepted = false;
        self.with_active(|i, cx| {
            accepted = i.on_resize_canvas(size, cx);
            Ok(())
        })?;
        if !accepted {
            log::debug!("Interaction declined resize to {:?}, restoring default", size);
            self.activate_default_interaction();
        }
        Ok(())
    }

    /// Apply attributes through the active interaction. Returns `false` when
    /// the interaction cannot apply them.
    pub fn apply_attributes(&mut self, attributes: &Attributes) -> EditorResult<bool> {
        let entry = self.slot.ensure(&mut self.viewer);
        if !entry.interaction.can_apply_attributes(&self.viewer) {
            return Ok(false);
        }
        self.with_active(|i, cx| i.on_apply_attributes(attributes, cx))?;
        Ok(true)
    }

    /// Execute a command under the active interaction.
    pub fn execute(&mut self, command: Box<dyn Command>) -> EditorResult<()> {
        let id = self.slot.ensure(&mut self.viewer).id;
        self.commands.execute(command, &mut self.viewer, id, None)
    }

    /// Execute a command and run `on_complete` before feedback is cleared.
    pub fn execute_with(&mut self, command: Box<dyn Command>, on_complete: OnComplete<'_>) -> EditorResult<()> {
        let id = self.slot.ensure(&mut self.viewer).id;
        self.commands
            .execute(command, &mut self.viewer, id, Some(on_complete))
    }

    pub fn undo(&mut self) -> EditorResult<bool> {
        let undone = self.commands.undo(&mut self.viewer, &mut self.slot)?;
        if undone {
            self.reapply_locations();
        }
        Ok(undone)
    }

    pub fn redo(&mut self) -> EditorResult<bool> {
        self.commands.redo(&mut self.viewer)
    }

    pub fn is_undo_available(&self) -> bool {
        self.commands.is_undo_available()
    }

    pub fn is_redo_available(&self) -> bool {
        self.commands.is_redo_available()
    }

    /// Run one hook on the active interaction and apply any switch it
    /// requested, even when the hook failed.
    fn with_active<F>(&mut self, hook: F) -> EditorResult<()>
    where
        F: FnOnce(&mut dyn Interaction, &mut InteractionContext<'_>) -> EditorResult<()>,
    {
        let entry = self.slot.ensure(&mut self.viewer);
        let mut cx = InteractionContext::new(
            &mut self.viewer,
            &mut self.commands,
            &self.config,
            entry.id,
            entry.is_default,
        );
        let result = hook(entry.interaction.as_mut(), &mut cx);
        let switch = cx.take_switch();
        if let Some(request) = switch {
            match request {
                SwitchRequest::To(next) => {
                    self.slot.set_active(next, &mut self.viewer);
                }
                SwitchRequest::Default => {
                    self.slot.activate_default(&mut self.viewer);
                }
            }
            self.reapply_locations();
        }
        result
    }

    fn record_location(&mut self, event: &Event) {
        let point = event.logical_location;
        if event.kind == EventKind::MouseDown {
            self.locations.start = Some(point);
        }
        self.locations.last = self.locations.current.or(Some(point));
        self.locations.current = Some(point);
        self.reapply_locations();
    }

    /// Push the recorded pointer locations into the active interaction.
    fn reapply_locations(&mut self) {
        let Locations { start, last, current } = self.locations;
        let interaction = &mut self.slot.ensure(&mut self.viewer).interaction;
        if let Some(point) = start {
            interaction.set_start_location(point);
        }
        if let Some(point) = last {
            interaction.set_last_location(point);
        }
        if let Some(point) = current {
            interaction.set_current_location(point);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::CanvasViewer;
    use crate::document::{Item, ItemId};
    use crate::error::EditorError;
    use crate::event::{EventDetail, EventSource, Modifiers};
    use crate::input::{GestureInput, GestureKind, KeyInput, MouseAction, MouseButton, MouseInput};
    use crate::interaction::{CreateItemInteraction, CreateTool, ShapeEditInteraction};
    use crate::viewer::Cursor;
    use kurbo::{Rect, Vec2};
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    /// Interaction that declines resizes and can be told to fail.
    struct Fragile {
        fail: bool,
    }

    impl Interaction for Fragile {
        fn name(&self) -> &'static str {
            "fragile"
        }

        fn on_mouse_down(&mut self, _event: &mut Event, _cx: &mut InteractionContext<'_>) -> EditorResult<()> {
            if self.fail {
                return Err(EditorError::Other("fragile".into()));
            }
            Ok(())
        }
    }

    fn init_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn handler_with_item(rect: Rect) -> (InteractionHandler<CanvasViewer>, ItemId) {
        init_logging();
        let mut viewer = CanvasViewer::new();
        let id = viewer.document_mut().add_item(Item::shape(rect));
        (InteractionHandler::new(viewer), id)
    }

    fn mouse(action: MouseAction, x: f64, y: f64, at_ms: u64) -> MouseInput {
        MouseInput::new(action, Point::new(x, y), Duration::from_millis(at_ms))
    }

    fn event(kind: EventKind, x: f64, y: f64) -> Event {
        let p = Point::new(x, y);
        Event::new(kind, EventSource::Mouse, p, p)
    }

    #[test]
    fn test_drag_produces_one_command_and_one_repaint() {
        let (mut handler, id) = handler_with_item(Rect::new(0.0, 0.0, 50.0, 50.0));
        let left = MouseButton::Left;

        handler.handle_input(mouse(MouseAction::Down(left), 10.0, 10.0, 0)).unwrap();
        assert!(handler.is_dragging());
        handler.handle_input(mouse(MouseAction::Move, 20.0, 20.0, 16)).unwrap();
        handler.handle_input(mouse(MouseAction::Up(left), 20.0, 20.0, 32)).unwrap();

        assert!(!handler.is_dragging());
        assert_eq!(handler.command_stack().undo_len(), 1);
        assert_eq!(handler.viewer().repaint_requests(), 1);
        assert_eq!(handler.viewer().drag_repaints(), 3);
        let bounds = handler.viewer().document().get(id).unwrap().bounds();
        assert_eq!(bounds.origin(), Point::new(10.0, 10.0));
    }

    #[test]
    fn test_double_click_enters_shape_edit() {
        let (mut handler, id) = handler_with_item(Rect::new(0.0, 0.0, 50.0, 50.0));
        let left = MouseButton::Left;

        handler.handle_input(mouse(MouseAction::Down(left), 10.0, 10.0, 0)).unwrap();
        handler.handle_input(mouse(MouseAction::Up(left), 10.0, 10.0, 60)).unwrap();
        handler.handle_input(mouse(MouseAction::Down(left), 11.0, 10.0, 150)).unwrap();

        assert_eq!(handler.active_interaction_name(), "shape-edit");
        assert_eq!(handler.viewer().selection(), &[id]);
        assert!(!handler.is_undo_available());
    }

    #[test]
    fn test_touch_pan_moves_item_through_mouse_hooks() {
        let (mut handler, id) = handler_with_item(Rect::new(0.0, 0.0, 50.0, 50.0));

        handler
            .handle_input(GestureInput::touch(GestureKind::PanMove, Point::new(10.0, 10.0)))
            .unwrap();
        assert!(handler.is_dragging());
        handler
            .handle_input(GestureInput::touch(GestureKind::PanMove, Point::new(20.0, 25.0)))
            .unwrap();
        handler
            .handle_input(GestureInput::touch(GestureKind::PanEnd, Point::new(20.0, 25.0)))
            .unwrap();

        let bounds = handler.viewer().document().get(id).unwrap().bounds();
        assert_eq!(bounds.origin(), Point::new(10.0, 15.0));
        assert!(!handler.is_dragging());
    }

    #[test]
    fn test_undo_after_switch_restores_default() {
        let (mut handler, id) = handler_with_item(Rect::new(0.0, 0.0, 50.0, 50.0));
        handler.dispatch(event(EventKind::MouseDown, 10.0, 10.0)).unwrap();
        handler.dispatch(event(EventKind::MouseUp, 30.0, 10.0)).unwrap();
        assert!(handler.is_undo_available());

        handler.dispatch(event(EventKind::DoubleClick, 30.0, 10.0)).unwrap();
        assert_eq!(handler.active_interaction_name(), "shape-edit");

        assert!(handler.undo().unwrap());
        assert_eq!(handler.active_interaction_name(), "edit");
        assert!(handler.is_default_interaction_active());
        assert_eq!(handler.viewer().selection(), &[id]);

        // Redo leaves whatever is active alone.
        let edit = ShapeEditInteraction::for_item(handler.viewer().document().get(id).unwrap());
        handler.set_active_interaction(Box::new(edit));
        assert!(handler.redo().unwrap());
        assert_eq!(handler.active_interaction_name(), "shape-edit");
    }

    #[test]
    fn test_undo_after_marquee_keeps_default() {
        let (mut handler, id) = handler_with_item(Rect::new(0.0, 0.0, 50.0, 50.0));
        handler.dispatch(event(EventKind::MouseDown, 10.0, 10.0)).unwrap();
        handler.dispatch(event(EventKind::MouseUp, 30.0, 10.0)).unwrap();

        // Empty-space click runs a marquee and returns to a new default.
        handler.dispatch(event(EventKind::MouseDown, 300.0, 300.0)).unwrap();
        handler.dispatch(event(EventKind::MouseUp, 300.0, 300.0)).unwrap();
        assert!(handler.is_default_interaction_active());

        let changes = Rc::new(RefCell::new(0));
        let counter = changes.clone();
        handler.subscribe(move |_| *counter.borrow_mut() += 1);

        assert!(handler.undo().unwrap());
        assert_eq!(*changes.borrow(), 0);
        assert_eq!(handler.active_interaction_name(), "edit");
        assert_eq!(handler.viewer().selection(), &[id]);
    }

    #[test]
    fn test_scrollbar_press_cancels_non_default() {
        let mut viewer = CanvasViewer::new();
        viewer.add_scrollbar(Rect::new(790.0, 0.0, 800.0, 600.0));
        let mut handler = InteractionHandler::new(viewer);
        handler.set_active_interaction(Box::new(CreateItemInteraction::new(CreateTool::Shape)));

        handler.dispatch(event(EventKind::MouseDown, 795.0, 100.0)).unwrap();
        handler.dispatch(event(EventKind::MouseUp, 795.0, 100.0)).unwrap();

        assert_eq!(handler.active_interaction_name(), "edit");
        assert!(handler.viewer().document().is_empty());
    }

    #[test]
    fn test_scrollbar_press_keeps_default() {
        let mut viewer = CanvasViewer::new();
        viewer.add_scrollbar(Rect::new(790.0, 0.0, 800.0, 600.0));
        let mut handler = InteractionHandler::new(viewer);
        handler.activate_default_interaction();

        let changes = Rc::new(RefCell::new(0));
        let sink = changes.clone();
        handler.subscribe(move |_| *sink.borrow_mut() += 1);

        handler.dispatch(event(EventKind::MouseDown, 795.0, 100.0)).unwrap();
        assert_eq!(*changes.borrow(), 0);
        assert_eq!(handler.active_interaction_name(), "edit");
    }

    #[test]
    fn test_consumed_event_restores_cursor() {
        let mut viewer = CanvasViewer::new();
        viewer.add_scrollbar(Rect::new(790.0, 0.0, 800.0, 600.0));
        viewer.set_cursor(Cursor::Move);
        let mut handler = InteractionHandler::new(viewer);

        handler.dispatch(event(EventKind::MouseMove, 795.0, 100.0)).unwrap();
        assert_eq!(handler.viewer().cursor(), Cursor::Move);
    }

    #[test]
    fn test_consumed_release_still_ends_drag() {
        let (mut handler, _) = handler_with_item(Rect::new(0.0, 0.0, 50.0, 50.0));
        handler.viewer_mut().add_scrollbar(Rect::new(790.0, 0.0, 800.0, 600.0));

        handler.dispatch(event(EventKind::MouseDown, 10.0, 10.0)).unwrap();
        handler.dispatch(event(EventKind::MouseMove, 400.0, 10.0)).unwrap();
        handler.dispatch(event(EventKind::MouseUp, 795.0, 10.0)).unwrap();

        assert!(!handler.is_dragging());
        assert_eq!(handler.command_stack().undo_len(), 1);
    }

    #[test]
    fn test_wheel_in_scroll_region_skips_interaction() {
        let mut viewer = CanvasViewer::new();
        viewer.add_scroll_region(Rect::new(0.0, 0.0, 100.0, 100.0));
        let mut handler = InteractionHandler::new(viewer);

        let wheel = event(EventKind::Wheel, 50.0, 50.0).with_detail(EventDetail::Wheel {
            delta: Vec2::new(0.0, 30.0),
        });
        handler.dispatch(wheel.clone()).unwrap();
        assert_eq!(handler.viewer().camera().offset, Vec2::ZERO);

        let outside = Event {
            device_location: Point::new(300.0, 300.0),
            logical_location: Point::new(300.0, 300.0),
            ..wheel
        };
        handler.dispatch(outside).unwrap();
        assert_eq!(handler.viewer().camera().offset, Vec2::new(0.0, -30.0));
        assert_eq!(handler.viewer().repaint_requests(), 1);
    }

    #[test]
    fn test_escape_cancels_to_default() {
        let mut handler = InteractionHandler::new(CanvasViewer::new());
        handler.set_active_interaction(Box::new(CreateItemInteraction::new(CreateTool::Line)));
        handler.dispatch(event(EventKind::MouseDown, 5.0, 5.0)).unwrap();
        handler.dispatch(event(EventKind::MouseMove, 50.0, 5.0)).unwrap();
        assert!(handler.viewer().feedback().is_some());

        handler
            .handle_input(KeyInput::pressed("Escape", Modifiers::NONE))
            .unwrap();
        assert_eq!(handler.active_interaction_name(), "edit");
        assert!(handler.viewer().feedback().is_none());
    }

    #[test]
    fn test_resize_declined_restores_default() {
        let mut handler = InteractionHandler::new(CanvasViewer::new());
        handler.set_active_interaction(Box::new(Fragile { fail: false }));
        handler.handle_resize_canvas(Size::new(1024.0, 768.0)).unwrap();
        assert_eq!(handler.active_interaction_name(), "edit");
        assert_eq!(handler.viewer().viewport_size(), Size::new(1024.0, 768.0));
    }

    #[test]
    fn test_resize_accepted_keeps_interaction() {
        let mut handler = InteractionHandler::new(CanvasViewer::new());
        handler.set_active_interaction(Box::new(CreateItemInteraction::new(CreateTool::Shape)));
        handler.handle_resize_canvas(Size::new(640.0, 480.0)).unwrap();
        assert_eq!(handler.active_interaction_name(), "create");
    }

    #[test]
    fn test_failing_hook_propagates() {
        let mut handler = InteractionHandler::new(CanvasViewer::new());
        handler.set_active_interaction(Box::new(Fragile { fail: true }));
        let result = handler.dispatch(event(EventKind::MouseDown, 5.0, 5.0));
        assert!(result.is_err());
        assert_eq!(handler.active_interaction_name(), "edit");
        assert!(!handler.is_dragging());
    }

    #[test]
    fn test_apply_attributes_routes_through_interaction() {
        let (mut handler, id) = handler_with_item(Rect::new(0.0, 0.0, 10.0, 10.0));
        let mut attributes = Attributes::new();
        attributes.insert("stroke".into(), serde_json::json!("#ff0000"));

        assert!(!handler.apply_attributes(&attributes).unwrap());

        handler.viewer_mut().set_selection(vec![id]);
        assert!(handler.apply_attributes(&attributes).unwrap());
        let item = handler.viewer().document().get(id).unwrap();
        assert_eq!(item.attributes["stroke"], serde_json::json!("#ff0000"));

        handler.set_view_mode(ViewMode::ReadOnly);
        assert!(!handler.apply_attributes(&attributes).unwrap());
    }

    #[test]
    fn test_view_mode_switch_notifies_observers() {
        let mut handler = InteractionHandler::new(CanvasViewer::new());
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        handler.subscribe(move |change| sink.borrow_mut().push(change.name));

        handler.set_view_mode(ViewMode::ReadOnly);
        handler.set_view_mode(ViewMode::ReadOnly);
        handler.set_view_mode(ViewMode::Edit);

        assert_eq!(*seen.borrow(), vec!["read-only", "edit"]);
    }

    #[test]
    fn test_with_config_rejects_invalid() {
        let config = EditorConfig {
            min_zoom: 5.0,
            max_zoom: 1.0,
            ..EditorConfig::default()
        };
        assert!(InteractionHandler::with_config(CanvasViewer::new(), config).is_err());
    }
}
