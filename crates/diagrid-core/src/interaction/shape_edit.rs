use super::{Interaction, InteractionContext, PointerTrack};
use crate::command::{Command, SetAttributes, SetBounds, SetPoints};
use crate::document::{Attributes, Item, ItemId, ItemKind};
use crate::error::EditorResult;
use crate::event::Event;
use crate::handles::{self, Corner, HANDLE_HIT_TOLERANCE, HandleKind};
use crate::viewer::{Cursor, Feedback, Viewer};
use kurbo::{Size, Vec2};

/// Which part of an item's geometry the edit interaction manipulates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditMode {
    /// Bounding-box corners.
    Generic,
    /// Polyline vertices.
    Line,
    /// Bezier anchors and control points.
    Bezier,
}

impl EditMode {
    pub fn for_kind(kind: &ItemKind) -> Self {
        match kind {
            ItemKind::Line { .. } => EditMode::Line,
            ItemKind::Bezier { .. } => EditMode::Bezier,
            ItemKind::Shape { .. } | ItemKind::Group { .. } => EditMode::Generic,
        }
    }
}

#[derive(Debug)]
struct HandleDrag {
    handle: HandleKind,
    original: Item,
}

/// Reshape a single item through its handles.
///
/// Stays active across multiple handle drags. A press that misses both the
/// item and its handles gives control back to the default interaction.
#[derive(Debug)]
pub struct ShapeEditInteraction {
    item: ItemId,
    mode: EditMode,
    track: PointerTrack,
    drag: Option<HandleDrag>,
}

impl ShapeEditInteraction {
    pub fn new(item: ItemId, mode: EditMode) -> Self {
        Self {
            item,
            mode,
            track: PointerTrack::default(),
            drag: None,
        }
    }

    /// Edit interaction matching the item's geometry.
    pub fn for_item(item: &Item) -> Self {
        Self::new(item.id, EditMode::for_kind(&item.kind))
    }

    pub fn item(&self) -> ItemId {
        self.item
    }

    pub fn mode(&self) -> EditMode {
        self.mode
    }

    fn handle_tolerance(viewer: &dyn Viewer) -> f64 {
        viewer.camera().to_logical_distance(HANDLE_HIT_TOLERANCE)
    }

    fn preview(&self, drag: &HandleDrag) -> Item {
        handles::apply_handle_drag(&drag.original, drag.handle, self.track.drag_delta())
    }

    fn abort_drag(&mut self, viewer: &mut dyn Viewer) {
        if self.drag.take().is_some() {
            viewer.clear_feedback();
        }
    }
}

impl Interaction for ShapeEditInteraction {
    fn name(&self) -> &'static str {
        match self.mode {
            EditMode::Generic => "shape-edit",
            EditMode::Line => "line-edit",
            EditMode::Bezier => "bezier-edit",
        }
    }

    fn activate(&mut self, viewer: &mut dyn Viewer) {
        if viewer.selection() != [self.item] {
            viewer.set_selection(vec![self.item]);
        }
        viewer.request_repaint();
    }

    fn deactivate(&mut self, viewer: &mut dyn Viewer) {
        self.abort_drag(viewer);
        viewer.set_cursor(Cursor::Default);
        viewer.request_repaint();
    }

    fn pointer_track(&self) -> Option<&PointerTrack> {
        Some(&self.track)
    }

    fn pointer_track_mut(&mut self) -> Option<&mut PointerTrack> {
        Some(&mut self.track)
    }

    fn do_cancel_interaction(&mut self, event: &Event, viewer: &dyn Viewer) -> bool {
        let Some(item) = viewer.document().get(self.item) else {
            return true;
        };
        let point = event.logical_location;
        let tolerance = Self::handle_tolerance(viewer);
        handles::hit_test_handles(item, point, tolerance).is_none()
            && !item.hit_test(point, tolerance)
    }

    fn on_mouse_down(&mut self, event: &mut Event, cx: &mut InteractionContext<'_>) -> EditorResult<()> {
        let tolerance = Self::handle_tolerance(&*cx.viewer);
        let Some(item) = cx.viewer.document().get(self.item) else {
            return Ok(());
        };
        let Some(handle) = handles::hit_test_handles(item, event.logical_location, tolerance) else {
            return Ok(());
        };
        self.drag = Some(HandleDrag {
            handle,
            original: item.clone(),
        });
        let cursor = match handle {
            HandleKind::Corner(Corner::TopLeft | Corner::BottomRight) => Cursor::ResizeNwse,
            HandleKind::Corner(Corner::TopRight | Corner::BottomLeft) => Cursor::ResizeNesw,
            HandleKind::Vertex(_) | HandleKind::Control(_) => Cursor::Crosshair,
        };
        cx.viewer.set_cursor(cursor);
        Ok(())
    }

    fn on_mouse_move(&mut self, _event: &mut Event, cx: &mut InteractionContext<'_>) -> EditorResult<()> {
        if let Some(drag) = &self.drag {
            let preview = self.preview(drag);
            cx.viewer.set_feedback(Some(Feedback::EditPreview {
                item: self.item,
                bounds: preview.bounds(),
            }));
        }
        Ok(())
    }

    fn on_mouse_up(&mut self, _event: &mut Event, cx: &mut InteractionContext<'_>) -> EditorResult<()> {
        let Some(drag) = self.drag.take() else {
            return Ok(());
        };
        cx.viewer.set_cursor(Cursor::Default);
        if self.track.drag_delta() == Vec2::ZERO {
            cx.viewer.clear_feedback();
            return Ok(());
        }
        let preview = self.preview(&drag);
        let command: Box<dyn Command> = match (self.mode, preview.points()) {
            (EditMode::Line | EditMode::Bezier, Some(points)) => {
                Box::new(SetPoints::new(self.item, points.to_vec()))
            }
            _ => Box::new(SetBounds::new(self.item, preview.bounds())),
        };
        cx.execute(command)
    }

    fn on_mouse_exit(&mut self, _event: &mut Event, cx: &mut InteractionContext<'_>) -> EditorResult<()> {
        self.abort_drag(&mut *cx.viewer);
        Ok(())
    }

    fn on_key_down(&mut self, event: &mut Event, cx: &mut InteractionContext<'_>) -> EditorResult<()> {
        if event.key() == Some("Enter") {
            cx.switch_to_default();
            event.consume();
        }
        Ok(())
    }

    fn cancel_interaction(&mut self, _event: &Event, cx: &mut InteractionContext<'_>) -> EditorResult<()> {
        self.abort_drag(&mut *cx.viewer);
        Ok(())
    }

    fn finish_interaction(&mut self, _event: &Event, cx: &mut InteractionContext<'_>) -> EditorResult<()> {
        self.abort_drag(&mut *cx.viewer);
        Ok(())
    }

    fn on_resize_canvas(&mut self, _size: Size, _cx: &mut InteractionContext<'_>) -> bool {
        true
    }

    fn can_apply_attributes(&self, viewer: &dyn Viewer) -> bool {
        viewer.document().contains(self.item)
    }

    fn on_apply_attributes(
        &mut self,
        attributes: &Attributes,
        cx: &mut InteractionContext<'_>,
    ) -> EditorResult<()> {
        cx.execute(Box::new(SetAttributes::new(self.item, attributes.clone())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::CanvasViewer;
    use crate::event::{EventKind, EventSource};
    use crate::handler::InteractionHandler;
    use kurbo::{Point, Rect};

    fn mouse(kind: EventKind, x: f64, y: f64) -> Event {
        let p = Point::new(x, y);
        Event::new(kind, EventSource::Mouse, p, p)
    }

    fn editing(item: Item) -> (InteractionHandler<CanvasViewer>, ItemId) {
        let mut viewer = CanvasViewer::new();
        let id = viewer.document_mut().add_item(item);
        let mut handler = InteractionHandler::new(viewer);
        let edit = ShapeEditInteraction::for_item(handler.viewer().document().get(id).unwrap());
        handler.set_active_interaction(Box::new(edit));
        (handler, id)
    }

    #[test]
    fn test_mode_follows_item_kind() {
        let line = Item::line(vec![Point::ZERO, Point::new(1.0, 1.0)]);
        let bezier = Item::bezier(vec![Point::ZERO; 4]);
        let shape = Item::shape(Rect::new(0.0, 0.0, 1.0, 1.0));
        assert_eq!(ShapeEditInteraction::for_item(&line).mode(), EditMode::Line);
        assert_eq!(ShapeEditInteraction::for_item(&bezier).mode(), EditMode::Bezier);
        assert_eq!(ShapeEditInteraction::for_item(&shape).mode(), EditMode::Generic);
    }

    #[test]
    fn test_corner_drag_resizes_on_release() {
        let (mut handler, id) = editing(Item::shape(Rect::new(0.0, 0.0, 100.0, 100.0)));

        handler.dispatch(mouse(EventKind::MouseDown, 100.0, 100.0)).unwrap();
        handler.dispatch(mouse(EventKind::MouseMove, 150.0, 120.0)).unwrap();
        assert_eq!(
            handler.viewer().feedback(),
            Some(&Feedback::EditPreview {
                item: id,
                bounds: Rect::new(0.0, 0.0, 150.0, 120.0),
            })
        );
        handler.dispatch(mouse(EventKind::MouseUp, 150.0, 120.0)).unwrap();

        let bounds = handler.viewer().document().get(id).unwrap().bounds();
        assert_eq!(bounds, Rect::new(0.0, 0.0, 150.0, 120.0));
        assert_eq!(handler.active_interaction_name(), "shape-edit");
    }

    #[test]
    fn test_vertex_drag_sets_points() {
        let (mut handler, id) = editing(Item::line(vec![Point::new(0.0, 0.0), Point::new(100.0, 0.0)]));

        handler.dispatch(mouse(EventKind::MouseDown, 0.0, 0.0)).unwrap();
        handler.dispatch(mouse(EventKind::MouseMove, 0.0, 40.0)).unwrap();
        handler.dispatch(mouse(EventKind::MouseUp, 0.0, 40.0)).unwrap();

        let item = handler.viewer().document().get(id).unwrap();
        assert_eq!(item.points().unwrap(), &[Point::new(0.0, 40.0), Point::new(100.0, 0.0)]);

        handler.undo().unwrap();
        let item = handler.viewer().document().get(id).unwrap();
        assert_eq!(item.points().unwrap(), &[Point::new(0.0, 0.0), Point::new(100.0, 0.0)]);
    }

    #[test]
    fn test_press_outside_item_cancels() {
        let (mut handler, _) = editing(Item::shape(Rect::new(0.0, 0.0, 10.0, 10.0)));
        assert_eq!(handler.active_interaction_name(), "shape-edit");

        handler.dispatch(mouse(EventKind::MouseDown, 300.0, 300.0)).unwrap();
        // The default edit interaction took over and turned the press into a marquee.
        assert_eq!(handler.active_interaction_name(), "marquee");
        handler.dispatch(mouse(EventKind::MouseUp, 300.0, 300.0)).unwrap();
        assert_eq!(handler.active_interaction_name(), "edit");
    }

    #[test]
    fn test_enter_leaves_edit_mode() {
        let (mut handler, _) = editing(Item::shape(Rect::new(0.0, 0.0, 10.0, 10.0)));
        let enter = Event::new(EventKind::KeyDown, EventSource::Key, Point::ZERO, Point::ZERO)
            .with_detail(crate::event::EventDetail::Key { key: "Enter".into() });
        handler.dispatch(enter).unwrap();
        assert_eq!(handler.active_interaction_name(), "edit");
    }
}
