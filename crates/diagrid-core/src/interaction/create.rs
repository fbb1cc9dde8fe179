use super::{Interaction, InteractionContext, PointerTrack};
use crate::command::{AddItem, Command};
use crate::document::Item;
use crate::error::EditorResult;
use crate::event::Event;
use crate::viewer::{Cursor, Feedback, Viewer};
use kurbo::{Point, Rect, Size, Vec2};

/// Size used when the user clicks instead of dragging out an item.
const DEFAULT_ITEM_SIZE: Size = Size::new(100.0, 60.0);

/// Drags shorter than this (in logical units) count as a click.
const MIN_DRAG: f64 = 2.0;

/// Kind of item the creation interaction produces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CreateTool {
    #[default]
    Shape,
    Line,
}

/// Create one item by dragging out its extent, then return to the default
/// interaction.
#[derive(Debug, Default)]
pub struct CreateItemInteraction {
    tool: CreateTool,
    track: PointerTrack,
    origin: Option<Point>,
}

impl CreateItemInteraction {
    pub const NAME: &'static str = "create";

    pub fn new(tool: CreateTool) -> Self {
        Self {
            tool,
            ..Self::default()
        }
    }

    pub fn tool(&self) -> CreateTool {
        self.tool
    }

    fn build(&self, origin: Point, end: Point) -> Item {
        let is_click = (end - origin).hypot() < MIN_DRAG;
        match self.tool {
            CreateTool::Shape if is_click => Item::shape(Rect::from_origin_size(origin, DEFAULT_ITEM_SIZE)),
            CreateTool::Shape => Item::shape(Rect::from_points(origin, end)),
            CreateTool::Line if is_click => {
                Item::line(vec![origin, origin + Vec2::new(DEFAULT_ITEM_SIZE.width, 0.0)])
            }
            CreateTool::Line => Item::line(vec![origin, end]),
        }
    }

    fn reset(&mut self, viewer: &mut dyn Viewer) {
        if self.origin.take().is_some() {
            viewer.clear_feedback();
        }
    }
}

impl Interaction for CreateItemInteraction {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn activate(&mut self, viewer: &mut dyn Viewer) {
        viewer.set_cursor(Cursor::Crosshair);
    }

    fn deactivate(&mut self, viewer: &mut dyn Viewer) {
        self.reset(viewer);
        viewer.set_cursor(Cursor::Default);
    }

    fn pointer_track(&self) -> Option<&PointerTrack> {
        Some(&self.track)
    }

    fn pointer_track_mut(&mut self) -> Option<&mut PointerTrack> {
        Some(&mut self.track)
    }

    fn on_mouse_down(&mut self, event: &mut Event, _cx: &mut InteractionContext<'_>) -> EditorResult<()> {
        self.origin = Some(event.logical_location);
        Ok(())
    }

    fn on_mouse_move(&mut self, event: &mut Event, cx: &mut InteractionContext<'_>) -> EditorResult<()> {
        if let Some(origin) = self.origin {
            let rect = Rect::from_points(origin, event.logical_location);
            cx.viewer.set_feedback(Some(Feedback::CreatePreview(rect)));
        }
        Ok(())
    }

    fn on_mouse_up(&mut self, event: &mut Event, cx: &mut InteractionContext<'_>) -> EditorResult<()> {
        let Some(origin) = self.origin.take() else {
            return Ok(());
        };
        let item = self.build(origin, event.logical_location);
        let id = item.id;
        cx.execute_with(
            Box::new(AddItem::new(item)),
            &mut |_: &dyn Command, viewer: &mut dyn Viewer| viewer.set_selection(vec![id]),
        )?;
        cx.switch_to_default();
        Ok(())
    }

    fn on_mouse_exit(&mut self, _event: &mut Event, cx: &mut InteractionContext<'_>) -> EditorResult<()> {
        self.reset(&mut *cx.viewer);
        Ok(())
    }

    fn on_right_mouse_down(&mut self, _event: &mut Event, cx: &mut InteractionContext<'_>) -> EditorResult<()> {
        self.reset(&mut *cx.viewer);
        cx.switch_to_default();
        Ok(())
    }

    fn cancel_interaction(&mut self, _event: &Event, cx: &mut InteractionContext<'_>) -> EditorResult<()> {
        self.reset(&mut *cx.viewer);
        Ok(())
    }

    fn on_resize_canvas(&mut self, _size: Size, _cx: &mut InteractionContext<'_>) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::CanvasViewer;
    use crate::document::ItemKind;
    use crate::event::{EventKind, EventSource};
    use crate::handler::InteractionHandler;

    fn mouse(kind: EventKind, x: f64, y: f64) -> Event {
        let p = Point::new(x, y);
        Event::new(kind, EventSource::Mouse, p, p)
    }

    fn creating(tool: CreateTool) -> InteractionHandler<CanvasViewer> {
        let mut handler = InteractionHandler::new(CanvasViewer::new());
        handler.set_active_interaction(Box::new(CreateItemInteraction::new(tool)));
        handler
    }

    #[test]
    fn test_drag_creates_shape_and_selects_it() {
        let mut handler = creating(CreateTool::Shape);
        handler.dispatch(mouse(EventKind::MouseDown, 50.0, 50.0)).unwrap();
        handler.dispatch(mouse(EventKind::MouseMove, 10.0, 20.0)).unwrap();
        assert_eq!(
            handler.viewer().feedback(),
            Some(&Feedback::CreatePreview(Rect::new(10.0, 20.0, 50.0, 50.0)))
        );
        handler.dispatch(mouse(EventKind::MouseUp, 10.0, 20.0)).unwrap();

        let viewer = handler.viewer();
        assert_eq!(viewer.document().len(), 1);
        let item = viewer.document().get(viewer.selection()[0]).unwrap();
        assert_eq!(item.bounds(), Rect::new(10.0, 20.0, 50.0, 50.0));
        assert!(viewer.feedback().is_none());
        assert_eq!(handler.active_interaction_name(), "edit");
    }

    #[test]
    fn test_click_creates_default_sized_line() {
        let mut handler = creating(CreateTool::Line);
        handler.dispatch(mouse(EventKind::MouseDown, 5.0, 5.0)).unwrap();
        handler.dispatch(mouse(EventKind::MouseUp, 5.0, 5.0)).unwrap();

        let viewer = handler.viewer();
        let item = viewer.document().get(viewer.selection()[0]).unwrap();
        assert_eq!(
            item.kind,
            ItemKind::Line {
                points: vec![Point::new(5.0, 5.0), Point::new(105.0, 5.0)]
            }
        );
    }

    #[test]
    fn test_right_click_abandons_creation() {
        let mut handler = creating(CreateTool::Shape);
        handler.dispatch(mouse(EventKind::MouseDown, 5.0, 5.0)).unwrap();
        handler.dispatch(mouse(EventKind::RightMouseDown, 5.0, 5.0)).unwrap();
        assert_eq!(handler.active_interaction_name(), "edit");
        assert!(handler.viewer().document().is_empty());
    }
}
