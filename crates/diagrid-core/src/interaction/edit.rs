use super::read_only::wheel_navigate;
use super::{Interaction, InteractionContext, MarqueeInteraction, PointerTrack, ShapeEditInteraction};
use crate::command::{AddItem, Command, CompoundCommand, MoveItems, SetAttributes};
use crate::document::{Attributes, Item, ItemId};
use crate::error::EditorResult;
use crate::event::Event;
use crate::selection::delete_command;
use crate::viewer::{Cursor, Feedback, Viewer};
use kurbo::{Rect, Size, Vec2};

/// Size of an item created by dropping text onto the canvas.
const DROP_ITEM_SIZE: Size = Size::new(120.0, 60.0);

#[derive(Debug)]
struct MoveDrag {
    items: Vec<ItemId>,
}

/// Default interaction of editable views.
///
/// Press on an item selects it (shift toggles) and dragging moves the
/// selection. Press on empty canvas starts a marquee. Double-click enters
/// the edit interaction matching the item kind.
#[derive(Debug, Default)]
pub struct EditInteraction {
    track: PointerTrack,
    drag: Option<MoveDrag>,
}

impl EditInteraction {
    pub const NAME: &'static str = "edit";

    pub fn new() -> Self {
        Self::default()
    }

    fn abort_drag(&mut self, viewer: &mut dyn Viewer) {
        if self.drag.take().is_some() {
            viewer.clear_feedback();
        }
    }

    fn nudge(&self, delta: Vec2, cx: &mut InteractionContext<'_>) -> EditorResult<()> {
        let selection = cx.viewer.selection().to_vec();
        if selection.is_empty() {
            return Ok(());
        }
        cx.execute(Box::new(MoveItems::new(selection, delta)))
    }
}

impl Interaction for EditInteraction {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn deactivate(&mut self, viewer: &mut dyn Viewer) {
        self.abort_drag(viewer);
    }

    fn pointer_track(&self) -> Option<&PointerTrack> {
        Some(&self.track)
    }

    fn pointer_track_mut(&mut self) -> Option<&mut PointerTrack> {
        Some(&mut self.track)
    }

    fn on_mouse_down(&mut self, event: &mut Event, cx: &mut InteractionContext<'_>) -> EditorResult<()> {
        let point = event.logical_location;
        let hit = cx.viewer.document().item_at(point, cx.hit_tolerance());

        let Some(id) = hit else {
            if !event.modifiers.shift && !cx.viewer.selection().is_empty() {
                cx.viewer.clear_selection();
            }
            cx.switch_to(Box::new(MarqueeInteraction::new(point, event.modifiers.shift)));
            return Ok(());
        };

        let mut selection = cx.viewer.selection().to_vec();
        if event.modifiers.shift {
            if let Some(pos) = selection.iter().position(|s| *s == id) {
                selection.remove(pos);
                cx.viewer.set_selection(selection);
                return Ok(());
            }
            selection.push(id);
        } else if !selection.contains(&id) {
            selection = vec![id];
        }
        if selection != cx.viewer.selection() {
            cx.viewer.set_selection(selection.clone());
        }
        self.drag = Some(MoveDrag { items: selection });
        cx.viewer.set_cursor(Cursor::Move);
        Ok(())
    }

    fn on_mouse_move(&mut self, event: &mut Event, cx: &mut InteractionContext<'_>) -> EditorResult<()> {
        match &self.drag {
            Some(drag) => {
                cx.viewer.set_feedback(Some(Feedback::MovePreview {
                    items: drag.items.clone(),
                    offset: self.track.drag_delta(),
                }));
            }
            None => {
                let over_item = cx
                    .viewer
                    .document()
                    .item_at(event.logical_location, cx.hit_tolerance())
                    .is_some();
                cx.viewer
                    .set_cursor(if over_item { Cursor::Move } else { Cursor::Default });
            }
        }
        Ok(())
    }

    fn on_mouse_up(&mut self, _event: &mut Event, cx: &mut InteractionContext<'_>) -> EditorResult<()> {
        let Some(drag) = self.drag.take() else {
            return Ok(());
        };
        let offset = self.track.drag_delta();
        if offset == Vec2::ZERO {
            cx.viewer.clear_feedback();
            return Ok(());
        }
        cx.execute(Box::new(MoveItems::new(drag.items, offset)))
    }

    fn on_mouse_exit(&mut self, _event: &mut Event, cx: &mut InteractionContext<'_>) -> EditorResult<()> {
        self.abort_drag(&mut *cx.viewer);
        cx.viewer.set_cursor(Cursor::Default);
        Ok(())
    }

    fn on_double_click(&mut self, event: &mut Event, cx: &mut InteractionContext<'_>) -> EditorResult<()> {
        let document = cx.viewer.document();
        let Some(item) = document
            .item_at(event.logical_location, cx.hit_tolerance())
            .and_then(|id| document.get(id))
        else {
            return Ok(());
        };
        let edit = ShapeEditInteraction::for_item(item);
        cx.switch_to(Box::new(edit));
        event.consume();
        Ok(())
    }

    fn on_mouse_wheel(&mut self, event: &mut Event, cx: &mut InteractionContext<'_>) -> EditorResult<()> {
        wheel_navigate(event, cx);
        Ok(())
    }

    fn on_key_down(&mut self, event: &mut Event, cx: &mut InteractionContext<'_>) -> EditorResult<()> {
        let step = if event.modifiers.shift {
            cx.config().nudge_step_large
        } else {
            cx.config().nudge_step
        };
        let delta = match event.key() {
            Some("ArrowLeft") => Vec2::new(-step, 0.0),
            Some("ArrowRight") => Vec2::new(step, 0.0),
            Some("ArrowUp") => Vec2::new(0.0, -step),
            Some("ArrowDown") => Vec2::new(0.0, step),
            Some("Delete") | Some("Backspace") => {
                let selection = cx.viewer.selection().to_vec();
                if let Some(command) = delete_command(cx.viewer.document(), &selection) {
                    cx.execute_with(Box::new(command), &mut |_: &dyn Command, viewer: &mut dyn Viewer| {
                        viewer.clear_selection()
                    })?;
                }
                event.consume();
                return Ok(());
            }
            _ => return Ok(()),
        };
        self.nudge(delta, cx)?;
        event.consume();
        Ok(())
    }

    fn on_hold(&mut self, event: &mut Event, cx: &mut InteractionContext<'_>) -> EditorResult<()> {
        let hit = cx
            .viewer
            .document()
            .item_at(event.logical_location, cx.hit_tolerance());
        cx.viewer.set_selection(hit.into_iter().collect());
        Ok(())
    }

    fn on_drop(&mut self, event: &mut Event, cx: &mut InteractionContext<'_>) -> EditorResult<()> {
        let Some(text) = event.drop_data() else {
            return Ok(());
        };
        let mut item = Item::shape(Rect::from_origin_size(event.logical_location, DROP_ITEM_SIZE));
        item.attributes
            .insert("label".to_string(), serde_json::Value::String(text.to_string()));
        let id = item.id;
        cx.execute_with(
            Box::new(AddItem::new(item)),
            &mut |_: &dyn Command, viewer: &mut dyn Viewer| viewer.set_selection(vec![id]),
        )?;
        event.consume();
        Ok(())
    }

    fn cancel_interaction(&mut self, _event: &Event, cx: &mut InteractionContext<'_>) -> EditorResult<()> {
        self.abort_drag(&mut *cx.viewer);
        Ok(())
    }

    fn on_resize_canvas(&mut self, _size: Size, _cx: &mut InteractionContext<'_>) -> bool {
        true
    }

    fn can_apply_attributes(&self, viewer: &dyn Viewer) -> bool {
        !viewer.selection().is_empty()
    }

    fn on_apply_attributes(
        &mut self,
        attributes: &Attributes,
        cx: &mut InteractionContext<'_>,
    ) -> EditorResult<()> {
        let mut command = CompoundCommand::new("Set Attributes");
        for &id in cx.viewer.selection() {
            command.push(Box::new(SetAttributes::new(id, attributes.clone())));
        }
        if command.is_empty() {
            return Ok(());
        }
        cx.execute(Box::new(command))
    }
}

#[cfg(test)]
mod tests {
    use crate::canvas::CanvasViewer;
    use crate::document::{Item, ItemId};
    use crate::event::{Event, EventDetail, EventKind, EventSource, Modifiers};
    use crate::handler::InteractionHandler;
    use crate::viewer::{Feedback, Viewer};
    use kurbo::{Point, Rect, Vec2};

    fn mouse(kind: EventKind, x: f64, y: f64) -> Event {
        let p = Point::new(x, y);
        Event::new(kind, EventSource::Mouse, p, p)
    }

    fn key(name: &str, modifiers: Modifiers) -> Event {
        Event::new(EventKind::KeyDown, EventSource::Key, Point::ZERO, Point::ZERO)
            .with_modifiers(modifiers)
            .with_detail(EventDetail::Key { key: name.into() })
    }

    fn handler_with(rects: &[Rect]) -> (InteractionHandler<CanvasViewer>, Vec<ItemId>) {
        let mut viewer = CanvasViewer::new();
        let ids = rects
            .iter()
            .map(|&rect| viewer.document_mut().add_item(Item::shape(rect)))
            .collect();
        (InteractionHandler::new(viewer), ids)
    }

    #[test]
    fn test_drag_moves_selection_in_one_command() {
        let (mut handler, ids) = handler_with(&[Rect::new(0.0, 0.0, 50.0, 50.0)]);

        handler.dispatch(mouse(EventKind::MouseDown, 10.0, 10.0)).unwrap();
        assert_eq!(handler.viewer().selection(), &[ids[0]]);

        handler.dispatch(mouse(EventKind::MouseMove, 25.0, 30.0)).unwrap();
        assert_eq!(
            handler.viewer().feedback(),
            Some(&Feedback::MovePreview {
                items: vec![ids[0]],
                offset: Vec2::new(15.0, 20.0),
            })
        );
        // The document is untouched until release.
        assert_eq!(
            handler.viewer().document().get(ids[0]).unwrap().bounds(),
            Rect::new(0.0, 0.0, 50.0, 50.0)
        );

        handler.dispatch(mouse(EventKind::MouseUp, 25.0, 30.0)).unwrap();
        assert_eq!(handler.command_stack().undo_len(), 1);
        assert_eq!(
            handler.viewer().document().get(ids[0]).unwrap().bounds(),
            Rect::new(15.0, 20.0, 65.0, 70.0)
        );
        assert!(handler.viewer().feedback().is_none());
    }

    #[test]
    fn test_click_without_motion_records_nothing() {
        let (mut handler, _) = handler_with(&[Rect::new(0.0, 0.0, 50.0, 50.0)]);
        handler.dispatch(mouse(EventKind::MouseDown, 10.0, 10.0)).unwrap();
        handler.dispatch(mouse(EventKind::MouseUp, 10.0, 10.0)).unwrap();
        assert!(!handler.is_undo_available());
    }

    #[test]
    fn test_shift_click_toggles() {
        let (mut handler, ids) = handler_with(&[
            Rect::new(0.0, 0.0, 10.0, 10.0),
            Rect::new(100.0, 0.0, 110.0, 10.0),
        ]);
        handler.dispatch(mouse(EventKind::MouseDown, 5.0, 5.0)).unwrap();
        handler.dispatch(mouse(EventKind::MouseUp, 5.0, 5.0)).unwrap();

        let shift_down = mouse(EventKind::MouseDown, 105.0, 5.0).with_modifiers(Modifiers::shift());
        handler.dispatch(shift_down).unwrap();
        handler.dispatch(mouse(EventKind::MouseUp, 105.0, 5.0)).unwrap();
        assert_eq!(handler.viewer().selection(), &[ids[0], ids[1]]);

        let shift_down = mouse(EventKind::MouseDown, 5.0, 5.0).with_modifiers(Modifiers::shift());
        handler.dispatch(shift_down).unwrap();
        handler.dispatch(mouse(EventKind::MouseUp, 5.0, 5.0)).unwrap();
        assert_eq!(handler.viewer().selection(), &[ids[1]]);
    }

    #[test]
    fn test_arrow_keys_nudge_selection() {
        let (mut handler, ids) = handler_with(&[Rect::new(0.0, 0.0, 10.0, 10.0)]);
        handler.viewer_mut().set_selection(vec![ids[0]]);

        handler.dispatch(key("ArrowRight", Modifiers::NONE)).unwrap();
        handler.dispatch(key("ArrowDown", Modifiers::shift())).unwrap();

        let bounds = handler.viewer().document().get(ids[0]).unwrap().bounds();
        assert_eq!(bounds.origin(), Point::new(1.0, 10.0));
        assert_eq!(handler.command_stack().undo_len(), 2);
    }

    #[test]
    fn test_delete_key_skips_locked_items() {
        let mut viewer = CanvasViewer::new();
        let free = viewer
            .document_mut()
            .add_item(Item::shape(Rect::new(0.0, 0.0, 10.0, 10.0)));
        let locked = viewer
            .document_mut()
            .add_item(Item::shape(Rect::new(20.0, 0.0, 30.0, 10.0)).locked());
        let mut handler = InteractionHandler::new(viewer);
        handler.viewer_mut().set_selection(vec![free, locked]);

        handler.dispatch(key("Delete", Modifiers::NONE)).unwrap();

        let document = handler.viewer().document();
        assert!(!document.contains(free));
        assert!(document.contains(locked));
    }

    #[test]
    fn test_double_click_enters_shape_edit() {
        let mut viewer = CanvasViewer::new();
        let line = viewer.document_mut().add_item(Item::line(vec![
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
        ]));
        let mut handler = InteractionHandler::new(viewer);

        handler.dispatch(mouse(EventKind::DoubleClick, 50.0, 0.0)).unwrap();
        assert_eq!(handler.active_interaction_name(), "line-edit");
        assert_eq!(handler.viewer().selection(), &[line]);
    }

    #[test]
    fn test_drop_creates_labelled_item() {
        let (mut handler, _) = handler_with(&[]);
        let drop = mouse(EventKind::Drop, 40.0, 40.0).with_detail(EventDetail::Drop {
            data: Some("hello".into()),
        });
        handler.dispatch(drop).unwrap();

        let viewer = handler.viewer();
        assert_eq!(viewer.document().len(), 1);
        let id = viewer.selection()[0];
        let item = viewer.document().get(id).unwrap();
        assert_eq!(item.attributes["label"], serde_json::json!("hello"));
        assert_eq!(item.bounds().origin(), Point::new(40.0, 40.0));
    }
}
