use super::{Interaction, InteractionContext, PointerTrack};
use crate::document::ItemId;
use crate::error::EditorResult;
use crate::event::Event;
use crate::viewer::{Cursor, Feedback, Viewer};
use kurbo::{Point, Rect, Size};

/// Rubber-band selection started by a press on empty canvas.
///
/// Ends on release (or when the pointer leaves the canvas) and hands control
/// back to the default interaction.
#[derive(Debug)]
pub struct MarqueeInteraction {
    track: PointerTrack,
    origin: Point,
    /// Extend the selection present at activation instead of replacing it.
    additive: bool,
    base: Vec<ItemId>,
}

impl MarqueeInteraction {
    pub const NAME: &'static str = "marquee";

    pub fn new(origin: Point, additive: bool) -> Self {
        Self {
            track: PointerTrack::default(),
            origin,
            additive,
            base: Vec::new(),
        }
    }

    pub fn rect_to(&self, point: Point) -> Rect {
        Rect::from_points(self.origin, point)
    }

    fn commit(&mut self, point: Point, cx: &mut InteractionContext<'_>) {
        let rect = self.rect_to(point);
        let mut selection = self.base.clone();
        for id in cx.viewer.document().items_in_rect(rect) {
            if !selection.contains(&id) {
                selection.push(id);
            }
        }
        log::trace!("Marquee {:?} selected {} items", rect, selection.len());
        cx.viewer.set_selection(selection);
        cx.viewer.clear_feedback();
        cx.viewer.request_repaint();
        cx.switch_to_default();
    }
}

impl Interaction for MarqueeInteraction {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn activate(&mut self, viewer: &mut dyn Viewer) {
        if self.additive {
            self.base = viewer.selection().to_vec();
        }
        viewer.set_cursor(Cursor::Crosshair);
    }

    fn deactivate(&mut self, viewer: &mut dyn Viewer) {
        viewer.clear_feedback();
        viewer.set_cursor(Cursor::Default);
    }

    fn pointer_track(&self) -> Option<&PointerTrack> {
        Some(&self.track)
    }

    fn pointer_track_mut(&mut self) -> Option<&mut PointerTrack> {
        Some(&mut self.track)
    }

    fn on_mouse_move(&mut self, event: &mut Event, cx: &mut InteractionContext<'_>) -> EditorResult<()> {
        let rect = self.rect_to(event.logical_location);
        cx.viewer.set_feedback(Some(Feedback::Marquee(rect)));
        Ok(())
    }

    fn on_mouse_up(&mut self, event: &mut Event, cx: &mut InteractionContext<'_>) -> EditorResult<()> {
        self.commit(event.logical_location, cx);
        Ok(())
    }

    fn on_mouse_exit(&mut self, event: &mut Event, cx: &mut InteractionContext<'_>) -> EditorResult<()> {
        self.commit(event.logical_location, cx);
        Ok(())
    }

    fn cancel_interaction(&mut self, _event: &Event, cx: &mut InteractionContext<'_>) -> EditorResult<()> {
        cx.viewer.clear_feedback();
        cx.viewer.set_selection(self.base.clone());
        Ok(())
    }

    fn finish_interaction(&mut self, _event: &Event, cx: &mut InteractionContext<'_>) -> EditorResult<()> {
        cx.viewer.clear_feedback();
        Ok(())
    }

    fn on_resize_canvas(&mut self, _size: Size, _cx: &mut InteractionContext<'_>) -> bool {
        true
    }
}
