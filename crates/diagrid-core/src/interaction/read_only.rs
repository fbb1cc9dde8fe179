use super::{Interaction, InteractionContext, PointerTrack};
use crate::error::EditorResult;
use crate::event::Event;
use crate::viewer::{Cursor, Viewer};
use kurbo::{Point, Size};

/// Pan with the wheel, or zoom around the pointer when the command key is held.
pub(crate) fn wheel_navigate(event: &mut Event, cx: &mut InteractionContext<'_>) {
    let Some(delta) = event.wheel_delta() else {
        return;
    };
    let step = cx.config().wheel_zoom_step;
    let camera = cx.viewer.camera_mut();
    if event.modifiers.command() {
        let factor = if delta.y < 0.0 {
            step
        } else if delta.y > 0.0 {
            1.0 / step
        } else {
            return;
        };
        camera.zoom_at(event.device_location, factor);
    } else {
        let ratio = camera.device_pixel_ratio;
        camera.pan(-delta / ratio);
    }
    event.request_repaint = true;
    event.prevent_default();
}

/// Default interaction of read-only views: the document can be navigated
/// but never modified.
#[derive(Debug, Default)]
pub struct ReadOnlyInteraction {
    track: PointerTrack,
    /// Device location of the previous drag sample while grabbing.
    grab: Option<Point>,
    pinch_scale: f64,
}

impl ReadOnlyInteraction {
    pub const NAME: &'static str = "read-only";

    pub fn new() -> Self {
        Self {
            pinch_scale: 1.0,
            ..Self::default()
        }
    }

    fn drag_to(&mut self, event: &mut Event, cx: &mut InteractionContext<'_>) {
        let Some(last) = self.grab else {
            return;
        };
        let camera = cx.viewer.camera_mut();
        let ratio = camera.device_pixel_ratio;
        camera.pan((event.device_location - last) / ratio);
        self.grab = Some(event.device_location);
        event.request_repaint = true;
    }

    fn release(&mut self, viewer: &mut dyn Viewer) {
        if self.grab.take().is_some() {
            viewer.set_cursor(Cursor::Grab);
        }
    }
}

impl Interaction for ReadOnlyInteraction {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn activate(&mut self, viewer: &mut dyn Viewer) {
        viewer.set_cursor(Cursor::Grab);
    }

    fn deactivate(&mut self, viewer: &mut dyn Viewer) {
        self.grab = None;
        viewer.set_cursor(Cursor::Default);
    }

    fn pointer_track(&self) -> Option<&PointerTrack> {
        Some(&self.track)
    }

    fn pointer_track_mut(&mut self) -> Option<&mut PointerTrack> {
        Some(&mut self.track)
    }

    fn on_mouse_down(&mut self, event: &mut Event, cx: &mut InteractionContext<'_>) -> EditorResult<()> {
        self.grab = Some(event.device_location);
        cx.viewer.set_cursor(Cursor::Grabbing);
        Ok(())
    }

    fn on_mouse_move(&mut self, event: &mut Event, cx: &mut InteractionContext<'_>) -> EditorResult<()> {
        self.drag_to(event, cx);
        Ok(())
    }

    fn on_mouse_up(&mut self, _event: &mut Event, cx: &mut InteractionContext<'_>) -> EditorResult<()> {
        self.release(&mut *cx.viewer);
        Ok(())
    }

    fn on_mouse_exit(&mut self, _event: &mut Event, cx: &mut InteractionContext<'_>) -> EditorResult<()> {
        self.release(&mut *cx.viewer);
        Ok(())
    }

    fn on_mouse_wheel(&mut self, event: &mut Event, cx: &mut InteractionContext<'_>) -> EditorResult<()> {
        wheel_navigate(event, cx);
        Ok(())
    }

    fn on_pan_start(&mut self, event: &mut Event, cx: &mut InteractionContext<'_>) -> EditorResult<()> {
        self.on_mouse_down(event, cx)
    }

    fn on_pan(&mut self, event: &mut Event, cx: &mut InteractionContext<'_>) -> EditorResult<()> {
        self.drag_to(event, cx);
        Ok(())
    }

    fn on_pan_end(&mut self, _event: &mut Event, cx: &mut InteractionContext<'_>) -> EditorResult<()> {
        self.release(&mut *cx.viewer);
        Ok(())
    }

    fn on_pinch_start(&mut self, event: &mut Event, _cx: &mut InteractionContext<'_>) -> EditorResult<()> {
        self.pinch_scale = event.gesture_scale().unwrap_or(1.0);
        Ok(())
    }

    fn on_pinch(&mut self, event: &mut Event, cx: &mut InteractionContext<'_>) -> EditorResult<()> {
        let Some(scale) = event.gesture_scale() else {
            return Ok(());
        };
        if self.pinch_scale > f64::EPSILON && scale > f64::EPSILON {
            cx.viewer
                .camera_mut()
                .zoom_at(event.device_location, scale / self.pinch_scale);
            event.request_repaint = true;
        }
        self.pinch_scale = scale;
        Ok(())
    }

    fn on_pinch_end(&mut self, _event: &mut Event, _cx: &mut InteractionContext<'_>) -> EditorResult<()> {
        self.pinch_scale = 1.0;
        Ok(())
    }

    fn on_resize_canvas(&mut self, _size: Size, _cx: &mut InteractionContext<'_>) -> bool {
        true
    }

    fn is_using_pan(&self) -> bool {
        true
    }

    fn is_using_pinch(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::InteractionHandler;
    use crate::canvas::CanvasViewer;
    use crate::event::{EventDetail, EventKind, EventSource, Modifiers};
    use crate::viewer::ViewMode;
    use kurbo::{Point, Vec2};

    fn read_only_handler() -> InteractionHandler<CanvasViewer> {
        let mut viewer = CanvasViewer::new();
        viewer.set_view_mode(ViewMode::ReadOnly);
        InteractionHandler::new(viewer)
    }

    fn mouse(kind: EventKind, x: f64, y: f64) -> Event {
        let p = Point::new(x, y);
        Event::new(kind, EventSource::Mouse, p, p)
    }

    #[test]
    fn test_drag_pans_camera() {
        let mut handler = read_only_handler();
        handler.dispatch(mouse(EventKind::MouseDown, 10.0, 10.0)).unwrap();
        handler.dispatch(mouse(EventKind::MouseMove, 30.0, 15.0)).unwrap();
        handler.dispatch(mouse(EventKind::MouseUp, 30.0, 15.0)).unwrap();

        assert_eq!(handler.viewer().camera().offset, Vec2::new(20.0, 5.0));
        assert_eq!(handler.viewer().cursor(), Cursor::Grab);
        assert!(handler.viewer().document().is_empty());
    }

    #[test]
    fn test_ctrl_wheel_zooms_around_pointer() {
        let mut handler = read_only_handler();
        let anchor = Point::new(100.0, 100.0);
        let before = handler.viewer().camera().to_logical(anchor);

        let event = mouse(EventKind::Wheel, anchor.x, anchor.y)
            .with_modifiers(Modifiers::ctrl())
            .with_detail(EventDetail::Wheel {
                delta: Vec2::new(0.0, -1.0),
            });
        handler.dispatch(event).unwrap();

        let camera = handler.viewer().camera();
        assert!(camera.zoom > 1.0);
        let after = camera.to_logical(anchor);
        assert!((after - before).hypot() < 1e-9);
    }

    #[test]
    fn test_pinch_zooms_by_ratio() {
        let mut handler = read_only_handler();
        let gesture = |kind, scale| {
            Event::new(kind, EventSource::Gesture, Point::ZERO, Point::ZERO).with_detail(
                EventDetail::Gesture {
                    pointers: 2,
                    scale,
                    rotation: 0.0,
                },
            )
        };
        handler.dispatch(gesture(EventKind::PinchStart, 1.0)).unwrap();
        handler.dispatch(gesture(EventKind::Pinch, 1.5)).unwrap();
        handler.dispatch(gesture(EventKind::Pinch, 2.0)).unwrap();
        handler.dispatch(gesture(EventKind::PinchEnd, 2.0)).unwrap();

        assert!((handler.viewer().camera().zoom - 2.0).abs() < 1e-9);
    }
}
