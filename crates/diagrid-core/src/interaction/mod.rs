//! Interactions: stateful strategies that interpret a contiguous input sequence.
//!
//! Exactly one interaction is active per handler. Every hook has a default
//! no-op body, so an interaction only implements the events it cares about.
//! Interactions never replace themselves directly; they ask their
//! [`InteractionContext`] for a switch and the handler performs it after the
//! hook returns.

mod create;
mod edit;
mod marquee;
mod read_only;
mod shape_edit;
mod slot;

pub use create::{CreateItemInteraction, CreateTool};
pub use edit::EditInteraction;
pub use marquee::MarqueeInteraction;
pub use read_only::ReadOnlyInteraction;
pub use shape_edit::{EditMode, ShapeEditInteraction};
pub use slot::{InteractionChanged, InteractionSlot, SubscriptionId};

use crate::command::{Command, CommandStack, OnComplete};
use crate::config::EditorConfig;
use crate::document::Attributes;
use crate::error::EditorResult;
use crate::event::Event;
use crate::viewer::Viewer;
use kurbo::{Point, Size, Vec2};
use std::fmt;

/// Identity of one activation of an interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InteractionId(u64);

impl InteractionId {
    pub(crate) fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for InteractionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Start, previous and current pointer locations in logical coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerTrack {
    pub start: Option<Point>,
    pub last: Option<Point>,
    pub current: Option<Point>,
}

impl PointerTrack {
    /// Movement since the previous pointer event.
    pub fn delta(&self) -> Vec2 {
        match (self.last, self.current) {
            (Some(last), Some(current)) => current - last,
            _ => Vec2::ZERO,
        }
    }

    /// Movement since the press that started the sequence.
    pub fn drag_delta(&self) -> Vec2 {
        match (self.start, self.current) {
            (Some(start), Some(current)) => current - start,
            _ => Vec2::ZERO,
        }
    }
}

/// Gestures an interaction wants delivered as-is instead of remapped to
/// mouse events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GestureUse {
    pub pan: bool,
    pub pinch: bool,
    pub rotate: bool,
}

impl GestureUse {
    pub fn of(interaction: &dyn Interaction) -> Self {
        Self {
            pan: interaction.is_using_pan(),
            pinch: interaction.is_using_pinch(),
            rotate: interaction.is_using_rotate(),
        }
    }
}

/// A requested change of the active interaction.
pub enum SwitchRequest {
    To(Box<dyn Interaction>),
    Default,
}

impl fmt::Debug for SwitchRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SwitchRequest::To(next) => write!(f, "To({})", next.name()),
            SwitchRequest::Default => write!(f, "Default"),
        }
    }
}

/// Everything an interaction may touch while handling an event.
pub struct InteractionContext<'a> {
    pub viewer: &'a mut dyn Viewer,
    commands: &'a mut CommandStack,
    config: &'a EditorConfig,
    interaction: InteractionId,
    is_default: bool,
    switch: Option<SwitchRequest>,
}

impl<'a> InteractionContext<'a> {
    pub fn new(
        viewer: &'a mut dyn Viewer,
        commands: &'a mut CommandStack,
        config: &'a EditorConfig,
        interaction: InteractionId,
        is_default: bool,
    ) -> Self {
        Self {
            viewer,
            commands,
            config,
            interaction,
            is_default,
            switch: None,
        }
    }

    pub fn config(&self) -> &EditorConfig {
        self.config
    }

    /// Id of the interaction receiving the event.
    pub fn interaction_id(&self) -> InteractionId {
        self.interaction
    }

    /// Whether the receiving interaction is the view-mode default.
    pub fn is_default(&self) -> bool {
        self.is_default
    }

    /// Hit tolerance in logical units.
    pub fn hit_tolerance(&self) -> f64 {
        self.config.hit_tolerance
    }

    /// Execute a command on behalf of the receiving interaction.
    pub fn execute(&mut self, command: Box<dyn Command>) -> EditorResult<()> {
        self.commands
            .execute(command, &mut *self.viewer, self.interaction, None)
    }

    /// Execute a command and run `on_complete` before feedback is cleared.
    pub fn execute_with(
        &mut self,
        command: Box<dyn Command>,
        on_complete: OnComplete<'_>,
    ) -> EditorResult<()> {
        self.commands
            .execute(command, &mut *self.viewer, self.interaction, Some(on_complete))
    }

    /// Replace the receiving interaction once the current hook returns.
    pub fn switch_to(&mut self, next: Box<dyn Interaction>) {
        self.switch = Some(SwitchRequest::To(next));
    }

    /// Return to the view-mode default once the current hook returns.
    pub fn switch_to_default(&mut self) {
        self.switch = Some(SwitchRequest::Default);
    }

    pub fn pending_switch(&self) -> Option<&SwitchRequest> {
        self.switch.as_ref()
    }

    pub(crate) fn take_switch(&mut self) -> Option<SwitchRequest> {
        self.switch.take()
    }
}

/// Hooks an interaction may implement.
#[allow(unused_variables)]
pub trait Interaction {
    /// Stable name reported in change notifications and logs.
    fn name(&self) -> &'static str;

    /// Called once when the interaction becomes active.
    fn activate(&mut self, viewer: &mut dyn Viewer) {}

    /// Called once when the interaction stops being active.
    fn deactivate(&mut self, viewer: &mut dyn Viewer) {}

    /// Location storage used by the default location hooks.
    fn pointer_track(&self) -> Option<&PointerTrack> {
        None
    }

    fn pointer_track_mut(&mut self) -> Option<&mut PointerTrack> {
        None
    }

    fn set_start_location(&mut self, location: Point) {
        if let Some(track) = self.pointer_track_mut() {
            track.start = Some(location);
        }
    }

    fn set_last_location(&mut self, location: Point) {
        if let Some(track) = self.pointer_track_mut() {
            track.last = Some(location);
        }
    }

    fn set_current_location(&mut self, location: Point) {
        if let Some(track) = self.pointer_track_mut() {
            track.current = Some(location);
        }
    }

    fn current_location(&self) -> Option<Point> {
        self.pointer_track().and_then(|track| track.current)
    }

    fn on_mouse_down(&mut self, event: &mut Event, cx: &mut InteractionContext<'_>) -> EditorResult<()> {
        Ok(())
    }

    fn on_mouse_move(&mut self, event: &mut Event, cx: &mut InteractionContext<'_>) -> EditorResult<()> {
        Ok(())
    }

    fn on_mouse_up(&mut self, event: &mut Event, cx: &mut InteractionContext<'_>) -> EditorResult<()> {
        Ok(())
    }

    fn on_double_click(&mut self, event: &mut Event, cx: &mut InteractionContext<'_>) -> EditorResult<()> {
        Ok(())
    }

    fn on_mouse_exit(&mut self, event: &mut Event, cx: &mut InteractionContext<'_>) -> EditorResult<()> {
        Ok(())
    }

    fn on_mouse_wheel(&mut self, event: &mut Event, cx: &mut InteractionContext<'_>) -> EditorResult<()> {
        Ok(())
    }

    fn on_right_mouse_down(&mut self, event: &mut Event, cx: &mut InteractionContext<'_>) -> EditorResult<()> {
        Ok(())
    }

    fn on_right_mouse_up(&mut self, event: &mut Event, cx: &mut InteractionContext<'_>) -> EditorResult<()> {
        Ok(())
    }

    fn on_key_down(&mut self, event: &mut Event, cx: &mut InteractionContext<'_>) -> EditorResult<()> {
        Ok(())
    }

    fn on_key_up(&mut self, event: &mut Event, cx: &mut InteractionContext<'_>) -> EditorResult<()> {
        Ok(())
    }

    fn on_pan_start(&mut self, event: &mut Event, cx: &mut InteractionContext<'_>) -> EditorResult<()> {
        Ok(())
    }

    fn on_pan(&mut self, event: &mut Event, cx: &mut InteractionContext<'_>) -> EditorResult<()> {
        Ok(())
    }

    fn on_pan_end(&mut self, event: &mut Event, cx: &mut InteractionContext<'_>) -> EditorResult<()> {
        Ok(())
    }

    fn on_pinch_start(&mut self, event: &mut Event, cx: &mut InteractionContext<'_>) -> EditorResult<()> {
        Ok(())
    }

    fn on_pinch(&mut self, event: &mut Event, cx: &mut InteractionContext<'_>) -> EditorResult<()> {
        Ok(())
    }

    fn on_pinch_end(&mut self, event: &mut Event, cx: &mut InteractionContext<'_>) -> EditorResult<()> {
        Ok(())
    }

    fn on_rotate_start(&mut self, event: &mut Event, cx: &mut InteractionContext<'_>) -> EditorResult<()> {
        Ok(())
    }

    fn on_rotate(&mut self, event: &mut Event, cx: &mut InteractionContext<'_>) -> EditorResult<()> {
        Ok(())
    }

    fn on_rotate_end(&mut self, event: &mut Event, cx: &mut InteractionContext<'_>) -> EditorResult<()> {
        Ok(())
    }

    fn on_hold(&mut self, event: &mut Event, cx: &mut InteractionContext<'_>) -> EditorResult<()> {
        Ok(())
    }

    fn on_drop(&mut self, event: &mut Event, cx: &mut InteractionContext<'_>) -> EditorResult<()> {
        Ok(())
    }

    fn on_drag_enter(&mut self, event: &mut Event, cx: &mut InteractionContext<'_>) -> EditorResult<()> {
        Ok(())
    }

    fn on_drag_over(&mut self, event: &mut Event, cx: &mut InteractionContext<'_>) -> EditorResult<()> {
        Ok(())
    }

    fn on_drag_leave(&mut self, event: &mut Event, cx: &mut InteractionContext<'_>) -> EditorResult<()> {
        Ok(())
    }

    fn on_drag_exit(&mut self, event: &mut Event, cx: &mut InteractionContext<'_>) -> EditorResult<()> {
        Ok(())
    }

    /// Asked on every press: should this interaction give way to the default?
    fn do_cancel_interaction(&mut self, event: &Event, viewer: &dyn Viewer) -> bool {
        false
    }

    /// Abort the interaction (Escape or an explicit cancel).
    fn cancel_interaction(&mut self, event: &Event, cx: &mut InteractionContext<'_>) -> EditorResult<()> {
        Ok(())
    }

    /// Wrap up before being replaced by a cancellation.
    fn finish_interaction(&mut self, event: &Event, cx: &mut InteractionContext<'_>) -> EditorResult<()> {
        Ok(())
    }

    /// The canvas was resized. Returning `false` hands control back to the
    /// view-mode default.
    fn on_resize_canvas(&mut self, size: Size, cx: &mut InteractionContext<'_>) -> bool {
        false
    }

    fn can_apply_attributes(&self, viewer: &dyn Viewer) -> bool {
        false
    }

    fn on_apply_attributes(
        &mut self,
        attributes: &Attributes,
        cx: &mut InteractionContext<'_>,
    ) -> EditorResult<()> {
        Ok(())
    }

    fn is_using_pan(&self) -> bool {
        false
    }

    fn is_using_pinch(&self) -> bool {
        false
    }

    fn is_using_rotate(&self) -> bool {
        false
    }
}
