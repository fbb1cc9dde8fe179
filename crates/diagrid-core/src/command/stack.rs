use super::Command;
use crate::error::EditorResult;
use crate::interaction::InteractionId;
use crate::viewer::{SuspendDrawing, Viewer};

/// Access to the interaction state machine needed while undoing.
pub trait InteractionHost {
    /// Id of the active interaction, activating the default one if needed.
    fn active_interaction_id(&mut self, viewer: &mut dyn Viewer) -> InteractionId;

    /// Return to the view-mode default. Does nothing if a default is already active.
    fn restore_default(&mut self, viewer: &mut dyn Viewer);
}

/// Callback invoked right after a command executes, before feedback is cleared.
pub type OnComplete<'c> = &'c mut dyn FnMut(&dyn Command, &mut dyn Viewer);

#[derive(Debug)]
struct StackEntry {
    command: Box<dyn Command>,
    /// Interaction that was active when the command executed.
    interaction: InteractionId,
}

/// Undo and redo history.
#[derive(Debug, Default)]
pub struct CommandStack {
    undo_stack: Vec<StackEntry>,
    redo_stack: Vec<StackEntry>,
    /// Maximum number of undo entries (`None` = unbounded).
    limit: Option<usize>,
}

impl CommandStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a stack that keeps at most `limit` undo entries.
    pub fn with_limit(limit: Option<usize>) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }

    /// Execute a command and record it for undo.
    ///
    /// Drawing is suspended around non-transient commands and always resumed,
    /// even when the command fails. A failed command is not recorded and the
    /// redo history is left untouched.
    pub fn execute(
        &mut self,
        mut command: Box<dyn Command>,
        viewer: &mut dyn Viewer,
        interaction: InteractionId,
        on_complete: Option<OnComplete<'_>>,
    ) -> EditorResult<()> {
        let transient = command.is_transient();
        {
            let mut viewer = SuspendDrawing::new(viewer, !transient);
            if let Err(err) = command.execute(viewer.document_mut()) {
                log::error!("Command '{}' failed: {}", command.name(), err);
                return Err(err);
            }
            if let Some(callback) = on_complete {
                callback(&*command, &mut *viewer);
            }
            if !command.keeps_feedback() {
                viewer.clear_feedback();
            }
        }
        viewer.request_repaint();

        log::debug!("Executed '{}'", command.name());
        self.undo_stack.push(StackEntry {
            command,
            interaction,
        });
        self.redo_stack.clear();
        self.enforce_limit();
        Ok(())
    }

    /// Undo the most recent command. Returns `false` when there is nothing
    /// to undo.
    ///
    /// The selection is cleared first so observers see a change even when the
    /// restored selection is identical. If the active interaction is not the
    /// one the command ran under, the view-mode default is restored before
    /// the selection.
    pub fn undo(
        &mut self,
        viewer: &mut dyn Viewer,
        host: &mut dyn InteractionHost,
    ) -> EditorResult<bool> {
        if !self.is_undo_available() {
            return Ok(false);
        }
        viewer.clear_selection();
        let Some(mut entry) = self.undo_stack.pop() else {
            return Ok(false);
        };
        {
            let mut viewer = SuspendDrawing::new(viewer, true);
            if let Err(err) = entry.command.undo(viewer.document_mut()) {
                log::error!("Undo of '{}' failed: {}", entry.command.name(), err);
                return Err(err);
            }
            let selection = entry.command.selection_after_undo();
            if host.active_interaction_id(&mut *viewer) != entry.interaction {
                log::debug!("Undo left a stale interaction active, restoring default");
                host.restore_default(&mut *viewer);
            }
            viewer.set_selection(selection);
        }
        viewer.request_repaint();

        log::debug!("Undid '{}'", entry.command.name());
        self.redo_stack.push(entry);
        Ok(true)
    }

    /// Redo the most recently undone command. Returns `false` when there is
    /// nothing to redo. The active interaction is left as it is.
    pub fn redo(&mut self, viewer: &mut dyn Viewer) -> EditorResult<bool> {
        if !self.is_redo_available() {
            return Ok(false);
        }
        viewer.clear_selection();
        let Some(mut entry) = self.redo_stack.pop() else {
            return Ok(false);
        };
        {
            let mut viewer = SuspendDrawing::new(viewer, true);
            if let Err(err) = entry.command.redo(viewer.document_mut()) {
                log::error!("Redo of '{}' failed: {}", entry.command.name(), err);
                return Err(err);
            }
            viewer.set_selection(entry.command.selection_after_redo());
        }
        viewer.request_repaint();

        log::debug!("Redid '{}'", entry.command.name());
        self.undo_stack.push(entry);
        self.enforce_limit();
        Ok(true)
    }

    pub fn is_undo_available(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn is_redo_available(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    /// Name of the command `undo` would revert.
    pub fn undo_name(&self) -> Option<&str> {
        self.undo_stack.last().map(|entry| entry.command.name())
    }

    /// Name of the command `redo` would re-apply.
    pub fn redo_name(&self) -> Option<&str> {
        self.redo_stack.last().map(|entry| entry.command.name())
    }

    /// Drop all history.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    fn enforce_limit(&mut self) {
        if let Some(limit) = self.limit {
            if self.undo_stack.len() > limit {
                let excess = self.undo_stack.len() - limit;
                self.undo_stack.drain(..excess);
            }
        }
    }
}
