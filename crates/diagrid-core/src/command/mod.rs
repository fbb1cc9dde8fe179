//! Reversible document mutations and the undo/redo engine.
//!
//! Every change to the document goes through a [`Command`] executed by the
//! [`CommandStack`]. Commands capture whatever they need to reverse
//! themselves the first time they execute.

mod compound;
mod items;
mod stack;

pub use compound::CompoundCommand;
pub use items::{
    AddItem, DeleteItem, GroupItems, MoveItems, PasteItems, SetAttributes, SetBounds, SetPoints,
    UngroupItem,
};
pub use stack::{CommandStack, InteractionHost, OnComplete};

use crate::document::{Document, ItemId};
use crate::error::EditorResult;
use std::fmt;

/// A reversible, atomic unit of document mutation.
pub trait Command: fmt::Debug {
    /// Human-readable name, used for "Undo <name>" labels.
    fn name(&self) -> &str;

    /// Apply the mutation for the first time.
    fn execute(&mut self, document: &mut Document) -> EditorResult<()>;

    /// Revert the mutation.
    fn undo(&mut self, document: &mut Document) -> EditorResult<()>;

    /// Re-apply the mutation after an undo.
    fn redo(&mut self, document: &mut Document) -> EditorResult<()> {
        self.execute(document)
    }

    /// Transient commands have no visual effect, so drawing is not suspended
    /// around them.
    fn is_transient(&self) -> bool {
        false
    }

    /// Keep the in-progress feedback overlay after executing.
    fn keeps_feedback(&self) -> bool {
        false
    }

    /// Items to select once the command has been undone.
    fn selection_after_undo(&self) -> Vec<ItemId> {
        Vec::new()
    }

    /// Items to select once the command has been redone.
    fn selection_after_redo(&self) -> Vec<ItemId> {
        Vec::new()
    }
}
