use super::Command;
use crate::document::{Document, ItemId};
use crate::error::EditorResult;

/// An ordered group of commands that is undone and redone as one entry.
///
/// Children run in order on execute/redo and in reverse order on undo. A
/// failing child stops the sequence and its error is returned; children
/// that already ran are not rolled back.
#[derive(Debug, Default)]
pub struct CompoundCommand {
    name: String,
    children: Vec<Box<dyn Command>>,
}

impl CompoundCommand {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
        }
    }

    /// Append a child command.
    pub fn push(&mut self, command: Box<dyn Command>) {
        self.children.push(command);
    }

    pub fn with(mut self, command: Box<dyn Command>) -> Self {
        self.push(command);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }
}

impl Command for CompoundCommand {
    fn name(&self) -> &str {
        &self.name
    }

    fn execute(&mut self, document: &mut Document) -> EditorResult<()> {
        for child in &mut self.children {
            child.execute(document)?;
        }
        Ok(())
    }

    fn undo(&mut self, document: &mut Document) -> EditorResult<()> {
        for child in self.children.iter_mut().rev() {
            child.undo(document)?;
        }
        Ok(())
    }

    fn redo(&mut self, document: &mut Document) -> EditorResult<()> {
        for child in &mut self.children {
            child.redo(document)?;
        }
        Ok(())
    }

    fn is_transient(&self) -> bool {
        self.children.iter().all(|child| child.is_transient())
    }

    fn keeps_feedback(&self) -> bool {
        self.children.iter().any(|child| child.keeps_feedback())
    }

    fn selection_after_undo(&self) -> Vec<ItemId> {
        let mut items = Vec::new();
        for child in &self.children {
            for id in child.selection_after_undo() {
                if !items.contains(&id) {
                    items.push(id);
                }
            }
        }
        items
    }

    fn selection_after_redo(&self) -> Vec<ItemId> {
        let mut items = Vec::new();
        for child in &self.children {
            for id in child.selection_after_redo() {
                if !items.contains(&id) {
                    items.push(id);
                }
            }
        }
        items
    }
}
