//! Editing operations on the current selection.
//!
//! Every operation takes one snapshot of the selection when it is invoked
//! and turns it into a single undoable command.

use crate::clipboard::Clipboard;
use crate::command::{
    Command, CompoundCommand, DeleteItem, GroupItems, MoveItems, PasteItems, SetBounds, UngroupItem,
};
use crate::document::{Document, Item, ItemId, ItemKind};
use crate::error::EditorResult;
use crate::handler::InteractionHandler;
use crate::viewer::{ViewMode, Viewer};
use kurbo::{Rect, Vec2};

/// Edge or center line that selected items are lined up on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Alignment {
    Left,
    Right,
    Top,
    Bottom,
    /// Line up horizontal centers on one vertical axis.
    CenterHorizontal,
    /// Line up vertical centers on one horizontal axis.
    CenterVertical,
}

impl Alignment {
    /// Offset that moves `bounds` onto the alignment line of `reference`.
    fn offset(self, bounds: Rect, reference: Rect) -> Vec2 {
        match self {
            Alignment::Left => Vec2::new(reference.x0 - bounds.x0, 0.0),
            Alignment::Right => Vec2::new(reference.x1 - bounds.x1, 0.0),
            Alignment::Top => Vec2::new(0.0, reference.y0 - bounds.y0),
            Alignment::Bottom => Vec2::new(0.0, reference.y1 - bounds.y1),
            Alignment::CenterHorizontal => Vec2::new(reference.center().x - bounds.center().x, 0.0),
            Alignment::CenterVertical => Vec2::new(0.0, reference.center().y - bounds.center().y),
        }
    }
}

/// Which dimensions [`InteractionHandler::match_selection_size`] copies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SizeMatch {
    Width,
    Height,
    Both,
}

/// Delete the deletable items among `ids`, front to back, as one entry.
///
/// Returns `None` when nothing can be deleted.
pub(crate) fn delete_command(document: &Document, ids: &[ItemId]) -> Option<CompoundCommand> {
    let mut indexed: Vec<(usize, ItemId)> = ids
        .iter()
        .filter(|&&id| document.get(id).is_some_and(Item::is_deletable))
        .filter_map(|&id| document.index_of(id).map(|index| (index, id)))
        .collect();
    if indexed.is_empty() {
        return None;
    }
    indexed.sort_by(|a, b| b.0.cmp(&a.0));
    indexed.dedup();

    let mut command = CompoundCommand::new("Delete");
    for (_, id) in indexed {
        command.push(Box::new(DeleteItem::new(id)));
    }
    Some(command)
}

fn select(ids: Vec<ItemId>) -> impl FnMut(&dyn Command, &mut dyn Viewer) {
    move |_, viewer| viewer.set_selection(ids.clone())
}

impl<V: Viewer> InteractionHandler<V> {
    /// Selected items that still exist, in z-order.
    fn selection_snapshot(&self) -> Vec<ItemId> {
        let viewer = self.viewer();
        let selection = viewer.selection();
        viewer
            .document()
            .z_order()
            .iter()
            .filter(|id| selection.contains(*id))
            .copied()
            .collect()
    }

    fn is_read_only(&self) -> bool {
        if self.viewer().view_mode() == ViewMode::ReadOnly {
            log::warn!("Ignoring edit in read-only view");
            return true;
        }
        false
    }

    /// Copy the selected items to the clipboard. Returns `false` when
    /// nothing is selected.
    pub fn copy_selection(&mut self) -> EditorResult<bool> {
        let ids = self.selection_snapshot();
        if ids.is_empty() {
            return Ok(false);
        }
        let document = self.viewer().document();
        let items: Vec<Item> = ids.iter().filter_map(|&id| document.get(id).cloned()).collect();
        self.clipboard.store(&items)?;
        Ok(true)
    }

    /// Copy the selection, then delete its deletable items.
    pub fn cut_selection(&mut self) -> EditorResult<bool> {
        if self.is_read_only() || !self.copy_selection()? {
            return Ok(false);
        }
        self.delete_selection()
    }

    /// Insert a fresh copy of the clipboard contents and select it.
    pub fn paste(&mut self) -> EditorResult<bool> {
        if self.is_read_only() {
            return Ok(false);
        }
        let offset = self.config().paste_offset;
        let items = self.clipboard.instantiate(offset)?;
        if items.is_empty() {
            return Ok(false);
        }
        let command = PasteItems::new(items);
        let ids = command.ids().to_vec();
        log::debug!("Pasting {} items", ids.len());
        self.execute_with(Box::new(command), &mut select(ids))?;
        Ok(true)
    }

    pub fn is_paste_available(&self) -> bool {
        !self.clipboard.is_empty()
    }

    /// The clipboard, for exchanging contents with a host clipboard.
    pub fn clipboard(&self) -> &Clipboard {
        &self.clipboard
    }

    pub fn clipboard_mut(&mut self) -> &mut Clipboard {
        &mut self.clipboard
    }

    /// Delete the deletable selected items. Locked items stay selected.
    pub fn delete_selection(&mut self) -> EditorResult<bool> {
        if self.is_read_only() {
            return Ok(false);
        }
        let ids = self.selection_snapshot();
        let Some(command) = delete_command(self.viewer().document(), &ids) else {
            return Ok(false);
        };
        let document = self.viewer().document();
        let kept: Vec<ItemId> = ids
            .into_iter()
            .filter(|&id| document.get(id).is_some_and(|item| !item.is_deletable()))
            .collect();
        self.execute_with(Box::new(command), &mut select(kept))?;
        Ok(true)
    }

    /// Select every item in the document.
    pub fn select_all(&mut self) {
        let all = self.viewer().document().z_order().to_vec();
        self.viewer_mut().set_selection(all);
    }

    /// Group the selection into one item. Needs at least two items.
    pub fn group_selection(&mut self) -> EditorResult<Option<ItemId>> {
        if self.is_read_only() {
            return Ok(None);
        }
        let ids = self.selection_snapshot();
        if ids.len() < 2 {
            return Ok(None);
        }
        let command = GroupItems::new(ids);
        let group_id = command.group_id();
        self.execute_with(Box::new(command), &mut select(vec![group_id]))?;
        Ok(Some(group_id))
    }

    /// Dissolve every selected group and select the released children.
    pub fn ungroup_selection(&mut self) -> EditorResult<Vec<ItemId>> {
        if self.is_read_only() {
            return Ok(Vec::new());
        }
        let document = self.viewer().document();
        let mut children = Vec::new();
        let mut command = CompoundCommand::new("Ungroup");
        for id in self.selection_snapshot() {
            if let Some(ItemKind::Group { children: members }) = document.get(id).map(|item| &item.kind) {
                children.extend(members.iter().map(|child| child.id));
                command.push(Box::new(UngroupItem::new(id)));
            }
        }
        if command.is_empty() {
            return Ok(Vec::new());
        }
        self.execute_with(Box::new(command), &mut select(children.clone()))?;
        Ok(children)
    }

    /// Line up the selected items on an edge or center of their combined
    /// bounds. Needs at least two items.
    pub fn align_selection(&mut self, alignment: Alignment) -> EditorResult<bool> {
        if self.is_read_only() {
            return Ok(false);
        }
        let ids = self.selection_snapshot();
        let document = self.viewer().document();
        let Some(reference) = document.bounds_of(&ids).filter(|_| ids.len() >= 2) else {
            return Ok(false);
        };
        let mut command = CompoundCommand::new("Align");
        for &id in &ids {
            let Some(item) = document.get(id) else {
                continue;
            };
            let offset = alignment.offset(item.bounds(), reference);
            if offset != Vec2::ZERO {
                command.push(Box::new(MoveItems::new(vec![id], offset)));
            }
        }
        if command.is_empty() {
            return Ok(false);
        }
        self.execute_with(Box::new(command), &mut select(ids))?;
        Ok(true)
    }

    /// Resize the selected items to the size of the first selected item,
    /// keeping each item's origin.
    pub fn match_selection_size(&mut self, dimensions: SizeMatch) -> EditorResult<bool> {
        if self.is_read_only() {
            return Ok(false);
        }
        let ids = self.selection_snapshot();
        let document = self.viewer().document();
        let Some(reference) = self
            .viewer()
            .selection()
            .first()
            .and_then(|&id| document.get(id))
            .map(Item::bounds)
        else {
            return Ok(false);
        };
        let mut command = CompoundCommand::new("Match size");
        for &id in &ids {
            let Some(bounds) = document.get(id).map(Item::bounds) else {
                continue;
            };
            let (width, height) = match dimensions {
                SizeMatch::Width => (reference.width(), bounds.height()),
                SizeMatch::Height => (bounds.width(), reference.height()),
                SizeMatch::Both => (reference.width(), reference.height()),
            };
            let target = Rect::from_origin_size(bounds.origin(), (width, height));
            if target != bounds {
                command.push(Box::new(SetBounds::new(id, target)));
            }
        }
        if command.is_empty() {
            return Ok(false);
        }
        self.execute_with(Box::new(command), &mut select(ids))?;
        Ok(true)
    }
}
