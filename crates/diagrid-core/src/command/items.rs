//! Concrete commands over document items.

use super::Command;
use crate::document::{Attributes, Document, Item, ItemId, ItemKind};
use crate::error::{EditorError, EditorResult};
use kurbo::{Point, Rect, Vec2};

fn missing(id: ItemId) -> EditorError {
    EditorError::ItemNotFound(id)
}

/// Add a new item to the document.
#[derive(Debug)]
pub struct AddItem {
    id: ItemId,
    /// Held while the item is not in the document.
    item: Option<Item>,
    index: Option<usize>,
}

impl AddItem {
    /// Add on top of the z-order.
    pub fn new(item: Item) -> Self {
        Self {
            id: item.id,
            item: Some(item),
            index: None,
        }
    }

    /// Add at a specific z-index.
    pub fn at(index: usize, item: Item) -> Self {
        Self {
            id: item.id,
            item: Some(item),
            index: Some(index),
        }
    }

    pub fn id(&self) -> ItemId {
        self.id
    }
}

impl Command for AddItem {
    fn name(&self) -> &str {
        "Add Item"
    }

    fn execute(&mut self, document: &mut Document) -> EditorResult<()> {
        let item = self.item.take().ok_or_else(|| {
            EditorError::InvalidCommandState(format!("item {} is already in the document", self.id))
        })?;
        match self.index {
            Some(index) => document.insert_item(index, item),
            None => document.add_item(item),
        };
        Ok(())
    }

    fn undo(&mut self, document: &mut Document) -> EditorResult<()> {
        let (index, item) = document.remove_item(self.id).ok_or_else(|| missing(self.id))?;
        self.index = Some(index);
        self.item = Some(item);
        Ok(())
    }

    fn selection_after_redo(&self) -> Vec<ItemId> {
        vec![self.id]
    }
}

/// Remove a deletable item from the document.
#[derive(Debug)]
pub struct DeleteItem {
    id: ItemId,
    removed: Option<(usize, Item)>,
}

impl DeleteItem {
    pub fn new(id: ItemId) -> Self {
        Self { id, removed: None }
    }
}

impl Command for DeleteItem {
    fn name(&self) -> &str {
        "Delete"
    }

    fn execute(&mut self, document: &mut Document) -> EditorResult<()> {
        let item = document.get(self.id).ok_or_else(|| missing(self.id))?;
        if !item.is_deletable() {
            return Err(EditorError::NotDeletable(self.id));
        }
        self.removed = document.remove_item(self.id);
        Ok(())
    }

    fn undo(&mut self, document: &mut Document) -> EditorResult<()> {
        let (index, item) = self.removed.take().ok_or_else(|| {
            EditorError::InvalidCommandState(format!("item {} was not deleted", self.id))
        })?;
        document.insert_item(index, item);
        Ok(())
    }

    fn selection_after_undo(&self) -> Vec<ItemId> {
        vec![self.id]
    }
}

/// Translate a set of items.
#[derive(Debug)]
pub struct MoveItems {
    ids: Vec<ItemId>,
    delta: Vec2,
}

impl MoveItems {
    pub fn new(ids: Vec<ItemId>, delta: Vec2) -> Self {
        Self { ids, delta }
    }

    pub fn delta(&self) -> Vec2 {
        self.delta
    }

    fn apply(&self, document: &mut Document, delta: Vec2) -> EditorResult<()> {
        if let Some(&id) = self.ids.iter().find(|&&id| !document.contains(id)) {
            return Err(missing(id));
        }
        for &id in &self.ids {
            if let Some(item) = document.get_mut(id) {
                item.translate(delta);
            }
        }
        Ok(())
    }
}

impl Command for MoveItems {
    fn name(&self) -> &str {
        "Move"
    }

    fn execute(&mut self, document: &mut Document) -> EditorResult<()> {
        self.apply(document, self.delta)
    }

    fn undo(&mut self, document: &mut Document) -> EditorResult<()> {
        self.apply(document, -self.delta)
    }

    fn selection_after_undo(&self) -> Vec<ItemId> {
        self.ids.clone()
    }

    fn selection_after_redo(&self) -> Vec<ItemId> {
        self.ids.clone()
    }
}

/// Resize an item to new bounds.
#[derive(Debug)]
pub struct SetBounds {
    id: ItemId,
    bounds: Rect,
    previous: Option<Item>,
}

impl SetBounds {
    pub fn new(id: ItemId, bounds: Rect) -> Self {
        Self {
            id,
            bounds,
            previous: None,
        }
    }
}

impl Command for SetBounds {
    fn name(&self) -> &str {
        "Resize"
    }

    fn execute(&mut self, document: &mut Document) -> EditorResult<()> {
        let item = document.get_mut(self.id).ok_or_else(|| missing(self.id))?;
        self.previous = Some(item.clone());
        item.set_bounds(self.bounds);
        Ok(())
    }

    fn undo(&mut self, document: &mut Document) -> EditorResult<()> {
        let previous = self.previous.take().ok_or_else(|| {
            EditorError::InvalidCommandState(format!("item {} was not resized", self.id))
        })?;
        let item = document.get_mut(self.id).ok_or_else(|| missing(self.id))?;
        *item = previous;
        Ok(())
    }

    fn selection_after_undo(&self) -> Vec<ItemId> {
        vec![self.id]
    }

    fn selection_after_redo(&self) -> Vec<ItemId> {
        vec![self.id]
    }
}

/// Replace the vertices of a line or bezier item.
#[derive(Debug)]
pub struct SetPoints {
    id: ItemId,
    points: Vec<Point>,
    previous: Option<Vec<Point>>,
}

impl SetPoints {
    pub fn new(id: ItemId, points: Vec<Point>) -> Self {
        Self {
            id,
            points,
            previous: None,
        }
    }

    fn swap(&mut self, document: &mut Document, points: Vec<Point>) -> EditorResult<Vec<Point>> {
        let item = document.get_mut(self.id).ok_or_else(|| missing(self.id))?;
        let target = item.points_mut().ok_or_else(|| {
            EditorError::InvalidCommandState(format!("item {} has no editable points", self.id))
        })?;
        Ok(std::mem::replace(target, points))
    }
}

impl Command for SetPoints {
    fn name(&self) -> &str {
        "Edit Points"
    }

    fn execute(&mut self, document: &mut Document) -> EditorResult<()> {
        let previous = self.swap(document, self.points.clone())?;
        self.previous = Some(previous);
        Ok(())
    }

    fn undo(&mut self, document: &mut Document) -> EditorResult<()> {
        let previous = self.previous.take().ok_or_else(|| {
            EditorError::InvalidCommandState(format!("points of {} were not edited", self.id))
        })?;
        self.swap(document, previous)?;
        Ok(())
    }

    fn selection_after_undo(&self) -> Vec<ItemId> {
        vec![self.id]
    }

    fn selection_after_redo(&self) -> Vec<ItemId> {
        vec![self.id]
    }
}

/// Merge attributes into an item. A `null` value removes the attribute.
#[derive(Debug)]
pub struct SetAttributes {
    id: ItemId,
    attributes: Attributes,
    previous: Option<Attributes>,
}

impl SetAttributes {
    pub fn new(id: ItemId, attributes: Attributes) -> Self {
        Self {
            id,
            attributes,
            previous: None,
        }
    }
}

impl Command for SetAttributes {
    fn name(&self) -> &str {
        "Change Attributes"
    }

    fn execute(&mut self, document: &mut Document) -> EditorResult<()> {
        let item = document.get_mut(self.id).ok_or_else(|| missing(self.id))?;
        self.previous = Some(item.attributes.clone());
        for (key, value) in &self.attributes {
            if value.is_null() {
                item.attributes.remove(key);
            } else {
                item.attributes.insert(key.clone(), value.clone());
            }
        }
        Ok(())
    }

    fn undo(&mut self, document: &mut Document) -> EditorResult<()> {
        let previous = self.previous.take().ok_or_else(|| {
            EditorError::InvalidCommandState(format!("attributes of {} were not changed", self.id))
        })?;
        let item = document.get_mut(self.id).ok_or_else(|| missing(self.id))?;
        item.attributes = previous;
        Ok(())
    }

    fn selection_after_undo(&self) -> Vec<ItemId> {
        vec![self.id]
    }

    fn selection_after_redo(&self) -> Vec<ItemId> {
        vec![self.id]
    }
}

/// Combine items into a single group placed at the frontmost member's depth.
#[derive(Debug)]
pub struct GroupItems {
    ids: Vec<ItemId>,
    group_id: ItemId,
    /// Members with their original z-indices, ascending.
    removed: Vec<(usize, Item)>,
}

impl GroupItems {
    pub fn new(ids: Vec<ItemId>) -> Self {
        Self {
            ids,
            group_id: uuid::Uuid::new_v4(),
            removed: Vec::new(),
        }
    }

    pub fn group_id(&self) -> ItemId {
        self.group_id
    }
}

impl Command for GroupItems {
    fn name(&self) -> &str {
        "Group"
    }

    fn execute(&mut self, document: &mut Document) -> EditorResult<()> {
        let mut indexed = Vec::with_capacity(self.ids.len());
        for &id in &self.ids {
            let index = document.index_of(id).ok_or_else(|| missing(id))?;
            indexed.push((index, id));
        }
        if indexed.len() < 2 {
            return Err(EditorError::InvalidCommandState(
                "grouping needs at least two items".to_string(),
            ));
        }
        indexed.sort_by_key(|&(index, _)| index);

        // Remove back to front so pending indices stay valid.
        let mut removed = Vec::with_capacity(indexed.len());
        for &(_, id) in indexed.iter().rev() {
            if let Some(entry) = document.remove_item(id) {
                removed.push(entry);
            }
        }
        removed.reverse();

        let insert_at = removed.last().map_or(0, |(index, _)| *index + 1 - removed.len());
        let mut group = Item::new(ItemKind::Group {
            children: removed.iter().map(|(_, item)| item.clone()).collect(),
        });
        group.id = self.group_id;
        document.insert_item(insert_at, group);
        self.removed = removed;
        Ok(())
    }

    fn undo(&mut self, document: &mut Document) -> EditorResult<()> {
        document
            .remove_item(self.group_id)
            .ok_or_else(|| missing(self.group_id))?;
        for (index, item) in self.removed.drain(..) {
            document.insert_item(index, item);
        }
        Ok(())
    }

    fn selection_after_undo(&self) -> Vec<ItemId> {
        self.ids.clone()
    }

    fn selection_after_redo(&self) -> Vec<ItemId> {
        vec![self.group_id]
    }
}

/// Dissolve a group, putting its children back at the group's depth.
#[derive(Debug)]
pub struct UngroupItem {
    group_id: ItemId,
    removed: Option<(usize, Item)>,
    child_ids: Vec<ItemId>,
}

impl UngroupItem {
    pub fn new(group_id: ItemId) -> Self {
        Self {
            group_id,
            removed: None,
            child_ids: Vec::new(),
        }
    }

    pub fn child_ids(&self) -> &[ItemId] {
        &self.child_ids
    }
}

impl Command for UngroupItem {
    fn name(&self) -> &str {
        "Ungroup"
    }

    fn execute(&mut self, document: &mut Document) -> EditorResult<()> {
        let group = document.get(self.group_id).ok_or_else(|| missing(self.group_id))?;
        let ItemKind::Group { children } = &group.kind else {
            return Err(EditorError::InvalidCommandState(format!(
                "item {} is not a group",
                self.group_id
            )));
        };
        let children = children.clone();
        let (index, group) = document
            .remove_item(self.group_id)
            .ok_or_else(|| missing(self.group_id))?;

        self.child_ids = children.iter().map(|child| child.id).collect();
        for (offset, child) in children.into_iter().enumerate() {
            document.insert_item(index + offset, child);
        }
        self.removed = Some((index, group));
        Ok(())
    }

    fn undo(&mut self, document: &mut Document) -> EditorResult<()> {
        let (index, group) = self.removed.take().ok_or_else(|| {
            EditorError::InvalidCommandState(format!("group {} was not dissolved", self.group_id))
        })?;
        for &id in &self.child_ids {
            document.remove_item(id);
        }
        document.insert_item(index, group);
        Ok(())
    }

    fn selection_after_undo(&self) -> Vec<ItemId> {
        vec![self.group_id]
    }

    fn selection_after_redo(&self) -> Vec<ItemId> {
        self.child_ids.clone()
    }
}

/// Insert a batch of clipboard items.
#[derive(Debug)]
pub struct PasteItems {
    ids: Vec<ItemId>,
    /// Held while the items are not in the document.
    pending: Vec<Item>,
}

impl PasteItems {
    pub fn new(items: Vec<Item>) -> Self {
        Self {
            ids: items.iter().map(|item| item.id).collect(),
            pending: items,
        }
    }

    pub fn ids(&self) -> &[ItemId] {
        &self.ids
    }
}

impl Command for PasteItems {
    fn name(&self) -> &str {
        "Paste"
    }

    fn execute(&mut self, document: &mut Document) -> EditorResult<()> {
        if self.pending.is_empty() && !self.ids.is_empty() {
            return Err(EditorError::InvalidCommandState(
                "paste was already applied".to_string(),
            ));
        }
        for item in self.pending.drain(..) {
            document.add_item(item);
        }
        Ok(())
    }

    fn undo(&mut self, document: &mut Document) -> EditorResult<()> {
        for &id in self.ids.iter().rev() {
            let (_, item) = document.remove_item(id).ok_or_else(|| missing(id))?;
            self.pending.push(item);
        }
        self.pending.reverse();
        Ok(())
    }

    fn selection_after_redo(&self) -> Vec<ItemId> {
        self.ids.clone()
    }
}
