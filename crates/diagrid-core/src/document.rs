//! In-memory scene model mutated by commands.
//!
//! The editing core only relies on a narrow contract from the scene: ids,
//! z-order, bounding boxes, deletability and attribute maps. `Document` is
//! the reference implementation of that contract.

use kurbo::{Affine, Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use uuid::Uuid;

/// Unique identifier for an item.
pub type ItemId = Uuid;

/// Attribute map attached to every item (stroke, fill, font, ...).
pub type Attributes = BTreeMap<String, serde_json::Value>;

/// Geometry of an item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ItemKind {
    /// A box-shaped figure described by its bounds.
    Shape { rect: Rect },
    /// A polyline.
    Line { points: Vec<Point> },
    /// A cubic bezier path stored as `anchor, ctrl, ctrl, anchor, ctrl, ctrl, anchor...`.
    Bezier { points: Vec<Point> },
    /// A group of items moved and deleted as one.
    Group { children: Vec<Item> },
}

/// A single item in the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub kind: ItemKind,
    /// Whether the user may delete this item.
    pub deletable: bool,
    pub attributes: Attributes,
}

impl Item {
    /// Create a new item with a fresh id.
    pub fn new(kind: ItemKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            deletable: true,
            attributes: Attributes::new(),
        }
    }

    /// Create a box-shaped item.
    pub fn shape(rect: Rect) -> Self {
        Self::new(ItemKind::Shape { rect })
    }

    /// Create a polyline item.
    pub fn line(points: Vec<Point>) -> Self {
        Self::new(ItemKind::Line { points })
    }

    /// Create a bezier item.
    pub fn bezier(points: Vec<Point>) -> Self {
        Self::new(ItemKind::Bezier { points })
    }

    /// Mark the item as protected from deletion.
    pub fn locked(mut self) -> Self {
        self.deletable = false;
        self
    }

    pub fn is_deletable(&self) -> bool {
        self.deletable
    }

    /// Bounding box in logical coordinates.
    pub fn bounds(&self) -> Rect {
        match &self.kind {
            ItemKind::Shape { rect } => *rect,
            ItemKind::Line { points } | ItemKind::Bezier { points } => points_bounds(points),
            ItemKind::Group { children } => children
                .iter()
                .map(Item::bounds)
                .reduce(|a, b| a.union(b))
                .unwrap_or(Rect::ZERO),
        }
    }

    /// Hit test against the (inflated) bounding box.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        self.bounds().inflate(tolerance, tolerance).contains(point)
    }

    /// Apply an affine transform to the item's geometry.
    pub fn transform(&mut self, affine: Affine) {
        match &mut self.kind {
            ItemKind::Shape { rect } => *rect = affine.transform_rect_bbox(*rect),
            ItemKind::Line { points } | ItemKind::Bezier { points } => {
                for p in points.iter_mut() {
                    *p = affine * *p;
                }
            }
            ItemKind::Group { children } => {
                for child in children.iter_mut() {
                    child.transform(affine);
                }
            }
        }
    }

    /// Translate the item.
    pub fn translate(&mut self, delta: Vec2) {
        self.transform(Affine::translate(delta));
    }

    /// Scale the item so its bounds become `target`.
    pub fn set_bounds(&mut self, target: Rect) {
        if let ItemKind::Shape { rect } = &mut self.kind {
            *rect = target;
            return;
        }
        let current = self.bounds();
        let sx = if current.width().abs() > f64::EPSILON {
            target.width() / current.width()
        } else {
            1.0
        };
        let sy = if current.height().abs() > f64::EPSILON {
            target.height() / current.height()
        } else {
            1.0
        };
        let affine = Affine::translate(target.origin().to_vec2())
            * Affine::scale_non_uniform(sx, sy)
            * Affine::translate(-current.origin().to_vec2());
        self.transform(affine);
    }

    /// Editable points of a line or bezier item.
    pub fn points(&self) -> Option<&[Point]> {
        match &self.kind {
            ItemKind::Line { points } | ItemKind::Bezier { points } => Some(points),
            _ => None,
        }
    }

    /// Mutable editable points of a line or bezier item.
    pub fn points_mut(&mut self) -> Option<&mut Vec<Point>> {
        match &mut self.kind {
            ItemKind::Line { points } | ItemKind::Bezier { points } => Some(points),
            _ => None,
        }
    }

    /// Copy of this item (and its children) with fresh ids.
    pub fn duplicate(&self) -> Self {
        let mut copy = self.clone();
        copy.id = Uuid::new_v4();
        if let ItemKind::Group { children } = &mut copy.kind {
            for child in children.iter_mut() {
                *child = child.duplicate();
            }
        }
        copy
    }
}

fn points_bounds(points: &[Point]) -> Rect {
    let mut iter = points.iter();
    let Some(first) = iter.next() else {
        return Rect::ZERO;
    };
    iter.fold(Rect::from_points(*first, *first), |r, p| r.union_pt(*p))
}

/// A document containing all items, back to front.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Unique document identifier.
    pub id: String,
    /// Document name.
    pub name: String,
    /// All items, keyed by ID.
    items: HashMap<ItemId, Item>,
    /// Z-order of items (back to front).
    z_order: Vec<ItemId>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: "Untitled".to_string(),
            items: HashMap::new(),
            z_order: Vec::new(),
        }
    }

    /// Add an item on top of the z-order.
    pub fn add_item(&mut self, item: Item) -> ItemId {
        let id = item.id;
        self.z_order.push(id);
        self.items.insert(id, item);
        id
    }

    /// Insert an item at a z-order index (clamped to the end).
    pub fn insert_item(&mut self, index: usize, item: Item) -> ItemId {
        let id = item.id;
        let index = index.min(self.z_order.len());
        self.z_order.insert(index, id);
        self.items.insert(id, item);
        id
    }

    /// Remove an item, returning its former z-index and the item.
    pub fn remove_item(&mut self, id: ItemId) -> Option<(usize, Item)> {
        let index = self.index_of(id)?;
        self.z_order.remove(index);
        self.items.remove(&id).map(|item| (index, item))
    }

    /// Z-index of an item.
    pub fn index_of(&self, id: ItemId) -> Option<usize> {
        self.z_order.iter().position(|&item_id| item_id == id)
    }

    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.get(&id)
    }

    pub fn get_mut(&mut self, id: ItemId) -> Option<&mut Item> {
        self.items.get_mut(&id)
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.items.contains_key(&id)
    }

    /// Items in z-order (back to front).
    pub fn items_ordered(&self) -> impl Iterator<Item = &Item> {
        self.z_order.iter().filter_map(|id| self.items.get(id))
    }

    /// Item ids in z-order (back to front).
    pub fn z_order(&self) -> &[ItemId] {
        &self.z_order
    }

    /// Topmost item under a point.
    pub fn item_at(&self, point: Point, tolerance: f64) -> Option<ItemId> {
        self.items_at_point(point, tolerance).into_iter().next()
    }

    /// Items at a point, front to back.
    pub fn items_at_point(&self, point: Point, tolerance: f64) -> Vec<ItemId> {
        self.z_order
            .iter()
            .rev()
            .filter_map(|&id| {
                self.items
                    .get(&id)
                    .filter(|item| item.hit_test(point, tolerance))
                    .map(|_| id)
            })
            .collect()
    }

    /// Items whose bounds touch a rectangle, back to front.
    ///
    /// Bounds with zero width or height (axis-aligned lines) still count.
    pub fn items_in_rect(&self, rect: Rect) -> Vec<ItemId> {
        let rect = rect.abs();
        self.z_order
            .iter()
            .filter_map(|&id| {
                self.items
                    .get(&id)
                    .filter(|item| overlaps(rect, item.bounds()))
                    .map(|_| id)
            })
            .collect()
    }

    /// Bounding box of all items.
    pub fn bounds(&self) -> Option<Rect> {
        self.items.values().map(Item::bounds).reduce(|a, b| a.union(b))
    }

    /// Union of the bounds of the given items.
    pub fn bounds_of(&self, ids: &[ItemId]) -> Option<Rect> {
        ids.iter()
            .filter_map(|id| self.items.get(id))
            .map(Item::bounds)
            .reduce(|a, b| a.union(b))
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}

fn overlaps(a: Rect, b: Rect) -> bool {
    a.x0 <= b.x1 && b.x0 <= a.x1 && a.y0 <= b.y1 && b.y0 <= a.y1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_remove_keeps_index() {
        let mut doc = Document::new();
        let a = doc.add_item(Item::shape(Rect::new(0.0, 0.0, 10.0, 10.0)));
        let b = doc.add_item(Item::shape(Rect::new(20.0, 0.0, 30.0, 10.0)));

        let (index, item) = doc.remove_item(a).unwrap();
        assert_eq!(index, 0);
        assert_eq!(doc.z_order(), &[b]);

        doc.insert_item(index, item);
        assert_eq!(doc.z_order(), &[a, b]);
    }

    #[test]
    fn test_items_at_point_front_to_back() {
        let mut doc = Document::new();
        let back = doc.add_item(Item::shape(Rect::new(0.0, 0.0, 100.0, 100.0)));
        let front = doc.add_item(Item::shape(Rect::new(50.0, 50.0, 150.0, 150.0)));

        assert_eq!(doc.items_at_point(Point::new(75.0, 75.0), 0.0), vec![front, back]);
        assert_eq!(doc.item_at(Point::new(10.0, 10.0), 0.0), Some(back));
        assert_eq!(doc.item_at(Point::new(500.0, 500.0), 0.0), None);
    }

    #[test]
    fn test_items_in_rect() {
        let mut doc = Document::new();
        let a = doc.add_item(Item::shape(Rect::new(0.0, 0.0, 10.0, 10.0)));
        doc.add_item(Item::shape(Rect::new(100.0, 100.0, 110.0, 110.0)));
        assert_eq!(doc.items_in_rect(Rect::new(-5.0, -5.0, 5.0, 5.0)), vec![a]);
    }

    #[test]
    fn test_items_in_rect_includes_flat_lines() {
        let mut doc = Document::new();
        let horizontal = doc.add_item(Item::line(vec![Point::new(0.0, 50.0), Point::new(40.0, 50.0)]));
        let vertical = doc.add_item(Item::line(vec![Point::new(80.0, 0.0), Point::new(80.0, 40.0)]));
        assert_eq!(
            doc.items_in_rect(Rect::new(-10.0, -10.0, 100.0, 100.0)),
            vec![horizontal, vertical]
        );
        assert_eq!(doc.items_in_rect(Rect::new(-10.0, 60.0, 100.0, 100.0)), Vec::<ItemId>::new());
    }

    #[test]
    fn test_line_bounds_and_translate() {
        let mut item = Item::line(vec![Point::new(0.0, 0.0), Point::new(10.0, 20.0)]);
        assert_eq!(item.bounds(), Rect::new(0.0, 0.0, 10.0, 20.0));
        item.translate(Vec2::new(5.0, 5.0));
        assert_eq!(item.bounds(), Rect::new(5.0, 5.0, 15.0, 25.0));
    }

    #[test]
    fn test_set_bounds_scales_points() {
        let mut item = Item::line(vec![Point::new(0.0, 0.0), Point::new(10.0, 10.0)]);
        item.set_bounds(Rect::new(100.0, 100.0, 120.0, 140.0));
        let points = item.points().unwrap();
        assert!((points[1].x - 120.0).abs() < 1e-9);
        assert!((points[1].y - 140.0).abs() < 1e-9);
    }

    #[test]
    fn test_group_bounds() {
        let group = Item::new(ItemKind::Group {
            children: vec![
                Item::shape(Rect::new(0.0, 0.0, 10.0, 10.0)),
                Item::shape(Rect::new(20.0, 20.0, 30.0, 30.0)),
            ],
        });
        assert_eq!(group.bounds(), Rect::new(0.0, 0.0, 30.0, 30.0));
    }

    #[test]
    fn test_duplicate_gets_new_ids() {
        let group = Item::new(ItemKind::Group {
            children: vec![Item::shape(Rect::new(0.0, 0.0, 10.0, 10.0))],
        });
        let copy = group.duplicate();
        assert_ne!(copy.id, group.id);
        let (ItemKind::Group { children: a }, ItemKind::Group { children: b }) = (&group.kind, &copy.kind) else {
            panic!("expected groups");
        };
        assert_ne!(a[0].id, b[0].id);
        assert_eq!(a[0].bounds(), b[0].bounds());
    }
}
