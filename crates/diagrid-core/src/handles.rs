//! Manipulation handles shown while an item is being edited.

use crate::document::{Item, ItemKind};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Handle hit tolerance in device pixels.
pub const HANDLE_HIT_TOLERANCE: f64 = 8.0;

/// Smallest width or height a corner resize may produce.
const MIN_SIZE: f64 = 1.0;

/// Corner positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// Type of manipulation handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandleKind {
    /// Bounding-box corner, resizes the item.
    Corner(Corner),
    /// Polyline vertex or bezier anchor (index into the item's points).
    Vertex(usize),
    /// Bezier control point (index into the item's points).
    Control(usize),
}

/// A handle with its position in logical coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Handle {
    pub position: Point,
    pub kind: HandleKind,
}

impl Handle {
    pub fn new(position: Point, kind: HandleKind) -> Self {
        Self { position, kind }
    }

    /// Check if a point hits this handle. `tolerance` is in logical units.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        (point - self.position).hypot2() <= tolerance * tolerance
    }
}

/// Handles for an item.
pub fn handles_for(item: &Item) -> Vec<Handle> {
    match &item.kind {
        ItemKind::Shape { .. } | ItemKind::Group { .. } => corner_handles(item.bounds()),
        ItemKind::Line { points } => points
            .iter()
            .enumerate()
            .map(|(i, &p)| Handle::new(p, HandleKind::Vertex(i)))
            .collect(),
        ItemKind::Bezier { points } => points
            .iter()
            .enumerate()
            .map(|(i, &p)| {
                if i % 3 == 0 {
                    Handle::new(p, HandleKind::Vertex(i))
                } else {
                    Handle::new(p, HandleKind::Control(i))
                }
            })
            .collect(),
    }
}

fn corner_handles(bounds: Rect) -> Vec<Handle> {
    vec![
        Handle::new(Point::new(bounds.x0, bounds.y0), HandleKind::Corner(Corner::TopLeft)),
        Handle::new(Point::new(bounds.x1, bounds.y0), HandleKind::Corner(Corner::TopRight)),
        Handle::new(Point::new(bounds.x0, bounds.y1), HandleKind::Corner(Corner::BottomLeft)),
        Handle::new(Point::new(bounds.x1, bounds.y1), HandleKind::Corner(Corner::BottomRight)),
    ]
}

/// Find which handle (if any) is hit at the given point.
pub fn hit_test_handles(item: &Item, point: Point, tolerance: f64) -> Option<HandleKind> {
    handles_for(item)
        .into_iter()
        .find(|handle| handle.hit_test(point, tolerance))
        .map(|handle| handle.kind)
}

/// Return a copy of `original` with `handle` dragged by `delta`.
pub fn apply_handle_drag(original: &Item, handle: HandleKind, delta: Vec2) -> Item {
    let mut item = original.clone();
    match handle {
        HandleKind::Corner(corner) => {
            item.set_bounds(resize_from_corner(original.bounds(), corner, delta));
        }
        HandleKind::Vertex(index) => {
            let is_bezier = matches!(item.kind, ItemKind::Bezier { .. });
            if let Some(points) = item.points_mut() {
                if index < points.len() {
                    points[index] += delta;
                    // Bezier anchors carry their adjacent control points along.
                    if is_bezier {
                        if index > 0 {
                            points[index - 1] += delta;
                        }
                        if index + 1 < points.len() {
                            points[index + 1] += delta;
                        }
                    }
                }
            }
        }
        HandleKind::Control(index) => {
            if let Some(point) = item.points_mut().and_then(|points| points.get_mut(index)) {
                *point += delta;
            }
        }
    }
    item
}

/// New bounds after dragging one corner, normalized and at least `MIN_SIZE` wide and high.
pub fn resize_from_corner(bounds: Rect, corner: Corner, delta: Vec2) -> Rect {
    let (x0, y0, x1, y1) = match corner {
        Corner::TopLeft => (bounds.x0 + delta.x, bounds.y0 + delta.y, bounds.x1, bounds.y1),
        Corner::TopRight => (bounds.x0, bounds.y0 + delta.y, bounds.x1 + delta.x, bounds.y1),
        Corner::BottomLeft => (bounds.x0 + delta.x, bounds.y0, bounds.x1, bounds.y1 + delta.y),
        Corner::BottomRight => (bounds.x0, bounds.y0, bounds.x1 + delta.x, bounds.y1 + delta.y),
    };
    let rect = Rect::new(x0, y0, x1, y1).abs();
    Rect::from_origin_size(
        rect.origin(),
        (rect.width().max(MIN_SIZE), rect.height().max(MIN_SIZE)),
    )
}
