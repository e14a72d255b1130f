use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::core::ItemKind;

/// A point in host coordinates (pixels, terminal cells, ...).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A position normalized to percentages of the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// Bounding box of the village canvas in host coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Canvas {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Canvas {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }

    /// Canvas whose host coordinates are already percentages.
    pub fn percent() -> Self {
        Self::new(0.0, 0.0, 100.0, 100.0)
    }

    pub fn normalize(&self, point: Point) -> Position {
        let width = if self.width > 0.0 { self.width } else { 1.0 };
        let height = if self.height > 0.0 { self.height } else { 1.0 };
        Position {
            x: (point.x - self.left) / width * 100.0,
            y: (point.y - self.top) / height * 100.0,
        }
    }

    pub fn to_host(&self, position: Position) -> Point {
        Point {
            x: self.left + position.x / 100.0 * self.width,
            y: self.top + position.y / 100.0 * self.height,
        }
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::percent()
    }
}

/// Perspective scale: items lower on the canvas look closer.
pub fn depth_scale(y: f64) -> f64 {
    1.0 + (y / 100.0) * 1.5
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedItem {
    pub id: Uuid,
    pub kind: ItemKind,
    pub x: f64,
    pub y: f64,
    pub scale: f64,
}

impl PlacedItem {
    pub fn new(kind: ItemKind, position: Position) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            x: position.x,
            y: position.y,
            scale: depth_scale(position.y),
        }
    }

    pub fn position(&self) -> Position {
        Position { x: self.x, y: self.y }
    }

    fn move_to(&mut self, position: Position) {
        self.x = position.x;
        self.y = position.y;
        self.scale = depth_scale(position.y);
    }
}

/// Placed items kept in painter's order: ascending `y`, so items lower on
/// screen draw last.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Village {
    items: Vec<PlacedItem>,
}

impl Village {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[PlacedItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: Uuid) -> Option<&PlacedItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.get(id).is_some()
    }

    pub fn insert(&mut self, item: PlacedItem) -> Uuid {
        let id = item.id;
        self.items.push(item);
        self.sort();
        id
    }

    pub fn reposition(&mut self, id: Uuid, position: Position) -> bool {
        let Some(item) = self.items.iter_mut().find(|item| item.id == id) else {
            return false;
        };
        item.move_to(position);
        self.sort();
        true
    }

    pub fn remove(&mut self, id: Uuid) -> Option<PlacedItem> {
        let index = self.items.iter().position(|item| item.id == id)?;
        Some(self.items.remove(index))
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn is_sorted(&self) -> bool {
        self.items.windows(2).all(|pair| pair[0].y <= pair[1].y)
    }

    fn sort(&mut self) {
        // stable: equal depths keep insertion order
        self.items.sort_by(|a, b| a.y.total_cmp(&b.y));
    }
}
