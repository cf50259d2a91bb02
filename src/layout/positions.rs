use super::config::SizeLimits;
use crate::model::NodeId;
use ahash::AHashMap;
use itertools::Itertools;
use serde::{Deserialize, Serialize, Serializer};

/// Screen-space box of one node; `x`/`y` is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Reported for nodes that have no entry yet.
pub const DEFAULT_POSITION: Position = Position {
    x: 0.0,
    y: 0.0,
    width: 280.0,
    height: 120.0,
};

impl Default for Position {
    fn default() -> Self {
        DEFAULT_POSITION
    }
}

/// Node id to position, as produced by a layout pass.
pub type PositionMap = AHashMap<NodeId, Position>;

/// The position side-table: filled wholesale by layout, then edited one entry
/// at a time by drag and resize events. The latest event for an id wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PositionTable {
    entries: PositionMap,
    limits: SizeLimits,
}

impl PositionTable {
    pub fn new(limits: SizeLimits) -> Self {
        Self {
            entries: PositionMap::default(),
            limits,
        }
    }

    /// The stored position, or [`DEFAULT_POSITION`].
    pub fn get(&self, id: &str) -> Position {
        self.entries.get(id).copied().unwrap_or_default()
    }

    pub fn entry(&self, id: &str) -> Option<&Position> {
        self.entries.get(id)
    }

    /// Moves a node; its size is kept.
    pub fn update_position(&mut self, id: &str, x: f64, y: f64) -> Position {
        let updated = Position {
            x,
            y,
            ..self.get(id)
        };
        self.entries.insert(id.to_string(), updated);
        updated
    }

    /// Resizes a node within the size limits; its corner is kept.
    pub fn update_size(&mut self, id: &str, width: f64, height: f64) -> Position {
        let (width, height) = self.limits.clamp(width, height);
        let updated = Position {
            width,
            height,
            ..self.get(id)
        };
        self.entries.insert(id.to_string(), updated);
        updated
    }

    /// Discards every entry in favor of a fresh layout.
    pub fn replace_all(&mut self, entries: PositionMap) {
        self.entries = entries;
    }

    pub fn limits(&self) -> SizeLimits {
        self.limits
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries ordered by node id.
    pub fn iter(&self) -> impl Iterator<Item = (&NodeId, &Position)> {
        self.entries.iter().sorted_by(|a, b| a.0.cmp(b.0))
    }
}

impl Serialize for PositionTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}
