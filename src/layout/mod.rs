//! Deterministic auto-layout of a workflow tree.
//!
//! The layout runs in two passes over the tree, both driven by explicit
//! stacks so that depth is bounded only by memory:
//!
//! 1.  **Measure** (bottom-up, reverse pre-order): the horizontal extent of
//!     every subtree left and right of the subtree root's center line, and how
//!     far the subtree reaches down.
//! 2.  **Place** (top-down, pre-order): the root is centered on the configured
//!     anchor, and every node's children go one row below it. A single child
//!     sits directly under its parent; several children are spread
//!     `horizontal_gap` apart and centered as a group; a branch puts its left,
//!     center and right slots at `-horizontal_gap`, `0` and `+horizontal_gap`,
//!     stacking each slot's entries vertically.
//!
//! Sibling spacing widens beyond `horizontal_gap` whenever the measured subtrees
//! need more room, so the bounding boxes of sibling subtrees never intersect.
//! The output depends on nothing but the tree shape and the configuration.

use crate::model::{Children, NodeRef, Slot, Workflow, WorkflowNode};
use crate::query;
use ahash::AHashMap;
use itertools::Itertools;

mod config;
mod positions;

pub use config::{LayoutConfig, SizeLimits};
pub use positions::{DEFAULT_POSITION, Position, PositionMap, PositionTable};

/// Computes a position for every node of `workflow`.
pub fn layout(workflow: &Workflow, config: &LayoutConfig) -> PositionMap {
    let root = workflow.root();
    let measured = measure(root, config);

    let mut positions = PositionMap::with_capacity(measured.len());
    let mut stack = vec![(root, config.origin_x, config.origin_y)];
    while let Some((node, center_x, y)) = stack.pop() {
        let (width, height) = config.box_size(node.kind());
        positions.insert(
            node.id().to_string(),
            Position {
                x: center_x - width / 2.0,
                y,
                width,
                height,
            },
        );

        let child_y = y + height + config.gap_below(node.kind());
        let first_pushed = stack.len();
        match node.children() {
            Children::Sequence(children) => {
                let spans: Vec<Span> = children
                    .iter()
                    .map(|child| measured.of(child).span)
                    .collect();
                for (child, offset) in children.iter().zip(spread(&spans, config)) {
                    stack.push((child.as_ref(), center_x + offset, child_y));
                }
            }
            Children::Slots(slots) => {
                let spans = slots.each_ref().map(|entries| measured.slot_span(entries));
                for (entries, offset) in slots.iter().zip(slot_offsets(&spans, config)) {
                    // Entries of one slot form a chain, each below the last.
                    let mut chain_y = child_y;
                    for entry in entries {
                        stack.push((entry.as_ref(), center_x + offset, chain_y));
                        chain_y += measured.of(entry).depth;
                    }
                }
            }
            Children::Terminal => {}
        }
        // Pop children in document order.
        stack[first_pushed..].reverse();
    }

    log::debug!(
        "Laid out {} node(s) reaching down to y {}",
        positions.len(),
        config.origin_y + measured.of(root).depth
    );
    positions
}

/// [`layout`] with the default configuration.
pub fn layout_with_defaults(workflow: &Workflow) -> PositionMap {
    layout(workflow, &LayoutConfig::default())
}

/// Horizontal room a subtree needs on each side of its root's center line.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Span {
    left: f64,
    right: f64,
}

impl Span {
    fn around(width: f64) -> Self {
        Span {
            left: width / 2.0,
            right: width / 2.0,
        }
    }

    /// This span seen from a center line `offset` to the left of its own.
    fn shifted(self, offset: f64) -> Self {
        Span {
            left: self.left - offset,
            right: self.right + offset,
        }
    }

    fn union(self, other: Span) -> Self {
        Span {
            left: self.left.max(other.left),
            right: self.right.max(other.right),
        }
    }
}

/// The measured footprint of one subtree.
#[derive(Debug, Clone, Copy, Default)]
struct Footprint {
    span: Span,
    /// Distance from the subtree root's top edge to the first free row below
    /// the subtree, gap included.
    depth: f64,
}

struct Measured<'a> {
    footprints: AHashMap<&'a str, Footprint>,
}

impl Measured<'_> {
    fn len(&self) -> usize {
        self.footprints.len()
    }

    fn of(&self, node: &WorkflowNode) -> Footprint {
        self.footprints.get(node.id()).copied().unwrap_or_default()
    }

    /// Entries of one slot share a center line, so the slot needs the widest
    /// of their spans. `None` for an empty slot.
    fn slot_span(&self, entries: &[NodeRef]) -> Option<Span> {
        entries
            .iter()
            .map(|entry| self.of(entry).span)
            .reduce(Span::union)
    }
}

/// Measures every subtree. Reverse pre-order visits each child before its
/// parent.
fn measure<'a>(root: &'a WorkflowNode, config: &LayoutConfig) -> Measured<'a> {
    let nodes: Vec<&'a WorkflowNode> = query::iter_preorder(root)
        .map(|visit| visit.node)
        .collect();
    let mut measured = Measured {
        footprints: AHashMap::with_capacity(nodes.len()),
    };

    for node in nodes.into_iter().rev() {
        let footprint = measure_one(node, config, &measured);
        measured.footprints.insert(node.id(), footprint);
    }
    measured
}

fn measure_one(node: &WorkflowNode, config: &LayoutConfig, measured: &Measured<'_>) -> Footprint {
    let (width, height) = config.box_size(node.kind());
    let own = Span::around(width);
    let row = height + config.gap_below(node.kind());

    match node.children() {
        Children::Sequence(children) => {
            let footprints: Vec<Footprint> =
                children.iter().map(|child| measured.of(child)).collect();
            let spans: Vec<Span> = footprints.iter().map(|f| f.span).collect();
            let span = spread(&spans, config)
                .into_iter()
                .zip(&spans)
                .fold(own, |acc, (offset, span)| acc.union(span.shifted(offset)));
            let below = footprints.iter().map(|f| f.depth).fold(0.0, f64::max);
            Footprint {
                span,
                depth: row + below,
            }
        }
        Children::Slots(slots) => {
            let spans = slots.each_ref().map(|entries| measured.slot_span(entries));
            let span = slot_offsets(&spans, config)
                .into_iter()
                .zip(spans)
                .filter_map(|(offset, span)| span.map(|span| span.shifted(offset)))
                .fold(own, Span::union);
            let below = slots
                .iter()
                .map(|entries| entries.iter().map(|entry| measured.of(entry).depth).sum::<f64>())
                .fold(0.0, f64::max);
            Footprint {
                span,
                depth: row + below,
            }
        }
        Children::Terminal => Footprint {
            span: own,
            depth: row,
        },
    }
}

/// Center offsets of sibling subtrees relative to their parent: `horizontal_gap`
/// apart unless the neighbours need more, with the group centered on zero.
fn spread(children: &[Span], config: &LayoutConfig) -> Vec<f64> {
    let mut centers = Vec::with_capacity(children.len());
    if !children.is_empty() {
        centers.push(0.0);
    }
    for (left, right) in children.iter().tuple_windows() {
        let distance = config
            .horizontal_gap
            .max(left.right + right.left + config.sibling_margin);
        let previous = centers.last().copied().unwrap_or(0.0);
        centers.push(previous + distance);
    }

    let middle = match (centers.first(), centers.last()) {
        (Some(first), Some(last)) => (first + last) / 2.0,
        _ => 0.0,
    };
    centers.into_iter().map(|center| center - middle).collect()
}

/// Center offsets of the left, center and right slots relative to the branch.
/// The center slot always sits directly below the branch.
fn slot_offsets(slots: &[Option<Span>; 3], config: &LayoutConfig) -> [f64; 3] {
    let gap = config.horizontal_gap;
    let center = slots[Slot::Center.index()].unwrap_or_default();

    let left = slots[Slot::Left.index()]
        .map(|span| gap.max(span.right + center.left + config.sibling_margin))
        .unwrap_or(gap);
    let right = slots[Slot::Right.index()]
        .map(|span| gap.max(center.right + span.left + config.sibling_margin))
        .unwrap_or(gap);

    [-left, 0.0, right]
}
