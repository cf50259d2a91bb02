//! Read-only traversal of a workflow tree.
//!
//! Every query walks the tree depth-first in pre-order: a node before its
//! children, children left to right, and for a branch node slot 0, then slot 1,
//! then slot 2. Traversal uses an explicit stack so arbitrarily deep trees are
//! safe to query.

use crate::model::{ChildPosition, NodeId, Slot, WorkflowNode};
use serde::Serialize;

/// One step of a pre-order walk.
#[derive(Debug, Clone, Copy)]
pub struct Visit<'a> {
    pub node: &'a WorkflowNode,
    /// The immediate structural parent; `None` for the root.
    pub parent: Option<&'a WorkflowNode>,
    /// Where the node sits inside its parent; `None` for the root.
    pub position: Option<ChildPosition>,
    /// Distance from the root.
    pub depth: usize,
}

/// Pre-order iterator over a subtree.
pub struct Preorder<'a> {
    stack: Vec<Visit<'a>>,
}

impl<'a> Iterator for Preorder<'a> {
    type Item = Visit<'a>;

    fn next(&mut self) -> Option<Visit<'a>> {
        let visit = self.stack.pop()?;
        let node = visit.node;
        // Reversed so the leftmost child is popped first.
        for (position, child) in node.children().positioned().into_iter().rev() {
            self.stack.push(Visit {
                node: child.as_ref(),
                parent: Some(node),
                position: Some(position),
                depth: visit.depth + 1,
            });
        }
        Some(visit)
    }
}

pub fn iter_preorder(root: &WorkflowNode) -> Preorder<'_> {
    Preorder {
        stack: vec![Visit {
            node: root,
            parent: None,
            position: None,
            depth: 0,
        }],
    }
}

/// Finds the first node with `id`, or `None` when absent.
pub fn find_node_by_id<'a>(root: &'a WorkflowNode, id: &str) -> Option<&'a WorkflowNode> {
    iter_preorder(root)
        .find(|visit| visit.node.id() == id)
        .map(|visit| visit.node)
}

/// Finds the node whose child sequence or branch slot directly holds `id`.
/// `None` when `id` is the root or absent.
pub fn find_parent_node<'a>(root: &'a WorkflowNode, id: &str) -> Option<&'a WorkflowNode> {
    iter_preorder(root)
        .find(|visit| visit.node.id() == id)
        .and_then(|visit| visit.parent)
}

pub fn count_nodes(root: &WorkflowNode) -> usize {
    iter_preorder(root).count()
}

/// The parent of a node together with the node's position inside it.
#[derive(Debug, Clone, Copy)]
pub struct Location<'a> {
    pub parent: &'a WorkflowNode,
    pub position: ChildPosition,
}

/// Locates a non-root node. `None` when `id` is the root or absent.
pub fn find_location<'a>(root: &'a WorkflowNode, id: &str) -> Option<Location<'a>> {
    let visit = iter_preorder(root).find(|visit| visit.node.id() == id)?;
    Some(Location {
        parent: visit.parent?,
        position: visit.position?,
    })
}

/// The chain of child positions leading from the root to `id`. The root
/// itself has an empty path.
pub fn find_path(root: &WorkflowNode, id: &str) -> Option<Vec<ChildPosition>> {
    let mut path: Vec<ChildPosition> = Vec::new();
    for visit in iter_preorder(root) {
        // Pre-order guarantees the first `depth - 1` entries still describe
        // this node's ancestors.
        path.truncate(visit.depth.saturating_sub(1));
        if let Some(position) = visit.position {
            path.push(position);
        }
        if visit.node.id() == id {
            return Some(path);
        }
    }
    None
}

/// A parent to child link, tagged with the exit slot when the parent is a
/// branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Edge {
    pub source: NodeId,
    pub target: NodeId,
    pub slot: Option<Slot>,
}

/// Every parent to child link, in traversal order of the children.
pub fn edges(root: &WorkflowNode) -> Vec<Edge> {
    iter_preorder(root)
        .filter_map(|visit| {
            let parent = visit.parent?;
            Some(Edge {
                source: parent.id().to_string(),
                target: visit.node.id().to_string(),
                slot: visit.position.and_then(|position| position.slot),
            })
        })
        .collect()
}
