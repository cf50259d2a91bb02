use crate::error::{Result, WorkflowError};
use crate::model::{ChildPosition, WorkflowNode};
use std::sync::Arc;

/// Rebuilds the chain of nodes from `root` down along `path`, handing a copy
/// of the node at the end of the path to `edit`.
///
/// Only the nodes on the path are copied, and each copy is shallow: every
/// subtree hanging off the path is shared with `root` by reference. The
/// returned node is the new root.
pub(super) fn rewrite_at<F>(root: &WorkflowNode, path: &[ChildPosition], edit: F) -> Result<WorkflowNode>
where
    F: FnOnce(&mut WorkflowNode) -> Result<()>,
{
    let mut chain: Vec<&WorkflowNode> = Vec::with_capacity(path.len() + 1);
    chain.push(root);
    for position in path {
        let current = chain[chain.len() - 1];
        let next = current
            .child_at(*position)
            .ok_or_else(|| stale(current, *position))?;
        chain.push(next.as_ref());
    }

    let mut rebuilt = chain[path.len()].clone();
    edit(&mut rebuilt)?;

    for (ancestor, position) in chain[..path.len()].iter().zip(path).rev() {
        let mut copy = (*ancestor).clone();
        let entry = copy
            .holder_mut(position.slot)
            .and_then(|holder| holder.get_mut(position.index))
            .ok_or_else(|| stale(ancestor, *position))?;
        *entry = Arc::new(rebuilt);
        rebuilt = copy;
    }

    Ok(rebuilt)
}

fn stale(node: &WorkflowNode, position: ChildPosition) -> WorkflowError {
    WorkflowError::invalid(format!(
        "node '{}' has no child at {:?}",
        node.id(),
        position
    ))
}
