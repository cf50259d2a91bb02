//! Structural edits on a workflow tree.
//!
//! Every operation is pure: the input workflow is never modified, and the
//! success path returns a new workflow that shares all untouched subtrees with
//! the input. A rejected operation returns an error and produces nothing, so
//! the caller's tree is exactly what it was.

use crate::error::{Result, WorkflowError};
use crate::model::{NodeKind, Slot, Workflow, WorkflowNode};
use crate::query;
use std::sync::Arc;

mod path;

use path::rewrite_at;

/// Appends `new_node` to the children of `parent_id`.
///
/// For a branch parent `slot` selects the exit path and is required; for
/// start and action parents it is ignored. End nodes accept no children.
pub fn add_node(
    workflow: &Workflow,
    parent_id: &str,
    new_node: WorkflowNode,
    slot: Option<Slot>,
) -> Result<Workflow> {
    let parent = workflow
        .find(parent_id)
        .ok_or_else(|| WorkflowError::NodeNotFound(parent_id.to_string()))?;
    let holder_slot = holder_slot(parent, slot)?;
    ensure_fresh(workflow, &new_node)?;

    let path = query::find_path(workflow.root(), parent_id)
        .ok_or_else(|| WorkflowError::NodeNotFound(parent_id.to_string()))?;
    let root = rewrite_at(workflow.root(), &path, |parent| {
        let parent_id = parent.id().to_string();
        let holder = parent
            .holder_mut(holder_slot)
            .ok_or(WorkflowError::TerminalNode(parent_id))?;
        holder.push(Arc::new(new_node));
        Ok(())
    })?;

    Ok(Workflow::from_trusted_root(root))
}

/// Removes `id` and reconnects its children to its former parent.
///
/// The removed node's children take its place in the parent's sequence (or
/// branch slot), in order. A removed branch contributes its left, center and
/// right slots concatenated. The root can never be removed.
pub fn delete_node(workflow: &Workflow, id: &str) -> Result<Workflow> {
    if workflow.root_id() == id {
        return Err(WorkflowError::RootRemoval(id.to_string()));
    }
    let path = query::find_path(workflow.root(), id)
        .ok_or_else(|| WorkflowError::NodeNotFound(id.to_string()))?;
    let (last, parent_path) = path
        .split_last()
        .ok_or_else(|| WorkflowError::RootRemoval(id.to_string()))?;

    let root = rewrite_at(workflow.root(), parent_path, |parent| {
        let parent_id = parent.id().to_string();
        let holder = parent
            .holder_mut(last.slot)
            .filter(|holder| last.index < holder.len())
            .ok_or_else(|| WorkflowError::NodeNotFound(id.to_string()))?;

        let removed = holder.remove(last.index);
        let orphans = removed.children().clone().into_flattened();
        log::trace!(
            "Reattaching {} child(ren) of '{}' to '{}'",
            orphans.len(),
            removed.id(),
            parent_id
        );
        holder.splice(last.index..last.index, orphans);
        Ok(())
    })?;

    Ok(Workflow::from_trusted_root(root))
}

/// Puts `new_node` in the place of `target_id` inside `parent_id`, and moves
/// the target (with its whole subtree) underneath the new node.
///
/// A branch `new_node` receives the target in its left slot. For a branch
/// parent the target is only looked up in `slot`.
pub fn insert_node_between(
    workflow: &Workflow,
    parent_id: &str,
    target_id: &str,
    new_node: WorkflowNode,
    slot: Option<Slot>,
) -> Result<Workflow> {
    let parent = workflow
        .find(parent_id)
        .ok_or_else(|| WorkflowError::NodeNotFound(parent_id.to_string()))?;
    let target_not_found = || WorkflowError::TargetNotFound {
        parent_id: parent_id.to_string(),
        target_id: target_id.to_string(),
    };
    let holder_slot = match parent.kind() {
        NodeKind::End => return Err(target_not_found()),
        kind => holder_slot_for(kind, parent.id(), slot)?,
    };
    let siblings = match holder_slot {
        Some(slot) => parent.slot(slot),
        None => parent.sequence(),
    }
    .unwrap_or_default();
    let index = siblings
        .iter()
        .position(|child| child.id() == target_id)
        .ok_or_else(target_not_found)?;

    if new_node.kind().is_terminal() {
        return Err(WorkflowError::TerminalNode(new_node.id().to_string()));
    }
    ensure_fresh(workflow, &new_node)?;

    let path = query::find_path(workflow.root(), parent_id)
        .ok_or_else(|| WorkflowError::NodeNotFound(parent_id.to_string()))?;
    let root = rewrite_at(workflow.root(), &path, |parent| {
        let holder = parent
            .holder_mut(holder_slot)
            .filter(|holder| index < holder.len())
            .ok_or_else(target_not_found)?;

        let mut wrapper = new_node;
        let wrapper_slot = (wrapper.kind() == NodeKind::Branch).then_some(Slot::Left);
        let wrapper_id = wrapper.id().to_string();
        wrapper
            .holder_mut(wrapper_slot)
            .ok_or(WorkflowError::TerminalNode(wrapper_id))?
            .push(Arc::clone(&holder[index]));
        holder[index] = Arc::new(wrapper);
        Ok(())
    })?;

    Ok(Workflow::from_trusted_root(root))
}

/// Gives node `id` a new label. Structure and ids are unchanged.
pub fn update_label(workflow: &Workflow, id: &str, label: impl Into<String>) -> Result<Workflow> {
    let path = query::find_path(workflow.root(), id)
        .ok_or_else(|| WorkflowError::NodeNotFound(id.to_string()))?;
    let label = label.into();
    let root = rewrite_at(workflow.root(), &path, |node| {
        node.set_label(label);
        Ok(())
    })?;

    Ok(Workflow::from_trusted_root(root))
}

/// Which holding sequence of `parent` receives new children.
fn holder_slot(parent: &WorkflowNode, slot: Option<Slot>) -> Result<Option<Slot>> {
    if parent.kind().is_terminal() {
        return Err(WorkflowError::TerminalNode(parent.id().to_string()));
    }
    holder_slot_for(parent.kind(), parent.id(), slot)
}

fn holder_slot_for(kind: NodeKind, parent_id: &str, slot: Option<Slot>) -> Result<Option<Slot>> {
    match kind {
        NodeKind::Branch => slot
            .map(Some)
            .ok_or_else(|| WorkflowError::SlotRequired(parent_id.to_string())),
        NodeKind::Start | NodeKind::Action | NodeKind::End => Ok(None),
    }
}

/// A node entering the tree must be a single childless node with an unused
/// id, and must not be a second start node.
fn ensure_fresh(workflow: &Workflow, node: &WorkflowNode) -> Result<()> {
    if node.kind() == NodeKind::Start {
        return Err(WorkflowError::RootKindMisplaced(node.id().to_string()));
    }
    if !node.is_leaf() {
        return Err(WorkflowError::NotALeaf(node.id().to_string()));
    }
    if workflow.contains(node.id()) {
        return Err(WorkflowError::DuplicateId(node.id().to_string()));
    }
    Ok(())
}
