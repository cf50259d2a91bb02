use super::document;
use super::node::{NodeKind, NodeRef, Slot, WorkflowNode};
use crate::error::{Result, WorkflowError};
use crate::query;
use ahash::AHashSet;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::sync::Arc;

/// Id of the root node of a freshly created workflow.
pub const INITIAL_ROOT_ID: &str = "start_node";

/// A complete, validated workflow tree.
///
/// The root is always a start node, no other start node exists, and every id
/// is unique. Cloning is cheap: the whole tree sits behind one shared pointer.
#[derive(Debug, Clone, PartialEq)]
pub struct Workflow {
    root: NodeRef,
}

impl Workflow {
    /// The initial workflow: a lone start node.
    pub fn new() -> Self {
        Self {
            root: Arc::new(WorkflowNode::new(NodeKind::Start, INITIAL_ROOT_ID, "Start")),
        }
    }

    /// Wraps `root` after checking the tree-wide invariants.
    pub fn from_root(root: WorkflowNode) -> Result<Self> {
        Self::from_shared_root(Arc::new(root))
    }

    pub(crate) fn from_shared_root(root: NodeRef) -> Result<Self> {
        if root.kind() != NodeKind::Start {
            return Err(WorkflowError::invalid(format!(
                "root node '{}' must be a start node, found {}",
                root.id(),
                root.kind()
            )));
        }

        let mut seen = AHashSet::new();
        for visit in query::iter_preorder(&root) {
            if visit.parent.is_some() && visit.node.kind() == NodeKind::Start {
                return Err(WorkflowError::RootKindMisplaced(visit.node.id().to_string()));
            }
            if !seen.insert(visit.node.id()) {
                return Err(WorkflowError::DuplicateId(visit.node.id().to_string()));
            }
        }

        Ok(Self { root })
    }

    /// Wraps a root produced by a mutation that already upheld every invariant.
    pub(crate) fn from_trusted_root(root: WorkflowNode) -> Self {
        Self {
            root: Arc::new(root),
        }
    }

    /// The example workflow shipped with the editor: an action followed by a
    /// three-way condition.
    pub fn example() -> Result<Self> {
        let success = WorkflowNode::new(NodeKind::Action, "action_2", "Process Data").with_child(
            WorkflowNode::new(NodeKind::End, "end_2", "End (Success)"),
            None,
        )?;
        let branch = WorkflowNode::new(NodeKind::Branch, "branch_1", "Check Status")
            .with_child(
                WorkflowNode::new(NodeKind::End, "end_1", "End (Error)"),
                Some(Slot::Left),
            )?
            .with_child(success, Some(Slot::Center))?
            .with_child(
                WorkflowNode::new(NodeKind::End, "end_3", "End (Pending)"),
                Some(Slot::Right),
            )?;
        let action =
            WorkflowNode::new(NodeKind::Action, "action_1", "Execute Code").with_child(branch, None)?;
        let root = WorkflowNode::new(NodeKind::Start, INITIAL_ROOT_ID, "Start")
            .with_child(action, None)?;
        Self::from_root(root)
    }

    pub fn root(&self) -> &WorkflowNode {
        &self.root
    }

    /// Shared handle to the root. Snapshots that compare pointer-equal here
    /// are the same tree value.
    pub fn root_ref(&self) -> &NodeRef {
        &self.root
    }

    pub fn root_id(&self) -> &str {
        self.root.id()
    }

    pub fn find(&self, id: &str) -> Option<&WorkflowNode> {
        query::find_node_by_id(&self.root, id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    pub fn node_count(&self) -> usize {
        query::count_nodes(&self.root)
    }

    /// Parses and validates a workflow from the JSON export format.
    pub fn from_json(json: &str) -> Result<Self> {
        Self::from_value(document::parse(json)?)
    }

    /// Validates a workflow from an already parsed JSON document.
    pub fn from_value(document: serde_json::Value) -> Result<Self> {
        Self::from_root(document::build(document)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Default for Workflow {
    fn default() -> Self {
        Self::new()
    }
}

impl Serialize for Workflow {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.root.as_ref().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Workflow {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let document = serde_json::Value::deserialize(deserializer)?;
        Workflow::from_value(document).map_err(serde::de::Error::custom)
    }
}
