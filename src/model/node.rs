use crate::error::{Result, WorkflowError};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::sync::Arc;

/// Opaque, unique node identifier.
pub type NodeId = String;

/// Shared handle to an immutable subtree.
///
/// Published trees never mutate in place, so subtrees are freely shared
/// between successive tree values.
pub type NodeRef = Arc<WorkflowNode>;

/// The four step types a workflow is made of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Start,
    Action,
    Branch,
    End,
}

impl NodeKind {
    /// The lowercase tag used by the JSON export format.
    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Start => "start",
            NodeKind::Action => "action",
            NodeKind::Branch => "branch",
            NodeKind::End => "end",
        }
    }

    /// End nodes are terminal and never hold children.
    pub fn is_terminal(self) -> bool {
        matches!(self, NodeKind::End)
    }

    /// Label given to freshly created nodes, e.g. `New Action`.
    pub fn default_label(self) -> String {
        let name = match self {
            NodeKind::Start => "Start",
            NodeKind::Action => "Action",
            NodeKind::Branch => "Branch",
            NodeKind::End => "End",
        };
        format!("New {}", name)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One of a branch node's three exit paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Slot {
    Left = 0,
    Center = 1,
    Right = 2,
}

impl Slot {
    pub const ALL: [Slot; 3] = [Slot::Left, Slot::Center, Slot::Right];

    pub fn index(self) -> usize {
        self as usize
    }
}

impl TryFrom<usize> for Slot {
    type Error = WorkflowError;

    fn try_from(value: usize) -> Result<Self> {
        Slot::ALL
            .get(value)
            .copied()
            .ok_or(WorkflowError::InvalidSlot(value))
    }
}

impl Serialize for Slot {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_u8(*self as u8)
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Left => write!(f, "left"),
            Slot::Center => write!(f, "center"),
            Slot::Right => write!(f, "right"),
        }
    }
}

/// The children of a node, shaped by the node's kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Children {
    /// Ordered children of a start or action node.
    Sequence(Vec<NodeRef>),
    /// The left, center and right paths of a branch node.
    Slots([Vec<NodeRef>; 3]),
    /// End nodes.
    Terminal,
}

impl Children {
    fn empty_for(kind: NodeKind) -> Self {
        match kind {
            NodeKind::Start | NodeKind::Action => Children::Sequence(Vec::new()),
            NodeKind::Branch => Children::Slots(Default::default()),
            NodeKind::End => Children::Terminal,
        }
    }

    /// Number of direct children across every slot.
    pub fn len(&self) -> usize {
        match self {
            Children::Sequence(children) => children.len(),
            Children::Slots(slots) => slots.iter().map(Vec::len).sum(),
            Children::Terminal => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Direct children with their position, in traversal order: a branch
    /// yields slot 0, then slot 1, then slot 2.
    pub fn positioned(&self) -> Vec<(ChildPosition, &NodeRef)> {
        match self {
            Children::Sequence(children) => children
                .iter()
                .enumerate()
                .map(|(index, child)| (ChildPosition { slot: None, index }, child))
                .collect(),
            Children::Slots(slots) => Slot::ALL
                .iter()
                .flat_map(move |&slot| {
                    slots[slot.index()].iter().enumerate().map(move |(index, child)| {
                        (
                            ChildPosition {
                                slot: Some(slot),
                                index,
                            },
                            child,
                        )
                    })
                })
                .collect(),
            Children::Terminal => Vec::new(),
        }
    }

    /// Consumes the children into one flat sequence; slots are concatenated
    /// left, center, right.
    pub fn into_flattened(self) -> Vec<NodeRef> {
        match self {
            Children::Sequence(children) => children,
            Children::Slots(slots) => slots.into_iter().flatten().collect(),
            Children::Terminal => Vec::new(),
        }
    }

    fn holder(&self, slot: Option<Slot>) -> Option<&Vec<NodeRef>> {
        match (self, slot) {
            (Children::Sequence(children), None) => Some(children),
            (Children::Slots(slots), Some(slot)) => Some(&slots[slot.index()]),
            _ => None,
        }
    }

    fn holder_mut(&mut self, slot: Option<Slot>) -> Option<&mut Vec<NodeRef>> {
        match (self, slot) {
            (Children::Sequence(children), None) => Some(children),
            (Children::Slots(slots), Some(slot)) => Some(&mut slots[slot.index()]),
            _ => None,
        }
    }
}

/// Where a child sits inside its parent: the branch slot (branch parents
/// only) and the index within the holding sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChildPosition {
    pub slot: Option<Slot>,
    pub index: usize,
}

/// A single step in the workflow together with its subtree.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowNode {
    id: NodeId,
    kind: NodeKind,
    label: String,
    children: Children,
}

impl WorkflowNode {
    /// Creates a childless node. Branch nodes start with three empty slots.
    pub fn new(kind: NodeKind, id: impl Into<NodeId>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            label: label.into(),
            children: Children::empty_for(kind),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn children(&self) -> &Children {
        &self.children
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// The child sequence of a start or action node.
    pub fn sequence(&self) -> Option<&[NodeRef]> {
        self.children.holder(None).map(Vec::as_slice)
    }

    /// One slot of a branch node.
    pub fn slot(&self, slot: Slot) -> Option<&[NodeRef]> {
        self.children.holder(Some(slot)).map(Vec::as_slice)
    }

    /// Direct children in traversal order.
    pub fn child_nodes(&self) -> impl Iterator<Item = &WorkflowNode> {
        self.children
            .positioned()
            .into_iter()
            .map(|(_, child)| child.as_ref())
    }

    /// Appends `child` to this node, into `slot` when this node is a branch.
    ///
    /// Intended for assembling fresh trees before they are published.
    pub fn with_child(mut self, child: WorkflowNode, slot: Option<Slot>) -> Result<Self> {
        let slot = match self.kind {
            NodeKind::End => return Err(WorkflowError::TerminalNode(self.id)),
            NodeKind::Branch => {
                Some(slot.ok_or_else(|| WorkflowError::SlotRequired(self.id.clone()))?)
            }
            NodeKind::Start | NodeKind::Action => None,
        };
        if let Some(holder) = self.children.holder_mut(slot) {
            holder.push(Arc::new(child));
        }
        Ok(self)
    }

    pub(crate) fn child_at(&self, position: ChildPosition) -> Option<&NodeRef> {
        self.children
            .holder(position.slot)
            .and_then(|holder| holder.get(position.index))
    }

    pub(crate) fn holder_mut(&mut self, slot: Option<Slot>) -> Option<&mut Vec<NodeRef>> {
        self.children.holder_mut(slot)
    }

    pub(crate) fn set_label(&mut self, label: String) {
        self.label = label;
    }

    /// Assembles a node from parts whose shape already matches `kind`.
    pub(crate) fn from_parts(id: NodeId, kind: NodeKind, label: String, children: Children) -> Self {
        debug_assert_eq!(
            std::mem::discriminant(&children),
            std::mem::discriminant(&Children::empty_for(kind))
        );
        Self {
            id,
            kind,
            label,
            children,
        }
    }
}

impl Serialize for WorkflowNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("WorkflowNode", 4)?;
        state.serialize_field("id", &self.id)?;
        state.serialize_field("type", &self.kind)?;
        state.serialize_field("label", &self.label)?;
        state.serialize_field("children", &self.children)?;
        state.end()
    }
}

/// Serializes a holding sequence as an array of node objects.
struct SequenceRef<'a>(&'a [NodeRef]);

impl Serialize for SequenceRef<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.0.iter().map(|child| child.as_ref()))
    }
}

impl Serialize for Children {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Children::Sequence(children) => SequenceRef(children).serialize(serializer),
            Children::Slots(slots) => {
                serializer.collect_seq(slots.iter().map(|slot| SequenceRef(slot)))
            }
            Children::Terminal => SequenceRef(&[]).serialize(serializer),
        }
    }
}
