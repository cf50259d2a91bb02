mod display;
mod document;
mod node;
mod workflow;

pub use display::DisplayTree;
pub use node::{ChildPosition, Children, NodeId, NodeKind, NodeRef, Slot, WorkflowNode};
pub use workflow::{INITIAL_ROOT_ID, Workflow};
