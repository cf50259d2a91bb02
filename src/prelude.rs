//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and functions from the
//! flowtree crate.
//!
//! # Example
//!
//! ```rust
//! use flowtree::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let workflow = Workflow::new();
//! let action = WorkflowNode::new(NodeKind::Action, "a1", "Send Email");
//! let workflow = add_node(&workflow, workflow.root_id(), action, None)?;
//!
//! let positions = layout_with_defaults(&workflow);
//! assert_eq!(positions.len(), 2);
//! # Ok(())
//! # }
//! # run_example().unwrap();
//! ```

// Tree model
pub use crate::model::{Children, NodeId, NodeKind, Slot, Workflow, WorkflowNode};

// Queries and edits
pub use crate::mutation::{add_node, delete_node, insert_node_between, update_label};
pub use crate::query::{Edge, count_nodes, find_node_by_id, find_parent_node};

// Layout and history
pub use crate::history::{History, MAX_HISTORY};
pub use crate::layout::{LayoutConfig, Position, PositionTable, layout, layout_with_defaults};

// Editing session
pub use crate::editor::WorkflowEditor;
pub use crate::ids::{IdGenerator, SequentialIdGenerator, UuidIdGenerator};

// Error types
pub use crate::error::{Result, WorkflowError};
