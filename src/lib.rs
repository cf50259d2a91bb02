//! # flowtree - Workflow Tree Engine
//!
//! **flowtree** is the engine behind a branching workflow builder: a workflow
//! starts at a single start node and grows into a tree of actions, three-way
//! conditions and end nodes. The crate owns everything with real invariants,
//! and leaves rendering, pointer handling and styling to the caller.
//!
//! ## Components
//!
//! 1.  **Model** ([`model`]): the immutable node tree. Start and action nodes
//!     hold an ordered child sequence, branch nodes hold exactly three slots
//!     (left, center, right), end nodes hold nothing. Serializes to the JSON
//!     save/export format.
//! 2.  **Query** ([`query`]): pre-order lookups of nodes, parents, paths and
//!     edges.
//! 3.  **Mutation** ([`mutation`]): pure edits that return a new tree sharing
//!     every untouched subtree with the old one.
//! 4.  **History** ([`history`]): bounded linear undo/redo over tree snapshots.
//! 5.  **Layout** ([`layout`]): deterministic coordinates for every node, plus
//!     the position side-table edited by drags and resizes.
//! 6.  **Editor** ([`editor`]): the session object an interaction layer
//!     drives, tying the pieces above together.
//!
//! ## Quick Start
//!
//! ```rust
//! use flowtree::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let mut editor = WorkflowEditor::builder()
//!         .with_id_generator(SequentialIdGenerator::new("step"))
//!         .build();
//!     let root = editor.workflow().root_id().to_string();
//!
//!     // Start -> Action -> Branch, with an action on the center path.
//!     let action = editor.add_node(&root, NodeKind::Action, None)?;
//!     let branch = editor.add_node(&action, NodeKind::Branch, None)?;
//!     editor.add_node(&branch, NodeKind::Action, Some(Slot::Center))?;
//!     assert_eq!(editor.workflow().node_count(), 4);
//!
//!     // Removing the branch reconnects its center path to the first action.
//!     editor.delete_node(&branch)?;
//!     assert_eq!(editor.workflow().node_count(), 3);
//!
//!     // Every edit is undoable.
//!     editor.undo();
//!     assert_eq!(editor.workflow().node_count(), 4);
//!
//!     // Positions are recomputed on every structural change.
//!     let position = editor.position(&branch);
//!     println!("branch at ({}, {})", position.x, position.y);
//!
//!     println!("{}", editor.export_json_pretty()?);
//!     Ok(())
//! }
//! ```

pub mod editor;
pub mod error;
pub mod history;
pub mod ids;
pub mod layout;
pub mod model;
pub mod mutation;
pub mod prelude;
pub mod query;
