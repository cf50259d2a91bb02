//! The editing session driven by a rendering/interaction layer.
//!
//! A [`WorkflowEditor`] owns the snapshot history, the position side-table and
//! the id source. Each structural call builds a fresh node, runs the matching
//! [`mutation`] function on the current snapshot and pushes the result; the
//! layout is recomputed whenever the current tree's node count changes.
//!
//! A rejected call returns its error and leaves the session exactly as it was.

use crate::error::{Result, WorkflowError};
use crate::history::{History, MAX_HISTORY};
use crate::ids::{IdGenerator, UuidIdGenerator};
use crate::layout::{self, LayoutConfig, Position, PositionTable, SizeLimits};
use crate::model::{NodeId, NodeKind, Slot, Workflow, WorkflowNode};
use crate::mutation;
use crate::query::{self, Edge};

/// Configures and creates a [`WorkflowEditor`].
pub struct EditorBuilder {
    workflow: Workflow,
    max_history: usize,
    layout_config: LayoutConfig,
    size_limits: SizeLimits,
    ids: Box<dyn IdGenerator>,
}

impl EditorBuilder {
    pub fn new() -> Self {
        Self {
            workflow: Workflow::new(),
            max_history: MAX_HISTORY,
            layout_config: LayoutConfig::default(),
            size_limits: SizeLimits::default(),
            ids: Box::new(UuidIdGenerator),
        }
    }

    /// Starts the session from `workflow` instead of a lone start node.
    pub fn with_workflow(mut self, workflow: Workflow) -> Self {
        self.workflow = workflow;
        self
    }

    pub fn with_max_history(mut self, max_history: usize) -> Self {
        self.max_history = max_history;
        self
    }

    pub fn with_layout_config(mut self, layout_config: LayoutConfig) -> Self {
        self.layout_config = layout_config;
        self
    }

    pub fn with_size_limits(mut self, size_limits: SizeLimits) -> Self {
        self.size_limits = size_limits;
        self
    }

    pub fn with_id_generator(mut self, ids: impl IdGenerator + 'static) -> Self {
        self.ids = Box::new(ids);
        self
    }

    pub fn build(self) -> WorkflowEditor {
        let mut editor = WorkflowEditor {
            history: History::with_capacity(self.workflow, self.max_history),
            positions: PositionTable::new(self.size_limits),
            layout_config: self.layout_config,
            ids: self.ids,
            laid_out_count: 0,
        };
        editor.relayout();
        editor
    }
}

impl Default for EditorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// An editing session over one workflow.
pub struct WorkflowEditor {
    history: History<Workflow>,
    positions: PositionTable,
    layout_config: LayoutConfig,
    ids: Box<dyn IdGenerator>,
    /// Node count of the tree the position table was last computed for.
    laid_out_count: usize,
}

impl WorkflowEditor {
    pub fn new() -> Self {
        EditorBuilder::new().build()
    }

    pub fn builder() -> EditorBuilder {
        EditorBuilder::new()
    }

    /// The current snapshot.
    pub fn workflow(&self) -> &Workflow {
        self.history.current()
    }

    pub fn positions(&self) -> &PositionTable {
        &self.positions
    }

    pub fn position(&self, id: &str) -> Position {
        self.positions.get(id)
    }

    pub fn edges(&self) -> Vec<Edge> {
        query::edges(self.workflow().root())
    }

    /// Appends a new `kind` node under `parent_id` and returns its id.
    pub fn add_node(&mut self, parent_id: &str, kind: NodeKind, slot: Option<Slot>) -> Result<NodeId> {
        let node = self.fresh_node(kind);
        let id = node.id().to_string();
        let result = mutation::add_node(self.workflow(), parent_id, node, slot);
        self.commit("add_node", result)?;
        Ok(id)
    }

    /// Removes `node_id`, reconnecting its children to its parent.
    pub fn delete_node(&mut self, node_id: &str) -> Result<()> {
        let result = mutation::delete_node(self.workflow(), node_id);
        self.commit("delete_node", result)
    }

    /// Inserts a new `kind` node between `parent_id` and its child
    /// `target_id`, and returns the new node's id.
    pub fn insert_node_between(
        &mut self,
        parent_id: &str,
        target_id: &str,
        kind: NodeKind,
        slot: Option<Slot>,
    ) -> Result<NodeId> {
        let node = self.fresh_node(kind);
        let id = node.id().to_string();
        let result = mutation::insert_node_between(self.workflow(), parent_id, target_id, node, slot);
        self.commit("insert_node_between", result)?;
        Ok(id)
    }

    pub fn update_label(&mut self, node_id: &str, label: impl Into<String>) -> Result<()> {
        let result = mutation::update_label(self.workflow(), node_id, label);
        self.commit("update_label", result)
    }

    /// Records a drag of `node_id` to `(x, y)`. Only the side-table changes.
    pub fn update_position(&mut self, node_id: &str, x: f64, y: f64) -> Result<Position> {
        self.ensure_present("update_position", node_id)?;
        Ok(self.positions.update_position(node_id, x, y))
    }

    /// Records a resize of `node_id`, clamped to the size limits.
    pub fn update_size(&mut self, node_id: &str, width: f64, height: f64) -> Result<Position> {
        self.ensure_present("update_size", node_id)?;
        Ok(self.positions.update_size(node_id, width, height))
    }

    /// Steps back one snapshot; `false` when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let moved = self.history.undo();
        if moved {
            self.refresh_layout();
        }
        moved
    }

    /// Steps forward one snapshot; `false` when there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        let moved = self.history.redo();
        if moved {
            self.refresh_layout();
        }
        moved
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn history(&self) -> &History<Workflow> {
        &self.history
    }

    /// Recomputes every position, discarding manual drags and resizes.
    pub fn relayout(&mut self) {
        let positions = layout::layout(self.workflow(), &self.layout_config);
        self.laid_out_count = positions.len();
        self.positions.replace_all(positions);
    }

    /// The current tree in the JSON export format.
    pub fn export_json(&self) -> Result<String> {
        self.workflow().to_json()
    }

    pub fn export_json_pretty(&self) -> Result<String> {
        self.workflow().to_json_pretty()
    }

    /// Replaces the session with the workflow in `json`. The history restarts
    /// from the loaded tree.
    pub fn load_json(&mut self, json: &str) -> Result<()> {
        let workflow = Workflow::from_json(json).inspect_err(|err| {
            log::debug!("load_json rejected, workflow unchanged: {}", err);
        })?;
        self.load(workflow);
        Ok(())
    }

    pub fn load(&mut self, workflow: Workflow) {
        log::info!("Loaded workflow with {} node(s)", workflow.node_count());
        self.history.reset(workflow);
        self.relayout();
    }

    fn fresh_node(&mut self, kind: NodeKind) -> WorkflowNode {
        let mut id = self.ids.next_id();
        while self.workflow().contains(&id) {
            id = self.ids.next_id();
        }
        WorkflowNode::new(kind, id, kind.default_label())
    }

    fn commit(&mut self, operation: &str, result: Result<Workflow>) -> Result<()> {
        match result {
            Ok(workflow) => {
                self.history.push(workflow);
                self.refresh_layout();
                Ok(())
            }
            Err(err) => {
                log::debug!("{} rejected, workflow unchanged: {}", operation, err);
                Err(err)
            }
        }
    }

    fn ensure_present(&self, operation: &str, node_id: &str) -> Result<()> {
        if self.workflow().contains(node_id) {
            Ok(())
        } else {
            log::debug!("{} rejected: unknown node '{}'", operation, node_id);
            Err(WorkflowError::NodeNotFound(node_id.to_string()))
        }
    }

    fn refresh_layout(&mut self) {
        if self.workflow().node_count() != self.laid_out_count {
            self.relayout();
        }
    }
}

impl Default for WorkflowEditor {
    fn default() -> Self {
        Self::new()
    }
}
