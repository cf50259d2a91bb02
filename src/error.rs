use thiserror::Error;

/// Result type alias using `WorkflowError`.
pub type Result<T> = std::result::Result<T, WorkflowError>;

/// Errors raised by the workflow tree engine.
///
/// Every rejected operation leaves the input tree untouched; the caller still
/// holds the exact value it passed in.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkflowError {
    #[error("Node '{0}' not found in the workflow")]
    NodeNotFound(String),

    #[error("Node '{target_id}' is not a direct child of '{parent_id}' at the given position")]
    TargetNotFound { parent_id: String, target_id: String },

    #[error("Node '{0}' is an end node and cannot hold children")]
    TerminalNode(String),

    #[error("Node '{0}' is the workflow root and cannot be removed")]
    RootRemoval(String),

    #[error("Node '{0}' is a branch; a slot (0, 1 or 2) is required")]
    SlotRequired(String),

    #[error("Slot {0} is out of range; branch slots are 0 (left), 1 (center) and 2 (right)")]
    InvalidSlot(usize),

    #[error("Node id '{0}' already exists in the workflow")]
    DuplicateId(String),

    #[error("Node '{0}' already has children; only single fresh nodes can be attached")]
    NotALeaf(String),

    #[error("Node '{0}' is a start node; only the root may be a start node")]
    RootKindMisplaced(String),

    #[error("Invalid workflow document: {0}")]
    InvalidDocument(String),

    #[error("Failed to parse workflow JSON: {0}")]
    JsonParseError(String),
}

impl WorkflowError {
    /// Create an invalid document error with a message
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidDocument(msg.into())
    }
}

impl From<serde_json::Error> for WorkflowError {
    fn from(err: serde_json::Error) -> Self {
        Self::JsonParseError(err.to_string())
    }
}
