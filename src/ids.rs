//! Node id generation.

use crate::model::NodeId;
use uuid::Uuid;

/// Source of fresh node ids.
///
/// Implementations must never hand out the same id twice, so an id is never
/// reused after its node is deleted.
pub trait IdGenerator: Send {
    fn next_id(&mut self) -> NodeId;
}

/// Random ids of the form `node_<uuid>`.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidIdGenerator;

impl IdGenerator for UuidIdGenerator {
    fn next_id(&mut self) -> NodeId {
        format!("node_{}", Uuid::new_v4().simple())
    }
}

/// Deterministic ids of the form `<prefix>_<n>`, counting up from 1.
#[derive(Debug, Clone)]
pub struct SequentialIdGenerator {
    prefix: String,
    next: u64,
}

impl SequentialIdGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }
}

impl Default for SequentialIdGenerator {
    fn default() -> Self {
        Self::new("node")
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&mut self) -> NodeId {
        let id = format!("{}_{}", self.prefix, self.next);
        self.next += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ahash::AHashSet;

    #[test]
    fn test_sequential_ids_count_up() {
        let mut ids = SequentialIdGenerator::new("step");
        assert_eq!(ids.next_id(), "step_1");
        assert_eq!(ids.next_id(), "step_2");
    }

    #[test]
    fn test_uuid_ids_are_distinct() {
        let mut ids = UuidIdGenerator;
        let generated: AHashSet<NodeId> = (0..100).map(|_| ids.next_id()).collect();
        assert_eq!(generated.len(), 100);
        assert!(generated.iter().all(|id| id.starts_with("node_")));
    }
}
