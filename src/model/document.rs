//! The JSON save/export contract.
//!
//! A node serializes as `{ "id", "type", "label", "children" }` where
//! `children` is an array of node objects for start and action nodes, an array
//! of exactly three arrays for branch nodes, and an empty array for end nodes.
//!
//! Loading parses into an untyped [`Value`] without serde_json's nesting limit,
//! then builds nodes bottom-up with an explicit stack. Every shape violation is
//! reported as a [`WorkflowError::InvalidDocument`] naming the offending node.

use super::node::{Children, NodeKind, NodeRef, WorkflowNode};
use crate::error::{Result, WorkflowError};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::sync::Arc;
use std::vec::IntoIter;

/// Parses `json` into a [`Value`] of any nesting depth.
///
/// Each tree level nests an object and an array, so the default limit of 128
/// would cap documents at 63 levels.
pub(crate) fn parse(json: &str) -> Result<Value> {
    let mut deserializer = serde_json::Deserializer::from_str(json);
    deserializer.disable_recursion_limit();
    let value = Value::deserialize(serde_stacker::Deserializer::new(&mut deserializer))?;
    deserializer.end()?;
    Ok(value)
}

/// Builds the root node of a document, validating the shape of every node.
///
/// The document is consumed as it is converted, so no deep [`Value`] is left
/// to drop recursively.
pub(crate) fn build(document: Value) -> Result<WorkflowNode> {
    let mut stack = vec![PendingNode::open(document, true)?];

    while let Some(pending) = stack.last_mut() {
        match pending.next_child() {
            Some(child) => {
                let child = PendingNode::open(child, false)?;
                stack.push(child);
            }
            None => {
                let Some(finished) = stack.pop() else { break };
                let node = finished.finish()?;
                match stack.last_mut() {
                    Some(parent) => parent.accept(Arc::new(node)),
                    None => return Ok(node),
                }
            }
        }
    }

    Err(WorkflowError::invalid("document holds no root node"))
}

/// A node whose fields are validated but whose children are still being built.
struct PendingNode {
    id: String,
    kind: NodeKind,
    label: String,
    /// One group for start and action nodes, three for branches, none for ends.
    unbuilt: Vec<IntoIter<Value>>,
    built: Vec<Vec<NodeRef>>,
    group: usize,
}

impl PendingNode {
    /// Checks the fields and children shape of one node object. `is_root`
    /// marks the single position where a start node is allowed.
    fn open(value: Value, is_root: bool) -> Result<Self> {
        let Value::Object(mut object) = value else {
            return Err(WorkflowError::invalid(format!(
                "expected a node object, found {}",
                type_name(&value)
            )));
        };

        let id = take_string(&mut object, "id", None)?;
        let kind_tag = take_string(&mut object, "type", Some(&id))?;
        let kind: NodeKind = serde_json::from_value(Value::String(kind_tag.clone()))
            .map_err(|_| {
                WorkflowError::invalid(format!("node '{}' has unknown type '{}'", id, kind_tag))
            })?;
        let label = take_string(&mut object, "label", Some(&id))?;

        if kind == NodeKind::Start && !is_root {
            return Err(WorkflowError::RootKindMisplaced(id));
        }

        let children = match object.remove("children") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(children)) => children,
            Some(other) => {
                return Err(WorkflowError::invalid(format!(
                    "node '{}' has children of type {}, expected an array",
                    id,
                    type_name(&other)
                )));
            }
        };

        let unbuilt = match kind {
            NodeKind::End => {
                if !children.is_empty() {
                    return Err(WorkflowError::invalid(format!(
                        "end node '{}' must not have children",
                        id
                    )));
                }
                Vec::new()
            }
            NodeKind::Branch => {
                let found = children.len();
                let slots: Option<Vec<IntoIter<Value>>> = children
                    .into_iter()
                    .map(|slot| match slot {
                        Value::Array(entries) => Some(entries.into_iter()),
                        _ => None,
                    })
                    .collect();
                match slots {
                    Some(slots) if slots.len() == 3 => slots,
                    _ => {
                        return Err(WorkflowError::invalid(format!(
                            "branch node '{}' must have exactly 3 slots of nodes, found {} entries",
                            id, found
                        )));
                    }
                }
            }
            NodeKind::Start | NodeKind::Action => {
                if children.iter().any(Value::is_array) {
                    return Err(WorkflowError::invalid(format!(
                        "{} node '{}' must have an array of nodes as children",
                        kind, id
                    )));
                }
                vec![children.into_iter()]
            }
        };

        Ok(Self {
            id,
            kind,
            label,
            built: vec![Vec::new(); unbuilt.len()],
            unbuilt,
            group: 0,
        })
    }

    /// The next child still to be built, moving on to the next slot when the
    /// current one runs out.
    fn next_child(&mut self) -> Option<Value> {
        while let Some(group) = self.unbuilt.get_mut(self.group) {
            if let Some(child) = group.next() {
                return Some(child);
            }
            self.group += 1;
        }
        None
    }

    /// Files a built child under the group it was taken from.
    fn accept(&mut self, child: NodeRef) {
        if let Some(group) = self.built.get_mut(self.group) {
            group.push(child);
        }
    }

    fn finish(self) -> Result<WorkflowNode> {
        let children = match self.kind {
            NodeKind::End => Children::Terminal,
            NodeKind::Branch => {
                let slots: [Vec<NodeRef>; 3] = self.built.try_into().map_err(|_| {
                    WorkflowError::invalid(format!("branch node '{}' lost a slot", self.id))
                })?;
                Children::Slots(slots)
            }
            NodeKind::Start | NodeKind::Action => {
                Children::Sequence(self.built.into_iter().flatten().collect())
            }
        };
        Ok(WorkflowNode::from_parts(self.id, self.kind, self.label, children))
    }
}

fn take_string(object: &mut Map<String, Value>, field: &str, id: Option<&str>) -> Result<String> {
    let owner = match id {
        Some(id) => format!("node '{}'", id),
        None => "node".to_string(),
    };
    match object.remove(field) {
        Some(Value::String(value)) => Ok(value),
        Some(other) => Err(WorkflowError::invalid(format!(
            "{} has a {} '{}', expected a string",
            owner,
            type_name(&other),
            field
        ))),
        None => Err(WorkflowError::invalid(format!(
            "{} is missing the '{}' field",
            owner, field
        ))),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_json(json: &str) -> Result<WorkflowNode> {
        build(parse(json)?)
    }

    #[test]
    fn test_slots_keep_their_entries_apart() {
        let node = build_json(
            r#"{ "id": "s", "type": "start", "label": "S", "children": [
                { "id": "b", "type": "branch", "label": "B", "children": [
                    [{ "id": "l1", "type": "action", "label": "L1" },
                     { "id": "l2", "type": "end", "label": "L2" }],
                    [],
                    [{ "id": "r", "type": "end", "label": "R", "children": [] }]
                ] }
            ] }"#,
        )
        .expect("valid document");

        let Children::Sequence(children) = node.children() else {
            panic!("start node holds a sequence");
        };
        let Children::Slots([left, center, right]) = children[0].children() else {
            panic!("branch holds slots");
        };
        let ids = |entries: &Vec<NodeRef>| {
            entries.iter().map(|n| n.id().to_string()).collect::<Vec<_>>()
        };
        assert_eq!(ids(left), ["l1", "l2"]);
        assert!(center.is_empty());
        assert_eq!(ids(right), ["r"]);
    }

    #[test]
    fn test_errors_name_the_offending_node() {
        let err = build_json(
            r#"{ "id": "s", "type": "start", "label": "S", "children": [
                { "id": "deep", "type": "loop", "label": "?" }
            ] }"#,
        )
        .unwrap_err();
        assert_eq!(err, WorkflowError::invalid("node 'deep' has unknown type 'loop'"));

        let err = build_json(r#"{ "id": "s", "type": "start" }"#).unwrap_err();
        assert_eq!(err, WorkflowError::invalid("node 's' is missing the 'label' field"));

        let err = build_json(r#"[1, 2]"#).unwrap_err();
        assert_eq!(err, WorkflowError::invalid("expected a node object, found array"));
    }

    #[test]
    fn test_parse_accepts_nesting_past_the_default_limit() {
        let depth = 300;
        let json = format!("{}{}", "[".repeat(depth), "]".repeat(depth));
        assert!(parse(&json).is_ok());
        assert!(matches!(
            parse("{ \"id\": 1 } trailing"),
            Err(WorkflowError::JsonParseError(_))
        ));
    }
}
