//! Common test utilities for building workflows and documents.
use flowtree::prelude::*;

/// The example workflow in its JSON export form.
///
/// Shape: `start_node -> action_1 -> branch_1`, where the branch holds
/// `end_1` on the left, `action_2 -> end_2` in the center and `end_3` on the
/// right.
#[allow(dead_code)]
pub const EXAMPLE_WORKFLOW_JSON: &str = r#"{
  "id": "start_node",
  "type": "start",
  "label": "Start",
  "children": [
    {
      "id": "action_1",
      "type": "action",
      "label": "Execute Code",
      "children": [
        {
          "id": "branch_1",
          "type": "branch",
          "label": "Check Status",
          "children": [
            [
              { "id": "end_1", "type": "end", "label": "End (Error)", "children": [] }
            ],
            [
              {
                "id": "action_2",
                "type": "action",
                "label": "Process Data",
                "children": [
                  { "id": "end_2", "type": "end", "label": "End (Success)", "children": [] }
                ]
              }
            ],
            [
              { "id": "end_3", "type": "end", "label": "End (Pending)", "children": [] }
            ]
          ]
        }
      ]
    }
  ]
}"#;

/// A branch saved in the legacy two-slot form, which is no longer accepted.
#[allow(dead_code)]
pub const LEGACY_TWO_SLOT_JSON: &str = r#"{
  "id": "start_node",
  "type": "start",
  "label": "Start",
  "children": [
    {
      "id": "b1",
      "type": "branch",
      "label": "Check",
      "children": [
        [{ "id": "e1", "type": "end", "label": "Yes", "children": [] }],
        [{ "id": "e2", "type": "end", "label": "No", "children": [] }]
      ]
    }
  ]
}"#;

#[allow(dead_code)]
pub fn action(id: &str) -> WorkflowNode {
    WorkflowNode::new(NodeKind::Action, id, "Action")
}

#[allow(dead_code)]
pub fn branch(id: &str) -> WorkflowNode {
    WorkflowNode::new(NodeKind::Branch, id, "Branch")
}

#[allow(dead_code)]
pub fn end(id: &str) -> WorkflowNode {
    WorkflowNode::new(NodeKind::End, id, "End")
}

/// Builds `start_node -> a1 -> b1`, with `b1` holding `e1` left, `a2` center
/// and `a3` right.
#[allow(dead_code)]
pub fn create_branching_workflow() -> Workflow {
    let workflow = Workflow::new();
    let workflow = add_node(&workflow, "start_node", action("a1"), None).expect("add a1");
    let workflow = add_node(&workflow, "a1", branch("b1"), None).expect("add b1");
    let workflow = add_node(&workflow, "b1", end("e1"), Some(Slot::Left)).expect("add e1");
    let workflow = add_node(&workflow, "b1", action("a2"), Some(Slot::Center)).expect("add a2");
    add_node(&workflow, "b1", action("a3"), Some(Slot::Right)).expect("add a3")
}

/// Ids of the whole tree in pre-order.
#[allow(dead_code)]
pub fn preorder_ids(workflow: &Workflow) -> Vec<String> {
    flowtree::query::iter_preorder(workflow.root())
        .map(|visit| visit.node.id().to_string())
        .collect()
}

/// Ids of the direct children of `id`, flattened in slot order.
#[allow(dead_code)]
pub fn child_ids(workflow: &Workflow, id: &str) -> Vec<String> {
    workflow
        .find(id)
        .expect("node should exist")
        .child_nodes()
        .map(|child| child.id().to_string())
        .collect()
}

/// Ids held by one slot of the branch `id`.
#[allow(dead_code)]
pub fn slot_ids(workflow: &Workflow, id: &str, slot: Slot) -> Vec<String> {
    workflow
        .find(id)
        .and_then(|node| node.slot(slot))
        .expect("branch should exist")
        .iter()
        .map(|child| child.id().to_string())
        .collect()
}

/// One randomly chosen edit, replayed against a growing tree by
/// [`build_random_workflow`].
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct Step {
    pub parent_pick: usize,
    pub kind: NodeKind,
    pub slot: Slot,
}

#[allow(dead_code)]
pub fn step_strategy() -> impl proptest::strategy::Strategy<Value = Step> {
    use proptest::prelude::*;
    (
        any::<usize>(),
        prop_oneof![
            3 => Just(NodeKind::Action),
            2 => Just(NodeKind::Branch),
            1 => Just(NodeKind::End),
        ],
        prop_oneof![Just(Slot::Left), Just(Slot::Center), Just(Slot::Right)],
    )
        .prop_map(|(parent_pick, kind, slot)| Step {
            parent_pick,
            kind,
            slot,
        })
}

/// Replays `steps` as `add_node` calls. Each step picks one of the nodes
/// that can still take children; ids are `n1`, `n2`, ...
#[allow(dead_code)]
pub fn build_random_workflow(steps: &[Step]) -> Workflow {
    let mut workflow = Workflow::new();
    for (i, step) in steps.iter().enumerate() {
        let open: Vec<(String, NodeKind)> = flowtree::query::iter_preorder(workflow.root())
            .filter(|visit| !visit.node.kind().is_terminal())
            .map(|visit| (visit.node.id().to_string(), visit.node.kind()))
            .collect();
        let (parent_id, parent_kind) = &open[step.parent_pick % open.len()];
        let slot = (*parent_kind == NodeKind::Branch).then_some(step.slot);
        let node = WorkflowNode::new(step.kind, format!("n{}", i + 1), "Generated");
        workflow = add_node(&workflow, parent_id, node, slot).expect("random add should succeed");
    }
    workflow
}

/// A workflow whose start node heads a single chain of `depth` actions,
/// `a0` to `a{depth - 1}`. Built bottom-up, so deep chains stay cheap.
#[allow(dead_code)]
pub fn build_chain(depth: usize) -> Workflow {
    let mut chain: Option<WorkflowNode> = None;
    for i in (0..depth).rev() {
        let node = action(&format!("a{}", i));
        chain = Some(match chain {
            Some(below) => node.with_child(below, None).expect("actions hold children"),
            None => node,
        });
    }
    let mut root = WorkflowNode::new(NodeKind::Start, "start_node", "Start");
    if let Some(chain) = chain {
        root = root.with_child(chain, None).expect("start holds children");
    }
    Workflow::from_root(root).expect("valid chain")
}
