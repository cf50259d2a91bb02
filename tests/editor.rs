//! End-to-end tests of an editing session: edits, undo/redo, positions and
//! import/export.
mod common;
use common::*;
use flowtree::layout::{DEFAULT_POSITION, SizeLimits};
use flowtree::prelude::*;
use std::sync::Arc;

fn editor() -> WorkflowEditor {
    WorkflowEditor::builder()
        .with_id_generator(SequentialIdGenerator::new("n"))
        .build()
}

#[cfg(test)]
mod editor_tests {
    use super::*;

    #[test]
    fn test_new_session_is_laid_out() {
        let editor = editor();
        assert_eq!(editor.workflow().node_count(), 1);
        assert_eq!(editor.positions().len(), 1);
        assert_eq!(editor.position("start_node").x, 360.0);
        assert!(!editor.can_undo());
        assert!(!editor.can_redo());
    }

    #[test]
    fn test_add_creates_default_labelled_nodes() {
        let mut editor = editor();
        let id = editor.add_node("start_node", NodeKind::Action, None).expect("add");
        assert_eq!(id, "n_1");

        let node = editor.workflow().find(&id).expect("added");
        assert_eq!(node.label(), "New Action");
        assert_eq!(node.kind(), NodeKind::Action);

        let branch = editor.add_node(&id, NodeKind::Branch, None).expect("add branch");
        let node = editor.workflow().find(&branch).expect("added");
        assert_eq!(node.label(), "New Branch");
        assert_eq!(node.children().len(), 0);
    }

    #[test]
    fn test_structural_edits_refresh_positions() {
        let mut editor = editor();
        let a = editor.add_node("start_node", NodeKind::Action, None).expect("add");
        assert_eq!(editor.positions().len(), 2);
        assert_eq!(editor.position(&a).y, 280.0);

        editor.delete_node(&a).expect("delete");
        assert_eq!(editor.positions().len(), 1);
        assert!(editor.positions().entry(&a).is_none());
    }

    #[test]
    fn test_undo_redo_walk_the_timeline() {
        let mut editor = editor();
        let a = editor.add_node("start_node", NodeKind::Action, None).expect("add");
        let b = editor.add_node(&a, NodeKind::Branch, None).expect("add");
        let after_edits = editor.workflow().clone();

        assert!(editor.undo());
        assert!(!editor.workflow().contains(&b));
        assert!(editor.undo());
        assert_eq!(editor.workflow(), &Workflow::new());
        assert!(!editor.undo());
        assert_eq!(editor.positions().len(), 1);

        assert!(editor.redo());
        assert!(editor.redo());
        assert!(!editor.redo());
        assert_eq!(editor.workflow(), &after_edits);
        // Redo restores the recorded snapshot itself, not a copy.
        assert!(Arc::ptr_eq(editor.workflow().root_ref(), after_edits.root_ref()));
        assert_eq!(editor.positions().len(), 3);
    }

    #[test]
    fn test_edit_after_undo_drops_redo_tail() {
        let mut editor = editor();
        let a = editor.add_node("start_node", NodeKind::Action, None).expect("add");
        editor.undo();
        assert!(editor.can_redo());

        let e = editor.add_node("start_node", NodeKind::End, None).expect("add");
        assert!(!editor.can_redo());
        assert!(editor.workflow().contains(&e));
        assert!(!editor.workflow().contains(&a));
    }

    #[test]
    fn test_rejected_edits_change_nothing() {
        let mut editor = editor();
        let end = editor.add_node("start_node", NodeKind::End, None).expect("add");
        let before = editor.workflow().clone();
        let history_len = editor.history().len();

        assert_eq!(
            editor.add_node(&end, NodeKind::Action, None).unwrap_err(),
            WorkflowError::TerminalNode(end.clone())
        );
        assert_eq!(
            editor.delete_node("start_node").unwrap_err(),
            WorkflowError::RootRemoval("start_node".to_string())
        );
        assert!(editor.delete_node("ghost").is_err());
        assert!(editor.insert_node_between("start_node", "ghost", NodeKind::Action, None).is_err());
        assert!(editor.update_label("ghost", "x").is_err());

        assert_eq!(editor.workflow(), &before);
        assert_eq!(editor.history().len(), history_len);
    }

    #[test]
    fn test_insert_between_returns_new_id() {
        let mut editor = editor();
        let a = editor.add_node("start_node", NodeKind::Action, None).expect("add");
        let gate = editor
            .insert_node_between("start_node", &a, NodeKind::Branch, None)
            .expect("insert");

        let node = editor.workflow().find(&gate).expect("inserted");
        let left: Vec<&str> = node
            .slot(Slot::Left)
            .expect("branch")
            .iter()
            .map(|child| child.id())
            .collect();
        assert_eq!(left, [a.as_str()]);
        assert_eq!(editor.positions().len(), 3);
    }

    #[test]
    fn test_fresh_ids_skip_ids_already_in_the_tree() {
        let mut editor = editor();
        let workflow = add_node(&Workflow::new(), "start_node", action("n_1"), None).expect("add");
        editor.load(workflow);

        let id = editor.add_node("start_node", NodeKind::Action, None).expect("add");
        assert_eq!(id, "n_2");
    }

    #[test]
    fn test_label_edits_keep_manual_positions() {
        let mut editor = editor();
        let a = editor.add_node("start_node", NodeKind::Action, None).expect("add");
        editor.update_position(&a, 12.0, 34.0).expect("drag");

        editor.update_label(&a, "Send Email").expect("relabel");
        assert_eq!(editor.workflow().find(&a).expect("node").label(), "Send Email");
        assert_eq!((editor.position(&a).x, editor.position(&a).y), (12.0, 34.0));

        // A structural edit lays the whole tree out again.
        editor.add_node(&a, NodeKind::End, None).expect("add");
        assert_eq!(editor.position(&a).x, 360.0);
    }

    #[test]
    fn test_update_position_and_size() {
        let mut editor = WorkflowEditor::builder()
            .with_size_limits(SizeLimits {
                min_width: 100.0,
                max_width: 400.0,
                min_height: 50.0,
                max_height: 200.0,
            })
            .build();

        let moved = editor.update_position("start_node", 1.0, 2.0).expect("drag");
        assert_eq!((moved.x, moved.y, moved.width, moved.height), (1.0, 2.0, 280.0, 120.0));

        let resized = editor.update_size("start_node", 999.0, 10.0).expect("resize");
        assert_eq!((resized.x, resized.y, resized.width, resized.height), (1.0, 2.0, 400.0, 50.0));
        assert_eq!(editor.position("start_node"), resized);

        assert_eq!(
            editor.update_position("ghost", 0.0, 0.0).unwrap_err(),
            WorkflowError::NodeNotFound("ghost".to_string())
        );
        assert!(editor.update_size("ghost", 300.0, 150.0).is_err());
    }

    #[test]
    fn test_unknown_position_reports_default() {
        let editor = editor();
        assert_eq!(editor.position("ghost"), DEFAULT_POSITION);
    }

    #[test]
    fn test_history_is_bounded() {
        let mut editor = WorkflowEditor::builder()
            .with_id_generator(SequentialIdGenerator::new("n"))
            .with_max_history(3)
            .build();
        for _ in 0..5 {
            editor.add_node("start_node", NodeKind::Action, None).expect("add");
        }

        assert_eq!(editor.history().len(), 3);
        assert_eq!(editor.history().max_len(), 3);
        assert!(editor.undo());
        assert!(editor.undo());
        assert!(!editor.undo());
        // The oldest reachable snapshot holds three of the five actions.
        assert_eq!(editor.workflow().node_count(), 4);
    }

    #[test]
    fn test_export_and_load_json() {
        let mut editor = editor();
        editor.load_json(EXAMPLE_WORKFLOW_JSON).expect("load");
        assert_eq!(editor.workflow().node_count(), 7);
        assert_eq!(editor.positions().len(), 7);
        assert!(!editor.can_undo());

        let exported = editor.export_json().expect("export");
        let mut other = editor_with(Workflow::new());
        other.load_json(&exported).expect("reload");
        assert_eq!(other.workflow(), editor.workflow());

        let before = editor.workflow().clone();
        assert!(editor.load_json(LEGACY_TWO_SLOT_JSON).is_err());
        assert_eq!(editor.workflow(), &before);
    }

    #[test]
    fn test_deep_export_loads_back() {
        let mut editor = editor();
        let mut parent = "start_node".to_string();
        for _ in 0..200 {
            parent = editor.add_node(&parent, NodeKind::Action, None).expect("add");
        }

        let exported = editor.export_json().expect("export");
        let mut other = editor_with(Workflow::new());
        other.load_json(&exported).expect("reload");
        assert_eq!(other.workflow().node_count(), 201);
        assert_eq!(other.workflow(), editor.workflow());
        assert_eq!(other.positions().len(), 201);
    }

    #[test]
    fn test_edges_follow_the_current_tree() {
        let editor = editor_with(Workflow::example().expect("example"));
        let edges = editor.edges();
        assert_eq!(edges.len(), 6);
        assert!(edges.iter().any(|e| e.source == "branch_1"
            && e.target == "end_3"
            && e.slot == Some(Slot::Right)));
    }

    fn editor_with(workflow: Workflow) -> WorkflowEditor {
        WorkflowEditor::builder().with_workflow(workflow).build()
    }
}
