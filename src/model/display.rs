use super::node::{Children, Slot, WorkflowNode};
use super::workflow::Workflow;
use std::fmt;

/// Renders a workflow as an indented tree, one node per line.
///
/// ```text
/// └── [start] Start (start_node)
///     └── [branch] Check (b1)
///         ├── left
///         │   └── [end] Fail (e1)
///         ├── center
///         └── right
/// ```
pub struct DisplayTree<'a> {
    pub root: &'a WorkflowNode,
}

impl fmt::Display for DisplayTree<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_as_tree(self.root, f, "", true)
    }
}

impl DisplayTree<'_> {
    fn fmt_as_tree(
        &self,
        node: &WorkflowNode,
        f: &mut fmt::Formatter<'_>,
        prefix: &str,
        is_last: bool,
    ) -> fmt::Result {
        let node_marker = if is_last { "└── " } else { "├── " };
        writeln!(
            f,
            "{}{}[{}] {} ({})",
            prefix,
            node_marker,
            node.kind(),
            node.label(),
            node.id()
        )?;

        let child_prefix = format!("{}{}", prefix, if is_last { "    " } else { "│   " });

        match node.children() {
            Children::Sequence(children) => {
                for (i, child) in children.iter().enumerate() {
                    self.fmt_as_tree(child, f, &child_prefix, i + 1 == children.len())?;
                }
            }
            Children::Slots(slots) => {
                for slot in Slot::ALL {
                    let is_last_slot = slot == Slot::Right;
                    let slot_marker = if is_last_slot { "└── " } else { "├── " };
                    writeln!(f, "{}{}{}", child_prefix, slot_marker, slot)?;

                    let slot_prefix = format!(
                        "{}{}",
                        child_prefix,
                        if is_last_slot { "    " } else { "│   " }
                    );
                    let entries = &slots[slot.index()];
                    for (i, child) in entries.iter().enumerate() {
                        self.fmt_as_tree(child, f, &slot_prefix, i + 1 == entries.len())?;
                    }
                }
            }
            Children::Terminal => {}
        }
        Ok(())
    }
}

impl fmt::Display for Workflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        DisplayTree { root: self.root() }.fmt(f)
    }
}
