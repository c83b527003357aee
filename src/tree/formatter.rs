use super::{CompiledTree, LeafBackend, TreeNode};

/// Formats compiled trees into indented, human-readable listings.
pub struct TreeFormatter;

impl TreeFormatter {
    /// One line per node, children indented by two spaces, each line ending in
    /// the node's last recorded status:
    ///
    /// ```text
    /// Root [Running]
    ///   Sequence [Running]
    ///     Condition script:is_ready [Success]
    ///     Action remote:armBTAction [Running]
    /// ```
    pub fn format_tree(tree: &CompiledTree) -> String {
        let mut out = String::new();
        Self::format_recursive(tree, tree.root(), 0, &mut out);
        out
    }

    fn format_recursive(tree: &CompiledTree, node: &TreeNode, depth: usize, out: &mut String) {
        let status = tree.status_of_slot(node.slot()).unwrap_or_default();
        out.push_str(&"  ".repeat(depth));
        out.push_str(node.label());
        if let TreeNode::Action(leaf) | TreeNode::Condition(leaf) = node {
            let origin = match leaf.backend() {
                LeafBackend::Script { .. } => "script",
                LeafBackend::Remote(_) => "remote",
            };
            out.push_str(&format!(" {}:{}", origin, leaf.name()));
        }
        out.push_str(&format!(" [{}]\n", status));

        for child in node.children() {
            Self::format_recursive(tree, child, depth + 1, out);
        }
    }
}
