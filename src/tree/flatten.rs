use serde::Serialize;

use super::{NodeId, TaxonRank, TaxonTree};

/// One row of the depth-first traversal: a node together with its rank,
/// indentation depth, and the names of its ancestors (kingdom first).
///
/// `indent_level` follows the canonical rank index (kingdom=0 through
/// species=6), not the node's depth in the tree, so ranks absent from the
/// input lineage leave a gap in indentation between adjacent rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlatEntry {
    pub node: NodeId,
    pub name: String,
    pub rank: TaxonRank,
    pub indent_level: usize,
    pub path: Vec<String>,
}

/// Flatten the tree into depth-first, pre-order sequence, excluding the
/// synthetic root. Siblings appear in their already-sorted order; no
/// filtering happens here. Pure and deterministic: re-running on an
/// unchanged tree yields identical output.
pub fn flatten(tree: &TaxonTree) -> Vec<FlatEntry> {
    let mut entries = Vec::with_capacity(tree.nodes.len().saturating_sub(1));
    let mut path = Vec::new();
    for &child in &tree.root().children {
        visit(tree, child, &mut path, &mut entries);
    }
    entries
}

fn visit(tree: &TaxonTree, node_id: NodeId, path: &mut Vec<String>, entries: &mut Vec<FlatEntry>) {
    let node = &tree.nodes[node_id];

    entries.push(FlatEntry {
        node: node_id,
        name: node.name.clone(),
        rank: node.rank,
        indent_level: node.rank.canonical_index(),
        path: path.clone(),
    });

    path.push(node.name.clone());
    for &child in &node.children {
        visit(tree, child, path, entries);
    }
    path.pop();
}
