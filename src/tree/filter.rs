use std::collections::{BTreeSet, HashSet};

use serde::Serialize;

use super::flatten::FlatEntry;
use super::{NodeId, TaxonTree};
use crate::record::Credibility;

/// Final ordering applied to the visible rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DisplayMode {
    /// Preserve tree structure, including non-data ancestor rows.
    Hierarchical,
    /// Data rows only, sorted by name.
    Alphabetical,
}

/// Filter selections applied before row assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOptions {
    /// Credibility levels allowed through. An empty set shows nothing;
    /// there is no fall-back to show-all.
    pub allowed: BTreeSet<Credibility>,
    /// Drop leaves whose site occurrences are all zero.
    pub hide_empty: bool,
}

impl FilterOptions {
    pub fn allow_all() -> BTreeSet<Credibility> {
        BTreeSet::from([Credibility::High, Credibility::Moderate, Credibility::Low])
    }
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self {
            allowed: Self::allow_all(),
            hide_empty: false,
        }
    }
}

/// One visible row. Ancestors are retained in hierarchical mode purely for
/// visual context and contribute no data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Row {
    Ancestor(FlatEntry),
    Data(FlatEntry),
}

impl Row {
    pub fn entry(&self) -> &FlatEntry {
        match self {
            Row::Ancestor(entry) | Row::Data(entry) => entry,
        }
    }

    pub fn is_data(&self) -> bool {
        matches!(self, Row::Data(_))
    }
}

/// Leaves that pass the credibility and empty-row filters. The two filters
/// are independent set operations and commute.
pub fn surviving_leaves(tree: &TaxonTree, options: &FilterOptions) -> HashSet<NodeId> {
    tree.leaves()
        .filter(|leaf| {
            leaf.credibility
                .is_some_and(|level| options.allowed.contains(&level))
        })
        .filter(|leaf| !options.hide_empty || leaf.has_any_occurrence())
        .map(|leaf| leaf.id)
        .collect()
}

/// Apply filters and the mode-dependent final ordering to the flattened
/// sequence. `entries` must be the full flattener output for `tree`.
pub fn visible_rows(
    tree: &TaxonTree,
    entries: &[FlatEntry],
    options: &FilterOptions,
    mode: DisplayMode,
) -> Vec<Row> {
    let survivors = surviving_leaves(tree, options);

    match mode {
        DisplayMode::Hierarchical => {
            let retained = mark_retained_subtrees(tree, &survivors);
            entries
                .iter()
                .filter(|entry| retained[entry.node])
                .map(|entry| {
                    if tree.nodes[entry.node].is_leaf {
                        Row::Data(entry.clone())
                    } else {
                        Row::Ancestor(entry.clone())
                    }
                })
                .collect()
        }
        DisplayMode::Alphabetical => {
            let mut rows: Vec<&FlatEntry> = entries
                .iter()
                .filter(|entry| survivors.contains(&entry.node))
                .collect();
            rows.sort_by(|a, b| {
                a.name
                    .to_lowercase()
                    .cmp(&b.name.to_lowercase())
                    .then_with(|| a.name.cmp(&b.name))
            });
            rows.into_iter().map(|entry| Row::Data(entry.clone())).collect()
        }
    }
}

/// Post-order marking: a node is retained when it is a surviving leaf or
/// has at least one retained descendant.
fn mark_retained_subtrees(tree: &TaxonTree, survivors: &HashSet<NodeId>) -> Vec<bool> {
    let mut retained = vec![false; tree.nodes.len()];

    fn mark(
        tree: &TaxonTree,
        node_id: NodeId,
        survivors: &HashSet<NodeId>,
        retained: &mut [bool],
    ) -> bool {
        let node = &tree.nodes[node_id];
        let mut keep = node.is_leaf && survivors.contains(&node_id);
        for &child in &node.children {
            keep |= mark(tree, child, survivors, retained);
        }
        retained[node_id] = keep;
        keep
    }

    mark(tree, tree.root, survivors, &mut retained);
    retained[tree.root] = false;
    retained
}
