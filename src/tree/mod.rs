use std::collections::{BTreeMap, BTreeSet, HashMap};

use log::{debug, warn};
use serde::Serialize;

use crate::record::{Credibility, Lineage, ObservationRecord};

pub mod filter;
pub mod flatten;
pub mod layout;

pub type NodeId = usize;

/// Canonical taxonomic ranks, plus `Unknown` for a rank level that could
/// not be determined from input lineage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TaxonRank {
    Kingdom,
    Phylum,
    Class,
    Order,
    Family,
    Genus,
    Species,
    Unknown,
}

impl TaxonRank {
    /// All ranks that can appear on a lineage path, kingdom first.
    pub const CANONICAL: [TaxonRank; 7] = [
        TaxonRank::Kingdom,
        TaxonRank::Phylum,
        TaxonRank::Class,
        TaxonRank::Order,
        TaxonRank::Family,
        TaxonRank::Genus,
        TaxonRank::Species,
    ];

    /// Position in the canonical order, kingdom=0 through species=6.
    /// `Unknown` sorts after species.
    pub fn canonical_index(self) -> usize {
        match self {
            TaxonRank::Kingdom => 0,
            TaxonRank::Phylum => 1,
            TaxonRank::Class => 2,
            TaxonRank::Order => 3,
            TaxonRank::Family => 4,
            TaxonRank::Genus => 5,
            TaxonRank::Species => 6,
            TaxonRank::Unknown => 7,
        }
    }
}

/// Node within the taxonomic hierarchy. Only species-rank nodes that came
/// from an actual observation are leaves; every other node is a synthetic
/// ancestor carrying no count data.
#[derive(Debug, Clone, Serialize)]
pub struct TaxonNode {
    pub id: NodeId,
    pub name: String,
    pub rank: TaxonRank,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub is_leaf: bool,
    /// Site name to summed haplotype count, populated only on leaves.
    pub site_occurrences: BTreeMap<String, u32>,
    pub credibility: Option<Credibility>,
    pub confidence: Option<String>,
    pub source: Option<String>,
}

impl TaxonNode {
    fn new(id: NodeId, name: String, rank: TaxonRank) -> Self {
        Self {
            id,
            name,
            rank,
            parent: None,
            children: Vec::new(),
            is_leaf: false,
            site_occurrences: BTreeMap::new(),
            credibility: None,
            confidence: None,
            source: None,
        }
    }

    /// Total haplotype count across all sites; zero for ancestors.
    pub fn total_count(&self) -> u32 {
        self.site_occurrences.values().sum()
    }

    pub fn has_any_occurrence(&self) -> bool {
        self.site_occurrences.values().any(|&count| count > 0)
    }
}

/// Taxonomic hierarchy with an explicit node list. Node 0 is a synthetic,
/// unnamed root sitting below kingdom; it is never emitted downstream.
#[derive(Debug, Clone, Serialize)]
pub struct TaxonTree {
    pub root: NodeId,
    pub nodes: Vec<TaxonNode>,
}

impl TaxonTree {
    /// Build the hierarchy from the flat observation table.
    ///
    /// Species are deduplicated across sites in first-seen order; the
    /// first record's lineage wins when later records disagree. Records
    /// with an empty species name are skipped outright.
    pub fn from_records(records: &[ObservationRecord]) -> Self {
        let mut tree = Self {
            root: 0,
            nodes: vec![TaxonNode::new(0, String::new(), TaxonRank::Unknown)],
        };

        // species name -> (leaf id, lineage the leaf was built from)
        let mut leaves: HashMap<String, (NodeId, Option<Lineage>)> = HashMap::new();

        for record in records {
            let species = record.species.trim();
            if species.is_empty() {
                debug!(
                    "skipping record with empty species name at site {}",
                    record.site
                );
                continue;
            }

            let leaf_id = match leaves.get(species) {
                Some(&(leaf_id, ref first_lineage)) => {
                    if record.metadata.lineage.is_some()
                        && record.metadata.lineage != *first_lineage
                    {
                        warn!(
                            "conflicting lineage for {species}: keeping first-seen, \
                             ignoring record at site {}",
                            record.site
                        );
                    }
                    leaf_id
                }
                None => {
                    let leaf_id = tree.insert_lineage(species, record);
                    leaves.insert(
                        species.to_string(),
                        (leaf_id, record.metadata.lineage.clone()),
                    );
                    leaf_id
                }
            };

            *tree.nodes[leaf_id]
                .site_occurrences
                .entry(record.site.clone())
                .or_insert(0) += record.count;
        }

        tree.sort_children_recursively();
        tree
    }

    /// Walk the path for one new species, creating missing intermediate
    /// nodes, and return the id of its leaf.
    fn insert_lineage(&mut self, species: &str, record: &ObservationRecord) -> NodeId {
        let mut current = self.root;

        let lineage = record.metadata.lineage.clone().unwrap_or_default();
        for (rank, field) in TaxonRank::CANONICAL.iter().zip(lineage.fields()) {
            // Species level is handled below so the leaf always exists,
            // even when the lineage carries no species field.
            if *rank == TaxonRank::Species {
                break;
            }
            let Some(name) = present_name(field) else {
                continue;
            };
            current = self.child_or_insert(current, name, *rank);
        }

        let leaf_name = present_name(lineage.species.as_deref()).unwrap_or(species);
        let leaf_id = self.child_or_insert(current, leaf_name, TaxonRank::Species);

        let leaf = &mut self.nodes[leaf_id];
        leaf.is_leaf = true;
        leaf.credibility = Some(record.metadata.credibility);
        leaf.confidence = Some(record.metadata.confidence.clone());
        leaf.source = Some(record.metadata.source.clone());
        leaf_id
    }

    fn child_or_insert(&mut self, parent: NodeId, name: &str, rank: TaxonRank) -> NodeId {
        if let Some(&existing) = self.nodes[parent]
            .children
            .iter()
            .find(|&&child| self.nodes[child].name == name)
        {
            return existing;
        }

        let id = self.nodes.len();
        let mut node = TaxonNode::new(id, name.to_string(), rank);
        node.parent = Some(parent);
        debug_assert!(
            parent == self.root
                || self.nodes[parent].rank.canonical_index() < rank.canonical_index(),
            "rank order violated inserting {name} under {}",
            self.nodes[parent].name
        );
        self.nodes.push(node);
        self.nodes[parent].children.push(id);
        id
    }

    /// Order every node's children alphabetically by name, case-insensitive.
    /// Runs once at the end of construction so the whole tree is ordered
    /// independent of the chosen display mode.
    fn sort_children_recursively(&mut self) {
        let keys: Vec<String> = self
            .nodes
            .iter()
            .map(|node| node.name.to_lowercase())
            .collect();

        for node in &mut self.nodes {
            if node.children.len() > 1 {
                node.children
                    .sort_by(|&a, &b| keys[a].cmp(&keys[b]).then_with(|| a.cmp(&b)));
            }
        }
    }

    pub fn node(&self, id: NodeId) -> Option<&TaxonNode> {
        self.nodes.get(id)
    }

    pub fn root(&self) -> &TaxonNode {
        &self.nodes[self.root]
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|node| node.is_leaf).count()
    }

    pub fn leaves(&self) -> impl Iterator<Item = &TaxonNode> {
        self.nodes.iter().filter(|node| node.is_leaf)
    }

    /// Sorted distinct site names across all leaves, for heatmap column
    /// headers.
    pub fn site_names(&self) -> Vec<String> {
        let mut sites = BTreeSet::new();
        for leaf in self.leaves() {
            for site in leaf.site_occurrences.keys() {
                sites.insert(site.clone());
            }
        }
        sites.into_iter().collect()
    }
}

/// Lineage fields that are empty, whitespace, or the `NA` sentinel count
/// as absent; no placeholder node is inserted for them.
fn present_name(field: Option<&str>) -> Option<&str> {
    let name = field?.trim();
    if name.is_empty() || name == "NA" {
        None
    } else {
        Some(name)
    }
}
