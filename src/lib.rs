//! Taxonomic hierarchy builder and hierarchical-heatmap layout engine.
//!
//! Given a flat table of species observations, each optionally tagged with
//! a full taxonomic lineage (kingdom through species), this crate:
//!
//! 1. rebuilds the implicit hierarchy ([`TaxonTree::from_records`]),
//!    merging records that share a lineage path and aggregating per-site
//!    counts onto species leaves;
//! 2. flattens it into a deterministic depth-first sequence
//!    ([`flatten`]);
//! 3. applies credibility and empty-row filters and the mode-dependent
//!    final ordering ([`visible_rows`]);
//! 4. derives presentation values for the rendering layer: column width,
//!    rank colors, row offsets, and parent-child connector geometry
//!    ([`HeatmapLayout::compute`]).
//!
//! Every stage is a pure, synchronous function of the previous stage's
//! output; re-running the pipeline on unchanged input yields structurally
//! identical results, so consumers are free to memoize. CSV ingestion,
//! taxonomy lookup, and the actual drawing of pixels are external
//! collaborators and live outside this crate.

pub mod record;
pub mod tree;

pub use record::{Credibility, Lineage, ObservationRecord, RecordMetadata};
pub use tree::filter::{surviving_leaves, visible_rows, DisplayMode, FilterOptions, Row};
pub use tree::flatten::{flatten, FlatEntry};
pub use tree::layout::{
    column_width, rank_color, row_offset, ConnectorKind, ConnectorSegment, HeatmapLayout,
    RowStyle, ALPHABETICAL_COLUMN_WIDTH, CHAR_PX, INDENT_PX, LABEL_PADDING_PX, MAX_COLUMN_WIDTH,
    MIN_COLUMN_WIDTH,
};
pub use tree::{NodeId, TaxonNode, TaxonRank, TaxonTree};
