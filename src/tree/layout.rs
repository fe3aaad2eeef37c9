use serde::Serialize;

use super::filter::{visible_rows, DisplayMode, FilterOptions, Row};
use super::flatten::flatten;
use super::{TaxonRank, TaxonTree};

mod connectors;

/// Horizontal pixels per indentation level.
pub const INDENT_PX: f32 = 20.0;
/// Approximate label width per character.
pub const CHAR_PX: f32 = 7.0;
/// Fixed padding added to the label column.
pub const LABEL_PADDING_PX: f32 = 40.0;
/// Hard bounds on the hierarchical label column.
pub const MIN_COLUMN_WIDTH: f32 = 250.0;
pub const MAX_COLUMN_WIDTH: f32 = 500.0;
/// Fixed label column width in alphabetical mode.
pub const ALPHABETICAL_COLUMN_WIDTH: f32 = 200.0;

/// Label color for a rank. Total over every rank, `Unknown` included;
/// there is no "no color" case.
pub fn rank_color(rank: TaxonRank) -> &'static str {
    match rank {
        TaxonRank::Kingdom => "#6A1B9A",
        TaxonRank::Phylum => "#283593",
        TaxonRank::Class => "#1565C0",
        TaxonRank::Order => "#00838F",
        TaxonRank::Family => "#2E7D32",
        TaxonRank::Genus => "#EF6C00",
        TaxonRank::Species => "#C62828",
        TaxonRank::Unknown => "#757575",
    }
}

/// Horizontal offset nesting a row's label under its ancestors.
pub fn row_offset(indent_level: usize) -> f32 {
    indent_level as f32 * INDENT_PX
}

/// Label column width for the visible rows. The hierarchical formula is
/// clamped to the hard bounds regardless of the computed value; widths are
/// taken over the post-filter rows only, not the whole tree.
pub fn column_width(rows: &[Row], mode: DisplayMode) -> f32 {
    match mode {
        DisplayMode::Alphabetical => ALPHABETICAL_COLUMN_WIDTH,
        DisplayMode::Hierarchical => {
            let max_indent = rows
                .iter()
                .map(|row| row.entry().indent_level)
                .max()
                .unwrap_or(0);
            let max_name_len = rows
                .iter()
                .map(|row| row.entry().name.chars().count())
                .max()
                .unwrap_or(0);
            (max_indent as f32 * INDENT_PX + max_name_len as f32 * CHAR_PX + LABEL_PADDING_PX)
                .clamp(MIN_COLUMN_WIDTH, MAX_COLUMN_WIDTH)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ConnectorKind {
    Horizontal,
    Vertical,
}

/// One parent-child connector line for the hierarchical overlay.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectorSegment {
    pub kind: ConnectorKind,
    pub start: (f32, f32),
    pub end: (f32, f32),
    pub parent_row: usize,
    pub child_row: Option<usize>,
}

/// Per-row presentation values for the rendering layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowStyle {
    pub x_offset: f32,
    pub color: &'static str,
    pub label: String,
}

/// Everything the rendering layer needs for one pass: the ordered visible
/// rows, their presentation values, the column width, and the connector
/// overlay. Pure function of the tree and the filter selections.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapLayout {
    pub mode: DisplayMode,
    pub rows: Vec<Row>,
    pub styles: Vec<RowStyle>,
    pub column_width: f32,
    pub row_height: f32,
    pub connectors: Vec<ConnectorSegment>,
}

impl HeatmapLayout {
    /// Run the full pipeline: flatten, filter, order, and derive layout
    /// values. Connectors are computed here, once per filter/sort pass,
    /// and only in hierarchical mode.
    pub fn compute(
        tree: &TaxonTree,
        options: &FilterOptions,
        mode: DisplayMode,
        row_height: f32,
    ) -> Self {
        let entries = flatten(tree);
        let rows = visible_rows(tree, &entries, options, mode);

        let styles = rows
            .iter()
            .map(|row| {
                let entry = row.entry();
                RowStyle {
                    x_offset: row_offset(entry.indent_level),
                    color: rank_color(entry.rank),
                    label: entry.name.clone(),
                }
            })
            .collect();

        let connectors = match mode {
            DisplayMode::Hierarchical => connectors::build(&rows, row_height),
            DisplayMode::Alphabetical => Vec::new(),
        };

        Self {
            mode,
            column_width: column_width(&rows, mode),
            rows,
            styles,
            row_height,
            connectors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Credibility, Lineage, ObservationRecord, RecordMetadata};
    use crate::tree::flatten::FlatEntry;

    fn entry(name: &str, rank: TaxonRank) -> FlatEntry {
        FlatEntry {
            node: 1,
            name: name.to_string(),
            rank,
            indent_level: rank.canonical_index(),
            path: Vec::new(),
        }
    }

    #[test]
    fn every_rank_has_a_color() {
        let all = [
            TaxonRank::Kingdom,
            TaxonRank::Phylum,
            TaxonRank::Class,
            TaxonRank::Order,
            TaxonRank::Family,
            TaxonRank::Genus,
            TaxonRank::Species,
            TaxonRank::Unknown,
        ];
        for rank in all {
            assert!(rank_color(rank).starts_with('#'));
        }
    }

    #[test]
    fn row_offset_scales_with_indent() {
        assert_eq!(row_offset(0), 0.0);
        assert_eq!(row_offset(3), 60.0);
    }

    #[test]
    fn narrow_content_clamps_up_to_minimum() {
        // 0*20 + 3*7 + 40 = 61, clamped to 250.
        let rows = vec![Row::Data(entry("Cod", TaxonRank::Kingdom))];
        assert_eq!(column_width(&rows, DisplayMode::Hierarchical), 250.0);
    }

    #[test]
    fn wide_content_clamps_down_to_maximum() {
        let long_name = "x".repeat(120);
        let rows = vec![Row::Data(entry(&long_name, TaxonRank::Species))];
        // 6*20 + 120*7 + 40 = 1000, clamped to 500.
        assert_eq!(column_width(&rows, DisplayMode::Hierarchical), 500.0);
    }

    #[test]
    fn alphabetical_width_is_fixed() {
        let rows = vec![Row::Data(entry("x", TaxonRank::Species))];
        assert_eq!(column_width(&rows, DisplayMode::Alphabetical), 200.0);
        assert_eq!(column_width(&[], DisplayMode::Alphabetical), 200.0);
    }

    fn sample_records() -> Vec<ObservationRecord> {
        let lineage = |phylum: &str, species: &str| Lineage {
            kingdom: Some("Animalia".to_string()),
            phylum: Some(phylum.to_string()),
            species: Some(species.to_string()),
            ..Lineage::default()
        };
        vec![
            ObservationRecord::new(
                "Acartia tonsa",
                "Site1",
                8,
                RecordMetadata {
                    credibility: Credibility::High,
                    lineage: Some(lineage("Arthropoda", "Acartia tonsa")),
                    ..RecordMetadata::default()
                },
            ),
            ObservationRecord::new(
                "Mytilus edulis",
                "Site2",
                2,
                RecordMetadata {
                    credibility: Credibility::Low,
                    lineage: Some(lineage("Mollusca", "Mytilus edulis")),
                    ..RecordMetadata::default()
                },
            ),
        ]
    }

    #[test]
    fn compute_is_deterministic() {
        let tree = TaxonTree::from_records(&sample_records());
        let options = FilterOptions::default();

        let first = HeatmapLayout::compute(&tree, &options, DisplayMode::Hierarchical, 24.0);
        let second = HeatmapLayout::compute(&tree, &options, DisplayMode::Hierarchical, 24.0);
        assert_eq!(first, second);
    }

    #[test]
    fn alphabetical_mode_emits_no_connectors() {
        let tree = TaxonTree::from_records(&sample_records());
        let layout = HeatmapLayout::compute(
            &tree,
            &FilterOptions::default(),
            DisplayMode::Alphabetical,
            24.0,
        );
        assert!(layout.connectors.is_empty());
        assert!(layout.rows.iter().all(Row::is_data));
    }

    #[test]
    fn styles_line_up_with_rows() {
        let tree = TaxonTree::from_records(&sample_records());
        let layout = HeatmapLayout::compute(
            &tree,
            &FilterOptions::default(),
            DisplayMode::Hierarchical,
            24.0,
        );

        assert_eq!(layout.styles.len(), layout.rows.len());
        for (row, style) in layout.rows.iter().zip(&layout.styles) {
            let entry = row.entry();
            assert_eq!(style.label, entry.name);
            assert_eq!(style.x_offset, row_offset(entry.indent_level));
            assert_eq!(style.color, rank_color(entry.rank));
        }
    }
}
