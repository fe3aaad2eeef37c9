use super::{row_offset, ConnectorKind, ConnectorSegment};
use crate::tree::filter::Row;

/// Build the parent-child connector overlay for the hierarchical view.
///
/// For each non-leaf row, scan forward through the visible sequence while
/// entries stay deeper than the parent; entries exactly one level deeper
/// whose path contains the parent's name are its immediate children. A
/// parent with no qualifying children emits nothing. Children that skip a
/// rank (indent gap greater than one) are deliberately left unconnected.
///
/// Row y coordinates are `row_index * row_height`; x coordinates are the
/// row indent offsets.
pub(super) fn build(rows: &[Row], row_height: f32) -> Vec<ConnectorSegment> {
    let mut segments = Vec::new();

    for (parent_row, row) in rows.iter().enumerate() {
        let Row::Ancestor(parent) = row else {
            continue;
        };

        let mut children = Vec::new();
        for (offset, candidate) in rows[parent_row + 1..].iter().enumerate() {
            let entry = candidate.entry();
            if entry.indent_level <= parent.indent_level {
                break;
            }
            if entry.indent_level == parent.indent_level + 1
                && entry.path.iter().any(|name| *name == parent.name)
            {
                children.push((parent_row + 1 + offset, entry));
            }
        }

        let Some(&(first_child_row, _)) = children.first() else {
            continue;
        };

        let parent_x = row_offset(parent.indent_level);
        segments.push(ConnectorSegment {
            kind: ConnectorKind::Vertical,
            start: (parent_x, parent_row as f32 * row_height),
            end: (parent_x, first_child_row as f32 * row_height),
            parent_row,
            child_row: None,
        });

        for (child_row, entry) in children {
            let child_y = child_row as f32 * row_height;
            segments.push(ConnectorSegment {
                kind: ConnectorKind::Horizontal,
                start: (parent_x, child_y),
                end: (row_offset(entry.indent_level), child_y),
                parent_row,
                child_row: Some(child_row),
            });
        }
    }

    segments
}
