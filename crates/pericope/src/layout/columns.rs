//! Horizontal placement of nodes in depth columns.
//!
//! Every depth gets one column as wide as its widest node. Leaves form the
//! text column (depth zero). Relations of depth one sit next to the text, and
//! each further depth sits one column farther away from it.

use pericope_core::style::TextDirection;

use crate::structure::{ConnectableTree, NodeIndex};

/// Column widths indexed by depth, and each node's horizontal offset.
pub(super) struct ColumnPlacement {
    pub(super) widths: Vec<f32>,
    pub(super) offsets: Vec<f32>,
}

pub(super) fn place(
    tree: &ConnectableTree,
    footprints: &[f32],
    direction: TextDirection,
) -> ColumnPlacement {
    let mut widths = vec![0.0_f32; tree.max_depth() + 1];
    for (index, node) in tree.iter() {
        let column = &mut widths[node.depth()];
        *column = column.max(footprints[index.index()]);
    }

    // Offset of the left edge of every column.
    let mut starts = vec![0.0_f32; widths.len()];
    let mut x = 0.0;
    match direction {
        TextDirection::LeftToRight => {
            for depth in (0..widths.len()).rev() {
                starts[depth] = x;
                x += widths[depth];
            }
        }
        TextDirection::RightToLeft => {
            for depth in 0..widths.len() {
                starts[depth] = x;
                x += widths[depth];
            }
        }
    }

    let offsets = tree.iter().map(|(_, node)| starts[node.depth()]).collect();

    ColumnPlacement { widths, offsets }
}

impl ColumnPlacement {
    /// Edge of the node's column that faces away from the text, where a
    /// parent's horizontal line ends.
    pub(super) fn outer_edge(
        &self,
        tree: &ConnectableTree,
        index: NodeIndex,
        direction: TextDirection,
    ) -> f32 {
        let offset = self.offsets[index.index()];
        match direction {
            TextDirection::LeftToRight => offset,
            TextDirection::RightToLeft => offset + self.widths[tree.node(index).depth()],
        }
    }
}
