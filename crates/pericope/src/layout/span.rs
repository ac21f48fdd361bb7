//! Vertical extent of every node on the grid line.

use log::trace;

use pericope_core::{geometry::GridSpan, identifier::Id};

use crate::structure::{ConnectableNode, ConnectableTree, GridIndex, NodeIndex, StructureError};

/// Compute the span of every node, indexed like the arena.
///
/// A leaf spans its own coordinate. A relation spans from its first
/// associate's first coordinate to its last associate's last coordinate.
///
/// # Errors
///
/// Returns [`StructureError::AssociatesOutOfOrder`] when a relation's associates
/// overlap or are not in document order, [`StructureError::CrossingSpans`]
/// when two relation spans partially overlap, and
/// [`StructureError::EnclosedRelation`] when a relation lies inside another
/// that is not its ancestor.
pub(super) fn resolve(tree: &ConnectableTree) -> Result<Vec<GridSpan>, StructureError> {
    let mut spans: Vec<GridSpan> = Vec::with_capacity(tree.len());

    for (_, node) in tree.iter() {
        let span = match node {
            ConnectableNode::Leaf(leaf) => GridSpan::point(GridIndex::coordinate(leaf.position())),
            ConnectableNode::Relation(relation) => {
                let associate_spans: Vec<GridSpan> = relation
                    .associates()
                    .iter()
                    .map(|associate| spans[associate.node().index()])
                    .collect();

                let ordered = associate_spans
                    .windows(2)
                    .all(|pair| pair[0].last() < pair[1].first());
                if !ordered {
                    return Err(StructureError::AssociatesOutOfOrder {
                        relation: node.id(),
                    });
                }

                match (associate_spans.first(), associate_spans.last()) {
                    (Some(first), Some(last)) => GridSpan::new(first.first(), last.last()),
                    _ => {
                        return Err(StructureError::TooFewAssociates {
                            relation: node.id(),
                            count: 0,
                        });
                    }
                }
            }
        };
        spans.push(span);
    }

    check_laminar(tree, &spans)?;
    trace!(spans:?; "Spans resolved");

    Ok(spans)
}

/// Reject relation spans that do not form the tree's own nesting.
///
/// Sorting by start ascending and end descending turns the check into a single
/// sweep with a stack of currently open spans. In a well-formed forest the
/// innermost open span around a relation is always its parent, so any other
/// enclosing relation means the spans nest where the tree does not.
fn check_laminar(tree: &ConnectableTree, spans: &[GridSpan]) -> Result<(), StructureError> {
    let mut relation_spans: Vec<(GridSpan, NodeIndex)> = tree
        .iter()
        .filter(|(_, node)| matches!(node, ConnectableNode::Relation(_)))
        .map(|(index, _)| (spans[index.index()], index))
        .collect();

    relation_spans.sort_by(|(a, _), (b, _)| {
        a.first()
            .total_cmp(&b.first())
            .then_with(|| b.last().total_cmp(&a.last()))
    });

    let mut open: Vec<(GridSpan, NodeIndex)> = Vec::new();
    for (span, index) in relation_spans {
        while open.last().is_some_and(|(top, _)| top.last() < span.first()) {
            open.pop();
        }

        if let Some(&(top, top_index)) = open.last() {
            if !top.contains_span(span) {
                return Err(StructureError::CrossingSpans {
                    first: tree.node(top_index).id(),
                    second: tree.node(index).id(),
                });
            }
            if tree.parent(index) != Some(top_index) {
                return Err(StructureError::EnclosedRelation {
                    outer: tree.node(top_index).id(),
                    inner: tree.node(index).id(),
                });
            }
        }

        open.push((span, index));
    }

    Ok(())
}
