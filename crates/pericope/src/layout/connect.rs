//! Connect coordinates: where each node attaches to its parent's connector.

use log::trace;

use crate::structure::{ConnectableNode, ConnectableTree, GridIndex, StructureError};

/// One associate as seen by the connect rule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    connect_y: f32,
    high_weight: bool,
}

impl Anchor {
    pub fn new(connect_y: f32, high_weight: bool) -> Self {
        Self {
            connect_y,
            high_weight,
        }
    }
}

/// Connect coordinate of a relation with the given associates.
///
/// When every associate has the same weight class the relation is a
/// coordination and connects at the rounded midpoint between its first and last
/// associate (halves round away from zero). Otherwise it connects at its head:
/// the first associate if that one is high weight, else the first associate
/// whose weight differs from it.
///
/// Returns `None` for an empty slice. Relations always have at least two
/// associates, so the result is never absent during a layout pass.
///
/// # Examples
///
/// ```
/// use pericope::layout::{Anchor, connect_point};
///
/// let modifier_head_modifier = [
///     Anchor::new(0.5, false),
///     Anchor::new(1.5, true),
///     Anchor::new(2.5, false),
/// ];
/// assert_eq!(connect_point(&modifier_head_modifier), Some(1.5));
///
/// let coordination = [Anchor::new(2.5, true), Anchor::new(4.5, true)];
/// assert_eq!(connect_point(&coordination), Some(4.0));
/// ```
pub fn connect_point(associates: &[Anchor]) -> Option<f32> {
    let first = associates.first()?;
    let last = associates.last()?;

    let connect_y = match associates
        .iter()
        .find(|anchor| anchor.high_weight != first.high_weight)
    {
        None => ((first.connect_y + last.connect_y) / 2.0).round(),
        Some(_) if first.high_weight => first.connect_y,
        Some(head) => head.connect_y,
    };

    Some(connect_y)
}

/// Compute the connect coordinate of every node, indexed like the arena.
///
/// # Errors
///
/// Returns [`StructureError::TooFewAssociates`] if a relation has no associates.
pub(super) fn resolve(tree: &ConnectableTree) -> Result<Vec<f32>, StructureError> {
    let mut connects: Vec<f32> = Vec::with_capacity(tree.len());

    for (_, node) in tree.iter() {
        let connect_y = match node {
            ConnectableNode::Leaf(leaf) => GridIndex::coordinate(leaf.position()),
            ConnectableNode::Relation(relation) => {
                let anchors: Vec<Anchor> = relation
                    .associates()
                    .iter()
                    .map(|associate| {
                        Anchor::new(
                            connects[associate.node().index()],
                            associate.role().is_high_weight(),
                        )
                    })
                    .collect();

                connect_point(&anchors).ok_or(StructureError::TooFewAssociates {
                    relation: node.id(),
                    count: anchors.len(),
                })?
            }
        };
        connects.push(connect_y);
    }

    trace!(connects:?; "Connect points resolved");
    Ok(connects)
}
