//! Relation tree structures built from an annotation snapshot.
//!
//! This module turns a flat [`Snapshot`](pericope_core::semantic::Snapshot), where
//! associates reference their nodes by id, into a [`ConnectableTree`]: an arena
//! of [`ConnectableNode`]s addressed by [`NodeIndex`].
//!
//! The arena is ordered children-first. Leaves occupy the first slots in
//! document order, followed by relations in post-order. Every bottom-up layout
//! stage is therefore a single forward pass over the arena.
//!
//! Building the tree is where malformed input is rejected. Every precondition
//! violation is reported as a [`StructureError`].

mod grid;
mod tree;

pub use grid::GridIndex;
pub use tree::{ConnectableNode, ConnectableTree, NodeIndex};

use thiserror::Error;

use pericope_core::identifier::Id;

/// A snapshot that cannot be laid out.
///
/// These indicate an invariant violation in the annotation model, not a
/// user-facing input problem.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StructureError {
    #[error("node id `{0}` is used more than once")]
    DuplicateId(Id),

    #[error("relation `{relation}` has {count} associate(s); at least two are required")]
    TooFewAssociates { relation: Id, count: usize },

    #[error("relation `{relation}` references unknown node `{node}`")]
    UnknownNode { relation: Id, node: Id },

    #[error("relation `{relation}` lists node `{node}` more than once")]
    DuplicateAssociate { relation: Id, node: Id },

    #[error("node `{node}` is an associate of both `{first}` and `{second}`")]
    MultipleParents { node: Id, first: Id, second: Id },

    #[error("relation `{0}` is part of a containment cycle")]
    Cycle(Id),

    #[error("associates of relation `{relation}` are not disjoint and in document order")]
    AssociatesOutOfOrder { relation: Id },

    #[error("spans of relations `{first}` and `{second}` cross")]
    CrossingSpans { first: Id, second: Id },

    #[error("relation `{inner}` lies inside `{outer}` but is not one of its descendants")]
    EnclosedRelation { outer: Id, inner: Id },
}
