//! Grid coordinates for leaf propositions.

use std::collections::HashMap;

use pericope_core::{identifier::Id, semantic::Proposition};

use super::StructureError;

/// Maps each proposition to its position on the grid line.
///
/// Proposition `i` connects at `i + 0.5`, the center of its grid cell, so
/// coordinates are unique and strictly increasing in document order.
#[derive(Debug, Default)]
pub struct GridIndex {
    positions: HashMap<Id, usize>,
}

impl GridIndex {
    /// Index the given propositions in document order.
    ///
    /// # Errors
    ///
    /// Returns [`StructureError::DuplicateId`] if two propositions share an id.
    pub fn new(propositions: &[Proposition]) -> Result<Self, StructureError> {
        let mut positions = HashMap::with_capacity(propositions.len());
        for (index, proposition) in propositions.iter().enumerate() {
            if positions.insert(proposition.id(), index).is_some() {
                return Err(StructureError::DuplicateId(proposition.id()));
            }
        }
        Ok(Self { positions })
    }

    /// Returns the zero-based rank of a proposition, if it is indexed.
    pub fn position(&self, id: Id) -> Option<usize> {
        self.positions.get(&id).copied()
    }

    /// Number of indexed propositions.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Grid coordinate of the leaf at `index`.
    pub fn coordinate(index: usize) -> f32 {
        index as f32 + 0.5
    }
}
