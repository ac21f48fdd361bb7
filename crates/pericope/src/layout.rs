//! Connector layout pass.
//!
//! A pass turns a [`Snapshot`] into a [`Layout`] in fixed stages:
//!
//! ```text
//! Snapshot
//!     ↓ structure     arena tree, children-first
//!     ↓ span          [first_grid_y, last_grid_y] per node, laminarity check
//!     ↓ connect       connect_y per node (weight tie-break rule)
//!     ↓ labels        per-relation role label deduplication
//!     ↓ footprint     horizontal width per node
//!     ↓ columns       horizontal offset per node
//!     ↓ connector     segments, labels and selection control per relation
//! Layout
//! ```
//!
//! Every stage is a pure function of the tree and the earlier stages' output,
//! so two passes over the same snapshot produce identical layouts.

mod columns;
mod connect;
mod connector;
mod footprint;
mod labels;
mod span;

pub use connect::{Anchor, connect_point};
pub use connector::{ConnectorSegment, Connectors, LabelPlacement, SegmentKind, SelectionControl};
pub use labels::deduplicate_labels;

use std::{collections::BTreeSet, fmt, rc::Rc};

use indexmap::IndexMap;
use log::{debug, info, trace};
use serde::Serialize;

use pericope_core::{
    geometry::{GridSpan, Size},
    identifier::Id,
    semantic::Snapshot,
    style::{StylePolicy, TextDirection},
};

use crate::{
    error::PericopeError,
    structure::{ConnectableNode, ConnectableTree},
    text::{MonospaceMeasure, TextMeasure},
};
use connector::{AssociateLine, ConnectorEmitter, RelationGeometry};
use footprint::FootprintCalculator;

// =============================================================================
// Resolved geometry
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeKind {
    Leaf,
    Relation,
}

/// Resolved geometry of one node, in grid units.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeLayout {
    kind: NodeKind,
    span: GridSpan,
    connect_y: f32,
    depth: usize,
    footprint_width: f32,
    x_offset: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    parent: Option<Id>,
}

impl NodeLayout {
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn span(&self) -> GridSpan {
        self.span
    }

    pub fn first_grid_y(&self) -> f32 {
        self.span.first()
    }

    pub fn last_grid_y(&self) -> f32 {
        self.span.last()
    }

    /// Coordinate at which this node attaches to its parent's connector.
    pub fn connect_y(&self) -> f32 {
        self.connect_y
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn footprint_width(&self) -> f32 {
        self.footprint_width
    }

    /// Left edge of this node's column.
    pub fn x_offset(&self) -> f32 {
        self.x_offset
    }

    pub fn parent(&self) -> Option<Id> {
        self.parent
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// Drawing instructions for one relation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelationLayout {
    #[serde(skip_serializing_if = "Option::is_none")]
    comment: Option<String>,
    folded: bool,
    roles: Vec<String>,
    connectors: Connectors,
}

impl RelationLayout {
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// Whether role labels are hidden at this relation's depth.
    pub fn is_folded(&self) -> bool {
        self.folded
    }

    /// Deduplicated role labels in associate order, whether or not they are shown.
    pub fn roles(&self) -> &[String] {
        &self.roles
    }

    pub fn connectors(&self) -> &Connectors {
        &self.connectors
    }
}

/// Result of one layout pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    grid_height: usize,
    pixels_per_grid_unit: f32,
    columns: Vec<f32>,
    nodes: IndexMap<Id, NodeLayout>,
    relations: IndexMap<Id, RelationLayout>,
}

impl Layout {
    /// Number of leaf rows on the grid line.
    pub fn grid_height(&self) -> usize {
        self.grid_height
    }

    /// Scale the connector positions were emitted with.
    pub fn pixels_per_grid_unit(&self) -> f32 {
        self.pixels_per_grid_unit
    }

    /// Column widths indexed by depth; index zero is the text column.
    pub fn columns(&self) -> &[f32] {
        &self.columns
    }

    /// Sum of all column widths.
    pub fn total_width(&self) -> f32 {
        self.columns.iter().sum()
    }

    pub fn node(&self, id: Id) -> Option<&NodeLayout> {
        self.nodes.get(&id)
    }

    pub fn relation(&self, id: Id) -> Option<&RelationLayout> {
        self.relations.get(&id)
    }

    /// Nodes in layout order: leaves first, then relations children-first.
    pub fn nodes(&self) -> impl Iterator<Item = (Id, &NodeLayout)> {
        self.nodes.iter().map(|(id, node)| (*id, node))
    }

    pub fn relations(&self) -> impl Iterator<Item = (Id, &RelationLayout)> {
        self.relations.iter().map(|(id, relation)| (*id, relation))
    }
}

// =============================================================================
// Engine
// =============================================================================

/// Builder for configuring and running layout passes.
///
/// # Examples
///
/// ```
/// use pericope::layout::EngineBuilder;
/// use pericope_core::{
///     identifier::Id,
///     semantic::{Associate, AssociateRole, Proposition, Relation, Snapshot},
/// };
///
/// let snapshot = Snapshot::new(
///     vec![
///         Proposition::new(Id::new("p0"), "It rained"),
///         Proposition::new(Id::new("p1"), "so we stayed home"),
///     ],
///     vec![Relation::new(
///         Id::new("r"),
///         vec![
///             Associate::new(Id::new("p0"), AssociateRole::modifier("Cause")),
///             Associate::new(Id::new("p1"), AssociateRole::head("Effect")),
///         ],
///     )],
/// );
///
/// let layout = EngineBuilder::new()
///     .with_pixels_per_grid_unit(1.0)
///     .build(&snapshot)
///     .expect("valid snapshot");
///
/// assert_eq!(layout.node(Id::new("r")).map(|node| node.connect_y()), Some(1.5));
/// ```
#[derive(Clone)]
pub struct EngineBuilder {
    margin: f32,
    selection_control: Size,
    label_padding: f32,
    label_height: f32,
    pixels_per_grid_unit: f32,
    direction: TextDirection,
    style: StylePolicy,
    folded_depths: BTreeSet<usize>,
    measure: Rc<dyn TextMeasure>,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self {
            margin: 10.0,
            selection_control: Size::new(14.0, 14.0),
            label_padding: 3.0,
            label_height: 14.0,
            pixels_per_grid_unit: 24.0,
            direction: TextDirection::default(),
            style: StylePolicy::default(),
            folded_depths: BTreeSet::new(),
            measure: Rc::new(MonospaceMeasure::default()),
        }
    }
}

impl fmt::Debug for EngineBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineBuilder")
            .field("margin", &self.margin)
            .field("selection_control", &self.selection_control)
            .field("label_padding", &self.label_padding)
            .field("label_height", &self.label_height)
            .field("pixels_per_grid_unit", &self.pixels_per_grid_unit)
            .field("direction", &self.direction)
            .field("style", &self.style)
            .field("folded_depths", &self.folded_depths)
            .finish_non_exhaustive()
    }
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fixed horizontal margin added to every relation footprint.
    pub fn with_margin(mut self, margin: f32) -> Self {
        self.margin = margin;
        self
    }

    /// Size of the selection control shown on root relations.
    pub fn with_selection_control(mut self, size: Size) -> Self {
        self.selection_control = size;
        self
    }

    /// Horizontal padding on each side of a bordered role label.
    pub fn with_label_padding(mut self, padding: f32) -> Self {
        self.label_padding = padding;
        self
    }

    /// Vertical extent of a role label in output units.
    pub fn with_label_height(mut self, height: f32) -> Self {
        self.label_height = height;
        self
    }

    /// Scale applied to vertical connector positions. `1.0` keeps grid units.
    pub fn with_pixels_per_grid_unit(mut self, scale: f32) -> Self {
        self.pixels_per_grid_unit = scale;
        self
    }

    pub fn with_direction(mut self, direction: TextDirection) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_style(mut self, style: StylePolicy) -> Self {
        self.style = style;
        self
    }

    /// Depths whose role labels are hidden.
    pub fn with_folded_depths(mut self, depths: impl IntoIterator<Item = usize>) -> Self {
        self.folded_depths = depths.into_iter().collect();
        self
    }

    pub fn with_measure(mut self, measure: Rc<dyn TextMeasure>) -> Self {
        self.measure = measure;
        self
    }

    fn is_folded(&self, depth: usize) -> bool {
        self.folded_depths.contains(&depth)
    }

    fn validate(&self) -> Result<(), PericopeError> {
        let non_negative = |value: f32| value.is_finite() && value >= 0.0;

        if !(self.pixels_per_grid_unit.is_finite() && self.pixels_per_grid_unit > 0.0) {
            return Err(PericopeError::Layout(format!(
                "pixels per grid unit must be positive, got {}",
                self.pixels_per_grid_unit
            )));
        }
        if !non_negative(self.margin)
            || !non_negative(self.label_padding)
            || !non_negative(self.label_height)
        {
            return Err(PericopeError::Layout(
                "margin, label padding and label height must be non-negative".to_string(),
            ));
        }
        if !self.selection_control.is_valid() {
            return Err(PericopeError::Layout(format!(
                "invalid selection control size {:?}",
                self.selection_control
            )));
        }
        Ok(())
    }

    /// Run a full layout pass over `snapshot`.
    ///
    /// # Errors
    ///
    /// Returns [`PericopeError::Structure`] when the snapshot is not a
    /// well-formed laminar relation forest, and [`PericopeError::Layout`] when
    /// the engine parameters are invalid. No partial layout is produced.
    pub fn build(&self, snapshot: &Snapshot) -> Result<Layout, PericopeError> {
        self.validate()?;

        info!(
            propositions = snapshot.propositions().len(),
            relations = snapshot.relations().len();
            "Laying out relations"
        );

        let tree = ConnectableTree::build(snapshot)?;
        let spans = span::resolve(&tree)?;
        let connects = connect::resolve(&tree)?;
        debug!("Spans and connect points resolved");

        let calculator = FootprintCalculator::new(
            self.margin,
            self.selection_control.width(),
            self.label_padding,
            self.style.label_border(),
            self.measure.as_ref(),
        );

        let roles: Vec<Vec<String>> = tree
            .iter()
            .map(|(_, node)| match node {
                ConnectableNode::Leaf(_) => Vec::new(),
                ConnectableNode::Relation(relation) => {
                    let labels: Vec<&str> = relation
                        .associates()
                        .iter()
                        .map(|associate| associate.role().label())
                        .collect();
                    deduplicate_labels(&labels)
                }
            })
            .collect();

        let footprints: Vec<f32> = tree
            .iter()
            .map(|(index, node)| match node {
                ConnectableNode::Leaf(leaf) => calculator.leaf(leaf.proposition()),
                ConnectableNode::Relation(_) => calculator.relation(
                    &roles[index.index()],
                    tree.is_root(index),
                    self.is_folded(node.depth()),
                ),
            })
            .collect();
        debug!("Footprints calculated");

        let columns = columns::place(&tree, &footprints, self.direction);

        let emitter = ConnectorEmitter::new(
            self.pixels_per_grid_unit,
            self.direction,
            self.style,
            self.selection_control,
            self.label_height,
        );

        let mut nodes = IndexMap::with_capacity(tree.len());
        let mut relations = IndexMap::new();

        for (index, node) in tree.iter() {
            let slot = index.index();
            debug_assert!(
                spans[slot].contains(connects[slot]),
                "connect point {} outside span {:?}",
                connects[slot],
                spans[slot]
            );

            let kind = match node {
                ConnectableNode::Leaf(_) => NodeKind::Leaf,
                ConnectableNode::Relation(_) => NodeKind::Relation,
            };
            nodes.insert(
                node.id(),
                NodeLayout {
                    kind,
                    span: spans[slot],
                    connect_y: connects[slot],
                    depth: node.depth(),
                    footprint_width: footprints[slot],
                    x_offset: columns.offsets[slot],
                    parent: tree.parent(index).map(|parent| tree.node(parent).id()),
                },
            );

            let ConnectableNode::Relation(relation) = node else {
                continue;
            };

            let folded = self.is_folded(node.depth());
            let associates: Vec<AssociateLine> = relation
                .associates()
                .iter()
                .map(|associate| AssociateLine {
                    connect_y: connects[associate.node().index()],
                    reach: columns.outer_edge(&tree, associate.node(), self.direction)
                        - columns.offsets[slot],
                })
                .collect();
            let rendered: Vec<(String, f32)> = roles[slot]
                .iter()
                .map(|label| (label.clone(), calculator.label_width(label)))
                .collect();

            let connectors = emitter.emit(&RelationGeometry {
                span: spans[slot],
                connect_y: connects[slot],
                width: footprints[slot],
                is_root: tree.is_root(index),
                associates: &associates,
                labels: (!folded).then_some(rendered.as_slice()),
            });

            relations.insert(
                node.id(),
                RelationLayout {
                    comment: relation.relation().comment().map(str::to_string),
                    folded,
                    roles: roles[slot].clone(),
                    connectors,
                },
            );
        }

        let layout = Layout {
            grid_height: tree.leaf_count(),
            pixels_per_grid_unit: self.pixels_per_grid_unit,
            columns: columns.widths,
            nodes,
            relations,
        };

        info!(
            nodes = layout.nodes.len(),
            relations = layout.relations.len();
            "Layout calculated"
        );
        trace!(layout:?; "Resolved layout");

        Ok(layout)
    }
}
