//! Arena of connectable nodes.

use std::collections::{HashMap, HashSet};

use log::debug;

use pericope_core::{
    identifier::Id,
    semantic::{self, AssociateRole, Proposition, Snapshot},
};

use super::{GridIndex, StructureError};

// =============================================================================
// Node types
// =============================================================================

/// Position of a node in its [`ConnectableTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIndex(usize);

impl NodeIndex {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A proposition placed on the grid.
#[derive(Debug, Clone, Copy)]
pub struct LeafNode<'a> {
    proposition: &'a Proposition,
    position: usize,
}

impl<'a> LeafNode<'a> {
    pub fn proposition(&self) -> &'a Proposition {
        self.proposition
    }

    /// Zero-based rank in the leaf sequence.
    pub fn position(&self) -> usize {
        self.position
    }
}

/// An associate with its node reference resolved into the arena.
#[derive(Debug, Clone, Copy)]
pub struct AssociateRef<'a> {
    node: NodeIndex,
    role: &'a AssociateRole,
}

impl<'a> AssociateRef<'a> {
    pub fn node(&self) -> NodeIndex {
        self.node
    }

    pub fn role(&self) -> &'a AssociateRole {
        self.role
    }
}

/// A relation whose associates all precede it in the arena.
#[derive(Debug, Clone)]
pub struct RelationNode<'a> {
    relation: &'a semantic::Relation,
    associates: Vec<AssociateRef<'a>>,
    depth: usize,
}

impl<'a> RelationNode<'a> {
    pub fn relation(&self) -> &'a semantic::Relation {
        self.relation
    }

    /// Associates in document order; never fewer than two.
    pub fn associates(&self) -> &[AssociateRef<'a>] {
        &self.associates
    }
}

/// The polymorphic layout unit.
#[derive(Debug, Clone)]
pub enum ConnectableNode<'a> {
    Leaf(LeafNode<'a>),
    Relation(RelationNode<'a>),
}

impl ConnectableNode<'_> {
    pub fn id(&self) -> Id {
        match self {
            Self::Leaf(leaf) => leaf.proposition.id(),
            Self::Relation(relation) => relation.relation.id(),
        }
    }

    /// Zero for leaves; one more than the deepest relation associate otherwise.
    pub fn depth(&self) -> usize {
        match self {
            Self::Leaf(_) => 0,
            Self::Relation(relation) => relation.depth,
        }
    }
}

// =============================================================================
// Tree
// =============================================================================

/// Relation forest over the leaf sequence, stored children-first.
#[derive(Debug)]
pub struct ConnectableTree<'a> {
    nodes: Vec<ConnectableNode<'a>>,
    parents: Vec<Option<NodeIndex>>,
    leaf_count: usize,
}

impl<'a> ConnectableTree<'a> {
    /// Resolve a snapshot into a tree.
    ///
    /// # Errors
    ///
    /// Returns a [`StructureError`] for duplicate ids, relations with fewer than
    /// two associates, unknown references, nodes with several parents, and
    /// containment cycles. Span ordering is checked later by the span resolver.
    pub fn build(snapshot: &'a Snapshot) -> Result<Self, StructureError> {
        let grid = GridIndex::new(snapshot.propositions())?;
        let relations = index_relations(snapshot, &grid)?;
        let parent_of = assign_parents(snapshot, &grid, &relations)?;

        let mut builder = TreeBuilder {
            grid: &grid,
            relations: &relations,
            nodes: Vec::with_capacity(snapshot.propositions().len() + relations.len()),
            placed: HashSet::with_capacity(relations.len()),
        };

        for (position, proposition) in snapshot.propositions().iter().enumerate() {
            builder.nodes.push(ConnectableNode::Leaf(LeafNode {
                proposition,
                position,
            }));
        }

        for relation in snapshot.relations() {
            if !parent_of.contains_key(&relation.id()) {
                builder.push_relation(relation)?;
            }
        }

        // Relations unreachable from a root only have parents inside a cycle.
        if let Some(relation) = snapshot
            .relations()
            .iter()
            .find(|relation| !builder.placed.contains(&relation.id()))
        {
            return Err(StructureError::Cycle(relation.id()));
        }

        let nodes = builder.nodes;
        let mut parents = vec![None; nodes.len()];
        for (index, node) in nodes.iter().enumerate() {
            if let ConnectableNode::Relation(relation) = node {
                for associate in &relation.associates {
                    parents[associate.node.0] = Some(NodeIndex(index));
                }
            }
        }

        debug!(
            leaves = grid.len(),
            relations = relations.len();
            "Relation tree built"
        );

        Ok(Self {
            nodes,
            parents,
            leaf_count: grid.len(),
        })
    }

    /// Total number of nodes, leaves and relations.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn leaf_count(&self) -> usize {
        self.leaf_count
    }

    pub fn node(&self, index: NodeIndex) -> &ConnectableNode<'a> {
        &self.nodes[index.0]
    }

    /// Nodes in arena order: leaves, then relations children-first.
    pub fn iter(&self) -> impl Iterator<Item = (NodeIndex, &ConnectableNode<'a>)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (NodeIndex(index), node))
    }

    pub fn parent(&self, index: NodeIndex) -> Option<NodeIndex> {
        self.parents[index.0]
    }

    /// A relation without a parent is a forest root.
    pub fn is_root(&self, index: NodeIndex) -> bool {
        self.parents[index.0].is_none()
    }

    /// Depth of the deepest relation, or zero when there are none.
    pub fn max_depth(&self) -> usize {
        self.nodes.iter().map(ConnectableNode::depth).max().unwrap_or(0)
    }
}

struct TreeBuilder<'a, 'b> {
    grid: &'b GridIndex,
    relations: &'b HashMap<Id, &'a semantic::Relation>,
    nodes: Vec<ConnectableNode<'a>>,
    placed: HashSet<Id>,
}

/// A relation whose associates are still being resolved.
struct Frame<'a> {
    relation: &'a semantic::Relation,
    /// Role under which the relation attaches to the frame below it.
    role: Option<&'a AssociateRole>,
    cursor: usize,
    associates: Vec<AssociateRef<'a>>,
    child_depth: usize,
}

impl<'a> Frame<'a> {
    fn new(relation: &'a semantic::Relation, role: Option<&'a AssociateRole>) -> Self {
        Self {
            relation,
            role,
            cursor: 0,
            associates: Vec::with_capacity(relation.associates().len()),
            child_depth: 0,
        }
    }
}

impl<'a> TreeBuilder<'a, '_> {
    /// Push a root relation after all of its relation associates.
    ///
    /// Nested relations are resolved with an explicit stack, so nesting depth
    /// is bounded by memory rather than by the call stack.
    fn push_relation(&mut self, relation: &'a semantic::Relation) -> Result<(), StructureError> {
        let mut stack = vec![Frame::new(relation, None)];

        while let Some(frame) = stack.last_mut() {
            let current = frame.relation;

            if let Some(associate) = current.associates().get(frame.cursor) {
                frame.cursor += 1;
                match self.grid.position(associate.node()) {
                    Some(position) => frame.associates.push(AssociateRef {
                        node: NodeIndex(position),
                        role: associate.role(),
                    }),
                    None => {
                        let child = self.relations.get(&associate.node()).copied().ok_or(
                            StructureError::UnknownNode {
                                relation: current.id(),
                                node: associate.node(),
                            },
                        )?;
                        stack.push(Frame::new(child, Some(associate.role())));
                    }
                }
                continue;
            }

            let associates = std::mem::take(&mut frame.associates);
            let depth = frame.child_depth + 1;
            let role = frame.role;
            stack.pop();

            let index = NodeIndex(self.nodes.len());
            self.nodes.push(ConnectableNode::Relation(RelationNode {
                relation: current,
                associates,
                depth,
            }));
            self.placed.insert(current.id());

            if let (Some(parent), Some(role)) = (stack.last_mut(), role) {
                parent.associates.push(AssociateRef { node: index, role });
                parent.child_depth = parent.child_depth.max(depth);
            }
        }

        Ok(())
    }
}

fn index_relations<'a>(
    snapshot: &'a Snapshot,
    grid: &GridIndex,
) -> Result<HashMap<Id, &'a semantic::Relation>, StructureError> {
    let mut relations = HashMap::with_capacity(snapshot.relations().len());
    for relation in snapshot.relations() {
        let id = relation.id();
        if grid.position(id).is_some() || relations.insert(id, relation).is_some() {
            return Err(StructureError::DuplicateId(id));
        }
    }
    Ok(relations)
}

/// Validate associate lists and return each referenced node's parent relation.
fn assign_parents(
    snapshot: &Snapshot,
    grid: &GridIndex,
    relations: &HashMap<Id, &semantic::Relation>,
) -> Result<HashMap<Id, Id>, StructureError> {
    let mut parent_of = HashMap::new();

    for relation in snapshot.relations() {
        let count = relation.associates().len();
        if count < 2 {
            return Err(StructureError::TooFewAssociates {
                relation: relation.id(),
                count,
            });
        }

        for associate in relation.associates() {
            let node = associate.node();
            if grid.position(node).is_none() && !relations.contains_key(&node) {
                return Err(StructureError::UnknownNode {
                    relation: relation.id(),
                    node,
                });
            }

            if let Some(previous) = parent_of.insert(node, relation.id()) {
                return Err(if previous == relation.id() {
                    StructureError::DuplicateAssociate {
                        relation: relation.id(),
                        node,
                    }
                } else {
                    StructureError::MultipleParents {
                        node,
                        first: previous,
                        second: relation.id(),
                    }
                });
            }
        }
    }

    Ok(parent_of)
}

#[cfg(test)]
mod tests {
    use pericope_core::semantic::Associate;

    use super::*;

    fn propositions(count: usize) -> Vec<Proposition> {
        (0..count)
            .map(|i| Proposition::new(Id::new(&format!("p{i}")), format!("text {i}")))
            .collect()
    }

    fn relation(id: &str, members: &[(&str, bool)]) -> semantic::Relation {
        let associates = members
            .iter()
            .map(|(node, high)| Associate::new(Id::new(node), AssociateRole::new("Role", *high)))
            .collect();
        semantic::Relation::new(Id::new(id), associates)
    }

    #[test]
    fn test_arena_is_children_first() {
        // Outer relation listed before the inner one it contains.
        let snapshot = Snapshot::new(
            propositions(3),
            vec![
                relation("outer", &[("inner", true), ("p2", false)]),
                relation("inner", &[("p0", true), ("p1", false)]),
            ],
        );

        let tree = ConnectableTree::build(&snapshot).expect("valid tree");

        assert_eq!(tree.len(), 5);
        assert_eq!(tree.leaf_count(), 3);

        let ids: Vec<Id> = tree.iter().map(|(_, node)| node.id()).collect();
        assert_eq!(ids[3], Id::new("inner"));
        assert_eq!(ids[4], Id::new("outer"));

        let outer = NodeIndex(4);
        assert!(tree.is_root(outer));
        assert_eq!(tree.parent(NodeIndex(3)), Some(outer));
        assert_eq!(tree.parent(NodeIndex(0)), Some(NodeIndex(3)));
        assert_eq!(tree.parent(NodeIndex(2)), Some(outer));
    }

    #[test]
    fn test_deep_nesting_does_not_exhaust_the_call_stack() {
        const LEVELS: usize = 100_000;

        let mut relations = vec![relation("r0", &[("p0", true), ("p1", false)])];
        for level in 1..LEVELS {
            let inner = format!("r{}", level - 1);
            let leaf = format!("p{}", level + 1);
            relations.push(relation(
                &format!("r{level}"),
                &[(inner.as_str(), true), (leaf.as_str(), false)],
            ));
        }
        // Root first so the builder has to descend the whole chain.
        relations.reverse();
        let snapshot = Snapshot::new(propositions(LEVELS + 1), relations);

        let tree = ConnectableTree::build(&snapshot).expect("valid tree");

        assert_eq!(tree.len(), 2 * LEVELS + 1);
        assert_eq!(tree.max_depth(), LEVELS);

        let root = NodeIndex(tree.len() - 1);
        assert!(tree.is_root(root));
        let ConnectableNode::Relation(root_node) = tree.node(root) else {
            panic!("last node is a relation");
        };
        assert_eq!(root_node.associates()[0].node(), NodeIndex(tree.len() - 2));
        assert_eq!(root_node.associates()[1].node(), NodeIndex(LEVELS));
        assert!(root_node.associates()[0].role().is_high_weight());
    }

    #[test]
    fn test_depths() {
        let snapshot = Snapshot::new(
            propositions(4),
            vec![
                relation("a", &[("p0", true), ("p1", false)]),
                relation("b", &[("a", true), ("p2", false)]),
                relation("c", &[("b", true), ("p3", false)]),
            ],
        );

        let tree = ConnectableTree::build(&snapshot).expect("valid tree");
        let depths: Vec<usize> = tree.iter().map(|(_, node)| node.depth()).collect();

        assert_eq!(depths, vec![0, 0, 0, 0, 1, 2, 3]);
        assert_eq!(tree.max_depth(), 3);
    }

    #[test]
    fn test_depth_uses_deepest_relation_associate() {
        let snapshot = Snapshot::new(
            propositions(5),
            vec![
                relation("deep", &[("p0", true), ("shallow", false)]),
                relation("shallow", &[("p1", true), ("p2", false)]),
                relation("root", &[("deep", true), ("p3", false), ("p4", false)]),
            ],
        );

        let tree = ConnectableTree::build(&snapshot).expect("valid tree");
        let root = tree
            .iter()
            .find(|(_, node)| node.id() == "root")
            .map(|(_, node)| node.depth());

        assert_eq!(root, Some(3));
    }

    #[test]
    fn test_unrelated_propositions_are_roots() {
        let snapshot = Snapshot::new(propositions(2), vec![]);
        let tree = ConnectableTree::build(&snapshot).expect("valid tree");

        assert!(tree.is_root(NodeIndex(0)));
        assert!(tree.is_root(NodeIndex(1)));
        assert_eq!(tree.max_depth(), 0);
    }

    #[test]
    fn test_too_few_associates() {
        let snapshot = Snapshot::new(propositions(2), vec![relation("r", &[("p0", true)])]);

        let err = ConnectableTree::build(&snapshot).unwrap_err();
        assert_eq!(
            err,
            StructureError::TooFewAssociates {
                relation: Id::new("r"),
                count: 1
            }
        );
    }

    #[test]
    fn test_unknown_node() {
        let snapshot = Snapshot::new(
            propositions(1),
            vec![relation("r", &[("p0", true), ("ghost", false)])],
        );

        let err = ConnectableTree::build(&snapshot).unwrap_err();
        assert_eq!(
            err,
            StructureError::UnknownNode {
                relation: Id::new("r"),
                node: Id::new("ghost")
            }
        );
    }

    #[test]
    fn test_duplicate_relation_id() {
        let snapshot = Snapshot::new(
            propositions(3),
            vec![
                relation("r", &[("p0", true), ("p1", false)]),
                relation("p2", &[("r", true), ("p2", false)]),
            ],
        );

        let err = ConnectableTree::build(&snapshot).unwrap_err();
        assert_eq!(err, StructureError::DuplicateId(Id::new("p2")));
    }

    #[test]
    fn test_multiple_parents() {
        let snapshot = Snapshot::new(
            propositions(3),
            vec![
                relation("r1", &[("p0", true), ("p1", false)]),
                relation("r2", &[("p1", true), ("p2", false)]),
            ],
        );

        let err = ConnectableTree::build(&snapshot).unwrap_err();
        assert_eq!(
            err,
            StructureError::MultipleParents {
                node: Id::new("p1"),
                first: Id::new("r1"),
                second: Id::new("r2"),
            }
        );
    }

    #[test]
    fn test_duplicate_associate() {
        let snapshot = Snapshot::new(
            propositions(2),
            vec![relation("r", &[("p0", true), ("p0", false)])],
        );

        let err = ConnectableTree::build(&snapshot).unwrap_err();
        assert_eq!(
            err,
            StructureError::DuplicateAssociate {
                relation: Id::new("r"),
                node: Id::new("p0")
            }
        );
    }

    #[test]
    fn test_cycle_detected() {
        let snapshot = Snapshot::new(
            propositions(2),
            vec![
                relation("a", &[("b", true), ("p0", false)]),
                relation("b", &[("a", true), ("p1", false)]),
            ],
        );

        let err = ConnectableTree::build(&snapshot).unwrap_err();
        assert_eq!(err, StructureError::Cycle(Id::new("a")));
    }

    #[test]
    fn test_self_containment_is_a_cycle() {
        let snapshot = Snapshot::new(
            propositions(1),
            vec![relation("loop", &[("loop", true), ("p0", false)])],
        );

        let err = ConnectableTree::build(&snapshot).unwrap_err();
        assert_eq!(err, StructureError::Cycle(Id::new("loop")));
    }
}
