//! Snapshot of the annotation model consumed by a layout pass.
//!
//! The host owns propositions and relations and hands the layout engine a
//! read-only [`Snapshot`] on every change. Associates reference their nodes by
//! [`Id`]; resolving those references into a tree is the layout crate's job.
//!
//! # Snapshot Format
//!
//! Snapshots deserialize from any serde format. In TOML:
//!
//! ```toml
//! [[propositions]]
//! id = "p1"
//! text = "The rain fell"
//!
//! [[propositions]]
//! id = "p2"
//! text = "so the river rose"
//!
//! [[relations]]
//! id = "r1"
//! comment = "weather"
//! associates = [
//!     { node = "p1", role = "Cause", high_weight = false },
//!     { node = "p2", role = "Effect", high_weight = true },
//! ]
//! ```
//!
//! Relations without an `id` receive an anonymous one based on their position.

use serde::Deserialize;

use crate::identifier::Id;

/// A leaf text unit. Its index is its position in [`Snapshot::propositions`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Proposition {
    id: Id,
    #[serde(default)]
    text: String,
    /// Intrinsic cell width supplied by the host, overriding text measurement.
    #[serde(default)]
    width: Option<f32>,
}

impl Proposition {
    pub fn new(id: Id, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            width: None,
        }
    }

    /// Set the intrinsic cell width (builder style).
    pub fn with_width(mut self, width: f32) -> Self {
        self.width = Some(width);
        self
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn width(&self) -> Option<f32> {
        self.width
    }
}

/// The role an associate plays in its relation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssociateRole {
    label: String,
    high_weight: bool,
}

impl AssociateRole {
    pub fn new(label: impl Into<String>, high_weight: bool) -> Self {
        Self {
            label: label.into(),
            high_weight,
        }
    }

    /// A high-weight ("head") role.
    pub fn head(label: impl Into<String>) -> Self {
        Self::new(label, true)
    }

    /// A low-weight ("modifier") role.
    pub fn modifier(label: impl Into<String>) -> Self {
        Self::new(label, false)
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_high_weight(&self) -> bool {
        self.high_weight
    }
}

#[derive(Deserialize)]
struct AssociateEntry {
    node: Id,
    #[serde(default)]
    role: String,
    #[serde(default)]
    high_weight: bool,
}

/// One child of a relation: a node reference paired with its role.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "AssociateEntry")]
pub struct Associate {
    node: Id,
    role: AssociateRole,
}

impl From<AssociateEntry> for Associate {
    fn from(entry: AssociateEntry) -> Self {
        Self::new(entry.node, AssociateRole::new(entry.role, entry.high_weight))
    }
}

impl Associate {
    pub fn new(node: Id, role: AssociateRole) -> Self {
        Self { node, role }
    }

    /// Id of the proposition or relation this associate refers to.
    pub fn node(&self) -> Id {
        self.node
    }

    pub fn role(&self) -> &AssociateRole {
        &self.role
    }
}

/// A labeled grouping of two or more associates in document order.
#[derive(Debug, Clone, PartialEq)]
pub struct Relation {
    id: Id,
    associates: Vec<Associate>,
    comment: Option<String>,
}

impl Relation {
    pub fn new(id: Id, associates: Vec<Associate>) -> Self {
        Self {
            id,
            associates,
            comment: None,
        }
    }

    /// Attach a free-text comment (builder style).
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn associates(&self) -> &[Associate] {
        &self.associates
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }
}

#[derive(Deserialize)]
struct RelationEntry {
    #[serde(default)]
    id: Option<Id>,
    associates: Vec<Associate>,
    #[serde(default)]
    comment: Option<String>,
}

#[derive(Deserialize)]
struct SnapshotFile {
    #[serde(default)]
    propositions: Vec<Proposition>,
    #[serde(default)]
    relations: Vec<RelationEntry>,
}

impl From<SnapshotFile> for Snapshot {
    fn from(file: SnapshotFile) -> Self {
        let relations = file
            .relations
            .into_iter()
            .enumerate()
            .map(|(idx, entry)| Relation {
                id: entry.id.unwrap_or_else(|| Id::from_anonymous(idx)),
                associates: entry.associates,
                comment: entry.comment,
            })
            .collect();

        Self::new(file.propositions, relations)
    }
}

/// Read-only view of the annotation model for one layout pass.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "SnapshotFile")]
pub struct Snapshot {
    propositions: Vec<Proposition>,
    relations: Vec<Relation>,
}

impl Snapshot {
    /// Create a snapshot from propositions in document order and relations in any order.
    pub fn new(propositions: Vec<Proposition>, relations: Vec<Relation>) -> Self {
        Self {
            propositions,
            relations,
        }
    }

    pub fn propositions(&self) -> &[Proposition] {
        &self.propositions
    }

    pub fn relations(&self) -> &[Relation] {
        &self.relations
    }

    pub fn is_empty(&self) -> bool {
        self.propositions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_constructors() {
        let head = AssociateRole::head("Effect");
        let modifier = AssociateRole::modifier("Cause");

        assert!(head.is_high_weight());
        assert!(!modifier.is_high_weight());
        assert_eq!(modifier.label(), "Cause");
    }

    #[test]
    fn test_relation_builder() {
        let relation = Relation::new(
            Id::new("r1"),
            vec![
                Associate::new(Id::new("p1"), AssociateRole::head("Head")),
                Associate::new(Id::new("p2"), AssociateRole::modifier("Mod")),
            ],
        )
        .with_comment("note");

        assert_eq!(relation.associates().len(), 2);
        assert_eq!(relation.associates()[1].node(), "p2");
        assert_eq!(relation.comment(), Some("note"));
    }

    #[test]
    fn test_deserialize_snapshot() {
        let source = r#"
            [[propositions]]
            id = "p1"
            text = "first"

            [[propositions]]
            id = "p2"
            width = 40.0

            [[relations]]
            associates = [
                { node = "p1", role = "Head", high_weight = true },
                { node = "p2" },
            ]
        "#;

        let snapshot: Snapshot = toml::from_str(source).expect("valid snapshot");

        assert_eq!(snapshot.propositions().len(), 2);
        assert_eq!(snapshot.propositions()[0].text(), "first");
        assert_eq!(snapshot.propositions()[1].width(), Some(40.0));

        let relation = &snapshot.relations()[0];
        assert_eq!(relation.id(), Id::from_anonymous(0));
        assert!(relation.associates()[0].role().is_high_weight());
        assert_eq!(relation.associates()[1].role(), &AssociateRole::modifier(""));
        assert_eq!(relation.comment(), None);
    }

    #[test]
    fn test_empty_snapshot() {
        let snapshot: Snapshot = toml::from_str("").expect("empty document is valid");
        assert!(snapshot.is_empty());
        assert!(snapshot.relations().is_empty());
    }
}
