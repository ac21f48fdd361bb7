//! Node identifiers backed by a global string interner.
//!
//! Propositions and relations are referenced by [`Id`]. Ids are `Copy`, cheap
//! to hash, and compare by interned symbol, so the layout arena can key its
//! output maps by them without cloning strings.

use std::{
    fmt,
    sync::{Mutex, OnceLock, PoisonError},
};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use string_interner::{DefaultStringInterner, DefaultSymbol};

static INTERNER: OnceLock<Mutex<DefaultStringInterner>> = OnceLock::new();

/// Runs `f` with exclusive access to the global interner.
///
/// A poisoned lock is recovered: the interner is append-only, so a panic in
/// another thread cannot leave it half-updated.
fn with_interner<R>(f: impl FnOnce(&mut DefaultStringInterner) -> R) -> R {
    let mut interner = INTERNER
        .get_or_init(|| Mutex::new(DefaultStringInterner::new()))
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    f(&mut interner)
}

/// Interned identifier of a proposition or relation.
///
/// # Examples
///
/// ```
/// use pericope_core::identifier::Id;
///
/// let head = Id::new("p1");
/// let relation = Id::from_anonymous(3);
///
/// assert_eq!(head, "p1");
/// assert_eq!(relation, "__relation_3");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Id(DefaultSymbol);

impl Id {
    /// Interns `name` and returns its identifier.
    pub fn new(name: &str) -> Self {
        Self(with_interner(|interner| interner.get_or_intern(name)))
    }

    /// Creates an identifier for a relation the host did not name.
    ///
    /// # Arguments
    ///
    /// * `idx` - Position of the relation in its snapshot.
    pub fn from_anonymous(idx: usize) -> Self {
        Self::new(&format!("__relation_{idx}"))
    }

    /// Returns the interned string behind this identifier.
    pub fn as_string(self) -> String {
        with_interner(|interner| interner.resolve(self.0).unwrap_or_default().to_string())
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_string())
    }
}

impl From<&str> for Id {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl PartialEq<str> for Id {
    fn eq(&self, other: &str) -> bool {
        with_interner(|interner| interner.resolve(self.0) == Some(other))
    }
}

impl PartialEq<&str> for Id {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl Serialize for Id {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.as_string())
    }
}

impl<'de> Deserialize<'de> for Id {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Self::new(&name))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn test_new_interns_equal_names() {
        let id1 = Id::new("p1");
        let id2 = Id::new("p1");
        let id3 = Id::new("p2");

        assert_eq!(id1, id2);
        assert_ne!(id1, id3);
        assert_eq!(id1, "p1");
    }

    #[test]
    fn test_from_anonymous() {
        let id1 = Id::from_anonymous(0);
        let id2 = Id::from_anonymous(1);

        assert_ne!(id1, id2);
        assert_eq!(id1, Id::from_anonymous(0));
        assert_eq!(id2, "__relation_1");
    }

    #[test]
    fn test_display() {
        let id = Id::new("cause");
        assert_eq!(format!("{id}"), "cause");
    }

    #[test]
    fn test_partial_eq_str() {
        let id = Id::new("condition");

        assert!(id == "condition");
        assert!(id != "concession");

        let slice: &str = "condition";
        assert!(id == slice);

        let empty = Id::new("");
        assert!(empty == "");
    }

    #[test]
    fn test_hash_and_eq() {
        let mut map = HashMap::new();
        map.insert(Id::new("r1"), 1);
        map.insert(Id::new("r2"), 2);

        assert_eq!(map.get(&Id::new("r1")), Some(&1));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_serde_uses_plain_strings() {
        #[derive(Serialize, Deserialize)]
        struct Wrapper {
            id: Id,
        }

        let parsed: Wrapper = toml::from_str(r#"id = "p7""#).expect("valid toml");
        assert_eq!(parsed.id, "p7");

        let written = toml::to_string(&parsed).expect("serializable");
        assert_eq!(written.trim(), r#"id = "p7""#);
    }
}
