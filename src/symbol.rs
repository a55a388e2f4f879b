//! Core symbol types for the fact store.
//!
//! Entities and relations are identified by dense integer ids so that every
//! per-symbol table in the store is a plain vector indexed by id. Relations
//! are always allocated in forward/inverse pairs: id `2k` is the forward
//! relation and `2k + 1` its inverse, so inversion is a bit flip.

use serde::{Deserialize, Serialize};

/// Marker character toggled at the end of a relation name to form the name
/// of its inverse (`y:bornIn` ↔ `y:bornIn-`).
pub const INVERSE_MARKER: char = '-';

/// Dense identifier for an entity (a resource or a literal).
///
/// Ids start at 0 and are usable directly as vector indices.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[repr(transparent)]
pub struct EntityId(u32);

impl EntityId {
    /// Create an `EntityId` from a raw `u32`.
    pub fn new(raw: u32) -> Self {
        EntityId(raw)
    }

    /// Get the underlying `u32` value.
    pub fn get(self) -> u32 {
        self.0
    }

    /// The id as a vector index.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ent:{}", self.0)
    }
}

/// Dense identifier for a relation, allocated in forward/inverse pairs.
///
/// Ids 0 and 1 are reserved sentinels and never name a user relation. The
/// reservation is load-bearing: it keeps 0 out of the join-relation digit
/// alphabet, which is what makes the mixed-radix path code bijective.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[repr(transparent)]
pub struct RelationId(u32);

impl RelationId {
    /// The first id that can name a user relation (0 and 1 are reserved).
    pub const FIRST: u32 = 2;

    /// Create a `RelationId` from a raw `u32`.
    ///
    /// Returns `None` for the reserved sentinel ids 0 and 1.
    pub fn new(raw: u32) -> Option<Self> {
        (raw >= Self::FIRST).then_some(RelationId(raw))
    }

    pub(crate) fn from_raw(raw: u32) -> Self {
        RelationId(raw)
    }

    /// Get the underlying `u32` value.
    pub fn get(self) -> u32 {
        self.0
    }

    /// The id as a vector index.
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// The paired inverse relation. `r.inverse().inverse() == r`.
    pub fn inverse(self) -> RelationId {
        RelationId(self.0 ^ 1)
    }

    /// Whether this id names the inverse half of its pair.
    pub fn is_inverse(self) -> bool {
        self.0 & 1 == 1
    }
}

impl std::fmt::Display for RelationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "rel:{}", self.0)
    }
}

/// The canonical inverse of a relation name: toggles the trailing marker.
pub fn inverse_name(name: &str) -> String {
    match name.strip_suffix(INVERSE_MARKER) {
        Some(base) if !base.is_empty() => base.to_string(),
        _ => format!("{name}{INVERSE_MARKER}"),
    }
}

/// A stored fact. Subjects and objects are entities, predicates relations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fact {
    pub subject: EntityId,
    pub predicate: RelationId,
    pub object: EntityId,
}

impl Fact {
    pub fn new(subject: EntityId, predicate: RelationId, object: EntityId) -> Self {
        Self {
            subject,
            predicate,
            object,
        }
    }

    /// The materialized mirror of this fact.
    pub fn inverse(self) -> Fact {
        Fact {
            subject: self.object,
            predicate: self.predicate.inverse(),
            object: self.subject,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rel(raw: u32) -> RelationId {
        RelationId::new(raw).unwrap()
    }

    #[test]
    fn sentinel_ids_are_rejected() {
        assert!(RelationId::new(0).is_none());
        assert!(RelationId::new(1).is_none());
        assert_eq!(RelationId::new(2).unwrap().get(), 2);
    }

    #[test]
    fn inverse_is_involutive() {
        for raw in [2u32, 3, 10, 11, 4096] {
            let r = rel(raw);
            assert_eq!(r.inverse().inverse(), r);
            assert_ne!(r.is_inverse(), r.inverse().is_inverse());
        }
    }

    #[test]
    fn forward_ids_are_even() {
        assert!(!rel(2).is_inverse());
        assert!(rel(3).is_inverse());
        assert_eq!(rel(2).inverse(), rel(3));
        assert_eq!(rel(3).inverse(), rel(2));
    }

    #[test]
    fn inverse_name_toggles_marker() {
        assert_eq!(inverse_name("y:bornIn"), "y:bornIn-");
        assert_eq!(inverse_name("y:bornIn-"), "y:bornIn");
        assert_eq!(inverse_name(inverse_name("p").as_str()), "p");
    }

    #[test]
    fn bare_marker_is_a_forward_name() {
        // A name that is only the marker cannot strip to an empty base.
        assert_eq!(inverse_name("-"), "--");
    }

    #[test]
    fn fact_inverse_swaps_and_flips() {
        let f = Fact::new(EntityId::new(4), rel(2), EntityId::new(9));
        let inv = f.inverse();
        assert_eq!(inv.subject, EntityId::new(9));
        assert_eq!(inv.object, EntityId::new(4));
        assert_eq!(inv.predicate, rel(3));
        assert_eq!(inv.inverse(), f);
    }

    #[test]
    fn display_forms() {
        assert_eq!(EntityId::new(42).to_string(), "ent:42");
        assert_eq!(rel(6).to_string(), "rel:6");
    }
}
