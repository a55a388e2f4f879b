//! Symbol interning: bidirectional name ↔ id mapping.
//!
//! Two `DashMap`s give lock-free repeat lookups during loading; the
//! append-only name vectors double as the allocation critical section, with a
//! re-check after acquiring the write lock so concurrent workers interning
//! the same name agree on one id.

use std::sync::RwLock;

use dashmap::DashMap;

use crate::error::{SemaResult, SymbolError};
use crate::symbol::{inverse_name, EntityId, RelationId, INVERSE_MARKER};

/// Bidirectional interner for entity and relation names.
///
/// Relation ids are allocated in forward/inverse pairs as a unit: interning
/// either name of a pair registers both, and the paired ids differ only in
/// the low bit.
pub struct SymbolTable {
    /// Reverse map: entity name → id.
    entity_ids: DashMap<String, EntityId>,
    /// Forward map: id → name (index = id). Source of truth for allocation.
    entity_names: RwLock<Vec<String>>,
    /// Reverse map: relation name (either direction) → id.
    relation_ids: DashMap<String, RelationId>,
    /// Forward map: id → name (index = id). Slots 0 and 1 hold the reserved
    /// sentinels and never name a user relation.
    relation_names: RwLock<Vec<String>>,
}

impl SymbolTable {
    /// Create an empty table with a capacity hint for entities.
    pub fn with_capacity(expected_entities: usize) -> Self {
        Self {
            entity_ids: DashMap::with_capacity(expected_entities),
            entity_names: RwLock::new(Vec::with_capacity(expected_entities)),
            relation_ids: DashMap::new(),
            relation_names: RwLock::new(vec![String::new(), String::new()]),
        }
    }

    /// Intern an entity name, returning the existing id if it was seen before.
    pub fn intern_entity(&self, name: &str) -> SemaResult<EntityId> {
        if let Some(id) = self.entity_ids.get(name) {
            return Ok(*id);
        }
        let mut names = self.entity_names.write().expect("entity table poisoned");
        // Re-check after acquiring the write lock: another worker may have
        // allocated this name while we waited.
        if let Some(id) = self.entity_ids.get(name) {
            return Ok(*id);
        }
        if names.len() >= u32::MAX as usize {
            return Err(SymbolError::IdSpaceExhausted { kind: "entity" }.into());
        }
        let id = EntityId::new(names.len() as u32);
        names.push(name.to_string());
        self.entity_ids.insert(name.to_string(), id);
        Ok(id)
    }

    /// Intern a relation name, allocating its forward/inverse pair as a unit.
    ///
    /// A name carrying the trailing inverse marker is interned as the inverse
    /// half of its base name's pair; the pair itself is always allocated from
    /// the forward side, so a half-allocated pair cannot exist.
    pub fn intern_relation(&self, name: &str) -> SemaResult<RelationId> {
        if let Some(id) = self.relation_ids.get(name) {
            return Ok(*id);
        }
        let (forward, inverted) = canonical_direction(name);
        let mut names = self.relation_names.write().expect("relation table poisoned");
        if let Some(id) = self.relation_ids.get(forward) {
            return Ok(if inverted { id.inverse() } else { *id });
        }
        if names.len() >= (u32::MAX - 1) as usize {
            return Err(SymbolError::IdSpaceExhausted { kind: "relation" }.into());
        }
        debug_assert!(names.len() % 2 == 0, "pair allocation must stay aligned");
        let forward_id = RelationId::from_raw(names.len() as u32);
        let inverse = inverse_name(forward);
        names.push(forward.to_string());
        names.push(inverse.clone());
        self.relation_ids.insert(forward.to_string(), forward_id);
        self.relation_ids.insert(inverse, forward_id.inverse());
        Ok(if inverted {
            forward_id.inverse()
        } else {
            forward_id
        })
    }

    /// Look up an entity id by name. `None` if never interned.
    pub fn entity_id(&self, name: &str) -> Option<EntityId> {
        self.entity_ids.get(name).map(|r| *r)
    }

    /// Look up a relation id by name (either direction). `None` if never interned.
    pub fn relation_id(&self, name: &str) -> Option<RelationId> {
        self.relation_ids.get(name).map(|r| *r)
    }

    /// Resolve an entity id back to its name.
    pub fn entity_name(&self, id: EntityId) -> Option<String> {
        self.entity_names
            .read()
            .expect("entity table poisoned")
            .get(id.index())
            .cloned()
    }

    /// Resolve a relation id back to its name.
    pub fn relation_name(&self, id: RelationId) -> Option<String> {
        let names = self.relation_names.read().expect("relation table poisoned");
        if id.get() < RelationId::FIRST {
            return None;
        }
        names.get(id.index()).cloned()
    }

    /// Number of interned entities.
    pub fn entity_count(&self) -> usize {
        self.entity_names.read().expect("entity table poisoned").len()
    }

    /// One past the highest allocated relation id (counts both pair halves
    /// and the two reserved sentinels). Doubles as the join-codec base.
    pub fn relation_bound(&self) -> u32 {
        self.relation_names
            .read()
            .expect("relation table poisoned")
            .len() as u32
    }

    /// Consume the table into its frozen parts for the Ready phase.
    pub(crate) fn into_parts(self) -> FrozenSymbols {
        FrozenSymbols {
            entity_ids: self.entity_ids,
            entity_names: self
                .entity_names
                .into_inner()
                .expect("entity table poisoned"),
            relation_ids: self.relation_ids,
            relation_names: self
                .relation_names
                .into_inner()
                .expect("relation table poisoned"),
        }
    }
}

impl std::fmt::Debug for SymbolTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SymbolTable")
            .field("entities", &self.entity_count())
            .field("relation_bound", &self.relation_bound())
            .finish()
    }
}

/// Immutable symbol tables owned by a prepared store.
pub(crate) struct FrozenSymbols {
    pub entity_ids: DashMap<String, EntityId>,
    pub entity_names: Vec<String>,
    pub relation_ids: DashMap<String, RelationId>,
    pub relation_names: Vec<String>,
}

/// Split a queried relation name into its forward base and direction.
///
/// A bare-marker name (or one whose base would be empty) is left as a forward
/// name rather than inverted into nothing.
fn canonical_direction(name: &str) -> (&str, bool) {
    match name.strip_suffix(INVERSE_MARKER) {
        Some(base) if !base.is_empty() => (base, true),
        _ => (name, false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn table() -> SymbolTable {
        SymbolTable::with_capacity(16)
    }

    #[test]
    fn entity_interning_is_idempotent() {
        let t = table();
        let a = t.intern_entity("y:Elvis").unwrap();
        let b = t.intern_entity("y:Elvis").unwrap();
        assert_eq!(a, b);
        assert_eq!(t.entity_count(), 1);
        assert_eq!(t.entity_name(a).as_deref(), Some("y:Elvis"));
    }

    #[test]
    fn entity_ids_are_dense_from_zero() {
        let t = table();
        assert_eq!(t.intern_entity("a").unwrap().get(), 0);
        assert_eq!(t.intern_entity("b").unwrap().get(), 1);
        assert_eq!(t.intern_entity("c").unwrap().get(), 2);
    }

    #[test]
    fn relations_allocate_in_pairs() {
        let t = table();
        let born = t.intern_relation("y:bornIn").unwrap();
        assert_eq!(born.get(), 2); // 0 and 1 are reserved
        assert!(!born.is_inverse());
        assert_eq!(t.relation_id("y:bornIn-"), Some(born.inverse()));
        assert_eq!(t.relation_name(born.inverse()).as_deref(), Some("y:bornIn-"));
        assert_eq!(t.relation_bound(), 4);
    }

    #[test]
    fn interning_the_inverse_name_reuses_the_pair() {
        let t = table();
        let fwd = t.intern_relation("y:bornIn").unwrap();
        let inv = t.intern_relation("y:bornIn-").unwrap();
        assert_eq!(inv, fwd.inverse());
        assert_eq!(t.relation_bound(), 4); // no second pair allocated
    }

    #[test]
    fn interning_inverse_first_still_allocates_the_forward_base() {
        let t = table();
        let inv = t.intern_relation("y:livesIn-").unwrap();
        assert!(inv.is_inverse());
        assert_eq!(t.relation_id("y:livesIn"), Some(inv.inverse()));
    }

    #[test]
    fn sentinel_ids_resolve_to_nothing() {
        let t = table();
        t.intern_relation("p").unwrap();
        assert_eq!(t.relation_name(RelationId::from_raw(0)), None);
        assert_eq!(t.relation_name(RelationId::from_raw(1)), None);
    }

    #[test]
    fn unknown_lookups_return_none() {
        let t = table();
        assert_eq!(t.entity_id("y:Nobody"), None);
        assert_eq!(t.relation_id("y:never"), None);
    }

    #[test]
    fn concurrent_interning_agrees_on_one_id() {
        let t = Arc::new(table());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let t = Arc::clone(&t);
                std::thread::spawn(move || {
                    let e = t.intern_entity("y:Elvis").unwrap();
                    let r = t.intern_relation("y:sings").unwrap();
                    (e, r)
                })
            })
            .collect();
        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        let (e0, r0) = results[0];
        assert!(results.iter().all(|&(e, r)| e == e0 && r == r0));
        assert_eq!(t.entity_count(), 1);
        assert_eq!(t.relation_bound(), 4);
    }
}
