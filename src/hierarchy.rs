//! Class and instance hierarchy resolution.
//!
//! The schema relations (`rdf:type`, `rdfs:subClassOf`) are interned eagerly
//! at store construction, so their ids exist even in an empty store. Class
//! and literal predicates are computed by scanning adjacency lists during
//! loading and from cached boolean tables once the store is prepared.

use std::collections::HashSet;

use crate::error::SemaResult;
use crate::facts::{FactEntry, FactTable};
use crate::interner::SymbolTable;
use crate::symbol::{EntityId, RelationId};

/// Name of the instance-of relation.
pub const RDF_TYPE: &str = "rdf:type";
/// Name of the subclass relation.
pub const RDFS_SUBCLASS_OF: &str = "rdfs:subClassOf";
/// Literal entity names begin with this character.
pub const LITERAL_QUOTE: char = '"';

/// Well-known relation ids, resolved once per store.
#[derive(Debug, Clone, Copy)]
pub struct SchemaRelations {
    /// `rdf:type` — instance to class.
    pub type_of: RelationId,
    /// `rdfs:subClassOf` — class to superclass.
    pub subclass_of: RelationId,
}

impl SchemaRelations {
    /// Intern the schema relations, creating them if needed.
    pub(crate) fn resolve(symbols: &SymbolTable) -> SemaResult<Self> {
        Ok(Self {
            type_of: symbols.intern_relation(RDF_TYPE)?,
            subclass_of: symbols.intern_relation(RDFS_SUBCLASS_OF)?,
        })
    }
}

/// Whether an entity name denotes a literal value.
pub fn name_is_literal(name: &str) -> bool {
    name.starts_with(LITERAL_QUOTE)
}

/// Whether an entity with the given facts is used as a class: it has at
/// least one incoming `rdf:type` fact, or participates in any `subClassOf`
/// edge in either direction. Literal filtering is the caller's concern.
pub(crate) fn scan_is_class(facts: &[FactEntry], schema: &SchemaRelations) -> bool {
    let incoming_type = schema.type_of.inverse();
    let sub = schema.subclass_of;
    let sup = schema.subclass_of.inverse();
    facts
        .iter()
        .any(|&(p, _)| p == incoming_type || p == sub || p == sup)
}

/// The direct classes of an instance: objects of its outgoing `rdf:type`.
pub(crate) fn direct_classes(facts: &[FactEntry], schema: &SchemaRelations) -> HashSet<EntityId> {
    facts
        .iter()
        .filter(|&&(p, _)| p == schema.type_of)
        .map(|&(_, o)| o)
        .collect()
}

/// The instances of a class, read off the materialized inverse of `rdf:type`.
pub(crate) fn direct_instances(facts: &[FactEntry], schema: &SchemaRelations) -> HashSet<EntityId> {
    let incoming_type = schema.type_of.inverse();
    facts
        .iter()
        .filter(|&&(p, _)| p == incoming_type)
        .map(|&(_, o)| o)
        .collect()
}

/// Transitive superclass closure from a set of starting classes.
///
/// Iterative worklist rather than call-stack recursion; the membership check
/// happens before a class is pushed, so a `subClassOf` cycle terminates after
/// visiting each class once.
pub(crate) fn superclass_closure(
    table: &FactTable,
    schema: &SchemaRelations,
    start: HashSet<EntityId>,
) -> HashSet<EntityId> {
    let mut found = start;
    let mut stack: Vec<EntityId> = found.iter().copied().collect();
    while let Some(class) = stack.pop() {
        let Some(Some(facts)) = table.get(class.index()) else {
            continue;
        };
        for &(p, sup) in facts {
            if p == schema.subclass_of && found.insert(sup) {
                stack.push(sup);
            }
        }
    }
    found
}
