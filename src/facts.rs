//! The triple index: per-subject adjacency lists with materialized inverses.
//!
//! Every inserted fact is stored twice — once under its subject and once,
//! with the inverse predicate, under its object. The doubling costs 2× memory
//! and buys O(1) lookup of a subject's facts in either direction without a
//! separate reverse index.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

use crate::symbol::{EntityId, RelationId};

/// One stored (predicate, object) pair in a subject's adjacency list.
pub type FactEntry = (RelationId, EntityId);

/// The frozen adjacency table: index = subject id, `None` = subject never
/// seen (distinct from a subject with an empty fact list).
pub type FactTable = Vec<Option<Vec<FactEntry>>>;

/// Growable fact index for the loading phase.
///
/// Both directions of a fact are appended under one write-lock acquisition,
/// so no concurrent reader ordering can observe the forward fact without its
/// inverse.
pub struct FactIndex {
    by_subject: RwLock<FactTable>,
    /// Logical (caller-submitted) fact count; stored entries are double this.
    fact_count: AtomicUsize,
}

impl FactIndex {
    pub fn new() -> Self {
        Self {
            by_subject: RwLock::new(Vec::new()),
            fact_count: AtomicUsize::new(0),
        }
    }

    /// Insert a fact and its materialized inverse.
    ///
    /// Callers submit the forward direction; an inverse predicate is
    /// normalized by swapping subject and object first. The backing table
    /// grows to cover both ids, filling the gap with never-seen placeholders.
    pub fn add(&self, subject: EntityId, predicate: RelationId, object: EntityId) {
        let (s, p, o) = if predicate.is_inverse() {
            (object, predicate.inverse(), subject)
        } else {
            (subject, predicate, object)
        };
        let mut table = self.by_subject.write().expect("fact table poisoned");
        let needed = s.index().max(o.index()) + 1;
        if table.len() < needed {
            table.resize_with(needed, || None);
        }
        table[s.index()].get_or_insert_with(Vec::new).push((p, o));
        table[o.index()]
            .get_or_insert_with(Vec::new)
            .push((p.inverse(), s));
        self.fact_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Snapshot of a subject's facts. `None` for a subject never seen.
    ///
    /// During loading this is only consistent with respect to whole facts
    /// (both directions of a fact land atomically); query code should wait
    /// for the Ready phase.
    pub fn facts_about(&self, subject: EntityId) -> Option<Vec<FactEntry>> {
        self.by_subject
            .read()
            .expect("fact table poisoned")
            .get(subject.index())
            .and_then(|slot| slot.clone())
    }

    /// Number of caller-submitted facts (each stored in both directions).
    pub fn len(&self) -> usize {
        self.fact_count.load(Ordering::Relaxed)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Consume the index into its frozen table for the Ready phase.
    pub(crate) fn into_table(self) -> (FactTable, usize) {
        let count = self.len();
        (
            self.by_subject.into_inner().expect("fact table poisoned"),
            count,
        )
    }
}

impl Default for FactIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FactIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FactIndex")
            .field("facts", &self.len())
            .finish()
    }
}
