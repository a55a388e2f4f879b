//! Per-relation functionality statistics.
//!
//! Functionality approximates how close a relation is to being a function
//! from subject to a single object: the ratio of distinct subjects to total
//! facts, in (0, 1]. A value of 1.0 means strictly functional. The alignment
//! algorithm downstream uses it as a confidence signal.

use crate::facts::FactTable;
use crate::join::JoinPath;
use crate::symbol::RelationId;

/// Functionality per relation id, defined only for relations with facts.
#[derive(Debug, Clone)]
pub struct FunctionalityTable {
    values: Vec<Option<f64>>,
}

impl FunctionalityTable {
    /// Single pass over the adjacency table, post-load.
    ///
    /// Subjects are iterated in increasing id order and a subject's facts
    /// are contiguous, so a last-subject-seen scalar per relation suffices
    /// to count distinct subjects without a set.
    pub(crate) fn compute(table: &FactTable, relation_bound: u32) -> Self {
        let n = relation_bound as usize;
        let mut totals = vec![0u64; n];
        let mut distinct = vec![0u64; n];
        let mut last_subject = vec![u32::MAX; n];

        for (subject, slot) in table.iter().enumerate() {
            let Some(facts) = slot else { continue };
            for &(p, _) in facts {
                let r = p.index();
                totals[r] += 1;
                if last_subject[r] != subject as u32 {
                    last_subject[r] = subject as u32;
                    distinct[r] += 1;
                }
            }
        }

        let values = totals
            .iter()
            .zip(&distinct)
            .map(|(&total, &subjects)| {
                (total > 0).then(|| subjects as f64 / total as f64)
            })
            .collect();
        Self { values }
    }

    /// Functionality of a relation. `None` for a relation with no facts.
    pub fn functionality(&self, relation: RelationId) -> Option<f64> {
        self.values.get(relation.index()).copied().flatten()
    }

    /// Functionality of the paired inverse relation.
    pub fn inverse_functionality(&self, relation: RelationId) -> Option<f64> {
        self.functionality(relation.inverse())
    }

    /// Functionality of a join path: the minimum over its relations.
    ///
    /// The weakest link bounds the path — a deliberately conservative
    /// combinator, not an estimate of the true joint functionality. `None`
    /// for an empty path or when any leg has no facts.
    pub fn path_functionality(&self, path: &JoinPath) -> Option<f64> {
        path.relations()
            .iter()
            .map(|&r| self.functionality(r))
            .try_fold(f64::INFINITY, |min, f| f.map(|v| min.min(v)))
            .filter(|v| v.is_finite())
    }

    /// Number of relation id slots covered (the relation bound at compute time).
    pub fn relation_bound(&self) -> u32 {
        self.values.len() as u32
    }
}
