//! Join relations: bounded multi-hop relation paths and their integer codes.
//!
//! A path is encoded as digits of a mixed-radix number with base equal to
//! the store's relation bound. Because relation ids 0 and 1 are reserved
//! sentinels, no valid digit is 0 and the encoding is bijective: decoding
//! pops least-significant digits until the code is exhausted, then reverses.

use serde::{Deserialize, Serialize};

use crate::error::{PathError, SemaResult};
use crate::symbol::RelationId;

/// An ordered sequence of relation ids representing a composed relation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JoinPath {
    relations: Vec<RelationId>,
}

impl JoinPath {
    pub fn new(relations: Vec<RelationId>) -> Self {
        Self { relations }
    }

    pub fn relations(&self) -> &[RelationId] {
        &self.relations
    }

    pub fn len(&self) -> usize {
        self.relations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.relations.is_empty()
    }

    /// The reverse path: inverses composed in reverse order.
    pub fn reversed(&self) -> JoinPath {
        JoinPath {
            relations: self.relations.iter().rev().map(|r| r.inverse()).collect(),
        }
    }
}

impl FromIterator<RelationId> for JoinPath {
    fn from_iter<T: IntoIterator<Item = RelationId>>(iter: T) -> Self {
        JoinPath {
            relations: iter.into_iter().collect(),
        }
    }
}

/// Bijective path ↔ code mapping for one store's relation id space.
///
/// The base is frozen at `prepare()` time; codes are not portable across
/// stores (or across loads that interned a different relation set).
#[derive(Debug, Clone, Copy)]
pub struct JoinCodec {
    base: u64,
    limit: usize,
}

impl JoinCodec {
    pub(crate) fn new(relation_bound: u32, join_length_limit: usize) -> Self {
        Self {
            // An empty store still has the two sentinel slots, so the base
            // is always at least 2 and division below is well-defined.
            base: u64::from(relation_bound.max(RelationId::FIRST)),
            limit: join_length_limit,
        }
    }

    /// The exclusive upper bound of the code space: `base ^ limit`,
    /// saturating. The alignment algorithm uses it to cap path enumeration.
    pub fn max_code(&self) -> u64 {
        let mut max = 1u64;
        for _ in 0..self.limit {
            max = max.saturating_mul(self.base);
        }
        max
    }

    /// Encode a path as a single integer.
    pub fn encode(&self, path: &JoinPath) -> SemaResult<u64> {
        if path.len() > self.limit {
            return Err(PathError::PathTooLong {
                length: path.len(),
                limit: self.limit,
            }
            .into());
        }
        let mut code = 0u64;
        for &r in path.relations() {
            if u64::from(r.get()) >= self.base {
                return Err(PathError::RelationOutOfRange {
                    relation: r.get(),
                    bound: self.base as u32,
                }
                .into());
            }
            code = code * self.base + u64::from(r.get());
        }
        Ok(code)
    }

    /// Decode a code back into its path. Inverse of [`encode`](Self::encode).
    pub fn decode(&self, code: u64) -> SemaResult<JoinPath> {
        if code >= self.max_code() {
            return Err(PathError::CodeOutOfRange {
                code,
                max: self.max_code(),
            }
            .into());
        }
        let mut rest = code;
        let mut relations = Vec::new();
        while rest != 0 {
            let digit = (rest % self.base) as u32;
            rest /= self.base;
            let Some(r) = RelationId::new(digit) else {
                // A sentinel digit cannot come from encode().
                return Err(PathError::InvalidCode { code }.into());
            };
            relations.push(r);
        }
        relations.reverse();
        Ok(JoinPath::new(relations))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rel(raw: u32) -> RelationId {
        RelationId::new(raw).unwrap()
    }

    fn codec() -> JoinCodec {
        JoinCodec::new(10, 3)
    }

    #[test]
    fn round_trip_all_lengths() {
        let c = codec();
        let paths = [
            vec![],
            vec![rel(2)],
            vec![rel(9)],
            vec![rel(2), rel(3)],
            vec![rel(7), rel(2), rel(9)],
            vec![rel(4), rel(4), rel(4)],
        ];
        for relations in paths {
            let path = JoinPath::new(relations);
            let code = c.encode(&path).unwrap();
            assert_eq!(c.decode(code).unwrap(), path, "code {code}");
        }
    }

    #[test]
    fn codes_are_distinct_per_path() {
        let c = codec();
        let mut seen = std::collections::HashSet::new();
        for a in 2..10u32 {
            for b in 2..10u32 {
                let code = c.encode(&JoinPath::new(vec![rel(a), rel(b)])).unwrap();
                assert!(seen.insert(code), "collision at ({a},{b})");
            }
        }
    }

    #[test]
    fn over_long_path_is_rejected() {
        let c = codec();
        let path = JoinPath::new(vec![rel(2); 4]);
        assert!(c.encode(&path).is_err());
    }

    #[test]
    fn foreign_relation_id_is_rejected() {
        let c = codec();
        let path = JoinPath::new(vec![rel(12)]);
        assert!(c.encode(&path).is_err());
    }

    #[test]
    fn out_of_range_code_is_rejected() {
        let c = codec();
        assert_eq!(c.max_code(), 1000);
        assert!(c.decode(1000).is_err());
    }

    #[test]
    fn sentinel_digit_is_rejected() {
        let c = codec();
        // 10 = 1 * base + 0: both digits are sentinels.
        assert!(c.decode(10).is_err());
    }

    #[test]
    fn reversed_composes_inverses_backwards() {
        let path = JoinPath::new(vec![rel(2), rel(5)]);
        assert_eq!(path.reversed(), JoinPath::new(vec![rel(4), rel(3)]));
        assert_eq!(path.reversed().reversed(), path);
    }

    #[test]
    fn max_code_saturates() {
        let c = JoinCodec::new(u32::MAX, 40);
        assert_eq!(c.max_code(), u64::MAX);
    }
}
