//! Approximate string similarity over literal values.
//!
//! The store only forwards to this boundary: `index()` is called once per
//! distinct literal value while the store is prepared, `query()` afterwards
//! by alignment code looking for near-equal literals across ontologies.

use std::collections::HashSet;

use dashmap::DashMap;

/// A ranked match returned by a similarity query.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatch {
    /// The indexed literal value.
    pub text: String,
    /// Similarity to the query in [0, 1].
    pub similarity: f64,
}

/// Boundary trait for a literal similarity index.
pub trait SimilarityIndex: Send + Sync {
    /// Add one literal value to the index.
    fn index(&self, text: &str);

    /// All indexed values with similarity ≥ `min_similarity`, best first.
    fn query(&self, text: &str, min_similarity: f64) -> Vec<SimilarityMatch>;
}

/// Character-trigram index with Jaccard ranking.
///
/// Good enough for catching near-equal literals (diacritics, punctuation,
/// word-order noise); anything smarter can be plugged in behind the trait.
pub struct TrigramIndex {
    /// trigram → indexed values containing it.
    postings: DashMap<String, Vec<String>>,
    /// value → its trigram count, also the indexed-once guard.
    sizes: DashMap<String, usize>,
}

impl TrigramIndex {
    pub fn new() -> Self {
        Self {
            postings: DashMap::new(),
            sizes: DashMap::new(),
        }
    }

    fn trigrams(text: &str) -> HashSet<String> {
        let lowered: Vec<char> = text.to_lowercase().chars().collect();
        if lowered.len() < 3 {
            let mut single = HashSet::new();
            single.insert(lowered.iter().collect());
            return single;
        }
        lowered
            .windows(3)
            .map(|w| w.iter().collect::<String>())
            .collect()
    }

    /// Number of distinct values indexed.
    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }
}

impl Default for TrigramIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl SimilarityIndex for TrigramIndex {
    fn index(&self, text: &str) {
        let grams = Self::trigrams(text);
        if self.sizes.insert(text.to_string(), grams.len()).is_some() {
            return; // already indexed
        }
        for gram in grams {
            self.postings.entry(gram).or_default().push(text.to_string());
        }
    }

    fn query(&self, text: &str, min_similarity: f64) -> Vec<SimilarityMatch> {
        let grams = Self::trigrams(text);
        let mut shared: std::collections::HashMap<String, usize> =
            std::collections::HashMap::new();
        for gram in &grams {
            if let Some(values) = self.postings.get(gram) {
                for value in values.iter() {
                    *shared.entry(value.clone()).or_default() += 1;
                }
            }
        }

        let mut matches: Vec<SimilarityMatch> = shared
            .into_iter()
            .filter_map(|(value, overlap)| {
                let size = *self.sizes.get(&value)?;
                let union = grams.len() + size - overlap;
                let similarity = if union == 0 {
                    1.0
                } else {
                    overlap as f64 / union as f64
                };
                (similarity >= min_similarity).then_some(SimilarityMatch {
                    text: value,
                    similarity,
                })
            })
            .collect();
        matches.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.text.cmp(&b.text))
        });
        matches
    }
}

impl std::fmt::Debug for TrigramIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrigramIndex")
            .field("values", &self.len())
            .finish()
    }
}
