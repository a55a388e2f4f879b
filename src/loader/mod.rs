//! Bulk loading: triple sources and the parallel load driver.
//!
//! Each supported input format (TSV, N-Triples, JSON) implements
//! [`TripleSource`]; `source_for_path()` picks the right one from the file
//! extension. The driver runs one rayon task per source and collects every
//! per-source failure into the returned [`LoadReport`] — a failed source
//! contributes whatever it loaded before failing and never aborts its
//! siblings.

pub mod json;
pub mod ntriples;
pub mod tsv;

use std::path::Path;

use rayon::prelude::*;

use crate::error::{LoaderError, SemaError, SemaResult};
use crate::store::FactStore;

/// One raw (subject, predicate, object) row from a source.
pub type StringTriple = [String; 3];

/// A finite, lazily read sequence of string triples.
pub trait TripleSource: Send {
    /// Human-readable identifier used in logs and failure reports.
    fn label(&self) -> String;

    /// Open the source and return its row iterator.
    ///
    /// A yielded `LoaderError::MalformedRow` is skippable; any other error
    /// is fatal for this source.
    fn read(&mut self)
        -> SemaResult<Box<dyn Iterator<Item = SemaResult<StringTriple>> + Send + '_>>;
}

/// Pick a parser for a path by extension.
pub fn source_for_path(path: &Path) -> SemaResult<Box<dyn TripleSource>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("tsv") => Ok(Box::new(tsv::TsvSource::new(path))),
        Some("nt") => Ok(Box::new(ntriples::NTriplesSource::new(path))),
        Some("json") => Ok(Box::new(json::JsonSource::new(path))),
        _ => Err(LoaderError::UnknownFormat {
            path: path.display().to_string(),
        }
        .into()),
    }
}

/// A source that failed mid-load.
#[derive(Debug)]
pub struct SourceFailure {
    pub label: String,
    pub error: SemaError,
}

/// Outcome of a bulk load across all sources.
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Facts successfully inserted (across all sources, including partial
    /// progress of sources that later failed).
    pub facts_added: usize,
    /// Sources that ran to completion.
    pub sources_loaded: usize,
    /// Malformed rows skipped with a warning.
    pub rows_skipped: usize,
    /// Per-source fatal errors. Empty means a fully clean load.
    pub failures: Vec<SourceFailure>,
}

impl LoadReport {
    /// Whether every source loaded without a fatal error.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

struct SourceOutcome {
    label: String,
    facts: usize,
    skipped: usize,
    error: Option<SemaError>,
}

/// Load all sources concurrently, one rayon task per source.
pub fn load_parallel(store: &FactStore, sources: Vec<Box<dyn TripleSource>>) -> LoadReport {
    let outcomes: Vec<SourceOutcome> = sources
        .into_par_iter()
        .map(|mut source| load_source(store, source.as_mut()))
        .collect();
    summarize(outcomes)
}

/// Load all sources one after another. Produces the same fact *set* as
/// [`load_parallel`] for the same inputs.
pub fn load_sequential(store: &FactStore, sources: Vec<Box<dyn TripleSource>>) -> LoadReport {
    let outcomes: Vec<SourceOutcome> = sources
        .into_iter()
        .map(|mut source| load_source(store, source.as_mut()))
        .collect();
    summarize(outcomes)
}

fn load_source(store: &FactStore, source: &mut dyn TripleSource) -> SourceOutcome {
    let label = source.label();
    let mut outcome = SourceOutcome {
        label: label.clone(),
        facts: 0,
        skipped: 0,
        error: None,
    };

    let rows = match source.read() {
        Ok(rows) => rows,
        Err(error) => {
            outcome.error = Some(error);
            return outcome;
        }
    };

    for row in rows {
        match row {
            Ok([s, p, o]) => match store.add_fact_by_name(&s, &p, &o) {
                Ok(()) => outcome.facts += 1,
                Err(error) => {
                    outcome.error = Some(error);
                    break;
                }
            },
            Err(SemaError::Loader(LoaderError::MalformedRow {
                source_label,
                line,
                message,
            })) => {
                tracing::warn!(source = %source_label, line, %message, "skipping malformed row");
                outcome.skipped += 1;
            }
            Err(error) => {
                outcome.error = Some(error);
                break;
            }
        }
    }

    tracing::debug!(
        source = %label,
        facts = outcome.facts,
        skipped = outcome.skipped,
        "source drained"
    );
    outcome
}

fn summarize(outcomes: Vec<SourceOutcome>) -> LoadReport {
    let mut report = LoadReport::default();
    for outcome in outcomes {
        report.facts_added += outcome.facts;
        report.rows_skipped += outcome.skipped;
        match outcome.error {
            None => report.sources_loaded += 1,
            Some(error) => {
                tracing::error!(source = %outcome.label, %error, "source failed");
                report.failures.push(SourceFailure {
                    label: outcome.label,
                    error,
                });
            }
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn extension_dispatch() {
        assert!(source_for_path(&PathBuf::from("facts.tsv")).is_ok());
        assert!(source_for_path(&PathBuf::from("facts.NT")).is_ok());
        assert!(source_for_path(&PathBuf::from("facts.json")).is_ok());

        let err = source_for_path(&PathBuf::from("facts.xml")).err().unwrap();
        assert!(matches!(
            err,
            SemaError::Loader(LoaderError::UnknownFormat { .. })
        ));
    }
}
