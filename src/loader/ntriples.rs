//! Line-oriented RDF triple text (N-Triples style).
//!
//! Each statement is `subject predicate object .` on one line. Angle
//! brackets around IRIs are stripped; a quoted object is kept verbatim,
//! including any datatype or language suffix, for the literal formatter
//! chain to handle. A line that does not fit the shape is skipped with a
//! warning rather than failing the source.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::error::{LoaderError, SemaResult};
use crate::loader::{StringTriple, TripleSource};

pub struct NTriplesSource {
    path: PathBuf,
}

impl NTriplesSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl TripleSource for NTriplesSource {
    fn label(&self) -> String {
        self.path.display().to_string()
    }

    fn read(
        &mut self,
    ) -> SemaResult<Box<dyn Iterator<Item = SemaResult<StringTriple>> + Send + '_>> {
        let label = self.label();
        let file = File::open(&self.path).map_err(|source| LoaderError::Io {
            path: label.clone(),
            source,
        })?;
        let reader = BufReader::new(file);

        let rows = reader.lines().enumerate().filter_map(move |(i, line)| {
            let line = match line {
                Ok(line) => line,
                Err(source) => {
                    return Some(Err(LoaderError::Io {
                        path: label.clone(),
                        source,
                    }
                    .into()));
                }
            };
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                return None;
            }
            Some(parse_statement(&label, i + 1, line))
        });
        Ok(Box::new(rows))
    }
}

fn parse_statement(label: &str, line_number: usize, line: &str) -> SemaResult<StringTriple> {
    let malformed = |message: String| {
        LoaderError::MalformedRow {
            source_label: label.to_string(),
            line: line_number,
            message,
        }
        .into()
    };

    let Some(body) = line.strip_suffix('.') else {
        return Err(malformed("statement does not end with '.'".into()));
    };
    let body = body.trim_end();

    let Some((subject, rest)) = body.split_once(char::is_whitespace) else {
        return Err(malformed("missing predicate and object".into()));
    };
    let rest = rest.trim_start();
    let Some((predicate, object)) = rest.split_once(char::is_whitespace) else {
        return Err(malformed("missing object".into()));
    };
    let object = object.trim();
    if object.is_empty() {
        return Err(malformed("empty object".into()));
    }

    Ok([
        unwrap_iri(subject).to_string(),
        unwrap_iri(predicate).to_string(),
        if object.starts_with('"') {
            object.to_string()
        } else {
            unwrap_iri(object).to_string()
        },
    ])
}

fn unwrap_iri(token: &str) -> &str {
    token
        .strip_prefix('<')
        .and_then(|t| t.strip_suffix('>'))
        .unwrap_or(token)
}
