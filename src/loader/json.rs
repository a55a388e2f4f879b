//! JSON fact files: a top-level array of `[subject, predicate, object]`
//! string triples.
//!
//! Anything other than an array at the top level is structurally unreadable
//! and fails the source; a non-triple element inside the array is skipped
//! with a warning.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::{LoaderError, SemaResult};
use crate::loader::{StringTriple, TripleSource};

pub struct JsonSource {
    path: PathBuf,
}

impl JsonSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl TripleSource for JsonSource {
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
        let value: Value =
            serde_json::from_reader(BufReader::new(file)).map_err(|e| LoaderError::UnreadableSource {
                source_label: label.clone(),
                message: format!("invalid JSON: {e}"),
            })?;
        let Value::Array(elements) = value else {
            return Err(LoaderError::UnreadableSource {
                source_label: label,
                message: "top-level value is not an array".into(),
            }
            .into());
        };

        let rows = elements
            .into_iter()
            .enumerate()
            .map(move |(i, element)| parse_element(&label, i, element));
        Ok(Box::new(rows))
    }
}

fn parse_element(label: &str, index: usize, element: Value) -> SemaResult<StringTriple> {
    let malformed = |message: String| {
        LoaderError::MalformedRow {
            source_label: label.to_string(),
            line: index + 1,
            message,
        }
        .into()
    };

    let Value::Array(parts) = element else {
        return Err(malformed("element is not an array".into()));
    };
    let found = parts.len();
    let Ok(parts) = <[Value; 3]>::try_from(parts) else {
        return Err(malformed(format!("expected 3 elements, found {found}")));
    };
    match parts {
        [Value::String(s), Value::String(p), Value::String(o)] => Ok([s, p, o]),
        _ => Err(malformed("expected an array of 3 strings".into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(dir: &tempfile::TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("facts.json");
        let mut f = File::create(&path).unwrap();
        f.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn triple_arrays_parse() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = write_file(&dir, r#"[["a","p","b"],["b","p","c"]]"#);
        let mut source = JsonSource::new(&path);
        let rows: Vec<_> = source.read().unwrap().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1], ["b".to_string(), "p".into(), "c".into()]);
    }

    #[test]
    fn non_array_top_level_is_fatal() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = write_file(&dir, r#"{"facts": []}"#);
        let mut source = JsonSource::new(&path);
        assert!(source.read().is_err());
    }

    #[test]
    fn wrong_arity_elements_are_skippable() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = write_file(&dir, r#"[["a","p","b"],["a","p"],[1,2,3]]"#);
        let mut source = JsonSource::new(&path);
        let rows: Vec<_> = source.read().unwrap().collect();
        assert!(rows[0].is_ok());
        assert!(matches!(
            rows[1].as_ref().unwrap_err(),
            crate::error::SemaError::Loader(LoaderError::MalformedRow { .. })
        ));
        assert!(rows[2].is_err());
    }

    #[test]
    fn invalid_json_is_fatal() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = write_file(&dir, "not json");
        let mut source = JsonSource::new(&path);
        assert!(source.read().is_err());
    }
}
