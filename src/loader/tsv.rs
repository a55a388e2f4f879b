//! Tab-separated fact files.
//!
//! Two shapes are recognized: `subject<TAB>predicate<TAB>object`, and the
//! same with a leading fact-id column. Any other column count means the file
//! is not in this format at all, which is fatal for the source rather than a
//! per-row skip.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::error::{LoaderError, SemaResult};
use crate::loader::{StringTriple, TripleSource};

pub struct TsvSource {
    path: PathBuf,
}

impl TsvSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl TripleSource for TsvSource {
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
            let line = line.trim_end_matches('\r');
            if line.is_empty() {
                return None;
            }
            let columns: Vec<&str> = line.split('\t').collect();
            match columns.len() {
                3 => Some(Ok([
                    columns[0].to_string(),
                    columns[1].to_string(),
                    columns[2].to_string(),
                ])),
                4 => Some(Ok([
                    columns[1].to_string(),
                    columns[2].to_string(),
                    columns[3].to_string(),
                ])),
                n => Some(Err(LoaderError::UnreadableSource {
                    source_label: label.clone(),
                    message: format!(
                        "expected 3 or 4 tab-separated columns, found {n} on line {}",
                        i + 1
                    ),
                }
                .into())),
            }
        });
        Ok(Box::new(rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut f = File::create(&path).unwrap();
        f.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn three_column_rows() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = write_file(&dir, "facts.tsv", "a\tp\tb\nb\tp\tc\n");
        let mut source = TsvSource::new(&path);
        let rows: Vec<_> = source.read().unwrap().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], ["a".to_string(), "p".into(), "b".into()]);
    }

    #[test]
    fn four_column_rows_drop_the_fact_id() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = write_file(&dir, "facts.tsv", "#1\ta\tp\tb\n");
        let mut source = TsvSource::new(&path);
        let rows: Vec<_> = source.read().unwrap().map(|r| r.unwrap()).collect();
        assert_eq!(rows[0], ["a".to_string(), "p".into(), "b".into()]);
    }

    #[test]
    fn blank_lines_are_ignored() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = write_file(&dir, "facts.tsv", "a\tp\tb\n\n\nc\tp\td\n");
        let mut source = TsvSource::new(&path);
        assert_eq!(source.read().unwrap().count(), 2);
    }

    #[test]
    fn wrong_column_count_is_fatal() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = write_file(&dir, "facts.tsv", "a\tp\tb\na,p,c\n");
        let mut source = TsvSource::new(&path);
        let rows: Vec<_> = source.read().unwrap().collect();
        assert!(rows[0].is_ok());
        assert!(rows[1].is_err());
    }

    #[test]
    fn missing_file_fails_on_read() {
        let mut source = TsvSource::new("/nonexistent/facts.tsv");
        assert!(source.read().is_err());
    }
}
