//! File-driven bulk loading: format dispatch, partial failure semantics, and
//! parallel vs sequential determinism.

use std::collections::HashSet;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

use sema_tawy::store::{FactStore, PreparedStore, StoreConfig};

fn write_file(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    let mut f = File::create(&path).unwrap();
    f.write_all(content.as_bytes()).unwrap();
    path
}

/// All forward facts as name triples, order-independent.
fn fact_set(ready: &PreparedStore) -> HashSet<(String, String, String)> {
    ready
        .facts()
        .map(|fact| {
            (
                ready.entity_name(fact.subject).unwrap().to_string(),
                ready.relation_name(fact.predicate).unwrap().to_string(),
                ready.entity_name(fact.object).unwrap().to_string(),
            )
        })
        .collect()
}

fn fixture_paths(dir: &tempfile::TempDir) -> Vec<PathBuf> {
    vec![
        write_file(
            dir,
            "people.tsv",
            "y:Elvis\trdf:type\ty:Singer\ny:Elvis\ty:bornIn\ty:Tupelo\n",
        ),
        write_file(
            dir,
            "schema.nt",
            "<y:Singer> <rdfs:subClassOf> <y:Person> .\n<y:Elvis> <y:label> \"Elvis Presley\"@en .\n",
        ),
        write_file(
            dir,
            "extra.json",
            r#"[["y:Tupelo","rdf:type","y:City"],["y:Elvis","y:diedIn","y:Memphis"]]"#,
        ),
    ]
}

#[test]
fn mixed_formats_load_into_one_store() {
    let dir = tempfile::TempDir::new().unwrap();
    let store = FactStore::new(StoreConfig::default()).unwrap();
    let report = store.load_paths(&fixture_paths(&dir)).unwrap();

    assert!(report.is_complete());
    assert_eq!(report.facts_added, 6);
    assert_eq!(report.sources_loaded, 3);
    assert_eq!(report.rows_skipped, 0);

    let ready = store.prepare().unwrap();
    let elvis = ready.entity_named("y:Elvis").unwrap();
    let singer = ready.entity_named("y:Singer").unwrap();
    let person = ready.entity_named("y:Person").unwrap();
    assert!(ready.instances_of(singer).contains(&elvis));
    assert_eq!(
        ready.classes_and_superclasses_of(elvis),
        HashSet::from([singer, person])
    );
}

#[test]
fn parallel_and_sequential_loads_agree_on_the_fact_set() {
    let dir = tempfile::TempDir::new().unwrap();
    let paths = fixture_paths(&dir);

    let parallel = FactStore::new(StoreConfig {
        parallel_loading: true,
        ..Default::default()
    })
    .unwrap();
    parallel.load_paths(&paths).unwrap();
    let parallel = parallel.prepare().unwrap();

    let sequential = FactStore::new(StoreConfig {
        parallel_loading: false,
        ..Default::default()
    })
    .unwrap();
    sequential.load_paths(&paths).unwrap();
    let sequential = sequential.prepare().unwrap();

    assert_eq!(fact_set(&parallel), fact_set(&sequential));
    assert_eq!(parallel.fact_count(), sequential.fact_count());
}

#[test]
fn a_failing_source_does_not_abort_its_siblings() {
    let dir = tempfile::TempDir::new().unwrap();
    let good = write_file(&dir, "good.tsv", "a\tp\tb\n");
    let bad = write_file(&dir, "bad.tsv", "only two\tcolumns\n");

    let store = FactStore::new(StoreConfig::default()).unwrap();
    let report = store.load_paths(&[bad, good]).unwrap();

    assert_eq!(report.facts_added, 1);
    assert_eq!(report.sources_loaded, 1);
    assert_eq!(report.failures.len(), 1);
    assert!(!report.is_complete());
    assert!(report.failures[0].label.ends_with("bad.tsv"));

    let ready = store.prepare().unwrap();
    assert!(ready.entity_named("a").is_ok());
}

#[test]
fn malformed_rows_are_skipped_and_counted() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = write_file(
        &dir,
        "facts.nt",
        "<a> <p> <b> .\nthis is not a statement\n<c> <p> <d> .\n",
    );

    let store = FactStore::new(StoreConfig::default()).unwrap();
    let report = store.load_paths(&[path]).unwrap();

    assert!(report.is_complete());
    assert_eq!(report.facts_added, 2);
    assert_eq!(report.rows_skipped, 1);
}

#[test]
fn unknown_extension_fails_before_loading() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = write_file(&dir, "facts.xml", "<xml/>");

    let store = FactStore::new(StoreConfig::default()).unwrap();
    assert!(store.load_paths(&[path]).is_err());
}

#[test]
fn missing_file_is_a_source_failure() {
    let store = FactStore::new(StoreConfig::default()).unwrap();
    let report = store
        .load_paths(&[PathBuf::from("/nonexistent/facts.tsv")])
        .unwrap();
    assert_eq!(report.sources_loaded, 0);
    assert_eq!(report.failures.len(), 1);
}
