//! # sema-tawy
//!
//! An in-memory interned fact store: the substrate for an ontology/schema
//! alignment engine. Facts are (subject, predicate, object) triples over
//! densely interned entities and relations; every relation carries a
//! materialized inverse, so lookups run in either direction without a
//! separate reverse index.
//!
//! ## Architecture
//!
//! - **Symbols** (`symbol`, `interner`): dense entity/relation ids with
//!   bidirectional name tables; relations are allocated in inverse pairs
//! - **Facts** (`facts`): per-subject adjacency lists, inverse facts
//!   materialized on insert
//! - **Hierarchy** (`hierarchy`): class/instance resolution and transitive
//!   superclass closure over `rdfs:subClassOf`
//! - **Statistics** (`stats`): per-relation functionality, computed in one
//!   pass when the store is prepared
//! - **Loading** (`loader`): parallel bulk loading from TSV, N-Triples and
//!   JSON sources via rayon
//! - **Join relations** (`join`): bijective mixed-radix encoding of bounded
//!   relation paths
//!
//! ## Library usage
//!
//! ```no_run
//! use sema_tawy::store::{FactStore, StoreConfig};
//!
//! let store = FactStore::new(StoreConfig::default()).unwrap();
//! store.add_fact_by_name("y:Elvis", "rdf:type", "y:Singer").unwrap();
//! store.add_fact_by_name("y:Singer", "rdfs:subClassOf", "y:Person").unwrap();
//!
//! let ready = store.prepare().unwrap();
//! let elvis = ready.entity_named("y:Elvis").unwrap();
//! let classes = ready.classes_and_superclasses_of(elvis);
//! assert_eq!(classes.len(), 2);
//! ```

pub mod error;
pub mod facts;
pub mod hierarchy;
pub mod interner;
pub mod join;
pub mod literal;
pub mod loader;
pub mod similarity;
pub mod stats;
pub mod store;
pub mod symbol;
