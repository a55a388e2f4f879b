//! Store facade: the loading-phase [`FactStore`] and the read-only
//! [`PreparedStore`] it becomes.
//!
//! The two phases are distinct types: `prepare()` consumes the `FactStore`,
//! so inserting into a finalized store is a compile error rather than a
//! runtime assertion. All `PreparedStore` state is plain owned data, safe
//! for concurrent readers without locking.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use dashmap::DashMap;

use crate::error::{SemaResult, StoreError, SymbolError};
use crate::facts::{FactEntry, FactIndex, FactTable};
use crate::hierarchy::{
    self, name_is_literal, SchemaRelations,
};
use crate::interner::SymbolTable;
use crate::join::{JoinCodec, JoinPath};
use crate::literal::{self, LiteralFormatter};
use crate::loader::{self, LoadReport, TripleSource};
use crate::similarity::{SimilarityIndex, SimilarityMatch};
use crate::stats::FunctionalityTable;
use crate::symbol::{EntityId, Fact, RelationId};

/// Configuration for a fact store.
pub struct StoreConfig {
    /// Maximum join-relation path length; bounds the code space.
    pub join_length_limit: usize,
    /// Load sources concurrently (one rayon task per source).
    pub parallel_loading: bool,
    /// Capacity hint for the entity tables.
    pub expected_entities: usize,
    /// Literal formatter chain, applied in order to quoted object tokens
    /// before interning.
    pub formatters: Vec<Box<dyn LiteralFormatter>>,
    /// Optional similarity index, populated with every distinct literal
    /// value while the store is prepared.
    pub literal_index: Option<Arc<dyn SimilarityIndex>>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            join_length_limit: 2,
            parallel_loading: true,
            expected_entities: 1 << 16,
            formatters: literal::standard_chain(),
            literal_index: None,
        }
    }
}

impl std::fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreConfig")
            .field("join_length_limit", &self.join_length_limit)
            .field("parallel_loading", &self.parallel_loading)
            .field("expected_entities", &self.expected_entities)
            .field("formatters", &self.formatters.len())
            .field("literal_index", &self.literal_index.is_some())
            .finish()
    }
}

/// The mutable, loading-phase fact store.
///
/// Interning and fact insertion are safe to call from concurrent loader
/// workers. Query code should wait for [`prepare`](Self::prepare).
pub struct FactStore {
    config: StoreConfig,
    symbols: SymbolTable,
    facts: FactIndex,
    schema: SchemaRelations,
}

impl FactStore {
    /// Create an empty store. The schema relations (`rdf:type`,
    /// `rdfs:subClassOf`) are interned eagerly so their ids exist from the
    /// start.
    pub fn new(config: StoreConfig) -> SemaResult<Self> {
        if config.join_length_limit == 0 {
            return Err(StoreError::InvalidConfig {
                message: "join_length_limit must be > 0".into(),
            }
            .into());
        }
        let symbols = SymbolTable::with_capacity(config.expected_entities);
        let schema = SchemaRelations::resolve(&symbols)?;
        tracing::info!(
            join_length_limit = config.join_length_limit,
            parallel = config.parallel_loading,
            "initializing fact store"
        );
        Ok(Self {
            config,
            symbols,
            facts: FactIndex::new(),
            schema,
        })
    }

    /// Intern an entity name.
    pub fn intern_entity(&self, name: &str) -> SemaResult<EntityId> {
        self.symbols.intern_entity(name)
    }

    /// Intern a relation name, allocating its inverse pair as a unit.
    pub fn intern_relation(&self, name: &str) -> SemaResult<RelationId> {
        self.symbols.intern_relation(name)
    }

    /// Insert a fact by id. The materialized inverse is inserted as part of
    /// the same operation.
    pub fn add_fact(&self, subject: EntityId, predicate: RelationId, object: EntityId) {
        self.facts.add(subject, predicate, object);
    }

    /// Intern all three names and insert the fact. A quoted object runs
    /// through the literal formatter chain first.
    pub fn add_fact_by_name(&self, subject: &str, predicate: &str, object: &str) -> SemaResult<()> {
        let s = self.symbols.intern_entity(subject)?;
        let p = self.symbols.intern_relation(predicate)?;
        let o = if name_is_literal(object) {
            let formatted = literal::apply_chain(&self.config.formatters, object);
            self.symbols.intern_entity(&formatted)?
        } else {
            self.symbols.intern_entity(object)?
        };
        self.facts.add(s, p, o);
        Ok(())
    }

    /// Load triple sources, honoring `parallel_loading`.
    pub fn load(&self, sources: Vec<Box<dyn TripleSource>>) -> LoadReport {
        if self.config.parallel_loading {
            loader::load_parallel(self, sources)
        } else {
            loader::load_sequential(self, sources)
        }
    }

    /// Load files by path, choosing a parser per extension.
    pub fn load_paths(&self, paths: &[PathBuf]) -> SemaResult<LoadReport> {
        let sources = paths
            .iter()
            .map(|p| loader::source_for_path(p))
            .collect::<SemaResult<Vec<_>>>()?;
        Ok(self.load(sources))
    }

    /// The schema relation ids of this store.
    pub fn schema(&self) -> SchemaRelations {
        self.schema
    }

    /// Whether the entity's name denotes a literal. On-demand during
    /// loading; cached after `prepare()`.
    pub fn is_literal(&self, entity: EntityId) -> bool {
        self.symbols
            .entity_name(entity)
            .is_some_and(|name| name_is_literal(&name))
    }

    /// Whether the entity is used as a class. On-demand adjacency scan
    /// during loading; cached after `prepare()`.
    pub fn is_class(&self, entity: EntityId) -> bool {
        !self.is_literal(entity)
            && self
                .facts
                .facts_about(entity)
                .is_some_and(|facts| hierarchy::scan_is_class(&facts, &self.schema))
    }

    pub fn entity_count(&self) -> usize {
        self.symbols.entity_count()
    }

    pub fn relation_bound(&self) -> u32 {
        self.symbols.relation_bound()
    }

    pub fn fact_count(&self) -> usize {
        self.facts.len()
    }

    /// Finalize the store: freeze the tables, build the literal and class
    /// caches, compute functionality statistics, and (when configured)
    /// populate the literal similarity index.
    ///
    /// This is the one-way Loading → Ready transition; the store cannot be
    /// mutated afterwards.
    pub fn prepare(self) -> SemaResult<PreparedStore> {
        let FactStore {
            config,
            symbols,
            facts,
            schema,
        } = self;

        let frozen = symbols.into_parts();
        let (mut table, fact_count) = facts.into_table();
        let entity_count = frozen.entity_names.len();
        if table.len() < entity_count {
            table.resize_with(entity_count, || None);
        }

        let is_literal: Vec<bool> = frozen
            .entity_names
            .iter()
            .map(|name| name_is_literal(name))
            .collect();
        let is_class: Vec<bool> = (0..entity_count)
            .map(|e| {
                !is_literal[e]
                    && table[e]
                        .as_deref()
                        .is_some_and(|facts| hierarchy::scan_is_class(facts, &schema))
            })
            .collect();

        let relation_bound = frozen.relation_names.len() as u32;
        let functionality = FunctionalityTable::compute(&table, relation_bound);
        let codec = JoinCodec::new(relation_bound, config.join_length_limit);

        let mut literals_indexed = 0usize;
        if let Some(index) = &config.literal_index {
            for (e, name) in frozen.entity_names.iter().enumerate() {
                if is_literal[e] {
                    index.index(name);
                    literals_indexed += 1;
                }
            }
        }

        tracing::info!(
            entities = entity_count,
            relation_pairs = (relation_bound - RelationId::FIRST) / 2,
            facts = fact_count,
            literals_indexed,
            "fact store prepared"
        );

        Ok(PreparedStore {
            entity_ids: frozen.entity_ids,
            entity_names: frozen.entity_names,
            relation_ids: frozen.relation_ids,
            relation_names: frozen.relation_names,
            table,
            fact_count,
            schema,
            is_literal,
            is_class,
            functionality,
            codec,
            literal_index: config.literal_index,
        })
    }
}

impl std::fmt::Debug for FactStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FactStore")
            .field("entities", &self.entity_count())
            .field("facts", &self.fact_count())
            .finish()
    }
}

/// The immutable, query-ready fact store.
pub struct PreparedStore {
    entity_ids: DashMap<String, EntityId>,
    entity_names: Vec<String>,
    relation_ids: DashMap<String, RelationId>,
    relation_names: Vec<String>,
    table: FactTable,
    fact_count: usize,
    schema: SchemaRelations,
    is_literal: Vec<bool>,
    is_class: Vec<bool>,
    functionality: FunctionalityTable,
    codec: JoinCodec,
    literal_index: Option<Arc<dyn SimilarityIndex>>,
}

impl PreparedStore {
    // -----------------------------------------------------------------------
    // Symbol lookups — never allocate, fail on unseen names
    // -----------------------------------------------------------------------

    pub fn entity_named(&self, name: &str) -> SemaResult<EntityId> {
        self.entity_ids
            .get(name)
            .map(|r| *r)
            .ok_or_else(|| SymbolError::UnknownEntity { name: name.into() }.into())
    }

    pub fn relation_named(&self, name: &str) -> SemaResult<RelationId> {
        self.relation_ids
            .get(name)
            .map(|r| *r)
            .ok_or_else(|| SymbolError::UnknownRelation { name: name.into() }.into())
    }

    pub fn entity_name(&self, id: EntityId) -> Option<&str> {
        self.entity_names.get(id.index()).map(String::as_str)
    }

    pub fn relation_name(&self, id: RelationId) -> Option<&str> {
        if id.get() < RelationId::FIRST {
            return None;
        }
        self.relation_names.get(id.index()).map(String::as_str)
    }

    // -----------------------------------------------------------------------
    // Facts
    // -----------------------------------------------------------------------

    /// A subject's facts in both directions. `None` for an entity with no
    /// facts (distinct from an unknown entity only by id validity).
    pub fn facts_about(&self, subject: EntityId) -> Option<&[FactEntry]> {
        self.table.get(subject.index()).and_then(|s| s.as_deref())
    }

    /// Iterate every stored forward fact (the materialized inverses are
    /// mirrors of these).
    pub fn facts(&self) -> impl Iterator<Item = Fact> + '_ {
        self.table.iter().enumerate().flat_map(|(s, slot)| {
            slot.as_deref()
                .unwrap_or(&[])
                .iter()
                .filter(|(p, _)| !p.is_inverse())
                .map(move |&(p, o)| Fact::new(EntityId::new(s as u32), p, o))
        })
    }

    // -----------------------------------------------------------------------
    // Hierarchy
    // -----------------------------------------------------------------------

    pub fn schema(&self) -> SchemaRelations {
        self.schema
    }

    pub fn is_literal(&self, entity: EntityId) -> bool {
        self.is_literal.get(entity.index()).copied().unwrap_or(false)
    }

    pub fn is_class(&self, entity: EntityId) -> bool {
        self.is_class.get(entity.index()).copied().unwrap_or(false)
    }

    /// The direct classes of an instance.
    pub fn classes_of(&self, instance: EntityId) -> HashSet<EntityId> {
        self.facts_about(instance)
            .map(|facts| hierarchy::direct_classes(facts, &self.schema))
            .unwrap_or_default()
    }

    /// The instances of a class, via the materialized inverse of `rdf:type`.
    pub fn instances_of(&self, class: EntityId) -> HashSet<EntityId> {
        self.facts_about(class)
            .map(|facts| hierarchy::direct_instances(facts, &self.schema))
            .unwrap_or_default()
    }

    /// Direct classes plus the transitive `subClassOf` closure above them.
    /// Terminates on cyclic class graphs.
    pub fn classes_and_superclasses_of(&self, instance: EntityId) -> HashSet<EntityId> {
        hierarchy::superclass_closure(&self.table, &self.schema, self.classes_of(instance))
    }

    // -----------------------------------------------------------------------
    // Statistics
    // -----------------------------------------------------------------------

    /// Functionality of a relation, in (0, 1]. `None` for a relation with
    /// no facts.
    pub fn functionality(&self, relation: RelationId) -> Option<f64> {
        self.functionality.functionality(relation)
    }

    pub fn inverse_functionality(&self, relation: RelationId) -> Option<f64> {
        self.functionality.inverse_functionality(relation)
    }

    /// Minimum functionality along a join path.
    pub fn path_functionality(&self, path: &JoinPath) -> Option<f64> {
        self.functionality.path_functionality(path)
    }

    // -----------------------------------------------------------------------
    // Join relations
    // -----------------------------------------------------------------------

    pub fn encode_join(&self, path: &JoinPath) -> SemaResult<u64> {
        self.codec.encode(path)
    }

    /// Decode a join-relation code back into its path.
    pub fn join_relation_by_code(&self, code: u64) -> SemaResult<JoinPath> {
        self.codec.decode(code)
    }

    /// Exclusive upper bound of the join code space.
    pub fn max_join_code(&self) -> u64 {
        self.codec.max_code()
    }

    // -----------------------------------------------------------------------
    // Literal similarity
    // -----------------------------------------------------------------------

    /// Forwarded query against the configured literal similarity index.
    /// Empty when no index was configured.
    pub fn similar_literals(&self, text: &str, min_similarity: f64) -> Vec<SimilarityMatch> {
        self.literal_index
            .as_ref()
            .map(|index| index.query(text, min_similarity))
            .unwrap_or_default()
    }

    // -----------------------------------------------------------------------
    // Introspection
    // -----------------------------------------------------------------------

    pub fn entity_count(&self) -> usize {
        self.entity_names.len()
    }

    pub fn relation_bound(&self) -> u32 {
        self.relation_names.len() as u32
    }

    pub fn fact_count(&self) -> usize {
        self.fact_count
    }

    /// Summary counts for display.
    pub fn info(&self) -> StoreInfo {
        StoreInfo {
            entities: self.entity_count(),
            relation_pairs: ((self.relation_bound() - RelationId::FIRST) / 2) as usize,
            facts: self.fact_count,
            literals: self.is_literal.iter().filter(|&&b| b).count(),
            classes: self.is_class.iter().filter(|&&b| b).count(),
            max_join_code: self.max_join_code(),
        }
    }
}

impl std::fmt::Debug for PreparedStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreparedStore")
            .field("entities", &self.entity_count())
            .field("facts", &self.fact_count)
            .finish()
    }
}

/// Summary information about a prepared store.
#[derive(Debug, Clone)]
pub struct StoreInfo {
    pub entities: usize,
    pub relation_pairs: usize,
    pub facts: usize,
    pub literals: usize,
    pub classes: usize,
    pub max_join_code: u64,
}

impl std::fmt::Display for StoreInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "fact store info")?;
        writeln!(f, "  entities:       {}", self.entities)?;
        writeln!(f, "  relation pairs: {}", self.relation_pairs)?;
        writeln!(f, "  facts:          {}", self.facts)?;
        writeln!(f, "  literals:       {}", self.literals)?;
        writeln!(f, "  classes:        {}", self.classes)?;
        writeln!(f, "  max join code:  {}", self.max_join_code)?;
        Ok(())
    }
}
