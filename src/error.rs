//! Rich diagnostic error types for the fact store.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]`
//! derives, providing error codes and help text so callers know exactly what
//! went wrong and how to fix it.

use miette::Diagnostic;
use thiserror::Error;

/// Top-level error type for the sema-tawy fact store.
///
/// Each variant wraps a subsystem-specific error, preserving the full
/// diagnostic chain (error codes, help text, source chains) through to the
/// caller.
#[derive(Debug, Error, Diagnostic)]
pub enum SemaError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Symbol(#[from] SymbolError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Loader(#[from] LoaderError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Path(#[from] PathError),
}

// ---------------------------------------------------------------------------
// Symbol errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum SymbolError {
    #[error("unknown entity: {name}")]
    #[diagnostic(
        code(sema::symbol::unknown_entity),
        help(
            "The store is finalized, so lookups never allocate. \
             The entity was not seen during the loading phase — check the \
             spelling, or verify the source files that should contain it."
        )
    )]
    UnknownEntity { name: String },

    #[error("unknown relation: {name}")]
    #[diagnostic(
        code(sema::symbol::unknown_relation),
        help(
            "The store is finalized, so lookups never allocate. \
             Relation names are matched exactly, including the trailing \
             inverse marker `-`."
        )
    )]
    UnknownRelation { name: String },

    #[error("{kind} id space exhausted: cannot allocate more than u32::MAX ids")]
    #[diagnostic(
        code(sema::symbol::exhausted),
        help(
            "The dense id space ran out. This requires ~4 billion distinct \
             names — if you see this error, check for an interning loop that \
             generates unbounded fresh names."
        )
    )]
    IdSpaceExhausted { kind: &'static str },
}

// ---------------------------------------------------------------------------
// Store errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum StoreError {
    #[error("invalid configuration: {message}")]
    #[diagnostic(
        code(sema::store::invalid_config),
        help("Check the StoreConfig fields. {message}")
    )]
    InvalidConfig { message: String },
}

// ---------------------------------------------------------------------------
// Loader errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum LoaderError {
    /// A single bad row. The loader logs it and keeps going.
    #[error("malformed row in {source_label} (line {line}): {message}")]
    #[diagnostic(
        code(sema::loader::malformed_row),
        help(
            "The row was skipped and loading continued. If many rows in one \
             file are malformed, the file may be in a different format than \
             its extension suggests."
        )
    )]
    MalformedRow {
        source_label: String,
        line: usize,
        message: String,
    },

    /// The source as a whole cannot be interpreted. Fatal for that source.
    #[error("unreadable source {source_label}: {message}")]
    #[diagnostic(
        code(sema::loader::unreadable_source),
        help(
            "The input's shape is not one the parser recognizes (for TSV: \
             3 columns, or 4 with a leading fact id). The whole source is \
             abandoned; other sources still load."
        )
    )]
    UnreadableSource {
        source_label: String,
        message: String,
    },

    #[error("I/O error reading {path}")]
    #[diagnostic(
        code(sema::loader::io),
        help("Check that the file exists and is readable.")
    )]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("no parser for {path}")]
    #[diagnostic(
        code(sema::loader::unknown_format),
        help("Recognized extensions are .tsv, .nt and .json.")
    )]
    UnknownFormat { path: String },
}

// ---------------------------------------------------------------------------
// Join-relation codec errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum PathError {
    #[error("join path of length {length} exceeds the limit of {limit}")]
    #[diagnostic(
        code(sema::path::too_long),
        help(
            "The join-length limit bounds the code space. Raise \
             `join_length_limit` in StoreConfig if longer paths are needed."
        )
    )]
    PathTooLong { length: usize, limit: usize },

    #[error("relation id {relation} is outside the codec base {bound}")]
    #[diagnostic(
        code(sema::path::relation_out_of_range),
        help(
            "Every relation id in a path must be below the store's relation \
             bound. Ids from a different store are not portable."
        )
    )]
    RelationOutOfRange { relation: u32, bound: u32 },

    #[error("join code {code} is outside the code space (max {max})")]
    #[diagnostic(
        code(sema::path::code_out_of_range),
        help("Valid codes are below max_join_code().")
    )]
    CodeOutOfRange { code: u64, max: u64 },

    #[error("join code {code} does not decode to a valid path")]
    #[diagnostic(
        code(sema::path::invalid_code),
        help(
            "The code produced a reserved sentinel digit. Only codes obtained \
             from encode() (or below max_join_code() with valid digits) are \
             decodable."
        )
    )]
    InvalidCode { code: u64 },
}

/// Convenience alias for functions returning sema-tawy results.
pub type SemaResult<T> = std::result::Result<T, SemaError>;
