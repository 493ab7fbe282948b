//! Rich diagnostic error types for the kgwalk engine.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]` derives,
//! providing error codes, help text, and source chains so users know exactly what
//! went wrong and how to fix it.
//!
//! Per-entity sampling gaps (an entity missing from the graph, an entity without
//! eligible edges) are deliberately *not* errors: they are counted in the
//! [`RunSummary`](crate::manager::RunSummary) and logged.

use miette::Diagnostic;
use thiserror::Error;

/// Top-level error type for the kgwalk engine.
///
/// Each variant wraps a subsystem-specific error, preserving the full diagnostic
/// chain (error codes, help text, source spans) through to the user.
#[derive(Debug, Error, Diagnostic)]
pub enum KgWalkError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Sink(#[from] SinkError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Manager(#[from] ManagerError),
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("invalid value for `{field}`: {message}")]
    #[diagnostic(
        code(kgwalk::config::invalid_value),
        help("Check the configuration file and command-line flags. {message}")
    )]
    InvalidValue { field: &'static str, message: String },

    #[error("unknown walk generation mode: {value}")]
    #[diagnostic(
        code(kgwalk::config::unknown_mode),
        help(
            "Valid modes are RANDOM_WALKS, RANDOM_WALKS_DUPLICATE_FREE, MID_WALKS, \
             MID_WALKS_DUPLICATE_FREE and MID_WALKS_WEIGHTED (case-insensitive)."
        )
    )]
    UnknownMode { value: String },

    #[error("walk sampler `{sampler}` does not support mode {mode}")]
    #[diagnostic(
        code(kgwalk::config::unsupported_mode),
        help("Pick a walk generation mode listed in the sampler's capabilities.")
    )]
    UnsupportedMode { sampler: String, mode: String },

    #[error("walk sampler `{sampler}` cannot generate text walks")]
    #[diagnostic(
        code(kgwalk::config::unsupported_text),
        help("Disable `embed_text` or use a sampler with the text-walk capability.")
    )]
    UnsupportedText { sampler: String },

    #[error("required input does not exist: {path}")]
    #[diagnostic(
        code(kgwalk::config::missing_input),
        help("Check the path. Graph sources may be a single RDF file or a directory of files.")
    )]
    MissingInput { path: String },

    #[error("failed to read {path}")]
    #[diagnostic(
        code(kgwalk::config::read),
        help("Ensure the file exists and is readable.")
    )]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {message}")]
    #[diagnostic(
        code(kgwalk::config::parse),
        help("Check the TOML syntax and the field names of the walk configuration.")
    )]
    Parse { path: String, message: String },
}

// ---------------------------------------------------------------------------
// Graph source errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum SourceError {
    #[error("I/O error while reading graph source {path}")]
    #[diagnostic(
        code(kgwalk::source::io),
        help(
            "The graph source could not be read. Check permissions, and that \
             compressed files are valid gzip streams."
        )
    )]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot determine the RDF format of {path}")]
    #[diagnostic(
        code(kgwalk::source::unknown_format),
        help(
            "Supported extensions are .nt, .nq, .ttl, .trig, .n3, .rdf, .owl and .xml, \
             each optionally followed by .gz."
        )
    )]
    UnknownFormat { path: String },

    #[error("graph source does not exist: {path}")]
    #[diagnostic(
        code(kgwalk::source::not_found),
        help("Pass an existing RDF file or a directory containing RDF files.")
    )]
    NotFound { path: String },

    #[error("graph exceeds the index capacity of {capacity} edges or identifiers")]
    #[diagnostic(
        code(kgwalk::source::capacity),
        help("Split the graph, or use light mode to scope it to the entities you need.")
    )]
    CapacityExceeded { capacity: usize },
}

// ---------------------------------------------------------------------------
// Output sink errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum SinkError {
    #[error("cannot create walk file {path}")]
    #[diagnostic(
        code(kgwalk::sink::create),
        help("Ensure the output directory is writable and the disk is not full.")
    )]
    Create {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write walks to {path}")]
    #[diagnostic(
        code(kgwalk::sink::write),
        help("The walk file could not be written. Check free disk space.")
    )]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("walk sink lock poisoned")]
    #[diagnostic(
        code(kgwalk::sink::poisoned),
        help("A worker panicked while writing walks. The output file is incomplete.")
    )]
    Poisoned,
}

// ---------------------------------------------------------------------------
// Manager errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ManagerError {
    #[error("invalid state: expected {expected}, manager is {actual}")]
    #[diagnostic(
        code(kgwalk::manager::invalid_state),
        help(
            "A run goes Idle -> IndexBuilt -> Generating -> Finalized. Build the \
             index exactly once before generating, and use a new manager per run."
        )
    )]
    InvalidState {
        expected: &'static str,
        actual: &'static str,
    },

    #[error("failed to build worker pool: {message}")]
    #[diagnostic(
        code(kgwalk::manager::thread_pool),
        help("Lower the number of threads.")
    )]
    ThreadPool { message: String },
}

/// Convenience alias for functions returning kgwalk results.
pub type KgWalkResult<T> = std::result::Result<T, KgWalkError>;
