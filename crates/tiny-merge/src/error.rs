//! Error types for the merge crate.

use tiny_mapping::MappingError;

/// Errors that abort a merge. None of them is recoverable mid-run.
#[derive(Debug, thiserror::Error)]
pub enum MergeError {
    /// The inputs do not share a canonical namespace.
    #[error("canonical namespaces differ: {left:?} vs {right:?}")]
    NamespaceMismatch { left: String, right: String },

    /// Two entries at the same position carry different record headers.
    #[error("header mismatch: {left:?} vs {right:?}")]
    HeaderMismatch { left: String, right: String },

    /// The inputs assert different names for one namespace of one entry.
    #[error("name conflict in {namespace}: {left:?} vs {right:?}")]
    NameConflict {
        namespace: String,
        left: String,
        right: String,
    },

    /// No name could be produced, even through the fallback namespaces.
    #[error("cannot resolve a {namespace} name for {entry}")]
    UnresolvedName { namespace: String, entry: String },

    /// The merge configuration could not be loaded.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Parsing an input failed.
    #[error(transparent)]
    Mapping(#[from] MappingError),

    /// Writing the output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias for merge results.
pub type MergeResult<T> = Result<T, MergeError>;
