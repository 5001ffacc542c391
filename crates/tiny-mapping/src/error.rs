//! Error types for the mapping crate.

use crate::entry::EntryId;

/// Errors that can occur while parsing or building a mapping tree.
#[derive(Debug, thiserror::Error)]
pub enum MappingError {
    /// The header line is missing or malformed.
    #[error("invalid header: {0}")]
    InvalidHeader(String),

    /// A record line starts with a kind marker that is not recognised.
    #[error("line {line}: unknown entry kind {kind:?}")]
    UnknownEntryKind { line: usize, kind: String },

    /// A record line does not carry enough columns for its kind.
    #[error("line {line}: malformed record: {reason}")]
    MalformedRecord { line: usize, reason: String },

    /// Two entries under the same parent share a (namespace, name) key.
    #[error("duplicate entry: ({namespace}, {name})")]
    DuplicateEntry { namespace: String, name: String },

    /// An id was used with a tree that did not mint it.
    #[error("entry {0} does not belong to this tree")]
    UnknownEntry(EntryId),

    /// Reading the input failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias for mapping results.
pub type MappingResult<T> = Result<T, MappingError>;
