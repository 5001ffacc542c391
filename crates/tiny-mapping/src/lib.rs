//! Tree model and parser for tiny v1 mapping files.
//!
//! A tiny file maps program symbols (classes, fields, methods) across several
//! naming schemes, one tab-separated column per namespace. This crate parses
//! such a file into an arena-backed tree whose children are addressable by
//! the local name of any namespace.
//!
//! # Key Types
//!
//! - [`MappingFile`] -- A parsed file: namespace list plus entry tree
//! - [`MappingTree`] -- Arena of [`MappingEntry`] nodes rooted at index 0
//! - [`EntryRef`] -- Borrowed read-only handle for navigating a tree
//! - [`EntryKind`] -- Root / Class / Field / Method
//! - [`MappingError`] -- Parse and structural errors

pub mod entry;
pub mod error;
pub mod file;
pub mod kind;
mod parser;
pub mod tree;

pub use entry::{EntryId, MappingEntry};
pub use error::{MappingError, MappingResult};
pub use file::{MappingFile, FORMAT_VERSION};
pub use kind::EntryKind;
pub use tree::{EntryRef, MappingTree};
