//! A parsed tiny v1 mapping file.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::debug;

use crate::error::MappingResult;
use crate::parser;
use crate::tree::{EntryRef, MappingTree};

/// Marker in the first header column of every supported file.
pub const FORMAT_VERSION: &str = "v1";

/// Namespace list plus the entry tree built from a file's records.
///
/// The first namespace is canonical: classes are nested and children are
/// traversed by their canonical local name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MappingFile {
    namespaces: Vec<String>,
    tree: MappingTree,
}

impl MappingFile {
    pub(crate) fn from_parts(namespaces: Vec<String>, tree: MappingTree) -> Self {
        debug_assert!(!namespaces.is_empty());
        Self { namespaces, tree }
    }

    /// Parse a file held in memory.
    pub fn parse(text: &str) -> MappingResult<Self> {
        parser::parse(text.as_bytes())
    }

    /// Parse from any buffered reader.
    pub fn from_reader<R: BufRead>(reader: R) -> MappingResult<Self> {
        parser::parse(reader)
    }

    /// Open and parse the file at `path` as UTF-8.
    pub fn from_path(path: impl AsRef<Path>) -> MappingResult<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "reading mapping file");
        let file = File::open(path)?;
        parser::parse(BufReader::new(file))
    }

    /// Namespace labels in header order.
    pub fn namespaces(&self) -> &[String] {
        &self.namespaces
    }

    /// Number of namespace columns.
    pub fn namespace_count(&self) -> usize {
        self.namespaces.len()
    }

    /// The first-declared namespace.
    pub fn canonical(&self) -> &str {
        &self.namespaces[0]
    }

    pub fn tree(&self) -> &MappingTree {
        &self.tree
    }

    pub fn root(&self) -> EntryRef<'_> {
        self.tree.root()
    }
}
