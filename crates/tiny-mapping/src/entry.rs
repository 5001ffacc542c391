//! Mapping entries: the nodes of a [`MappingTree`](crate::MappingTree).

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::kind::EntryKind;

/// Stable handle of an entry inside one tree's arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(pub(crate) usize);

impl EntryId {
    /// The root entry of every tree.
    pub const ROOT: EntryId = EntryId(0);
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One symbol (class, field, method) or the synthetic root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MappingEntry {
    /// What kind of record this entry came from.
    pub kind: EntryKind,
    /// Kind marker plus path tokens preceding the name columns, tab-joined.
    pub raw_prefix: String,
    /// Local (never qualified) name per namespace.
    pub names: HashMap<String, String>,
    /// Children per namespace, keyed by local name plus attach suffix.
    pub(crate) children: HashMap<String, BTreeMap<String, EntryId>>,
    /// Owning entry; `None` only for the root and for unattached entries.
    pub(crate) parent: Option<EntryId>,
    /// Set while the entry is nesting scaffolding not yet defined by a record.
    pub(crate) placeholder: bool,
}

impl MappingEntry {
    /// Create an entry with no names and no children.
    pub fn new(kind: EntryKind, raw_prefix: impl Into<String>) -> Self {
        Self {
            kind,
            raw_prefix: raw_prefix.into(),
            names: HashMap::new(),
            children: HashMap::new(),
            parent: None,
            placeholder: false,
        }
    }

    /// Create the synthetic root.
    pub fn root() -> Self {
        Self::new(EntryKind::Root, "")
    }

    /// Create a placeholder class known only by its canonical local name.
    pub fn placeholder(canonical: &str, name: &str) -> Self {
        let mut entry = Self::new(EntryKind::Class, "CLASS");
        entry.names.insert(canonical.to_string(), name.to_string());
        entry.placeholder = true;
        entry
    }

    /// Local name in `namespace`, if any.
    pub fn name(&self, namespace: &str) -> Option<&str> {
        self.names.get(namespace).map(String::as_str)
    }

    /// The parent entry, once attached.
    pub fn parent(&self) -> Option<EntryId> {
        self.parent
    }

    /// Returns `true` while this entry is unfilled nesting scaffolding.
    pub fn is_placeholder(&self) -> bool {
        self.placeholder
    }
}
