//! Arena-backed mapping tree with multi-namespace child lookup.
//!
//! Every entry lives in one `Vec` and is referred to by [`EntryId`]. A parent
//! records each child once per namespace the child has a name in, so a child
//! can be found by the local name of *any* namespace. Parent links are plain
//! indices; the arena owns all entries.
//!
//! # Invariants
//!
//! - Index 0 is the root and is never a child.
//! - Within one parent, a `(namespace, key)` pair maps to at most one child.
//! - An entry's parent is set once, when it is attached.

use std::collections::btree_map;
use std::fmt;

use crate::entry::{EntryId, MappingEntry};
use crate::error::{MappingError, MappingResult};
use crate::kind::EntryKind;

/// An arena of mapping entries rooted at [`EntryId::ROOT`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MappingTree {
    entries: Vec<MappingEntry>,
}

impl Default for MappingTree {
    fn default() -> Self {
        Self::new()
    }
}

impl MappingTree {
    /// Create a tree holding only the root.
    pub fn new() -> Self {
        Self {
            entries: vec![MappingEntry::root()],
        }
    }

    /// Total number of entries, root included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the tree holds nothing but the root.
    pub fn is_empty(&self) -> bool {
        self.entries.len() == 1
    }

    /// Get an entry by id.
    pub fn get(&self, id: EntryId) -> Option<&MappingEntry> {
        self.entries.get(id.0)
    }

    pub(crate) fn get_mut(&mut self, id: EntryId) -> Option<&mut MappingEntry> {
        self.entries.get_mut(id.0)
    }

    pub(crate) fn entry_mut(&mut self, id: EntryId) -> MappingResult<&mut MappingEntry> {
        self.get_mut(id).ok_or_else(|| unknown(id))
    }

    /// A navigation handle for the root.
    pub fn root(&self) -> EntryRef<'_> {
        EntryRef {
            tree: self,
            id: EntryId::ROOT,
        }
    }

    /// Iterate over all entries in arena order, root first.
    pub fn iter(&self) -> impl Iterator<Item = (EntryId, &MappingEntry)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, e)| (EntryId(i), e))
    }

    /// Number of non-root entries of the given kind.
    pub fn count(&self, kind: EntryKind) -> usize {
        self.entries.iter().filter(|e| e.kind == kind).count()
    }

    // ---------------------------------------------------------------
    // Construction
    // ---------------------------------------------------------------

    /// Move an unattached entry into the arena.
    pub fn insert(&mut self, entry: MappingEntry) -> EntryId {
        let id = EntryId(self.entries.len());
        self.entries.push(entry);
        id
    }

    /// Attach `child` under `parent`.
    ///
    /// For every `(namespace, name)` the child currently has, the key
    /// `(namespace, name + suffix)` is recorded in the parent. All keys are
    /// checked before any is written: a key already bound to a different
    /// entry fails with [`MappingError::DuplicateEntry`] and leaves the tree
    /// untouched. A key already bound to `child` itself is accepted, which
    /// lets a filled-in placeholder be attached again with its new names.
    pub fn add_child(&mut self, parent: EntryId, child: EntryId, suffix: &str) -> MappingResult<()> {
        let keys: Vec<(String, String)> = {
            let entry = self.get(child).ok_or_else(|| unknown(child))?;
            entry
                .names
                .iter()
                .map(|(ns, name)| (ns.clone(), format!("{name}{suffix}")))
                .collect()
        };

        let parent_entry = self.get(parent).ok_or_else(|| unknown(parent))?;
        for (ns, key) in &keys {
            let bound = parent_entry.children.get(ns).and_then(|m| m.get(key));
            if matches!(bound, Some(existing) if *existing != child) {
                return Err(MappingError::DuplicateEntry {
                    namespace: ns.clone(),
                    name: key.clone(),
                });
            }
        }

        if let Some(entry) = self.get_mut(child) {
            debug_assert!(entry.parent.is_none() || entry.parent == Some(parent));
            entry.parent = Some(parent);
        }
        if let Some(parent_entry) = self.get_mut(parent) {
            for (ns, key) in keys {
                parent_entry.children.entry(ns).or_default().insert(key, child);
            }
        }
        Ok(())
    }

    // ---------------------------------------------------------------
    // Lookup
    // ---------------------------------------------------------------

    /// Find the child of `parent` recorded under `(namespace, key)`.
    pub fn child(&self, parent: EntryId, namespace: &str, key: &str) -> Option<EntryId> {
        self.get(parent)?.children.get(namespace)?.get(key).copied()
    }

    /// All children of `parent` recorded under `namespace`, sorted by key.
    pub fn children_in(&self, parent: EntryId, namespace: &str) -> ChildIter<'_> {
        ChildIter {
            inner: self
                .get(parent)
                .and_then(|e| e.children.get(namespace))
                .map(|m| m.iter()),
        }
    }
}

fn unknown(id: EntryId) -> MappingError {
    MappingError::UnknownEntry(id)
}

/// Sorted `(key, child)` pairs of one parent in one namespace.
pub struct ChildIter<'a> {
    inner: Option<btree_map::Iter<'a, String, EntryId>>,
}

impl<'a> Iterator for ChildIter<'a> {
    type Item = (&'a str, EntryId);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .as_mut()?
            .next()
            .map(|(k, id)| (k.as_str(), *id))
    }
}

/// A borrowed, read-only view of one entry together with its tree.
#[derive(Clone, Copy)]
pub struct EntryRef<'a> {
    tree: &'a MappingTree,
    id: EntryId,
}

impl fmt::Debug for EntryRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntryRef")
            .field("id", &self.id)
            .field("kind", &self.kind())
            .field("raw_prefix", &self.raw_prefix())
            .finish()
    }
}

impl<'a> EntryRef<'a> {
    pub fn id(&self) -> EntryId {
        self.id
    }

    pub fn entry(&self) -> &'a MappingEntry {
        &self.tree.entries[self.id.0]
    }

    pub fn kind(&self) -> EntryKind {
        self.entry().kind
    }

    pub fn raw_prefix(&self) -> &'a str {
        &self.entry().raw_prefix
    }

    pub fn name(&self, namespace: &str) -> Option<&'a str> {
        self.entry().name(namespace)
    }

    pub fn is_placeholder(&self) -> bool {
        self.entry().placeholder
    }

    pub fn parent(&self) -> Option<EntryRef<'a>> {
        self.entry().parent.map(|id| EntryRef {
            tree: self.tree,
            id,
        })
    }

    /// Child recorded under `(namespace, key)`.
    pub fn child(&self, namespace: &str, key: &str) -> Option<EntryRef<'a>> {
        self.tree.child(self.id, namespace, key).map(|id| EntryRef {
            tree: self.tree,
            id,
        })
    }

    /// Sorted child keys recorded under `namespace`.
    pub fn child_keys(&self, namespace: &str) -> impl Iterator<Item = &'a str> {
        self.tree.children_in(self.id, namespace).map(|(key, _)| key)
    }
}
