//! Per-entry reconciliation of two mapping trees.
//!
//! Given the entries found at the same position in tree A and tree B, the
//! [`Resolver`] produces one [`MergedRecord`]: the shared record header plus a
//! name for every merged namespace. Names missing on both sides are taken
//! from the configured fallback namespaces; names present on both sides must
//! agree.
//!
//! Class names are written fully qualified, so a class's value in a
//! namespace is rebuilt from its own local name and the local names of its
//! enclosing classes in that namespace (`Outer$Inner`).

use std::fmt;

use tiny_mapping::{EntryKind, EntryRef};

use crate::config::MergeConfig;
use crate::error::{MergeError, MergeResult};

/// Separator between nesting levels of a qualified class name.
const NEST_SEPARATOR: char = '$';

/// The entries found at one tree position; at least one side is present.
#[derive(Clone, Copy, Debug)]
pub enum EntryPair<'t> {
    Left(EntryRef<'t>),
    Right(EntryRef<'t>),
    Both(EntryRef<'t>, EntryRef<'t>),
}

impl<'t> EntryPair<'t> {
    /// Pair up two optional entries; `None` when both are absent.
    pub fn new(a: Option<EntryRef<'t>>, b: Option<EntryRef<'t>>) -> Option<Self> {
        match (a, b) {
            (Some(a), Some(b)) => Some(Self::Both(a, b)),
            (Some(a), None) => Some(Self::Left(a)),
            (None, Some(b)) => Some(Self::Right(b)),
            (None, None) => None,
        }
    }

    pub fn left(&self) -> Option<EntryRef<'t>> {
        match *self {
            Self::Left(a) | Self::Both(a, _) => Some(a),
            Self::Right(_) => None,
        }
    }

    pub fn right(&self) -> Option<EntryRef<'t>> {
        match *self {
            Self::Right(b) | Self::Both(_, b) => Some(b),
            Self::Left(_) => None,
        }
    }

    /// A's entry when present, B's otherwise.
    pub fn primary(&self) -> EntryRef<'t> {
        match *self {
            Self::Left(a) | Self::Both(a, _) => a,
            Self::Right(b) => b,
        }
    }
}

/// One output line: the record header plus a value per namespace.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MergedRecord {
    pub kind: EntryKind,
    pub prefix: String,
    pub values: Vec<String>,
}

impl MergedRecord {
    /// Tab-joined line, without a trailing newline.
    pub fn to_line(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for MergedRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.prefix)?;
        for value in &self.values {
            write!(f, "\t{value}")?;
        }
        Ok(())
    }
}

/// Reconciles entry pairs under one [`MergeConfig`].
#[derive(Clone, Copy, Debug)]
pub struct Resolver<'c> {
    config: &'c MergeConfig,
    canonical: &'c str,
}

impl<'c> Resolver<'c> {
    /// `canonical` is only used to describe entries in error messages.
    pub fn new(config: &'c MergeConfig, canonical: &'c str) -> Self {
        Self { config, canonical }
    }

    /// Build the output record for `pair` over `namespaces`, in order.
    pub fn merge_record(&self, pair: EntryPair<'_>, namespaces: &[String]) -> MergeResult<MergedRecord> {
        if let EntryPair::Both(a, b) = pair {
            if a.raw_prefix() != b.raw_prefix() {
                return Err(MergeError::HeaderMismatch {
                    left: a.raw_prefix().to_string(),
                    right: b.raw_prefix().to_string(),
                });
            }
        }

        let primary = pair.primary();
        let values = namespaces
            .iter()
            .map(|ns| self.resolve_value(pair, ns))
            .collect::<MergeResult<Vec<_>>>()?;

        Ok(MergedRecord {
            kind: primary.kind(),
            prefix: primary.raw_prefix().to_string(),
            values,
        })
    }

    /// The value written for `namespace`: the pair's own name there, or the
    /// first fallback namespace that yields one.
    pub fn resolve_value(&self, pair: EntryPair<'_>, namespace: &str) -> MergeResult<String> {
        if let Some(value) = self.match_in(pair, namespace)? {
            return Ok(value);
        }
        for fallback in self.config.fallback_order() {
            if let Some(value) = self.match_in(pair, fallback)? {
                return Ok(value);
            }
        }
        Err(self.unresolved(pair.primary(), namespace))
    }

    /// The agreed name of `pair` in `namespace`, if either side has one.
    pub fn match_in(&self, pair: EntryPair<'_>, namespace: &str) -> MergeResult<Option<String>> {
        let (a, b) = (pair.left(), pair.right());
        let left = self.reconstruct(a, b, namespace)?;
        let right = self.reconstruct(b, a, namespace)?;

        match (left, right) {
            (Some(left), Some(right)) if left != right => Err(MergeError::NameConflict {
                namespace: namespace.to_string(),
                left,
                right,
            }),
            (Some(left), _) => Ok(Some(left)),
            (None, right) => Ok(right),
        }
    }

    /// The name of `entry` in `namespace`, qualified with its enclosing
    /// classes when it is a class.
    ///
    /// Enclosing class names are read from `entry`'s ancestors, then from
    /// `other`'s ancestors at the same depth, then through the fallback
    /// namespaces. `other` defaults to `entry` itself.
    pub fn reconstruct<'t>(
        &self,
        entry: Option<EntryRef<'t>>,
        other: Option<EntryRef<'t>>,
        namespace: &str,
    ) -> MergeResult<Option<String>> {
        let Some(entry) = entry else {
            return Ok(None);
        };
        let Some(local) = entry.name(namespace) else {
            return Ok(None);
        };

        let mut qualified = local.to_string();
        if entry.kind() != EntryKind::Class {
            return Ok(Some(qualified));
        }

        let mut ancestor = entry.parent();
        let mut mirror = other.unwrap_or(entry).parent();
        while let Some(current) = ancestor.filter(|e| e.kind() == EntryKind::Class) {
            let segment = self.ancestor_name(current, mirror, namespace)?;
            qualified = format!("{segment}{NEST_SEPARATOR}{qualified}");
            ancestor = current.parent();
            mirror = mirror.and_then(|m| m.parent());
        }

        Ok(Some(qualified))
    }

    fn ancestor_name<'t>(
        &self,
        ancestor: EntryRef<'t>,
        mirror: Option<EntryRef<'t>>,
        namespace: &str,
    ) -> MergeResult<&'t str> {
        let lookup = |ns: &str| ancestor.name(ns).or_else(|| mirror.and_then(|m| m.name(ns)));

        if let Some(name) = lookup(namespace) {
            return Ok(name);
        }
        self.config
            .fallback_order()
            .iter()
            .find_map(|ns| lookup(ns.as_str()))
            .ok_or_else(|| self.unresolved(ancestor, namespace))
    }

    fn unresolved(&self, entry: EntryRef<'_>, namespace: &str) -> MergeError {
        MergeError::UnresolvedName {
            namespace: namespace.to_string(),
            entry: format!(
                "{} {}",
                entry.kind(),
                entry.name(self.canonical).unwrap_or("<unnamed>")
            ),
        }
    }
}
