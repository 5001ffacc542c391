//! Record kinds of a tiny v1 file.

use std::fmt;
use std::str::FromStr;

/// The kind of a mapping entry.
///
/// `Root` is the synthetic top of every tree and never appears in a file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntryKind {
    Root,
    Class,
    Field,
    Method,
}

impl EntryKind {
    /// The record marker used in the first column, `None` for the root.
    pub fn marker(self) -> Option<&'static str> {
        match self {
            Self::Root => None,
            Self::Class => Some("CLASS"),
            Self::Field => Some("FIELD"),
            Self::Method => Some("METHOD"),
        }
    }

    /// Returns `true` for fields and methods.
    pub fn is_member(self) -> bool {
        matches!(self, Self::Field | Self::Method)
    }
}

impl FromStr for EntryKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CLASS" => Ok(Self::Class),
            "FIELD" => Ok(Self::Field),
            "METHOD" => Ok(Self::Method),
            _ => Err(()),
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.marker().unwrap_or("ROOT"))
    }
}
