//! Line parser turning tiny v1 text into a [`MappingTree`].
//!
//! Records are attached under the class path given in their second column.
//! Outer classes that are referenced before (or without) their own record are
//! synthesized as placeholders and filled in if their record shows up later.

use std::collections::HashSet;
use std::io::BufRead;

use tracing::debug;

use crate::entry::{EntryId, MappingEntry};
use crate::error::{MappingError, MappingResult};
use crate::file::{MappingFile, FORMAT_VERSION};
use crate::kind::EntryKind;
use crate::tree::MappingTree;

/// Separator between nesting levels of a class path.
const NEST_SEPARATOR: char = '$';

pub(crate) fn parse<R: BufRead>(reader: R) -> MappingResult<MappingFile> {
    let mut lines = reader.lines();
    let header = match lines.next() {
        Some(line) => line?,
        None => return Err(MappingError::InvalidHeader("missing header line".into())),
    };

    let mut builder = TreeBuilder::new(parse_header(&header)?);
    for (idx, line) in lines.enumerate() {
        // Line 1 is the header.
        builder.record(idx + 2, &line?)?;
    }

    let file = builder.finish();
    debug!(
        namespaces = ?file.namespaces(),
        entries = file.tree().len() - 1,
        "parsed mapping file"
    );
    Ok(file)
}

fn parse_header(line: &str) -> MappingResult<Vec<String>> {
    let tokens: Vec<&str> = line.trim().split('\t').map(str::trim).collect();
    if tokens.len() < 3 {
        return Err(MappingError::InvalidHeader(format!(
            "expected a version marker and at least two namespaces, found {} column(s)",
            tokens.len()
        )));
    }
    if tokens[0] != FORMAT_VERSION {
        return Err(MappingError::InvalidHeader(format!(
            "unsupported format marker {:?}",
            tokens[0]
        )));
    }

    let mut seen = HashSet::new();
    let mut namespaces = Vec::with_capacity(tokens.len() - 1);
    for ns in &tokens[1..] {
        if ns.is_empty() {
            return Err(MappingError::InvalidHeader("empty namespace label".into()));
        }
        if !seen.insert(*ns) {
            return Err(MappingError::InvalidHeader(format!(
                "namespace {ns:?} declared twice"
            )));
        }
        namespaces.push(ns.to_string());
    }
    Ok(namespaces)
}

struct TreeBuilder {
    namespaces: Vec<String>,
    tree: MappingTree,
}

impl TreeBuilder {
    fn new(namespaces: Vec<String>) -> Self {
        Self {
            namespaces,
            tree: MappingTree::new(),
        }
    }

    fn canonical(&self) -> &str {
        &self.namespaces[0]
    }

    fn record(&mut self, line_no: usize, raw: &str) -> MappingResult<()> {
        // Only the line ending is stripped: trailing tabs delimit empty columns.
        let line = raw.trim_end_matches(['\r', '\n']);
        let content = line.trim();
        if content.is_empty() || content.starts_with('#') {
            return Ok(());
        }

        let parts: Vec<&str> = line.split('\t').map(str::trim).collect();
        let kind: EntryKind = parts[0]
            .parse()
            .map_err(|_| MappingError::UnknownEntryKind {
                line: line_no,
                kind: parts[0].to_string(),
            })?;

        let count = self.namespaces.len();
        // CLASS: marker + names; FIELD/METHOD: marker + owner + descriptor + names.
        let min = if kind.is_member() { count + 3 } else { count + 1 };
        if parts.len() < min {
            return Err(MappingError::MalformedRecord {
                line: line_no,
                reason: format!(
                    "{kind} record needs at least {min} columns, found {}",
                    parts.len()
                ),
            });
        }

        let columns = &parts[parts.len() - count..];
        if columns[0].is_empty() {
            return Err(MappingError::MalformedRecord {
                line: line_no,
                reason: format!("missing name in canonical namespace {:?}", self.canonical()),
            });
        }

        let path: Vec<&str> = parts[1].split(NEST_SEPARATOR).collect();
        let (outer, local) = match kind {
            EntryKind::Class => (&path[..path.len() - 1], path.last().copied()),
            _ => (&path[..], None),
        };

        let mut parent = EntryId::ROOT;
        for segment in outer {
            parent = self.descend(line_no, parent, segment)?;
        }

        let prefix = parts[..parts.len() - count].join("\t");
        let id = match local {
            Some(local) => self.class_slot(parent, local, kind, prefix)?,
            None => self.tree.insert(MappingEntry::new(kind, prefix)),
        };

        let entry = self.tree.entry_mut(id)?;
        for (ns, column) in self.namespaces.iter().zip(columns) {
            if column.is_empty() {
                continue;
            }
            let name = match kind {
                EntryKind::Class => innermost(column),
                _ => column,
            };
            entry.names.insert(ns.clone(), name.to_string());
        }

        let suffix = if kind.is_member() { parts[2] } else { "" };
        self.tree.add_child(parent, id, suffix)
    }

    /// Find the class `segment` under `parent`, synthesizing a placeholder
    /// when the file has not defined it (yet).
    fn descend(&mut self, line_no: usize, parent: EntryId, segment: &str) -> MappingResult<EntryId> {
        if let Some(id) = self.tree.child(parent, self.canonical(), segment) {
            return Ok(id);
        }

        debug!(line = line_no, class = segment, "synthesizing placeholder class");
        let placeholder = MappingEntry::placeholder(self.canonical(), segment);
        let id = self.tree.insert(placeholder);
        self.tree.add_child(parent, id, "")?;
        Ok(id)
    }

    /// The entry a CLASS record lands in: a placeholder waiting for its
    /// definition, or a fresh entry.
    fn class_slot(
        &mut self,
        parent: EntryId,
        local: &str,
        kind: EntryKind,
        prefix: String,
    ) -> MappingResult<EntryId> {
        match self.tree.child(parent, self.canonical(), local) {
            Some(id) => {
                let entry = self.tree.entry_mut(id)?;
                if !entry.placeholder {
                    return Err(MappingError::DuplicateEntry {
                        namespace: self.namespaces[0].clone(),
                        name: local.to_string(),
                    });
                }
                entry.placeholder = false;
                entry.raw_prefix = prefix;
                Ok(id)
            }
            None => Ok(self.tree.insert(MappingEntry::new(kind, prefix))),
        }
    }

    fn finish(self) -> MappingFile {
        MappingFile::from_parts(self.namespaces, self.tree)
    }
}

/// Last `$`-separated segment of a possibly qualified class name.
fn innermost(name: &str) -> &str {
    name.rsplit(NEST_SEPARATOR).next().unwrap_or(name)
}
