//! Serializer: a synchronized pre-order walk over two trees.
//!
//! At every level the children of both sides are visited in the sorted union
//! of their canonical keys. Each visited pair is reconciled and written as one
//! line before its own children are visited, so output order depends only on
//! the canonical names, never on input order.

use std::collections::BTreeSet;
use std::io::Write;

use tiny_mapping::EntryRef;
use tracing::{debug, warn};

use crate::config::MergeConfig;
use crate::error::MergeResult;
use crate::namespaces::header_line;
use crate::report::MergeReport;
use crate::resolve::{EntryPair, Resolver};

/// Writes merged records to `out`.
pub struct MergeWriter<'c, W: Write> {
    out: W,
    resolver: Resolver<'c>,
    namespaces: &'c [String],
    report: MergeReport,
}

impl<'c, W: Write> MergeWriter<'c, W> {
    /// `namespaces` is the merged column list; its first label is canonical.
    pub fn new(out: W, config: &'c MergeConfig, namespaces: &'c [String]) -> Self {
        debug_assert!(!namespaces.is_empty());
        Self {
            out,
            resolver: Resolver::new(config, &namespaces[0]),
            namespaces,
            report: MergeReport::new(namespaces.to_vec()),
        }
    }

    fn canonical(&self) -> &'c str {
        &self.namespaces[0]
    }

    pub fn write_header(&mut self) -> MergeResult<()> {
        writeln!(self.out, "{}", header_line(self.namespaces))?;
        Ok(())
    }

    /// Walk both trees from their roots, writing every reachable entry.
    pub fn write_tree(&mut self, a: EntryRef<'_>, b: EntryRef<'_>) -> MergeResult<()> {
        self.write_children(Some(a), Some(b))
    }

    /// Flush and hand back the run summary.
    pub fn finish(mut self) -> MergeResult<MergeReport> {
        self.out.flush()?;
        debug!(records = self.report.records(), "merge output flushed");
        Ok(self.report)
    }

    fn write_children<'t>(
        &mut self,
        a: Option<EntryRef<'t>>,
        b: Option<EntryRef<'t>>,
    ) -> MergeResult<()> {
        let canonical = self.canonical();
        let keys: BTreeSet<&'t str> = a
            .into_iter()
            .chain(b)
            .flat_map(|e| e.child_keys(canonical))
            .collect();

        for key in keys {
            let child_a = a.and_then(|e| e.child(canonical, key));
            let child_b = b.and_then(|e| e.child(canonical, key));
            self.write_node(key, child_a, child_b)?;
        }
        Ok(())
    }

    fn write_node<'t>(
        &mut self,
        key: &str,
        a: Option<EntryRef<'t>>,
        b: Option<EntryRef<'t>>,
    ) -> MergeResult<()> {
        let defined = |e: Option<EntryRef<'t>>| e.filter(|e| !e.is_placeholder());
        let pair = match EntryPair::new(a, b) {
            Some(pair) if defined(a).is_some() || defined(b).is_some() => pair,
            _ => {
                warn!(class = key, "skipping placeholder class defined by neither input");
                self.report.orphans_skipped += 1;
                return Ok(());
            }
        };

        let record = self.resolver.merge_record(pair, self.namespaces)?;
        writeln!(self.out, "{record}")?;
        self.report.record(record.kind);

        self.write_children(a, b)
    }
}
