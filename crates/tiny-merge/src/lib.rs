//! Merge engine for tiny v1 mapping files.
//!
//! Combines two mapping files that share a canonical namespace into one file
//! carrying the union of their namespaces. Names missing from both inputs are
//! filled from a configurable fallback order; names the inputs disagree on
//! abort the merge.
//!
//! # Key Types
//!
//! - [`MergeConfig`] -- Fallback namespace order for a run
//! - [`Resolver`] / [`EntryPair`] / [`MergedRecord`] -- Per-entry reconciliation
//! - [`MergeWriter`] -- Deterministic serializer over two trees
//! - [`MergeReport`] -- Summary of a finished merge
//! - [`MergeError`] -- Fatal merge errors

pub mod config;
pub mod error;
pub mod namespaces;
pub mod report;
pub mod resolve;
pub mod writer;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tiny_mapping::MappingFile;
use tracing::{info, warn};

pub use config::MergeConfig;
pub use error::{MergeError, MergeResult};
pub use namespaces::{check_canonical, header_line, merged_namespaces};
pub use report::MergeReport;
pub use resolve::{EntryPair, MergedRecord, Resolver};
pub use writer::MergeWriter;

/// Merge `a` and `b` into `out`.
///
/// Output columns are A's namespaces followed by B's new ones. Records are
/// written in canonical-name order, each parent before its children.
pub fn merge<W: Write>(
    a: &MappingFile,
    b: &MappingFile,
    config: &MergeConfig,
    out: W,
) -> MergeResult<MergeReport> {
    check_canonical(a, b)?;
    let namespaces = merged_namespaces(a.namespaces(), b.namespaces());
    for ns in config.fallback_order() {
        if !namespaces.contains(ns) {
            warn!(namespace = %ns, "fallback namespace is not present in either input");
        }
    }

    let mut writer = MergeWriter::new(out, config, &namespaces);
    writer.write_header()?;
    writer.write_tree(a.root(), b.root())?;
    writer.finish()
}

/// Parse the files at `a` and `b` and write their merge to `out`.
///
/// Both inputs are read completely before the output is created. If the
/// merge fails after that, the partially written output is removed.
pub fn merge_files(
    a: impl AsRef<Path>,
    b: impl AsRef<Path>,
    out: impl AsRef<Path>,
    config: &MergeConfig,
) -> MergeResult<MergeReport> {
    let (a, b, out) = (a.as_ref(), b.as_ref(), out.as_ref());

    info!(path = %a.display(), "reading input A");
    let file_a = MappingFile::from_path(a)?;
    info!(path = %b.display(), "reading input B");
    let file_b = MappingFile::from_path(b)?;
    check_canonical(&file_a, &file_b)?;

    info!(path = %out.display(), "writing merged mappings");
    let result = merge(&file_a, &file_b, config, BufWriter::new(File::create(out)?));
    if let Err(e) = &result {
        warn!(path = %out.display(), error = %e, "merge failed, removing partial output");
        if let Err(rm) = std::fs::remove_file(out) {
            warn!(path = %out.display(), error = %rm, "could not remove partial output");
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn merge_text(a: &str, b: &str, config: &MergeConfig) -> MergeResult<String> {
        let a = MappingFile::parse(a)?;
        let b = MappingFile::parse(b)?;
        let mut out = Vec::new();
        merge(&a, &b, config, &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    /// Lines of a merged file, each split into its record prefix and its
    /// namespace -> value map, so outputs with different column orders can
    /// be compared.
    fn by_namespace(text: &str) -> Vec<Vec<(String, String)>> {
        let mut lines = text.lines();
        let header: Vec<&str> = lines.next().unwrap().split('\t').skip(1).collect();
        lines
            .map(|line| {
                let parts: Vec<&str> = line.split('\t').collect();
                let split = parts.len() - header.len();
                let mut cells: Vec<(String, String)> = header
                    .iter()
                    .zip(&parts[split..])
                    .map(|(ns, v)| (ns.to_string(), v.to_string()))
                    .collect();
                cells.sort();
                cells.insert(0, (String::new(), parts[..split].join("\t")));
                cells
            })
            .collect()
    }

    #[test]
    fn worked_example() {
        let a = "v1\tintermediary\tnamed\nCLASS\ta/b/C\ta/x/Foo\n";
        let b = "v1\tintermediary\tnamed2\nCLASS\ta/b/C\ta/y/Bar\n";
        let out = merge_text(a, b, &MergeConfig::new()).unwrap();
        assert_eq!(
            out,
            "v1\tintermediary\tnamed\tnamed2\nCLASS\ta/b/C\ta/x/Foo\ta/y/Bar\n"
        );
    }

    #[test]
    fn self_merge_reproduces_input() {
        let text = "v1\tofficial\tintermediary\tnamed\n\
            CLASS\ta\tclass_1\tcom/x/Block\n\
            CLASS\ta$b\tclass_1$class_2\tcom/x/Block$Settings\n\
            FIELD\ta\tI\tc\tfield_1\thardness\n\
            METHOD\ta\t()V\td\tmethod_1\ttick\n\
            METHOD\ta\t(I)V\td\tmethod_2\ttick\n\
            CLASS\tb\tclass_3\tcom/x/Item\n";
        let out = merge_text(text, text, &MergeConfig::new()).unwrap();
        assert_eq!(out, text);
    }

    #[test]
    fn swapped_inputs_agree_per_namespace() {
        let a = "v1\tofficial\tnamed\n\
            CLASS\ta\tFoo\n\
            FIELD\ta\tI\tb\tcount\n\
            CLASS\tc\tBaz\n";
        let b = "v1\tofficial\tintermediary\n\
            CLASS\ta\tclass_1\n\
            METHOD\ta\t()V\tc\tmethod_1\n\
            CLASS\td\tclass_4\n";
        let config = MergeConfig::with_fallback_order(["intermediary", "official"]);
        let ab = merge_text(a, b, &config).unwrap();
        let ba = merge_text(b, a, &config).unwrap();
        assert_eq!(by_namespace(&ab), by_namespace(&ba));
        assert!(ab.starts_with("v1\tofficial\tnamed\tintermediary\n"));
        assert!(ba.starts_with("v1\tofficial\tintermediary\tnamed\n"));
    }

    #[test]
    fn fallback_fills_namespace_missing_on_both_sides() {
        let a = "v1\tofficial\tnamed\nCLASS\ta\tFoo\nCLASS\tb\tBar\n";
        let b = "v1\tofficial\tintermediary\nCLASS\ta\tclass_1\n";
        let config = MergeConfig::with_fallback_order(["intermediary", "official"]);
        let out = merge_text(a, b, &config).unwrap();
        assert_eq!(
            out,
            "v1\tofficial\tnamed\tintermediary\n\
             CLASS\ta\tFoo\tclass_1\n\
             CLASS\tb\tBar\tb\n"
        );
    }

    #[test]
    fn conflicting_inputs_fail() {
        let a = "v1\tofficial\tnamed\nCLASS\ta\tFoo\n";
        let b = "v1\tofficial\tnamed\nCLASS\ta\tBar\n";
        assert!(matches!(
            merge_text(a, b, &MergeConfig::new()),
            Err(MergeError::NameConflict { .. })
        ));
    }

    #[test]
    fn nested_class_reconstruction() {
        let a = "v1\tofficial\tother\n\
            CLASS\tOuter\tOuterAlt\n\
            CLASS\tOuter$Inner\tInnerAlt\n";
        let b = "v1\tofficial\tnamed\n\
            CLASS\tOuter\tcom/Outer\n\
            CLASS\tOuter$Inner\tcom/Outer$Inner\n";
        let out = merge_text(a, b, &MergeConfig::new()).unwrap();
        assert_eq!(
            out,
            "v1\tofficial\tother\tnamed\n\
             CLASS\tOuter\tOuterAlt\tcom/Outer\n\
             CLASS\tOuter$Inner\tOuterAlt$InnerAlt\tcom/Outer$Inner\n"
        );
    }

    #[test]
    fn canonical_mismatch_fails() {
        let a = "v1\tofficial\tnamed\n";
        let b = "v1\tintermediary\tnamed\n";
        assert!(matches!(
            merge_text(a, b, &MergeConfig::new()),
            Err(MergeError::NamespaceMismatch { .. })
        ));
    }

    #[test]
    fn duplicate_definition_fails() {
        let a = "v1\tofficial\tnamed\nCLASS\ta\tFoo\nCLASS\ta\tFoo\n";
        let b = "v1\tofficial\tnamed\n";
        assert!(matches!(
            merge_text(a, b, &MergeConfig::new()),
            Err(MergeError::Mapping(tiny_mapping::MappingError::DuplicateEntry { .. }))
        ));
    }

    #[test]
    fn merge_files_writes_output() {
        let dir = tempfile::tempdir().unwrap();
        let (pa, pb, po) = (
            dir.path().join("a.tiny"),
            dir.path().join("b.tiny"),
            dir.path().join("out.tiny"),
        );
        std::fs::write(&pa, "v1\tintermediary\tnamed\nCLASS\ta/b/C\ta/x/Foo\n").unwrap();
        std::fs::write(&pb, "v1\tintermediary\tnamed2\nCLASS\ta/b/C\ta/y/Bar\n").unwrap();

        let report = merge_files(&pa, &pb, &po, &MergeConfig::new()).unwrap();
        assert_eq!(report.classes, 1);
        assert_eq!(report.namespaces, ["intermediary", "named", "named2"]);
        assert_eq!(
            std::fs::read_to_string(&po).unwrap(),
            "v1\tintermediary\tnamed\tnamed2\nCLASS\ta/b/C\ta/x/Foo\ta/y/Bar\n"
        );
    }

    #[test]
    fn merge_files_removes_partial_output_on_failure() {
        let dir = tempfile::tempdir().unwrap();
        let (pa, pb, po) = (
            dir.path().join("a.tiny"),
            dir.path().join("b.tiny"),
            dir.path().join("out.tiny"),
        );
        std::fs::write(&pa, "v1\tofficial\tnamed\nCLASS\ta\tAlpha\nCLASS\tb\tFoo\n").unwrap();
        std::fs::write(&pb, "v1\tofficial\tnamed\nCLASS\tb\tBar\n").unwrap();

        let err = merge_files(&pa, &pb, &po, &MergeConfig::new()).unwrap_err();
        assert!(matches!(err, MergeError::NameConflict { .. }));
        assert!(!po.exists());
    }

    #[test]
    fn merge_files_leaves_no_output_for_unreadable_input() {
        let dir = tempfile::tempdir().unwrap();
        let po = dir.path().join("out.tiny");
        let err = merge_files(dir.path().join("a"), dir.path().join("b"), &po, &MergeConfig::new())
            .unwrap_err();
        assert!(matches!(err, MergeError::Mapping(tiny_mapping::MappingError::Io(_))));
        assert!(!po.exists());
    }

    fn arb_mapping() -> impl Strategy<Value = String> {
        // Distinct canonical class names, each with a named alias, some
        // fields and methods, and inner classes with fields of their own;
        // names are derived from indices so nothing collides.
        prop::collection::btree_set("[a-z]{1,3}", 1..6).prop_flat_map(|classes| {
            let classes: Vec<String> = classes.into_iter().collect();
            let n = classes.len();
            prop::collection::vec((0usize..3, 0usize..3, 0usize..3), n).prop_map(move |shapes| {
                let mut text = String::from("v1\tofficial\tnamed\n");
                for (i, (class, (fields, methods, inners))) in classes.iter().zip(shapes).enumerate() {
                    text.push_str(&format!("CLASS\t{class}\tpkg/Named{i}\n"));
                    for f in 0..fields {
                        text.push_str(&format!("FIELD\t{class}\tI\tf{f}\tfield{i}_{f}\n"));
                    }
                    for m in 0..methods {
                        text.push_str(&format!("METHOD\t{class}\t()V\tm{m}\tmethod{i}_{m}\n"));
                    }
                    for j in 0..inners {
                        let inner = format!("{class}$i{j}");
                        text.push_str(&format!("CLASS\t{inner}\tpkg/Named{i}$Inner{j}\n"));
                        for f in 0..fields {
                            text.push_str(&format!("FIELD\t{inner}\tJ\tf{f}\tinner{i}_{j}_{f}\n"));
                        }
                    }
                }
                text
            })
        })
    }

    fn sorted_lines(text: &str) -> Vec<&str> {
        let mut lines: Vec<&str> = text.lines().collect();
        lines.sort_unstable();
        lines
    }

    proptest! {
        #[test]
        fn self_merge_is_idempotent(text in arb_mapping()) {
            let once = merge_text(&text, &text, &MergeConfig::new()).unwrap();
            let twice = merge_text(&once, &once, &MergeConfig::new()).unwrap();
            prop_assert_eq!(&once, &twice);
            // Every input line, qualified inner class names included, comes
            // back unchanged; only the order may differ.
            prop_assert_eq!(sorted_lines(&once), sorted_lines(&text));
        }
    }
}
