//! Namespace bookkeeping shared by both inputs of a merge.

use tiny_mapping::{MappingFile, FORMAT_VERSION};

use crate::error::{MergeError, MergeResult};

/// A's namespaces followed by those of B's that A lacks, each in header order.
pub fn merged_namespaces(a: &[String], b: &[String]) -> Vec<String> {
    let mut merged = a.to_vec();
    for ns in b {
        if !merged.contains(ns) {
            merged.push(ns.clone());
        }
    }
    merged
}

/// Both inputs must be keyed by the same canonical namespace.
pub fn check_canonical(a: &MappingFile, b: &MappingFile) -> MergeResult<()> {
    if a.canonical() != b.canonical() {
        return Err(MergeError::NamespaceMismatch {
            left: a.canonical().to_string(),
            right: b.canonical().to_string(),
        });
    }
    Ok(())
}

/// The `v1\t<ns>...` header line, without a trailing newline.
pub fn header_line(namespaces: &[String]) -> String {
    let mut line = String::from(FORMAT_VERSION);
    for ns in namespaces {
        line.push('\t');
        line.push_str(ns);
    }
    line
}
