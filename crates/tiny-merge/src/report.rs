use serde::Serialize;
use tiny_mapping::EntryKind;

/// Summary of a finished merge.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct MergeReport {
    /// Namespaces of the output, in column order.
    pub namespaces: Vec<String>,
    pub classes: usize,
    pub fields: usize,
    pub methods: usize,
    /// Placeholder classes skipped because neither input defined them.
    pub orphans_skipped: usize,
}

impl MergeReport {
    pub fn new(namespaces: Vec<String>) -> Self {
        Self {
            namespaces,
            ..Default::default()
        }
    }

    /// Count one written record.
    pub fn record(&mut self, kind: EntryKind) {
        match kind {
            EntryKind::Class => self.classes += 1,
            EntryKind::Field => self.fields += 1,
            EntryKind::Method => self.methods += 1,
            EntryKind::Root => {}
        }
    }

    /// Total records written, header excluded.
    pub fn records(&self) -> usize {
        self.classes + self.fields + self.methods
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_by_kind() {
        let mut report = MergeReport::new(vec!["official".into()]);
        report.record(EntryKind::Class);
        report.record(EntryKind::Field);
        report.record(EntryKind::Field);
        report.record(EntryKind::Method);
        report.record(EntryKind::Root);
        assert_eq!((report.classes, report.fields, report.methods), (1, 2, 1));
        assert_eq!(report.records(), 4);
    }

    #[test]
    fn serializes_to_json() {
        let report = MergeReport::new(vec!["official".into(), "named".into()]);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["namespaces"][1], "named");
        assert_eq!(json["orphans_skipped"], 0);
    }
}
