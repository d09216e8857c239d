use crate::types::{QcRecord, SubjectId};
use std::collections::HashMap;

/// Passed QC rows indexed by subject roster id
///
/// Row order within a subject follows the QC table.
pub struct QcIndex<'a> {
    by_rid: HashMap<u32, Vec<&'a QcRecord>>,
}

impl<'a> QcIndex<'a> {
    /// Indexes the rows that passed quality control
    pub fn new(rows: &'a [QcRecord]) -> Self {
        let mut by_rid: HashMap<u32, Vec<&'a QcRecord>> = HashMap::new();
        for row in rows.iter().filter(|row| row.passed) {
            by_rid.entry(row.rid).or_default().push(row);
        }
        Self { by_rid }
    }

    /// Passed QC rows of a subject, matched on the subject's roster id
    pub fn passed_for(&self, subject: &SubjectId) -> &[&'a QcRecord] {
        self.by_rid
            .get(&subject.rid())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// Passed QC rows sharing a visit code
#[derive(Debug, Clone)]
pub struct VisitGroup<'a> {
    pub visit_code: &'a str,
    pub rows: Vec<&'a QcRecord>,
}

/// Partitions QC rows by visit code
///
/// Groups come out in order of the first row seen for each visit.
pub fn group_by_visit<'a>(rows: &[&'a QcRecord]) -> Vec<VisitGroup<'a>> {
    let mut groups: Vec<VisitGroup<'a>> = Vec::new();
    let mut positions: HashMap<&'a str, usize> = HashMap::new();

    for &row in rows {
        let visit_code = row.visit_code.as_str();
        match positions.get(visit_code) {
            Some(&idx) => groups[idx].rows.push(row),
            None => {
                positions.insert(visit_code, groups.len());
                groups.push(VisitGroup {
                    visit_code,
                    rows: vec![row],
                });
            }
        }
    }

    groups
}
