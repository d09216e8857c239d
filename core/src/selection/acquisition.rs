use crate::config::SequenceRules;
use crate::types::{contains_ignore_case, MetadataRecord, QcRecord};
use std::collections::HashMap;

/// Metadata rows indexed by subject identifier
pub struct MetadataIndex<'a> {
    by_subject: HashMap<&'a str, Vec<&'a MetadataRecord>>,
}

impl<'a> MetadataIndex<'a> {
    pub fn new(rows: &'a [MetadataRecord]) -> Self {
        let mut by_subject: HashMap<&'a str, Vec<&'a MetadataRecord>> = HashMap::new();
        for row in rows {
            by_subject.entry(row.subject_id.as_str()).or_default().push(row);
        }
        Self { by_subject }
    }

    /// All metadata rows of a subject
    ///
    /// Returns `None` when the subject has no rows at all; such subjects are
    /// skipped entirely.
    pub fn for_subject(&self, subject_id: &str) -> Option<SubjectMetadata<'a>> {
        self.by_subject
            .get(subject_id)
            .filter(|rows| !rows.is_empty())
            .map(|rows| SubjectMetadata { rows: rows.clone() })
    }
}

/// Metadata rows of one subject
#[derive(Debug, Clone)]
pub struct SubjectMetadata<'a> {
    rows: Vec<&'a MetadataRecord>,
}

impl<'a> SubjectMetadata<'a> {
    pub fn new(rows: Vec<&'a MetadataRecord>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[&'a MetadataRecord] {
        &self.rows
    }

    /// First row carrying this image id, raw or processed
    pub fn by_image_id(&self, image_id: u64) -> Option<&'a MetadataRecord> {
        self.rows.iter().copied().find(|row| row.image_id == image_id)
    }

    /// Co-registered, averaged derivative of a series
    ///
    /// With several matches the lowest image id wins.
    pub fn coreg_averaged(
        &self,
        series_id: u64,
        rules: &SequenceRules,
    ) -> Option<&'a MetadataRecord> {
        self.rows
            .iter()
            .copied()
            .filter(|row| row.series_id == series_id && row.sequence_name == rules.coreg_averaged)
            .min_by_key(|row| row.image_id)
    }
}

/// Lookup strategies for the raw acquisition behind a QC row, in the order
/// they are tried
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawMatch {
    /// Original acquisition whose image id is the QC image UID
    ImageId,
    /// Original tracer acquisition scanned on the QC exam date
    TracerAndDate,
}

impl RawMatch {
    pub const FALLBACK_ORDER: [RawMatch; 2] = [RawMatch::ImageId, RawMatch::TracerAndDate];

    /// Runs this lookup
    ///
    /// Neither lookup accepts an early-frame sequence. The tracer/date lookup
    /// can match several rows; the lowest image id wins.
    pub fn find<'a>(
        self,
        metadata: &SubjectMetadata<'a>,
        qc: &QcRecord,
        rules: &SequenceRules,
    ) -> Option<&'a MetadataRecord> {
        let mut raw = metadata
            .rows
            .iter()
            .copied()
            .filter(|row| row.orig_or_proc.is_original() && !row.is_early_frame(&rules.early_marker));

        match self {
            RawMatch::ImageId => {
                let image_id = qc.image_id()?;
                raw.find(|row| row.image_id == image_id)
            }
            RawMatch::TracerAndDate => raw
                .filter(|row| contains_ignore_case(&row.sequence_name, &rules.tracer))
                .filter(|row| row.scan_date.same_day(&qc.exam_date))
                .min_by_key(|row| row.image_id),
        }
    }

    pub fn simple_name(&self) -> &'static str {
        match self {
            RawMatch::ImageId => "image id",
            RawMatch::TracerAndDate => "tracer and date",
        }
    }
}

/// Finds the raw acquisition behind a resolved QC row
///
/// Tries each [`RawMatch`] strategy in order and reports which one matched.
pub fn match_raw_acquisition<'a>(
    metadata: &SubjectMetadata<'a>,
    qc: &QcRecord,
    rules: &SequenceRules,
) -> Option<(&'a MetadataRecord, RawMatch)> {
    RawMatch::FALLBACK_ORDER
        .iter()
        .find_map(|strategy| strategy.find(metadata, qc, rules).map(|row| (row, *strategy)))
}

/// The metadata row chosen to represent a visit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreferredVariant<'a> {
    pub record: &'a MetadataRecord,
    pub is_original: bool,
}

/// Prefers the co-registered, averaged derivative of a raw acquisition
pub fn prefer_variant<'a>(
    metadata: &SubjectMetadata<'a>,
    raw: &'a MetadataRecord,
    rules: &SequenceRules,
) -> PreferredVariant<'a> {
    match metadata.coreg_averaged(raw.series_id, rules) {
        Some(derivative) => PreferredVariant {
            record: derivative,
            is_original: false,
        },
        None => PreferredVariant {
            record: raw,
            is_original: true,
        },
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use crate::types::{OrigOrProc, ScanDate};

    fn subject(rows: &[MetadataRecord]) -> SubjectMetadata<'_> {
        SubjectMetadata::new(rows.iter().collect())
    }

    #[test]
    fn test_metadata_index_for_subject() {
        let rows = vec![raw(1, 10)];
        let index = MetadataIndex::new(&rows);
        assert_eq!(index.for_subject(SUBJECT).unwrap().rows().len(), 1);
        assert!(index.for_subject("002_S_0413").is_none());
    }

    #[test]
    fn test_match_by_image_id() {
        let rows = vec![raw(1, 10), raw(2, 20)];
        let (record, strategy) =
            match_raw_acquisition(&subject(&rows), &qc("bl", 2), &SequenceRules::default())
                .unwrap();
        assert_eq!(record.image_id, 2);
        assert_eq!(strategy, RawMatch::ImageId);
    }

    #[test]
    fn test_image_id_match_requires_original() {
        let rows = vec![coreg(2, 20)];
        assert!(RawMatch::ImageId
            .find(&subject(&rows), &qc("bl", 2), &SequenceRules::default())
            .is_none());
    }

    #[test]
    fn test_image_id_match_rejects_early_frames() {
        let rows = vec![meta(2, 20, "AV45 Early Frames", OrigOrProc::Original)];
        assert!(match_raw_acquisition(&subject(&rows), &qc("bl", 2), &SequenceRules::default())
            .is_none());
    }

    #[test]
    fn test_fallback_to_tracer_and_date() {
        let rows = vec![raw(7, 70)];
        let (record, strategy) =
            match_raw_acquisition(&subject(&rows), &qc("bl", 999), &SequenceRules::default())
                .unwrap();
        assert_eq!(record.image_id, 7);
        assert_eq!(strategy, RawMatch::TracerAndDate);
    }

    #[test]
    fn test_fallback_requires_same_day() {
        let mut other_day = raw(7, 70);
        other_day.scan_date = ScanDate::new("6/21/2011");
        let rows = vec![other_day];
        assert!(match_raw_acquisition(&subject(&rows), &qc("bl", 999), &SequenceRules::default())
            .is_none());
    }

    #[test]
    fn test_fallback_requires_tracer() {
        let rows = vec![meta(7, 70, "ADNI Brain PET: Raw FDG", OrigOrProc::Original)];
        assert!(match_raw_acquisition(&subject(&rows), &qc("bl", 999), &SequenceRules::default())
            .is_none());
    }

    #[test]
    fn test_fallback_tie_break_lowest_image_id() {
        let rows = vec![raw(9, 90), raw(8, 80), raw(12, 120)];
        let (record, _) =
            match_raw_acquisition(&subject(&rows), &qc("bl", 999), &SequenceRules::default())
                .unwrap();
        assert_eq!(record.image_id, 8);
    }

    #[test]
    fn test_unparseable_uid_still_tries_fallback() {
        let rows = vec![raw(7, 70)];
        let mut row = qc("bl", 0);
        row.image_uid = "missing".to_string();
        let (_, strategy) =
            match_raw_acquisition(&subject(&rows), &row, &SequenceRules::default()).unwrap();
        assert_eq!(strategy, RawMatch::TracerAndDate);
    }

    #[test]
    fn test_prefer_coreg_averaged_variant() {
        let rows = vec![raw(1, 10), coreg(3, 10), coreg(2, 10), coreg(4, 11)];
        let metadata = subject(&rows);
        let variant = prefer_variant(&metadata, &rows[0], &SequenceRules::default());
        assert!(!variant.is_original);
        assert_eq!(variant.record.image_id, 2);
        assert_eq!(variant.record.series_id, 10);
    }

    #[test]
    fn test_keep_raw_without_derivative() {
        let rows = vec![raw(1, 10), coreg(4, 11)];
        let metadata = subject(&rows);
        let variant = prefer_variant(&metadata, &rows[0], &SequenceRules::default());
        assert!(variant.is_original);
        assert_eq!(variant.record.image_id, 1);
    }

    #[test]
    fn test_coreg_label_is_exact() {
        let rows = vec![
            raw(1, 10),
            meta(2, 10, "AV45 Coreg, Avg, Std Img and Vox Siz", OrigOrProc::Processed),
        ];
        let metadata = subject(&rows);
        assert!(metadata.coreg_averaged(10, &SequenceRules::default()).is_none());
    }
}
