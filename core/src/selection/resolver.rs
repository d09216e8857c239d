use crate::config::SequenceRules;
use crate::selection::acquisition::{match_raw_acquisition, prefer_variant, MetadataIndex};
use crate::selection::candidate::resolve_candidate;
use crate::selection::quality::{group_by_visit, QcIndex};
use crate::types::{
    sanitize_sequence, ExceptionList, MetadataRecord, QcRecord, ResolvedImage, SubjectId,
};
use log::{debug, info, warn};
use std::fmt;

/// Counters describing one resolution run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
pub struct RunSummary {
    /// Subjects processed
    pub subjects: usize,
    /// Subjects without any metadata rows
    pub subjects_skipped: usize,
    /// Visits dropped for lack of an eligible candidate or raw acquisition
    pub visits_skipped: usize,
    /// Resolved images removed by the exception list
    pub exceptions_removed: usize,
    /// Rows in the manifest
    pub resolved: usize,
    /// Manifest rows without an archive location
    pub unresolved: usize,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} subjects ({} skipped), {} visits skipped, {} exceptions removed, \
             {} images resolved ({} not found in archive)",
            self.subjects,
            self.subjects_skipped,
            self.visits_skipped,
            self.exceptions_removed,
            self.resolved,
            self.unresolved
        )
    }
}

/// What resolution produced for one subject
#[derive(Debug, Clone, PartialEq)]
pub enum SubjectOutcome {
    /// The subject has no metadata rows
    NoMetadata,
    /// Images selected, in visit encounter order, and the number of visits dropped
    Resolved {
        images: Vec<ResolvedImage>,
        visits_skipped: usize,
    },
}

/// Resolves subject visits to one image each
///
/// Holds read-only indexes over the input tables; each subject is resolved
/// independently of the others.
pub struct Resolver<'a> {
    qc: QcIndex<'a>,
    metadata: MetadataIndex<'a>,
    rules: &'a SequenceRules,
}

impl<'a> Resolver<'a> {
    pub fn new(
        qc_rows: &'a [QcRecord],
        metadata_rows: &'a [MetadataRecord],
        rules: &'a SequenceRules,
    ) -> Self {
        Self {
            qc: QcIndex::new(qc_rows),
            metadata: MetadataIndex::new(metadata_rows),
            rules,
        }
    }

    /// Resolves every visit with passed QC rows for one subject
    pub fn resolve_subject(&self, subject: &SubjectId) -> SubjectOutcome {
        let Some(metadata) = self.metadata.for_subject(subject.as_str()) else {
            warn!("No screening metadata: subject {}", subject);
            return SubjectOutcome::NoMetadata;
        };

        let mut images = Vec::new();
        let mut visits_skipped = 0;

        for visit in group_by_visit(self.qc.passed_for(subject)) {
            let Some(qc) = resolve_candidate(&visit.rows, &metadata, self.rules) else {
                warn!(
                    "No regular AV45 image: subject {} visit {}",
                    subject, visit.visit_code
                );
                visits_skipped += 1;
                continue;
            };

            let Some((raw, strategy)) = match_raw_acquisition(&metadata, qc, self.rules) else {
                warn!(
                    "No raw acquisition for {}: subject {} visit {}",
                    qc.image_uid, subject, visit.visit_code
                );
                visits_skipped += 1;
                continue;
            };
            debug!(
                "Subject {} visit {}: raw image {} matched by {}",
                subject,
                visit.visit_code,
                raw.image_id,
                strategy.simple_name()
            );

            let variant = prefer_variant(&metadata, raw, self.rules);
            let record = variant.record;
            images.push(ResolvedImage {
                subject_id: subject.as_str().to_string(),
                visit_code: qc.visit_code.clone(),
                visit_label: record.visit_label.clone(),
                sequence_name: sanitize_sequence(&record.sequence_name),
                scan_date: record.scan_date.clone(),
                study_id: record.study_id.clone(),
                series_id: record.series_id,
                image_id: record.image_id,
                is_original: variant.is_original,
            });
        }

        SubjectOutcome::Resolved {
            images,
            visits_skipped,
        }
    }

    /// Resolves subjects in order and concatenates their images
    pub fn resolve_all(&self, subjects: &[SubjectId]) -> (Vec<ResolvedImage>, RunSummary) {
        let mut summary = RunSummary {
            subjects: subjects.len(),
            ..RunSummary::default()
        };

        let images = subjects
            .iter()
            .flat_map(|subject| match self.resolve_subject(subject) {
                SubjectOutcome::NoMetadata => {
                    summary.subjects_skipped += 1;
                    Vec::new()
                }
                SubjectOutcome::Resolved {
                    images,
                    visits_skipped,
                } => {
                    summary.visits_skipped += visits_skipped;
                    images
                }
            })
            .collect::<Vec<_>>();

        info!(
            "Resolved {} images for {} subjects",
            images.len(),
            subjects.len()
        );
        (images, summary)
    }
}

/// Removes resolved images covered by the exception list
///
/// Returns the surviving images, in order, and how many were removed.
pub fn apply_exceptions(
    images: Vec<ResolvedImage>,
    exceptions: &ExceptionList,
) -> (Vec<ResolvedImage>, usize) {
    let before = images.len();
    let kept: Vec<ResolvedImage> = images
        .into_iter()
        .filter(|image| match exceptions.find(&image.subject_id, &image.visit_code) {
            Some(exception) => {
                info!(
                    "Excluding subject {} visit {}: {}",
                    image.subject_id, image.visit_code, exception.reason
                );
                false
            }
            None => true,
        })
        .collect();
    let removed = before - kept.len();
    (kept, removed)
}
