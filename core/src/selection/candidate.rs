use crate::config::SequenceRules;
use crate::selection::acquisition::SubjectMetadata;
use crate::types::{MetadataRecord, QcRecord};
use log::debug;

/// A passed QC row together with the metadata row of its image
#[derive(Debug, Clone, Copy)]
struct Candidate<'q, 'm> {
    qc: &'q QcRecord,
    meta: &'m MetadataRecord,
}

/// Resolves the passed QC rows of one visit to a single row
///
/// # Algorithm
///
/// 1. A single row is selected unconditionally
/// 2. Otherwise rows whose image is an early-frame acquisition are dropped,
///    as are rows whose image is absent from the metadata
/// 3. None left → `None`; one left → that row
/// 4. Rank by series id ascending and scan from the highest down; the first
///    row whose series has a co-registered, averaged derivative wins
/// 5. No derivative anywhere → the lowest series id
///
/// Ranking is a stable sort, so equal series ids keep QC table order.
pub fn resolve_candidate<'q>(
    rows: &[&'q QcRecord],
    metadata: &SubjectMetadata<'_>,
    rules: &SequenceRules,
) -> Option<&'q QcRecord> {
    if let [only] = rows {
        return Some(*only);
    }

    let mut eligible: Vec<Candidate<'q, '_>> = rows
        .iter()
        .filter_map(|&qc| {
            let Some(meta) = qc.image_id().and_then(|id| metadata.by_image_id(id)) else {
                debug!("QC image {} has no metadata row, not eligible", qc.image_uid);
                return None;
            };
            if meta.is_early_frame(&rules.early_marker) {
                debug!("QC image {} is early-frame ({}), not eligible", qc.image_uid, meta.sequence_name);
                return None;
            }
            Some(Candidate { qc, meta })
        })
        .collect();

    match eligible.len() {
        0 => None,
        1 => Some(eligible[0].qc),
        _ => {
            eligible.sort_by_key(|candidate| candidate.meta.series_id);

            let processed = eligible
                .iter()
                .rev()
                .find(|candidate| metadata.coreg_averaged(candidate.meta.series_id, rules).is_some());

            match processed {
                Some(candidate) => {
                    debug!(
                        "Selected series {} ({}): latest with a co-registered derivative",
                        candidate.meta.series_id, candidate.qc.image_uid
                    );
                    Some(candidate.qc)
                }
                None => {
                    let earliest = eligible[0];
                    debug!(
                        "Selected series {} ({}): no co-registered derivative, lowest series",
                        earliest.meta.series_id, earliest.qc.image_uid
                    );
                    Some(earliest.qc)
                }
            }
        }
    }
}
