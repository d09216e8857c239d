use crate::error::{Av45Error, Result};
use crate::types::{OrigOrProc, ScanDate};
use std::fmt;

/// Study subject identifier, e.g. `128_S_2220`
///
/// The QC table only carries the roster id (RID), which is the integer value
/// of the last four characters of the subject identifier. Both forms are kept
/// so lookups on either table use the key that table understands.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
pub struct SubjectId {
    id: String,
    rid: u32,
}

impl SubjectId {
    /// Parses a subject identifier
    ///
    /// # Errors
    ///
    /// Returns [`Av45Error::InvalidSubject`] when the identifier is shorter
    /// than four characters or its last four characters are not digits.
    pub fn parse(id: &str) -> Result<Self> {
        let id = id.trim();
        let tail = id
            .char_indices()
            .rev()
            .nth(3)
            .map(|(idx, _)| &id[idx..])
            .ok_or_else(|| Av45Error::InvalidSubject(id.to_string()))?;

        if !tail.chars().all(|c| c.is_ascii_digit()) {
            return Err(Av45Error::InvalidSubject(id.to_string()));
        }

        let rid = tail
            .parse()
            .map_err(|_| Av45Error::InvalidSubject(id.to_string()))?;

        Ok(Self {
            id: id.to_string(),
            rid,
        })
    }

    /// Returns the full subject identifier
    pub fn as_str(&self) -> &str {
        &self.id
    }

    /// Returns the roster id used by the QC table
    pub fn rid(&self) -> u32 {
        self.rid
    }
}

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

/// One row of the AV45 quality-control table
#[derive(Debug, Clone, PartialEq)]
pub struct QcRecord {
    pub rid: u32,
    pub visit_code: String,
    pub passed: bool,
    /// Image UID as written, a marker character followed by the image id (`I123456`)
    pub image_uid: String,
    pub exam_date: ScanDate,
}

impl QcRecord {
    /// Numeric image id carried by the UID
    ///
    /// Returns `None` when the UID is empty or not a marker followed by digits.
    pub fn image_id(&self) -> Option<u64> {
        let uid = self.image_uid.trim();
        let mut chars = uid.chars();
        chars.next()?;
        chars.as_str().parse().ok()
    }
}

/// One row of the PET metadata list
#[derive(Debug, Clone, PartialEq)]
pub struct MetadataRecord {
    pub subject_id: String,
    pub image_id: u64,
    pub series_id: u64,
    pub sequence_name: String,
    pub orig_or_proc: OrigOrProc,
    pub scan_date: ScanDate,
    pub study_id: String,
    pub visit_label: String,
}

impl MetadataRecord {
    /// Checks for the early-frame marker in the sequence name
    pub fn is_early_frame(&self, marker: &str) -> bool {
        crate::types::contains_ignore_case(&self.sequence_name, marker)
    }
}
