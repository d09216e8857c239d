use crate::error::{Av45Error, Result};
use crate::tables::columns::{EXC_REASON, EXC_SUBJECT_ID, EXC_VISIT_CODE};
use crate::tables::{open_table, TableHeader};
use std::path::Path;

/// A (subject, visit) pair known to be unconvertible
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
pub struct ConversionException {
    pub subject_id: String,
    pub visit_code: String,
    /// Why the pair is excluded, kept for the log
    pub reason: String,
}

impl ConversionException {
    pub fn new(
        subject_id: impl Into<String>,
        visit_code: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            subject_id: subject_id.into(),
            visit_code: visit_code.into(),
            reason: reason.into(),
        }
    }

    /// Checks whether this exception covers the given subject visit
    pub fn matches(&self, subject_id: &str, visit_code: &str) -> bool {
        self.subject_id == subject_id && self.visit_code == visit_code
    }
}

/// Deny-list of subject visits removed after resolution
///
/// Applied once to the assembled set of resolved images, before the archive is
/// searched. It never takes part in candidate selection.
///
/// # Example
///
/// ```
/// use av45select_core::ExceptionList;
///
/// let exceptions = ExceptionList::default()
///     .with_exception("002_S_0413", "m24", "truncated DICOM series");
///
/// assert!(exceptions.find("128_S_2220", "m48").is_some());
/// assert!(exceptions.find("002_S_0413", "m24").is_some());
/// assert_eq!(exceptions.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
pub struct ExceptionList {
    entries: Vec<ConversionException>,
}

impl Default for ExceptionList {
    /// The built-in list of known conversion failures
    fn default() -> Self {
        Self {
            entries: vec![
                // Source series fails DICOM to NIfTI conversion with every converter
                ConversionException::new("128_S_2220", "m48", "source data cannot be converted"),
            ],
        }
    }
}

impl ExceptionList {
    /// Creates an empty list
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Builder: add one exception
    pub fn with_exception(
        mut self,
        subject_id: impl Into<String>,
        visit_code: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        self.push(ConversionException::new(subject_id, visit_code, reason));
        self
    }

    /// Adds an exception unless an identical pair is already listed
    pub fn push(&mut self, exception: ConversionException) {
        if self
            .find(&exception.subject_id, &exception.visit_code)
            .is_none()
        {
            self.entries.push(exception);
        }
    }

    /// Appends entries from a tab-separated file
    ///
    /// The file needs `subject_id` and `visit_code` columns; a `reason` column
    /// is optional.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or a required column is absent.
    pub fn extend_from_file(&mut self, path: &Path) -> Result<()> {
        let mut reader = open_table(path, b'\t')?;
        let header = TableHeader::read(&mut reader, path)?;
        let subject_idx = header.require(EXC_SUBJECT_ID)?;
        let visit_idx = header.require(EXC_VISIT_CODE)?;
        let reason_idx = header.optional(EXC_REASON);

        for (row, record) in reader.records().enumerate() {
            let record = record?;
            let subject_id = record.get(subject_idx).unwrap_or_default().trim();
            let visit_code = record.get(visit_idx).unwrap_or_default().trim();
            if subject_id.is_empty() || visit_code.is_empty() {
                return Err(Av45Error::invalid_value(
                    header.name(),
                    row + 1,
                    "empty subject_id or visit_code",
                ));
            }
            let reason = reason_idx
                .and_then(|idx| record.get(idx))
                .unwrap_or_default()
                .trim();
            self.push(ConversionException::new(subject_id, visit_code, reason));
        }

        Ok(())
    }

    /// Returns the exception covering a subject visit, if any
    pub fn find(&self, subject_id: &str, visit_code: &str) -> Option<&ConversionException> {
        self.entries
            .iter()
            .find(|exception| exception.matches(subject_id, visit_code))
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConversionException> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_default_list() {
        let list = ExceptionList::default();
        assert_eq!(list.len(), 1);
        let entry = list.find("128_S_2220", "m48").unwrap();
        assert!(!entry.reason.is_empty());
        assert!(list.find("128_S_2220", "bl").is_none());
    }

    #[test]
    fn test_empty_list() {
        let list = ExceptionList::empty();
        assert!(list.is_empty());
        assert!(list.find("128_S_2220", "m48").is_none());
    }

    #[test]
    fn test_push_ignores_duplicates() {
        let list = ExceptionList::default().with_exception("128_S_2220", "m48", "again");
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_extend_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("exceptions.tsv");
        fs::write(
            &path,
            "subject_id\tvisit_code\treason\n002_S_0413\tm24\tcorrupt slices\n",
        )
        .unwrap();

        let mut list = ExceptionList::default();
        list.extend_from_file(&path).unwrap();

        assert_eq!(list.len(), 2);
        assert_eq!(
            list.find("002_S_0413", "m24").unwrap().reason,
            "corrupt slices"
        );
    }

    #[test]
    fn test_extend_from_file_without_reason_column() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("exceptions.tsv");
        fs::write(&path, "subject_id\tvisit_code\n002_S_0413\tm24\n").unwrap();

        let mut list = ExceptionList::empty();
        list.extend_from_file(&path).unwrap();

        assert_eq!(list.find("002_S_0413", "m24").unwrap().reason, "");
    }

    #[test]
    fn test_extend_from_file_missing_column() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("exceptions.tsv");
        fs::write(&path, "subject_id\treason\n002_S_0413\tx\n").unwrap();

        let err = ExceptionList::empty().extend_from_file(&path).unwrap_err();
        assert!(matches!(err, Av45Error::MissingColumn { ref column, .. } if column == "visit_code"));
    }
}
