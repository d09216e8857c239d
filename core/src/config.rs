use crate::tables::columns::{METADATA_TABLE_FILE, QC_TABLE_FILE, ROSTER_TABLE_FILE};
use crate::types::{AV45_TRACER, COREG_AVERAGED_SEQUENCE, EARLY_FRAME_MARKER};
use crate::ExceptionList;
use std::path::{Path, PathBuf};

/// Directory under the destination root that receives the manifest
pub const CONVERSION_INFO_DIR: &str = "conversion_info";

/// Manifest file name
pub const MANIFEST_FILE: &str = "av45_pet_paths.tsv";

/// Sequence vocabulary driving candidate selection
///
/// The defaults describe ADNI AV45 acquisitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceRules {
    /// Case-insensitive marker of early-frame acquisitions
    pub early_marker: String,
    /// Case-insensitive tracer name of raw acquisitions, used by the date fallback
    pub tracer: String,
    /// Exact sequence label of the co-registered, averaged derivative
    pub coreg_averaged: String,
}

impl Default for SequenceRules {
    fn default() -> Self {
        Self {
            early_marker: EARLY_FRAME_MARKER.to_string(),
            tracer: AV45_TRACER.to_string(),
            coreg_averaged: COREG_AVERAGED_SEQUENCE.to_string(),
        }
    }
}

/// Configuration of one resolution run
///
/// # Example
///
/// ```
/// use av45select_core::ResolveConfig;
/// use std::path::Path;
///
/// let config = ResolveConfig::new("/data/ADNI", "/data/clinical", "/data/BIDS")
///     .with_subjects(vec!["128_S_2220".to_string()]);
///
/// assert_eq!(
///     config.manifest_path(),
///     Path::new("/data/BIDS/conversion_info/av45_pet_paths.tsv")
/// );
/// assert_eq!(config.subjects.as_ref().unwrap().len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ResolveConfig {
    /// Root of the image archive (one directory per subject)
    pub source_dir: PathBuf,

    /// Directory holding the QC, metadata and roster CSVs
    pub csv_dir: PathBuf,

    /// Destination root; the manifest goes under `conversion_info/`
    pub dest_dir: PathBuf,

    /// Subjects to process, in order. If None, the roster table is used.
    pub subjects: Option<Vec<String>>,

    /// Subject visits removed after resolution
    pub exceptions: ExceptionList,

    /// Sequence vocabulary
    pub rules: SequenceRules,
}

impl ResolveConfig {
    /// Creates a config with the built-in exception list and default rules
    pub fn new(
        source_dir: impl Into<PathBuf>,
        csv_dir: impl Into<PathBuf>,
        dest_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            source_dir: source_dir.into(),
            csv_dir: csv_dir.into(),
            dest_dir: dest_dir.into(),
            subjects: None,
            exceptions: ExceptionList::default(),
            rules: SequenceRules::default(),
        }
    }

    /// Builder: restrict the run to these subjects
    pub fn with_subjects(mut self, subjects: Vec<String>) -> Self {
        self.subjects = Some(subjects);
        self
    }

    /// Builder: replace the exception list
    pub fn with_exceptions(mut self, exceptions: ExceptionList) -> Self {
        self.exceptions = exceptions;
        self
    }

    /// Builder: replace the sequence vocabulary
    pub fn with_rules(mut self, rules: SequenceRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn qc_table_path(&self) -> PathBuf {
        self.csv_dir.join(QC_TABLE_FILE)
    }

    pub fn metadata_table_path(&self) -> PathBuf {
        self.csv_dir.join(METADATA_TABLE_FILE)
    }

    pub fn roster_table_path(&self) -> PathBuf {
        self.csv_dir.join(ROSTER_TABLE_FILE)
    }

    /// Where the manifest is written
    pub fn manifest_path(&self) -> PathBuf {
        manifest_path_for(&self.dest_dir)
    }
}

/// Manifest location for a destination root
pub fn manifest_path_for(dest_dir: &Path) -> PathBuf {
    dest_dir.join(CONVERSION_INFO_DIR).join(MANIFEST_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ResolveConfig::new("src", "csv", "dest");
        assert!(config.subjects.is_none());
        assert_eq!(config.exceptions, ExceptionList::default());
        assert_eq!(config.rules.early_marker, "early");
        assert_eq!(config.rules.tracer, "av45");
        assert_eq!(config.rules.coreg_averaged, "AV45 Co-registered, Averaged");
    }

    #[test]
    fn test_table_paths() {
        let config = ResolveConfig::new("src", "csv", "dest");
        assert_eq!(config.qc_table_path(), Path::new("csv/AV45QC.csv"));
        assert_eq!(config.metadata_table_path(), Path::new("csv/PET_META_LIST.csv"));
        assert_eq!(config.roster_table_path(), Path::new("csv/ADNIMERGE.csv"));
        assert_eq!(
            config.manifest_path(),
            Path::new("dest/conversion_info/av45_pet_paths.tsv")
        );
    }

    #[test]
    fn test_builder_chain() {
        let config = ResolveConfig::new("src", "csv", "dest")
            .with_subjects(vec!["128_S_2220".to_string()])
            .with_exceptions(ExceptionList::empty());

        assert_eq!(config.subjects, Some(vec!["128_S_2220".to_string()]));
        assert!(config.exceptions.is_empty());
    }
}
