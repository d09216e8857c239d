use crate::types::ScanDate;
use std::path::PathBuf;

/// The single scan selected for a subject visit
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
pub struct ResolvedImage {
    pub subject_id: String,
    pub visit_code: String,
    pub visit_label: String,
    /// Sequence name after [`crate::sanitize_sequence`]
    pub sequence_name: String,
    pub scan_date: ScanDate,
    pub study_id: String,
    pub series_id: u64,
    pub image_id: u64,
    /// `false` when the co-registered, averaged derivative was chosen
    pub is_original: bool,
}

impl ResolvedImage {
    /// Name of the archive directory holding this image (`I<image_id>`)
    pub fn archive_dir_name(&self) -> String {
        crate::archive::image_dir_name(self.image_id)
    }
}

/// Where an image lives in the archive
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
pub struct ImageLocation {
    pub path: PathBuf,
    /// `true` for a directory of DICOM slices, `false` for a single volume file
    pub is_multi_file: bool,
}

impl ImageLocation {
    /// Location of a directory of per-slice files
    pub fn multi_file(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            is_multi_file: true,
        }
    }

    /// Location of a single volumetric file
    pub fn single_file(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            is_multi_file: false,
        }
    }
}
