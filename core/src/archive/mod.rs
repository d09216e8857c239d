//! Image archive lookup
//!
//! The archive holds one directory per subject, one directory per sanitized
//! sequence name below it, and one `I<image_id>` directory per image below
//! that. An image directory contains either DICOM slices or a single NIfTI
//! volume.

mod fs;
mod memory;

pub use fs::FsArchive;
pub use memory::InMemoryArchive;

use crate::types::ImageLocation;

/// Prefix of image directory names
pub const IMAGE_DIR_MARKER: char = 'I';

/// File name suffixes of a single-file volumetric image
pub const VOLUME_SUFFIXES: [&str; 2] = [".nii", ".nii.gz"];

/// Finds where an image is stored
pub trait ArchiveLocator {
    /// Returns the location of an image, or `None` if the archive does not hold it
    ///
    /// `sequence` is the sanitized sequence name.
    fn locate(&self, subject_id: &str, sequence: &str, image_id: u64) -> Option<ImageLocation>;
}

/// Name of the directory holding an image
pub fn image_dir_name(image_id: u64) -> String {
    format!("{}{}", IMAGE_DIR_MARKER, image_id)
}

/// Checks whether a file name denotes a single-file volume
pub fn is_volume_file(name: &str) -> bool {
    VOLUME_SUFFIXES.iter().any(|suffix| name.ends_with(suffix))
}
