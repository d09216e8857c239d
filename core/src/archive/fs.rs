use super::{image_dir_name, is_volume_file, ArchiveLocator};
use crate::types::ImageLocation;
use log::{debug, warn};
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Archive stored on the local filesystem
///
/// Traversal is sorted by file name so repeated runs over the same tree find
/// the same directory. Unreadable entries are logged and skipped; nothing is
/// retried. Symlinked directories are matched but not descended into.
#[derive(Debug, Clone)]
pub struct FsArchive {
    root: PathBuf,
}

impl FsArchive {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// First directory named `dir_name` below `base`, depth-first
    fn find_dir(&self, base: &Path, dir_name: &str) -> Option<PathBuf> {
        for entry in WalkDir::new(base).min_depth(1).sort_by_file_name() {
            match entry {
                Ok(entry) => {
                    if entry.file_name() == dir_name && is_dir_or_dir_link(&entry) {
                        return Some(entry.into_path());
                    }
                }
                Err(e) => {
                    warn!("Error accessing archive entry: {}", e);
                }
            }
        }
        None
    }

    /// First single-file volume anywhere below an image directory
    fn find_volume(&self, image_dir: &Path) -> Option<PathBuf> {
        WalkDir::new(image_dir)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!("Error accessing archive entry: {}", e);
                    None
                }
            })
            .find(|entry| {
                entry.file_type().is_file() && is_volume_file(&entry.file_name().to_string_lossy())
            })
            .map(|entry| entry.into_path())
    }
}

impl ArchiveLocator for FsArchive {
    fn locate(&self, subject_id: &str, sequence: &str, image_id: u64) -> Option<ImageLocation> {
        let sequence_dir = self.root.join(subject_id).join(sequence);
        if !sequence_dir.is_dir() {
            debug!("No sequence directory {}", sequence_dir.display());
            return None;
        }

        let image_dir = self.find_dir(&sequence_dir, &image_dir_name(image_id))?;

        if let Some(volume) = self.find_volume(&image_dir) {
            return Some(ImageLocation::single_file(volume));
        }

        if is_empty_dir(&image_dir) {
            warn!("Empty image directory {}", image_dir.display());
        }
        Some(ImageLocation::multi_file(image_dir))
    }
}

/// Directory, or symlink resolving to one
fn is_dir_or_dir_link(entry: &DirEntry) -> bool {
    entry.file_type().is_dir() || (entry.path_is_symlink() && entry.path().is_dir())
}

fn is_empty_dir(directory: &Path) -> bool {
    WalkDir::new(directory)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .next()
        .is_none()
}
