use super::ArchiveLocator;
use crate::types::ImageLocation;
use std::collections::HashMap;

/// Archive held in memory
///
/// Keyed by (subject, sanitized sequence, image id). Lets resolution be run
/// end to end without a directory tree.
#[derive(Debug, Clone, Default)]
pub struct InMemoryArchive {
    images: HashMap<(String, String, u64), ImageLocation>,
}

impl InMemoryArchive {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: register an image location
    pub fn with_image(
        mut self,
        subject_id: &str,
        sequence: &str,
        image_id: u64,
        location: ImageLocation,
    ) -> Self {
        self.insert(subject_id, sequence, image_id, location);
        self
    }

    pub fn insert(&mut self, subject_id: &str, sequence: &str, image_id: u64, location: ImageLocation) {
        self.images.insert(
            (subject_id.to_string(), sequence.to_string(), image_id),
            location,
        );
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

impl ArchiveLocator for InMemoryArchive {
    fn locate(&self, subject_id: &str, sequence: &str, image_id: u64) -> Option<ImageLocation> {
        self.images
            .get(&(subject_id.to_string(), sequence.to_string(), image_id))
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_lookup() {
        let archive = InMemoryArchive::new().with_image(
            "128_S_2220",
            "ADNI_Brain_PET__Raw_AV45",
            42,
            ImageLocation::multi_file("/archive/128_S_2220/ADNI_Brain_PET__Raw_AV45/x/I42"),
        );

        assert_eq!(archive.len(), 1);
        let location = archive
            .locate("128_S_2220", "ADNI_Brain_PET__Raw_AV45", 42)
            .unwrap();
        assert!(location.is_multi_file);
        assert!(archive.locate("128_S_2220", "Other", 42).is_none());
        assert!(archive.locate("128_S_2220", "ADNI_Brain_PET__Raw_AV45", 43).is_none());
    }
}
