use crate::archive::{ArchiveLocator, FsArchive};
use crate::config::ResolveConfig;
use crate::error::Result;
use crate::manifest::Manifest;
use crate::selection::{apply_exceptions, Resolver, RunSummary};
use crate::tables::{load_metadata_table, load_qc_table, load_subject_roster};
use crate::types::{MetadataRecord, QcRecord, SubjectId};
use log::{debug, info};
use std::collections::HashSet;
use std::path::PathBuf;

/// Main entry point for AV45 path resolution
///
/// Loads the QC and metadata tables, resolves one image per subject visit,
/// removes listed exceptions, looks every image up in the archive and writes
/// the manifest.
///
/// # Example
///
/// ```
/// use av45select_core::{
///     ImageLocation, InMemoryArchive, MetadataRecord, OrigOrProc, PathResolver, QcRecord,
///     ResolveConfig, ScanDate, SubjectId,
/// };
///
/// let qc = vec![QcRecord {
///     rid: 4036,
///     visit_code: "bl".to_string(),
///     passed: true,
///     image_uid: "I300".to_string(),
///     exam_date: ScanDate::new("2012-02-01"),
/// }];
/// let metadata = vec![MetadataRecord {
///     subject_id: "941_S_4036".to_string(),
///     image_id: 300,
///     series_id: 30,
///     sequence_name: "ADNI Brain PET: Raw AV45".to_string(),
///     orig_or_proc: OrigOrProc::Original,
///     scan_date: ScanDate::new("2/1/2012"),
///     study_id: "7".to_string(),
///     visit_label: "ADNI2 Screening".to_string(),
/// }];
/// let archive = InMemoryArchive::new().with_image(
///     "941_S_4036",
///     "ADNI_Brain_PET__Raw_AV45",
///     300,
///     ImageLocation::multi_file("/archive/941_S_4036/ADNI_Brain_PET__Raw_AV45/d/I300"),
/// );
///
/// let config = ResolveConfig::new("/archive", "/csv", "/dest");
/// let subjects = vec![SubjectId::parse("941_S_4036").unwrap()];
/// let (manifest, summary) = PathResolver::compute(&config, &qc, &metadata, &subjects, &archive);
///
/// assert_eq!(manifest.len(), 1);
/// assert_eq!(summary.unresolved, 0);
/// assert!(manifest.rows()[0].image.is_original);
/// ```
pub struct PathResolver;

impl PathResolver {
    /// Runs resolution against the filesystem archive under `config.source_dir`
    ///
    /// # Errors
    ///
    /// Returns an error if an input table is missing or malformed, a subject
    /// identifier is invalid, or the manifest cannot be written.
    pub fn run(config: &ResolveConfig) -> Result<RunReport> {
        let archive = FsArchive::new(&config.source_dir);
        Self::run_with_archive(config, &archive)
    }

    /// Runs resolution against any archive
    pub fn run_with_archive(
        config: &ResolveConfig,
        archive: &dyn ArchiveLocator,
    ) -> Result<RunReport> {
        let qc = load_qc_table(&config.qc_table_path())?;
        let metadata = load_metadata_table(&config.metadata_table_path())?;
        let subjects = Self::subjects(config)?;

        info!(
            "Calculating paths of AV45 PET images for {} subjects. Output will be stored in {}",
            subjects.len(),
            config.manifest_path().display()
        );

        let (manifest, summary) = Self::compute(config, &qc, &metadata, &subjects, archive);
        let manifest_path = manifest.write_to_dest(&config.dest_dir)?;
        info!("{}", summary);

        Ok(RunReport {
            manifest,
            summary,
            manifest_path,
        })
    }

    /// Resolution over already-loaded tables, without writing anything
    pub fn compute(
        config: &ResolveConfig,
        qc: &[QcRecord],
        metadata: &[MetadataRecord],
        subjects: &[SubjectId],
        archive: &dyn ArchiveLocator,
    ) -> (Manifest, RunSummary) {
        let resolver = Resolver::new(qc, metadata, &config.rules);
        let (images, mut summary) = resolver.resolve_all(subjects);

        let (images, removed) = apply_exceptions(images, &config.exceptions);
        summary.exceptions_removed = removed;

        let manifest = Manifest::locate(images, archive);
        summary.resolved = manifest.len();
        summary.unresolved = manifest.unresolved().count();

        (manifest, summary)
    }

    /// Subjects to process: the configured list, else the roster table
    ///
    /// Repeated identifiers are kept once, at their first position.
    ///
    /// # Errors
    ///
    /// Returns an error if the roster cannot be read or an identifier has no
    /// numeric roster id.
    pub fn subjects(config: &ResolveConfig) -> Result<Vec<SubjectId>> {
        let ids = match &config.subjects {
            Some(ids) => ids.clone(),
            None => load_subject_roster(&config.roster_table_path())?,
        };

        let mut seen = HashSet::new();
        let mut subjects = Vec::new();
        for id in &ids {
            let subject = SubjectId::parse(id)?;
            if seen.insert(subject.as_str().to_string()) {
                subjects.push(subject);
            } else {
                debug!("Ignoring repeated subject {}", subject);
            }
        }
        Ok(subjects)
    }
}

/// Outcome of a completed run
#[derive(Debug, Clone)]
pub struct RunReport {
    pub manifest: Manifest,
    pub summary: RunSummary,
    pub manifest_path: PathBuf,
}
