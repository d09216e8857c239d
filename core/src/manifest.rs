//! Resolved-path manifest
//!
//! The manifest is the only thing the downstream conversion stage reads: one
//! tab-separated row per resolved subject visit, in resolution order. Rows
//! whose image was not found in the archive keep an empty `Path` and are left
//! out of [`Manifest::pending_conversions`].

use crate::archive::ArchiveLocator;
use crate::config::manifest_path_for;
use crate::error::{Av45Error, Result};
use crate::tables::columns::MANIFEST_COLUMNS;
use crate::tables::{get_string_value, open_table, parse_id, TableHeader};
use crate::types::{ImageLocation, ResolvedImage, ScanDate};
use csv::WriterBuilder;
use log::{info, warn};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// One manifest row: a resolved image and where it was found
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
pub struct ManifestRow {
    pub image: ResolvedImage,
    /// `None` when the archive does not hold the image
    pub location: Option<ImageLocation>,
}

impl ManifestRow {
    pub fn is_resolved(&self) -> bool {
        self.location.is_some()
    }

    /// Value of the `Is_Dicom` column; unresolved rows default to `true`
    pub fn is_multi_file(&self) -> bool {
        self.location
            .as_ref()
            .map(|location| location.is_multi_file)
            .unwrap_or(true)
    }

    /// Value of the `Path` column; empty for unresolved rows
    pub fn path_string(&self) -> String {
        self.location
            .as_ref()
            .map(|location| location.path.display().to_string())
            .unwrap_or_default()
    }

    fn to_record(&self) -> [String; 11] {
        [
            self.image.subject_id.clone(),
            self.image.visit_code.clone(),
            self.image.visit_label.clone(),
            self.image.sequence_name.clone(),
            self.image.scan_date.to_string(),
            self.image.study_id.clone(),
            self.image.series_id.to_string(),
            self.image.image_id.to_string(),
            format_bool(self.image.is_original),
            format_bool(self.is_multi_file()),
            self.path_string(),
        ]
    }
}

/// Ordered set of manifest rows
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
pub struct Manifest {
    rows: Vec<ManifestRow>,
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rows(rows: Vec<ManifestRow>) -> Self {
        Self { rows }
    }

    /// Looks up every image in the archive, keeping image order
    ///
    /// Images the archive does not hold stay in the manifest unresolved.
    pub fn locate(images: Vec<ResolvedImage>, archive: &dyn ArchiveLocator) -> Self {
        let rows = images
            .into_iter()
            .map(|image| {
                let location = archive.locate(&image.subject_id, &image.sequence_name, image.image_id);
                if location.is_none() {
                    warn!(
                        "Not found in archive: subject {} visit {} ({}/{})",
                        image.subject_id,
                        image.visit_code,
                        image.sequence_name,
                        image.archive_dir_name()
                    );
                }
                ManifestRow { image, location }
            })
            .collect();
        Self { rows }
    }

    pub fn rows(&self) -> &[ManifestRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows the conversion stage will process
    pub fn pending_conversions(&self) -> impl Iterator<Item = &ManifestRow> {
        self.rows.iter().filter(|row| row.is_resolved())
    }

    /// Rows without an archive location
    pub fn unresolved(&self) -> impl Iterator<Item = &ManifestRow> {
        self.rows.iter().filter(|row| !row.is_resolved())
    }

    /// Writes the manifest as TSV with a header row
    pub fn write<W: Write>(&self, writer: W) -> Result<()> {
        let mut wtr = WriterBuilder::new().delimiter(b'\t').from_writer(writer);
        wtr.write_record(MANIFEST_COLUMNS)?;
        for row in &self.rows {
            wtr.write_record(row.to_record())?;
        }
        wtr.flush()?;
        Ok(())
    }

    /// Writes the manifest to a file, replacing any previous one
    pub fn write_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = fs::File::create(path)?;
        self.write(file)?;
        info!("Wrote {} manifest rows to {}", self.len(), path.display());
        Ok(())
    }

    /// Writes the manifest to its fixed place under a destination root
    pub fn write_to_dest(&self, dest_dir: &Path) -> Result<PathBuf> {
        let path = manifest_path_for(dest_dir);
        self.write_to(&path)?;
        Ok(path)
    }

    /// Reads a manifest back, as the conversion stage does
    ///
    /// # Errors
    ///
    /// Returns an error if the file is unreadable, a column is missing, or a
    /// numeric or boolean cell does not parse.
    pub fn read_from(path: &Path) -> Result<Self> {
        let mut reader = open_table(path, b'\t')?;
        let header = TableHeader::read(&mut reader, path)?;
        let idx = MANIFEST_COLUMNS
            .iter()
            .map(|column| header.require(column))
            .collect::<Result<Vec<usize>>>()?;

        let mut rows = Vec::new();
        for (row, record) in reader.records().enumerate() {
            let record = record?;
            let cell = |i: usize| get_string_value(&record, idx[i]);
            let numeric = |i: usize| {
                parse_id(&cell(i)).ok_or_else(|| {
                    Av45Error::invalid_value(
                        header.name(),
                        row + 1,
                        format!("{} '{}'", MANIFEST_COLUMNS[i], cell(i)),
                    )
                })
            };
            let flag = |i: usize| {
                parse_bool(&cell(i)).ok_or_else(|| {
                    Av45Error::invalid_value(
                        header.name(),
                        row + 1,
                        format!("{} '{}'", MANIFEST_COLUMNS[i], cell(i)),
                    )
                })
            };

            let image = ResolvedImage {
                subject_id: cell(0),
                visit_code: cell(1),
                visit_label: cell(2),
                sequence_name: cell(3),
                scan_date: ScanDate::new(cell(4)),
                study_id: cell(5),
                series_id: numeric(6)?,
                image_id: numeric(7)?,
                is_original: flag(8)?,
            };
            let is_multi_file = flag(9)?;
            let path = cell(10);
            let location = (!path.is_empty()).then(|| ImageLocation {
                path: PathBuf::from(path),
                is_multi_file,
            });
            rows.push(ManifestRow { image, location });
        }

        Ok(Self { rows })
    }
}

/// Session label of a visit code: `bl` → `M00`, `m48` → `M48`
pub fn session_label(visit_code: &str) -> String {
    let visit_code = visit_code.trim();
    if visit_code.eq_ignore_ascii_case("bl") {
        return "M00".to_string();
    }
    let mut chars = visit_code.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

fn format_bool(value: bool) -> String {
    let text = if value { "True" } else { "False" };
    text.to_string()
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}
