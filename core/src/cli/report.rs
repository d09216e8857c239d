use crate::manifest::{session_label, Manifest, ManifestRow};
use crate::selection::RunSummary;
use std::fmt;

/// Text report formatter for a resolution manifest
pub struct TextReport<'a> {
    manifest: &'a Manifest,
    summary: Option<&'a RunSummary>,
}

impl<'a> TextReport<'a> {
    /// Creates a new text report
    pub fn new(manifest: &'a Manifest) -> Self {
        Self {
            manifest,
            summary: None,
        }
    }

    /// Builder: include the counters of the run that produced the manifest
    pub fn with_summary(mut self, summary: &'a RunSummary) -> Self {
        self.summary = Some(summary);
        self
    }

    fn write_row(f: &mut fmt::Formatter<'_>, row: &ManifestRow) -> fmt::Result {
        let image = &row.image;
        writeln!(
            f,
            "{} ses-{} ({}): {}",
            image.subject_id,
            session_label(&image.visit_code),
            image.visit_code,
            if row.is_resolved() {
                row.path_string()
            } else {
                "Not found".to_string()
            }
        )?;
        writeln!(f, "  Sequence: {}", image.sequence_name)?;
        writeln!(
            f,
            "  Image:    I{} (series {}, study {})",
            image.image_id, image.series_id, image.study_id
        )?;
        writeln!(f, "  Date:     {}", image.scan_date)?;
        let variant = if image.is_original {
            "original"
        } else {
            "co-registered, averaged"
        };
        writeln!(f, "  Variant:  {}", variant)?;
        if row.is_resolved() {
            let layout = if row.is_multi_file() {
                "DICOM series"
            } else {
                "single file"
            };
            writeln!(f, "  Layout:   {}", layout)?;
        }
        Ok(())
    }
}

impl<'a> fmt::Display for TextReport<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "AV45 PET Paths")?;
        writeln!(f, "==============")?;
        writeln!(f)?;
        writeln!(f, "Rows:        {}", self.manifest.len())?;
        writeln!(
            f,
            "Pending:     {}",
            self.manifest.pending_conversions().count()
        )?;
        writeln!(f, "Unresolved:  {}", self.manifest.unresolved().count())?;

        if let Some(summary) = self.summary {
            writeln!(f)?;
            writeln!(f, "Run Summary")?;
            writeln!(f, "-----------")?;
            writeln!(
                f,
                "Subjects:    {} ({} without metadata)",
                summary.subjects, summary.subjects_skipped
            )?;
            writeln!(f, "Visits skipped:     {}", summary.visits_skipped)?;
            writeln!(f, "Exceptions removed: {}", summary.exceptions_removed)?;
        }

        writeln!(f)?;
        for row in self.manifest.rows() {
            Self::write_row(f, row)?;
            writeln!(f)?;
        }

        Ok(())
    }
}
