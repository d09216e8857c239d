pub mod report;

use crate::config::ResolveConfig;
use crate::error::Result;
use crate::types::ExceptionList;
use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};

/// Command-line arguments for av45select
#[derive(Parser, Debug)]
#[command(name = "av45select")]
#[command(about = "Resolve AV45 PET image paths for each subject visit and write the conversion manifest")]
#[command(version)]
pub struct Cli {
    /// Root of the raw image archive
    #[arg(value_name = "SOURCE_DIR")]
    pub source_dir: PathBuf,

    /// Directory holding AV45QC.csv, PET_META_LIST.csv and ADNIMERGE.csv
    #[arg(value_name = "CSV_DIR")]
    pub csv_dir: PathBuf,

    /// Destination root; the manifest goes to conversion_info/ below it
    #[arg(value_name = "DEST_DIR")]
    pub dest_dir: PathBuf,

    /// Subjects to process (repeatable or comma-separated)
    #[arg(short, long, value_delimiter = ',')]
    pub subjects: Vec<String>,

    /// File with one subject id per line
    #[arg(long, value_name = "FILE")]
    pub subjects_file: Option<PathBuf>,

    /// Extra exception list (TSV with subject_id, visit_code and optional reason)
    #[arg(short, long, value_name = "FILE")]
    pub exceptions: Option<PathBuf>,

    /// Do not apply the built-in exception list
    #[arg(long)]
    pub no_default_exceptions: bool,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Builds the run configuration
    ///
    /// Subjects given on the command line come first, followed by those from
    /// `--subjects-file`. With neither, the roster table decides.
    pub fn to_config(&self) -> Result<ResolveConfig> {
        let mut subjects = self.subjects.clone();
        if let Some(path) = &self.subjects_file {
            subjects.extend(read_subjects_file(path)?);
        }

        let mut exceptions = if self.no_default_exceptions {
            ExceptionList::empty()
        } else {
            ExceptionList::default()
        };
        if let Some(path) = &self.exceptions {
            exceptions.extend_from_file(path)?;
        }

        let mut config = ResolveConfig::new(&self.source_dir, &self.csv_dir, &self.dest_dir)
            .with_exceptions(exceptions);
        if !subjects.is_empty() || self.subjects_file.is_some() {
            config = config.with_subjects(subjects);
        }
        Ok(config)
    }
}

/// Reads subject ids, one per line
///
/// Blank lines and lines starting with `#` are skipped.
pub fn read_subjects_file(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(String::from)
        .collect())
}
