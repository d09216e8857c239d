use av45select_core::config::manifest_path_for;
use av45select_core::{Manifest, TextReport};
use clap::{Parser, ValueEnum};
use log::{error, info};
use std::path::{Path, PathBuf};
use std::process;

/// CLI tool for inspecting an AV45 PET path manifest
#[derive(Parser, Debug)]
#[command(name = "av45report")]
#[command(about = "Report the contents of an AV45 PET path manifest")]
#[command(version)]
struct Cli {
    /// Manifest file, or the destination directory it was written under
    #[arg(value_name = "MANIFEST")]
    manifest: PathBuf,

    /// Output format
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Output format options
#[derive(Debug, Clone, ValueEnum)]
enum OutputFormat {
    /// Human-readable text format
    Text,
    /// JSON format
    Json,
    /// Paths awaiting conversion only (one per line)
    Paths,
}

fn main() {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    let path = manifest_file(&cli.manifest);
    if !path.is_file() {
        eprintln!("Error: {} is not a file", path.display());
        process::exit(1);
    }

    info!("Reading manifest: {}", path.display());

    let manifest = match Manifest::read_from(&path) {
        Ok(manifest) => manifest,
        Err(e) => {
            error!("Failed to read manifest: {}", e);
            eprintln!("Error: Failed to read manifest: {}", e);
            process::exit(1);
        }
    };

    output_manifest(&manifest, cli.format);
}

fn setup_logging(verbose: bool) {
    if verbose {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }
}

/// Resolves a destination directory to the manifest written below it
fn manifest_file(path: &Path) -> PathBuf {
    if path.is_dir() {
        manifest_path_for(path)
    } else {
        path.to_path_buf()
    }
}

fn output_manifest(manifest: &Manifest, format: OutputFormat) {
    match format {
        OutputFormat::Text => {
            println!("{}", TextReport::new(manifest));
        }
        OutputFormat::Paths => {
            for row in manifest.pending_conversions() {
                println!("{}", row.path_string());
            }
        }
        OutputFormat::Json => {
            #[cfg(feature = "json")]
            {
                match output_json(manifest) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        error!("Failed to serialize to JSON: {}", e);
                        eprintln!("Error: Failed to serialize to JSON: {}", e);
                        process::exit(1);
                    }
                }
            }
            #[cfg(not(feature = "json"))]
            {
                eprintln!("Error: JSON output requires the 'json' feature");
                eprintln!("Rebuild with: cargo build --features json");
                process::exit(1);
            }
        }
    }
}

#[cfg(feature = "json")]
fn output_json(manifest: &Manifest) -> Result<String, serde_json::Error> {
    use av45select_core::{session_label, ManifestRow};
    use serde::Serialize;

    #[derive(Serialize)]
    struct ManifestJson<'a> {
        pending: usize,
        unresolved: usize,
        rows: Vec<RowJson<'a>>,
    }

    #[derive(Serialize)]
    struct RowJson<'a> {
        session: String,
        #[serde(flatten)]
        row: &'a ManifestRow,
    }

    let output = ManifestJson {
        pending: manifest.pending_conversions().count(),
        unresolved: manifest.unresolved().count(),
        rows: manifest
            .rows()
            .iter()
            .map(|row| RowJson {
                session: session_label(&row.image.visit_code),
                row,
            })
            .collect(),
    };

    serde_json::to_string_pretty(&output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_manifest_file_from_dest_dir() {
        let temp_dir = TempDir::new().unwrap();
        assert_eq!(
            manifest_file(temp_dir.path()),
            temp_dir.path().join("conversion_info").join("av45_pet_paths.tsv")
        );
    }

    #[test]
    fn test_manifest_file_passthrough() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("paths.tsv");
        assert_eq!(manifest_file(&path), path);
    }

    #[cfg(feature = "json")]
    #[test]
    fn test_output_json() {
        use av45select_core::{ImageLocation, ManifestRow, ResolvedImage, ScanDate};

        let manifest = Manifest::from_rows(vec![ManifestRow {
            image: ResolvedImage {
                subject_id: "128_S_2220".to_string(),
                visit_code: "bl".to_string(),
                visit_label: "ADNI2 Baseline".to_string(),
                sequence_name: "AV45_Co-registered,_Averaged".to_string(),
                scan_date: ScanDate::new("6/20/2011"),
                study_id: "1001".to_string(),
                series_id: 5001,
                image_id: 1,
                is_original: false,
            },
            location: Some(ImageLocation::single_file("/archive/I1/scan.nii")),
        }]);

        let json = output_json(&manifest).unwrap();
        assert!(json.contains("\"session\": \"M00\""));
        assert!(json.contains("\"pending\": 1"));
        assert!(json.contains("\"subject_id\": \"128_S_2220\""));
    }
}
