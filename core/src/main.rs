use av45select_core::cli::Cli;
use av45select_core::PathResolver;
use clap::Parser;
use log::error;
use std::process;

fn main() {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    if !cli.csv_dir.is_dir() {
        eprintln!("Error: {} is not a directory", cli.csv_dir.display());
        process::exit(1);
    }
    if !cli.source_dir.is_dir() {
        eprintln!("Error: {} is not a directory", cli.source_dir.display());
        process::exit(1);
    }

    let config = match cli.to_config() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid arguments: {}", e);
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    match PathResolver::run(&config) {
        Ok(report) => {
            println!("{}", report.summary);
            println!("{}", report.manifest_path.display());
        }
        Err(e) => {
            error!("Path resolution failed: {}", e);
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
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
