pub mod api;
pub mod archive;
pub mod cli;
pub mod config;
pub mod error;
pub mod manifest;
pub mod selection;
pub mod tables;
pub mod types;

pub use api::{PathResolver, RunReport};
pub use archive::{ArchiveLocator, FsArchive, InMemoryArchive};
pub use cli::report::TextReport;
pub use config::{ResolveConfig, SequenceRules};
pub use error::{Av45Error, Result};
pub use manifest::{session_label, Manifest, ManifestRow};
pub use selection::{RawMatch, Resolver, RunSummary};
pub use types::*;
