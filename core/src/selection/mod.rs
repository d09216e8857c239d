//! Scan selection logic
//!
//! Collapses the passed QC rows of each subject visit to one image: candidate
//! tie-breaking, raw acquisition matching, derivative preference and the
//! exception list.

pub mod acquisition;
pub mod candidate;
pub mod quality;
pub mod resolver;

pub use acquisition::{
    match_raw_acquisition, prefer_variant, MetadataIndex, PreferredVariant, RawMatch,
    SubjectMetadata,
};
pub use candidate::resolve_candidate;
pub use quality::{group_by_visit, QcIndex, VisitGroup};
pub use resolver::{apply_exceptions, Resolver, RunSummary, SubjectOutcome};
