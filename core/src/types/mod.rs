//! Core type definitions for AV45 scan resolution
//!
//! This module provides the fundamental types used throughout the library:
//! - [`SubjectId`]: Subject identifier with its QC roster id
//! - [`QcRecord`] / [`MetadataRecord`]: Rows of the QC and PET metadata tables
//! - [`OrigOrProc`]: Raw acquisition vs derived image
//! - [`ScanDate`]: Exam/scan date with format-tolerant comparison
//! - [`ResolvedImage`] / [`ImageLocation`]: Selection output and its archive location
//! - [`ExceptionList`]: Deny-list of unconvertible subject visits

mod enums;
mod exceptions;
mod records;
mod resolved;
mod scan_date;
mod sequence;

pub use enums::OrigOrProc;
pub use exceptions::{ConversionException, ExceptionList};
pub use records::{MetadataRecord, QcRecord, SubjectId};
pub use resolved::{ImageLocation, ResolvedImage};
pub use scan_date::ScanDate;
pub use sequence::{
    contains_ignore_case, sanitize_sequence, AV45_TRACER, COREG_AVERAGED_SEQUENCE,
    EARLY_FRAME_MARKER,
};
