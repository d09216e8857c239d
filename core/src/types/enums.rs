use std::fmt;

/// Whether a metadata row describes a raw acquisition or a derived image
///
/// Raw acquisitions and everything derived from them share a series id; the
/// `Orig/Proc` column tells them apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "json", serde(rename_all = "lowercase"))]
pub enum OrigOrProc {
    Unknown,
    Original,
    Processed,
}

impl OrigOrProc {
    /// Returns whether this row is a raw acquisition
    pub fn is_original(&self) -> bool {
        matches!(self, OrigOrProc::Original)
    }

    /// Returns simple name for display
    pub fn simple_name(&self) -> &'static str {
        match self {
            OrigOrProc::Unknown => "unknown",
            OrigOrProc::Original => "original",
            OrigOrProc::Processed => "processed",
        }
    }

    /// Parses the `Orig/Proc` column
    ///
    /// Matching is exact apart from surrounding whitespace and case. Anything
    /// else is `Unknown`, which never satisfies a raw-acquisition lookup.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "original" => OrigOrProc::Original,
            "processed" => OrigOrProc::Processed,
            _ => OrigOrProc::Unknown,
        }
    }
}

impl fmt::Display for OrigOrProc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.simple_name())
    }
}
