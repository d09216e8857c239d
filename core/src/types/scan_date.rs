use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// Calendar date of an exam or scan, as written in the source tables
///
/// The QC table and the metadata table do not agree on a date format, so
/// equality goes through [`ScanDate::same_day`], which compares the parsed
/// calendar day when both sides parse and the trimmed text otherwise. The raw
/// text is kept so the manifest reproduces what the metadata table says.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
pub struct ScanDate {
    raw: String,
}

impl ScanDate {
    /// Creates a ScanDate from a table cell
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    /// Returns the cell text as read
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Parses the date into (year, month, day)
    ///
    /// Accepts formats like:
    /// - "2011-06-20"
    /// - "2011/06/20"
    /// - "6/20/2011"
    /// - "2011-06-20 00:00:00" (trailing time ignored)
    ///
    /// Returns `None` for anything else, including out-of-range months/days.
    pub fn parse(&self) -> Option<(u16, u8, u8)> {
        static ISO: OnceLock<Regex> = OnceLock::new();
        static US: OnceLock<Regex> = OnceLock::new();
        let iso = ISO.get_or_init(|| {
            Regex::new(r"^(\d{4})[-/](\d{1,2})[-/](\d{1,2})(?:[ T].*)?$")
                .expect("Failed to compile regex")
        });
        let us = US.get_or_init(|| {
            Regex::new(r"^(\d{1,2})/(\d{1,2})/(\d{4})(?:[ T].*)?$")
                .expect("Failed to compile regex")
        });

        let text = self.raw.trim();
        let (year, month, day): (u16, u8, u8) = if let Some(caps) = iso.captures(text) {
            (caps[1].parse().ok()?, caps[2].parse().ok()?, caps[3].parse().ok()?)
        } else if let Some(caps) = us.captures(text) {
            (caps[3].parse().ok()?, caps[1].parse().ok()?, caps[2].parse().ok()?)
        } else {
            return None;
        };

        if (1..=12).contains(&month) && (1..=31).contains(&day) {
            Some((year, month, day))
        } else {
            None
        }
    }

    /// Checks whether both dates denote the same calendar day
    pub fn same_day(&self, other: &ScanDate) -> bool {
        match (self.parse(), other.parse()) {
            (Some(a), Some(b)) => a == b,
            _ => self.raw.trim() == other.raw.trim(),
        }
    }
}

impl fmt::Display for ScanDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("2011-06-20", Some((2011, 6, 20)))]
    #[case("2011/6/20", Some((2011, 6, 20)))]
    #[case("6/20/2011", Some((2011, 6, 20)))]
    #[case(" 2011-06-20 00:00:00 ", Some((2011, 6, 20)))]
    #[case("2011-13-01", None)]
    #[case("20110620", None)]
    #[case("", None)]
    fn test_parse(#[case] input: &str, #[case] expected: Option<(u16, u8, u8)>) {
        assert_eq!(ScanDate::new(input).parse(), expected);
    }

    #[test]
    fn test_same_day_across_formats() {
        assert!(ScanDate::new("2011-06-20").same_day(&ScanDate::new("6/20/2011")));
        assert!(!ScanDate::new("2011-06-20").same_day(&ScanDate::new("6/21/2011")));
    }

    #[test]
    fn test_same_day_falls_back_to_text() {
        assert!(ScanDate::new("unknown ").same_day(&ScanDate::new("unknown")));
        assert!(!ScanDate::new("unknown").same_day(&ScanDate::new("2011-06-20")));
    }

    #[test]
    fn test_display_keeps_raw_text() {
        assert_eq!(ScanDate::new("6/20/2011").to_string(), "6/20/2011");
    }
}
