//! Delimited-text input tables
//!
//! Columns are looked up by header name, so extra or reordered columns in the
//! source CSVs are harmless and a missing one is reported by name.

pub mod columns;
mod load;

pub use load::{load_metadata_table, load_qc_table, load_subject_roster};

use crate::error::{Av45Error, Result};
use csv::{Reader, ReaderBuilder, StringRecord};
use std::fs::File;
use std::path::Path;

/// Opens a delimited table with a header row
///
/// Rows may have differing lengths; short rows read as empty cells.
pub fn open_table(path: &Path, delimiter: u8) -> Result<Reader<File>> {
    let reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_path(path)?;
    Ok(reader)
}

/// Header row of an open table
pub struct TableHeader {
    name: String,
    headers: StringRecord,
}

impl TableHeader {
    /// Reads the header row
    pub fn read(reader: &mut Reader<File>, path: &Path) -> Result<Self> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self {
            name,
            headers: reader.headers()?.clone(),
        })
    }

    /// Table name used in error messages
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Index of a required column
    ///
    /// # Errors
    ///
    /// Returns [`Av45Error::MissingColumn`] if no header matches.
    pub fn require(&self, column: &str) -> Result<usize> {
        self.optional(column)
            .ok_or_else(|| Av45Error::MissingColumn {
                table: self.name.clone(),
                column: column.to_string(),
            })
    }

    /// Index of an optional column
    pub fn optional(&self, column: &str) -> Option<usize> {
        self.headers.iter().position(|h| h.trim() == column)
    }
}

/// Helper to get a trimmed cell value
///
/// Returns an empty string if the row is shorter than the header.
pub fn get_string_value(record: &StringRecord, idx: usize) -> String {
    record.get(idx).map(|s| s.trim().to_string()).unwrap_or_default()
}

/// Helper to parse a numeric identifier cell
///
/// Accepts plain digits and digits with an all-zero fraction (`"1234.0"`),
/// which is how some exports write id columns. Exponents, signs and values
/// beyond `u64` are rejected.
pub fn parse_id(value: &str) -> Option<u64> {
    let value = value.trim();
    let digits = match value.split_once('.') {
        Some((int, frac)) if !frac.is_empty() && frac.bytes().all(|b| b == b'0') => int,
        Some(_) => return None,
        None => value,
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Helper to parse a pass flag cell
///
/// `1`, `1.0`, `true` and `yes` (any case) are true; anything else is false.
pub fn parse_flag(value: &str) -> bool {
    let value = value.trim().to_lowercase();
    match value.as_str() {
        "true" | "yes" => true,
        _ => parse_id(&value) == Some(1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::fs;
    use tempfile::TempDir;

    #[rstest]
    #[case("1234", Some(1234))]
    #[case(" 1234 ", Some(1234))]
    #[case("1234.0", Some(1234))]
    #[case("1234.5", None)]
    #[case("-3", None)]
    #[case("", None)]
    #[case("I1234", None)]
    #[case("1234.00", Some(1234))]
    #[case("1e3", None)]
    #[case("1e30", None)]
    #[case("1.0e3", None)]
    #[case("99999999999999999999", None)]
    #[case("+5", None)]
    #[case(".0", None)]
    #[case("12.", None)]
    fn test_parse_id(#[case] input: &str, #[case] expected: Option<u64>) {
        assert_eq!(parse_id(input), expected);
    }

    #[rstest]
    #[case("1", true)]
    #[case("1.0", true)]
    #[case("TRUE", true)]
    #[case("yes", true)]
    #[case("0", false)]
    #[case("-1", false)]
    #[case("", false)]
    fn test_parse_flag(#[case] input: &str, #[case] expected: bool) {
        assert_eq!(parse_flag(input), expected);
    }

    #[test]
    fn test_table_header_lookup() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("table.csv");
        fs::write(&path, "A, B ,C\n1,2,3\n").unwrap();

        let mut reader = open_table(&path, b',').unwrap();
        let header = TableHeader::read(&mut reader, &path).unwrap();

        assert_eq!(header.name(), "table.csv");
        assert_eq!(header.require("B").unwrap(), 1);
        assert_eq!(header.optional("D"), None);
        assert!(matches!(
            header.require("D"),
            Err(Av45Error::MissingColumn { .. })
        ));
    }

    #[test]
    fn test_get_string_value_short_row() {
        let record = StringRecord::from(vec![" a "]);
        assert_eq!(get_string_value(&record, 0), "a");
        assert_eq!(get_string_value(&record, 3), "");
    }

    #[test]
    fn test_open_missing_table() {
        let temp_dir = TempDir::new().unwrap();
        let result = open_table(&temp_dir.path().join("absent.csv"), b',');
        assert!(matches!(result, Err(Av45Error::CsvError(_))));
    }
}
