// Source file names inside the metadata directory
pub const QC_TABLE_FILE: &str = "AV45QC.csv";
pub const METADATA_TABLE_FILE: &str = "PET_META_LIST.csv";
pub const ROSTER_TABLE_FILE: &str = "ADNIMERGE.csv";

// QC Table Columns
pub const QC_RID: &str = "RID";
pub const QC_PASS: &str = "PASS";
pub const QC_VISIT_CODE: &str = "VISCODE2";
pub const QC_IMAGE_UID: &str = "LONIUID";
pub const QC_EXAM_DATE: &str = "EXAMDATE";

// Metadata Table Columns
pub const META_SUBJECT: &str = "Subject";
pub const META_IMAGE_ID: &str = "Image ID";
pub const META_SERIES_ID: &str = "Series ID";
pub const META_SEQUENCE: &str = "Sequence";
pub const META_ORIG_PROC: &str = "Orig/Proc";
pub const META_SCAN_DATE: &str = "Scan Date";
pub const META_STUDY_ID: &str = "Study ID";
pub const META_VISIT: &str = "Visit";

// Roster Table Columns
pub const ROSTER_SUBJECT: &str = "PTID";

// Exception File Columns
pub const EXC_SUBJECT_ID: &str = "subject_id";
pub const EXC_VISIT_CODE: &str = "visit_code";
pub const EXC_REASON: &str = "reason";

// Manifest Columns, in output order
pub const MANIFEST_COLUMNS: [&str; 11] = [
    "Subject_ID",
    "VISCODE",
    "Visit",
    "Sequence",
    "Scan_Date",
    "Study_ID",
    "Series_ID",
    "Image_ID",
    "Original",
    "Is_Dicom",
    "Path",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_column_order() {
        assert_eq!(MANIFEST_COLUMNS[0], "Subject_ID");
        assert_eq!(MANIFEST_COLUMNS[8], "Original");
        assert_eq!(MANIFEST_COLUMNS[10], "Path");
    }
}
