use super::columns::*;
use super::{get_string_value, open_table, parse_flag, parse_id, TableHeader};
use crate::error::{Av45Error, Result};
use crate::types::{MetadataRecord, OrigOrProc, QcRecord, ScanDate};
use log::debug;
use std::collections::HashSet;
use std::path::Path;

/// Loads the AV45 QC table
///
/// # Errors
///
/// Returns an error if the file is unreadable, a required column is missing,
/// or a row carries a non-numeric RID.
pub fn load_qc_table(path: &Path) -> Result<Vec<QcRecord>> {
    let mut reader = open_table(path, b',')?;
    let header = TableHeader::read(&mut reader, path)?;
    let rid_idx = header.require(QC_RID)?;
    let pass_idx = header.require(QC_PASS)?;
    let visit_idx = header.require(QC_VISIT_CODE)?;
    let uid_idx = header.require(QC_IMAGE_UID)?;
    let date_idx = header.require(QC_EXAM_DATE)?;

    let mut records = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record?;
        let rid_text = get_string_value(&record, rid_idx);
        let rid = parse_id(&rid_text)
            .and_then(|rid| u32::try_from(rid).ok())
            .ok_or_else(|| {
                Av45Error::invalid_value(header.name(), row + 1, format!("RID '{}'", rid_text))
            })?;

        records.push(QcRecord {
            rid,
            visit_code: get_string_value(&record, visit_idx),
            passed: parse_flag(&get_string_value(&record, pass_idx)),
            image_uid: get_string_value(&record, uid_idx),
            exam_date: ScanDate::new(get_string_value(&record, date_idx)),
        });
    }

    debug!("Loaded {} QC rows from {}", records.len(), path.display());
    Ok(records)
}

/// Loads the PET metadata list
///
/// # Errors
///
/// Returns an error if the file is unreadable, a required column is missing,
/// or a row carries a non-numeric image or series id.
pub fn load_metadata_table(path: &Path) -> Result<Vec<MetadataRecord>> {
    let mut reader = open_table(path, b',')?;
    let header = TableHeader::read(&mut reader, path)?;
    let subject_idx = header.require(META_SUBJECT)?;
    let image_idx = header.require(META_IMAGE_ID)?;
    let series_idx = header.require(META_SERIES_ID)?;
    let sequence_idx = header.require(META_SEQUENCE)?;
    let orig_idx = header.require(META_ORIG_PROC)?;
    let date_idx = header.require(META_SCAN_DATE)?;
    let study_idx = header.require(META_STUDY_ID)?;
    let visit_idx = header.require(META_VISIT)?;

    let mut records = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record?;
        let numeric = |idx: usize, column: &str| -> Result<u64> {
            let text = get_string_value(&record, idx);
            parse_id(&text).ok_or_else(|| {
                Av45Error::invalid_value(header.name(), row + 1, format!("{} '{}'", column, text))
            })
        };

        records.push(MetadataRecord {
            subject_id: get_string_value(&record, subject_idx),
            image_id: numeric(image_idx, META_IMAGE_ID)?,
            series_id: numeric(series_idx, META_SERIES_ID)?,
            sequence_name: get_string_value(&record, sequence_idx),
            orig_or_proc: OrigOrProc::from_str(&get_string_value(&record, orig_idx)),
            scan_date: ScanDate::new(get_string_value(&record, date_idx)),
            study_id: get_string_value(&record, study_idx),
            visit_label: get_string_value(&record, visit_idx),
        });
    }

    debug!("Loaded {} metadata rows from {}", records.len(), path.display());
    Ok(records)
}

/// Loads the subject roster: unique `PTID` values in order of first appearance
///
/// # Errors
///
/// Returns an error if the file is unreadable or has no `PTID` column.
pub fn load_subject_roster(path: &Path) -> Result<Vec<String>> {
    let mut reader = open_table(path, b',')?;
    let header = TableHeader::read(&mut reader, path)?;
    let subject_idx = header.require(ROSTER_SUBJECT)?;

    let mut seen = HashSet::new();
    let mut subjects = Vec::new();
    for record in reader.records() {
        let subject = get_string_value(&record?, subject_idx);
        if !subject.is_empty() && seen.insert(subject.clone()) {
            subjects.push(subject);
        }
    }

    debug!("Loaded {} subjects from {}", subjects.len(), path.display());
    Ok(subjects)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_qc_table() {
        let temp_dir = TempDir::new().unwrap();
        let path = write(
            &temp_dir,
            QC_TABLE_FILE,
            "RID,VISCODE2,PASS,LONIUID,EXAMDATE,EXTRA\n\
             2220,bl,1,I254578,2011-06-20,x\n\
             2220,m24,0,I300001,2013-06-18,y\n",
        );

        let rows = load_qc_table(&path).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].rid, 2220);
        assert_eq!(rows[0].visit_code, "bl");
        assert!(rows[0].passed);
        assert_eq!(rows[0].image_id(), Some(254578));
        assert!(!rows[1].passed);
    }

    #[test]
    fn test_load_qc_table_missing_column() {
        let temp_dir = TempDir::new().unwrap();
        let path = write(&temp_dir, QC_TABLE_FILE, "RID,PASS,LONIUID,EXAMDATE\n");

        let err = load_qc_table(&path).unwrap_err();
        assert!(matches!(err, Av45Error::MissingColumn { ref column, .. } if column == QC_VISIT_CODE));
    }

    #[test]
    fn test_load_qc_table_bad_rid() {
        let temp_dir = TempDir::new().unwrap();
        let path = write(
            &temp_dir,
            QC_TABLE_FILE,
            "RID,VISCODE2,PASS,LONIUID,EXAMDATE\nabc,bl,1,I1,2011-06-20\n",
        );

        let err = load_qc_table(&path).unwrap_err();
        assert!(matches!(err, Av45Error::InvalidValue { row: 1, .. }));
    }

    #[test]
    fn test_load_metadata_table() {
        let temp_dir = TempDir::new().unwrap();
        let path = write(
            &temp_dir,
            METADATA_TABLE_FILE,
            "Subject,Visit,Study ID,Series ID,Image ID,Scan Date,Sequence,Orig/Proc\n\
             128_S_2220,ADNI2 Baseline,1001,5001,254578,6/20/2011,ADNI Brain PET: Raw AV45,Original\n\
             128_S_2220,ADNI2 Baseline,1001,5001,254580,6/20/2011,\"AV45 Co-registered, Averaged\",Processed\n",
        );

        let rows = load_metadata_table(&path).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].image_id, 254578);
        assert_eq!(rows[0].series_id, 5001);
        assert_eq!(rows[0].orig_or_proc, OrigOrProc::Original);
        assert_eq!(rows[1].sequence_name, "AV45 Co-registered, Averaged");
        assert_eq!(rows[1].orig_or_proc, OrigOrProc::Processed);
        assert_eq!(rows[1].visit_label, "ADNI2 Baseline");
    }

    #[test]
    fn test_load_metadata_table_bad_image_id() {
        let temp_dir = TempDir::new().unwrap();
        let path = write(
            &temp_dir,
            METADATA_TABLE_FILE,
            "Subject,Visit,Study ID,Series ID,Image ID,Scan Date,Sequence,Orig/Proc\n\
             128_S_2220,ADNI2 Baseline,1001,5001,,6/20/2011,Raw AV45,Original\n",
        );

        let err = load_metadata_table(&path).unwrap_err();
        assert!(matches!(err, Av45Error::InvalidValue { ref message, .. } if message.contains("Image ID")));
    }

    #[test]
    fn test_load_metadata_table_rejects_exponent_id() {
        let temp_dir = TempDir::new().unwrap();
        let path = write(
            &temp_dir,
            METADATA_TABLE_FILE,
            "Subject,Visit,Study ID,Series ID,Image ID,Scan Date,Sequence,Orig/Proc\n\
             128_S_2220,ADNI2 Baseline,1001,5001,1e30,6/20/2011,Raw AV45,Original\n",
        );

        let err = load_metadata_table(&path).unwrap_err();
        assert!(matches!(err, Av45Error::InvalidValue { ref message, .. } if message.contains("1e30")));
    }

    #[test]
    fn test_load_subject_roster_unique_in_order() {
        let temp_dir = TempDir::new().unwrap();
        let path = write(
            &temp_dir,
            ROSTER_TABLE_FILE,
            "RID,PTID,VISCODE\n2220,128_S_2220,bl\n4036,941_S_4036,bl\n2220,128_S_2220,m48\n",
        );

        let subjects = load_subject_roster(&path).unwrap();
        assert_eq!(subjects, vec!["128_S_2220", "941_S_4036"]);
    }
}
