//! Spreadsheet export of a route summary
//!
//! Serializes a single summary row as xlsx (or CSV for `.csv` destinations)
//! and writes it to disk with overwrite protection.

use std::io::{BufRead, Write};
use std::path::Path;

use log::debug;
use rust_xlsxwriter::{Format, Workbook};

use crate::core::error::{Error, Result};
use crate::core::summary::SummaryRecord;

/// File name offered for downloads
pub const DEFAULT_EXPORT_FILENAME: &str = "hospital_route.xlsx";

/// MIME type of the serialized workbook
pub const XLSX_MIME_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Header row of the exported sheet
pub const EXPORT_COLUMNS: [&str; 7] = [
    "Hospital A",
    "State A",
    "Hospital B",
    "State B",
    "Distance (km)",
    "Est. Time (user speed)",
    "API Time (hr)",
];

/// Overwrite behavior for existing files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverwriteBehavior {
    /// Prompt user for confirmation (default)
    #[default]
    Prompt,
    /// Force overwrite without prompting
    Force,
    /// Never overwrite, fail if file exists
    NeverOverwrite,
}

/// Serialize the summary as a one-sheet xlsx workbook
pub fn serialize(summary: &SummaryRecord) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();
    let sheet = workbook.add_worksheet();

    for (col, title) in EXPORT_COLUMNS.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *title, &header)?;
    }

    sheet.write_string(1, 0, summary.hospital_a.as_str())?;
    sheet.write_string(1, 1, summary.state_a.as_str())?;
    sheet.write_string(1, 2, summary.hospital_b.as_str())?;
    sheet.write_string(1, 3, summary.state_b.as_str())?;
    sheet.write_number(1, 4, summary.distance_km)?;
    sheet.write_string(1, 5, summary.estimated_time_display())?;
    sheet.write_string(1, 6, summary.api_time_display())?;

    Ok(workbook.save_to_buffer()?)
}

/// Serialize the same row as CSV
pub fn serialize_csv(summary: &SummaryRecord) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(EXPORT_COLUMNS)?;
    writer.write_record([
        summary.hospital_a.clone(),
        summary.state_a.clone(),
        summary.hospital_b.clone(),
        summary.state_b.clone(),
        summary.distance_km.to_string(),
        summary.estimated_time_display(),
        summary.api_time_display(),
    ])?;

    writer
        .into_inner()
        .map_err(|e| Error::ExportFailed(e.to_string()))
}

/// Write the summary to `path`, choosing CSV or xlsx from the extension.
///
/// An existing file is replaced only as `overwrite` allows; with
/// [`OverwriteBehavior::Prompt`] the question goes to stderr and the answer
/// is read from stdin.
pub fn export_to_file(summary: &SummaryRecord, path: &Path, overwrite: OverwriteBehavior) -> Result<()> {
    if path.exists() {
        ensure_replaceable(path, overwrite, &mut std::io::stdin().lock())?;
    }

    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));

    let bytes = if is_csv {
        serialize_csv(summary)?
    } else {
        serialize(summary)?
    };

    std::fs::write(path, &bytes)?;
    debug!("Wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

/// Decide whether the existing export at `path` may be replaced
fn ensure_replaceable(path: &Path, overwrite: OverwriteBehavior, answers: &mut impl BufRead) -> Result<()> {
    let display = path.display();
    match overwrite {
        OverwriteBehavior::Force => {
            eprintln!("⚠️  Replacing {display}");
            Ok(())
        }
        OverwriteBehavior::NeverOverwrite => Err(Error::ExportFailed(format!(
            "{display} already exists (use --force to replace it)"
        ))),
        OverwriteBehavior::Prompt => {
            eprint!("⚠️  {display} already exists. Replace it? [y/N]: ");
            std::io::stderr().flush()?;

            let mut answer = String::new();
            answers.read_line(&mut answer)?;
            match answer.trim().to_ascii_lowercase().as_str() {
                "y" | "yes" => Ok(()),
                _ => Err(Error::ExportFailed(format!("kept existing {display}"))),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::{Data, Reader, Xlsx};
    use std::io::Cursor;
    use tempfile::{tempdir, NamedTempFile};

    fn summary() -> SummaryRecord {
        SummaryRecord {
            hospital_a: "Hospital Kuala Lumpur".to_string(),
            state_a: "WP Kuala Lumpur".to_string(),
            hospital_b: "Hospital Sultanah Aminah".to_string(),
            state_b: "Johor".to_string(),
            distance_km: 123.4,
            speed_kmh: 80,
            estimated_hr_user: 1.5425,
            duration_hr_api: 1.5,
        }
    }

    #[test]
    fn test_serialize_xlsx_single_row() {
        let bytes = serialize(&summary()).unwrap();
        let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes)).unwrap();
        let range = workbook.worksheet_range_at(0).unwrap().unwrap();

        assert_eq!(range.height(), 2);
        assert_eq!(range.width(), 7);
        assert_eq!(
            range.get_value((0, 5)),
            Some(&Data::String("Est. Time (user speed)".to_string()))
        );
        assert_eq!(
            range.get_value((1, 0)),
            Some(&Data::String("Hospital Kuala Lumpur".to_string()))
        );
        assert_eq!(range.get_value((1, 4)), Some(&Data::Float(123.4)));
        assert_eq!(
            range.get_value((1, 5)),
            Some(&Data::String("1 hr 32 min".to_string()))
        );
        assert_eq!(
            range.get_value((1, 6)),
            Some(&Data::String("1.50 hr".to_string()))
        );
    }

    #[test]
    fn test_serialize_csv() {
        let bytes = serialize_csv(&summary()).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines[0],
            "Hospital A,State A,Hospital B,State B,Distance (km),Est. Time (user speed),API Time (hr)"
        );
        assert_eq!(
            lines[1],
            "Hospital Kuala Lumpur,WP Kuala Lumpur,Hospital Sultanah Aminah,Johor,123.4,1 hr 32 min,1.50 hr"
        );
    }

    #[test]
    fn test_export_to_new_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(DEFAULT_EXPORT_FILENAME);

        export_to_file(&summary(), &path, OverwriteBehavior::NeverOverwrite).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        // xlsx is a zip container
        assert_eq!(&bytes[..2], b"PK");
    }

    fn existing_file(contents: &str) -> NamedTempFile {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), contents).unwrap();
        file
    }

    #[test]
    fn test_force_replaces_existing_export() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("route.csv");
        std::fs::write(&path, "old").unwrap();

        export_to_file(&summary(), &path, OverwriteBehavior::Force).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().starts_with("Hospital A,"));
    }

    #[test]
    fn test_never_overwrite_keeps_existing_export() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("route.xlsx");
        std::fs::write(&path, "old").unwrap();

        match export_to_file(&summary(), &path, OverwriteBehavior::NeverOverwrite) {
            Err(Error::ExportFailed(msg)) => assert!(msg.contains("use --force")),
            other => panic!("Expected ExportFailed, got {other:?}"),
        }
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "old");
    }

    #[test]
    fn test_prompt_answers() {
        let file = existing_file("old");

        for answer in ["y\n", "YES\n"] {
            let result = ensure_replaceable(file.path(), OverwriteBehavior::Prompt, &mut Cursor::new(answer));
            assert!(result.is_ok(), "answer {answer:?} should allow replacing");
        }

        for answer in ["n\n", "\n", ""] {
            let result = ensure_replaceable(file.path(), OverwriteBehavior::Prompt, &mut Cursor::new(answer));
            assert!(
                matches!(result, Err(Error::ExportFailed(_))),
                "answer {answer:?} should keep the file"
            );
        }
    }
}
