//! Hospital dataset loading
//!
//! Reads a CSV or spreadsheet of hospitals, matches the name/state/coordinate
//! columns by trimmed header text, and drops rows without usable coordinates.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use log::debug;
use serde::Serialize;

use crate::core::error::{suggest_correction, Error, Result};

/// Accepted spellings of the facility name column, in priority order
const NAME_COLUMNS: [&str; 2] = ["Hospital Name", "Hospital"];
const STATE_COLUMN: &str = "State";
const LATITUDE_COLUMN: &str = "Latitude";
const LONGITUDE_COLUMN: &str = "Longitude";

/// A geographic point. Serialized in GeoJSON order: `[longitude, latitude]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    pub longitude: f64,
    pub latitude: f64,
}

impl Coordinate {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    /// `[longitude, latitude]` pair as sent to the routing service
    pub fn to_lon_lat(self) -> [f64; 2] {
        [self.longitude, self.latitude]
    }
}

/// One hospital row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HospitalRecord {
    pub name: String,
    pub state: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl HospitalRecord {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.longitude, self.latitude)
    }
}

/// Column positions resolved from the header row
#[derive(Debug, PartialEq)]
struct Columns {
    name: usize,
    state: usize,
    latitude: usize,
    longitude: usize,
}

/// Read-only list of hospitals loaded once at startup
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<HospitalRecord>,
}

impl Dataset {
    /// Load a dataset from a `.csv`, `.xlsx`, `.xls` or `.ods` file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::DatasetNotFound(path.to_path_buf()));
        }

        let rows = read_table(path)?;
        let dataset = Self::from_rows(rows)?;
        debug!(
            "Loaded {} hospitals from {}",
            dataset.len(),
            path.display()
        );
        Ok(dataset)
    }

    /// Build a dataset from raw table rows; the first row is the header
    pub fn from_rows(rows: Vec<Vec<String>>) -> Result<Self> {
        let mut rows = rows.into_iter();
        let header = rows
            .next()
            .ok_or_else(|| Error::DatasetFormat("table is empty".to_string()))?;
        let columns = locate_columns(&header)?;

        let mut records = Vec::new();
        let mut dropped = 0usize;

        for row in rows {
            let cell = |index: usize| row.get(index).map(|c| c.trim()).unwrap_or("");

            let (Some(latitude), Some(longitude)) = (
                parse_coordinate(cell(columns.latitude)),
                parse_coordinate(cell(columns.longitude)),
            ) else {
                dropped += 1;
                continue;
            };

            records.push(HospitalRecord {
                name: cell(columns.name).to_string(),
                state: cell(columns.state).to_string(),
                latitude,
                longitude,
            });
        }

        if dropped > 0 {
            debug!("Skipped {dropped} rows without coordinates");
        }

        Ok(Self { records })
    }

    pub fn from_records(records: Vec<HospitalRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[HospitalRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sorted unique state names
    pub fn states(&self) -> Vec<&str> {
        let mut states: Vec<&str> = self.records.iter().map(|r| r.state.as_str()).collect();
        states.sort_unstable();
        states.dedup();
        states
    }

    /// Unique hospital names in `state`, in file order
    pub fn hospitals_in(&self, state: &str) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for record in self.records.iter().filter(|r| r.state == state) {
            if !names.contains(&record.name.as_str()) {
                names.push(&record.name);
            }
        }
        names
    }

    /// First record with exactly this name
    pub fn find(&self, name: &str) -> Option<&HospitalRecord> {
        self.records.iter().find(|r| r.name == name)
    }

    /// Closest hospital name to a misspelled `name`
    pub fn suggest(&self, name: &str) -> Option<String> {
        suggest_correction(name, self.records.iter().map(|r| r.name.as_str()))
    }

    /// Like [`Dataset::find`], but a miss carries a spelling suggestion
    pub fn resolve(&self, name: &str) -> Result<&HospitalRecord> {
        self.find(name).ok_or_else(|| Error::HospitalNotFound {
            name: name.to_string(),
            suggestion: self.suggest(name),
        })
    }

    /// Check that `state` exists, suggesting a correction if it does not
    pub fn resolve_state<'a>(&'a self, state: &str) -> Result<&'a str> {
        let states = self.states();
        match states.iter().find(|s| **s == state) {
            Some(found) => Ok(*found),
            None => Err(Error::StateNotFound {
                name: state.to_string(),
                suggestion: suggest_correction(state, states.iter().copied()),
            }),
        }
    }
}

fn locate_columns(header: &[String]) -> Result<Columns> {
    let position = |wanted: &str| {
        header
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(wanted))
    };
    let required = |wanted: &str| {
        position(wanted).ok_or_else(|| {
            Error::DatasetFormat(format!("missing required column '{wanted}'"))
        })
    };

    let name = NAME_COLUMNS
        .iter()
        .find_map(|wanted| position(wanted))
        .ok_or_else(|| {
            Error::DatasetFormat(format!(
                "missing hospital name column (expected one of: {})",
                NAME_COLUMNS.join(", ")
            ))
        })?;

    Ok(Columns {
        name,
        state: required(STATE_COLUMN)?,
        latitude: required(LATITUDE_COLUMN)?,
        longitude: required(LONGITUDE_COLUMN)?,
    })
}

fn parse_coordinate(cell: &str) -> Option<f64> {
    cell.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Read every row of the first table in `path` as text cells
fn read_table(path: &Path) -> Result<Vec<Vec<String>>> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "csv" => read_csv(path),
        "xlsx" | "xlsm" | "xls" | "ods" => read_spreadsheet(path),
        other => Err(Error::InvalidInput(format!(
            "unsupported dataset format '.{other}' (expected .csv, .xlsx, .xls or .ods)"
        ))),
    }
}

fn read_csv(path: &Path) -> Result<Vec<Vec<String>>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(rows)
}

fn read_spreadsheet(path: &Path) -> Result<Vec<Vec<String>>> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| Error::DatasetFormat("workbook has no worksheets".to_string()))??;

    Ok(range
        .rows()
        .map(|row| row.iter().map(cell_text).collect())
        .collect())
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    fn sample() -> Dataset {
        Dataset::from_rows(vec![
            row(&[" Hospital Name ", "State ", " Latitude", "Longitude"]),
            row(&["Hospital Kuala Lumpur", "WP Kuala Lumpur", "3.1717", "101.7002"]),
            row(&["Hospital Selayang", "Selangor", "3.2424", "101.6468"]),
            row(&["Hospital Ampang", "Selangor", "3.1286", "101.7628"]),
            row(&["Hospital Sultanah Aminah", "Johor", "1.4585", "103.7459"]),
        ])
        .unwrap()
    }

    #[test]
    fn test_header_whitespace_is_trimmed() {
        let dataset = sample();
        assert_eq!(dataset.len(), 4);
        assert_eq!(dataset.records()[0].name, "Hospital Kuala Lumpur");
        assert_eq!(dataset.records()[0].state, "WP Kuala Lumpur");
    }

    #[test]
    fn test_rows_without_coordinates_are_dropped() {
        let dataset = Dataset::from_rows(vec![
            row(&["Hospital", "State", "Latitude", "Longitude"]),
            row(&["Klinik A", "Perak", "", "101.0"]),
            row(&["Klinik B", "Perak", "4.5", "  "]),
            row(&["Klinik C", "Perak", "n/a", "101.0"]),
            row(&["Klinik D", "Perak"]),
            row(&["Hospital Raja Permaisuri Bainun", "Perak", "4.6033", "101.0901"]),
        ])
        .unwrap();

        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.records()[0].name, "Hospital Raja Permaisuri Bainun");
        assert_eq!(dataset.hospitals_in("Perak"), vec!["Hospital Raja Permaisuri Bainun"]);
    }

    #[test]
    fn test_missing_column_is_fatal() {
        let result = Dataset::from_rows(vec![
            row(&["Hospital", "State", "Lat", "Longitude"]),
            row(&["X", "Y", "1.0", "2.0"]),
        ]);
        match result {
            Err(Error::DatasetFormat(msg)) => assert!(msg.contains("Latitude")),
            other => panic!("Expected DatasetFormat error, got {other:?}"),
        }

        assert!(matches!(Dataset::from_rows(vec![]), Err(Error::DatasetFormat(_))));
    }

    #[test]
    fn test_states_sorted_and_unique() {
        assert_eq!(sample().states(), vec!["Johor", "Selangor", "WP Kuala Lumpur"]);
    }

    #[test]
    fn test_hospitals_in_state_keep_file_order() {
        let dataset = sample();
        assert_eq!(
            dataset.hospitals_in("Selangor"),
            vec!["Hospital Selayang", "Hospital Ampang"]
        );
        assert!(dataset.hospitals_in("Sabah").is_empty());
    }

    #[test]
    fn test_duplicate_names_resolve_to_first() {
        let dataset = Dataset::from_rows(vec![
            row(&["Hospital", "State", "Latitude", "Longitude"]),
            row(&["Hospital Besar", "Kedah", "6.1", "100.3"]),
            row(&["Hospital Besar", "Kedah", "6.2", "100.4"]),
        ])
        .unwrap();

        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.hospitals_in("Kedah"), vec!["Hospital Besar"]);
        assert_eq!(dataset.find("Hospital Besar").unwrap().latitude, 6.1);
    }

    #[test]
    fn test_resolve_suggests_spelling() {
        let dataset = sample();
        match dataset.resolve("Hospital Selayng") {
            Err(Error::HospitalNotFound { suggestion, .. }) => {
                assert_eq!(suggestion.as_deref(), Some("Hospital Selayang"));
            }
            other => panic!("Expected HospitalNotFound, got {other:?}"),
        }

        match dataset.resolve_state("Selangr") {
            Err(Error::StateNotFound { suggestion, .. }) => {
                assert_eq!(suggestion.as_deref(), Some("Selangor"));
            }
            other => panic!("Expected StateNotFound, got {other:?}"),
        }
        assert_eq!(dataset.resolve_state("Johor").unwrap(), "Johor");
    }

    #[test]
    fn test_suggest_hospital_name() {
        let dataset = sample();
        assert_eq!(dataset.suggest("hospital ampng").as_deref(), Some("Hospital Ampang"));
        assert_eq!(dataset.suggest("Hospital Ampang"), None);
        assert_eq!(dataset.suggest("Klinik Gigi Kangar"), None);
    }

    #[test]
    fn test_coordinate_is_lon_lat() {
        let dataset = sample();
        let coord = dataset.find("Hospital Ampang").unwrap().coordinate();
        assert_eq!(coord.to_lon_lat(), [101.7628, 3.1286]);
    }

    #[test]
    fn test_load_csv_file() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "Hospital Name,State,Latitude,Longitude").unwrap();
        writeln!(file, "\"Hospital Pulau Pinang\",Pulau Pinang,5.4171,100.3116").unwrap();
        writeln!(file, "Hospital Balik Pulau,Pulau Pinang,,").unwrap();
        file.flush().unwrap();

        let dataset = Dataset::load(file.path()).unwrap();
        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.records()[0].state, "Pulau Pinang");
    }

    #[test]
    fn test_load_xlsx_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hospitals.xlsx");

        let mut workbook = rust_xlsxwriter::Workbook::new();
        let sheet = workbook.add_worksheet();
        for (col, header) in ["Hospital Name ", "State", "Latitude", "Longitude"]
            .iter()
            .enumerate()
        {
            sheet.write_string(0, col as u16, *header).unwrap();
        }
        sheet.write_string(1, 0, "Hospital Melaka").unwrap();
        sheet.write_string(1, 1, "Melaka").unwrap();
        sheet.write_number(1, 2, 2.2185).unwrap();
        sheet.write_number(1, 3, 102.2613).unwrap();
        sheet.write_string(2, 0, "Hospital Jasin").unwrap();
        sheet.write_string(2, 1, "Melaka").unwrap();
        workbook.save(&path).unwrap();

        let dataset = Dataset::load(&path).unwrap();
        assert_eq!(dataset.len(), 1);
        let record = &dataset.records()[0];
        assert_eq!(record.name, "Hospital Melaka");
        assert_eq!(record.latitude, 2.2185);
        assert_eq!(record.longitude, 102.2613);
    }

    #[test]
    fn test_load_missing_file() {
        let result = Dataset::load("/nonexistent/hospitals.csv");
        assert!(matches!(result, Err(Error::DatasetNotFound(_))));
    }

    #[test]
    fn test_load_unsupported_extension() {
        let file = NamedTempFile::new().unwrap();
        let result = Dataset::load(file.path());
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }
}
