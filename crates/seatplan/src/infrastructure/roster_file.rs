//! Roster file adapter: reads a CSV export of the class spreadsheet.
//!
//! Spreadsheet tools save the roster with one class per column and ragged
//! column lengths, so the reader is flexible about row width and does not
//! treat the first row specially. Turning the rows into a [`Roster`] is left
//! to [`seatplan_core::import_roster`].
//!
//! [`Roster`]: seatplan_core::Roster

use std::io::Read;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

/// Error type for reading a roster file.
#[derive(Debug, Error)]
pub enum RosterFileError {
    #[error("cannot open roster file {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("malformed roster CSV at record {record}: {source}")]
    Record {
        record: usize,
        #[source]
        source: csv::Error,
    },
}

/// Reads every row of the CSV file at `path` as trimmed string cells.
///
/// # Errors
///
/// Returns [`RosterFileError::Open`] if the file cannot be opened, or
/// [`RosterFileError::Record`] if a record is not valid CSV/UTF-8.
pub fn read_roster_rows(path: &Path) -> Result<Vec<Vec<String>>, RosterFileError> {
    let reader = builder()
        .from_path(path)
        .map_err(|source| RosterFileError::Open {
            path: path.to_path_buf(),
            source,
        })?;
    let rows = collect_rows(reader)?;
    debug!(path = %path.display(), rows = rows.len(), "roster file read");
    Ok(rows)
}

/// Parses roster rows from any reader (used for stdin and tests).
///
/// # Errors
///
/// Returns [`RosterFileError::Record`] if a record is malformed.
pub fn parse_roster_rows<R: Read>(input: R) -> Result<Vec<Vec<String>>, RosterFileError> {
    collect_rows(builder().from_reader(input))
}

fn builder() -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All);
    builder
}

fn collect_rows<R: Read>(mut reader: csv::Reader<R>) -> Result<Vec<Vec<String>>, RosterFileError> {
    reader
        .records()
        .enumerate()
        .map(|(record, result)| {
            result
                .map(|rec| rec.iter().map(str::to_string).collect())
                .map_err(|source| RosterFileError::Record { record, source })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use seatplan_core::import_roster;

    #[test]
    fn test_parse_ragged_columns_keeps_row_widths() {
        // Arrange
        let csv = "CSE-A,CSE-B\n21CS001,21CS061\n21CS002\n";

        // Act
        let rows = parse_roster_rows(csv.as_bytes()).unwrap();

        // Assert
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], vec!["CSE-A", "CSE-B"]);
        assert_eq!(rows[2], vec!["21CS002"]);
    }

    #[test]
    fn test_parse_trims_cells() {
        let rows = parse_roster_rows("  CSE-A , CSE-B \n 1 ,  2\n".as_bytes()).unwrap();
        assert_eq!(rows[0], vec!["CSE-A", "CSE-B"]);
        assert_eq!(rows[1], vec!["1", "2"]);
    }

    #[test]
    fn test_parsed_rows_feed_roster_import() {
        // Arrange
        let csv = "CSE-A,CSE-B\nA1,B1\nA2,\n,B2\n";

        // Act
        let rows = parse_roster_rows(csv.as_bytes()).unwrap();
        let roster = import_roster(rows).unwrap();

        // Assert
        let names: Vec<&str> = roster.classes().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["CSE-A", "CSE-B"]);
        assert_eq!(roster.get("CSE-A").unwrap().students().len(), 2);
        assert_eq!(roster.get("CSE-B").unwrap().students().len(), 2);
    }

    #[test]
    fn test_empty_input_has_no_rows() {
        let rows = parse_roster_rows("".as_bytes()).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_invalid_utf8_is_record_error() {
        let bytes: &[u8] = b"CSE-A\n\xff\xfe\n";
        let result = parse_roster_rows(bytes);
        assert!(matches!(result, Err(RosterFileError::Record { .. })));
    }

    #[test]
    fn test_missing_file_is_open_error() {
        let path = std::env::temp_dir().join("seatplan-no-such-roster.csv");
        let result = read_roster_rows(&path);
        assert!(matches!(result, Err(RosterFileError::Open { .. })));
    }

    #[test]
    fn test_read_roster_rows_from_disk() {
        let path = std::env::temp_dir().join(format!("seatplan-roster-{}.csv", std::process::id()));
        std::fs::write(&path, "IT,ECE\n1,9\n").unwrap();

        let rows = read_roster_rows(&path).unwrap();

        assert_eq!(rows, vec![vec!["IT", "ECE"], vec!["1", "9"]]);
        let _ = std::fs::remove_file(&path);
    }
}
