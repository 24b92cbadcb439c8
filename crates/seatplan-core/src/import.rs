//! Import adapter contract: tabular rows → [`Roster`].
//!
//! The first row holds one class name per column. Every following row lists
//! register numbers under their class column. Columns are ragged: empty cells
//! are skipped, cells beyond the header are ignored.
//!
//! ```text
//! CSE-A,   CSE-B
//! 21CS001, 21CS061
//! 21CS002,
//! ```
//!
//! Reading the file (spreadsheet, CSV, ...) is the caller's job; this module
//! only sees rows of strings.

use thiserror::Error;

use crate::domain::roster::{ClassColor, Roster};
use crate::domain::student::Student;

/// Errors that can occur while interpreting a roster table.
#[derive(Debug, Error, PartialEq)]
pub enum ImportError {
    /// Data rows are present but the header row names no class.
    #[error("roster header row names no class, but {0} data row(s) follow")]
    MissingHeader(usize),
}

/// Builds a roster from rows of cells.
///
/// Class groups appear in header column order; colors are assigned by column
/// index. A blank header cell drops its whole column. A repeated class name
/// merges its column into the first column with that name.
///
/// An empty table yields an empty roster.
///
/// # Errors
///
/// Returns [`ImportError::MissingHeader`] if the header is blank but there are
/// data rows.
pub fn import_roster<R, C>(rows: R) -> Result<Roster, ImportError>
where
    R: IntoIterator,
    R::Item: IntoIterator<Item = C>,
    C: AsRef<str>,
{
    let mut rows = rows.into_iter();
    let Some(header) = rows.next() else {
        return Ok(Roster::new());
    };

    // For each header column: index into `groups`, or None for a dropped column.
    let mut column_slot: Vec<Option<usize>> = Vec::new();
    let mut groups: Vec<(String, ClassColor, Vec<Student>)> = Vec::new();

    for (col_idx, cell) in header.into_iter().enumerate() {
        let name = cell.as_ref().trim();
        if name.is_empty() {
            column_slot.push(None);
            continue;
        }
        match groups.iter().position(|(existing, _, _)| existing == name) {
            Some(slot) => column_slot.push(Some(slot)),
            None => {
                groups.push((name.to_string(), ClassColor::for_index(col_idx), Vec::new()));
                column_slot.push(Some(groups.len() - 1));
            }
        }
    }

    let mut data_rows = 0;
    for row in rows {
        data_rows += 1;
        for (col_idx, cell) in row.into_iter().enumerate() {
            let Some(Some(slot)) = column_slot.get(col_idx) else {
                continue;
            };
            let reg = cell.as_ref().trim();
            if reg.is_empty() {
                continue;
            }
            let (name, _, students) = &mut groups[*slot];
            students.push(Student::new(reg, name.as_str()));
        }
    }

    if groups.is_empty() && data_rows > 0 {
        return Err(ImportError::MissingHeader(data_rows));
    }

    let mut roster = Roster::new();
    for (name, color, students) in groups {
        roster.push_imported(name, color, students);
    }
    Ok(roster)
}
