//! Export adapter contract: hall occupancy → printable tables.
//!
//! A [`HallSheet`] is derived only from the public hall shape (ordered desks,
//! ordered seats per desk). It groups seats by physical column, the way the
//! invigilator's sheet is printed: one table per desk column, with one
//! sub-column per seat and one line per row of desks.

use serde::Serialize;

use crate::domain::hall::{Hall, HallId};

/// Cell text for an empty seat.
pub const EMPTY_CELL: &str = "-";
/// Header text for a seat line with nobody in it.
pub const EMPTY_HEADER: &str = "Empty";

/// One physical desk column of a hall.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnTable {
    /// 1-based physical column.
    pub column: u32,
    /// One header per seat index: the classes seated in that seat line,
    /// joined with `" / "`, or [`EMPTY_HEADER`].
    pub headers: Vec<String>,
    /// `rows[r][s]` is the register number at row `r + 1`, seat `s`, or
    /// [`EMPTY_CELL`].
    pub rows: Vec<Vec<String>>,
}

/// Per-hall totals printed under the seating tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HallSummary {
    /// Distinct classes seated in the hall, sorted.
    pub classes: Vec<String>,
    pub total_seated: usize,
}

/// Everything an exporter needs to print one hall.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HallSheet {
    pub hall_id: HallId,
    pub hall_name: String,
    pub rows: u32,
    pub cols: u32,
    pub desk_capacity: u32,
    pub columns: Vec<ColumnTable>,
    pub summary: HallSummary,
}

/// Builds the printable view of `hall`.
pub fn hall_sheet(hall: &Hall) -> HallSheet {
    let capacity = hall.desk_capacity as usize;
    let columns = (1..=hall.cols)
        .map(|col| {
            let mut headers = Vec::with_capacity(capacity);
            let mut rows = vec![vec![EMPTY_CELL.to_string(); capacity]; hall.rows as usize];

            for seat in 0..capacity {
                let mut classes: Vec<&str> = Vec::new();
                for row in 1..=hall.rows {
                    let Some(student) = hall.desk_at(row, col).and_then(|d| d.seat(seat)) else {
                        continue;
                    };
                    if !classes.contains(&student.class_name.as_str()) {
                        classes.push(&student.class_name);
                    }
                    rows[(row - 1) as usize][seat] = student.register_number.clone();
                }
                headers.push(if classes.is_empty() {
                    EMPTY_HEADER.to_string()
                } else {
                    classes.join(" / ")
                });
            }

            ColumnTable {
                column: col,
                headers,
                rows,
            }
        })
        .collect();

    HallSheet {
        hall_id: hall.id,
        hall_name: hall.name.clone(),
        rows: hall.rows,
        cols: hall.cols,
        desk_capacity: hall.desk_capacity,
        columns,
        summary: HallSummary {
            classes: hall.distinct_classes().into_iter().collect(),
            total_seated: hall.seated_count(),
        },
    }
}
