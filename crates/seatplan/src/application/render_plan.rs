//! RenderPlan: turns hall sheets into the printable seating document.
//!
//! One page per hall. Each page carries the institution header, the room name
//! and exam date, the physical desk columns side by side, the total strength,
//! and a signature table for the invigilators. Pages are separated by a form
//! feed so a printer starts every hall on a new sheet.
//!
//! The same data is also available as JSON for other tools.

use seatplan_core::{ColumnTable, HallSheet};
use serde::Serialize;
use thiserror::Error;

/// Separator between hall pages.
pub const PAGE_BREAK: &str = "\u{000C}";

const SIGNATURE_CELLS: usize = 6;
const SIGNATURE_CELL_WIDTH: usize = 10;
const COLUMN_GAP: &str = "    ";

/// Error type for document rendering.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("nothing to export: no halls have been created")]
    NothingToExport,
    #[error("failed to encode plan as JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Institution and exam details printed at the top of every page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExamMetadata {
    pub college_name: String,
    pub department_name: String,
    pub exam_title: String,
    /// Exam date as entered (`YYYY-MM-DD`). `None` prints a blank line to
    /// fill in by hand; the `seatplan` binary always passes a date, falling
    /// back to today.
    pub exam_date: Option<String>,
}

impl ExamMetadata {
    /// The exam date as printed on the page (`DD-MM-YYYY`).
    pub fn printed_date(&self) -> Option<String> {
        self.exam_date.as_deref().map(format_exam_date)
    }
}

/// Reorders `YYYY-MM-DD` to `DD-MM-YYYY`. Anything else is returned unchanged.
pub fn format_exam_date(date: &str) -> String {
    let parts: Vec<&str> = date.trim().split('-').collect();
    match parts.as_slice() {
        [y, m, d]
            if y.len() == 4
                && m.len() == 2
                && d.len() == 2
                && parts.iter().all(|p| p.chars().all(|c| c.is_ascii_digit())) =>
        {
            format!("{d}-{m}-{y}")
        }
        _ => date.to_string(),
    }
}

/// Renders every hall as a plain-text page.
///
/// # Errors
///
/// Returns [`RenderError::NothingToExport`] if `sheets` is empty.
pub fn render_text(sheets: &[HallSheet], meta: &ExamMetadata) -> Result<String, RenderError> {
    if sheets.is_empty() {
        return Err(RenderError::NothingToExport);
    }
    let pages: Vec<String> = sheets.iter().map(|sheet| render_page(sheet, meta)).collect();
    Ok(pages.join(&format!("\n{PAGE_BREAK}\n")))
}

#[derive(Serialize)]
struct PlanDocument<'a> {
    metadata: &'a ExamMetadata,
    printed_date: Option<String>,
    halls: &'a [HallSheet],
}

/// Renders every hall as one pretty-printed JSON document.
///
/// # Errors
///
/// Returns [`RenderError::NothingToExport`] if `sheets` is empty, or
/// [`RenderError::Json`] if encoding fails.
pub fn render_json(sheets: &[HallSheet], meta: &ExamMetadata) -> Result<String, RenderError> {
    if sheets.is_empty() {
        return Err(RenderError::NothingToExport);
    }
    let doc = PlanDocument {
        metadata: meta,
        printed_date: meta.printed_date(),
        halls: sheets,
    };
    Ok(serde_json::to_string_pretty(&doc)?)
}

fn render_page(sheet: &HallSheet, meta: &ExamMetadata) -> String {
    let mut out = Vec::new();
    out.push(meta.college_name.clone());
    out.push(meta.department_name.clone());
    out.push(meta.exam_title.clone());
    let date = meta.printed_date().unwrap_or_else(|| "__________".to_string());
    out.push(format!("Room: {}\tDate: {}", sheet.hall_name.to_uppercase(), date));
    out.push(String::new());

    let blocks: Vec<Vec<String>> = sheet.columns.iter().map(column_block).collect();
    out.extend(side_by_side(&blocks));
    out.push(String::new());

    out.push(format!("Total Strength: {}", sheet.summary.total_seated));
    out.push(String::new());

    let mut labels = vec!["Faculty Name".to_string(), "Date".to_string()];
    labels.extend(sheet.summary.classes.iter().cloned());
    labels.push("Faculty Sign".to_string());
    let label_width = labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let blank = " ".repeat(SIGNATURE_CELL_WIDTH);
    for label in &labels {
        let cells = vec![blank.as_str(); SIGNATURE_CELLS].join(" | ");
        out.push(format!("| {} | {} |", pad(label, label_width), cells));
    }
    out.push(String::new());

    let width = out.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    out.push(format!("{:>width$}", "HoD"));
    out.join("\n")
}

/// Formats one physical column as a pipe table: header, rule, one line per row.
fn column_block(table: &ColumnTable) -> Vec<String> {
    let widths: Vec<usize> = (0..table.headers.len())
        .map(|s| {
            table
                .rows
                .iter()
                .map(|row| row[s].chars().count())
                .chain(std::iter::once(table.headers[s].chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let line = |cells: &[String]| {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(c, w)| pad(c, *w))
            .collect();
        format!("| {} |", padded.join(" | "))
    };

    let mut lines = Vec::with_capacity(table.rows.len() + 2);
    lines.push(line(table.headers.as_slice()));
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    lines.push(format!("|-{}-|", rule.join("-|-")));
    lines.extend(table.rows.iter().map(|row| line(row.as_slice())));
    lines
}

/// Joins equally tall blocks line by line.
fn side_by_side(blocks: &[Vec<String>]) -> Vec<String> {
    let height = blocks.iter().map(Vec::len).max().unwrap_or(0);
    (0..height)
        .map(|i| {
            blocks
                .iter()
                .map(|b| b.get(i).map(String::as_str).unwrap_or(""))
                .collect::<Vec<_>>()
                .join(COLUMN_GAP)
                .trim_end()
                .to_string()
        })
        .collect()
}

fn pad(text: &str, width: usize) -> String {
    format!("{text:<width$}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use seatplan_core::{hall_sheet, place_class, Hall, HallConfig, Student};

    fn meta(date: Option<&str>) -> ExamMetadata {
        ExamMetadata {
            college_name: "A.V.C. COLLEGE OF ENGINEERING".to_string(),
            department_name: "DEPARTMENT OF COMPUTER SCIENCE AND ENGINEERING".to_string(),
            exam_title: "UNIT TEST SEATING ARRANGEMENT".to_string(),
            exam_date: date.map(str::to_string),
        }
    }

    fn sample_sheet() -> HallSheet {
        let hall = Hall::new(&HallConfig::new("Lab 1", 2, 2, 2)).unwrap();
        let a: Vec<_> = ["A1", "A2", "A3"].iter().map(|r| Student::new(*r, "CSE-A")).collect();
        let b: Vec<_> = ["B1"].iter().map(|r| Student::new(*r, "CSE-B")).collect();
        let hall = place_class(&hall, &a).unwrap().hall;
        let hall = place_class(&hall, &b).unwrap().hall;
        hall_sheet(&hall)
    }

    #[test]
    fn test_format_exam_date_reverses_iso_date() {
        assert_eq!(format_exam_date("2026-10-18"), "18-10-2026");
    }

    #[test]
    fn test_format_exam_date_leaves_other_shapes_alone() {
        assert_eq!(format_exam_date("18/10/2026"), "18/10/2026");
        assert_eq!(format_exam_date("2026-1-8"), "2026-1-8");
        assert_eq!(format_exam_date(""), "");
    }

    #[test]
    fn test_render_text_without_halls_is_an_error() {
        assert!(matches!(
            render_text(&[], &meta(None)),
            Err(RenderError::NothingToExport)
        ));
        assert!(matches!(
            render_json(&[], &meta(None)),
            Err(RenderError::NothingToExport)
        ));
    }

    #[test]
    fn test_render_text_contains_header_tables_and_signatures() {
        // Arrange
        let sheet = sample_sheet();

        // Act
        let text = render_text(&[sheet], &meta(Some("2026-10-18"))).unwrap();

        // Assert
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "A.V.C. COLLEGE OF ENGINEERING");
        assert_eq!(lines[2], "UNIT TEST SEATING ARRANGEMENT");
        assert_eq!(lines[3], "Room: LAB 1\tDate: 18-10-2026");
        assert_eq!(lines[5], "| CSE-A | CSE-B |    | CSE-A | Empty |");
        assert_eq!(lines[7], "| A1    | B1    |    | A3    | -     |");
        assert!(text.contains("Total Strength: 4"));
        assert!(text.contains("| Faculty Name |"));
        assert!(text.contains("| CSE-B        |"));
        assert!(text.contains("| Faculty Sign |"));
        assert!(lines.last().unwrap().trim_start() == "HoD");
    }

    #[test]
    fn test_render_text_separates_halls_with_page_break() {
        let text = render_text(&[sample_sheet(), sample_sheet()], &meta(None)).unwrap();
        assert_eq!(text.matches(PAGE_BREAK).count(), 1);
        assert!(text.contains("Date: __________"));
    }

    #[test]
    fn test_render_json_includes_printed_date_and_halls() {
        let json = render_json(&[sample_sheet()], &meta(Some("2026-10-18"))).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["printed_date"], "18-10-2026");
        assert_eq!(value["halls"][0]["hall_name"], "Lab 1");
        assert_eq!(value["halls"][0]["summary"]["total_seated"], 4);
        assert_eq!(value["metadata"]["exam_title"], "UNIT TEST SEATING ARRANGEMENT");
    }
}
