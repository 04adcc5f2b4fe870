use super::{Cells, OnMissing, parse_table};
use crate::models::MarkRecord;

pub const MARKS_TABLE_ID: &str = "MarksTable";

pub(crate) fn mark_from_cells(cells: &Cells) -> MarkRecord {
    MarkRecord {
        course_code: cells.text(0),
        score: cells.text(1),
    }
}

/// Parses the marks page. Scores stay as text.
pub fn parse_marks_from_html(html: &str) -> Vec<MarkRecord> {
    parse_table(html, MARKS_TABLE_ID, OnMissing::Empty, mark_from_cells).unwrap_or_default()
}
