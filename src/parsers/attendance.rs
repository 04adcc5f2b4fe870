use super::{Cells, OnMissing, parse_table};
use crate::models::AttendanceRecord;

pub const ATTENDANCE_TABLE_ID: &str = "AttendanceTable";

/// Column order: code, name, attended, total, percentage.
pub(crate) fn attendance_from_cells(cells: &Cells) -> AttendanceRecord {
    AttendanceRecord {
        course_code: cells.text(0),
        course_name: cells.text(1),
        attended: cells.int(2),
        total: cells.int(3),
        percentage: cells.percentage(4),
    }
}

/// Parses the attendance page. A page without the table gives an empty list.
pub fn parse_attendance_from_html(html: &str) -> Vec<AttendanceRecord> {
    parse_table(html, ATTENDANCE_TABLE_ID, OnMissing::Empty, attendance_from_cells)
        .unwrap_or_default()
}
