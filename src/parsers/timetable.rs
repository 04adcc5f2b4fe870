use super::{Cells, OnMissing, parse_table};
use crate::models::TimetableEntry;

pub const TIMETABLE_TABLE_ID: &str = "TimetableTable";

pub(crate) fn timetable_from_cells(cells: &Cells) -> TimetableEntry {
    TimetableEntry {
        day: cells.text(0),
        slot: cells.text(1),
        course_code: cells.text(2),
    }
}

pub fn parse_timetable_from_html(html: &str) -> Vec<TimetableEntry> {
    parse_table(html, TIMETABLE_TABLE_ID, OnMissing::Empty, timetable_from_cells)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_keep_page_order() {
        let html = r#"<table id="TimetableTable">
            <tr><th>Day</th><th>Slot</th><th>Course</th></tr>
            <tr><td>Tue</td><td>B1</td><td>PHY102</td></tr>
            <tr><td>Mon</td><td>A1</td><td>CSE101</td></tr>
            <tr><td>Mon</td><td>A1</td><td>CSE101</td></tr>
        </table>"#;
        let entries = parse_timetable_from_html(html);
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].day, "Tue");
        assert_eq!(entries[1], entries[2]);
    }

    #[test]
    fn other_tables_are_ignored() {
        let html = r#"<table id="AttendanceTable">
            <tr><th>h</th></tr><tr><td>Mon</td><td>A1</td><td>CSE101</td></tr>
        </table>"#;
        assert!(parse_timetable_from_html(html).is_empty());
    }
}
