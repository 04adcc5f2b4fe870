//! HTML parsers for the portal pages.
//!
//! Table parsers read cells by fixed position. A missing cell degrades to an
//! empty string or zero, never to an error.

pub mod attendance;
pub mod login;
pub mod marks;
pub mod timetable;

use crate::error::{Result, ScraperError};
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

/// What to do when the element a parser anchors on is absent from the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnMissing {
    /// Yield the empty value and carry on.
    Empty,
    /// Stop with `ScraperError::ElementNotFound`.
    Abort,
}

/// A missing data table yields no rows.
pub const TABLE_ON_MISSING: OnMissing = OnMissing::Empty;

/// A missing captcha stops the login: there is nothing to solve.
pub const CAPTCHA_ON_MISSING: OnMissing = OnMissing::Abort;

impl OnMissing {
    pub fn resolve<T: Default>(self, what: &str) -> Result<T> {
        match self {
            OnMissing::Empty => Ok(T::default()),
            OnMissing::Abort => Err(ScraperError::ElementNotFound(what.to_string())),
        }
    }
}

/// The `<td>` texts of one table row, addressed by position.
#[derive(Debug, Clone, Default)]
pub struct Cells(Vec<String>);

impl Cells {
    fn from_row(row: ElementRef<'_>, td: &Selector) -> Self {
        Cells(row.select(td).map(cell_text).collect())
    }

    /// Text of the cell at `idx`, or empty when the row is short.
    pub fn text(&self, idx: usize) -> String {
        self.0.get(idx).cloned().unwrap_or_default()
    }

    /// Integer value of the cell at `idx`; anything unparseable is zero.
    pub fn int(&self, idx: usize) -> u32 {
        self.0
            .get(idx)
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(0)
    }

    /// Like [`Cells::int`] after dropping one trailing `%`.
    pub fn percentage(&self, idx: usize) -> u32 {
        self.0
            .get(idx)
            .map(|s| s.strip_suffix('%').unwrap_or(s).trim())
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(0)
    }
}

/// Element text with runs of whitespace collapsed to single spaces.
pub(crate) fn cell_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// First element matching `selector`, subject to the missing-element policy.
pub(crate) fn locate<'a>(
    document: &'a Html,
    selector: &Selector,
    what: &str,
    on_missing: OnMissing,
) -> Result<Option<ElementRef<'a>>> {
    match document.select(selector).next() {
        Some(element) => Ok(Some(element)),
        None => on_missing.resolve(what),
    }
}

/// Parses every data row of `table#<table_id>`, skipping the header row.
pub fn parse_table<T>(
    html: &str,
    table_id: &str,
    on_missing: OnMissing,
    build: impl Fn(&Cells) -> T,
) -> Result<Vec<T>> {
    let document = Html::parse_document(html);
    let table_selector = match Selector::parse(&format!("table#{}", table_id)) {
        Ok(selector) => selector,
        Err(_) => return on_missing.resolve(table_id),
    };
    let tr = Selector::parse("tr").unwrap();
    let td = Selector::parse("td").unwrap();

    let Some(table) = locate(&document, &table_selector, table_id, on_missing)? else {
        debug!(table = table_id, "table not present on page");
        return Ok(Vec::new());
    };

    let records: Vec<T> = table
        .select(&tr)
        .skip(1)
        .map(|row| build(&Cells::from_row(row, &td)))
        .collect();

    debug!(table = table_id, rows = records.len(), "parsed table");
    Ok(records)
}
