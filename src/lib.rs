// Declare all our modules
mod client;
mod error;
mod models;
pub mod parsers;
mod solver;
mod transport;

// Publicly export the parts of our library that users will need
pub use client::{StudentScraper, scrape_in_background};
pub use error::{Result, ScraperError};
pub use models::*; // Exposes all records, configs and ScrapeResult
pub use parsers::attendance::parse_attendance_from_html;
pub use parsers::marks::parse_marks_from_html;
pub use parsers::timetable::parse_timetable_from_html;
pub use parsers::{CAPTCHA_ON_MISSING, OnMissing, TABLE_ON_MISSING};
pub use solver::{CaptchaSolver, RemoteCaptchaSolver};
pub use transport::{HttpSession, HttpTransport, Page, Transport};
