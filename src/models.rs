use crate::error::{Result, ScraperError};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::time::Duration;

/// Login credentials for one scrape. Never stored by the crate.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct Credentials {
    /// The student registration number (e.g. "24BCE7016").
    pub reg_no: String,
    /// Date of birth exactly as the portal expects it.
    pub dob: String,
    pub password: String,
}

impl Credentials {
    pub fn new(
        reg_no: impl Into<String>,
        dob: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            reg_no: reg_no.into(),
            dob: dob.into(),
            password: password.into(),
        }
    }

    /// Reads `VTOP_REGNO`, `VTOP_DOB` and `VTOP_PASSWORD` from the environment.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            reg_no: required_var("VTOP_REGNO")?,
            dob: required_var("VTOP_DOB")?,
            password: required_var("VTOP_PASSWORD")?,
        })
    }

    /// Registration number with everything past the first five characters hidden.
    pub fn masked_reg_no(&self) -> String {
        let prefix: String = self.reg_no.chars().take(5).collect();
        format!("{}****", prefix)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("reg_no", &self.masked_reg_no())
            .field("dob", &"<redacted>")
            .field("password", &"<redacted>")
            .finish()
    }
}

fn required_var(name: &str) -> Result<String> {
    env::var(name).map_err(|_| ScraperError::ConfigError(format!("{} is not set", name)))
}

/// Where the portal lives. Every field can be overridden.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointConfig {
    pub base_url: String,
    pub login: String,
    pub attendance: String,
    pub marks: String,
    pub timetable: String,
    /// Absolute URL of the remote captcha solving service.
    pub captcha_solver_url: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            base_url: "https://vtop.vitap.ac.in".to_string(),
            login: "/vtop/login".to_string(),
            attendance: "/vtop/attendance".to_string(),
            marks: "/vtop/marks".to_string(),
            timetable: "/vtop/timetable".to_string(),
            captcha_solver_url: "https://api.example.com/solve".to_string(),
        }
    }
}

impl EndpointConfig {
    /// Starts from the defaults and applies any `VTOP_*` overrides found in the environment.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        let overrides: [(&str, &mut String); 6] = [
            ("VTOP_BASE_URL", &mut config.base_url),
            ("VTOP_LOGIN_PATH", &mut config.login),
            ("VTOP_ATTENDANCE_PATH", &mut config.attendance),
            ("VTOP_MARKS_PATH", &mut config.marks),
            ("VTOP_TIMETABLE_PATH", &mut config.timetable),
            ("VTOP_CAPTCHA_SOLVER_URL", &mut config.captcha_solver_url),
        ];
        for (name, field) in overrides {
            if let Ok(value) = env::var(name) {
                *field = value;
            }
        }
        config
    }

    /// Joins the base URL and a relative path, tolerating a doubled or missing slash.
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    pub fn login_url(&self) -> String {
        self.url(&self.login)
    }

    pub fn attendance_url(&self) -> String {
        self.url(&self.attendance)
    }

    pub fn marks_url(&self) -> String {
        self.url(&self.marks)
    }

    pub fn timetable_url(&self) -> String {
        self.url(&self.timetable)
    }
}

/// Configuration for simulating human browsing behavior via randomized delays.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DelayConfig {
    /// Minimum sleep duration in milliseconds between requests.
    pub min_delay_ms: u64,
    /// Maximum sleep duration in milliseconds between requests.
    pub max_delay_ms: u64,
    /// Whether the randomized delay logic is active.
    pub enabled: bool,
}

impl Default for DelayConfig {
    /// Default configuration: 1000ms - 3000ms, enabled.
    fn default() -> Self {
        Self {
            min_delay_ms: 1000,
            max_delay_ms: 3000,
            enabled: true,
        }
    }
}

impl DelayConfig {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Default::default()
        }
    }

    /// Picks the next pause, or `None` when pacing is off.
    pub fn next_delay(&self) -> Option<Duration> {
        if !self.enabled {
            return None;
        }
        let (low, high) = if self.min_delay_ms <= self.max_delay_ms {
            (self.min_delay_ms, self.max_delay_ms)
        } else {
            (self.max_delay_ms, self.min_delay_ms)
        };
        let ms = rand::rng().random_range(low..=high);
        Some(Duration::from_millis(ms))
    }
}

/// One row of the attendance table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub course_code: String,
    pub course_name: String,
    pub attended: u32,
    pub total: u32,
    /// The percentage as displayed by the portal. Not recomputed from
    /// `attended` / `total`, the two are allowed to disagree.
    pub percentage: u32,
}

/// One row of the marks table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkRecord {
    pub course_code: String,
    /// Raw cell text: numbers, letter grades and "absent" markers all appear here.
    pub score: String,
}

/// One row of the timetable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimetableEntry {
    pub day: String,
    pub slot: String,
    pub course_code: String,
}

/// Everything a successful scrape produces, in page order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentData {
    pub attendance: Vec<AttendanceRecord>,
    pub marks: Vec<MarkRecord>,
    pub timetable: Vec<TimetableEntry>,
}

/// The only value the pipeline hands back. There is no partial success.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "data", rename_all = "lowercase")]
pub enum ScrapeResult {
    Success(StudentData),
    Failure(String),
}

impl ScrapeResult {
    pub fn is_success(&self) -> bool {
        matches!(self, ScrapeResult::Success(_))
    }

    pub fn data(&self) -> Option<&StudentData> {
        match self {
            ScrapeResult::Success(data) => Some(data),
            ScrapeResult::Failure(_) => None,
        }
    }

    pub fn failure_reason(&self) -> Option<&str> {
        match self {
            ScrapeResult::Success(_) => None,
            ScrapeResult::Failure(reason) => Some(reason),
        }
    }
}

impl From<Result<StudentData>> for ScrapeResult {
    fn from(outcome: Result<StudentData>) -> Self {
        match outcome {
            Ok(data) => ScrapeResult::Success(data),
            Err(err) => ScrapeResult::Failure(err.to_string()),
        }
    }
}
