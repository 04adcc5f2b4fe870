use crate::error::{Result, ScraperError};
use crate::models::{Credentials, DelayConfig, EndpointConfig, ScrapeResult, StudentData};
use crate::parsers::attendance::{ATTENDANCE_TABLE_ID, attendance_from_cells};
use crate::parsers::login::{extract_captcha, find_csrf, login_error_hint};
use crate::parsers::marks::{MARKS_TABLE_ID, mark_from_cells};
use crate::parsers::timetable::{TIMETABLE_TABLE_ID, timetable_from_cells};
use crate::parsers::{TABLE_ON_MISSING, parse_table};
use crate::solver::CaptchaSolver;
use crate::transport::{HttpTransport, Page, Transport};
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

const REGNO_FIELD: &str = "regno";
const DOB_FIELD: &str = "dob";
const PASSWORD_FIELD: &str = "passwd";
const CAPTCHA_FIELD: &str = "captcha";
const CSRF_FIELD: &str = "_csrf";

/// Logs into the student portal and scrapes attendance, marks and timetable.
///
/// Each call to [`StudentScraper::fetch_all`] opens its own session, so one
/// scraper can serve concurrent scrapes for different students.
pub struct StudentScraper<T: Transport = HttpTransport> {
    transport: T,
    endpoints: EndpointConfig,
    delay: DelayConfig,
}

impl StudentScraper<HttpTransport> {
    pub fn new() -> Self {
        Self::with_config(EndpointConfig::default(), DelayConfig::default())
    }

    pub fn with_config(endpoints: EndpointConfig, delay: DelayConfig) -> Self {
        Self::with_transport(HttpTransport::new(), endpoints, delay)
    }
}

impl Default for StudentScraper<HttpTransport> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Transport> StudentScraper<T> {
    pub fn with_transport(transport: T, endpoints: EndpointConfig, delay: DelayConfig) -> Self {
        Self {
            transport,
            endpoints,
            delay,
        }
    }

    /// Runs the whole login-and-scrape sequence.
    ///
    /// Always returns a value: either every record set, or one failure reason.
    /// A panic in the solver, the transport or a parser is reported as a failure.
    pub async fn fetch_all(
        &self,
        credentials: &Credentials,
        solver: &dyn CaptchaSolver,
    ) -> ScrapeResult {
        info!(reg_no = %credentials.masked_reg_no(), "starting scrape");

        let outcome = AssertUnwindSafe(self.scrape(credentials, solver))
            .catch_unwind()
            .await
            .unwrap_or_else(|payload| Err(ScraperError::Aborted(panic_message(payload))));
        match &outcome {
            Ok(data) => info!(
                attendance = data.attendance.len(),
                marks = data.marks.len(),
                timetable = data.timetable.len(),
                "scrape finished"
            ),
            Err(err) => warn!(error = %err, "scrape failed"),
        }
        outcome.into()
    }

    async fn scrape(
        &self,
        credentials: &Credentials,
        solver: &dyn CaptchaSolver,
    ) -> Result<StudentData> {
        // Dropped on every return path below.
        let session = self.transport.open()?;

        let login_url = self.endpoints.login_url();
        debug!(url = %login_url, "fetching login page");
        let login_page = self.transport.get(&session, &login_url).await?;
        let login_page = expect_success(&login_url, login_page)?;

        let captcha = extract_captcha(&login_page.body)?;
        let csrf = find_csrf(&login_page.body);

        let answer = solver.solve(&captcha).await?;
        debug!("captcha solved");

        self.login(&session, credentials, &answer, csrf.as_deref())
            .await?;

        let attendance_html = self
            .fetch_resource(&session, &self.endpoints.attendance_url())
            .await?;
        let marks_html = self
            .fetch_resource(&session, &self.endpoints.marks_url())
            .await?;
        let timetable_html = self
            .fetch_resource(&session, &self.endpoints.timetable_url())
            .await?;
        drop(session);

        Ok(StudentData {
            attendance: parse_table(
                &attendance_html,
                ATTENDANCE_TABLE_ID,
                TABLE_ON_MISSING,
                attendance_from_cells,
            )?,
            marks: parse_table(&marks_html, MARKS_TABLE_ID, TABLE_ON_MISSING, mark_from_cells)?,
            timetable: parse_table(
                &timetable_html,
                TIMETABLE_TABLE_ID,
                TABLE_ON_MISSING,
                timetable_from_cells,
            )?,
        })
    }

    async fn login(
        &self,
        session: &T::Session,
        credentials: &Credentials,
        captcha_answer: &str,
        csrf: Option<&str>,
    ) -> Result<()> {
        let mut form = vec![
            (REGNO_FIELD, credentials.reg_no.as_str()),
            (DOB_FIELD, credentials.dob.as_str()),
            (PASSWORD_FIELD, credentials.password.as_str()),
            (CAPTCHA_FIELD, captcha_answer),
        ];
        if let Some(token) = csrf {
            form.push((CSRF_FIELD, token));
        }

        let response = self
            .transport
            .post_form(session, &self.endpoints.login_url(), &form)
            .await?;

        // Bad credentials, a wrong captcha and server errors all end up here.
        if !response.is_success() {
            let hint = login_error_hint(&response.body);
            warn!(
                status = response.status,
                hint = hint.as_deref().unwrap_or("-"),
                "login rejected"
            );
            return Err(ScraperError::LoginFailed);
        }

        info!(reg_no = %credentials.masked_reg_no(), "logged in");
        Ok(())
    }

    async fn fetch_resource(&self, session: &T::Session, url: &str) -> Result<String> {
        if let Some(pause) = self.delay.next_delay() {
            debug!(delay_ms = pause.as_millis() as u64, "pacing before request");
            tokio::time::sleep(pause).await;
        }

        debug!(url = %url, "fetching resource page");
        let page = self.transport.get(session, url).await?;
        Ok(expect_success(url, page)?.body)
    }
}

/// An error status from the portal is an outage, not a page to parse.
fn expect_success(url: &str, page: Page) -> Result<Page> {
    if page.is_success() {
        Ok(page)
    } else {
        Err(ScraperError::TransportError(format!(
            "{} answered with status {}",
            url, page.status
        )))
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "panicked".to_string()
    }
}

/// Aborts the spawned scrape when the caller stops waiting for it.
struct AbortOnDrop(JoinHandle<ScrapeResult>);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Runs [`StudentScraper::fetch_all`] on its own tokio task.
///
/// Dropping the returned future aborts the task, which releases its session.
/// A task that dies anyway is reported as a failure like any other.
pub async fn scrape_in_background<T>(
    scraper: Arc<StudentScraper<T>>,
    credentials: Credentials,
    solver: Arc<dyn CaptchaSolver>,
) -> ScrapeResult
where
    T: Transport + 'static,
{
    let mut task = AbortOnDrop(tokio::spawn(async move {
        scraper.fetch_all(&credentials, solver.as_ref()).await
    }));

    match (&mut task.0).await {
        Ok(result) => result,
        Err(join_error) => {
            error!(error = %join_error, "scrape task did not complete");
            ScrapeResult::Failure(ScraperError::Aborted(join_error.to_string()).to_string())
        }
    }
}
