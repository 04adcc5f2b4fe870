//! Scrapes one student's records and prints them as JSON.
//!
//! Reads `VTOP_REGNO`, `VTOP_DOB`, `VTOP_PASSWORD` and the optional `VTOP_*`
//! endpoint overrides from the environment or a `.env` file.

use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use vtop_scraper_core::{
    Credentials, DelayConfig, EndpointConfig, RemoteCaptchaSolver, ScrapeResult, StudentScraper,
};

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("vtop_scraper_core=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let credentials = match Credentials::from_env() {
        Ok(credentials) => credentials,
        Err(err) => {
            eprintln!("{}", err);
            return ExitCode::from(2);
        }
    };

    let endpoints = EndpointConfig::from_env();
    let solver = RemoteCaptchaSolver::new(endpoints.captcha_solver_url.clone());
    let scraper = StudentScraper::with_config(endpoints, DelayConfig::default());

    let result = scraper.fetch_all(&credentials, &solver).await;

    match serde_json::to_string_pretty(&result) {
        Ok(json) => println!("{}", json),
        Err(err) => {
            eprintln!("Could not encode result: {}", err);
            return ExitCode::FAILURE;
        }
    }

    match result {
        ScrapeResult::Success(_) => ExitCode::SUCCESS,
        ScrapeResult::Failure(_) => ExitCode::FAILURE,
    }
}
