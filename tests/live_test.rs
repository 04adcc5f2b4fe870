// tests/live_test.rs

use dotenvy::from_path;
use std::path::PathBuf;
use vtop_scraper_core::{
    Credentials, DelayConfig, EndpointConfig, RemoteCaptchaSolver, Result, ScrapeResult,
    StudentScraper,
};

/// End-to-end scrape against the real portal.
///
/// Needs a reachable captcha solver and real credentials:
/// VTOP_REGNO="..." VTOP_DOB="..." VTOP_PASSWORD="..." cargo test -- --ignored --nocapture
#[tokio::test]
#[ignore]
async fn test_full_login_and_scrape_flow() -> Result<()> {
    // Load .env from project root
    let env_path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(".env");
    from_path(&env_path).ok();

    let credentials = Credentials::from_env()?;
    let endpoints = EndpointConfig::from_env();
    let solver = RemoteCaptchaSolver::new(endpoints.captcha_solver_url.clone());

    let scraper = StudentScraper::with_config(endpoints, DelayConfig::default());

    println!("Scraping as {}...", credentials.masked_reg_no());
    match scraper.fetch_all(&credentials, &solver).await {
        ScrapeResult::Success(data) => {
            println!("{:#?}", data);
            assert!(
                !data.timetable.is_empty(),
                "An enrolled student should have a timetable"
            );
        }
        ScrapeResult::Failure(reason) => panic!("Scrape failed: {}", reason),
    }

    Ok(())
}
