use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScraperError {
    #[error("request error: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("request error: {0}")]
    TransportError(String),

    #[error("{0} not found")]
    ElementNotFound(String),

    #[error("Login failed")]
    LoginFailed,

    /// Carries the solver's own message so callers see it unchanged.
    #[error("{0}")]
    SolverError(String),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("Scrape task aborted: {0}")]
    Aborted(String),
}

pub type Result<T> = std::result::Result<T, ScraperError>;
