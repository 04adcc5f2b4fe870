use crate::error::Result;
use async_trait::async_trait;
use reqwest::cookie::Jar;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use std::sync::Arc;

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/100.0.0.0 Safari/537.36";

/// Status and body of one HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub status: u16,
    pub body: String,
}

impl Page {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Network access for the scrape pipeline.
///
/// `open` hands out a fresh session owning the cookie state for one scrape.
/// Every request takes that session explicitly, and dropping it releases it.
#[async_trait]
pub trait Transport: Send + Sync {
    type Session: Send + Sync;

    fn open(&self) -> Result<Self::Session>;

    async fn get(&self, session: &Self::Session, url: &str) -> Result<Page>;

    async fn post_form(
        &self,
        session: &Self::Session,
        url: &str,
        form: &[(&str, &str)],
    ) -> Result<Page>;
}

/// A reqwest client bound to its own cookie jar.
pub struct HttpSession {
    client: reqwest::Client,
}

/// The production transport.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport;

impl HttpTransport {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Transport for HttpTransport {
    type Session = HttpSession;

    fn open(&self) -> Result<HttpSession> {
        let cookies = Arc::new(Jar::default());

        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));

        let client = reqwest::Client::builder()
            .cookie_provider(cookies)
            .default_headers(headers)
            .build()?;

        Ok(HttpSession { client })
    }

    async fn get(&self, session: &HttpSession, url: &str) -> Result<Page> {
        let response = session.client.get(url).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(Page { status, body })
    }

    async fn post_form(
        &self,
        session: &HttpSession,
        url: &str,
        form: &[(&str, &str)],
    ) -> Result<Page> {
        let response = session.client.post(url).form(form).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(Page { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_2xx_counts_as_success() {
        let page = |status| Page {
            status,
            body: String::new(),
        };
        assert!(page(200).is_success());
        assert!(page(204).is_success());
        assert!(!page(302).is_success());
        assert!(!page(401).is_success());
        assert!(!page(500).is_success());
    }

    #[test]
    fn sessions_open_without_a_runtime() {
        let transport = HttpTransport::new();
        assert!(transport.open().is_ok());
        assert!(transport.open().is_ok());
    }
}
