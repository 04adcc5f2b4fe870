use super::{CAPTCHA_ON_MISSING, cell_text, locate};
use crate::error::{Result, ScraperError};
use scraper::{Html, Selector};

pub const CAPTCHA: &str = "Captcha";

const DATA_URI_MARKER: &str = "base64,";

/// Pulls the base64 captcha image out of the login page.
///
/// The image is `img#captcha` with a `data:` URI in its `src`. An element without
/// a usable payload counts as missing.
pub fn extract_captcha(html: &str) -> Result<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("img#captcha").unwrap();

    let payload = locate(&document, &selector, CAPTCHA, CAPTCHA_ON_MISSING)?
        .and_then(|img| img.value().attr("src"))
        .and_then(|src| src.split_once(DATA_URI_MARKER))
        .map(|(_, encoded)| encoded.trim())
        .filter(|encoded| !encoded.is_empty());

    match payload {
        Some(encoded) => Ok(encoded.to_string()),
        None => Err(ScraperError::ElementNotFound(CAPTCHA.to_string())),
    }
}

/// The hidden `_csrf` login field, when the page carries one.
pub fn find_csrf(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("input[name=\"_csrf\"]").unwrap();

    document
        .select(&selector)
        .next()
        .and_then(|input| input.value().attr("value"))
        .map(str::to_string)
        .filter(|token| !token.is_empty())
}

/// The portal puts its login error banner in the first `<strong>`.
pub fn login_error_hint(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("strong").unwrap();

    document
        .select(&selector)
        .next()
        .map(cell_text)
        .filter(|text| !text.is_empty())
}
