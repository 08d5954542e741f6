//! Opaque pagination cursors
//!
//! The content API hands out the next page as a URL. Browsers carry it
//! base64-encoded so it survives a query string untouched.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::Url;

use crate::error::{BlogError, Result};

/// A "next page" token issued by the content API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cursor(String);

impl Cursor {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Cursor from an optional `next_page` field; empty strings mean "no more pages"
    ///
    /// Any `access_token` the API echoed back is dropped, since cursors end
    /// up in rendered pages.
    pub fn from_next_page(next_page: Option<String>) -> Option<Self> {
        next_page
            .filter(|s| !s.trim().is_empty())
            .map(|raw| {
                if let Ok(mut url) = Url::parse(&raw) {
                    if strip_access_token(&mut url) {
                        return Cursor(url.to_string());
                    }
                }
                Cursor(raw)
            })
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Base64 form used in `?nextpage=` parameters
    pub fn encode(&self) -> String {
        STANDARD.encode(self.0.as_bytes())
    }

    /// Decode a `?nextpage=` parameter back into a cursor
    ///
    /// A `+` sent without percent-encoding arrives as a space and is restored.
    pub fn decode(encoded: &str) -> Result<Self> {
        let encoded = encoded.trim().replace(' ', "+");
        if encoded.is_empty() {
            return Err(BlogError::MalformedCursor("empty cursor".to_string()));
        }
        let bytes = STANDARD
            .decode(&encoded)
            .map_err(|e| BlogError::MalformedCursor(format!("invalid base64: {}", e)))?;
        let raw = String::from_utf8(bytes)
            .map_err(|_| BlogError::MalformedCursor("cursor is not UTF-8".to_string()))?;
        Ok(Self(raw))
    }

    /// The cursor as an absolute http(s) URL
    pub fn to_url(&self) -> Result<Url> {
        let url = Url::parse(&self.0)
            .map_err(|e| BlogError::MalformedCursor(format!("not a URL: {}", e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(BlogError::MalformedCursor(format!(
                "unsupported scheme: {}",
                url.scheme()
            )));
        }
        Ok(url)
    }

    /// Resolve to a URL on the same host as `endpoint`
    ///
    /// The server appends its access token to cursor URLs, so a cursor may
    /// only point back at the content API it came from.
    pub fn to_url_for(&self, endpoint: &Url) -> Result<Url> {
        let url = self.to_url()?;
        if url.host_str() != endpoint.host_str()
            || url.port_or_known_default() != endpoint.port_or_known_default()
        {
            return Err(BlogError::MalformedCursor(format!(
                "cursor host {} does not match the content API",
                url.host_str().unwrap_or("")
            )));
        }
        Ok(url)
    }
}

/// Remove every `access_token` pair from `url`; returns whether one was present
pub(crate) fn strip_access_token(url: &mut Url) -> bool {
    if !url.query_pairs().any(|(key, _)| key == "access_token") {
        return false;
    }

    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| key != "access_token")
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();
    if kept.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut().clear().extend_pairs(kept);
    }
    true
}

impl std::fmt::Display for Cursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
