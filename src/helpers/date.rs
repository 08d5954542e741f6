//! Date helper functions

use chrono::{DateTime, FixedOffset, Locale, TimeZone};

/// Parse a timestamp as sent by the content API
///
/// Accepts RFC 3339 (`2021-03-25T19:25:28+00:00`) and the compact offset
/// form the API uses (`2021-03-25T19:25:28+0000`).
pub fn parse_api_date(s: &str) -> Option<DateTime<FixedOffset>> {
    let s = s.trim();
    DateTime::parse_from_rfc3339(s)
        .or_else(|_| DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%z"))
        .or_else(|_| DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f%z"))
        .ok()
}

/// Format a publication date for display in the given timezone and locale
///
/// # Examples
/// ```ignore
/// format_publication_date("2021-03-25T19:25:28+0000", &Sao_Paulo, Locale::pt_BR, "%d de %B de %Y")
/// // -> "25 de março de 2021"
/// ```
pub fn format_publication_date<Tz: TimeZone>(
    raw: &str,
    tz: &Tz,
    locale: Locale,
    format: &str,
) -> Option<String>
where
    Tz::Offset: std::fmt::Display,
{
    let date = parse_api_date(raw)?.with_timezone(tz);
    Some(date.format_localized(format, locale).to_string())
}
