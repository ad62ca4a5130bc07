//! URL validation.
//!
//! Runs before the transport is touched, so malformed input never opens a
//! connection.

use url::Url;

use crate::error::{Error, Result};

/// Parses `s` as an absolute request URL.
///
/// Accepts only `http`/`https` URLs written with an explicit `//` authority
/// and a non-empty host. Input the URL parser would otherwise repair is
/// rejected: surrounding whitespace, control characters, and forms such as
/// `http:example.com` or `https:/example.com`.
///
/// # Examples
///
/// ```
/// use rs_readability::validate::parse_request_url;
///
/// assert!(parse_request_url("https://example.com/post/1").is_ok());
/// assert!(parse_request_url("/post/1").is_err());
/// assert!(parse_request_url("http:example.com").is_err());
/// ```
pub fn parse_request_url(s: &str) -> Result<Url> {
    if s.is_empty() {
        return Err(Error::InvalidUrl("empty URL".to_string()));
    }
    if s.trim() != s {
        return Err(Error::InvalidUrl(format!("{s:?}: surrounding whitespace")));
    }
    if s.chars().any(|c| c.is_ascii_control()) {
        return Err(Error::InvalidUrl(format!("{s:?}: control character")));
    }

    let url = Url::parse(s).map_err(|e| Error::InvalidUrl(format!("{s:?}: {e}")))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(Error::InvalidUrl(format!(
            "{s:?}: unsupported scheme {:?}",
            url.scheme()
        )));
    }

    // The parser fills in a missing or malformed `//` for special schemes.
    let has_authority = s
        .split_once(':')
        .is_some_and(|(_, rest)| rest.starts_with("//"));
    if !has_authority {
        return Err(Error::InvalidUrl(format!("{s:?}: missing authority")));
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(url),
        _ => Err(Error::InvalidUrl(format!("{s:?}: missing host"))),
    }
}
