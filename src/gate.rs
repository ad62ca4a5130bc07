//! Media-type gate.
//!
//! Only responses declared as HTML reach the extraction engine. The check is
//! substring containment on the raw header value: parameters such as
//! `charset` are ignored and no structured media-type parsing happens.

use log::{debug, warn};

use crate::error::{Error, Result};

/// Token that must appear in the `Content-Type` header.
pub const HTML_MEDIA_TYPE: &str = "text/html";

/// Returns true when `content_type` contains [`HTML_MEDIA_TYPE`].
#[must_use]
pub fn accepts_html(content_type: Option<&str>) -> bool {
    content_type.is_some_and(|value| value.contains(HTML_MEDIA_TYPE))
}

/// Fails with [`Error::UnsupportedContentType`] unless the response is HTML.
pub fn ensure_html(content_type: Option<&str>) -> Result<()> {
    if accepts_html(content_type) {
        debug!("content type {content_type:?} accepted");
        return Ok(());
    }
    warn!("rejecting non-HTML content type {content_type:?}");
    Err(Error::UnsupportedContentType(
        content_type.unwrap_or_default().to_string(),
    ))
}
