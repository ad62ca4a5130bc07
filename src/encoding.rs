//! Character set sniffing for fetched HTML.
//!
//! The pipeline hands bytes, not text, to the extraction engine. The default
//! engine turns them into UTF-8 here: byte-order mark first, then the
//! document's own `<meta>` declaration, then UTF-8.

use std::borrow::Cow;
use std::sync::LazyLock;

use encoding_rs::{Encoding, UTF_8};
use regex::bytes::Regex;

/// How far into the document a charset declaration is looked for.
const SNIFF_LIMIT: usize = 1024;

/// `<meta charset=...>` and `<meta http-equiv=content-type content="...; charset=...">`.
#[allow(clippy::expect_used)]
static META_CHARSET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i-u)<meta\b[^>]*?\bcharset\s*=\s*["']?\s*([A-Za-z0-9._:\-]+)"#,
    )
    .expect("valid regex")
});

/// Picks the encoding for `html`.
#[must_use]
pub fn sniff(html: &[u8]) -> &'static Encoding {
    if let Some((encoding, _)) = Encoding::for_bom(html) {
        return encoding;
    }
    declared_charset(html)
        .and_then(Encoding::for_label)
        .map_or(UTF_8, Encoding::output_encoding)
}

/// Charset label declared in the document head, if any.
fn declared_charset(html: &[u8]) -> Option<&[u8]> {
    let head = &html[..html.len().min(SNIFF_LIMIT)];
    META_CHARSET_RE
        .captures(head)
        .and_then(|c| c.get(1))
        .map(|m| m.as_bytes())
}

/// Decodes `html` to UTF-8, replacing malformed sequences with U+FFFD.
///
/// # Examples
///
/// ```
/// use rs_readability::encoding::decode_html;
///
/// let html = b"<meta charset=\"windows-1252\"><p>Caf\xE9</p>";
/// assert!(decode_html(html).contains("Caf\u{e9}"));
/// ```
#[must_use]
pub fn decode_html(html: &[u8]) -> Cow<'_, str> {
    let (text, _) = sniff(html).decode_with_bom_removal(html);
    text
}
