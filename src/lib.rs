//! # rs-readability
//!
//! Acquisition front-end for readable-content extraction: fetch a page (or
//! take a stream or a parsed document), normalize its transfer encoding,
//! make sure it is HTML, and hand it to a Readability engine.
//!
//! ## Quick Start
//!
//! ```rust
//! use rs_readability::{acquire_from_stream, Url};
//!
//! let html = r#"<html><head><title>My Article</title></head>
//! <body><article>
//!   <h1>My Article</h1>
//!   <p>Main content here, long enough to look like a real paragraph of prose.</p>
//!   <p>A second paragraph keeps the article body ahead of any navigation.</p>
//! </article></body></html>"#;
//!
//! let url = Url::parse("https://example.com/my-article").expect("valid URL");
//! let article = acquire_from_stream(html.as_bytes(), &url)?;
//! println!("Title: {}", article.title);
//! # Ok::<(), rs_readability::Error>(())
//! ```
//!
//! ## Pipeline
//!
//! [`Pipeline::acquire_from_url`] runs these stages in order, stopping at the
//! first failure:
//!
//! 1. **Validate**: the input must be an absolute http(s) URL
//!    ([`Error::InvalidUrl`]). Nothing touches the network before this passes.
//! 2. **Fetch**: one GET with `Accept-Encoding: gzip`, bounded by a timeout
//!    ([`Error::RequestBuild`], [`Error::Fetch`]).
//! 3. **Decode**: a `gzip` body is decompressed on the fly, anything else is
//!    passed through ([`Error::Decode`]).
//! 4. **Gate**: the content type must contain `text/html`
//!    ([`Error::UnsupportedContentType`]).
//! 5. **Extract**: the [`Extractor`] produces the [`Article`]
//!    ([`Error::Parse`]).
//!
//! The free functions below build a fresh default pipeline per call. Build a
//! [`Pipeline`] yourself to reuse an engine, swap the transport, or attach a
//! [`CancelToken`].

mod cancel;
mod error;
mod options;
mod pipeline;
mod result;

/// Charset sniffing for fetched HTML.
pub mod encoding;

/// Transfer-encoding normalization (gzip).
pub mod decode;

/// Extraction engine trait and the bundled Readability engine.
pub mod extractor;

/// Content-type gate.
pub mod gate;

/// HTTP transport.
pub mod transport;

/// URL validation.
pub mod validate;

// Public API - re-exports
pub use cancel::CancelToken;
pub use dom_query::Document;
pub use error::{Error, FetchErrorKind, Result};
#[cfg(feature = "readability")]
pub use extractor::ReadabilityExtractor;
pub use extractor::Extractor;
pub use options::{Options, ReadabilityOptions};
pub use pipeline::{Pipeline, Source};
pub use result::Article;
pub use transport::{HttpTransport, Transport};
pub use url::Url;

#[cfg(feature = "readability")]
use std::io::Read;
#[cfg(feature = "readability")]
use std::time::Duration;

#[cfg(feature = "readability")]
fn default_pipeline() -> Pipeline<ReadabilityExtractor> {
    Pipeline::new(ReadabilityExtractor::default())
}

/// Fetches `url` and extracts its readable content.
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
///
/// let article = rs_readability::acquire_from_url("https://example.com/post", Duration::from_secs(10))?;
/// println!("{}", article.text_content);
/// # Ok::<(), rs_readability::Error>(())
/// ```
#[cfg(feature = "readability")]
pub fn acquire_from_url(url: &str, timeout: Duration) -> Result<Article> {
    default_pipeline().acquire_from_url(url, timeout)
}

/// Extracts readable content from an HTML stream.
///
/// `page_url` is used to resolve relative links; it is not fetched.
#[cfg(feature = "readability")]
pub fn acquire_from_stream<R: Read>(reader: R, page_url: &Url) -> Result<Article> {
    default_pipeline().acquire_from_stream(reader, page_url)
}

/// Extracts readable content from a parsed document.
///
/// # Example
///
/// ```rust
/// use rs_readability::{acquire_from_document, Document, Url};
///
/// let doc = Document::from(
///     "<html><body><article><p>Some article text that is worth reading.</p></article></body></html>",
/// );
/// let url = Url::parse("https://example.com/").expect("valid URL");
/// let article = acquire_from_document(&doc, &url)?;
/// println!("{}", article.text_content);
/// # Ok::<(), rs_readability::Error>(())
/// ```
#[cfg(feature = "readability")]
pub fn acquire_from_document(document: &Document, page_url: &Url) -> Result<Article> {
    default_pipeline().acquire_from_document(document, page_url)
}

/// Reports whether an HTML stream probably holds an article, without
/// extracting it.
#[cfg(feature = "readability")]
pub fn check_stream<R: Read>(reader: R) -> bool {
    default_pipeline().check_stream(reader)
}

/// Reports whether a parsed document probably holds an article, without
/// extracting it.
#[cfg(feature = "readability")]
pub fn check_document(document: &Document) -> bool {
    default_pipeline().check_document(document)
}
