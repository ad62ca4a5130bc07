//! The acquisition pipeline.
//!
//! `validate -> transport -> decode -> gate -> extractor`, strictly in that
//! order. Each stage either hands its output to the next one or returns an
//! error; nothing is retried.

use std::io::Read;
use std::time::Duration;

use dom_query::Document;
use log::debug;
use url::Url;

use crate::decode;
use crate::error::Result;
use crate::extractor::Extractor;
use crate::gate;
use crate::options::Options;
use crate::result::Article;
use crate::transport::{HttpTransport, Request, Transport};
use crate::validate;

/// Where the HTML comes from.
pub enum Source<R> {
    /// Fetch this URL, bounding connect and header wait by `timeout`.
    Url { url: String, timeout: Duration },

    /// Read an already open stream; `url` records provenance and is not fetched.
    Stream { reader: R, url: Url },

    /// Use a document tree that has already been parsed.
    Document { document: Document, url: Url },
}

/// Acquisition pipeline parameterized by its extraction engine and transport.
///
/// A pipeline holds no per-call state, so it can be built once and shared.
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
/// use rs_readability::{Pipeline, ReadabilityExtractor};
///
/// let pipeline = Pipeline::new(ReadabilityExtractor::default());
/// let article = pipeline.acquire_from_url("https://example.com/post", Duration::from_secs(10))?;
/// println!("{}", article.title);
/// # Ok::<(), rs_readability::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Pipeline<E, T = HttpTransport> {
    extractor: E,
    transport: T,
    options: Options,
}

impl<E: Extractor> Pipeline<E> {
    /// Pipeline with the HTTP transport and default options.
    pub fn new(extractor: E) -> Self {
        Self::with_transport(extractor, HttpTransport)
    }
}

impl<E: Extractor, T: Transport> Pipeline<E, T> {
    pub fn with_transport(extractor: E, transport: T) -> Self {
        Self {
            extractor,
            transport,
            options: Options::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    pub fn extractor(&self) -> &E {
        &self.extractor
    }

    /// Fetches `url` with the configured timeout and extracts its article.
    pub fn fetch(&self, url: &str) -> Result<Article> {
        self.acquire_from_url(url, self.options.timeout)
    }

    /// Fetches `url` and extracts its article.
    ///
    /// The URL is validated before the transport is touched. Non-2xx
    /// responses are not rejected here; only the declared content type is.
    pub fn acquire_from_url(&self, url: &str, timeout: Duration) -> Result<Article> {
        let page_url = validate::parse_request_url(url)?;
        debug!("acquiring {page_url}");

        let cancel = self.options.cancel.as_ref();
        let request = Request::get(page_url.clone());
        let response = self.transport.execute(&request, timeout, cancel)?;

        let body = decode::normalize(
            response.body,
            response.content_encoding.as_deref(),
            cancel.cloned(),
        )?;
        gate::ensure_html(response.content_type.as_deref())?;

        self.acquire_from_stream(body, &page_url)
    }

    /// Extracts the article from `reader`, consuming it.
    ///
    /// The reader is dropped before this returns, whatever the outcome.
    pub fn acquire_from_stream<R: Read>(&self, mut reader: R, page_url: &Url) -> Result<Article> {
        self.extractor.parse(&mut reader, page_url)
    }

    /// Extracts the article from a parsed document.
    pub fn acquire_from_document(&self, document: &Document, page_url: &Url) -> Result<Article> {
        self.extractor.parse_document(document, page_url)
    }

    /// Reports whether `reader` looks readable without extracting it.
    pub fn check_stream<R: Read>(&self, mut reader: R) -> bool {
        self.extractor.check(&mut reader)
    }

    /// Reports whether `document` looks readable without extracting it.
    pub fn check_document(&self, document: &Document) -> bool {
        self.extractor.check_document(document)
    }

    /// Runs the pipeline for any [`Source`].
    pub fn acquire<R: Read>(&self, source: Source<R>) -> Result<Article> {
        match source {
            Source::Url { url, timeout } => self.acquire_from_url(&url, timeout),
            Source::Stream { reader, url } => self.acquire_from_stream(reader, &url),
            Source::Document { document, url } => self.acquire_from_document(&document, &url),
        }
    }
}
