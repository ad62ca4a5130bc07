//! Shared fakes for pipeline tests.
#![allow(dead_code)]

use std::io::{Cursor, Read, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use flate2::write::GzEncoder;
use flate2::Compression;
use rs_readability::transport::{Request, Response};
use rs_readability::{Article, CancelToken, Document, Error, Extractor, Result, Transport, Url};

pub fn gzip(data: &[u8]) -> Vec<u8> {
    let mut enc = GzEncoder::new(Vec::new(), Compression::default());
    enc.write_all(data).expect("gzip write");
    enc.finish().expect("gzip finish")
}

/// Body that counts how many times it has been dropped.
struct CountingBody {
    inner: Cursor<Vec<u8>>,
    drops: Arc<AtomicUsize>,
}

impl Read for CountingBody {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.inner.read(buf)
    }
}

impl Drop for CountingBody {
    fn drop(&mut self) {
        self.drops.fetch_add(1, Ordering::SeqCst);
    }
}

/// Canned response plus bookkeeping of what the pipeline did with it.
pub struct FakeTransport {
    pub status: u16,
    pub content_encoding: Option<String>,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
    pub failure: Option<fn() -> Error>,
    pub calls: AtomicUsize,
    pub body_drops: Arc<AtomicUsize>,
    pub seen: Mutex<Vec<(Request, Duration)>>,
}

impl FakeTransport {
    pub fn html(body: &[u8]) -> Self {
        Self {
            status: 200,
            content_encoding: None,
            content_type: Some("text/html; charset=utf-8".to_string()),
            body: body.to_vec(),
            failure: None,
            calls: AtomicUsize::new(0),
            body_drops: Arc::new(AtomicUsize::new(0)),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn gzip_html(body: &[u8]) -> Self {
        Self {
            content_encoding: Some("gzip".to_string()),
            body: gzip(body),
            ..Self::html(b"")
        }
    }

    pub fn failing(failure: fn() -> Error) -> Self {
        Self {
            failure: Some(failure),
            ..Self::html(b"")
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn body_drops(&self) -> usize {
        self.body_drops.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<(Request, Duration)> {
        self.seen.lock().expect("lock").clone()
    }
}

impl Transport for FakeTransport {
    fn execute(
        &self,
        request: &Request,
        timeout: Duration,
        _cancel: Option<&CancelToken>,
    ) -> Result<Response> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().expect("lock").push((request.clone(), timeout));
        if let Some(failure) = self.failure {
            return Err(failure());
        }
        Ok(Response {
            status: self.status,
            content_encoding: self.content_encoding.clone(),
            content_type: self.content_type.clone(),
            body: Box::new(CountingBody {
                inner: Cursor::new(self.body.clone()),
                drops: Arc::clone(&self.body_drops),
            }),
        })
    }
}

/// Extractor that records the bytes it was given and echoes them back.
#[derive(Default)]
pub struct RecordingExtractor {
    pub fail_with: Option<String>,
    received: Mutex<Vec<Vec<u8>>>,
    parse_calls: AtomicUsize,
    check_calls: AtomicUsize,
}

impl RecordingExtractor {
    pub fn failing(message: &str) -> Self {
        Self {
            fail_with: Some(message.to_string()),
            ..Self::default()
        }
    }

    pub fn received(&self) -> Vec<Vec<u8>> {
        self.received.lock().expect("lock").clone()
    }

    pub fn parse_calls(&self) -> usize {
        self.parse_calls.load(Ordering::SeqCst)
    }

    pub fn check_calls(&self) -> usize {
        self.check_calls.load(Ordering::SeqCst)
    }
}

impl Extractor for RecordingExtractor {
    fn parse(&self, input: &mut dyn Read, page_url: &Url) -> Result<Article> {
        self.parse_calls.fetch_add(1, Ordering::SeqCst);
        let mut bytes = Vec::new();
        input.read_to_end(&mut bytes)?;
        self.received.lock().expect("lock").push(bytes.clone());
        if let Some(message) = &self.fail_with {
            return Err(Error::Parse(message.clone()));
        }
        let text = String::from_utf8_lossy(&bytes).into_owned();
        Ok(Article {
            length: text.chars().count(),
            text_content: text,
            url: Some(page_url.to_string()),
            ..Article::default()
        })
    }

    fn parse_document(&self, document: &Document, page_url: &Url) -> Result<Article> {
        self.parse_calls.fetch_add(1, Ordering::SeqCst);
        let text = document.select("body").text().to_string();
        Ok(Article {
            length: text.chars().count(),
            text_content: text,
            url: Some(page_url.to_string()),
            ..Article::default()
        })
    }

    fn check(&self, input: &mut dyn Read) -> bool {
        self.check_calls.fetch_add(1, Ordering::SeqCst);
        let mut bytes = Vec::new();
        input.read_to_end(&mut bytes).is_ok() && !bytes.is_empty()
    }

    fn check_document(&self, document: &Document) -> bool {
        self.check_calls.fetch_add(1, Ordering::SeqCst);
        document.select("p").exists()
    }
}
