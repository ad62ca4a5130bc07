//! HTTP transport.
//!
//! A [`Transport`] performs exactly one GET per call and returns the raw
//! response. Status codes are not filtered here; only transport-level
//! failures become errors.

use std::fmt;
use std::io::{self, Cursor, Read};
use std::time::Duration;

use log::debug;
use reqwest::header::{HeaderMap, HeaderName, CONTENT_ENCODING, CONTENT_TYPE};
use url::Url;

use crate::cancel::{self, CancelToken};
use crate::error::{BodyFault, Error, FetchErrorKind, Result};

/// How often a cancellable fetch looks at its token while waiting.
const CANCEL_POLL_INTERVAL: Duration = Duration::from_millis(20);

/// An outbound GET request.
///
/// Carries a single header advertising gzip support and nothing else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    url: Url,
    headers: Vec<(&'static str, &'static str)>,
}

impl Request {
    /// Builds a GET for an already validated URL.
    #[must_use]
    pub fn get(url: Url) -> Self {
        Self {
            url,
            headers: vec![("accept-encoding", "gzip")],
        }
    }

    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Header name/value pairs sent with the request.
    #[must_use]
    pub fn headers(&self) -> &[(&'static str, &'static str)] {
        &self.headers
    }
}

/// A fetched response: the body stream plus the headers the pipeline reads.
pub struct Response {
    /// HTTP status code, recorded but never acted upon by the pipeline.
    pub status: u16,

    /// Value of the `Content-Encoding` header.
    pub content_encoding: Option<String>,

    /// Value of the `Content-Type` header.
    pub content_type: Option<String>,

    /// The undecoded response body. Dropping it releases the connection.
    pub body: Box<dyn Read + Send>,
}

impl fmt::Debug for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Response")
            .field("status", &self.status)
            .field("content_encoding", &self.content_encoding)
            .field("content_type", &self.content_type)
            .finish_non_exhaustive()
    }
}

/// Executes a request and hands back the raw response.
pub trait Transport {
    /// Sends `request` once.
    ///
    /// `timeout` bounds connect and header wait. When `cancel` is given and
    /// fires before headers arrive, returns [`Error::Cancelled`].
    fn execute(
        &self,
        request: &Request,
        timeout: Duration,
        cancel: Option<&CancelToken>,
    ) -> Result<Response>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(
        &self,
        request: &Request,
        timeout: Duration,
        cancel: Option<&CancelToken>,
    ) -> Result<Response> {
        (**self).execute(request, timeout, cancel)
    }
}

/// Blocking HTTP transport backed by `reqwest`.
///
/// A fresh client is built for every call so the timeout is scoped to that
/// call. Automatic decompression is off; the body arrives exactly as sent.
/// With a cancel token the async client runs on a per-call runtime instead,
/// so a cancel tears the connection down rather than abandoning it.
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpTransport;

impl Transport for HttpTransport {
    fn execute(
        &self,
        request: &Request,
        timeout: Duration,
        cancel: Option<&CancelToken>,
    ) -> Result<Response> {
        cancel::check(cancel)?;
        debug!("GET {} (timeout {timeout:?})", request.url());

        let response = match cancel {
            Some(token) => execute_cancellable(request, timeout, token)?,
            None => execute_blocking(request, timeout)?,
        };
        debug!(
            "{} responded {} (encoding {:?}, type {:?})",
            request.url(),
            response.status,
            response.content_encoding,
            response.content_type
        );
        Ok(response)
    }
}

fn execute_blocking(request: &Request, timeout: Duration) -> Result<Response> {
    let client = reqwest::blocking::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| Error::RequestBuild(e.to_string()))?;

    let mut builder = client.get(request.url().clone());
    for (name, value) in request.headers() {
        builder = builder.header(*name, *value);
    }
    let outbound = builder.build().map_err(|e| Error::RequestBuild(e.to_string()))?;

    let response = client.execute(outbound).map_err(classify)?;
    Ok(Response {
        status: response.status().as_u16(),
        content_encoding: header_value(response.headers(), CONTENT_ENCODING),
        content_type: header_value(response.headers(), CONTENT_TYPE),
        body: Box::new(response),
    })
}

/// Drives the async client on a private runtime, racing every wait against
/// `token`.
///
/// Cancelling drops the pending future and then the runtime, which closes
/// the connection before this returns.
fn execute_cancellable(
    request: &Request,
    timeout: Duration,
    token: &CancelToken,
) -> Result<Response> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| Error::RequestBuild(format!("failed to start fetch runtime: {e}")))?;

    let client = {
        let _guard = runtime.enter();
        reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::RequestBuild(e.to_string()))?
    };

    let mut builder = client.get(request.url().clone());
    for (name, value) in request.headers() {
        builder = builder.header(*name, *value);
    }
    let outbound = builder.build().map_err(|e| Error::RequestBuild(e.to_string()))?;

    let response = runtime
        .block_on(async {
            tokio::select! {
                biased;
                () = cancelled(token) => Err(Error::Cancelled),
                result = client.execute(outbound) => result.map_err(classify),
            }
        })
        .inspect_err(|err| {
            if matches!(err, Error::Cancelled) {
                debug!("{} cancelled while waiting for headers", request.url());
            }
        })?;

    Ok(Response {
        status: response.status().as_u16(),
        content_encoding: header_value(response.headers(), CONTENT_ENCODING),
        content_type: header_value(response.headers(), CONTENT_TYPE),
        body: Box::new(CancellableBody {
            response,
            pending: Cursor::new(Vec::new()),
            cancel: token.clone(),
            runtime,
        }),
    })
}

/// Resolves once `token` fires.
async fn cancelled(token: &CancelToken) {
    while !token.is_cancelled() {
        tokio::time::sleep(CANCEL_POLL_INTERVAL).await;
    }
}

fn header_value(headers: &HeaderMap, name: HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
}

/// Body of a cancellable fetch.
///
/// Each chunk wait is raced against the token. Fields drop in order, so the
/// response goes before the runtime that owns its connection.
struct CancellableBody {
    response: reqwest::Response,
    pending: Cursor<Vec<u8>>,
    cancel: CancelToken,
    runtime: tokio::runtime::Runtime,
}

impl Read for CancellableBody {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        loop {
            let n = self.pending.read(buf)?;
            if n > 0 || buf.is_empty() {
                return Ok(n);
            }

            let response = &mut self.response;
            let token = &self.cancel;
            let next = self.runtime.block_on(async {
                tokio::select! {
                    biased;
                    () = cancelled(token) => None,
                    chunk = response.chunk() => Some(chunk),
                }
            });
            match next {
                None => {
                    return Err(BodyFault::Cancelled.tag(&io::Error::other("cancel token fired")))
                }
                Some(Ok(Some(chunk))) => self.pending = Cursor::new(Vec::from(chunk)),
                Some(Ok(None)) => return Ok(0),
                Some(Err(e)) => return Err(io::Error::other(e)),
            }
        }
    }
}

fn classify(err: reqwest::Error) -> Error {
    if err.is_builder() {
        return Error::RequestBuild(err.to_string());
    }
    let kind = if err.is_timeout() {
        FetchErrorKind::Timeout
    } else if err.is_connect() {
        FetchErrorKind::Connect
    } else {
        FetchErrorKind::Other
    };
    Error::fetch(kind, err.to_string())
}

/// Classifies an error raised while reading a response body.
pub(crate) fn classify_read(err: &io::Error) -> FetchErrorKind {
    if err.kind() == io::ErrorKind::TimedOut {
        return FetchErrorKind::Timeout;
    }
    match err.get_ref().and_then(|e| e.downcast_ref::<reqwest::Error>()) {
        Some(inner) if inner.is_timeout() => FetchErrorKind::Timeout,
        Some(inner) if inner.is_connect() => FetchErrorKind::Connect,
        _ => FetchErrorKind::Other,
    }
}
