//! Error types for rs-readability.
//!
//! Every stage of the acquisition pipeline fails fast with one of these
//! variants, so callers can tell which stage rejected the input.

use std::fmt;
use std::io;

/// Transport failure classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorKind {
    /// The request or a body read did not complete before the timeout.
    Timeout,
    /// DNS resolution, TCP connect or TLS handshake failed.
    Connect,
    /// Any other transport failure (connection reset, protocol error, ...).
    Other,
}

impl fmt::Display for FetchErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Timeout => "timeout",
            Self::Connect => "connect",
            Self::Other => "transport",
        };
        f.write_str(name)
    }
}

/// Error type for acquisition operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The input is not an absolute http(s) URL. No I/O was performed.
    #[error("failed to parse URL: {0}")]
    InvalidUrl(String),

    /// The HTTP client or request could not be constructed.
    #[error("failed to create request: {0}")]
    RequestBuild(String),

    /// Transport-level failure while fetching the page or reading its body.
    #[error("failed to fetch the page ({kind}): {message}")]
    Fetch {
        kind: FetchErrorKind,
        message: String,
    },

    /// The response declared gzip encoding but the body is not valid gzip.
    #[error("failed to decode gzip body: {0}")]
    Decode(String),

    /// The response is not declared as an HTML document.
    #[error("URL is not a HTML document (content type: {0:?})")]
    UnsupportedContentType(String),

    /// The extraction engine rejected the document.
    #[error("failed to parse document: {0}")]
    Parse(String),

    /// The caller's cancel token fired before the operation finished.
    #[error("operation cancelled")]
    Cancelled,
}

impl Error {
    /// Returns true when this is a transport failure caused by the timeout.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            Self::Fetch {
                kind: FetchErrorKind::Timeout,
                ..
            }
        )
    }

    pub(crate) fn fetch(kind: FetchErrorKind, message: impl Into<String>) -> Self {
        Self::Fetch {
            kind,
            message: message.into(),
        }
    }
}

/// Marker carried inside `io::Error`s produced by a normalized body, so the
/// failing stage survives the trip through `Read`.
#[derive(Debug)]
pub(crate) enum BodyFault {
    Cancelled,
    Transport(FetchErrorKind),
    Decode,
}

impl fmt::Display for BodyFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cancelled => f.write_str("body read cancelled"),
            Self::Transport(kind) => write!(f, "{kind} error while reading body"),
            Self::Decode => f.write_str("invalid gzip data"),
        }
    }
}

impl BodyFault {
    /// Wraps `err` so that it converts back into the matching `Error` variant.
    pub(crate) fn tag(self, err: &io::Error) -> io::Error {
        io::Error::new(err.kind(), TaggedIo { fault: self, message: err.to_string() })
    }
}

/// Returns true when `err` already carries a [`BodyFault`].
pub(crate) fn is_tagged(err: &io::Error) -> bool {
    err.get_ref().is_some_and(|e| e.is::<TaggedIo>())
}

#[derive(Debug)]
struct TaggedIo {
    fault: BodyFault,
    message: String,
}

impl fmt::Display for TaggedIo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.fault, self.message)
    }
}

impl std::error::Error for TaggedIo {}

impl From<io::Error> for Error {
    /// Classifies a read error.
    ///
    /// Errors raised by a normalized body carry their stage; untagged errors
    /// come from caller-supplied readers and count as transport failures.
    fn from(err: io::Error) -> Self {
        if let Some(tagged) = err.get_ref().and_then(|e| e.downcast_ref::<TaggedIo>()) {
            return match tagged.fault {
                BodyFault::Cancelled => Self::Cancelled,
                BodyFault::Decode => Self::Decode(tagged.message.clone()),
                BodyFault::Transport(kind) => Self::fetch(kind, tagged.message.clone()),
            };
        }
        let kind = if err.kind() == io::ErrorKind::TimedOut {
            FetchErrorKind::Timeout
        } else {
            FetchErrorKind::Other
        };
        Self::fetch(kind, err.to_string())
    }
}

/// Result type alias for acquisition operations.
pub type Result<T> = std::result::Result<T, Error>;
