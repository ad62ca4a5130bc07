//! Transfer-encoding normalization.
//!
//! Wraps a response body in a gzip decompression stage when the response
//! declares `Content-Encoding: gzip`, and passes it through untouched for any
//! other value. Downstream readers see the logical content either way.

use std::fmt;
use std::io::{self, Cursor, Read};

use flate2::read::MultiGzDecoder;
use log::{debug, trace, warn};

use crate::cancel::CancelToken;
use crate::error::{self, BodyFault, Error, Result};
use crate::transport;

/// The only encoding token that triggers decompression.
pub const GZIP: &str = "gzip";

/// Leading bytes of every gzip member: magic number plus the deflate method.
const GZIP_MAGIC: [u8; 3] = [0x1f, 0x8b, 0x08];

type RawBody = Box<dyn Read + Send>;

/// Raw body reader: checks the cancel token before each read and tags
/// transport errors with their stage.
struct Source {
    inner: RawBody,
    cancel: Option<CancelToken>,
}

impl Read for Source {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
            return Err(BodyFault::Cancelled.tag(&io::Error::other("cancel token fired")));
        }
        self.inner.read(buf).map_err(|e| {
            if error::is_tagged(&e) {
                e
            } else {
                BodyFault::Transport(transport::classify_read(&e)).tag(&e)
            }
        })
    }
}

enum Stage {
    Identity(Source),
    Gzip(MultiGzDecoder<io::Chain<Cursor<Vec<u8>>, Source>>),
    Released,
}

/// A normalized response body.
///
/// Yields decompressed bytes for gzip responses and raw bytes otherwise.
/// Dropping it releases the decompression stage first and the underlying
/// response body second.
pub struct Body {
    stage: Stage,
}

impl Body {
    /// Wraps a body that needs no decoding.
    pub fn identity(body: Box<dyn Read + Send>, cancel: Option<CancelToken>) -> Self {
        Self {
            stage: Stage::Identity(Source { inner: body, cancel }),
        }
    }

    /// Returns true when reads go through the gzip stage.
    #[must_use]
    pub fn is_gzip(&self) -> bool {
        matches!(self.stage, Stage::Gzip(_))
    }
}

impl Read for Body {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match &mut self.stage {
            Stage::Identity(source) => source.read(buf),
            Stage::Gzip(decoder) => decoder.read(buf).map_err(|e| {
                if error::is_tagged(&e) {
                    e
                } else {
                    warn!("gzip body failed mid-stream: {e}");
                    BodyFault::Decode.tag(&e)
                }
            }),
            Stage::Released => Ok(0),
        }
    }
}

impl Drop for Body {
    fn drop(&mut self) {
        match std::mem::replace(&mut self.stage, Stage::Released) {
            Stage::Gzip(decoder) => {
                // Decoder state goes first, then the response body it wrapped.
                let source = decoder.into_inner();
                trace!("gzip stage released");
                drop(source);
                trace!("response body released");
            }
            Stage::Identity(source) => {
                drop(source);
                trace!("response body released");
            }
            Stage::Released => {}
        }
    }
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stage = match self.stage {
            Stage::Identity(_) => "identity",
            Stage::Gzip(_) => "gzip",
            Stage::Released => "released",
        };
        f.debug_struct("Body").field("stage", &stage).finish()
    }
}

/// Wraps `body` according to its declared `content_encoding`.
///
/// Only the exact token `gzip` selects decompression; any other value,
/// including none, is treated as identity. Bodies made of several gzip
/// members decode to their concatenated contents. For gzip the magic header is read
/// and verified here, so a body that is not gzip at all fails immediately
/// with [`Error::Decode`]. Corruption further in surfaces on the read that
/// reaches it.
pub fn normalize(
    body: Box<dyn Read + Send>,
    content_encoding: Option<&str>,
    cancel: Option<CancelToken>,
) -> Result<Body> {
    if content_encoding != Some(GZIP) {
        if let Some(other) = content_encoding {
            debug!("content encoding {other:?} passed through as identity");
        }
        return Ok(Body::identity(body, cancel));
    }

    let mut source = Source { inner: body, cancel };
    let head = read_head(&mut source)?;
    if head[..] != GZIP_MAGIC {
        warn!("declared gzip body has no gzip header ({} bytes seen)", head.len());
        return Err(Error::Decode(format!(
            "invalid gzip header: expected {GZIP_MAGIC:02x?}, found {head:02x?}"
        )));
    }

    debug!("wrapping body in gzip decoder");
    Ok(Body {
        stage: Stage::Gzip(MultiGzDecoder::new(Cursor::new(head).chain(source))),
    })
}

/// Reads up to the magic length, stopping early at end of stream.
fn read_head(source: &mut Source) -> Result<Vec<u8>> {
    let mut head = Vec::with_capacity(GZIP_MAGIC.len());
    source
        .by_ref()
        .take(GZIP_MAGIC.len() as u64)
        .read_to_end(&mut head)?;
    Ok(head)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    fn gzip(data: &[u8]) -> Vec<u8> {
        let mut enc = GzEncoder::new(Vec::new(), Compression::default());
        enc.write_all(data).expect("write");
        enc.finish().expect("finish")
    }

    fn raw(bytes: Vec<u8>) -> RawBody {
        Box::new(Cursor::new(bytes))
    }

    fn drain(mut body: Body) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        body.read_to_end(&mut out)?;
        Ok(out)
    }

    #[test]
    fn gzip_body_is_decompressed() {
        let html = b"<html><body><p>Hello, gzip</p></body></html>";
        let body = normalize(raw(gzip(html)), Some("gzip"), None).expect("wrap");
        assert!(body.is_gzip());
        assert_eq!(drain(body).expect("read"), html);
    }

    #[test]
    fn multi_member_gzip_is_read_to_the_end() {
        let mut payload = gzip(b"<p>first half ");
        payload.extend(gzip(b"second half</p>"));
        let body = normalize(raw(payload), Some("gzip"), None).expect("wrap");
        assert_eq!(drain(body).expect("read"), b"<p>first half second half</p>");
    }

    #[test]
    fn missing_encoding_passes_through() {
        let body = normalize(raw(b"plain".to_vec()), None, None).expect("wrap");
        assert!(!body.is_gzip());
        assert_eq!(drain(body).expect("read"), b"plain");
    }

    #[test]
    fn unrecognized_encodings_are_identity() {
        // Only the exact `gzip` token decompresses; these are left alone.
        for encoding in ["identity", "br", "deflate", "x-gzip", "GZIP", " gzip"] {
            let payload = gzip(b"data");
            let body = normalize(raw(payload.clone()), Some(encoding), None).expect("wrap");
            assert!(!body.is_gzip(), "{encoding} should not decompress");
            assert_eq!(drain(body).expect("read"), payload);
        }
    }

    #[test]
    fn non_gzip_payload_fails_at_wrap_time() {
        let err = normalize(raw(b"<html></html>".to_vec()), Some("gzip"), None).unwrap_err();
        assert!(matches!(err, Error::Decode(_)), "got {err:?}");
    }

    #[test]
    fn empty_gzip_body_fails_at_wrap_time() {
        let err = normalize(raw(Vec::new()), Some("gzip"), None).unwrap_err();
        assert!(matches!(err, Error::Decode(_)), "got {err:?}");
    }

    #[test]
    fn corrupted_deflate_stream_fails_on_read() {
        let mut payload = gzip(&b"<p>some text that compresses</p>".repeat(50));
        let mid = payload.len() / 2;
        for byte in &mut payload[12..mid] {
            *byte ^= 0xa5;
        }
        let body = normalize(raw(payload), Some("gzip"), None).expect("header is intact");
        let err = drain(body).unwrap_err();
        assert!(matches!(err, Error::Decode(_)), "got {err:?}");
    }

    #[test]
    fn truncated_gzip_fails_on_read() {
        let mut payload = gzip(&b"abcdefghij".repeat(100));
        payload.truncate(payload.len() - 12);
        let body = normalize(raw(payload), Some("gzip"), None).expect("header is intact");
        assert!(matches!(drain(body), Err(Error::Decode(_))));
    }

    #[test]
    fn cancelled_body_stops_reading() {
        let token = CancelToken::new();
        let body = normalize(raw(b"content".to_vec()), None, Some(token.clone())).expect("wrap");
        token.cancel();
        assert!(matches!(drain(body), Err(Error::Cancelled)));
    }

    #[test]
    fn cancelled_before_wrap_fails_gzip_header_read() {
        let token = CancelToken::new();
        token.cancel();
        let err = normalize(raw(gzip(b"x")), Some("gzip"), Some(token)).unwrap_err();
        assert!(matches!(err, Error::Cancelled));
    }

    #[test]
    fn transport_read_errors_stay_transport_errors_through_gzip() {
        struct Failing {
            sent: bool,
        }
        impl Read for Failing {
            fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
                if self.sent {
                    return Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset"));
                }
                self.sent = true;
                buf[..3].copy_from_slice(&GZIP_MAGIC);
                Ok(3)
            }
        }

        let body = normalize(Box::new(Failing { sent: false }), Some("gzip"), None).expect("wrap");
        assert!(matches!(drain(body), Err(Error::Fetch { .. })));
    }
}
