//! Exposes the request body to the decoder and decides, from headers alone,
//! whether decoding should start at all.

use std::fmt;
use std::io;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};

use bytes::Bytes;
use futures::future;
use futures::stream::{self, BoxStream, Stream, StreamExt};
use futures::task::AtomicWaker;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Incremental request body.
pub type ByteStream = BoxStream<'static, Result<Bytes, BoxError>>;

const MULTIPART_FORM_DATA: &str = "multipart/form-data";

/// A request body, either already buffered or still arriving.
pub enum RequestBody {
    /// The request carries no body at all.
    Absent,
    Buffered(Bytes),
    Streaming(ByteStream),
}

impl RequestBody {
    pub fn streaming<S, E>(stream: S) -> Self
    where
        S: Stream<Item = Result<Bytes, E>> + Send + 'static,
        E: Into<BoxError>,
    {
        RequestBody::Streaming(stream.map(|chunk| chunk.map_err(Into::into)).boxed())
    }
}

impl fmt::Debug for RequestBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestBody::Absent => f.write_str("Absent"),
            RequestBody::Buffered(bytes) => f.debug_tuple("Buffered").field(&bytes.len()).finish(),
            RequestBody::Streaming(_) => f.write_str("Streaming"),
        }
    }
}

/// What the decoder has to work with once the headers have been inspected.
pub enum BodySource {
    /// Content-Type is not `multipart/form-data`; the body is left untouched.
    NotMultipart,
    /// Multipart was declared but no body bytes exist.
    MissingBody,
    Multipart {
        content_type: String,
        stream: ByteStream,
    },
}

impl BodySource {
    pub fn from_parts(content_type: Option<&str>, body: RequestBody) -> Self {
        let content_type = match content_type {
            Some(ct) if is_multipart(ct) => ct.to_string(),
            _ => return BodySource::NotMultipart,
        };

        let stream = match body {
            RequestBody::Absent => return BodySource::MissingBody,
            RequestBody::Buffered(bytes) if bytes.is_empty() => return BodySource::MissingBody,
            RequestBody::Buffered(bytes) => {
                stream::once(future::ready(Ok::<_, BoxError>(bytes))).boxed()
            }
            RequestBody::Streaming(stream) => stream,
        };

        BodySource::Multipart {
            content_type,
            stream,
        }
    }
}

/// Content-Type prefix check. Media types are case-insensitive.
pub fn is_multipart(content_type: &str) -> bool {
    content_type
        .trim_start()
        .get(..MULTIPART_FORM_DATA.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(MULTIPART_FORM_DATA))
}

#[derive(Debug, Default)]
struct AbortState {
    aborted: AtomicBool,
    waker: AtomicWaker,
}

/// Hard-abort switch for an [`AbortableBody`].
#[derive(Clone, Debug, Default)]
pub struct AbortHandle {
    state: Arc<AbortState>,
}

impl AbortHandle {
    pub fn abort(&self) {
        self.state.aborted.store(true, Ordering::SeqCst);
        self.state.waker.wake();
    }

    pub fn is_aborted(&self) -> bool {
        self.state.aborted.load(Ordering::SeqCst)
    }
}

/// Body stream that can be torn down mid-transfer.
///
/// After [`AbortHandle::abort`] the inner stream is dropped on the next poll and
/// the reader sees a `ConnectionAborted` error instead of a clean end of stream.
pub struct AbortableBody {
    inner: Option<ByteStream>,
    handle: AbortHandle,
}

impl AbortableBody {
    pub fn new(stream: ByteStream) -> (Self, AbortHandle) {
        let handle = AbortHandle::default();
        (
            Self {
                inner: Some(stream),
                handle: handle.clone(),
            },
            handle,
        )
    }
}

impl Stream for AbortableBody {
    type Item = Result<Bytes, BoxError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = &mut *self;
        this.handle.state.waker.register(cx.waker());

        if this.handle.is_aborted() {
            if this.inner.take().is_some() {
                let err = io::Error::new(io::ErrorKind::ConnectionAborted, "upload source aborted");
                return Poll::Ready(Some(Err(err.into())));
            }
            return Poll::Ready(None);
        }

        match this.inner.as_mut() {
            Some(stream) => stream.poll_next_unpin(cx),
            None => Poll::Ready(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multipart_is_detected_by_prefix() {
        assert!(is_multipart("multipart/form-data; boundary=abc"));
        assert!(is_multipart("Multipart/Form-Data; boundary=abc"));
        assert!(!is_multipart("application/json"));
        assert!(!is_multipart("multipart/mixed; boundary=abc"));
        assert!(!is_multipart("multipart"));
    }

    #[test]
    fn non_multipart_never_touches_the_body() {
        let body = RequestBody::streaming(stream::poll_fn(|_| -> Poll<Option<Result<Bytes, io::Error>>> {
            panic!("body must not be polled")
        }));
        assert!(matches!(
            BodySource::from_parts(Some("application/json"), body),
            BodySource::NotMultipart
        ));
        assert!(matches!(
            BodySource::from_parts(None, RequestBody::Absent),
            BodySource::NotMultipart
        ));
    }

    #[test]
    fn declared_multipart_without_bytes_is_missing_body() {
        let ct = Some("multipart/form-data; boundary=abc");
        assert!(matches!(
            BodySource::from_parts(ct, RequestBody::Absent),
            BodySource::MissingBody
        ));
        assert!(matches!(
            BodySource::from_parts(ct, RequestBody::Buffered(Bytes::new())),
            BodySource::MissingBody
        ));
    }

    #[tokio::test]
    async fn buffered_body_becomes_single_chunk() {
        let source = BodySource::from_parts(
            Some("multipart/form-data; boundary=abc"),
            RequestBody::Buffered(Bytes::from_static(b"payload")),
        );
        let BodySource::Multipart { stream, .. } = source else {
            panic!("expected multipart source");
        };
        let chunks: Vec<_> = stream.collect().await;
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].as_ref().unwrap().as_ref(), b"payload");
    }

    #[tokio::test]
    async fn aborted_body_errors_then_ends() {
        let inner = stream::iter((0..4).map(|_| Ok::<_, BoxError>(Bytes::from_static(b"a")))).boxed();
        let (mut body, handle) = AbortableBody::new(inner);

        assert_eq!(body.next().await.unwrap().unwrap().as_ref(), b"a");
        handle.abort();
        assert!(handle.is_aborted());

        let err = body.next().await.unwrap().unwrap_err();
        assert!(err.to_string().contains("aborted"));
        assert!(body.next().await.is_none());
    }
}
