//! Consumable byte source for request and response payloads.
//!
//! A [`Body`] is read progressively and exactly once. The only mutable
//! state crossing suspension points in the pipeline lives here, behind an
//! internal exclusive lock scoped to a single [`read`](Body::read) call, so
//! the surrounding request/response values stay immutable and freely
//! shareable.

use bytes::{Bytes, BytesMut};
use futures_util::stream::{BoxStream, StreamExt};
use tokio::sync::Mutex;

/// A byte source read progressively, consumable once.
pub struct Body {
    inner: Mutex<Inner>,
}

enum Inner {
    Empty,
    /// Remaining unread bytes of a fully buffered payload.
    Buffered(Bytes),
    /// A chunked source, with leftover bytes from a read that crossed a
    /// chunk boundary.
    Chunks {
        stream: BoxStream<'static, Bytes>,
        leftover: Bytes,
    },
}

impl Body {
    /// An empty body.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            inner: Mutex::new(Inner::Empty),
        }
    }

    /// A body over a buffered payload.
    #[must_use]
    pub fn from_bytes(data: impl Into<Bytes>) -> Self {
        Self {
            inner: Mutex::new(Inner::Buffered(data.into())),
        }
    }

    /// A body over a stream of chunks.
    #[must_use]
    pub fn from_stream<S>(stream: S) -> Self
    where
        S: futures_util::Stream<Item = Bytes> + Send + 'static,
    {
        Self {
            inner: Mutex::new(Inner::Chunks {
                stream: stream.boxed(),
                leftover: Bytes::new(),
            }),
        }
    }

    /// Reads up to `max` bytes, or everything remaining when `max` is
    /// `None`. Returns an empty buffer once the source is exhausted.
    pub async fn read(&self, max: Option<usize>) -> Bytes {
        let mut inner = self.inner.lock().await;
        match &mut *inner {
            Inner::Empty => Bytes::new(),
            Inner::Buffered(remaining) => {
                let n = max.map_or(remaining.len(), |m| m.min(remaining.len()));
                remaining.split_to(n)
            }
            Inner::Chunks { stream, leftover } => {
                let mut buf = BytesMut::new();
                if !leftover.is_empty() {
                    buf.extend_from_slice(leftover);
                    *leftover = Bytes::new();
                }
                while max.map_or(true, |m| buf.len() < m) {
                    match stream.next().await {
                        Some(chunk) => buf.extend_from_slice(&chunk),
                        None => break,
                    }
                }
                let mut out = buf.freeze();
                if let Some(m) = max {
                    if out.len() > m {
                        *leftover = out.split_off(m);
                    }
                }
                out
            }
        }
    }

    /// Reads everything remaining.
    pub async fn read_all(&self) -> Bytes {
        self.read(None).await
    }
}

impl Default for Body {
    fn default() -> Self {
        Self::empty()
    }
}

impl std::fmt::Debug for Body {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Body")
    }
}

impl From<Bytes> for Body {
    fn from(data: Bytes) -> Self {
        Self::from_bytes(data)
    }
}

impl From<Vec<u8>> for Body {
    fn from(data: Vec<u8>) -> Self {
        Self::from_bytes(data)
    }
}

impl From<String> for Body {
    fn from(data: String) -> Self {
        Self::from_bytes(data)
    }
}

impl From<&'static str> for Body {
    fn from(data: &'static str) -> Self {
        Self::from_bytes(data)
    }
}
