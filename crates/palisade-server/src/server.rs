//! HTTP transport adapter.
//!
//! Binds a TCP listener and bridges wire requests into the pipeline:
//! hyper owns HTTP parsing and framing, this layer only converts between
//! hyper's types and the pipeline's immutable values, renders structured
//! HTTP errors into their responses and hides everything else behind an
//! empty 500.

use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use bytes::Bytes;
use http::StatusCode;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;
use tokio::task::JoinSet;

use palisade_core::{Body, Error, Handler, Request, RequestHead, Response};

use crate::config::ServerConfig;

/// Errors from the transport adapter itself.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// The listener could not be bound.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        /// The configured bind address.
        addr: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Accepting a connection failed unrecoverably.
    #[error("listener error: {0}")]
    Accept(#[from] std::io::Error),
}

/// The Palisade HTTP server.
///
/// Owns a composed pipeline handler and serves it over HTTP/1.1.
pub struct Server<H> {
    config: ServerConfig,
    handler: Arc<H>,
}

impl<H: Handler + 'static> Server<H> {
    /// A server for `handler` under `config`.
    #[must_use]
    pub fn new(config: ServerConfig, handler: H) -> Self {
        Self {
            config,
            handler: Arc::new(handler),
        }
    }

    /// Binds the configured address.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Bind`] when the address cannot be bound.
    pub async fn bind(self) -> Result<BoundServer<H>, ServerError> {
        let listener =
            TcpListener::bind(self.config.bind_addr())
                .await
                .map_err(|source| ServerError::Bind {
                    addr: self.config.bind_addr().to_string(),
                    source,
                })?;
        Ok(BoundServer {
            config: self.config,
            handler: self.handler,
            listener,
        })
    }

    /// Binds and serves until ctrl-c.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError`] when binding or accepting fails.
    pub async fn run(self) -> Result<(), ServerError> {
        self.bind()
            .await?
            .serve(async {
                let _ = tokio::signal::ctrl_c().await;
            })
            .await
    }
}

/// A server with its listener bound, ready to serve.
pub struct BoundServer<H> {
    config: ServerConfig,
    handler: Arc<H>,
    listener: TcpListener,
}

impl<H: Handler + 'static> BoundServer<H> {
    /// The address the listener actually bound (useful with port 0).
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error when the address is unavailable.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Serves connections until `shutdown` completes, then drains
    /// in-flight connections within the configured timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Accept`] when the listener fails.
    pub async fn serve(
        self,
        shutdown: impl Future<Output = ()> + Send,
    ) -> Result<(), ServerError> {
        tracing::info!(addr = %self.config.bind_addr(), "server listening");
        let mut connections = JoinSet::new();
        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                accepted = self.listener.accept() => {
                    let (stream, peer) = accepted?;
                    let handler = Arc::clone(&self.handler);
                    connections.spawn(async move {
                        let io = TokioIo::new(stream);
                        let service = service_fn(move |req| {
                            let handler = Arc::clone(&handler);
                            async move { Ok::<_, Infallible>(dispatch(handler, req).await) }
                        });
                        if let Err(e) = http1::Builder::new().serve_connection(io, service).await {
                            tracing::debug!(%peer, error = %e, "connection ended with error");
                        }
                    });
                }
                () = &mut shutdown => break,
            }
        }
        tracing::info!("shutting down, draining connections");
        let drain = async {
            while connections.join_next().await.is_some() {}
        };
        if tokio::time::timeout(self.config.shutdown_timeout(), drain)
            .await
            .is_err()
        {
            tracing::warn!("shutdown timeout elapsed with connections still open");
            connections.abort_all();
        }
        Ok(())
    }
}

/// Converts one wire request, runs the pipeline, converts the outcome.
async fn dispatch<H: Handler>(
    handler: Arc<H>,
    request: http::Request<Incoming>,
) -> http::Response<Full<Bytes>> {
    let (parts, body) = request.into_parts();
    let method = parts.method.clone();
    let uri = parts.uri.clone();

    let payload = match body.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            tracing::warn!(%method, %uri, error = %e, "failed to read request body");
            return plain_status(StatusCode::BAD_REQUEST);
        }
    };
    let request = Request::from_parts(
        RequestHead {
            method: parts.method,
            uri: parts.uri,
            headers: parts.headers,
        },
        Body::from_bytes(payload),
    );

    let outcome = handler.respond(request).await;
    let response = match outcome {
        Ok(response) => response,
        Err(Error::Http(e)) => e.to_response(),
        Err(err) => {
            tracing::error!(%method, %uri, %err, "pipeline failed");
            return plain_status(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };
    tracing::info!(%method, %uri, status = response.status().as_u16(), "request served");
    render(response).await
}

async fn render(response: Response) -> http::Response<Full<Bytes>> {
    let (status, headers, body) = response.into_parts();
    let bytes = body.read_all().await;
    let mut out = http::Response::new(Full::new(bytes));
    *out.status_mut() = status;
    *out.headers_mut() = headers;
    out
}

fn plain_status(status: StatusCode) -> http::Response<Full<Bytes>> {
    let mut out = http::Response::new(Full::new(Bytes::new()));
    *out.status_mut() = status;
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServerConfig;
    use palisade_core::FnHandler;
    use palisade_router::{route_path, FallbackHandler, StatusFallback};
    use regex::Regex;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::sync::oneshot;

    async fn raw_request(addr: SocketAddr, payload: &str) -> String {
        let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
        stream.write_all(payload.as_bytes()).await.unwrap();
        let mut out = String::new();
        stream.read_to_string(&mut out).await.unwrap();
        out
    }

    #[tokio::test]
    async fn serves_a_composed_pipeline() {
        let pipeline = FallbackHandler::new(
            route_path(Regex::new("^/hello$").unwrap(), "hi there"),
            StatusFallback,
        );
        let server = Server::new(
            ServerConfig::builder().bind_addr("127.0.0.1:0").build(),
            pipeline,
        );
        let bound = server.bind().await.unwrap();
        let addr = bound.local_addr().unwrap();
        let (stop, stopped) = oneshot::channel::<()>();
        let serving = tokio::spawn(bound.serve(async {
            let _ = stopped.await;
        }));

        let ok = raw_request(
            addr,
            "GET /hello HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
        )
        .await;
        assert!(ok.starts_with("HTTP/1.1 200"));
        assert!(ok.ends_with("hi there"));

        let missing = raw_request(
            addr,
            "GET /nowhere HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
        )
        .await;
        assert!(missing.starts_with("HTTP/1.1 404"));
        assert!(missing.contains("404 Not Found"));

        stop.send(()).unwrap();
        serving.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn unstructured_errors_become_an_empty_500() {
        let pipeline = FnHandler::new(|_| async {
            Err(palisade_core::Error::internal("database exploded"))
        });
        let server = Server::new(
            ServerConfig::builder().bind_addr("127.0.0.1:0").build(),
            pipeline,
        );
        let bound = server.bind().await.unwrap();
        let addr = bound.local_addr().unwrap();
        let (stop, stopped) = oneshot::channel::<()>();
        let serving = tokio::spawn(bound.serve(async {
            let _ = stopped.await;
        }));

        let out = raw_request(
            addr,
            "GET / HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
        )
        .await;
        assert!(out.starts_with("HTTP/1.1 500"));
        // The failure detail stays server-side.
        assert!(!out.contains("database exploded"));

        stop.send(()).unwrap();
        serving.await.unwrap().unwrap();
    }
}
