//! The query server: answers every request with the current resolved state as JSON.
//!
//! It does no per-request work besides encoding the record held by the [`StateStore`], so it
//! keeps answering while a refresh cycle is waiting on the YouTube API.

use crate::state::StateStore;
use bytes::Bytes;
use eyre::Context;
use http::header::{self, HeaderValue};
use http::{Method, StatusCode};
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::{Request, Response};
use hyper_util::rt::TokioIo;
use hyper_util::service::TowerToHyperService;
use std::convert::Infallible;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinSet;
use tower::{Service, ServiceBuilder};
use tower_http::cors::{AllowHeaders, Any, CorsLayer};

/// Browsers may cache a preflight result for a day.
const PREFLIGHT_MAX_AGE: Duration = Duration::from_secs(24 * 60 * 60);

/// Cross-origin policy for the query server.
///
/// `allowed_origin` is sent as `Access-Control-Allow-Origin`; `*` allows any origin. Preflights
/// get the request's own `Access-Control-Request-Headers` back as allowed headers.
pub fn cors_layer(allowed_origin: &str) -> eyre::Result<CorsLayer> {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::HEAD, Method::OPTIONS])
        .allow_headers(AllowHeaders::mirror_request())
        .max_age(PREFLIGHT_MAX_AGE);
    if allowed_origin == "*" {
        return Ok(cors.allow_origin(Any));
    }
    let origin = HeaderValue::from_str(allowed_origin)
        .with_context(|| format!("allowed origin is not a valid header value: {allowed_origin:?}"))?;
    Ok(cors.allow_origin(origin))
}

/// Builds the response to one non-preflight request.
fn respond<B>(req: &Request<B>, store: &StateStore) -> Response<Full<Bytes>> {
    let mut response = match store.to_json() {
        Ok(body) => {
            let mut response = Response::new(Full::new(Bytes::from(body)));
            response.headers_mut().insert(
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/json"),
            );
            response
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to encode resolved state");
            let mut response = Response::new(Full::default());
            *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
            response
        }
    };
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    tracing::debug!(
        method = %req.method(),
        path = req.uri().path(),
        status = response.status().as_u16(),
        "served request"
    );
    response
}

/// The per-connection service: CORS in front of [`respond`].
fn state_service<B>(
    store: StateStore,
    cors: CorsLayer,
) -> impl Service<Request<B>, Response = Response<Full<Bytes>>, Error = Infallible, Future: Send>
+ Clone
+ Send
+ 'static
where
    B: Send + 'static,
{
    ServiceBuilder::new()
        .layer(cors)
        .service_fn(move |req: Request<B>| {
            let response = respond(&req, &store);
            async move { Ok::<_, Infallible>(response) }
        })
}

/// Resolves once `shutdown` turns `true`. Never resolves if the sender is gone.
async fn wait_for_shutdown(shutdown: &mut watch::Receiver<bool>) {
    if shutdown.wait_for(|stop| *stop).await.is_err() {
        std::future::pending::<()>().await;
    }
}

/// Serves the current state on `listener` until `shutdown` turns `true`.
///
/// Each connection is served on its own task. On shutdown the listener stops accepting, open
/// connections finish their in-flight request and are closed, and this returns once they are.
pub async fn serve(
    listener: TcpListener,
    store: StateStore,
    cors: CorsLayer,
    mut shutdown: watch::Receiver<bool>,
) -> eyre::Result<()> {
    let addr = listener.local_addr().context("get local address")?;
    tracing::info!(%addr, "query server listening");

    let service = state_service::<Incoming>(store, cors);
    let mut connections = JoinSet::new();
    loop {
        tokio::select! {
            accepted = listener.accept() => {
                let (conn, peer) = match accepted {
                    Ok(accepted) => accepted,
                    Err(e) => {
                        tracing::warn!(error = %e, "failed to accept connection");
                        continue;
                    }
                };
                tracing::trace!(%peer, "accepted connection");

                let service = TowerToHyperService::new(service.clone());
                let mut shutdown = shutdown.clone();
                connections.spawn(async move {
                    let mut serve = std::pin::pin!(
                        hyper::server::conn::http1::Builder::new()
                            .serve_connection(TokioIo::new(conn), service)
                    );

                    let result = tokio::select! {
                        result = &mut serve => result,
                        _ = wait_for_shutdown(&mut shutdown) => {
                            serve.as_mut().graceful_shutdown();
                            serve.await
                        }
                    };
                    if let Err(e) = result {
                        tracing::debug!(%peer, error = %e, "connection closed with error");
                    }
                });
            }
            Some(_) = connections.join_next(), if !connections.is_empty() => {}
            _ = wait_for_shutdown(&mut shutdown) => {
                tracing::info!(%addr, "query server shutting down");
                break;
            }
        }
    }

    drop(listener);
    while connections.join_next().await.is_some() {}
    Ok(())
}
