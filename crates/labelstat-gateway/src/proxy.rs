//! Reverse proxy to the model server.
//!
//! Requests are forwarded as-is. The upstream response body is streamed
//! through the label filter and released to the client only once the filter
//! has seen the whole body, or once it gives up on a body over
//! `upstream.max_body_bytes`. Status, headers and bytes reach the client
//! unmodified whatever the filter decides.

use std::time::Instant;

use axum::{
    body::{to_bytes, Body},
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};

use futures_util::{stream, StreamExt};

use crate::app_state::AppState;
use crate::filter::{filter_stream, outcome_label, Filtered};

const MAX_REQUEST_BYTES: usize = 16 * 1024 * 1024;

fn strip_hop_by_hop(headers: &mut HeaderMap) {
    for name in [
        header::CONNECTION,
        header::PROXY_AUTHENTICATE,
        header::PROXY_AUTHORIZATION,
        header::TE,
        header::TRAILER,
        header::TRANSFER_ENCODING,
        header::UPGRADE,
        header::HOST,
    ] {
        headers.remove(name);
    }
    headers.remove("keep-alive");
}

fn upstream_error(app: &AppState, reason: &str, msg: String) -> Response {
    app.metrics().upstream_errors.inc(&[("reason", reason)]);
    tracing::warn!(reason, "{msg}");
    (StatusCode::BAD_GATEWAY, "upstream unavailable").into_response()
}

pub async fn forward(State(app): State<AppState>, req: Request) -> Response {
    let (parts, body) = req.into_parts();
    let body = match to_bytes(body, MAX_REQUEST_BYTES).await {
        Ok(b) => b,
        Err(e) => {
            tracing::warn!("request body rejected: {e}");
            return (StatusCode::PAYLOAD_TOO_LARGE, "request body too large").into_response();
        }
    };

    let path = parts.uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");
    let url = format!("{}{}", app.cfg().upstream.base(), path);
    let mut headers = parts.headers;
    strip_hop_by_hop(&mut headers);

    let started = Instant::now();
    let resp = match app
        .client()
        .request(parts.method, &url)
        .headers(headers)
        .body(body)
        .send()
        .await
    {
        Ok(r) => r,
        Err(e) => {
            let reason = if e.is_timeout() {
                "timeout"
            } else if e.is_connect() {
                "connect"
            } else {
                "request"
            };
            return upstream_error(&app, reason, format!("upstream request to {url} failed: {e}"));
        }
    };

    let status = resp.status();
    let mut resp_headers = resp.headers().clone();
    strip_hop_by_hop(&mut resp_headers);

    let filtered = match filter_stream(
        app.registry(),
        app.tags(),
        app.cfg().upstream.max_body_bytes,
        Box::pin(resp.bytes_stream()),
    )
    .await
    {
        Ok(f) => f,
        Err(e) => return upstream_error(&app, "body", e.to_string()),
    };
    app.metrics()
        .upstream_duration
        .observe(&[("status", status.as_str())], started.elapsed());
    app.metrics().proxied_responses.inc(&[("status", status.as_str())]);
    if let Some(outcome) = filtered.outcome() {
        app.metrics()
            .filter_outcomes
            .inc(&[("outcome", outcome_label(&outcome))]);
    }

    let body = match filtered {
        Filtered::Complete { body, .. } => Body::from(body),
        Filtered::Empty => Body::empty(),
        Filtered::Overflow { head, rest } => {
            Body::from_stream(stream::iter([Ok::<_, reqwest::Error>(head)]).chain(rest))
        }
    };

    let mut out = Response::new(body);
    *out.status_mut() = status;
    *out.headers_mut() = resp_headers;
    out
}
