//! # Proxy
//!
//! Forwards a request the guard let through to the page server, unmodified.
//!
//! - Method, path, query, headers and body go upstream as received
//! - Hop-by-hop headers are dropped both ways, `Host` is set by the client
//! - Upstream redirects are handed back to the browser, never followed here
//! - Response body is streamed back instead of buffered
//!
//! Request bodies are buffered though, capped at [`MAX_BODY_BYTES`]. Pages only
//! post small forms here since uploads go straight to the blog backend.
use std::{error::Error, sync::Arc};

use axum::{
    body::{Body, to_bytes},
    extract::Request,
    http::{
        HeaderMap, HeaderName,
        header::{CONTENT_LENGTH, HOST},
    },
    response::Response,
};
use http_body_util::LengthLimitError;
use tracing::debug;

use crate::{error::AppError, state::State};

pub const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

const HOP_BY_HOP: [&str; 8] = [
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

fn is_hop_by_hop(name: &HeaderName) -> bool {
    HOP_BY_HOP.contains(&name.as_str())
}

fn request_headers(headers: &HeaderMap) -> HeaderMap {
    let mut forwarded = HeaderMap::with_capacity(headers.len());

    for (name, value) in headers {
        if is_hop_by_hop(name) || name == HOST || name == CONTENT_LENGTH {
            continue;
        }

        forwarded.append(name.clone(), value.clone());
    }

    forwarded
}

fn declared_length(headers: &HeaderMap) -> Option<usize> {
    headers
        .get(CONTENT_LENGTH)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}

pub fn upstream_url(base: &str, request: &Request) -> String {
    let path_and_query = request
        .uri()
        .path_and_query()
        .map(|path_and_query| path_and_query.as_str())
        .unwrap_or("/");

    format!("{}{}", base.trim_end_matches('/'), path_and_query)
}

/// A chunked body with no `Content-Length` only trips the cap while buffering.
fn exceeds_limit(error: &(dyn Error + 'static)) -> bool {
    let mut current = Some(error);

    while let Some(error) = current {
        if error.is::<LengthLimitError>() {
            return true;
        }
        current = error.source();
    }

    false
}

pub async fn forward(state: Arc<State>, request: Request) -> Result<Response, AppError> {
    if declared_length(request.headers()).is_some_and(|length| length > MAX_BODY_BYTES) {
        return Err(AppError::PayloadTooLarge);
    }

    let url = upstream_url(&state.config.upstream_url, &request);
    let (parts, body) = request.into_parts();

    let body = to_bytes(body, MAX_BODY_BYTES).await.map_err(|e| {
        if exceeds_limit(&e) {
            AppError::PayloadTooLarge
        } else {
            AppError::BadRequest(e.to_string())
        }
    })?;

    debug!("Forwarding {} {url}", parts.method);

    let upstream = state
        .http
        .request(parts.method, &url)
        .headers(request_headers(&parts.headers))
        .body(body)
        .send()
        .await?;

    let mut response = Response::builder().status(upstream.status());

    if let Some(headers) = response.headers_mut() {
        for (name, value) in upstream.headers() {
            if !is_hop_by_hop(name) {
                headers.append(name.clone(), value.clone());
            }
        }
    }

    response
        .body(Body::from_stream(upstream.bytes_stream()))
        .map_err(|e| AppError::InternalError(e.into()))
}
