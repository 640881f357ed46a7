//! # Access Guard
//!
//! Decides, per navigation request, whether to forward it to the page server or
//! redirect it somewhere else.
//!
//!
//!
//! ## Classification
//! - Auth-only paths: `/login`, `/signup`. Only meant for users without a session.
//! - Public paths: `/`. Anyone gets through.
//! - Everything else is protected and needs a session cookie.
//!
//! Matching is exact on the pathname. No prefixes, no trailing slash folding,
//! the query string is never looked at.
//!
//!
//!
//! ## Outcomes
//!
//! | Path          | Cookie  | Outcome                  |
//! |---------------|---------|--------------------------|
//! | auth-only     | present | redirect to `/dashboard` |
//! | protected     | absent  | redirect to `/login`     |
//! | anything else |         | forward                  |
//!
//!
//!
//! ## Trust
//! The `token` cookie is only checked for **presence**. No signature, no expiry,
//! no decoding. A forged cookie gets forwarded, and the backend is the one that
//! actually verifies it when the page calls the API.
use std::{fmt, sync::Arc};

use axum::{
    extract::{Request, State as Shared},
    http::{HeaderMap, Uri, header::COOKIE},
    middleware::Next,
    response::{IntoResponse, Redirect as RedirectResponse, Response},
};
use tracing::debug;

use crate::state::State;

pub const SESSION_COOKIE: &str = "token";

pub const LOGIN_PATH: &str = "/login";
pub const DASHBOARD_PATH: &str = "/dashboard";

pub const AUTH_PATHS: [&str; 2] = [LOGIN_PATH, "/signup"];
pub const PUBLIC_PATHS: [&str; 1] = ["/"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redirect {
    Login,
    Dashboard,
}

impl Redirect {
    pub fn path(self) -> &'static str {
        match self {
            Redirect::Login => LOGIN_PATH,
            Redirect::Dashboard => DASHBOARD_PATH,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Forward,
    Redirect(Redirect),
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Forward => write!(f, "forward"),
            Decision::Redirect(target) => write!(f, "redirect {}", target.path()),
        }
    }
}

/// Built fresh for every request and dropped once a [`Decision`] exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationRequest {
    pub path: String,
    pub has_session_cookie: bool,
}

impl NavigationRequest {
    pub fn new(path: impl Into<String>, has_session_cookie: bool) -> Self {
        Self {
            path: path.into(),
            has_session_cookie,
        }
    }

    pub fn from_parts(uri: &Uri, headers: &HeaderMap) -> Self {
        Self::new(uri.path(), has_session_cookie(headers))
    }

    pub fn evaluate(&self) -> Decision {
        evaluate(&self.path, self.has_session_cookie)
    }
}

pub fn is_auth_path(path: &str) -> bool {
    AUTH_PATHS.contains(&path)
}

pub fn is_public_path(path: &str) -> bool {
    PUBLIC_PATHS.contains(&path)
}

pub fn evaluate(path: &str, has_session_cookie: bool) -> Decision {
    let is_auth = is_auth_path(path);

    if !is_auth && !is_public_path(path) && !has_session_cookie {
        return Decision::Redirect(Redirect::Login);
    }

    if is_auth && has_session_cookie {
        return Decision::Redirect(Redirect::Dashboard);
    }

    Decision::Forward
}

/// An empty `token=` counts as no cookie at all.
pub fn has_session_cookie(headers: &HeaderMap) -> bool {
    session_cookie(headers).is_some_and(|value| !value.is_empty())
}

/// Raw value of the last `token` pair across all `Cookie` headers.
///
/// Pairs are split on `;` with only the spaces after it skipped, names compare
/// byte for byte, and a bare `token` without `=` reads as `true`. Bytes outside
/// visible ASCII elsewhere in the header do not hide the pair.
fn session_cookie(headers: &HeaderMap) -> Option<&[u8]> {
    headers
        .get_all(COOKIE)
        .iter()
        .flat_map(|value| value.as_bytes().split(|&byte| byte == b';'))
        .map(skip_spaces)
        .filter(|pair| !pair.is_empty())
        .filter_map(|pair| match pair.iter().position(|&byte| byte == b'=') {
            Some(at) => (&pair[..at] == SESSION_COOKIE.as_bytes()).then(|| &pair[at + 1..]),
            None => (pair == SESSION_COOKIE.as_bytes()).then_some(b"true".as_slice()),
        })
        .last()
}

fn skip_spaces(pair: &[u8]) -> &[u8] {
    let start = pair
        .iter()
        .position(|&byte| byte != b' ')
        .unwrap_or(pair.len());

    &pair[start..]
}

pub async fn access_guard(
    Shared(state): Shared<Arc<State>>,
    request: Request,
    next: Next,
) -> Response {
    if !state.matcher.is_guarded(request.uri().path()) {
        return next.run(request).await;
    }

    let navigation = NavigationRequest::from_parts(request.uri(), request.headers());

    match navigation.evaluate() {
        Decision::Forward => next.run(request).await,
        Decision::Redirect(target) => {
            debug!("Redirecting {} to {}", navigation.path, target.path());

            RedirectResponse::temporary(target.path()).into_response()
        }
    }
}
