//! services/api/src/web/middleware.rs
//!
//! The session gate. Runs ahead of all other request processing: resolves
//! the caller's principal once, memoizes it in the request extensions for
//! the rest of that request, and redirects anonymous callers away from
//! protected paths.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use notes_core::domain::Principal;
use regex::Regex;
use std::sync::{Arc, LazyLock};
use tracing::error;

use crate::web::state::AppState;

/// Name of the cookie carrying the access token.
pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

/// The paths that require a resolved principal: note creation plus the
/// dynamic edit-by-id pattern.
static EDIT_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^/notes/[^/]+/edit$").expect("edit path pattern is valid"));

pub fn is_protected_path(path: &str) -> bool {
    path == "/notes/new" || EDIT_PATH.is_match(path)
}

/// The principal resolved for the current request, or `None` for an
/// anonymous caller. Lives in the request extensions, so it is created
/// fresh for every request and cannot leak one caller's identity into
/// another's response.
#[derive(Clone)]
pub struct CurrentUser(pub Option<Principal>);

/// Extracts the access token from the request's cookie header.
pub fn access_token_from_headers(headers: &HeaderMap) -> Option<String> {
    let cookie_header = headers.get(header::COOKIE)?.to_str().ok()?;
    cookie_header.split(';').find_map(|c| {
        c.trim()
            .strip_prefix(ACCESS_TOKEN_COOKIE)?
            .strip_prefix('=')
            .map(|v| v.to_string())
    })
}

/// Gate middleware. Resolution happens exactly once per request; handlers
/// read the memoized `CurrentUser` extension instead of repeating the
/// lookup. The gate itself never mutates persisted state.
pub async fn session_gate(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Response {
    let principal = match access_token_from_headers(req.headers()) {
        // No credentials at all: anonymous, no backend round trip.
        None => None,
        Some(token) => match state.auth.resolve_principal(&token).await {
            Ok(principal) => principal,
            Err(e) => {
                // A failed lookup degrades to anonymous rather than taking
                // the whole request down.
                error!(error = %e, "failed to resolve principal");
                None
            }
        },
    };

    let anonymous = principal.is_none();
    req.extensions_mut().insert(CurrentUser(principal));

    if anonymous && is_protected_path(req.uri().path()) {
        return Redirect::to("/login").into_response();
    }

    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn protects_creation_and_edit_paths() {
        assert!(is_protected_path("/notes/new"));
        assert!(is_protected_path("/notes/abc-123/edit"));
        assert!(is_protected_path(
            "/notes/0c8c1234-9c69-4c57-a43c-6a2d0e5c2f1a/edit"
        ));
    }

    #[test]
    fn leaves_other_paths_open() {
        assert!(!is_protected_path("/"));
        assert!(!is_protected_path("/login"));
        assert!(!is_protected_path("/notes"));
        assert!(!is_protected_path("/notes/abc-123"));
        assert!(!is_protected_path("/notes/abc/123/edit"));
        assert!(!is_protected_path("/notes/new/edit/extra"));
    }

    #[test]
    fn reads_the_access_token_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; access_token=tok-1; lang=ja"),
        );
        assert_eq!(access_token_from_headers(&headers), Some("tok-1".into()));
    }

    #[test]
    fn ignores_missing_or_foreign_cookies() {
        assert_eq!(access_token_from_headers(&HeaderMap::new()), None);

        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("theme=dark"));
        assert_eq!(access_token_from_headers(&headers), None);

        // A cookie whose name merely starts with the expected name does not match.
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("access_token_old=stale"),
        );
        assert_eq!(access_token_from_headers(&headers), None);
    }
}
