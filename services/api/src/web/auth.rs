//! services/api/src/web/auth.rs
//!
//! Authentication endpoints: provider sign-in redirect, the OAuth callback
//! that exchanges the one-time code for a session, and logout.

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Json, Redirect},
    Extension,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;
use uuid::Uuid;

use crate::web::middleware::{access_token_from_headers, CurrentUser, ACCESS_TOKEN_COOKIE};
use crate::web::state::AppState;

const AUTH_FAILED_REDIRECT: &str = "/login?error=auth_failed";

#[derive(Serialize)]
pub struct PrincipalResponse {
    pub id: Uuid,
    pub email: Option<String>,
}

/// GET /auth/me - the principal resolved for this request, or `null`.
/// Reads the identity the session gate memoized in the request extensions;
/// no second lookup against the auth backend happens here.
pub async fn me_handler(
    Extension(CurrentUser(principal)): Extension<CurrentUser>,
) -> Json<Option<PrincipalResponse>> {
    Json(principal.map(|p| PrincipalResponse {
        id: p.id,
        email: p.email,
    }))
}

/// Derives the request origin for the provider's callback URL.
fn request_origin(headers: &HeaderMap) -> Option<String> {
    if let Some(origin) = headers.get(header::ORIGIN).and_then(|v| v.to_str().ok()) {
        return Some(origin.to_string());
    }
    headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .map(|host| format!("http://{host}"))
}

/// GET /auth/login - redirect the caller to the third-party sign-in page.
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let Some(origin) = request_origin(&headers) else {
        return Redirect::to(AUTH_FAILED_REDIRECT).into_response();
    };

    match state.auth.sign_in_url(&origin).await {
        Ok(url) => Redirect::to(&url).into_response(),
        Err(e) => {
            error!(error = %e, "failed to build sign-in URL");
            Redirect::to(AUTH_FAILED_REDIRECT).into_response()
        }
    }
}

#[derive(Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
}

/// GET /auth/callback - exchange the one-time code for a session and set
/// the access-token cookie. With no code, or on a failed exchange, the
/// caller lands back on the login page.
pub async fn callback_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CallbackParams>,
) -> impl IntoResponse {
    let Some(code) = params.code else {
        return Redirect::to("/").into_response();
    };

    match state.auth.exchange_code(&code).await {
        Ok(tokens) => {
            let cookie = format!(
                "{}={}; HttpOnly; Secure; SameSite=Lax; Path=/; Max-Age={}",
                ACCESS_TOKEN_COOKIE, tokens.access_token, tokens.expires_in
            );
            ([(header::SET_COOKIE, cookie)], Redirect::to("/")).into_response()
        }
        Err(e) => {
            error!(error = %e, "code exchange failed");
            Redirect::to(AUTH_FAILED_REDIRECT).into_response()
        }
    }
}

/// POST /auth/logout - terminate the session and clear the cookie.
pub async fn logout_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    if let Some(token) = access_token_from_headers(&headers) {
        state.auth.sign_out(&token).await.map_err(|e| {
            error!(error = %e, "failed to sign out");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to logout".to_string(),
            )
        })?;
    }

    let cookie = format!(
        "{}=; HttpOnly; Secure; SameSite=Lax; Path=/; Max-Age=0",
        ACCESS_TOKEN_COOKIE
    );
    Ok(([(header::SET_COOKIE, cookie)], Redirect::to("/")))
}
