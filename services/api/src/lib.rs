pub mod adapters;
pub mod config;
pub mod error;
pub mod web;

use std::sync::Arc;

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

use crate::web::state::AppState;

/// Builds the application router: note routes, auth routes, and the session
/// gate layered ahead of everything else.
pub fn build_router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/notes",
            get(web::list_notes_handler).post(web::create_note_handler),
        )
        // Static segment wins over the dynamic one, so /notes/new does not
        // collide with /notes/{id}.
        .route("/notes/new", get(web::notes::new_note_handler))
        .route(
            "/notes/{id}",
            get(web::get_note_handler).post(web::update_note_handler),
        )
        .route("/notes/{id}/edit", get(web::notes::edit_note_handler))
        .route("/notes/{id}/delete", post(web::delete_note_handler))
        .route("/auth/me", get(web::auth::me_handler))
        .route("/auth/login", get(web::auth::login_handler))
        .route("/auth/callback", get(web::auth::callback_handler))
        .route("/auth/logout", post(web::auth::logout_handler))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            web::session_gate,
        ))
        .with_state(app_state)
}

/// Adds the CORS layer configured for the given origin.
pub fn cors_layer(origin: &str) -> CorsLayer {
    use axum::http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    };

    let origin = origin
        .parse::<HeaderValue>()
        .unwrap_or_else(|_| HeaderValue::from_static("http://localhost:3000"));
    CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT])
}
