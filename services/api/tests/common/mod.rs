//! Shared test fixtures: a stub auth backend and a router wired to the
//! in-memory repository, so the web layer is exercised with zero I/O.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use api_lib::config::{Config, NotesBackend};
use api_lib::web::state::AppState;
use async_trait::async_trait;
use axum::Router;
use notes_core::domain::{Principal, SessionTokens};
use notes_core::ports::{AuthService, NotesRepository, PortError, PortResult};
use notes_core::testing::InMemoryNotesRepository;
use uuid::Uuid;

/// An auth backend stub resolving every token to a fixed principal (or to
/// anonymous), counting lookups so tests can assert per-request memoization.
pub struct StubAuthService {
    principal: Option<Principal>,
    resolve_calls: AtomicUsize,
}

impl StubAuthService {
    pub fn anonymous() -> Self {
        Self {
            principal: None,
            resolve_calls: AtomicUsize::new(0),
        }
    }

    pub fn signed_in() -> Self {
        Self {
            principal: Some(Principal {
                id: Uuid::new_v4(),
                email: Some("user@example.com".to_string()),
            }),
            resolve_calls: AtomicUsize::new(0),
        }
    }

    pub fn resolve_calls(&self) -> usize {
        self.resolve_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AuthService for StubAuthService {
    async fn resolve_principal(&self, _access_token: &str) -> PortResult<Option<Principal>> {
        self.resolve_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.principal.clone())
    }

    async fn sign_in_url(&self, origin: &str) -> PortResult<String> {
        Ok(format!(
            "https://auth.example.com/authorize?redirect_to={origin}/auth/callback"
        ))
    }

    async fn exchange_code(&self, code: &str) -> PortResult<SessionTokens> {
        if code == "valid-code" {
            Ok(SessionTokens {
                access_token: "stub-access".to_string(),
                refresh_token: "stub-refresh".to_string(),
                expires_in: 3600,
            })
        } else {
            Err(PortError::Unauthorized)
        }
    }

    async fn sign_out(&self, _access_token: &str) -> PortResult<()> {
        Ok(())
    }
}

fn test_config() -> Config {
    Config {
        bind_address: "127.0.0.1:0".parse().unwrap(),
        log_level: tracing::Level::INFO,
        backend: NotesBackend::Postgres,
        database_url: Some("postgres://unused".to_string()),
        d1_endpoint: None,
        d1_api_token: None,
        auth_url: "https://auth.example.com".to_string(),
        auth_anon_key: "anon-key".to_string(),
        cors_origin: "http://localhost:3000".to_string(),
    }
}

pub fn test_router(
    repo: Arc<InMemoryNotesRepository>,
    auth: Arc<StubAuthService>,
) -> Router {
    let repo: Arc<dyn NotesRepository> = repo;
    let auth: Arc<dyn AuthService> = auth;
    api_lib::build_router(Arc::new(AppState {
        repo,
        auth,
        config: Arc::new(test_config()),
    }))
}
