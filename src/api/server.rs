use crate::api::server_config::*;
use axum::{
    http::{header, HeaderValue, Method},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower::{limit::ConcurrencyLimitLayer, timeout::TimeoutLayer, ServiceBuilder};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};

use crate::api::errors::ApiError;
use crate::api::handlers;
use crate::auth::{
    api::create_auth_routes,
    core::{PasswordService, TokenService},
    AccessGuard, AuthConfig, AuthError, CredentialStore, SessionManager, SessionStore,
};
use crate::storage::{DocumentStore, Documents};
use axum::error_handling::HandleErrorLayer;
use tower::BoxError;

/// Store handles shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub documents: Documents,
    pub sessions: Arc<dyn SessionStore>,
    pub guard: AccessGuard,
    pub passwords: PasswordService,
    pub session_manager: Arc<SessionManager>,
}

impl AppState {
    pub fn new(
        document_store: Arc<dyn DocumentStore>,
        sessions: Arc<dyn SessionStore>,
        auth: &AuthConfig,
    ) -> Result<Self, AuthError> {
        let documents = Documents::new(document_store);
        let passwords = PasswordService::new(auth.bcrypt_cost);
        let session_manager = Arc::new(SessionManager::new(
            CredentialStore::new(documents.clone()),
            sessions.clone(),
            passwords,
            TokenService::new(auth.token_ttl_secs),
        )?);

        Ok(Self {
            documents,
            guard: AccessGuard::new(sessions.clone()),
            sessions,
            passwords,
            session_manager,
        })
    }
}

#[derive(Clone)]
pub struct ApiServer {
    pub state: AppState,
    pub host: String,
    pub port: u16,
    pub cors_allow_origin: String,
    pub request_timeout: Duration,
}

impl ApiServer {
    pub fn new(state: AppState, host: String, port: u16, cors_allow_origin: String) -> Self {
        Self {
            state,
            host,
            port,
            cors_allow_origin,
            request_timeout: REQUEST_TIMEOUT,
        }
    }

    /// Override the whole-request timeout
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn create_router(&self) -> anyhow::Result<Router> {
        let resources = Router::new()
            .route("/status", get(handlers::index::status))
            .route("/stats", get(handlers::index::stats))
            .route(
                "/users",
                get(handlers::users::list_users).post(handlers::users::create_user),
            )
            .route("/users/me", get(handlers::users::get_me))
            .route(
                "/users/:id",
                get(handlers::users::get_user)
                    .put(handlers::users::update_user)
                    .delete(handlers::users::delete_user),
            )
            .route("/communities", post(handlers::communities::create_community))
            .route("/communities/:id", get(handlers::communities::get_community))
            .route(
                "/communities/:id/join",
                post(handlers::communities::join_community),
            )
            .route("/posts", post(handlers::posts::create_post))
            .route(
                "/posts/:id",
                get(handlers::posts::get_post).delete(handlers::posts::delete_post),
            )
            .with_state(self.state.clone());

        // Auth routes carry their own state
        let api = resources.merge(create_auth_routes(self.state.session_manager.clone()));

        let app = Router::new()
            .nest(API_PREFIX, api)
            .fallback(route_not_found)
            .layer(
                ServiceBuilder::new()
                    // Convert middleware errors (timeout/overload) into HTTP responses
                    .layer(HandleErrorLayer::new(|err: BoxError| async move {
                        if err.is::<tower::timeout::error::Elapsed>() {
                            AuthError::ServiceUnavailable("request timed out".to_string())
                        } else {
                            AuthError::ServiceUnavailable(format!("service overloaded: {}", err))
                        }
                    }))
                    .layer(ConcurrencyLimitLayer::new(MAX_CONCURRENCY))
                    .layer(RequestBodyLimitLayer::new(MAX_BODY_SIZE))
                    .layer(TimeoutLayer::new(self.request_timeout))
                    .layer(TraceLayer::new_for_http()),
            )
            .layer(cors_layer(&self.cors_allow_origin)?);

        Ok(app)
    }

    pub async fn start(self) -> Result<(), anyhow::Error> {
        let app = self.create_router()?;
        let addr = format!("{}:{}", self.host, self.port);
        tracing::info!("Server listening on {}", addr);
        let listener = TcpListener::bind(&addr).await?;
        axum::serve(listener, app.into_make_service()).await?;
        Ok(())
    }
}

async fn route_not_found() -> impl IntoResponse {
    ApiError::NotFound("Route")
}

/// `*` allows any origin without credentials; otherwise a comma-separated list
fn cors_layer(origins: &str) -> anyhow::Result<CorsLayer> {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .max_age(CORS_MAX_AGE);

    if origins.trim() == "*" {
        return Ok(layer.allow_origin(AllowOrigin::any()));
    }

    let list = origins
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            HeaderValue::from_str(s)
                .map_err(|e| anyhow::anyhow!("invalid CORS origin {:?}: {}", s, e))
        })
        .collect::<anyhow::Result<Vec<HeaderValue>>>()?;

    Ok(layer
        .allow_origin(AllowOrigin::list(list))
        .allow_credentials(true))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cors_origins() {
        assert!(cors_layer("*").is_ok());
        assert!(cors_layer("http://localhost:3000, https://example.com").is_ok());
        assert!(cors_layer("http://bad\norigin").is_err());
    }
}
