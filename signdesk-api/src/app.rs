/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use signdesk_api::{app::AppState, config::Config};
/// use signdesk_shared::store::Storage;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let state = AppState::new(Storage::new(), config);
/// let app = signdesk_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, middleware::security::SecurityHeadersLayer};
use axum::{
    http::{header, HeaderValue, Method},
    routing::{delete, get, post, put},
    Router,
};
use signdesk_shared::store::Storage;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// In-memory stores and placement engine
    pub storage: Arc<Storage>,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(storage: Storage, config: Config) -> Self {
        Self {
            storage: Arc::new(storage),
            config: Arc::new(config),
        }
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                                  # Health check
/// └── /v1/
///     ├── /users
///     │   ├── POST   /
///     │   ├── GET    /:id
///     │   ├── GET    /:id/signatures
///     │   └── GET    /:id/documents
///     ├── /signatures
///     │   ├── POST   /
///     │   ├── GET    /:id
///     │   └── DELETE /:id                      # cascades to placements
///     ├── /documents
///     │   ├── POST   /
///     │   ├── GET    /:id
///     │   ├── DELETE /:id                      # cascades to placements
///     │   ├── PUT    /:id/status
///     │   ├── GET    /:id/placements
///     │   ├── POST   /:id/placements           # apply or reposition
///     │   ├── DELETE /:id/placements
///     │   ├── POST   /:id/placements/all-pages
///     │   └── DELETE /:id/pages/:page/placements
///     └── /placements
///         ├── PUT    /:id/position
///         └── DELETE /:id
/// ```
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
/// 3. Security headers
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    let user_routes = Router::new()
        .route("/", post(routes::users::create_user))
        .route("/:id", get(routes::users::get_user))
        .route("/:id/signatures", get(routes::signatures::list_user_signatures))
        .route("/:id/documents", get(routes::documents::list_user_documents));

    let signature_routes = Router::new()
        .route("/", post(routes::signatures::create_signature))
        .route(
            "/:id",
            get(routes::signatures::get_signature).delete(routes::signatures::delete_signature),
        );

    let document_routes = Router::new()
        .route("/", post(routes::documents::create_document))
        .route(
            "/:id",
            get(routes::documents::get_document).delete(routes::documents::delete_document),
        )
        .route("/:id/status", put(routes::documents::update_document_status))
        .route(
            "/:id/placements",
            get(routes::placements::list_placements)
                .post(routes::placements::apply_signature)
                .delete(routes::placements::remove_document_placements),
        )
        .route(
            "/:id/placements/all-pages",
            post(routes::placements::apply_to_all_pages),
        )
        .route(
            "/:id/pages/:page/placements",
            delete(routes::placements::remove_page_placements),
        );

    let placement_routes = Router::new()
        .route("/:id/position", put(routes::placements::reposition_placement))
        .route("/:id", delete(routes::placements::remove_placement));

    let v1_routes = Router::new()
        .nest("/users", user_routes)
        .nest("/signatures", signature_routes)
        .nest("/documents", document_routes)
        .nest("/placements", placement_routes);

    let cors = cors_layer(&state.config);
    let production = state.config.api.production;

    Router::new()
        .merge(health_routes)
        .nest("/v1", v1_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .layer(SecurityHeadersLayer::new(production))
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    if config.api.cors_origins.iter().any(|origin| origin == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .api
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(std::time::Duration::from_secs(3600))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiConfig;
    use axum::{body::Body, extract::Request, http::StatusCode};
    use tower::Service as _;

    fn config(origins: &[&str]) -> Config {
        Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors_origins: origins.iter().map(|o| o.to_string()).collect(),
                production: false,
            },
        }
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let mut app = build_router(AppState::new(Storage::new(), config(&["*"])));

        let response = app
            .call(Request::builder().uri("/v2/nothing").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_cors_allows_configured_origin() {
        let mut app = build_router(AppState::new(
            Storage::new(),
            config(&["http://localhost:5173"]),
        ));

        let response = app
            .call(
                Request::builder()
                    .uri("/health")
                    .header("origin", "http://localhost:5173")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response.headers().get("access-control-allow-origin").unwrap(),
            "http://localhost:5173"
        );
    }
}
