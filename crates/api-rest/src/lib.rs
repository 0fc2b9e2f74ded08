//! # API REST
//!
//! REST API implementation for the hospital middleware.
//!
//! Handles:
//! - HTTP endpoints with axum (staff registration/login, patient search)
//! - Bearer-token extraction on the protected search route
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON envelopes, CORS)
//!
//! Uses `api-shared` for authentication and common wire types.

#![warn(rust_2018_idioms)]

mod auth;
mod handlers;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use api_shared::{ApiResponse, AuthResponse, StaffCreateRequest, StaffLoginRequest};
use hmw_core::{CoreConfig, Patient, SearchRouter, StaffStore};

/// Application state shared across REST API handlers.
#[derive(Clone)]
pub struct AppState {
    pub cfg: Arc<CoreConfig>,
    pub staff: StaffStore,
    pub search: Arc<SearchRouter>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health,
        handlers::create_staff,
        handlers::login_staff,
        handlers::search_patient,
    ),
    components(schemas(
        ApiResponse,
        AuthResponse,
        StaffCreateRequest,
        StaffLoginRequest,
        Patient,
    ))
)]
struct ApiDoc;

/// Build the application router.
///
/// `/staff/*` routes are public; `/patient/search` requires a bearer token.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/staff/create", post(handlers::create_staff))
        .route("/staff/login", post(handlers::login_staff))
        .route("/patient/search", get(handlers::search_patient))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
