//! REST endpoint handlers.

use crate::auth::AuthStaff;
use crate::AppState;
use api_shared::{auth, ApiResponse, AuthResponse, StaffCreateRequest, StaffLoginRequest};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use hmw_core::{PatientSearchQuery, SearchError, StaffContext};
use serde_json::json;

type Reply = (StatusCode, Json<ApiResponse>);

fn success(status: StatusCode, data: serde_json::Value) -> Reply {
    (status, Json(ApiResponse::success(reason(status), data)))
}

fn failure(status: StatusCode, message: &str) -> Reply {
    (status, Json(ApiResponse::error(reason(status), message)))
}

fn reason(status: StatusCode) -> &'static str {
    status.canonical_reason().unwrap_or("Unknown")
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = ApiResponse)
    )
)]
/// Health check endpoint used for monitoring and load balancer probes.
#[axum::debug_handler]
pub(crate) async fn health() -> Reply {
    (
        StatusCode::OK,
        Json(ApiResponse {
            status: "OK".into(),
            message: "hospital middleware API is alive".into(),
            data: None,
        }),
    )
}

#[utoipa::path(
    post,
    path = "/staff/create",
    request_body = StaffCreateRequest,
    responses(
        (status = 201, description = "Staff created, token issued", body = ApiResponse),
        (status = 400, description = "Missing required fields"),
        (status = 500, description = "Internal server error")
    )
)]
/// Register a staff member and return a signed token for the new identity.
///
/// # Errors
/// Returns `400 Bad Request` when username, password or hospital is blank and
/// `500 Internal Server Error` when hashing, persistence or signing fails.
#[axum::debug_handler]
pub(crate) async fn create_staff(
    State(state): State<AppState>,
    Json(req): Json<StaffCreateRequest>,
) -> Reply {
    if req.username.is_empty() || req.password.is_empty() || req.hospital.is_empty() {
        return failure(
            StatusCode::BAD_REQUEST,
            "Username, password, and hospital are required",
        );
    }

    let password_hash = match auth::hash_password(&req.password) {
        Ok(hash) => hash,
        Err(err) => {
            tracing::error!("Password hashing error: {err:?}");
            return failure(StatusCode::INTERNAL_SERVER_ERROR, "Error hashing password");
        }
    };

    let staff_id = match state
        .staff
        .create(&req.username, &password_hash, &req.hospital)
        .await
    {
        Ok(id) => id,
        Err(err) => {
            tracing::error!("Create staff error: {err:?}");
            return failure(StatusCode::INTERNAL_SERVER_ERROR, "Failed to create staff");
        }
    };

    let context = StaffContext {
        hospital: req.hospital.clone(),
        staff_id,
        username: req.username.clone(),
    };
    match auth::issue_token(state.cfg.jwt_secret(), &context) {
        Ok(token) => {
            let body = AuthResponse {
                token,
                staff_id,
                username: req.username,
                hospital: req.hospital,
            };
            success(StatusCode::CREATED, json!(body))
        }
        Err(err) => {
            tracing::error!("Token issue error: {err:?}");
            failure(StatusCode::INTERNAL_SERVER_ERROR, "Failed to generate token")
        }
    }
}

#[utoipa::path(
    post,
    path = "/staff/login",
    request_body = StaffLoginRequest,
    responses(
        (status = 200, description = "Login succeeded, token issued", body = ApiResponse),
        (status = 400, description = "Missing required fields"),
        (status = 401, description = "Invalid credentials"),
        (status = 500, description = "Internal server error")
    )
)]
/// Verify staff credentials and return a fresh token.
#[axum::debug_handler]
pub(crate) async fn login_staff(
    State(state): State<AppState>,
    Json(req): Json<StaffLoginRequest>,
) -> Reply {
    if req.username.is_empty() || req.password.is_empty() || req.hospital.is_empty() {
        return failure(
            StatusCode::BAD_REQUEST,
            "Username, password, and hospital are required",
        );
    }

    let credentials = match state.staff.find_for_login(&req.username, &req.hospital).await {
        Ok(Some(credentials)) => credentials,
        Ok(None) => return failure(StatusCode::UNAUTHORIZED, "Invalid credentials"),
        Err(err) => {
            tracing::error!("Staff lookup error: {err:?}");
            return failure(StatusCode::INTERNAL_SERVER_ERROR, "Database error");
        }
    };

    if !auth::verify_password(&req.password, &credentials.password_hash) {
        return failure(StatusCode::UNAUTHORIZED, "Invalid credentials");
    }

    let context = StaffContext {
        hospital: req.hospital.clone(),
        staff_id: credentials.id,
        username: credentials.username.clone(),
    };
    match auth::issue_token(state.cfg.jwt_secret(), &context) {
        Ok(token) => {
            let body = AuthResponse {
                token,
                staff_id: credentials.id,
                username: credentials.username,
                hospital: req.hospital,
            };
            success(StatusCode::OK, json!(body))
        }
        Err(err) => {
            tracing::error!("Token issue error: {err:?}");
            failure(StatusCode::INTERNAL_SERVER_ERROR, "Failed to generate token")
        }
    }
}

#[utoipa::path(
    get,
    path = "/patient/search",
    params(PatientSearchQuery),
    responses(
        (status = 200, description = "Matching patients", body = ApiResponse),
        (status = 400, description = "Empty query or unsupported hospital"),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "No patient found"),
        (status = 500, description = "Source failure")
    )
)]
/// Search for patients visible to the authenticated staff member's hospital.
///
/// The identity extracted from the bearer token is passed explicitly into the
/// search router, which picks the backing source(s) for that hospital.
#[axum::debug_handler]
pub(crate) async fn search_patient(
    State(state): State<AppState>,
    AuthStaff(staff): AuthStaff,
    Query(query): Query<PatientSearchQuery>,
) -> Reply {
    match state.search.search(&staff, &query).await {
        Ok(patients) => success(StatusCode::OK, json!(patients)),
        Err(err @ SearchError::EmptyQuery) => failure(StatusCode::BAD_REQUEST, &err.to_string()),
        Err(err @ SearchError::UnsupportedHospital(_)) => {
            failure(StatusCode::BAD_REQUEST, &err.to_string())
        }
        Err(SearchError::NotFound) => failure(StatusCode::NOT_FOUND, "No patient found"),
        Err(err) => {
            tracing::error!("Patient search error: {err:?}");
            failure(StatusCode::INTERNAL_SERVER_ERROR, "Failed to search patient")
        }
    }
}
