//! Bearer-token extraction for protected routes.

use crate::AppState;
use api_shared::auth::{self, AuthError};
use api_shared::ApiResponse;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::Json;
use hmw_core::StaffContext;

/// The authenticated staff identity, extracted from the `Authorization`
/// header and handed to the handler as an explicit argument.
pub(crate) struct AuthStaff(pub StaffContext);

#[axum::async_trait]
impl FromRequestParts<AppState> for AuthStaff {
    type Rejection = (StatusCode, Json<ApiResponse>);

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok());

        let token = auth::bearer_token(header).map_err(unauthorized)?;
        let staff = auth::verify_token(state.cfg.jwt_secret(), token).map_err(unauthorized)?;

        Ok(AuthStaff(staff))
    }
}

fn unauthorized(err: AuthError) -> (StatusCode, Json<ApiResponse>) {
    let message = match err {
        AuthError::MissingCredentials => "Missing authorization header",
        AuthError::MalformedCredentials => "Invalid token format",
        _ => "Invalid token",
    };
    (
        StatusCode::UNAUTHORIZED,
        Json(ApiResponse::error("Unauthorized", message)),
    )
}
