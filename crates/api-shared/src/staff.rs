//! Staff wire types.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct StaffCreateRequest {
    pub username: String,
    pub password: String,
    pub hospital: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct StaffLoginRequest {
    pub username: String,
    pub password: String,
    pub hospital: String,
}

/// Returned by both registration and login.
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
    pub staff_id: i32,
    pub username: String,
    pub hospital: String,
}
