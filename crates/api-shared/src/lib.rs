//! # API Shared
//!
//! Pieces shared by the API surface:
//! - Bearer-token issue/verification and password hashing (the authentication
//!   collaborator consumed by the protected routes)
//! - The JSON response envelope and staff wire types

pub mod auth;
pub mod response;
pub mod staff;

pub use auth::{bearer_token, hash_password, issue_token, verify_password, verify_token, AuthError};
pub use response::ApiResponse;
pub use staff::{AuthResponse, StaffCreateRequest, StaffLoginRequest};
