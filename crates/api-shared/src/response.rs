//! JSON envelope returned by every endpoint.

use serde::Serialize;
use utoipa::ToSchema;

/// Uniform response body: the status text, an optional human-readable message
/// and, on success, the payload.
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse {
    /// Canonical reason phrase of the HTTP status, e.g. `"OK"`.
    pub status: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Object, nullable)]
    pub data: Option<serde_json::Value>,
}

impl ApiResponse {
    /// A success envelope carrying a payload.
    pub fn success(status: &str, data: serde_json::Value) -> Self {
        Self {
            status: status.to_string(),
            message: String::new(),
            data: Some(data),
        }
    }

    /// An error envelope carrying only a message.
    pub fn error(status: &str, message: impl Into<String>) -> Self {
        Self {
            status: status.to_string(),
            message: message.into(),
            data: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_envelope_omits_data() {
        let body = serde_json::to_value(ApiResponse::error("Not Found", "No patient found"))
            .expect("serialises");
        assert_eq!(
            body,
            serde_json::json!({"status": "Not Found", "message": "No patient found"})
        );
    }
}
