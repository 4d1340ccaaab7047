//! Application error types with consistent API responses.
//!
//! Callers only ever see the coarse categories below with fixed messages;
//! underlying provider, I/O and database causes are logged at the boundary.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid email or password")]
    Authentication,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("User is inactive")]
    Inactive,

    #[error("Not authorized to access this resource")]
    Authorization,

    #[error("{0}")]
    Validation(String),

    #[error("This feature requires premium subscription")]
    PremiumRequired,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Database operation failed")]
    Database,

    #[error("AI service is temporarily unavailable")]
    Generation,

    #[error("Failed to generate PDF")]
    Rendering,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Authentication | ApiError::InvalidToken | ApiError::Inactive => {
                StatusCode::UNAUTHORIZED
            }
            ApiError::Authorization => StatusCode::FORBIDDEN,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::PremiumRequired => StatusCode::PAYMENT_REQUIRED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Database => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Generation | ApiError::Rendering => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    detail: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorResponse {
            detail: self.to_string(),
        };

        if status == StatusCode::UNAUTHORIZED {
            (status, [(header::WWW_AUTHENTICATE, "Bearer")], Json(body)).into_response()
        } else {
            (status, Json(body)).into_response()
        }
    }
}

/// Result type alias for handlers.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping_is_fixed() {
        assert_eq!(ApiError::Authentication.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::Authorization.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            ApiError::Validation("x".into()).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError::PremiumRequired.status(),
            StatusCode::PAYMENT_REQUIRED
        );
        assert_eq!(ApiError::NotFound("Petition").status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::Database.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(ApiError::Generation.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(ApiError::Rendering.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn messages_stay_category_level() {
        assert_eq!(
            ApiError::Generation.to_string(),
            "AI service is temporarily unavailable"
        );
        assert_eq!(ApiError::Database.to_string(), "Database operation failed");
        assert_eq!(
            ApiError::Authentication.to_string(),
            "Invalid email or password"
        );
    }

    #[test]
    fn unauthorized_response_carries_bearer_challenge() {
        let response = ApiError::InvalidToken.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response
                .headers()
                .get(header::WWW_AUTHENTICATE)
                .and_then(|v| v.to_str().ok()),
            Some("Bearer")
        );
    }
}
