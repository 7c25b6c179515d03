use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::services::interval::TimeError;
use crate::store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Time(#[from] TimeError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("unauthorized")]
    Unauthorized,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Time(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
        };

        let message = match &self {
            AppError::Time(e) => {
                tracing::error!(error = %e, "stored time value is malformed");
                "internal server error".to_string()
            }
            AppError::Store(e) => {
                tracing::error!(error = %e, "record store failure");
                "internal server error".to_string()
            }
            other => other.to_string(),
        };

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let cases = [
            (AppError::Validation("missing".into()), StatusCode::BAD_REQUEST),
            (AppError::NotFound("gone".into()), StatusCode::NOT_FOUND),
            (AppError::Conflict("taken".into()), StatusCode::CONFLICT),
            (AppError::Time(TimeError::Range(2000)), StatusCode::INTERNAL_SERVER_ERROR),
            (AppError::Store(StoreError::Timeout("find_service")), StatusCode::INTERNAL_SERVER_ERROR),
            (AppError::Unauthorized, StatusCode::UNAUTHORIZED),
        ];
        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    async fn body_json(err: AppError) -> serde_json::Value {
        let body = axum::body::to_bytes(err.into_response().into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_internal_errors_hide_details() {
        let store_err = AppError::Store(StoreError::Timeout("insert_booking"));
        assert_eq!(
            body_json(store_err).await,
            serde_json::json!({ "error": "internal server error" })
        );

        let time_err = AppError::Time(TimeError::Format("25:99".into()));
        assert_eq!(
            body_json(time_err).await,
            serde_json::json!({ "error": "internal server error" })
        );
    }

    #[tokio::test]
    async fn test_client_errors_carry_message() {
        let err = AppError::Conflict("Selected time is no longer available".into());
        assert_eq!(
            body_json(err).await,
            serde_json::json!({ "error": "Selected time is no longer available" })
        );
    }
}
