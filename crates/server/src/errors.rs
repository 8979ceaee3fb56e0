use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use common::types::MessageBody;
use service::auth::errors::AuthError;
use service::errors::ServiceError;
use thiserror::Error;
use tracing::error;

/// Error response rendered as `{"message": "..."}` with the given status.
#[derive(Debug, Error)]
#[error("{status}: {message}")]
pub struct JsonApiError {
    pub status: StatusCode,
    pub message: String,
}

impl JsonApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into() }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn not_authorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "Not authorized")
    }

    /// Log the real cause under `kind` and hide it behind a generic 500.
    fn internal(kind: &str, detail: impl std::fmt::Display) -> Self {
        error!(kind, error = %detail, "request failed");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        (self.status, Json(MessageBody::new(self.message))).into_response()
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Validation(msg) => Self::bad_request(msg),
            ServiceError::Model(m) => Self::bad_request(m.to_string()),
            ServiceError::NotFound(_) => Self::not_found("Not found"),
            ServiceError::Conflict(msg) => Self::new(StatusCode::CONFLICT, msg),
            ServiceError::TooLarge(msg) => Self::new(StatusCode::PAYLOAD_TOO_LARGE, msg),
            ServiceError::Store(e) => Self::internal(e.kind(), e),
            e @ ServiceError::Io(_) => Self::internal("io", e),
        }
    }
}

impl From<AuthError> for JsonApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::Validation(msg) => Self::bad_request(msg),
            AuthError::Conflict => Self::new(StatusCode::CONFLICT, e.to_string()),
            AuthError::Unauthorized => Self::new(StatusCode::UNAUTHORIZED, e.to_string()),
            AuthError::InvalidToken | AuthError::NotFound => Self::not_authorized(),
            e @ (AuthError::HashError(_) | AuthError::TokenError(_) | AuthError::Repository(_)) => {
                let kind = format!("auth_{}", e.code());
                Self::internal(&kind, e)
            }
        }
    }
}

impl From<JsonRejection> for JsonApiError {
    fn from(r: JsonRejection) -> Self {
        Self::new(StatusCode::BAD_REQUEST, r.body_text())
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("storage bootstrap failed: {0}")]
    Storage(String),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use service::storage::StoreError;

    #[test]
    fn storage_failures_hide_their_cause() {
        let store = StoreError::StorageWrite {
            path: "data/contacts.json".into(),
            source: std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
        };
        assert_eq!(store.kind(), "storage_write");
        let err = JsonApiError::from(ServiceError::from(store));
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, "Internal server error");
    }

    #[test]
    fn store_lookups_map_to_client_errors() {
        let missing = JsonApiError::from(ServiceError::from(StoreError::NotFound("a1".into())));
        assert_eq!(missing.status, StatusCode::NOT_FOUND);
        let dup = JsonApiError::from(ServiceError::from(StoreError::Duplicate("a1".into())));
        assert_eq!(dup.status, StatusCode::CONFLICT);
    }

    #[test]
    fn auth_errors_keep_their_public_messages() {
        let e = JsonApiError::from(AuthError::Unauthorized);
        assert_eq!((e.status, e.message.as_str()), (StatusCode::UNAUTHORIZED, "Email or password is wrong"));
        let e = JsonApiError::from(AuthError::InvalidToken);
        assert_eq!(e.message, "Not authorized");
        let e = JsonApiError::from(AuthError::HashError("bad salt".into()));
        assert_eq!(e.status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
