use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use service::{ErrorKind, ServiceError};
use thiserror::Error;
use tracing::error;

const INTERNAL_MESSAGE: &str = "internal server error";

/// Wire status for each error kind, shared by both transports.
pub fn status_for(kind: ErrorKind) -> (StatusCode, tonic::Code) {
    match kind {
        ErrorKind::InvalidData => (StatusCode::BAD_REQUEST, tonic::Code::InvalidArgument),
        ErrorKind::NotFound => (StatusCode::NOT_FOUND, tonic::Code::NotFound),
        ErrorKind::AlreadyExists => (StatusCode::CONFLICT, tonic::Code::AlreadyExists),
        ErrorKind::Unauthorized => (StatusCode::UNAUTHORIZED, tonic::Code::Unauthenticated),
        ErrorKind::Internal => (StatusCode::INTERNAL_SERVER_ERROR, tonic::Code::Internal),
    }
}

/// Client-facing message. Internal details stay in the server log.
fn public_message(err: &ServiceError) -> String {
    match err {
        ServiceError::Internal(detail) => {
            error!(code = err.code(), error = %detail, "internal error");
            INTERNAL_MESSAGE.to_string()
        }
        other => other.to_string(),
    }
}

/// REST error: rendered as `{"error": <message>}`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into() }
    }

    pub fn bad_request(message: impl Into<String>) -> Self { Self::new(StatusCode::BAD_REQUEST, message) }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        let (status, _) = status_for(err.kind());
        Self { status, message: public_message(&err) }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(serde_json::json!({"error": self.message}))).into_response()
    }
}

/// RPC error: status code plus message.
pub fn to_status(err: ServiceError) -> tonic::Status {
    let (_, code) = status_for(err.kind());
    tonic::Status::new(code, public_message(&err))
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("database: {0}")]
    Database(#[from] models::errors::ModelError),
    #[error("migration failed: {0}")]
    Migration(#[source] sea_orm::DbErr),
    #[error("bind {addr}: {source}")]
    Bind { addr: std::net::SocketAddr, source: std::io::Error },
    #[error("listener: {0}")]
    Listener(#[source] std::io::Error),
    #[error("rest server: {0}")]
    Rest(#[source] std::io::Error),
    #[error("rpc server: {0}")]
    Rpc(#[from] tonic::transport::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_kind_maps_to_matching_statuses() {
        let table = [
            (ErrorKind::InvalidData, 400, tonic::Code::InvalidArgument),
            (ErrorKind::NotFound, 404, tonic::Code::NotFound),
            (ErrorKind::AlreadyExists, 409, tonic::Code::AlreadyExists),
            (ErrorKind::Unauthorized, 401, tonic::Code::Unauthenticated),
            (ErrorKind::Internal, 500, tonic::Code::Internal),
        ];
        for (kind, http, rpc) in table {
            let (s, c) = status_for(kind);
            assert_eq!(s.as_u16(), http, "{kind:?}");
            assert_eq!(c, rpc, "{kind:?}");
        }
    }

    #[test]
    fn internal_detail_is_redacted_on_both_wires() {
        let api = ApiError::from(ServiceError::internal("password authentication failed for user postgres"));
        assert_eq!(api.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api.message, INTERNAL_MESSAGE);

        let status = to_status(ServiceError::internal("connection refused"));
        assert_eq!(status.code(), tonic::Code::Internal);
        assert_eq!(status.message(), INTERNAL_MESSAGE);
    }

    #[test]
    fn business_messages_pass_through() {
        let api = ApiError::from(ServiceError::not_found("order"));
        assert_eq!(api.status, StatusCode::NOT_FOUND);
        assert_eq!(api.message, "order not found");
        assert_eq!(to_status(ServiceError::invalid("total must be positive")).message(), "total must be positive");
    }
}
