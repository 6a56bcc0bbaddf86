use sea_orm::{DbErr, SqlErr};
use thiserror::Error;
use tracing::error;

/// Coarse classification shared by both transports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidData,
    NotFound,
    AlreadyExists,
    Unauthorized,
    Internal,
}

/// Business errors surfaced by repositories and use-case services.
///
/// Repositories only produce `NotFound`, `AlreadyExists` and `Internal`;
/// `InvalidData` and `Unauthorized` originate in the use-case layer.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    InvalidData(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    AlreadyExists(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    pub fn invalid(msg: impl Into<String>) -> Self { Self::InvalidData(msg.into()) }
    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{} not found", entity)) }
    pub fn already_exists(entity: &str) -> Self { Self::AlreadyExists(format!("{} already exists", entity)) }
    pub fn unauthorized(msg: impl Into<String>) -> Self { Self::Unauthorized(msg.into()) }
    pub fn internal(msg: impl Into<String>) -> Self { Self::Internal(msg.into()) }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::InvalidData(_) => ErrorKind::InvalidData,
            ServiceError::NotFound(_) => ErrorKind::NotFound,
            ServiceError::AlreadyExists(_) => ErrorKind::AlreadyExists,
            ServiceError::Unauthorized(_) => ErrorKind::Unauthorized,
            ServiceError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self.kind() {
            ErrorKind::InvalidData => 1001,
            ErrorKind::AlreadyExists => 1002,
            ErrorKind::NotFound => 1003,
            ErrorKind::Unauthorized => 1004,
            ErrorKind::Internal => 1200,
        }
    }

    /// Normalise a store error for `entity`: unique violations become
    /// `AlreadyExists`, a missing record becomes `NotFound`, anything else is
    /// `Internal` with the driver message kept for the server log.
    pub fn from_db(entity: &str, err: DbErr) -> Self {
        if let Some(SqlErr::UniqueConstraintViolation(detail)) = err.sql_err() {
            tracing::debug!(%entity, %detail, "unique constraint violated");
            return Self::already_exists(entity);
        }
        match err {
            DbErr::RecordNotFound(_) => Self::not_found(entity),
            other => {
                error!(%entity, error = %other, "store failure");
                Self::Internal(other.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_and_codes_are_stable() {
        assert_eq!(ServiceError::invalid("x").kind(), ErrorKind::InvalidData);
        assert_eq!(ServiceError::not_found("order").code(), 1003);
        assert_eq!(ServiceError::already_exists("user").code(), 1002);
        assert_eq!(ServiceError::unauthorized("no").kind(), ErrorKind::Unauthorized);
        assert_eq!(ServiceError::internal("boom").code(), 1200);
    }

    #[test]
    fn messages_are_human_readable() {
        assert_eq!(ServiceError::not_found("order").to_string(), "order not found");
        assert_eq!(ServiceError::already_exists("user").to_string(), "user already exists");
        assert_eq!(ServiceError::invalid("total must be positive").to_string(), "total must be positive");
    }

    #[test]
    fn record_not_found_maps_to_not_found() {
        let err = ServiceError::from_db("order", DbErr::RecordNotFound("orders".into()));
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn other_store_errors_are_internal() {
        let err = ServiceError::from_db("order", DbErr::Custom("connection reset".into()));
        assert_eq!(err.kind(), ErrorKind::Internal);
    }
}
