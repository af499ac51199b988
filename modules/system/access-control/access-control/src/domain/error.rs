use access_control_sdk::{AccessError, DenyReason};

#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("{0} already exists")]
    Conflict(String),

    #[error("{0}")]
    Denied(DenyReason),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Cache error: {0}")]
    Cache(String),
}

impl DomainError {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn conflict(what: impl Into<String>) -> Self {
        Self::Conflict(what.into())
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database(message.into())
    }

    pub fn cache(message: impl Into<String>) -> Self {
        Self::Cache(message.into())
    }
}

impl From<sea_orm::DbErr> for DomainError {
    fn from(e: sea_orm::DbErr) -> Self {
        Self::Database(e.to_string())
    }
}

impl From<anyhow::Error> for DomainError {
    fn from(e: anyhow::Error) -> Self {
        Self::Database(format!("{e:#}"))
    }
}

impl From<DomainError> for AccessError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::NotFound(what) => Self::not_found(what),
            DomainError::Conflict(what) => Self::conflict(what),
            DomainError::Denied(reason) => Self::denied(reason),
            DomainError::Database(msg) | DomainError::Cache(msg) => Self::server_error(msg),
        }
    }
}
