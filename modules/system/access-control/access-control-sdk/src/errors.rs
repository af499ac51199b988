//! Error types for the access-control module.

use std::fmt;

use http::StatusCode;
use thiserror::Error;

/// Why a permission check rejected the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// The principal holds no role, or every held role is disabled.
    NoRole,
    /// None of the principal's roles has a menu attached.
    NoMenu,
    /// Mutating request from a principal without the staff flag.
    ManagementForbidden,
    /// The external policy engine rejected the request.
    PolicyRejected,
    /// The required permission code is not granted by any enabled menu.
    PermissionDenied,
    /// An administrator tried to change their own superuser, staff or status flag.
    SelfModification,
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DenyReason::NoRole => write!(
                f,
                "user has not been assigned a role, please contact the system administrator"
            ),
            DenyReason::NoMenu => write!(
                f,
                "user has not been assigned a menu, please contact the system administrator"
            ),
            DenyReason::ManagementForbidden => write!(
                f,
                "user is banned from management operations, please contact the system administrator"
            ),
            DenyReason::PolicyRejected => write!(f, "rejected by the policy engine"),
            DenyReason::PermissionDenied => write!(f, "insufficient permissions"),
            DenyReason::SelfModification => {
                write!(f, "changing your own permission flags is not allowed")
            }
        }
    }
}

/// Errors surfaced by authorization, row filtering and administrative mutations.
///
/// All variants are terminal for the current request; none is retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    /// The request carries no verified authentication.
    #[error("authentication required")]
    AuthenticationRequired,

    /// Role, menu or permission-code check failed.
    #[error("permission denied: {0}")]
    PermissionDenied(DenyReason),

    /// An entity, column, rule, scope, role or menu reference could not be resolved.
    #[error("not found: {0}")]
    NotFound(String),

    /// An administrative write collides with an existing record.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Invariant violation or infrastructure failure.
    #[error("server error: {0}")]
    ServerError(String),
}

impl AccessError {
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    #[must_use]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    #[must_use]
    pub fn server_error(message: impl Into<String>) -> Self {
        Self::ServerError(message.into())
    }

    #[must_use]
    pub fn denied(reason: DenyReason) -> Self {
        Self::PermissionDenied(reason)
    }

    /// HTTP status the transport layer should answer with.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            AccessError::AuthenticationRequired => StatusCode::UNAUTHORIZED,
            AccessError::PermissionDenied(_) => StatusCode::FORBIDDEN,
            AccessError::NotFound(_) => StatusCode::NOT_FOUND,
            AccessError::Conflict(_) => StatusCode::CONFLICT,
            AccessError::ServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
