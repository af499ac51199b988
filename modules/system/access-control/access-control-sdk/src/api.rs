//! Public API trait for the access-control module.

use async_trait::async_trait;

use crate::errors::AccessError;
use crate::models::{AccessRequest, Principal};
use crate::predicate::Predicate;

/// Public API trait for access control.
///
/// ```ignore
/// // Gate an operation
/// api.authorize(Some(&principal), &AccessRequest::new(Method::POST, "/api/v1/depts")
///     .with_permission("sys:dept:add"))?;
///
/// // Restrict a read to the rows the principal may see
/// let filter = api.compile_filter(&principal, "department").await?;
/// ```
#[async_trait]
pub trait AccessControlApi: Send + Sync {
    /// Decide whether `principal` may perform `request`.
    ///
    /// Never suspends; the principal snapshot must already be resolved.
    ///
    /// # Errors
    ///
    /// - `AuthenticationRequired` if there is no verified principal
    /// - `PermissionDenied` with the failing check as reason
    /// - `ServerError` if a policy engine is required but not configured
    fn authorize(
        &self,
        principal: Option<&Principal>,
        request: &AccessRequest,
    ) -> Result<(), AccessError>;

    /// Compile the row filter `principal` is subject to on `entity`.
    ///
    /// # Errors
    ///
    /// - `NotFound` for an unknown scope, entity, column or stored operator
    /// - `ServerError` for a rule literal that does not fit its column, or a
    ///   storage failure
    async fn compile_filter(
        &self,
        principal: &Principal,
        entity: &str,
    ) -> Result<Predicate, AccessError>;
}
