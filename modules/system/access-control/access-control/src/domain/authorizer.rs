//! Menu authorization: decides whether a principal may invoke an operation.

use std::collections::{HashMap, HashSet};

use access_control_sdk::{AccessError, AccessRequest, DenyReason, PolicyEngineRef, Principal};
use regex::Regex;
use tracing::debug;

use crate::config::AccessControlConfig;

/// Evaluates the role/menu/permission-code checks for one request.
///
/// Checks run in a fixed order and stop at the first decisive one. The
/// evaluator never touches storage or the cache; the principal snapshot must
/// already be hydrated.
pub struct MenuAuthorizer {
    path_exclude: HashSet<String>,
    path_patterns: Vec<Regex>,
    menu_mode: bool,
    menu_exclude: HashSet<String>,
    policy: Option<PolicyEngineRef>,
}

impl MenuAuthorizer {
    /// # Errors
    ///
    /// Returns an error if a configured path pattern is not a valid regex.
    pub fn new(
        config: &AccessControlConfig,
        policy: Option<PolicyEngineRef>,
    ) -> Result<Self, regex::Error> {
        let path_patterns = config
            .token_path_exclude_patterns
            .iter()
            .map(|p| Regex::new(p))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            path_exclude: config.token_path_exclude.iter().cloned().collect(),
            path_patterns,
            menu_mode: config.rbac_role_menu_mode,
            menu_exclude: config.rbac_role_menu_exclude.iter().cloned().collect(),
            policy,
        })
    }

    fn is_path_excluded(&self, path: &str) -> bool {
        self.path_exclude.contains(path) || self.path_patterns.iter().any(|re| re.is_match(path))
    }

    /// # Errors
    ///
    /// - `AuthenticationRequired` when no verified principal is present
    /// - `PermissionDenied` with the reason of the failing check
    /// - `ServerError` when menu-code mode is off and no policy engine is set
    pub fn authorize(
        &self,
        principal: Option<&Principal>,
        request: &AccessRequest,
    ) -> Result<(), AccessError> {
        if self.is_path_excluded(&request.path) {
            debug!(path = %request.path, "path excluded from authorization");
            return Ok(());
        }

        let Some(principal) = principal.filter(|p| p.is_authenticated()) else {
            debug!(path = %request.path, "unauthenticated request rejected");
            return Err(AccessError::AuthenticationRequired);
        };

        let result = self.check(principal, request);
        match &result {
            Ok(()) => debug!(user_id = principal.id, path = %request.path, "access granted"),
            Err(e) => debug!(user_id = principal.id, path = %request.path, error = %e, "access denied"),
        }
        result
    }

    fn check(&self, principal: &Principal, request: &AccessRequest) -> Result<(), AccessError> {
        if principal.is_superuser {
            return Ok(());
        }

        if principal.roles.iter().all(|r| !r.status.is_enabled()) {
            return Err(AccessError::denied(DenyReason::NoRole));
        }

        if !principal.roles.iter().any(|r| !r.menus.is_empty()) {
            return Err(AccessError::denied(DenyReason::NoMenu));
        }

        if request.is_mutating() && !principal.is_staff {
            return Err(AccessError::denied(DenyReason::ManagementForbidden));
        }

        if !self.menu_mode {
            let policy = self.policy.as_ref().ok_or_else(|| {
                AccessError::server_error("policy engine is required but not configured")
            })?;
            if !policy.allows(principal, &request.path, request.method.as_str()) {
                return Err(AccessError::denied(DenyReason::PolicyRejected));
            }
            return Ok(());
        }

        let Some(code) = request.permission.as_deref() else {
            return Ok(());
        };

        if self.menu_exclude.contains(code) {
            return Ok(());
        }

        if granted_codes(principal).contains(code) {
            Ok(())
        } else {
            Err(AccessError::denied(DenyReason::PermissionDenied))
        }
    }
}

/// Permission codes carried by enabled menus of enabled roles.
fn granted_codes(principal: &Principal) -> HashSet<&str> {
    let menus: HashMap<i64, Option<&str>> = principal
        .roles
        .iter()
        .filter(|r| r.status.is_enabled())
        .flat_map(|r| r.menus.iter())
        .filter(|m| m.status.is_enabled())
        .map(|m| (m.id, m.perms.as_deref()))
        .collect();

    menus
        .into_values()
        .flatten()
        .flat_map(|perms| perms.split(','))
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .collect()
}
