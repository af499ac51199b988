use crate::models::Principal;

/// Type alias for a reference-counted Policy Engine
pub type PolicyEngineRef = std::sync::Arc<dyn PolicyEngine>;

/// External policy engine consulted when menu-code authorization is disabled.
///
/// `resource` is the request path and `action` the HTTP method.
pub trait PolicyEngine: Send + Sync {
    fn allows(&self, principal: &Principal, resource: &str, action: &str) -> bool;
}

/// Policy engine that allows everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopPolicyEngine;

impl PolicyEngine for NoopPolicyEngine {
    fn allows(&self, _principal: &Principal, _resource: &str, _action: &str) -> bool {
        true
    }
}
