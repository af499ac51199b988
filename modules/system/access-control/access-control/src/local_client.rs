//! In-process implementation of [`AccessControlApi`].

use std::sync::Arc;

use access_control_sdk::{AccessControlApi, AccessError, AccessRequest, Predicate, Principal};
use async_trait::async_trait;

use crate::domain::authorizer::MenuAuthorizer;
use crate::domain::compiler::PredicateCompiler;

/// Delegates to the menu authorizer and the predicate compiler.
pub struct AccessControlLocalClient {
    authorizer: Arc<MenuAuthorizer>,
    compiler: Arc<PredicateCompiler>,
}

impl AccessControlLocalClient {
    #[must_use]
    pub fn new(authorizer: Arc<MenuAuthorizer>, compiler: Arc<PredicateCompiler>) -> Self {
        Self {
            authorizer,
            compiler,
        }
    }
}

#[async_trait]
impl AccessControlApi for AccessControlLocalClient {
    fn authorize(
        &self,
        principal: Option<&Principal>,
        request: &AccessRequest,
    ) -> Result<(), AccessError> {
        self.authorizer.authorize(principal, request)
    }

    async fn compile_filter(
        &self,
        principal: &Principal,
        entity: &str,
    ) -> Result<Predicate, AccessError> {
        self.compiler.compile(principal, entity).await
    }
}
