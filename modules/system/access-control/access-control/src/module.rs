//! Wires the access-control components over one database and cache store.

use std::sync::Arc;

use access_control_sdk::{AccessControlApi, PolicyEngineRef};
use anyhow::Context;
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use tracing::info;

use crate::config::AccessControlConfig;
use crate::domain::authorizer::MenuAuthorizer;
use crate::domain::compiler::PredicateCompiler;
use crate::domain::invalidation::CacheInvalidator;
use crate::domain::ports::AuthzCache;
use crate::domain::principal::PrincipalResolver;
use crate::domain::registry::EntityRegistry;
use crate::domain::service::AdminService;
use crate::infra::storage::SeaOrmAccessRepository;
use crate::infra::storage::migrations::Migrator;
use crate::infra::storage::schema::default_registry;
use crate::local_client::AccessControlLocalClient;

/// The assembled module: public API, admin service and principal resolver.
#[derive(Clone)]
pub struct AccessControlModule {
    api: Arc<dyn AccessControlApi>,
    admin: AdminService,
    principals: PrincipalResolver,
    registry: Arc<EntityRegistry>,
}

impl AccessControlModule {
    /// Build the module. Migrations are not run; see [`Self::migrate`].
    ///
    /// # Errors
    ///
    /// Returns an error if a configured path pattern is not a valid regex.
    pub fn new(
        config: AccessControlConfig,
        db: DatabaseConnection,
        cache: Arc<dyn AuthzCache>,
        policy: Option<PolicyEngineRef>,
    ) -> anyhow::Result<Self> {
        let config = Arc::new(config);
        let registry = Arc::new(default_registry(&config));
        let repo = Arc::new(SeaOrmAccessRepository::new(db.clone()));

        let authorizer = MenuAuthorizer::new(&config, policy)
            .context("invalid token_path_exclude_patterns")?;
        let compiler = PredicateCompiler::new(repo.clone(), registry.clone());
        let api: Arc<dyn AccessControlApi> = Arc::new(AccessControlLocalClient::new(
            Arc::new(authorizer),
            Arc::new(compiler),
        ));

        let invalidator = CacheInvalidator::new(cache.clone(), config.user_cache_prefix.clone());
        let admin = AdminService::new(db, registry.clone(), invalidator);
        let principals = PrincipalResolver::new(repo, cache, config.clone());

        info!(
            menu_mode = config.rbac_role_menu_mode,
            entities = ?registry.names(),
            "access control module initialized"
        );
        Ok(Self {
            api,
            admin,
            principals,
            registry,
        })
    }

    /// Apply pending schema migrations.
    ///
    /// # Errors
    ///
    /// Propagates migration failures.
    pub async fn migrate(db: &DatabaseConnection) -> anyhow::Result<()> {
        Migrator::up(db, None)
            .await
            .context("access control migrations failed")
    }

    #[must_use]
    pub fn api(&self) -> Arc<dyn AccessControlApi> {
        self.api.clone()
    }

    #[must_use]
    pub fn admin(&self) -> &AdminService {
        &self.admin
    }

    #[must_use]
    pub fn principals(&self) -> &PrincipalResolver {
        &self.principals
    }

    #[must_use]
    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }
}
