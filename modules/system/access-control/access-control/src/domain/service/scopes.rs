use access_control_sdk::{DataScope, DataScopeDraft};
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};
use tracing::{info, instrument};

use super::{AdminService, DomainError, Purge, dedup, ensure_all_exist};
use crate::infra::storage::entity::{data_rule, data_scope, data_scope_rule, role_data_scope};
use crate::infra::storage::graph::PermissionGraph;

#[instrument(skip(svc, draft), fields(name = %draft.name))]
pub(super) async fn create_scope(
    svc: &AdminService,
    draft: DataScopeDraft,
) -> Result<DataScope, DomainError> {
    let txn = svc.db.begin().await?;
    if data_scope::Entity::find()
        .filter(data_scope::Column::Name.eq(&draft.name))
        .one(&txn)
        .await?
        .is_some()
    {
        return Err(DomainError::conflict(format!("data scope '{}'", draft.name)));
    }
    let created = data_scope::ActiveModel {
        id: NotSet,
        name: Set(draft.name),
        status: Set(draft.status.code()),
    }
    .insert(&txn)
    .await?;
    txn.commit().await?;

    info!(id = created.id, "created data scope");
    Ok(created.into())
}

#[instrument(skip(svc, draft))]
pub(super) async fn update_scope(
    svc: &AdminService,
    id: i64,
    draft: DataScopeDraft,
) -> Result<DataScope, DomainError> {
    let txn = svc.db.begin().await?;
    if data_scope::Entity::find_by_id(id).one(&txn).await?.is_none() {
        return Err(DomainError::not_found(format!("data scope {id}")));
    }
    if data_scope::Entity::find()
        .filter(data_scope::Column::Name.eq(&draft.name))
        .filter(data_scope::Column::Id.ne(id))
        .one(&txn)
        .await?
        .is_some()
    {
        return Err(DomainError::conflict(format!("data scope '{}'", draft.name)));
    }

    let affected = PermissionGraph::new(&txn).users_of_scopes(&[id]).await?;
    let updated = data_scope::ActiveModel {
        id: Set(id),
        name: Set(draft.name),
        status: Set(draft.status.code()),
    }
    .update(&txn)
    .await?;
    txn.commit().await?;

    svc.purge(&affected, Purge::Snapshot).await?;
    info!(affected = affected.len(), "updated data scope");
    Ok(updated.into())
}

#[instrument(skip(svc))]
pub(super) async fn update_scope_rules(
    svc: &AdminService,
    id: i64,
    rule_ids: &[i64],
) -> Result<(), DomainError> {
    let txn = svc.db.begin().await?;
    if data_scope::Entity::find_by_id(id).one(&txn).await?.is_none() {
        return Err(DomainError::not_found(format!("data scope {id}")));
    }
    ensure_all_exist::<data_rule::Entity, _>(&txn, data_rule::Column::Id, rule_ids, "data rule")
        .await?;

    let affected = PermissionGraph::new(&txn).users_of_scopes(&[id]).await?;
    data_scope_rule::Entity::delete_many()
        .filter(data_scope_rule::Column::DataScopeId.eq(id))
        .exec(&txn)
        .await?;
    let links: Vec<_> = dedup(rule_ids)
        .map(|rule_id| data_scope_rule::ActiveModel {
            data_scope_id: Set(id),
            data_rule_id: Set(rule_id),
        })
        .collect();
    if !links.is_empty() {
        data_scope_rule::Entity::insert_many(links).exec_without_returning(&txn).await?;
    }
    txn.commit().await?;

    svc.purge(&affected, Purge::Snapshot).await?;
    info!(rules = rule_ids.len(), affected = affected.len(), "replaced data scope rules");
    Ok(())
}

#[instrument(skip(svc))]
pub(super) async fn delete_scopes(svc: &AdminService, ids: &[i64]) -> Result<u64, DomainError> {
    if ids.is_empty() {
        return Ok(0);
    }

    let txn = svc.db.begin().await?;
    let affected = PermissionGraph::new(&txn).users_of_scopes(ids).await?;
    role_data_scope::Entity::delete_many()
        .filter(role_data_scope::Column::DataScopeId.is_in(ids.iter().copied()))
        .exec(&txn)
        .await?;
    data_scope_rule::Entity::delete_many()
        .filter(data_scope_rule::Column::DataScopeId.is_in(ids.iter().copied()))
        .exec(&txn)
        .await?;
    let deleted = data_scope::Entity::delete_many()
        .filter(data_scope::Column::Id.is_in(ids.iter().copied()))
        .exec(&txn)
        .await?
        .rows_affected;
    txn.commit().await?;

    svc.purge(&affected, Purge::Snapshot).await?;
    info!(deleted, affected = affected.len(), "deleted data scopes");
    Ok(deleted)
}
