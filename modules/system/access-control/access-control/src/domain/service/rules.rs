use access_control_sdk::{DataRule, DataRuleDraft};
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};
use tracing::{info, instrument};

use super::{AdminService, DomainError, Purge};
use crate::infra::storage::entity::{data_rule, data_scope_rule};
use crate::infra::storage::graph::PermissionGraph;

fn check_target(svc: &AdminService, draft: &DataRuleDraft) -> Result<(), DomainError> {
    let entity = svc
        .registry
        .entity(&draft.model)
        .ok_or_else(|| DomainError::not_found(format!("data rule model '{}'", draft.model)))?;
    if entity.column(&draft.column).is_none() {
        return Err(DomainError::not_found(format!(
            "column '{}' of data rule model '{}'",
            draft.column, draft.model
        )));
    }
    Ok(())
}

fn active_model(id: Option<i64>, draft: DataRuleDraft) -> data_rule::ActiveModel {
    data_rule::ActiveModel {
        id: id.map_or(NotSet, Set),
        name: Set(draft.name),
        model: Set(draft.model),
        column_name: Set(draft.column),
        operator: Set(draft.operator.code()),
        expression: Set(draft.expression.code()),
        value: Set(draft.value),
    }
}

#[instrument(skip(svc, draft), fields(name = %draft.name))]
pub(super) async fn create_rule(
    svc: &AdminService,
    draft: DataRuleDraft,
) -> Result<DataRule, DomainError> {
    check_target(svc, &draft)?;

    let txn = svc.db.begin().await?;
    if data_rule::Entity::find()
        .filter(data_rule::Column::Name.eq(&draft.name))
        .one(&txn)
        .await?
        .is_some()
    {
        return Err(DomainError::conflict(format!("data rule '{}'", draft.name)));
    }
    let created = active_model(None, draft).insert(&txn).await?;
    txn.commit().await?;

    info!(id = created.id, "created data rule");
    Ok(created.into())
}

#[instrument(skip(svc, draft))]
pub(super) async fn update_rule(
    svc: &AdminService,
    id: i64,
    draft: DataRuleDraft,
) -> Result<DataRule, DomainError> {
    let txn = svc.db.begin().await?;
    if data_rule::Entity::find_by_id(id).one(&txn).await?.is_none() {
        return Err(DomainError::not_found(format!("data rule {id}")));
    }
    if data_rule::Entity::find()
        .filter(data_rule::Column::Name.eq(&draft.name))
        .filter(data_rule::Column::Id.ne(id))
        .one(&txn)
        .await?
        .is_some()
    {
        return Err(DomainError::conflict(format!("data rule '{}'", draft.name)));
    }
    check_target(svc, &draft)?;

    let affected = PermissionGraph::new(&txn).users_of_rules(&[id]).await?;
    let updated = active_model(Some(id), draft).update(&txn).await?;
    txn.commit().await?;

    svc.purge(&affected, Purge::Snapshot).await?;
    info!(affected = affected.len(), "updated data rule");
    Ok(updated.into())
}

#[instrument(skip(svc))]
pub(super) async fn delete_rules(svc: &AdminService, ids: &[i64]) -> Result<u64, DomainError> {
    if ids.is_empty() {
        return Ok(0);
    }

    let txn = svc.db.begin().await?;
    let affected = PermissionGraph::new(&txn).users_of_rules(ids).await?;
    data_scope_rule::Entity::delete_many()
        .filter(data_scope_rule::Column::DataRuleId.is_in(ids.iter().copied()))
        .exec(&txn)
        .await?;
    let deleted = data_rule::Entity::delete_many()
        .filter(data_rule::Column::Id.is_in(ids.iter().copied()))
        .exec(&txn)
        .await?
        .rows_affected;
    txn.commit().await?;

    svc.purge(&affected, Purge::Snapshot).await?;
    info!(deleted, affected = affected.len(), "deleted data rules");
    Ok(deleted)
}
