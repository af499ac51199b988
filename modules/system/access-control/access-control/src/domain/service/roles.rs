use access_control_sdk::{Role, RoleDraft};
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};
use tracing::{info, instrument};

use super::{AdminService, DomainError, Purge, dedup, ensure_all_exist};
use crate::infra::storage::entity::{data_scope, menu, role, role_data_scope, role_menu, user_role};
use crate::infra::storage::graph::PermissionGraph;

#[instrument(skip(svc, draft), fields(name = %draft.name))]
pub(super) async fn create_role(svc: &AdminService, draft: RoleDraft) -> Result<Role, DomainError> {
    let txn = svc.db.begin().await?;
    if role::Entity::find()
        .filter(role::Column::Name.eq(&draft.name))
        .one(&txn)
        .await?
        .is_some()
    {
        return Err(DomainError::conflict(format!("role '{}'", draft.name)));
    }
    let created = role::ActiveModel {
        id: NotSet,
        name: Set(draft.name),
        status: Set(draft.status.code()),
        filters_scope: Set(draft.filters_scope),
        remark: Set(draft.remark),
    }
    .insert(&txn)
    .await?;
    txn.commit().await?;

    info!(id = created.id, "created role");
    Ok(created.into())
}

#[instrument(skip(svc, draft))]
pub(super) async fn update_role(
    svc: &AdminService,
    id: i64,
    draft: RoleDraft,
) -> Result<Role, DomainError> {
    let txn = svc.db.begin().await?;
    if role::Entity::find_by_id(id).one(&txn).await?.is_none() {
        return Err(DomainError::not_found(format!("role {id}")));
    }
    if role::Entity::find()
        .filter(role::Column::Name.eq(&draft.name))
        .filter(role::Column::Id.ne(id))
        .one(&txn)
        .await?
        .is_some()
    {
        return Err(DomainError::conflict(format!("role '{}'", draft.name)));
    }

    let affected = PermissionGraph::new(&txn).users_of_roles(&[id]).await?;
    let updated = role::ActiveModel {
        id: Set(id),
        name: Set(draft.name),
        status: Set(draft.status.code()),
        filters_scope: Set(draft.filters_scope),
        remark: Set(draft.remark),
    }
    .update(&txn)
    .await?;
    txn.commit().await?;

    svc.purge(&affected, Purge::SnapshotAndSubkeys).await?;
    info!(affected = affected.len(), "updated role");
    Ok(updated.into())
}

#[instrument(skip(svc))]
pub(super) async fn update_role_menus(
    svc: &AdminService,
    id: i64,
    menu_ids: &[i64],
) -> Result<(), DomainError> {
    let txn = svc.db.begin().await?;
    if role::Entity::find_by_id(id).one(&txn).await?.is_none() {
        return Err(DomainError::not_found(format!("role {id}")));
    }
    ensure_all_exist::<menu::Entity, _>(&txn, menu::Column::Id, menu_ids, "menu").await?;

    let affected = PermissionGraph::new(&txn).users_of_roles(&[id]).await?;
    role_menu::Entity::delete_many()
        .filter(role_menu::Column::RoleId.eq(id))
        .exec(&txn)
        .await?;
    let links: Vec<_> = dedup(menu_ids)
        .map(|menu_id| role_menu::ActiveModel {
            role_id: Set(id),
            menu_id: Set(menu_id),
        })
        .collect();
    if !links.is_empty() {
        role_menu::Entity::insert_many(links)
            .exec_without_returning(&txn)
            .await?;
    }
    txn.commit().await?;

    svc.purge(&affected, Purge::SnapshotAndSubkeys).await?;
    info!(menus = menu_ids.len(), affected = affected.len(), "replaced role menus");
    Ok(())
}

#[instrument(skip(svc))]
pub(super) async fn update_role_scopes(
    svc: &AdminService,
    id: i64,
    scope_ids: &[i64],
) -> Result<(), DomainError> {
    let txn = svc.db.begin().await?;
    if role::Entity::find_by_id(id).one(&txn).await?.is_none() {
        return Err(DomainError::not_found(format!("role {id}")));
    }
    ensure_all_exist::<data_scope::Entity, _>(&txn, data_scope::Column::Id, scope_ids, "data scope")
        .await?;

    let affected = PermissionGraph::new(&txn).users_of_roles(&[id]).await?;
    role_data_scope::Entity::delete_many()
        .filter(role_data_scope::Column::RoleId.eq(id))
        .exec(&txn)
        .await?;
    let links: Vec<_> = dedup(scope_ids)
        .map(|scope_id| role_data_scope::ActiveModel {
            role_id: Set(id),
            data_scope_id: Set(scope_id),
        })
        .collect();
    if !links.is_empty() {
        role_data_scope::Entity::insert_many(links)
            .exec_without_returning(&txn)
            .await?;
    }
    txn.commit().await?;

    svc.purge(&affected, Purge::Snapshot).await?;
    info!(scopes = scope_ids.len(), affected = affected.len(), "replaced role data scopes");
    Ok(())
}

#[instrument(skip(svc))]
pub(super) async fn delete_roles(svc: &AdminService, ids: &[i64]) -> Result<u64, DomainError> {
    if ids.is_empty() {
        return Ok(0);
    }

    let txn = svc.db.begin().await?;
    let affected = PermissionGraph::new(&txn).users_of_roles(ids).await?;
    user_role::Entity::delete_many()
        .filter(user_role::Column::RoleId.is_in(ids.iter().copied()))
        .exec(&txn)
        .await?;
    role_menu::Entity::delete_many()
        .filter(role_menu::Column::RoleId.is_in(ids.iter().copied()))
        .exec(&txn)
        .await?;
    role_data_scope::Entity::delete_many()
        .filter(role_data_scope::Column::RoleId.is_in(ids.iter().copied()))
        .exec(&txn)
        .await?;
    let deleted = role::Entity::delete_many()
        .filter(role::Column::Id.is_in(ids.iter().copied()))
        .exec(&txn)
        .await?
        .rows_affected;
    txn.commit().await?;

    svc.purge(&affected, Purge::SnapshotAndSubkeys).await?;
    info!(deleted, affected = affected.len(), "deleted roles");
    Ok(deleted)
}
