use access_control_sdk::{Menu, MenuDraft};
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter,
    Set, TransactionTrait,
};
use tracing::{info, instrument};

use super::{AdminService, DomainError, Purge};
use crate::infra::storage::entity::{menu, role_menu};
use crate::infra::storage::graph::PermissionGraph;

async fn check_parent<C: ConnectionTrait>(
    conn: &C,
    parent_id: Option<i64>,
) -> Result<(), DomainError> {
    let Some(parent_id) = parent_id else {
        return Ok(());
    };
    if menu::Entity::find_by_id(parent_id).one(conn).await?.is_none() {
        return Err(DomainError::not_found(format!("parent menu {parent_id}")));
    }
    Ok(())
}

fn active_model(id: Option<i64>, draft: MenuDraft) -> menu::ActiveModel {
    menu::ActiveModel {
        id: id.map_or(NotSet, Set),
        title: Set(draft.title),
        name: Set(draft.name),
        perms: Set(draft.perms),
        status: Set(draft.status.code()),
        menu_type: Set(draft.menu_type.code()),
        parent_id: Set(draft.parent_id),
        sort: Set(draft.sort),
    }
}

#[instrument(skip(svc, draft), fields(title = %draft.title))]
pub(super) async fn create_menu(svc: &AdminService, draft: MenuDraft) -> Result<Menu, DomainError> {
    let txn = svc.db.begin().await?;
    check_parent(&txn, draft.parent_id).await?;
    let created = active_model(None, draft).insert(&txn).await?;
    txn.commit().await?;

    info!(id = created.id, "created menu");
    Menu::try_from(created)
}

#[instrument(skip(svc, draft))]
pub(super) async fn update_menu(
    svc: &AdminService,
    id: i64,
    draft: MenuDraft,
) -> Result<Menu, DomainError> {
    let txn = svc.db.begin().await?;
    if menu::Entity::find_by_id(id).one(&txn).await?.is_none() {
        return Err(DomainError::not_found(format!("menu {id}")));
    }
    check_parent(&txn, draft.parent_id).await?;

    let affected = PermissionGraph::new(&txn).users_of_menus(&[id]).await?;
    let updated = active_model(Some(id), draft).update(&txn).await?;
    txn.commit().await?;

    svc.purge(&affected, Purge::SnapshotAndSubkeys).await?;
    info!(affected = affected.len(), "updated menu");
    Menu::try_from(updated)
}

#[instrument(skip(svc))]
pub(super) async fn delete_menus(svc: &AdminService, ids: &[i64]) -> Result<u64, DomainError> {
    if ids.is_empty() {
        return Ok(0);
    }

    let txn = svc.db.begin().await?;
    let affected = PermissionGraph::new(&txn).users_of_menus(ids).await?;
    role_menu::Entity::delete_many()
        .filter(role_menu::Column::MenuId.is_in(ids.iter().copied()))
        .exec(&txn)
        .await?;
    let deleted = menu::Entity::delete_many()
        .filter(menu::Column::Id.is_in(ids.iter().copied()))
        .exec(&txn)
        .await?
        .rows_affected;
    txn.commit().await?;

    svc.purge(&affected, Purge::SnapshotAndSubkeys).await?;
    info!(deleted, affected = affected.len(), "deleted menus");
    Ok(deleted)
}
