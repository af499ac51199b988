use std::collections::BTreeSet;

use access_control_sdk::{DenyReason, UserFlagsUpdate};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set, TransactionTrait};
use tracing::{info, instrument};

use super::{AdminService, DomainError, Purge, dedup, ensure_all_exist};
use crate::infra::storage::entity::{role, user, user_role};

#[instrument(skip(svc))]
pub(super) async fn update_user_roles(
    svc: &AdminService,
    user_id: i64,
    role_ids: &[i64],
) -> Result<(), DomainError> {
    let txn = svc.db.begin().await?;
    if user::Entity::find_by_id(user_id).one(&txn).await?.is_none() {
        return Err(DomainError::not_found(format!("user {user_id}")));
    }
    ensure_all_exist::<role::Entity, _>(&txn, role::Column::Id, role_ids, "role").await?;

    user_role::Entity::delete_many()
        .filter(user_role::Column::UserId.eq(user_id))
        .exec(&txn)
        .await?;
    let links: Vec<_> = dedup(role_ids)
        .map(|role_id| user_role::ActiveModel {
            user_id: Set(user_id),
            role_id: Set(role_id),
        })
        .collect();
    if !links.is_empty() {
        user_role::Entity::insert_many(links)
            .exec_without_returning(&txn)
            .await?;
    }
    txn.commit().await?;

    svc.purge(&BTreeSet::from([user_id]), Purge::Snapshot).await?;
    info!(roles = role_ids.len(), "replaced user roles");
    Ok(())
}

#[instrument(skip(svc))]
pub(super) async fn update_user_flags(
    svc: &AdminService,
    actor_id: i64,
    user_id: i64,
    flags: UserFlagsUpdate,
) -> Result<(), DomainError> {
    let txn = svc.db.begin().await?;
    let Some(found) = user::Entity::find_by_id(user_id).one(&txn).await? else {
        return Err(DomainError::not_found(format!("user {user_id}")));
    };
    if actor_id == user_id {
        return Err(DomainError::Denied(DenyReason::SelfModification));
    }
    if flags.is_empty() {
        return Ok(());
    }

    let mut active: user::ActiveModel = found.into();
    if let Some(is_superuser) = flags.is_superuser {
        active.is_superuser = Set(is_superuser);
    }
    if let Some(is_staff) = flags.is_staff {
        active.is_staff = Set(is_staff);
    }
    if let Some(status) = flags.status {
        active.status = Set(status.code());
    }
    active.update(&txn).await?;
    txn.commit().await?;

    svc.purge(&BTreeSet::from([user_id]), Purge::Snapshot).await?;
    info!("updated user flags");
    Ok(())
}
