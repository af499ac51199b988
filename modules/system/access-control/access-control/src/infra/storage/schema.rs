//! Builds the [`EntityRegistry`] from `SeaORM` column metadata.

use access_control_sdk::FieldKind;
use sea_orm::sea_query::ColumnType;
use sea_orm::{ColumnTrait, EntityTrait, IdenStatic, Iterable};

use crate::config::AccessControlConfig;
use crate::domain::registry::{EntityDescriptor, EntityRegistry};

use super::entity::dept;

/// Registered name of the department entity.
pub const DEPARTMENT: &str = "department";

/// Map a column type to the kind rule literals are coerced to.
///
/// Types with no literal representation (timestamps, blobs, JSON) are not
/// filterable.
fn field_kind(column_type: &ColumnType) -> Option<FieldKind> {
    match column_type {
        ColumnType::Char(_) | ColumnType::String(_) | ColumnType::Text => Some(FieldKind::String),
        ColumnType::TinyInteger
        | ColumnType::SmallInteger
        | ColumnType::Integer
        | ColumnType::BigInteger
        | ColumnType::TinyUnsigned
        | ColumnType::SmallUnsigned
        | ColumnType::Unsigned
        | ColumnType::BigUnsigned => Some(FieldKind::I64),
        ColumnType::Float | ColumnType::Double | ColumnType::Decimal(_) => Some(FieldKind::F64),
        ColumnType::Boolean => Some(FieldKind::Bool),
        _ => None,
    }
}

/// Describe the filterable columns of `E`, registered as `name`.
///
/// Columns listed in `exclude` are left out.
#[must_use]
pub fn describe<E: EntityTrait>(name: &str, exclude: &[String]) -> EntityDescriptor {
    let table = E::default().table_name().to_owned();
    E::Column::iter().fold(EntityDescriptor::new(name, table), |desc, col| {
        let column = col.as_str();
        if exclude.iter().any(|x| x == column) {
            return desc;
        }
        match field_kind(col.def().get_column_type()) {
            Some(kind) => desc.with_column(column, kind),
            None => desc,
        }
    })
}

/// Registry of every entity data rules may target.
pub fn default_registry(config: &AccessControlConfig) -> EntityRegistry {
    EntityRegistry::new().with_entity(describe::<dept::Entity>(
        DEPARTMENT,
        &config.data_permission_column_exclude,
    ))
}
