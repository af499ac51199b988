//! Binds a compiled [`Predicate`] to a `SeaORM` [`Condition`].

use access_control_sdk::{AccessError, CompareOp, FilterValue, Predicate};
use sea_orm::sea_query::{Alias, Expr, SimpleExpr};
use sea_orm::{Condition, EntityTrait, QueryFilter, Select, Value};

use crate::domain::registry::EntityRegistry;

/// Translate `predicate` into a condition over the registered tables.
///
/// `Predicate::True` yields an empty condition, which adds no `WHERE` clause.
///
/// # Errors
///
/// `NotFound` for an unregistered entity or column, `ServerError` when a
/// literal does not match the column's kind.
pub fn predicate_to_condition(
    predicate: &Predicate,
    registry: &EntityRegistry,
) -> Result<Condition, AccessError> {
    Ok(bind(predicate, registry)?.unwrap_or_else(Condition::all))
}

/// Restrict `select` to the rows `predicate` admits.
///
/// # Errors
///
/// See [`predicate_to_condition`].
pub fn filter_select<E: EntityTrait>(
    select: Select<E>,
    predicate: &Predicate,
    registry: &EntityRegistry,
) -> Result<Select<E>, AccessError> {
    Ok(match bind(predicate, registry)? {
        Some(condition) => select.filter(condition),
        None => select,
    })
}

// `None` stands for TRUE: sea-query drops empty conditions, so TRUE cannot
// be nested as a condition without changing the meaning of its parent.
fn bind(predicate: &Predicate, registry: &EntityRegistry) -> Result<Option<Condition>, AccessError> {
    Ok(match predicate {
        Predicate::True => None,
        Predicate::Compare {
            entity,
            column,
            cmp,
            value,
        } => {
            let col = column_expr(registry, entity, column, std::slice::from_ref(value))?;
            let value = sql_value(value);
            let expr = match cmp {
                CompareOp::Eq => col.eq(value),
                CompareOp::Ne => col.ne(value),
                CompareOp::Gt => col.gt(value),
                CompareOp::Ge => col.gte(value),
                CompareOp::Lt => col.lt(value),
                CompareOp::Le => col.lte(value),
            };
            Some(Condition::all().add(expr))
        }
        Predicate::In {
            entity,
            column,
            values,
        } => {
            let col = column_expr(registry, entity, column, values)?;
            if values.is_empty() {
                // IN () is always false
                Some(Condition::all().add(Expr::cust("1=0")))
            } else {
                Some(Condition::all().add(col.is_in(values.iter().map(sql_value))))
            }
        }
        Predicate::NotIn {
            entity,
            column,
            values,
        } => {
            let col = column_expr(registry, entity, column, values)?;
            if values.is_empty() {
                None
            } else {
                Some(Condition::all().add(col.is_not_in(values.iter().map(sql_value))))
            }
        }
        Predicate::All { predicates } => {
            let mut all = Condition::all();
            let mut restricted = false;
            for p in predicates {
                if let Some(c) = bind(p, registry)? {
                    all = all.add(c);
                    restricted = true;
                }
            }
            restricted.then_some(all)
        }
        Predicate::Any { predicates } => {
            if predicates.is_empty() {
                return Ok(Some(Condition::all().add(Expr::cust("1=0"))));
            }
            let mut any = Condition::any();
            for p in predicates {
                match bind(p, registry)? {
                    Some(c) => any = any.add(c),
                    None => return Ok(None),
                }
            }
            Some(any)
        }
    })
}

fn column_expr(
    registry: &EntityRegistry,
    entity: &str,
    column: &str,
    values: &[FilterValue],
) -> Result<Expr, AccessError> {
    let kind = registry.require_column(entity, column)?;
    if let Some(bad) = values.iter().find(|v| v.kind() != kind) {
        return Err(AccessError::server_error(format!(
            "{entity}.{column} expects {kind:?}, got {bad}"
        )));
    }
    let table = registry.require_entity(entity)?.table();
    Ok(Expr::col((Alias::new(table), Alias::new(column))))
}

fn sql_value(value: &FilterValue) -> SimpleExpr {
    let v: Value = match value {
        FilterValue::String(s) => s.clone().into(),
        FilterValue::I64(v) => (*v).into(),
        FilterValue::F64(v) => (*v).into(),
        FilterValue::Bool(v) => (*v).into(),
    };
    v.into()
}
