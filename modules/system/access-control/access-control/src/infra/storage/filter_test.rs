#![allow(clippy::unwrap_used, clippy::expect_used)]

use access_control_sdk::{AccessError, CompareOp, FilterValue, Predicate};
use sea_orm::{DbBackend, EntityTrait, QueryTrait};

use crate::config::AccessControlConfig;
use crate::infra::storage::entity::dept;
use crate::infra::storage::filter::{filter_select, predicate_to_condition};
use crate::infra::storage::schema::{DEPARTMENT, default_registry};

fn sql(predicate: &Predicate) -> String {
    let registry = default_registry(&AccessControlConfig::default());
    filter_select(dept::Entity::find(), predicate, &registry)
        .unwrap()
        .build(DbBackend::Sqlite)
        .to_string()
}

fn cmp(column: &str, op: CompareOp, value: FilterValue) -> Predicate {
    Predicate::Compare {
        entity: DEPARTMENT.to_owned(),
        column: column.to_owned(),
        cmp: op,
        value,
    }
}

#[test]
fn true_adds_no_where_clause() {
    assert!(!sql(&Predicate::True).contains("WHERE"));
}

#[test]
fn comparison_is_qualified_by_table() {
    let sql = sql(&cmp("parent_id", CompareOp::Ge, FilterValue::I64(5)));

    assert!(sql.contains(r#"WHERE "sys_dept"."parent_id" >= 5"#), "{sql}");
}

#[test]
fn all_and_any_keep_their_connectives() {
    let predicate = Predicate::Any {
        predicates: vec![
            Predicate::All {
                predicates: vec![
                    cmp("parent_id", CompareOp::Eq, FilterValue::I64(5)),
                    cmp("status", CompareOp::Eq, FilterValue::I64(1)),
                ],
            },
            cmp("leader", CompareOp::Eq, FilterValue::String("7".to_owned())),
        ],
    };

    let sql = sql(&predicate);

    assert!(sql.contains(r#""sys_dept"."parent_id" = 5 AND "sys_dept"."status" = 1"#), "{sql}");
    assert!(sql.contains(r#" OR "sys_dept"."leader" = '7'"#), "{sql}");
}

#[test]
fn true_inside_any_lifts_the_restriction() {
    let predicate = Predicate::Any {
        predicates: vec![
            cmp("parent_id", CompareOp::Eq, FilterValue::I64(5)),
            Predicate::True,
        ],
    };

    assert!(!sql(&predicate).contains("WHERE"));
}

#[test]
fn true_inside_all_is_ignored() {
    let predicate = Predicate::All {
        predicates: vec![
            Predicate::True,
            cmp("parent_id", CompareOp::Eq, FilterValue::I64(5)),
        ],
    };

    let sql = sql(&predicate);

    assert!(sql.contains(r#"WHERE "sys_dept"."parent_id" = 5"#), "{sql}");
}

#[test]
fn empty_in_matches_nothing_and_empty_not_in_everything() {
    let empty_in = Predicate::In {
        entity: DEPARTMENT.to_owned(),
        column: "parent_id".to_owned(),
        values: vec![],
    };
    let empty_not_in = Predicate::NotIn {
        entity: DEPARTMENT.to_owned(),
        column: "parent_id".to_owned(),
        values: vec![],
    };

    assert!(sql(&empty_in).contains("1=0"));
    assert!(!sql(&empty_not_in).contains("WHERE"));
}

#[test]
fn in_lists_are_bound() {
    let predicate = Predicate::NotIn {
        entity: DEPARTMENT.to_owned(),
        column: "name".to_owned(),
        values: vec![
            FilterValue::String("ops".to_owned()),
            FilterValue::String("qa".to_owned()),
        ],
    };

    let sql = sql(&predicate);

    assert!(sql.contains(r#""sys_dept"."name" NOT IN ('ops', 'qa')"#), "{sql}");
}

#[test]
fn unregistered_column_is_not_found() {
    let registry = default_registry(&AccessControlConfig::default());

    let result = predicate_to_condition(
        &cmp("del_flag", CompareOp::Eq, FilterValue::Bool(false)),
        &registry,
    );

    assert!(matches!(result, Err(AccessError::NotFound(_))));
}

#[test]
fn literal_of_wrong_kind_is_server_error() {
    let registry = default_registry(&AccessControlConfig::default());

    let result = predicate_to_condition(
        &cmp("parent_id", CompareOp::Eq, FilterValue::String("5".to_owned())),
        &registry,
    );

    assert!(matches!(result, Err(AccessError::ServerError(_))));
}
