use access_control_sdk::{
    DataRule, DataScope, Menu, MenuType, PrincipalMenu, PrincipalScope, Role, Status,
};

use crate::domain::error::DomainError;
use crate::infra::storage::entity::{data_rule, data_scope, menu, role};

fn menu_type(id: i64, code: i32) -> Result<MenuType, DomainError> {
    MenuType::from_code(code)
        .ok_or_else(|| DomainError::database(format!("menu {id} has unknown type code {code}")))
}

impl From<data_rule::Model> for DataRule {
    fn from(e: data_rule::Model) -> Self {
        Self {
            id: e.id,
            name: e.name,
            model: e.model,
            column: e.column_name,
            operator: e.operator,
            expression: e.expression,
            value: e.value,
        }
    }
}

impl From<data_scope::Model> for DataScope {
    fn from(e: data_scope::Model) -> Self {
        Self {
            id: e.id,
            name: e.name,
            status: Status::from(e.status),
        }
    }
}

impl From<&data_scope::Model> for PrincipalScope {
    fn from(e: &data_scope::Model) -> Self {
        Self {
            id: e.id,
            status: Status::from(e.status),
        }
    }
}

impl From<role::Model> for Role {
    fn from(e: role::Model) -> Self {
        Self {
            id: e.id,
            name: e.name,
            status: Status::from(e.status),
            filters_scope: e.filters_scope,
            remark: e.remark,
        }
    }
}

impl TryFrom<menu::Model> for Menu {
    type Error = DomainError;

    fn try_from(e: menu::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            menu_type: menu_type(e.id, e.menu_type)?,
            id: e.id,
            title: e.title,
            name: e.name,
            perms: e.perms,
            status: Status::from(e.status),
            parent_id: e.parent_id,
            sort: e.sort,
        })
    }
}

impl TryFrom<&menu::Model> for PrincipalMenu {
    type Error = DomainError;

    fn try_from(e: &menu::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: e.id,
            perms: e.perms.clone(),
            status: Status::from(e.status),
            menu_type: menu_type(e.id, e.menu_type)?,
        })
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn menu_model(menu_type: i32) -> menu::Model {
        menu::Model {
            id: 3,
            title: "Departments".to_owned(),
            name: "SysDept".to_owned(),
            perms: Some("sys:dept:add,sys:dept:edit".to_owned()),
            status: 1,
            menu_type,
            parent_id: Some(1),
            sort: 0,
        }
    }

    #[test]
    fn rule_keeps_stored_codes() {
        let rule: DataRule = data_rule::Model {
            id: 1,
            name: "own dept".to_owned(),
            model: "department".to_owned(),
            column_name: "parent_id".to_owned(),
            operator: 1,
            expression: 9,
            value: "5".to_owned(),
        }
        .into();

        assert_eq!(rule.column, "parent_id");
        assert_eq!(rule.expression, 9);
        assert_eq!(rule.expression(), None);
    }

    #[test]
    fn zero_status_maps_to_disabled() {
        let scope: DataScope = data_scope::Model {
            id: 2,
            name: "off".to_owned(),
            status: 0,
        }
        .into();

        assert_eq!(scope.status, Status::Disabled);
    }

    #[test]
    fn menu_type_codes_are_decoded() {
        let menu = Menu::try_from(menu_model(2)).unwrap();
        assert_eq!(menu.menu_type, MenuType::Button);

        let principal_menu = PrincipalMenu::try_from(&menu_model(1)).unwrap();
        assert_eq!(principal_menu.menu_type, MenuType::Menu);
        assert_eq!(principal_menu.perms.as_deref(), Some("sys:dept:add,sys:dept:edit"));
    }

    #[test]
    fn unknown_menu_type_is_rejected() {
        let err = Menu::try_from(menu_model(42)).unwrap_err();
        assert!(matches!(err, DomainError::Database(_)));
    }
}
