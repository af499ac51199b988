//! Domain models for the access-control module.

use http::Method;
use serde::{Deserialize, Serialize};

use crate::predicate::FieldKind;

/// Enabled/disabled flag shared by users, roles, menus and scopes.
///
/// Persisted as an integer: `0` is disabled, anything else is enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Disabled,
    Enabled,
}

impl Status {
    #[must_use]
    pub fn code(self) -> i32 {
        match self {
            Status::Disabled => 0,
            Status::Enabled => 1,
        }
    }

    #[must_use]
    pub fn is_enabled(self) -> bool {
        matches!(self, Status::Enabled)
    }
}

impl From<i32> for Status {
    fn from(code: i32) -> Self {
        if code == 0 {
            Status::Disabled
        } else {
            Status::Enabled
        }
    }
}

/// Menu node type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MenuType {
    Directory,
    Menu,
    Button,
    Embedded,
    Link,
}

impl MenuType {
    #[must_use]
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(MenuType::Directory),
            1 => Some(MenuType::Menu),
            2 => Some(MenuType::Button),
            3 => Some(MenuType::Embedded),
            4 => Some(MenuType::Link),
            _ => None,
        }
    }

    #[must_use]
    pub fn code(self) -> i32 {
        match self {
            MenuType::Directory => 0,
            MenuType::Menu => 1,
            MenuType::Button => 2,
            MenuType::Embedded => 3,
            MenuType::Link => 4,
        }
    }
}

/// How a rule joins the compiled filter: AND-bucket or OR-bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleOperator {
    And,
    Or,
}

impl RuleOperator {
    #[must_use]
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(RuleOperator::And),
            1 => Some(RuleOperator::Or),
            _ => None,
        }
    }

    #[must_use]
    pub fn code(self) -> i32 {
        match self {
            RuleOperator::And => 0,
            RuleOperator::Or => 1,
        }
    }
}

/// Comparison a rule applies between column and literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleExpression {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
    In,
    NotIn,
}

impl RuleExpression {
    #[must_use]
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(RuleExpression::Eq),
            1 => Some(RuleExpression::Ne),
            2 => Some(RuleExpression::Gt),
            3 => Some(RuleExpression::Ge),
            4 => Some(RuleExpression::Lt),
            5 => Some(RuleExpression::Le),
            6 => Some(RuleExpression::In),
            7 => Some(RuleExpression::NotIn),
            _ => None,
        }
    }

    #[must_use]
    pub fn code(self) -> i32 {
        match self {
            RuleExpression::Eq => 0,
            RuleExpression::Ne => 1,
            RuleExpression::Gt => 2,
            RuleExpression::Ge => 3,
            RuleExpression::Lt => 4,
            RuleExpression::Le => 5,
            RuleExpression::In => 6,
            RuleExpression::NotIn => 7,
        }
    }
}

// -- Principal snapshot --

/// The authenticated actor with its resolved role graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: i64,
    pub is_superuser: bool,
    pub is_staff: bool,
    /// Verified authentication markers. Empty means the token was not verified.
    #[serde(default)]
    pub auth_scopes: Vec<String>,
    #[serde(default)]
    pub roles: Vec<PrincipalRole>,
}

impl Principal {
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        !self.auth_scopes.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrincipalRole {
    pub id: i64,
    pub name: String,
    pub status: Status,
    /// `false` grants unrestricted row visibility regardless of scopes.
    pub filters_scope: bool,
    #[serde(default)]
    pub menus: Vec<PrincipalMenu>,
    #[serde(default)]
    pub scopes: Vec<PrincipalScope>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrincipalMenu {
    pub id: i64,
    /// Permission codes, possibly several separated by `,`.
    pub perms: Option<String>,
    pub status: Status,
    pub menu_type: MenuType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrincipalScope {
    pub id: i64,
    pub status: Status,
}

/// One operation invocation to authorize.
#[derive(Debug, Clone)]
pub struct AccessRequest {
    pub path: String,
    pub method: Method,
    /// Permission code declared by the route, if any.
    pub permission: Option<String>,
}

impl AccessRequest {
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            method,
            permission: None,
        }
    }

    #[must_use]
    pub fn with_permission(mut self, code: impl Into<String>) -> Self {
        self.permission = Some(code.into());
        self
    }

    /// Anything other than GET and OPTIONS.
    #[must_use]
    pub fn is_mutating(&self) -> bool {
        self.method != Method::GET && self.method != Method::OPTIONS
    }
}

// -- Administrative records --

/// A persisted data rule.
///
/// `operator` and `expression` keep their stored integer codes; they are
/// decoded when the rule is evaluated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataRule {
    pub id: i64,
    pub name: String,
    pub model: String,
    pub column: String,
    pub operator: i32,
    pub expression: i32,
    pub value: String,
}

impl DataRule {
    #[must_use]
    pub fn operator(&self) -> Option<RuleOperator> {
        RuleOperator::from_code(self.operator)
    }

    #[must_use]
    pub fn expression(&self) -> Option<RuleExpression> {
        RuleExpression::from_code(self.expression)
    }
}

/// Payload for creating or updating a data rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataRuleDraft {
    pub name: String,
    pub model: String,
    pub column: String,
    pub operator: RuleOperator,
    pub expression: RuleExpression,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataScope {
    pub id: i64,
    pub name: String,
    pub status: Status,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataScopeDraft {
    pub name: String,
    pub status: Status,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: i64,
    pub name: String,
    pub status: Status,
    pub filters_scope: bool,
    pub remark: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleDraft {
    pub name: String,
    pub status: Status,
    pub filters_scope: bool,
    pub remark: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Menu {
    pub id: i64,
    pub title: String,
    pub name: String,
    pub perms: Option<String>,
    pub status: Status,
    pub menu_type: MenuType,
    pub parent_id: Option<i64>,
    pub sort: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuDraft {
    pub title: String,
    pub name: String,
    pub perms: Option<String>,
    pub status: Status,
    pub menu_type: MenuType,
    pub parent_id: Option<i64>,
    pub sort: i32,
}

/// Account flags to set on a user. `None` leaves the flag unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserFlagsUpdate {
    pub is_superuser: Option<bool>,
    pub is_staff: Option<bool>,
    pub status: Option<Status>,
}

impl UserFlagsUpdate {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.is_superuser.is_none() && self.is_staff.is_none() && self.status.is_none()
    }
}

/// A filterable column of a registered entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleColumn {
    pub name: String,
    pub kind: FieldKind,
}
