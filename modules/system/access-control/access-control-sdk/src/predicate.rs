//! Row-filter predicate AST produced by the predicate compiler.
//!
//! A [`Predicate`] is transport-agnostic: it names entity and column by their
//! registered names and carries literals already coerced to the column's
//! [`FieldKind`]. The storage layer binds it to its query builder.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Logical kind of a filterable column. Rule literals are coerced to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    String,
    I64,
    F64,
    Bool,
}

/// A literal already coerced to a column's [`FieldKind`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FilterValue {
    String(String),
    I64(i64),
    F64(f64),
    Bool(bool),
}

impl FilterValue {
    #[must_use]
    pub fn kind(&self) -> FieldKind {
        match self {
            FilterValue::String(_) => FieldKind::String,
            FilterValue::I64(_) => FieldKind::I64,
            FilterValue::F64(_) => FieldKind::F64,
            FilterValue::Bool(_) => FieldKind::Bool,
        }
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterValue::String(s) => write!(f, "'{s}'"),
            FilterValue::I64(v) => write!(f, "{v}"),
            FilterValue::F64(v) => write!(f, "{v}"),
            FilterValue::Bool(v) => write!(f, "{v}"),
        }
    }
}

/// Scalar comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompareOp {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
}

impl CompareOp {
    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::Ne => "!=",
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
        }
    }
}

/// Boolean row filter.
///
/// `All` is `ANDed`, `Any` is `ORed`. [`Predicate::True`] matches every row
/// and is what unrestricted principals receive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Predicate {
    True,
    Compare {
        entity: String,
        column: String,
        cmp: CompareOp,
        value: FilterValue,
    },
    In {
        entity: String,
        column: String,
        values: Vec<FilterValue>,
    },
    NotIn {
        entity: String,
        column: String,
        values: Vec<FilterValue>,
    },
    All {
        predicates: Vec<Predicate>,
    },
    Any {
        predicates: Vec<Predicate>,
    },
}

impl Predicate {
    /// Conjunction of `parts`. A single part is returned unwrapped and an
    /// empty list yields [`Predicate::True`].
    #[must_use]
    pub fn all(mut parts: Vec<Predicate>) -> Self {
        match parts.len() {
            0 => Predicate::True,
            1 => parts.remove(0),
            _ => Predicate::All { predicates: parts },
        }
    }

    /// Disjunction of `parts`. A single part is returned unwrapped and an
    /// empty list yields [`Predicate::True`].
    #[must_use]
    pub fn any(mut parts: Vec<Predicate>) -> Self {
        match parts.len() {
            0 => Predicate::True,
            1 => parts.remove(0),
            _ => Predicate::Any { predicates: parts },
        }
    }

    #[must_use]
    pub fn is_unrestricted(&self) -> bool {
        matches!(self, Predicate::True)
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, values: &[FilterValue]) -> fmt::Result {
    write!(f, "(")?;
    for (i, v) in values.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{v}")?;
    }
    write!(f, ")")
}

fn write_joined(f: &mut fmt::Formatter<'_>, parts: &[Predicate], sep: &str) -> fmt::Result {
    for (i, p) in parts.iter().enumerate() {
        if i > 0 {
            write!(f, " {sep} ")?;
        }
        match p {
            Predicate::All { .. } | Predicate::Any { .. } => write!(f, "({p})")?,
            _ => write!(f, "{p}")?,
        }
    }
    Ok(())
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::True => write!(f, "TRUE"),
            Predicate::Compare {
                entity,
                column,
                cmp,
                value,
            } => write!(f, "{entity}.{column} {} {value}", cmp.symbol()),
            Predicate::In {
                entity,
                column,
                values,
            } => {
                write!(f, "{entity}.{column} IN ")?;
                write_list(f, values)
            }
            Predicate::NotIn {
                entity,
                column,
                values,
            } => {
                write!(f, "{entity}.{column} NOT IN ")?;
                write_list(f, values)
            }
            Predicate::All { predicates } => write_joined(f, predicates, "AND"),
            Predicate::Any { predicates } => write_joined(f, predicates, "OR"),
        }
    }
}
