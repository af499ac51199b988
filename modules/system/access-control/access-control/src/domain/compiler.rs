//! Compiles a principal's data scopes into a row filter for one entity.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use access_control_sdk::{
    AccessError, CompareOp, DataRule, FieldKind, FilterValue, Predicate, Principal,
    RuleExpression, RuleOperator,
};
use tracing::{debug, instrument};

use super::registry::EntityRegistry;
use super::repo::AccessRepository;

pub struct PredicateCompiler {
    repo: Arc<dyn AccessRepository>,
    registry: Arc<EntityRegistry>,
}

impl PredicateCompiler {
    #[must_use]
    pub fn new(repo: Arc<dyn AccessRepository>, registry: Arc<EntityRegistry>) -> Self {
        Self { repo, registry }
    }

    /// Build the filter `principal` is subject to on `entity`.
    ///
    /// Superusers, principals holding any role with `filters_scope = false`,
    /// and principals without enabled scopes get [`Predicate::True`].
    /// Otherwise AND-rules are conjoined, OR-rules disjoined, and the two
    /// groups joined with OR.
    ///
    /// # Errors
    ///
    /// - `NotFound` for an unknown scope, rule model, rule column, or stored
    ///   operator/expression code
    /// - `ServerError` for a literal that does not parse as its column type,
    ///   or a storage failure
    #[instrument(skip(self, principal), fields(user_id = principal.id))]
    pub async fn compile(
        &self,
        principal: &Principal,
        entity: &str,
    ) -> Result<Predicate, AccessError> {
        if principal.is_superuser {
            return Ok(Predicate::True);
        }

        if principal.roles.iter().any(|r| !r.filters_scope) {
            debug!("role without scope filtering grants full visibility");
            return Ok(Predicate::True);
        }

        let scope_ids: BTreeSet<i64> = principal
            .roles
            .iter()
            .flat_map(|r| r.scopes.iter())
            .filter(|s| s.status.is_enabled())
            .map(|s| s.id)
            .collect();

        if scope_ids.is_empty() {
            return Ok(Predicate::True);
        }

        self.registry.require_entity(entity)?;

        let mut rules: BTreeMap<i64, DataRule> = BTreeMap::new();
        for scope_id in scope_ids {
            let scope_rules = self
                .repo
                .scope_rules(scope_id)
                .await
                .map_err(|e| AccessError::server_error(format!("{e:#}")))?
                .ok_or_else(|| AccessError::not_found(format!("data scope {scope_id}")))?;
            for rule in scope_rules {
                rules.entry(rule.id).or_insert(rule);
            }
        }

        let mut and_bucket = Vec::new();
        let mut or_bucket = Vec::new();
        for rule in rules.values() {
            let (operator, predicate) = self.compile_rule(rule)?;
            if rule.model != entity {
                debug!(rule_id = rule.id, model = %rule.model, "rule targets another entity");
                continue;
            }
            match operator {
                RuleOperator::And => and_bucket.push(predicate),
                RuleOperator::Or => or_bucket.push(predicate),
            }
        }

        let mut parts = Vec::with_capacity(2);
        if !and_bucket.is_empty() {
            parts.push(Predicate::all(and_bucket));
        }
        if !or_bucket.is_empty() {
            parts.push(Predicate::any(or_bucket));
        }
        let predicate = Predicate::any(parts);
        debug!(%predicate, "compiled data filter");
        Ok(predicate)
    }

    fn compile_rule(&self, rule: &DataRule) -> Result<(RuleOperator, Predicate), AccessError> {
        let kind = self.registry.require_column(&rule.model, &rule.column)?;
        let operator = rule.operator().ok_or_else(|| {
            AccessError::not_found(format!(
                "operator {} of data rule {}",
                rule.operator, rule.id
            ))
        })?;
        let expression = rule.expression().ok_or_else(|| {
            AccessError::not_found(format!(
                "expression {} of data rule {}",
                rule.expression, rule.id
            ))
        })?;

        let entity = rule.model.clone();
        let column = rule.column.clone();
        let cmp = match expression {
            RuleExpression::In => {
                let values = coerce_list(kind, &rule.value).map_err(|e| literal_error(rule, &e))?;
                return Ok((operator, Predicate::In { entity, column, values }));
            }
            RuleExpression::NotIn => {
                let values = coerce_list(kind, &rule.value).map_err(|e| literal_error(rule, &e))?;
                return Ok((operator, Predicate::NotIn { entity, column, values }));
            }
            RuleExpression::Eq => CompareOp::Eq,
            RuleExpression::Ne => CompareOp::Ne,
            RuleExpression::Gt => CompareOp::Gt,
            RuleExpression::Ge => CompareOp::Ge,
            RuleExpression::Lt => CompareOp::Lt,
            RuleExpression::Le => CompareOp::Le,
        };
        let value = coerce(kind, &rule.value).map_err(|e| literal_error(rule, &e))?;
        Ok((
            operator,
            Predicate::Compare {
                entity,
                column,
                cmp,
                value,
            },
        ))
    }
}

fn literal_error(rule: &DataRule, reason: &str) -> AccessError {
    AccessError::server_error(format!(
        "data rule {} value '{}' is invalid for column '{}': {reason}",
        rule.id, rule.value, rule.column
    ))
}

/// Parse a stored rule literal as `kind`.
fn coerce(kind: FieldKind, raw: &str) -> Result<FilterValue, String> {
    match kind {
        FieldKind::String => Ok(FilterValue::String(raw.to_owned())),
        FieldKind::I64 => raw
            .trim()
            .parse::<i64>()
            .map(FilterValue::I64)
            .map_err(|e| e.to_string()),
        FieldKind::F64 => raw
            .trim()
            .parse::<f64>()
            .map(FilterValue::F64)
            .map_err(|e| e.to_string()),
        FieldKind::Bool => match raw.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => Ok(FilterValue::Bool(true)),
            "false" | "0" => Ok(FilterValue::Bool(false)),
            other => Err(format!("'{other}' is not a boolean")),
        },
    }
}

/// Parse a comma-separated rule literal; blank items are dropped.
fn coerce_list(kind: FieldKind, raw: &str) -> Result<Vec<FilterValue>, String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| coerce(kind, item))
        .collect()
}
