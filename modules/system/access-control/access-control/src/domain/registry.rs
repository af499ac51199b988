//! Startup-time registry of entities that data rules may target.
//!
//! Maps `(entity name, column name)` to the column's [`FieldKind`] and the
//! physical table the column lives in. Built once from typed storage
//! entities (see `infra::storage::schema`) and shared read-only.

use std::collections::BTreeMap;

use access_control_sdk::{AccessError, FieldKind, RuleColumn};

/// Filterable columns of one registered entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityDescriptor {
    name: String,
    table: String,
    columns: BTreeMap<String, FieldKind>,
}

impl EntityDescriptor {
    #[must_use]
    pub fn new(name: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table: table.into(),
            columns: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_column(mut self, column: impl Into<String>, kind: FieldKind) -> Self {
        self.columns.insert(column.into(), kind);
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    #[must_use]
    pub fn column(&self, column: &str) -> Option<FieldKind> {
        self.columns.get(column).copied()
    }

    #[must_use]
    pub fn columns(&self) -> Vec<RuleColumn> {
        self.columns
            .iter()
            .map(|(name, kind)| RuleColumn {
                name: name.clone(),
                kind: *kind,
            })
            .collect()
    }
}

#[derive(Debug, Clone, Default)]
#[must_use]
pub struct EntityRegistry {
    entities: BTreeMap<String, EntityDescriptor>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entity(mut self, descriptor: EntityDescriptor) -> Self {
        self.entities.insert(descriptor.name.clone(), descriptor);
        self
    }

    #[must_use]
    pub fn entity(&self, name: &str) -> Option<&EntityDescriptor> {
        self.entities.get(name)
    }

    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.entities.keys().cloned().collect()
    }

    /// Resolve an entity by name.
    ///
    /// # Errors
    ///
    /// `NotFound` if no entity is registered under `name`.
    pub fn require_entity(&self, name: &str) -> Result<&EntityDescriptor, AccessError> {
        self.entity(name)
            .ok_or_else(|| AccessError::not_found(format!("data rule model '{name}'")))
    }

    /// Resolve a filterable column of an entity.
    ///
    /// # Errors
    ///
    /// `NotFound` if the entity is unknown, or the column does not exist or
    /// is excluded from filtering.
    pub fn require_column(&self, entity: &str, column: &str) -> Result<FieldKind, AccessError> {
        self.require_entity(entity)?.column(column).ok_or_else(|| {
            AccessError::not_found(format!("data rule column '{column}' of model '{entity}'"))
        })
    }
}
