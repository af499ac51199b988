//! Configuration for the access-control module.

use std::path::Path;

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};

/// Environment variable prefix for overrides, e.g. `ACCESS_CONTROL_RBAC_ROLE_MENU_MODE=false`.
pub const ENV_PREFIX: &str = "ACCESS_CONTROL_";

/// Configuration for the access-control module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AccessControlConfig {
    /// Paths that skip authorization entirely (exact match).
    pub token_path_exclude: Vec<String>,

    /// Regex patterns for paths that skip authorization entirely.
    pub token_path_exclude_patterns: Vec<String>,

    /// When `true`, permission codes are checked against the principal's menus.
    /// When `false`, the external policy engine decides.
    pub rbac_role_menu_mode: bool,

    /// Permission codes that are always granted in menu-code mode.
    pub rbac_role_menu_exclude: Vec<String>,

    /// Key prefix of per-user principal snapshots in the cache store.
    pub user_cache_prefix: String,

    /// Lifetime of a cached principal snapshot.
    pub principal_cache_ttl_secs: u64,

    /// Columns that can never be targeted by a data rule.
    pub data_permission_column_exclude: Vec<String>,
}

impl Default for AccessControlConfig {
    fn default() -> Self {
        Self {
            token_path_exclude: vec!["/api/v1/auth/login".to_owned()],
            token_path_exclude_patterns: vec![r"^/api/v1/monitors/(redis|server)$".to_owned()],
            rbac_role_menu_mode: true,
            rbac_role_menu_exclude: vec![
                "sys:monitor:redis".to_owned(),
                "sys:monitor:server".to_owned(),
            ],
            user_cache_prefix: "access:user".to_owned(),
            principal_cache_ttl_secs: 86_400,
            data_permission_column_exclude: vec![
                "id".to_owned(),
                "sort".to_owned(),
                "del_flag".to_owned(),
                "created_time".to_owned(),
                "updated_time".to_owned(),
            ],
        }
    }
}

impl AccessControlConfig {
    /// Load configuration: defaults, then the YAML file at `path`, then
    /// `ACCESS_CONTROL_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the merged configuration does not deserialize,
    /// including unknown keys.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let config = Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Yaml::file(path))
            .merge(Env::prefixed(ENV_PREFIX))
            .extract()?;
        Ok(config)
    }

    /// Cache key of a user's principal snapshot.
    #[must_use]
    pub fn user_cache_key(&self, user_id: i64) -> String {
        format!("{}:{user_id}", self.user_cache_prefix)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_default_config() {
        let cfg = AccessControlConfig::default();
        assert!(cfg.rbac_role_menu_mode);
        assert_eq!(cfg.token_path_exclude, vec!["/api/v1/auth/login"]);
        assert_eq!(cfg.principal_cache_ttl_secs, 86_400);
        assert!(cfg.data_permission_column_exclude.contains(&"del_flag".to_owned()));
    }

    #[test]
    fn test_user_cache_key() {
        let cfg = AccessControlConfig::default();
        assert_eq!(cfg.user_cache_key(42), "access:user:42");
    }

    #[test]
    fn test_load_merges_yaml_over_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "rbac_role_menu_mode: false").unwrap();
        writeln!(file, "user_cache_prefix: \"authz:user\"").unwrap();

        let cfg = AccessControlConfig::load(file.path()).unwrap();

        assert!(!cfg.rbac_role_menu_mode);
        assert_eq!(cfg.user_cache_prefix, "authz:user");
        // untouched keys keep their defaults
        assert_eq!(cfg.token_path_exclude, vec!["/api/v1/auth/login"]);
    }

    #[test]
    fn test_load_rejects_unknown_keys() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "no_such_option: 1").unwrap();

        assert!(AccessControlConfig::load(file.path()).is_err());
    }
}
