use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::identity::{normalize_name, Claim};
use crate::{CoreError, Result};

/// Env var pointing at an alternate config file
pub const CONFIG_ENV: &str = "GESN_CONFIG";

/// Centralized configuration for the GesN data layer
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GesnConfig {
    pub database: DatabaseConfig,
    pub seed: SeedConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite connection URL, `${VAR}` references are expanded on load
    pub url: String,
    /// How long a connection waits on a locked database
    pub busy_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            busy_timeout_secs: 5,
        }
    }
}

/// Roles, claims and admin account the identity seeder ensures exist
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    pub roles: Vec<RoleSeed>,
    pub admin: AdminSeed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleSeed {
    pub name: String,
    #[serde(default)]
    pub claims: Vec<Claim>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminSeed {
    pub user_name: String,
    pub email: String,
    pub password: String,
    /// Claims granted on top of every role claim
    pub extra_claims: Vec<Claim>,
}

impl Default for AdminSeed {
    fn default() -> Self {
        Self {
            user_name: "admin".into(),
            email: "admin@gesn.local".into(),
            password: "ChangeMe!2024".into(),
            extra_claims: Vec::new(),
        }
    }
}

impl Default for SeedConfig {
    fn default() -> Self {
        let role = |name: &str, perms: &[&str]| RoleSeed {
            name: name.into(),
            claims: perms.iter().map(|p| Claim::permission(*p)).collect(),
        };

        Self {
            roles: vec![
                role(
                    "Admin",
                    &["users.manage", "roles.manage", "claims.manage", "settings.manage"],
                ),
                role(
                    "Manager",
                    &["products.manage", "orders.manage", "customers.manage", "reports.view"],
                ),
                role("Salesperson", &["orders.create", "customers.view", "products.view"]),
            ],
            admin: AdminSeed::default(),
        }
    }
}

impl SeedConfig {
    /// Every role claim plus the admin's extra claims, first occurrence wins.
    pub fn admin_claims(&self) -> Vec<Claim> {
        let mut seen = HashSet::new();
        self.roles
            .iter()
            .flat_map(|r| r.claims.iter())
            .chain(self.admin.extra_claims.iter())
            .filter(|c| seen.insert((*c).clone()))
            .cloned()
            .collect()
    }

    /// Check the seed is usable before touching the database
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();
        let mut names = HashSet::new();

        for role in &self.roles {
            if role.name.trim().is_empty() {
                errors.push("seed.roles contains a role with an empty name".to_owned());
            } else if !names.insert(normalize_name(&role.name)) {
                errors.push(format!("seed.roles lists '{}' more than once", role.name));
            }
        }
        if self.admin.user_name.trim().is_empty() {
            errors.push("seed.admin.user_name is empty".to_owned());
        }
        if self.admin.password.is_empty() {
            errors.push("seed.admin.password is empty".to_owned());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(CoreError::invalid_config(errors.join("; ")))
        }
    }
}

/// Default database location: ~/.gesn/gesn.db
fn default_database_url() -> String {
    let dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".gesn");
    format!("sqlite://{}", dir.join("gesn.db").display())
}

impl GesnConfig {
    /// Load config from `$GESN_CONFIG` or ~/.gesn/config.toml
    ///
    /// A missing file yields the defaults.
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Load and validate config from an explicit path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| CoreError::io(path, e))?;

        let mut config: Self = toml::from_str(&content).map_err(|source| CoreError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;

        config.expand_variables();
        config.seed.validate()?;

        Ok(config)
    }

    /// Get config file path: `$GESN_CONFIG` or ~/.gesn/config.toml
    pub fn config_path() -> PathBuf {
        if let Ok(path) = env::var(CONFIG_ENV) {
            return PathBuf::from(path);
        }
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".gesn/config.toml")
    }

    /// Render as TOML (used by `gesn config show/init`)
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Expand ${var} references in the database URL
    fn expand_variables(&mut self) {
        let mut vars = HashMap::new();
        vars.insert("HOME".to_string(), env::var("HOME").unwrap_or_default());
        vars.insert(
            "GESN_DATA_DIR".to_string(),
            env::var("GESN_DATA_DIR").unwrap_or_default(),
        );

        self.database.url = Self::expand_string(&self.database.url, &vars);
    }

    /// Expand ${var} references in a string
    fn expand_string(s: &str, vars: &HashMap<String, String>) -> String {
        let mut result = s.to_string();

        for (key, value) in vars {
            let pattern = format!("${{{}}}", key);
            result = result.replace(&pattern, value);
        }

        result
    }
}
