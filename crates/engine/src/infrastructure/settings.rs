//! Engine settings.
//!
//! Settings come from an optional JSON file named by `CLAIMWARD_CONFIG`,
//! then individual environment variables override the default policy.
//! Per-world policies only come from the file.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use claimward_domain::{AreaLimitMode, ClaimPolicy, DomainError, FlagRegistry, WorldName};

use super::permissions::GrantConfig;

const CONFIG_VAR: &str = "CLAIMWARD_CONFIG";
const DATA_DIR_VAR: &str = "CLAIMWARD_DATA_DIR";
const CLAIM_BORDER_VAR: &str = "CLAIMWARD_CLAIM_BORDER";
const CLAIM_FLOOR_VAR: &str = "CLAIMWARD_CLAIM_FLOOR";
const MAX_CLAIM_AREA_VAR: &str = "CLAIMWARD_MAX_CLAIM_AREA";
const MAX_REGION_COUNT_VAR: &str = "CLAIMWARD_MAX_REGION_COUNT";
const AREA_LIMIT_VAR: &str = "CLAIMWARD_AREA_LIMIT";

const DEFAULT_DATA_DIR: &str = "data";

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Failed to read settings file {path}: {message}")]
    Io { path: String, message: String },
    #[error("Failed to parse settings file {path}: {message}")]
    Parse { path: String, message: String },
    #[error("Invalid value for {key}: '{value}'")]
    InvalidValue { key: &'static str, value: String },
    #[error("Invalid claim policy for {scope}: {source}")]
    Policy {
        scope: String,
        #[source]
        source: DomainError,
    },
}

/// Everything the engine needs to start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Root directory of the JSON region store.
    pub data_dir: PathBuf,
    /// Policy for worlds without an override.
    pub default_policy: ClaimPolicy,
    /// Per-world overrides, keyed by world name.
    pub world_policies: BTreeMap<String, ClaimPolicy>,
    /// Permission grants for the built-in grant table.
    pub permissions: GrantConfig,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            default_policy: ClaimPolicy::default(),
            world_policies: BTreeMap::new(),
            permissions: GrantConfig::new(),
        }
    }
}

fn override_with<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    target: &mut T,
) -> Result<(), SettingsError> {
    if let Some(raw) = lookup(key) {
        *target = raw
            .trim()
            .parse()
            .map_err(|_| SettingsError::InvalidValue { key, value: raw })?;
    }
    Ok(())
}

fn parse_area_limit(raw: &str) -> Option<AreaLimitMode> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "warn" => Some(AreaLimitMode::Warn),
        "reject" => Some(AreaLimitMode::Reject),
        _ => None,
    }
}

impl EngineSettings {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using `lookup` in place of the environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, SettingsError> {
        let mut settings = match lookup(CONFIG_VAR) {
            Some(path) => Self::from_file(Path::new(&path))?,
            None => Self::default(),
        };

        if let Some(dir) = lookup(DATA_DIR_VAR) {
            settings.data_dir = PathBuf::from(dir);
        }

        let policy = &mut settings.default_policy;
        override_with(&lookup, CLAIM_BORDER_VAR, &mut policy.border_distance)?;
        override_with(&lookup, CLAIM_FLOOR_VAR, &mut policy.claim_floor)?;
        override_with(&lookup, MAX_CLAIM_AREA_VAR, &mut policy.max_claim_area)?;
        override_with(&lookup, MAX_REGION_COUNT_VAR, &mut policy.max_region_count)?;
        if let Some(raw) = lookup(AREA_LIMIT_VAR) {
            policy.area_limit = parse_area_limit(&raw).ok_or(SettingsError::InvalidValue {
                key: AREA_LIMIT_VAR,
                value: raw,
            })?;
        }

        settings.validate(&FlagRegistry::standard())?;
        Ok(settings)
    }

    /// Read a JSON settings file. Missing fields take their defaults.
    pub fn from_file(path: &Path) -> Result<Self, SettingsError> {
        let text = std::fs::read_to_string(path).map_err(|e| SettingsError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        serde_json::from_str(&text).map_err(|e| SettingsError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Check every policy, including its default flags, against `registry`.
    pub fn validate(&self, registry: &FlagRegistry) -> Result<(), SettingsError> {
        self.default_policy
            .validate(registry)
            .map_err(|source| SettingsError::Policy {
                scope: "default policy".to_string(),
                source,
            })?;
        for (world, policy) in &self.world_policies {
            let scope = format!("world '{}'", world);
            WorldName::new(world.as_str()).map_err(|source| SettingsError::Policy {
                scope: scope.clone(),
                source,
            })?;
            policy
                .validate(registry)
                .map_err(|source| SettingsError::Policy { scope, source })?;
        }
        Ok(())
    }

    /// The policy in force for `world`.
    pub fn policy_for(&self, world: &WorldName) -> &ClaimPolicy {
        self.world_policies
            .get(world.as_str())
            .unwrap_or(&self.default_policy)
    }
}
