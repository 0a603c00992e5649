//! Engine configuration: defaults, optional YAML file, then environment overrides.
//!
//! ```yaml
//! data_dir: data
//! raid_levels: [20, 25]
//! workers: 0
//! ```

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::engine::raid::{RaidTier, DEFAULT_RAID_LEVELS};
use crate::error::ConfigError;

pub const CONFIG_PATH_ENV: &str = "IVCALC_CONFIG";
pub const DATA_DIR_ENV: &str = "IVCALC_DATA_DIR";
pub const RAID_LEVELS_ENV: &str = "IVCALC_RAID_LEVELS";
pub const WORKERS_ENV: &str = "IVCALC_WORKERS";

const DEFAULT_DATA_DIR: &str = "data";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Directory holding `pokemon.json`, `type.json` and `registry.json`.
    pub data_dir: PathBuf,
    /// Canonical raid levels. Historically 15/20/25, currently 20/25.
    pub raid_levels: Vec<f64>,
    /// Solver worker threads; 0 uses the rayon default.
    pub workers: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            raid_levels: DEFAULT_RAID_LEVELS.to_vec(),
            workers: 0,
        }
    }
}

impl EngineConfig {
    /// Defaults, then the YAML file named by `IVCALC_CONFIG`, then env overrides.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(|name| env::var(name).ok())
    }

    /// Same as [EngineConfig::load] with an injectable variable lookup.
    pub fn load_with<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base = match lookup(CONFIG_PATH_ENV) {
            Some(path) => Self::from_yaml_file(Path::new(&path))?,
            None => Self::default(),
        };
        let config = base.with_overrides(lookup)?;
        config.raid_tier()?;
        Ok(config)
    }

    pub fn from_yaml_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup(DATA_DIR_ENV) {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(raw) = lookup(RAID_LEVELS_ENV) {
            self.raid_levels = raw
                .split(',')
                .map(str::trim)
                .filter(|part| !part.is_empty())
                .map(|part| {
                    part.parse::<f64>().map_err(|_| ConfigError::InvalidEnv {
                        name: RAID_LEVELS_ENV,
                        value: raw.clone(),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
        }
        if let Some(raw) = lookup(WORKERS_ENV) {
            self.workers = raw.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                name: WORKERS_ENV,
                value: raw.clone(),
            })?;
        }
        Ok(self)
    }

    pub fn raid_tier(&self) -> Result<RaidTier, ConfigError> {
        RaidTier::new(&self.raid_levels)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn defaults_without_environment() {
        let config = EngineConfig::load_with(lookup_from(&[])).expect("defaults are valid");
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.raid_levels, vec![20.0, 25.0]);
    }

    #[test]
    fn env_overrides_apply() {
        let config = EngineConfig::load_with(lookup_from(&[
            (DATA_DIR_ENV, "/srv/data"),
            (RAID_LEVELS_ENV, "15, 20,25"),
            (WORKERS_ENV, "4"),
        ]))
        .expect("overrides are valid");
        assert_eq!(config.data_dir, PathBuf::from("/srv/data"));
        assert_eq!(config.raid_levels, vec![15.0, 20.0, 25.0]);
        assert_eq!(config.workers, 4);
    }

    #[test]
    fn bad_env_values_are_rejected() {
        let err = EngineConfig::load_with(lookup_from(&[(WORKERS_ENV, "many")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnv { name, .. } if name == WORKERS_ENV));

        let err = EngineConfig::load_with(lookup_from(&[(RAID_LEVELS_ENV, "20,55")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidRaidLevel(level) if level == 55.0));
    }

    #[test]
    fn yaml_fills_missing_fields_with_defaults() {
        let config: EngineConfig =
            serde_yaml::from_str("raid_levels: [15, 20, 25]\n").expect("yaml should parse");
        assert_eq!(config.raid_levels, vec![15.0, 20.0, 25.0]);
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.raid_tier().map(|tier| tier.levels().len()).ok(), Some(3));
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let err = EngineConfig::load_with(lookup_from(&[(CONFIG_PATH_ENV, "/nonexistent/ivcalc.yaml")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
