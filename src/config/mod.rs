use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::info;

use crate::{
    core::{
        services::report_service::{DEFAULT_RECENT_LIMIT, DEFAULT_TREND_MONTHS},
        time::TrendStepping,
    },
    errors::LedgerResult,
    storage::{LedgerStore, MemoryStore, MissingIdPolicy, SqliteStore},
    utils::{self, persistence::write_atomic},
};

/// Which persistence backend owns the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    #[default]
    Memory,
    Sqlite,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub backend: BackendKind,
    /// SQLite file; defaults to `ledger.db` in the data directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_path: Option<PathBuf>,
    /// Report unknown ids on delete/update instead of ignoring them.
    pub strict_ids: bool,
    pub trend_months: usize,
    pub trend_stepping: TrendStepping,
    pub recent_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: BackendKind::Memory,
            database_path: None,
            strict_ids: false,
            trend_months: DEFAULT_TREND_MONTHS,
            trend_stepping: TrendStepping::ThirtyDay,
            recent_limit: DEFAULT_RECENT_LIMIT,
        }
    }
}

impl Config {
    pub fn missing_id_policy(&self) -> MissingIdPolicy {
        MissingIdPolicy::from_strict(self.strict_ids)
    }

    /// Constructs the configured store. Relative database paths resolve against `base`.
    pub fn open_store(&self, base: &Path) -> LedgerResult<Box<dyn LedgerStore>> {
        let policy = self.missing_id_policy();
        let store: Box<dyn LedgerStore> = match self.backend {
            BackendKind::Memory => Box::new(MemoryStore::with_policy(policy)),
            BackendKind::Sqlite => {
                let path = match &self.database_path {
                    Some(path) if path.is_absolute() => path.clone(),
                    Some(path) => base.join(path),
                    None => utils::database_file_in(base),
                };
                Box::new(SqliteStore::open(path, policy)?)
            }
        };
        info!(backend = store.backend_name(), strict = self.strict_ids, "ledger store opened");
        Ok(store)
    }
}

/// Loads and saves [`Config`] as JSON inside the application data directory.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    base: PathBuf,
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> LedgerResult<Self> {
        Self::with_base_dir(utils::app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> LedgerResult<Self> {
        fs::create_dir_all(&base)?;
        Ok(Self {
            path: utils::config_file_in(&base),
            base,
        })
    }

    /// Missing file yields defaults; absent fields take their default values.
    pub fn load(&self) -> LedgerResult<Config> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            Ok(serde_json::from_str(&data)?)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> LedgerResult<()> {
        let json = serde_json::to_string_pretty(config)?;
        write_atomic(&self.path, &json)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn base_dir(&self) -> &Path {
        &self.base
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        let config = manager.load().unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.trend_months, 6);
        assert_eq!(config.recent_limit, 10);
    }

    #[test]
    fn save_then_load_roundtrip() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        let config = Config {
            backend: BackendKind::Sqlite,
            strict_ids: true,
            trend_stepping: TrendStepping::Calendar,
            ..Config::default()
        };
        manager.save(&config).unwrap();
        assert_eq!(manager.load().unwrap(), config);
        assert!(!utils::persistence::tmp_path(manager.path()).exists());
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        fs::write(manager.path(), r#"{"backend": "sqlite", "trend_stepping": "calendar"}"#)
            .unwrap();
        let config = manager.load().unwrap();
        assert_eq!(config.backend, BackendKind::Sqlite);
        assert_eq!(config.trend_stepping, TrendStepping::Calendar);
        assert!(!config.strict_ids);
        assert_eq!(config.trend_months, 6);
    }

    #[test]
    fn sqlite_backend_opens_inside_base_dir() {
        let dir = tempdir().unwrap();
        let config = Config {
            backend: BackendKind::Sqlite,
            database_path: Some(PathBuf::from("data/finance.db")),
            ..Config::default()
        };
        let store = config.open_store(dir.path()).unwrap();
        assert_eq!(store.backend_name(), "sqlite");
        assert!(dir.path().join("data/finance.db").exists());
    }
}
