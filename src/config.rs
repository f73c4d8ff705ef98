//! Layered runtime configuration.
//!
//! Built-in defaults, then an optional TOML file, then `.env`, then the process
//! environment. Keys match the environment variable names in lower case.

use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{ProcessingError, Result};
use crate::models::RasterProduct;
use crate::utils::constants::{
    DEFAULT_BACKUP_DIR, DEFAULT_CONFIG_FILE, DEFAULT_GPORTAL_SEARCH_URL, DEFAULT_MYSQL_DATABASE,
    DEFAULT_MYSQL_HOST, DEFAULT_MYSQL_PORT, DEFAULT_MYSQL_USER,
};

const ENV_KEYS: &[&str] = &[
    "GPORTAL_USERNAME",
    "GPORTAL_PASSWORD",
    "GPORTAL_SEARCH_URL",
    "GPORTAL_LST_DATASET_ID",
    "GPORTAL_NDVI_DATASET_ID",
    "DATABASE_URL",
    "MYSQL_HOST",
    "MYSQL_PORT",
    "MYSQL_USER",
    "MYSQL_PASSWORD",
    "MYSQL_DATABASE",
    "BACKUP_DIR",
];

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub gportal_username: Option<String>,
    pub gportal_password: Option<String>,
    pub gportal_search_url: String,
    pub gportal_lst_dataset_id: Option<String>,
    pub gportal_ndvi_dataset_id: Option<String>,

    pub database_url: Option<String>,
    pub mysql_host: String,
    pub mysql_port: u16,
    pub mysql_user: String,
    pub mysql_password: Option<String>,
    pub mysql_database: String,

    pub backup_dir: PathBuf,
}

/// Where the observation store lives.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreSettings {
    Url(String),
    MySql {
        host: String,
        port: u16,
        user: String,
        password: String,
        database: String,
    },
}

impl AppConfig {
    /// Load from `config_file` (or `sgli.toml` if present), `.env` and the environment.
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        dotenvy::dotenv().ok();

        let env: HashMap<String, String> = std::env::vars()
            .filter(|(key, _)| ENV_KEYS.contains(&key.as_str()))
            .collect();

        Self::from_sources(config_file, env)
    }

    pub fn from_sources(config_file: Option<&Path>, env: HashMap<String, String>) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("gportal_search_url", DEFAULT_GPORTAL_SEARCH_URL)?
            .set_default("mysql_host", DEFAULT_MYSQL_HOST)?
            .set_default("mysql_port", DEFAULT_MYSQL_PORT as i64)?
            .set_default("mysql_user", DEFAULT_MYSQL_USER)?
            .set_default("mysql_database", DEFAULT_MYSQL_DATABASE)?
            .set_default("backup_dir", DEFAULT_BACKUP_DIR)?;

        builder = match config_file {
            Some(path) => builder.add_source(File::from(path).format(FileFormat::Toml)),
            None => builder.add_source(
                File::with_name(DEFAULT_CONFIG_FILE)
                    .format(FileFormat::Toml)
                    .required(false),
            ),
        };

        let settings = builder
            .add_source(Environment::default().source(Some(env)))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Username and password for the catalog service, if both are set.
    pub fn catalog_credentials(&self) -> Option<(&str, &str)> {
        match (
            non_empty(&self.gportal_username),
            non_empty(&self.gportal_password),
        ) {
            (Some(user), Some(password)) => Some((user, password)),
            _ => None,
        }
    }

    pub fn dataset_id(&self, product: RasterProduct) -> Option<&str> {
        match product {
            RasterProduct::Lst => non_empty(&self.gportal_lst_dataset_id),
            RasterProduct::Ndvi => non_empty(&self.gportal_ndvi_dataset_id),
        }
    }

    pub fn catalog_configured(&self) -> bool {
        self.catalog_credentials().is_some()
            && RasterProduct::ALL
                .iter()
                .all(|p| self.dataset_id(*p).is_some())
    }

    /// `DATABASE_URL` wins; otherwise MySQL settings, which need a password.
    pub fn store_settings(&self) -> Result<StoreSettings> {
        if let Some(url) = non_empty(&self.database_url) {
            return Ok(StoreSettings::Url(url.to_string()));
        }

        match non_empty(&self.mysql_password) {
            Some(password) => Ok(StoreSettings::MySql {
                host: self.mysql_host.clone(),
                port: self.mysql_port,
                user: self.mysql_user.clone(),
                password: password.to_string(),
                database: self.mysql_database.clone(),
            }),
            None => Err(ProcessingError::Config(
                "no store configured: set DATABASE_URL or MYSQL_PASSWORD".to_string(),
            )),
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() -> Result<()> {
        let cfg = AppConfig::from_sources(None, HashMap::new())?;

        assert_eq!(cfg.gportal_search_url, DEFAULT_GPORTAL_SEARCH_URL);
        assert_eq!(cfg.mysql_port, 3306);
        assert_eq!(cfg.backup_dir, PathBuf::from(DEFAULT_BACKUP_DIR));
        assert!(cfg.catalog_credentials().is_none());
        assert!(!cfg.catalog_configured());
        assert!(cfg.store_settings().is_err());
        Ok(())
    }

    #[test]
    fn test_environment_overrides() -> Result<()> {
        let cfg = AppConfig::from_sources(
            None,
            env(&[
                ("GPORTAL_USERNAME", "user"),
                ("GPORTAL_PASSWORD", "secret"),
                ("GPORTAL_LST_DATASET_ID", "lst-id"),
                ("GPORTAL_NDVI_DATASET_ID", "vgi-id"),
                ("MYSQL_PASSWORD", "pw"),
                ("MYSQL_PORT", "3307"),
            ]),
        )?;

        assert_eq!(cfg.catalog_credentials(), Some(("user", "secret")));
        assert_eq!(cfg.dataset_id(RasterProduct::Ndvi), Some("vgi-id"));
        assert!(cfg.catalog_configured());
        assert_eq!(
            cfg.store_settings()?,
            StoreSettings::MySql {
                host: "localhost".to_string(),
                port: 3307,
                user: "root".to_string(),
                password: "pw".to_string(),
                database: "satellite_viewer".to_string(),
            }
        );
        Ok(())
    }

    #[test]
    fn test_empty_credentials_are_unset() -> Result<()> {
        let cfg = AppConfig::from_sources(
            None,
            env(&[("GPORTAL_USERNAME", "user"), ("GPORTAL_PASSWORD", "  ")]),
        )?;
        assert!(cfg.catalog_credentials().is_none());
        Ok(())
    }

    #[test]
    fn test_database_url_wins() -> Result<()> {
        let cfg = AppConfig::from_sources(
            None,
            env(&[
                ("DATABASE_URL", "sqlite://obs.db"),
                ("MYSQL_PASSWORD", "pw"),
            ]),
        )?;
        assert_eq!(
            cfg.store_settings()?,
            StoreSettings::Url("sqlite://obs.db".to_string())
        );
        Ok(())
    }

    #[test]
    fn test_config_file_then_environment() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "backup_dir = \"/var/backups/sgli\"")?;
        writeln!(file, "mysql_user = \"ingest\"")?;

        let cfg = AppConfig::from_sources(
            Some(file.path()),
            env(&[("MYSQL_USER", "override")]),
        )?;

        assert_eq!(cfg.backup_dir, PathBuf::from("/var/backups/sgli"));
        assert_eq!(cfg.mysql_user, "override");
        Ok(())
    }
}
