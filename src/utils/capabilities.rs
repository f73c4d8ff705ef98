use crate::config::{AppConfig, StoreSettings};

/// What this build and configuration can do, probed once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilityReport {
    /// Raster files can be read and written (compiled with the `hdf5` feature).
    pub scientific_files: bool,
    /// Catalog credentials and dataset ids are configured.
    pub remote_catalog: bool,
    /// A store connection can be attempted.
    pub relational_store: bool,
}

impl CapabilityReport {
    pub fn probe(config: &AppConfig) -> Self {
        Self {
            scientific_files: cfg!(feature = "hdf5"),
            remote_catalog: config.catalog_configured(),
            relational_store: config.store_settings().is_ok(),
        }
    }

    /// Real acquisition needs both the catalog and a way to read what it returns.
    pub fn can_acquire_remote(&self) -> bool {
        self.scientific_files && self.remote_catalog
    }

    pub fn missing(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if !self.scientific_files {
            missing.push("scientific file support (rebuild with --features hdf5)");
        }
        if !self.remote_catalog {
            missing.push(
                "catalog access (GPORTAL_USERNAME, GPORTAL_PASSWORD, GPORTAL_*_DATASET_ID)",
            );
        }
        if !self.relational_store {
            missing.push("observation store (DATABASE_URL or MYSQL_PASSWORD)");
        }
        missing
    }

    /// One aggregated diagnostic line.
    pub fn diagnostic(&self) -> String {
        let missing = self.missing();
        if missing.is_empty() {
            "all capabilities available".to_string()
        } else {
            format!("missing: {}", missing.join("; "))
        }
    }

    pub fn summary(&self, config: &AppConfig) -> String {
        let store = match config.store_settings() {
            Ok(StoreSettings::Url(url)) => url
                .split_once("://")
                .map(|(scheme, _)| format!("{} url", scheme))
                .unwrap_or_else(|| "url".to_string()),
            Ok(StoreSettings::MySql {
                host, port, database, ..
            }) => format!("mysql {}:{}/{}", host, port, database),
            Err(_) => "not configured".to_string(),
        };

        format!(
            "Capabilities:\n  scientific files: {}\n  remote catalog:   {}\n  store:            {}\n  {}",
            yes_no(self.scientific_files),
            yes_no(self.remote_catalog),
            store,
            self.diagnostic()
        )
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_unconfigured_probe() {
        let config = AppConfig::from_sources(None, HashMap::new()).unwrap();
        let report = CapabilityReport::probe(&config);

        assert!(!report.remote_catalog);
        assert!(!report.relational_store);
        assert!(!report.can_acquire_remote());
        assert!(report.diagnostic().contains("observation store"));
        assert!(report.summary(&config).contains("not configured"));
    }

    #[test]
    fn test_store_configured_by_url() {
        let mut env = HashMap::new();
        env.insert("DATABASE_URL".to_string(), "sqlite://obs.db".to_string());
        let config = AppConfig::from_sources(None, env).unwrap();
        let report = CapabilityReport::probe(&config);

        assert!(report.relational_store);
        assert!(!report.missing().iter().any(|m| m.contains("store")));
        assert!(report.summary(&config).contains("sqlite url"));
    }

    #[test]
    fn test_scientific_support_follows_feature() {
        let config = AppConfig::from_sources(None, HashMap::new()).unwrap();
        assert_eq!(
            CapabilityReport::probe(&config).scientific_files,
            cfg!(feature = "hdf5")
        );
    }
}
