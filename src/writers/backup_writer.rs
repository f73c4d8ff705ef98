use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::Result;
use crate::models::ObservationValues;
use crate::utils::generate_backup_filename;

/// One row of the CSV backup. `error` is empty unless the attempt failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackupRow {
    pub location_id: i64,
    pub observation_date: NaiveDate,
    pub lst: Option<f64>,
    pub ndvi: Option<f64>,
    pub error: String,
}

/// Append-only CSV backup for one run.
///
/// The file name carries the run's timestamp, so separate runs never share a file.
/// The header is written with the first row.
pub struct BackupWriter {
    path: PathBuf,
}

impl BackupWriter {
    pub fn new(backup_dir: &Path) -> Self {
        Self {
            path: generate_backup_filename(backup_dir),
        }
    }

    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(
        &self,
        location_id: i64,
        values: &ObservationValues,
        error: Option<&str>,
    ) -> Result<PathBuf> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let file_exists = self.path.exists();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(!file_exists)
            .from_writer(file);

        writer.serialize(BackupRow {
            location_id,
            observation_date: values.observation_date,
            lst: values.lst,
            ndvi: values.ndvi,
            error: error.unwrap_or_default().to_string(),
        })?;
        writer.flush()?;

        info!("CSV backup saved: {}", self.path.display());
        Ok(self.path.clone())
    }

    /// Rows currently in the backup file.
    pub fn read_rows(&self) -> Result<Vec<BackupRow>> {
        let mut reader = csv::Reader::from_path(&self.path)?;
        let mut rows = Vec::new();
        for row in reader.deserialize() {
            rows.push(row?);
        }
        Ok(rows)
    }
}
