use tracing::{error, info, warn};

use crate::config::StoreSettings;
use crate::error::{ProcessingError, Result};
use crate::models::{IngestionOutcome, ObservationRecord, ObservationValues};
use crate::store::{self, ObservationStore};
use crate::writers::BackupWriter;

/// Writes one observation record into the store, falling back to a CSV backup.
///
/// Every run leaves a trace: a store row, a backup row, or both a failure
/// outcome and a backup row carrying the reason.
pub struct Ingestor {
    store: Option<StoreSettings>,
    backup: BackupWriter,
    backup_only: bool,
}

impl Ingestor {
    pub fn new(backup: BackupWriter) -> Self {
        Self {
            store: None,
            backup,
            backup_only: false,
        }
    }

    pub fn with_store(mut self, settings: StoreSettings) -> Self {
        self.store = Some(settings);
        self
    }

    pub fn with_backup_only(mut self, backup_only: bool) -> Self {
        self.backup_only = backup_only;
        self
    }

    pub async fn ingest(&self, record: &ObservationRecord, location_id: i64) -> IngestionOutcome {
        let values = ObservationValues::from_record(record);
        info!(
            "Ingesting {} for location {} (lst={:?}, ndvi={:?})",
            values.observation_date, location_id, values.lst, values.ndvi
        );

        if self.backup_only {
            return match self.backup.append(location_id, &values, None) {
                Ok(backup_file) => IngestionOutcome::BackedUp { backup_file },
                Err(e) => {
                    error!("Backup failed: {}", e);
                    IngestionOutcome::Failed {
                        reason: e.to_string(),
                        backup_file: None,
                    }
                }
            };
        }

        let result = match &self.store {
            Some(settings) => self.write_to_store(settings, location_id, &values).await,
            None => Err(ProcessingError::Config(
                "no observation store configured (set DATABASE_URL or MYSQL_PASSWORD)".to_string(),
            )),
        };

        match result {
            Ok(outcome) => {
                info!("Location {}: {}", location_id, outcome.describe());
                outcome
            }
            Err(e) => {
                error!("Ingestion failed: {}", e);
                let reason = e.to_string();
                let backup_file = match self.backup.append(location_id, &values, Some(&reason)) {
                    Ok(path) => Some(path),
                    Err(backup_err) => {
                        error!("Backup failed as well: {}", backup_err);
                        None
                    }
                };
                IngestionOutcome::Failed {
                    reason,
                    backup_file,
                }
            }
        }
    }

    /// The connection is closed on every path out of here.
    async fn write_to_store(
        &self,
        settings: &StoreSettings,
        location_id: i64,
        values: &ObservationValues,
    ) -> Result<IngestionOutcome> {
        let mut conn = store::connect(settings).await?;
        let result = upsert_for_location(conn.as_mut(), location_id, values).await;

        if let Err(e) = conn.close().await {
            warn!("Closing the store connection failed: {}", e);
        }
        result
    }
}

async fn upsert_for_location(
    store: &mut dyn ObservationStore,
    location_id: i64,
    values: &ObservationValues,
) -> Result<IngestionOutcome> {
    let name = store
        .location_name(location_id)
        .await?
        .ok_or(ProcessingError::LocationNotFound { location_id })?;
    info!("Location {} is '{}'", location_id, name);

    let effect = store.upsert_observation(location_id, values).await?;
    Ok(effect.into())
}
