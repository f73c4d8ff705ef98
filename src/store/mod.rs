//! Relational observation store.
//!
//! Two tables: `locations` (referenced by id) and `observations`, unique on
//! `(location_id, observation_date)`.

pub mod mysql;
pub mod sqlite;

pub use mysql::MySqlStore;
pub use sqlite::SqliteStore;

use async_trait::async_trait;
use sqlx::{Database, Transaction};
use tracing::warn;

use crate::config::StoreSettings;
use crate::error::{ProcessingError, Result};
use crate::models::{Coordinate, IngestionOutcome, ObservationValues};

/// Effect of an upsert on the target row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertEffect {
    Inserted,
    Updated,
    Unchanged,
}

impl From<UpsertEffect> for IngestionOutcome {
    fn from(effect: UpsertEffect) -> Self {
        match effect {
            UpsertEffect::Inserted => IngestionOutcome::Inserted,
            UpsertEffect::Updated => IngestionOutcome::Updated,
            UpsertEffect::Unchanged => IngestionOutcome::Unchanged,
        }
    }
}

/// One open connection to an observation store.
#[async_trait]
pub trait ObservationStore: Send {
    /// Name of the location with `location_id`, if it exists.
    async fn location_name(&mut self, location_id: i64) -> Result<Option<String>>;

    /// Insert or replace the row for `(location_id, values.observation_date)`
    /// inside a transaction. A failed write is rolled back.
    async fn upsert_observation(
        &mut self,
        location_id: i64,
        values: &ObservationValues,
    ) -> Result<UpsertEffect>;

    /// Create the tables if they do not exist.
    async fn apply_schema(&mut self) -> Result<()>;

    /// Add a location and return its id.
    async fn register_location(&mut self, name: &str, coordinate: &Coordinate) -> Result<i64>;

    async fn close(self: Box<Self>) -> Result<()>;
}

/// Open a store connection for `settings`. The backend follows the URL scheme.
pub async fn connect(settings: &StoreSettings) -> Result<Box<dyn ObservationStore>> {
    match settings {
        StoreSettings::Url(url) if url.starts_with("sqlite:") => {
            Ok(Box::new(SqliteStore::connect(url).await?))
        }
        StoreSettings::Url(url) if url.starts_with("mysql:") || url.starts_with("mariadb:") => {
            Ok(Box::new(MySqlStore::connect_url(url).await?))
        }
        StoreSettings::Url(url) => Err(ProcessingError::UnsupportedStore(redact(url))),
        StoreSettings::MySql {
            host,
            port,
            user,
            password,
            database,
        } => Ok(Box::new(
            MySqlStore::connect(host, *port, user, password, database).await?,
        )),
    }
}

/// Scheme and host part of a URL, without credentials.
pub fn redact(url: &str) -> String {
    match url.split_once("://") {
        Some((scheme, rest)) => {
            let host = rest.rsplit_once('@').map(|(_, h)| h).unwrap_or(rest);
            format!("{}://{}", scheme, host)
        }
        None => url.to_string(),
    }
}

/// Commit `tx` when `result` is a success, roll it back otherwise.
///
/// A failed rollback is logged; the write error is what the caller sees.
pub(crate) async fn finish_transaction<DB, T>(
    tx: Transaction<'_, DB>,
    result: Result<T>,
) -> Result<T>
where
    DB: Database,
{
    match result {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(e) => {
            if let Err(rollback_err) = tx.rollback().await {
                warn!("Rollback after \"{}\" failed: {}", e, rollback_err);
            }
            Err(e)
        }
    }
}

/// Run each `;`-separated statement of `sql` in order.
pub(crate) fn statements(sql: &str) -> impl Iterator<Item = &str> {
    sql.split(';').map(str::trim).filter(|s| !s.is_empty())
}
