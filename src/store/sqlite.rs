use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection};
use sqlx::Connection;
use std::str::FromStr;
use tracing::debug;

use crate::error::Result;
use crate::models::{Coordinate, ObservationValues};
use crate::store::{finish_transaction, statements, ObservationStore, UpsertEffect};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS locations (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    latitude REAL,
    longitude REAL
);

CREATE TABLE IF NOT EXISTS observations (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    location_id INTEGER NOT NULL REFERENCES locations(id),
    observation_date DATE NOT NULL,
    lst REAL,
    ndvi REAL,
    UNIQUE (location_id, observation_date)
);
"#;

/// SQLite-backed store, used for local runs and tests.
pub struct SqliteStore {
    conn: SqliteConnection,
}

impl SqliteStore {
    pub async fn connect(url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let conn = SqliteConnection::connect_with(&options).await?;
        debug!("connected to {}", url);
        Ok(Self { conn })
    }
}

/// SQLite reports one affected row for both branches of an upsert, so the
/// previous row is read first within the same transaction.
async fn upsert_in(
    conn: &mut SqliteConnection,
    location_id: i64,
    values: &ObservationValues,
) -> Result<UpsertEffect> {
    let existing = sqlx::query_as::<_, (Option<f64>, Option<f64>)>(
        "SELECT lst, ndvi FROM observations WHERE location_id = ? AND observation_date = ?",
    )
    .bind(location_id)
    .bind(values.observation_date)
    .fetch_optional(&mut *conn)
    .await?;

    let effect = match existing {
        None => UpsertEffect::Inserted,
        Some((lst, ndvi)) if lst == values.lst && ndvi == values.ndvi => {
            return Ok(UpsertEffect::Unchanged)
        }
        Some(_) => UpsertEffect::Updated,
    };

    sqlx::query(
        r#"
        INSERT INTO observations (location_id, observation_date, lst, ndvi)
        VALUES (?, ?, ?, ?)
        ON CONFLICT (location_id, observation_date)
        DO UPDATE SET lst = excluded.lst, ndvi = excluded.ndvi
        "#,
    )
    .bind(location_id)
    .bind(values.observation_date)
    .bind(values.lst)
    .bind(values.ndvi)
    .execute(&mut *conn)
    .await?;

    Ok(effect)
}

#[async_trait]
impl ObservationStore for SqliteStore {
    async fn location_name(&mut self, location_id: i64) -> Result<Option<String>> {
        let name = sqlx::query_scalar::<_, String>("SELECT name FROM locations WHERE id = ?")
            .bind(location_id)
            .fetch_optional(&mut self.conn)
            .await?;
        Ok(name)
    }

    async fn upsert_observation(
        &mut self,
        location_id: i64,
        values: &ObservationValues,
    ) -> Result<UpsertEffect> {
        let mut tx = self.conn.begin().await?;
        let result = upsert_in(&mut tx, location_id, values).await;
        finish_transaction(tx, result).await
    }

    async fn apply_schema(&mut self) -> Result<()> {
        for statement in statements(SCHEMA) {
            sqlx::query(statement).execute(&mut self.conn).await?;
        }
        Ok(())
    }

    async fn register_location(&mut self, name: &str, coordinate: &Coordinate) -> Result<i64> {
        let result =
            sqlx::query("INSERT INTO locations (name, latitude, longitude) VALUES (?, ?, ?)")
                .bind(name)
                .bind(coordinate.latitude)
                .bind(coordinate.longitude)
                .execute(&mut self.conn)
                .await?;
        Ok(result.last_insert_rowid())
    }

    async fn close(self: Box<Self>) -> Result<()> {
        self.conn.close().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    async fn open(dir: &TempDir) -> SqliteStore {
        let url = format!("sqlite://{}", dir.path().join("obs.db").display());
        let mut store = SqliteStore::connect(&url).await.unwrap();
        store.apply_schema().await.unwrap();
        store
    }

    fn values(lst: Option<f64>) -> ObservationValues {
        ObservationValues {
            observation_date: NaiveDate::from_ymd_opt(2026, 1, 8).unwrap(),
            lst,
            ndvi: Some(0.712),
        }
    }

    #[tokio::test]
    async fn test_schema_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let mut store = open(&dir).await;
        store.apply_schema().await.unwrap();
        Box::new(store).close().await.unwrap();
    }

    #[tokio::test]
    async fn test_location_lookup() {
        let dir = TempDir::new().unwrap();
        let mut store = open(&dir).await;

        let id = store
            .register_location("Kumamoto", &Coordinate::new(32.8032, 130.7075))
            .await
            .unwrap();

        assert_eq!(store.location_name(id).await.unwrap().as_deref(), Some("Kumamoto"));
        assert_eq!(store.location_name(id + 100).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_upsert_effects() {
        let dir = TempDir::new().unwrap();
        let mut store = open(&dir).await;
        let id = store
            .register_location("Field", &Coordinate::new(0.0, 0.0))
            .await
            .unwrap();

        let first = store.upsert_observation(id, &values(Some(18.35))).await.unwrap();
        let again = store.upsert_observation(id, &values(Some(18.35))).await.unwrap();
        let changed = store.upsert_observation(id, &values(Some(19.0))).await.unwrap();

        assert_eq!(first, UpsertEffect::Inserted);
        assert_eq!(again, UpsertEffect::Unchanged);
        assert_eq!(changed, UpsertEffect::Updated);

        let rows: Vec<(Option<f64>, Option<f64>)> =
            sqlx::query_as("SELECT lst, ndvi FROM observations")
                .fetch_all(&mut store.conn)
                .await
                .unwrap();
        assert_eq!(rows, vec![(Some(19.0), Some(0.712))]);
    }

    #[tokio::test]
    async fn test_failed_upsert_returns_write_error() {
        let dir = TempDir::new().unwrap();
        let mut store = open(&dir).await;
        let id = store
            .register_location("Field", &Coordinate::new(0.0, 0.0))
            .await
            .unwrap();
        sqlx::query("DROP TABLE observations")
            .execute(&mut store.conn)
            .await
            .unwrap();

        let err = store.upsert_observation(id, &values(Some(18.35))).await.unwrap_err();
        assert!(err.to_string().contains("no such table"));

        // the transaction was released, so the connection is usable again
        store.apply_schema().await.unwrap();
        let effect = store.upsert_observation(id, &values(Some(18.35))).await.unwrap();
        assert_eq!(effect, UpsertEffect::Inserted);
    }

    #[tokio::test]
    async fn test_null_values_round_trip() {
        let dir = TempDir::new().unwrap();
        let mut store = open(&dir).await;
        let id = store
            .register_location("Field", &Coordinate::new(0.0, 0.0))
            .await
            .unwrap();

        store.upsert_observation(id, &values(None)).await.unwrap();
        let effect = store.upsert_observation(id, &values(None)).await.unwrap();
        assert_eq!(effect, UpsertEffect::Unchanged);
    }
}
