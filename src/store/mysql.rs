use async_trait::async_trait;
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection};
use sqlx::Connection;
use std::str::FromStr;
use tracing::debug;

use crate::error::Result;
use crate::models::{Coordinate, ObservationValues};
use crate::store::{finish_transaction, statements, ObservationStore, UpsertEffect};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS locations (
    id INT AUTO_INCREMENT PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    latitude DOUBLE,
    longitude DOUBLE
);

CREATE TABLE IF NOT EXISTS observations (
    id INT AUTO_INCREMENT PRIMARY KEY,
    location_id INT NOT NULL,
    observation_date DATE NOT NULL,
    lst DECIMAL(6,2) NULL,
    ndvi DECIMAL(5,3) NULL,
    UNIQUE KEY uq_location_date (location_id, observation_date),
    FOREIGN KEY (location_id) REFERENCES locations(id)
)
"#;

pub struct MySqlStore {
    conn: MySqlConnection,
}

impl MySqlStore {
    pub async fn connect(
        host: &str,
        port: u16,
        user: &str,
        password: &str,
        database: &str,
    ) -> Result<Self> {
        let options = MySqlConnectOptions::new()
            .host(host)
            .port(port)
            .username(user)
            .password(password)
            .database(database)
            .charset("utf8mb4");
        Self::connect_with(&options).await
    }

    pub async fn connect_url(url: &str) -> Result<Self> {
        let options = MySqlConnectOptions::from_str(url)?.charset("utf8mb4");
        Self::connect_with(&options).await
    }

    async fn connect_with(options: &MySqlConnectOptions) -> Result<Self> {
        let conn = MySqlConnection::connect_with(options).await?;
        debug!("connected to MySQL");
        Ok(Self { conn })
    }
}

/// `ON DUPLICATE KEY UPDATE` reports 1 for an insert, 2 for an update and 0
/// when the row already held these values.
fn effect_from_rows_affected(rows: u64) -> UpsertEffect {
    match rows {
        1 => UpsertEffect::Inserted,
        2 => UpsertEffect::Updated,
        _ => UpsertEffect::Unchanged,
    }
}

#[async_trait]
impl ObservationStore for MySqlStore {
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
        let result: Result<UpsertEffect> = sqlx::query(
            r#"
            INSERT INTO observations (location_id, observation_date, lst, ndvi)
            VALUES (?, ?, ?, ?)
            ON DUPLICATE KEY UPDATE lst = VALUES(lst), ndvi = VALUES(ndvi)
            "#,
        )
        .bind(location_id)
        .bind(values.observation_date)
        .bind(values.lst)
        .bind(values.ndvi)
        .execute(&mut *tx)
        .await
        .map(|done| effect_from_rows_affected(done.rows_affected()))
        .map_err(Into::into);

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
        Ok(result.last_insert_id() as i64)
    }

    async fn close(self: Box<Self>) -> Result<()> {
        self.conn.close().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_affected_convention() {
        assert_eq!(effect_from_rows_affected(1), UpsertEffect::Inserted);
        assert_eq!(effect_from_rows_affected(2), UpsertEffect::Updated);
        assert_eq!(effect_from_rows_affected(0), UpsertEffect::Unchanged);
    }
}
