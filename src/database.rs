use crate::errors::{JarLedgerError, Result};
use crate::models::{
    Consumer, CreateConsumerRequest, CreateEntryRequest, Entry, UpdateConsumerRequest,
    UpdateEntryRequest,
};
use chrono::Utc;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use std::time::Duration;

pub struct Database {
    pool: SqlitePool,
}

impl Database {
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(5))
            .connect(database_url)
            .await?;

        let db = Database { pool };
        db.init_schema().await?;
        Ok(db)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create the three tables on boot. The embedded store has no external
    /// migration runner, so the schema is bootstrapped idempotently here.
    async fn init_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS consumers (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                mobile TEXT NOT NULL UNIQUE,
                house_no TEXT,
                area TEXT,
                custom_rate REAL,
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS entries (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                mobile TEXT NOT NULL,
                name TEXT NOT NULL,
                date TEXT NOT NULL,
                qty INTEGER NOT NULL,
                price REAL NOT NULL,
                type TEXT NOT NULL DEFAULT 'normal',
                is_paid INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_entries_mobile ON entries (mobile)")
            .execute(&self.pool)
            .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS settings (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Register a new consumer; the mobile must not be in use
    pub async fn create_consumer(&self, req: &CreateConsumerRequest) -> Result<Consumer> {
        let mut tx = self.pool.begin().await?;

        let existing: Option<(i64,)> = sqlx::query_as("SELECT id FROM consumers WHERE mobile = ?")
            .bind(&req.mobile)
            .fetch_optional(&mut *tx)
            .await?;

        if existing.is_some() {
            return Err(JarLedgerError::Conflict("Mobile already registered".to_string()));
        }

        let consumer = sqlx::query_as::<_, Consumer>(
            r#"
            INSERT INTO consumers (name, mobile, house_no, area, custom_rate, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(&req.name)
        .bind(&req.mobile)
        .bind(&req.house_no)
        .bind(&req.area)
        .bind(req.custom_rate)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await
        .map_err(map_unique_violation)?;

        tx.commit().await?;
        Ok(consumer)
    }

    /// All consumers, most recent first
    pub async fn list_consumers(&self) -> Result<Vec<Consumer>> {
        let consumers = sqlx::query_as::<_, Consumer>("SELECT * FROM consumers ORDER BY id DESC")
            .fetch_all(&self.pool)
            .await?;

        Ok(consumers)
    }

    pub async fn get_consumer_by_mobile(&self, mobile: &str) -> Result<Option<Consumer>> {
        let consumer = sqlx::query_as::<_, Consumer>("SELECT * FROM consumers WHERE mobile = ?")
            .bind(mobile)
            .fetch_optional(&self.pool)
            .await?;

        Ok(consumer)
    }

    /// Full-replace update of a consumer, addressed by its current mobile.
    ///
    /// A mobile change rewrites every entry carrying the old mobile before the
    /// consumer row itself is touched; the whole cascade is one transaction, so
    /// a failed rename leaves no half-renamed history behind.
    pub async fn update_consumer(
        &self,
        current_mobile: &str,
        req: &UpdateConsumerRequest,
    ) -> Result<Consumer> {
        let mut tx = self.pool.begin().await?;

        let current: Option<Consumer> =
            sqlx::query_as::<_, Consumer>("SELECT * FROM consumers WHERE mobile = ?")
                .bind(current_mobile)
                .fetch_optional(&mut *tx)
                .await?;

        let current = current
            .ok_or_else(|| JarLedgerError::NotFound("Consumer not found".to_string()))?;

        if req.mobile != current.mobile {
            let clash: Option<(i64,)> = sqlx::query_as("SELECT id FROM consumers WHERE mobile = ?")
                .bind(&req.mobile)
                .fetch_optional(&mut *tx)
                .await?;

            if clash.is_some() {
                return Err(JarLedgerError::Conflict("Mobile already registered".to_string()));
            }

            sqlx::query("UPDATE entries SET mobile = ? WHERE mobile = ?")
                .bind(&req.mobile)
                .bind(&current.mobile)
                .execute(&mut *tx)
                .await?;
        }

        let updated = sqlx::query_as::<_, Consumer>(
            r#"
            UPDATE consumers
            SET name = ?, mobile = ?, house_no = ?, area = ?, custom_rate = ?
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(&req.name)
        .bind(&req.mobile)
        .bind(&req.house_no)
        .bind(&req.area)
        .bind(req.custom_rate)
        .bind(current.id)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_unique_violation)?;

        tx.commit().await?;
        Ok(updated)
    }

    /// Delete a consumer and all of its entries as one unit.
    /// Returns total rows removed; zero is not an error.
    pub async fn remove_consumer(&self, mobile: &str) -> Result<u64> {
        let mut tx = self.pool.begin().await?;

        let entries = sqlx::query("DELETE FROM entries WHERE mobile = ?")
            .bind(mobile)
            .execute(&mut *tx)
            .await?;

        let consumers = sqlx::query("DELETE FROM consumers WHERE mobile = ?")
            .bind(mobile)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(entries.rows_affected() + consumers.rows_affected())
    }

    /// Insert a delivery entry. The mobile is deliberately not required to
    /// belong to a registered consumer.
    pub async fn create_entry(&self, req: &CreateEntryRequest, price: f64) -> Result<Entry> {
        let entry = sqlx::query_as::<_, Entry>(
            r#"
            INSERT INTO entries (mobile, name, date, qty, price, type, is_paid, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(&req.mobile)
        .bind(&req.name)
        .bind(&req.date)
        .bind(req.qty)
        .bind(price)
        .bind(req.jar_type)
        .bind(req.is_paid)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(entry)
    }

    /// All entries, most recent first
    pub async fn list_entries(&self) -> Result<Vec<Entry>> {
        let entries = sqlx::query_as::<_, Entry>("SELECT * FROM entries ORDER BY id DESC")
            .fetch_all(&self.pool)
            .await?;

        Ok(entries)
    }

    /// Full-replace update of one entry
    pub async fn update_entry(&self, id: i64, req: &UpdateEntryRequest) -> Result<Entry> {
        let updated = sqlx::query_as::<_, Entry>(
            r#"
            UPDATE entries
            SET date = ?, qty = ?, price = ?, type = ?, is_paid = ?
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(&req.date)
        .bind(req.qty)
        .bind(req.price)
        .bind(req.jar_type)
        .bind(req.is_paid)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        updated.ok_or_else(|| JarLedgerError::NotFound("Entry not found".to_string()))
    }

    /// Delete one entry; zero rows affected is not an error
    pub async fn remove_entry(&self, id: i64) -> Result<u64> {
        let result = sqlx::query("DELETE FROM entries WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Bulk-set the payment flag on every entry of one consumer whose date
    /// falls in the given month. Returns the number of rows updated.
    pub async fn mark_month(&self, mobile: &str, month: &str, status: bool) -> Result<u64> {
        let result = sqlx::query("UPDATE entries SET is_paid = ? WHERE mobile = ? AND date LIKE ?")
            .bind(status)
            .bind(mobile)
            .bind(format!("{month}-%"))
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    pub async fn get_setting(&self, key: &str) -> Result<Option<String>> {
        let value: Option<(String,)> = sqlx::query_as("SELECT value FROM settings WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(value.map(|(v,)| v))
    }

    pub async fn upsert_setting(&self, key: &str, value: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO settings (key, value)
            VALUES (?, ?)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value
            "#,
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

/// The UNIQUE constraint on consumers.mobile backstops the in-transaction
/// existence check against concurrent writers.
fn map_unique_violation(e: sqlx::Error) -> JarLedgerError {
    match &e {
        sqlx::Error::Database(db) if matches!(db.kind(), sqlx::error::ErrorKind::UniqueViolation) => {
            JarLedgerError::Conflict("Mobile already registered".to_string())
        }
        _ => JarLedgerError::Database(e),
    }
}
