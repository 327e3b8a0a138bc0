//! SQLite-backed data store
//!
//! Records are stored as JSON documents keyed by (organization, table,
//! natural key). Each `upsert` runs in a single transaction, so a batch is
//! applied completely or not at all.

use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};

use super::{DataStore, UpsertOutcome};
use crate::import::{LookupEntry, ValidatedRecord};

pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (or create) a database file
    pub async fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await
            .with_context(|| format!("Failed to open database: {}", path.display()))?;

        log::debug!("Opened database {}", path.display());
        Self::from_pool(pool).await
    }

    /// Private in-memory database (single connection so it is not lost)
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .context("Failed to open in-memory database")?;
        Self::from_pool(pool).await
    }

    pub async fn from_pool(pool: SqlitePool) -> Result<Self> {
        let store = SqliteStore { pool };
        store.init().await?;
        Ok(store)
    }

    async fn init(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS lookups (
                organization_id TEXT NOT NULL,
                table_name TEXT NOT NULL,
                id TEXT NOT NULL,
                name TEXT NOT NULL,
                PRIMARY KEY (organization_id, table_name, id)
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .context("Failed to create lookups table")?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS records (
                organization_id TEXT NOT NULL,
                table_name TEXT NOT NULL,
                natural_key TEXT NOT NULL,
                key_column TEXT NOT NULL,
                data TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                PRIMARY KEY (organization_id, table_name, natural_key)
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .context("Failed to create records table")?;

        Ok(())
    }

    /// Add a reference entry with a fresh id
    pub async fn add_lookup(
        &self,
        organization_id: &str,
        table: &str,
        name: &str,
    ) -> Result<LookupEntry> {
        let entry = LookupEntry::new(uuid::Uuid::new_v4().to_string(), name.trim());

        sqlx::query(
            "INSERT INTO lookups (organization_id, table_name, id, name) VALUES (?, ?, ?, ?)",
        )
        .bind(organization_id)
        .bind(table)
        .bind(&entry.id)
        .bind(&entry.name)
        .execute(&self.pool)
        .await
        .with_context(|| format!("Failed to add '{}' to {}", name, table))?;

        Ok(entry)
    }

    /// Every lookup entry of an organization as `(table, entry)`, grouped by table
    pub async fn list_lookups(&self, organization_id: &str) -> Result<Vec<(String, LookupEntry)>> {
        let rows = sqlx::query(
            r#"
            SELECT table_name, id, name FROM lookups
            WHERE organization_id = ?
            ORDER BY table_name, rowid
            "#,
        )
        .bind(organization_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list lookups")?;

        let mut entries = Vec::with_capacity(rows.len());
        for row in rows {
            let table: String = row.try_get("table_name")?;
            entries.push((
                table,
                LookupEntry {
                    id: row.try_get("id")?,
                    name: row.try_get("name")?,
                },
            ));
        }
        Ok(entries)
    }

    /// Number of stored records for a table
    pub async fn count_records(&self, organization_id: &str, table: &str) -> Result<usize> {
        let row = sqlx::query(
            "SELECT COUNT(*) AS n FROM records WHERE organization_id = ? AND table_name = ?",
        )
        .bind(organization_id)
        .bind(table)
        .fetch_one(&self.pool)
        .await
        .context("Failed to count records")?;

        Ok(row.try_get::<i64, _>("n")? as usize)
    }
}

#[async_trait]
impl DataStore for SqliteStore {
    async fn fetch_lookup(&self, organization_id: &str, table: &str) -> Result<Vec<LookupEntry>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name FROM lookups
            WHERE organization_id = ? AND table_name = ?
            ORDER BY rowid
            "#,
        )
        .bind(organization_id)
        .bind(table)
        .fetch_all(&self.pool)
        .await
        .with_context(|| format!("Failed to fetch lookup table {}", table))?;

        let mut entries = Vec::with_capacity(rows.len());
        for row in rows {
            entries.push(LookupEntry {
                id: row.try_get("id")?,
                name: row.try_get("name")?,
            });
        }
        Ok(entries)
    }

    async fn upsert(
        &self,
        organization_id: &str,
        table: &str,
        key_column: &str,
        records: &[ValidatedRecord],
    ) -> Result<UpsertOutcome> {
        let now = chrono::Utc::now().to_rfc3339();
        let mut tx = self.pool.begin().await.context("Failed to begin transaction")?;

        for record in records {
            let data = serde_json::to_string(&record.to_json())
                .context("Failed to serialize record")?;

            sqlx::query(
                r#"
                INSERT INTO records (organization_id, table_name, natural_key, key_column, data, updated_at)
                VALUES (?, ?, ?, ?, ?, ?)
                ON CONFLICT(organization_id, table_name, natural_key)
                DO UPDATE SET data = excluded.data,
                              key_column = excluded.key_column,
                              updated_at = excluded.updated_at
                "#,
            )
            .bind(organization_id)
            .bind(table)
            .bind(&record.natural_key)
            .bind(key_column)
            .bind(&data)
            .bind(&now)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("Failed to upsert {} = '{}'", key_column, record.natural_key))?;
        }

        tx.commit().await.context("Failed to commit transaction")?;

        Ok(UpsertOutcome::all(records.len()))
    }

    async fn fetch_all(&self, organization_id: &str, table: &str) -> Result<Vec<ValidatedRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT natural_key, data FROM records
            WHERE organization_id = ? AND table_name = ?
            ORDER BY natural_key
            "#,
        )
        .bind(organization_id)
        .bind(table)
        .fetch_all(&self.pool)
        .await
        .with_context(|| format!("Failed to fetch records from {}", table))?;

        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            let key: String = row.try_get("natural_key")?;
            let data: String = row.try_get("data")?;
            let json: serde_json::Value = serde_json::from_str(&data)
                .with_context(|| format!("Corrupt record data for '{}'", key))?;
            records.push(ValidatedRecord::from_json(organization_id, key, &json));
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::Value;

    fn record(key: &str, name: &str) -> ValidatedRecord {
        let mut r = ValidatedRecord::new("org-1", key);
        r.set("product_name", Value::from(name));
        r
    }

    #[tokio::test]
    async fn test_upsert_overwrites_without_deleting() {
        let store = SqliteStore::in_memory().await.unwrap();
        store
            .upsert("org-1", "master_ingredients", "item_code", &[record("A", "Apples"), record("B", "Beef")])
            .await
            .unwrap();
        let outcome = store
            .upsert("org-1", "master_ingredients", "item_code", &[record("B", "Beef Brisket")])
            .await
            .unwrap();
        assert_eq!(outcome.written, 1);

        let all = store.fetch_all("org-1", "master_ingredients").await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].natural_key, "A");
        assert_eq!(all[1].get("product_name"), &Value::String("Beef Brisket".into()));
        assert_eq!(store.count_records("org-2", "master_ingredients").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_lookups_keep_insert_order() {
        let store = SqliteStore::in_memory().await.unwrap();
        let first = store.add_lookup("org-1", "vendors", " Sysco ").await.unwrap();
        store.add_lookup("org-1", "vendors", "US Foods").await.unwrap();
        store.add_lookup("org-2", "vendors", "Other").await.unwrap();

        let entries = store.fetch_lookup("org-1", "vendors").await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0], first);
        assert_eq!(entries[0].name, "Sysco");
    }

    #[tokio::test]
    async fn test_list_lookups_groups_by_table() {
        let store = SqliteStore::in_memory().await.unwrap();
        store.add_lookup("org-1", "vendors", "Sysco").await.unwrap();
        store.add_lookup("org-1", "food_categories", "Beef").await.unwrap();
        store.add_lookup("org-1", "vendors", "US Foods").await.unwrap();

        let all = store.list_lookups("org-1").await.unwrap();
        let tables: Vec<&str> = all.iter().map(|(t, _)| t.as_str()).collect();
        assert_eq!(tables, vec!["food_categories", "vendors", "vendors"]);
        assert_eq!(all[2].1.name, "US Foods");
        assert!(store.list_lookups("org-2").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_open_file_database() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("kitchen.db");
        let store = SqliteStore::open(&path).await.unwrap();
        store
            .upsert("org-1", "team_members", "email", &[record("a@example.com", "Ana")])
            .await
            .unwrap();
        assert!(path.exists());
        assert_eq!(store.count_records("org-1", "team_members").await.unwrap(), 1);
    }
}
