//! Turso Embedded / libSQL storage layer for knowledge bases.
//!
//! The [`Storage`] struct wraps a libSQL database holding KB metadata
//! (`kb`) and the key/value mappings of each KB (`kb_mappings`).
//! KBs are addressed by their unique name.

mod migrations;

use std::path::Path;

use chrono::{DateTime, Utc};
use kbload_shared::{KbEntry, KbId, KbLoadError, KbRecord, Result};
use libsql::{Connection, Database, params};
use uuid::Uuid;

/// Primary storage handle wrapping a libSQL database.
pub struct Storage {
    #[allow(dead_code)]
    db: Database,
    conn: Connection,
}

impl Storage {
    /// Open or create a database at `path` and bring its schema up to date.
    pub async fn open(path: &Path) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| KbLoadError::io(parent, e))?;
        }

        let db = libsql::Builder::new_local(path)
            .build()
            .await
            .map_err(KbLoadError::storage)?;

        let conn = db.connect().map_err(KbLoadError::storage)?;

        let storage = Self { db, conn };
        storage.run_migrations().await?;
        tracing::debug!(?path, "storage opened");
        Ok(storage)
    }

    /// Run pending schema migrations.
    async fn run_migrations(&self) -> Result<()> {
        let current_version = self.get_schema_version().await;

        for migration in migrations::all_migrations() {
            if migration.version > current_version {
                tracing::info!(
                    version = migration.version,
                    description = migration.description,
                    "applying migration"
                );
                self.conn
                    .execute_batch(migration.sql)
                    .await
                    .map_err(|e| {
                        KbLoadError::Storage(format!(
                            "migration v{} failed: {e}",
                            migration.version
                        ))
                    })?;
            }
        }
        Ok(())
    }

    /// Get the current schema version, or 0 if no migrations have been applied.
    async fn get_schema_version(&self) -> u32 {
        let result = self
            .conn
            .query("SELECT MAX(version) FROM schema_migrations", params![])
            .await;

        match result {
            Ok(mut rows) => {
                if let Ok(Some(row)) = rows.next().await {
                    row.get::<u32>(0).unwrap_or(0)
                } else {
                    0
                }
            }
            Err(_) => 0, // Table doesn't exist yet
        }
    }

    // -----------------------------------------------------------------------
    // KB operations
    // -----------------------------------------------------------------------

    /// Whether a KB with this name exists.
    pub async fn kb_exists(&self, name: &str) -> Result<bool> {
        let mut rows = self
            .conn
            .query("SELECT 1 FROM kb WHERE name = ?1 LIMIT 1", params![name])
            .await
            .map_err(KbLoadError::storage)?;

        match rows.next().await {
            Ok(Some(_)) => Ok(true),
            Ok(None) => Ok(false),
            Err(e) => Err(KbLoadError::storage(e)),
        }
    }

    /// Insert a new KB record. Fails if the name is already taken.
    pub async fn create_kb(&self, name: &str, description: &str) -> Result<KbId> {
        let id = KbId::new();
        let now = Utc::now().to_rfc3339();
        self.conn
            .execute(
                "INSERT INTO kb (id, name, description, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![id.to_string(), name, description, now.as_str(), now.as_str()],
            )
            .await
            .map_err(|e| KbLoadError::Storage(format!("cannot create kb '{name}': {e}")))?;
        tracing::debug!(%id, kb = name, "kb created");
        Ok(id)
    }

    /// Rename a KB and replace its description.
    ///
    /// Passing the same value for `old_name` and `new_name` only refreshes the
    /// description and `updated_at`.
    pub async fn update_kb(&self, old_name: &str, new_name: &str, description: &str) -> Result<()> {
        let now = Utc::now().to_rfc3339();
        let changed = self
            .conn
            .execute(
                "UPDATE kb SET name = ?1, description = ?2, updated_at = ?3 WHERE name = ?4",
                params![new_name, description, now.as_str(), old_name],
            )
            .await
            .map_err(|e| KbLoadError::Storage(format!("cannot update kb '{old_name}': {e}")))?;

        if changed == 0 {
            return Err(KbLoadError::Storage(format!("no kb named '{old_name}'")));
        }
        tracing::debug!(old_name, new_name, "kb updated");
        Ok(())
    }

    /// Get a KB by name.
    pub async fn get_kb(&self, name: &str) -> Result<Option<KbRecord>> {
        let mut rows = self
            .conn
            .query(
                "SELECT id, name, description, created_at, updated_at FROM kb WHERE name = ?1",
                params![name],
            )
            .await
            .map_err(KbLoadError::storage)?;

        match rows.next().await {
            Ok(Some(row)) => Ok(Some(row_to_kb_record(&row)?)),
            Ok(None) => Ok(None),
            Err(e) => Err(KbLoadError::storage(e)),
        }
    }

    // -----------------------------------------------------------------------
    // Mapping operations
    // -----------------------------------------------------------------------

    /// Add one key → value mapping to the named KB.
    pub async fn insert_mapping(&self, kb_name: &str, key: &str, value: &str) -> Result<()> {
        let id = Uuid::now_v7().to_string();
        let now = Utc::now().to_rfc3339();
        let inserted = self
            .conn
            .execute(
                "INSERT INTO kb_mappings (id, kb_id, m_key, m_value, created_at)
                 SELECT ?1, id, ?2, ?3, ?4 FROM kb WHERE name = ?5",
                params![id.as_str(), key, value, now.as_str(), kb_name],
            )
            .await
            .map_err(KbLoadError::storage)?;

        if inserted == 0 {
            return Err(KbLoadError::Storage(format!("no kb named '{kb_name}'")));
        }
        Ok(())
    }

    /// List all mappings of a KB in insertion order.
    pub async fn list_mappings(&self, kb_name: &str) -> Result<Vec<KbEntry>> {
        let mut rows = self
            .conn
            .query(
                "SELECT m.m_key, m.m_value
                 FROM kb_mappings m
                 JOIN kb k ON k.id = m.kb_id
                 WHERE k.name = ?1
                 ORDER BY m.rowid",
                params![kb_name],
            )
            .await
            .map_err(KbLoadError::storage)?;

        let mut results = Vec::new();
        while let Some(row) = rows.next().await.map_err(KbLoadError::storage)? {
            results.push(KbEntry {
                key: row.get::<String>(0).map_err(KbLoadError::storage)?,
                value: row.get::<String>(1).map_err(KbLoadError::storage)?,
            });
        }
        Ok(results)
    }

    /// Number of mappings stored for a KB (0 if the KB does not exist).
    pub async fn count_mappings(&self, kb_name: &str) -> Result<u64> {
        let mut rows = self
            .conn
            .query(
                "SELECT COUNT(*) FROM kb_mappings m JOIN kb k ON k.id = m.kb_id WHERE k.name = ?1",
                params![kb_name],
            )
            .await
            .map_err(KbLoadError::storage)?;

        match rows.next().await {
            Ok(Some(row)) => {
                let count = row.get::<i64>(0).map_err(KbLoadError::storage)?;
                Ok(count.max(0) as u64)
            }
            Ok(None) => Ok(0),
            Err(e) => Err(KbLoadError::storage(e)),
        }
    }
}

/// Convert a database row to a [`KbRecord`].
fn row_to_kb_record(row: &libsql::Row) -> Result<KbRecord> {
    let id: String = row.get(0).map_err(KbLoadError::storage)?;
    Ok(KbRecord {
        id: id
            .parse()
            .map_err(|e| KbLoadError::parse(format!("invalid kb id '{id}': {e}")))?,
        name: row.get::<String>(1).map_err(KbLoadError::storage)?,
        description: row.get::<String>(2).unwrap_or_default(),
        created_at: parse_timestamp(&row.get::<String>(3).map_err(KbLoadError::storage)?)?,
        updated_at: parse_timestamp(&row.get::<String>(4).map_err(KbLoadError::storage)?)?,
    })
}

fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| KbLoadError::parse(format!("invalid date '{s}': {e}")))
}
