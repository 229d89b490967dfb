use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use tokio::sync::Mutex;

use crate::config::WardSeed;
use crate::error::{MisionalError, Result};
use crate::model::{Ward, WardPlan};

use super::WardStore;

/// SQLite-backed ward store: one row per ward, the plan held as opaque
/// JSON text in the `data` column.
pub struct SqliteWardStore {
    conn: Mutex<Connection>,
    #[allow(dead_code)]
    path: PathBuf,
}

impl SqliteWardStore {
    /// Open or create the ward database.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        Ok(Self {
            conn: Mutex::new(conn),
            path: path.to_path_buf(),
        })
    }

    fn row_to_parts(row: &rusqlite::Row<'_>) -> rusqlite::Result<(String, String, String, String)> {
        Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
    }

    fn decode((id, name, passphrase, data): (String, String, String, String)) -> Result<Ward> {
        let plan: WardPlan = serde_json::from_str(&data)?;
        Ok(Ward {
            id,
            name,
            passphrase,
            plan,
        })
    }
}

#[async_trait]
impl WardStore for SqliteWardStore {
    async fn initialize(&self, seeds: &[WardSeed]) -> Result<()> {
        let conn = self.conn.lock().await;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS wards (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                passphrase TEXT NOT NULL,
                data TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_wards_passphrase ON wards(passphrase)",
            [],
        )?;

        let empty = serde_json::to_string(&WardPlan::empty())?;
        let now = Utc::now().to_rfc3339();
        for seed in seeds {
            conn.execute(
                "INSERT OR IGNORE INTO wards (id, name, passphrase, data, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![seed.id, seed.name, seed.resolved_passphrase(), empty, now],
            )?;
        }

        Ok(())
    }

    async fn find_by_passphrase(&self, candidate: &str) -> Result<Option<Ward>> {
        let conn = self.conn.lock().await;
        let row = conn
            .query_row(
                "SELECT id, name, passphrase, data FROM wards WHERE passphrase = ?1",
                [candidate],
                Self::row_to_parts,
            )
            .optional()?;
        row.map(Self::decode).transpose()
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Ward>> {
        let conn = self.conn.lock().await;
        let row = conn
            .query_row(
                "SELECT id, name, passphrase, data FROM wards WHERE id = ?1",
                [id],
                Self::row_to_parts,
            )
            .optional()?;
        row.map(Self::decode).transpose()
    }

    async fn replace_plan(&self, id: &str, plan: &WardPlan) -> Result<()> {
        let data = serde_json::to_string(plan)?;
        let conn = self.conn.lock().await;
        let changed = conn.execute(
            "UPDATE wards SET data = ?2, updated_at = ?3 WHERE id = ?1",
            params![id, data, Utc::now().to_rfc3339()],
        )?;
        if changed == 0 {
            return Err(MisionalError::WardNotFound(id.to_string()));
        }
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Ward>> {
        let conn = self.conn.lock().await;
        let mut stmt =
            conn.prepare("SELECT id, name, passphrase, data FROM wards ORDER BY id")?;
        let rows = stmt
            .query_map([], Self::row_to_parts)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        drop(stmt);
        rows.into_iter().map(Self::decode).collect()
    }
}

impl From<rusqlite::Error> for MisionalError {
    fn from(e: rusqlite::Error) -> Self {
        MisionalError::StorageUnavailable(format!("SQLite error: {}", e))
    }
}
