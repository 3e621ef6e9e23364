//! SQLite-backed credential store.
//!
//! The table layout is an on-disk contract: key `app_token` plus six value
//! columns. A table missing any of them is dropped and recreated (cached
//! authorizations are lost, clients simply re-exchange).

use async_trait::async_trait;
use copilot_types::{CredentialPatch, CredentialRecord, StoreError, StoreResult};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::Arc;

use super::CredentialStore;

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS cache (
    app_token TEXT PRIMARY KEY,
    c_token TEXT NOT NULL DEFAULT '',
    expires_at INTEGER NOT NULL DEFAULT 0,
    vscode_machineid TEXT NOT NULL DEFAULT '',
    vscode_sessionid TEXT NOT NULL DEFAULT '',
    session_expires_at INTEGER NOT NULL DEFAULT 0,
    last_touched INTEGER NOT NULL DEFAULT 0
)";

const REQUIRED_COLUMNS: &[&str] = &[
    "app_token",
    "c_token",
    "expires_at",
    "vscode_machineid",
    "vscode_sessionid",
    "session_expires_at",
    "last_touched",
];

const SELECT_COLUMNS: &str = "app_token, c_token, expires_at, vscode_machineid, vscode_sessionid, session_expires_at, last_touched";

// Empty/zero parameters keep the stored value; the device id is write-once.
const UPSERT: &str = "INSERT INTO cache (app_token, c_token, expires_at, vscode_machineid, vscode_sessionid, session_expires_at, last_touched)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
ON CONFLICT(app_token) DO UPDATE SET
    c_token = CASE WHEN excluded.c_token <> '' THEN excluded.c_token ELSE cache.c_token END,
    expires_at = CASE WHEN excluded.expires_at <> 0 THEN excluded.expires_at ELSE cache.expires_at END,
    vscode_machineid = CASE WHEN cache.vscode_machineid = '' THEN excluded.vscode_machineid ELSE cache.vscode_machineid END,
    vscode_sessionid = CASE WHEN excluded.vscode_sessionid <> '' THEN excluded.vscode_sessionid ELSE cache.vscode_sessionid END,
    session_expires_at = CASE WHEN excluded.session_expires_at <> 0 THEN excluded.session_expires_at ELSE cache.session_expires_at END,
    last_touched = CASE WHEN excluded.last_touched <> 0 THEN excluded.last_touched ELSE cache.last_touched END";

const UPDATE_EXISTING: &str = "UPDATE cache SET
    c_token = CASE WHEN ?2 <> '' THEN ?2 ELSE c_token END,
    expires_at = CASE WHEN ?3 <> 0 THEN ?3 ELSE expires_at END,
    vscode_machineid = CASE WHEN vscode_machineid = '' THEN ?4 ELSE vscode_machineid END,
    vscode_sessionid = CASE WHEN ?5 <> '' THEN ?5 ELSE vscode_sessionid END,
    session_expires_at = CASE WHEN ?6 <> 0 THEN ?6 ELSE session_expires_at END,
    last_touched = CASE WHEN ?7 <> 0 THEN ?7 ELSE last_touched END
WHERE app_token = ?1";

/// Durable backend. A single connection behind a mutex serializes every
/// statement, which gives per-key atomicity for free.
pub struct SqliteCredentialStore {
    conn: Arc<Mutex<Connection>>,
}

fn db_error(err: rusqlite::Error) -> StoreError {
    StoreError::Database { message: err.to_string() }
}

fn row_to_record(row: &Row<'_>) -> rusqlite::Result<CredentialRecord> {
    Ok(CredentialRecord {
        client_credential: row.get(0)?,
        upstream_token: row.get(1)?,
        upstream_token_expires_at: row.get(2)?,
        device_identifier: row.get(3)?,
        session_identifier: row.get(4)?,
        session_expires_at: row.get(5)?,
        last_touched_at: row.get(6)?,
    })
}

/// Patch fields as bound parameters; `None` becomes the "unchanged" sentinel.
fn patch_params(patch: &CredentialPatch) -> (&str, i64, &str, &str, i64, i64) {
    (
        patch.upstream_token.as_deref().unwrap_or(""),
        patch.upstream_token_expires_at.unwrap_or(0),
        patch.device_identifier.as_deref().unwrap_or(""),
        patch.session_identifier.as_deref().unwrap_or(""),
        patch.session_expires_at.unwrap_or(0),
        patch.last_touched_at.unwrap_or(0),
    )
}

fn existing_columns(conn: &Connection) -> rusqlite::Result<Vec<String>> {
    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info('cache')")?;
    let names = stmt.query_map([], |row| row.get::<_, String>(0))?;
    names.collect()
}

/// Create the table, or drop and recreate it when a required column is missing.
fn ensure_schema(conn: &Connection) -> StoreResult<()> {
    let columns =
        existing_columns(conn).map_err(|e| StoreError::Migration { message: e.to_string() })?;

    if !columns.is_empty() {
        let missing: Vec<&str> = REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|required| !columns.iter().any(|c| c == required))
            .collect();
        if !missing.is_empty() {
            tracing::warn!(
                "Credential cache table is missing columns {:?}; dropping and recreating it (cached authorizations are discarded)",
                missing
            );
            let _rows_affected: usize = conn
                .execute("DROP TABLE cache", [])
                .map_err(|e| StoreError::Migration { message: e.to_string() })?;
        }
    }

    let _rows_affected: usize = conn
        .execute(CREATE_TABLE, [])
        .map_err(|e| StoreError::Migration { message: e.to_string() })?;
    let _rows_affected: usize = conn
        .execute("CREATE INDEX IF NOT EXISTS idx_cache_last_touched ON cache (last_touched)", [])
        .map_err(|e| StoreError::Migration { message: e.to_string() })?;
    Ok(())
}

impl SqliteCredentialStore {
    /// Open (or create) the database at `path`, creating parent directories.
    pub async fn open(path: &Path) -> StoreResult<Self> {
        let path = path.to_path_buf();
        let conn = tokio::task::spawn_blocking(move || -> StoreResult<Connection> {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).map_err(|e| StoreError::Io {
                    message: format!("failed to create {}: {}", parent.display(), e),
                })?;
            }
            let conn = Connection::open(&path).map_err(db_error)?;
            conn.busy_timeout(std::time::Duration::from_secs(5)).map_err(db_error)?;
            ensure_schema(&conn)?;
            Ok(conn)
        })
        .await
        .map_err(|e| StoreError::Task { message: e.to_string() })??;

        Ok(Self { conn: Arc::new(Mutex::new(conn)) })
    }

    async fn with_connection<T, F>(&self, f: F) -> StoreResult<T>
    where
        F: FnOnce(&mut Connection) -> rusqlite::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let mut guard = conn.lock();
            f(&mut guard).map_err(db_error)
        })
        .await
        .map_err(|e| StoreError::Task { message: e.to_string() })?
    }
}

#[async_trait]
impl CredentialStore for SqliteCredentialStore {
    async fn get(&self, client_credential: &str) -> StoreResult<Option<CredentialRecord>> {
        let key = client_credential.to_string();
        self.with_connection(move |conn| {
            conn.query_row(
                &format!("SELECT {} FROM cache WHERE app_token = ?1", SELECT_COLUMNS),
                params![key],
                row_to_record,
            )
            .optional()
        })
        .await
    }

    async fn upsert(&self, client_credential: &str, patch: &CredentialPatch) -> StoreResult<()> {
        let key = client_credential.to_string();
        let patch = patch.clone();
        self.with_connection(move |conn| {
            let (token, expires_at, device, session, session_expires_at, touched) =
                patch_params(&patch);
            conn.execute(
                UPSERT,
                params![key, token, expires_at, device, session, session_expires_at, touched],
            )?;
            Ok(())
        })
        .await
    }

    async fn update(
        &self,
        client_credential: &str,
        patch: &CredentialPatch,
    ) -> StoreResult<bool> {
        let key = client_credential.to_string();
        let patch = patch.clone();
        self.with_connection(move |conn| {
            let (token, expires_at, device, session, session_expires_at, touched) =
                patch_params(&patch);
            let rows = conn.execute(
                UPDATE_EXISTING,
                params![key, token, expires_at, device, session, session_expires_at, touched],
            )?;
            Ok(rows > 0)
        })
        .await
    }

    async fn delete(&self, client_credential: &str) -> StoreResult<()> {
        let key = client_credential.to_string();
        self.with_connection(move |conn| {
            conn.execute("DELETE FROM cache WHERE app_token = ?1", params![key])?;
            Ok(())
        })
        .await
    }

    async fn sweep_touched_before(&self, cutoff: i64) -> StoreResult<Vec<String>> {
        self.with_connection(move |conn| {
            let tx = conn.transaction()?;
            let removed = {
                let mut stmt = tx.prepare("SELECT app_token FROM cache WHERE last_touched < ?1")?;
                let keys = stmt.query_map(params![cutoff], |row| row.get::<_, String>(0))?;
                keys.collect::<rusqlite::Result<Vec<String>>>()?
            };
            tx.execute("DELETE FROM cache WHERE last_touched < ?1", params![cutoff])?;
            tx.commit()?;
            Ok(removed)
        })
        .await
    }

    fn backend_name(&self) -> &'static str {
        "sqlite"
    }
}
