//! SQLite-backed project store.
//!
//! The collection is one JSON document in the `documents` table. SQLite
//! calls are blocking, so each one runs on tokio's blocking pool and never
//! stalls an executor worker thread.

use crate::db::{open_db, open_db_in_memory};
use crate::model::project::Project;
use crate::store::{default_projects, ProjectStore, StoreError, StoreResult, STORAGE_KEY};
use async_trait::async_trait;
use log::debug;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Project store persisted in a migrated SQLite database.
pub struct SqliteProjectStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteProjectStore {
    /// Wraps an already-migrated connection (see `db::open_db`).
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Opens (or creates) a database file and wraps it.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Ok(Self::new(open_db(path)?))
    }

    pub fn open_in_memory() -> StoreResult<Self> {
        Ok(Self::new(open_db_in_memory()?))
    }

    /// Runs `call` with the connection on the blocking pool.
    async fn with_conn<T, F>(&self, call: F) -> StoreResult<T>
    where
        F: FnOnce(&Connection) -> StoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let conn = conn.lock().map_err(|_| StoreError::LockPoisoned)?;
            call(&conn)
        })
        .await
        .map_err(StoreError::Blocking)?
    }
}

fn read_document(conn: &Connection) -> StoreResult<Option<String>> {
    let value = conn
        .query_row(
            "SELECT value FROM documents WHERE key = ?1;",
            [STORAGE_KEY],
            |row| row.get::<_, String>(0),
        )
        .optional()?;
    Ok(value)
}

fn write_document(conn: &Connection, value: &str) -> StoreResult<()> {
    conn.execute(
        "INSERT INTO documents (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET
            value = excluded.value,
            updated_at = (strftime('%s', 'now') * 1000);",
        params![STORAGE_KEY, value],
    )?;
    Ok(())
}

#[async_trait]
impl ProjectStore for SqliteProjectStore {
    async fn get_projects(&self) -> StoreResult<Vec<Project>> {
        match self.with_conn(read_document).await? {
            Some(value) => {
                let projects: Vec<Project> = serde_json::from_str(&value)?;
                debug!(
                    "event=store_get module=store status=ok source=persisted backend=sqlite projects={}",
                    projects.len()
                );
                Ok(projects)
            }
            None => {
                debug!("event=store_get module=store status=ok source=default backend=sqlite");
                default_projects()
            }
        }
    }

    async fn save_projects(&self, projects: &[Project]) -> StoreResult<()> {
        let value = serde_json::to_string(projects)?;
        let bytes = value.len();
        self.with_conn(move |conn| write_document(conn, &value))
            .await?;
        debug!(
            "event=store_save module=store status=ok backend=sqlite projects={} bytes={}",
            projects.len(),
            bytes
        );
        Ok(())
    }
}
