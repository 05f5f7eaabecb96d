//! Persisted project store contract and implementations.
//!
//! # Responsibility
//! - Define the async document-store contract the canvas depends on.
//! - Provide SQLite-backed and in-memory implementations.
//!
//! # Invariants
//! - The whole project collection is read and written as one document under
//!   [`STORAGE_KEY`].
//! - `get_projects` falls back to the bundled default dataset when nothing
//!   has been persisted yet.
//! - Store implementations never serialize concurrent writers; callers that
//!   need lost-update safety go through `sync::SyncCoordinator`.

use crate::db::DbError;
use crate::model::error::GraphError;
use crate::model::project::{Connection, Project, ProjectId};
use async_trait::async_trait;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod memory;
pub mod sqlite;

/// Key under which the project collection is stored.
pub const STORAGE_KEY: &str = "projects";

const DEFAULT_PROJECTS_JSON: &str = include_str!("default_projects.json");

pub type StoreResult<T> = Result<T, StoreError>;

/// Store-level failure.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    Codec(serde_json::Error),
    /// A previous holder of the connection lock panicked.
    LockPoisoned,
    /// The blocking task running a SQLite call panicked or was cancelled.
    Blocking(tokio::task::JoinError),
    MissingProject(ProjectId),
    Graph(GraphError),
}

impl StoreError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Db(_) => "store_db",
            Self::Codec(_) => "store_codec",
            Self::LockPoisoned => "store_lock_poisoned",
            Self::Blocking(_) => "store_blocking_task",
            Self::MissingProject(_) => "missing_project",
            Self::Graph(err) => err.code(),
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Codec(err) => write!(f, "invalid project document: {err}"),
            Self::LockPoisoned => write!(f, "store connection lock poisoned"),
            Self::Blocking(err) => write!(f, "store task failed: {err}"),
            Self::MissingProject(id) => write!(f, "project not found: {id}"),
            Self::Graph(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Codec(err) => Some(err),
            Self::Graph(err) => Some(err),
            Self::Blocking(err) => Some(err),
            Self::LockPoisoned | Self::MissingProject(_) => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Codec(value)
    }
}

impl From<GraphError> for StoreError {
    fn from(value: GraphError) -> Self {
        Self::Graph(value)
    }
}

/// Async document store holding every project.
#[async_trait]
pub trait ProjectStore: Send + Sync {
    /// Returns all projects, or the bundled defaults when nothing is stored.
    async fn get_projects(&self) -> StoreResult<Vec<Project>>;

    /// Replaces the entire persisted collection.
    async fn save_projects(&self, projects: &[Project]) -> StoreResult<()>;

    /// Read-modify-write of one project's connection list.
    ///
    /// Not serialized: two overlapping calls can both read the old
    /// collection, and the later write drops the earlier connection.
    async fn add_connection(&self, project_id: &str, connection: Connection) -> StoreResult<()> {
        let mut projects = self.get_projects().await?;
        let project = projects
            .iter_mut()
            .find(|project| project.id == project_id)
            .ok_or_else(|| StoreError::MissingProject(project_id.to_string()))?;
        project.attach_connection(connection)?;
        self.save_projects(&projects).await
    }
}

/// Parses the bundled default dataset.
pub fn default_projects() -> StoreResult<Vec<Project>> {
    Ok(serde_json::from_str(DEFAULT_PROJECTS_JSON)?)
}
