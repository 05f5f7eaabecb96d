//! In-process project store.

use crate::model::project::Project;
use crate::store::{default_projects, ProjectStore, StoreResult};
use async_trait::async_trait;
use log::debug;
use tokio::sync::RwLock;

/// Project store kept in memory for the lifetime of the process.
///
/// Starts empty (reads fall back to the bundled defaults) unless seeded.
#[derive(Debug, Default)]
pub struct MemoryProjectStore {
    document: RwLock<Option<Vec<Project>>>,
}

impl MemoryProjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds `projects`.
    pub fn with_projects(projects: Vec<Project>) -> Self {
        Self {
            document: RwLock::new(Some(projects)),
        }
    }
}

#[async_trait]
impl ProjectStore for MemoryProjectStore {
    async fn get_projects(&self) -> StoreResult<Vec<Project>> {
        match self.document.read().await.as_ref() {
            Some(projects) => Ok(projects.clone()),
            None => {
                debug!("event=store_get module=store status=ok source=default backend=memory");
                default_projects()
            }
        }
    }

    async fn save_projects(&self, projects: &[Project]) -> StoreResult<()> {
        *self.document.write().await = Some(projects.to_vec());
        debug!(
            "event=store_save module=store status=ok backend=memory projects={}",
            projects.len()
        );
        Ok(())
    }
}
