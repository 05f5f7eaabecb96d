//! Sync coordinator: serialized read-modify-write over the project store.
//!
//! # Responsibility
//! - Create-and-attach posts and connections on the authoritative stored copy.
//! - Reload a project from the store on demand.
//! - Propagate every successful write to the owning scope.
//!
//! # Invariants
//! - A write never starts from a cached project; it re-reads the collection.
//! - Writes hold a `MutationPermit` for the whole read-modify-write cycle.
//! - The project returned by a write is read back after the save.
//! - Declined mutations leave the store untouched and are logged.

use crate::model::error::GraphError;
use crate::model::project::{Connection, Post, Project};
use crate::store::ProjectStore;
use crate::sync::error::{SyncError, SyncResult};
use crate::sync::queue::MutationQueue;
use log::{debug, info, warn};
use std::sync::Arc;
use std::time::Instant;

/// Receives the authoritative project after each successful write.
///
/// Implemented by the list-level scope that owns the canvas.
pub trait ProjectListener: Send + Sync {
    fn project_updated(&self, project: &Project);
}

/// Bridge between optimistic canvas edits and the persisted store.
///
/// Cheap to clone; clones share the store, the mutation queue and the
/// listener.
#[derive(Clone)]
pub struct SyncCoordinator {
    store: Arc<dyn ProjectStore>,
    queue: MutationQueue,
    listener: Option<Arc<dyn ProjectListener>>,
}

impl SyncCoordinator {
    pub fn new(store: Arc<dyn ProjectStore>) -> Self {
        Self {
            store,
            queue: MutationQueue::new(),
            listener: None,
        }
    }

    /// Registers the scope notified after each successful write.
    pub fn with_listener(mut self, listener: Arc<dyn ProjectListener>) -> Self {
        self.listener = Some(listener);
        self
    }

    pub fn store(&self) -> &Arc<dyn ProjectStore> {
        &self.store
    }

    pub fn queue(&self) -> &MutationQueue {
        &self.queue
    }

    /// Reads the whole stored collection.
    pub async fn list_projects(&self) -> SyncResult<Vec<Project>> {
        Ok(self.store.get_projects().await?)
    }

    /// Re-reads one project from the store.
    ///
    /// Waits behind writes already queued for the project, so the result
    /// reflects every mutation issued before the call.
    pub async fn load_project(&self, project_id: &str) -> SyncResult<Project> {
        let _permit = self.queue.enter(project_id).await;
        let project = self.read_project(project_id).await;
        match &project {
            Ok(project) => debug!(
                "event=sync_reload module=sync status=ok project_id={} posts={} connections={}",
                project_id,
                project.posts.len(),
                project.connections.len()
            ),
            Err(err) => warn!(
                "event=sync_reload module=sync status=declined project_id={} error_code={} error={}",
                project_id,
                err.code(),
                err
            ),
        }
        project
    }

    /// Appends (or replaces) a post in the stored project.
    ///
    /// # Errors
    /// - `Graph(ForeignPost)` when `post.project_id != project_id`.
    /// - `MissingProject` when the project is no longer stored.
    pub async fn attach_post(&self, project_id: &str, post: Post) -> SyncResult<Project> {
        if post.project_id != project_id {
            let err = SyncError::Graph(GraphError::ForeignPost {
                post_id: post.id,
                post_project_id: post.project_id,
                target_project_id: project_id.to_string(),
            });
            warn!(
                "event=sync_write module=sync status=declined operation=attach_post project_id={} error_code={}",
                project_id,
                err.code()
            );
            return Err(err);
        }

        let (project, _) = self
            .update_project(project_id, "attach_post", move |project| {
                project.upsert_post(post)?;
                Ok(())
            })
            .await?;
        Ok(project)
    }

    /// Adds a connection to the stored project.
    ///
    /// # Errors
    /// - `StaleReference` when an endpoint is gone from the stored project.
    /// - `Graph(SelfLoop | DuplicateEdge)` against the stored connections.
    /// - `MissingProject` when the project is no longer stored.
    pub async fn attach_connection(
        &self,
        project_id: &str,
        connection: Connection,
    ) -> SyncResult<Project> {
        let (project, _) = self
            .update_project(project_id, "attach_connection", move |project| {
                for endpoint in [&connection.post_a, &connection.post_b] {
                    if !project.contains_post(endpoint) {
                        return Err(SyncError::StaleReference {
                            project_id: project.id.clone(),
                            post_id: endpoint.clone(),
                        });
                    }
                }
                project.attach_connection(connection)?;
                Ok(())
            })
            .await?;
        Ok(project)
    }

    /// Runs `mutation` against the stored copy of one project and saves.
    ///
    /// Returns the project as read back after the save plus the mutation's
    /// output. The listener is notified only on success.
    pub async fn update_project<T, F>(
        &self,
        project_id: &str,
        operation: &'static str,
        mutation: F,
    ) -> SyncResult<(Project, T)>
    where
        F: FnOnce(&mut Project) -> SyncResult<T> + Send,
        T: Send,
    {
        let started_at = Instant::now();
        let _permit = self.queue.enter(project_id).await;

        let result = self.read_modify_write(project_id, mutation).await;
        match &result {
            Ok((project, _)) => {
                info!(
                    "event=sync_write module=sync status=ok operation={} project_id={} posts={} connections={} duration_ms={}",
                    operation,
                    project_id,
                    project.posts.len(),
                    project.connections.len(),
                    started_at.elapsed().as_millis()
                );
                self.notify(project);
            }
            Err(err) => warn!(
                "event=sync_write module=sync status=declined operation={} project_id={} error_code={} error={}",
                operation,
                project_id,
                err.code(),
                err
            ),
        }
        result
    }

    /// Runs `mutation` against the whole stored collection and saves.
    ///
    /// Used by collection-level writes such as creating a project; no
    /// listener notification is sent.
    pub async fn update_collection<T, F>(
        &self,
        operation: &'static str,
        mutation: F,
    ) -> SyncResult<(Vec<Project>, T)>
    where
        F: FnOnce(&mut Vec<Project>) -> SyncResult<T> + Send,
        T: Send,
    {
        let _permit = self.queue.enter_collection().await;

        let result = self.rewrite_collection(mutation).await;

        match &result {
            Ok((projects, _)) => info!(
                "event=sync_write module=sync status=ok operation={} projects={}",
                operation,
                projects.len()
            ),
            Err(err) => warn!(
                "event=sync_write module=sync status=declined operation={} error_code={} error={}",
                operation,
                err.code(),
                err
            ),
        }
        result
    }

    async fn read_modify_write<T, F>(
        &self,
        project_id: &str,
        mutation: F,
    ) -> SyncResult<(Project, T)>
    where
        F: FnOnce(&mut Project) -> SyncResult<T> + Send,
        T: Send,
    {
        let mut projects = self.store.get_projects().await?;
        let project = projects
            .iter_mut()
            .find(|project| project.id == project_id)
            .ok_or_else(|| SyncError::MissingProject(project_id.to_string()))?;
        let value = mutation(project)?;
        self.store.save_projects(&projects).await?;

        let stored = self.read_project(project_id).await?;
        Ok((stored, value))
    }

    async fn rewrite_collection<T, F>(&self, mutation: F) -> SyncResult<(Vec<Project>, T)>
    where
        F: FnOnce(&mut Vec<Project>) -> SyncResult<T> + Send,
        T: Send,
    {
        let mut projects = self.store.get_projects().await?;
        let value = mutation(&mut projects)?;
        self.store.save_projects(&projects).await?;
        let stored = self.store.get_projects().await?;
        Ok((stored, value))
    }

    async fn read_project(&self, project_id: &str) -> SyncResult<Project> {
        self.store
            .get_projects()
            .await?
            .into_iter()
            .find(|project| project.id == project_id)
            .ok_or_else(|| SyncError::MissingProject(project_id.to_string()))
    }

    fn notify(&self, project: &Project) {
        if let Some(listener) = &self.listener {
            listener.project_updated(project);
        }
    }
}
