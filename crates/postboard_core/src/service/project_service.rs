//! Project/post use-case service.
//!
//! # Responsibility
//! - Create projects and list the stored collection.
//! - Persist post edits and deletions made on the post detail screen.
//!
//! # Invariants
//! - Every write re-reads the stored collection (via `SyncCoordinator`).
//! - Editing or deleting a post that no longer exists is a stale reference,
//!   never an implicit insert.
//! - Deleting a post does not cascade to its connections.

use crate::model::error::GraphError;
use crate::model::project::{Post, Project};
use crate::sync::coordinator::SyncCoordinator;
use crate::sync::error::{SyncError, SyncResult};

/// Use-case facade for the list and post-editing collaborators.
#[derive(Clone)]
pub struct ProjectService {
    coordinator: SyncCoordinator,
}

impl ProjectService {
    /// Creates a service sharing `coordinator`'s store and mutation queue.
    pub fn new(coordinator: SyncCoordinator) -> Self {
        Self { coordinator }
    }

    /// Lists stored projects (or the bundled defaults).
    pub async fn list_projects(&self) -> SyncResult<Vec<Project>> {
        self.coordinator.list_projects().await
    }

    /// Creates and stores an empty project.
    ///
    /// # Errors
    /// - `Validation(BlankProjectName)` when `name` is blank after trim.
    pub async fn create_project(
        &self,
        name: &str,
        image_uri: Option<String>,
    ) -> SyncResult<Project> {
        let project = Project::new(name, image_uri)?;
        let created = project.clone();
        self.coordinator
            .update_collection("create_project", move |projects| {
                projects.push(project);
                Ok(())
            })
            .await?;
        Ok(created)
    }

    /// Saves an edited post (title, notes, image) into its stored project.
    ///
    /// # Errors
    /// - `Graph(ForeignPost)` when the post names another project.
    /// - `StaleReference` when the post was deleted meanwhile.
    /// - `MissingProject` when the project is no longer stored.
    pub async fn save_post(&self, project_id: &str, post: Post) -> SyncResult<Project> {
        if post.project_id != project_id {
            return Err(SyncError::Graph(GraphError::ForeignPost {
                post_id: post.id,
                post_project_id: post.project_id,
                target_project_id: project_id.to_string(),
            }));
        }

        let (project, _) = self
            .coordinator
            .update_project(project_id, "save_post", move |project| {
                if !project.contains_post(&post.id) {
                    return Err(SyncError::StaleReference {
                        project_id: project.id.clone(),
                        post_id: post.id,
                    });
                }
                project.upsert_post(post)?;
                Ok(())
            })
            .await?;
        Ok(project)
    }

    /// Removes a post; connections referencing it are left dangling.
    ///
    /// Returns the stored project and the removed post.
    pub async fn delete_post(
        &self,
        project_id: &str,
        post_id: &str,
    ) -> SyncResult<(Project, Post)> {
        self.coordinator
            .update_project(project_id, "delete_post", |project| {
                project
                    .remove_post(post_id)
                    .ok_or_else(|| SyncError::StaleReference {
                        project_id: project.id.clone(),
                        post_id: post_id.to_string(),
                    })
            })
            .await
    }
}
