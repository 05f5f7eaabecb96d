//! One open canvas view over one project.
//!
//! # Responsibility
//! - Route gestures through the interaction controller.
//! - Persist optimistic edits through the sync coordinator and adopt the
//!   authoritative result.
//! - Reload on return from the post-editing screen, keeping positions.
//!
//! # Invariants
//! - Session operations take `&mut self`, so a gesture issued while a store
//!   call is suspended waits for it instead of interleaving.
//! - Failures come back as `Feedback::Declined`; nothing here panics or
//!   returns an error to the UI.
//! - A store I/O failure leaves the optimistic canvas state in place.
//! - A decline caused by the stored data (stale post, duplicate edge,
//!   missing project) removes the optimistic edit again.

use crate::canvas::controller::{
    CanvasEvent, ControllerCommand, InteractionController, InteractionMode,
};
use crate::canvas::render::{build_scene, CanvasRenderer, CanvasScene};
use crate::graph::layout::LayoutAssigner;
use crate::graph::model::GraphModel;
use crate::model::project::{Connection, Post, PostId, Project};
use crate::sync::coordinator::SyncCoordinator;
use crate::sync::error::SyncError;
use log::{info, warn};

/// Arguments for the post-editing collaborator.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorRequest {
    pub post_id: PostId,
    /// Canvas snapshot at the time of the tap.
    pub project: Project,
}

/// Result of one session operation, for the UI shell.
#[derive(Debug)]
pub enum Feedback {
    /// Nothing beyond a repaint is needed.
    None,
    /// Open the post-editing screen; call `return_from_editor` afterwards.
    OpenPost(EditorRequest),
    /// A connection was stored.
    Connected(Connection),
    /// A post was stored and placed.
    PostAdded(Post),
    /// The project was reloaded from the store.
    Reloaded {
        /// Posts that disappeared since the last snapshot.
        removed: Vec<PostId>,
        /// Posts that received a fresh layout position.
        placed: usize,
    },
    /// The mutation was declined; canvas state is unchanged or optimistic.
    Declined(SyncError),
}

impl Feedback {
    pub fn is_declined(&self) -> bool {
        matches!(self, Self::Declined(_))
    }
}

/// Canvas state for one project: graph, gestures, layout and sync.
pub struct CanvasSession {
    graph: GraphModel,
    controller: InteractionController,
    layout: LayoutAssigner,
    coordinator: SyncCoordinator,
}

impl CanvasSession {
    /// Opens the canvas on a project snapshot and lays out its posts.
    pub fn open(coordinator: SyncCoordinator, project: Project, layout: LayoutAssigner) -> Self {
        let mut graph = GraphModel::new(project);
        let placed = layout.assign(&mut graph);
        info!(
            "event=canvas_open module=canvas status=ok project_id={} posts={} connections={} placed={}",
            graph.project_id(),
            graph.posts().len(),
            graph.connections().len(),
            placed
        );
        Self {
            graph,
            controller: InteractionController::new(),
            layout,
            coordinator,
        }
    }

    pub fn graph(&self) -> &GraphModel {
        &self.graph
    }

    pub fn project(&self) -> &Project {
        self.graph.project()
    }

    pub fn mode(&self) -> &InteractionMode {
        self.controller.mode()
    }

    pub fn controller(&self) -> &InteractionController {
        &self.controller
    }

    /// Label for connections created by subsequent taps.
    pub fn set_connection_label(&mut self, label: impl Into<String>) {
        self.controller.set_connection_label(label);
    }

    pub fn scene(&self) -> CanvasScene {
        build_scene(&self.graph, &self.controller)
    }

    /// Builds the current scene and hands it to `renderer`.
    pub fn repaint(&self, renderer: &mut dyn CanvasRenderer) {
        renderer.paint(&self.scene());
    }

    /// Applies one gesture and performs any persistence it triggers.
    pub async fn handle(&mut self, event: CanvasEvent) -> Feedback {
        match self.controller.handle(event, &mut self.graph) {
            None => Feedback::None,
            Some(ControllerCommand::OpenPost(post_id)) => Feedback::OpenPost(EditorRequest {
                post_id,
                project: self.graph.project().clone(),
            }),
            Some(ControllerCommand::Declined(err)) => Feedback::Declined(SyncError::Graph(err)),
            Some(ControllerCommand::PersistConnection(connection)) => {
                self.persist_connection(connection).await
            }
        }
    }

    /// Creates a post from the canvas and attaches it to the stored project.
    pub async fn add_post(&mut self, title: &str, kind: &str) -> Feedback {
        let post = match Post::new(self.graph.project_id(), title, kind) {
            Ok(post) => post,
            Err(err) => {
                warn!(
                    "event=post_add module=canvas status=declined project_id={} error_code={}",
                    self.graph.project_id(),
                    err.code()
                );
                return Feedback::Declined(err.into());
            }
        };

        if let Err(err) = self.graph.upsert_post(post.clone()) {
            return Feedback::Declined(err.into());
        }
        self.layout.assign(&mut self.graph);

        let project_id = self.graph.project_id().to_string();
        match self.coordinator.attach_post(&project_id, post.clone()).await {
            Ok(project) => {
                self.adopt(project);
                Feedback::PostAdded(post)
            }
            Err(err) => {
                if !keeps_optimistic_edit(&err) {
                    self.graph.remove_post(&post.id);
                    self.controller.drop_stale_references(&self.graph);
                    self.log_rollback("post", &post.id, &err);
                }
                Feedback::Declined(err)
            }
        }
    }

    /// Re-reads the project after the post-editing screen closes.
    ///
    /// Positions of surviving posts are kept; new posts are laid out.
    pub async fn return_from_editor(&mut self) -> Feedback {
        let project_id = self.graph.project_id().to_string();
        match self.coordinator.load_project(&project_id).await {
            Ok(project) => {
                let (removed, placed) = self.adopt(project);
                Feedback::Reloaded { removed, placed }
            }
            Err(err) => Feedback::Declined(err),
        }
    }

    /// `onUpdateProject` from the post-editing screen.
    ///
    /// The payload is not trusted as-is; the store is re-read instead.
    pub async fn on_project_updated(&mut self, updated: &Project) -> Feedback {
        if updated.id != self.graph.project_id() {
            warn!(
                "event=project_update module=canvas status=declined error_code=foreign_project project_id={} received_id={}",
                self.graph.project_id(),
                updated.id
            );
            return Feedback::None;
        }
        self.return_from_editor().await
    }

    /// Resets gesture state when the view unmounts.
    pub fn close(&mut self) {
        self.controller.reset();
        info!(
            "event=canvas_close module=canvas status=ok project_id={}",
            self.graph.project_id()
        );
    }

    async fn persist_connection(&mut self, connection: Connection) -> Feedback {
        let project_id = self.graph.project_id().to_string();
        match self
            .coordinator
            .attach_connection(&project_id, connection.clone())
            .await
        {
            Ok(project) => {
                self.adopt(project);
                Feedback::Connected(connection)
            }
            Err(err) => {
                if !keeps_optimistic_edit(&err) {
                    self.graph.remove_connection(&connection.id);
                    self.log_rollback("connection", &connection.id, &err);
                }
                Feedback::Declined(err)
            }
        }
    }

    fn log_rollback(&self, kind: &str, id: &str, err: &SyncError) {
        warn!(
            "event=optimistic_rollback module=canvas status=declined project_id={} kind={} id={} error_code={}",
            self.graph.project_id(),
            kind,
            id,
            err.code()
        );
    }

    fn adopt(&mut self, project: Project) -> (Vec<PostId>, usize) {
        let removed = self.graph.replace_project(project);
        let placed = self.layout.assign(&mut self.graph);
        self.controller.drop_stale_references(&self.graph);
        (removed, placed)
    }
}

/// Store I/O failures keep the local edit; the next reload reconciles it.
fn keeps_optimistic_edit(err: &SyncError) -> bool {
    matches!(err, SyncError::Store(_))
}
