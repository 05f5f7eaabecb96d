//! Core logic for the Postboard project canvas.
//! Graph state, gesture handling and store reconciliation live here; UI
//! shells only render scenes and forward gestures.

pub mod canvas;
pub mod config;
pub mod db;
pub mod graph;
pub mod logging;
pub mod model;
pub mod service;
pub mod store;
pub mod sync;

pub use canvas::controller::{CanvasEvent, InteractionController, InteractionMode};
pub use canvas::render::{CanvasRenderer, CanvasScene, SceneEdge, SceneNode};
pub use canvas::session::{CanvasSession, EditorRequest, Feedback};
pub use config::{ConfigError, CoreConfig};
pub use graph::layout::{LayoutAssigner, LayoutConfig};
pub use graph::model::GraphModel;
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::error::{GraphError, ValidationError};
pub use model::position::Position;
pub use model::project::{Connection, ConnectionId, Post, PostId, Project, ProjectId};
pub use service::project_service::ProjectService;
pub use store::memory::MemoryProjectStore;
pub use store::sqlite::SqliteProjectStore;
pub use store::{ProjectStore, StoreError, StoreResult};
pub use sync::coordinator::{ProjectListener, SyncCoordinator};
pub use sync::error::{SyncError, SyncResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
