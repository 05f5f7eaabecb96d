//! Sync coordinator error taxonomy.

use crate::model::error::{GraphError, ValidationError};
use crate::model::project::{PostId, ProjectId};
use crate::store::StoreError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type SyncResult<T> = Result<T, SyncError>;

/// Reason a canvas mutation was declined.
///
/// None of these are fatal; the canvas stays interactive.
#[derive(Debug)]
pub enum SyncError {
    /// Target project is absent from the stored collection.
    MissingProject(ProjectId),
    /// A post cached by the canvas no longer exists in the stored project.
    StaleReference {
        project_id: ProjectId,
        post_id: PostId,
    },
    /// Mutation violates a graph invariant.
    Graph(GraphError),
    /// User input failed record validation.
    Validation(ValidationError),
    /// Store transport or codec failure.
    Store(StoreError),
}

impl SyncError {
    /// Stable machine-readable code for logs and UI feedback.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingProject(_) => "missing_project",
            Self::StaleReference { .. } => "stale_reference",
            Self::Graph(err) => err.code(),
            Self::Validation(err) => err.code(),
            Self::Store(err) => err.code(),
        }
    }
}

impl Display for SyncError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingProject(id) => write!(f, "project not found: {id}"),
            Self::StaleReference {
                project_id,
                post_id,
            } => write!(f, "post {post_id} no longer exists in project {project_id}"),
            Self::Graph(err) => write!(f, "{err}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SyncError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Graph(err) => Some(err),
            Self::Validation(err) => Some(err),
            Self::Store(err) => Some(err),
            Self::MissingProject(_) | Self::StaleReference { .. } => None,
        }
    }
}

impl From<StoreError> for SyncError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::MissingProject(id) => Self::MissingProject(id),
            StoreError::Graph(err) => Self::Graph(err),
            other => Self::Store(other),
        }
    }
}

impl From<GraphError> for SyncError {
    fn from(value: GraphError) -> Self {
        Self::Graph(value)
    }
}

impl From<ValidationError> for SyncError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}
