//! Model and graph error types.

use crate::model::project::{PostId, ProjectId};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Record-level validation failure for user-supplied fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Project name is blank after trim.
    BlankProjectName,
    /// Post title is blank after trim.
    BlankPostTitle,
    /// Post type is blank after trim.
    BlankPostType,
}

impl ValidationError {
    /// Stable machine-readable code for logs and UI feedback.
    pub fn code(&self) -> &'static str {
        match self {
            Self::BlankProjectName => "blank_project_name",
            Self::BlankPostTitle => "blank_post_title",
            Self::BlankPostType => "blank_post_type",
        }
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankProjectName => write!(f, "project name must not be blank"),
            Self::BlankPostTitle => write!(f, "post title must not be blank"),
            Self::BlankPostType => write!(f, "post type must not be blank"),
        }
    }
}

impl Error for ValidationError {}

/// Graph invariant violation raised while mutating one project snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// A connection endpoint does not name a post in the project.
    UnknownPost(PostId),
    /// Both connection endpoints name the same post.
    SelfLoop(PostId),
    /// An edge already exists between the unordered pair.
    DuplicateEdge { post_a: PostId, post_b: PostId },
    /// Post belongs to a different project than the one being mutated.
    ForeignPost {
        post_id: PostId,
        post_project_id: ProjectId,
        target_project_id: ProjectId,
    },
}

impl GraphError {
    /// Stable machine-readable code for logs and UI feedback.
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnknownPost(_) => "unknown_post",
            Self::SelfLoop(_) => "self_loop",
            Self::DuplicateEdge { .. } => "duplicate_edge",
            Self::ForeignPost { .. } => "foreign_post",
        }
    }
}

impl Display for GraphError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownPost(id) => write!(f, "post not found in project: {id}"),
            Self::SelfLoop(id) => write!(f, "post cannot connect to itself: {id}"),
            Self::DuplicateEdge { post_a, post_b } => {
                write!(f, "connection already exists between {post_a} and {post_b}")
            }
            Self::ForeignPost {
                post_id,
                post_project_id,
                target_project_id,
            } => write!(
                f,
                "post {post_id} belongs to project {post_project_id}, not {target_project_id}"
            ),
        }
    }
}

impl Error for GraphError {}
