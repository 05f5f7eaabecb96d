//! Project, post and connection records.
//!
//! # Responsibility
//! - Define the persisted document shape of one project.
//! - Provide the invariant checks shared by the canvas graph model and the
//!   sync coordinator's authoritative read-modify-write path.
//!
//! # Invariants
//! - `Post::project_id` equals the id of the owning project.
//! - No two connections share the same unordered endpoint pair.
//! - Connections never loop back onto their source post.
//!
//! Wire names follow the app's document format (`imageUri`, `projectId`,
//! `postA`, `postB`, `type`).

use crate::model::error::{GraphError, ValidationError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type ProjectId = String;
pub type PostId = String;
pub type ConnectionId = String;

/// Top-level persisted container and unit of persistence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub image_uri: Option<String>,
    #[serde(default)]
    pub posts: Vec<Post>,
    /// Older documents predate connections; they load as an empty list.
    #[serde(default)]
    pub connections: Vec<Connection>,
}

/// A node in the project diagram.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: PostId,
    pub title: String,
    /// Serialized as `type` to match the document format.
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub image_uri: Option<String>,
    pub project_id: ProjectId,
}

/// Undirected edge between two posts of the same project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub id: ConnectionId,
    /// Optional label; empty string means unlabeled.
    #[serde(default)]
    pub name: String,
    pub post_a: PostId,
    pub post_b: PostId,
}

/// Order-independent identity of a connection's endpoint pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeKey<'a> {
    low: &'a str,
    high: &'a str,
}

impl<'a> EdgeKey<'a> {
    pub fn new(a: &'a str, b: &'a str) -> Self {
        if a <= b {
            Self { low: a, high: b }
        } else {
            Self { low: b, high: a }
        }
    }

    pub fn low(&self) -> &'a str {
        self.low
    }

    pub fn high(&self) -> &'a str {
        self.high
    }
}

impl Project {
    /// Creates an empty project with a generated id.
    ///
    /// # Errors
    /// - `ValidationError::BlankProjectName` when `name` is blank after trim.
    pub fn new(
        name: impl Into<String>,
        image_uri: Option<String>,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::BlankProjectName);
        }
        let mut project = Self::with_id(Uuid::new_v4().to_string(), trimmed);
        project.image_uri = image_uri;
        Ok(project)
    }

    /// Creates an empty project with a caller-provided id.
    ///
    /// Used by import paths and fixtures where identity already exists.
    pub fn with_id(id: impl Into<ProjectId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            image_uri: None,
            posts: Vec::new(),
            connections: Vec::new(),
        }
    }

    pub fn post(&self, post_id: &str) -> Option<&Post> {
        self.posts.iter().find(|post| post.id == post_id)
    }

    pub fn contains_post(&self, post_id: &str) -> bool {
        self.post(post_id).is_some()
    }

    /// Finds the connection joining `a` and `b` in either orientation.
    pub fn connection_between(&self, a: &str, b: &str) -> Option<&Connection> {
        let key = EdgeKey::new(a, b);
        self.connections
            .iter()
            .find(|connection| connection.edge_key() == key)
    }

    /// Checks whether a new connection between `a` and `b` would be valid.
    ///
    /// Check order: self-loop, unknown endpoints, then duplicate pair.
    pub fn check_connection(&self, a: &str, b: &str) -> Result<(), GraphError> {
        if a == b {
            return Err(GraphError::SelfLoop(a.to_string()));
        }
        for endpoint in [a, b] {
            if !self.contains_post(endpoint) {
                return Err(GraphError::UnknownPost(endpoint.to_string()));
            }
        }
        if self.connection_between(a, b).is_some() {
            return Err(GraphError::DuplicateEdge {
                post_a: a.to_string(),
                post_b: b.to_string(),
            });
        }
        Ok(())
    }

    /// Validates and appends an already-built connection.
    pub fn attach_connection(&mut self, connection: Connection) -> Result<(), GraphError> {
        self.check_connection(&connection.post_a, &connection.post_b)?;
        self.connections.push(connection);
        Ok(())
    }

    /// Replaces a post by id or appends it when new.
    ///
    /// Returns `true` when the post was appended.
    ///
    /// # Errors
    /// - `GraphError::ForeignPost` when `post.project_id` names another project.
    pub fn upsert_post(&mut self, post: Post) -> Result<bool, GraphError> {
        if post.project_id != self.id {
            return Err(GraphError::ForeignPost {
                post_id: post.id,
                post_project_id: post.project_id,
                target_project_id: self.id.clone(),
            });
        }
        match self.posts.iter_mut().find(|existing| existing.id == post.id) {
            Some(existing) => {
                *existing = post;
                Ok(false)
            }
            None => {
                self.posts.push(post);
                Ok(true)
            }
        }
    }

    /// Removes a post without touching connections that reference it.
    pub fn remove_post(&mut self, post_id: &str) -> Option<Post> {
        let index = self.posts.iter().position(|post| post.id == post_id)?;
        Some(self.posts.remove(index))
    }

    /// Connections with at least one endpoint missing from `posts`.
    pub fn dangling_connections(&self) -> impl Iterator<Item = &Connection> + '_ {
        self.connections.iter().filter(move |connection| {
            !self.contains_post(&connection.post_a) || !self.contains_post(&connection.post_b)
        })
    }
}

impl Post {
    /// Creates a post for `project_id` with a generated id.
    ///
    /// Title and type are trimmed; `notes` and `image_uri` start empty.
    ///
    /// # Errors
    /// - `ValidationError::BlankPostTitle` / `BlankPostType` for blank input.
    pub fn new(
        project_id: impl Into<ProjectId>,
        title: &str,
        kind: &str,
    ) -> Result<Self, ValidationError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ValidationError::BlankPostTitle);
        }
        let kind = kind.trim();
        if kind.is_empty() {
            return Err(ValidationError::BlankPostType);
        }
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            kind: kind.to_string(),
            notes: None,
            image_uri: None,
            project_id: project_id.into(),
        })
    }
}

impl Connection {
    /// Builds a connection with a fresh unique id. Does not validate endpoints.
    pub fn new(
        post_a: impl Into<PostId>,
        post_b: impl Into<PostId>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            post_a: post_a.into(),
            post_b: post_b.into(),
        }
    }

    pub fn edge_key(&self) -> EdgeKey<'_> {
        EdgeKey::new(&self.post_a, &self.post_b)
    }

    pub fn touches(&self, post_id: &str) -> bool {
        self.post_a == post_id || self.post_b == post_id
    }

    /// Returns the endpoint opposite to `post_id`, if `post_id` is an endpoint.
    pub fn other_end(&self, post_id: &str) -> Option<&str> {
        if self.post_a == post_id {
            Some(self.post_b.as_str())
        } else if self.post_b == post_id {
            Some(self.post_a.as_str())
        } else {
            None
        }
    }

    pub fn label(&self) -> Option<&str> {
        let trimmed = self.name.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::{Connection, EdgeKey, Post, Project};
    use crate::model::error::{GraphError, ValidationError};

    fn project_with_posts(ids: &[&str]) -> Project {
        let mut project = Project::with_id("P1", "Board");
        for id in ids {
            let mut post = Post::new("P1", id, "note").unwrap();
            post.id = id.to_string();
            project.posts.push(post);
        }
        project
    }

    #[test]
    fn edge_key_ignores_orientation() {
        assert_eq!(EdgeKey::new("p1", "p2"), EdgeKey::new("p2", "p1"));
        assert_eq!(EdgeKey::new("p2", "p1").low(), "p1");
    }

    #[test]
    fn check_connection_reports_reverse_duplicate() {
        let mut project = project_with_posts(&["p1", "p2"]);
        project
            .attach_connection(Connection::new("p1", "p2", ""))
            .unwrap();

        let err = project.check_connection("p2", "p1").unwrap_err();
        assert_eq!(err.code(), "duplicate_edge");
    }

    #[test]
    fn self_loop_is_checked_before_unknown_post() {
        let project = project_with_posts(&[]);
        let err = project.check_connection("ghost", "ghost").unwrap_err();
        assert_eq!(err, GraphError::SelfLoop("ghost".to_string()));
    }

    #[test]
    fn upsert_rejects_foreign_post() {
        let mut project = project_with_posts(&["p1"]);
        let foreign = Post::new("P2", "elsewhere", "note").unwrap();

        let err = project.upsert_post(foreign).unwrap_err();
        assert!(matches!(err, GraphError::ForeignPost { .. }));
        assert_eq!(project.posts.len(), 1);
    }

    #[test]
    fn post_new_trims_and_rejects_blank_fields() {
        let post = Post::new("P1", "  idea  ", " sketch ").unwrap();
        assert_eq!(post.title, "idea");
        assert_eq!(post.kind, "sketch");

        assert_eq!(
            Post::new("P1", "   ", "note").unwrap_err(),
            ValidationError::BlankPostTitle
        );
        assert_eq!(
            Post::new("P1", "idea", "").unwrap_err(),
            ValidationError::BlankPostType
        );
    }

    #[test]
    fn remove_post_leaves_connection_dangling() {
        let mut project = project_with_posts(&["p1", "p2"]);
        project
            .attach_connection(Connection::new("p1", "p2", "family"))
            .unwrap();

        project.remove_post("p2").unwrap();
        assert_eq!(project.connections.len(), 1);
        assert_eq!(project.dangling_connections().count(), 1);
    }

    #[test]
    fn connection_label_treats_blank_as_unlabeled() {
        assert_eq!(Connection::new("a", "b", "  ").label(), None);
        assert_eq!(Connection::new("a", "b", "family").label(), Some("family"));
    }
}
