//! Canvas graph model.
//!
//! # Responsibility
//! - Wrap the current project snapshot with safe query/mutation primitives.
//! - Own the transient post -> position map, which is never persisted.
//!
//! # Invariants
//! - `add_connection` never stores two edges for one unordered pair.
//! - `upsert_post` never touches the position map.
//! - `replace_project` keeps positions of surviving posts and prunes the rest.

use crate::model::error::GraphError;
use crate::model::position::Position;
use crate::model::project::{Connection, Post, PostId, Project};
use std::collections::BTreeMap;

/// Project snapshot plus transient canvas positions.
#[derive(Debug, Clone)]
pub struct GraphModel {
    project: Project,
    positions: BTreeMap<PostId, Position>,
}

impl GraphModel {
    /// Wraps a project snapshot with an empty position map.
    pub fn new(project: Project) -> Self {
        Self {
            project,
            positions: BTreeMap::new(),
        }
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn project_id(&self) -> &str {
        &self.project.id
    }

    pub fn posts(&self) -> &[Post] {
        &self.project.posts
    }

    pub fn connections(&self) -> &[Connection] {
        &self.project.connections
    }

    pub fn post(&self, post_id: &str) -> Option<&Post> {
        self.project.post(post_id)
    }

    /// Replaces a post by id or appends it when new.
    ///
    /// Returns `true` when the post was appended. Positions are untouched, so
    /// a new post stays unplaced until the layout assigner runs.
    pub fn upsert_post(&mut self, post: Post) -> Result<bool, GraphError> {
        self.project.upsert_post(post)
    }

    /// Creates a connection between `a` and `b` with a fresh id.
    ///
    /// # Errors
    /// - `SelfLoop` when `a == b`.
    /// - `UnknownPost` when either endpoint is absent.
    /// - `DuplicateEdge` when the unordered pair is already connected.
    pub fn add_connection(
        &mut self,
        a: &str,
        b: &str,
        name: &str,
    ) -> Result<Connection, GraphError> {
        self.project.check_connection(a, b)?;
        let connection = Connection::new(a, b, name);
        self.project.connections.push(connection.clone());
        Ok(connection)
    }

    /// Removes a connection by id.
    pub fn remove_connection(&mut self, connection_id: &str) -> Option<Connection> {
        let index = self
            .project
            .connections
            .iter()
            .position(|connection| connection.id == connection_id)?;
        Some(self.project.connections.remove(index))
    }

    /// Removes a post and its position. Connections are left untouched.
    pub fn remove_post(&mut self, post_id: &str) -> Option<Post> {
        let removed = self.project.remove_post(post_id)?;
        self.positions.remove(post_id);
        Some(removed)
    }

    /// Connections touching `post_id`, in storage order.
    ///
    /// The returned iterator is lazy and `Clone`, so callers can restart it.
    pub fn connections_of<'a>(&'a self, post_id: &'a str) -> ConnectionsOf<'a> {
        ConnectionsOf {
            inner: self.project.connections.iter(),
            post_id,
        }
    }

    /// Sets the position of a present post.
    ///
    /// Returns `false` and does nothing when the post is not in the snapshot.
    pub fn set_position(&mut self, post_id: &str, x: f64, y: f64) -> bool {
        self.place(post_id, Position::new(x, y))
    }

    /// Same as [`GraphModel::set_position`] for an existing position value.
    pub fn place(&mut self, post_id: &str, position: Position) -> bool {
        if !self.project.contains_post(post_id) {
            return false;
        }
        self.positions.insert(post_id.to_string(), position);
        true
    }

    pub fn position(&self, post_id: &str) -> Option<Position> {
        self.positions.get(post_id).copied()
    }

    pub fn has_position(&self, post_id: &str) -> bool {
        self.positions.contains_key(post_id)
    }

    /// Posts without a position, in `Project::posts` order.
    pub fn unplaced_posts(&self) -> impl Iterator<Item = &Post> + '_ {
        self.project
            .posts
            .iter()
            .filter(move |post| !self.positions.contains_key(&post.id))
    }

    /// Swaps in an authoritative snapshot.
    ///
    /// Returns the ids whose positions were dropped because the post no
    /// longer exists.
    pub fn replace_project(&mut self, project: Project) -> Vec<PostId> {
        self.project = project;
        let mut pruned = Vec::new();
        let project = &self.project;
        self.positions.retain(|post_id, _| {
            let keep = project.contains_post(post_id);
            if !keep {
                pruned.push(post_id.clone());
            }
            keep
        });
        pruned
    }
}

/// Lazy iterator over the connections touching one post.
#[derive(Debug, Clone)]
pub struct ConnectionsOf<'a> {
    inner: std::slice::Iter<'a, Connection>,
    post_id: &'a str,
}

impl<'a> Iterator for ConnectionsOf<'a> {
    type Item = &'a Connection;

    fn next(&mut self) -> Option<Self::Item> {
        let post_id = self.post_id;
        self.inner.by_ref().find(|connection| connection.touches(post_id))
    }
}
