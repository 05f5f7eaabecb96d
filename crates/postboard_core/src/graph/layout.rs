//! Initial grid placement for unplaced posts.
//!
//! The n-th unplaced post (0-indexed, in `Project::posts` order) lands at
//! `(origin_x + (n % columns) * spacing, origin_y + (n / columns) * spacing)`.
//! The slot depends only on that ordinal, never on post identity.

use crate::graph::model::GraphModel;
use crate::model::position::Position;
use log::debug;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Grid parameters for initial placement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub origin_x: f64,
    pub origin_y: f64,
    pub spacing: f64,
    pub columns: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            origin_x: 100.0,
            origin_y: 200.0,
            spacing: 120.0,
            columns: 3,
        }
    }
}

/// Invalid layout configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutConfigError {
    ZeroColumns,
    InvalidSpacing(f64),
    NonFiniteOrigin,
}

impl Display for LayoutConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroColumns => write!(f, "layout columns must be at least 1"),
            Self::InvalidSpacing(value) => {
                write!(f, "layout spacing must be finite and positive, got {value}")
            }
            Self::NonFiniteOrigin => write!(f, "layout origin must be finite"),
        }
    }
}

impl Error for LayoutConfigError {}

impl LayoutConfig {
    pub fn validate(&self) -> Result<(), LayoutConfigError> {
        if self.columns == 0 {
            return Err(LayoutConfigError::ZeroColumns);
        }
        if !self.spacing.is_finite() || self.spacing <= 0.0 {
            return Err(LayoutConfigError::InvalidSpacing(self.spacing));
        }
        if !self.origin_x.is_finite() || !self.origin_y.is_finite() {
            return Err(LayoutConfigError::NonFiniteOrigin);
        }
        Ok(())
    }

    /// Grid slot for the given ordinal.
    pub fn slot(&self, ordinal: usize) -> Position {
        let columns = self.columns.max(1);
        let col = (ordinal % columns) as f64;
        let row = (ordinal / columns) as f64;
        Position::new(
            self.origin_x + col * self.spacing,
            self.origin_y + row * self.spacing,
        )
    }
}

/// Assigns grid positions to posts that lack one.
#[derive(Debug, Clone, Default)]
pub struct LayoutAssigner {
    config: LayoutConfig,
}

impl LayoutAssigner {
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Places every unplaced post and returns how many were placed.
    ///
    /// Safe to call after any snapshot change; already-placed posts keep
    /// their coordinates.
    pub fn assign(&self, graph: &mut GraphModel) -> usize {
        let unplaced: Vec<String> = graph.unplaced_posts().map(|post| post.id.clone()).collect();
        for (ordinal, post_id) in unplaced.iter().enumerate() {
            graph.place(post_id, self.config.slot(ordinal));
        }
        if !unplaced.is_empty() {
            debug!(
                "event=layout_assign module=graph status=ok project_id={} placed={}",
                graph.project_id(),
                unplaced.len()
            );
        }
        unplaced.len()
    }
}
