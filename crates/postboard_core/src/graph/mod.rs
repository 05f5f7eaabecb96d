//! In-memory canvas graph and initial placement.
//!
//! # Responsibility
//! - Hold one project snapshot plus the transient position map.
//! - Assign deterministic grid positions to posts that have none.
//!
//! # Invariants
//! - Positions only exist for posts present in the current snapshot.
//! - Layout never moves a post that already has a position.

pub mod layout;
pub mod model;
