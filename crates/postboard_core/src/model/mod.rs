//! Persisted project model and transient canvas coordinates.
//!
//! # Responsibility
//! - Define the project/post/connection shapes shared by store, sync and canvas.
//! - Enforce record-level invariants that do not need the whole graph.
//!
//! # Invariants
//! - A connection never references the same post twice.
//! - Unordered endpoint pairs are compared through `EdgeKey`.
//! - `Position` is never serialized into a project document.

pub mod error;
pub mod position;
pub mod project;
