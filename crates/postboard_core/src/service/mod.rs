//! Project and post use-cases outside the canvas.
//!
//! # Responsibility
//! - Serve the list screen and the post-editing screen.
//! - Route their writes through the same mutation queue as the canvas.

pub mod project_service;
