//! Canvas view logic: gestures, scenes and the per-project session.

pub mod controller;
pub mod render;
pub mod session;
