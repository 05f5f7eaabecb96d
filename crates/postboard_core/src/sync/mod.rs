//! Reconciliation between canvas state and the persisted project store.
//!
//! # Responsibility
//! - Apply canvas mutations to the authoritative stored copy of a project.
//! - Serialize read-modify-write cycles so rapid edits never lose updates.
//! - Notify the owning scope after every successful write.
//!
//! # Invariants
//! - Every write re-reads the current collection before modifying it.
//! - Writes to one project run one at a time, in issuance order.
//! - After a successful operation the returned project equals the stored one.

pub mod coordinator;
pub mod error;
pub mod queue;
