//! Per-project mutation queue.
//!
//! Each project gets a FIFO lane (`tokio::sync::Mutex` wakes waiters in
//! request order). The stored collection is a single document, so the
//! read-modify-write section also takes one collection-wide lock; lanes are
//! always entered before that lock.
//!
//! A lane exists only while a permit holds it or a task waits on it; the
//! last permit to leave an idle lane removes it from the map.

use log::trace;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

type Lanes = Arc<Mutex<HashMap<String, Arc<AsyncMutex<()>>>>>;

/// Serializes store writes, per project and per collection.
#[derive(Debug, Clone, Default)]
pub struct MutationQueue {
    lanes: Lanes,
    collection: Arc<AsyncMutex<()>>,
}

/// Held for the duration of one read-modify-write cycle.
#[derive(Debug)]
pub struct MutationPermit {
    // Field order matters: the collection lock is released before the lane.
    _collection: OwnedMutexGuard<()>,
    _lane: Option<LaneGuard>,
}

#[derive(Debug)]
struct LaneGuard {
    guard: Option<OwnedMutexGuard<()>>,
    lanes: Lanes,
    project_id: String,
}

impl Drop for LaneGuard {
    fn drop(&mut self) {
        drop(self.guard.take());
        let mut lanes = self.lanes.lock().unwrap_or_else(PoisonError::into_inner);
        // Only the map's own handle left: nobody holds or awaits the lane.
        let idle = lanes
            .get(&self.project_id)
            .is_some_and(|lane| Arc::strong_count(lane) == 1);
        if idle {
            lanes.remove(&self.project_id);
            trace!(
                "event=lane_pruned module=sync status=ok project_id={}",
                self.project_id
            );
        }
    }
}

impl MutationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for the turn of `project_id`, then for the collection.
    pub async fn enter(&self, project_id: &str) -> MutationPermit {
        let lane = self.lane(project_id).lock_owned().await;
        let lane = LaneGuard {
            guard: Some(lane),
            lanes: Arc::clone(&self.lanes),
            project_id: project_id.to_string(),
        };
        let collection = Arc::clone(&self.collection).lock_owned().await;
        MutationPermit {
            _collection: collection,
            _lane: Some(lane),
        }
    }

    /// Waits for the collection only; used by writes that create projects.
    pub async fn enter_collection(&self) -> MutationPermit {
        MutationPermit {
            _collection: Arc::clone(&self.collection).lock_owned().await,
            _lane: None,
        }
    }

    /// Number of projects with a lane currently held or awaited.
    pub fn lane_count(&self) -> usize {
        self.lanes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn lane(&self, project_id: &str) -> Arc<AsyncMutex<()>> {
        // A panicking holder cannot leave the lane map half-updated.
        let mut lanes = self.lanes.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(lanes.entry(project_id.to_string()).or_default())
    }
}
