//! Single-writer guard shared by the mutating services.

use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};

/// Serializes every read-check-write sequence across the room and
/// booking services, so two conflicting mutations (e.g. concurrent
/// check-ins against the same room) cannot interleave. Cloning shares
/// the same underlying lock; reads run without acquiring it.
#[derive(Clone, Default)]
pub struct WriteLock(Arc<Mutex<()>>);

impl WriteLock {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self) -> MutexGuard<'_, ()> {
        self.0.lock().await
    }
}
