use crate::all::*;

use std::sync::PoisonError;

// Holds the most recently published snapshot. Readers get a shared handle, so a
// snapshot they hold is never affected by later publishing.
pub struct SnapshotPublisher<T> {
  latest: Mutex<Arc<T>>,
}

impl<T> SnapshotPublisher<T> {
  pub fn new(initial: T) -> SnapshotPublisher<T> {
    SnapshotPublisher {
      latest: Mutex::new(Arc::new(initial)),
    }
  }

  pub fn publish(&self, snapshot: T) {
    let snapshot = Arc::new(snapshot);
    *self.latest.lock().unwrap_or_else(PoisonError::into_inner) = snapshot;
  }

  pub fn latest(&self) -> Arc<T> {
    self.latest.lock().unwrap_or_else(PoisonError::into_inner).clone()
  }
}

impl FramePublisher for SnapshotPublisher<FrameSnapshot> {
  fn frame_snapshot(&self) -> Arc<FrameSnapshot> {
    self.latest()
  }
}

impl MapPublisher for SnapshotPublisher<MapSnapshot> {
  fn map_snapshot(&self) -> Arc<MapSnapshot> {
    self.latest()
  }
}
