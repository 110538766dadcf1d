use crate::all::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LandmarkId(pub usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyframeId(pub usize);

#[derive(Clone, Debug)]
pub struct Landmark {
  pub id: LandmarkId,
  pub position: Vector3d,
}

#[derive(Clone, Debug)]
pub struct Keyframe {
  pub id: KeyframeId,
  // Camera-to-world.
  pub pose: Isometry3d,
}

#[derive(Clone, Debug, Default)]
pub struct MapSnapshot {
  pub keyframes: Vec<Keyframe>,
  pub landmarks: Vec<Arc<Landmark>>,
  // Camera-to-world pose of the latest tracked frame, if tracking has succeeded at least once.
  pub current_pose: Option<Isometry3d>,
}

impl MapSnapshot {
  pub fn empty() -> MapSnapshot {
    MapSnapshot::default()
  }

  #[cfg(test)]
  pub fn landmark(&self, id: LandmarkId) -> Option<&Arc<Landmark>> {
    self.landmarks.iter().find(|l| l.id == id)
  }
}

pub trait MapPublisher: Send + Sync {
  fn map_snapshot(&self) -> Arc<MapSnapshot>;
}
