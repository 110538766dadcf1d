use crate::all::*;

// A detected image feature. Its index is its position in `FrameSnapshot::keypoints`.
#[derive(Clone, Copy, Debug)]
pub struct Keypoint {
  // Pixels.
  pub point: Vector2d,
  // Diameter of the meaningful neighborhood, in pixels.
  pub size: f64,
  // Pyramid level the keypoint was detected on.
  pub octave: usize,
}

// State of the latest tracked frame, as handed out by a `FramePublisher`.
#[derive(Clone, Debug)]
pub struct FrameSnapshot {
  pub image: Image,
  pub keypoints: Vec<Keypoint>,
  // Parallel to `keypoints`. `None` for keypoints not (yet) associated with a landmark.
  pub landmarks: Vec<Option<Arc<Landmark>>>,
  pub mapping_is_enabled: bool,
}

impl FrameSnapshot {
  // What the viewer shows before the pipeline has published anything.
  pub fn empty() -> FrameSnapshot {
    FrameSnapshot {
      image: Image::empty(),
      keypoints: vec![],
      landmarks: vec![],
      mapping_is_enabled: true,
    }
  }
}

pub trait FramePublisher: Send + Sync {
  // Must return a consistent snapshot: keypoints and landmarks of the same frame.
  fn frame_snapshot(&self) -> Arc<FrameSnapshot>;
}
