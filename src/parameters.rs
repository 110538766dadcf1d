use crate::all::*;

lazy_static! {
  pub static ref PARAMETER_SET: Mutex<ParameterSet> = Mutex::new(ParameterSet::default());
}

// Settings of the simulated pipeline that feeds the viewer.
#[derive(Clone, Debug)]
#[derive(clap::Args)]
pub struct ParameterSet {
  #[clap(long, default_value = "600")]
  pub landmark_count: usize,
  #[clap(long, default_value = "0")]
  pub seed: u64,
  // Zero for an endless run.
  #[clap(long, default_value = "0")]
  pub frame_count: usize,
  #[clap(long, default_value = "33")]
  pub frame_interval_ms: u64,
  #[clap(long, default_value = "10")]
  pub keyframe_interval: usize,
  #[clap(long, default_value = "640")]
  pub image_width: usize,
  #[clap(long, default_value = "480")]
  pub image_height: usize,
  // Untracked detections added to every frame.
  #[clap(long, default_value = "60")]
  pub clutter_count: usize,
}

impl Default for ParameterSet {
  fn default() -> ParameterSet {
    ParameterSet {
      landmark_count: 600,
      seed: 0,
      frame_count: 0,
      frame_interval_ms: 33,
      keyframe_interval: 10,
      image_width: 640,
      image_height: 480,
      clutter_count: 60,
    }
  }
}
