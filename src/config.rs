use crate::all::*;

use serde::Deserialize;

const VIEWER_SECTION: &str = "viewer";

// Construction-time settings of the viewer. Missing keys take the defaults, unknown keys are ignored.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct ViewerConfig {
  pub interval_ms: u64,
  pub show_all_keypoints: bool,
  pub show_rect: bool,
  pub filter_by_octave: bool,
  pub octave: usize,
  pub current_frame_scale: f64,
  pub keyframe_scale: f64,
  pub selected_landmark_scale: f64,
  pub keypoint_mark_size: i32,
  pub window_width: usize,
  pub window_height: usize,
}

impl Default for ViewerConfig {
  fn default() -> ViewerConfig {
    ViewerConfig {
      interval_ms: 16,
      show_all_keypoints: false,
      show_rect: false,
      filter_by_octave: false,
      octave: 0,
      current_frame_scale: 0.05,
      keyframe_scale: 0.05,
      selected_landmark_scale: 0.01,
      keypoint_mark_size: 5,
      window_width: 800,
      window_height: 600,
    }
  }
}

impl ViewerConfig {
  pub fn load(path: &Path) -> Result<ViewerConfig> {
    let s = std::fs::read_to_string(path)
      .context(format!("Failed to read file {}.", path.display()))?;
    ViewerConfig::from_json(&s)
      .context(format!("Failed to parse {}.", path.display()))
  }

  // Reads the "viewer" section of a JSON document. The other sections belong to other components.
  pub fn from_json(s: &str) -> Result<ViewerConfig> {
    let root: serde_json::Value = serde_json::from_str(s)?;
    let root = root.as_object()
      .ok_or(anyhow!("Configuration root is not a map."))?;
    let config = match root.get(VIEWER_SECTION) {
      Some(section) => ViewerConfig::deserialize(section)
        .context(format!("Invalid \"{}\" section.", VIEWER_SECTION))?,
      None => {
        info!("No \"{}\" section in configuration, using defaults.", VIEWER_SECTION);
        ViewerConfig::default()
      },
    };
    config.validate()?;
    Ok(config)
  }

  pub fn validate(&self) -> Result<()> {
    for (name, scale) in [
      ("current_frame_scale", self.current_frame_scale),
      ("keyframe_scale", self.keyframe_scale),
      ("selected_landmark_scale", self.selected_landmark_scale),
    ] {
      if !scale.is_finite() || scale <= 0. {
        bail!("{} must be a positive number, got {}.", name, scale);
      }
    }
    if self.keypoint_mark_size < 0 {
      bail!("keypoint_mark_size must not be negative.");
    }
    if self.window_width == 0 || self.window_height == 0 {
      bail!("Window size {}x{} is too small.", self.window_width, self.window_height);
    }
    Ok(())
  }

  pub fn interval(&self) -> Duration {
    Duration::from_millis(self.interval_ms)
  }
}
