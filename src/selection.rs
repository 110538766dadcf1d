use crate::all::*;

// Relative change of a scale per scale up/down command.
const SCALE_STEP: f64 = 1.25;

// Operator-driven filters and display toggles. Owned by the viewer and only
// touched on the render thread. The ids are meaningful only while the matching
// `select_*_by_id` flag is set.
#[derive(Clone, Debug, PartialEq)]
pub struct SelectionState {
  pub select_keypoint_by_id: bool,
  pub keypoint_id: usize,
  pub select_landmark_by_id: bool,
  pub landmark_id: LandmarkId,
  pub is_paused: bool,
  pub show_all_keypoints: bool,
  pub show_rect: bool,
  pub filter_by_octave: bool,
  pub octave: usize,
  pub current_frame_scale: f64,
  pub keyframe_scale: f64,
  pub selected_landmark_scale: f64,
  pub clicked: bool,
  // Pixels of the map view.
  pub clicked_point: Vector2d,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UiCommand {
  ToggleShowAllKeypoints,
  ToggleShowRect,
  ToggleFilterByOctave,
  NextOctave,
  PreviousOctave,
  ToggleSelectKeypoint,
  NextKeypoint,
  PreviousKeypoint,
  ToggleSelectLandmark,
  TogglePause,
  ToggleMapping,
  Reset,
  IncreaseScale,
  DecreaseScale,
  Terminate,
}

impl SelectionState {
  pub fn new(config: &ViewerConfig) -> SelectionState {
    SelectionState {
      select_keypoint_by_id: false,
      keypoint_id: 0,
      select_landmark_by_id: false,
      landmark_id: LandmarkId(0),
      is_paused: false,
      show_all_keypoints: config.show_all_keypoints,
      show_rect: config.show_rect,
      filter_by_octave: config.filter_by_octave,
      octave: config.octave,
      current_frame_scale: config.current_frame_scale,
      keyframe_scale: config.keyframe_scale,
      selected_landmark_scale: config.selected_landmark_scale,
      clicked: false,
      clicked_point: Vector2d::zeros(),
    }
  }

  pub fn selected_keypoint(&self) -> Option<usize> {
    if self.select_keypoint_by_id { Some(self.keypoint_id) } else { None }
  }

  pub fn selected_landmark(&self) -> Option<LandmarkId> {
    if self.select_landmark_by_id { Some(self.landmark_id) } else { None }
  }

  pub fn select_landmark(&mut self, id: LandmarkId) {
    self.select_landmark_by_id = true;
    self.landmark_id = id;
  }

  pub fn click(&mut self, point: Vector2d) {
    self.clicked = true;
    self.clicked_point = point;
  }

  // Edge-triggered: returns the pending click once and clears it.
  pub fn take_click(&mut self) -> Option<Vector2d> {
    if !self.clicked { return None }
    self.clicked = false;
    Some(self.clicked_point)
  }

  // Applies the commands that only concern the display. Commands with effects
  // outside the viewer are left to the caller and return false.
  pub fn apply(&mut self, command: UiCommand) -> bool {
    use UiCommand::*;
    match command {
      ToggleShowAllKeypoints => self.show_all_keypoints = !self.show_all_keypoints,
      ToggleShowRect => self.show_rect = !self.show_rect,
      ToggleFilterByOctave => self.filter_by_octave = !self.filter_by_octave,
      NextOctave => self.octave += 1,
      PreviousOctave => self.octave = self.octave.saturating_sub(1),
      ToggleSelectKeypoint => self.select_keypoint_by_id = !self.select_keypoint_by_id,
      NextKeypoint => self.keypoint_id += 1,
      PreviousKeypoint => self.keypoint_id = self.keypoint_id.saturating_sub(1),
      ToggleSelectLandmark => self.select_landmark_by_id = !self.select_landmark_by_id,
      IncreaseScale => self.keyframe_scale *= SCALE_STEP,
      DecreaseScale => self.keyframe_scale /= SCALE_STEP,
      TogglePause | ToggleMapping | Reset | Terminate => return false,
    }
    true
  }
}
