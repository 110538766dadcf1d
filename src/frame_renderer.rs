use crate::all::*;

const MAPPING_COLOR: Color = Color::rgb(0, 255, 0);
// Localization only: no new landmarks are created, so tracked points change color.
const LOCALIZATION_COLOR: Color = Color::rgb(0, 128, 255);
const UNTRACKED_COLOR: Color = Color::rgb(255, 200, 0);
const SELECTED_KEYPOINT_COLOR: Color = Color::rgb(255, 0, 0);
const SELECTED_LANDMARK_COLOR: Color = Color::rgb(255, 0, 255);

const POINT_RADIUS: i32 = 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeypointKind {
  Selected,
  // Associated with the selected landmark.
  ObservesSelection,
  Tracked,
  Untracked,
}

impl KeypointKind {
  pub fn color(self, mapping_is_enabled: bool) -> Color {
    match self {
      KeypointKind::Selected => SELECTED_KEYPOINT_COLOR,
      KeypointKind::ObservesSelection => SELECTED_LANDMARK_COLOR,
      KeypointKind::Tracked if mapping_is_enabled => MAPPING_COLOR,
      KeypointKind::Tracked => LOCALIZATION_COLOR,
      KeypointKind::Untracked => UNTRACKED_COLOR,
    }
  }
}

pub struct FrameRenderer {
  // Half-size of keypoint rectangles, in pixels.
  mark_size: i32,
}

impl FrameRenderer {
  pub fn new(config: &ViewerConfig) -> FrameRenderer {
    FrameRenderer {
      mark_size: config.keypoint_mark_size,
    }
  }

  // Returns the annotated frame and the number of tracked points drawn on it.
  pub fn render(&self, frame: &FrameSnapshot, selection: &SelectionState) -> (ColorImage, usize) {
    let mut image = ColorImage::from_gray(&frame.image);
    let count = self.draw_tracked_points(
      &mut image,
      &frame.keypoints,
      &frame.landmarks,
      frame.mapping_is_enabled,
      selection,
    );
    (image, count)
  }

  fn draw_tracked_points(
    &self,
    image: &mut ColorImage,
    keypoints: &[Keypoint],
    landmarks: &[Option<Arc<Landmark>>],
    mapping_is_enabled: bool,
    selection: &SelectionState,
  ) -> usize {
    assert_eq!(keypoints.len(), landmarks.len(), "Keypoints and landmarks of a frame must be parallel.");
    let mut count = 0;
    for (i, (keypoint, landmark)) in keypoints.iter().zip(landmarks).enumerate() {
      let kind = match classify(i, keypoint, landmark.as_deref(), mapping_is_enabled, selection) {
        Some(kind) => kind,
        None => continue,
      };
      if landmark.is_some() {
        count += 1;
      }
      let color = kind.color(mapping_is_enabled);
      if selection.show_rect {
        self.draw_rect(image, keypoint, color);
      }
      draw_filled_square(image, &from_f64(&keypoint.point), color, POINT_RADIUS);
    }
    count
  }

  fn draw_rect(&self, image: &mut ColorImage, keypoint: &Keypoint, color: Color) {
    draw_square(image, &from_f64(&keypoint.point), color, self.mark_size);
  }
}

// `None` if the keypoint is filtered out.
pub fn classify(
  index: usize,
  keypoint: &Keypoint,
  landmark: Option<&Landmark>,
  mapping_is_enabled: bool,
  selection: &SelectionState,
) -> Option<KeypointKind> {
  let selected = selection.selected_keypoint() == Some(index);
  let tracked = landmark.is_some();
  if !(selection.show_all_keypoints || tracked || selected) { return None }
  if selection.filter_by_octave && keypoint.octave != selection.octave { return None }
  if selected { return Some(KeypointKind::Selected) }
  match landmark {
    Some(landmark) if mapping_is_enabled && selection.selected_landmark() == Some(landmark.id) => {
      Some(KeypointKind::ObservesSelection)
    },
    Some(_) => Some(KeypointKind::Tracked),
    None => Some(KeypointKind::Untracked),
  }
}
