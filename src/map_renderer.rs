use crate::all::*;

use std::collections::HashSet;

// Screen-space radius around a click in which landmarks can be picked.
pub const CLICK_TOLERANCE: f64 = 10.;
// Default landmark size relative to the current frame scale.
const LANDMARK_SCALE_RATIO: f64 = 0.1;

const KEYFRAME_COLOR: Color = Color::rgb(0, 160, 255);
const CURRENT_FRAME_COLOR: Color = Color::rgb(0, 255, 0);
const LANDMARK_COLOR: Color = Color::rgb(160, 160, 160);
// Landmarks observed in the current frame.
const CURRENT_LANDMARK_COLOR: Color = Color::rgb(255, 80, 80);
const SELECTED_LANDMARK_COLOR: Color = Color::rgb(255, 0, 255);

// Issues the map's draw commands for one tick. A pending click is resolved first,
// so a landmark picked now is already highlighted in this tick's output.
pub fn render_map(
  canvas: &mut dyn Canvas,
  map: &MapSnapshot,
  frame: &FrameSnapshot,
  selection: &mut SelectionState,
) {
  if let Some(click) = selection.take_click() {
    match pick_landmark(canvas, &map.landmarks, &click) {
      Some(id) => {
        debug!("Picked landmark {} at {:?}.", id.0, click);
        selection.select_landmark(id);
      },
      None => debug!("No landmark near {:?}.", click),
    }
  }

  for keyframe in &map.keyframes {
    canvas.draw(DrawCommand::Frustum {
      pose: keyframe.pose,
      scale: selection.keyframe_scale,
      color: KEYFRAME_COLOR,
    });
  }
  if let Some(pose) = map.current_pose {
    canvas.draw(DrawCommand::Frustum {
      pose,
      scale: selection.current_frame_scale,
      color: CURRENT_FRAME_COLOR,
    });
  }

  let observed: HashSet<LandmarkId> = frame.landmarks.iter()
    .flatten()
    .map(|l| l.id)
    .collect();
  let selected = selection.selected_landmark();
  let default_scale = LANDMARK_SCALE_RATIO * selection.current_frame_scale;
  for landmark in &map.landmarks {
    let (scale, color) = if selected == Some(landmark.id) {
      (selection.selected_landmark_scale, SELECTED_LANDMARK_COLOR)
    }
    // With a selection, all other landmarks are muted.
    else if selected.is_none() && observed.contains(&landmark.id) {
      (default_scale, CURRENT_LANDMARK_COLOR)
    }
    else {
      (default_scale, LANDMARK_COLOR)
    };
    canvas.draw(DrawCommand::Point { position: landmark.position, scale, color });
  }
}

// Landmark whose projection is nearest to `click`, if within `CLICK_TOLERANCE`.
pub fn pick_landmark(
  canvas: &dyn Canvas,
  landmarks: &[Arc<Landmark>],
  click: &Vector2d,
) -> Option<LandmarkId> {
  let mut best: Option<(f64, LandmarkId)> = None;
  for landmark in landmarks {
    let p = match canvas.project(&landmark.position) {
      Some(p) => p,
      None => continue,
    };
    let d = (p - click).norm();
    if d > CLICK_TOLERANCE { continue }
    if best.map_or(true, |(best_d, _)| d < best_d) {
      best = Some((d, landmark.id));
    }
  }
  best.map(|(_, id)| id)
}
