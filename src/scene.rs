// Geometry of the map window. The map is z-up, the 3D window's scene is y-up.

use crate::all::*;

use nalgebra::Matrix4;

const AXIS_LENGTH: f64 = 1.;
// Marker arm length per unit of point scale.
const MARKER_RATIO: f64 = 10.;

// Frustum glyph corners at unit scale, in camera coordinates.
const FRUSTUM_CORNERS: [[f64; 3]; 4] = [
  [-1., -0.75, 1.], [1., -0.75, 1.], [1., 0.75, 1.], [-1., 0.75, 1.],
];

pub fn to_scene(p: &Vector3d) -> Point3<f32> {
  Point3::new(p[0] as f32, p[2] as f32, -p[1] as f32)
}

pub fn scene_color(color: Color) -> Point3<f32> {
  let channel = |shift: u32| ((color.0 >> shift) & 0xff) as f32 / 255.;
  Point3::new(channel(16), channel(8), channel(0))
}

// World axes, colored x red, y green, z blue.
pub fn axes() -> Vec<([Vector3d; 2], Color)> {
  let colors = [Color::rgb(255, 0, 0), Color::rgb(0, 255, 0), Color::rgb(0, 0, 255)];
  colors.iter().enumerate().map(|(i, color)| {
    let mut p = Vector3d::zeros();
    p[i] = AXIS_LENGTH;
    ([Vector3d::zeros(), p], *color)
  }).collect()
}

// Line segments of a command in map coordinates. A point becomes a three-axis
// marker around it.
pub fn segments(command: &DrawCommand) -> Vec<[Vector3d; 2]> {
  match command {
    DrawCommand::Frustum { pose, scale, .. } => {
      let apex = pose.translation.vector;
      let corners: Vec<Vector3d> = FRUSTUM_CORNERS.iter()
        .map(|c| pose.transform_point(&Point3::new(c[0] * scale, c[1] * scale, c[2] * scale)).coords)
        .collect();
      let mut segments = vec![];
      for i in 0..corners.len() {
        segments.push([apex, corners[i]]);
        segments.push([corners[i], corners[(i + 1) % corners.len()]]);
      }
      segments
    },
    DrawCommand::Point { position, scale, .. } => {
      (0..3).map(|i| {
        let mut d = Vector3d::zeros();
        d[i] = MARKER_RATIO * scale;
        [position - d, position + d]
      }).collect()
    },
  }
}

// Window pixel coordinates (origin top-left) of a map point under the camera's
// view-projection `transformation`. `None` for points behind the camera.
pub fn project(
  transformation: &Matrix4<f32>,
  p: &Vector3d,
  width: f64,
  height: f64,
) -> Option<Vector2d> {
  let h = transformation * to_scene(p).to_homogeneous();
  if h[3] <= 0. { return None }
  let x = (h[0] / h[3]) as f64;
  let y = (h[1] / h[3]) as f64;
  Some(Vector2d::new(0.5 * (1. + x) * width, 0.5 * (1. - y) * height))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_z_up_becomes_y_up() {
    assert_eq!(to_scene(&Vector3d::new(1., 2., 3.)), Point3::new(1., 3., -2.));
  }

  #[test]
  fn test_scene_color() {
    assert_eq!(scene_color(Color::rgb(255, 0, 51)), Point3::new(1., 0., 0.2));
  }

  #[test]
  fn test_frustum_segments() {
    let pose = Isometry3d::translation(1., 2., 3.);
    let command = DrawCommand::Frustum { pose, scale: 0.5, color: Color::BLACK };
    let segments = segments(&command);
    assert_eq!(segments.len(), 8);
    assert_eq!(segments[0][0], Vector3d::new(1., 2., 3.));
    assert!((segments[0][1] - Vector3d::new(0.5, 1.625, 3.5)).norm() < 1e-12);
  }

  #[test]
  fn test_point_marker() {
    let position = Vector3d::new(1., 1., 1.);
    let command = DrawCommand::Point { position, scale: 0.01, color: Color::BLACK };
    let segments = segments(&command);
    assert_eq!(segments.len(), 3);
    for [a, b] in segments {
      assert!(((a + b) / 2. - position).norm() < 1e-12);
      assert!(((b - a).norm() - 0.2).abs() < 1e-12);
    }
  }

  #[test]
  fn test_project() {
    let identity = Matrix4::identity();
    let p = project(&identity, &Vector3d::new(0.5, 0., 0.5), 200., 100.).unwrap();
    assert!((p - Vector2d::new(150., 25.)).norm() < 1e-6);

    let mut behind = Matrix4::identity();
    behind[(3, 3)] = -1.;
    assert!(project(&behind, &Vector3d::new(0.5, 0., 0.5), 200., 100.).is_none());
  }
}
