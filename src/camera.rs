use crate::all::*;

// Ideal pinhole camera. Camera coordinates are x right, y down, z forward.
#[derive(Clone, Debug)]
pub struct PinholeCamera {
  pub camera_matrix: Matrix3d,
}

impl PinholeCamera {
  pub fn new(fx: f64, fy: f64, cx: f64, cy: f64) -> PinholeCamera {
    PinholeCamera {
      camera_matrix: Matrix3d::new(
        fx, 0., cx,
        0., fy, cy,
        0., 0., 1.,
      ),
    }
  }

  // Centered principal point and given horizontal field of view in radians.
  pub fn with_fov(width: usize, height: usize, fov: f64) -> PinholeCamera {
    let f = 0.5 * width as f64 / (0.5 * fov).tan();
    PinholeCamera::new(f, f, 0.5 * width as f64, 0.5 * height as f64)
  }

  pub fn ray_to_pixel(&self, ray: &Vector3d) -> Option<Vector2d> {
    if ray[2] <= 0. { return None }
    let pixel = self.camera_matrix * (ray / ray[2]);
    Some(Vector2d::new(pixel[0], pixel[1]))
  }
}
