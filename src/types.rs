// Eigen-like aliases.
pub type Vector2d = nalgebra::Vector2::<f64>;
pub type Vector3d = nalgebra::Vector3::<f64>;
pub type Matrix3d = nalgebra::Matrix3::<f64>;
pub type Isometry3d = nalgebra::Isometry3::<f64>;
pub type Pixel = nalgebra::Vector2::<i32>;

// Far away coordinates are clamped so that pixel arithmetic cannot overflow.
const PIXEL_LIMIT: f64 = 1e6;

pub fn from_f64(p: &Vector2d) -> Pixel {
  let c = |v: f64| v.round().clamp(-PIXEL_LIMIT, PIXEL_LIMIT) as i32;
  Pixel::new(c(p[0]), c(p[1]))
}

// Packed 0RGB, the pixel format of `softbuffer`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color(pub u32);

impl Color {
  pub const BLACK: Color = Color::rgb(0, 0, 0);
  #[cfg(test)]
  pub const WHITE: Color = Color::rgb(255, 255, 255);

  pub const fn rgb(r: u8, g: u8, b: u8) -> Color {
    Color(((r as u32) << 16) | ((g as u32) << 8) | b as u32)
  }

  pub const fn gray(v: u8) -> Color {
    Color::rgb(v, v, v)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_from_f64_clamps() {
    assert_eq!(from_f64(&Vector2d::new(1.4, -2.6)), Pixel::new(1, -3));
    assert_eq!(from_f64(&Vector2d::new(1e300, f64::NEG_INFINITY)), Pixel::new(1_000_000, -1_000_000));
  }
}
