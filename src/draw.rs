// Drawing primitives on `ColorImage`. Everything clips silently at the image borders.

use crate::all::*;

#[inline(always)]
pub fn draw_pixel(image: &mut ColorImage, p: &Pixel, color: Color) {
  if p[0] < 0 || p[0] >= image.width as i32 { return }
  if p[1] < 0 || p[1] >= image.height as i32 { return }
  image.data[p[1] as usize * image.width + p[0] as usize] = color.0;
}

// Outline of a square with half-size `r`.
pub fn draw_square(image: &mut ColorImage, p: &Pixel, color: Color, r: i32) {
  let corners = [
    p + Pixel::new(-r, -r),
    p + Pixel::new(r, -r),
    p + Pixel::new(r, r),
    p + Pixel::new(-r, r),
  ];
  for i in 0..4 {
    draw_line(image, corners[i], corners[(i + 1) % 4], color);
  }
}

pub fn draw_filled_square(image: &mut ColorImage, p: &Pixel, color: Color, r: i32) {
  for y in (-r)..(r+1) {
    for x in (-r)..(r+1) {
      draw_pixel(image, &(p + Pixel::new(x, y)), color);
    }
  }
}

// Endpoints may lie anywhere in the `i32` range, the stepping is done in `i64`.
pub fn draw_line(image: &mut ColorImage, p0: Pixel, p1: Pixel, color: Color) {
  let (mut x0, mut y0) = (p0[0] as i64, p0[1] as i64);
  let (mut x1, mut y1) = (p1[0] as i64, p1[1] as i64);
  let dx = x1 - x0;
  let dy = y1 - y0;
  if dx == 0 && dy == 0 {
    draw_pixel(image, &p0, color);
    return;
  }
  // Skip lines that lie fully outside on one side, far away endpoints would
  // otherwise iterate over huge ranges.
  let (w, h) = (image.width as i64, image.height as i64);
  if x0.max(x1) < 0 || x0.min(x1) >= w { return }
  if y0.max(y1) < 0 || y0.min(y1) >= h { return }
  if dx.abs() < dy.abs() {
    if y0 > y1 { (x0, y0, x1, y1) = (x1, y1, x0, y0); }
    let k = (x1 - x0) as f64 / (y1 - y0) as f64;
    for y in y0.max(0) ..= y1.min(h - 1) {
      let x = x0 as f64 + (k * (y - y0) as f64).round();
      if x < 0. || x >= w as f64 { continue }
      draw_pixel(image, &Pixel::new(x as i32, y as i32), color);
    }
  }
  else {
    if x0 > x1 { (x0, y0, x1, y1) = (x1, y1, x0, y0); }
    let k = (y1 - y0) as f64 / (x1 - x0) as f64;
    for x in x0.max(0) ..= x1.min(w - 1) {
      let y = y0 as f64 + (k * (x - x0) as f64).round();
      if y < 0. || y >= h as f64 { continue }
      draw_pixel(image, &Pixel::new(x as i32, y as i32), color);
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn count(image: &ColorImage, color: Color) -> usize {
    image.data.iter().filter(|v| **v == color.0).count()
  }

  #[test]
  fn test_square_outline() {
    let mut image = ColorImage::new(10, 10, Color::BLACK);
    draw_square(&mut image, &Pixel::new(5, 5), Color::WHITE, 2);
    // 5x5 outline.
    assert_eq!(count(&image, Color::WHITE), 16);
    assert_eq!(image.value(5, 5), Color::BLACK);
    assert_eq!(image.value(3, 3), Color::WHITE);
  }

  #[test]
  fn test_clipping() {
    let mut image = ColorImage::new(4, 4, Color::BLACK);
    draw_filled_square(&mut image, &Pixel::new(0, 0), Color::WHITE, 1);
    assert_eq!(count(&image, Color::WHITE), 4);
    draw_line(&mut image, Pixel::new(-100000, 2), Pixel::new(100000, 2), Color::WHITE);
    assert_eq!(count(&image, Color::WHITE), 8);
  }

  #[test]
  fn test_line_endpoints() {
    let mut image = ColorImage::new(10, 10, Color::BLACK);
    draw_line(&mut image, Pixel::new(8, 1), Pixel::new(1, 6), Color::WHITE);
    assert_eq!(image.value(8, 1), Color::WHITE);
    assert_eq!(image.value(1, 6), Color::WHITE);
    assert_eq!(count(&image, Color::WHITE), 8);
  }

  #[test]
  fn test_line_extreme_endpoints() {
    let mut image = ColorImage::new(10, 10, Color::BLACK);
    draw_line(&mut image, Pixel::new(5, 5), Pixel::new(5, i32::MIN), Color::WHITE);
    assert_eq!(count(&image, Color::WHITE), 6);
    draw_line(&mut image, Pixel::new(i32::MIN, i32::MIN), Pixel::new(i32::MAX, i32::MAX), Color::WHITE);
    assert_eq!(image.value(9, 9), Color::WHITE);
    assert_eq!(image.value(0, 0), Color::WHITE);
  }
}
