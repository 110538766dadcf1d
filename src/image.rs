use crate::all::*;

// Row-major grayscale image storage, the form in which frames arrive from the pipeline.
#[derive(Clone, Debug)]
pub struct Image {
  pub data: Vec<u8>,
  pub width: usize,
  pub height: usize,
}

impl Image {
  pub fn empty() -> Image {
    Image {
      data: vec![],
      width: 0,
      height: 0,
    }
  }

  pub fn new(width: usize, height: usize) -> Image {
    Image {
      data: vec![0; width * height],
      width,
      height,
    }
  }

  #[cfg(test)]
  pub fn value(&self, x: usize, y: usize) -> u8 {
    self.data[y * self.width + x]
  }

  #[inline(always)]
  pub fn set_value(&mut self, x: usize, y: usize, value: u8) {
    self.data[y * self.width + x] = value;
  }
}

// Row-major color image with the same pixel layout as the window buffer.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorImage {
  pub data: Vec<u32>,
  pub width: usize,
  pub height: usize,
}

impl ColorImage {
  pub fn new(width: usize, height: usize, color: Color) -> ColorImage {
    ColorImage {
      data: vec![color.0; width * height],
      width,
      height,
    }
  }

  pub fn from_gray(image: &Image) -> ColorImage {
    ColorImage {
      data: image.data.iter().map(|v| Color::gray(*v).0).collect(),
      width: image.width,
      height: image.height,
    }
  }

  #[cfg(test)]
  pub fn value(&self, x: usize, y: usize) -> Color {
    Color(self.data[y * self.width + x])
  }

  // Copy into a larger row-major buffer with top-left corner at `(ax, ay)`, clipping at its borders.
  pub fn blit(
    &self,
    buffer: &mut [u32],
    buffer_w: usize,
    buffer_h: usize,
    ax: usize,
    ay: usize,
  ) {
    for y in 0..self.height {
      if y + ay >= buffer_h { break }
      for x in 0..self.width {
        if x + ax >= buffer_w { break }
        buffer[(y + ay) * buffer_w + x + ax] = self.data[y * self.width + x];
      }
    }
  }
}
