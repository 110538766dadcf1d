// Seam between the viewer and whatever displays its output. The backend owns the
// window and its event processing; the viewer hands it a callback once per tick.

use crate::all::*;

// Immediate-mode 3D primitive for the map view. Scales are in scene units.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
  // Camera glyph for a camera-to-world pose.
  Frustum { pose: Isometry3d, scale: f64, color: Color },
  Point { position: Vector3d, scale: f64, color: Color },
}

// Operator input gathered by the backend since the previous tick.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Input {
  pub commands: Vec<UiCommand>,
  // Last click in the map view, in its pixel coordinates.
  pub click: Option<Vector2d>,
}

// Drawing context valid for one tick.
pub trait Canvas {
  fn take_input(&mut self) -> Input;
  // Replaces the displayed frame image.
  fn set_frame_image(&mut self, image: ColorImage);
  fn set_status(&mut self, status: &str);
  fn draw(&mut self, command: DrawCommand);
  // Map view pixel coordinates of a scene point, `None` if it is not in front of the view.
  fn project(&self, position: &Vector3d) -> Option<Vector2d>;
}

pub trait Backend {
  // Processes pending window events and invokes `ui` exactly once.
  // Returns false once the window has been closed.
  fn spin_once(&mut self, ui: &mut dyn FnMut(&mut dyn Canvas) -> Result<()>) -> Result<bool>;
}

#[cfg(test)]
pub mod testing {
  use super::*;

  use std::collections::VecDeque;

  // Canvas that records what is drawn. Projection is orthographic onto the
  // x-y plane with one scene unit per pixel.
  #[derive(Default)]
  pub struct RecordingCanvas {
    pub inputs: VecDeque<Input>,
    pub image: Option<ColorImage>,
    pub status: String,
    pub commands: Vec<DrawCommand>,
  }

  impl Canvas for RecordingCanvas {
    fn take_input(&mut self) -> Input {
      self.inputs.pop_front().unwrap_or_default()
    }

    fn set_frame_image(&mut self, image: ColorImage) {
      self.image = Some(image);
    }

    fn set_status(&mut self, status: &str) {
      self.status = status.to_string();
    }

    fn draw(&mut self, command: DrawCommand) {
      self.commands.push(command);
    }

    fn project(&self, position: &Vector3d) -> Option<Vector2d> {
      Some(Vector2d::new(position[0], position[1]))
    }
  }

  // Runs scripted ticks on a `RecordingCanvas`. `on_tick` sees the tick number
  // before the callback runs and may return false to report a closed window.
  pub struct RecordingBackend<F: FnMut(usize) -> bool> {
    pub canvas: RecordingCanvas,
    pub ticks: usize,
    pub on_tick: F,
  }

  impl<F: FnMut(usize) -> bool> RecordingBackend<F> {
    pub fn new(on_tick: F) -> RecordingBackend<F> {
      RecordingBackend {
        canvas: RecordingCanvas::default(),
        ticks: 0,
        on_tick,
      }
    }
  }

  impl<F: FnMut(usize) -> bool> Backend for RecordingBackend<F> {
    fn spin_once(&mut self, ui: &mut dyn FnMut(&mut dyn Canvas) -> Result<()>) -> Result<bool> {
      let open = (self.on_tick)(self.ticks);
      self.ticks += 1;
      self.canvas.commands.clear();
      ui(&mut self.canvas)?;
      Ok(open)
    }
  }
}
