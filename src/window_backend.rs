use crate::all::*;
use crate::scene::{self, axes, scene_color, segments, to_scene};

use kiss3d::camera::{ArcBall, Camera};
use kiss3d::event::{
  Action, Key, MouseButton as SceneMouseButton, WindowEvent as SceneEvent,
};
use kiss3d::window::Window as SceneWindow;
use softbuffer::GraphicsContext;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, Event, KeyboardInput, VirtualKeyCode, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::platform::run_return::EventLoopExtRunReturn;
use winit::window::{Window, WindowBuilder, WindowId};

const TITLE: &str = "lumen";
const FRAME_BACKGROUND_COLOR: Color = Color::BLACK;
const SCENE_BACKGROUND: [f32; 3] = [0.06, 0.06, 0.1];
const POINT_SIZE: f32 = 3.;
// A press and release further apart than this is a drag, not a click.
const CLICK_MAX_TRAVEL: f64 = 3.;

// Two windows driven from the render thread: the annotated frame in a
// softbuffer window, the map in a 3D window with an arc ball camera.
pub struct WindowBackend {
  event_loop: EventLoop<()>,
  graphics_context: GraphicsContext<Window>,
  buffer: Vec<u32>,
  width: usize,
  height: usize,
  frame_image: Option<ColorImage>,
  status: String,
  scene_window: SceneWindow,
  arc_ball: ArcBall,
  events: EventState,
}

struct EventState {
  input: Input,
  closed: bool,
  // Cursor in the map window.
  cursor: Vector2d,
  // Where the left button went down in the map window.
  press: Option<Vector2d>,
}

impl WindowBackend {
  pub fn new(config: &ViewerConfig) -> Result<WindowBackend> {
    let event_loop = EventLoop::new();
    let size = PhysicalSize::new(config.window_width as u32, config.window_height as u32);
    let window = WindowBuilder::new()
      .with_title(TITLE)
      .with_inner_size(size)
      .build(&event_loop)
      .context("Failed to create window.")?;
    let graphics_context = unsafe { GraphicsContext::new(window) }
      .map_err(|err| anyhow!("Failed to create graphics context: {:?}", err))?;

    let mut scene_window = SceneWindow::new_with_size(
      &format!("{} map", TITLE),
      config.window_width as u32,
      config.window_height as u32,
    );
    let [r, g, b] = SCENE_BACKGROUND;
    scene_window.set_background_color(r, g, b);
    scene_window.set_point_size(POINT_SIZE);
    let eye = Point3::new(0.0f32, 15.0, 20.0);
    let at = Point3::origin();

    let mut backend = WindowBackend {
      event_loop,
      graphics_context,
      buffer: vec![],
      width: 0,
      height: 0,
      frame_image: None,
      status: String::new(),
      scene_window,
      arc_ball: ArcBall::new(eye, at),
      events: EventState::new(),
    };
    backend.fit_window();
    Ok(backend)
  }

  // Follow the actual window size, window managers need not honor the requested one.
  fn fit_window(&mut self) {
    let (width, height) = {
      let size = self.graphics_context.window().inner_size();
      (size.width as usize, size.height as usize)
    };
    if width == self.width && height == self.height { return }
    self.width = width;
    self.height = height;
    self.buffer = vec![0; width * height];
  }

  fn present_frame(&mut self) {
    for v in self.buffer.iter_mut() {
      *v = FRAME_BACKGROUND_COLOR.0;
    }
    if let Some(image) = &self.frame_image {
      image.blit(&mut self.buffer, self.width, self.height, 0, 0);
    }
    self.graphics_context.set_buffer(&self.buffer, self.width as u16, self.height as u16);
  }

  fn draw_segment(&mut self, a: &Vector3d, b: &Vector3d, color: Color) {
    self.scene_window.draw_line(&to_scene(a), &to_scene(b), &scene_color(color));
  }
}

impl Backend for WindowBackend {
  fn spin_once(&mut self, ui: &mut dyn FnMut(&mut dyn Canvas) -> Result<()>) -> Result<bool> {
    let window_id = self.graphics_context.window().id();
    let events = &mut self.events;
    self.event_loop.run_return(|event, _, control_flow| {
      events.handle_event(event, window_id, control_flow);
    });
    // Events the map window collected during the previous render. The arc ball
    // gets them too, on the next render.
    for event in self.scene_window.events().iter() {
      self.events.handle_scene_event(&event.value);
    }
    self.fit_window();

    for ([a, b], color) in axes() {
      self.draw_segment(&a, &b, color);
    }
    ui(self)?;
    self.present_frame();
    let scene_open = self.scene_window.render_with_camera(&mut self.arc_ball);
    Ok(scene_open && !self.events.closed)
  }
}

impl Canvas for WindowBackend {
  fn take_input(&mut self) -> Input {
    std::mem::take(&mut self.events.input)
  }

  fn set_frame_image(&mut self, image: ColorImage) {
    self.frame_image = Some(image);
  }

  fn set_status(&mut self, status: &str) {
    if status == self.status { return }
    self.status = status.to_string();
    self.graphics_context.window().set_title(&format!("{} | {}", TITLE, status));
  }

  fn draw(&mut self, command: DrawCommand) {
    let color = match &command {
      DrawCommand::Frustum { color, .. } | DrawCommand::Point { color, .. } => *color,
    };
    for [a, b] in segments(&command) {
      self.draw_segment(&a, &b, color);
    }
    if let DrawCommand::Point { position, color, .. } = command {
      self.scene_window.draw_point(&to_scene(&position), &scene_color(color));
    }
  }

  fn project(&self, position: &Vector3d) -> Option<Vector2d> {
    scene::project(
      &self.arc_ball.transformation(),
      position,
      self.scene_window.width() as f64,
      self.scene_window.height() as f64,
    )
  }
}

impl EventState {
  fn new() -> EventState {
    EventState {
      input: Input::default(),
      closed: false,
      cursor: Vector2d::zeros(),
      press: None,
    }
  }

  fn handle_event(&mut self, event: Event<()>, window_id: WindowId, control_flow: &mut ControlFlow) {
    *control_flow = ControlFlow::Poll;
    match event {
      Event::WindowEvent {
        event,
        window_id: id,
      } if id == window_id => self.handle_window_event(event),
      // Everything queued so far is handled, give control back to the render loop.
      Event::MainEventsCleared => *control_flow = ControlFlow::Exit,
      _ => {}, // Other events.
    }
  }

  fn handle_window_event(&mut self, event: WindowEvent) {
    match event {
      WindowEvent::CloseRequested => self.closed = true,
      WindowEvent::KeyboardInput {
        input: KeyboardInput {
          state: ElementState::Pressed,
          virtual_keycode: Some(keycode),
          ..
        },
        ..
      } => {
        if let Some(command) = key_command(keycode) {
          self.input.commands.push(command);
        }
      },
      _ => {}, // Other window events.
    }
  }

  // Dragging is left to the arc ball, a press and release in place is a click.
  fn handle_scene_event(&mut self, event: &SceneEvent) {
    match *event {
      SceneEvent::Key(key, Action::Press, _) => {
        if let Some(command) = scene_key_command(key) {
          self.input.commands.push(command);
        }
      },
      SceneEvent::CursorPos(x, y, _) => self.cursor = Vector2d::new(x, y),
      SceneEvent::MouseButton(SceneMouseButton::Button1, Action::Press, _) => {
        self.press = Some(self.cursor);
      },
      SceneEvent::MouseButton(SceneMouseButton::Button1, Action::Release, _) => {
        if let Some(press) = self.press.take() {
          if (self.cursor - press).norm() <= CLICK_MAX_TRAVEL {
            self.input.click = Some(self.cursor);
          }
        }
      },
      _ => {}, // Other map window events.
    }
  }
}

fn key_command(keycode: VirtualKeyCode) -> Option<UiCommand> {
  use UiCommand::*;
  Some(match keycode {
    VirtualKeyCode::A => ToggleShowAllKeypoints,
    VirtualKeyCode::R => ToggleShowRect,
    VirtualKeyCode::O => ToggleFilterByOctave,
    VirtualKeyCode::Up => NextOctave,
    VirtualKeyCode::Down => PreviousOctave,
    VirtualKeyCode::K => ToggleSelectKeypoint,
    VirtualKeyCode::Right => NextKeypoint,
    VirtualKeyCode::Left => PreviousKeypoint,
    VirtualKeyCode::L => ToggleSelectLandmark,
    VirtualKeyCode::Space => TogglePause,
    VirtualKeyCode::M => ToggleMapping,
    VirtualKeyCode::Back => Reset,
    VirtualKeyCode::Plus | VirtualKeyCode::Equals | VirtualKeyCode::NumpadAdd => IncreaseScale,
    VirtualKeyCode::Minus | VirtualKeyCode::NumpadSubtract => DecreaseScale,
    VirtualKeyCode::Escape | VirtualKeyCode::Q => Terminate,
    _ => return None,
  })
}

// Same bindings in the map window.
fn scene_key_command(key: Key) -> Option<UiCommand> {
  use UiCommand::*;
  Some(match key {
    Key::A => ToggleShowAllKeypoints,
    Key::R => ToggleShowRect,
    Key::O => ToggleFilterByOctave,
    Key::Up => NextOctave,
    Key::Down => PreviousOctave,
    Key::K => ToggleSelectKeypoint,
    Key::Right => NextKeypoint,
    Key::Left => PreviousKeypoint,
    Key::L => ToggleSelectLandmark,
    Key::Space => TogglePause,
    Key::M => ToggleMapping,
    Key::Back => Reset,
    Key::Equals => IncreaseScale,
    Key::Minus => DecreaseScale,
    Key::Escape | Key::Q => Terminate,
    _ => return None,
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  use kiss3d::event::Modifiers;

  #[test]
  fn test_key_commands() {
    assert_eq!(key_command(VirtualKeyCode::Space), Some(UiCommand::TogglePause));
    assert_eq!(key_command(VirtualKeyCode::Escape), Some(UiCommand::Terminate));
    assert_eq!(key_command(VirtualKeyCode::Z), None);
    assert_eq!(scene_key_command(Key::M), Some(UiCommand::ToggleMapping));
    assert_eq!(scene_key_command(Key::Z), None);
  }

  #[test]
  fn test_click_and_drag() {
    let mut state = EventState::new();
    let press = |state: &mut EventState, pressed: bool| {
      let action = if pressed { Action::Press } else { Action::Release };
      state.handle_scene_event(&SceneEvent::MouseButton(SceneMouseButton::Button1, action, Modifiers::empty()));
    };
    let cursor_moved = |state: &mut EventState, x: f64, y: f64| {
      state.handle_scene_event(&SceneEvent::CursorPos(x, y, Modifiers::empty()));
    };

    cursor_moved(&mut state, 50., 20.);
    press(&mut state, true);
    cursor_moved(&mut state, 51., 21.);
    press(&mut state, false);
    assert_eq!(state.input.click, Some(Vector2d::new(51., 21.)));

    state.input = Input::default();
    press(&mut state, true);
    cursor_moved(&mut state, 70., 30.);
    press(&mut state, false);
    assert_eq!(state.input.click, None);

    // A release without a press in this window.
    press(&mut state, false);
    assert_eq!(state.input.click, None);

    state.handle_scene_event(&SceneEvent::Key(Key::Space, Action::Press, Modifiers::empty()));
    state.handle_scene_event(&SceneEvent::Key(Key::Space, Action::Release, Modifiers::empty()));
    assert_eq!(state.input.commands, vec![UiCommand::TogglePause]);
  }
}
