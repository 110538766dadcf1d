use crate::all::*;

// Debug view of a running SLAM system: the current frame with its keypoints and
// the map with keyframes and landmarks. Reads snapshots from the publishers and
// writes only through the `System` controls.
pub struct Viewer {
  system: Arc<dyn System>,
  frame_publisher: Arc<dyn FramePublisher>,
  map_publisher: Arc<dyn MapPublisher>,
  interval: Duration,
  selection: SelectionState,
  frame_renderer: FrameRenderer,
  termination: Arc<Termination>,
  stats: Stats,
}

#[derive(Default)]
struct Stats {
  ticks: usize,
  clicks: usize,
}

impl Viewer {
  pub fn new(
    config: &ViewerConfig,
    system: Arc<dyn System>,
    frame_publisher: Arc<dyn FramePublisher>,
    map_publisher: Arc<dyn MapPublisher>,
  ) -> Viewer {
    Viewer {
      system,
      frame_publisher,
      map_publisher,
      interval: config.interval(),
      selection: SelectionState::new(config),
      frame_renderer: FrameRenderer::new(config),
      termination: Arc::new(Termination::new()),
      stats: Stats::default(),
    }
  }

  // Occupies the calling thread until termination is requested, either through
  // `request_terminate()` or from the window. Marks the viewer terminated on the
  // way out, also when the backend fails.
  pub fn run(&mut self, backend: &mut dyn Backend) -> Result<()> {
    self.termination.start();
    info!("Viewer started.");
    let result = self.run_loop(backend);
    info!("Viewer stopped after {} ticks and {} picks.", self.stats.ticks, self.stats.clicks);
    self.termination.terminate();
    result
  }

  fn run_loop(&mut self, backend: &mut dyn Backend) -> Result<()> {
    loop {
      let frame = self.frame_publisher.frame_snapshot();
      let map = self.map_publisher.map_snapshot();
      let open = backend.spin_once(&mut |canvas: &mut dyn Canvas| self.ui_callback(canvas, &frame, &map))?;
      self.stats.ticks += 1;
      if !open {
        info!("Viewer window closed.");
        self.termination.request_terminate();
      }
      if self.termination.terminate_is_requested() {
        return Ok(());
      }
      thread::sleep(self.interval);
    }
  }

  // Does not wait for the loop to stop. Poll `is_terminated()` afterwards.
  pub fn request_terminate(&self) {
    self.termination.request_terminate();
  }

  pub fn is_terminated(&self) -> bool {
    self.termination.is_terminated()
  }

  // For owners that request termination or wait for it from another thread.
  pub fn terminate_handle(&self) -> TerminateHandle {
    TerminateHandle::new(self.termination.clone())
  }

  #[cfg(test)]
  pub fn selection(&self) -> &SelectionState {
    &self.selection
  }

  fn ui_callback(
    &mut self,
    canvas: &mut dyn Canvas,
    frame: &FrameSnapshot,
    map: &MapSnapshot,
  ) -> Result<()> {
    let input = canvas.take_input();
    for command in input.commands {
      self.handle_command(command);
    }
    if let Some(click) = input.click {
      self.stats.clicks += 1;
      self.selection.click(click);
    }

    let (image, count) = self.frame_renderer.render(frame, &self.selection);
    canvas.set_frame_image(image);
    render_map(canvas, map, frame, &mut self.selection);
    canvas.set_status(&self.status(count, map));
    Ok(())
  }

  fn handle_command(&mut self, command: UiCommand) {
    if self.selection.apply(command) { return }
    match command {
      UiCommand::TogglePause => {
        self.selection.is_paused = !self.selection.is_paused;
        if self.selection.is_paused {
          self.system.pause_tracker();
        }
        else {
          self.system.resume_tracker();
        }
      },
      UiCommand::ToggleMapping => {
        if self.system.mapping_module_is_enabled() {
          self.system.disable_mapping_module();
        }
        else {
          self.system.enable_mapping_module();
        }
      },
      UiCommand::Reset => {
        info!("Requesting reset of the pipeline.");
        self.system.request_reset();
      },
      UiCommand::Terminate => {
        info!("Terminate requested from the viewer.");
        self.system.request_terminate();
        self.request_terminate();
      },
      _ => {},
    }
  }

  fn status(&self, count: usize, map: &MapSnapshot) -> String {
    let s = &self.selection;
    let mut status = format!(
      "{} points tracked | {} keyframes | {} landmarks",
      count,
      map.keyframes.len(),
      map.landmarks.len(),
    );
    if s.filter_by_octave {
      status += &format!(" | octave {}", s.octave);
    }
    if let Some(id) = s.selected_keypoint() {
      status += &format!(" | keypoint {}", id);
    }
    if let Some(id) = s.selected_landmark() {
      status += &format!(" | landmark {}", id.0);
    }
    if !self.system.mapping_module_is_enabled() {
      status += " | localization";
    }
    if s.is_paused {
      status += " | paused";
    }
    status
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::backend::testing::RecordingBackend;

  struct Fixture {
    system: Arc<SystemControl>,
    frames: Arc<SnapshotPublisher<FrameSnapshot>>,
    maps: Arc<SnapshotPublisher<MapSnapshot>>,
  }

  impl Fixture {
    fn new() -> Fixture {
      Fixture {
        system: Arc::new(SystemControl::new()),
        frames: Arc::new(SnapshotPublisher::new(FrameSnapshot::empty())),
        maps: Arc::new(SnapshotPublisher::new(MapSnapshot::empty())),
      }
    }

    fn viewer(&self) -> Viewer {
      let config = ViewerConfig { interval_ms: 1, ..ViewerConfig::default() };
      Viewer::new(&config, self.system.clone(), self.frames.clone(), self.maps.clone())
    }
  }

  fn landmark(id: usize, x: f64, y: f64) -> Arc<Landmark> {
    Arc::new(Landmark { id: LandmarkId(id), position: Vector3d::new(x, y, 0.) })
  }

  #[test]
  fn test_request_before_run() {
    let fixture = Fixture::new();
    let mut viewer = fixture.viewer();
    assert!(viewer.is_terminated());
    viewer.request_terminate();
    let mut backend = RecordingBackend::new(|_| true);
    viewer.run(&mut backend).unwrap();
    assert_eq!(backend.ticks, 1);
    assert!(viewer.is_terminated());
  }

  #[test]
  fn test_not_terminated_while_running() {
    let fixture = Fixture::new();
    let mut viewer = fixture.viewer();
    let handle = viewer.terminate_handle();
    let mut backend = RecordingBackend::new(|tick| {
      assert!(!handle.is_terminated());
      if tick == 4 {
        handle.request_terminate();
      }
      true
    });
    viewer.run(&mut backend).unwrap();
    assert_eq!(backend.ticks, 5);
    assert!(viewer.is_terminated());
  }

  #[test]
  fn test_terminate_from_other_threads() {
    let fixture = Fixture::new();
    let mut viewer = fixture.viewer();
    let handle = viewer.terminate_handle();
    let requesters: Vec<_> = (0..4).map(|_| {
      let handle = handle.clone();
      thread::spawn(move || {
        thread::sleep(Duration::from_millis(20));
        for _ in 0..10 {
          handle.request_terminate();
        }
        handle.wait(Duration::from_millis(1));
      })
    }).collect();
    let mut backend = RecordingBackend::new(|_| true);
    viewer.run(&mut backend).unwrap();
    for t in requesters {
      t.join().unwrap();
    }
    assert!(viewer.is_terminated());
    assert!(backend.ticks >= 1);
  }

  #[test]
  fn test_terminated_exactly_once() {
    let fixture = Fixture::new();
    let mut viewer = fixture.viewer();
    let handle = viewer.terminate_handle();
    // Records every change of `is_terminated()` seen from outside.
    let watcher = {
      let handle = handle.clone();
      thread::spawn(move || {
        let deadline = std::time::Instant::now() + Duration::from_secs(5);
        while handle.is_terminated() {
          assert!(std::time::Instant::now() < deadline);
        }
        let mut changes = vec![];
        let mut last = false;
        let settled = std::time::Instant::now() + Duration::from_millis(100);
        while std::time::Instant::now() < settled || !last {
          let terminated = handle.is_terminated();
          if terminated != last {
            changes.push(terminated);
            last = terminated;
          }
        }
        changes
      })
    };
    let requesters: Vec<_> = (0..4).map(|_| {
      let handle = handle.clone();
      thread::spawn(move || {
        thread::sleep(Duration::from_millis(20));
        for _ in 0..100 {
          handle.request_terminate();
        }
      })
    }).collect();
    let mut backend = RecordingBackend::new(|_| true);
    viewer.run(&mut backend).unwrap();
    for t in requesters {
      t.join().unwrap();
    }
    assert_eq!(watcher.join().unwrap(), vec![true]);
    assert!(viewer.is_terminated());
  }

  #[test]
  fn test_window_close_stops() {
    let fixture = Fixture::new();
    let mut viewer = fixture.viewer();
    let mut backend = RecordingBackend::new(|tick| tick < 2);
    viewer.run(&mut backend).unwrap();
    assert_eq!(backend.ticks, 3);
    assert!(viewer.is_terminated());
    assert!(!fixture.system.terminate_is_requested());
  }

  #[test]
  fn test_terminated_after_backend_error() {
    struct FailingBackend;
    impl Backend for FailingBackend {
      fn spin_once(&mut self, _: &mut dyn FnMut(&mut dyn Canvas) -> Result<()>) -> Result<bool> {
        bail!("Out of resources.")
      }
    }
    let fixture = Fixture::new();
    let mut viewer = fixture.viewer();
    assert!(viewer.run(&mut FailingBackend).is_err());
    assert!(viewer.is_terminated());
  }

  #[test]
  fn test_commands_reach_system() {
    let fixture = Fixture::new();
    let mut viewer = fixture.viewer();
    let mut backend = RecordingBackend::new(|_| true);
    backend.canvas.inputs.push_back(Input {
      commands: vec![UiCommand::TogglePause, UiCommand::ToggleMapping, UiCommand::Reset],
      click: None,
    });
    backend.canvas.inputs.push_back(Input {
      commands: vec![UiCommand::ToggleShowRect, UiCommand::Terminate],
      click: None,
    });
    viewer.run(&mut backend).unwrap();
    assert_eq!(backend.ticks, 2);
    assert!(fixture.system.tracker_is_paused());
    assert!(!fixture.system.mapping_module_is_enabled());
    assert!(fixture.system.take_reset_request());
    assert!(fixture.system.terminate_is_requested());
    assert!(viewer.selection().is_paused);
    assert!(viewer.selection().show_rect);
    assert!(backend.canvas.status.contains("paused"));
    assert!(backend.canvas.status.contains("localization"));
  }

  #[test]
  fn test_frame_and_map_per_tick() {
    let fixture = Fixture::new();
    let l1 = landmark(1, 10., 10.);
    let keypoint = Keypoint { point: Vector2d::new(4., 4.), size: 31., octave: 0 };
    fixture.frames.publish(FrameSnapshot {
      image: Image::new(16, 16),
      keypoints: vec![keypoint; 3],
      landmarks: vec![None, Some(l1.clone()), None],
      mapping_is_enabled: true,
    });
    fixture.maps.publish(MapSnapshot {
      keyframes: vec![],
      landmarks: vec![l1, landmark(2, 50., 50.), landmark(3, 90., 40.)],
      current_pose: None,
    });
    let mut viewer = fixture.viewer();
    let mut backend = RecordingBackend::new(|_| true);
    backend.canvas.inputs.push_back(Input {
      commands: vec![UiCommand::Terminate],
      click: Some(Vector2d::new(88., 41.)),
    });
    viewer.run(&mut backend).unwrap();
    assert!(backend.canvas.status.starts_with("1 points tracked | 0 keyframes | 3 landmarks"));
    assert!(backend.canvas.status.contains("landmark 3"));
    assert_eq!(viewer.selection().selected_landmark(), Some(LandmarkId(3)));
    assert!(!viewer.selection().clicked);
    assert_eq!(backend.canvas.commands.len(), 3);
    assert_eq!(backend.canvas.image.as_ref().map(|i| i.width), Some(16));
  }
}
