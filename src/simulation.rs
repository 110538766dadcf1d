// Synthetic SLAM pipeline: a camera orbits inside a field of random landmarks.
// Landmarks become part of the map when a keyframe observes them while mapping
// is enabled, keypoints of mapped landmarks are tracked.

use crate::all::*;

use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

const WORLD_HALF_WIDTH: f64 = 12.;
const WORLD_Z_RANGE: [f64; 2] = [-1., 3.];
const ORBIT_RADIUS: f64 = 4.;
// Landmarks keep this distance from the orbit's axis.
const CLEAR_RADIUS: f64 = ORBIT_RADIUS + 1.;
const ORBIT_RADIANS_PER_FRAME: f64 = 0.01;
const CAMERA_HEIGHT: f64 = 1.;
const FIELD_OF_VIEW: f64 = 70. * std::f64::consts::PI / 180.;
const MIN_DEPTH: f64 = 0.2;

// ORB-like scale pyramid.
const OCTAVE_COUNT: usize = 8;
const OCTAVE_SCALE: f64 = 1.2;
const BASE_KEYPOINT_SIZE: f64 = 31.;
// Depth up to which landmarks are detected on the finest octave.
const BASE_OCTAVE_DEPTH: f64 = 2.;

const BACKGROUND_NOISE: u8 = 24;
const BLOB_RADIUS: i32 = 1;

pub struct Simulation {
  rng: Xoshiro256PlusPlus,
  camera: PinholeCamera,
  width: usize,
  height: usize,
  keyframe_interval: usize,
  clutter_count: usize,
  // Index is the landmark id.
  world: Vec<Vector3d>,
  mapped: Vec<Option<Arc<Landmark>>>,
  keyframes: Vec<Keyframe>,
  next_keyframe_id: usize,
  frame_number: usize,
}

impl Simulation {
  pub fn new() -> Simulation {
    let p = PARAMETER_SET.lock().unwrap().clone();
    Simulation::from_parameters(&p)
  }

  pub fn from_parameters(p: &ParameterSet) -> Simulation {
    if p.keyframe_interval == 0 {
      warn!("Keyframe interval 0 is not possible, inserting a keyframe on every frame.");
    }
    let (width, height) = if p.image_width == 0 || p.image_height == 0 {
      let default = ParameterSet::default();
      warn!(
        "Image size {}x{} is empty, using {}x{}.",
        p.image_width, p.image_height, default.image_width, default.image_height,
      );
      (default.image_width, default.image_height)
    }
    else {
      (p.image_width, p.image_height)
    };
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(p.seed);
    let mut world = Vec::with_capacity(p.landmark_count);
    while world.len() < p.landmark_count {
      let x = rng.gen_range(-WORLD_HALF_WIDTH..WORLD_HALF_WIDTH);
      let y = rng.gen_range(-WORLD_HALF_WIDTH..WORLD_HALF_WIDTH);
      if x * x + y * y < CLEAR_RADIUS * CLEAR_RADIUS { continue }
      let z = rng.gen_range(WORLD_Z_RANGE[0]..WORLD_Z_RANGE[1]);
      world.push(Vector3d::new(x, y, z));
    }
    Simulation {
      rng,
      camera: PinholeCamera::with_fov(width, height, FIELD_OF_VIEW),
      width,
      height,
      keyframe_interval: p.keyframe_interval.max(1),
      clutter_count: p.clutter_count,
      mapped: vec![None; world.len()],
      world,
      keyframes: vec![],
      next_keyframe_id: 0,
      frame_number: 0,
    }
  }

  pub fn frame_number(&self) -> usize {
    self.frame_number
  }

  // Drops the map. Landmarks keep their ids when they are mapped again.
  pub fn reset(&mut self) {
    for landmark in self.mapped.iter_mut() {
      *landmark = None;
    }
    self.keyframes.clear();
  }

  // Camera-to-world pose, looking outwards from the orbit with world z up.
  pub fn camera_pose(&self, frame_number: usize) -> Isometry3d {
    let angle = ORBIT_RADIANS_PER_FRAME * frame_number as f64;
    let forward = Vector3d::new(angle.cos(), angle.sin(), 0.);
    let down = Vector3d::new(0., 0., -1.);
    let right = down.cross(&forward);
    let rotation = Rotation3::from_matrix_unchecked(Matrix3d::from_columns(&[right, down, forward]));
    Isometry3d::from_parts(
      Translation3::new(ORBIT_RADIUS * angle.cos(), ORBIT_RADIUS * angle.sin(), CAMERA_HEIGHT),
      UnitQuaternion::from_rotation_matrix(&rotation),
    )
  }

  pub fn step(&mut self, mapping_is_enabled: bool) -> (FrameSnapshot, MapSnapshot) {
    let pose = self.camera_pose(self.frame_number);
    let mut image = self.background();

    let mut observations = vec![];
    for (id, p) in self.world.iter().enumerate() {
      let p_camera = pose.inverse_transform_point(&Point3::from(*p));
      if p_camera.z < MIN_DEPTH { continue }
      let pixel = match self.camera.ray_to_pixel(&p_camera.coords) {
        Some(pixel) => pixel,
        None => continue,
      };
      if !self.inside(&pixel) { continue }
      observations.push((id, pixel, octave_for_depth(p_camera.z)));
    }

    if mapping_is_enabled && self.frame_number % self.keyframe_interval == 0 {
      self.keyframes.push(Keyframe { id: KeyframeId(self.next_keyframe_id), pose });
      self.next_keyframe_id += 1;
      for (id, _, _) in &observations {
        if self.mapped[*id].is_none() {
          self.mapped[*id] = Some(Arc::new(Landmark { id: LandmarkId(*id), position: self.world[*id] }));
        }
      }
    }

    let mut keypoints = vec![];
    let mut landmarks = vec![];
    for (id, pixel, octave) in observations {
      draw_blob(&mut image, &pixel);
      keypoints.push(keypoint(pixel, octave));
      landmarks.push(self.mapped[id].clone());
    }
    for _ in 0..self.clutter_count {
      let pixel = Vector2d::new(
        self.rng.gen_range(0. .. self.width as f64),
        self.rng.gen_range(0. .. self.height as f64),
      );
      let octave = self.rng.gen_range(0..OCTAVE_COUNT);
      draw_blob(&mut image, &pixel);
      keypoints.push(keypoint(pixel, octave));
      landmarks.push(None);
    }

    let frame = FrameSnapshot {
      image,
      keypoints,
      landmarks,
      mapping_is_enabled,
    };
    let map = MapSnapshot {
      keyframes: self.keyframes.clone(),
      landmarks: self.mapped.iter().flatten().cloned().collect(),
      current_pose: Some(pose),
    };
    self.frame_number += 1;
    (frame, map)
  }

  fn inside(&self, pixel: &Vector2d) -> bool {
    pixel[0] >= 0. && pixel[1] >= 0. && pixel[0] < self.width as f64 && pixel[1] < self.height as f64
  }

  // Vertical gradient with noise.
  fn background(&mut self) -> Image {
    let mut image = Image::new(self.width, self.height);
    for y in 0..self.height {
      let base = (40 + 60 * y / self.height) as u8;
      for x in 0..self.width {
        image.set_value(x, y, base + self.rng.gen_range(0..BACKGROUND_NOISE));
      }
    }
    image
  }
}

fn octave_for_depth(depth: f64) -> usize {
  if depth <= BASE_OCTAVE_DEPTH { return 0 }
  let octave = ((depth / BASE_OCTAVE_DEPTH).ln() / OCTAVE_SCALE.ln()).floor() as usize;
  octave.min(OCTAVE_COUNT - 1)
}

fn keypoint(point: Vector2d, octave: usize) -> Keypoint {
  Keypoint {
    point,
    size: BASE_KEYPOINT_SIZE * OCTAVE_SCALE.powi(octave as i32),
    octave,
  }
}

fn draw_blob(image: &mut Image, pixel: &Vector2d) {
  let center = from_f64(pixel);
  for dy in -BLOB_RADIUS..=BLOB_RADIUS {
    for dx in -BLOB_RADIUS..=BLOB_RADIUS {
      let (x, y) = (center[0] + dx, center[1] + dy);
      if x < 0 || y < 0 || x >= image.width as i32 || y >= image.height as i32 { continue }
      image.set_value(x as usize, y as usize, 255);
    }
  }
}

// Body of the pipeline thread. Runs until the system is asked to terminate, or
// until the configured number of frames is done, in which case it shuts the
// viewer down and waits for it.
pub fn run_pipeline(
  mut simulation: Simulation,
  control: Arc<SystemControl>,
  frame_publisher: Arc<SnapshotPublisher<FrameSnapshot>>,
  map_publisher: Arc<SnapshotPublisher<MapSnapshot>>,
  viewer: TerminateHandle,
) {
  let (frame_count, interval) = {
    let p = PARAMETER_SET.lock().unwrap();
    (p.frame_count, Duration::from_millis(p.frame_interval_ms))
  };
  info!("Pipeline started.");
  while !control.terminate_is_requested() {
    if control.take_reset_request() {
      info!("Resetting the map at frame {}.", simulation.frame_number());
      simulation.reset();
    }
    if !control.tracker_is_paused() {
      let (frame, map) = simulation.step(control.mapping_module_is_enabled());
      frame_publisher.publish(frame);
      map_publisher.publish(map);
      if frame_count > 0 && simulation.frame_number() >= frame_count {
        info!("All {} frames processed, closing the viewer.", frame_count);
        viewer.request_terminate();
        viewer.wait(interval);
        break;
      }
    }
    thread::sleep(interval);
  }
  info!("Pipeline stopped.");
}
