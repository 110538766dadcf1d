// NOTE This kind of import-all file isn't a common Rust idiom.

pub use crate::{
  backend::*,
  camera::*,
  config::*,
  draw::*,
  frame::*,
  frame_renderer::*,
  image::*,
  map::*,
  map_renderer::*,
  parameters::*,
  publisher::*,
  selection::*,
  simulation::*,
  system::*,
  termination::*,
  types::*,
  viewer::*,
};

pub use {
  std::{
    path::Path,
    sync::{Arc, Mutex, MutexGuard},
    thread,
    time::Duration,
  },
  log::{debug, info, warn, LevelFilter},
  nalgebra::{Point3, Rotation3, Translation3, UnitQuaternion},
  anyhow::{anyhow, bail, Context as AnyhowContext, Result},
};
