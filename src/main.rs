mod all;
mod backend;
mod camera;
mod config;
mod draw;
mod frame;
mod frame_renderer;
mod image;
mod map;
mod map_renderer;
mod parameters;
mod publisher;
mod scene;
mod selection;
mod simulation;
mod system;
mod termination;
mod types;
mod util;
mod viewer;
mod window_backend;

use all::*;

#[macro_use] extern crate lazy_static;
use clap::Parser;

use window_backend::WindowBackend;

#[derive(Parser)]
struct Args {
  // JSON file with a "viewer" section.
  #[clap(short, long)]
  config: Option<String>,
  #[clap(long, default_value = "info")]
  log_level: LevelFilter,
  #[clap(flatten)]
  parameters: ParameterSet,
}

fn handle_error(err: &anyhow::Error) {
  for (i, e) in err.chain().enumerate() {
    println!("  {}: {}", i + 1, e);
  }
}

fn main() {
  if let Err(err) = run() {
    handle_error(&err);
  }
}

fn run() -> Result<()> {
  let args = Args::parse();
  env_logger::Builder::new()
    .filter_level(args.log_level)
    .format(util::format_log)
    .init();
  *PARAMETER_SET.lock().unwrap() = args.parameters;

  let config = match &args.config {
    Some(path) => ViewerConfig::load(Path::new(path))?,
    None => ViewerConfig::default(),
  };
  // winit wants its event loop on the main thread, which then becomes the render thread.
  let mut backend = WindowBackend::new(&config)?;

  let control = Arc::new(SystemControl::new());
  let frame_publisher = Arc::new(SnapshotPublisher::new(FrameSnapshot::empty()));
  let map_publisher = Arc::new(SnapshotPublisher::new(MapSnapshot::empty()));
  let mut viewer = Viewer::new(
    &config,
    control.clone(),
    frame_publisher.clone(),
    map_publisher.clone(),
  );

  let pipeline = {
    let simulation = Simulation::new();
    let control = control.clone();
    let viewer = viewer.terminate_handle();
    thread::Builder::new()
      .name("pipeline".to_string())
      .spawn(move || run_pipeline(simulation, control, frame_publisher, map_publisher, viewer))
      .context("Failed to start the pipeline thread.")?
  };

  let result = viewer.run(&mut backend);
  control.request_terminate();
  if pipeline.join().is_err() {
    bail!("Pipeline thread panicked.");
  }
  result
}
