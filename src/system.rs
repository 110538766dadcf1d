use crate::all::*;

use std::sync::atomic::{AtomicBool, Ordering};

// Controls of the SLAM pipeline the viewer is allowed to touch. Commands take
// effect asynchronously, the pipeline picks them up on its own schedule.
pub trait System: Send + Sync {
  fn pause_tracker(&self);
  fn resume_tracker(&self);
  fn tracker_is_paused(&self) -> bool;
  fn enable_mapping_module(&self);
  fn disable_mapping_module(&self);
  fn mapping_module_is_enabled(&self) -> bool;
  fn request_reset(&self);
  fn request_terminate(&self);
}

// Flag block shared between the pipeline thread and its controllers.
pub struct SystemControl {
  paused: AtomicBool,
  mapping_enabled: AtomicBool,
  reset_requested: AtomicBool,
  terminate_requested: AtomicBool,
}

impl SystemControl {
  pub fn new() -> SystemControl {
    SystemControl {
      paused: AtomicBool::new(false),
      mapping_enabled: AtomicBool::new(true),
      reset_requested: AtomicBool::new(false),
      terminate_requested: AtomicBool::new(false),
    }
  }

  // Returns true at most once per request.
  pub fn take_reset_request(&self) -> bool {
    self.reset_requested.swap(false, Ordering::AcqRel)
  }

  pub fn terminate_is_requested(&self) -> bool {
    self.terminate_requested.load(Ordering::Acquire)
  }
}

impl System for SystemControl {
  fn pause_tracker(&self) {
    if !self.paused.swap(true, Ordering::AcqRel) {
      info!("Pausing the tracker.");
    }
  }

  fn resume_tracker(&self) {
    if self.paused.swap(false, Ordering::AcqRel) {
      info!("Resuming the tracker.");
    }
  }

  fn tracker_is_paused(&self) -> bool {
    self.paused.load(Ordering::Acquire)
  }

  fn enable_mapping_module(&self) {
    if !self.mapping_enabled.swap(true, Ordering::AcqRel) {
      info!("Mapping module enabled.");
    }
  }

  fn disable_mapping_module(&self) {
    if self.mapping_enabled.swap(false, Ordering::AcqRel) {
      info!("Mapping module disabled, localization only.");
    }
  }

  fn mapping_module_is_enabled(&self) -> bool {
    self.mapping_enabled.load(Ordering::Acquire)
  }

  fn request_reset(&self) {
    self.reset_requested.store(true, Ordering::Release);
  }

  fn request_terminate(&self) {
    self.terminate_requested.store(true, Ordering::Release);
  }
}
