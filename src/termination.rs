// Termination protocol between the render loop and whoever owns it.
//
// This is a polling design: nothing is notified when the loop stops. Callers that
// need to wait for termination poll `is_terminated()` at their own cadence, so the
// join is only as precise as that cadence plus one render loop interval.

use crate::all::*;

use std::sync::PoisonError;

struct TerminationState {
  requested: bool,
  terminated: bool,
}

pub struct Termination {
  state: Mutex<TerminationState>,
}

impl Termination {
  // A loop that has not been started counts as terminated.
  pub fn new() -> Termination {
    Termination {
      state: Mutex::new(TerminationState {
        requested: false,
        terminated: true,
      }),
    }
  }

  // Never blocks beyond the flag update and never fails.
  pub fn request_terminate(&self) {
    self.lock().requested = true;
  }

  pub fn terminate_is_requested(&self) -> bool {
    self.lock().requested
  }

  // Last act of the loop, once per `start()`.
  pub fn terminate(&self) {
    let mut state = self.lock();
    debug_assert!(!state.terminated, "Terminated without being started.");
    state.terminated = true;
  }

  pub fn is_terminated(&self) -> bool {
    self.lock().terminated
  }

  // First act of the loop. A request made before the start is kept.
  pub(crate) fn start(&self) {
    self.lock().terminated = false;
  }

  fn lock(&self) -> MutexGuard<TerminationState> {
    // The critical sections only touch two flags, a panic cannot leave them inconsistent.
    self.state.lock().unwrap_or_else(PoisonError::into_inner)
  }
}

// Cloneable access to a viewer's termination from other threads.
#[derive(Clone)]
pub struct TerminateHandle {
  termination: Arc<Termination>,
}

impl TerminateHandle {
  pub(crate) fn new(termination: Arc<Termination>) -> TerminateHandle {
    TerminateHandle { termination }
  }

  // Does not wait for the loop to stop, poll `is_terminated()` for that.
  pub fn request_terminate(&self) {
    self.termination.request_terminate();
  }

  pub fn is_terminated(&self) -> bool {
    self.termination.is_terminated()
  }

  // Poll until terminated.
  pub fn wait(&self, poll_interval: Duration) {
    while !self.is_terminated() {
      thread::sleep(poll_interval);
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_lifecycle() {
    let t = Termination::new();
    assert!(t.is_terminated());
    assert!(!t.terminate_is_requested());
    t.start();
    assert!(!t.is_terminated());
    t.request_terminate();
    t.request_terminate();
    assert!(t.terminate_is_requested());
    assert!(!t.is_terminated());
    t.terminate();
    assert!(t.is_terminated());
  }

  #[test]
  #[should_panic]
  fn test_terminate_twice() {
    let t = Termination::new();
    t.start();
    t.terminate();
    t.terminate();
  }

  #[test]
  fn test_request_before_start_survives() {
    let t = Termination::new();
    t.request_terminate();
    t.start();
    assert!(t.terminate_is_requested());
    assert!(!t.is_terminated());
  }

  #[test]
  fn test_concurrent_requests() {
    let handle = TerminateHandle::new(Arc::new(Termination::new()));
    handle.termination.start();
    let threads: Vec<_> = (0..8).map(|_| {
      let handle = handle.clone();
      thread::spawn(move || {
        for _ in 0..1000 {
          handle.request_terminate();
          let _ = handle.is_terminated();
        }
      })
    }).collect();
    for t in threads {
      t.join().unwrap();
    }
    assert!(handle.termination.terminate_is_requested());
    assert!(!handle.is_terminated());
  }
}
