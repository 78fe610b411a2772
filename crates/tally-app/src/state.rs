use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::status::AppStatus;

pub struct AppState {
    pub status: AppStatus,
    capture_running: AtomicBool,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            status: AppStatus::new(),
            capture_running: AtomicBool::new(false),
        }
    }

    pub fn capture_running(&self) -> bool {
        self.capture_running.load(Ordering::SeqCst)
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// Exclusive right to run a capture, released on drop
pub struct CaptureSlot {
    state: Arc<AppState>,
}

impl CaptureSlot {
    /// `None` while another capture is still in flight
    pub fn try_acquire(state: &Arc<AppState>) -> Option<Self> {
        if state.capture_running.swap(true, Ordering::SeqCst) {
            return None;
        }
        Some(Self {
            state: state.clone(),
        })
    }
}

impl Drop for CaptureSlot {
    fn drop(&mut self) {
        self.state.capture_running.store(false, Ordering::SeqCst);
    }
}
