use std::sync::Arc;
use std::time::SystemTime;
use tokio::sync::RwLock;

/// Capture status information
#[derive(Clone, Debug, Default)]
pub struct CaptureStats {
    pub last_capture_time: Option<SystemTime>,
    pub capture_count: u64,
    pub error_count: u64,
    /// Captures refused because one was already running
    pub rejected_count: u64,
}

/// Application status
pub struct AppStatus {
    pub capture: Arc<RwLock<CaptureStats>>,
}

impl AppStatus {
    pub fn new() -> Self {
        Self {
            capture: Arc::new(RwLock::new(CaptureStats::default())),
        }
    }
}

impl Default for AppStatus {
    fn default() -> Self {
        Self::new()
    }
}
