use anyhow::{Context, Result};

/// RAII guard for COM initialization
///
/// Calls CoUninitialize when dropped, so every OCR call on a blocking
/// thread leaves COM the way it found it.
pub struct ComGuard;

impl ComGuard {
    /// Initialize COM for the current thread
    pub fn initialize() -> Result<Self> {
        unsafe {
            windows::Win32::System::Com::CoInitializeEx(
                None,
                windows::Win32::System::Com::COINIT_MULTITHREADED,
            )
            .ok()
            .with_context(|| "Failed to initialize COM")?;
        }
        Ok(ComGuard)
    }
}

impl Drop for ComGuard {
    fn drop(&mut self) {
        unsafe {
            windows::Win32::System::Com::CoUninitialize();
        }
    }
}
