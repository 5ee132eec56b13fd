//! Native Boundary Error Types

use thiserror::Error;

/// Errors from the native DSP boundary
#[derive(Error, Debug)]
pub enum DspError {
    #[error("Failed to allocate native processing context: {0}")]
    AllocFailed(String),

    #[error("Native library not loaded: {0}")]
    LibraryUnavailable(String),

    #[error("Handle is closed")]
    HandleClosed,
}
