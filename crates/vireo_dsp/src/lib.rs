//! Vireo DSP - In-Process Native Engine Boundary
//!
//! This crate defines the handle-based call interface to the native DSP
//! library and the lifecycle machinery around it:
//! - The `NativeDsp` trait: every call the in-process backend can issue
//!   against an allocated processing context
//! - `HandleGuard`: sentinel-able handle ownership with in-flight call
//!   tracking, so the native resource is only freed once the last dispatched
//!   call has returned
//! - `DspCallbacks`: messages the native side reports back (VDC parse
//!   errors, liveprog script output and results)
//! - `StubDsp`: an in-memory implementation for tests and for hosts built
//!   without the native library
//!
//! The DSP algorithms themselves (filter math, convolution, compressor
//! curves) live behind `NativeDsp` and are out of scope here.

mod callbacks;
mod eel;
mod error;
mod handle;
mod native;
mod stub;

pub use callbacks::{DspCallbacks, DummyCallbacks};
pub use eel::EelVmVariable;
pub use error::DspError;
pub use handle::{ActiveCall, HandleGuard};
pub use native::{NativeDsp, RawHandle, NULL_HANDLE};
pub use stub::StubDsp;
