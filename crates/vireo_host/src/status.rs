//! Read-Only Status Parameters
//!
//! Numeric ids the engine exposes for liveness and buffer introspection.
//! All are read through `RemoteEffect::get_parameter_int`.

/// Number of parameter commits the engine has applied since creation.
/// Zero means no preset has been pushed yet.
pub const COMMITTED_PARAM_COUNT: u32 = 19998;

/// Current input buffer length in frames.
pub const BUFFER_LENGTH: u32 = 19999;

/// Allocated processing block length in frames.
pub const ALLOCATED_BLOCK_LENGTH: u32 = 20000;

/// Sample rate the engine derived from its host. Values <= 0 indicate a
/// crashed or misconfigured instance.
pub const SAMPLE_RATE: u32 = 20001;

/// Process id of the engine's host process. Values <= 0 indicate the
/// instance is dead or detached.
pub const PROCESS_ID: u32 = 20002;
