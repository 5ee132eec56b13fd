//! Effect Host Traits
//!
//! Defines the interface every effect-host implementation must provide.
//! A production implementation wraps the operating system's audio-effect
//! service; `StubHost` provides an in-memory one for tests.

use crate::error::HostError;

/// Factory for session-scoped effect instances.
pub trait EffectHost: Send + Sync {
    /// Name of this host (e.g. "AudioEffect", "Stub")
    fn name(&self) -> &'static str;

    /// Create an effect instance bound to an audio session.
    ///
    /// Creation failure is terminal for the caller's current attempt; there
    /// is no retry at this layer.
    fn create_effect(
        &self,
        session_id: i32,
        priority: i32,
    ) -> Result<Box<dyn RemoteEffect>, HostError>;
}

/// One live out-of-process effect instance.
///
/// Instances are replaced wholesale on crash recovery, never repaired in
/// place; dropping an instance releases it on the host side.
pub trait RemoteEffect: Send {
    /// Identity token, unique per created instance. Recovery produces an
    /// instance with a different token.
    fn token(&self) -> u64;

    /// The audio session this instance is bound to.
    fn session_id(&self) -> i32;

    /// Mute/unmute processing on the remote side.
    fn set_enabled(&mut self, enabled: bool) -> Result<(), HostError>;

    fn is_enabled(&self) -> bool;

    /// Write an encoded payload to a numeric parameter id. Attempted exactly
    /// once; rejection surfaces as `HostError::WriteRejected`.
    fn set_parameter(&mut self, id: u32, payload: &[u8]) -> Result<(), HostError>;

    /// Read an integer-valued parameter. `None` when the instance cannot
    /// answer (crashed or detached).
    fn get_parameter_int(&self, id: u32) -> Option<i32>;
}
