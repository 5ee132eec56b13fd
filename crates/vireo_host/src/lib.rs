//! Vireo Host - Out-of-Process Effect Boundary
//!
//! The out-of-process transport reaches the DSP engine only through a host
//! audio-effect service: effects are created against an audio session id and
//! priority, and configured through an untyped, numerically-addressed
//! parameter protocol. This crate defines that boundary:
//! - `EffectHost` / `RemoteEffect`: the trait seam the core engine talks to
//! - `codec`: the wire encodings for parameter payloads (scalar, float
//!   array, sub-keyed char buffer, sub-keyed impulse-response buffer)
//! - `status`: the read-only status parameter ids (pid, sample rate, ...)
//! - `StubHost`: an in-memory host that records every write, for tests
//!
//! Writes are fire-and-forget from the caller's perspective: the underlying
//! host call is synchronous and bounded, attempted exactly once, with no
//! timeout or retry added here.

pub mod codec;
mod error;
pub mod status;
mod stub;
mod traits;

pub use error::HostError;
pub use stub::{StubHost, WriteRecord};
pub use traits::{EffectHost, RemoteEffect};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crate_exports() {
        let host = StubHost::new();
        let effect = host.create_effect(0, 0).unwrap();
        assert!(effect.token() > 0);
    }
}
