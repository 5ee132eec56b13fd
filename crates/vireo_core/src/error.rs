//! Engine Error Types

use thiserror::Error;
use vireo_dsp::DspError;
use vireo_host::HostError;

/// Errors that can occur constructing or driving an engine backend
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Failed to construct engine backend: {0}")]
    Construction(#[from] HostError),

    #[error("Native DSP error: {0}")]
    Dsp(#[from] DspError),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("Channel send error - receiver dropped")]
    ChannelSendError,
}

/// Result type alias for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

/// Why a configuration setter failed.
///
/// Setters never throw and never silently drop: every delivery problem maps
/// to one of these kinds so callers can tell recoverable conditions
/// (rejected write) from fatal ones (instance gone).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SetterError {
    /// The remote transport rejected the parameter write.
    #[error("Protocol write rejected (parameter id {id})")]
    WriteRejected { id: u32 },

    /// The native engine reported failure for the call.
    #[error("Native call rejected: {call}")]
    NativeRejected { call: &'static str },

    /// The operation does not exist on this backend.
    #[error("Operation not supported on this backend: {0}")]
    Unsupported(&'static str),

    /// The backend has been closed or its instance is gone.
    #[error("Engine instance unavailable")]
    InstanceUnavailable,
}

/// Result type alias for configuration setters
pub type SetterResult = Result<(), SetterError>;

impl From<HostError> for SetterError {
    fn from(err: HostError) -> Self {
        match err {
            HostError::WriteRejected { id } => SetterError::WriteRejected { id },
            HostError::Detached | HostError::CreateFailed { .. } => {
                SetterError::InstanceUnavailable
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SetterError::WriteRejected { id: 1205 };
        assert!(err.to_string().contains("1205"));

        let err = SetterError::Unsupported("custom crossfeed");
        assert!(err.to_string().contains("custom crossfeed"));
    }

    #[test]
    fn test_host_error_conversion() {
        let err: SetterError = HostError::WriteRejected { id: 128 }.into();
        assert_eq!(err, SetterError::WriteRejected { id: 128 });

        let err: SetterError = HostError::Detached.into();
        assert_eq!(err, SetterError::InstanceUnavailable);
    }

    #[test]
    fn test_construction_error_from_host() {
        let err: EngineError = HostError::CreateFailed {
            session_id: 1,
            reason: "gone".into(),
        }
        .into();
        assert!(matches!(err, EngineError::Construction(_)));
    }
}
