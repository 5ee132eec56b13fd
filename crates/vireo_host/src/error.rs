//! Host Error Types

use thiserror::Error;

/// Errors from the out-of-process effect host
#[derive(Error, Debug)]
pub enum HostError {
    #[error("Failed to create effect for session {session_id}: {reason}")]
    CreateFailed { session_id: i32, reason: String },

    #[error("Parameter write rejected (id {id})")]
    WriteRejected { id: u32 },

    #[error("Effect instance detached or crashed")]
    Detached,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = HostError::CreateFailed {
            session_id: 5,
            reason: "service down".into(),
        };
        assert!(err.to_string().contains("session 5"));
        assert!(err.to_string().contains("service down"));

        let err = HostError::WriteRejected { id: 1203 };
        assert!(err.to_string().contains("1203"));
    }
}
