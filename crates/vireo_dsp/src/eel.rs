//! EEL VM Variables
//!
//! Liveprog scripts run inside an EEL virtual machine and expose named
//! variables. Only the in-process backend can enumerate or mutate them; the
//! remote parameter protocol has no channel for arbitrary introspection.

use serde::{Deserialize, Serialize};

/// A named variable exposed by a running liveprog script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EelVmVariable {
    /// Variable name as declared in the script
    pub name: String,

    /// Current value
    pub value: f32,

    /// Whether the VM treats this variable as a constant (mutation will be
    /// rejected)
    pub is_constant: bool,
}

impl EelVmVariable {
    pub fn new(name: impl Into<String>, value: f32) -> Self {
        Self {
            name: name.into(),
            value,
            is_constant: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variable_serialization() {
        let var = EelVmVariable::new("gain", 0.5);
        let json = serde_json::to_string(&var).unwrap();
        let back: EelVmVariable = serde_json::from_str(&json).unwrap();
        assert_eq!(var, back);
    }
}
