/// Activation or release of a named action, sent to the arbiter.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ActionRequest {
    /// Correlation key, equal to the name of the node issuing the request
    pub name: String,
    /// `true` claims the action, `false` releases it
    pub is_required: bool,
}

impl ActionRequest {
    pub fn require(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_required: true,
        }
    }

    pub fn release(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_required: false,
        }
    }
}

/// Acknowledgment. Only its arrival carries information.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ActionResponse {}
