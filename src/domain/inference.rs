use serde::{Deserialize, Serialize};

/// Server-side inference switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InferenceConfig {
    #[serde(default)]
    pub use_local_inference: bool,
    #[serde(default)]
    pub local_inference_fallback: bool,
}

/// Partial update; unset fields are left unchanged by the server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct InferenceConfigUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_local_inference: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_inference_fallback: Option<bool>,
}

impl InferenceConfigUpdate {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.use_local_inference.is_none() && self.local_inference_fallback.is_none()
    }
}
