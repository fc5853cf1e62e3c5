//! Core data types shared by the CLI and the web API.

use serde::{Deserialize, Serialize};

/// Final caption text after tone, emoji and hashtag application.
pub type StyledCaption = String;

/// Outcome of a generation attempt on a loaded model.
///
/// Serializes as `{"status": "success", "captions": [...]}` or
/// `{"status": "error", "message": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum GenerateOutcome {
    Success { captions: Vec<StyledCaption> },
    Error { message: String },
}

/// Body of a `/generate` response.
///
/// When the model never loaded, the body is `{"error": "..."}` instead of an
/// outcome; clients tell the two apart by the presence of `status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GenerateResponse {
    Outcome(GenerateOutcome),
    Unavailable { error: String },
}

impl GenerateResponse {
    /// Message used when the model failed to initialize.
    pub const MODEL_NOT_LOADED: &'static str = "Model not loaded properly.";

    pub fn success(captions: Vec<StyledCaption>) -> Self {
        Self::Outcome(GenerateOutcome::Success { captions })
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Outcome(GenerateOutcome::Error {
            message: message.into(),
        })
    }

    pub fn model_unavailable() -> Self {
        Self::Unavailable {
            error: Self::MODEL_NOT_LOADED.to_string(),
        }
    }
}
