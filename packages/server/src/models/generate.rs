use common::PredictionStatus;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

use super::emoji::EmojiResponse;

pub const MAX_PROMPT_LENGTH: usize = 256;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct GenerateRequest {
    /// Description of the emoji to generate.
    #[schema(example = "a happy avocado")]
    pub prompt: String,
}

/// Outcome of a generation request.
///
/// `succeeded` (201) carries the stored emoji; `pending` (202) means the
/// provider is still working and the client should poll the status endpoint.
#[derive(Serialize, utoipa::ToSchema)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GenerateResponse {
    Succeeded {
        emoji: EmojiResponse,
        credits_remaining: i32,
    },
    Pending {
        prediction_id: String,
    },
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct GenerationStatusResponse {
    pub status: PredictionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Returns the trimmed prompt, rejecting empty or oversized input.
pub fn validate_prompt(prompt: &str) -> Result<&str, AppError> {
    let trimmed = prompt.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation("Prompt must not be empty".into()));
    }
    if trimmed.chars().count() > MAX_PROMPT_LENGTH {
        return Err(AppError::Validation(format!(
            "Prompt must be 1-{MAX_PROMPT_LENGTH} characters"
        )));
    }
    Ok(trimmed)
}
