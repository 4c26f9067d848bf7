use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use common::PredictionStatus;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::generation::{self, GenerationOutcome};
use crate::models::emoji::EmojiResponse;
use crate::models::generate::*;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/api/v1/emojis/generate",
    tag = "Emojis",
    operation_id = "generateEmoji",
    summary = "Generate an emoji from a prompt",
    description = "Submits the prompt to the image-generation provider, waits for the result, \
        stores the image, and records the emoji. Costs one credit. If the provider is still \
        working after the polling budget, returns 202 with a prediction id to poll.",
    request_body = GenerateRequest,
    responses(
        (status = 201, description = "Emoji generated and stored", body = GenerateResponse),
        (status = 202, description = "Generation still running; poll the status endpoint", body = GenerateResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 402, description = "Credit balance exhausted (INSUFFICIENT_CREDITS)", body = ErrorBody),
        (status = 502, description = "Provider or storage failure (GENERATION_FAILED, INVALID_PROVIDER_OUTPUT, DOWNLOAD_FAILED, UPLOAD_FAILED, PUBLIC_URL_UNAVAILABLE)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = %auth_user.user_id))]
pub async fn generate_emoji(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<GenerateRequest>,
) -> Result<impl IntoResponse, AppError> {
    let prompt = validate_prompt(&payload.prompt)?.to_owned();

    match generation::run_generation(&state, &auth_user.user_id, &prompt).await? {
        GenerationOutcome::Succeeded(record) => Ok((
            StatusCode::CREATED,
            Json(GenerateResponse::Succeeded {
                emoji: EmojiResponse::from(record.emoji),
                credits_remaining: record.credits_remaining,
            }),
        )),
        GenerationOutcome::Pending { prediction_id } => Ok((
            StatusCode::ACCEPTED,
            Json(GenerateResponse::Pending { prediction_id }),
        )),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/emojis/generations/{prediction_id}",
    tag = "Emojis",
    operation_id = "getGenerationStatus",
    summary = "Check on a still-running generation",
    params(
        ("prediction_id" = String, Path, description = "Prediction id returned by a 202 response"),
    ),
    responses(
        (status = 200, description = "Current prediction status", body = GenerationStatusResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 502, description = "Provider returned unusable output (INVALID_PROVIDER_OUTPUT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_generation_status(
    _auth_user: AuthUser,
    State(state): State<AppState>,
    Path(prediction_id): Path<String>,
) -> Result<Json<GenerationStatusResponse>, AppError> {
    if prediction_id.trim().is_empty() {
        return Err(AppError::Validation("Prediction id must not be empty".into()));
    }

    let prediction = state.provider.get_prediction(&prediction_id).await?;

    let response = match prediction.status {
        PredictionStatus::Succeeded => {
            let url = prediction.first_output_url().ok_or_else(|| {
                AppError::InvalidProviderOutput("Provider returned no output URL".into())
            })?;
            GenerationStatusResponse {
                status: PredictionStatus::Succeeded,
                image_url: Some(url.to_owned()),
                error: None,
            }
        }
        PredictionStatus::Failed => GenerationStatusResponse {
            status: PredictionStatus::Failed,
            image_url: None,
            error: Some(
                prediction
                    .error
                    .unwrap_or_else(|| "Generation failed".into()),
            ),
        },
        status => GenerationStatusResponse {
            status,
            image_url: None,
            error: None,
        },
    };

    Ok(Json(response))
}
