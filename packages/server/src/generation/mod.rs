//! The generation workflow: credit check, provider submission, backoff
//! polling, asset persistence, and record write.

use std::time::Duration;

use chrono::Utc;
use common::{BackoffPolicy, PredictionStatus, retry_fixed};
use sea_orm::sea_query::Expr;
use sea_orm::*;
use tracing::{info, warn};

use crate::download::ImageSource;
use crate::entity::{emoji, profile};
use crate::error::AppError;
use crate::provider::{GenerationProvider, Prediction};
use crate::state::AppState;
use crate::storage::AssetStore;
use crate::utils::object_key;

/// Appended to every prompt before submission; never stored.
pub const STYLE_SUFFIX: &str = "emoji style, simple background";

/// Polling schedule: 1s, 1.5s, 2.25s, ... capped at 4s, at most 15 checks.
pub const POLL_POLICY: BackoffPolicy = BackoffPolicy {
    base_delay: Duration::from_millis(1000),
    growth_factor: 1.5,
    max_delay: Duration::from_millis(4000),
    max_checks: 15,
};

/// Download and upload are each retried this many times.
pub const TRANSFER_ATTEMPTS: u32 = 3;
pub const TRANSFER_PAUSE: Duration = Duration::from_secs(1);

/// Check the caller's credit balance and submit the prompt to the provider.
///
/// A user without a profile gets one created with the starting balance, and
/// their first generation proceeds against that grant.
pub async fn submit_job<C: ConnectionTrait>(
    db: &C,
    provider: &dyn GenerationProvider,
    user_id: &str,
    prompt: &str,
    starting_balance: i32,
) -> Result<Prediction, AppError> {
    let existing = profile::Entity::find()
        .filter(profile::Column::UserId.eq(user_id))
        .one(db)
        .await?;

    match existing {
        Some(profile) if profile.credits < 1 => return Err(AppError::InsufficientCredits),
        Some(_) => {}
        None => {
            let now = Utc::now();
            profile::ActiveModel {
                user_id: Set(user_id.to_owned()),
                credits: Set(starting_balance),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            }
            .insert(db)
            .await?;
            info!(user_id, "created profile with starting balance");
        }
    }

    let styled = format!("{}, {}", prompt, STYLE_SUFFIX);
    Ok(provider.create_prediction(&styled).await?)
}

/// Result of polling a prediction up to the policy's check limit.
#[derive(Debug)]
pub enum PollOutcome {
    Succeeded { output_url: String },
    /// Still running after the last check. The client keeps the handle and
    /// polls the status endpoint.
    Pending { prediction_id: String },
}

/// Re-check the prediction until it reaches a terminal status or the check
/// budget runs out, sleeping per the policy before each check.
pub async fn poll_until_terminal(
    provider: &dyn GenerationProvider,
    initial: Prediction,
    policy: &BackoffPolicy,
) -> Result<PollOutcome, AppError> {
    let mut prediction = initial;
    let mut checks = 0;
    while !prediction.status.is_terminal() && checks < policy.max_checks {
        checks += 1;
        tokio::time::sleep(policy.delay_for(checks)).await;
        prediction = provider.get_prediction(&prediction.id).await?;
    }

    match prediction.status {
        PredictionStatus::Succeeded => {
            let url = prediction.first_output_url().ok_or_else(|| {
                AppError::InvalidProviderOutput("Provider returned no output URL".into())
            })?;
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(AppError::InvalidProviderOutput(format!(
                    "Unusable output URL: {url}"
                )));
            }
            Ok(PollOutcome::Succeeded {
                output_url: url.to_owned(),
            })
        }
        PredictionStatus::Failed => Err(AppError::GenerationFailed(
            prediction
                .error
                .unwrap_or_else(|| "Generation failed".into()),
        )),
        _ => Ok(PollOutcome::Pending {
            prediction_id: prediction.id,
        }),
    }
}

/// Move the generated image from the provider's ephemeral URL into the
/// bucket and return its durable public URL.
pub async fn persist_asset(
    source: &dyn ImageSource,
    store: &dyn AssetStore,
    output_url: &str,
    key: &str,
    max_object_size: u64,
) -> Result<String, AppError> {
    store
        .ensure_bucket()
        .await
        .map_err(|e| AppError::UploadFailed(e.to_string()))?;

    let bytes = retry_fixed(TRANSFER_ATTEMPTS, TRANSFER_PAUSE, |_| {
        source.fetch(output_url)
    })
    .await
    .map_err(|e| AppError::DownloadFailed(e.to_string()))?;

    if bytes.len() as u64 > max_object_size {
        return Err(AppError::UploadFailed(format!(
            "Image is {} bytes, over the {} byte limit",
            bytes.len(),
            max_object_size
        )));
    }

    retry_fixed(TRANSFER_ATTEMPTS, TRANSFER_PAUSE, |_| {
        store.put_object(key, &bytes, "image/png")
    })
    .await
    .map_err(|e| AppError::UploadFailed(e.to_string()))?;

    store
        .public_url(key)
        .map_err(|_| AppError::PublicUrlUnavailable)
}

pub struct WrittenRecord {
    pub emoji: emoji::Model,
    pub credits_remaining: i32,
}

/// Insert the emoji row, then spend one credit.
///
/// The decrement is conditional so a concurrent spender cannot push the
/// balance below zero. The image is already stored at this point, so a
/// failed decrement is logged rather than surfaced.
pub async fn write_record<C: ConnectionTrait>(
    db: &C,
    user_id: &str,
    prompt: &str,
    image_url: &str,
) -> Result<WrittenRecord, AppError> {
    let now = Utc::now();
    let emoji = emoji::ActiveModel {
        image_url: Set(image_url.to_owned()),
        prompt: Set(prompt.to_owned()),
        creator_user_id: Set(user_id.to_owned()),
        likes_count: Set(0),
        created_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(|e| AppError::RecordWriteFailed(e.to_string()))?;

    let decrement = profile::Entity::update_many()
        .col_expr(
            profile::Column::Credits,
            Expr::col(profile::Column::Credits).sub(1),
        )
        .col_expr(profile::Column::UpdatedAt, Expr::value(now))
        .filter(profile::Column::UserId.eq(user_id))
        .filter(profile::Column::Credits.gte(1))
        .exec(db)
        .await;
    match decrement {
        Ok(result) if result.rows_affected == 0 => {
            warn!(user_id, "credit decrement matched no rows");
        }
        Ok(_) => {}
        Err(err) => warn!(user_id, "credit decrement failed: {err}"),
    }

    let credits_remaining = match profile::Entity::find()
        .filter(profile::Column::UserId.eq(user_id))
        .one(db)
        .await
    {
        Ok(Some(profile)) => profile.credits,
        Ok(None) => 0,
        Err(err) => {
            warn!(user_id, "balance read failed: {err}");
            0
        }
    };

    Ok(WrittenRecord {
        emoji,
        credits_remaining,
    })
}

pub enum GenerationOutcome {
    Succeeded(WrittenRecord),
    Pending { prediction_id: String },
}

/// The full workflow for one generation request. The stored prompt is the
/// user's original; the style suffix only goes to the provider.
pub async fn run_generation(
    state: &AppState,
    user_id: &str,
    prompt: &str,
) -> Result<GenerationOutcome, AppError> {
    let initial = submit_job(
        &state.db,
        state.provider.as_ref(),
        user_id,
        prompt,
        state.config.credits.starting_balance,
    )
    .await?;

    match poll_until_terminal(state.provider.as_ref(), initial, &POLL_POLICY).await? {
        PollOutcome::Pending { prediction_id } => {
            info!(%prediction_id, "generation still running, handing back");
            Ok(GenerationOutcome::Pending { prediction_id })
        }
        PollOutcome::Succeeded { output_url } => {
            let key = object_key::derive(user_id, Utc::now());
            let image_url = persist_asset(
                state.source.as_ref(),
                state.assets.as_ref(),
                &output_url,
                &key,
                state.config.storage.max_object_size,
            )
            .await?;
            let record = write_record(&state.db, user_id, prompt, &image_url).await?;
            Ok(GenerationOutcome::Succeeded(record))
        }
    }
}
