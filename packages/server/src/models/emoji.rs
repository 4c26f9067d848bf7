use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::entity::emoji;

#[derive(Serialize, utoipa::ToSchema)]
pub struct EmojiResponse {
    pub id: i32,
    pub image_url: String,
    pub prompt: String,
    pub creator_user_id: String,
    pub likes_count: i32,
    pub created_at: DateTime<Utc>,
}

impl From<emoji::Model> for EmojiResponse {
    fn from(model: emoji::Model) -> Self {
        Self {
            id: model.id,
            image_url: model.image_url,
            prompt: model.prompt,
            creator_user_id: model.creator_user_id,
            likes_count: model.likes_count,
            created_at: model.created_at,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct EmojiListResponse {
    pub emojis: Vec<EmojiResponse>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct LikeResponse {
    pub id: i32,
    pub likes_count: i32,
}
