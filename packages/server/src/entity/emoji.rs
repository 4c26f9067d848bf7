use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "emoji")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Durable public URL of the stored image.
    pub image_url: String,
    /// User-supplied prompt, stored without the style suffix.
    pub prompt: String,
    /// Opaque id of the authenticated creator.
    pub creator_user_id: String,
    pub likes_count: i32,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
