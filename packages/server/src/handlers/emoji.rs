use axum::Json;
use axum::extract::{Path, State};
use sea_orm::sea_query::Expr;
use sea_orm::*;
use tracing::instrument;

use crate::entity::emoji;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::models::emoji::{EmojiListResponse, EmojiResponse, LikeResponse};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/v1/emojis",
    tag = "Emojis",
    operation_id = "listEmojis",
    summary = "List all emojis, newest first",
    responses(
        (status = 200, description = "All emojis", body = EmojiListResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user))]
pub async fn list_emojis(
    _auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<EmojiListResponse>, AppError> {
    let emojis = emoji::Entity::find()
        .order_by_desc(emoji::Column::CreatedAt)
        .all(&state.db)
        .await?;

    Ok(Json(EmojiListResponse {
        emojis: emojis.into_iter().map(EmojiResponse::from).collect(),
    }))
}

/// Bump the like counter in one statement and return the updated row.
async fn increment_likes<C: ConnectionTrait>(db: &C, id: i32) -> Result<emoji::Model, AppError> {
    let result = emoji::Entity::update_many()
        .col_expr(
            emoji::Column::LikesCount,
            Expr::col(emoji::Column::LikesCount).add(1),
        )
        .filter(emoji::Column::Id.eq(id))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound("Emoji not found".into()));
    }

    emoji::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Emoji not found".into()))
}

#[utoipa::path(
    post,
    path = "/api/v1/emojis/{id}/like",
    tag = "Emojis",
    operation_id = "likeEmoji",
    summary = "Like an emoji",
    params(
        ("id" = i32, Path, description = "Emoji id"),
    ),
    responses(
        (status = 200, description = "Updated like count", body = LikeResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "No such emoji (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user), fields(id))]
pub async fn like_emoji(
    _auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<LikeResponse>, AppError> {
    let updated = increment_likes(&state.db, id).await?;

    Ok(Json(LikeResponse {
        id: updated.id,
        likes_count: updated.likes_count,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn emoji_row(id: i32, likes_count: i32) -> emoji::Model {
        emoji::Model {
            id,
            image_url: "https://cdn.test/emojis/user-1/1.png".to_owned(),
            prompt: "a happy avocado".to_owned(),
            creator_user_id: "user-1".to_owned(),
            likes_count,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn like_increments_and_returns_the_row() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .append_query_results([vec![emoji_row(3, 8)]])
            .into_connection();

        let updated = increment_likes(&db, 3).await.unwrap();

        assert_eq!(updated.id, 3);
        assert_eq!(updated.likes_count, 8);
    }

    #[tokio::test]
    async fn liking_a_missing_emoji_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        let result = increment_likes(&db, 999).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
