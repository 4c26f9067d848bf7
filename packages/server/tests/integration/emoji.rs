use sea_orm::EntityTrait;
use serde_json::json;

use server::entity::emoji;

use crate::common::{TestApp, routes};

#[tokio::test]
async fn generated_emoji_reads_back_identically() {
    let app = TestApp::spawn().await;
    let token = app.token_for("user-1");

    let res = app
        .post_with_token(routes::GENERATE, &json!({"prompt": "a happy avocado"}), &token)
        .await;
    assert_eq!(res.status, 201, "generate failed: {}", res.text);
    assert_eq!(res.body["status"], "succeeded");
    assert_eq!(res.body["credits_remaining"], 1);

    let id = res.body["emoji"]["id"].as_i64().expect("emoji id") as i32;
    let stored = emoji::Entity::find_by_id(id)
        .one(&app.db)
        .await
        .expect("DB query failed")
        .expect("Emoji row not found after generation");

    assert_eq!(stored.prompt, "a happy avocado");
    assert_eq!(stored.creator_user_id, "user-1");
    assert_eq!(
        stored.image_url,
        res.body["emoji"]["image_url"].as_str().expect("image_url")
    );
    assert_eq!(stored.likes_count, 0);
}

#[tokio::test]
async fn like_increments_through_the_api() {
    let app = TestApp::spawn().await;
    let token = app.token_for("user-2");

    let res = app
        .post_with_token(routes::GENERATE, &json!({"prompt": "a dancing taco"}), &token)
        .await;
    assert_eq!(res.status, 201, "generate failed: {}", res.text);
    let id = res.body["emoji"]["id"].as_i64().expect("emoji id") as i32;

    let liked = app.post_with_token(&routes::like(id), &json!({}), &token).await;
    assert_eq!(liked.status, 200, "like failed: {}", liked.text);
    assert_eq!(liked.body["likes_count"], 1);

    let liked_again = app.post_with_token(&routes::like(id), &json!({}), &token).await;
    assert_eq!(liked_again.body["likes_count"], 2);

    let stored = emoji::Entity::find_by_id(id)
        .one(&app.db)
        .await
        .expect("DB query failed")
        .expect("Emoji row not found after likes");
    assert_eq!(stored.likes_count, 2);
}

#[tokio::test]
async fn gallery_requires_a_token() {
    let app = TestApp::spawn().await;

    let anon = app.get_without_token(routes::EMOJIS).await;
    assert_eq!(anon.status, 401);
    assert_eq!(anon.body["code"], "TOKEN_MISSING");

    let token = app.token_for("user-3");
    let listed = app.get_with_token(routes::EMOJIS, &token).await;
    assert_eq!(listed.status, 200, "list failed: {}", listed.text);
    assert!(listed.body["emojis"].is_array());
}
