use serde_json::json;

use crate::common::{TestApp, routes, token_for};

fn article(title: &str) -> serde_json::Value {
    json!({
        "title": title,
        "content": "Thanks to everyone who donated.",
        "image_url": "https://storage.test/cover.jpg",
    })
}

#[tokio::test]
async fn admin_publishes_and_anyone_reads() {
    let app = TestApp::spawn().await;
    let admin = token_for(99, true);

    let created = app
        .post_with_token(routes::ARTICLES, &article("Winter drive"), &admin)
        .await;
    assert_eq!(created.status, 201, "{}", created.text);
    assert_eq!(created.body["message"], "article created");
    let id = created.id();

    let fetched = app.get_without_token(&routes::article(id)).await;
    assert_eq!(fetched.status, 200);
    assert_eq!(fetched.body["data"]["title"], "Winter drive");
    assert_eq!(fetched.body["data"]["image_url"], "https://storage.test/cover.jpg");
}

#[tokio::test]
async fn listing_is_newest_first() {
    let app = TestApp::spawn().await;
    let admin = token_for(99, true);
    for title in ["First", "Second", "Third"] {
        app.post_with_token(routes::ARTICLES, &article(title), &admin)
            .await;
    }

    let res = app.get_without_token(routes::ARTICLES).await;

    assert_eq!(res.status, 200);
    let titles: Vec<&str> = res.body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Third", "Second", "First"]);
}

#[tokio::test]
async fn regular_users_cannot_write() {
    let app = TestApp::spawn().await;
    let user = token_for(1, false);

    let res = app
        .post_with_token(routes::ARTICLES, &article("Nope"), &user)
        .await;

    assert_eq!(res.status, 403);
    assert_eq!(res.body["code"], "PERMISSION_DENIED");
}

#[tokio::test]
async fn update_replaces_content_and_blank_image_clears_it() {
    let app = TestApp::spawn().await;
    let admin = token_for(99, true);
    let id = app
        .post_with_token(routes::ARTICLES, &article("Draft"), &admin)
        .await
        .id();

    let res = app
        .put_with_token(
            &routes::article(id),
            &json!({"title": "Final", "content": "Updated body", "image_url": "  "}),
            &admin,
        )
        .await;

    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(res.body["data"]["title"], "Final");
    assert_eq!(res.body["data"]["content"], "Updated body");
    assert!(res.body["data"]["image_url"].is_null());
}

#[tokio::test]
async fn blank_content_is_rejected() {
    let app = TestApp::spawn().await;

    let res = app
        .post_with_token(
            routes::ARTICLES,
            &json!({"title": "Empty", "content": "   "}),
            &token_for(99, true),
        )
        .await;

    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn delete_then_lookup_is_not_found() {
    let app = TestApp::spawn().await;
    let admin = token_for(99, true);
    let id = app
        .post_with_token(routes::ARTICLES, &article("Gone soon"), &admin)
        .await
        .id();

    let first = app.delete_with_token(&routes::article(id), &admin).await;
    let second = app.delete_with_token(&routes::article(id), &admin).await;
    let fetched = app.get_without_token(&routes::article(id)).await;

    assert_eq!(first.status, 204);
    assert_eq!(second.status, 404);
    assert_eq!(fetched.status, 404);
}
