use serde_json::json;

use crate::common::{TestApp, routes, token_for};

#[tokio::test]
async fn dashboard_counts_every_entity() {
    let app = TestApp::spawn().await;
    let admin = token_for(99, true);
    let alice = token_for(1, false);
    app.create_donation(&alice, "Sofa").await;
    app.create_donation(&alice, "Lamp").await;
    app.post_with_token(
        routes::ARTICLES,
        &json!({"title": "News", "content": "Body"}),
        &admin,
    )
    .await;
    app.post_with_token(routes::PAYMENTS, &json!({"amount": 1000}), &alice)
        .await;

    let res = app.get_with_token(routes::DASHBOARD, &admin).await;

    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(res.body["message"], "dashboard fetched");
    assert_eq!(res.body["data"]["total_donation"], 2);
    assert_eq!(res.body["data"]["total_article"], 1);
    assert_eq!(res.body["data"]["total_payment"], 1);
}

#[tokio::test]
async fn dashboard_is_admin_only() {
    let app = TestApp::spawn().await;

    let anonymous = app.get_without_token(routes::DASHBOARD).await;
    let user = app
        .get_with_token(routes::DASHBOARD, &token_for(1, false))
        .await;

    assert_eq!(anonymous.status, 401);
    assert_eq!(user.status, 403);
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = TestApp::spawn().await;

    let res = app.get_without_token(routes::OPENAPI).await;

    assert_eq!(res.status, 200);
    let paths = res.body["paths"].as_object().unwrap();
    assert!(paths.keys().any(|p| p.starts_with("/api/v1/donations")));
    assert!(paths.keys().any(|p| p.starts_with("/api/v1/payments")));
    assert!(res.body["components"]["securitySchemes"]["jwt"].is_object());
}
