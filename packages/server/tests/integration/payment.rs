use std::sync::atomic::Ordering;

use donation_server::entity::payment;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use serde_json::json;

use crate::common::{TestApp, TestOptions, routes, token_for};

async fn stored(app: &TestApp, order_id: &str) -> payment::Model {
    payment::Entity::find()
        .filter(payment::Column::OrderId.eq(order_id))
        .one(&app.db)
        .await
        .unwrap()
        .expect("payment row should exist")
}

#[tokio::test]
async fn creating_a_payment_returns_the_checkout_link() {
    let app = TestApp::spawn().await;

    let res = app
        .post_with_token(
            routes::PAYMENTS,
            &json!({"amount": 150000, "auction_item_id": 3}),
            &token_for(1, false),
        )
        .await;

    assert_eq!(res.status, 201, "{}", res.text);
    assert_eq!(res.body["message"], "payment created");
    let order_id = res.body["data"]["order_id"].as_str().unwrap().to_string();
    assert!(order_id.starts_with("YDR-"));
    assert_eq!(
        res.body["data"]["payment_link_url"],
        format!("https://pay.test/{order_id}")
    );

    let orders = app.gateway.orders.lock().unwrap().clone();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].amount, 150000);
    assert_eq!(orders[0].customer, "user1");

    let row = stored(&app, &order_id).await;
    assert_eq!(row.user_id, 1);
    assert_eq!(row.status, "pending");
    assert_eq!(row.auction_item_id, Some(3));
    assert_eq!(row.transaction_id.as_deref(), Some(format!("tok-{order_id}").as_str()));
}

#[tokio::test]
async fn non_positive_amount_is_rejected() {
    let app = TestApp::spawn().await;

    let res = app
        .post_with_token(routes::PAYMENTS, &json!({"amount": 0}), &token_for(1, false))
        .await;

    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");
    assert!(app.gateway.orders.lock().unwrap().is_empty());
}

#[tokio::test]
async fn gateway_failure_is_a_bad_gateway() {
    let app = TestApp::spawn().await;
    app.gateway.fail.store(true, Ordering::SeqCst);

    let res = app
        .post_with_token(routes::PAYMENTS, &json!({"amount": 5000}), &token_for(1, false))
        .await;

    assert_eq!(res.status, 502);
    assert_eq!(res.body["code"], "GATEWAY_ERROR");
}

#[tokio::test]
async fn payments_without_a_gateway_are_unavailable() {
    let app = TestApp::spawn_with(TestOptions {
        payments: false,
        ..Default::default()
    })
    .await;

    let res = app
        .post_with_token(routes::PAYMENTS, &json!({"amount": 5000}), &token_for(1, false))
        .await;

    assert_eq!(res.status, 503);
    assert_eq!(res.body["code"], "GATEWAY_UNAVAILABLE");
}

#[tokio::test]
async fn status_refresh_is_stored_and_limited_to_payer_or_admin() {
    let app = TestApp::spawn().await;
    let payer = token_for(1, false);
    let created = app
        .post_with_token(routes::PAYMENTS, &json!({"amount": 5000}), &payer)
        .await;
    let order_id = created.body["data"]["order_id"].as_str().unwrap().to_string();

    let stranger = app
        .get_with_token(&routes::payment_status(&order_id), &token_for(2, false))
        .await;
    assert_eq!(stranger.status, 403);
    assert_eq!(stranger.body["code"], "PERMISSION_DENIED");

    let own = app
        .get_with_token(&routes::payment_status(&order_id), &payer)
        .await;
    assert_eq!(own.status, 200, "{}", own.text);
    assert_eq!(own.body["data"]["status"], "settlement");
    assert_eq!(own.body["data"]["amount"], 5000);
    assert_eq!(own.body["data"]["transaction_id"], format!("trx-{order_id}"));

    *app.gateway.status.lock().unwrap() = "expire".to_string();
    let admin = app
        .get_with_token(&routes::payment_status(&order_id), &token_for(99, true))
        .await;
    assert_eq!(admin.status, 200);
    assert_eq!(admin.body["data"]["status"], "expire");
    assert_eq!(stored(&app, &order_id).await.status, "expire");
}

#[tokio::test]
async fn unknown_order_is_not_found() {
    let app = TestApp::spawn().await;

    let res = app
        .get_with_token(&routes::payment_status("YDR-1"), &token_for(1, false))
        .await;

    assert_eq!(res.status, 404);
    assert_eq!(res.body["code"], "NOT_FOUND");
}
