use serde_json::json;

use crate::common::{TestApp, routes, token_for};

async fn finalize(app: &TestApp, donation_id: i64, notes: &str) -> crate::common::TestResponse {
    app.post_with_token(
        routes::FINAL_DONATIONS,
        &json!({"donation_id": donation_id, "notes": notes}),
        &token_for(99, true),
    )
    .await
}

#[tokio::test]
async fn finalizing_marks_the_donation_verified() {
    let app = TestApp::spawn().await;
    let alice = token_for(1, false);
    let id = app.create_donation(&alice, "Sofa").await;

    let res = finalize(&app, id, "Delivered to the shelter").await;

    assert_eq!(res.status, 201, "{}", res.text);
    assert_eq!(res.body["message"], "donation finalized");
    assert_eq!(res.body["data"]["donation_id"], id);
    assert_eq!(res.body["data"]["notes"], "Delivered to the shelter");

    let donation = app.get_with_token(&routes::donation(id), &alice).await;
    assert_eq!(donation.body["data"]["status"], "verified_for_donation");
}

#[tokio::test]
async fn only_admins_may_finalize_or_list_everything() {
    let app = TestApp::spawn().await;
    let alice = token_for(1, false);
    let id = app.create_donation(&alice, "Sofa").await;

    let create = app
        .post_with_token(routes::FINAL_DONATIONS, &json!({"donation_id": id}), &alice)
        .await;
    let list = app.get_with_token(routes::FINAL_DONATIONS, &alice).await;
    let by_user = app
        .get_with_token(&routes::user_final_donations(1), &alice)
        .await;

    for res in [create, list, by_user] {
        assert_eq!(res.status, 403, "{}", res.text);
        assert_eq!(res.body["code"], "PERMISSION_DENIED");
    }
}

#[tokio::test]
async fn unknown_donation_cannot_be_finalized() {
    let app = TestApp::spawn().await;

    let res = finalize(&app, 4242, "").await;

    assert_eq!(res.status, 404);
    assert_eq!(res.body["code"], "NOT_FOUND");

    let list = app
        .get_with_token(routes::FINAL_DONATIONS, &token_for(99, true))
        .await;
    assert_eq!(list.body["data"], json!([]));
}

#[tokio::test]
async fn listings_only_include_donations_still_verified() {
    let app = TestApp::spawn().await;
    let alice = token_for(1, false);
    let bob = token_for(2, false);
    let admin = token_for(99, true);
    let sofa = app.create_donation(&alice, "Sofa").await;
    let lamp = app.create_donation(&alice, "Lamp").await;
    let desk = app.create_donation(&bob, "Desk").await;
    for id in [sofa, lamp, desk] {
        assert_eq!(finalize(&app, id, "").await.status, 201);
    }

    // Moving a donation out of the verified state hides its record.
    app.patch_with_token(&routes::donation(lamp), &json!({"status": "returned"}), &admin)
        .await;

    let all = app.get_with_token(routes::FINAL_DONATIONS, &admin).await;
    let ids: Vec<i64> = all.body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["donation_id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![sofa, desk]);

    let alices = app
        .get_with_token(&routes::user_final_donations(1), &admin)
        .await;
    assert_eq!(alices.status, 200);
    assert_eq!(alices.body["data"].as_array().unwrap().len(), 1);
    assert_eq!(alices.body["data"][0]["donation_id"], sofa);

    let bobs = app.get_with_token(routes::MY_FINAL_DONATIONS, &bob).await;
    assert_eq!(bobs.status, 200);
    assert_eq!(bobs.body["data"].as_array().unwrap().len(), 1);
    assert_eq!(bobs.body["data"][0]["donation_id"], desk);
}

#[tokio::test]
async fn my_list_requires_a_token() {
    let app = TestApp::spawn().await;

    let res = app.get_without_token(routes::MY_FINAL_DONATIONS).await;

    assert_eq!(res.status, 401);
    assert_eq!(res.body["code"], "TOKEN_MISSING");
}
