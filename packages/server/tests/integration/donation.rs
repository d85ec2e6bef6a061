use serde_json::json;

use crate::common::{TestApp, TestOptions, donation_form, photo, raw_token, routes, token_for};

mod ownership {
    use super::*;

    #[tokio::test]
    async fn owner_is_taken_from_the_token_not_the_body() {
        let app = TestApp::spawn().await;
        let alice = token_for(1, false);

        let res = app
            .post_with_token(
                routes::DONATIONS,
                &json!({
                    "user_id": 2,
                    "title": "Sofa",
                    "description": "Three seats",
                    "category": "furniture",
                    "condition": "used",
                }),
                &alice,
            )
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["message"], "donation created successfully");
        assert_eq!(res.body["data"]["user_id"], 1);
        assert_eq!(res.body["data"]["status"], "pending");
        assert_eq!(res.body["data"]["photos"], json!([]));
    }

    #[tokio::test]
    async fn other_users_cannot_read_or_change_a_donation() {
        let app = TestApp::spawn().await;
        let alice = token_for(1, false);
        let bob = token_for(2, false);
        let id = app.create_donation(&alice, "Sofa").await;

        let read = app.get_with_token(&routes::donation(id), &bob).await;
        let patch = app
            .patch_with_token(&routes::donation(id), &json!({"title": "Mine"}), &bob)
            .await;
        let delete = app.delete_with_token(&routes::donation(id), &bob).await;

        for res in [read, patch, delete] {
            assert_eq!(res.status, 403, "{}", res.text);
            assert_eq!(res.body["code"], "PERMISSION_DENIED");
        }

        let still_there = app.get_with_token(&routes::donation(id), &alice).await;
        assert_eq!(still_there.status, 200);
        assert_eq!(still_there.body["data"]["title"], "Sofa");
    }

    #[tokio::test]
    async fn listing_is_scoped_to_the_caller_unless_admin() {
        let app = TestApp::spawn().await;
        let alice = token_for(1, false);
        let bob = token_for(2, false);
        app.create_donation(&alice, "Sofa").await;
        app.create_donation(&alice, "Lamp").await;
        app.create_donation(&bob, "Desk").await;

        let mine = app.get_with_token(routes::DONATIONS, &alice).await;
        assert_eq!(mine.status, 200);
        let titles: Vec<&str> = mine.body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|d| d["title"].as_str().unwrap())
            .collect();
        assert_eq!(titles.len(), 2);
        assert!(!titles.contains(&"Desk"));

        let all = app.get_with_token(routes::DONATIONS, &token_for(99, true)).await;
        assert_eq!(all.status, 200);
        assert_eq!(all.body["data"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn anonymous_callers_are_turned_away() {
        let app = TestApp::spawn().await;
        let id = app.create_donation(&token_for(1, false), "Sofa").await;

        let list = app.get_without_token(routes::DONATIONS).await;
        let read = app.get_without_token(&routes::donation(id)).await;
        let delete = app.delete_without_token(&routes::donation(id)).await;

        for res in [list, read, delete] {
            assert_eq!(res.status, 401, "{}", res.text);
            assert_eq!(res.body["code"], "TOKEN_MISSING");
        }
    }

    #[tokio::test]
    async fn garbage_token_on_an_optional_route_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app.get_with_token(routes::DONATIONS, "not-a-jwt").await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_INVALID");
    }

    #[tokio::test]
    async fn admin_token_without_user_id_may_read_but_not_mutate() {
        let app = TestApp::spawn().await;
        let id = app.create_donation(&token_for(1, false), "Sofa").await;
        let exp = chrono::Utc::now().timestamp() + 3600;
        let idless_admin = raw_token(json!({"sub": "root", "adm": true, "exp": exp}));

        let list = app.get_with_token(routes::DONATIONS, &idless_admin).await;
        assert_eq!(list.status, 200, "{}", list.text);
        assert_eq!(list.body["data"].as_array().unwrap().len(), 1);

        let read = app.get_with_token(&routes::donation(id), &idless_admin).await;
        assert_eq!(read.status, 200, "{}", read.text);

        let delete = app.delete_with_token(&routes::donation(id), &idless_admin).await;
        assert_eq!(delete.status, 401);
        assert_eq!(delete.body["code"], "TOKEN_INVALID");
    }

    #[tokio::test]
    async fn non_admin_token_without_user_id_sees_nothing() {
        let app = TestApp::spawn().await;
        let exp = chrono::Utc::now().timestamp() + 3600;
        let token = raw_token(json!({"sub": "ghost", "uid": "7", "exp": exp}));

        let res = app.get_with_token(routes::DONATIONS, &token).await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_MISSING");
    }

    #[tokio::test]
    async fn admin_may_edit_any_donation_but_owner_is_kept() {
        let app = TestApp::spawn().await;
        let id = app.create_donation(&token_for(1, false), "Sofa").await;

        let res = app
            .patch_with_token(
                &routes::donation(id),
                &json!({"status": "approved"}),
                &token_for(99, true),
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["data"]["status"], "approved");
        assert_eq!(res.body["data"]["user_id"], 1);
    }
}

mod updates {
    use super::*;

    #[tokio::test]
    async fn put_replaces_every_field_and_resets_blank_status() {
        let app = TestApp::spawn().await;
        let alice = token_for(1, false);
        let id = app.create_donation(&alice, "Sofa").await;
        app.patch_with_token(&routes::donation(id), &json!({"status": "approved"}), &alice)
            .await;

        let res = app
            .put_with_token(
                &routes::donation(id),
                &json!({
                    "title": "Armchair",
                    "description": "One seat",
                    "category": "furniture",
                    "condition": "new",
                    "photos": ["https://storage.test/x.jpg"],
                }),
                &alice,
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        let data = &res.body["data"];
        assert_eq!(data["title"], "Armchair");
        assert_eq!(data["condition"], "new");
        assert_eq!(data["status"], "pending");
        assert_eq!(data["photos"], json!(["https://storage.test/x.jpg"]));
    }

    #[tokio::test]
    async fn patch_touches_only_present_fields() {
        let app = TestApp::spawn().await;
        let alice = token_for(1, false);
        let id = app.create_donation(&alice, "Sofa").await;

        let res = app
            .patch_with_token(&routes::donation(id), &json!({"condition": "worn"}), &alice)
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["message"], "donation patched");
        assert_eq!(res.body["data"]["condition"], "worn");
        assert_eq!(res.body["data"]["title"], "Sofa");
        assert_eq!(res.body["data"]["description"], "Gently used");
    }

    #[tokio::test]
    async fn repeating_a_patch_gives_the_same_result() {
        let app = TestApp::spawn().await;
        let alice = token_for(1, false);
        let id = app.create_donation(&alice, "Sofa").await;
        let patch = json!({"title": "Sofa bed", "status": "approved"});

        let first = app.patch_with_token(&routes::donation(id), &patch, &alice).await;
        let second = app.patch_with_token(&routes::donation(id), &patch, &alice).await;

        assert_eq!(first.status, 200);
        assert_eq!(second.status, 200);
        for field in ["title", "description", "category", "condition", "status", "photos"] {
            assert_eq!(first.body["data"][field], second.body["data"][field]);
        }
    }

    #[tokio::test]
    async fn empty_patch_returns_the_donation_unchanged() {
        let app = TestApp::spawn().await;
        let alice = token_for(1, false);
        let id = app.create_donation(&alice, "Sofa").await;

        let res = app.patch_with_token(&routes::donation(id), &json!({}), &alice).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["data"]["title"], "Sofa");
    }

    #[tokio::test]
    async fn blank_status_patch_is_rejected() {
        let app = TestApp::spawn().await;
        let alice = token_for(1, false);
        let id = app.create_donation(&alice, "Sofa").await;

        let res = app
            .patch_with_token(&routes::donation(id), &json!({"status": "  "}), &alice)
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}

mod deletion {
    use super::*;

    #[tokio::test]
    async fn second_delete_reports_not_found() {
        let app = TestApp::spawn().await;
        let alice = token_for(1, false);
        let id = app.create_donation(&alice, "Sofa").await;

        let first = app.delete_with_token(&routes::donation(id), &alice).await;
        let second = app.delete_with_token(&routes::donation(id), &alice).await;

        assert_eq!(first.status, 204);
        assert!(first.text.is_empty());
        assert_eq!(second.status, 404);
        assert_eq!(second.body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn unknown_and_malformed_ids() {
        let app = TestApp::spawn().await;
        let alice = token_for(1, false);

        let missing = app.get_with_token(&routes::donation(4242), &alice).await;
        assert_eq!(missing.status, 404);

        let malformed = app.get_with_token("/api/v1/donations/abc", &alice).await;
        assert_eq!(malformed.status, 400);
        assert_eq!(malformed.body["code"], "VALIDATION_ERROR");
    }
}

mod multipart {
    use super::*;

    #[tokio::test]
    async fn photos_are_uploaded_in_order_alongside_text_fields() {
        let app = TestApp::spawn().await;
        let form = donation_form("Sofa")
            .part("photos", photo("front.jpg", b"front-bytes"))
            .part("photos", photo("back.jpg", b"back-bytes"))
            .text("status", "awaiting_pickup");

        let res = app
            .multipart_with_token(routes::DONATIONS, form, &token_for(1, false))
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        let data = &res.body["data"];
        assert_eq!(data["title"], "Sofa");
        assert_eq!(data["category"], "furniture");
        assert_eq!(data["status"], "awaiting_pickup");

        let photos = data["photos"].as_array().unwrap();
        assert_eq!(photos.len(), 2);
        assert!(photos[0].as_str().unwrap().ends_with("_front.jpg"));
        assert!(photos[1].as_str().unwrap().ends_with("_back.jpg"));

        let stored = app.uploader.stored();
        assert_eq!(stored.len(), 2);
        assert!(stored[0].name.starts_with("donations/"));
        assert_eq!(stored[0].bytes, b"front-bytes");
        assert_eq!(stored[0].content_type, "image/jpeg");
        assert_eq!(stored[1].bytes, b"back-bytes");
    }

    #[tokio::test]
    async fn unknown_fields_are_ignored() {
        let app = TestApp::spawn().await;
        let form = donation_form("Sofa").text("colour", "green");

        let res = app
            .multipart_with_token(routes::DONATIONS, form, &token_for(1, false))
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["data"]["status"], "pending");
    }

    #[tokio::test]
    async fn missing_required_field_is_a_validation_error() {
        let app = TestApp::spawn().await;
        let form = reqwest::multipart::Form::new()
            .text("title", "Sofa")
            .text("description", "Solid wood")
            .text("category", "furniture");

        let res = app
            .multipart_with_token(routes::DONATIONS, form, &token_for(1, false))
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
        assert!(res.body["message"].as_str().unwrap().contains("condition"));
    }

    #[tokio::test]
    async fn photos_without_storage_are_unavailable() {
        let app = TestApp::spawn_with(TestOptions {
            storage: false,
            ..Default::default()
        })
        .await;
        let form = donation_form("Sofa").part("photos", photo("front.jpg", b"bytes"));

        let res = app
            .multipart_with_token(routes::DONATIONS, form, &token_for(1, false))
            .await;

        assert_eq!(res.status, 503);
        assert_eq!(res.body["code"], "STORAGE_UNAVAILABLE");
    }

    #[tokio::test]
    async fn text_only_form_works_without_storage() {
        let app = TestApp::spawn_with(TestOptions {
            storage: false,
            ..Default::default()
        })
        .await;

        let res = app
            .multipart_with_token(routes::DONATIONS, donation_form("Sofa"), &token_for(1, false))
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
    }

    #[tokio::test]
    async fn failed_upload_aborts_without_creating_a_donation() {
        let app = TestApp::spawn().await;
        app.uploader.fail_on(2);
        let alice = token_for(1, false);
        let form = donation_form("Sofa")
            .part("photos", photo("front.jpg", b"front"))
            .part("photos", photo("back.jpg", b"back"));

        let res = app.multipart_with_token(routes::DONATIONS, form, &alice).await;

        assert_eq!(res.status, 500);
        assert_eq!(res.body["code"], "UPLOAD_FAILED");
        // The first photo stays in storage.
        assert_eq!(app.uploader.stored().len(), 1);

        let list = app.get_with_token(routes::DONATIONS, &alice).await;
        assert_eq!(list.body["data"], json!([]));
    }
}
