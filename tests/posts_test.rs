//! Post resource: authorship, validation, images and pagination.

mod common;

use common::{PIXEL_PNG, setup};
use poem::http::{Method, StatusCode};
use serde_json::json;

#[tokio::test]
async fn anonymous_list_is_an_empty_page() {
    let app = setup().await;

    let (status, body) = app.get("/api/v1/posts", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 0);
    assert_eq!(body["results"], json!([]));
    assert!(body["next"].is_null());
    assert!(body["previous"].is_null());
}

#[tokio::test]
async fn author_is_always_the_requester() {
    let app = setup().await;
    let alice = app.create_user("alice").await;
    app.create_user("bob").await;

    let (status, body) = app
        .post(
            "/api/v1/posts",
            Some(&alice),
            json!({ "text": "hello", "author": "bob" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["author"], "alice");
    assert_eq!(body["text"], "hello");
    assert!(body["image"].is_null());
    assert!(body["group"].is_null());

    let id = body["id"].as_i64().unwrap();
    let (status, body) = app.get(&format!("/api/v1/posts/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["author"], "alice");
}

#[tokio::test]
async fn anonymous_create_is_unauthenticated() {
    let app = setup().await;

    let (status, body) = app.post("/api/v1/posts", None, json!({ "text": "hi" })).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["detail"], "Authentication credentials were not provided.");
}

#[tokio::test]
async fn invalid_token_is_rejected_even_for_reads() {
    let app = setup().await;

    let resp = app
        .client
        .get("/api/v1/posts")
        .header("Authorization", "Bearer not-a-jwt")
        .send()
        .await;
    assert_eq!(resp.0.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn field_errors_are_reported_per_field() {
    let app = setup().await;
    let alice = app.create_user("alice").await;

    let (status, body) = app.post("/api/v1/posts", Some(&alice), json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "text": ["This field is required."] }));

    let (status, body) = app
        .post("/api/v1/posts", Some(&alice), json!({ "text": "   ", "group": 42 }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["text"], json!(["This field may not be blank."]));
    assert_eq!(body["group"], json!(["Invalid pk \"42\" - object does not exist."]));

    let (status, body) = app
        .post("/api/v1/posts", Some(&alice), json!({ "text": "x", "image": "bm90IGFuIGltYWdl" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["image"].is_array());
}

#[tokio::test]
async fn corrupt_image_is_rejected() {
    let app = setup().await;
    let alice = app.create_user("alice").await;

    // "\x89PNG\r\n\x1a\n" followed by text
    let corrupt = "iVBORw0KGgp0aGlzIGlzIG5vdCBpbWFnZSBkYXRhIGF0IGFsbA==";
    let (status, body) = app
        .post("/api/v1/posts", Some(&alice), json!({ "text": "x", "image": corrupt }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({ "image": ["Upload a valid image. The file you uploaded was either not an image or a corrupted image."] })
    );
}

#[tokio::test]
async fn unparsable_input_is_reported_as_json() {
    let app = setup().await;
    let alice = app.create_user("alice").await;

    let (status, body) = app
        .post("/api/v1/posts", Some(&alice), json!({ "text": "x", "group": "abc" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["non_field_errors"][0].is_string(), "{body}");

    let (status, body) = app.post_raw("/api/v1/posts", &alice, "{not json").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["non_field_errors"][0].is_string(), "{body}");

    let (status, body) = app.get("/api/v1/posts?limit=many", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["limit"][0].is_string(), "{body}");

    let (status, body) = app.get("/api/v1/posts/abc", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Not found.");

    let (status, _) = app.get("/api/v1/posts/abc/comments", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn group_and_image_are_stored() {
    let app = setup().await;
    let alice = app.create_user("alice").await;
    let group = app.create_group("Cats", "cats").await;

    let (status, body) = app
        .post(
            "/api/v1/posts",
            Some(&alice),
            json!({
                "text": "look",
                "group": group.id,
                "image": format!("data:image/png;base64,{PIXEL_PNG}"),
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["group"], group.id);

    let url = body["image"].as_str().unwrap().to_owned();
    assert!(url.starts_with("/media/posts/") && url.ends_with(".png"), "{url}");
    let relative = url.trim_start_matches("/media/");
    assert!(app.media.path().join(relative).exists());

    let resp = app.client.get(&url).send().await;
    assert_eq!(resp.0.status(), StatusCode::OK);

    // null clears the group, an omitted image is kept
    let id = body["id"].as_i64().unwrap();
    let (status, body) = app
        .call(
            Method::PATCH,
            &format!("/api/v1/posts/{id}"),
            Some(&alice),
            Some(json!({ "group": null })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["group"].is_null());
    assert_eq!(body["image"], url.as_str());
}

#[tokio::test]
async fn only_the_author_may_change_a_post() {
    let app = setup().await;
    let alice = app.create_user("alice").await;
    let bob = app.create_user("bob").await;
    let id = app.create_post(&alice, "original").await;
    let path = format!("/api/v1/posts/{id}");

    let (status, _) = app.get(&path, Some(&bob)).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.call(Method::HEAD, &path, Some(&bob), None).await;
    assert_eq!(status, StatusCode::OK);

    for (method, body) in [
        (Method::PUT, Some(json!({ "text": "hijacked" }))),
        (Method::PATCH, Some(json!({ "text": "hijacked" }))),
        (Method::DELETE, None),
    ] {
        let (status, body) = app.call(method, &path, Some(&bob), body).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["detail"], "You do not have permission to perform this action.");
    }

    let (status, _) = app
        .call(Method::PATCH, &path, None, Some(json!({ "text": "anon" })))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (_, body) = app.get(&path, None).await;
    assert_eq!(body["text"], "original");

    let (status, body) = app
        .call(Method::PUT, &path, Some(&alice), Some(json!({ "text": "edited" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["text"], "edited");

    let (status, body) = app.call(Method::PUT, &path, Some(&alice), Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["text"], json!(["This field is required."]));

    let (status, _) = app.call(Method::DELETE, &path, Some(&alice), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = app.get(&path, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Not found.");
}

#[tokio::test]
async fn limit_offset_pagination() {
    let app = setup().await;
    let alice = app.create_user("alice").await;
    for n in 0..3 {
        app.create_post(&alice, &format!("post {n}")).await;
    }

    let (status, body) = app.get("/api/v1/posts?limit=2", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 3);
    assert_eq!(body["results"].as_array().unwrap().len(), 2);
    assert_eq!(body["results"][0]["text"], "post 0");
    assert_eq!(body["next"], "/api/v1/posts?limit=2&offset=2");
    assert!(body["previous"].is_null());

    let (_, body) = app.get("/api/v1/posts?limit=2&offset=2", None).await;
    assert_eq!(body["results"].as_array().unwrap().len(), 1);
    assert_eq!(body["results"][0]["text"], "post 2");
    assert!(body["next"].is_null());
    assert_eq!(body["previous"], "/api/v1/posts?limit=2");

    let (_, body) = app.get("/api/v1/posts", None).await;
    assert_eq!(body["results"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn offsets_beyond_the_database_range_are_clamped() {
    let app = setup().await;
    let alice = app.create_user("alice").await;
    app.create_post(&alice, "only").await;

    let (status, body) = app
        .get("/api/v1/posts?offset=18446744073709551615&limit=18446744073709551615", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
    assert_eq!(body["results"], json!([]));
    assert!(body["next"].is_null());
}

#[tokio::test]
async fn trailing_slashes_are_accepted() {
    let app = setup().await;
    let alice = app.create_user("alice").await;
    let id = app.create_post(&alice, "slash").await;

    let (status, _) = app.get("/api/v1/posts/", None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = app.get(&format!("/api/v1/posts/{id}/"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["text"], "slash");
}
