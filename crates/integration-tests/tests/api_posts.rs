use axum::http::StatusCode;
use domains::Post;
use integration_tests::{forum, get, jack, post, post_json, Mocks};
use serde_json::json;

#[tokio::test]
async fn details_attach_only_requested_relations() {
    let mut mocks = Mocks::new();
    mocks.posts.expect_find().returning(|id| Ok(Some(post(id, 0))));
    mocks
        .users
        .expect_find_by_nickname()
        .returning(|_| Ok(Some(jack())));
    mocks
        .forums
        .expect_find_by_slug()
        .returning(|_| Ok(Some(forum())));
    mocks.threads.expect_find().never();

    let (status, body) = get(mocks.into_app(), "/api/post/7/details?related=user,forum").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["post"]["id"], 7);
    assert_eq!(body["author"]["nickname"], "Jack");
    assert_eq!(body["forum"]["slug"], "pirates");
    assert!(body.get("thread").is_none());
}

#[tokio::test]
async fn details_without_related_is_just_the_post() {
    let mut mocks = Mocks::new();
    mocks.posts.expect_find().returning(|id| Ok(Some(post(id, 0))));

    let (status, body) = get(mocks.into_app(), "/api/post/7/details").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "post": serde_json::to_value(post(7, 0)).unwrap() }));
}

#[tokio::test]
async fn missing_post_is_404() {
    let mut mocks = Mocks::new();
    mocks.posts.expect_find().returning(|_| Ok(None));

    let (status, body) = get(mocks.into_app(), "/api/post/7/details").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Can't find post with id: 7");
}

#[tokio::test]
async fn non_numeric_post_id_is_400() {
    let mut mocks = Mocks::new();
    mocks.posts.expect_find().never();

    let (status, _) = get(mocks.into_app(), "/api/post/seven/details").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn same_message_leaves_post_unedited() {
    let mut mocks = Mocks::new();
    mocks.posts.expect_find().returning(|id| Ok(Some(post(id, 0))));
    mocks.posts.expect_update_message().never();

    let (status, body) = post_json(
        mocks.into_app(),
        "/api/post/7/details",
        json!({ "message": "post 7" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["isEdited"], false);
}

#[tokio::test]
async fn new_message_marks_post_edited() {
    let mut mocks = Mocks::new();
    mocks.posts.expect_find().returning(|id| Ok(Some(post(id, 0))));
    mocks
        .posts
        .expect_update_message()
        .withf(|id, message| *id == 7 && message == "fixed")
        .returning(|id, message| {
            Ok(Some(Post {
                message: message.to_string(),
                is_edited: true,
                ..post(id, 0)
            }))
        });

    let (status, body) = post_json(
        mocks.into_app(),
        "/api/post/7/details",
        json!({ "message": "fixed" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "fixed");
    assert_eq!(body["isEdited"], true);
}
