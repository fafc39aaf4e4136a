use axum::http::{Method, StatusCode};
use domains::{DomainError, User};
use integration_tests::{get, jack, post_json, send, Mocks};
use serde_json::json;

#[tokio::test]
async fn create_user_takes_nickname_from_path() {
    let mut mocks = Mocks::new();
    mocks
        .users
        .expect_create()
        .withf(|user| user.nickname == "Jack" && user.email == "jack@sea.com")
        .returning(|_| Ok(()));

    let (status, body) = post_json(
        mocks.into_app(),
        "/api/user/Jack/create",
        json!({ "fullname": "Jack Sparrow", "email": "jack@sea.com", "about": "Captain" }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, serde_json::to_value(jack()).unwrap());
}

#[tokio::test]
async fn duplicate_user_answers_409_with_every_clash() {
    let mut mocks = Mocks::new();
    mocks
        .users
        .expect_create()
        .returning(|_| Err(DomainError::Conflict("users_pkey".into())));
    let other = User {
        nickname: "Will".into(),
        email: "will@sea.com".into(),
        ..jack()
    };
    let clashes = vec![jack(), other];
    let expected = serde_json::to_value(&clashes).unwrap();
    mocks
        .users
        .expect_find_conflicting()
        .withf(|nickname, email| nickname == "jack" && email == "will@sea.com")
        .return_once(move |_, _| Ok(clashes));

    let (status, body) = post_json(
        mocks.into_app(),
        "/api/user/jack/create",
        json!({ "fullname": "J", "email": "will@sea.com" }),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body, expected);
}

#[tokio::test]
async fn unknown_profile_is_404_with_message() {
    let mut mocks = Mocks::new();
    mocks.users.expect_find_by_nickname().returning(|_| Ok(None));

    let (status, body) = get(mocks.into_app(), "/api/user/ghost/profile").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Can't find user with nickname: ghost");
}

#[tokio::test]
async fn profile_update_keeps_omitted_fields() {
    let mut mocks = Mocks::new();
    mocks
        .users
        .expect_update()
        .withf(|nickname, patch| {
            nickname == "jack"
                && patch.about.as_deref() == Some("Pirate")
                && patch.fullname.is_none()
                && patch.email.is_none()
        })
        .returning(|_, _| {
            Ok(Some(User {
                about: "Pirate".into(),
                ..jack()
            }))
        });

    let (status, body) = post_json(
        mocks.into_app(),
        "/api/user/jack/profile",
        json!({ "about": "Pirate" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["about"], "Pirate");
    assert_eq!(body["fullname"], "Jack Sparrow");
}

#[tokio::test]
async fn profile_update_with_taken_email_is_409() {
    let mut mocks = Mocks::new();
    mocks
        .users
        .expect_update()
        .returning(|_, _| Err(DomainError::Conflict("users_email_key".into())));

    let (status, body) = post_json(
        mocks.into_app(),
        "/api/user/jack/profile",
        json!({ "email": "will@sea.com" }),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["message"].as_str().unwrap().contains("will@sea.com"));
}

#[tokio::test]
async fn malformed_json_is_400() {
    let mut mocks = Mocks::new();
    mocks.users.expect_create().never();

    let (status, body) = send(
        mocks.into_app(),
        Method::POST,
        "/api/user/jack/create",
        Some("{\"fullname\": ".into()),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].is_string());
}
