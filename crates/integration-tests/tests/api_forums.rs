use axum::http::StatusCode;
use domains::{DomainError, Forum, Thread, DEFAULT_LIMIT};
use integration_tests::{created_at, forum, get, jack, post_json, thread, Mocks};
use serde_json::json;

fn with_jack(mocks: &mut Mocks) {
    mocks
        .users
        .expect_find_by_nickname()
        .returning(|_| Ok(Some(jack())));
}

fn with_forum(mocks: &mut Mocks) {
    mocks
        .forums
        .expect_find_by_slug()
        .returning(|_| Ok(Some(forum())));
}

#[tokio::test]
async fn create_forum_stores_canonical_owner() {
    let mut mocks = Mocks::new();
    with_jack(&mut mocks);
    mocks
        .forums
        .expect_create()
        .withf(|new| new.user == "Jack" && new.slug == "pirates")
        .returning(|new| {
            Ok(Forum {
                slug: new.slug.clone(),
                title: new.title.clone(),
                user: new.user.clone(),
                threads: 0,
                posts: 0,
            })
        });

    let (status, body) = post_json(
        mocks.into_app(),
        "/api/forum/create",
        json!({ "slug": "pirates", "title": "Pirates", "user": "JACK" }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user"], "Jack");
    assert_eq!(body["threads"], 0);
}

#[tokio::test]
async fn duplicate_forum_answers_409_with_existing() {
    let mut mocks = Mocks::new();
    with_jack(&mut mocks);
    with_forum(&mut mocks);
    mocks
        .forums
        .expect_create()
        .returning(|_| Err(DomainError::Conflict("forums_pkey".into())));

    let (status, body) = post_json(
        mocks.into_app(),
        "/api/forum/create",
        json!({ "slug": "PIRATES", "title": "Other", "user": "jack" }),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body, serde_json::to_value(forum()).unwrap());
}

#[tokio::test]
async fn forum_for_unknown_owner_is_404() {
    let mut mocks = Mocks::new();
    mocks.users.expect_find_by_nickname().returning(|_| Ok(None));
    mocks.forums.expect_create().never();

    let (status, _) = post_json(
        mocks.into_app(),
        "/api/forum/create",
        json!({ "slug": "pirates", "title": "Pirates", "user": "ghost" }),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn create_thread_returns_201_and_omits_missing_slug() {
    let mut mocks = Mocks::new();
    with_jack(&mut mocks);
    with_forum(&mut mocks);
    mocks
        .threads
        .expect_create()
        .withf(|new| new.forum == "pirates" && new.author == "Jack" && new.slug.is_none())
        .returning(|_| {
            Ok(Thread {
                slug: None,
                ..thread()
            })
        });

    let (status, body) = post_json(
        mocks.into_app(),
        "/api/forum/Pirates/create",
        json!({ "title": "Davy Jones cache", "author": "jack", "message": "An urgent matter" }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], 42);
    assert!(body.get("slug").is_none());
}

#[tokio::test]
async fn thread_slug_clash_answers_409_with_existing() {
    let mut mocks = Mocks::new();
    with_jack(&mut mocks);
    with_forum(&mut mocks);
    mocks
        .threads
        .expect_create()
        .returning(|_| Err(DomainError::Conflict("threads_slug_key".into())));
    mocks.threads.expect_find().returning(|_| Ok(Some(thread())));

    let (status, body) = post_json(
        mocks.into_app(),
        "/api/forum/pirates/create",
        json!({ "title": "t", "author": "jack", "message": "m", "slug": "DAVY" }),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["slug"], "davy");
}

#[tokio::test]
async fn thread_listing_parses_pagination() {
    let mut mocks = Mocks::new();
    with_forum(&mut mocks);
    mocks
        .forums
        .expect_list_threads()
        .withf(|slug, query| {
            slug == "pirates" && query.limit == 2 && query.desc && query.since == Some(created_at())
        })
        .returning(|_, _| Ok(vec![thread()]));

    let (status, body) = get(
        mocks.into_app(),
        "/api/forum/pirates/threads?limit=2&desc=true&since=2024-05-01T12:00:00.000Z",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn bad_limit_is_400_before_any_lookup() {
    let mut mocks = Mocks::new();
    mocks.forums.expect_find_by_slug().never();
    mocks.forums.expect_list_threads().never();

    let (status, _) = get(mocks.into_app(), "/api/forum/pirates/threads?limit=many").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn forum_users_default_to_one_hundred() {
    let mut mocks = Mocks::new();
    with_forum(&mut mocks);
    mocks
        .forums
        .expect_list_users()
        .withf(|_, query| query.limit == DEFAULT_LIMIT && query.since.as_deref() == Some("a"))
        .returning(|_, _| Ok(vec![jack()]));

    let (status, body) = get(mocks.into_app(), "/api/forum/pirates/users?since=a").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["nickname"], "Jack");
}

#[tokio::test]
async fn missing_forum_details_is_404() {
    let mut mocks = Mocks::new();
    mocks.forums.expect_find_by_slug().returning(|_| Ok(None));

    let (status, body) = get(mocks.into_app(), "/api/forum/nowhere/details").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Can't find forum with slug: nowhere");
}
