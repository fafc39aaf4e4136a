use axum::http::StatusCode;
use domains::{DomainError, SortMode, Thread, ThreadRef, WRONG_PARENT};
use integration_tests::{get, jack, post, post_json, thread, Mocks};
use serde_json::{json, Value};
use services::TreeStrategy;

fn with_thread(mocks: &mut Mocks) {
    mocks.threads.expect_find().returning(|_| Ok(Some(thread())));
}

fn ids(body: &Value) -> Vec<i64> {
    body.as_array()
        .unwrap()
        .iter()
        .map(|post| post["id"].as_i64().unwrap())
        .collect()
}

#[tokio::test]
async fn numeric_segment_is_an_id_and_text_a_slug() {
    let mut mocks = Mocks::new();
    mocks
        .threads
        .expect_find()
        .withf(|r| *r == ThreadRef::ById(42))
        .times(1)
        .returning(|_| Ok(Some(thread())));
    mocks
        .threads
        .expect_find()
        .withf(|r| *r == ThreadRef::BySlug("davy".into()))
        .times(1)
        .returning(|_| Ok(Some(thread())));
    let app = mocks.into_app();

    let (by_id, _) = get(app.clone(), "/api/thread/42/details").await;
    let (by_slug, body) = get(app, "/api/thread/davy/details").await;

    assert_eq!(by_id, StatusCode::OK);
    assert_eq!(by_slug, StatusCode::OK);
    assert_eq!(body["forum"], "pirates");
}

#[tokio::test]
async fn missing_thread_is_404() {
    let mut mocks = Mocks::new();
    mocks.threads.expect_find().returning(|_| Ok(None));

    let (status, body) = get(mocks.into_app(), "/api/thread/nope/details").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Can't find thread by slug or id: nope");
}

#[tokio::test]
async fn post_batch_is_created_with_201() {
    let mut mocks = Mocks::new();
    with_thread(&mut mocks);
    mocks
        .posts
        .expect_create_batch()
        .withf(|thread, posts| thread.id == 42 && posts.len() == 2 && posts[1].parent == 1)
        .returning(|_, _| Ok(vec![post(1, 0), post(2, 1)]));

    let (status, body) = post_json(
        mocks.into_app(),
        "/api/thread/davy/create",
        json!([
            { "author": "jack", "message": "first" },
            { "author": "jack", "message": "reply", "parent": 1 }
        ]),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(ids(&body), vec![1, 2]);
    assert_eq!(body[1]["isEdited"], false);
}

#[tokio::test]
async fn empty_batch_returns_empty_list() {
    let mut mocks = Mocks::new();
    with_thread(&mut mocks);
    mocks.posts.expect_create_batch().never();

    let (status, body) = post_json(mocks.into_app(), "/api/thread/42/create", json!([])).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn foreign_parent_is_409() {
    let mut mocks = Mocks::new();
    with_thread(&mut mocks);
    mocks
        .posts
        .expect_create_batch()
        .returning(|_, _| Err(DomainError::Conflict(WRONG_PARENT.into())));

    let (status, body) = post_json(
        mocks.into_app(),
        "/api/thread/42/create",
        json!([{ "author": "jack", "message": "m", "parent": 999 }]),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], WRONG_PARENT);
}

#[tokio::test]
async fn vote_returns_the_updated_thread() {
    let mut mocks = Mocks::new();
    with_thread(&mut mocks);
    mocks
        .users
        .expect_find_by_nickname()
        .returning(|_| Ok(Some(jack())));
    mocks
        .threads
        .expect_vote()
        .withf(|id, vote| *id == 42 && vote.nickname == "Jack" && vote.voice == -1)
        .returning(|_, _| Ok(Thread { votes: -1, ..thread() }));

    let (status, body) = post_json(
        mocks.into_app(),
        "/api/thread/42/vote",
        json!({ "nickname": "JACK", "voice": -1 }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["votes"], -1);
}

#[tokio::test]
async fn vote_outside_plus_minus_one_is_400() {
    let mut mocks = Mocks::new();
    mocks.threads.expect_vote().never();

    let (status, _) = post_json(
        mocks.into_app(),
        "/api/thread/42/vote",
        json!({ "nickname": "jack", "voice": 2 }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn thread_update_falls_back_to_stored_message() {
    let mut mocks = Mocks::new();
    with_thread(&mut mocks);
    mocks
        .threads
        .expect_update()
        .withf(|id, title, message| *id == 42 && title == "New title" && message == "An urgent matter")
        .returning(|_, title, _| {
            Ok(Thread {
                title: title.to_string(),
                ..thread()
            })
        });

    let (status, body) = post_json(
        mocks.into_app(),
        "/api/thread/davy/details",
        json!({ "title": "New title" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "New title");
}

#[tokio::test]
async fn database_strategy_passes_the_parsed_query() {
    let mut mocks = Mocks::new();
    with_thread(&mut mocks);
    mocks.posts.expect_list_by_thread().never();
    mocks
        .posts
        .expect_list_sorted()
        .withf(|id, query| {
            *id == 42
                && query.limit == 3
                && query.since == Some(4)
                && query.sort == SortMode::ParentTree
                && query.desc
        })
        .returning(|_, _| Ok(vec![post(5, 0)]));

    let (status, body) = get(
        mocks.into_app(),
        "/api/thread/42/posts?limit=3&since=4&sort=parent_tree&desc=true",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), vec![5]);
}

#[tokio::test]
async fn in_process_strategy_orders_the_tree() {
    let mut mocks = Mocks::new();
    with_thread(&mut mocks);
    mocks.posts.expect_list_sorted().never();
    mocks
        .posts
        .expect_list_by_thread()
        .returning(|_| Ok(vec![post(1, 0), post(2, 1), post(3, 1), post(4, 2)]));
    let app = mocks.into_app_with(TreeStrategy::InProcess);

    let (_, tree) = get(app.clone(), "/api/thread/42/posts?sort=tree").await;
    let (_, page) = get(app.clone(), "/api/thread/42/posts?sort=parent_tree&limit=1").await;
    let (_, flat) = get(app, "/api/thread/42/posts?desc=true&limit=2").await;

    assert_eq!(ids(&tree), vec![1, 2, 4, 3]);
    assert_eq!(ids(&page), vec![1, 2, 4, 3]);
    assert_eq!(ids(&flat), vec![4, 3]);
}

#[tokio::test]
async fn unparsable_since_is_400() {
    let mut mocks = Mocks::new();
    mocks.posts.expect_list_sorted().never();

    let (status, _) = get(mocks.into_app(), "/api/thread/42/posts?since=yesterday").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}
