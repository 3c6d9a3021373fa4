//! Feed controller flows over a mock API.


use feed_client::ClientError;
use feed_client::feed::{FeedController, FeedState};
use fixtures::{client_for, post_json, signed_in};
use serde_json::json;
use wiremock::matchers::{any, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

async fn server_with_feed() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/posts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            post_json(1, "one", json!([])),
            post_json(2, "two", json!(null)),
        ])))
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn test_load_populates_feed() {
    let server = server_with_feed().await;
    let client = client_for(&server.uri(), signed_in());

    let mut feed = FeedController::new();
    assert_eq!(feed.state(), &FeedState::Loading);
    feed.load(&client).await.unwrap();

    assert_eq!(feed.state(), &FeedState::Ready);
    assert_eq!(feed.posts().len(), 2);
}

#[tokio::test]
async fn test_load_failure_then_retry() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/posts"))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({"message": "maintenance"})))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/posts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([post_json(1, "one", json!([]))])))
        .mount(&server)
        .await;

    let client = client_for(&server.uri(), signed_in());
    let mut feed = FeedController::new();

    let err = feed.load(&client).await.unwrap_err();
    assert_eq!(err.to_string(), "maintenance");
    assert_eq!(feed.state(), &FeedState::Error("maintenance".to_string()));

    assert!(feed.retry());
    feed.load(&client).await.unwrap();
    assert_eq!(feed.state(), &FeedState::Ready);
    assert_eq!(feed.posts().len(), 1);
}

#[tokio::test]
async fn test_created_post_lands_at_head_normalized() {
    let server = server_with_feed().await;
    Mock::given(method("POST"))
        .and(path("/posts"))
        .respond_with(ResponseTemplate::new(201).set_body_json(
            json!({"id": 5, "content": "hello", "created_at": null, "comments": null}),
        ))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server.uri(), signed_in());
    let mut feed = FeedController::new();
    feed.load(&client).await.unwrap();

    let created = feed.create_post(&client, "  hello ").await.unwrap();
    assert_eq!(created.id, 5);
    assert!(created.created_at.is_some());
    assert!(created.comments.is_empty());

    let ids: Vec<_> = feed.posts().iter().map(|post| post.id).collect();
    assert_eq!(ids, vec![5, 1, 2]);
}

#[tokio::test]
async fn test_blank_post_is_rejected_without_request() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server.uri(), signed_in());
    let mut feed = FeedController::new();
    let err = feed.create_post(&client, "   ").await.unwrap_err();

    assert!(matches!(err, ClientError::Validation(_)));
    assert!(feed.posts().is_empty());
}

#[tokio::test]
async fn test_comment_round_trip_replaces_post() {
    let server = server_with_feed().await;
    // Echo the submitted post back with a server-assigned comment id.
    Mock::given(method("PUT"))
        .and(path("/posts/2"))
        .respond_with(|request: &Request| {
            let mut post: serde_json::Value = request.body_json().unwrap();
            post["comments"][0]["id"] = json!(1001);
            post["comments"][0]["user_id"] = json!(7);
            ResponseTemplate::new(200).set_body_json(post)
        })
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server.uri(), signed_in());
    let mut feed = FeedController::new();
    feed.load(&client).await.unwrap();

    let saved = feed
        .add_comment(&client, 2, "great post")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(saved.id, 2);
    assert_eq!(saved.comments.len(), 1);
    assert_eq!(saved.comments[0].content, "great post");
    assert_eq!(saved.comments[0].id, 1001);

    let requests = server.received_requests().await.unwrap();
    let update = requests
        .iter()
        .find(|request| request.method.as_str() == "PUT")
        .unwrap();
    let sent: serde_json::Value = update.body_json().unwrap();
    assert_eq!(sent["content"], "two");
    assert_eq!(sent["comments"][0]["user_id"], 0);
}

#[tokio::test]
async fn test_failed_comment_keeps_local_echo() {
    let server = server_with_feed().await;
    Mock::given(method("PUT"))
        .and(path("/posts/1"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = client_for(&server.uri(), signed_in());
    let mut feed = FeedController::new();
    feed.load(&client).await.unwrap();

    let err = feed.add_comment(&client, 1, "lost?").await.unwrap_err();
    assert_eq!(err.to_string(), "Update post failed with status 500");

    let post = feed.post(1).unwrap();
    assert_eq!(post.comments.len(), 1);
    assert_eq!(post.comments[0].content, "lost?");
}

#[tokio::test]
async fn test_comment_on_unknown_post_is_noop() {
    let server = server_with_feed().await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server.uri(), signed_in());
    let mut feed = FeedController::new();
    feed.load(&client).await.unwrap();

    assert!(feed.add_comment(&client, 42, "hello").await.unwrap().is_none());
}
