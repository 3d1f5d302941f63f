//! End-to-end walks against a loopback axum server.

use std::collections::HashMap;

use axum::extract::Query;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use linkweft::{Model, RequestDescriptor};
use linkweft_api::{User, UserConnection, Video};
use linkweft_client::{Client, ClientError, HttpTransport, Session, TransportError};

/// Spawn a loopback axum server and return its base URL.
async fn spawn_mock_server(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

fn client(api_base: &str, token: Option<&str>) -> Client<HttpTransport> {
    let mut session = Session::new(api_base);
    if let Some(token) = token {
        session = session.with_access_token(token);
    }
    Client::new(HttpTransport::new(reqwest::Client::new(), session))
}

fn page_body(page: u64, last: u64) -> Value {
    let next = (page < last).then(|| format!("/me/videos?page={}&per_page=2", page + 1));
    json!({
        "total": last * 2,
        "page": page,
        "per_page": 2,
        "paging": {
            "next": next,
            "previous": null,
            "first": "/me/videos?page=1&per_page=2",
            "last": format!("/me/videos?page={last}&per_page=2")
        },
        "data": [
            { "uri": format!("/videos/{}", page * 10 + 1), "name": "first" },
            { "uri": format!("/videos/{}", page * 10 + 2), "name": "second" }
        ]
    })
}

/// Three pages of videos, only for callers presenting the expected token.
async fn paged_videos(
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    let authorized = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        == Some("Bearer secret");
    if !authorized {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "A valid user token must be passed." })),
        );
    }
    let page = params
        .get("page")
        .and_then(|p| p.parse::<u64>().ok())
        .unwrap_or(1);
    (StatusCode::OK, Json(page_body(page, 3)))
}

/// Serves page 1 normally, then fails every later page.
async fn flaky_videos(Query(params): Query<HashMap<String, String>>) -> impl IntoResponse {
    match params.get("page").map(String::as_str) {
        None | Some("1") => (StatusCode::OK, Json(page_body(1, 3))),
        _ => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": "Something strange occurred.",
                "developer_message": "Upstream timeout while listing videos.",
                "error_code": 9000
            })),
        ),
    }
}

async fn me(headers: HeaderMap) -> Json<Value> {
    let accept = headers
        .get("accept")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    Json(json!({
        "uri": "/users/1",
        "name": "Ada",
        "bio": accept,
        "metadata": {
            "connections": {
                "videos": { "uri": "/me/videos", "options": ["GET"], "total": 6 }
            }
        }
    }))
}

#[tokio::test]
async fn walk_follows_next_links_to_the_end() {
    let app = Router::new().route("/me/videos", get(paged_videos));
    let api_base = spawn_mock_server(app).await;
    let client = client(&api_base, Some("secret"));

    let walk = client
        .walk::<Video>(RequestDescriptor::get("/me/videos"), 10)
        .await;

    assert!(walk.is_complete(), "error: {:?}", walk.error());
    assert_eq!(walk.pages(), 3);
    let uris: Vec<&str> = walk.items().iter().map(|v| v.uri()).collect();
    assert_eq!(
        uris,
        ["/videos/11", "/videos/12", "/videos/21", "/videos/22", "/videos/31", "/videos/32"]
    );
}

#[tokio::test]
async fn missing_token_is_a_bad_status_with_message() {
    let app = Router::new().route("/me/videos", get(paged_videos));
    let api_base = spawn_mock_server(app).await;
    let client = client(&api_base, None);

    let err = client
        .fetch_page::<Video>(&RequestDescriptor::get("/me/videos"))
        .await
        .unwrap_err();
    match err {
        ClientError::Transport(TransportError::BadStatus { status, message }) => {
            assert_eq!(status, 401);
            assert_eq!(message.as_deref(), Some("A valid user token must be passed."));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn failing_later_page_keeps_earlier_items() {
    let app = Router::new().route("/me/videos", get(flaky_videos));
    let api_base = spawn_mock_server(app).await;
    let client = client(&api_base, None);

    let walk = client
        .walk::<Video>(RequestDescriptor::get("/me/videos"), 10)
        .await;

    assert_eq!(walk.pages(), 1);
    assert_eq!(walk.items().len(), 2);
    match walk.error() {
        Some(ClientError::Transport(TransportError::BadStatus { status, message })) => {
            assert_eq!(*status, 500);
            assert_eq!(
                message.as_deref(),
                Some("Upstream timeout while listing videos.")
            );
        }
        other => panic!("unexpected walk error: {other:?}"),
    }
    assert_eq!(
        walk.next().map(|r| r.path_and_query()).as_deref(),
        Some("/me/videos?page=2&per_page=2")
    );
}

#[tokio::test]
async fn fetch_sends_versioned_accept_and_follows_connection() {
    let app = Router::new()
        .route("/me", get(me))
        .route("/me/videos", get(paged_videos));
    let api_base = spawn_mock_server(app).await;
    let client = client(&api_base, Some("secret"));

    let user: User = client.fetch(&RequestDescriptor::get("/me")).await.unwrap();
    assert_eq!(
        user.bio(),
        Some("application/vnd.vimeo.*+json;version=3.4")
    );

    let videos = user
        .connections()
        .get(UserConnection::Videos)
        .unwrap();
    assert_eq!(videos.total(), Some(6));
    let page = client.follow_page::<Video>(videos).await.unwrap();
    assert_eq!(page.page(), Some(1));
    assert_eq!(page.len(), 2);
}
