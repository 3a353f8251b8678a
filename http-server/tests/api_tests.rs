use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use core_library::db::create_test_pool;
use core_library::repositories::SqliteSongRepository;
use core_service::SongService;
use http_server::{router, AppState};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

async fn test_app() -> Router {
    let pool = create_test_pool().await.unwrap();
    let service = SongService::new(Arc::new(SqliteSongRepository::new(pool.clone())));
    router(AppState::new(service, pool))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let (status, _, body) = send_raw(app, method, uri, body).await;
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap_or(Value::Null)
    };
    (status, json)
}

async fn send_raw(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, headers, body.to_vec())
}

async fn create(app: &Router, body: Value) -> i64 {
    let (status, json) = send(app, Method::POST, "/songs/create", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {}", json);
    json["id"].as_i64().unwrap()
}

#[tokio::test]
async fn test_home_and_health() {
    let app = test_app().await;

    let (status, _, body) = send_raw(&app, Method::GET, "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"Welcome to the homepage!");

    let (status, json) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_create_and_fetch_song() {
    let app = test_app().await;

    let id = create(
        &app,
        json!({
            "group_name": "Muse",
            "song_name": "Supermassive Black Hole",
            "release_date": "2006-07-16",
            "lyrics": "Ooh baby, don't you know I suffer?\n\nOoh baby, can you hear me moan?",
            "link": "https://www.youtube.com/watch?v=Xsp3_a-PMTw"
        }),
    )
    .await;

    let (status, json) = send(&app, Method::GET, &format!("/songs/info?id={}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["id"], id);
    assert_eq!(json["group_name"], "Muse");
    assert_eq!(json["song_name"], "Supermassive Black Hole");
    assert_eq!(json["release_date"], "2006-07-16");
    assert_eq!(json["link"], "https://www.youtube.com/watch?v=Xsp3_a-PMTw");
}

#[tokio::test]
async fn test_create_duplicate_is_conflict() {
    let app = test_app().await;
    let body = json!({ "group_name": "Muse", "song_name": "Starlight" });

    create(&app, body.clone()).await;
    let (status, json) = send(&app, Method::POST, "/songs/create", Some(body)).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert!(json["message"].is_string());
}

#[tokio::test]
async fn test_create_rejects_bad_input() {
    let app = test_app().await;

    let (status, json) = send(
        &app,
        Method::POST,
        "/songs/create",
        Some(json!({ "group_name": "", "song_name": "Starlight" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["message"].is_string());

    let (status, json) = send(
        &app,
        Method::POST,
        "/songs/create",
        Some(json!({ "group_name": "Muse" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["message"].is_string());
}

#[tokio::test]
async fn test_get_missing_and_malformed_id() {
    let app = test_app().await;

    let (status, json) = send(&app, Method::GET, "/songs/info?id=999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["message"], "Song not found");

    let (status, _) = send(&app, Method::GET, "/songs/info?id=abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, Method::GET, "/songs/info", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_song() {
    let app = test_app().await;
    let id = create(
        &app,
        json!({ "group_name": "Muse", "song_name": "Starlight", "lyrics": "A\n\nB" }),
    )
    .await;

    let (status, json) = send(
        &app,
        Method::PUT,
        "/songs/update",
        Some(json!({ "id": id, "new_group_name": "MUSE", "new_song_name": "Starlight (Live)" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["group_name"], "MUSE");
    assert_eq!(json["song_name"], "Starlight (Live)");
    assert_eq!(json["lyrics"], "A\n\nB");

    let (status, _) = send(
        &app,
        Method::PUT,
        "/songs/update",
        Some(json!({ "id": id + 100, "new_group_name": "X", "new_song_name": "Y" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_song() {
    let app = test_app().await;
    let id = create(&app, json!({ "group_name": "Muse", "song_name": "Starlight" })).await;

    let uri = format!("/songs/delete?id={}", id);
    let (status, json) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["message"].as_str().unwrap().contains(&id.to_string()));

    let (status, _) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::GET, &format!("/songs/info?id={}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_songs_with_filter_and_window() {
    let app = test_app().await;
    let first = create(&app, json!({ "group_name": "The Beatles", "song_name": "Help!" })).await;
    create(&app, json!({ "group_name": "Muse", "song_name": "Uprising" })).await;
    let third = create(&app, json!({ "group_name": "Beatsteaks", "song_name": "Hand in Hand" })).await;

    let (status, headers, body) =
        send_raw(&app, Method::GET, "/songs?group_name=BEAT", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers["x-total-count"], "2");

    let songs: Vec<Value> = serde_json::from_slice(&body).unwrap();
    let ids: Vec<i64> = songs.iter().map(|s| s["id"].as_i64().unwrap()).collect();
    assert_eq!(ids, vec![third, first]);

    let (status, json) = send(&app, Method::GET, "/songs?group_name=beat&limit=1&offset=1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json.as_array().unwrap().len(), 1);
    assert_eq!(json[0]["id"], first);

    let (status, json) = send(&app, Method::GET, "/songs?song_name=nothing", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!([]));
}

#[tokio::test]
async fn test_list_songs_rejects_bad_query() {
    let app = test_app().await;

    let (status, _) = send(&app, Method::GET, "/songs?limit=ten", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, Method::GET, "/songs?limit=0", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, Method::GET, "/songs?release_date=yesterday", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_songs_treats_blank_parameters_as_absent() {
    let app = test_app().await;
    let first = create(
        &app,
        json!({ "group_name": "Muse", "song_name": "Uprising", "lyrics": "A\n\nB" }),
    )
    .await;
    let second = create(&app, json!({ "group_name": "Muse", "song_name": "Starlight" })).await;

    let (status, headers, body) = send_raw(
        &app,
        Method::GET,
        "/songs?group_name=&song_name=&release_date=&limit=&offset=",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers["x-total-count"], "2");

    let songs: Vec<Value> = serde_json::from_slice(&body).unwrap();
    let ids: Vec<i64> = songs.iter().map(|s| s["id"].as_i64().unwrap()).collect();
    assert_eq!(ids, vec![second, first]);

    let (status, json) = send(&app, Method::GET, "/songs?group_name=muse&limit=&offset=1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json.as_array().unwrap().len(), 1);

    let (status, json) = send(&app, Method::GET, &format!("/songs/{}/lyrics?page=&limit=", first), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["page"], 1);
}

#[tokio::test]
async fn test_lyrics_pagination() {
    let app = test_app().await;
    let id = create(
        &app,
        json!({ "group_name": "Muse", "song_name": "Starlight", "lyrics": "A\n\nB\n\nC\n\nD" }),
    )
    .await;

    let (status, json) = send(
        &app,
        Method::GET,
        &format!("/songs/{}/lyrics?page=1&limit=2", id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["song_id"], id);
    assert_eq!(json["title"], "Starlight");
    assert_eq!(json["group"], "Muse");
    assert_eq!(json["total"], 4);
    assert_eq!(json["couplets"], json!(["A", "B"]));

    let (status, json) = send(
        &app,
        Method::GET,
        &format!("/songs/{}/lyrics?page=3&limit=2", id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["couplets"], json!([]));

    let (status, json) = send(
        &app,
        Method::GET,
        &format!("/songs/{}/lyrics?page=4&limit=2", id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "Page out of range");

    // Defaults: page 1, limit 10
    let (status, json) = send(&app, Method::GET, &format!("/songs/{}/lyrics", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["page"], 1);
    assert_eq!(json["limit"], 10);
    assert_eq!(json["couplets"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_lyrics_rejects_bad_parameters() {
    let app = test_app().await;
    let id = create(&app, json!({ "group_name": "Muse", "song_name": "Starlight" })).await;

    for query in ["page=0", "limit=0", "page=two"] {
        let uri = format!("/songs/{}/lyrics?{}", id, query);
        let (status, json) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "query {}", query);
        assert!(json["message"].is_string());
    }

    let (status, _) = send(&app, Method::GET, "/songs/abc/lyrics", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, Method::GET, "/songs/12345/lyrics", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
