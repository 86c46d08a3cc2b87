use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use server::{build_app, AppOptions};
use std::fs;
use std::path::Path;
use tempfile::tempdir;
use tower::ServiceExt;

fn write_dataset(dir: &Path) {
    fs::write(
        dir.join("kernel.json"),
        json!({
            "id": "kernel",
            "name": "Kernel",
            "type": "kernel",
            "children": [
                {"name": "Scheduler (CFS)", "type": "kernel", "level": "intermediate",
                 "metadata": {"description": "Completely fair process scheduler"}},
                {"name": "Memory Management", "type": "kernel", "level": "advanced",
                 "operations": {"commands": [{"cmd": "free -h", "desc": "memory usage"}]}}
            ]
        })
        .to_string(),
    )
    .unwrap();
    fs::write(
        dir.join("services.json"),
        json!([{"name": "Scheduler UI", "type": "userspace", "level": "beginner"}]).to_string(),
    )
    .unwrap();
}

async fn app_for(dir: &Path) -> Router {
    build_app(AppOptions {
        data_dir: Some(dir.to_path_buf()),
        config: None,
        admin_token: Some("secret".into()),
    })
    .await
    .unwrap()
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let body = resp.into_body().collect().await.unwrap().to_bytes();
    let json = if body.is_empty() { Value::Null } else { serde_json::from_slice(&body).unwrap_or(Value::Null) };
    (status, json)
}

fn post_message(msg: Value) -> Request<Body> {
    Request::post("/message")
        .header("content-type", "application/json")
        .body(Body::from(msg.to_string()))
        .unwrap()
}

#[tokio::test]
async fn search_returns_ranked_results() {
    let dir = tempdir().unwrap();
    write_dataset(dir.path());
    let app = app_for(dir.path()).await;

    let (status, json) = send(&app, Request::get("/search?q=sched&seq=4").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["type"], "SEARCH_RESULTS");
    assert_eq!(json["data"]["seq"], 4);
    let arr = json["data"]["results"].as_array().unwrap();
    assert_eq!(arr.len(), 2);
    // the nested kernel node pays a deeper depth penalty than the root-level one
    assert_eq!(arr[0]["node"]["name"], "Scheduler UI");
    assert_eq!(arr[1]["node"]["name"], "Scheduler (CFS)");
    assert_eq!(arr[1]["path"], "Kernel > Scheduler (CFS)");
}

#[tokio::test]
async fn message_endpoint_speaks_the_worker_protocol() {
    let dir = tempdir().unwrap();
    write_dataset(dir.path());
    let app = app_for(dir.path()).await;

    let (status, json) = send(&app, post_message(json!({"type": "GET_STATS", "data": {}}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["type"], "STATS");
    assert_eq!(json["data"]["totalNodes"], 4);
    assert!(json["data"]["memoryUsage"].as_u64().unwrap() > 0);

    let (status, json) = send(
        &app,
        post_message(json!({"type": "FILTER", "data": {"criteria": {"type": "kernel", "hasCommands": true}}})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["type"], "FILTER_RESULTS");
    let results = json["data"]["results"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["path"], "Kernel > Memory Management");

    let (status, _) = send(&app, post_message(json!({"type": "PING", "data": {}}))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, post_message(json!({"type": "SEARCH", "data": {"query": 12}}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn init_message_replaces_the_index() {
    let dir = tempdir().unwrap();
    write_dataset(dir.path());
    let app = app_for(dir.path()).await;

    let (status, json) = send(
        &app,
        post_message(json!({"type": "INIT", "data": {"nodes": [{"name": "ab"}, {"type": "kernel"}]}})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({"type": "INIT_COMPLETE", "data": {"indexSize": 3}}));

    let (_, json) = send(&app, Request::get("/search?q=sched").body(Body::empty()).unwrap()).await;
    assert!(json["data"]["results"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn reload_requires_the_admin_token() {
    let dir = tempdir().unwrap();
    write_dataset(dir.path());
    let app = app_for(dir.path()).await;
    fs::write(dir.path().join("network.json"), json!({"name": "Netfilter", "type": "network"}).to_string()).unwrap();

    let (status, _) = send(&app, Request::post("/index/reload").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let req = Request::post("/index/reload").header("X-ADMIN-TOKEN", "secret").body(Body::empty()).unwrap();
    let (status, json) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["type"], "INIT_COMPLETE");

    let (_, json) = send(&app, Request::get("/search?q=netfilter").body(Body::empty()).unwrap()).await;
    assert_eq!(json["data"]["results"][0]["node"]["name"], "Netfilter");
}

#[tokio::test]
async fn health_is_ok_without_data() {
    let app = build_app(AppOptions::default()).await.unwrap();
    let resp = app.oneshot(Request::get("/health").body(Body::empty()).unwrap()).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}
