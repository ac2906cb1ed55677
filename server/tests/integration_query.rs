use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;
use typeahead_core::{EntryType, SharedEngine};
use typeahead_server::{build_app, ServerConfig};

const TOKEN: &str = "secret";

fn seeded() -> (SharedEngine, Router) {
    let engine = SharedEngine::default();
    engine.add(EntryType::User, "u1", 1.0, "Adam D’Angelo");
    engine.add(EntryType::User, "u2", 1.0, "Adam Black");
    engine.add(EntryType::Topic, "t1", 0.8, "Adam D’Angelo");
    let config = ServerConfig { admin_token: Some(TOKEN.into()), cors_allow_origin: None };
    let app = build_app(engine.clone(), config);
    (engine, app)
}

async fn send(app: Router, req: Request<Body>) -> (StatusCode, Vec<u8>) {
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let body = resp.into_body().collect().await.unwrap().to_bytes();
    (status, body.to_vec())
}

fn ids(json: &Value) -> Vec<&str> {
    json["results"].as_array().unwrap().iter().map(|h| h["id"].as_str().unwrap()).collect()
}

#[tokio::test]
async fn query_returns_ranked_ids() {
    let (_, app) = seeded();
    let req = Request::get("/query?q=adam&n=2").body(Body::empty()).unwrap();
    let (status, body) = send(app, req).await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(ids(&json), vec!["u2", "u1"]);
    assert_eq!(json["total_hits"], 3);
    assert_eq!(json["results"][0]["type"], "user");
}

#[tokio::test]
async fn weighted_query_applies_boosts() {
    let (_, app) = seeded();
    let payload = json!({ "q": "adam d", "n": 10, "boosts": { "topic": 10.0 } });
    let req = Request::post("/query")
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap();
    let (status, body) = send(app, req).await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(ids(&json), vec!["t1", "u1"]);
}

#[tokio::test]
async fn mutations_require_admin_token() {
    let (engine, app) = seeded();
    let payload = json!({ "type": "board", "id": "b1", "score": 5.0, "text": "Adam boards" });

    let req = Request::post("/entries")
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap();
    let (status, _) = send(app.clone(), req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let req = Request::post("/entries")
        .header("content-type", "application/json")
        .header("X-ADMIN-TOKEN", TOKEN)
        .body(Body::from(payload.to_string()))
        .unwrap();
    let (status, _) = send(app.clone(), req).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(engine.query(1, "adam"), vec!["b1"]);

    let req = Request::delete("/entries/b1").header("X-ADMIN-TOKEN", TOKEN).body(Body::empty()).unwrap();
    let (status, _) = send(app.clone(), req).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(engine.query(10, "boards").is_empty());

    let req = Request::get("/stats").body(Body::empty()).unwrap();
    let (_, body) = send(app, req).await;
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["entries"], 3);
}

#[tokio::test]
async fn unknown_word_yields_empty_results() {
    let (_, app) = seeded();
    let req = Request::get("/query?q=adam%20zed").body(Body::empty()).unwrap();
    let (status, body) = send(app, req).await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["total_hits"], 0);
    assert!(json["results"].as_array().unwrap().is_empty());
}
