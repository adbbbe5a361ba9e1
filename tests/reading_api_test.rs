use anyhow::Result;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use httpmock::prelude::*;
use serde_json::{json, Value};
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tarot_oracle::adapters::http::{app, ReadingAppState};
use tarot_oracle::config::AppConfig;
use tarot_oracle::{GeminiClient, GeminiConfig, ReadingService};
use tempfile::NamedTempFile;
use tower::ServiceExt;

fn gemini_config(server: &MockServer) -> GeminiConfig {
    GeminiConfig {
        api_key: Some("test-key".to_string()),
        api_url: Some(server.url("/generate")),
        retry_backoff: Duration::from_millis(10),
        ..GeminiConfig::default()
    }
}

fn build_app(config: AppConfig) -> Router {
    let catalog = Arc::new(config.load_catalog().unwrap());
    let aspects = Arc::new(config.load_aspects().unwrap());
    let client = Arc::new(GeminiClient::new(config.gemini.clone()));
    let service = ReadingService::new(catalog, aspects, client);
    app(ReadingAppState::new(Arc::new(service)))
}

fn reading_request(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/reading")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn spread() -> Value {
    json!([
        { "cardId": 21, "position": "未來", "orientation": "upright" },
        { "cardId": 16, "position": "過去", "orientation": "reversed" },
        { "cardId": 0, "position": "現在", "orientation": "upright" }
    ])
}

#[tokio::test]
async fn test_reading_round_trip_through_gemini() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/generate")
            .query_param("key", "test-key")
            .body_contains("用戶的問題：「我的運勢如何？」")
            .body_contains("占卜面向：自我成長")
            .body_contains("【過去】高塔（逆位）")
            .body_contains("【現在】愚者（正位）")
            .body_contains("【未來】世界（正位）")
            .body_contains("延遲的崩壞、害怕改變、餘波未平。");
        then.status(200).json_body(json!({
            "candidates": [ { "content": { "parts": [
                { "text": "### 🔮 牌面解讀" },
                { "text": "過去的動盪正在沉澱。" }
            ] } } ]
        }));
    });

    let app = build_app(AppConfig {
        gemini: gemini_config(&server),
        ..AppConfig::default()
    });
    let response = app
        .oneshot(reading_request(json!({
            "question": "我的運勢如何？",
            "aspect": "growth",
            "cards": spread()
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(
        body["interpretation"],
        "### 🔮 牌面解讀\n過去的動盪正在沉澱。"
    );
    mock.assert_hits(1);
}

#[tokio::test]
async fn test_gemini_outage_maps_to_service_unavailable() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/generate");
        then.status(500).body("internal");
    });

    let app = build_app(AppConfig {
        gemini: gemini_config(&server),
        ..AppConfig::default()
    });
    let response = app
        .oneshot(reading_request(json!({
            "question": "我的運勢如何？",
            "aspect": "love",
            "cards": spread()
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = json_body(response).await;
    assert_eq!(body["error"], "連結星際能量失敗，請重新翻牌。");
    assert_eq!(body["code"], "ORACLE_UNAVAILABLE");
    assert_eq!(mock.hits(), 2);
}

#[tokio::test]
async fn test_invalid_question_never_reaches_gemini() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/generate");
        then.status(200).body("{}");
    });

    let app = build_app(AppConfig {
        gemini: gemini_config(&server),
        ..AppConfig::default()
    });
    let response = app
        .oneshot(reading_request(json!({
            "question": "？？？？？？",
            "aspect": "love",
            "cards": spread()
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"], "請輸入具體問題，避免僅使用符號。");
    assert_eq!(mock.hits(), 0);
}

#[tokio::test]
async fn test_custom_aspects_file_drives_listing_and_prompt() -> Result<()> {
    let mut aspects_file = NamedTempFile::new()?;
    write!(
        aspects_file,
        r#"
[[aspects]]
key = "health"
label = "身心健康"
emphasis = "core"
meaning_label = "身心牌義"
icon = "✚"
quick_questions = ["最近的疲憊感從何而來？"]

[[aspects]]
key = "general"
label = "整體運勢"
"#
    )?;

    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/generate")
            .body_contains("占卜面向：身心健康")
            .body_contains("身心牌義");
        then.status(200).json_body(json!({
            "candidates": [ { "content": { "parts": [ { "text": "好好休息。" } ] } } ]
        }));
    });

    let app = build_app(AppConfig {
        gemini: gemini_config(&server),
        aspects_file: Some(aspects_file.path().to_path_buf()),
        catalog_file: None,
    });

    let listing = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/aspects")
                .body(Body::empty())
                .unwrap(),
        )
        .await?;
    assert_eq!(listing.status(), StatusCode::OK);
    let body = json_body(listing).await;
    let keys: Vec<&str> = body["aspects"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["key"].as_str().unwrap())
        .collect();
    assert_eq!(keys, vec!["health", "general"]);

    let unsupported = app
        .clone()
        .oneshot(reading_request(json!({
            "question": "我的運勢如何？",
            "aspect": "love",
            "cards": spread()
        })))
        .await
        .unwrap();
    assert_eq!(unsupported.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(unsupported).await["error"], "不支援的占卜分類。");

    let response = app
        .oneshot(reading_request(json!({
            "question": "最近的疲憊感從何而來？",
            "aspect": "health",
            "cards": spread()
        })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["interpretation"], "好好休息。");
    mock.assert_hits(1);
    Ok(())
}
