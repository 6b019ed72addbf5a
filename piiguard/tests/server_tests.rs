// piiguard/tests/server_tests.rs
//! HTTP boundary tests. The router is driven in-process with `tower::ServiceExt::oneshot`.

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use piiguard::server::{router, AppState, API_KEY_HEADER};
use piiguard_core::config::{ModelConfig, RecognizerConfig, RecognizerKindConfig};
use piiguard_core::{AnalyzerEngine, PiiGuardConfig};

fn app(api_key: Option<&str>) -> Router {
    let engine = AnalyzerEngine::from_config(&PiiGuardConfig::load_default().unwrap()).unwrap();
    router(AppState::new(engine, api_key.map(str::to_string)))
}

fn post_analyze(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/analyze")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[test_log::test(tokio::test)]
async fn analyze_returns_detections() {
    let (status, body) = send(app(None), post_analyze(json!({"text": "My PAN is ABCDE1234F"}))).await;
    assert_eq!(status, StatusCode::OK);
    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["entity_type"], "IN_PAN");
    assert_eq!(items[0]["start"], 10);
    assert_eq!(items[0]["end"], 20);
    assert!(items[0]["score"].as_f64().unwrap() >= 0.85);
    assert_eq!(items[0]["recognizer"], "in_pan_recognizer");
}

#[tokio::test]
async fn analyze_with_empty_body_returns_empty_array() {
    let (status, body) = send(app(None), post_analyze(json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn analyze_applies_entity_filter() {
    let request = post_analyze(json!({
        "text": "Contact: test@example.com or 555-1234",
        "entities": ["EMAIL_ADDRESS"]
    }));
    let (status, body) = send(app(None), request).await;
    assert_eq!(status, StatusCode::OK);
    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["entity_type"], "EMAIL_ADDRESS");
}

#[tokio::test]
async fn unsupported_language_is_bad_request() {
    let request = post_analyze(json!({"text": "bonjour", "language": "fr"}));
    let (status, body) = send(app(None), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("'fr'"));
}

#[tokio::test]
async fn api_key_is_enforced() {
    let (status, _) = send(app(Some("s3cret")), post_analyze(json!({"text": "x"}))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let mut request = post_analyze(json!({"text": "x"}));
    request.headers_mut().insert(API_KEY_HEADER, "wrong".parse().unwrap());
    let (status, _) = send(app(Some("s3cret")), request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let mut request = post_analyze(json!({"text": "My PAN is ABCDE1234F"}));
    request.headers_mut().insert(API_KEY_HEADER, "s3cret".parse().unwrap());
    let (status, body) = send(app(Some("s3cret")), request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn empty_api_key_disables_the_check() {
    let (status, _) = send(app(Some("")), post_analyze(json!({"text": "x"}))).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn health_is_open_and_lists_languages() {
    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let (status, body) = send(app(Some("s3cret")), request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok", "languages": ["en"]}));
}

#[tokio::test]
async fn recognizers_lists_registry() {
    let request = Request::builder().uri("/recognizers").body(Body::empty()).unwrap();
    let (status, body) = send(app(None), request).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["name"].as_str().unwrap())
        .collect();
    assert!(names.contains(&"in_pan_recognizer"));
    assert!(names.contains(&"in_gstin_recognizer"));
}

#[test_log::test(tokio::test)]
async fn unreachable_model_as_only_recognizer_is_service_unavailable() {
    let mut config = PiiGuardConfig::load_default().unwrap();
    config.recognizers.push(RecognizerConfig {
        name: "ner".to_string(),
        kind: RecognizerKindConfig::External,
        model: Some(ModelConfig {
            // Port 1 on loopback refuses connections.
            endpoint: "http://127.0.0.1:1/infer".to_string(),
            labels: [("PER".to_string(), "PERSON".to_string())].into_iter().collect(),
            api_key: None,
        }),
        ..Default::default()
    });
    let engine = AnalyzerEngine::from_config(&config).unwrap();
    let app = router(AppState::new(engine, None));

    let request = post_analyze(json!({"text": "Asha lives here", "entities": ["PERSON"]}));
    let (status, body) = send(app.clone(), request).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body["error"].as_str().unwrap().contains("ner"));

    // With pattern recognizers alongside, the model failure only degrades the result.
    let request = post_analyze(json!({"text": "My PAN is ABCDE1234F", "entities": ["PERSON", "IN_PAN"]}));
    let (status, body) = send(app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
}
