// piiguard-core/tests/http_model_tests.rs
use std::collections::BTreeMap;
use std::sync::Arc;

use mockito::Matcher;
use serde_json::json;

use piiguard_core::recognizers::EntityModel;
use piiguard_core::{
    AnalysisRequest, AnalyzerEngine, EntityType, HttpEntityModel, ModelError, Recognizer, RegistryBuilder,
};

#[tokio::test]
async fn infer_posts_text_and_parses_entities() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/infer")
        .match_header("authorization", "Bearer s3cret")
        .match_body(Matcher::Json(json!({"text": "Asha lives in Pune", "language": "en"})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"[{"label":"PER","start":0,"end":4,"score":0.93},{"label":"GPE","start":14,"end":18,"score":0.8}]"#)
        .create_async()
        .await;

    let model = HttpEntityModel::new("ner", &format!("{}/infer", server.url())).with_api_key("s3cret");
    let entities = model.infer("Asha lives in Pune", "en").await.unwrap();

    assert_eq!(entities.len(), 2);
    assert_eq!(entities[0].label, "PER");
    assert_eq!((entities[1].start, entities[1].end), (14, 18));
    mock.assert_async().await;
}

#[tokio::test]
async fn server_error_is_unavailable() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server.mock("POST", "/infer").with_status(503).create_async().await;

    let model = HttpEntityModel::new("ner", &format!("{}/infer", server.url()));
    let err = model.infer("text", "en").await.unwrap_err();
    assert!(matches!(err, ModelError::Unavailable(ref reason) if reason.contains("503")));
}

#[tokio::test]
async fn malformed_body_is_invalid_response() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/infer")
        .with_status(200)
        .with_body("not json")
        .create_async()
        .await;

    let model = HttpEntityModel::new("ner", &format!("{}/infer", server.url()));
    assert!(matches!(model.infer("text", "en").await, Err(ModelError::InvalidResponse(_))));
}

#[tokio::test]
async fn wrapped_entity_list_is_invalid_response() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/infer")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"entities":[{"label":"PER","start":0,"end":4,"score":0.9}]}"#)
        .create_async()
        .await;

    let model = HttpEntityModel::new("ner", &format!("{}/infer", server.url()));
    assert!(matches!(model.infer("Asha", "en").await, Err(ModelError::InvalidResponse(_))));
}

#[test_log::test(tokio::test)]
async fn model_backed_recognizer_runs_through_the_engine() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/infer")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"[{"label":"PER","start":0,"end":4,"score":0.7}]"#)
        .create_async()
        .await;

    let model = Arc::new(HttpEntityModel::new("ner", &format!("{}/infer", server.url())));
    let labels = BTreeMap::from([("PER".to_string(), EntityType::from("PERSON"))]);
    let recognizer = Recognizer::external("ner", "en", model, labels, &["name"]).unwrap();
    let registry = RegistryBuilder::new().add(recognizer).unwrap().build();
    let engine = AnalyzerEngine::new(Arc::new(registry), None);

    let result = engine
        .analyze(&AnalysisRequest::new("Asha is my name"))
        .await
        .unwrap();
    assert_eq!(result.detections.len(), 1);
    assert_eq!(result.detections[0].entity_type, "PERSON");
    assert_eq!(result.detections[0].recognizer, "ner");
    assert!(result.detections[0].score > 0.7, "context word 'name' follows the span");
}
