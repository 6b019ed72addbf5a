// piiguard-core/tests/engine_scenarios.rs
//! End-to-end analysis against the built-in recognizers.

use std::sync::Arc;

use piiguard_core::{
    AnalysisRequest, AnalyzerEngine, Detection, EntityType, Pattern, PiiGuardConfig, PiiGuardError,
    Recognizer, RegistryBuilder,
};

fn default_engine() -> AnalyzerEngine {
    AnalyzerEngine::from_config(&PiiGuardConfig::load_default().unwrap()).unwrap()
}

fn find<'a>(detections: &'a [Detection], entity: &str) -> Vec<&'a Detection> {
    detections.iter().filter(|d| d.entity_type == entity).collect()
}

#[test_log::test(tokio::test)]
async fn pan_is_detected_with_exact_span() {
    let text = "My PAN is ABCDE1234F";
    let result = default_engine().analyze(&AnalysisRequest::new(text)).await.unwrap();
    let pan = find(&result.detections, "IN_PAN");
    assert_eq!(pan.len(), 1);
    assert_eq!((pan[0].start, pan[0].end), (10, 20));
    assert_eq!(&text[pan[0].start..pan[0].end], "ABCDE1234F");
    assert!(pan[0].score >= 0.85);
}

#[test_log::test(tokio::test)]
async fn pan_without_context_keeps_base_score() {
    let result = default_engine()
        .analyze(&AnalysisRequest::new("ref: ABCDE1234F."))
        .await
        .unwrap();
    let pan = find(&result.detections, "IN_PAN");
    assert_eq!(pan.len(), 1);
    assert_eq!(pan[0].score, 0.85);
}

#[test_log::test(tokio::test)]
async fn pan_inside_longer_token_is_ignored() {
    let result = default_engine()
        .analyze(&AnalysisRequest::new("XABCDE1234FZ and ABCDE1234F9"))
        .await
        .unwrap();
    assert!(find(&result.detections, "IN_PAN").is_empty());
}

#[test_log::test(tokio::test)]
async fn aadhaar_score_is_boosted_by_context() {
    let text = "My aadhaar number is 234512345678";
    let result = default_engine().analyze(&AnalysisRequest::new(text)).await.unwrap();
    assert_eq!(result.detections.len(), 1);
    let aadhaar = &result.detections[0];
    assert_eq!(aadhaar.entity_type, "IN_AADHAAR");
    assert_eq!((aadhaar.start, aadhaar.end), (21, 33));
    assert_eq!(aadhaar.score, 1.0);
}

#[test_log::test(tokio::test)]
async fn gstin_is_boosted_by_following_context() {
    let text = "27AAAAA0000A1Z5 is the GSTIN";
    let result = default_engine().analyze(&AnalysisRequest::new(text)).await.unwrap();
    let gstin = find(&result.detections, "IN_GSTIN");
    assert_eq!(gstin.len(), 1);
    assert_eq!((gstin[0].start, gstin[0].end), (0, 15));
    assert!(gstin[0].score > 0.6);
}

#[test_log::test(tokio::test)]
async fn entity_filter_excludes_other_types() {
    let text = "Contact: test@example.com or 555-1234";
    let engine = default_engine();

    let all = engine.analyze(&AnalysisRequest::new(text)).await.unwrap();
    assert_eq!(find(&all.detections, "PHONE_NUMBER").len(), 1);
    assert!(find(&all.detections, "URL").is_empty(), "domain inside the email must lose");

    let request = AnalysisRequest::new(text).with_entities(["EMAIL_ADDRESS"]);
    let only_email = engine.analyze(&request).await.unwrap();
    assert_eq!(only_email.detections.len(), 1);
    assert_eq!(only_email.detections[0].entity_type, "EMAIL_ADDRESS");
    assert_eq!(&text[only_email.detections[0].start..only_email.detections[0].end], "test@example.com");
}

#[test_log::test(tokio::test)]
async fn card_number_beats_aadhaar_pattern_inside_it() {
    let text = "card 4111 1111 1111 1111 expires soon";
    let result = default_engine().analyze(&AnalysisRequest::new(text)).await.unwrap();
    assert_eq!(result.detections.len(), 1);
    assert_eq!(result.detections[0].entity_type, "CREDIT_CARD");
    assert_eq!((result.detections[0].start, result.detections[0].end), (5, 24));
}

#[test_log::test(tokio::test)]
async fn card_number_failing_luhn_is_not_a_card() {
    let result = default_engine()
        .analyze(&AnalysisRequest::new("number 4111111111111112").with_entities(["CREDIT_CARD"]))
        .await
        .unwrap();
    assert!(result.detections.is_empty());
}

#[test_log::test(tokio::test)]
async fn higher_score_wins_same_span_across_types() {
    let generic = Pattern::new("ten_digits", r"\b[0-9]{10}\b", 0.6).unwrap();
    let national = Pattern::new("national_id", r"\b[0-9]{10}\b", 0.9).unwrap();
    let registry = RegistryBuilder::new()
        .add(Recognizer::pattern("generic", EntityType::from("GENERIC_NUMBER"), "en", vec![generic], &[] as &[&str]).unwrap())
        .unwrap()
        .add(Recognizer::pattern("national", EntityType::from("NATIONAL_ID"), "en", vec![national], &[] as &[&str]).unwrap())
        .unwrap()
        .build();
    let engine = AnalyzerEngine::new(Arc::new(registry), None);

    let result = engine.analyze(&AnalysisRequest::new("id 1234567890")).await.unwrap();
    assert_eq!(result.detections.len(), 1);
    assert_eq!(result.detections[0].entity_type, "NATIONAL_ID");
    assert_eq!(result.detections[0].score, 0.9);
    assert_eq!(result.detections[0].recognizer, "national");
}

#[test_log::test(tokio::test)]
async fn unsupported_language_is_rejected() {
    let err = default_engine()
        .analyze(&AnalysisRequest::new("Mon PAN est ABCDE1234F").with_language("fr"))
        .await
        .unwrap_err();
    assert!(matches!(err, PiiGuardError::UnsupportedLanguage(ref l) if l == "fr"));
}

#[test_log::test(tokio::test)]
async fn empty_text_yields_nothing_for_any_request() {
    let engine = default_engine();
    for request in [
        AnalysisRequest::new(""),
        AnalysisRequest::new("").with_language("fr"),
        AnalysisRequest::new("").with_entities(["IN_PAN"]),
    ] {
        assert!(engine.analyze(&request).await.unwrap().detections.is_empty());
    }
}

#[test_log::test(tokio::test)]
async fn output_is_sorted_and_non_overlapping() {
    let text = "Email a.b@corp.in, call 555-1234, PAN ABCDE1234F, aadhaar 2345 1234 5678, see www.corp.in";
    let result = default_engine().analyze(&AnalysisRequest::new(text)).await.unwrap();
    assert!(result.detections.len() >= 5);
    for pair in result.detections.windows(2) {
        assert!(pair[0].end <= pair[1].start);
    }
    for d in &result.detections {
        assert!((0.0..=1.0).contains(&d.score));
        assert!(d.start < d.end && d.end <= text.len());
    }
}
