//! Router and orchestration tests against in-memory caption and translation services.

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use subtitle_bridge::{
    app,
    config::TranscriptMode,
    error::{Result, TranscriptError},
    models::{CaptionLine, TranscriptRequest, TranscriptResponse, TranscriptSet},
    transcript::{TranscriptList, TranscriptSource},
    transcript_processor::{TranscriptService, TranslationPlan},
    translate::Translator,
};
use tower::ServiceExt;

// ============================================================================
// Mock collaborators
// ============================================================================

fn line(text: &str, start: f64, duration: f64) -> CaptionLine {
    CaptionLine {
        text: text.to_string(),
        start,
        duration,
    }
}

#[derive(Default)]
struct MockSource {
    sets: Vec<TranscriptSet>,
    lines: HashMap<String, Vec<CaptionLine>>,
    fetched: Mutex<Vec<String>>,
}

impl MockSource {
    fn with_track(mut self, code: &str, lines: Vec<CaptionLine>) -> Self {
        self.sets.push(TranscriptSet {
            language_code: code.to_string(),
            language: code.to_string(),
            is_generated: false,
            base_url: String::new(),
        });
        self.lines.insert(code.to_string(), lines);
        self
    }

    fn fetched(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }
}

#[async_trait]
impl TranscriptSource for MockSource {
    async fn list(&self, video_id: &str) -> Result<TranscriptList> {
        if self.sets.is_empty() {
            return Err(TranscriptError::NoTranscript(video_id.to_string()));
        }
        Ok(TranscriptList::from_sets(video_id, self.sets.clone()))
    }

    async fn fetch_set(&self, _video_id: &str, set: &TranscriptSet) -> Result<Vec<CaptionLine>> {
        self.fetched.lock().unwrap().push(set.language_code.clone());
        Ok(self.lines[&set.language_code].clone())
    }
}

/// Uppercases every text, which keeps brackets and digits where they were.
#[derive(Default)]
struct UppercaseTranslator {
    calls: Mutex<Vec<(String, String, usize)>>,
}

impl UppercaseTranslator {
    fn calls(&self) -> Vec<(String, String, usize)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Translator for UppercaseTranslator {
    async fn translate_batch(
        &self,
        texts: &[String],
        source_lang: &str,
        target_lang: &str,
    ) -> Result<Vec<String>> {
        self.calls.lock().unwrap().push((
            source_lang.to_string(),
            target_lang.to_string(),
            texts.len(),
        ));
        Ok(texts.iter().map(|t| t.to_uppercase()).collect())
    }
}

struct FailingTranslator;

#[async_trait]
impl Translator for FailingTranslator {
    async fn translate_batch(&self, _texts: &[String], _from: &str, to: &str) -> Result<Vec<String>> {
        Err(TranscriptError::Translation(format!("unsupported language: {to}")))
    }
}

struct ShortTranslator;

#[async_trait]
impl Translator for ShortTranslator {
    async fn translate_batch(&self, texts: &[String], _from: &str, _to: &str) -> Result<Vec<String>> {
        Ok(texts.iter().skip(1).cloned().collect())
    }
}

fn english_track() -> Vec<CaptionLine> {
    vec![
        line("Hello", 0.0, 1.5),
        line("[Music]", 1.5, 2.0),
        line("Good bye", 3.5, 1.0),
        line("♪ ♪", 4.5, 1.0),
        line("Café", 5.5, 0.5),
    ]
}

fn translate_request(url: &str, from: &str, to: &str) -> TranscriptRequest {
    TranscriptRequest {
        url: Some(url.to_string()),
        from_lang: Some(from.to_string()),
        to_lang: Some(to.to_string()),
    }
}

async fn send(service: TranscriptService, request: Request<Body>) -> (StatusCode, Value) {
    let response = app(service).oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn post_json(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/transcript")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

// ============================================================================
// Orchestrator
// ============================================================================

mod orchestrator_tests {
    use super::*;

    #[tokio::test]
    async fn test_fetch_drops_non_speech_lines() {
        let source = Arc::new(MockSource::default().with_track("en", english_track()));
        let service = TranscriptService::new(source, Arc::new(UppercaseTranslator::default()));

        let response = service.fetch("abc").await.unwrap();
        assert_eq!(
            response,
            TranscriptResponse::Fetched {
                video_id: "abc".to_string(),
                snippets: vec![
                    line("Hello", 0.0, 1.5),
                    line("Good bye", 3.5, 1.0),
                    line("Café", 5.5, 0.5),
                ],
            }
        );
    }

    #[tokio::test]
    async fn test_fetch_prefers_first_configured_language() {
        let source = Arc::new(
            MockSource::default()
                .with_track("es", vec![line("Hola", 0.0, 1.0)])
                .with_track("en", vec![line("Hi", 0.0, 1.0)]),
        );
        let service = TranscriptService::new(source.clone(), Arc::new(UppercaseTranslator::default()));

        service.fetch("abc").await.unwrap();
        assert_eq!(source.fetched(), vec!["en"]);
    }

    #[tokio::test]
    async fn test_fetch_without_matching_language_fails() {
        let source = Arc::new(MockSource::default().with_track("de", vec![line("Hallo", 0.0, 1.0)]));
        let service = TranscriptService::new(source, Arc::new(UppercaseTranslator::default()));

        let err = service.fetch("abc").await.unwrap_err();
        assert!(matches!(err, TranscriptError::Retrieval { .. }));
    }

    #[tokio::test]
    async fn test_translation_keeps_lists_aligned() {
        let source = Arc::new(MockSource::default().with_track("en", english_track()));
        let translator = Arc::new(UppercaseTranslator::default());
        let service = TranscriptService::new(source.clone(), translator.clone());

        let plan = TranslationPlan {
            from_lang: "en".to_string(),
            to_lang: "es".to_string(),
        };
        let response = service.fetch_translated("abc", &plan).await.unwrap();

        let TranscriptResponse::Translated {
            snippets,
            translated_snippets,
            ..
        } = response
        else {
            panic!("expected a translated response");
        };
        assert_eq!(snippets.len(), translated_snippets.len());
        let sources: Vec<&str> = snippets.iter().map(|s| s.source.as_str()).collect();
        assert_eq!(sources, vec!["Hello", "Good bye", "Café"]);
        assert_eq!(translated_snippets, vec!["HELLO", "GOOD BYE", "CAFÉ"]);
        assert_eq!(snippets[1].start, 3.5);

        // The whole track is translated in one batch, before filtering.
        assert_eq!(translator.calls(), vec![("en".to_string(), "es".to_string(), 5)]);
        assert_eq!(source.fetched(), vec!["en"]);
    }

    #[tokio::test]
    async fn test_missing_source_language_translates_twice() {
        let source = Arc::new(
            MockSource::default()
                .with_track("de", vec![line("Hallo", 0.0, 1.0), line("[Musik]", 1.0, 1.0)])
                .with_track("fr", vec![line("Salut", 0.0, 1.0)]),
        );
        let translator = Arc::new(UppercaseTranslator::default());
        let service = TranscriptService::new(source.clone(), translator.clone());

        let response = service
            .process_transcript_request(&translate_request("https://youtu.be/abc", "en", "es"))
            .await
            .unwrap();

        assert_eq!(source.fetched(), vec!["de"]);
        assert_eq!(
            translator.calls(),
            vec![
                ("de".to_string(), "en".to_string(), 2),
                ("en".to_string(), "es".to_string(), 2),
            ]
        );
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({
                "video_id": "abc",
                "snippets": [{"source": "HALLO", "start": 0.0, "duration": 1.0}],
                "translated_snippets": ["HALLO"],
            })
        );
    }

    #[tokio::test]
    async fn test_translation_failure_fails_request() {
        let source = Arc::new(MockSource::default().with_track("en", english_track()));
        let service = TranscriptService::new(source, Arc::new(FailingTranslator));

        let err = service
            .process_transcript_request(&translate_request("abc", "en", "xx"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Translation failed: unsupported language: xx");
    }

    #[tokio::test]
    async fn test_misaligned_translation_is_rejected() {
        let source = Arc::new(MockSource::default().with_track("en", english_track()));
        let service = TranscriptService::new(source, Arc::new(ShortTranslator));

        let err = service
            .process_transcript_request(&translate_request("abc", "en", "es"))
            .await
            .unwrap_err();
        assert!(matches!(err, TranscriptError::Translation(_)));
    }

    #[tokio::test]
    async fn test_translate_mode_uses_defaults() {
        let source = Arc::new(MockSource::default().with_track("en", vec![line("Hi", 0.0, 1.0)]));
        let translator = Arc::new(UppercaseTranslator::default());
        let service = TranscriptService::new(source, translator.clone())
            .with_mode(TranscriptMode::Translate);

        let req = TranscriptRequest {
            url: Some("https://www.youtube.com/watch?v=abc&t=1".to_string()),
            ..Default::default()
        };
        let response = service.process_transcript_request(&req).await.unwrap();
        assert_eq!(response.video_id(), "abc");
        assert_eq!(translator.calls(), vec![("en".to_string(), "es".to_string(), 1)]);
    }
}

// ============================================================================
// HTTP routes
// ============================================================================

mod route_tests {
    use super::*;

    fn service_with(source: MockSource) -> TranscriptService {
        TranscriptService::new(Arc::new(source), Arc::new(UppercaseTranslator::default()))
    }

    #[tokio::test]
    async fn test_index() {
        let request = Request::builder().uri("/").body(Body::empty()).unwrap();
        let (status, body) = send(service_with(MockSource::default()), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "message": "Welcome to the backend API!" }));
    }

    #[tokio::test]
    async fn test_missing_url_is_bad_request() {
        let (status, body) = send(service_with(MockSource::default()), post_json(json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "URL is required" }));

        let (status, body) =
            send(service_with(MockSource::default()), post_json(json!({ "url": "" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "URL is required" }));
    }

    fn raw_post(content_type: Option<&str>, body: &'static str) -> Request<Body> {
        let mut builder = Request::builder().method("POST").uri("/api/transcript");
        if let Some(content_type) = content_type {
            builder = builder.header("content-type", content_type);
        }
        builder.body(Body::from(body)).unwrap()
    }

    async fn assert_server_error(request: Request<Body>) {
        let (status, body) = send(service_with(MockSource::default()), request).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].as_str().unwrap().starts_with("Invalid request body"));
    }

    #[tokio::test]
    async fn test_malformed_json_is_server_error() {
        assert_server_error(raw_post(Some("application/json"), "{not json")).await;
    }

    #[tokio::test]
    async fn test_non_string_url_is_server_error() {
        assert_server_error(raw_post(Some("application/json"), r#"{"url":123}"#)).await;
    }

    #[tokio::test]
    async fn test_null_body_is_server_error() {
        assert_server_error(raw_post(Some("application/json"), "null")).await;
    }

    #[tokio::test]
    async fn test_missing_content_type_is_server_error() {
        assert_server_error(raw_post(None, r#"{"url":"abc"}"#)).await;
    }

    #[tokio::test]
    async fn test_whitespace_url_reaches_retrieval() {
        let (status, body) =
            send(service_with(MockSource::default()), post_json(json!({ "url": "   " }))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body,
            json!({ "error": "No transcripts are available for video    " })
        );
    }

    #[tokio::test]
    async fn test_video_without_captions_is_server_error() {
        let (status, body) = send(
            service_with(MockSource::default()),
            post_json(json!({ "url": "https://www.youtube.com/watch?v=jNQXAC9IVRw" })),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body,
            json!({ "error": "No transcripts are available for video jNQXAC9IVRw" })
        );
    }

    #[tokio::test]
    async fn test_fetch_response_shape() {
        let source = MockSource::default()
            .with_track("en", vec![line("[Music]", 0.0, 1.0), line("Hi", 0.0, 1.0)]);
        let (status, body) = send(
            service_with(source),
            post_json(json!({ "url": "https://youtu.be/jNQXAC9IVRw" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "video_id": "jNQXAC9IVRw",
                "snippets": [{"text": "Hi", "start": 0.0, "duration": 1.0}],
            })
        );
    }

    #[tokio::test]
    async fn test_translated_response_shape() {
        let source = MockSource::default().with_track("en", english_track());
        let (status, body) = send(
            service_with(source),
            post_json(json!({
                "url": "https://www.youtube.com/watch?v=jNQXAC9IVRw",
                "from_lang": "en",
                "to_lang": "es",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["video_id"], "jNQXAC9IVRw");
        assert_eq!(body["snippets"].as_array().unwrap().len(), 3);
        assert_eq!(body["snippets"][2], json!({"source": "Café", "start": 5.5, "duration": 0.5}));
        assert_eq!(body["translated_snippets"], json!(["HELLO", "GOOD BYE", "CAFÉ"]));
    }
}
