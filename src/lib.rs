pub mod config;
pub mod error;
pub mod filter;
pub mod models;
pub mod routes;
pub mod transcript;
pub mod transcript_processor;
pub mod translate;
pub mod video_id;

use std::sync::Arc;

use axum::Router;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use config::Config;
use routes::create_routes;
use transcript::YouTubeTranscripts;
use transcript_processor::TranscriptService;
use translate::GoogleTranslator;

/// Wire the YouTube and Google clients into a service according to `config`.
pub fn build_service(config: &Config) -> anyhow::Result<TranscriptService> {
    let client = reqwest::Client::builder()
        .timeout(config.upstream_timeout())
        .build()?;

    let source = YouTubeTranscripts::new(client.clone()).with_base_url(&config.youtube_base_url);
    let translator = GoogleTranslator::new(client).with_base_url(&config.translate_base_url);

    Ok(TranscriptService::from_config(
        config,
        Arc::new(source),
        Arc::new(translator),
    ))
}

/// The full HTTP application: routes plus request tracing and CORS.
pub fn app(service: TranscriptService) -> Router {
    create_routes(service).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    )
}
