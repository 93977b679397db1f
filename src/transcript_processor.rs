use crate::config::{Config, TranscriptMode};
use crate::error::{Result, TranscriptError};
use crate::filter::keep_snippet;
use crate::models::{CaptionLine, Snippet, TranscriptRequest, TranscriptResponse};
use crate::transcript::TranscriptSource;
use crate::translate::Translator;
use crate::video_id::extract_video_id;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Everything a transcript request needs, built once at startup.
#[derive(Clone)]
pub struct TranscriptService {
    source: Arc<dyn TranscriptSource>,
    translator: Arc<dyn Translator>,
    mode: TranscriptMode,
    languages: Vec<String>,
    default_from_lang: String,
    default_to_lang: String,
}

/// The languages a translating request resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationPlan {
    pub from_lang: String,
    pub to_lang: String,
}

impl TranscriptService {
    pub fn new(source: Arc<dyn TranscriptSource>, translator: Arc<dyn Translator>) -> Self {
        let config = Config::default();
        Self {
            source,
            translator,
            mode: config.mode,
            languages: config.caption_languages(),
            default_from_lang: config.default_from_lang,
            default_to_lang: config.default_to_lang,
        }
    }

    pub fn from_config(
        config: &Config,
        source: Arc<dyn TranscriptSource>,
        translator: Arc<dyn Translator>,
    ) -> Self {
        Self {
            source,
            translator,
            mode: config.mode,
            languages: config.caption_languages(),
            default_from_lang: config.default_from_lang.clone(),
            default_to_lang: config.default_to_lang.clone(),
        }
    }

    pub fn with_mode(mut self, mode: TranscriptMode) -> Self {
        self.mode = mode;
        self
    }

    /// Decide whether a request is translated, and between which languages.
    pub fn plan(&self, req: &TranscriptRequest) -> Option<TranslationPlan> {
        let from_lang = non_blank(req.from_lang.as_deref());
        let to_lang = non_blank(req.to_lang.as_deref());

        let translate = match self.mode {
            TranscriptMode::Fetch => false,
            TranscriptMode::Translate => true,
            TranscriptMode::Auto => from_lang.is_some() || to_lang.is_some(),
        };
        if !translate {
            return None;
        }

        Some(TranslationPlan {
            from_lang: from_lang.unwrap_or(&self.default_from_lang).to_string(),
            to_lang: to_lang.unwrap_or(&self.default_to_lang).to_string(),
        })
    }

    pub async fn process_transcript_request(
        &self,
        req: &TranscriptRequest,
    ) -> Result<TranscriptResponse> {
        let url = req
            .url
            .as_deref()
            .filter(|url| !url.is_empty())
            .ok_or_else(|| TranscriptError::Validation("URL is required".to_string()))?;
        let video_id = extract_video_id(url);

        let response = match self.plan(req) {
            Some(plan) => self.fetch_translated(video_id, &plan).await?,
            None => self.fetch(video_id).await?,
        };
        info!(
            "Served {} snippet(s) for video {}",
            response.snippet_count(),
            response.video_id()
        );
        Ok(response)
    }

    /// Fetch the best caption track among the configured languages and clean it.
    pub async fn fetch(&self, video_id: &str) -> Result<TranscriptResponse> {
        let lines = self.source.fetch(video_id, &self.languages).await?;
        let total = lines.len();
        let snippets: Vec<CaptionLine> = lines
            .into_iter()
            .filter(|line| keep_snippet(&line.text))
            .collect();
        debug!("Kept {} of {} caption line(s)", snippets.len(), total);

        Ok(TranscriptResponse::Fetched {
            video_id: video_id.to_string(),
            snippets,
        })
    }

    /// Fetch the source track and pair each cleaned line with its translation.
    pub async fn fetch_translated(
        &self,
        video_id: &str,
        plan: &TranslationPlan,
    ) -> Result<TranscriptResponse> {
        let source = self.source_lines(video_id, &plan.from_lang).await?;

        let texts: Vec<String> = source.iter().map(|line| line.text.clone()).collect();
        let translated = self
            .translate(&texts, &plan.from_lang, &plan.to_lang)
            .await?;

        let (snippets, translated_snippets): (Vec<Snippet>, Vec<String>) = source
            .iter()
            .zip(translated)
            .filter(|(line, _)| keep_snippet(&line.text))
            .map(|(line, translation)| (Snippet::from(line), translation))
            .unzip();
        debug!("Kept {} of {} caption line(s)", snippets.len(), source.len());

        Ok(TranscriptResponse::Translated {
            video_id: video_id.to_string(),
            snippets,
            translated_snippets,
        })
    }

    /// Lines in `from_lang`: the native track when there is one, otherwise
    /// the first listed track translated into `from_lang`.
    async fn source_lines(&self, video_id: &str, from_lang: &str) -> Result<Vec<CaptionLine>> {
        let list = self.source.list(video_id).await?;
        if let Some(set) = list.get(from_lang) {
            return self.source.fetch_set(video_id, set).await;
        }

        let fallback = list.first()?;
        warn!(
            "Video {} has no {} track, translating from {}",
            video_id, from_lang, fallback.language_code
        );
        let lines = self.source.fetch_set(video_id, fallback).await?;
        let texts: Vec<String> = lines.iter().map(|line| line.text.clone()).collect();
        let translated = self
            .translate(&texts, &fallback.language_code, from_lang)
            .await?;

        Ok(lines
            .into_iter()
            .zip(translated)
            .map(|(line, text)| CaptionLine { text, ..line })
            .collect())
    }

    async fn translate(&self, texts: &[String], from: &str, to: &str) -> Result<Vec<String>> {
        let translated = self.translator.translate_batch(texts, from, to).await?;
        if translated.len() != texts.len() {
            return Err(TranscriptError::Translation(format!(
                "expected {} translation(s) from {} to {}, got {}",
                texts.len(),
                from,
                to,
                translated.len()
            )));
        }
        Ok(translated)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
