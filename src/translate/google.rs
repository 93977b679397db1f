//! Translation through Google's public `translate_a/single` endpoint.

use crate::error::{Result, TranscriptError};
use crate::translate::Translator;
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://translate.googleapis.com";

/// Translator backed by Google Translate, one request per text.
pub struct GoogleTranslator {
    client: Client,
    base_url: String,
}

impl GoogleTranslator {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    async fn translate_one(&self, text: &str, source_lang: &str, target_lang: &str) -> Result<String> {
        let query = serde_urlencoded::to_string([
            ("client", "gtx"),
            ("sl", source_lang),
            ("tl", target_lang),
            ("dt", "t"),
            ("q", text),
        ])
        .map_err(|e| TranscriptError::Translation(e.to_string()))?;
        let url = format!("{}/translate_a/single?{}", self.base_url, query);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        let body: Bytes = response.bytes().await?;

        if !status.is_success() {
            return Err(TranscriptError::Translation(format!(
                "{source_lang} -> {target_lang} rejected ({status}): {}",
                String::from_utf8_lossy(&body)
            )));
        }

        parse_translation(&serde_json::from_slice::<Value>(&body)?)
    }
}

/// Join the translated segments of a `translate_a/single` response.
///
/// The payload looks like `[[["Hola","Hello",...],["mundo","world",...]],null,"en",...]`.
fn parse_translation(payload: &Value) -> Result<String> {
    let segments = payload
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| TranscriptError::Translation("unexpected response shape".to_string()))?;

    Ok(segments
        .iter()
        .filter_map(|segment| segment.get(0).and_then(Value::as_str))
        .collect())
}

#[async_trait]
impl Translator for GoogleTranslator {
    async fn translate_batch(
        &self,
        texts: &[String],
        source_lang: &str,
        target_lang: &str,
    ) -> Result<Vec<String>> {
        if texts.is_empty() || source_lang == target_lang {
            return Ok(texts.to_vec());
        }

        debug!(
            "Translating {} text(s) from {} to {}",
            texts.len(),
            source_lang,
            target_lang
        );

        let mut results = Vec::with_capacity(texts.len());
        for text in texts {
            if text.trim().is_empty() {
                results.push(text.clone());
                continue;
            }
            results.push(self.translate_one(text, source_lang, target_lang).await?);
        }
        Ok(results)
    }
}
