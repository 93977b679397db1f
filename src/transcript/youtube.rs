//! Caption retrieval straight from YouTube's watch page and timed-text endpoint.

use crate::error::{Result, TranscriptError};
use crate::models::{CaptionLine, TranscriptSet};
use crate::transcript::{TranscriptList, TranscriptSource};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

pub const DEFAULT_BASE_URL: &str = "https://www.youtube.com";

const CAPTION_TRACKS_KEY: &str = "\"captionTracks\":";

static TEXT_ELEMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<text\b([^>]*?)(?:/>|>(.*?)</text>)").expect("Invalid regex"));
static ATTRIBUTE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(\w+)="([^"]*)""#).expect("Invalid regex"));
static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("Invalid regex"));
static ENTITY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"&(#[xX][0-9a-fA-F]+|#[0-9]+|amp|lt|gt|quot|apos|nbsp);").expect("Invalid regex")
});

pub struct YouTubeTranscripts {
    client: Client,
    base_url: String,
}

impl YouTubeTranscripts {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Point the client at a different host (a proxy or a test server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    async fn get_text(&self, video_id: &str, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT_LANGUAGE, "en-US")
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(TranscriptError::Retrieval {
                video_id: video_id.to_string(),
                message: format!("YouTube responded with {status}"),
            });
        }
        Ok(body)
    }
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct CaptionTrack {
    base_url: String,
    language_code: String,
    #[serde(default)]
    kind: Option<String>,
    #[serde(default)]
    name: Option<TrackName>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct TrackName {
    simple_text: Option<String>,
    #[serde(default)]
    runs: Vec<TrackNameRun>,
}

#[derive(Deserialize, Debug)]
struct TrackNameRun {
    text: String,
}

impl TrackName {
    fn display(&self) -> String {
        match &self.simple_text {
            Some(text) => text.clone(),
            None => self.runs.iter().map(|r| r.text.as_str()).collect(),
        }
    }
}

impl From<CaptionTrack> for TranscriptSet {
    fn from(track: CaptionTrack) -> Self {
        let language = track
            .name
            .as_ref()
            .map(TrackName::display)
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| track.language_code.clone());
        Self {
            is_generated: track.kind.as_deref() == Some("asr"),
            language_code: track.language_code,
            language,
            base_url: track.base_url,
        }
    }
}

/// Find the caption track list embedded in a watch page.
fn parse_caption_tracks(video_id: &str, html: &str) -> Result<Vec<TranscriptSet>> {
    let Some(pos) = html.find(CAPTION_TRACKS_KEY) else {
        if html.contains("class=\"g-recaptcha\"") {
            return Err(TranscriptError::Retrieval {
                video_id: video_id.to_string(),
                message: "YouTube is rate limiting requests from this address".to_string(),
            });
        }
        return Err(TranscriptError::NoTranscript(video_id.to_string()));
    };

    let json = &html[pos + CAPTION_TRACKS_KEY.len()..];
    let tracks = serde_json::Deserializer::from_str(json)
        .into_iter::<Vec<CaptionTrack>>()
        .next()
        .ok_or_else(|| TranscriptError::NoTranscript(video_id.to_string()))??;

    Ok(tracks.into_iter().map(TranscriptSet::from).collect())
}

/// Parse a timed-text XML document into caption lines.
pub fn parse_timed_text(xml: &str) -> Vec<CaptionLine> {
    TEXT_ELEMENT
        .captures_iter(xml)
        .filter_map(|caps| {
            let attrs = caps.get(1).map_or("", |m| m.as_str());
            let raw = caps.get(2).map_or("", |m| m.as_str());
            let text = TAG
                .replace_all(&unescape_entities(&unescape_entities(raw)), "")
                .trim()
                .to_string();
            if text.is_empty() {
                return None;
            }

            let mut start = 0.0;
            let mut duration = 0.0;
            for attr in ATTRIBUTE.captures_iter(attrs) {
                let value = attr[2].parse::<f64>().unwrap_or(0.0);
                match &attr[1] {
                    "start" => start = value,
                    "dur" => duration = value,
                    _ => {}
                }
            }
            Some(CaptionLine {
                text,
                start,
                duration,
            })
        })
        .collect()
}

fn unescape_entities(text: &str) -> String {
    ENTITY
        .replace_all(text, |caps: &regex::Captures| {
            let entity = &caps[1];
            let decoded = match entity {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                "nbsp" => Some('\u{00A0}'),
                _ if entity.starts_with("#x") || entity.starts_with("#X") => {
                    u32::from_str_radix(&entity[2..], 16).ok().and_then(char::from_u32)
                }
                _ => entity[1..].parse::<u32>().ok().and_then(char::from_u32),
            };
            decoded.map_or_else(|| caps[0].to_string(), String::from)
        })
        .into_owned()
}

#[async_trait]
impl TranscriptSource for YouTubeTranscripts {
    async fn list(&self, video_id: &str) -> Result<TranscriptList> {
        let query = serde_urlencoded::to_string([("v", video_id)]).map_err(|e| {
            TranscriptError::Retrieval {
                video_id: video_id.to_string(),
                message: e.to_string(),
            }
        })?;
        let url = format!("{}/watch?{}", self.base_url, query);
        debug!("Listing caption tracks for {video_id}");

        let html = self.get_text(video_id, &url).await?;
        let sets = parse_caption_tracks(video_id, &html)?;
        if sets.is_empty() {
            warn!("Video {video_id} lists an empty caption track array");
        }
        Ok(TranscriptList::from_sets(video_id, sets))
    }

    async fn fetch_set(&self, video_id: &str, set: &TranscriptSet) -> Result<Vec<CaptionLine>> {
        debug!(
            "Fetching {} caption track for {video_id} (generated: {})",
            set.language_code, set.is_generated
        );
        let xml = self.get_text(video_id, &set.base_url).await?;
        Ok(parse_timed_text(&xml))
    }
}
