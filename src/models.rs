use serde::{Deserialize, Serialize};

/// One timed line of a caption track, as returned by the retrieval service.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CaptionLine {
    pub text: String,
    pub start: f64,
    pub duration: f64,
}

/// Metadata for one caption track available on a video.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TranscriptSet {
    pub language_code: String,
    pub language: String,
    pub is_generated: bool,
    /// Where the retrieval service can download this track from.
    #[serde(skip)]
    pub base_url: String,
}

/// A cleaned caption line in translation responses.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Snippet {
    pub source: String,
    pub start: f64,
    pub duration: f64,
}

impl From<&CaptionLine> for Snippet {
    fn from(line: &CaptionLine) -> Self {
        Self {
            source: line.text.clone(),
            start: line.start,
            duration: line.duration,
        }
    }
}

#[derive(Deserialize, Debug, Default)]
pub struct TranscriptRequest {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub from_lang: Option<String>,
    #[serde(default)]
    pub to_lang: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum TranscriptResponse {
    Translated {
        video_id: String,
        snippets: Vec<Snippet>,
        translated_snippets: Vec<String>,
    },
    Fetched {
        video_id: String,
        snippets: Vec<CaptionLine>,
    },
}

impl TranscriptResponse {
    pub fn video_id(&self) -> &str {
        match self {
            TranscriptResponse::Translated { video_id, .. } => video_id,
            TranscriptResponse::Fetched { video_id, .. } => video_id,
        }
    }

    pub fn snippet_count(&self) -> usize {
        match self {
            TranscriptResponse::Translated { snippets, .. } => snippets.len(),
            TranscriptResponse::Fetched { snippets, .. } => snippets.len(),
        }
    }
}
