pub mod youtube;

use crate::error::{Result, TranscriptError};
use crate::models::{CaptionLine, TranscriptSet};
use async_trait::async_trait;

pub use youtube::YouTubeTranscripts;

/// The caption tracks available for one video, in listing order.
///
/// Language codes are unique; the first track registered under a code wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TranscriptList {
    video_id: String,
    sets: Vec<TranscriptSet>,
}

impl TranscriptList {
    pub fn new(video_id: impl Into<String>) -> Self {
        Self {
            video_id: video_id.into(),
            sets: Vec::new(),
        }
    }

    /// Build a list with manually created tracks ahead of auto-generated ones.
    pub fn from_sets(video_id: impl Into<String>, sets: Vec<TranscriptSet>) -> Self {
        let mut list = Self::new(video_id);
        let (manual, generated): (Vec<_>, Vec<_>) =
            sets.into_iter().partition(|s| !s.is_generated);
        for set in manual.into_iter().chain(generated) {
            list.insert(set);
        }
        list
    }

    fn insert(&mut self, set: TranscriptSet) {
        if self.get(&set.language_code).is_none() {
            self.sets.push(set);
        }
    }

    pub fn video_id(&self) -> &str {
        &self.video_id
    }

    pub fn get(&self, language_code: &str) -> Option<&TranscriptSet> {
        self.sets.iter().find(|s| s.language_code == language_code)
    }

    /// First track whose code appears in `languages`, honouring their priority.
    pub fn find(&self, languages: &[String]) -> Result<&TranscriptSet> {
        languages
            .iter()
            .find_map(|code| self.get(code))
            .ok_or_else(|| TranscriptError::Retrieval {
                video_id: self.video_id.clone(),
                message: format!(
                    "no transcript in any of the requested languages {:?} (available: {:?})",
                    languages,
                    self.language_codes()
                ),
            })
    }

    /// The track the listing returns first.
    pub fn first(&self) -> Result<&TranscriptSet> {
        self.sets
            .first()
            .ok_or_else(|| TranscriptError::NoTranscript(self.video_id.clone()))
    }

    pub fn language_codes(&self) -> Vec<&str> {
        self.sets.iter().map(|s| s.language_code.as_str()).collect()
    }
}

#[async_trait]
pub trait TranscriptSource: Send + Sync {
    /// List every caption track the video has.
    async fn list(&self, video_id: &str) -> Result<TranscriptList>;

    /// Download the lines of one listed track.
    async fn fetch_set(&self, video_id: &str, set: &TranscriptSet) -> Result<Vec<CaptionLine>>;

    /// Fetch the first track matching `languages`, in priority order.
    async fn fetch(&self, video_id: &str, languages: &[String]) -> Result<Vec<CaptionLine>> {
        let list = self.list(video_id).await?;
        let set = list.find(languages)?;
        self.fetch_set(video_id, set).await
    }
}
