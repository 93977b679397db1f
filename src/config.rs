use crate::{transcript, translate};
use anyhow::{bail, Result};
use clap::{Parser, ValueEnum};
use std::net::SocketAddr;
use std::time::Duration;

/// Which orchestration path `POST /api/transcript` runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum TranscriptMode {
    /// Translate only when the request names `from_lang` or `to_lang`.
    #[default]
    Auto,
    /// Never translate.
    Fetch,
    /// Always translate, using the default languages when the request names none.
    Translate,
}

#[derive(Parser, Debug, Clone)]
#[command(name = "subtitle-bridge")]
#[command(version, about = "Serve cleaned, optionally translated YouTube transcripts over HTTP")]
pub struct Config {
    /// Interface to listen on
    #[arg(long, env = "TRANSCRIPT_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "TRANSCRIPT_PORT", default_value_t = 5000)]
    pub port: u16,

    /// Enable debug logging
    #[arg(short, long, env = "TRANSCRIPT_DEBUG")]
    pub debug: bool,

    /// Whether requests are translated
    #[arg(long, value_enum, default_value_t = TranscriptMode::Auto)]
    pub mode: TranscriptMode,

    /// Caption languages to try, in priority order, when not translating
    #[arg(long, value_delimiter = ',', default_value = "en,es")]
    pub languages: Vec<String>,

    /// Source language used when a translating request names none
    #[arg(long, default_value = "en")]
    pub default_from_lang: String,

    /// Target language used when a translating request names none
    #[arg(long, default_value = "es")]
    pub default_to_lang: String,

    /// Base URL of the caption host
    #[arg(long, default_value = transcript::youtube::DEFAULT_BASE_URL)]
    pub youtube_base_url: String,

    /// Base URL of the translation host
    #[arg(long, default_value = translate::google::DEFAULT_BASE_URL)]
    pub translate_base_url: String,

    /// Timeout for each upstream HTTP request, in seconds
    #[arg(long, default_value_t = 30)]
    pub upstream_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            debug: false,
            mode: TranscriptMode::default(),
            languages: vec!["en".to_string(), "es".to_string()],
            default_from_lang: "en".to_string(),
            default_to_lang: "es".to_string(),
            youtube_base_url: transcript::youtube::DEFAULT_BASE_URL.to_string(),
            translate_base_url: translate::google::DEFAULT_BASE_URL.to_string(),
            upstream_timeout_secs: 30,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.languages.iter().all(|l| l.trim().is_empty()) {
            bail!("At least one caption language must be configured");
        }
        if self.default_from_lang.trim().is_empty() || self.default_to_lang.trim().is_empty() {
            bail!("Default translation languages must not be empty");
        }
        if self.upstream_timeout_secs == 0 {
            bail!("Upstream timeout must be greater than 0");
        }
        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_secs)
    }

    /// Configured caption languages with blanks removed.
    pub fn caption_languages(&self) -> Vec<String> {
        self.languages
            .iter()
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty())
            .collect()
    }
}
