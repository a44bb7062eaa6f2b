//! Configuration management for telegrab.
//!
//! Settings come from an optional TOML file with environment overrides for
//! secrets; every field has a default so the tool runs with no config file
//! at all.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Browser-like user agent sent to the preview host and the media CDN.
pub const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36";

/// Settings for the scrape pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrapeSettings {
    /// User-Agent header for preview page requests.
    pub user_agent: String,
    /// Accept-Language header for preview page requests.
    pub accept_language: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Pages fetched per channel scrape unless overridden on the call.
    pub default_pages: usize,
}

impl Default for ScrapeSettings {
    fn default() -> Self {
        Self {
            user_agent: BROWSER_USER_AGENT.to_string(),
            accept_language: "en-US,en;q=0.9".to_string(),
            timeout_secs: 15,
            default_pages: 3,
        }
    }
}

/// Delivery-platform length ceilings and summary limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitSettings {
    /// Plain message body ceiling, in characters.
    pub message_len: usize,
    /// Media caption ceiling, in characters.
    pub caption_len: usize,
    /// Maximum posts rendered into one summary.
    pub summary_posts: usize,
}

impl Default for LimitSettings {
    fn default() -> Self {
        Self {
            message_len: 4096,
            caption_len: 1024,
            summary_posts: 20,
        }
    }
}

/// Media download behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaSettings {
    /// Photo download timeout in seconds.
    pub photo_timeout_secs: u64,
    /// Video download timeout in seconds.
    pub video_timeout_secs: u64,
    /// Maximum accepted video size in bytes.
    pub video_max_bytes: u64,
}

impl Default for MediaSettings {
    fn default() -> Self {
        Self {
            photo_timeout_secs: 30,
            video_timeout_secs: 60,
            video_max_bytes: 50 * 1024 * 1024,
        }
    }
}

/// Rewrite service settings (Ollama-compatible API).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    /// API endpoint base URL.
    pub endpoint: String,
    /// Default model identifier.
    pub model: String,
    pub temperature: f32,
    /// Whole-request timeout in seconds.
    pub timeout_secs: u64,
    /// API key; populated from `OLLAMA_API_KEY` when unset in the file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Instruction used when the caller supplies none.
    pub default_instruction: String,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://ollama.com".to_string(),
            model: "gpt-oss:120b-cloud".to_string(),
            temperature: 1.0,
            timeout_secs: 120,
            api_key: None,
            default_instruction: "Rewrite the post in plain language. Output only the rewritten \
                                  text, without Markdown formatting, headers, or extra symbols, \
                                  but keep paragraph breaks."
                .to_string(),
        }
    }
}

/// Health endpoint server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self { port: 8080 }
    }
}

/// Top-level settings tree.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub scrape: ScrapeSettings,
    pub limits: LimitSettings,
    pub media: MediaSettings,
    pub llm: LlmSettings,
    pub server: ServerSettings,
}

/// Load settings from an optional TOML file, then apply environment
/// overrides. A missing file is not an error; a malformed one is.
pub fn load_settings(path: Option<&Path>) -> anyhow::Result<Settings> {
    let mut settings = match path {
        Some(path) if path.exists() => {
            let raw = fs::read_to_string(path)?;
            toml::from_str(&raw)?
        }
        _ => Settings::default(),
    };

    if settings.llm.api_key.is_none() {
        settings.llm.api_key = std::env::var("OLLAMA_API_KEY").ok().filter(|k| !k.is_empty());
    }

    Ok(settings)
}
