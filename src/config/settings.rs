// src/config/settings.rs
use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const ENV_CONFIG_PATH: &str = "DIGEST_CONFIG_PATH";
pub const DEFAULT_CONFIG_PATH: &str = "config/digest.toml";

fn default_topic() -> String {
    "The Doors of Stone".to_string()
}
fn default_title() -> String {
    "Doors of Stone".to_string()
}
fn default_window_hours() -> i64 {
    24
}

/// Static tunables for one run. Credentials live in [`super::Credentials`].
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Quoted in prompts and the greeting, e.g. `'The Doors of Stone'`.
    pub topic: String,
    /// Short name for the subject line and signature.
    pub title: String,
    pub window_hours: i64,
    /// Fixed persona; random when absent or unknown.
    pub persona: Option<String>,
    pub reddit: RedditSettings,
    pub twitter: TwitterSettings,
    pub gemini: GeminiSettings,
    pub smtp: SmtpSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            topic: default_topic(),
            title: default_title(),
            window_hours: default_window_hours(),
            persona: None,
            reddit: RedditSettings::default(),
            twitter: TwitterSettings::default(),
            gemini: GeminiSettings::default(),
            smtp: SmtpSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct RedditSettings {
    pub subreddits: Vec<String>,
    pub limit: u32,
    pub auth_base: String,
    pub api_base: String,
    pub timeout_secs: u64,
}

impl Default for RedditSettings {
    fn default() -> Self {
        Self {
            subreddits: vec!["KingkillerChronicle".to_string()],
            limit: 20,
            auth_base: "https://www.reddit.com".to_string(),
            api_base: "https://oauth.reddit.com".to_string(),
            timeout_secs: 15,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct TwitterSettings {
    pub terms: Vec<String>,
    pub max_results: u32,
    pub api_base: String,
    pub timeout_secs: u64,
}

impl Default for TwitterSettings {
    fn default() -> Self {
        Self {
            terms: vec![
                "#DoorsOfStone".to_string(),
                "#KingkillerChronicle".to_string(),
                "@PatrickRothfuss".to_string(),
            ],
            max_results: 10,
            api_base: "https://api.twitter.com".to_string(),
            timeout_secs: 15,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct GeminiSettings {
    pub model: String,
    pub base_url: String,
    pub timeout_secs: u64,
    /// Extra summary attempts, on transport failures only.
    pub max_retries: u32,
}

impl Default for GeminiSettings {
    fn default() -> Self {
        Self {
            model: "gemini-2.0-flash".to_string(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            timeout_secs: 30,
            max_retries: 1,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub timeout_secs: u64,
}

impl Default for SmtpSettings {
    fn default() -> Self {
        Self {
            host: "smtp.gmail.com".to_string(),
            port: 587,
            timeout_secs: 30,
        }
    }
}

impl Settings {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let cfg: Settings = toml::from_str(s).context("parsing digest settings toml")?;
        cfg.validated()
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading settings from {}", path.display()))?;
        Self::from_toml_str(&content)
    }

    /// 1) $DIGEST_CONFIG_PATH (must exist)
    /// 2) config/digest.toml
    /// 3) built-in defaults
    pub fn load_default() -> Result<Self> {
        if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if !pb.exists() {
                return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path"));
            }
            return Self::load_from(&pb);
        }
        let fallback = PathBuf::from(DEFAULT_CONFIG_PATH);
        if fallback.exists() {
            return Self::load_from(&fallback);
        }
        Ok(Self::default())
    }

    fn validated(mut self) -> Result<Self> {
        if self.window_hours <= 0 {
            anyhow::bail!("window_hours must be positive, got {}", self.window_hours);
        }
        self.reddit.subreddits.retain(|s| !s.trim().is_empty());
        self.twitter.terms.retain(|s| !s.trim().is_empty());
        // The recent-search endpoint rejects anything outside 10..=100.
        self.twitter.max_results = self.twitter.max_results.clamp(10, 100);
        self.reddit.limit = self.reddit.limit.clamp(1, 100);
        if self.topic.trim().is_empty() {
            self.topic = default_topic();
        }
        if self.title.trim().is_empty() {
            self.title = default_title();
        }
        if self.persona.as_deref().is_some_and(|p| p.trim().is_empty()) {
            self.persona = None;
        }
        Ok(self)
    }

    pub fn window(&self) -> chrono::Duration {
        chrono::Duration::hours(self.window_hours)
    }
}
