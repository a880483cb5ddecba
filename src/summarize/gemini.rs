// src/summarize/gemini.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{GenerationBackend, SummaryFailure, SummaryResult};
use crate::config::GeminiSettings;

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Serialize)]
struct RequestContent<'a> {
    role: &'a str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<ResponseContent>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

/// Pull `candidates[0].content.parts[0].text` out of a response body.
pub fn extract_text(body: &str) -> Result<String, SummaryFailure> {
    let resp: GenerateResponse =
        serde_json::from_str(body).map_err(|e| SummaryFailure::Decode(e.to_string()))?;
    resp.candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .and_then(|c| c.parts.into_iter().next())
        .and_then(|p| p.text)
        .ok_or_else(|| {
            tracing::warn!(body = %truncate(body, 300), "unexpected gemini response structure");
            SummaryFailure::MalformedShape
        })
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(max).collect();
        out.push_str("...");
        out
    }
}

/// `generateContent` over HTTPS, API key as query parameter. One request per
/// `generate` call.
pub struct GeminiBackend {
    http: reqwest::Client,
    api_key: Option<String>,
    endpoint: String,
}

impl GeminiBackend {
    pub fn new(cfg: &GeminiSettings, api_key: Option<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent("mention-digest/0.1")
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .context("building gemini http client")?;
        let endpoint = format!(
            "{}/v1beta/models/{}:generateContent",
            cfg.base_url.trim_end_matches('/'),
            cfg.model
        );
        Ok(Self {
            http,
            api_key,
            endpoint,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn attempt(&self, key: &str, prompt: &str) -> Result<String, SummaryFailure> {
        let body = GenerateRequest {
            contents: vec![RequestContent {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        // without_url(): the URL carries the API key.
        let resp = self
            .http
            .post(&self.endpoint)
            .query(&[("key", key)])
            .json(&body)
            .send()
            .await
            .map_err(|e| SummaryFailure::Transport(e.without_url().to_string()))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| SummaryFailure::Transport(e.without_url().to_string()))?;

        if !status.is_success() {
            return Err(SummaryFailure::HttpStatus {
                status: status.as_u16(),
                detail: truncate(&text, 200),
            });
        }
        extract_text(&text)
    }
}

#[async_trait]
impl GenerationBackend for GeminiBackend {
    async fn generate(&self, prompt: &str) -> SummaryResult {
        let Some(key) = self.api_key.as_deref() else {
            return SummaryResult::Failed(SummaryFailure::MissingApiKey);
        };

        match self.attempt(key, prompt).await {
            Ok(text) => SummaryResult::Generated(text),
            Err(f) => SummaryResult::Failed(f),
        }
    }

    fn name(&self) -> &'static str {
        "gemini"
    }
}
