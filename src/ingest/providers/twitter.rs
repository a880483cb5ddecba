// src/ingest/providers/twitter.rs
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use metrics::counter;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;

use crate::config::TwitterSettings;
use crate::ingest::normalize_text;
use crate::ingest::types::{
    FetchOutcome, ProviderId, RecencyWindow, Snippet, SnippetKind, SourceProvider,
};

const ERROR_PLACEHOLDER: &str = "Twitter (Error/Simulated): Could not retrieve live Twitter news.";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Option<Vec<Tweet>>,
}

#[derive(Debug, Deserialize)]
struct Tweet {
    #[allow(dead_code)]
    id: String,
    text: String,
    author_id: Option<String>,
    created_at: Option<String>,
}

/// Recent-search over a fixed set of hashtag/mention terms.
pub struct TwitterProvider {
    http: reqwest::Client,
    bearer_token: Option<String>,
    cfg: TwitterSettings,
}

impl TwitterProvider {
    pub fn new(cfg: TwitterSettings, bearer_token: Option<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent("mention-digest/0.1")
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .context("building twitter http client")?;
        Ok(Self {
            http,
            bearer_token,
            cfg,
        })
    }

    /// Terms OR-ed into a single query, e.g. `#A OR #B OR @c`.
    pub fn query(&self) -> String {
        self.cfg.terms.join(" OR ")
    }

    /// `YYYY-MM-DDTHH:MM:SSZ`, the only shape the API accepts for `start_time`.
    pub fn start_time(window: &RecencyWindow) -> String {
        window.start().format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }

    async fn fetch_live(&self, token: &str, window: &RecencyWindow) -> Result<Vec<Snippet>> {
        let url = format!("{}/2/tweets/search/recent", self.cfg.api_base);
        let max_results = self.cfg.max_results.clamp(10, 100).to_string();
        let resp = self
            .http
            .get(url)
            .bearer_auth(token)
            .query(&[
                ("query", self.query()),
                ("tweet.fields", "created_at,author_id".to_string()),
                ("start_time", Self::start_time(window)),
                ("max_results", max_results),
            ])
            .send()
            .await
            .context("twitter search request")?;

        let status = resp.status();
        if !status.is_success() {
            if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
                tracing::warn!(
                    provider = "Twitter",
                    %status,
                    "check TWITTER_BEARER_TOKEN and the developer app's access level"
                );
            }
            let body = resp.text().await.unwrap_or_default();
            return Err(anyhow!("twitter search returned {status}: {body}"));
        }

        let parsed: SearchResponse = resp.json().await.context("twitter search body")?;
        let Some(tweets) = parsed.data else {
            tracing::info!(target: "ingest", "no recent tweets matched the query");
            return Ok(Vec::new());
        };

        let mut out = Vec::with_capacity(tweets.len());
        for t in tweets {
            let created = t
                .created_at
                .as_deref()
                .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
                .map(|dt| dt.with_timezone(&Utc));
            // The server already bounds by start_time; this only guards against
            // stray items when it doesn't.
            if created.is_some_and(|ts| !window.contains(ts)) {
                continue;
            }
            let text = format!(
                "Twitter: {}: {} (Created: {})",
                t.author_id.as_deref().unwrap_or("unknown"),
                normalize_text(&t.text),
                t.created_at.as_deref().unwrap_or("unknown"),
            );
            out.push(Snippet::live(
                ProviderId::TWITTER,
                text,
                created.unwrap_or_else(|| window.now()),
                None,
            ));
        }
        Ok(out)
    }
}

#[async_trait]
impl SourceProvider for TwitterProvider {
    async fn fetch(&self, window: &RecencyWindow) -> FetchOutcome {
        let Some(token) = &self.bearer_token else {
            tracing::info!(target: "ingest", "twitter bearer token not configured, skipping");
            return FetchOutcome::degraded(Vec::new(), "twitter client unavailable");
        };

        match self.fetch_live(token, window).await {
            Ok(v) => FetchOutcome::Ok(v),
            Err(e) => {
                tracing::warn!(error = ?e, provider = "Twitter", "provider error");
                counter!("ingest_provider_errors_total").increment(1);
                FetchOutcome::degraded(
                    vec![Snippet::placeholder(
                        ProviderId::TWITTER,
                        SnippetKind::Error,
                        ERROR_PLACEHOLDER,
                        window.now(),
                    )],
                    format!("{e:#}"),
                )
            }
        }
    }

    fn name(&self) -> &'static str {
        "Twitter"
    }

    fn available(&self) -> bool {
        self.bearer_token.is_some()
    }
}
