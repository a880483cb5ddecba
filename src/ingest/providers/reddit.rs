// src/ingest/providers/reddit.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use metrics::counter;
use serde::Deserialize;
use std::time::Duration;

use crate::config::{RedditCredentials, RedditSettings};
use crate::ingest::normalize_text;
use crate::ingest::types::{
    FetchOutcome, ProviderId, RecencyWindow, Snippet, SnippetKind, SourceProvider,
};

const SIMULATED: [&str; 2] = [
    "Reddit (Simulated): Patrick Rothfuss mentioned a new draft in a rare comment.",
    "Reddit (Simulated): Fan theory about the Chandrian's true motives gained traction.",
];
const ERROR_PLACEHOLDER: &str = "Reddit (Error/Simulated): Could not retrieve live Reddit news.";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    #[serde(default)]
    children: Vec<Child>,
}

#[derive(Debug, Deserialize)]
struct Child {
    data: Submission,
}

#[derive(Debug, Deserialize)]
struct Submission {
    title: String,
    #[serde(default)]
    url: Option<String>,
    created_utc: f64,
}

/// `created_utc` is fractional epoch seconds; keep the sub-second part so
/// items right at the window start are not pushed outside it.
fn created_at(created_utc: f64) -> Option<DateTime<Utc>> {
    if !created_utc.is_finite() {
        return None;
    }
    let secs = created_utc.floor();
    let nanos = ((created_utc - secs) * 1e9).round().min(999_999_999.0) as u32;
    DateTime::<Utc>::from_timestamp(secs as i64, nanos)
}

/// Newest submissions from a set of subreddits, app-only OAuth.
pub struct RedditProvider {
    http: reqwest::Client,
    creds: Option<RedditCredentials>,
    cfg: RedditSettings,
}

impl RedditProvider {
    /// `creds == None` means the capability is missing; `fetch` then serves
    /// the simulated placeholders without touching the network.
    pub fn new(cfg: RedditSettings, creds: Option<RedditCredentials>) -> Result<Self> {
        let ua = creds
            .as_ref()
            .map(|c| c.user_agent.clone())
            .unwrap_or_else(|| "mention-digest/0.1".to_string());
        let http = reqwest::Client::builder()
            .user_agent(ua)
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .context("building reddit http client")?;
        Ok(Self { http, creds, cfg })
    }

    fn simulated(at: DateTime<Utc>) -> Vec<Snippet> {
        SIMULATED
            .iter()
            .map(|t| Snippet::placeholder(ProviderId::REDDIT, SnippetKind::Simulated, *t, at))
            .collect()
    }

    async fn access_token(&self, creds: &RedditCredentials) -> Result<String> {
        let url = format!("{}/api/v1/access_token", self.cfg.auth_base);
        let tok: TokenResponse = self
            .http
            .post(url)
            .basic_auth(&creds.client_id, Some(&creds.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .context("reddit token request")?
            .error_for_status()
            .context("reddit token non-2xx")?
            .json()
            .await
            .context("reddit token body")?;
        Ok(tok.access_token)
    }

    async fn newest(&self, token: &str, sub: &str, window: &RecencyWindow) -> Result<Vec<Snippet>> {
        let url = format!("{}/r/{}/new", self.cfg.api_base, sub);
        let listing: Listing = self
            .http
            .get(url)
            .bearer_auth(token)
            .query(&[("limit", self.cfg.limit)])
            .send()
            .await
            .with_context(|| format!("reddit listing r/{sub}"))?
            .error_for_status()
            .with_context(|| format!("reddit listing r/{sub} non-2xx"))?
            .json()
            .await
            .with_context(|| format!("reddit listing r/{sub} body"))?;

        let mut out = Vec::new();
        for child in listing.data.children {
            let post = child.data;
            let Some(created) = created_at(post.created_utc) else {
                continue;
            };
            if !window.contains(created) {
                continue;
            }
            let title = normalize_text(&post.title);
            let url = post.url.map(|u| html_escape::decode_html_entities(&u).to_string());
            let text = format!(
                "Reddit ({sub}): {title} - {}",
                url.as_deref().unwrap_or_default()
            );
            out.push(Snippet::live(ProviderId::REDDIT, text, created, url));
        }
        Ok(out)
    }

    async fn fetch_live(&self, creds: &RedditCredentials, window: &RecencyWindow) -> Result<Vec<Snippet>> {
        let token = self.access_token(creds).await?;
        let mut out = Vec::new();
        for sub in &self.cfg.subreddits {
            let mut got = self.newest(&token, sub, window).await?;
            tracing::debug!(target: "ingest", subreddit = %sub, kept = got.len(), "reddit listing");
            out.append(&mut got);
        }
        Ok(out)
    }
}

#[async_trait]
impl SourceProvider for RedditProvider {
    async fn fetch(&self, window: &RecencyWindow) -> FetchOutcome {
        let Some(creds) = &self.creds else {
            tracing::info!(target: "ingest", "reddit credentials not configured, using simulated posts");
            return FetchOutcome::degraded(
                Self::simulated(window.now()),
                "reddit client unavailable",
            );
        };

        match self.fetch_live(creds, window).await {
            Ok(v) => FetchOutcome::Ok(v),
            Err(e) => {
                tracing::warn!(error = ?e, provider = "Reddit", "provider error");
                counter!("ingest_provider_errors_total").increment(1);
                FetchOutcome::degraded(
                    vec![Snippet::placeholder(
                        ProviderId::REDDIT,
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
        "Reddit"
    }

    fn available(&self) -> bool {
        self.creds.is_some()
    }
}
