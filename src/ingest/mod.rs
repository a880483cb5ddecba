// src/ingest/mod.rs
pub mod providers;
pub mod types;

use crate::ingest::types::{FetchOutcome, RecencyWindow, Snippet, SourceProvider};
use metrics::counter;
use once_cell::sync::OnceCell;

/// Rendered in place of an empty corpus.
pub const NO_UPDATES: &str = "No new updates found today.";

const MAX_TEXT_CHARS: usize = 1500;

/// Normalize feed text: strip tags, decode entities, fold whitespace, cap length.
/// Tags go before decoding so escaped brackets (`&lt;..&gt;`) survive as text.
pub fn normalize_text(s: &str) -> String {
    let mut out = s.to_string();

    static RE_TAGS: OnceCell<Option<regex::Regex>> = OnceCell::new();
    if let Some(re) = RE_TAGS.get_or_init(|| regex::Regex::new(r"(?is)</?[a-z][^>]*>").ok()) {
        out = re.replace_all(&out, "").to_string();
    }
    out = html_escape::decode_html_entities(&out).to_string();

    static RE_WS: OnceCell<Option<regex::Regex>> = OnceCell::new();
    if let Some(re) = RE_WS.get_or_init(|| regex::Regex::new(r"\s+").ok()) {
        out = re.replace_all(&out, " ").to_string();
    }
    out = out.trim().to_string();

    if out.chars().count() > MAX_TEXT_CHARS {
        out = out.chars().take(MAX_TEXT_CHARS).collect();
    }
    out
}

/// A provider that came back degraded during aggregation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Degradation {
    pub provider: &'static str,
    pub reason: String,
}

/// All snippets of one run plus their rendered text. Built once, read-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Corpus {
    snippets: Vec<Snippet>,
    degraded: Vec<Degradation>,
    text: String,
}

impl Corpus {
    pub fn from_snippets(snippets: Vec<Snippet>) -> Self {
        Self::with_degradations(snippets, Vec::new())
    }

    fn with_degradations(snippets: Vec<Snippet>, degraded: Vec<Degradation>) -> Self {
        let text = if snippets.is_empty() {
            NO_UPDATES.to_string()
        } else {
            snippets
                .iter()
                .map(|s| s.text.as_str())
                .collect::<Vec<_>>()
                .join("\n")
        };
        Self {
            snippets,
            degraded,
            text,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn snippets(&self) -> &[Snippet] {
        &self.snippets
    }

    pub fn degraded(&self) -> &[Degradation] {
        &self.degraded
    }

    pub fn is_empty(&self) -> bool {
        self.snippets.is_empty()
    }
}

/// Fetch from every provider in registration order and concatenate.
/// No retries here; each adapter owns its own failure handling.
pub async fn compile_all(
    providers: &[Box<dyn SourceProvider>],
    window: &RecencyWindow,
) -> Corpus {
    let mut all = Vec::new();
    let mut degraded = Vec::new();

    for p in providers {
        let outcome = p.fetch(window).await;
        if let FetchOutcome::Degraded { reason, snippets } = &outcome {
            tracing::warn!(
                target: "ingest",
                provider = p.name(),
                placeholders = snippets.len(),
                reason = %reason,
                "provider degraded"
            );
            counter!("ingest_degraded_total").increment(1);
            degraded.push(Degradation {
                provider: p.name(),
                reason: reason.clone(),
            });
        }
        let mut got = outcome.into_snippets();
        tracing::info!(target: "ingest", provider = p.name(), snippets = got.len(), "provider done");
        counter!("ingest_snippets_total").increment(got.len() as u64);
        all.append(&mut got);
    }

    Corpus::with_degradations(all, degraded)
}
