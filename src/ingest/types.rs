// src/ingest/types.rs
use chrono::{DateTime, Duration, Utc};
use std::fmt;

/// Identifies the feed a snippet came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProviderId(&'static str);

impl ProviderId {
    pub const REDDIT: ProviderId = ProviderId("Reddit");
    pub const TWITTER: ProviderId = ProviderId("Twitter");

    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Whether a snippet carries live data or stands in for a missing/broken feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnippetKind {
    Live,
    Simulated,
    Error,
}

/// One normalized line of fetched content. `text` is the fully rendered
/// corpus line (e.g. `Reddit (sub): title - url`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snippet {
    pub source: ProviderId,
    pub text: String,
    pub origin_timestamp: DateTime<Utc>,
    pub url: Option<String>,
    pub kind: SnippetKind,
}

impl Snippet {
    pub fn live(
        source: ProviderId,
        text: impl Into<String>,
        origin_timestamp: DateTime<Utc>,
        url: Option<String>,
    ) -> Self {
        Self {
            source,
            text: text.into(),
            origin_timestamp,
            url,
            kind: SnippetKind::Live,
        }
    }

    pub fn placeholder(
        source: ProviderId,
        kind: SnippetKind,
        text: impl Into<String>,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            source,
            text: text.into(),
            origin_timestamp: at,
            url: None,
            kind,
        }
    }
}

/// Trailing time window, anchored at a fixed `now` so every adapter in one
/// run sees the same bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecencyWindow {
    now: DateTime<Utc>,
    length: Duration,
}

impl RecencyWindow {
    pub fn new(now: DateTime<Utc>, length: Duration) -> Self {
        Self { now, length }
    }

    /// The usual 24h window ending at `now`.
    pub fn last_day(now: DateTime<Utc>) -> Self {
        Self::new(now, Duration::hours(24))
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.now - self.length
    }

    /// Inclusive lower bound; items stamped after `now` (clock skew) are kept.
    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        ts >= self.start()
    }
}

/// What an adapter hands back. `Degraded` means the snippets are filler
/// (simulated or error placeholders, possibly none) and says why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Ok(Vec<Snippet>),
    Degraded {
        snippets: Vec<Snippet>,
        reason: String,
    },
}

impl FetchOutcome {
    pub fn degraded(snippets: Vec<Snippet>, reason: impl Into<String>) -> Self {
        Self::Degraded {
            snippets,
            reason: reason.into(),
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded { .. })
    }

    pub fn snippets(&self) -> &[Snippet] {
        match self {
            Self::Ok(v) => v,
            Self::Degraded { snippets, .. } => snippets,
        }
    }

    pub fn into_snippets(self) -> Vec<Snippet> {
        match self {
            Self::Ok(v) => v,
            Self::Degraded { snippets, .. } => snippets,
        }
    }
}

/// A feed adapter. `fetch` must not fail: transport, auth and parse errors
/// are turned into a `FetchOutcome::Degraded` inside the adapter.
#[async_trait::async_trait]
pub trait SourceProvider: Send + Sync {
    async fn fetch(&self, window: &RecencyWindow) -> FetchOutcome;
    fn name(&self) -> &'static str;
    /// Capability flag, resolved when the adapter is built.
    fn available(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn window_boundary_is_inclusive_at_start() {
        let now = Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap();
        let w = RecencyWindow::last_day(now);
        assert!(!w.contains(now - Duration::hours(24) - Duration::seconds(1)));
        assert!(w.contains(now - Duration::hours(24)));
        assert!(w.contains(now - Duration::hours(23) - Duration::minutes(59)));
        assert!(w.contains(now + Duration::seconds(5)));
    }

    #[test]
    fn degraded_outcome_keeps_placeholders() {
        let now = Utc::now();
        let out = FetchOutcome::degraded(
            vec![Snippet::placeholder(
                ProviderId::REDDIT,
                SnippetKind::Error,
                "Reddit (Error/Simulated): x",
                now,
            )],
            "boom",
        );
        assert!(out.is_degraded());
        assert_eq!(out.snippets().len(), 1);
        assert_eq!(out.into_snippets()[0].kind, SnippetKind::Error);
    }
}
