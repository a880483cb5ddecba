// tests/common/mod.rs
#![allow(dead_code)]

use async_trait::async_trait;
use axum::http::StatusCode;
use axum::Router;
use chrono::Utc;
use mention_digest::ingest::types::{
    FetchOutcome, ProviderId, RecencyWindow, Snippet, SnippetKind, SourceProvider,
};
use mention_digest::notify::{DeliveryError, Notifier};
use mention_digest::report::Report;
use mention_digest::summarize::{GenerationBackend, SummaryResult};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Bind `app` on an ephemeral local port and return its base URL.
pub async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// Answers every request with the next scripted response; counts hits.
pub fn scripted(responses: Vec<(StatusCode, &'static str)>) -> (Router, Arc<AtomicUsize>) {
    let hits = Arc::new(AtomicUsize::new(0));
    let queue = Arc::new(Mutex::new(VecDeque::from(responses)));
    let counter = hits.clone();
    let app = Router::new().fallback(move || {
        let counter = counter.clone();
        let queue = queue.clone();
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            let next = queue.lock().unwrap().pop_front();
            next.unwrap_or((StatusCode::INTERNAL_SERVER_ERROR, "script exhausted"))
        }
    });
    (app, hits)
}

/// Provider returning fixed lines.
pub struct StaticProvider {
    pub name: &'static str,
    pub lines: Vec<&'static str>,
}

#[async_trait]
impl SourceProvider for StaticProvider {
    async fn fetch(&self, window: &RecencyWindow) -> FetchOutcome {
        FetchOutcome::Ok(
            self.lines
                .iter()
                .map(|l| Snippet::live(ProviderId::new(self.name), *l, window.now(), None))
                .collect(),
        )
    }
    fn name(&self) -> &'static str {
        self.name
    }
}

/// Provider that always behaves as if its transport broke.
pub struct BrokenProvider {
    pub name: &'static str,
}

#[async_trait]
impl SourceProvider for BrokenProvider {
    async fn fetch(&self, window: &RecencyWindow) -> FetchOutcome {
        FetchOutcome::degraded(
            vec![Snippet::placeholder(
                ProviderId::new(self.name),
                SnippetKind::Error,
                format!("{} (Error/Simulated): Could not retrieve live news.", self.name),
                window.now(),
            )],
            "connection refused",
        )
    }
    fn name(&self) -> &'static str {
        self.name
    }
}

/// Deterministic backend: tags the output with the prompt's last line.
#[derive(Default)]
pub struct EchoBackend {
    pub prompts: Mutex<Vec<String>>,
}

#[async_trait]
impl GenerationBackend for EchoBackend {
    async fn generate(&self, prompt: &str) -> SummaryResult {
        self.prompts.lock().unwrap().push(prompt.to_string());
        let cue = prompt.lines().last().unwrap_or_default();
        SummaryResult::Generated(format!("generated for {cue} ({} chars)", prompt.len()))
    }
    fn name(&self) -> &'static str {
        "echo"
    }
}

/// Backend that always fails the same way.
pub struct FailingBackend(pub mention_digest::SummaryFailure);

#[async_trait]
impl GenerationBackend for FailingBackend {
    async fn generate(&self, _prompt: &str) -> SummaryResult {
        SummaryResult::Failed(self.0.clone())
    }
    fn name(&self) -> &'static str {
        "failing"
    }
}

/// Replays scripted results in order, then keeps succeeding. Counts calls.
#[derive(Default)]
pub struct ScriptedBackend {
    pub script: Mutex<VecDeque<SummaryResult>>,
    pub calls: AtomicUsize,
}

impl ScriptedBackend {
    pub fn new(script: Vec<SummaryResult>) -> Self {
        Self {
            script: Mutex::new(VecDeque::from(script)),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl GenerationBackend for ScriptedBackend {
    async fn generate(&self, _prompt: &str) -> SummaryResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self.script.lock().unwrap().pop_front();
        next.unwrap_or_else(|| SummaryResult::Generated("recovered".into()))
    }
    fn name(&self) -> &'static str {
        "scripted"
    }
}

#[derive(Clone, Default)]
pub struct RecordingNotifier {
    pub sent: Arc<Mutex<Vec<Report>>>,
    pub fail_auth: bool,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, report: &Report) -> Result<(), DeliveryError> {
        if self.fail_auth {
            return Err(DeliveryError::Authentication("535 5.7.8 bad credentials".into()));
        }
        self.sent.lock().unwrap().push(report.clone());
        Ok(())
    }
    fn name(&self) -> &'static str {
        "recording"
    }
}

pub fn fixed_now() -> chrono::DateTime<Utc> {
    use chrono::TimeZone;
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}
