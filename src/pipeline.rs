// src/pipeline.rs
//! One aggregation pass: providers -> corpus -> two summaries -> report -> notifier.

use anyhow::Result;
use chrono::{DateTime, Utc};
use std::time::Duration;
use rand::Rng;
use tracing::{info, warn};

use crate::config::{Credentials, Settings};
use crate::ingest::providers::{RedditProvider, TwitterProvider};
use crate::ingest::types::{RecencyWindow, SourceProvider};
use crate::ingest::{compile_all, Corpus};
use crate::notify::{deliver, EmailNotifier, LogNotifier, Notifier};
use crate::report::{Report, ReportComposer};
use crate::summarize::{GeminiBackend, GenerationBackend, PersonaTable};

/// Base delay before a summary retry; doubles per attempt.
const RETRY_BACKOFF: Duration = Duration::from_millis(500);

/// Everything a run needs. Holds no state between runs.
pub struct Pipeline {
    pub settings: Settings,
    pub providers: Vec<Box<dyn SourceProvider>>,
    pub backend: Box<dyn GenerationBackend>,
    pub notifier: Box<dyn Notifier>,
    pub personas: PersonaTable,
}

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub corpus: Corpus,
    pub persona: &'static str,
    pub report: Report,
    pub delivered: bool,
}

impl Pipeline {
    /// Wire the production adapters. Reddit is registered before Twitter,
    /// which fixes their order in the corpus.
    pub fn from_settings(settings: Settings, creds: Credentials) -> Result<Self> {
        let reddit = RedditProvider::new(settings.reddit.clone(), creds.reddit())?;
        let twitter =
            TwitterProvider::new(settings.twitter.clone(), creds.twitter_bearer_token.clone())?;
        info!(
            reddit = reddit.available(),
            twitter = twitter.available(),
            gemini = creds.gemini_api_key.is_some(),
            "provider capabilities"
        );

        let backend = GeminiBackend::new(&settings.gemini, creds.gemini_api_key.clone())?;

        let notifier: Box<dyn Notifier> = match creds.mail() {
            Some(mail) => match EmailNotifier::new(&settings.smtp, mail) {
                Ok(n) => Box::new(n),
                Err(e) => {
                    warn!(error = %e, "email notifier unusable, falling back to log output");
                    Box::new(LogNotifier)
                }
            },
            None => {
                warn!("EMAIL_ADDRESS / EMAIL_PASSWORD / RECIPIENT_EMAIL not set, report will only be logged");
                Box::new(LogNotifier)
            }
        };

        let providers: Vec<Box<dyn SourceProvider>> = vec![Box::new(reddit), Box::new(twitter)];

        Ok(Self {
            settings,
            providers,
            backend: Box::new(backend),
            notifier,
            personas: PersonaTable::standard(),
        })
    }

    /// Configured persona if it names a table entry, otherwise a uniform pick.
    pub fn select_persona<R: Rng + ?Sized>(&self, rng: &mut R) -> &'static str {
        if let Some(fixed) = self.settings.persona.as_deref() {
            match self.personas.get(fixed) {
                Some(p) => return p.name,
                None => warn!(persona = fixed, "configured persona unknown, picking at random"),
            }
        }
        self.personas.choose(rng).name
    }
}

pub async fn run_once<R: Rng + ?Sized>(pipeline: &Pipeline, rng: &mut R) -> RunSummary {
    run_once_at(pipeline, rng, Utc::now()).await
}

/// Same as [`run_once`] with an explicit clock, so windows are reproducible.
pub async fn run_once_at<R: Rng + ?Sized>(
    pipeline: &Pipeline,
    rng: &mut R,
    now: DateTime<Utc>,
) -> RunSummary {
    let window = RecencyWindow::new(now, pipeline.settings.window());
    info!(start = %window.start(), end = %now, "compiling mentions");

    let corpus = compile_all(&pipeline.providers, &window).await;
    info!(
        snippets = corpus.snippets().len(),
        degraded = corpus.degraded().len(),
        "corpus ready"
    );

    let persona = pipeline.select_persona(rng);
    info!(persona, "persona selected");

    let composer = ReportComposer::new(
        &pipeline.personas,
        pipeline.backend.as_ref(),
        &pipeline.settings.topic,
        &pipeline.settings.title,
    )
    .with_retry(pipeline.settings.gemini.max_retries, RETRY_BACKOFF);
    let report = composer.compose(&corpus, persona).await;
    let delivered = deliver(pipeline.notifier.as_ref(), &report).await;

    RunSummary {
        corpus,
        persona,
        report,
        delivered,
    }
}
