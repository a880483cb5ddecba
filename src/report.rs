// src/report.rs
use std::time::Duration;

use crate::ingest::Corpus;
use crate::summarize::{summarize, GenerationBackend, PersonaTable, PromptTemplate, SummaryResult};

/// The outgoing message. Built once per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub subject: String,
    pub body: String,
}

/// Builds the report from one corpus: persona summary, neutral rundown and
/// the raw corpus. Summary failures are embedded as-is, never swallowed.
pub struct ReportComposer<'a> {
    personas: &'a PersonaTable,
    backend: &'a dyn GenerationBackend,
    topic: &'a str,
    title: &'a str,
    max_retries: u32,
    backoff: Duration,
}

impl<'a> ReportComposer<'a> {
    /// `topic` is quoted in prompts and the greeting; `title` names the
    /// digest in the subject and signature. No retries until [`Self::with_retry`].
    pub fn new(
        personas: &'a PersonaTable,
        backend: &'a dyn GenerationBackend,
        topic: &'a str,
        title: &'a str,
    ) -> Self {
        Self {
            personas,
            backend,
            topic,
            title,
            max_retries: 0,
            backoff: Duration::from_millis(500),
        }
    }

    /// Extra attempts per summary on transport failures only; `base` doubles
    /// per retry.
    pub fn with_retry(mut self, max_retries: u32, base: Duration) -> Self {
        self.max_retries = max_retries;
        self.backoff = base;
        self
    }

    /// Two sequential summaries over the same corpus. Unknown persona names
    /// fall back to the table default.
    pub async fn compose(&self, corpus: &Corpus, persona_name: &str) -> Report {
        let persona = self.personas.get_or_default(persona_name);
        if !persona.name.eq_ignore_ascii_case(persona_name) {
            tracing::warn!(requested = persona_name, using = persona.name, "unknown persona");
        }

        let voiced = self
            .summarize_retrying(
                corpus,
                PromptTemplate::Persona {
                    persona,
                    topic: self.topic,
                },
            )
            .await;
        let neutral = self
            .summarize_retrying(corpus, PromptTemplate::Neutral { topic: self.topic })
            .await;

        let name = persona.name;
        let topic = self.topic;
        let title = self.title;
        let subject = format!("Your Daily {title} Update (from {name})");

        let mut body = format!(
            "Greetings,\n\nHere is your daily update on '{topic}', brought to you in the voice of {name}:\n\n"
        );
        body.push_str(&voiced.as_report_text());
        body.push_str("\n\n--- Basic Rundown ---\n");
        body.push_str(&neutral.as_report_text());
        body.push_str("\n\n\n\nMay your curiosity be sated, and your patience rewarded.\n\n");
        body.push_str(&format!("- The {title} News Compiler ({name}'s Voice)"));
        body.push_str("\n\n--- Raw News Snippets ---\n");
        body.push_str(corpus.text());

        Report { subject, body }
    }

    async fn summarize_retrying(&self, corpus: &Corpus, prompt: PromptTemplate<'_>) -> SummaryResult {
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            let out = summarize(self.backend, corpus, prompt).await;
            match &out {
                SummaryResult::Failed(f) if f.is_transient() && attempt <= self.max_retries => {
                    tracing::warn!(attempt, error = %f, "summary transport failure, retrying");
                    let shift = (attempt - 1).min(6);
                    tokio::time::sleep(self.backoff * (1u32 << shift)).await;
                }
                _ => return out,
            }
        }
    }
}
