//! Summarizer: corpus + prompt template -> generated text or a typed failure.
//!
//! Nothing here returns `Err` to callers. Every backend problem ends up as a
//! [`SummaryResult::Failed`] whose `Display` text is meant to be embedded
//! straight into the report.

pub mod gemini;
pub mod personas;

use async_trait::async_trait;
use metrics::counter;

use crate::ingest::Corpus;
pub use gemini::GeminiBackend;
pub use personas::{Persona, PersonaTable};

/// Why a generation call produced no text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SummaryFailure {
    #[error("Error: Gemini API key is not configured.")]
    MissingApiKey,
    #[error("Error: Failed to connect to Gemini API. {0}")]
    Transport(String),
    #[error("Error: Gemini API returned HTTP {status}. {detail}")]
    HttpStatus { status: u16, detail: String },
    #[error("Error: Failed to parse API response. {0}")]
    Decode(String),
    #[error("Error: Could not generate summary due to unexpected API response.")]
    MalformedShape,
}

impl SummaryFailure {
    /// Only connection-level problems are worth a second attempt. The
    /// service answered for every other variant.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryResult {
    Generated(String),
    Failed(SummaryFailure),
}

impl SummaryResult {
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// Text for the report: the summary, or the diagnostic string.
    pub fn as_report_text(&self) -> String {
        match self {
            Self::Generated(s) => s.clone(),
            Self::Failed(f) => f.to_string(),
        }
    }
}

/// A text generation service. Implementations must not panic and must map
/// every failure into `SummaryResult::Failed`.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    async fn generate(&self, prompt: &str) -> SummaryResult;
    fn name(&self) -> &'static str;
}

/// The two prompt shapes used per run.
#[derive(Debug, Clone, Copy)]
pub enum PromptTemplate<'a> {
    Persona { persona: &'a Persona, topic: &'a str },
    Neutral { topic: &'a str },
}

impl PromptTemplate<'_> {
    /// Embed the corpus verbatim.
    pub fn render(&self, corpus: &str) -> String {
        match self {
            Self::Persona { persona, topic } => format!(
                "{}\n\nNews Snippets:\n{corpus}\n\nSummary:",
                persona.instructions(topic)
            ),
            Self::Neutral { topic } => format!(
                "Provide a concise, neutral, and factual summary of the following news snippets about '{topic}'. \
                 Focus on key updates and avoid speculative language.\n\nNews Snippets:\n{corpus}\n\nSimple Rundown:"
            ),
        }
    }

    fn label(&self) -> &str {
        match self {
            Self::Persona { persona, .. } => persona.name,
            Self::Neutral { .. } => "neutral",
        }
    }
}

/// Exactly one generation request for `corpus` in the given template.
/// Retrying is left to the caller.
pub async fn summarize(
    backend: &dyn GenerationBackend,
    corpus: &Corpus,
    prompt: PromptTemplate<'_>,
) -> SummaryResult {
    tracing::info!(backend = backend.name(), voice = prompt.label(), "generating summary");
    counter!("summarize_requests_total").increment(1);

    let out = backend.generate(&prompt.render(corpus.text())).await;
    if let SummaryResult::Failed(f) = &out {
        tracing::warn!(backend = backend.name(), voice = prompt.label(), error = %f, "summary failed");
        counter!("summarize_failures_total").increment(1);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_text_matches_report_wording() {
        assert_eq!(
            SummaryFailure::MalformedShape.to_string(),
            "Error: Could not generate summary due to unexpected API response."
        );
        assert_eq!(
            SummaryFailure::HttpStatus {
                status: 429,
                detail: "quota".into()
            }
            .to_string(),
            "Error: Gemini API returned HTTP 429. quota"
        );
        assert!(SummaryFailure::Decode("x".into())
            .to_string()
            .starts_with("Error: Failed to parse API response."));
    }

    #[test]
    fn only_transport_is_transient() {
        assert!(SummaryFailure::Transport("reset".into()).is_transient());
        assert!(!SummaryFailure::HttpStatus { status: 503, detail: String::new() }.is_transient());
        assert!(!SummaryFailure::HttpStatus { status: 400, detail: String::new() }.is_transient());
        assert!(!SummaryFailure::MalformedShape.is_transient());
        assert!(!SummaryFailure::Decode("eof".into()).is_transient());
    }

    #[test]
    fn neutral_prompt_embeds_corpus_and_topic() {
        let p = PromptTemplate::Neutral {
            topic: "The Doors of Stone",
        };
        let s = p.render("Reddit (x): y - z");
        assert!(s.contains("about 'The Doors of Stone'"));
        assert!(s.contains("News Snippets:\nReddit (x): y - z\n\nSimple Rundown:"));
    }

    #[test]
    fn persona_prompt_ends_with_summary_cue() {
        let table = PersonaTable::standard();
        let bast = table.get("Bast").unwrap();
        let s = PromptTemplate::Persona {
            persona: bast,
            topic: "The Doors of Stone",
        }
        .render("c");
        assert!(s.starts_with("You are Bast"));
        assert!(s.contains("news about 'The Doors of Stone'"));
        assert!(s.ends_with("News Snippets:\nc\n\nSummary:"));
    }
}
