// tests/ingest_aggregate.rs
mod common;

use common::{fixed_now, BrokenProvider, StaticProvider};
use mention_digest::config::{RedditSettings, TwitterSettings};
use mention_digest::ingest::providers::{RedditProvider, TwitterProvider};
use mention_digest::ingest::types::{RecencyWindow, SnippetKind, SourceProvider};
use mention_digest::{compile_all, NO_UPDATES};

#[tokio::test]
async fn concatenates_in_registration_order() {
    let providers: Vec<Box<dyn SourceProvider>> = vec![
        Box::new(StaticProvider {
            name: "A",
            lines: vec!["A: x"],
        }),
        Box::new(StaticProvider {
            name: "B",
            lines: vec!["B: y"],
        }),
    ];
    let corpus = compile_all(&providers, &RecencyWindow::last_day(fixed_now())).await;
    assert_eq!(corpus.text(), "A: x\nB: y");
    assert!(corpus.degraded().is_empty());
}

#[tokio::test]
async fn no_providers_yields_sentinel() {
    let providers: Vec<Box<dyn SourceProvider>> = Vec::new();
    let corpus = compile_all(&providers, &RecencyWindow::last_day(fixed_now())).await;
    assert_eq!(corpus.text(), NO_UPDATES);
}

#[tokio::test]
async fn broken_provider_does_not_block_the_others() {
    let providers: Vec<Box<dyn SourceProvider>> = vec![
        Box::new(BrokenProvider { name: "Reddit" }),
        Box::new(StaticProvider {
            name: "Twitter",
            lines: vec!["Twitter: 1: still here (Created: now)"],
        }),
    ];
    let corpus = compile_all(&providers, &RecencyWindow::last_day(fixed_now())).await;
    assert_eq!(corpus.snippets().len(), 2);
    assert_eq!(corpus.snippets()[0].kind, SnippetKind::Error);
    assert!(corpus.text().ends_with("still here (Created: now)"));
    assert_eq!(corpus.degraded().len(), 1);
    assert_eq!(corpus.degraded()[0].provider, "Reddit");
}

#[tokio::test]
async fn missing_capabilities_give_simulated_reddit_only() {
    let providers: Vec<Box<dyn SourceProvider>> = vec![
        Box::new(RedditProvider::new(RedditSettings::default(), None).unwrap()),
        Box::new(TwitterProvider::new(TwitterSettings::default(), None).unwrap()),
    ];
    let corpus = compile_all(&providers, &RecencyWindow::last_day(fixed_now())).await;
    assert_eq!(
        corpus.text(),
        "Reddit (Simulated): Patrick Rothfuss mentioned a new draft in a rare comment.\n\
         Reddit (Simulated): Fan theory about the Chandrian's true motives gained traction."
    );
    assert_eq!(corpus.degraded().len(), 2);
}
