//! mention-digest binary entrypoint.
//! Runs exactly one aggregation pass and exits. All tunables come from
//! `config/digest.toml` (or $DIGEST_CONFIG_PATH) and the environment.

use anyhow::Context;
use mention_digest::config::{Credentials, Settings};
use mention_digest::pipeline::{run_once, Pipeline};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("mention_digest=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_target(false))
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();
    init_tracing();

    let started = chrono::Local::now();
    info!(at = %started.format("%Y-%m-%d %H:%M:%S"), "running news compiler");

    let settings = Settings::load_default().context("loading digest settings")?;
    let creds = Credentials::from_env();
    let pipeline = Pipeline::from_settings(settings, creds).context("building pipeline")?;

    let mut rng = StdRng::from_os_rng();
    let run = run_once(&pipeline, &mut rng).await;

    info!(
        persona = run.persona,
        snippets = run.corpus.snippets().len(),
        delivered = run.delivered,
        "process completed"
    );
    Ok(())
}
