//! Binary entrypoint for the SafeSpace API server.

use std::path::PathBuf;

use safespace_api::{run, AppState};
use safespace_crypto::EnvelopeCipher;
use safespace_detection::Classifier;
use safespace_storage::ReportStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let addr = std::env::var("SAFESPACE_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".to_string());
    let db_path = std::env::var("SAFESPACE_DB_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("safespace.db"));

    let store = ReportStore::open(&db_path)?;
    // Missing key degrades to an ephemeral cipher with a loud warning;
    // intake keeps working, server-side triage of old reports does not.
    let cipher = EnvelopeCipher::from_env()?;
    let classifier = Classifier::new();

    tracing::info!(db = %db_path.display(), "store opened");
    let state = AppState::new(store, classifier, cipher);
    run(&addr, state).await
}
