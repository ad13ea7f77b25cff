//! Pull pipeline: fetch dashboard feeds, store, classify, push classifications back.

use std::time::Instant;

use anyhow::Context;
use chrono::{DateTime, Utc};
use regintel_ai::Classifier;
use regintel_core::DocumentKind;
use regintel_store::DuckStore;
use regintel_sync::IngestClient;
use tracing::info;

pub struct IngestStats {
    pub pulled: usize,
    pub classified: usize,
    /// `None` when pushing was skipped.
    pub accepted: Option<u64>,
    pub elapsed_secs: f64,
}

/// Run the full ingest pipeline for both document kinds.
pub async fn run_pull(
    client: &IngestClient,
    store: &DuckStore,
    classifier: &Classifier,
    since: Option<DateTime<Utc>>,
    push: bool,
) -> anyhow::Result<IngestStats> {
    let start = Instant::now();

    // 1. Pull both feeds.
    let mut docs = Vec::new();
    for kind in [DocumentKind::Regulatory, DocumentKind::Legal] {
        let batch = client
            .pull_documents(kind, since)
            .await
            .with_context(|| format!("pulling {kind} documents"))?;
        eprintln!("  Pulled {} {kind} documents", batch.len());
        docs.extend(batch);
    }

    // 2. Store, then classify and store the derived rows.
    store
        .insert_documents(&docs)
        .context("storing pulled documents")?;
    let classified = classifier.classify_all(&docs);
    store
        .store_classifications(&classified)
        .context("storing classifications")?;

    // 3. Push back.
    let accepted = if push && !classified.is_empty() {
        let accepted = client
            .push_classifications(&classified)
            .await
            .context("pushing classifications")?;
        Some(accepted)
    } else {
        None
    };

    let stats = IngestStats {
        pulled: docs.len(),
        classified: classified.len(),
        accepted,
        elapsed_secs: start.elapsed().as_secs_f64(),
    };
    info!(
        pulled = stats.pulled,
        classified = stats.classified,
        elapsed = stats.elapsed_secs,
        "ingest complete"
    );
    Ok(stats)
}
