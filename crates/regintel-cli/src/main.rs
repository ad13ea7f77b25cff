//! regintel - medical device regulatory intelligence from the command line.

mod display;
mod ingest;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use regintel_ai::{Classifier, ClassifierConfig, RuleSet, Summarizer, Taxonomy};
use regintel_core::{Document, DocumentKind, RiskLevel, seed};
use regintel_store::{DuckStore, StoreError};
use regintel_sync::IngestClient;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "regintel")]
#[command(version)]
#[command(about = "Classify and summarise medical device regulatory updates and legal cases")]
struct Cli {
    /// DuckDB database file (in-memory when absent)
    #[arg(long, global = true, env = "REGINTEL_DB")]
    db: Option<PathBuf>,

    /// Taxonomy JSON file (built-in taxonomy when absent)
    #[arg(long, global = true, env = "REGINTEL_TAXONOMY")]
    taxonomy: Option<PathBuf>,

    /// Summary rules JSON file (built-in rules when absent)
    #[arg(long, global = true, env = "REGINTEL_RULES")]
    rules: Option<PathBuf>,

    /// Classifier scoring JSON file
    #[arg(long, global = true, env = "REGINTEL_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify text and print the assignment as JSON
    Classify {
        /// Text to classify
        text: String,
    },

    /// Summarise a document and print the narrative as JSON
    Summarize {
        #[arg(long)]
        title: String,

        #[arg(long, default_value = "")]
        content: String,

        /// regulatory or legal
        #[arg(long, default_value = "regulatory")]
        kind: DocumentKind,
    },

    /// Generate synthetic documents, store and classify them
    Seed {
        #[arg(long, default_value_t = 20)]
        count: usize,

        /// Most recent publication date (defaults to today)
        #[arg(long)]
        start: Option<NaiveDate>,
    },

    /// Classify every stored document and replace stored classifications
    Reclassify,

    /// Show a document card with its classification and summary
    Show {
        /// Document id, e.g. REG-00001
        id: String,
    },

    /// List stored documents
    List {
        #[arg(long)]
        kind: Option<DocumentKind>,

        /// Only documents classified at this risk level
        #[arg(long, conflicts_with = "kind")]
        risk: Option<RiskLevel>,
    },

    /// Pull documents from the dashboard API, classify and push results back
    Pull {
        /// Dashboard base URL
        #[arg(long, env = "REGINTEL_API_URL")]
        url: String,

        /// Only pull documents published after this RFC 3339 timestamp
        #[arg(long)]
        since: Option<DateTime<Utc>>,

        /// Store locally without pushing classifications back
        #[arg(long)]
        no_push: bool,
    },

    /// Print the active taxonomy
    Taxonomy {
        /// List every term by bucket
        #[arg(long)]
        terms: bool,
    },

    /// Run SQL against the store and print the result table
    Query {
        sql: String,
    },
}

impl Commands {
    /// Whether the command writes to the store.
    fn writes_store(&self) -> bool {
        matches!(self, Self::Seed { .. } | Self::Reclassify | Self::Pull { .. })
    }
}

/// Default log filter: `warn` for dependencies, `info` or `debug` for our crates.
fn default_filter(verbose: bool) -> String {
    let level = if verbose { "debug" } else { "info" };
    ["regintel", "regintel_core", "regintel_ai", "regintel_store", "regintel_sync"]
        .iter()
        .fold("warn".to_string(), |filter, target| {
            format!("{filter},{target}={level}")
        })
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter(cli.verbose).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
    info!("regintel v{}", env!("CARGO_PKG_VERSION"));

    if cli.db.is_none() && cli.command.writes_store() {
        warn!("no --db given; the in-memory store is discarded when this command exits");
    }

    match &cli.command {
        Commands::Classify { text } => {
            let classifier = load_classifier(&cli)?;
            let assignment = classifier.classify(text);
            println!("{}", serde_json::to_string_pretty(&assignment)?);
        }
        Commands::Summarize {
            title,
            content,
            kind,
        } => {
            let summarizer = load_summarizer(&cli)?;
            let summary = summarizer.summarize(title, content, *kind);
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Commands::Seed { count, start } => {
            let start = start.unwrap_or_else(|| Utc::now().date_naive());
            let store = open_store(cli.db.as_deref())?;
            let classifier = load_classifier(&cli)?;
            let docs = seed::mixed(*count, start);
            let stored = store.insert_documents(&docs)?;
            let classified = store.store_classifications(&classifier.classify_all(&docs))?;
            eprintln!("Seeded {stored} documents ({classified} classified)");
        }
        Commands::Reclassify => {
            let store = open_store(cli.db.as_deref())?;
            let classifier = load_classifier(&cli)?;
            let docs = store.documents(None)?;
            let classified = store.store_classifications(&classifier.classify_all(&docs))?;
            eprintln!("Reclassified {classified} documents");
        }
        Commands::Show { id } => {
            let store = open_store(cli.db.as_deref())?;
            show_document(&store, &load_summarizer(&cli)?, id)?;
        }
        Commands::List { kind, risk } => {
            let store = open_store(cli.db.as_deref())?;
            let docs = match risk {
                Some(level) => store.documents_by_risk(*level)?,
                None => store.documents(*kind)?,
            };
            display::print_document_rows(&docs);
        }
        Commands::Pull {
            url,
            since,
            no_push,
        } => {
            let store = open_store(cli.db.as_deref())?;
            let classifier = load_classifier(&cli)?;
            let client = IngestClient::new(url.clone());
            let stats = ingest::run_pull(&client, &store, &classifier, *since, !no_push).await?;
            eprintln!(
                "Pulled {} documents, classified {} in {:.1}s",
                stats.pulled, stats.classified, stats.elapsed_secs
            );
            if let Some(accepted) = stats.accepted {
                eprintln!("Dashboard accepted {accepted} classifications");
            }
        }
        Commands::Taxonomy { terms } => {
            let classifier = load_classifier(&cli)?;
            display::print_taxonomy(classifier.taxonomy(), *terms);
        }
        Commands::Query { sql } => {
            let store = open_store(cli.db.as_deref())?;
            let batches = store.query_arrow(sql)?;
            arrow::util::pretty::print_batches(&batches)?;
        }
    }

    Ok(())
}

fn load_classifier(cli: &Cli) -> Result<Classifier> {
    let taxonomy = match &cli.taxonomy {
        Some(path) => Taxonomy::load(path)
            .with_context(|| format!("loading taxonomy {}", path.display()))?,
        None => Taxonomy::builtin(),
    };
    let config = match &cli.config {
        Some(path) => ClassifierConfig::load(path)
            .with_context(|| format!("loading classifier config {}", path.display()))?,
        None => ClassifierConfig::default(),
    };
    Ok(Classifier::new(Arc::new(taxonomy), config)?)
}

fn load_summarizer(cli: &Cli) -> Result<Summarizer> {
    let rules = match &cli.rules {
        Some(path) => {
            RuleSet::load(path).with_context(|| format!("loading rules {}", path.display()))?
        }
        None => RuleSet::builtin(),
    };
    Ok(Summarizer::new(rules, load_classifier(cli)?))
}

fn open_store(db: Option<&Path>) -> Result<DuckStore> {
    let store = match db {
        Some(path) => DuckStore::open_persistent(path)
            .with_context(|| format!("opening {}", path.display()))?,
        None => DuckStore::open()?,
    };
    store.ensure_schema()?;
    Ok(store)
}

fn show_document(store: &DuckStore, summarizer: &Summarizer, id: &str) -> Result<()> {
    let batch = match store.get_document(id) {
        Ok(batch) => batch,
        Err(StoreError::NoResults) => anyhow::bail!("no document with id {id}"),
        Err(e) => return Err(e.into()),
    };
    display::print_document_card(&batch);

    match store.classification_for(id) {
        Ok(classification) => display::print_classification_card(&classification),
        Err(StoreError::NoResults) => println!("(not classified)\n"),
        Err(e) => return Err(e.into()),
    }

    let docs = Document::from_batches(std::slice::from_ref(&batch))?;
    if let Some(doc) = docs.first() {
        display::print_summary(&summarizer.summarize_document(doc));
    }
    Ok(())
}
