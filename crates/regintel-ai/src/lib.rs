//! Content classification: keyword taxonomy, rule-based classifier, and risk narrative summaries.

pub mod classifier;
pub mod config;
mod error;
pub mod summary;
pub mod taxonomy;
mod templates;

pub use classifier::Classifier;
pub use config::ClassifierConfig;
pub use error::{ConfigError, TaxonomyError};
pub use summary::{RiskBadge, RuleSet, Summarizer, Summary, SummaryRule};
pub use taxonomy::{Bucket, Taxonomy, TaxonomyEntry, TaxonomyFile, TaxonomySummary};
