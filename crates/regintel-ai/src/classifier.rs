//! Keyword classification for regulatory updates and legal cases.
//!
//! Scans lower-cased text for taxonomy terms by substring containment,
//! collecting device types and category labels in taxonomy order and
//! resolving a single risk tier. Confidence accumulates per match and is
//! capped; when nothing categorises the text, fallback labels keep the
//! output non-empty.

use std::sync::Arc;

use regintel_core::{CategoryAssignment, ClassifiedDocument, Document};
use tracing::debug;

use crate::{ClassifierConfig, ConfigError, Taxonomy};

/// Rule-based classifier over an injected [`Taxonomy`].
///
/// Pure and stateless after construction: `classify` takes `&self`, performs
/// no I/O, and is safe to share across threads.
#[derive(Debug, Clone)]
pub struct Classifier {
    taxonomy: Arc<Taxonomy>,
    config: ClassifierConfig,
}

impl Classifier {
    /// Build a classifier, validating the scoring config.
    pub fn new(taxonomy: Arc<Taxonomy>, config: ClassifierConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { taxonomy, config })
    }

    /// Classifier over the built-in taxonomy with default scoring.
    pub fn builtin() -> Self {
        Self {
            taxonomy: Arc::new(Taxonomy::builtin()),
            config: ClassifierConfig::default(),
        }
    }

    pub fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Classify arbitrary text. Total over all inputs.
    ///
    /// - each device-type term found adds `device_weight`;
    /// - each therapeutic-area or compliance label found adds `category_weight`;
    /// - risk tiers are checked high → medium → low and the first tier with a
    ///   keyword hit sets the risk level and adds `risk_weight` once;
    /// - confidence is capped at `max_confidence`;
    /// - with no category, the default category is emitted and confidence is
    ///   set to `fallback_confidence`; with no device type, the default device
    ///   type is emitted.
    pub fn classify(&self, text: &str) -> CategoryAssignment {
        let text = text.to_lowercase();
        let mut confidence = 0.0f32;

        let mut device_types: Vec<String> = Vec::new();
        for term in self.taxonomy.device_types() {
            if text.contains(term.as_str()) && push_unique(&mut device_types, term) {
                confidence += self.config.device_weight;
            }
        }

        let mut categories: Vec<String> = Vec::new();
        let groups = self
            .taxonomy
            .therapeutic_areas()
            .iter()
            .chain(self.taxonomy.compliance_terms());
        for group in groups {
            if group.terms.iter().any(|t| text.contains(t.as_str()))
                && push_unique(&mut categories, &group.label)
            {
                confidence += self.config.category_weight;
            }
        }

        let mut risk_level = self.config.default_risk;
        for (tier, keywords) in self.taxonomy.risk_tiers() {
            if keywords.iter().any(|k| text.contains(k.as_str())) {
                risk_level = *tier;
                confidence += self.config.risk_weight;
                break;
            }
        }

        let mut confidence = confidence.min(self.config.max_confidence);

        debug!(
            devices = device_types.len(),
            categories = categories.len(),
            risk = %risk_level,
            "classified text"
        );

        if categories.is_empty() {
            categories.push(self.config.default_category.clone());
            confidence = self.config.fallback_confidence;
        }
        if device_types.is_empty() {
            device_types.push(self.config.default_device_type.clone());
        }

        CategoryAssignment {
            categories,
            device_types,
            risk_level,
            confidence,
        }
    }

    /// Classify a document's title and content.
    pub fn classify_document(&self, doc: &Document) -> ClassifiedDocument {
        ClassifiedDocument {
            document_id: doc.id.clone(),
            assignment: self.classify(&doc.text()),
        }
    }

    /// Classify a batch of documents, preserving input order.
    pub fn classify_all(&self, docs: &[Document]) -> Vec<ClassifiedDocument> {
        docs.iter().map(|d| self.classify_document(d)).collect()
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Append `label` unless already present. Returns whether it was added.
fn push_unique(labels: &mut Vec<String>, label: &str) -> bool {
    if labels.iter().any(|l| l == label) {
        return false;
    }
    labels.push(label.to_string());
    true
}
