//! Risk narratives for dashboard cards.
//!
//! A [`Summarizer`] walks an ordered [`RuleSet`]; the first rule whose
//! condition matches the lower-cased title and content supplies a canned
//! paragraph, key points and risk badge. When no rule matches, a generic
//! narrative is assembled from the classifier's output.

use std::fmt;
use std::path::Path;

use regintel_core::{CategoryAssignment, Document, DocumentKind, RiskLevel};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Classifier, ConfigError, templates};

/// UTF-16 code units per minute of estimated reading time.
const CHARS_PER_MINUTE: usize = 1000;

/// Reading time reported when the estimate comes out as zero.
const DEFAULT_READ_MINUTES: u32 = 2;

/// Display badge for a summary card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskBadge {
    Low,
    Medium,
    High,
    Urgent,
}

impl RiskBadge {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }
}

impl fmt::Display for RiskBadge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<RiskLevel> for RiskBadge {
    fn from(level: RiskLevel) -> Self {
        match level {
            RiskLevel::Low => Self::Low,
            RiskLevel::Medium => Self::Medium,
            RiskLevel::High => Self::High,
        }
    }
}

/// Narrative shown alongside a regulatory update or legal case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub summary: String,
    pub key_points: Vec<String>,
    pub risk_level: RiskBadge,
    pub action_required: bool,
    /// Minutes.
    pub estimated_read_time: u32,
}

/// Conjunction of keyword groups; a group is satisfied by any one of its keywords.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    pub all_of: Vec<Vec<String>>,
}

impl Condition {
    /// `haystack` must already be lower-cased.
    pub fn matches(&self, haystack: &str) -> bool {
        self.all_of
            .iter()
            .all(|group| group.iter().any(|k| haystack.contains(k.as_str())))
    }
}

/// Canned narrative content for a rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub summary: String,
    pub key_points: Vec<String>,
    pub risk_level: RiskBadge,
    pub action_required: bool,
}

/// A named `{condition, template}` pair, optionally limited to some document kinds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryRule {
    pub name: String,
    /// Empty means every kind.
    #[serde(default)]
    pub kinds: Vec<DocumentKind>,
    pub condition: Condition,
    pub template: Template,
}

impl SummaryRule {
    pub fn applies_to(&self, kind: DocumentKind) -> bool {
        self.kinds.is_empty() || self.kinds.contains(&kind)
    }
}

/// Ordered summary rules; earlier rules take priority.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSet {
    rules: Vec<SummaryRule>,
}

impl RuleSet {
    /// Validate rules and lower-case their keywords.
    pub fn new(rules: Vec<SummaryRule>) -> Result<Self, ConfigError> {
        let rules = rules
            .into_iter()
            .map(normalize_rule)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules })
    }

    /// Parse a JSON array of rules.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Self::new(serde_json::from_str(json)?)
    }

    /// Read a JSON rules file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// The built-in case-family and regulation rules.
    pub fn builtin() -> Self {
        Self {
            rules: templates::builtin_rules(),
        }
    }

    pub fn rules(&self) -> &[SummaryRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// First rule that applies to `kind` and matches `haystack` (lower-cased).
    pub fn first_match(&self, kind: DocumentKind, haystack: &str) -> Option<&SummaryRule> {
        self.rules
            .iter()
            .find(|r| r.applies_to(kind) && r.condition.matches(haystack))
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::builtin()
    }
}

fn normalize_rule(mut rule: SummaryRule) -> Result<SummaryRule, ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidRule {
        rule: rule.name.clone(),
        reason: reason.to_string(),
    };

    if rule.name.trim().is_empty() {
        return Err(invalid("name is empty"));
    }
    if rule.condition.all_of.is_empty() {
        return Err(invalid("condition has no keyword groups"));
    }
    for group in &rule.condition.all_of {
        if group.is_empty() {
            return Err(invalid("condition has an empty keyword group"));
        }
        if group.iter().any(|k| k.trim().is_empty()) {
            return Err(invalid("condition has an empty keyword"));
        }
    }
    if rule.template.summary.trim().is_empty() {
        return Err(invalid("template summary is empty"));
    }

    for group in &mut rule.condition.all_of {
        for keyword in group.iter_mut() {
            *keyword = keyword.trim().to_lowercase();
        }
    }
    Ok(rule)
}

/// Selects narrative templates for documents.
#[derive(Debug, Clone, Default)]
pub struct Summarizer {
    rules: RuleSet,
    classifier: Classifier,
}

impl Summarizer {
    pub fn new(rules: RuleSet, classifier: Classifier) -> Self {
        Self { rules, classifier }
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// Summarise a title/content pair. Deterministic, never fails.
    pub fn summarize(&self, title: &str, content: &str, kind: DocumentKind) -> Summary {
        let estimated_read_time = estimated_read_time(content);
        let haystack = format!("{title} {content}").to_lowercase();

        if let Some(rule) = self.rules.first_match(kind, &haystack) {
            debug!(rule = %rule.name, %kind, "summary rule matched");
            let t = &rule.template;
            return Summary {
                summary: t.summary.clone(),
                key_points: t.key_points.clone(),
                risk_level: t.risk_level,
                action_required: t.action_required,
                estimated_read_time,
            };
        }

        let assignment = self.classifier.classify(&haystack);
        debug!(%kind, risk = %assignment.risk_level, "no summary rule matched, using generic narrative");
        generic_summary(&assignment, kind, estimated_read_time)
    }

    pub fn summarize_document(&self, doc: &Document) -> Summary {
        self.summarize(&doc.title, &doc.content, doc.kind)
    }
}

/// `ceil(len / 1000)` minutes, or 2 when that comes out as zero.
///
/// Length is measured in UTF-16 code units, matching the dashboard's
/// JavaScript `String.length`.
pub fn estimated_read_time(content: &str) -> u32 {
    let units = content.encode_utf16().count();
    let minutes = units.div_ceil(CHARS_PER_MINUTE);
    match u32::try_from(minutes) {
        Ok(0) => DEFAULT_READ_MINUTES,
        Ok(m) => m,
        Err(_) => u32::MAX,
    }
}

fn generic_summary(a: &CategoryAssignment, kind: DocumentKind, estimated_read_time: u32) -> Summary {
    let categories = a.categories.join(", ");
    let devices = a.device_types.join(", ");

    let (summary, closing) = match kind {
        DocumentKind::Regulatory => (
            format!(
                "Regulatory update affecting {categories} for {devices} products. \
                 Review applicability to your portfolio and track implementation timelines."
            ),
            "Confirm whether affected products need labeling, submission or process changes",
        ),
        DocumentKind::Legal => (
            format!(
                "Legal development involving {devices} products in {categories}. \
                 Assess exposure for similar products and monitor the proceedings."
            ),
            "Review complaint files and post-market data for similar failure modes",
        ),
    };

    let risk_level = RiskBadge::from(a.risk_level);
    Summary {
        summary,
        key_points: vec![
            format!("Categories: {categories}"),
            format!("Device types: {devices}"),
            format!(
                "Risk level: {} (confidence {:.0}%)",
                a.risk_level,
                a.confidence * 100.0
            ),
            closing.to_string(),
        ],
        risk_level,
        action_required: a.risk_level == RiskLevel::High,
        estimated_read_time,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(name: &str, kinds: Vec<DocumentKind>, all_of: &[&[&str]], badge: RiskBadge) -> SummaryRule {
        SummaryRule {
            name: name.into(),
            kinds,
            condition: Condition {
                all_of: all_of
                    .iter()
                    .map(|g| g.iter().map(|k| k.to_string()).collect())
                    .collect(),
            },
            template: Template {
                summary: format!("{name} summary"),
                key_points: vec![format!("{name} point")],
                risk_level: badge,
                action_required: badge == RiskBadge::Urgent,
            },
        }
    }

    #[test]
    fn philips_cpap_legal_is_urgent() {
        let s = Summarizer::default().summarize(
            "Philips CPAP Recall",
            "Litigation over degraded foam in sleep apnea devices.",
            DocumentKind::Legal,
        );
        assert_eq!(s.risk_level, RiskBadge::Urgent);
        assert!(s.action_required);
        assert!(
            s.key_points
                .iter()
                .any(|p| p.contains("Philips") && p.contains("CPAP")),
            "key points should reference the Philips CPAP litigation: {:?}",
            s.key_points
        );
    }

    #[test]
    fn read_time_rounds_up() {
        let s = Summarizer::default().summarize("x", &"a".repeat(2500), DocumentKind::Regulatory);
        assert_eq!(s.estimated_read_time, 3);
    }

    #[test]
    fn read_time_edge_cases() {
        assert_eq!(estimated_read_time(""), 2);
        assert_eq!(estimated_read_time("a"), 1);
        assert_eq!(estimated_read_time(&"a".repeat(1000)), 1);
        assert_eq!(estimated_read_time(&"a".repeat(1001)), 2);
        // UTF-16 code units, not bytes.
        assert_eq!(estimated_read_time(&"é".repeat(1000)), 1);
    }

    #[test]
    fn read_time_counts_surrogate_pairs() {
        // Each emoji is two UTF-16 code units.
        assert_eq!(estimated_read_time(&"😀".repeat(600)), 2);
        assert_eq!(estimated_read_time(&"😀".repeat(500)), 1);
    }

    #[test]
    fn generic_regulatory_fallback() {
        let s = Summarizer::default().summarize(
            "Agency bulletin",
            "A class iii implantable cardiac device notice.",
            DocumentKind::Regulatory,
        );
        assert!(s.summary.starts_with("Regulatory update"));
        assert!(s.summary.contains("cardiology"));
        assert_eq!(s.risk_level, RiskBadge::High);
        assert!(s.action_required);
        assert_eq!(s.key_points.len(), 4);
    }

    #[test]
    fn generic_legal_fallback_for_empty_input() {
        let s = Summarizer::default().summarize("", "", DocumentKind::Legal);
        assert!(s.summary.starts_with("Legal development"));
        assert!(s.summary.contains("General MedTech"));
        assert!(s.summary.contains("Medical Device"));
        assert_eq!(s.risk_level, RiskBadge::Medium);
        assert!(!s.action_required);
        assert_eq!(s.estimated_read_time, 2);
    }

    #[test]
    fn first_matching_rule_wins() {
        let rules = RuleSet::new(vec![
            rule("first", vec![], &[&["alpha"]], RiskBadge::Low),
            rule("second", vec![], &[&["alpha"], &["beta"]], RiskBadge::Urgent),
        ])
        .unwrap();
        let summarizer = Summarizer::new(rules, Classifier::builtin());

        let s = summarizer.summarize("Alpha", "beta", DocumentKind::Regulatory);
        assert_eq!(s.summary, "first summary");
    }

    #[test]
    fn condition_requires_every_group() {
        let rules = RuleSet::new(vec![rule(
            "pair",
            vec![],
            &[&["philips"], &["cpap", "bipap"]],
            RiskBadge::Urgent,
        )])
        .unwrap();
        assert!(rules.first_match(DocumentKind::Legal, "philips bipap").is_some());
        assert!(rules.first_match(DocumentKind::Legal, "philips hue").is_none());
    }

    #[test]
    fn kind_restriction_is_honoured() {
        let rules = RuleSet::new(vec![rule(
            "legal-only",
            vec![DocumentKind::Legal],
            &[&["mesh"]],
            RiskBadge::High,
        )])
        .unwrap();
        assert!(rules.first_match(DocumentKind::Legal, "hernia mesh").is_some());
        assert!(rules.first_match(DocumentKind::Regulatory, "hernia mesh").is_none());
    }

    #[test]
    fn keywords_are_lowercased_on_load() {
        let rules = RuleSet::new(vec![rule("caps", vec![], &[&["EU MDR"]], RiskBadge::High)]).unwrap();
        assert_eq!(rules.rules()[0].condition.all_of[0][0], "eu mdr");
        let summarizer = Summarizer::new(rules, Classifier::builtin());
        let s = summarizer.summarize("EU MDR deadline", "", DocumentKind::Regulatory);
        assert_eq!(s.summary, "caps summary");
    }

    #[test]
    fn rules_from_json() {
        let json = r#"[{
            "name": "ukca",
            "kinds": ["regulatory"],
            "condition": { "allOf": [["UKCA"]] },
            "template": {
                "summary": "UKCA marking update.",
                "keyPoints": ["Check GB market access"],
                "riskLevel": "medium",
                "actionRequired": true
            }
        }]"#;
        let rules = RuleSet::from_json(json).unwrap();
        assert_eq!(rules.len(), 1);
        let r = rules.first_match(DocumentKind::Regulatory, "ukca guidance").unwrap();
        assert_eq!(r.template.risk_level, RiskBadge::Medium);
    }

    #[test]
    fn rejects_empty_keyword_group() {
        let err = RuleSet::new(vec![rule("bad", vec![], &[&[]], RiskBadge::Low)]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidRule { ref rule, .. } if rule == "bad"));
    }

    #[test]
    fn rejects_rule_without_condition() {
        let err = RuleSet::new(vec![rule("none", vec![], &[], RiskBadge::Low)]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidRule { .. }));
    }

    #[test]
    fn builtin_rules_are_valid() {
        let builtin = RuleSet::builtin();
        assert!(builtin.len() >= 10);
        let revalidated = RuleSet::new(builtin.rules().to_vec()).unwrap();
        assert_eq!(revalidated, builtin);
    }

    #[test]
    fn summary_is_deterministic() {
        let s = Summarizer::default();
        let a = s.summarize("Hernia mesh verdict", "Jury award", DocumentKind::Legal);
        let b = s.summarize("Hernia mesh verdict", "Jury award", DocumentKind::Legal);
        assert_eq!(a, b);
    }

    #[test]
    fn summary_json_uses_camel_case() {
        let s = Summarizer::default().summarize("Philips CPAP Recall", "", DocumentKind::Legal);
        let json = serde_json::to_value(&s).unwrap();
        assert_eq!(json["riskLevel"], "urgent");
        assert_eq!(json["actionRequired"], true);
        assert!(json["keyPoints"].is_array());
        assert_eq!(json["estimatedReadTime"], 2);
    }
}
