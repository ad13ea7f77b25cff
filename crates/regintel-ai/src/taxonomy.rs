//! Keyword taxonomy for medical-device content classification.
//!
//! Maps domain terms to category labels across four buckets: device types,
//! therapeutic areas, compliance terms and risk keywords. Device-type terms
//! are their own labels; therapeutic areas and compliance terms are grouped
//! under a label; risk keywords are grouped by tier.
//!
//! A [`Taxonomy`] is built once at startup (from [`Taxonomy::builtin`] or a
//! JSON file) and shared immutably with the classifier. All terms are stored
//! lower-cased. Group order is preserved, which keeps classification output
//! deterministic.

use std::fmt;
use std::path::Path;

use regintel_core::RiskLevel;
use serde::{Deserialize, Serialize};

use crate::TaxonomyError;

/// Which table a taxonomy term belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Bucket {
    DeviceType,
    RiskKeyword,
    TherapeuticArea,
    ComplianceTerm,
}

impl Bucket {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DeviceType => "deviceType",
            Self::RiskKeyword => "riskKeyword",
            Self::TherapeuticArea => "therapeuticArea",
            Self::ComplianceTerm => "complianceTerm",
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single term and the label it contributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxonomyEntry<'a> {
    pub term: &'a str,
    pub bucket: Bucket,
    pub label: &'a str,
    /// Only set for [`Bucket::RiskKeyword`].
    pub risk_tier: Option<RiskLevel>,
}

/// Terms grouped under one category label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermGroup {
    pub label: String,
    pub terms: Vec<String>,
}

/// Risk keywords per tier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskKeywords {
    pub high: Vec<String>,
    pub medium: Vec<String>,
    pub low: Vec<String>,
}

/// On-disk taxonomy layout.
///
/// ```json
/// {
///   "deviceTypes": ["implantable", "wearable"],
///   "therapeuticAreas": [{ "label": "cardiology", "terms": ["cardiac", "stent"] }],
///   "complianceTerms": [{ "label": "recall", "terms": ["recall"] }],
///   "riskKeywords": { "high": ["class iii"], "medium": ["class ii"], "low": ["class i"] }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TaxonomyFile {
    pub device_types: Vec<String>,
    pub therapeutic_areas: Vec<TermGroup>,
    pub compliance_terms: Vec<TermGroup>,
    pub risk_keywords: RiskKeywords,
}

/// Validated, lower-cased keyword taxonomy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Taxonomy {
    device_types: Vec<String>,
    therapeutic_areas: Vec<TermGroup>,
    compliance_terms: Vec<TermGroup>,
    /// Tiers in [`RiskLevel::PRECEDENCE`] order.
    risk_tiers: Vec<(RiskLevel, Vec<String>)>,
}

/// Summary statistics for a taxonomy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxonomySummary {
    pub device_types: usize,
    pub therapeutic_areas: usize,
    pub therapeutic_terms: usize,
    pub compliance_categories: usize,
    pub compliance_terms: usize,
    pub risk_keywords: usize,
}

impl Taxonomy {
    /// Validate and normalise a taxonomy file.
    pub fn from_file(file: TaxonomyFile) -> Result<Self, TaxonomyError> {
        let device_types = normalize_terms(file.device_types, Bucket::DeviceType)?;
        let therapeutic_areas = normalize_groups(file.therapeutic_areas, Bucket::TherapeuticArea)?;
        let compliance_terms = normalize_groups(file.compliance_terms, Bucket::ComplianceTerm)?;

        let RiskKeywords { high, medium, low } = file.risk_keywords;
        let risk_tiers = vec![
            (RiskLevel::High, normalize_terms(high, Bucket::RiskKeyword)?),
            (RiskLevel::Medium, normalize_terms(medium, Bucket::RiskKeyword)?),
            (RiskLevel::Low, normalize_terms(low, Bucket::RiskKeyword)?),
        ];

        Ok(Self {
            device_types,
            therapeutic_areas,
            compliance_terms,
            risk_tiers,
        })
    }

    /// Parse a taxonomy from JSON.
    pub fn from_json(json: &str) -> Result<Self, TaxonomyError> {
        Self::from_file(serde_json::from_str(json)?)
    }

    /// Read a taxonomy JSON file.
    pub fn load(path: &Path) -> Result<Self, TaxonomyError> {
        let json = std::fs::read_to_string(path).map_err(|source| TaxonomyError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// The built-in medical-device taxonomy.
    ///
    /// The tables are stored already lower-cased and deduplicated, so they
    /// are used as-is.
    pub fn builtin() -> Self {
        Self {
            device_types: owned(DEVICE_TYPES),
            therapeutic_areas: owned_groups(THERAPEUTIC_AREAS),
            compliance_terms: owned_groups(COMPLIANCE_TERMS),
            risk_tiers: vec![
                (RiskLevel::High, owned(RISK_HIGH)),
                (RiskLevel::Medium, owned(RISK_MEDIUM)),
                (RiskLevel::Low, owned(RISK_LOW)),
            ],
        }
    }

    pub fn device_types(&self) -> &[String] {
        &self.device_types
    }

    pub fn therapeutic_areas(&self) -> &[TermGroup] {
        &self.therapeutic_areas
    }

    pub fn compliance_terms(&self) -> &[TermGroup] {
        &self.compliance_terms
    }

    /// Risk tiers in precedence order (high, medium, low).
    pub fn risk_tiers(&self) -> &[(RiskLevel, Vec<String>)] {
        &self.risk_tiers
    }

    /// Iterate over every term with its bucket and label.
    pub fn entries(&self) -> impl Iterator<Item = TaxonomyEntry<'_>> {
        let devices = self.device_types.iter().map(|t| TaxonomyEntry {
            term: t,
            bucket: Bucket::DeviceType,
            label: t,
            risk_tier: None,
        });
        let risks = self.risk_tiers.iter().flat_map(|(tier, terms)| {
            terms.iter().map(move |t| TaxonomyEntry {
                term: t,
                bucket: Bucket::RiskKeyword,
                label: tier.as_str(),
                risk_tier: Some(*tier),
            })
        });

        devices
            .chain(group_entries(&self.therapeutic_areas, Bucket::TherapeuticArea))
            .chain(group_entries(&self.compliance_terms, Bucket::ComplianceTerm))
            .chain(risks)
    }

    /// Summary statistics.
    pub fn summary(&self) -> TaxonomySummary {
        let term_count = |groups: &[TermGroup]| groups.iter().map(|g| g.terms.len()).sum::<usize>();
        TaxonomySummary {
            device_types: self.device_types.len(),
            therapeutic_areas: self.therapeutic_areas.len(),
            therapeutic_terms: term_count(&self.therapeutic_areas),
            compliance_categories: self.compliance_terms.len(),
            compliance_terms: term_count(&self.compliance_terms),
            risk_keywords: self.risk_tiers.iter().map(|(_, t)| t.len()).sum(),
        }
    }
}

impl Default for Taxonomy {
    fn default() -> Self {
        Self::builtin()
    }
}

fn group_entries(groups: &[TermGroup], bucket: Bucket) -> impl Iterator<Item = TaxonomyEntry<'_>> {
    groups.iter().flat_map(move |g| {
        g.terms.iter().map(move |t| TaxonomyEntry {
            term: t,
            bucket,
            label: &g.label,
            risk_tier: None,
        })
    })
}

fn normalize_terms(terms: Vec<String>, bucket: Bucket) -> Result<Vec<String>, TaxonomyError> {
    let mut out: Vec<String> = Vec::with_capacity(terms.len());
    for term in terms {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return Err(TaxonomyError::EmptyTerm { bucket });
        }
        if !out.contains(&term) {
            out.push(term);
        }
    }
    Ok(out)
}

fn normalize_groups(groups: Vec<TermGroup>, bucket: Bucket) -> Result<Vec<TermGroup>, TaxonomyError> {
    groups
        .into_iter()
        .map(|g| {
            let label = g.label.trim().to_string();
            if label.is_empty() {
                return Err(TaxonomyError::EmptyLabel { bucket });
            }
            let terms = normalize_terms(g.terms, bucket)?;
            if terms.is_empty() {
                return Err(TaxonomyError::EmptyGroup { bucket, label });
            }
            Ok(TermGroup { label, terms })
        })
        .collect()
}

// ── Built-in tables ──

fn owned(terms: &[&str]) -> Vec<String> {
    terms.iter().map(|t| t.to_string()).collect()
}

fn owned_groups(table: &[(&str, &[&str])]) -> Vec<TermGroup> {
    table
        .iter()
        .map(|&(label, terms)| TermGroup {
            label: label.to_string(),
            terms: owned(terms),
        })
        .collect()
}

const DEVICE_TYPES: &[&str] = &[
    "diagnostic",
    "therapeutic",
    "surgical",
    "monitoring",
    "implantable",
    "wearable",
    "cardiovascular",
    "orthopedic",
    "neurological",
    "respiratory",
    "imaging",
    "in vitro",
    "dental",
    "ophthalmic",
    "software",
];

const THERAPEUTIC_AREAS: &[(&str, &[&str])] = &[
    (
        "cardiology",
        &["cardiac", "cardio", "heart", "stent", "pacemaker", "defibrillator"],
    ),
    (
        "orthopedics",
        &[
            "orthopedic",
            "orthopaedic",
            "hip implant",
            "hip replacement",
            "knee",
            "spinal",
            "joint replacement",
        ],
    ),
    (
        "neurology",
        &["neuro", "brain", "epilep", "spinal cord stimulat"],
    ),
    ("oncology", &["oncology", "cancer", "tumor", "tumour", "radiation therapy"]),
    ("diabetes", &["diabetes", "diabetic", "insulin", "glucose"]),
    (
        "respiratory",
        &["respiratory", "ventilator", "cpap", "bipap", "sleep apnea", "oxygen"],
    ),
    (
        "radiology",
        &["imaging", "x-ray", "mri", "ct scan", "ultrasound", "radiolog"],
    ),
    (
        "general surgery",
        &["surgical", "surgery", "hernia", "laparoscop"],
    ),
    (
        "ophthalmology",
        &["ophthalm", "intraocular", "contact lens", "retina"],
    ),
    ("audiology", &["hearing aid", "cochlear", "audiolog"]),
    (
        "digital health",
        &[
            "software as a medical device",
            "samd",
            "digital health",
            "mobile medical app",
            "telehealth",
            "remote monitoring",
        ],
    ),
];

const COMPLIANCE_TERMS: &[(&str, &[&str])] = &[
    (
        "regulatory submission",
        &["510(k)", "premarket", "de novo", "clearance", "ce mark", "ukca"],
    ),
    (
        "quality management",
        &[
            "iso 13485",
            "quality management",
            "quality system",
            "qmsr",
            "capa",
            "design control",
        ],
    ),
    (
        "post-market surveillance",
        &[
            "post-market",
            "postmarket",
            "adverse event",
            "vigilance",
            "complaint handling",
            "periodic safety update",
        ],
    ),
    (
        "recall",
        &["recall", "field safety corrective action", "market withdrawal"],
    ),
    (
        "cybersecurity",
        &["cybersecurity", "software bill of materials", "sbom", "vulnerabilit"],
    ),
    (
        "clinical evidence",
        &[
            "clinical trial",
            "clinical evaluation",
            "clinical investigation",
            "clinical evidence",
        ],
    ),
    (
        "eu mdr",
        &["eu mdr", "medical device regulation", "2017/745", "notified body"],
    ),
    ("ivdr", &["ivdr", "2017/746", "in vitro diagnostic"]),
    (
        "labeling",
        &["labeling", "labelling", "unique device identification", "instructions for use"],
    ),
    (
        "litigation",
        &[
            "lawsuit",
            "litigation",
            "plaintiff",
            "class action",
            "settlement",
            "verdict",
            "product liability",
        ],
    ),
    (
        "ai/ml",
        &[
            "artificial intelligence",
            "machine learning",
            "ai-enabled",
            "predetermined change control",
        ],
    ),
];

const RISK_HIGH: &[&str] = &[
    "class iii",
    "implantable",
    "life-sustaining",
    "life-supporting",
    "class i recall",
    "serious injury",
    "death",
];

const RISK_MEDIUM: &[&str] = &[
    "class ii",
    "510(k)",
    "moderate risk",
    "special controls",
];

const RISK_LOW: &[&str] = &[
    "class i",
    "exempt",
    "wellness",
    "fitness",
    "low risk",
    "general controls",
];
