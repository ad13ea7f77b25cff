//! Regulatory updates and legal cases, and the classification metadata derived from them.

use std::fmt;
use std::str::FromStr;

use arrow::array::{Array, Date32Array, LargeStringArray, StringArray};
use arrow::record_batch::RecordBatch;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Whether a document is a regulatory update or a legal case.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    #[default]
    Regulatory,
    Legal,
}

impl DocumentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Regulatory => "regulatory",
            Self::Legal => "legal",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "regulatory" => Ok(Self::Regulatory),
            "legal" => Ok(Self::Legal),
            _ => Err(CoreError::UnknownLabel {
                field: "kind",
                value: s.to_string(),
            }),
        }
    }
}

/// Priority tier shown on dashboard cards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImpactTier {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl ImpactTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for ImpactTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImpactTier {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "critical" => Ok(Self::Critical),
            _ => Err(CoreError::UnknownLabel {
                field: "impact",
                value: s.to_string(),
            }),
        }
    }
}

/// Device risk level derived from keyword classification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    #[default]
    Medium,
    High,
}

impl RiskLevel {
    /// Tiers in precedence order: the first tier with a keyword hit wins.
    pub const PRECEDENCE: [RiskLevel; 3] = [RiskLevel::High, RiskLevel::Medium, RiskLevel::Low];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskLevel {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(CoreError::UnknownLabel {
                field: "risk level",
                value: s.to_string(),
            }),
        }
    }
}

/// A regulatory update or legal case.
///
/// Created by a seed or ingest step and read-only afterwards. Field names
/// follow the dashboard API's camelCase JSON; `description` is accepted as
/// an alias for `content`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,
    #[serde(default)]
    pub kind: DocumentKind,
    #[serde(default)]
    pub title: String,
    #[serde(default, alias = "description")]
    pub content: String,
    #[serde(default)]
    pub region: String,
    /// Issuing authority for regulatory updates, court for legal cases.
    #[serde(default)]
    pub source: String,
    /// Docket, guidance or notice number.
    #[serde(default)]
    pub reference: Option<String>,
    pub published_date: NaiveDate,
    #[serde(default)]
    pub impact: ImpactTier,
}

impl Document {
    /// Title and content joined for classification.
    pub fn text(&self) -> String {
        format!("{} {}", self.title, self.content)
    }

    /// Build documents from `documents` table Arrow batches.
    ///
    /// Expects the columns of [`crate::schema::tables::documents_schema`];
    /// string columns may be Utf8 or LargeUtf8.
    pub fn from_batches(batches: &[RecordBatch]) -> Result<Vec<Self>, CoreError> {
        let mut out = Vec::new();

        for batch in batches {
            let id_col = column(batch, "id")?;
            let kind_col = column(batch, "kind")?;
            let title_col = column(batch, "title")?;
            let content_col = column(batch, "content")?;
            let region_col = column(batch, "region")?;
            let source_col = column(batch, "source")?;
            let reference_col = batch.column_by_name("reference");
            let date_col = column(batch, "published_date")?
                .as_any()
                .downcast_ref::<Date32Array>()
                .ok_or(CoreError::ColumnType("published_date"))?;
            let impact_col = column(batch, "impact")?;

            for row in 0..batch.num_rows() {
                let required = |col: &dyn Array, name: &'static str| {
                    get_string(col, row).ok_or(CoreError::NullValue { column: name, row })
                };

                let published_date = if date_col.is_null(row) {
                    None
                } else {
                    date_col.value_as_date(row)
                }
                .ok_or(CoreError::NullValue {
                    column: "published_date",
                    row,
                })?;

                out.push(Self {
                    id: required(id_col.as_ref(), "id")?,
                    kind: required(kind_col.as_ref(), "kind")?.parse()?,
                    title: get_string(title_col.as_ref(), row).unwrap_or_default(),
                    content: get_string(content_col.as_ref(), row).unwrap_or_default(),
                    region: get_string(region_col.as_ref(), row).unwrap_or_default(),
                    source: get_string(source_col.as_ref(), row).unwrap_or_default(),
                    reference: reference_col.and_then(|c| get_string(c.as_ref(), row)),
                    published_date,
                    impact: required(impact_col.as_ref(), "impact")?.parse()?,
                });
            }
        }

        Ok(out)
    }
}

/// Categories, device types, risk level and confidence derived from document text.
///
/// Not authoritative: recomputed on demand, and re-running on the same text
/// yields the same assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryAssignment {
    pub categories: Vec<String>,
    pub device_types: Vec<String>,
    pub risk_level: RiskLevel,
    /// In `[0, 1]`.
    pub confidence: f32,
}

/// A category assignment keyed by the document it was derived from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifiedDocument {
    pub document_id: String,
    #[serde(flatten)]
    pub assignment: CategoryAssignment,
}

// ── Arrow extraction helpers ──

fn column<'a>(
    batch: &'a RecordBatch,
    name: &'static str,
) -> Result<&'a arrow::array::ArrayRef, CoreError> {
    batch
        .column_by_name(name)
        .ok_or(CoreError::MissingColumn(name))
}

/// Extract a string value from an Arrow array (handles Utf8 and LargeUtf8).
pub fn get_string(col: &dyn Array, row: usize) -> Option<String> {
    if col.is_null(row) {
        return None;
    }
    col.as_any()
        .downcast_ref::<StringArray>()
        .map(|arr| arr.value(row).to_string())
        .or_else(|| {
            col.as_any()
                .downcast_ref::<LargeStringArray>()
                .map(|arr| arr.value(row).to_string())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::tables;
    use std::sync::Arc;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn days_since_epoch(d: NaiveDate) -> i32 {
        (d - date(1970, 1, 1)).num_days() as i32
    }

    fn documents_batch(rows: &[(&str, &str, Option<&str>, NaiveDate, &str)]) -> RecordBatch {
        let ids: Vec<&str> = rows.iter().map(|r| r.0).collect();
        let kinds: Vec<&str> = rows.iter().map(|r| r.1).collect();
        let titles: Vec<String> = rows.iter().map(|r| format!("Title {}", r.0)).collect();
        let contents: Vec<String> = rows.iter().map(|r| format!("Body {}", r.0)).collect();
        let regions: Vec<&str> = rows.iter().map(|_| "US").collect();
        let sources: Vec<&str> = rows.iter().map(|_| "FDA").collect();
        let references: Vec<Option<&str>> = rows.iter().map(|r| r.2).collect();
        let dates: Vec<i32> = rows.iter().map(|r| days_since_epoch(r.3)).collect();
        let impacts: Vec<&str> = rows.iter().map(|r| r.4).collect();

        RecordBatch::try_new(
            Arc::new(tables::documents_schema()),
            vec![
                Arc::new(StringArray::from(ids)),
                Arc::new(StringArray::from(kinds)),
                Arc::new(StringArray::from(titles)),
                Arc::new(StringArray::from(contents)),
                Arc::new(StringArray::from(regions)),
                Arc::new(StringArray::from(sources)),
                Arc::new(StringArray::from(references)),
                Arc::new(Date32Array::from(dates)),
                Arc::new(StringArray::from(impacts)),
            ],
        )
        .unwrap()
    }

    #[test]
    fn kind_parses_case_insensitively() {
        assert_eq!("Legal".parse::<DocumentKind>().unwrap(), DocumentKind::Legal);
        assert_eq!(
            " regulatory ".parse::<DocumentKind>().unwrap(),
            DocumentKind::Regulatory
        );
        assert!("guidance".parse::<DocumentKind>().is_err());
    }

    #[test]
    fn risk_precedence_is_high_medium_low() {
        assert_eq!(
            RiskLevel::PRECEDENCE,
            [RiskLevel::High, RiskLevel::Medium, RiskLevel::Low]
        );
        assert_eq!(RiskLevel::default(), RiskLevel::Medium);
    }

    #[test]
    fn document_json_uses_camel_case() {
        let doc = Document {
            id: "REG-00001".into(),
            kind: DocumentKind::Regulatory,
            title: "FDA finalizes cybersecurity guidance".into(),
            content: "Premarket submissions must include an SBOM.".into(),
            region: "US".into(),
            source: "FDA".into(),
            reference: None,
            published_date: date(2025, 9, 27),
            impact: ImpactTier::High,
        };
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["publishedDate"], "2025-09-27");
        assert_eq!(json["kind"], "regulatory");
        assert_eq!(json["impact"], "high");
    }

    #[test]
    fn document_accepts_description_alias_and_defaults() {
        let json = r#"{
            "id": "LEG-00042",
            "title": "In re Philips CPAP",
            "description": "Foam degradation claims",
            "publishedDate": "2024-04-29"
        }"#;
        let doc: Document = serde_json::from_str(json).unwrap();
        assert_eq!(doc.content, "Foam degradation claims");
        assert_eq!(doc.kind, DocumentKind::Regulatory);
        assert_eq!(doc.impact, ImpactTier::Medium);
        assert!(doc.reference.is_none());
        assert_eq!(doc.text(), "In re Philips CPAP Foam degradation claims");
    }

    #[test]
    fn classified_document_flattens_assignment() {
        let classified = ClassifiedDocument {
            document_id: "REG-00001".into(),
            assignment: CategoryAssignment {
                categories: vec!["cardiology".into()],
                device_types: vec!["implantable".into()],
                risk_level: RiskLevel::High,
                confidence: 0.4,
            },
        };
        let json = serde_json::to_value(&classified).unwrap();
        assert_eq!(json["documentId"], "REG-00001");
        assert_eq!(json["deviceTypes"][0], "implantable");
        assert_eq!(json["riskLevel"], "high");

        let parsed: ClassifiedDocument = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, classified);
    }

    #[test]
    fn from_batches_reads_all_columns() {
        let batch = documents_batch(&[
            ("REG-00001", "regulatory", Some("FDA-2023-D-1234"), date(2025, 1, 3), "high"),
            ("LEG-00001", "legal", None, date(2024, 12, 31), "critical"),
        ]);

        let docs = Document::from_batches(&[batch]).unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].id, "REG-00001");
        assert_eq!(docs[0].reference.as_deref(), Some("FDA-2023-D-1234"));
        assert_eq!(docs[0].published_date, date(2025, 1, 3));
        assert_eq!(docs[1].kind, DocumentKind::Legal);
        assert_eq!(docs[1].impact, ImpactTier::Critical);
        assert!(docs[1].reference.is_none());
    }

    #[test]
    fn from_batches_rejects_unknown_kind() {
        let batch = documents_batch(&[("X-1", "memo", None, date(2025, 1, 1), "low")]);
        let err = Document::from_batches(&[batch]).unwrap_err();
        assert!(matches!(err, CoreError::UnknownLabel { field: "kind", .. }));
    }

    #[test]
    fn from_batches_requires_id_column() {
        let schema = arrow::datatypes::Schema::new(vec![arrow::datatypes::Field::new(
            "title",
            arrow::datatypes::DataType::Utf8,
            false,
        )]);
        let batch = RecordBatch::try_new(
            Arc::new(schema),
            vec![Arc::new(StringArray::from(vec!["orphan"]))],
        )
        .unwrap();
        let err = Document::from_batches(&[batch]).unwrap_err();
        assert!(matches!(err, CoreError::MissingColumn("id")));
    }

    #[test]
    fn from_batches_empty() {
        assert!(Document::from_batches(&[]).unwrap().is_empty());
    }
}
