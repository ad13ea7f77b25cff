//! DuckDB storage for documents and their classification metadata.

use std::path::Path;

use arrow::datatypes::{DataType, Schema};
use arrow::record_batch::RecordBatch;
use chrono::{DateTime, Utc};
use duckdb::{Connection, params};
use regintel_core::{ClassifiedDocument, Document, DocumentKind, RiskLevel, tables};
use tracing::{debug, info};

use crate::StoreError;

/// Separator used to pass label lists through a single VARCHAR parameter.
const LIST_SEP: &str = "\u{1f}";

const UPSERT_DOCUMENT: &str = "INSERT OR REPLACE INTO documents VALUES \
     (?, ?, ?, ?, ?, ?, ?, CAST(? AS DATE), ?)";

const UPSERT_CLASSIFICATION: &str = "INSERT OR REPLACE INTO classifications VALUES (
        $1,
        CASE WHEN $2 = '' THEN []::VARCHAR[] ELSE string_split($2, $7) END,
        CASE WHEN $3 = '' THEN []::VARCHAR[] ELSE string_split($3, $7) END,
        $4,
        $5,
        $6
    )";

/// DuckDB store holding source documents and derived classifications.
///
/// The `documents` table keeps one row per regulatory update or legal case.
/// The `classifications` table keeps the latest assignment per document and
/// can be rebuilt at any time from the documents.
///
/// Use [`open`](Self::open) for in-memory and [`open_persistent`](Self::open_persistent)
/// for file-backed storage that survives across process restarts.
pub struct DuckStore {
    conn: Connection,
}

impl DuckStore {
    /// Open an in-memory DuckDB database.
    pub fn open() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    /// Open or create a persistent DuckDB database at the given path.
    pub fn open_persistent(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        Ok(Self { conn })
    }

    /// Create the `documents` and `classifications` tables if missing.
    pub fn ensure_schema(&self) -> Result<(), StoreError> {
        let ddl = [
            create_table_sql("documents", &tables::documents_schema(), "id")?,
            create_table_sql(
                "classifications",
                &tables::classifications_schema(),
                "document_id",
            )?,
        ];
        for sql in &ddl {
            debug!(%sql, "ensure table");
            self.conn.execute_batch(sql)?;
        }
        Ok(())
    }

    /// Check whether both tables exist.
    pub fn has_tables(&self) -> bool {
        self.document_count().is_ok() && self.classification_count().is_ok()
    }

    // ── Writes ──

    /// Insert documents, replacing any existing row with the same id.
    pub fn insert_documents(&self, docs: &[Document]) -> Result<usize, StoreError> {
        let mut stmt = self.conn.prepare(UPSERT_DOCUMENT)?;
        for doc in docs {
            stmt.execute(params![
                doc.id,
                doc.kind.as_str(),
                doc.title,
                doc.content,
                doc.region,
                doc.source,
                doc.reference.as_deref(),
                doc.published_date.format("%Y-%m-%d").to_string(),
                doc.impact.as_str(),
            ])?;
        }
        info!(count = docs.len(), "stored documents");
        Ok(docs.len())
    }

    /// Store classifications stamped with the current time.
    pub fn store_classifications(&self, items: &[ClassifiedDocument]) -> Result<usize, StoreError> {
        self.store_classifications_at(items, Utc::now())
    }

    /// Store classifications, replacing any previous row per document.
    pub fn store_classifications_at(
        &self,
        items: &[ClassifiedDocument],
        classified_at: DateTime<Utc>,
    ) -> Result<usize, StoreError> {
        let stamp = classified_at.to_rfc3339();
        let mut stmt = self.conn.prepare(UPSERT_CLASSIFICATION)?;
        for item in items {
            let a = &item.assignment;
            stmt.execute(params![
                item.document_id,
                join_labels(&a.categories)?,
                join_labels(&a.device_types)?,
                a.risk_level.as_str(),
                a.confidence,
                stamp,
                LIST_SEP,
            ])?;
        }
        info!(count = items.len(), "stored classifications");
        Ok(items.len())
    }

    // ── Counts ──

    /// Number of rows in the `documents` table.
    pub fn document_count(&self) -> Result<usize, StoreError> {
        self.count_table("documents")
    }

    /// Number of rows in the `classifications` table.
    pub fn classification_count(&self) -> Result<usize, StoreError> {
        self.count_table("classifications")
    }

    fn count_table(&self, table: &str) -> Result<usize, StoreError> {
        let sql = format!("SELECT count(*)::BIGINT AS cnt FROM {table}");
        let mut stmt = self.conn.prepare(&sql)?;
        let batches: Vec<RecordBatch> = stmt.query_arrow([])?.collect();
        let batch = batches.first().ok_or(StoreError::NoResults)?;
        let col = batch
            .column(0)
            .as_any()
            .downcast_ref::<arrow::array::Int64Array>()
            .ok_or_else(|| StoreError::Other("count column not i64".into()))?;
        Ok(col.value(0) as usize)
    }

    // ── Reads ──

    /// Fetch a single document row by id.
    pub fn get_document(&self, id: &str) -> Result<RecordBatch, StoreError> {
        self.single_row("SELECT * FROM documents WHERE id = ?", id)
    }

    /// Fetch the stored classification for a document.
    pub fn classification_for(&self, document_id: &str) -> Result<RecordBatch, StoreError> {
        self.single_row(
            "SELECT * FROM classifications WHERE document_id = ?",
            document_id,
        )
    }

    /// All documents, optionally of one kind, newest first.
    pub fn documents(&self, kind: Option<DocumentKind>) -> Result<Vec<Document>, StoreError> {
        let batches = match kind {
            Some(kind) => self.query_with(
                "SELECT * FROM documents WHERE kind = ? ORDER BY published_date DESC, id",
                kind.as_str(),
            )?,
            None => self.query_arrow("SELECT * FROM documents ORDER BY published_date DESC, id")?,
        };
        Ok(Document::from_batches(&batches)?)
    }

    /// Documents whose stored classification has the given risk level.
    pub fn documents_by_risk(&self, level: RiskLevel) -> Result<Vec<Document>, StoreError> {
        let batches = self.query_with(
            "SELECT d.* FROM documents d
             JOIN classifications c ON c.document_id = d.id
             WHERE c.risk_level = ?
             ORDER BY d.published_date DESC, d.id",
            level.as_str(),
        )?;
        Ok(Document::from_batches(&batches)?)
    }

    fn query_with(&self, sql: &str, param: &str) -> Result<Vec<RecordBatch>, StoreError> {
        let mut stmt = self.conn.prepare(sql)?;
        let batches: Vec<RecordBatch> = stmt.query_arrow([param])?.collect();
        Ok(batches)
    }

    fn single_row(&self, sql: &str, key: &str) -> Result<RecordBatch, StoreError> {
        let batch = self
            .query_with(sql, key)?
            .into_iter()
            .find(|b| b.num_rows() > 0)
            .ok_or(StoreError::NoResults)?;
        Ok(batch)
    }

    // ── Escape hatch ──

    /// Execute arbitrary SQL and return Arrow RecordBatches.
    pub fn query_arrow(&self, sql: &str) -> Result<Vec<RecordBatch>, StoreError> {
        let mut stmt = self.conn.prepare(sql)?;
        let batches: Vec<RecordBatch> = stmt.query_arrow([])?.collect();
        Ok(batches)
    }

    /// Access the underlying DuckDB connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

/// `CREATE TABLE IF NOT EXISTS` statement for an Arrow schema.
fn create_table_sql(table: &str, schema: &Schema, primary_key: &str) -> Result<String, StoreError> {
    let mut columns = Vec::with_capacity(schema.fields().len() + 1);
    for field in schema.fields() {
        let ty = sql_type(field.data_type()).ok_or_else(|| StoreError::UnsupportedType {
            column: field.name().clone(),
            data_type: field.data_type().to_string(),
        })?;
        let null = if field.is_nullable() { "" } else { " NOT NULL" };
        columns.push(format!("{} {ty}{null}", field.name()));
    }
    columns.push(format!("PRIMARY KEY ({primary_key})"));
    Ok(format!(
        "CREATE TABLE IF NOT EXISTS {table} ({})",
        columns.join(", ")
    ))
}

fn sql_type(data_type: &DataType) -> Option<String> {
    let ty = match data_type {
        DataType::Utf8 | DataType::LargeUtf8 => "VARCHAR".to_string(),
        DataType::Date32 => "DATE".to_string(),
        DataType::Float32 => "FLOAT".to_string(),
        DataType::Float64 => "DOUBLE".to_string(),
        DataType::Int32 => "INTEGER".to_string(),
        DataType::Int64 => "BIGINT".to_string(),
        DataType::Boolean => "BOOLEAN".to_string(),
        DataType::List(inner) | DataType::LargeList(inner) => {
            format!("{}[]", sql_type(inner.data_type())?)
        }
        _ => return None,
    };
    Some(ty)
}

fn join_labels(labels: &[String]) -> Result<String, StoreError> {
    if let Some(bad) = labels.iter().find(|l| l.is_empty() || l.contains(LIST_SEP)) {
        return Err(StoreError::Other(format!("invalid label {bad:?}")));
    }
    Ok(labels.join(LIST_SEP))
}
