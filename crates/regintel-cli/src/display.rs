//! Vertical card display for documents, classifications and summaries.
//!
//! Renders single-row RecordBatches as grouped, human-readable cards
//! with type-aware formatting for scalars and `List<Utf8>` columns.

use arrow::array::*;
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use regintel_ai::{Summary, Taxonomy};
use regintel_core::Document;

const MAX_TITLE: usize = 70;
const CONTENT_WIDTH: usize = 78;

// ── Schema section groupings ──

const IDENTITY: &[&str] = &["id", "kind", "reference", "source", "region"];

const PUBLICATION: &[&str] = &["published_date", "impact"];

const CLASSIFICATION: &[&str] = &["risk_level", "confidence", "categories", "device_types"];

const TIMESTAMPS: &[&str] = &["classified_at"];

// ── Public API ──

/// Print a single document row as a vertical card grouped by section.
pub fn print_document_card(batch: &RecordBatch) {
    let id = get_utf8(batch, "id").unwrap_or_default();
    let title = get_utf8(batch, "title").unwrap_or_default();

    println!("=== {} ===", id);
    if !title.is_empty() {
        println!("{}", title);
    }
    println!();

    print_section(batch, "Identity", IDENTITY);
    print_section(batch, "Publication", PUBLICATION);

    if let Some(content) = get_utf8(batch, "content")
        && !content.trim().is_empty()
    {
        println!("Content");
        for line in wrap(&content, CONTENT_WIDTH) {
            println!("  {line}");
        }
        println!();
    }
}

/// Print a stored classification row.
pub fn print_classification_card(batch: &RecordBatch) {
    print_section(batch, "Classification", CLASSIFICATION);
    print_section(batch, "Timestamps", TIMESTAMPS);
}

/// Print a risk narrative.
pub fn print_summary(summary: &Summary) {
    println!("Summary");
    println!("  {:<18} {}", "risk", summary.risk_level);
    println!(
        "  {:<18} {}",
        "action required",
        if summary.action_required { "yes" } else { "no" }
    );
    println!("  {:<18} {} min", "read time", summary.estimated_read_time);
    println!();
    for line in wrap(&summary.summary, CONTENT_WIDTH) {
        println!("  {line}");
    }
    println!();
    for point in &summary.key_points {
        println!("  - {point}");
    }
    println!();
}

/// Print one line per document: id, date, kind, impact, title.
pub fn print_document_rows(docs: &[Document]) {
    for doc in docs {
        println!(
            "{:<10}  {}  {:<10}  {:<8}  {}",
            doc.id,
            doc.published_date,
            doc.kind.as_str(),
            doc.impact.as_str(),
            truncate(&doc.title, MAX_TITLE)
        );
    }
    println!("({} documents)", docs.len());
}

/// Print taxonomy counts, and every term by bucket when `terms` is set.
pub fn print_taxonomy(taxonomy: &Taxonomy, terms: bool) {
    let s = taxonomy.summary();
    println!("Taxonomy");
    println!("  {:<26} {}", "device types", s.device_types);
    println!(
        "  {:<26} {} ({} terms)",
        "therapeutic areas", s.therapeutic_areas, s.therapeutic_terms
    );
    println!(
        "  {:<26} {} ({} terms)",
        "compliance categories", s.compliance_categories, s.compliance_terms
    );
    println!("  {:<26} {}", "risk keywords", s.risk_keywords);
    println!();

    if !terms {
        return;
    }
    let mut current = None;
    for entry in taxonomy.entries() {
        if current != Some(entry.bucket) {
            println!("{}", entry.bucket);
            current = Some(entry.bucket);
        }
        if entry.label == entry.term {
            println!("  {}", entry.term);
        } else {
            println!("  {:<26} {}", entry.label, entry.term);
        }
    }
}

// ── Section rendering ──

fn print_section(batch: &RecordBatch, header: &str, cols: &[&str]) {
    // Check if any column in this section has a non-null value.
    let has_data = cols.iter().any(|&col| {
        batch
            .schema()
            .index_of(col)
            .ok()
            .is_some_and(|i| !batch.column(i).is_null(0))
    });
    if !has_data {
        return;
    }

    println!("{header}");
    for &col_name in cols {
        let idx = match batch.schema().index_of(col_name) {
            Ok(i) => i,
            Err(_) => continue,
        };
        let col = batch.column(idx);
        if col.is_null(0) {
            continue;
        }

        match col.data_type() {
            DataType::Utf8 | DataType::LargeUtf8 => {
                if let Some(value) = col_str(col.as_ref(), 0) {
                    println!("  {:<26} {}", col_name, value);
                }
            }
            DataType::Float32 => {
                if let Some(arr) = col.as_any().downcast_ref::<Float32Array>() {
                    println!("  {:<26} {:.2}", col_name, arr.value(0));
                }
            }
            DataType::Date32 | DataType::Timestamp(_, _) => {
                let formatted = arrow::util::display::ArrayFormatter::try_new(
                    col.as_ref(),
                    &Default::default(),
                );
                match formatted {
                    Ok(fmt) => println!("  {:<26} {}", col_name, fmt.value(0)),
                    Err(_) => println!("  {:<26} (date)", col_name),
                }
            }
            DataType::List(_) => print_list_utf8(col.as_ref(), col_name),
            other => println!("  {:<26} ({other})", col_name),
        }
    }
    println!();
}

// ── List<Utf8> ──

fn print_list_utf8(col: &dyn Array, col_name: &str) {
    let Some(list) = col.as_any().downcast_ref::<ListArray>() else {
        return;
    };
    let values = list.value(0);
    let items: Vec<&str> = (0..values.len())
        .filter_map(|i| col_str(values.as_ref(), i))
        .collect();
    if items.is_empty() {
        println!("  {:<26} -", col_name);
        return;
    }
    println!("  {:<26} {}", col_name, items.join(", "));
}

// ── Helpers ──

fn get_utf8(batch: &RecordBatch, col_name: &str) -> Option<String> {
    let idx = batch.schema().index_of(col_name).ok()?;
    col_str(batch.column(idx).as_ref(), 0).map(str::to_string)
}

/// Get a string value from a column that might be Utf8 or LargeUtf8.
fn col_str(col: &dyn Array, i: usize) -> Option<&str> {
    if col.is_null(i) {
        return None;
    }
    if let Some(arr) = col.as_any().downcast_ref::<StringArray>() {
        return Some(arr.value(i));
    }
    if let Some(arr) = col.as_any().downcast_ref::<LargeStringArray>() {
        return Some(arr.value(i));
    }
    None
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let head: String = s.chars().take(max - 3).collect();
    format!("{head}...")
}

/// Greedy word wrap.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        if !line.is_empty() && line.chars().count() + 1 + word.chars().count() > width {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}
