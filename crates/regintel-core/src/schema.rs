/// Arrow schema definitions for the document store.
pub mod tables {
    use arrow::datatypes::{DataType, Field, Schema};
    use std::sync::Arc;

    /// Schema for regulatory updates and legal cases.
    pub fn documents_schema() -> Schema {
        Schema::new(vec![
            Field::new("id", DataType::Utf8, false),
            Field::new("kind", DataType::Utf8, false),
            Field::new("title", DataType::Utf8, false),
            Field::new("content", DataType::Utf8, false),
            Field::new("region", DataType::Utf8, false),
            Field::new("source", DataType::Utf8, false),
            Field::new("reference", DataType::Utf8, true),
            Field::new("published_date", DataType::Date32, false),
            Field::new("impact", DataType::Utf8, false),
        ])
    }

    /// Schema for derived classification metadata, one row per document.
    pub fn classifications_schema() -> Schema {
        Schema::new(vec![
            Field::new("document_id", DataType::Utf8, false),
            Field::new(
                "categories",
                DataType::List(Arc::new(Field::new("item", DataType::Utf8, true))),
                false,
            ),
            Field::new(
                "device_types",
                DataType::List(Arc::new(Field::new("item", DataType::Utf8, true))),
                false,
            ),
            Field::new("risk_level", DataType::Utf8, false),
            Field::new("confidence", DataType::Float32, false),
            Field::new("classified_at", DataType::Utf8, false),
        ])
    }
}
