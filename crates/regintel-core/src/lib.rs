pub mod document;
pub mod error;
pub mod schema;
pub mod seed;

pub use document::{
    CategoryAssignment, ClassifiedDocument, Document, DocumentKind, ImpactTier, RiskLevel,
};
pub use error::CoreError;
pub use schema::tables;
