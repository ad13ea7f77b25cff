//! Sync layer: HTTP transport between the local store and the dashboard API.

#[cfg(feature = "http")]
pub mod http;

#[cfg(feature = "http")]
pub use http::{IngestClient, SyncError};
