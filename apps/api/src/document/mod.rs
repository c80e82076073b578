//! Document model: turns records into ordered content blocks and headers,
//! and drives the export pipeline over them.

pub mod blocks;
pub mod builder;
pub mod export;
pub mod handlers;
pub mod header;
pub mod labels;

pub use export::{export_documents, preview_documents, DocumentPreview, ExportedDocuments};
pub use header::DocumentKind;
