pub mod document;
pub mod error;
pub mod export;
pub mod pandoc;

// Re-export key types for easier usage
pub use document::{Mark, Node, NodeKind};
pub use error::{ExportError, Result};
pub use export::{
    DefaultPriority, ExportOptions, Exporter, IndexDefinition, MarkPriority, export_document,
};
pub use pandoc::Pandoc;
