use thiserror::Error;

/// Failures that abort an export. No partial output is produced.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Unknown node type '{node_type}' at {path}")]
    UnknownNodeType { node_type: String, path: String },

    #[error("Invalid document structure at {path}: {message}")]
    Structure { path: String, message: String },

    #[error("Mark ranges did not untangle after {resolutions} resolutions ({ranges} ranges)")]
    UntangleDiverged { resolutions: usize, ranges: usize },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Serialized output is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

pub type Result<T, E = ExportError> = std::result::Result<T, E>;
