//! Error types for the export pipeline.

use thiserror::Error;

/// Result type alias for export operations.
pub type ExportResult<T> = Result<T, ExportError>;

/// Errors that can occur while building or serializing the bone graph.
#[derive(Debug, Error)]
pub enum ExportError {
    /// A bone or body references a bone index that does not exist.
    #[error("{referrer} references bone index {index}, but the rig has {bone_count} bones")]
    DanglingBoneRef {
        /// Description of the referring element (bone or body, by index).
        referrer: String,
        /// The out-of-range bone index.
        index: usize,
        /// Number of bones actually present.
        bone_count: usize,
    },

    /// I/O error while writing the DOT output.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
