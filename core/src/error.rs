use thiserror::Error;

/// Errors surfaced by the local data layer.
///
/// Per-item image failures during backup and restore are deliberately NOT
/// represented as early returns — they are collected into the operation's
/// report and the operation continues. The variants here exist for the
/// cases that abort or reject an operation outright, plus the per-item
/// variants used inside reports.
#[derive(Debug, Error)]
pub enum DataError {
    /// The remote recipe API could not be reached or answered non-2xx.
    /// Retryable; local data stays usable.
    #[error("couldn't fetch from the recipe service: {0}")]
    Network(String),

    /// A backup document is not valid JSON or not an object at the top
    /// level. Aborts the restore entirely.
    #[error("backup file is not valid: {0}")]
    Format(String),

    /// Rejected before any store mutation (e.g. blank recipe title,
    /// empty backup selection).
    #[error("{0}")]
    Validation(String),

    /// A local image file could not be read and inlined during backup.
    #[error("couldn't convert image '{path}': {reason}")]
    ImageConversion { path: String, reason: String },

    /// An embedded image could not be decoded back to a file during
    /// restore.
    #[error("couldn't restore image: {0}")]
    ImageRestore(String),
}

impl DataError {
    pub fn validation(msg: impl Into<String>) -> Self {
        DataError::Validation(msg.into())
    }

    pub fn format(msg: impl Into<String>) -> Self {
        DataError::Format(msg.into())
    }
}
