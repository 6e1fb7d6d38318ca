use thiserror::Error;

/// Failure while turning a legacy segment listing (or its JSON form) into a
/// [`crate::table::SegmentTable`]. `line` is 1-based; 0 means "not tied to a line".
#[derive(Debug, Clone, PartialEq, Error)]
#[error("segment listing line {line}: {message}")]
pub struct TableError {
    pub line: usize,
    pub message: String,
}

impl TableError {
    pub fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum DielineError {
    /// A request field is missing, non-numeric, non-finite or not strictly positive.
    #[error("invalid input for {field}: {reason}")]
    InvalidInput { field: String, reason: String },
    /// Every segment collapsed to a point; there is nothing to lay out.
    #[error("no geometry to render: every segment is zero-length")]
    DegenerateGeometry,
    #[error(transparent)]
    Table(#[from] TableError),
    #[error("segment table json: {0}")]
    Json(#[from] serde_json::Error),
}

impl DielineError {
    pub fn invalid(field: &str, reason: impl Into<String>) -> Self {
        DielineError::InvalidInput {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T, E = DielineError> = std::result::Result<T, E>;
