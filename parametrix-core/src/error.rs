/// Errors raised while turning a descriptor into geometry
use thiserror::Error;

/// Per-shape failures. All of them are recoverable: a render pass skips the
/// offending descriptor and keeps going.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("invalid parameters for {kind}: {reason}")]
    InvalidParameters { kind: String, reason: String },

    #[error("unknown construction plane: {0}")]
    UnknownPlane(String),

    #[error("unsupported shape kind: {0}")]
    UnsupportedShape(String),
}

impl EngineError {
    pub fn invalid(kind: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameters {
            kind: kind.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;

/// A descriptor a render pass could not draw.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedShape {
    /// Position in the descriptor list
    pub index: usize,
    pub name: String,
    pub error: EngineError,
}
