/// Convenience result type used across shapecrop.
pub type ShapecropResult<T> = Result<T, ShapecropError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum ShapecropError {
    /// Rejected user input or configuration (non-image file, bad config values).
    #[error("validation error: {0}")]
    Validation(String),

    /// A catalog lookup for an unknown identifier.
    #[error("not found: {0}")]
    NotFound(String),

    /// A bitmap failed to decode or is unusable for compositing.
    #[error("decode error: {0}")]
    Decode(String),

    /// No raster target could be set up for a render attempt.
    #[error("rendering unavailable: {0}")]
    RenderingUnavailable(String),

    /// Encoding or delivering an exported file failed.
    #[error("export error: {0}")]
    Export(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ShapecropError {
    /// Build a [`ShapecropError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ShapecropError::NotFound`] value.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Build a [`ShapecropError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`ShapecropError::RenderingUnavailable`] value.
    pub fn rendering_unavailable(msg: impl Into<String>) -> Self {
        Self::RenderingUnavailable(msg.into())
    }

    /// Build a [`ShapecropError::Export`] value.
    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
