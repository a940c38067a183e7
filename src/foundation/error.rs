/// Convenience result type used across courtplay.
pub type CourtResult<T> = Result<T, CourtError>;

/// Top-level error taxonomy for the fallible parts of the crate.
///
/// The playback engine itself is total over well-formed input; these errors come from
/// document validation, builders, loading, and configuration.
#[derive(thiserror::Error, Debug)]
pub enum CourtError {
    /// Invalid play document or builder input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while flattening or resolving a timeline.
    #[error("timeline error: {0}")]
    Timeline(String),

    /// Errors raised by playback session plumbing.
    #[error("playback error: {0}")]
    Playback(String),

    /// Errors when serializing or deserializing documents and options.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CourtError {
    /// Build a [`CourtError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`CourtError::Timeline`] value.
    pub fn timeline(msg: impl Into<String>) -> Self {
        Self::Timeline(msg.into())
    }

    /// Build a [`CourtError::Playback`] value.
    pub fn playback(msg: impl Into<String>) -> Self {
        Self::Playback(msg.into())
    }

    /// Build a [`CourtError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for CourtError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serde(e.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
