//! Error types for the garment vision pipeline

use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, VisionError>;

/// Error types for garment detection, classification and recommendation
#[derive(Error, Debug)]
pub enum VisionError {
    /// Input/output errors (stream read failures, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Image decoding or encoding errors
    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),

    /// One of the injected model capabilities failed or is unreachable
    #[error("Capability error: {0}")]
    Capability(String),

    /// Invalid configuration or parameters
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Mask geometry, compositing or encoding errors
    #[error("Processing error: {0}")]
    Processing(String),

    /// The text-generation capability is not configured; recommendation
    /// requests fail fast before any prompt is built
    #[error("Recommendation unavailable: {0}")]
    RecommendationUnavailable(String),

    /// Generic error for unexpected conditions
    #[error("Internal error: {0}")]
    Internal(String),
}

impl VisionError {
    /// Create a new capability error
    pub fn capability<S: Into<String>>(msg: S) -> Self {
        Self::Capability(msg.into())
    }

    /// Create a new invalid configuration error
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create a new processing error
    pub fn processing<S: Into<String>>(msg: S) -> Self {
        Self::Processing(msg.into())
    }

    /// Create a new recommendation-unavailable error
    pub fn recommendation_unavailable<S: Into<String>>(msg: S) -> Self {
        Self::RecommendationUnavailable(msg.into())
    }

    /// Create a new internal error
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        Self::Internal(msg.into())
    }

    /// Wrap a capability failure with the capability's name for diagnostics
    pub fn capability_failed(capability: &str, error: &dyn std::fmt::Display) -> Self {
        Self::Capability(format!("{capability} failed: {error}"))
    }
}
