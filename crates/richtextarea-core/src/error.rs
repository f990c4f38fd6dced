//! Error type for surface operations.

/// Failure reported by a [`Surface`](crate::Surface) primitive.
///
/// The sync engine never surfaces these to the host: a failure either turns
/// into a readiness retry or is logged and skipped.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SurfaceError {
    /// The sandbox frame or its document cannot be located right now.
    #[error("sandbox document is not available")]
    Detached,

    /// The platform rejected a DOM operation.
    #[error("dom operation failed: {0}")]
    Dom(String),
}

impl From<&str> for SurfaceError {
    fn from(s: &str) -> Self {
        SurfaceError::Dom(s.to_string())
    }
}

impl From<String> for SurfaceError {
    fn from(s: String) -> Self {
        SurfaceError::Dom(s)
    }
}
