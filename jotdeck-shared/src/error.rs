/// Domain error taxonomy shared across the API and worker
///
/// Every fallible operation in the shared library surfaces one of these
/// variants. The API layer maps them to HTTP status codes; the worker
/// records `ExternalService` failures into the item itself rather than
/// propagating them.

use thiserror::Error;

/// Shared result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Unified domain error
#[derive(Debug, Error)]
pub enum Error {
    /// No valid identity context on the request
    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    /// Referenced item or tag does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Authenticated but lacks rights on the target item
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// External search API unreachable, non-success, or misconfigured
    #[error("External service error: {0}")]
    ExternalService(String),

    /// Underlying database failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Error {
    /// True when the error should be swallowed to `None` on the read path
    ///
    /// `getItem` folds missing and unauthorized into "not visible" instead
    /// of surfacing the distinction to the caller.
    pub fn is_soft_read_failure(&self) -> bool {
        matches!(self, Error::NotFound(_) | Error::Forbidden(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Forbidden("not the creator".to_string());
        assert_eq!(err.to_string(), "Forbidden: not the creator");

        let err = Error::NotFound("item missing".to_string());
        assert_eq!(err.to_string(), "Not found: item missing");
    }

    #[test]
    fn test_soft_read_failure() {
        assert!(Error::NotFound("x".into()).is_soft_read_failure());
        assert!(Error::Forbidden("x".into()).is_soft_read_failure());
        assert!(!Error::Unauthenticated("x".into()).is_soft_read_failure());
        assert!(!Error::ExternalService("x".into()).is_soft_read_failure());
    }
}
