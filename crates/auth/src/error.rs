use thiserror::Error;

/// Terminal access-control outcomes.
///
/// Each variant ends the current request only; none is retried.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// No credential, or one that is malformed, expired, or names a principal
    /// that no longer exists.
    #[error("not authenticated: {0}")]
    Unauthenticated(String),

    /// Valid identity with an insufficient role, or not the resource owner.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// The resource is absent. Raised by controllers before ownership runs.
    #[error("{0} not found")]
    NotFound(&'static str),
}

impl AuthError {
    pub fn unauthenticated(reason: impl Into<String>) -> Self {
        Self::Unauthenticated(reason.into())
    }

    pub fn forbidden(reason: impl Into<String>) -> Self {
        Self::Forbidden(reason.into())
    }

    /// Machine-readable kind for error bodies and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            AuthError::Unauthenticated(_) => "unauthenticated",
            AuthError::Forbidden(_) => "forbidden",
            AuthError::NotFound(_) => "not_found",
        }
    }
}
