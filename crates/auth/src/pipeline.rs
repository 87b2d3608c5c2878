//! Ordered, short-circuiting request checks.
//!
//! Each route declares its checks as a value, so ordering is visible at the
//! call site instead of being implied by middleware registration order.

use std::sync::Arc;

use crate::authorize::authorize;
use crate::{AuthError, Principal, Role};

/// Outcome of a single check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Proceed,
    Reject(AuthError),
}

impl From<Result<(), AuthError>> for Verdict {
    fn from(value: Result<(), AuthError>) -> Self {
        match value {
            Ok(()) => Verdict::Proceed,
            Err(e) => Verdict::Reject(e),
        }
    }
}

/// One composable request check.
pub trait RequestCheck: Send + Sync {
    fn name(&self) -> &'static str;

    fn check(&self, principal: Option<&Principal>) -> Verdict;
}

/// Rejects requests without a resolved principal.
#[derive(Debug, Clone, Copy)]
pub struct RequireAuthenticated;

impl RequestCheck for RequireAuthenticated {
    fn name(&self) -> &'static str {
        "require_authenticated"
    }

    fn check(&self, principal: Option<&Principal>) -> Verdict {
        match principal {
            Some(_) => Verdict::Proceed,
            None => Verdict::Reject(AuthError::unauthenticated("authentication required")),
        }
    }
}

/// Role authorizer as a pipeline stage.
#[derive(Debug, Clone)]
pub struct RequireRole {
    allowed: Vec<Role>,
}

impl RequireRole {
    pub fn any_of(allowed: impl IntoIterator<Item = Role>) -> Self {
        Self {
            allowed: allowed.into_iter().collect(),
        }
    }
}

impl RequestCheck for RequireRole {
    fn name(&self) -> &'static str {
        "require_role"
    }

    fn check(&self, principal: Option<&Principal>) -> Verdict {
        authorize(principal, &self.allowed).into()
    }
}

#[derive(Clone, Default)]
pub struct CheckPipeline {
    checks: Vec<Arc<dyn RequestCheck>>,
}

impl CheckPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Any authenticated principal.
    pub fn authenticated() -> Self {
        Self::new().then(RequireAuthenticated)
    }

    /// Authenticated and holding one of `roles`.
    pub fn roles(roles: impl IntoIterator<Item = Role>) -> Self {
        Self::authenticated().then(RequireRole::any_of(roles))
    }

    pub fn then(mut self, check: impl RequestCheck + 'static) -> Self {
        self.checks.push(Arc::new(check));
        self
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    /// Run checks in order; the first rejection wins.
    pub fn run(&self, principal: Option<&Principal>) -> Verdict {
        for check in &self.checks {
            if let Verdict::Reject(e) = check.check(principal) {
                tracing::debug!(check = check.name(), kind = e.kind(), "request check rejected");
                return Verdict::Reject(e);
            }
        }
        Verdict::Proceed
    }
}

impl core::fmt::Debug for CheckPipeline {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list()
            .entries(self.checks.iter().map(|c| c.name()))
            .finish()
    }
}
