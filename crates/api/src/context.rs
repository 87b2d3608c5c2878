use vaxbook_auth::{Principal, PrincipalId, Role};

/// Principal context for a request (authenticated identity + role).
///
/// Inserted into request extensions by the gate middleware; handlers behind a
/// guarded route extract it with `Extension<PrincipalContext>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrincipalContext {
    principal: Principal,
}

impl PrincipalContext {
    pub fn new(principal: Principal) -> Self {
        Self { principal }
    }

    pub fn principal(&self) -> &Principal {
        &self.principal
    }

    pub fn principal_id(&self) -> PrincipalId {
        self.principal.id
    }

    pub fn role(&self) -> Role {
        self.principal.role
    }
}
