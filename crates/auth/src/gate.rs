//! The access control gate: resolver → ordered checks → ownership.

use chrono::{DateTime, Utc};

use crate::authorize::{Owned, check_ownership};
use crate::pipeline::{CheckPipeline, Verdict};
use crate::resolver::IdentityResolver;
use crate::{AuthError, Principal};

/// Stateless per-request policy unit.
///
/// Holds only read-only collaborators, so one instance is shared by every
/// request without locking.
#[derive(Clone)]
pub struct AccessGate {
    resolver: IdentityResolver,
}

impl AccessGate {
    pub fn new(resolver: IdentityResolver) -> Self {
        Self { resolver }
    }

    /// Resolve the caller, then run `checks` in order.
    ///
    /// Resolution failures end the request before any check executes.
    pub async fn admit(
        &self,
        credential: Option<&str>,
        checks: &CheckPipeline,
        now: DateTime<Utc>,
    ) -> Result<Principal, AuthError> {
        let principal = self.resolver.resolve(credential, now).await.inspect_err(|e| {
            tracing::debug!(kind = e.kind(), reason = %e, "credential rejected");
        })?;

        match checks.run(Some(&principal)) {
            Verdict::Proceed => {
                tracing::debug!(principal_id = %principal.id, role = %principal.role, "request admitted");
                Ok(principal)
            }
            Verdict::Reject(e) => Err(e),
        }
    }

    /// Ownership stage; call after the controller has loaded `resource`.
    pub fn check_ownership<R: Owned + ?Sized>(&self, principal: &Principal, resource: &R) -> Result<(), AuthError> {
        check_ownership(principal, resource)
    }
}

impl core::fmt::Debug for AccessGate {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AccessGate").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use chrono::Duration;

    use super::*;
    use crate::store::PrincipalStore;
    use crate::token::{Hs256JwtValidator, JwtIssuer};
    use crate::{JwtClaims, PrincipalId, Role};

    struct One(Principal);

    #[async_trait]
    impl PrincipalStore for One {
        async fn find_principal_by_id(&self, id: PrincipalId) -> Option<Principal> {
            (id == self.0.id).then_some(self.0)
        }
    }

    struct Appointment {
        owner: PrincipalId,
    }

    impl Owned for Appointment {
        fn owner(&self) -> Option<PrincipalId> {
            Some(self.owner)
        }
    }

    fn gate_for(p: Principal) -> (AccessGate, String) {
        let codec = Arc::new(Hs256JwtValidator::new("gate-secret"));
        let token = codec
            .issue(&JwtClaims::new(p.id, p.role, Utc::now(), Duration::minutes(5)))
            .unwrap();
        let resolver = IdentityResolver::new(codec, Arc::new(One(p)));
        (AccessGate::new(resolver), token)
    }

    #[tokio::test]
    async fn no_credential_fails_before_role_checks() {
        let (gate, _) = gate_for(Principal::new(PrincipalId::new(), Role::Admin));
        let err = gate
            .admit(None, &CheckPipeline::roles([Role::Admin]), Utc::now())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "unauthenticated");
    }

    #[tokio::test]
    async fn user_is_forbidden_from_admin_pipeline() {
        let (gate, token) = gate_for(Principal::new(PrincipalId::new(), Role::User));
        let err = gate
            .admit(Some(&token), &CheckPipeline::roles([Role::Admin]), Utc::now())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "forbidden");
    }

    #[tokio::test]
    async fn full_flow_for_owner_and_stranger() {
        let u1 = Principal::new(PrincipalId::new(), Role::User);
        let (gate, token) = gate_for(u1);

        let admitted = gate
            .admit(Some(&token), &CheckPipeline::roles([Role::User, Role::Admin]), Utc::now())
            .await
            .unwrap();
        assert_eq!(admitted, u1);

        assert!(gate.check_ownership(&admitted, &Appointment { owner: u1.id }).is_ok());
        let stranger = Appointment { owner: PrincipalId::new() };
        assert_eq!(gate.check_ownership(&admitted, &stranger).unwrap_err().kind(), "forbidden");
    }
}
