//! Identity resolver: raw credential → authenticated principal.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::store::PrincipalStore;
use crate::token::JwtValidator;
use crate::{AuthError, Principal};

/// Turns a bearer credential into a [`Principal`], consulting the identity
/// store so a deleted account or a changed role takes effect immediately.
#[derive(Clone)]
pub struct IdentityResolver {
    validator: Arc<dyn JwtValidator>,
    store: Arc<dyn PrincipalStore>,
}

impl IdentityResolver {
    pub fn new(validator: Arc<dyn JwtValidator>, store: Arc<dyn PrincipalStore>) -> Self {
        Self { validator, store }
    }

    pub async fn resolve(&self, credential: Option<&str>, now: DateTime<Utc>) -> Result<Principal, AuthError> {
        let token = credential
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AuthError::unauthenticated("missing credential"))?;

        let claims = self
            .validator
            .validate(token, now)
            .map_err(|e| AuthError::unauthenticated(e.to_string()))?;

        let principal = self
            .store
            .find_principal_by_id(claims.sub)
            .await
            .ok_or_else(|| AuthError::unauthenticated("principal no longer exists"))?;

        if principal.role != claims.role {
            tracing::debug!(
                principal_id = %principal.id,
                token_role = %claims.role,
                stored_role = %principal.role,
                "token role is stale; using stored role"
            );
        }

        Ok(principal)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use async_trait::async_trait;
    use chrono::Duration;

    use super::*;
    use crate::token::{Hs256JwtValidator, JwtIssuer};
    use crate::{JwtClaims, PrincipalId, Role};

    struct MapStore(HashMap<PrincipalId, Principal>);

    #[async_trait]
    impl PrincipalStore for MapStore {
        async fn find_principal_by_id(&self, id: PrincipalId) -> Option<Principal> {
            self.0.get(&id).copied()
        }
    }

    fn setup(known: &[Principal]) -> (IdentityResolver, Arc<Hs256JwtValidator>) {
        let codec = Arc::new(Hs256JwtValidator::new("resolver-secret"));
        let store = MapStore(known.iter().map(|p| (p.id, *p)).collect());
        (IdentityResolver::new(codec.clone(), Arc::new(store)), codec)
    }

    fn mint(codec: &Hs256JwtValidator, sub: PrincipalId, role: Role, issued: DateTime<Utc>) -> String {
        codec
            .issue(&JwtClaims::new(sub, role, issued, Duration::minutes(10)))
            .unwrap()
    }

    #[tokio::test]
    async fn missing_or_blank_credential_is_unauthenticated() {
        let (resolver, _) = setup(&[]);
        for cred in [None, Some(""), Some("   ")] {
            let err = resolver.resolve(cred, Utc::now()).await.unwrap_err();
            assert_eq!(err, AuthError::unauthenticated("missing credential"));
        }
    }

    #[tokio::test]
    async fn valid_token_for_known_principal_resolves() {
        let alice = Principal::new(PrincipalId::new(), Role::User);
        let (resolver, codec) = setup(&[alice]);
        let now = Utc::now();
        let token = mint(&codec, alice.id, Role::User, now);

        assert_eq!(resolver.resolve(Some(&token), now).await.unwrap(), alice);
    }

    #[tokio::test]
    async fn expired_token_is_unauthenticated() {
        let alice = Principal::new(PrincipalId::new(), Role::User);
        let (resolver, codec) = setup(&[alice]);
        let token = mint(&codec, alice.id, Role::User, Utc::now() - Duration::hours(1));

        let err = resolver.resolve(Some(&token), Utc::now()).await.unwrap_err();
        assert_eq!(err.kind(), "unauthenticated");
    }

    #[tokio::test]
    async fn deleted_principal_is_unauthenticated() {
        let (resolver, codec) = setup(&[]);
        let now = Utc::now();
        let token = mint(&codec, PrincipalId::new(), Role::Admin, now);

        let err = resolver.resolve(Some(&token), now).await.unwrap_err();
        assert_eq!(err, AuthError::unauthenticated("principal no longer exists"));
    }

    #[tokio::test]
    async fn stored_role_wins_over_token_role() {
        let demoted = Principal::new(PrincipalId::new(), Role::User);
        let (resolver, codec) = setup(&[demoted]);
        let now = Utc::now();
        let token = mint(&codec, demoted.id, Role::Admin, now);

        let resolved = resolver.resolve(Some(&token), now).await.unwrap();
        assert_eq!(resolved.role, Role::User);
    }
}
