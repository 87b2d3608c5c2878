//! Identity store seams consumed by the gate and the login flow.
//!
//! Implementations live in `vaxbook-infra`; this crate stays storage-agnostic.

use async_trait::async_trait;

use vaxbook_core::DomainError;

use crate::{Account, Principal, PrincipalId};

/// Read path used by the identity resolver.
#[async_trait]
pub trait PrincipalStore: Send + Sync {
    async fn find_principal_by_id(&self, id: PrincipalId) -> Option<Principal>;
}

/// Account persistence for registration, login and profile reads.
#[async_trait]
pub trait AccountStore: PrincipalStore {
    /// Insert a new account. Fails with `Conflict` if the email is taken.
    async fn insert(&self, account: Account) -> Result<(), DomainError>;

    async fn get(&self, id: PrincipalId) -> Option<Account>;

    async fn find_by_email(&self, email: &str) -> Option<Account>;
}
