//! In-memory identity store.

use async_trait::async_trait;

use vaxbook_auth::account::normalize_email;
use vaxbook_auth::{Account, AccountStore, Principal, PrincipalId, PrincipalStore, Role};
use vaxbook_core::{DomainError, DomainResult};

use crate::repository::{InMemoryRepository, Repository};

#[derive(Debug)]
pub struct InMemoryAccountStore {
    accounts: InMemoryRepository<Account>,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self {
            accounts: InMemoryRepository::new("email"),
        }
    }

    /// Change a principal's role. Takes effect on that principal's next
    /// request, whatever role its token carries.
    pub async fn set_role(&self, id: PrincipalId, role: Role) -> DomainResult<()> {
        let mut account = self
            .accounts
            .get(&id)
            .await
            .ok_or(DomainError::not_found("account"))?;
        account.role = role;
        self.accounts.save(account).await
    }

    pub async fn remove(&self, id: PrincipalId) -> Option<Account> {
        self.accounts.remove(&id).await
    }
}

impl Default for InMemoryAccountStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PrincipalStore for InMemoryAccountStore {
    async fn find_principal_by_id(&self, id: PrincipalId) -> Option<Principal> {
        self.accounts.get(&id).await.map(|a| a.principal())
    }
}

#[async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn insert(&self, account: Account) -> Result<(), DomainError> {
        if self.accounts.get(&account.id).await.is_some() {
            return Err(DomainError::conflict("account id already exists"));
        }
        let email = account.email.clone();
        self.accounts
            .save_unless(account, &|existing: &Account| existing.email == email)
            .await
            .map_err(|_| DomainError::conflict("email is already registered"))?;
        tracing::debug!(email = %email, "account stored");
        Ok(())
    }

    async fn get(&self, id: PrincipalId) -> Option<Account> {
        self.accounts.get(&id).await
    }

    async fn find_by_email(&self, email: &str) -> Option<Account> {
        let email = normalize_email(email);
        self.accounts.list().await.into_iter().find(|a| a.email == email)
    }
}
