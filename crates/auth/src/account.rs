//! Account records (the identity store's view of a user).
//!
//! Accounts are plain records; the store is the source of truth for a
//! principal's current role.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use vaxbook_core::{DomainError, Entity};

use crate::password::{PasswordError, hash_password};
use crate::{Principal, PrincipalId, Role};

/// A registered account.
///
/// # Invariants
/// - `email` is trimmed and lowercased; stores enforce uniqueness on it.
/// - `password_hash` is a PHC string, never plaintext.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: PrincipalId,
    pub name: String,
    pub tel: String,
    pub email: String,
    pub role: Role,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl Account {
    pub fn principal(&self) -> Principal {
        Principal::new(self.id, self.role)
    }
}

impl Entity for Account {
    type Id = PrincipalId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Unvalidated registration input.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewAccount {
    pub name: String,
    #[serde(default)]
    pub tel: String,
    pub email: String,
    pub password: String,
}

impl NewAccount {
    /// Validate and hash into a storable [`Account`] with the given role.
    ///
    /// Self-registration always passes `Role::User`; only bootstrap code grants
    /// `Role::Admin`.
    pub fn into_account(self, role: Role, now: DateTime<Utc>) -> Result<Account, DomainError> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(DomainError::validation("name is required"));
        }

        let email = normalize_email(&self.email);
        if !looks_like_email(&email) {
            return Err(DomainError::validation("email is not valid"));
        }

        let password_hash = hash_password(&self.password).map_err(|e| match e {
            PasswordError::TooShort => DomainError::validation(e.to_string()),
            PasswordError::Hash(msg) => DomainError::validation(msg),
        })?;

        Ok(Account {
            id: PrincipalId::new(),
            name,
            tel: self.tel.trim().to_string(),
            email,
            role,
            password_hash,
            created_at: now,
        })
    }
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

fn looks_like_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !email.contains(char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::password::verify_password;

    fn input(email: &str, password: &str) -> NewAccount {
        NewAccount {
            name: "Alice Smith".to_string(),
            tel: "02-123-4567".to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn registration_normalizes_and_hashes() {
        let account = input(" Alice@Example.com ", "secret1")
            .into_account(Role::User, Utc::now())
            .unwrap();

        assert_eq!(account.email, "alice@example.com");
        assert_eq!(account.role, Role::User);
        assert_ne!(account.password_hash, "secret1");
        assert!(verify_password("secret1", &account.password_hash));
    }

    #[test]
    fn invalid_email_is_rejected() {
        let err = input("alice.example.com", "secret1")
            .into_account(Role::User, Utc::now())
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn short_password_is_a_validation_error() {
        let err = input("alice@example.com", "123")
            .into_account(Role::User, Utc::now())
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(m) if m.contains("at least 6")));
    }

    #[test]
    fn password_hash_is_never_serialized() {
        let account = input("alice@example.com", "secret1")
            .into_account(Role::User, Utc::now())
            .unwrap();
        let v = serde_json::to_value(&account).unwrap();
        assert!(v.get("password_hash").is_none());
        assert_eq!(v["role"], "user");
    }
}
