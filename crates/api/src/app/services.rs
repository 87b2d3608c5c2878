//! Store and gate wiring.
//!
//! Everything a handler touches is constructed here and injected as an
//! `Extension<Arc<AppServices>>`; nothing lives in module-level statics.

use std::sync::Arc;

use chrono::{Duration, Utc};

use vaxbook_auth::{
    AccessGate, AccountStore, Hs256JwtValidator, IdentityResolver, JwtIssuer, NewAccount, Role,
};
use vaxbook_core::{DomainError, DomainResult};
use vaxbook_directory::{Appointment, Hospital, NewVacCenter, VacCenter};
use vaxbook_infra::{InMemoryAccountStore, InMemoryRepository, Repository};

use crate::config::{AdminSeed, ApiConfig};

/// Vaccination centers served when no seed file is configured.
pub const BUNDLED_VAC_CENTERS: &str = include_str!("../../data/vac_centers.json");

/// How issued sessions behave.
#[derive(Debug, Clone, Copy)]
pub struct SessionSettings {
    pub token_ttl: Duration,
    pub cookie_ttl: Duration,
    pub secure_cookies: bool,
}

pub struct AppServices {
    pub accounts: Arc<dyn AccountStore>,
    pub hospitals: Arc<dyn Repository<Hospital>>,
    pub appointments: Arc<dyn Repository<Appointment>>,
    pub vac_centers: Arc<dyn Repository<VacCenter>>,
    pub gate: AccessGate,
    pub tokens: Arc<dyn JwtIssuer>,
    pub session: SessionSettings,
}

impl AppServices {
    /// In-memory stores (dev/test) with the gate keyed by `config.jwt_secret`.
    pub fn in_memory(config: &ApiConfig) -> Self {
        Self::with_accounts(config, Arc::new(InMemoryAccountStore::new()))
    }

    /// In-memory stores around a caller-held account store, so role changes
    /// and removals can be driven from outside the HTTP surface.
    pub fn with_accounts(config: &ApiConfig, accounts: Arc<InMemoryAccountStore>) -> Self {
        let codec = Arc::new(Hs256JwtValidator::new(config.jwt_secret.as_bytes()));
        let gate = AccessGate::new(IdentityResolver::new(codec.clone(), accounts.clone()));

        Self {
            accounts,
            hospitals: Arc::new(InMemoryRepository::new("hospital name")),
            appointments: Arc::new(InMemoryRepository::new("appointment")),
            vac_centers: Arc::new(InMemoryRepository::new("vaccination center")),
            gate,
            tokens: codec,
            session: SessionSettings {
                token_ttl: config.jwt_ttl,
                cookie_ttl: config.cookie_ttl,
                secure_cookies: config.secure_cookies(),
            },
        }
    }

    /// Create the bootstrap administrator unless the email is already taken.
    pub async fn seed_admin(&self, seed: &AdminSeed) -> DomainResult<()> {
        if self.accounts.find_by_email(&seed.email).await.is_some() {
            tracing::info!(email = %seed.email, "admin seed already present");
            return Ok(());
        }

        let account = NewAccount {
            name: "Administrator".to_string(),
            tel: String::new(),
            email: seed.email.clone(),
            password: seed.password.clone(),
        }
        .into_account(Role::Admin, Utc::now())?;

        match self.accounts.insert(account).await {
            Ok(()) | Err(DomainError::Conflict(_)) => {
                tracing::info!(email = %seed.email, "admin account seeded");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}

impl AppServices {
    /// Load vaccination centers from a JSON list of `{name, tel}`. Names
    /// already present (case-insensitive) are skipped; returns how many were
    /// added.
    pub async fn seed_vac_centers(&self, json: &str) -> DomainResult<usize> {
        let entries: Vec<NewVacCenter> = serde_json::from_str(json)
            .map_err(|e| DomainError::validation(format!("invalid vaccination center list: {e}")))?;

        let mut added = 0;
        for entry in entries {
            let center = entry.into_vac_center()?;
            let name = center.name.to_lowercase();
            match self
                .vac_centers
                .save_unless(center, &|other: &VacCenter| other.name.to_lowercase() == name)
                .await
            {
                Ok(()) => added += 1,
                Err(DomainError::Conflict(_)) => {
                    tracing::debug!(%name, "vaccination center already present");
                }
                Err(e) => return Err(e),
            }
        }

        tracing::info!(added, "vaccination centers seeded");
        Ok(added)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn admin_seed_is_idempotent() {
        let services = AppServices::in_memory(&ApiConfig::for_tests("secret"));
        let seed = AdminSeed {
            email: "root@example.com".to_string(),
            password: "changeme".to_string(),
        };

        services.seed_admin(&seed).await.unwrap();
        services.seed_admin(&seed).await.unwrap();

        let admin = services.accounts.find_by_email("root@example.com").await.unwrap();
        assert_eq!(admin.role, Role::Admin);
    }

    #[tokio::test]
    async fn bundled_vac_centers_seed_once() {
        let services = AppServices::in_memory(&ApiConfig::for_tests("secret"));

        let added = services.seed_vac_centers(BUNDLED_VAC_CENTERS).await.unwrap();
        assert!(added > 0);
        assert_eq!(services.seed_vac_centers(BUNDLED_VAC_CENTERS).await.unwrap(), 0);
        assert_eq!(services.vac_centers.list().await.len(), added);
    }

    #[tokio::test]
    async fn malformed_vac_center_list_is_rejected() {
        let services = AppServices::in_memory(&ApiConfig::for_tests("secret"));

        let err = services.seed_vac_centers("{\"name\": \"x\"}").await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        let err = services.seed_vac_centers("[{\"name\": \" \"}]").await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert!(services.vac_centers.list().await.is_empty());
    }
}
