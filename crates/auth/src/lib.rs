//! `vaxbook-auth`: authentication/authorization boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage: stores are
//! consumed through [`store`] traits and transport adapters live in the API.

pub mod account;
pub mod authorize;
pub mod claims;
pub mod error;
pub mod gate;
pub mod password;
pub mod pipeline;
pub mod principal;
pub mod resolver;
pub mod roles;
pub mod store;
pub mod token;

pub use account::{Account, NewAccount};
pub use authorize::{Owned, authorize, check_ownership};
pub use claims::{JwtClaims, TokenValidationError, validate_claims};
pub use error::AuthError;
pub use gate::AccessGate;
pub use pipeline::{CheckPipeline, RequestCheck, RequireAuthenticated, RequireRole, Verdict};
pub use principal::{Principal, PrincipalId};
pub use resolver::IdentityResolver;
pub use roles::Role;
pub use store::{AccountStore, PrincipalStore};
pub use token::{Hs256JwtValidator, JwtIssuer, JwtValidator, TokenError};
