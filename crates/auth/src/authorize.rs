//! Role authorizer and ownership checker.
//!
//! - No IO
//! - No panics
//! - No side effects (pure policy checks)

use crate::{AuthError, Principal, PrincipalId, Role};

/// A resource that may name the principal controlling it.
///
/// `None` means the resource is governed by role alone.
pub trait Owned {
    fn owner(&self) -> Option<PrincipalId>;
}

impl<T: Owned + ?Sized> Owned for &T {
    fn owner(&self) -> Option<PrincipalId> {
        (**self).owner()
    }
}

/// Accept the principal iff its role is in `allowed`.
///
/// A missing principal is a wiring error upstream; it is reported as
/// `Unauthenticated` so protected routes never reveal themselves via 403.
pub fn authorize(principal: Option<&Principal>, allowed: &[Role]) -> Result<(), AuthError> {
    let Some(principal) = principal else {
        return Err(AuthError::unauthenticated("no resolved principal"));
    };

    let permitted = allowed.iter().any(|r| match (r, principal.role) {
        (Role::Admin, Role::Admin) | (Role::User, Role::User) => true,
        (Role::Admin, Role::User) | (Role::User, Role::Admin) => false,
    });

    if permitted {
        Ok(())
    } else {
        Err(AuthError::forbidden(format!(
            "role '{}' is not permitted for this action",
            principal.role
        )))
    }
}

/// Accept elevated principals, ownerless resources, and owners.
pub fn check_ownership<R: Owned + ?Sized>(principal: &Principal, resource: &R) -> Result<(), AuthError> {
    if principal.role.is_elevated() {
        return Ok(());
    }

    match resource.owner() {
        None => Ok(()),
        Some(owner) if owner == principal.id => Ok(()),
        Some(_) => Err(AuthError::forbidden(format!(
            "principal {} does not own this resource",
            principal.id
        ))),
    }
}
