//! Route access policies.
//!
//! Each protected route states its checks here, in order, and wraps its
//! handler with [`guarded`].

use axum::routing::MethodRouter;

use vaxbook_auth::{CheckPipeline, Role};

use crate::app::services::AppServices;
use crate::middleware::{GuardState, guard};

/// Any signed-in principal.
pub fn authenticated() -> CheckPipeline {
    CheckPipeline::authenticated()
}

/// Regular members and administrators (booking actions).
pub fn members() -> CheckPipeline {
    CheckPipeline::roles([Role::User, Role::Admin])
}

/// Administrators only (directory maintenance).
pub fn admins() -> CheckPipeline {
    CheckPipeline::roles([Role::Admin])
}

/// Put `route` behind the gate with `checks`.
///
/// Uses `route_layer`, so unmatched methods still get 405 rather than 401.
pub fn guarded(services: &AppServices, checks: CheckPipeline, route: MethodRouter) -> MethodRouter {
    let state = GuardState {
        gate: services.gate.clone(),
        checks,
    };
    route.route_layer(axum::middleware::from_fn_with_state(state, guard))
}
