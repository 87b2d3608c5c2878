use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    Router,
    extract::{Extension, Path},
    http::StatusCode,
    routing::get,
};

use vaxbook_auth::AuthError;
use vaxbook_core::AppointmentId;
use vaxbook_directory::{Appointment, AppointmentPatch, Hospital};
use vaxbook_infra::Repository;

use crate::app::extract::ApiJson;
use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::authz;
use crate::context::PrincipalContext;

pub fn router(services: &AppServices) -> Router {
    Router::new()
        .route("/", authz::guarded(services, authz::authenticated(), get(list_appointments)))
        .route(
            "/:id",
            authz::guarded(services, authz::authenticated(), get(get_appointment)).merge(authz::guarded(
                services,
                authz::members(),
                axum::routing::put(update_appointment).delete(delete_appointment),
            )),
        )
}

/// Own appointments, or every appointment for an elevated caller.
pub async fn list_appointments(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    let caller = *principal.principal();
    let mut appts: Vec<Appointment> = services
        .appointments
        .list()
        .await
        .into_iter()
        .filter(|a| services.gate.check_ownership(&caller, a).is_ok())
        .collect();
    appts.sort_by_key(|a| a.appt_date);

    let hospitals: HashMap<_, Hospital> = services
        .hospitals
        .list()
        .await
        .into_iter()
        .map(|h| (h.id, h))
        .collect();

    let items = appts
        .iter()
        .map(|a| dto::appointment_to_json(a, hospitals.get(&a.hospital)))
        .collect::<Vec<_>>();
    dto::list(items)
}

pub async fn get_appointment(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let appt = match load_owned(&services, &principal, &id).await {
        Ok(a) => a,
        Err(resp) => return resp,
    };
    let hospital = services.hospitals.get(&appt.hospital).await;
    dto::ok(StatusCode::OK, dto::appointment_to_json(&appt, hospital.as_ref()))
}

pub async fn update_appointment(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<AppointmentPatch>,
) -> axum::response::Response {
    let current = match load_owned(&services, &principal, &id).await {
        Ok(a) => a,
        Err(resp) => return resp,
    };

    let updated = body.apply(&current);
    if let Err(e) = services.appointments.save(updated.clone()).await {
        return errors::domain_error_to_response(e);
    }

    tracing::info!(appointment_id = %updated.id, by = %principal.principal_id(), "appointment updated");
    let hospital = services.hospitals.get(&updated.hospital).await;
    dto::ok(StatusCode::OK, dto::appointment_to_json(&updated, hospital.as_ref()))
}

pub async fn delete_appointment(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let appt = match load_owned(&services, &principal, &id).await {
        Ok(a) => a,
        Err(resp) => return resp,
    };

    services.appointments.remove(&appt.id).await;
    tracing::info!(appointment_id = %appt.id, by = %principal.principal_id(), "appointment deleted");
    dto::empty()
}

/// Parse, load, then check ownership: 400, 404 and 403 in that order.
async fn load_owned(
    services: &AppServices,
    principal: &PrincipalContext,
    raw_id: &str,
) -> Result<Appointment, axum::response::Response> {
    let id: AppointmentId = raw_id.parse().map_err(errors::domain_error_to_response)?;
    let appt = services
        .appointments
        .get(&id)
        .await
        .ok_or_else(|| errors::auth_error_to_response(AuthError::NotFound("appointment")))?;

    services
        .gate
        .check_ownership(principal.principal(), &appt)
        .map_err(errors::auth_error_to_response)?;
    Ok(appt)
}
