use std::sync::Arc;

use axum::{
    Router,
    extract::{Extension, Path},
    http::StatusCode,
    routing::{delete, get, post, put},
};
use chrono::Utc;

use vaxbook_auth::AuthError;
use vaxbook_core::{DomainError, HospitalId};
use vaxbook_directory::{
    Appointment, BookAppointment, Hospital, HospitalPatch, NewHospital, Pagination,
};
use vaxbook_infra::Repository;

use crate::app::extract::{ApiJson, ApiQuery};
use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::authz;
use crate::context::PrincipalContext;

pub fn router(services: &AppServices) -> Router {
    Router::new()
        .route(
            "/",
            get(list_hospitals).merge(authz::guarded(services, authz::admins(), post(create_hospital))),
        )
        .route("/vacCenters", get(list_vac_centers))
        .route(
            "/:id",
            get(get_hospital)
                .merge(authz::guarded(services, authz::admins(), put(update_hospital)))
                .merge(authz::guarded(services, authz::admins(), delete(delete_hospital))),
        )
        .route(
            "/:id/appointments",
            authz::guarded(services, authz::authenticated(), get(list_hospital_appointments))
                .merge(authz::guarded(services, authz::members(), post(book_appointment))),
        )
}

pub async fn list_hospitals(
    Extension(services): Extension<Arc<AppServices>>,
    ApiQuery(query): ApiQuery<dto::ListQuery>,
) -> axum::response::Response {
    let mut all = services.hospitals.list().await;
    all.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));

    let (items, links) = Pagination::new(query.page, query.limit).apply(all);
    dto::page(items, links)
}

pub async fn get_hospital(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    match load_hospital(&services, &id).await {
        Ok(h) => dto::ok(StatusCode::OK, h),
        Err(resp) => resp,
    }
}

pub async fn create_hospital(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    ApiJson(body): ApiJson<NewHospital>,
) -> axum::response::Response {
    let hospital = match body.into_hospital(HospitalId::new()) {
        Ok(h) => h,
        Err(e) => return errors::domain_error_to_response(e),
    };

    if let Err(e) = save_unique_name(&services, hospital.clone()).await {
        return errors::domain_error_to_response(e);
    }

    tracing::info!(hospital_id = %hospital.id, by = %principal.principal_id(), "hospital created");
    dto::ok(StatusCode::CREATED, hospital)
}

pub async fn update_hospital(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<HospitalPatch>,
) -> axum::response::Response {
    let current = match load_hospital(&services, &id).await {
        Ok(h) => h,
        Err(resp) => return resp,
    };
    if let Err(e) = services.gate.check_ownership(principal.principal(), &current) {
        return errors::auth_error_to_response(e);
    }

    let updated = match body.apply(&current) {
        Ok(h) => h,
        Err(e) => return errors::domain_error_to_response(e),
    };
    if let Err(e) = save_unique_name(&services, updated.clone()).await {
        return errors::domain_error_to_response(e);
    }

    dto::ok(StatusCode::OK, updated)
}

pub async fn delete_hospital(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let hospital = match load_hospital(&services, &id).await {
        Ok(h) => h,
        Err(resp) => return resp,
    };
    if let Err(e) = services.gate.check_ownership(principal.principal(), &hospital) {
        return errors::auth_error_to_response(e);
    }

    // Appointments at a removed hospital go with it.
    let hospital_id = hospital.id;
    let cascaded = services
        .appointments
        .remove_where(&|a: &Appointment| a.hospital == hospital_id)
        .await;
    services.hospitals.remove(&hospital_id).await;

    tracing::info!(%hospital_id, cascaded, by = %principal.principal_id(), "hospital deleted");
    dto::empty()
}

pub async fn list_vac_centers(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    let mut centers = services.vac_centers.list().await;
    centers.sort_by(|a, b| a.name.cmp(&b.name));
    dto::list(centers)
}

/// Appointments at one hospital; non-elevated callers only see their own.
pub async fn list_hospital_appointments(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let hospital = match load_hospital(&services, &id).await {
        Ok(h) => h,
        Err(resp) => return resp,
    };

    let caller = *principal.principal();
    let mut appts: Vec<Appointment> = services
        .appointments
        .list()
        .await
        .into_iter()
        .filter(|a| a.hospital == hospital.id)
        .filter(|a| services.gate.check_ownership(&caller, a).is_ok())
        .collect();
    appts.sort_by_key(|a| a.appt_date);

    let items = appts
        .iter()
        .map(|a| dto::appointment_to_json(a, Some(&hospital)))
        .collect::<Vec<_>>();
    dto::list(items)
}

pub async fn book_appointment(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<BookAppointment>,
) -> axum::response::Response {
    let hospital = match load_hospital(&services, &id).await {
        Ok(h) => h,
        Err(resp) => return resp,
    };

    // The quota check and the insert are one store operation.
    let booker = *principal.principal();
    let hospital_id = hospital.id;
    let now = Utc::now();
    let booked = services
        .appointments
        .insert_counted(&|a: &Appointment| a.user == booker.id, &|existing| {
            body.clone().into_appointment(&booker, hospital_id, existing, now)
        })
        .await;
    let appt = match booked {
        Ok(a) => a,
        Err(e) => return errors::domain_error_to_response(e),
    };

    tracing::info!(appointment_id = %appt.id, hospital_id = %hospital.id, by = %booker.id, "appointment booked");
    dto::ok(StatusCode::CREATED, dto::appointment_to_json(&appt, Some(&hospital)))
}

/// Parse and load, mapping a bad id to 400 and a missing record to 404.
pub(crate) async fn load_hospital(services: &AppServices, raw_id: &str) -> Result<Hospital, axum::response::Response> {
    let id: HospitalId = raw_id.parse().map_err(errors::domain_error_to_response)?;
    services
        .hospitals
        .get(&id)
        .await
        .ok_or_else(|| errors::auth_error_to_response(AuthError::NotFound("hospital")))
}

async fn save_unique_name(services: &AppServices, hospital: Hospital) -> Result<(), DomainError> {
    let name = hospital.name.to_lowercase();
    services
        .hospitals
        .save_unless(hospital, &|other: &Hospital| other.name.to_lowercase() == name)
        .await
}
