use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};

use vaxbook_directory::{Appointment, Hospital, PageLinks};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<usize>,
    pub limit: Option<usize>,
}

// -------------------------
// Response mapping
// -------------------------

pub fn ok(status: StatusCode, data: impl Serialize) -> axum::response::Response {
    (status, Json(serde_json::json!({ "success": true, "data": data }))).into_response()
}

pub fn list(items: Vec<impl Serialize>) -> axum::response::Response {
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "success": true,
            "count": items.len(),
            "data": items,
        })),
    )
        .into_response()
}

pub fn page(items: Vec<impl Serialize>, links: PageLinks) -> axum::response::Response {
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "success": true,
            "count": items.len(),
            "pagination": links,
            "data": items,
        })),
    )
        .into_response()
}

pub fn empty() -> axum::response::Response {
    ok(StatusCode::OK, serde_json::json!({}))
}

/// Appointment with a summary of its hospital embedded, as clients list them.
pub fn appointment_to_json(appt: &Appointment, hospital: Option<&Hospital>) -> serde_json::Value {
    serde_json::json!({
        "id": appt.id,
        "apptDate": appt.appt_date,
        "user": appt.user,
        "hospital": hospital.map(|h| serde_json::json!({
            "id": h.id,
            "name": h.name,
            "province": h.province,
            "tel": h.tel,
        })),
        "createdAt": appt.created_at,
    })
}
