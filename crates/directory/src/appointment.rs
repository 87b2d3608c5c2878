use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use vaxbook_auth::{Owned, Principal, PrincipalId};
use vaxbook_core::{AppointmentId, DomainError, DomainResult, Entity, HospitalId};

/// Bookings a non-elevated principal may hold at once.
pub const MAX_APPOINTMENTS_PER_USER: usize = 3;

/// A vaccination appointment booked by a user at a hospital.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: AppointmentId,
    pub appt_date: DateTime<Utc>,
    /// Booking principal; the owner reference.
    pub user: PrincipalId,
    pub hospital: HospitalId,
    pub created_at: DateTime<Utc>,
}

impl Entity for Appointment {
    type Id = AppointmentId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Owned for Appointment {
    fn owner(&self) -> Option<PrincipalId> {
        Some(self.user)
    }
}

/// Booking request body.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookAppointment {
    pub appt_date: DateTime<Utc>,
}

impl BookAppointment {
    /// Build the appointment for `booker` once quota has been checked.
    ///
    /// The owner is always the booking principal, never taken from the body.
    pub fn into_appointment(
        self,
        booker: &Principal,
        hospital: HospitalId,
        existing_for_booker: usize,
        now: DateTime<Utc>,
    ) -> DomainResult<Appointment> {
        ensure_quota(booker, existing_for_booker)?;
        Ok(Appointment {
            id: AppointmentId::new(),
            appt_date: self.appt_date,
            user: booker.id,
            hospital,
            created_at: now,
        })
    }
}

/// Reschedule input. Owner and hospital are fixed after booking.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentPatch {
    pub appt_date: Option<DateTime<Utc>>,
}

impl AppointmentPatch {
    pub fn apply(self, current: &Appointment) -> Appointment {
        Appointment {
            appt_date: self.appt_date.unwrap_or(current.appt_date),
            ..current.clone()
        }
    }
}

fn ensure_quota(booker: &Principal, existing: usize) -> DomainResult<()> {
    if booker.role.is_elevated() || existing < MAX_APPOINTMENTS_PER_USER {
        return Ok(());
    }
    Err(DomainError::validation(format!(
        "the user with id {} has already made {MAX_APPOINTMENTS_PER_USER} appointments",
        booker.id
    )))
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use vaxbook_auth::Role;

    use super::*;

    fn booking() -> BookAppointment {
        BookAppointment {
            appt_date: Utc::now() + Duration::days(7),
        }
    }

    #[test]
    fn booker_becomes_owner() {
        let user = Principal::new(PrincipalId::new(), Role::User);
        let appt = booking()
            .into_appointment(&user, HospitalId::new(), 0, Utc::now())
            .unwrap();
        assert_eq!(appt.owner(), Some(user.id));
    }

    #[test]
    fn users_are_capped_admins_are_not() {
        let user = Principal::new(PrincipalId::new(), Role::User);
        let admin = Principal::new(PrincipalId::new(), Role::Admin);
        let hospital = HospitalId::new();

        assert!(booking().into_appointment(&user, hospital, 2, Utc::now()).is_ok());
        let err = booking()
            .into_appointment(&user, hospital, MAX_APPOINTMENTS_PER_USER, Utc::now())
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(m) if m.contains("already made 3")));

        assert!(booking().into_appointment(&admin, hospital, 10, Utc::now()).is_ok());
    }

    #[test]
    fn patch_only_moves_the_date() {
        let user = Principal::new(PrincipalId::new(), Role::User);
        let appt = booking()
            .into_appointment(&user, HospitalId::new(), 0, Utc::now())
            .unwrap();
        let new_date = appt.appt_date + Duration::days(1);

        let moved = AppointmentPatch { appt_date: Some(new_date) }.apply(&appt);
        assert_eq!(moved.appt_date, new_date);
        assert_eq!(moved.user, appt.user);
        assert_eq!(AppointmentPatch::default().apply(&appt), appt);
    }

    #[test]
    fn json_uses_camel_case() {
        let v = serde_json::json!({ "apptDate": "2026-11-01T09:00:00Z" });
        let parsed: BookAppointment = serde_json::from_value(v).unwrap();
        assert_eq!(parsed.appt_date.to_rfc3339(), "2026-11-01T09:00:00+00:00");
    }
}
