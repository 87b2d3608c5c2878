//! `vaxbook-directory`: hospital directory, vaccination centers, bookings.
//!
//! Pure domain records and their rules; no storage or HTTP.

pub mod appointment;
pub mod hospital;
pub mod pagination;
pub mod vac_center;

pub use appointment::{Appointment, AppointmentPatch, BookAppointment, MAX_APPOINTMENTS_PER_USER};
pub use hospital::{Hospital, HospitalPatch, NewHospital};
pub use pagination::{PageLink, PageLinks, Pagination};
pub use vac_center::{NewVacCenter, VacCenter};
