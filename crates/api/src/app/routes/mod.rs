//! One module per resource; each exposes `router(&AppServices)`.

pub mod appointments;
pub mod auth;
pub mod hospitals;
pub mod system;
