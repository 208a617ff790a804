//! Modelos del sistema
//!
//! Este módulo contiene todos los modelos de datos que mapean exactamente
//! al schema PostgreSQL.

pub mod duration;
pub mod insurance_command;
pub mod tariff;
pub mod vehicle;

pub use duration::InsuranceDuration;
pub use insurance_command::{InsuranceCommand, NewInsuranceCommand};
pub use tariff::{PowerRange, Tariff};
pub use vehicle::Vehicle;
